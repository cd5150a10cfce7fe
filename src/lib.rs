pub mod config;
pub mod error;
pub mod fonts;
pub mod icon;
pub mod iconset;
pub mod logger;
pub mod manifest;
pub mod models;

pub use error::{IconError, Result};
pub use models::{IconOutcome, IconSpec, Palette, Rgb, ICON_SPECS};
