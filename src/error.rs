use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IconError {
    #[error("icon size must be positive, got {0}")]
    InvalidSize(u32),
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to write manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, IconError>;
