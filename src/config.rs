use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error::{IconError, Result};
use crate::fonts::FontCandidate;
use crate::models::{Palette, Rgb, DEFAULT_LABEL};

pub const DEFAULT_OUTPUT_DIR: &str = "BelegRenamer/BelegRenamer/Assets.xcassets/AppIcon.appiconset";
const CONFIG_FILE_NAME: &str = "icons.txt";
const LOCAL_CONFIG_FILE: &str = "icons_config.txt";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub output_dir: PathBuf,
    pub label: String,
    pub palette: Palette,
    /// Fonts tried before the built-in list.
    pub fonts: Vec<FontCandidate>,
    pub write_contents_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            label: DEFAULT_LABEL.to_string(),
            palette: Palette::default(),
            fonts: Vec::new(),
            write_contents_json: false,
        }
    }
}

fn config_file_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("de", "BelegRenamer", "BelegRenamer")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Reads `explicit` if given (must exist), else the per-user config, else `./icons_config.txt`,
/// else defaults.
pub fn read_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        let content = fs::read_to_string(path)
            .map_err(|source| IconError::Io { path: path.to_path_buf(), source })?;
        debug!("config from {}", path.display());
        return Ok(parse_config(&content));
    }
    let candidates = config_file_path().into_iter().chain(std::iter::once(PathBuf::from(LOCAL_CONFIG_FILE)));
    for path in candidates {
        if let Ok(content) = fs::read_to_string(&path) {
            debug!("config from {}", path.display());
            return Ok(parse_config(&content));
        }
    }
    Ok(Config::default())
}

pub fn parse_config(content: &str) -> Config {
    let mut cfg = Config::default();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((k, v)) = line.split_once('=') else { continue };
        let v = v.trim();
        match k.trim() {
            "output_dir" => if !v.is_empty() { cfg.output_dir = expand_dir(v) },
            "label" => if !v.is_empty() { cfg.label = v.to_string() },
            "background" => match Rgb::parse(v) {
                Some(c) => cfg.palette.background = c,
                None => warn!("ignoring invalid background color {v:?}"),
            },
            "text_color" => match Rgb::parse(v) {
                Some(c) => cfg.palette.text = c,
                None => warn!("ignoring invalid text_color {v:?}"),
            },
            "font" => match FontCandidate::parse(v) {
                Some(f) => cfg.fonts.push(f),
                None => warn!("ignoring invalid font entry {v:?}"),
            },
            "write_contents_json" => cfg.write_contents_json = v.parse::<u8>().map(|n| n != 0).unwrap_or(false),
            _ => {}
        }
    }
    cfg
}

/// `~/` expansion; everything else is taken as-is.
pub fn expand_dir(raw: &str) -> PathBuf {
    let raw = raw.trim();
    if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = directories::BaseDirs::new().map(|b| b.home_dir().to_path_buf()) {
            return home.join(rest);
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(raw)
}

/// Makes `dir` absolute against the current working directory.
pub fn resolve_output_dir(dir: &Path) -> Result<PathBuf> {
    if dir.is_absolute() {
        return Ok(dir.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|source| IconError::Io { path: dir.to_path_buf(), source })?;
    Ok(cwd.join(dir))
}
