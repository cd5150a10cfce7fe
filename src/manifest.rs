//! Xcode asset catalog manifest (`Contents.json`) for an `AppIcon.appiconset`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{IconError, Result};
use crate::models::IconSpec;

pub const MANIFEST_FILE: &str = "Contents.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManifestImage {
    pub filename: String,
    pub idiom: String,
    pub scale: String,
    pub size: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManifestInfo {
    pub author: String,
    pub version: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Manifest {
    pub images: Vec<ManifestImage>,
    pub info: ManifestInfo,
}

impl Manifest {
    pub fn for_specs(specs: &[IconSpec]) -> Self {
        let images = specs
            .iter()
            .map(|s| ManifestImage {
                filename: s.filename.to_string(),
                idiom: "mac".to_string(),
                scale: s.scale().to_string(),
                size: s.point_size().to_string(),
            })
            .collect();
        Self {
            images,
            info: ManifestInfo { author: "xcode".to_string(), version: 1 },
        }
    }
}

pub fn write_manifest(dir: &Path, specs: &[IconSpec]) -> Result<PathBuf> {
    let path = dir.join(MANIFEST_FILE);
    let json = serde_json::to_string_pretty(&Manifest::for_specs(specs))?;
    fs::write(&path, json).map_err(|source| IconError::Io { path: path.clone(), source })?;
    Ok(path)
}
