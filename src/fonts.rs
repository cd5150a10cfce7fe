use std::fs;
use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontVec, PxScale};
use log::{debug, warn};

/// A font file to try, with the face index for `.ttc` collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontCandidate {
    pub path: PathBuf,
    pub index: Option<u32>,
}

impl FontCandidate {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), index: None }
    }

    pub fn collection(path: impl Into<PathBuf>, index: u32) -> Self {
        Self { path: path.into(), index: Some(index) }
    }

    /// Parses `path` or `path|index`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        match s.rsplit_once('|') {
            Some((path, idx)) => {
                let index = idx.trim().parse::<u32>().ok()?;
                Some(Self::collection(path.trim(), index))
            }
            None => Some(Self::file(s)),
        }
    }
}

const DIRECT_FONTS: [&str; 4] = [
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
    "/System/Library/Fonts/Supplemental/Verdana Bold.ttf",
    "/System/Library/Fonts/Geneva.ttf",
];

const COLLECTION_FONTS: [(&str, u32); 2] = [
    ("/System/Library/Fonts/Avenir Next.ttc", 0),
    ("/System/Library/Fonts/Avenir.ttc", 0),
];

/// A parsed font together with the pixel scale for the requested em size.
pub struct LoadedFont {
    pub font: FontVec,
    pub scale: PxScale,
    pub source: PathBuf,
}

impl std::fmt::Debug for LoadedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedFont")
            .field("source", &self.source)
            .field("scale", &self.scale)
            .finish()
    }
}

/// Ordered font fallback: direct files first, then collections. First one that loads wins.
#[derive(Debug, Clone)]
pub struct FontResolver {
    candidates: Vec<FontCandidate>,
}

impl Default for FontResolver {
    fn default() -> Self {
        let mut candidates: Vec<FontCandidate> = DIRECT_FONTS.iter().map(|p| FontCandidate::file(*p)).collect();
        candidates.extend(COLLECTION_FONTS.iter().map(|(p, i)| FontCandidate::collection(*p, *i)));
        Self { candidates }
    }
}

impl FontResolver {
    pub fn with_candidates(candidates: Vec<FontCandidate>) -> Self {
        Self { candidates }
    }

    /// Built-in list with `extra` tried first.
    pub fn with_preferred(extra: &[FontCandidate]) -> Self {
        let mut resolver = Self::default();
        let mut candidates = extra.to_vec();
        candidates.append(&mut resolver.candidates);
        resolver.candidates = candidates;
        resolver
    }

    pub fn candidates(&self) -> &[FontCandidate] {
        &self.candidates
    }

    /// Returns the first loadable candidate at `font_size` px per em, or `None` if every one fails.
    pub fn resolve(&self, font_size: u32) -> Option<LoadedFont> {
        for candidate in &self.candidates {
            if !candidate.path.exists() {
                continue;
            }
            match load_font(&candidate.path, candidate.index.unwrap_or(0), font_size) {
                Ok(loaded) => {
                    debug!("using font {} at {}px", candidate.path.display(), font_size);
                    return Some(loaded);
                }
                Err(e) => {
                    warn!("Could not load {}: {}", candidate.path.display(), e);
                    continue;
                }
            }
        }
        None
    }
}

fn load_font(path: &Path, index: u32, font_size: u32) -> Result<LoadedFont, String> {
    let data = fs::read(path).map_err(|e| e.to_string())?;
    let font = FontVec::try_from_vec_and_index(data, index).map_err(|e| e.to_string())?;
    let scale = em_scale(&font, font_size as f32);
    Ok(LoadedFont { font, scale, source: path.to_path_buf() })
}

/// `ab_glyph` scales by ascent-to-descent height; convert a pixels-per-em size into that.
fn em_scale(font: &FontVec, em_px: f32) -> PxScale {
    match font.units_per_em() {
        Some(upem) if upem > 0.0 => PxScale::from(em_px * font.height_unscaled() / upem),
        _ => PxScale::from(em_px),
    }
}

/// Well-known font locations on Linux and macOS, used by tests that need any real font.
#[cfg(test)]
pub(crate) fn any_system_font() -> Option<FontCandidate> {
    const PROBES: [&str; 6] = [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
        "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    ];
    PROBES.iter().map(Path::new).find(|p| p.exists()).map(FontCandidate::file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_order() {
        let resolver = FontResolver::default();
        let c = resolver.candidates();
        assert_eq!(c.len(), 6);
        assert_eq!(c[0], FontCandidate::file("/System/Library/Fonts/Supplemental/Arial Bold.ttf"));
        assert_eq!(c[3], FontCandidate::file("/System/Library/Fonts/Geneva.ttf"));
        assert_eq!(c[4], FontCandidate::collection("/System/Library/Fonts/Avenir Next.ttc", 0));
        assert_eq!(c[5], FontCandidate::collection("/System/Library/Fonts/Avenir.ttc", 0));
    }

    #[test]
    fn test_preferred_go_first() {
        let extra = FontCandidate::file("/opt/fonts/Custom.ttf");
        let resolver = FontResolver::with_preferred(std::slice::from_ref(&extra));
        assert_eq!(resolver.candidates()[0], extra);
        assert_eq!(resolver.candidates().len(), 7);
    }

    #[test]
    fn test_parse_candidate() {
        assert_eq!(FontCandidate::parse("/a/b.ttf"), Some(FontCandidate::file("/a/b.ttf")));
        assert_eq!(FontCandidate::parse("/a/b.ttc|2"), Some(FontCandidate::collection("/a/b.ttc", 2)));
        assert_eq!(FontCandidate::parse("/a/b.ttc|x"), None);
        assert_eq!(FontCandidate::parse("  "), None);
    }

    #[test]
    fn test_missing_candidates_resolve_to_none() {
        let resolver = FontResolver::with_candidates(vec![
            FontCandidate::file("/nonexistent/font.ttf"),
            FontCandidate::collection("/nonexistent/fonts.ttc", 1),
        ]);
        assert!(resolver.resolve(12).is_none());
    }

    #[test]
    fn test_broken_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("broken.ttf");
        fs::write(&bogus, b"definitely not a font").unwrap();
        let resolver = FontResolver::with_candidates(vec![FontCandidate::file(&bogus)]);
        assert!(resolver.resolve(12).is_none());

        let Some(real) = any_system_font() else { return };
        let resolver = FontResolver::with_candidates(vec![FontCandidate::file(&bogus), real.clone()]);
        let loaded = resolver.resolve(12).expect("second candidate loads");
        assert_eq!(loaded.source, real.path);
    }

    #[test]
    fn test_scale_grows_with_size() {
        let Some(real) = any_system_font() else { return };
        let resolver = FontResolver::with_candidates(vec![real]);
        let small = resolver.resolve(8).unwrap();
        let large = resolver.resolve(491).unwrap();
        assert!(small.scale.y > 0.0);
        assert!(large.scale.y > small.scale.y * 50.0);
    }
}
