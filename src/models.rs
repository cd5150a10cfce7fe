use image::Rgba;

/// One required output file of the icon set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconSpec {
    pub size: u32,
    pub filename: &'static str,
}

impl IconSpec {
    pub const fn new(size: u32, filename: &'static str) -> Self {
        Self { size, filename }
    }

    /// Logical point size as written in the filename, e.g. "16x16" for `icon_16x16@2x.png`.
    pub fn point_size(&self) -> &'static str {
        let stem = self.filename.trim_end_matches(".png");
        let stem = stem.split('@').next().unwrap_or(stem);
        stem.trim_start_matches("icon_")
    }

    /// Density suffix: "2x" for `@2x` variants, otherwise "1x".
    pub fn scale(&self) -> &'static str {
        if self.filename.contains("@2x") { "2x" } else { "1x" }
    }
}

// macOS AppIcon sizes (actual pixel sizes)
pub const ICON_SPECS: [IconSpec; 10] = [
    IconSpec::new(16, "icon_16x16.png"),
    IconSpec::new(32, "icon_16x16@2x.png"),
    IconSpec::new(32, "icon_32x32.png"),
    IconSpec::new(64, "icon_32x32@2x.png"),
    IconSpec::new(128, "icon_128x128.png"),
    IconSpec::new(256, "icon_128x128@2x.png"),
    IconSpec::new(256, "icon_256x256.png"),
    IconSpec::new(512, "icon_256x256@2x.png"),
    IconSpec::new(512, "icon_512x512.png"),
    IconSpec::new(1024, "icon_512x512@2x.png"),
];

pub const DEFAULT_LABEL: &str = "BR";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn opaque(self) -> Rgba<u8> {
        Rgba([self.0, self.1, self.2, 255])
    }

    /// Parses `#RRGGBB`, `RRGGBB` or `r,g,b`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.contains(',') {
            let parts: Vec<u8> = s.split(',').filter_map(|p| p.trim().parse().ok()).collect();
            return match parts.as_slice() {
                [r, g, b] if s.split(',').count() == 3 => Some(Rgb(*r, *g, *b)),
                _ => None,
            };
        }
        let hex = s.trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgb,
    pub text: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Rgb(220, 38, 38), // #DC2626
            text: Rgb(255, 255, 255),
        }
    }
}

/// What ended up in a written icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconOutcome {
    WithText,
    /// No font could be loaded; background only.
    Fallback,
}
