use std::path::Path;

use ab_glyph::{point, Font, Glyph, OutlinedGlyph, ScaleFont};
use image::{ImageFormat, Rgba, RgbaImage};
use log::{debug, warn};

use crate::error::{IconError, Result};
use crate::fonts::{FontResolver, LoadedFont};
use crate::models::{IconOutcome, Palette, Rgb};

/// Corner radius: ~22% of the size (macOS style), at least 2px.
pub fn corner_radius(size: u32) -> u32 {
    ((size as f32 * 0.22) as u32).max(2)
}

/// Label font size in pixels per em: ~48% of the size, at least 8.
pub fn font_size(size: u32) -> u32 {
    ((size as f32 * 0.48) as u32).max(8)
}

/// Slight upward shift for optical centering.
pub fn vertical_bias(size: u32) -> i32 {
    (size as f32 * 0.02) as i32
}

/// Integer pixel box of laid-out text relative to the drawing origin, `max` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextBox {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl TextBox {
    pub fn width(&self) -> i32 { self.x1 - self.x0 }
    pub fn height(&self) -> i32 { self.y1 - self.y0 }
}

/// Drawing origin that centers `bbox` on a `size` canvas, corrected for the box origin.
pub fn text_origin(size: u32, bbox: TextBox) -> (i32, i32) {
    let size = size as i32;
    let x = (size - bbox.width()).div_euclid(2) - bbox.x0;
    let y = (size - bbox.height()).div_euclid(2) - bbox.y0 - vertical_bias(size as u32);
    (x, y)
}

/// A rendered canvas and whether the label made it on.
pub struct RenderedIcon {
    pub image: RgbaImage,
    pub outcome: IconOutcome,
}

/// Renders and saves one icon as PNG.
pub fn create_icon(
    size: u32,
    output_path: &Path,
    label: &str,
    palette: &Palette,
    fonts: &FontResolver,
) -> Result<IconOutcome> {
    let rendered = render_icon(size, label, palette, fonts)?;
    rendered
        .image
        .save_with_format(output_path, ImageFormat::Png)
        .map_err(|source| IconError::Image { path: output_path.to_path_buf(), source })?;
    Ok(rendered.outcome)
}

pub fn render_icon(size: u32, label: &str, palette: &Palette, fonts: &FontResolver) -> Result<RenderedIcon> {
    if size == 0 {
        return Err(IconError::InvalidSize(size));
    }
    let mut img = RgbaImage::from_pixel(size, size, Rgba([0, 0, 0, 0]));
    let radius = corner_radius(size);
    fill_rounded_rect(&mut img, radius, palette.background);

    let font_px = font_size(size);
    debug!("size {size}: radius {radius}, font {font_px}px");

    let Some(font) = fonts.resolve(font_px) else {
        warn!("No suitable font found for size {size}, using fallback");
        return Ok(RenderedIcon { image: img, outcome: IconOutcome::Fallback });
    };

    let glyphs = layout_label(&font, label);
    if let Some(bbox) = text_box(&glyphs) {
        let (x, y) = text_origin(size, bbox);
        draw_glyphs(&mut img, &glyphs, x, y, palette.text);
    }
    Ok(RenderedIcon { image: img, outcome: IconOutcome::WithText })
}

/// Fills the pixel box [0, size-1] x [0, size-1] with rounded corners, opaque.
fn fill_rounded_rect(img: &mut RgbaImage, radius: u32, color: Rgb) {
    let (w, h) = img.dimensions();
    let last_x = w as i64 - 1;
    let last_y = h as i64 - 1;
    let r = (radius as i64).min(last_x / 2).min(last_y / 2);
    let fill = color.opaque();

    for y in 0..h {
        for x in 0..w {
            // nearest point of the inner (radius-shrunk) rectangle
            let cx = (x as i64).clamp(r, last_x - r);
            let cy = (y as i64).clamp(r, last_y - r);
            let dx = x as i64 - cx;
            let dy = y as i64 - cy;
            if dx * dx + dy * dy <= r * r {
                img.put_pixel(x, y, fill);
            }
        }
    }
}

/// Lays out `label` on one line starting at (0, 0), baseline at the ascent.
fn layout_label(font: &LoadedFont, label: &str) -> Vec<OutlinedGlyph> {
    let scaled = font.font.as_scaled(font.scale);
    let mut caret = point(0.0, scaled.ascent());
    let mut last: Option<Glyph> = None;
    let mut out = Vec::new();

    for c in label.chars() {
        let mut glyph = scaled.scaled_glyph(c);
        if let Some(prev) = last.take() {
            caret.x += scaled.kern(prev.id, glyph.id);
        }
        glyph.position = caret;
        caret.x += scaled.h_advance(glyph.id);
        last = Some(glyph.clone());
        if let Some(outlined) = font.font.outline_glyph(glyph) {
            out.push(outlined);
        }
    }
    out
}

/// Union of glyph pixel bounds, rounded outward.
fn text_box(glyphs: &[OutlinedGlyph]) -> Option<TextBox> {
    glyphs.iter().map(|g| g.px_bounds()).fold(None, |acc, b| {
        let next = TextBox {
            x0: b.min.x.floor() as i32,
            y0: b.min.y.floor() as i32,
            x1: b.max.x.ceil() as i32,
            y1: b.max.y.ceil() as i32,
        };
        Some(match acc {
            None => next,
            Some(a) => TextBox {
                x0: a.x0.min(next.x0),
                y0: a.y0.min(next.y0),
                x1: a.x1.max(next.x1),
                y1: a.y1.max(next.y1),
            },
        })
    })
}

fn draw_glyphs(img: &mut RgbaImage, glyphs: &[OutlinedGlyph], x: i32, y: i32, color: Rgb) {
    let (w, h) = img.dimensions();
    for glyph in glyphs {
        let bounds = glyph.px_bounds();
        let gx = bounds.min.x.floor() as i32 + x;
        let gy = bounds.min.y.floor() as i32 + y;
        glyph.draw(|px, py, coverage| {
            let tx = gx + px as i32;
            let ty = gy + py as i32;
            if tx < 0 || ty < 0 || tx >= w as i32 || ty >= h as i32 {
                return;
            }
            let dst = img.get_pixel_mut(tx as u32, ty as u32);
            blend_over(dst, color, coverage);
        });
    }
}

/// Source-over compositing of `color` at `coverage` onto `dst`.
fn blend_over(dst: &mut Rgba<u8>, color: Rgb, coverage: f32) {
    let src_a = coverage.clamp(0.0, 1.0);
    if src_a <= 0.0 {
        return;
    }
    let dst_a = dst[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    let channel = |s: u8, d: u8| {
        let v = (s as f32 * src_a + d as f32 * dst_a * (1.0 - src_a)) / out_a;
        v.round().clamp(0.0, 255.0) as u8
    };
    *dst = Rgba([
        channel(color.0, dst[0]),
        channel(color.1, dst[1]),
        channel(color.2, dst[2]),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::{any_system_font, FontCandidate};
    use crate::models::{DEFAULT_LABEL, ICON_SPECS};

    fn no_fonts() -> FontResolver {
        FontResolver::with_candidates(vec![FontCandidate::file("/nonexistent/none.ttf")])
    }

    #[test]
    fn test_radius_and_font_size() {
        assert_eq!(corner_radius(16), 3);
        assert_eq!(font_size(16), 8);
        assert_eq!(corner_radius(1024), 225);
        assert_eq!(font_size(1024), 491);
        assert_eq!(corner_radius(4), 2);
        assert_eq!(font_size(10), 8);
        for spec in ICON_SPECS {
            let s = spec.size;
            assert_eq!(corner_radius(s), ((s as f32 * 0.22) as u32).max(2));
            assert_eq!(font_size(s), ((s as f32 * 0.48) as u32).max(8));
        }
    }

    #[test]
    fn test_text_origin_corrects_bbox_offset() {
        // 40x30 box starting at (3, 12) on a 100px canvas, bias 2px
        let bbox = TextBox { x0: 3, y0: 12, x1: 43, y1: 42 };
        assert_eq!(text_origin(100, bbox), (30 - 3, 35 - 12 - 2));
        // odd remainder floors
        let bbox = TextBox { x0: 0, y0: 0, x1: 5, y1: 5 };
        assert_eq!(text_origin(16, bbox), (5, 5));
    }

    #[test]
    fn test_fallback_is_background_only() {
        let palette = Palette::default();
        for size in [1, 2, 16, 64] {
            let rendered = render_icon(size, DEFAULT_LABEL, &palette, &no_fonts()).unwrap();
            assert_eq!(rendered.outcome, IconOutcome::Fallback);
            assert_eq!(rendered.image.dimensions(), (size, size));
            for p in rendered.image.pixels() {
                assert!(*p == Rgba([0, 0, 0, 0]) || *p == palette.background.opaque(), "{p:?}");
            }
        }
    }

    #[test]
    fn test_rounded_corners() {
        let rendered = render_icon(16, DEFAULT_LABEL, &Palette::default(), &no_fonts()).unwrap();
        let img = &rendered.image;
        let bg = Palette::default().background.opaque();
        assert_eq!(img.get_pixel(0, 0)[3], 0);
        assert_eq!(img.get_pixel(15, 15)[3], 0);
        assert_eq!(*img.get_pixel(8, 8), bg);
        assert_eq!(*img.get_pixel(8, 0), bg);
        assert_eq!(*img.get_pixel(15, 8), bg);
        assert_eq!(*img.get_pixel(3, 0), bg);
    }

    #[test]
    fn test_zero_size_rejected() {
        let err = render_icon(0, DEFAULT_LABEL, &Palette::default(), &no_fonts()).err().unwrap();
        assert!(matches!(err, IconError::InvalidSize(0)));
    }

    #[test]
    fn test_blend_over_opaque() {
        let mut px = Rgba([220, 38, 38, 255]);
        blend_over(&mut px, Rgb(255, 255, 255), 1.0);
        assert_eq!(px, Rgba([255, 255, 255, 255]));
        let mut px = Rgba([0, 0, 0, 255]);
        blend_over(&mut px, Rgb(255, 255, 255), 0.5);
        assert_eq!(px, Rgba([128, 128, 128, 255]));
        let mut px = Rgba([0, 0, 0, 0]);
        blend_over(&mut px, Rgb(10, 20, 30), 0.0);
        assert_eq!(px, Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn test_label_is_centered() {
        let Some(real) = any_system_font() else { return };
        let fonts = FontResolver::with_candidates(vec![real]);
        let size = 256;
        let font = fonts.resolve(font_size(size)).unwrap();
        let glyphs = layout_label(&font, DEFAULT_LABEL);
        let bbox = text_box(&glyphs).unwrap();
        let (x, y) = text_origin(size, bbox);

        let placed_x0 = (bbox.x0 + x) as f32;
        let placed_y0 = (bbox.y0 + y) as f32;
        let want_x = (size as f32 - bbox.width() as f32) / 2.0;
        let want_y = (size as f32 - bbox.height() as f32) / 2.0 - 0.02 * size as f32;
        assert!((placed_x0 - want_x).abs() <= 1.0, "{placed_x0} vs {want_x}");
        assert!((placed_y0 - want_y).abs() <= 1.0, "{placed_y0} vs {want_y}");
    }

    #[test]
    fn test_text_pixels_drawn() {
        let Some(real) = any_system_font() else { return };
        let fonts = FontResolver::with_candidates(vec![real]);
        let palette = Palette::default();
        let rendered = render_icon(128, DEFAULT_LABEL, &palette, &fonts).unwrap();
        assert_eq!(rendered.outcome, IconOutcome::WithText);
        let white = rendered.image.pixels().filter(|p| **p == palette.text.opaque()).count();
        assert!(white > 100, "only {white} text pixels");
        // corners stay clear
        assert_eq!(rendered.image.get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn test_create_icon_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("icon_16x16.png");
        let outcome = create_icon(16, &path, DEFAULT_LABEL, &Palette::default(), &no_fonts()).unwrap();
        assert_eq!(outcome, IconOutcome::Fallback);
        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (16, 16));
        assert_eq!(*img.get_pixel(8, 8), Rgba([220, 38, 38, 255]));
    }
}
