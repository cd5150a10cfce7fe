use std::path::Path;

use log::info;

use crate::error::Result;
use crate::fonts::FontResolver;
use crate::icon::create_icon;
use crate::models::{IconOutcome, IconSpec, Palette};

/// Writes every spec into `out_dir`, one after the other. The first failure aborts the batch;
/// icons already written stay on disk.
pub fn generate_iconset(
    out_dir: &Path,
    specs: &[IconSpec],
    label: &str,
    palette: &Palette,
    fonts: &FontResolver,
) -> Result<Vec<(IconSpec, IconOutcome)>> {
    let mut results = Vec::with_capacity(specs.len());
    for spec in specs {
        let path = out_dir.join(spec.filename);
        let outcome = create_icon(spec.size, &path, label, palette, fonts)?;
        match outcome {
            IconOutcome::WithText => {
                println!("Created: {} ({}x{})", path.display(), spec.size, spec.size)
            }
            IconOutcome::Fallback => println!(
                "Created: {} ({}x{}) - NO TEXT (fallback)",
                path.display(),
                spec.size,
                spec.size
            ),
        }
        results.push((*spec, outcome));
    }
    let fallbacks = results.iter().filter(|(_, o)| *o == IconOutcome::Fallback).count();
    if fallbacks > 0 {
        info!("{fallbacks} of {} icons written without text", results.len());
    }
    Ok(results)
}
