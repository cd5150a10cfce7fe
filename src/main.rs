use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use belegicons::config::{read_config, resolve_output_dir};
use belegicons::fonts::FontResolver;
use belegicons::iconset::generate_iconset;
use belegicons::manifest::write_manifest;
use belegicons::{logger, ICON_SPECS};

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate the Beleg-Renamer app icon set", long_about = None)]
struct Args {
    /// Config file (key=value); defaults to the per-user config, then ./icons_config.txt
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output directory; overrides `output_dir` from the config
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init();

    let cfg = read_config(args.config.as_deref()).context("read config")?;
    let out_dir = resolve_output_dir(args.out_dir.as_deref().unwrap_or(cfg.output_dir.as_path()))?;
    let fonts = FontResolver::with_preferred(&cfg.fonts);

    println!("Generating Beleg-Renamer App Icons...");
    println!("Output directory: {}", out_dir.display());
    println!();

    generate_iconset(&out_dir, &ICON_SPECS, &cfg.label, &cfg.palette, &fonts)
        .with_context(|| format!("generate icons into {}", out_dir.display()))?;

    if cfg.write_contents_json {
        let path = write_manifest(&out_dir, &ICON_SPECS)?;
        println!("Wrote {}", path.display());
    }

    println!();
    println!("All icons generated successfully!");
    Ok(())
}
