use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use belegicons::config::read_config;
use belegicons::fonts::FontResolver;
use belegicons::icon::create_icon;
use belegicons::{logger, IconOutcome};

/// Renders a single icon at an arbitrary size, e.g. for previews.
#[derive(Parser, Debug)]
#[command(author, version, about = "Render one Beleg-Renamer icon", long_about = None)]
struct Args {
    #[arg(long, default_value_t = 1024)]
    size: u32,
    #[arg(long, default_value = "icon_1024.png")]
    out: PathBuf,
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init();

    let cfg = read_config(args.config.as_deref()).context("read config")?;
    let fonts = FontResolver::with_preferred(&cfg.fonts);
    let outcome = create_icon(args.size, &args.out, &cfg.label, &cfg.palette, &fonts)
        .with_context(|| format!("write {}", args.out.display()))?;

    match outcome {
        IconOutcome::WithText => println!("Wrote {}", args.out.display()),
        IconOutcome::Fallback => println!("Wrote {} - NO TEXT (fallback)", args.out.display()),
    }
    Ok(())
}
