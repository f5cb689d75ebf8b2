//! Palette command implementation.
//!
//! Prints the ranked palette of a single image, one hex color per line
//! with a truecolor swatch when the terminal supports it.

use std::fs;

use anyhow::{Context, Result};
use owo_colors::{OwoColorize, Stream};

use crate::cli::PaletteArgs;
use crate::config::VisumConfig;
use crate::log;
use crate::meta;

/// Execute palette command
pub fn run_palette(args: &PaletteArgs, config: &VisumConfig) -> Result<()> {
    let bytes =
        fs::read(&args.path).with_context(|| format!("failed to read {}", args.path.display()))?;

    let mut options = config.extract.to_options();
    if let Some(k) = args.colors {
        options.palette_size = k;
    }

    let colors = meta::extract_palette(&bytes, None, &options)?;
    if colors.is_empty() {
        log!("palette"; "no visible pixels in {}", args.path.display());
        return Ok(());
    }

    for color in &colors {
        let [r, g, b] = color.0;
        println!(
            "{} {}",
            "██".if_supports_color(Stream::Stdout, |s| s.truecolor(r, g, b)),
            color.to_hex()
        );
    }

    Ok(())
}
