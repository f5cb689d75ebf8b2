//! Visum - visual metadata extraction for image catalogs.

mod cli;
mod config;
mod core;
mod logger;
mod meta;
mod svg;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::VisumConfig;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    logger::set_verbose(cli.verbose);

    let config = VisumConfig::load(cli.config.as_deref())?;

    match &cli.command {
        Commands::Extract { args } => cli::extract::run_extract(args, &config),
        Commands::Palette { args } => cli::palette::run_palette(args, &config),
    }
}
