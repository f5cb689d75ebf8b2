//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Visum visual metadata extractor CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: visum.toml in the working directory)
    #[arg(short = 'C', long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Extract metadata records from image files
    #[command(visible_alias = "e")]
    Extract {
        #[command(flatten)]
        args: ExtractArgs,
    },

    /// Print the ranked color palette of one image
    #[command(visible_alias = "p")]
    Palette {
        #[command(flatten)]
        args: PaletteArgs,
    },
}

/// Extract command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ExtractArgs {
    /// Files or directories to process (directories are walked
    /// recursively). Use `-` to read paths from stdin (one per line).
    #[arg(value_name = "PATH", value_hint = clap::ValueHint::AnyPath)]
    pub paths: Vec<PathBuf>,

    /// Number of palette colors per image
    #[arg(short = 'k', long = "colors", value_name = "N")]
    pub colors: Option<usize>,

    /// Force a MIME type instead of sniffing file contents
    #[arg(short, long)]
    pub mimetype: Option<String>,

    /// Pretty-print JSON output
    #[arg(short, long)]
    pub pretty: bool,

    /// Write output to file instead of stdout
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

/// Palette command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct PaletteArgs {
    /// Image file to analyze
    #[arg(value_name = "PATH", value_hint = clap::ValueHint::FilePath)]
    pub path: PathBuf,

    /// Number of palette colors
    #[arg(short = 'k', long = "colors", value_name = "N")]
    pub colors: Option<usize>,
}
