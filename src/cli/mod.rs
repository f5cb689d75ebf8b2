//! Command-line interface module.

mod args;
pub mod extract;
pub mod palette;

pub use args::{Cli, Commands, ExtractArgs, PaletteArgs};
