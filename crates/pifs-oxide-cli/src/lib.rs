//! Command-line frontend for the pifs-oxide fractal codec.

pub mod commands;
pub mod compress;
pub mod decompress;
pub mod info;

mod error;
mod output;

pub use commands::{Args, GlobalArgs, Subcommands};
pub use error::{Error, Result};
