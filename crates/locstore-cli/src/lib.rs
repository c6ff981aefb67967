//! locstore CLI library
//!
//! Command-line front end for resolving and checking object stores.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // Error types are self-documenting

mod commands;
mod config;
mod error;
mod output;
pub mod runner;

pub use commands::{
    CheckArgs, Cli, ColorArg, Commands, FormatArg, ResolveArgs, StoreSelection, TranslateArgs,
};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{
    render_check_json, render_check_text, render_store_json, render_store_text, OutputFormat,
    Reporter,
};
