//! CLI command definitions using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// locstore: resolve object-store locators into browser selectors
#[derive(Parser, Debug)]
#[command(name = "locstore")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Object-store configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load object stores and print the resolved selectors
    Resolve(ResolveArgs),

    /// Report skipped controls and verify required keys
    Check(CheckArgs),

    /// Translate a single method/value pair
    Translate(TranslateArgs),
}

/// Which object stores to load
#[derive(Args, Debug, Clone, Default)]
pub struct StoreSelection {
    /// Object-store files, merged in order (later files win)
    pub files: Vec<PathBuf>,

    /// Named store set from the configuration, loaded before FILES
    #[arg(short, long)]
    pub set: Option<String>,
}

/// Arguments for the resolve command
#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// Stores to load
    #[command(flatten)]
    pub stores: StoreSelection,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: FormatArg,
}

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Stores to load
    #[command(flatten)]
    pub stores: StoreSelection,

    /// Keys that must resolve (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub require: Vec<String>,

    /// Fail on any diagnostic, not only on missing required keys
    #[arg(long)]
    pub strict: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: FormatArg,
}

/// Arguments for the translate command
#[derive(Parser, Debug)]
pub struct TranslateArgs {
    /// Recorded method (id, class, xpath, css, name, tag, text, link, button, role)
    #[arg(short, long)]
    pub method: String,

    /// Recorded value
    #[arg(long)]
    pub value: String,
}

/// Output format argument
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormatArg {
    /// `key = selector` lines
    #[default]
    Text,
    /// JSON object
    Json,
}

impl From<FormatArg> for crate::output::OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => Self::Text,
            FormatArg::Json => Self::Json,
        }
    }
}

/// Color argument
#[derive(ValueEnum, Debug, Clone, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
