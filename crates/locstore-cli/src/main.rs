//! locstore CLI: resolve object-store locators from a shell
//!
//! ## Usage
//!
//! ```bash
//! locstore resolve OS_Login.xml OS_CP7Main.xml        # Merged key = selector list
//! locstore resolve --set base --format json           # Store set from locstore.yaml
//! locstore check OS_PDMPART.xml --require PartID,UM   # Fail on missing keys
//! locstore translate --method role --value 'button[name="Login"]'
//! ```

use clap::Parser;
use locstore_cli::{
    runner::{init_logging, run_check, run_resolve, run_translate},
    Cli, CliConfig, CliResult, ColorChoice, Commands, Reporter, Verbosity,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = build_config(&cli);
    init_logging(config.verbosity);
    let reporter = Reporter::new(config.color.should_color());

    match cli.command {
        Commands::Resolve(args) => run_resolve(&config, &args, &reporter),
        Commands::Check(args) => run_check(&config, &args, &reporter),
        Commands::Translate(args) => {
            let selector = run_translate(&args)?;
            reporter.emit(&selector)
        }
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let color: ColorChoice = cli.color.clone().into();
    CliConfig::new()
        .with_verbosity(Verbosity::from_flags(cli.quiet, cli.verbose))
        .with_color(color)
        .with_store_config(cli.config.clone())
}
