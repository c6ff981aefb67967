//! Command execution

use locstore::{
    build_selector, LoadReport, LoaderOptions, LocatorStore, SearchRecord, StoreConfig,
    DEFAULT_CONFIG_FILE,
};
use std::path::{Path, PathBuf};

use crate::commands::{CheckArgs, ResolveArgs, StoreSelection, TranslateArgs};
use crate::config::{CliConfig, Verbosity};
use crate::error::{CliError, CliResult};
use crate::output::{
    render_check_json, render_check_text, render_store_json, render_store_text, OutputFormat,
    Reporter,
};

/// Install the stderr `tracing` subscriber. `RUST_LOG` overrides `verbosity`.
pub fn init_logging(verbosity: Verbosity) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_directive()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

/// Read the store configuration.
///
/// An explicit `--config` must exist. Without one, `locstore.yaml` in the
/// working directory is used if present.
pub fn load_store_config(config: &CliConfig) -> CliResult<Option<StoreConfig>> {
    if let Some(path) = &config.store_config {
        return Ok(Some(StoreConfig::from_file(path)?));
    }
    let default = Path::new(DEFAULT_CONFIG_FILE);
    if default.is_file() {
        return Ok(Some(StoreConfig::from_file(default)?));
    }
    Ok(None)
}

/// Files to load for a selection: the set's files first, then FILES
pub fn selection_paths(
    store_config: Option<&StoreConfig>,
    selection: &StoreSelection,
) -> CliResult<Vec<PathBuf>> {
    let mut paths = Vec::new();
    if let Some(set) = &selection.set {
        let store_config = store_config.ok_or_else(|| {
            CliError::config(format!(
                "--set {set} needs a configuration file (--config or ./{DEFAULT_CONFIG_FILE})"
            ))
        })?;
        paths.extend(store_config.set_paths(set)?);
    }
    paths.extend(selection.files.iter().cloned());

    if paths.is_empty() {
        return Err(CliError::invalid_argument(
            "no object stores given (pass FILES or --set)",
        ));
    }
    Ok(paths)
}

/// Load and merge a selection
pub fn load_selection(config: &CliConfig, selection: &StoreSelection) -> CliResult<LoadReport> {
    let store_config = load_store_config(config)?;
    let paths = selection_paths(store_config.as_ref(), selection)?;
    let options = store_config
        .as_ref()
        .map_or_else(LoaderOptions::default, StoreConfig::loader_options);
    Ok(LocatorStore::load_many(paths, &options))
}

/// Reason a `check` should fail, if any
#[must_use]
pub fn check_failure(report: &LoadReport, missing: &[String], strict: bool) -> Option<String> {
    if !missing.is_empty() {
        return Some(format!(
            "Missing required locators from object store: {}",
            missing.join(", ")
        ));
    }
    if strict && !report.diagnostics.is_empty() {
        return Some(format!(
            "{} diagnostic(s) reported in strict mode",
            report.diagnostics.len()
        ));
    }
    None
}

/// `resolve`: print the merged store
pub fn run_resolve(config: &CliConfig, args: &ResolveArgs, reporter: &Reporter) -> CliResult<()> {
    let report = load_selection(config, &args.stores)?;
    let rendered = match OutputFormat::from(args.format) {
        OutputFormat::Text => render_store_text(&report.store),
        OutputFormat::Json => render_store_json(&report.store)?,
    };
    reporter.emit(&rendered)
}

/// `check`: print diagnostics and fail on missing keys (or any diagnostic with `--strict`)
pub fn run_check(config: &CliConfig, args: &CheckArgs, reporter: &Reporter) -> CliResult<()> {
    let report = load_selection(config, &args.stores)?;
    let required: Vec<&str> = args.require.iter().map(String::as_str).collect();
    let missing = report.store.missing(&required);

    let rendered = match OutputFormat::from(args.format) {
        OutputFormat::Text => render_check_text(&report, &missing, reporter.use_color),
        OutputFormat::Json => render_check_json(&report, &missing)?,
    };
    if !(config.verbosity.is_quiet() && missing.is_empty()) {
        reporter.emit(&rendered)?;
    }

    match check_failure(&report, &missing, args.strict) {
        Some(reason) => Err(CliError::check_failed(reason)),
        None => Ok(()),
    }
}

/// `translate`: build one selector
pub fn run_translate(args: &TranslateArgs) -> CliResult<String> {
    Ok(build_selector(&SearchRecord::new(
        args.method.as_str(),
        args.value.as_str(),
    ))?)
}
