//! `saf-read-cases`: emit new sysdiagnose cases to stdout as JSON lines.
//!
//! Run by the indexer as a scripted input; everything except the case records
//! goes to the add-on log file.

use anyhow::{Context, Result};
use clap::Parser;
use saf_cases::{run_pass, IngestOptions};
use saf_config::paths::{READ_CASES_LOG_FILE_NAME, SETTINGS_FILE_NAME};
use saf_config::{load_configuration, splunk_log_path, AddonPaths, Settings};
use saf_logging::{build_log_sink, init_logging, parse_level, LogConfig};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "saf-read-cases", about = "Emit new sysdiagnose cases as JSON lines")]
struct Cli {
    /// Add-on installation root (defaults to the parent of the binary's directory)
    #[arg(long, env = "SAF_APP_ROOT")]
    app_root: Option<PathBuf>,

    /// Settings file looked up in local/ then default/
    #[arg(long, default_value = SETTINGS_FILE_NAME)]
    config_name: String,

    /// Override the [cases] folder setting
    #[arg(long)]
    cases_folder: Option<PathBuf>,

    /// Override the dedup state location
    #[arg(long)]
    state_file: Option<PathBuf>,

    /// Mirror log records to stderr
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let paths = match cli.app_root {
        Some(root) => AddonPaths::new(root),
        None => AddonPaths::from_current_exe()?,
    };

    let config = load_configuration(&paths, &cli.config_name)?;
    let settings = Settings::from_configuration(&config)?;

    let level = parse_level(&settings.logging.level)
        .with_context(|| format!("Invalid [logging] level in {}", config.source().display()))?;
    let sink = build_log_sink(
        &splunk_log_path(READ_CASES_LOG_FILE_NAME),
        settings.logging.max_size_bytes(),
        settings.logging.max_backup_files,
    )?;
    init_logging(LogConfig {
        sink,
        level,
        verbose: cli.verbose,
    })?;

    info!(config = %config.source().display(), "Loaded configuration");
    debug!(?settings, "Resolved settings");

    let options = IngestOptions {
        cases_root: cli
            .cases_folder
            .unwrap_or_else(|| PathBuf::from(&settings.cases.folder)),
        state_path: cli.state_file.unwrap_or_else(|| paths.state_path()),
    };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    run_pass(&options, &mut out);
    out.flush().context("Failed to flush output")?;

    Ok(())
}
