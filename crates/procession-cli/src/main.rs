//! Procession CLI entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use procession::ProcessionError;
use procession_cli::{Args, error_adapter::to_reportable};

fn main() {
    // Install miette's panic hook before anything can panic
    miette::set_panic_hook();

    let args = Args::parse();
    init_logging(&args.log_level);
    debug!(args:?; "Parsed arguments");

    if let Err(err) = procession_cli::run(&args) {
        error!("{}", render(&err));
        process::exit(1);
    }

    info!(input = args.input.as_str(); "Completed successfully");
}

/// Installs `env_logger`, falling back to `warn` for an unknown level name.
fn init_logging(level: &str) {
    let log_level = LevelFilter::from_str(level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {level}. Using 'warn' instead.");
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "Starting Procession");
}

/// Renders `err` as a miette report, with a source snippet for input errors.
fn render(err: &ProcessionError) -> String {
    let reportable = to_reportable(err);
    let mut report = String::new();
    match miette::GraphicalReportHandler::new().render_report(&mut report, &reportable) {
        Ok(()) => report,
        // Plain message if the report itself cannot be rendered
        Err(_) => err.to_string(),
    }
}
