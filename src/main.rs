use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;

use candle_sync::utils::time_utils::local_now_for_log;
use candle_sync::{Cli, run};

/// stderr always, plus `logfile` when given. Level comes from RUST_LOG (default info).
fn init_logging(logfile: Option<&Path>) -> Result<()> {
    let level = std::env::var("RUST_LOG")
        .ok()
        .and_then(|value| value.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Info);

    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} - {} - {}",
                local_now_for_log(),
                record.level(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr());

    if let Some(path) = logfile {
        let file = fern::log_file(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        dispatch = dispatch.chain(file);
    }

    dispatch.apply().context("Logger already initialised")?;
    Ok(())
}

fn main() -> ExitCode {
    // A. Parse Args
    let args = Cli::parse();

    // B. Init Logging
    if let Err(e) = init_logging(args.logfile.as_deref()) {
        eprintln!("{:#}", e);
        return ExitCode::FAILURE;
    }
    #[cfg(debug_assertions)]
    log::debug!("Parsed arguments: {:?}", args);

    // C. Single-threaded runtime: one blocking fetch, then file I/O
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            log::error!("Failed to create Tokio runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run(&args)) {
        Ok(report) => {
            log::info!(
                "Data fetching successful! ({} new rows in {})",
                report.rows_added,
                report.series
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
