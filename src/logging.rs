//! Logging setup via `fern`.
//!
//! Level comes from `LOGGING_LEVEL` (defaults to `INFO`). Output goes to
//! stderr so the debug subcommands can still pipe JSON from stdout.

use fern::Dispatch;
use std::env;

/// Initialize the global logger. Call once, before anything logs.
pub fn setup_logging() -> Result<(), fern::InitError> {
    let verbosity = env::var("LOGGING_LEVEL").unwrap_or_else(|_| "INFO".to_string());

    let level = match verbosity.as_str() {
        "OFF" => log::LevelFilter::Off,
        "ERROR" => log::LevelFilter::Error,
        "WARN" => log::LevelFilter::Warn,
        "DEBUG" => log::LevelFilter::Debug,
        "TRACE" => log::LevelFilter::Trace,
        _ => log::LevelFilter::Info,
    };

    Dispatch::new()
        .level(level)
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .chain(std::io::stderr())
        .apply()?;

    Ok(())
}
