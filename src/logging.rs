// src/logging.rs

//! Logging setup for `specwatch` using `tracing` + `tracing-subscriber`.
//!
//! The filter is picked in this order:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `SPECWATCH_LOG`, which takes full `EnvFilter` directives, so both
//!    `debug` and `specwatch::engine=trace,info` work
//! 3. `info`
//!
//! Worker output and progress lines own stdout; logs go to stderr.

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

/// Environment variable read when no `--log-level` is given.
pub const LOG_ENV: &str = "SPECWATCH_LOG";

const DEFAULT_DIRECTIVES: &str = "info";

/// Initialise global logging subscriber.
///
/// Safe to call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env_value = std::env::var(LOG_ENV).ok();
    let directives = filter_directives(cli_level, env_value.as_deref());

    let filter = EnvFilter::try_new(&directives).unwrap_or_else(|err| {
        eprintln!("ignoring {LOG_ENV}={directives:?}: {err}");
        EnvFilter::new(DEFAULT_DIRECTIVES)
    });

    // stderr only; stdout is reserved for workers and the reporter.
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!("installing log subscriber: {err}"))?;

    Ok(())
}

/// Filter directives for the given CLI level and `SPECWATCH_LOG` value.
///
/// A blank environment value counts as unset.
pub fn filter_directives(cli_level: Option<LogLevel>, env_value: Option<&str>) -> String {
    if let Some(lvl) = cli_level {
        return level_directive(lvl).to_string();
    }

    match env_value.map(str::trim) {
        Some(raw) if !raw.is_empty() => raw.to_string(),
        _ => DEFAULT_DIRECTIVES.to_string(),
    }
}

fn level_directive(lvl: LogLevel) -> &'static str {
    match lvl {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}
