// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::types::Spec;

/// Command-line arguments for `specwatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "specwatch",
    version,
    about = "Re-run test specs on long-lived worker sessions when files change.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Specwatch.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Specwatch.toml")]
    pub config: String,

    /// Restrict the session to these specs.
    ///
    /// May be given several times. A comma-separated value is treated as a
    /// spec group whose files always run together in one session.
    #[arg(long, value_name = "PATH[,PATH...]")]
    pub spec: Vec<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SPECWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print workers and watch targets, but don't run
    /// anything.
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    /// The `--spec` values as typed specs, or `None` when the flag was not
    /// given.
    pub fn spec_restriction(&self) -> Option<Vec<Spec>> {
        if self.spec.is_empty() {
            return None;
        }
        Some(self.spec.iter().map(|raw| parse_spec_arg(raw)).collect())
    }
}

/// Parse one `--spec` value: `a.js` is a single file, `a.js,b.js` a group.
pub fn parse_spec_arg(raw: &str) -> Spec {
    let parts: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    match parts.as_slice() {
        [single] => Spec::File(PathBuf::from(*single)),
        many => Spec::Group(many.iter().map(PathBuf::from).collect()),
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
