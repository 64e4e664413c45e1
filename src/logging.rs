// src/logging.rs

//! Optional subscriber setup for programs that embed `jsonfig`.
//!
//! The repository reports flag parsing and file access through `tracing`
//! events and never installs a subscriber by itself. A host that wants those
//! events on stderr calls [`init_logging`] once, before building a
//! [`Repository`](crate::Repository).
//!
//! The level is the one passed in, else the value of `JSONFIG_LOG`, else
//! `info`.

use anyhow::{Result, anyhow};
use clap::ValueEnum;
use tracing_subscriber::fmt;

/// Environment variable consulted when no explicit level is given.
pub const LOG_ENV_VAR: &str = "JSONFIG_LOG";

/// Log level, usable directly as a `clap` value enum.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Install a stderr `fmt` subscriber as the global default.
///
/// Returns an error when the host already installed one.
pub fn init_logging(level: Option<LogLevel>) -> Result<()> {
    let env = std::env::var(LOG_ENV_VAR).ok();
    let level = resolve_level(level, env.as_deref());

    fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("jsonfig logging: subscriber already set ({e})"))
}

/// Pick the effective level: explicit, then the env value if it names a
/// level, then `info`.
pub fn resolve_level(explicit: Option<LogLevel>, env: Option<&str>) -> tracing::Level {
    explicit
        .map(level_from_log_level)
        .or_else(|| env.and_then(parse_level_str))
        .unwrap_or(tracing::Level::INFO)
}

/// Map the CLI-facing level onto `tracing`'s.
pub fn level_from_log_level(lvl: LogLevel) -> tracing::Level {
    match lvl {
        LogLevel::Error => tracing::Level::ERROR,
        LogLevel::Warn => tracing::Level::WARN,
        LogLevel::Info => tracing::Level::INFO,
        LogLevel::Debug => tracing::Level::DEBUG,
        LogLevel::Trace => tracing::Level::TRACE,
    }
}

/// Read a `JSONFIG_LOG` value. Case-insensitive; `warning` is an alias of
/// `warn`. Unknown names give `None`.
pub fn parse_level_str(s: &str) -> Option<tracing::Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(tracing::Level::ERROR),
        "warn" | "warning" => Some(tracing::Level::WARN),
        "info" => Some(tracing::Level::INFO),
        "debug" => Some(tracing::Level::DEBUG),
        "trace" => Some(tracing::Level::TRACE),
        _ => None,
    }
}
