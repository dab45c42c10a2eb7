//! Log level selection and subscriber setup.

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

/// Severity threshold for log output.
///
/// Levels are ordered `Debug < Info < Warning < Error`; only events at or
/// above the threshold are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum LogLevel {
    /// Session transitions, adds, commits and resets.
    Debug,
    /// Normal progress messages.
    Info,
    /// Recoverable problems.
    Warning,
    /// Failures.
    Error,
}

impl LogLevel {
    /// Returns the tracing filter directive for this threshold.
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Installs the global fmt subscriber, writing to stderr.
///
/// `RUST_LOG`, when set, takes precedence over `level`.
pub fn init(level: LogLevel) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
