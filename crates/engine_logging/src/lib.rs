#![deny(missing_docs)]
//! Logging for the duadeck crates.
//!
//! The `engine_*` macros forward to the `log` facade through this crate, so
//! callers only depend on `engine_logging`. [`initialize`] installs the
//! application logger and [`initialize_for_tests`] a terminal logger for tests.

use std::fs::File;
use std::path::PathBuf;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

#[doc(hidden)]
pub use log as __log;

/// Logs at trace level.
#[macro_export]
macro_rules! engine_trace {
    ($($arg:tt)*) => {
        $crate::__log::trace!($($arg)*)
    };
}

/// Logs at debug level.
#[macro_export]
macro_rules! engine_debug {
    ($($arg:tt)*) => {
        $crate::__log::debug!($($arg)*)
    };
}

/// Logs at info level.
#[macro_export]
macro_rules! engine_info {
    ($($arg:tt)*) => {
        $crate::__log::info!($($arg)*)
    };
}

/// Logs at warn level.
#[macro_export]
macro_rules! engine_warn {
    ($($arg:tt)*) => {
        $crate::__log::warn!($($arg)*)
    };
}

/// Logs at error level.
#[macro_export]
macro_rules! engine_error {
    ($($arg:tt)*) => {
        $crate::__log::error!($($arg)*)
    };
}

/// Where log records go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogDestination {
    /// The log file only.
    #[default]
    File,
    /// Stdout and stderr only.
    Terminal,
    /// Both the log file and the terminal.
    Both,
}

/// Application logger setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// Where records are written.
    pub destination: LogDestination,
    /// Most verbose level that is kept.
    pub level: LevelFilter,
    /// Log file, truncated on every start.
    pub file: PathBuf,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            destination: LogDestination::File,
            level: LevelFilter::Info,
            file: PathBuf::from("./duadeck.log"),
        }
    }
}

/// Install the application logger. Does nothing if a logger is already set.
///
/// A log file that cannot be created is reported on stderr and skipped; the
/// terminal logger of [`LogDestination::Both`] is still installed.
pub fn initialize(settings: &LogSettings) {
    let loggers = build_loggers(settings);
    if loggers.is_empty() {
        return;
    }
    let _ = CombinedLogger::init(loggers);
}

fn build_loggers(settings: &LogSettings) -> Vec<Box<dyn SharedLogger>> {
    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    if matches!(
        settings.destination,
        LogDestination::Terminal | LogDestination::Both
    ) {
        loggers.push(terminal_logger(settings.level, config.clone()));
    }
    if matches!(
        settings.destination,
        LogDestination::File | LogDestination::Both
    ) {
        match File::create(&settings.file) {
            Ok(file) => loggers.push(WriteLogger::new(settings.level, config, file)),
            Err(err) => eprintln!(
                "Warning: could not create log file {}: {}",
                settings.file.display(),
                err
            ),
        }
    }
    loggers
}

fn terminal_logger(level: LevelFilter, config: Config) -> Box<TermLogger> {
    TermLogger::new(level, config, TerminalMode::Mixed, ColorChoice::Auto)
}

/// Installs a terminal logger for tests; later calls are ignored.
pub fn initialize_for_tests() {
    let level = if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let _ = CombinedLogger::init(vec![terminal_logger(level, Config::default())]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_log_to_file() {
        let settings = LogSettings::default();
        assert_eq!(settings.destination, LogDestination::File);
        assert_eq!(settings.level, LevelFilter::Info);
        assert_eq!(settings.file, PathBuf::from("./duadeck.log"));
    }

    #[test]
    fn terminal_only_needs_no_file() {
        let settings = LogSettings {
            destination: LogDestination::Terminal,
            file: PathBuf::from("/nonexistent-dir/duadeck.log"),
            ..LogSettings::default()
        };
        assert_eq!(build_loggers(&settings).len(), 1);
    }

    #[test]
    fn unwritable_file_is_skipped() {
        let settings = LogSettings {
            destination: LogDestination::Both,
            file: PathBuf::from("/nonexistent-dir/duadeck.log"),
            ..LogSettings::default()
        };
        assert_eq!(build_loggers(&settings).len(), 1);
    }
}
