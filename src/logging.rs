/// Structured logging for the logistics dashboard
///
/// Provides context-rich logging with pipeline stage and subject identifiers
/// (a file path, a region, a filter), timestamps, and severity levels.
/// Supports both console output and file-based logging for long sessions.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::str::FromStr;
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    /// Parses the level names accepted in the `[logging]` config section.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline Stages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSource {
    Loader,
    Cache,
    Filter,
    Aggregator,
    Report,
    System,
}

impl fmt::Display for LogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogSource::Loader => write!(f, "LOAD"),
            LogSource::Cache => write!(f, "CACHE"),
            LogSource::Filter => write!(f, "FILTER"),
            LogSource::Aggregator => write!(f, "AGG"),
            LogSource::Report => write!(f, "REPORT"),
            LogSource::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger Configuration
// ---------------------------------------------------------------------------

/// Global logger instance
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

pub struct Logger {
    /// Minimum log level to display
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<String>,
    /// Whether to include timestamps in console output
    console_timestamps: bool,
}

impl Logger {
    /// Initialize the global logger
    pub fn init(min_level: LogLevel, log_file: Option<String>, console_timestamps: bool) {
        let logger = Logger {
            min_level,
            log_file,
            console_timestamps,
        };

        if let Ok(mut slot) = LOGGER.lock() {
            *slot = Some(logger);
        }
    }

    fn log(&self, level: LogLevel, source: &LogSource, subject: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        let subject_part = subject.map(|s| format!(" [{}]", s)).unwrap_or_default();
        let log_entry = format_entry(&timestamp.to_string(), level, source, subject, message);

        // Logs go to stderr so they never interleave with a rendered dashboard
        // or a JSON export on stdout.
        if self.console_timestamps {
            eprintln!("{}", log_entry);
        } else {
            match level {
                LogLevel::Error => eprintln!("   ✗ {}{}: {}", source, subject_part, message),
                LogLevel::Warning => eprintln!("   ⚠ {}{}: {}", source, subject_part, message),
                LogLevel::Info => eprintln!("   {}", message),
                LogLevel::Debug => {} // Skip debug in non-timestamp mode
            }
        }

        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &log_entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

/// Builds one log line: `<timestamp> <LEVEL> <SOURCE> [subject]: message`.
fn format_entry(
    timestamp: &str,
    level: LogLevel,
    source: &LogSource,
    subject: Option<&str>,
    message: &str,
) -> String {
    let subject_part = subject.map(|s| format!(" [{}]", s)).unwrap_or_default();
    format!("{} {} {}{}: {}", timestamp, level, source, subject_part, message)
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize the global logger
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>, console_timestamps: bool) {
    Logger::init(min_level, log_file.map(String::from), console_timestamps);
}

fn dispatch(level: LogLevel, source: LogSource, subject: Option<&str>, message: &str) {
    if let Ok(guard) = LOGGER.lock() {
        if let Some(logger) = guard.as_ref() {
            logger.log(level, &source, subject, message);
        }
    }
}

/// Log a general informational message
pub fn info(source: LogSource, subject: Option<&str>, message: &str) {
    dispatch(LogLevel::Info, source, subject, message);
}

/// Log a warning message
pub fn warn(source: LogSource, subject: Option<&str>, message: &str) {
    dispatch(LogLevel::Warning, source, subject, message);
}

/// Log an error message
pub fn error(source: LogSource, subject: Option<&str>, message: &str) {
    dispatch(LogLevel::Error, source, subject, message);
}

/// Log a debug message
pub fn debug(source: LogSource, subject: Option<&str>, message: &str) {
    dispatch(LogLevel::Debug, source, subject, message);
}

// ---------------------------------------------------------------------------
// Pipeline Summary Logging
// ---------------------------------------------------------------------------

/// Log the outcome of loading a source file.
///
/// Rows with an undefined DZD/t.km metric are legal but worth a warning:
/// they silently drop out of every chart.
pub fn log_load_summary(path: &str, rows: usize, undefined_metric_rows: usize) {
    let message = format!(
        "Loaded {} rows ({} with undefined cost per t.km)",
        rows, undefined_metric_rows
    );

    if rows == 0 || undefined_metric_rows > 0 {
        warn(LogSource::Loader, Some(path), &message);
    } else {
        info(LogSource::Loader, Some(path), &message);
    }
}

/// Log rows or groups an aggregation had to leave out.
pub fn log_exclusions(view: &str, excluded: usize, reason: &str) {
    if excluded == 0 {
        return;
    }
    let message = format!("{} excluded: {}", excluded, reason);
    debug(LogSource::Aggregator, Some(view), &message);
}

/// Log a condition that stops the session.
pub fn log_fatal(source: LogSource, subject: Option<&str>, err: &dyn std::error::Error) {
    error(source, subject, &format!("fatal: {}", err));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warning);
        assert!(LogLevel::Warning < LogLevel::Error);
    }

    #[test]
    fn test_log_level_parses_config_names() {
        assert_eq!("debug".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert_eq!(" INFO ".parse::<LogLevel>(), Ok(LogLevel::Info));
        assert_eq!("warn".parse::<LogLevel>(), Ok(LogLevel::Warning));
        assert_eq!("warning".parse::<LogLevel>(), Ok(LogLevel::Warning));
        assert_eq!("error".parse::<LogLevel>(), Ok(LogLevel::Error));
        assert!("verbose".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_entry_format_includes_subject_when_present() {
        let line = format_entry(
            "2025-03-01 10:00:00 UTC",
            LogLevel::Warning,
            &LogSource::Aggregator,
            Some("map"),
            "2 excluded",
        );
        assert_eq!(line, "2025-03-01 10:00:00 UTC WARN AGG [map]: 2 excluded");

        let line = format_entry("t", LogLevel::Info, &LogSource::System, None, "ready");
        assert_eq!(line, "t INFO SYS: ready");
    }

    #[test]
    fn test_logging_without_init_is_a_no_op() {
        // Library callers that never configure logging must not panic.
        info(LogSource::System, None, "no logger installed");
        log_exclusions("bars", 3, "undefined cost per t.km");
    }
}
