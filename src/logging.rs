use std::io::Write;

use chrono::Local;
use env_logger::{Builder, Env};
use log::LevelFilter;
use yansi::Paint;

use crate::error::{AuditError, Result};

/// Initializes logging on stderr at `log_level`, unless `RUST_LOG` says otherwise
///
/// Valid log levels are: error, warn, info, debug, trace. Stdout is left
/// untouched so the JSON report can be piped.
pub fn init(log_level: &str) -> Result<()> {
    let env = Env::default().write_style_or("RUST_LOG_STYLE", "auto");

    let mut builder = Builder::new();
    builder
        .filter_level(parse_log_level(log_level))
        .format(|buf, record| writeln!(buf, "{}", format_log(record)));
    // RUST_LOG, when present, refines the level chosen on the command line
    builder.parse_env(env);

    builder
        .try_init()
        .map_err(|e| AuditError::config(format!("Failed to initialize logging: {}", e)))
}

/// Formats a log record as `[timestamp] LEVEL [target] message`
pub fn format_log(record: &log::Record) -> String {
    let level = match record.level() {
        log::Level::Error => Paint::red("ERROR").bold(),
        log::Level::Warn => Paint::yellow("WARN ").bold(),
        log::Level::Info => Paint::cyan("INFO ").bold(),
        log::Level::Debug => Paint::blue("DEBUG").bold(),
        log::Level::Trace => Paint::new("TRACE"),
    };

    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
    let target = if record.target().is_empty() {
        record.module_path().unwrap_or("unknown")
    } else {
        record.target()
    };

    format!("[{}] {} [{}] {}", timestamp, level, target, record.args())
}

/// Parses a log level string into a LevelFilter
///
/// Returns the corresponding LevelFilter, defaulting to Info for invalid strings
pub fn parse_log_level(level: &str) -> LevelFilter {
    match level.trim().to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("off"), LevelFilter::Off);
        assert_eq!(parse_log_level("error"), LevelFilter::Error);
        assert_eq!(parse_log_level("WARN"), LevelFilter::Warn);
        assert_eq!(parse_log_level(" debug "), LevelFilter::Debug);
        assert_eq!(parse_log_level("trace"), LevelFilter::Trace);
        assert_eq!(parse_log_level("invalid"), LevelFilter::Info);
    }

    #[test]
    fn test_format_log_contains_target_and_message() {
        let record = log::Record::builder()
            .args(format_args!("Skipping big.py"))
            .level(log::Level::Warn)
            .target("predicate_audit::source")
            .build();

        let line = format_log(&record);
        assert!(line.contains("[predicate_audit::source]"));
        assert!(line.ends_with("Skipping big.py"));
    }
}
