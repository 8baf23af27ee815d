use log::{error, info, LevelFilter};
use std::path::Path;

// For file-based logging with rotation
use log4rs::append::rolling_file::policy::compound::roll::fixed_window::FixedWindowRoller;
use log4rs::append::rolling_file::policy::compound::trigger::size::SizeTrigger;
use log4rs::append::rolling_file::policy::compound::CompoundPolicy;
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

use crate::config::LogLevel;

/// Environment variable overriding the configured level
pub const LOG_ENV_VAR: &str = "ALBUMDO_LOG";

/// Initialize the logger with timestamp, log level, and module path.
/// Logs go to `<log_dir>/albumdo.log`, rotated at 10MB.
pub fn init_logger(log_dir: &Path, level: LogLevel) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(log_dir)?;

    let log_file_path = log_dir.join("albumdo.log");
    let archived_logs_pattern = format!("{}/albumdo.{{}}.log", log_dir.display());

    let file_trigger = SizeTrigger::new(10 * 1024 * 1024);

    // Keep 5 archived log files
    let file_roller = FixedWindowRoller::builder()
        .build(&archived_logs_pattern, 5)
        .map_err(|e| format!("Failed to create log roller: {}", e))?;

    let compound_policy = CompoundPolicy::new(Box::new(file_trigger), Box::new(file_roller));

    let rolling_file = RollingFileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] [{M}:{L}] - {m}{n}",
        )))
        .build(&log_file_path, Box::new(compound_policy))
        .map_err(|e| format!("Failed to create log appender: {}", e))?;

    let config = Config::builder()
        .appender(Appender::builder().build("file", Box::new(rolling_file)))
        .build(
            Root::builder()
                .appender("file")
                .build(resolve_level(level, std::env::var(LOG_ENV_VAR).ok().as_deref())),
        )
        .map_err(|e| format!("Failed to build log config: {}", e))?;

    log4rs::init_config(config).map_err(|e| format!("Failed to initialize log4rs: {}", e))?;

    info!("AlBumdo started");
    info!("Logging to file: {}", log_file_path.display());
    Ok(())
}

/// Level from the environment override when it parses, else the configured one.
/// The override can raise verbosity as well as lower it.
pub fn resolve_level(configured: LogLevel, env: Option<&str>) -> LevelFilter {
    env.and_then(|value| value.trim().parse::<LevelFilter>().ok())
        .unwrap_or_else(|| configured.to_level_filter())
}

/// Log file operation that failed
pub fn log_file_error(path: &Path, operation: &str, error: &dyn std::error::Error) {
    error!(
        "File operation failed - Operation: {}, Path: {}, Error: {}",
        operation,
        path.display(),
        error
    );
}

/// Log file system modification
pub fn log_fs_modification(operation: &str, path: &Path, details: Option<&str>) {
    let details_str = details.unwrap_or("");
    info!(
        "FS CHANGE - Operation: {}, Path: {}{}",
        operation,
        path.display(),
        if details_str.is_empty() {
            "".to_string()
        } else {
            format!(", Details: {}", details_str)
        }
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_override_raises_level() {
        assert_eq!(resolve_level(LogLevel::Warn, Some("trace")), LevelFilter::Trace);
        assert_eq!(resolve_level(LogLevel::Info, Some("DEBUG")), LevelFilter::Debug);
    }

    #[test]
    fn test_env_override_lowers_level() {
        assert_eq!(resolve_level(LogLevel::Debug, Some("error")), LevelFilter::Error);
        assert_eq!(resolve_level(LogLevel::Info, Some("off")), LevelFilter::Off);
    }

    #[test]
    fn test_missing_or_invalid_override_keeps_configured() {
        assert_eq!(resolve_level(LogLevel::Info, None), LevelFilter::Info);
        assert_eq!(resolve_level(LogLevel::Warn, Some("loud")), LevelFilter::Warn);
    }
}
