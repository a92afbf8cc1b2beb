use crate::error::FindbackError;
use std::path::Path;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Log file name inside the log directory
pub const LOG_FILE_NAME: &str = "findback.log";

/// Dependencies that are too chatty at debug level
const QUIET_TARGETS: &[&str] = &["hyper=warn", "reqwest=warn", "actix_server=info"];

/// Initialize logging to both console and `log_dir/findback.log`
///
/// `RUST_LOG` takes precedence over `log_level` when set.
pub fn setup_logging(log_dir: &Path, log_level: &str) -> Result<(), FindbackError> {
    if !log_dir.exists() {
        std::fs::create_dir_all(log_dir).map_err(|e| {
            FindbackError::config(format!(
                "Failed to create log directory {}: {}",
                log_dir.display(),
                e
            ))
        })?;
    }

    let log_file_path = log_dir.join(LOG_FILE_NAME);
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file_path)
        .map_err(|e| {
            FindbackError::config(format!(
                "Failed to open log file {}: {}",
                log_file_path.display(),
                e
            ))
        })?;

    let env_filter = build_env_filter(log_level);

    let console_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_filter(env_filter.clone());

    let file_layer = fmt::layer()
        .with_writer(log_file)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_span_events(FmtSpan::CLOSE)
        .with_filter(env_filter);

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| FindbackError::config(format!("Failed to install subscriber: {}", e)))?;

    tracing::info!(
        "Logging initialized: level={}, log_file={}",
        log_level,
        log_file_path.display()
    );

    Ok(())
}

/// Console-only logging for development and tests
pub fn setup_console_logging(log_level: &str) -> Result<(), FindbackError> {
    tracing_subscriber::fmt()
        .with_target(true)
        .with_line_number(true)
        .with_env_filter(build_env_filter(log_level))
        .try_init()
        .map_err(|e| FindbackError::config(format!("Failed to install subscriber: {}", e)))?;

    tracing::info!("Console logging initialized: level={}", log_level);

    Ok(())
}

/// Build the filter from `RUST_LOG`, falling back to `log_level` plus quiet dependency targets
pub fn build_env_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = parse_log_level(log_level).to_string().to_lowercase();
        let mut directives = vec![level];
        directives.extend(QUIET_TARGETS.iter().map(|d| d.to_string()));
        EnvFilter::new(directives.join(","))
    })
}

/// Parse string to tracing Level
pub fn parse_log_level(level: &str) -> Level {
    match level.trim().to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to INFO", level);
            Level::INFO
        }
    }
}
