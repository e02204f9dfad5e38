use env_logger::{Builder, Target, WriteStyle};
use log::{error, info, LevelFilter};

/// Initialize the logging system with console output on stderr
///
/// `RUST_LOG` overrides `level` when set.
pub fn initialize_logging(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    Builder::new()
        // Set default log level
        .filter_level(level)
        .parse_default_env()
        // Enable timestamps
        .format_timestamp_secs()
        // Enable module path in logs
        .format_module_path(true)
        .write_style(WriteStyle::Auto)
        .target(Target::Stderr)
        .try_init()?;

    info!("Logging system initialized at level {}", level);
    Ok(())
}

/// Parse a level name such as `warn` or `debug`; unknown names fall back to `Warn`
pub fn parse_level(name: &str) -> LevelFilter {
    name.parse().unwrap_or(LevelFilter::Warn)
}

/// Helper function to format sensitive data for logging
pub fn format_sensitive(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}***{}", head, tail)
}

/// Structured log line for a provider operation
pub fn log_cipher_operation(operation: &str, field: &str, success: bool, details: Option<&str>) {
    let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    if success {
        info!(
            "Cipher operation: op={}, field={}, success=true, timestamp={}, details={:?}",
            operation, field, timestamp, details
        );
    } else {
        error!(
            "Cipher operation: op={}, field={}, success=false, timestamp={}, details={:?}",
            operation, field, timestamp, details
        );
    }
}
