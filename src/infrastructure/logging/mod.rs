//! Logging infrastructure with optional file output.

use crate::infrastructure::config::paths;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Initialize logging with console and optional file output.
///
/// Console output goes to stderr so command output on stdout stays clean.
/// `RUST_LOG` overrides the console level. Log files are written to:
/// - macOS: ~/Library/Application Support/accountdeck/logs/
/// - Windows: %APPDATA%\accountdeck\logs\
/// - Linux: ~/.config/accountdeck/logs/
pub fn setup(verbose: bool, file_enabled: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Console layer (always enabled)
    let console_layer = fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_filter(filter);

    let file_layer = if file_enabled {
        let log_dir = paths::log_dir();

        if let Err(e) = std::fs::create_dir_all(&log_dir) {
            eprintln!(
                "Warning: Failed to create log directory {:?}: {}",
                log_dir, e
            );
            None
        } else {
            let file_appender =
                RollingFileAppender::new(Rotation::DAILY, &log_dir, "accountdeck.log");

            Some(
                fmt::layer()
                    .with_target(true)
                    .with_ansi(false) // No ANSI colors in file output
                    .with_writer(file_appender)
                    .with_filter(EnvFilter::new("info")),
            )
        }
    } else {
        None
    };

    let registry = tracing_subscriber::registry().with(console_layer);
    let result = match file_layer {
        Some(file_layer) => registry.with(file_layer).try_init(),
        None => registry.try_init(),
    };
    if let Err(e) = result {
        eprintln!("Warning: Failed to initialize logging: {}", e);
        return;
    }

    if file_enabled {
        tracing::info!("File logging enabled: {:?}", paths::log_dir());
    }
    tracing::info!("Logging initialized (verbose={})", verbose);
}
