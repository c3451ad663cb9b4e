use crate::config::LoggingConfig;
use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes the logging system with console output and an optional JSON log file.
///
/// The returned guard flushes the file writer on drop, so `main` has to hold it.
pub fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let (file_layer, guard) = if config.json_file {
        // Ensure logs directory exists
        let _ = fs::create_dir_all(&config.dir);

        // Create a non-blocking file appender for daily log rotation
        let file_appender = tracing_appender::rolling::daily(&config.dir, &config.file_name);
        let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);

        (
            Some(fmt::layer().json().with_writer(non_blocking_writer)),
            Some(guard),
        )
    } else {
        (None, None)
    };

    let console_layer = fmt::layer().with_target(true).with_writer(std::io::stdout);

    // Respect RUST_LOG if set; otherwise info for our crate and everything else
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("wine_graph=info,info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    guard
}

/// Console-only logging for short-lived commands.
pub fn init_console_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
