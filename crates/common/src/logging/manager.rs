//! Logging initialization.

use tracing::*;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::{fmt::layer, layer::SubscriberExt, util::SubscriberInitExt, Layer};

use super::types::LoggerConfig;

/// Initializes the logging subsystem with the provided config.
pub fn init(config: LoggerConfig) {
    // Default filter suppresses verbose HTTP client internals below WARN.
    // It still allows further override via RUST_LOG.
    let filt = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy()
        .add_directive("hyper_util=warn".parse().expect("static directive"));

    // Configure stdout logging with JSON or compact format
    let stdout_sub = if config.stdout_config.json_format {
        layer()
            .json()
            .with_span_events(config.stdout_config.fmt_span)
            .with_filter(filt.clone())
            .boxed()
    } else {
        layer()
            .compact()
            .with_span_events(config.stdout_config.fmt_span)
            .with_filter(filt.clone())
            .boxed()
    };

    // Build optional file logging layer
    let file_layer = config.file_logging_config.as_ref().map(|file_config| {
        let file_appender = RollingFileAppender::new(
            file_config.rotation.clone(),
            &file_config.directory,
            &file_config.file_name_prefix,
        );

        if file_config.json_format {
            layer()
                .json()
                .with_writer(file_appender)
                .with_ansi(false) // No color codes in files
                .with_filter(filt.clone())
                .boxed()
        } else {
            layer()
                .compact()
                .with_writer(file_appender)
                .with_ansi(false) // No color codes in files
                .with_filter(filt.clone())
                .boxed()
        }
    });

    // Register all layers - with() accepts Option<Layer> so this scales cleanly
    tracing_subscriber::registry()
        .with(stdout_sub)
        .with(file_layer)
        .init();

    info!(service_name = %config.service_name, "logging initialized");
}
