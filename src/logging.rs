use crate::config::LoggingConfig;
use anyhow::{Context, Result};
use std::path::Path;
use std::str::FromStr;
use std::sync::Mutex;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Initialize logging system based on configuration
///
/// Fails if a global subscriber is already installed. Keep the returned guard
/// alive for as long as rotated file output should be flushed.
pub fn init_logging(
    config: &LoggingConfig,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| config.level.clone());

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::from_str(&log_level).unwrap_or_else(|_| EnvFilter::new("info"))
    });

    let mut guard: Option<tracing_appender::non_blocking::WorkerGuard> = None;
    let mut layers: Vec<BoxedLayer> = Vec::new();

    if let Some(log_file) = &config.file {
        if config.rotation {
            let path = Path::new(log_file);
            let file_appender = tracing_appender::rolling::daily(
                path.parent().unwrap_or_else(|| Path::new(".")),
                path.file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("jitter-backoff.log"),
            );
            let (non_blocking, file_guard) = tracing_appender::non_blocking(file_appender);
            guard = Some(file_guard);
            layers.push(fmt_layer(non_blocking, config.json, env_filter.clone()));
        } else {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_file)
                .with_context(|| format!("Failed to open log file: {}", log_file))?;
            layers.push(fmt_layer(Mutex::new(file), config.json, env_filter.clone()));
        }
    }

    // Console stays plain text even when the file is JSON
    let console_json = config.json && config.file.is_none();
    layers.push(fmt_layer(std::io::stderr, console_json, env_filter));

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .context("Failed to install global tracing subscriber")?;

    Ok(guard)
}

fn fmt_layer<W>(writer: W, json: bool, filter: EnvFilter) -> BoxedLayer
where
    W: for<'w> tracing_subscriber::fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_timer(ChronoUtc::rfc_3339());

    if json {
        layer.json().with_filter(filter).boxed()
    } else {
        layer.with_filter(filter).boxed()
    }
}
