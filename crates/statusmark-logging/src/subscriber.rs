// ABOUTME: Global subscriber installation from a LoggingConfig
// ABOUTME: Composes the filter with whichever output layers the config enables

use anyhow::{Context, Result};
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::registry::LookupSpan;

use crate::config::LoggingConfig;
use crate::layers::{BoxedLayer, env_filter, file_layer, stderr_layer};

/// Keeps the background file writer alive; dropping it flushes pending records.
#[must_use = "dropping the guard stops file logging"]
#[derive(Default)]
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

fn output_layers<S>(config: &LoggingConfig) -> Result<(Vec<BoxedLayer<S>>, LoggingGuard)>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let mut layers: Vec<BoxedLayer<S>> = stderr_layer(config.stderr).into_iter().collect();
    let mut guard = LoggingGuard::default();

    if let Some(path) = &config.file {
        let (layer, file_guard) = file_layer(path)?;
        layers.push(layer);
        guard._file_guard = Some(file_guard);
    }

    Ok((layers, guard))
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<LoggingGuard> {
    use tracing_subscriber::prelude::*;

    let (layers, guard) = output_layers(config)?;
    tracing_subscriber::registry()
        .with(env_filter(config)?)
        .with(layers)
        .try_init()
        .context("Global tracing subscriber already installed")?;

    tracing::debug!(
        filter = %config.filter_directives(),
        stderr = ?config.stderr,
        file = ?config.file,
        "Logging initialized"
    );
    Ok(guard)
}
