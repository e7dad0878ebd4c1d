// ABOUTME: Output layers for the logging subscriber
// ABOUTME: Optional stderr output in one of three formats, and a daily-rotated log file

use anyhow::{Context, Result};
use std::path::Path;
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::fmt::{self, format::FmtSpan};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::{LoggingConfig, StderrFormat};

pub type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

pub fn stderr_layer<S>(format: StderrFormat) -> Option<BoxedLayer<S>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let layer = fmt::layer().with_writer(std::io::stderr).with_target(true);
    match format {
        StderrFormat::Off => None,
        StderrFormat::Compact => Some(layer.compact().boxed()),
        StderrFormat::Pretty => Some(layer.pretty().boxed()),
        StderrFormat::Json => Some(
            layer
                .json()
                .with_file(true)
                .with_line_number(true)
                .boxed(),
        ),
    }
}

/// A file layer writing through a background thread.
///
/// The guard flushes pending records when dropped.
pub fn file_layer<S>(path: &Path) -> Result<(BoxedLayer<S>, WorkerGuard)>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let file_name = path
        .file_name()
        .with_context(|| format!("Log file path has no file name: {}", path.display()))?;
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(directory)
        .with_context(|| format!("Failed to create log directory: {}", directory.display()))?;

    let (writer, guard) = non_blocking(rolling::daily(directory, file_name));
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        // Workflows are instrumented; closing a span records how long a prompt took
        .with_span_events(FmtSpan::CLOSE)
        .boxed();

    Ok((layer, guard))
}

pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    let directives = config.filter_directives();
    EnvFilter::builder()
        .parse(&directives)
        .with_context(|| format!("Invalid filter directives '{directives}'"))
}
