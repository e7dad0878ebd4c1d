// ABOUTME: Structured logging for StatusMark built on tracing
// ABOUTME: Re-exports the tracing macros so other crates depend on this crate alone

pub mod config;
pub mod layers;
pub mod subscriber;


pub use tracing::{Level, Span, debug, error, info, instrument, span, trace, warn};

pub use config::{LogLevel, LoggingConfig, StderrFormat, parse_log_level};
pub use subscriber::{LoggingGuard, init_logging};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::tempdir;
    use tracing_subscriber::{fmt, prelude::*};

    #[test]
    fn test_structured_fields_reach_file() {
        let temp_dir = tempdir().unwrap();
        let log_path = temp_dir.path().join("statusmark.log");
        let writer = Arc::new(std::fs::File::create(&log_path).unwrap());

        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(writer),
        );
        tracing::subscriber::with_default(subscriber, || {
            info!(command = "statusmark.configure", "Executing command");
            warn!(step = "name", "Workflow step cancelled");
        });

        let contents = std::fs::read_to_string(&log_path).unwrap();
        assert!(contents.contains("Executing command"), "{contents}");
        assert!(contents.contains("statusmark.configure"), "{contents}");
        assert!(contents.contains("step=\"name\""), "{contents}");
    }
}
