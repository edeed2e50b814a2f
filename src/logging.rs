//! Tracing initialization
//!
//! Console logging always; an additional daily-rotated file layer when a log
//! directory is configured. The non-blocking writer's guard is parked in a
//! process-wide `OnceLock` so buffered lines are flushed on exit.

use std::path::Path;
use std::sync::OnceLock;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Initialize the global tracing subscriber
///
/// The filter comes from `RUST_LOG` when set, with a default that keeps this
/// crate and the HTTP layer at info. Calling this more than once is a no-op
/// beyond the first registration error being ignored, which keeps tests that
/// construct the stack independently from panicking.
pub fn init_tracing(log_dir: Option<&Path>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("media_dl=info,tower_http=info"));

    let console_layer = fmt::layer().with_target(true);

    if let Some(dir) = log_dir {
        match std::fs::create_dir_all(dir) {
            Ok(()) => {
                let appender = tracing_appender::rolling::daily(dir, "media-dl.log");
                let (writer, guard) = tracing_appender::non_blocking(appender);
                let _ = FILE_GUARD.set(guard);

                let file_layer = fmt::layer().with_writer(writer).with_ansi(false);

                let _ = tracing_subscriber::registry()
                    .with(filter)
                    .with(console_layer)
                    .with(file_layer)
                    .try_init();
                return;
            }
            Err(e) => {
                eprintln!(
                    "warning: could not create log directory {}: {e}, logging to console only",
                    dir.display()
                );
            }
        }
    }

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .try_init();
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_log_directory() {
        let temp_dir = TempDir::new().unwrap();
        let log_dir = temp_dir.path().join("log");

        init_tracing(Some(&log_dir));

        assert!(log_dir.is_dir());
    }

    #[test]
    fn test_init_is_idempotent() {
        // Repeated initialization must not panic
        init_tracing(None);
        init_tracing(None);
    }
}
