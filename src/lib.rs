//! # media-dl
//!
//! Self-hosted media download service: accept a page URL, hand it to the
//! yt-dlp tool, and organize the result into a `domain/date` library that is
//! served straight back over HTTP.
//!
//! ## Design Philosophy
//!
//! media-dl is designed to be:
//! - **Simple to run** - One binary, one optional JSON config file
//! - **Sensible defaults** - Works out of the box with zero configuration
//! - **Self-cleaning** - A retention sweeper reclaims old content on its own
//! - **Guarded** - A disk capacity check refuses work before the disk fills
//!
//! ## Quick Start
//!
//! ```no_run
//! use media_dl::{Config, MediaDownloader};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Arc::new(Config::default());
//!     let downloader = Arc::new(MediaDownloader::new((*config).clone()));
//!
//!     media_dl::api::start_api_server(downloader, config).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API module
pub mod api;
/// Disk capacity guard
pub mod capacity;
/// Configuration types
pub mod config;
/// Download orchestration
pub mod downloader;
/// Error types
pub mod error;
/// Tracing initialization
pub mod logging;
/// Retention sweeper
pub mod retention;
/// Core types
pub mod types;
/// Utility functions
pub mod utils;

// Re-export commonly used types
pub use capacity::{CapacityCheck, CapacityGuard};
pub use config::Config;
pub use downloader::MediaDownloader;
pub use downloader::fetch::{FetchOutput, MediaFetcher, YtDlpFetcher};
pub use error::{ApiError, Error, ErrorDetail, Result, ToHttpStatus};
pub use retention::RetentionSweeper;
pub use types::{DiskUsage, DownloadOutcome, DownloadStatus, SweepSummary};

/// Run a server future until it finishes or a termination signal arrives.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
///
/// # Example
///
/// ```no_run
/// use media_dl::{Config, MediaDownloader, run_until_shutdown};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = Arc::new(Config::default());
///     let downloader = Arc::new(MediaDownloader::new((*config).clone()));
///
///     let server = media_dl::api::start_api_server(downloader, config);
///     run_until_shutdown(server).await?;
///
///     Ok(())
/// }
/// ```
pub async fn run_until_shutdown(
    server: impl std::future::Future<Output = Result<()>>,
) -> Result<()> {
    tokio::select! {
        result = server => result,
        () = wait_for_signal() => {
            tracing::info!("Shutting down");
            Ok(())
        }
    }
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Set up signal handlers - these may fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), _) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            if let Ok(mut sigint) = signal(SignalKind::interrupt()) {
                sigint.recv().await;
                tracing::info!("Received SIGINT signal (Ctrl+C)");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
        (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
                sigterm.recv().await;
                tracing::info!("Received SIGTERM signal");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
