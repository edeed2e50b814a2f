//! media-dl service binary
//!
//! Loads configuration, starts the retention sweeper, and serves the REST
//! API until a termination signal arrives. The config file path comes from
//! the `MEDIA_DL_CONFIG` environment variable; without it the built-in
//! defaults apply.

use media_dl::{Config, MediaDownloader, RetentionSweeper, Result, run_until_shutdown};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config()?;
    media_dl::logging::init_tracing(config.logging.log_dir.as_deref());

    info!(
        version = env!("CARGO_PKG_VERSION"),
        download_dir = %config.download.download_dir.display(),
        "starting media-dl"
    );

    let config = Arc::new(config);
    let downloader = Arc::new(MediaDownloader::with_fetcher(
        config.clone(),
        Arc::new(media_dl::YtDlpFetcher::from_config(&config.tools)),
    ));

    let sweeper = RetentionSweeper::new(
        config.download.download_dir.clone(),
        config.retention.clone(),
    );
    let sweeper_handle = sweeper.spawn();

    let server = media_dl::api::start_api_server(downloader, config);
    let result = run_until_shutdown(server).await;

    sweeper_handle.abort();
    result
}

/// Load configuration from `MEDIA_DL_CONFIG`, falling back to defaults
fn load_config() -> Result<Config> {
    match std::env::var_os("MEDIA_DL_CONFIG") {
        Some(path) => {
            let path = PathBuf::from(path);
            eprintln!("loading configuration from {}", path.display());
            Config::from_file(&path)
        }
        None => {
            let config = Config::default();
            config.validate()?;
            Ok(config)
        }
    }
}
