//! Download orchestration
//!
//! [`MediaDownloader`] is the service facade tying the pipeline together:
//! input validation, the capacity guard, output-location derivation, the
//! external fetch, and result extraction. The HTTP layer calls only this
//! type and maps its errors to status codes at the boundary.

pub mod fetch;

mod extract;

use crate::capacity::CapacityGuard;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::DownloadOutcome;
use crate::utils::sanitize_path_component;
use fetch::{MediaFetcher, YtDlpFetcher};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Facade over the download pipeline
///
/// Cheap to clone and safe to share across request handlers; downloads for
/// distinct URLs run concurrently with no coordination beyond the
/// filesystem itself.
#[derive(Clone)]
pub struct MediaDownloader {
    config: Arc<Config>,
    guard: CapacityGuard,
    fetcher: Arc<dyn MediaFetcher>,
}

impl MediaDownloader {
    /// Create a downloader backed by the yt-dlp binary from configuration
    pub fn new(config: Config) -> Self {
        let fetcher = Arc::new(YtDlpFetcher::from_config(&config.tools));
        Self::with_fetcher(Arc::new(config), fetcher)
    }

    /// Create a downloader with an explicit fetcher implementation
    ///
    /// Primarily a test seam, but also the hook for alternate fetch tools.
    pub fn with_fetcher(config: Arc<Config>, fetcher: Arc<dyn MediaFetcher>) -> Self {
        let guard = CapacityGuard::new(config.disk_space.clone());
        Self {
            config,
            guard,
            fetcher,
        }
    }

    /// Access the active configuration
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Download the media at `url` into the organized output tree
    ///
    /// The pipeline short-circuits on the first failure; an error return
    /// never carries an artifact path. A successful fetch whose artifact
    /// cannot be determined from the tool's output is still a success, with
    /// `artifact` unset.
    pub async fn download(&self, url: &str) -> Result<DownloadOutcome> {
        let url = url.trim();
        if url.is_empty() {
            return Err(Error::EmptyUrl);
        }

        let root = &self.config.download.download_dir;
        tokio::fs::create_dir_all(root).await?;

        let check = self.guard.check(root);
        if check.over_threshold {
            let (used_percent, available) = check
                .usage
                .map(|u| (u.used_percent(), u.available))
                .unwrap_or((0.0, 0));
            return Err(Error::InsufficientSpace {
                used_percent,
                threshold_percent: self.guard.threshold_percent(),
                available,
            });
        }

        let location = self.output_location(url);
        info!(
            url,
            location = %location.display(),
            fetcher = self.fetcher.name(),
            "starting download"
        );

        let output = self
            .fetcher
            .fetch(url, &location, self.config.download.title_limit)
            .await?;

        let artifact = extract::extract_artifact_path(&output.stdout, root);
        match &artifact {
            Some(path) => info!(url, artifact = %path.display(), "download complete"),
            None => warn!(url, "download succeeded but artifact path is unknown"),
        }

        Ok(DownloadOutcome {
            output: output.stdout,
            artifact,
        })
    }

    /// Derive the output directory for a URL: `<root>/<domain>/<YYYY-MM-DD>`
    ///
    /// The domain is the URL's host, sanitized for filesystem use; URLs that
    /// fail to parse or carry no host fall into an `unknown` bucket rather
    /// than failing the request. The date is the server's local date at
    /// request time, so a batch downloaded around midnight may straddle two
    /// directories.
    fn output_location(&self, url: &str) -> PathBuf {
        let domain = url::Url::parse(url)
            .ok()
            .and_then(|parsed| parsed.host_str().map(sanitize_path_component))
            .filter(|host| !host.is_empty())
            .unwrap_or_else(|| "unknown".to_string());

        let date = chrono::Local::now().format("%Y-%m-%d").to_string();

        self.config.download.download_dir.join(domain).join(date)
    }
}

impl std::fmt::Debug for MediaDownloader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaDownloader")
            .field("fetcher", &self.fetcher.name())
            .field("download_dir", &self.config.download.download_dir)
            .finish()
    }
}
