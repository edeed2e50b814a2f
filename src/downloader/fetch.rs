//! External downloader invocation
//!
//! Wraps the `yt-dlp` command-line tool behind the [`MediaFetcher`] trait so
//! the service facade can be exercised in tests without spawning processes.

use crate::config::ToolsConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, error};

/// Captured output of a successful tool invocation
#[derive(Debug, Clone)]
pub struct FetchOutput {
    /// Standard-output text, consumed by the result extractor
    pub stdout: String,

    /// Standard-error text, kept for diagnostics
    pub stderr: String,
}

/// Seam between the download facade and the external fetching tool
///
/// The production implementation is [`YtDlpFetcher`]; tests substitute a
/// counting mock to verify that rejected requests never spawn a process.
#[async_trait]
pub trait MediaFetcher: Send + Sync {
    /// Fetch `url` into `location`, bounding the title portion of the
    /// output filename to `title_limit` characters
    ///
    /// Implementations create `location` if needed (idempotently; concurrent
    /// requests may race on the same domain/date directory) and block until
    /// the tool exits. There is deliberately no timeout.
    async fn fetch(&self, url: &str, location: &Path, title_limit: usize) -> Result<FetchOutput>;

    /// Short identifier for logging
    fn name(&self) -> &'static str;
}

/// CLI-based fetcher using the external yt-dlp binary
///
/// # Examples
///
/// ```no_run
/// use media_dl::downloader::fetch::YtDlpFetcher;
/// use std::path::PathBuf;
///
/// // Create with explicit path
/// let fetcher = YtDlpFetcher::new(PathBuf::from("/usr/bin/yt-dlp"));
///
/// // Or auto-discover from PATH
/// let fetcher = YtDlpFetcher::from_path();
/// ```
pub struct YtDlpFetcher {
    binary_path: PathBuf,
}

impl YtDlpFetcher {
    /// Create a new fetcher with an explicit binary path
    pub fn new(binary_path: PathBuf) -> Self {
        Self { binary_path }
    }

    /// Attempt to find yt-dlp in PATH
    ///
    /// # Returns
    ///
    /// `Some(YtDlpFetcher)` if the binary is found, `None` otherwise.
    pub fn from_path() -> Option<Self> {
        which::which("yt-dlp").ok().map(Self::new)
    }

    /// Resolve the binary from configuration
    ///
    /// Explicit `ytdlp_path` wins; otherwise PATH is searched when
    /// `search_path` allows it. When nothing is found the bare name is kept
    /// so invocation reports a proper tool-missing error instead of failing
    /// at construction time.
    pub fn from_config(tools: &ToolsConfig) -> Self {
        if let Some(path) = &tools.ytdlp_path {
            return Self::new(path.clone());
        }
        if tools.search_path
            && let Some(fetcher) = Self::from_path()
        {
            return fetcher;
        }
        Self::new(PathBuf::from("yt-dlp"))
    }
}

#[async_trait]
impl MediaFetcher for YtDlpFetcher {
    async fn fetch(&self, url: &str, location: &Path, title_limit: usize) -> Result<FetchOutput> {
        // Creating an existing directory is not an error; concurrent
        // requests for the same domain/date race here by design
        tokio::fs::create_dir_all(location).await?;

        let mut template = location.as_os_str().to_os_string();
        template.push(format!(
            "{}%(title).{}s.%(ext)s",
            std::path::MAIN_SEPARATOR,
            title_limit
        ));

        debug!(url, location = %location.display(), "invoking yt-dlp");

        let output = Command::new(&self.binary_path)
            .arg("--no-playlist")
            .arg("--write-thumbnail")
            .arg("--write-info-json")
            .arg("--print-json")
            .arg("--output")
            .arg(&template)
            .arg(url)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == ErrorKind::NotFound {
                    Error::ToolMissing(self.binary_path.display().to_string())
                } else {
                    Error::Io(e)
                }
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            error!(
                url,
                code = ?output.status.code(),
                stderr = %stderr.trim(),
                "yt-dlp failed"
            );
            return Err(Error::ToolFailed {
                code: output.status.code(),
                stderr,
            });
        }

        debug!(url, "yt-dlp finished");
        Ok(FetchOutput { stdout, stderr })
    }

    fn name(&self) -> &'static str {
        "yt-dlp"
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_from_config_prefers_explicit_path() {
        let tools = ToolsConfig {
            ytdlp_path: Some(PathBuf::from("/opt/yt-dlp/yt-dlp")),
            search_path: true,
        };

        let fetcher = YtDlpFetcher::from_config(&tools);
        assert_eq!(fetcher.binary_path, PathBuf::from("/opt/yt-dlp/yt-dlp"));
    }

    #[test]
    fn test_from_path_consistency_with_which_crate() {
        // from_path() should return Some if and only if which::which() succeeds
        let which_result = which::which("yt-dlp");
        let from_path_result = YtDlpFetcher::from_path();

        assert_eq!(which_result.is_ok(), from_path_result.is_some());
    }

    #[tokio::test]
    async fn test_fetch_with_invalid_binary_reports_tool_missing() {
        let temp_dir = TempDir::new().unwrap();
        let fetcher = YtDlpFetcher::new(PathBuf::from("/nonexistent/path/to/yt-dlp"));

        let result = fetcher
            .fetch(
                "https://example.com/watch?v=abc",
                &temp_dir.path().join("example.com/2024-01-01"),
                70,
            )
            .await;

        match result {
            Err(Error::ToolMissing(path)) => {
                assert!(path.contains("yt-dlp"));
            }
            other => panic!("expected ToolMissing, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_creates_output_location() {
        let temp_dir = TempDir::new().unwrap();
        let location = temp_dir.path().join("example.com").join("2024-01-01");
        let fetcher = YtDlpFetcher::new(PathBuf::from("/nonexistent/path/to/yt-dlp"));

        // The spawn fails, but the location must already exist by then
        let _ = fetcher
            .fetch("https://example.com/watch?v=abc", &location, 70)
            .await;

        assert!(location.is_dir());
    }

    #[cfg(unix)]
    mod stub_binary {
        use super::*;
        use std::os::unix::fs::PermissionsExt;

        /// Write an executable shell script standing in for yt-dlp
        fn write_stub(dir: &Path, body: &str) -> PathBuf {
            let path = dir.join("yt-dlp-stub");
            std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        #[tokio::test]
        async fn test_nonzero_exit_carries_stderr() {
            let temp_dir = TempDir::new().unwrap();
            let stub = write_stub(
                temp_dir.path(),
                "echo 'ERROR: Unsupported URL' >&2\nexit 1",
            );
            let fetcher = YtDlpFetcher::new(stub);

            let result = fetcher
                .fetch(
                    "https://example.com/watch?v=abc",
                    &temp_dir.path().join("out"),
                    70,
                )
                .await;

            match result {
                Err(Error::ToolFailed { code, stderr }) => {
                    assert_eq!(code, Some(1));
                    assert!(stderr.contains("Unsupported URL"));
                }
                other => panic!("expected ToolFailed, got {:?}", other),
            }
        }

        #[tokio::test]
        async fn test_zero_exit_returns_captured_stdout() {
            let temp_dir = TempDir::new().unwrap();
            let stub = write_stub(temp_dir.path(), "echo '{\"_filename\": \"x.mp4\"}'");
            let fetcher = YtDlpFetcher::new(stub);

            let output = fetcher
                .fetch(
                    "https://example.com/watch?v=abc",
                    &temp_dir.path().join("out"),
                    70,
                )
                .await
                .unwrap();

            assert!(output.stdout.contains("_filename"));
        }
    }
}
