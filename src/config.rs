//! Configuration types for media-dl

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use utoipa::ToSchema;

/// Download behavior configuration (output directory, filename template)
///
/// Groups settings related to how fetched media is stored on disk.
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct DownloadConfig {
    /// Output root directory (default: "downloads")
    ///
    /// Content is organized as `<download_dir>/<sanitized domain>/<YYYY-MM-DD>/`.
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// Maximum number of title characters in output filenames (default: 70)
    #[serde(default = "default_title_limit")]
    pub title_limit: usize,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            download_dir: default_download_dir(),
            title_limit: default_title_limit(),
        }
    }
}

/// External tool configuration (yt-dlp binary resolution)
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ToolsConfig {
    /// Path to the yt-dlp executable (auto-detected if None)
    #[serde(default)]
    pub ytdlp_path: Option<PathBuf>,

    /// Whether to search PATH for yt-dlp if no explicit path is set (default: true)
    #[serde(default = "default_true")]
    pub search_path: bool,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ytdlp_path: None,
            search_path: true,
        }
    }
}

/// Disk capacity guard configuration
///
/// Downloads are refused while the output filesystem's used-space percentage
/// is at or above `threshold_percent`.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct DiskSpaceConfig {
    /// Enable the capacity check before each download (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Used-space percentage at or above which downloads are refused (default: 90)
    #[serde(default = "default_threshold_percent")]
    pub threshold_percent: u8,
}

impl Default for DiskSpaceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold_percent: default_threshold_percent(),
        }
    }
}

/// Retention sweeper configuration
///
/// The sweeper runs on its own schedule, independent of the request path,
/// and reclaims content older than the retention window.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct RetentionConfig {
    /// Enable the periodic retention sweep (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Age in days beyond which content is deleted (default: 30)
    #[serde(default = "default_max_age_days")]
    pub max_age_days: u64,

    /// Hours between sweep passes (default: 6)
    #[serde(default = "default_sweep_interval_hours")]
    pub sweep_interval_hours: u64,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_age_days: default_max_age_days(),
            sweep_interval_hours: default_sweep_interval_hours(),
        }
    }
}

/// API server configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiConfig {
    /// Bind address for the HTTP server (default: 0.0.0.0:5000)
    #[serde(default = "default_bind_address")]
    #[schema(value_type = String)]
    pub bind_address: SocketAddr,

    /// Enable CORS middleware (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins ("*" allows any origin)
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Serve interactive Swagger UI documentation at /swagger-ui (default: true)
    #[serde(default = "default_true")]
    pub swagger_ui: bool,

    /// Directory holding the prebuilt single-page application
    ///
    /// When set, unrecognized routes serve files from this directory and fall
    /// back to its `index.html` for client-side routing. `None` disables SPA
    /// hosting entirely.
    #[serde(default = "default_static_dir")]
    pub static_dir: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_enabled: true,
            cors_origins: default_cors_origins(),
            swagger_ui: true,
            static_dir: default_static_dir(),
        }
    }
}

/// Logging configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct LoggingConfig {
    /// Directory for the persistent log file (default: "log")
    ///
    /// `None` logs to the console only.
    #[serde(default = "default_log_dir")]
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
        }
    }
}

/// Main configuration for the media-dl service
///
/// Fields are organized into logical sub-configs for maintainability:
/// - [`download`](DownloadConfig) — output directory and filename template
/// - [`tools`](ToolsConfig) — yt-dlp binary resolution
/// - [`disk_space`](DiskSpaceConfig) — capacity guard threshold
/// - [`retention`](RetentionConfig) — retention sweep window and cadence
/// - [`server`](ApiConfig) — HTTP bind address, CORS, SPA hosting
/// - [`logging`](LoggingConfig) — persistent log destination
///
/// All sub-config fields are flattened for flat serialization, and every
/// field has a sensible default so `Config::default()` works with zero
/// configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct Config {
    /// Download behavior settings
    #[serde(flatten)]
    pub download: DownloadConfig,

    /// External tool resolution
    #[serde(flatten)]
    pub tools: ToolsConfig,

    /// Disk capacity guard settings
    #[serde(default)]
    pub disk_space: DiskSpaceConfig,

    /// Retention sweeper settings
    #[serde(default)]
    pub retention: RetentionConfig,

    /// HTTP server settings
    #[serde(default)]
    pub server: ApiConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a JSON file
    ///
    /// Missing fields fall back to their defaults, so a partial config file
    /// is valid.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration invariants
    ///
    /// Returns a [`Error::Config`] naming the offending key on failure.
    pub fn validate(&self) -> Result<()> {
        if self.disk_space.threshold_percent > 100 {
            return Err(Error::Config {
                message: format!(
                    "threshold_percent must be at most 100, got {}",
                    self.disk_space.threshold_percent
                ),
                key: Some("disk_space.threshold_percent".to_string()),
            });
        }

        if self.download.title_limit == 0 {
            return Err(Error::Config {
                message: "title_limit must be at least 1".to_string(),
                key: Some("title_limit".to_string()),
            });
        }

        if self.retention.enabled && self.retention.sweep_interval_hours == 0 {
            return Err(Error::Config {
                message: "sweep_interval_hours must be at least 1".to_string(),
                key: Some("retention.sweep_interval_hours".to_string()),
            });
        }

        // Bound the retention window and cadence to sane values (100 years
        // and one year respectively)
        if self.retention.enabled && self.retention.max_age_days > 36_500 {
            return Err(Error::Config {
                message: format!(
                    "max_age_days must be at most 36500, got {}",
                    self.retention.max_age_days
                ),
                key: Some("retention.max_age_days".to_string()),
            });
        }

        if self.retention.enabled && self.retention.sweep_interval_hours > 8_760 {
            return Err(Error::Config {
                message: format!(
                    "sweep_interval_hours must be at most 8760, got {}",
                    self.retention.sweep_interval_hours
                ),
                key: Some("retention.sweep_interval_hours".to_string()),
            });
        }

        Ok(())
    }
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("downloads")
}

fn default_title_limit() -> usize {
    70
}

fn default_threshold_percent() -> u8 {
    90
}

fn default_max_age_days() -> u64 {
    30
}

fn default_sweep_interval_hours() -> u64 {
    6
}

fn default_bind_address() -> SocketAddr {
    // Matches the original deployment behind a reverse proxy
    "0.0.0.0:5000".parse().unwrap_or_else(|_| {
        SocketAddr::from(([0, 0, 0, 0], 5000))
    })
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_static_dir() -> Option<PathBuf> {
    Some(PathBuf::from("client/build"))
}

fn default_log_dir() -> Option<PathBuf> {
    Some(PathBuf::from("log"))
}

fn default_true() -> bool {
    true
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.download.download_dir, PathBuf::from("downloads"));
        assert_eq!(config.download.title_limit, 70);
        assert!(config.disk_space.enabled);
        assert_eq!(config.disk_space.threshold_percent, 90);
        assert_eq!(config.retention.max_age_days, 30);
        assert_eq!(config.server.bind_address.port(), 5000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_file_uses_defaults() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"download_dir": "/srv/media", "disk_space": {"threshold_percent": 80}}"#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();

        assert_eq!(config.download.download_dir, PathBuf::from("/srv/media"));
        assert_eq!(config.disk_space.threshold_percent, 80);
        // Untouched fields keep their defaults
        assert_eq!(config.download.title_limit, 70);
        assert_eq!(config.retention.max_age_days, 30);
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let config = Config {
            disk_space: DiskSpaceConfig {
                enabled: true,
                threshold_percent: 101,
            },
            ..Default::default()
        };

        let err = config.validate().unwrap_err();
        match err {
            Error::Config { key, .. } => {
                assert_eq!(key.as_deref(), Some("disk_space.threshold_percent"));
            }
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_title_limit_rejected() {
        let config = Config {
            download: DownloadConfig {
                title_limit: 0,
                ..Default::default()
            },
            ..Default::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_oversized_retention_window_rejected() {
        let config = Config {
            retention: RetentionConfig {
                enabled: true,
                max_age_days: u64::MAX,
                sweep_interval_hours: 6,
            },
            ..Default::default()
        };

        let err = config.validate().unwrap_err();
        match err {
            Error::Config { key, .. } => {
                assert_eq!(key.as_deref(), Some("retention.max_age_days"));
            }
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_oversized_sweep_interval_rejected() {
        let config = Config {
            retention: RetentionConfig {
                enabled: true,
                max_age_days: 30,
                sweep_interval_hours: 10_000,
            },
            ..Default::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.download.download_dir, config.download.download_dir);
        assert_eq!(
            parsed.disk_space.threshold_percent,
            config.disk_space.threshold_percent
        );
    }
}
