//! Disk capacity guard
//!
//! Refuses new downloads while the output filesystem's used-space percentage
//! is at or above a configured threshold. The check runs before any external
//! process is spawned, and always logs the current usage figures so
//! operators can watch the disk fill up before the threshold trips.
//!
//! The guard fails open: if the filesystem statistics cannot be read (path
//! missing, statvfs failure), the download is allowed and the condition is
//! logged at error level.

use crate::config::DiskSpaceConfig;
use crate::types::DiskUsage;
use crate::utils::disk_usage;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Result of a capacity check
#[derive(Debug, Clone, Copy)]
pub struct CapacityCheck {
    /// Whether used space meets or exceeds the configured threshold
    pub over_threshold: bool,

    /// Usage snapshot, when the filesystem could be inspected
    pub usage: Option<DiskUsage>,
}

/// Capacity guard over the output filesystem
///
/// Constructed from an explicit [`DiskSpaceConfig`] so tests can run against
/// alternate thresholds without touching global state.
#[derive(Debug, Clone)]
pub struct CapacityGuard {
    config: DiskSpaceConfig,
}

impl CapacityGuard {
    /// Create a guard with the given configuration
    pub fn new(config: DiskSpaceConfig) -> Self {
        Self { config }
    }

    /// Configured used-space threshold percentage
    #[must_use]
    pub fn threshold_percent(&self) -> u8 {
        self.config.threshold_percent
    }

    /// Check whether the filesystem holding `path` is at or over the threshold
    ///
    /// A path that cannot be measured (missing, statvfs failure) fails open;
    /// callers wanting the output root measured must create it first.
    #[must_use]
    pub fn check(&self, path: &Path) -> CapacityCheck {
        if !self.config.enabled {
            debug!("disk capacity check disabled, allowing download");
            return CapacityCheck {
                over_threshold: false,
                usage: None,
            };
        }

        match disk_usage(path) {
            Ok(usage) => {
                let used_percent = usage.used_percent();
                info!(
                    path = %path.display(),
                    used_percent = format_args!("{used_percent:.1}"),
                    free_gib = format_args!("{:.2}", usage.available_gib()),
                    "disk usage"
                );

                let over_threshold = used_percent >= f64::from(self.config.threshold_percent);
                if over_threshold {
                    warn!(
                        used_percent = format_args!("{used_percent:.1}"),
                        threshold_percent = self.config.threshold_percent,
                        "disk usage at or above threshold, refusing downloads"
                    );
                }

                CapacityCheck {
                    over_threshold,
                    usage: Some(usage),
                }
            }
            Err(e) => {
                // Fail open: availability over safety
                error!(
                    path = %path.display(),
                    error = %e,
                    "failed to check disk space, allowing download"
                );
                CapacityCheck {
                    over_threshold: false,
                    usage: None,
                }
            }
        }
    }
}
