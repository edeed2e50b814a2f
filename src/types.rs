//! Core types shared across the service

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use utoipa::ToSchema;

/// Outcome marker carried by successful download responses
///
/// Failures never produce this value; they are reported through the typed
/// error body with a status code instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DownloadStatus {
    /// The external tool exited successfully
    Success,
}

/// Result of a successful download
///
/// The artifact path is relative to the output root when extraction
/// succeeded, and `None` when the tool exited cleanly but the produced file
/// could not be determined from its output. The absence of an artifact is
/// not a failure; it only means no direct playback link can be constructed.
#[derive(Debug, Clone)]
pub struct DownloadOutcome {
    /// Raw standard-output text captured from the tool, kept for diagnostics
    pub output: String,

    /// Path of the produced media file, relative to the output root
    pub artifact: Option<PathBuf>,
}

/// Counts reported by a completed retention sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SweepSummary {
    /// Number of files deleted during the sweep
    pub files_removed: u64,

    /// Number of emptied directories deleted during the sweep
    pub dirs_removed: u64,
}

/// Filesystem usage snapshot for the output root's filesystem
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct DiskUsage {
    /// Total size of the filesystem in bytes
    pub total: u64,

    /// Bytes available to unprivileged users
    pub available: u64,
}

impl DiskUsage {
    /// Used-space percentage of the filesystem (0.0 to 100.0)
    #[must_use]
    pub fn used_percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let used = self.total.saturating_sub(self.available);
        (used as f64 / self.total as f64) * 100.0
    }

    /// Available space in GiB, for human-facing diagnostics
    #[must_use]
    pub fn available_gib(&self) -> f64 {
        self.available as f64 / (1024.0 * 1024.0 * 1024.0)
    }
}
