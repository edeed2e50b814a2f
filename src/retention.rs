//! Retention sweeper for the output tree
//!
//! Walks the output root bottom-up, deletes files older than the retention
//! window, and removes directories left empty by those deletions in the same
//! pass. The sweep runs on its own schedule and never sits on the request
//! path.
//!
//! The tree may be mutated concurrently by active downloads, so existence is
//! re-checked immediately before every deletion and a file that vanished in
//! the meantime is treated as already handled. Per-entry failures
//! (permissions, races) are logged and never abort the sweep.

use crate::config::RetentionConfig;
use crate::types::SweepSummary;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::fs;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Periodic sweeper that reclaims content older than the retention window
#[derive(Debug, Clone)]
pub struct RetentionSweeper {
    root: PathBuf,
    config: RetentionConfig,
}

impl RetentionSweeper {
    /// Create a sweeper over the given output root
    pub fn new(root: impl Into<PathBuf>, config: RetentionConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// Run a single sweep pass and report what was removed
    ///
    /// A disabled sweeper or a missing output root is a no-op. The root
    /// directory itself is never deleted, even when it ends up empty.
    pub async fn sweep(&self) -> SweepSummary {
        let mut summary = SweepSummary::default();

        if !self.config.enabled {
            debug!("retention sweep disabled, skipping");
            return summary;
        }

        if fs::metadata(&self.root).await.is_err() {
            debug!(root = %self.root.display(), "output root does not exist, nothing to sweep");
            return summary;
        }

        // A window too large to represent clamps to the epoch, which keeps
        // every file with a sane mtime
        let cutoff = SystemTime::now()
            .checked_sub(Duration::from_secs(
                self.config.max_age_days.saturating_mul(24 * 60 * 60),
            ))
            .unwrap_or(SystemTime::UNIX_EPOCH);

        sweep_dir(&self.root, cutoff, &mut summary).await;

        info!(
            root = %self.root.display(),
            files_removed = summary.files_removed,
            dirs_removed = summary.dirs_removed,
            "retention sweep complete"
        );

        summary
    }

    /// Spawn the sweeper as a background task on its configured interval
    ///
    /// The first sweep runs one full interval after startup; a crash-looping
    /// process therefore cannot hammer the output tree.
    pub fn spawn(self) -> JoinHandle<()> {
        let period = Duration::from_secs(self.config.sweep_interval_hours.saturating_mul(60 * 60));

        tokio::spawn(async move {
            info!(
                interval_hours = self.config.sweep_interval_hours,
                max_age_days = self.config.max_age_days,
                "retention sweeper started"
            );

            let mut interval = tokio::time::interval(period);
            // The first tick of a tokio interval completes immediately
            interval.tick().await;

            loop {
                interval.tick().await;
                self.sweep().await;
            }
        })
    }
}

/// Recursively sweep a directory, depth-first
///
/// Returns `true` when the directory is empty after the sweep, which makes
/// its parent eligible to remove it in the same pass.
fn sweep_dir<'a>(
    path: &'a Path,
    cutoff: SystemTime,
    summary: &'a mut SweepSummary,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = bool> + Send + 'a>> {
    Box::pin(async move {
        let mut entries = match fs::read_dir(path).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read directory during sweep");
                return false;
            }
        };

        let mut remaining = 0usize;

        while let Ok(Some(entry)) = entries.next_entry().await {
            let entry_path = entry.path();

            let file_type = match entry.file_type().await {
                Ok(ft) => ft,
                Err(_) => {
                    // Entry vanished between listing and inspection
                    continue;
                }
            };

            if file_type.is_dir() {
                let emptied = sweep_dir(&entry_path, cutoff, summary).await;
                if emptied && remove_empty_dir(&entry_path).await {
                    summary.dirs_removed += 1;
                } else {
                    remaining += 1;
                }
            } else if is_older_than(&entry, cutoff).await {
                if remove_stale_file(&entry_path).await {
                    summary.files_removed += 1;
                } else {
                    remaining += 1;
                }
            } else {
                remaining += 1;
            }
        }

        remaining == 0
    })
}

/// Whether the entry's last-modified time is strictly before the cutoff
async fn is_older_than(entry: &fs::DirEntry, cutoff: SystemTime) -> bool {
    match entry.metadata().await.and_then(|m| m.modified()) {
        Ok(modified) => modified < cutoff,
        Err(e) => {
            warn!(path = %entry.path().display(), error = %e, "failed to read mtime, keeping entry");
            false
        }
    }
}

/// Delete a stale file, tolerating a concurrent deletion
///
/// Returns `true` if the file was removed by this call.
async fn remove_stale_file(path: &Path) -> bool {
    // Re-check existence right before deleting; another process may have
    // taken the file since traversal
    if !fs::try_exists(path).await.unwrap_or(false) {
        debug!(path = %path.display(), "file already gone, skipping");
        return false;
    }

    match fs::remove_file(path).await {
        Ok(()) => {
            debug!(path = %path.display(), "deleted expired file");
            true
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            // Lost the race after the existence check; already satisfied
            false
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to delete expired file");
            false
        }
    }
}

/// Delete a directory believed to be empty, tolerating concurrent changes
///
/// Returns `true` if the directory was removed by this call. A directory
/// that gained an entry since the sweep (not-empty error) is left alone.
async fn remove_empty_dir(path: &Path) -> bool {
    if !fs::try_exists(path).await.unwrap_or(false) {
        return false;
    }

    match fs::remove_dir(path).await {
        Ok(()) => {
            debug!(path = %path.display(), "removed emptied directory");
            true
        }
        Err(e) if e.kind() == ErrorKind::NotFound => false,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to remove emptied directory");
            false
        }
    }
}
