//! Result extraction from downloader output
//!
//! yt-dlp reports the produced file in two different shapes depending on
//! whether post-processing (format merging) ran: a single-line JSON record
//! printed by `--print-json`, or a free-text progress line. Extraction is an
//! ordered chain of total strategies; the first one that applies wins and
//! none of them can fail the download.

use std::path::{Path, PathBuf};
use tracing::warn;

/// Recover the final artifact's path from captured stdout
///
/// Strategy order:
/// 1. Structured records: the last `{...}` line's `_filename` field. The
///    last record reflects the post-processing state, so earlier records
///    (pre-merge filenames) are ignored. When structured lines are present
///    the free-text tier is never consulted, even if parsing fails.
/// 2. Free-text fallback: the first "Merging formats into" line's quoted
///    path.
///
/// Paths under `output_root` are returned relative to it; anything else is
/// kept as-is. `None` means the tool succeeded but the artifact is unknown,
/// which callers must treat as "no direct link", not as a failure.
pub(crate) fn extract_artifact_path(stdout: &str, output_root: &Path) -> Option<PathBuf> {
    let record_lines: Vec<&str> = stdout
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with('{') && line.ends_with('}'))
        .collect();

    if let Some(last) = record_lines.last() {
        let found = record_filename(last);
        if found.is_none() {
            warn!("structured record present but no filename could be read from it");
        }
        return found.map(|path| relativize(&path, output_root));
    }

    if let Some(path) = merge_line_path(stdout) {
        return Some(relativize(&path, output_root));
    }

    warn!("could not determine artifact path from downloader output");
    None
}

/// Parse a structured record line and read its final-path field
fn record_filename(line: &str) -> Option<PathBuf> {
    let record: serde_json::Value = serde_json::from_str(line).ok()?;
    record.get("_filename")?.as_str().map(PathBuf::from)
}

/// Find the first format-merge line and extract its quoted path
fn merge_line_path(stdout: &str) -> Option<PathBuf> {
    stdout
        .lines()
        .filter(|line| line.contains("Merging formats into"))
        .find_map(|line| quoted_segment(line).map(PathBuf::from))
}

/// First double-quoted substring of a line
fn quoted_segment(line: &str) -> Option<&str> {
    let start = line.find('"')? + 1;
    let rest = line.get(start..)?;
    let end = rest.find('"')?;
    rest.get(..end)
}

/// Express `path` relative to `root` when it lies underneath it
///
/// Paths outside the root are kept unchanged; the tool occasionally reports
/// absolute paths from unexpected locations and a wrong guess here would
/// produce broken links.
fn relativize(path: &Path, root: &Path) -> PathBuf {
    path.strip_prefix(root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}
