//! Route handlers for the REST API
//!
//! Handlers are organized by domain:
//! - [`download`] — Media download requests
//! - [`system`] — Health and OpenAPI

use crate::types::DownloadStatus;
use serde::{Deserialize, Serialize};

mod download;
mod system;

// Re-export all handlers so `routes::function_name` continues to work
pub use download::*;
pub use system::*;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for POST /download
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct DownloadRequest {
    /// The media page URL to download
    #[schema(example = "https://www.example.com/watch?v=dQw4w9WgXcQ")]
    pub url: String,
}

/// Response body for a completed download
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct DownloadResponse {
    /// Outcome of the request
    pub status: DownloadStatus,

    /// Raw downloader output, for display in the client console
    pub output: String,

    /// URL path under which the produced file is served, when known
    ///
    /// `null` when the download succeeded but the artifact could not be
    /// determined from the tool's output.
    #[schema(example = "/downloads/www.example.com/2024-06-01/Title.mp4")]
    pub video_url: Option<String>,
}
