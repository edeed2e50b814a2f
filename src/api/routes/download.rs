//! Download handler: accept a URL and run the fetch pipeline.

use crate::api::AppState;
use crate::api::routes::{DownloadRequest, DownloadResponse};
use crate::types::DownloadStatus;
use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use std::path::Path;
use tracing::info;

/// POST /download - Download the media at a URL
///
/// The request blocks until the external tool finishes; there is no queue
/// and no progress reporting. Errors carry a machine-readable code and the
/// tool's stderr where available.
#[utoipa::path(
    post,
    path = "/api/v1/download",
    tag = "download",
    request_body = DownloadRequest,
    responses(
        (status = 200, description = "Download finished", body = DownloadResponse),
        (status = 400, description = "Empty URL", body = crate::error::ApiError),
        (status = 502, description = "Downloader tool reported a failure", body = crate::error::ApiError),
        (status = 503, description = "Downloader tool not installed", body = crate::error::ApiError),
        (status = 507, description = "Disk usage over the capacity threshold", body = crate::error::ApiError)
    )
)]
pub async fn download(
    State(state): State<AppState>,
    Json(request): Json<DownloadRequest>,
) -> Response {
    info!(url = %request.url, "download requested");

    match state.downloader.download(&request.url).await {
        Ok(outcome) => {
            // Only relative artifacts live under the /downloads mount; an
            // absolute path would make a broken URL and expose server paths
            let video_url = outcome
                .artifact
                .as_deref()
                .filter(|artifact| artifact.is_relative())
                .map(serve_path);
            Json(DownloadResponse {
                status: DownloadStatus::Success,
                output: outcome.output,
                video_url,
            })
            .into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Map a relative artifact path to its serving URL
///
/// Components are joined with forward slashes regardless of platform, since
/// the result is a URL path under the /downloads mount. Callers must filter
/// out absolute paths first.
fn serve_path(artifact: &Path) -> String {
    let joined = artifact
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");

    format!("/downloads/{joined}")
}
