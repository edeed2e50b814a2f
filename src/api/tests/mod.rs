use super::*;
use crate::config::Config;
use crate::downloader::fetch::{FetchOutput, MediaFetcher};
use crate::error::Error;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use async_trait::async_trait;
use std::path::Path;
use tempfile::TempDir;
use tower::ServiceExt;


/// Fetcher that replays a canned outcome without spawning a process
struct ScriptedFetcher {
    outcome: std::result::Result<String, (Option<i32>, String)>,
}

impl ScriptedFetcher {
    fn succeeding(stdout: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            outcome: Ok(stdout.into()),
        })
    }

    fn failing(code: Option<i32>, stderr: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            outcome: Err((code, stderr.into())),
        })
    }
}

#[async_trait]
impl MediaFetcher for ScriptedFetcher {
    async fn fetch(
        &self,
        _url: &str,
        location: &Path,
        _title_limit: usize,
    ) -> crate::error::Result<FetchOutput> {
        tokio::fs::create_dir_all(location).await?;
        match &self.outcome {
            Ok(stdout) => Ok(FetchOutput {
                stdout: stdout.clone(),
                stderr: String::new(),
            }),
            Err((code, stderr)) => Err(Error::ToolFailed {
                code: *code,
                stderr: stderr.clone(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Config rooted in a temp directory, with SPA hosting and the capacity
/// guard effectively disabled so tests control each concern explicitly
fn test_config(temp_dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.download.download_dir = temp_dir.path().join("downloads");
    config.disk_space.threshold_percent = 100;
    config.server.static_dir = None;
    config.server.swagger_ui = false;
    config
}

/// Build a router around a scripted fetcher
fn test_router(config: Config, fetcher: Arc<dyn MediaFetcher>) -> Router {
    let config = Arc::new(config);
    let downloader = Arc::new(MediaDownloader::with_fetcher(config.clone(), fetcher));
    create_router(downloader, config)
}

#[tokio::test]
async fn test_api_server_spawns() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = test_config(&temp_dir);
    config.server.bind_address = "127.0.0.1:0".parse().unwrap(); // Port 0 = OS assigns a free port
    let config = Arc::new(config);

    let downloader = Arc::new(MediaDownloader::new((*config).clone()));

    let api_handle = tokio::spawn({
        let config = config.clone();
        async move { start_api_server(downloader, config).await }
    });

    // Give it a moment to start
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    api_handle.abort();

    // The test passes if we got here without panicking
}

#[tokio::test]
async fn test_cors_enabled() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = test_config(&temp_dir);
    config.server.cors_enabled = true;
    config.server.cors_origins = vec!["*".to_string()];

    let app = test_router(config, ScriptedFetcher::succeeding(""));

    // Make a request with Origin header
    let request = Request::builder()
        .uri("/api/v1/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    // The CORS middleware should add access-control-allow-origin header
    let headers = response.headers();
    assert!(
        headers.contains_key("access-control-allow-origin"),
        "CORS header should be present when CORS is enabled"
    );
}

#[tokio::test]
async fn test_spa_fallback_serves_index() {
    let temp_dir = TempDir::new().unwrap();
    let static_dir = temp_dir.path().join("client-build");
    std::fs::create_dir_all(&static_dir).unwrap();
    std::fs::write(static_dir.join("index.html"), "<html>media-dl</html>").unwrap();

    let mut config = test_config(&temp_dir);
    config.server.static_dir = Some(static_dir);

    let app = test_router(config, ScriptedFetcher::succeeding(""));

    // A client-side route has no file on disk; index.html must be served
    let response = app
        .oneshot(
            Request::builder()
                .uri("/some/client/route")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(String::from_utf8_lossy(&body).contains("media-dl"));
}

#[tokio::test]
async fn test_no_spa_configured_returns_404() {
    let temp_dir = TempDir::new().unwrap();
    let app = test_router(test_config(&temp_dir), ScriptedFetcher::succeeding(""));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/some/client/route")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
