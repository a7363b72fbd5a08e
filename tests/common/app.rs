//! Test application factory for integration tests.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tower::ServiceExt;

use clearview::models::AppConfig;
use clearview::server::{build_router, create_app_state, AppState};

use super::fixtures::{MultipartBody, BOUNDARY};

/// Test application with router and a private static directory
pub struct TestApp {
    router: axum::Router,
    // Dropped last so the directory outlives the router
    static_dir: TempDir,
}

impl TestApp {
    /// Create a new test application with default tuning
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a test application from a config; `static_dir` is replaced
    /// with a fresh temporary directory.
    pub fn with_config(config: AppConfig) -> Self {
        let static_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = config.with_static_dir(Some(static_dir.path().to_path_buf()));

        let state = create_app_state(config).expect("Failed to create app state");
        let router = build_router(state);

        Self { router, static_dir }
    }

    /// Create application state rooted in `dir` for custom router configuration
    pub fn create_state(dir: &Path) -> AppState {
        let config = AppConfig::default().with_static_dir(Some(dir.to_path_buf()));
        create_app_state(config).expect("Failed to create app state")
    }

    /// Root of the served static files
    pub fn static_dir(&self) -> &Path {
        self.static_dir.path()
    }

    /// Map a `/static/...` URL to its file on disk
    pub fn static_file(&self, url: &str) -> PathBuf {
        let relative = url.trim_start_matches("/static/");
        self.static_dir.path().join(relative)
    }

    /// Files currently in a subdirectory of the static root
    pub fn list_files(&self, dir: &str) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.static_dir.path().join(dir))
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .map(|e| e.file_name().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Make a GET request to the given path
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Request::get(path).body(Body::empty()).unwrap())
            .await
    }

    /// Make a multipart POST request
    pub async fn post_multipart(&self, path: &str, body: MultipartBody) -> TestResponse {
        let bytes = body.finish();
        let request = Request::post(path)
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .header("Content-Length", bytes.len())
            .body(Body::from(bytes))
            .unwrap();
        self.request(request).await
    }

    /// Send a request to the router
    async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Test response with convenience methods
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parse body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// Get body as string
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Get raw body bytes
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// Value of a header, if present and valid UTF-8
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Check if response is a PNG image
    pub fn is_png(&self) -> bool {
        self.body.len() >= 8 && &self.body[0..8] == b"\x89PNG\r\n\x1a\n"
    }

    /// All `src="..."` attribute values in an HTML body
    pub fn image_sources(&self) -> Vec<String> {
        let text = self.text();
        text.split("src=\"")
            .skip(1)
            .filter_map(|rest| rest.split('"').next())
            .map(str::to_string)
            .collect()
    }
}
