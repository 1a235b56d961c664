//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Value, json};
use sha2::{Digest, Sha256};
use tempfile::TempDir;
use tower::ServiceExt;

use unpackd_core::config::AppConfig;

/// API key configured for every test app unless overridden.
pub const API_KEY: &str = "test-key";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Application config
    pub config: AppConfig,
    /// Scratch directory backing the workspace
    pub tmp: TempDir,
}

impl TestApp {
    /// Create a test application that extracts with the system `tar`.
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Create a test application, letting the caller adjust the config.
    pub async fn with_config(adjust: impl FnOnce(&mut AppConfig)) -> Self {
        let tmp = TempDir::new().expect("Failed to create temp dir");

        let mut config = AppConfig::default();
        config.storage.tmp_dir = tmp.path().to_string_lossy().into_owned();
        config.auth.api_key = API_KEY.to_string();
        config.extractor.command = "tar".to_string();
        config.extractor.args = ["-xf", "{input}", "-C", "{output_dir}"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        adjust(&mut config);

        let application = unpackd_api::bootstrap(config.clone())
            .await
            .expect("Failed to bootstrap application");
        let router = unpackd_api::build_app(application.state);

        Self {
            router,
            config,
            tmp,
        }
    }

    /// Make an HTTP request carrying the configured API key
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let key = self.config.auth.api_key.clone();
        self.request_with_key(method, path, body, Some(&key)).await
    }

    /// Make an HTTP request to the test app
    pub async fn request_with_key(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        api_key: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(key) = api_key {
            req = req.header(self.config.auth.header.as_str(), key);
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 16 * 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Start an upload and return its token
    pub async fn init_upload(&self) -> String {
        let response = self.request("POST", "/upload/init", None).await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        response.body["upload_id"]
            .as_str()
            .expect("No upload_id in response")
            .to_string()
    }

    /// Send one chunk of base64 text
    pub async fn put_chunk(
        &self,
        upload_id: &str,
        index: u32,
        data: &str,
        total: Option<u32>,
    ) -> TestResponse {
        let mut body = json!({
            "upload_id": upload_id,
            "index": index,
            "data": data,
        });
        if let Some(total) = total {
            body["totalChunks"] = json!(total);
        }
        self.request("POST", "/upload/chunk", Some(body)).await
    }

    /// Base64-encode `bytes`, send the text in `chunk_chars` pieces, and
    /// finalize with the correct size and digest. Returns the upload token.
    pub async fn upload(&self, filename: &str, bytes: &[u8], chunk_chars: usize) -> String {
        let upload_id = self.init_upload().await;
        let chunks = split_encoded(bytes, chunk_chars);
        let total = chunks.len() as u32;
        for (i, chunk) in chunks.iter().enumerate() {
            let response = self.put_chunk(&upload_id, i as u32, chunk, Some(total)).await;
            assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        }

        let response = self
            .request(
                "POST",
                "/upload/finish",
                Some(json!({
                    "upload_id": upload_id,
                    "filename": filename,
                    "size": bytes.len(),
                    "sha256": sha256_hex(bytes),
                })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        upload_id
    }

    /// Start an extraction job and return its token
    pub async fn start_job(&self, upload_id: &str, password: Option<&str>) -> String {
        let response = self
            .request(
                "POST",
                "/unzip/start",
                Some(json!({ "upload_id": upload_id, "password": password })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        response.body["job_id"]
            .as_str()
            .expect("No job_id in response")
            .to_string()
    }

    /// Poll job status until it leaves `queued`/`running`
    pub async fn wait_for_job(&self, job_id: &str) -> Value {
        for _ in 0..500 {
            let response = self
                .request("GET", &format!("/unzip/status?job_id={job_id}"), None)
                .await;
            assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
            match response.body["status"].as_str() {
                Some("done") | Some("error") => return response.body,
                _ => tokio::time::sleep(Duration::from_millis(10)).await,
            }
        }
        panic!("job {job_id} did not finish in time");
    }

    /// Number of archive files currently under the uploads directory
    pub fn archive_count(&self) -> usize {
        std::fs::read_dir(self.config.storage.uploads_dir())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

/// Lowercase hex SHA-256
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Base64-encode `bytes` and split the text into `chunk_chars` pieces, the
/// way a browser client slices its encoded file.
pub fn split_encoded(bytes: &[u8], chunk_chars: usize) -> Vec<String> {
    let text = STANDARD.encode(bytes);
    text.as_bytes()
        .chunks(chunk_chars)
        .map(|c| String::from_utf8_lossy(c).into_owned())
        .collect()
}

/// Build an in-memory tar archive from `(path, contents)` pairs.
pub fn tar_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (path, contents) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, path, *contents)
            .expect("Failed to append tar entry");
    }
    builder.into_inner().expect("Failed to finish tar archive")
}
