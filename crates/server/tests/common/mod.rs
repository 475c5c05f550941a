//! Common test utilities for HTTP-level testing.
//!
//! This module provides a test fixture that builds the full router over a
//! temporary database and image directory, so requests run in-process
//! without binding a port.

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use bazaar_core::{
    CatalogEngine, Config, DatabaseConfig, Database, FsImageStore, ImageStore, ImagesConfig,
    ServerConfig, DEFAULT_IMAGE_NAME,
};
use bazaar_server::{api::create_router, state::AppState};

pub const BOUNDARY: &str = "bazaar-test-boundary";

/// A bare JPEG-looking payload.
pub const MUG_IMAGE: &[u8] = b"\xff\xd8\xff\xe0mug photo bytes";

/// Test fixture with a router over temporary storage.
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Image directory inside the temp dir
    pub images_dir: PathBuf,
    /// Temporary directory for test database and images
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub bytes: Vec<u8>,
    /// Parsed JSON body, `Null` when the body is not JSON
    pub body: Value,
}

/// One part of a multipart form.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a [u8]),
}

impl TestFixture {
    pub async fn new() -> Self {
        Self::with_upload_limit(ImagesConfig::default().max_upload_bytes)
    }

    pub fn with_upload_limit(max_upload_bytes: usize) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let images_dir = temp_dir.path().join("images");

        let config = Config {
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 0, // Not used for in-process testing
            },
            database: DatabaseConfig {
                path: temp_dir.path().join("test.sqlite3"),
                ..Default::default()
            },
            images: ImagesConfig {
                dir: images_dir.clone(),
                default_image: DEFAULT_IMAGE_NAME.to_string(),
                max_upload_bytes,
            },
            ..Default::default()
        };

        let db = Database::from_config(&config.database);
        db.initialize().expect("Failed to initialize database");
        let images: Arc<dyn ImageStore> = Arc::new(FsImageStore::new(
            &config.images.dir,
            &config.images.default_image,
        ));
        let engine = CatalogEngine::new(db, images);
        let state = Arc::new(AppState::new(config, engine));

        Self {
            router: create_router(state),
            images_dir,
            temp_dir,
        }
    }

    /// Places a default image so missing images fall back to it.
    pub fn write_default_image(&self, bytes: &[u8]) {
        std::fs::create_dir_all(&self.images_dir).unwrap();
        std::fs::write(self.images_dir.join(DEFAULT_IMAGE_NAME), bytes).unwrap();
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn post_multipart(&self, uri: &str, parts: &[Part<'_>]) -> TestResponse {
        self.post_multipart_raw(uri, multipart_body(parts)).await
    }

    /// Posts `body` as-is under the multipart content type, for malformed
    /// or cut-off forms.
    pub async fn post_multipart_raw(&self, uri: &str, body: Vec<u8>) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// Prometheus text from `/metrics`.
    pub async fn metrics_text(&self) -> String {
        String::from_utf8(self.get("/metrics").await.bytes).unwrap()
    }

    /// Posts a complete add-item form.
    pub async fn add_item(&self, name: &str, category: &str, image: &[u8]) -> TestResponse {
        self.post_multipart(
            "/items",
            &[
                Part::Text("name", name),
                Part::Text("category", category),
                Part::File("image", image),
            ],
        )
        .await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            bytes,
            body,
        }
    }
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                        .as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(name, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"upload.jpg\"\r\n\
                         Content-Type: image/jpeg\r\n\r\n",
                        name
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}
