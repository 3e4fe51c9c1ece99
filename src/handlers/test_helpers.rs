//! Shared test utilities for handler unit tests.
//!
//! Provides a [`TestHarness`] that sets up a `SiteManager` over a fresh temp
//! directory, plus helpers for building requests and reading JSON bodies.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::json;
use tempfile::TempDir;
use tower::ServiceExt; // for oneshot()

use super::router::build_router;
use super::state::SiteManager;
use crate::config::ServerConfig;

/// Admin credentials bootstrapped into every harness.
pub const TEST_ADMIN: &str = "test-admin";
pub const TEST_PASSWORD: &str = "test-password";

/// A self-contained test environment with its own temp storage.
///
/// Holds `TempDir` so the directory isn't cleaned up until the harness drops.
pub struct TestHarness {
    pub manager: Arc<SiteManager>,
    _temp_dir: TempDir,
}

impl TestHarness {
    /// Fresh empty store with a known admin account.
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    /// Demo catalogue seeded.
    pub fn seeded() -> Self {
        Self::with_config(|config| config.seed_demo = true)
    }

    pub fn with_config(tweak: impl FnOnce(&mut ServerConfig)) -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let mut config = ServerConfig {
            storage_path: temp_dir.path().to_path_buf(),
            admin_username: Some(TEST_ADMIN.to_string()),
            admin_password: Some(TEST_PASSWORD.to_string()),
            ..ServerConfig::default()
        };
        tweak(&mut config);

        let manager = SiteManager::new(config).expect("failed to create test SiteManager");

        Self {
            manager: Arc::new(manager),
            _temp_dir: temp_dir,
        }
    }

    /// Build the full application router (public + protected routes).
    pub fn router(&self) -> Router {
        build_router(self.manager.clone())
    }

    /// Issue a session token directly, skipping the login endpoint.
    pub fn token(&self) -> String {
        self.manager.sessions.issue(TEST_ADMIN).0
    }
}

// ---------- Request builders ----------

fn request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Public GET
pub fn get(uri: &str) -> Request<Body> {
    request(Method::GET, uri, None, None)
}

/// Public POST with a JSON body
pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    request(Method::POST, uri, None, Some(body))
}

pub fn authed_get(uri: &str, token: &str) -> Request<Body> {
    request(Method::GET, uri, Some(token), None)
}

pub fn authed_post(uri: &str, token: &str, body: serde_json::Value) -> Request<Body> {
    request(Method::POST, uri, Some(token), Some(body))
}

pub fn authed_put(uri: &str, token: &str, body: serde_json::Value) -> Request<Body> {
    request(Method::PUT, uri, Some(token), Some(body))
}

pub fn authed_delete(uri: &str, token: &str) -> Request<Body> {
    request(Method::DELETE, uri, Some(token), None)
}

/// Login request for the harness admin.
pub fn login() -> Request<Body> {
    post_json(
        "/api/auth/login",
        json!({ "username": TEST_ADMIN, "password": TEST_PASSWORD }),
    )
}

// ---------- Response helpers ----------

/// Send a request through the router and return (status, JSON body).
pub async fn send(app: Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body_bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or_else(|_| {
            serde_json::Value::String(String::from_utf8_lossy(&body_bytes).to_string())
        })
    };
    (status, json)
}
