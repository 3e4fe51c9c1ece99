//! End-to-end tests for the HTTP surface.
//!
//! Every test builds the full router over a fresh temp directory and drives
//! it with `oneshot`, the same way a browser client would.
//!
//! Run with: `cargo test --test handler_tests`

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use club_site::{
    config::ServerConfig,
    content::{seed, GalleryImage, Project, TeamMember},
    gradient::{djb2, GRADIENTS},
    handlers::{build_router, SiteManager},
};

// ═══════════════════════════════════════════════════════════════════════
// Test infrastructure
// ═══════════════════════════════════════════════════════════════════════

const ADMIN: &str = "club-admin";
const PASSWORD: &str = "club-password";

struct Harness {
    manager: Arc<SiteManager>,
    temp_dir: TempDir,
}

fn config_for(temp_dir: &TempDir, seed_demo: bool) -> ServerConfig {
    ServerConfig {
        storage_path: temp_dir.path().to_path_buf(),
        seed_demo,
        admin_username: Some(ADMIN.to_string()),
        admin_password: Some(PASSWORD.to_string()),
        ..ServerConfig::default()
    }
}

impl Harness {
    fn new() -> Self {
        Self::build(false)
    }

    fn seeded() -> Self {
        Self::build(true)
    }

    fn build(seed_demo: bool) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let manager = SiteManager::new(config_for(&temp_dir, seed_demo)).unwrap();
        Self {
            manager: Arc::new(manager),
            temp_dir,
        }
    }

    fn app(&self) -> Router {
        build_router(self.manager.clone())
    }

    async fn call(&self, req: Request<Body>) -> (StatusCode, Value) {
        let resp = self.app().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, body)
    }

    async fn login(&self) -> String {
        let (status, body) = self
            .call(req(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "username": ADMIN, "password": PASSWORD })),
            ))
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["data"]["token"].as_str().unwrap().to_string()
    }
}

fn req(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn get(uri: &str) -> Request<Body> {
    req(Method::GET, uri, None, None)
}

fn titles(cards: &Value, field: &str) -> Vec<String> {
    cards
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c[field].as_str().unwrap().to_string())
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════
// Public listings
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn public_listings_follow_catalogue_order() {
    let h = Harness::seeded();

    let (status, body) = h.call(get("/api/projects")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body["data"], "title"), seed::demo_titles::<Project>());

    let (_, body) = h.call(get("/api/team")).await;
    assert_eq!(titles(&body["data"], "name"), seed::demo_titles::<TeamMember>());

    let (_, body) = h.call(get("/api/gallery")).await;
    assert_eq!(titles(&body["data"], "title"), seed::demo_titles::<GalleryImage>());
}

#[tokio::test]
async fn card_gradient_is_derived_from_document_id() {
    let h = Harness::seeded();
    let (_, body) = h.call(get("/api/events")).await;

    for card in body["data"].as_array().unwrap() {
        let id = card["id"].as_str().unwrap();
        let expected = djb2(id).unsigned_abs() as usize % GRADIENTS.len();
        assert_eq!(card["gradient"]["index"], expected);
        assert_eq!(card["gradient"]["gradient_id"], GRADIENTS[expected].id);
        assert_eq!(
            card["gradient"]["render"]["className"],
            GRADIENTS[expected].class_name.unwrap()
        );
    }

    // Same request twice renders identically
    let (_, again) = h.call(get("/api/events")).await;
    assert_eq!(body["data"], again["data"]);
}

#[tokio::test]
async fn inline_styles_when_classes_unsupported() {
    let h = Harness::seeded();
    let (_, body) = h.call(get("/api/gallery?style_classes=false")).await;

    for card in body["data"].as_array().unwrap() {
        let render = &card["gradient"]["render"];
        assert_eq!(render["kind"], "inline_style");
        assert!(render["backgroundImage"]
            .as_str()
            .unwrap()
            .starts_with("linear-gradient(135deg,#"));
        assert!(render.get("className").is_none());
    }
}

#[tokio::test]
async fn gradient_resolution_endpoint() {
    let h = Harness::new();

    let (status, body) = h.call(get("/api/gradients/resolve?key=abc")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["index"], 11);
    assert_eq!(body["data"]["gradient_id"], "sky-blue");

    let (_, body) = h.call(get("/api/gradients/resolve?key=")).await;
    assert_eq!(body["data"]["index"], 5);

    let (_, body) = h.call(get("/api/gradients")).await;
    assert_eq!(body["data"]["gradients"].as_array().unwrap().len(), 16);
}

// ═══════════════════════════════════════════════════════════════════════
// Admin surface
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn admin_routes_reject_missing_token() {
    let h = Harness::new();
    let cases = [
        (Method::GET, "/api/admin/projects"),
        (Method::POST, "/api/admin/team"),
        (Method::DELETE, "/api/forms/admin/00000000-0000-0000-0000-000000000000"),
        (Method::GET, "/api/admin/stats"),
        (Method::POST, "/api/auth/logout"),
    ];

    for (method, uri) in cases {
        let (status, body) = h.call(req(method.clone(), uri, None, Some(json!({})))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
        assert_eq!(body["success"], false);
    }
}

#[tokio::test]
async fn project_crud_round_trip() {
    let h = Harness::new();
    let token = h.login().await;

    let (status, body) = h
        .call(req(
            Method::POST,
            "/api/admin/projects",
            Some(&token),
            Some(json!({
                "title": "Campus Energy Forecaster",
                "description": "Predicts building load from weather data.",
                "tags": ["Forecasting", "Python"],
                "github": "https://github.com/club/energy"
            })),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = h
        .call(req(
            Method::PUT,
            &format!("/api/admin/projects/{id}"),
            Some(&token),
            Some(json!({ "tags": ["Forecasting"] })),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "Campus Energy Forecaster");
    assert_eq!(body["data"]["tags"], json!(["Forecasting"]));

    let (_, body) = h.call(get("/api/projects")).await;
    assert_eq!(body["data"][0]["id"], id.as_str());
    assert_eq!(body["data"][0]["tags"], json!(["Forecasting"]));

    let (status, _) = h
        .call(req(
            Method::DELETE,
            &format!("/api/admin/projects/{id}"),
            Some(&token),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = h.call(get("/api/projects")).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn invalid_documents_are_rejected() {
    let h = Harness::new();
    let token = h.login().await;

    let (status, body) = h
        .call(req(
            Method::POST,
            "/api/admin/team",
            Some(&token),
            Some(json!({ "name": "   ", "role": "Lead" })),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");

    let (status, _) = h
        .call(req(
            Method::POST,
            "/api/admin/gallery",
            Some(&token),
            Some(json!({ "src": "not a url", "alt": "Hackathon" })),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = h
        .call(req(
            Method::PUT,
            "/api/admin/team/00000000-0000-0000-0000-000000000000",
            Some(&token),
            Some(json!({ "role": "Treasurer" })),
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn malformed_requests_use_the_error_envelope() {
    let h = Harness::new();
    let token = h.login().await;

    let (status, body) = h
        .call(req(
            Method::POST,
            "/api/admin/projects",
            Some(&token),
            Some(json!({ "title": "x", "tags": "notalist" })),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "INVALID_INPUT");
    assert_eq!(body["details"], "body");

    let no_content_type = Request::builder()
        .method(Method::POST)
        .uri("/api/forms")
        .body(Body::from("name=Ada"))
        .unwrap();
    let (status, body) = h.call(no_content_type).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");

    for uri in [
        "/api/projects?style_classes=maybe",
        "/api/gradients?style_classes=2",
        "/api/gradients/resolve?key=abc&style_classes=yes",
    ] {
        let (status, body) = h.call(get(uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["code"], "INVALID_INPUT", "{uri}");
        assert_eq!(body["details"], "query", "{uri}");
    }
}

#[tokio::test]
async fn form_responses_reach_the_dashboard() {
    let h = Harness::new();
    let token = h.login().await;

    let (status, _) = h
        .call(req(
            Method::POST,
            "/api/forms",
            None,
            Some(json!({
                "name": "Grace",
                "email": "grace@example.edu",
                "message": "When is the next workshop?"
            })),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = h
        .call(req(Method::GET, "/api/forms/admin", Some(&token), None))
        .await;
    assert_eq!(status, StatusCode::OK);
    let id = body["data"][0]["id"].as_str().unwrap().to_string();

    let (status, _) = h
        .call(req(
            Method::DELETE,
            &format!("/api/forms/admin/{id}"),
            Some(&token),
            None,
        ))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = h
        .call(req(Method::GET, "/api/admin/stats", Some(&token), None))
        .await;
    assert_eq!(body["data"]["forms"], 0);
}

#[tokio::test]
async fn logout_ends_the_session() {
    let h = Harness::new();
    let token = h.login().await;

    let (status, _) = h
        .call(req(Method::POST, "/api/auth/logout", Some(&token), Some(json!({}))))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = h
        .call(req(Method::GET, "/api/admin/projects", Some(&token), None))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ═══════════════════════════════════════════════════════════════════════
// Persistence and infrastructure
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn snapshot_survives_restart() {
    let h = Harness::new();
    let token = h.login().await;

    let (status, body) = h
        .call(req(
            Method::POST,
            "/api/admin/events",
            Some(&token),
            Some(json!({ "title": "Kaggle Night", "venue": "Lab 3" })),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    assert!(h.manager.flush().unwrap());

    let reopened = SiteManager::new(config_for(&h.temp_dir, false)).unwrap();
    let event = reopened
        .store
        .get::<club_site::content::Event>(&id)
        .unwrap();
    assert_eq!(event.title, "Kaggle Night");
    assert_eq!(reopened.store.admin_count(), 1);
}

#[tokio::test]
async fn health_probes() {
    let h = Harness::seeded();

    let (status, body) = h.call(get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["documents"], 32);

    let (status, _) = h.call(get("/health/live")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = h.call(get("/health/ready")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["admins"], 1);
}

#[tokio::test]
async fn metrics_endpoint_serves_text() {
    let _ = club_site::metrics::register_metrics();
    let h = Harness::seeded();
    h.call(get("/api/projects")).await;

    let (status, body) = h.call(get("/metrics")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_str().unwrap().contains("club_gradient_resolutions_total"));
}
