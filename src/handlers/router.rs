//! Router Configuration - Centralized route definitions
//!
//! Routes are split into public (the site itself, health, metrics, login)
//! and protected (the admin dashboard, bearer session required).

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use super::state::SiteManager;
use super::{content, forms, gradients, health, sessions};
use crate::auth;
use crate::content::{Editable, Event, FormResponse, GalleryImage, Project, TeamMember};

/// Application state type alias
pub type AppState = Arc<SiteManager>;

/// Build the public routes (no authentication required)
pub fn build_public_routes(state: AppState) -> Router {
    Router::new()
        // =================================================================
        // HEALTH & KUBERNETES PROBES
        // =================================================================
        .route("/health", get(health::health))
        .route("/health/live", get(health::health_live))
        .route("/health/ready", get(health::health_ready))
        // =================================================================
        // METRICS (PROMETHEUS)
        // =================================================================
        .route("/metrics", get(health::metrics_endpoint))
        // =================================================================
        // SITE CONTENT (CARDS WITH GRADIENTS)
        // =================================================================
        .route("/api/projects", get(content::list_cards::<Project>))
        .route("/api/events", get(content::list_cards::<Event>))
        .route("/api/team", get(content::list_cards::<TeamMember>))
        .route("/api/gallery", get(content::list_cards::<GalleryImage>))
        .route("/api/forms", post(forms::submit_form))
        // =================================================================
        // GRADIENTS
        // =================================================================
        .route("/api/gradients", get(gradients::list_gradients))
        .route("/api/gradients/resolve", get(gradients::resolve_gradient))
        // =================================================================
        // AUTH
        // =================================================================
        .route("/api/auth/login", post(sessions::login))
        .route("/api/auth/register", post(sessions::register))
        .with_state(state)
}

/// `/api/admin/{collection}` list + create and `/{id}` update + delete
fn admin_collection<D: Editable>(router: Router<AppState>) -> Router<AppState> {
    let base = format!("/api/admin/{}", D::COLLECTION.as_str());
    router
        .route(
            &base,
            get(content::list_documents::<D>).post(content::create_document::<D>),
        )
        .route(
            &format!("{base}/{{id}}"),
            put(content::update_document::<D>).delete(content::delete_document::<D>),
        )
}

/// Build the protected admin routes
///
/// The session guard is applied here; rate limiting is left to the caller.
pub fn build_protected_routes(state: AppState) -> Router {
    let router = Router::new()
        // =================================================================
        // DASHBOARD
        // =================================================================
        .route("/api/admin/stats", get(content::content_stats))
        // =================================================================
        // FEEDBACK RESPONSES
        // =================================================================
        .route(
            "/api/forms/admin",
            get(content::list_documents::<FormResponse>),
        )
        .route(
            "/api/forms/admin/{id}",
            delete(content::delete_document::<FormResponse>),
        )
        // =================================================================
        // SESSION
        // =================================================================
        .route("/api/auth/logout", post(sessions::logout));

    // =================================================================
    // CONTENT CRUD
    // =================================================================
    let router = admin_collection::<Project>(router);
    let router = admin_collection::<Event>(router);
    let router = admin_collection::<TeamMember>(router);
    let router = admin_collection::<GalleryImage>(router);

    router
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin,
        ))
        .with_state(state)
}

/// Build the complete router (public + protected routes)
pub fn build_router(state: AppState) -> Router {
    let public = build_public_routes(state.clone());
    let protected = build_protected_routes(state);

    Router::new().merge(public).merge(protected)
}
