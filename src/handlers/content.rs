//! Content Handlers
//!
//! Public card listings and the admin CRUD surface. Every handler is generic
//! over the document type, so one set of functions serves projects, events,
//! team members, gallery images and form responses.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::Json,
};

use super::router::AppState;
use super::types::{ApiResponse, Card, RenderQuery, StatsResponse};
use crate::content::{Document, Editable};
use crate::errors::AppError;
use crate::metrics;

// =============================================================================
// PUBLIC
// =============================================================================

/// GET /api/{collection} - documents newest first, each with its gradient
#[tracing::instrument(skip_all, fields(collection = D::COLLECTION.as_str()))]
pub async fn list_cards<D: Document>(
    State(state): State<AppState>,
    query: Result<Query<RenderQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<Card<D>>>>, AppError> {
    let Query(query) = query?;
    let resolver = state.resolver(query.style_classes);

    let cards: Vec<Card<D>> = state
        .store
        .list::<D>()
        .into_iter()
        .map(|document| {
            let gradient = resolver.resolution(document.gradient_key());
            metrics::record_gradient(gradient.render.kind());
            Card { document, gradient }
        })
        .collect();

    Ok(Json(ApiResponse::ok(
        format!("{} fetched.", D::COLLECTION.plural_label()),
        cards,
    )))
}

// =============================================================================
// ADMIN
// =============================================================================

/// GET /api/admin/{collection} - raw documents, newest first
#[tracing::instrument(skip(state), fields(collection = D::COLLECTION.as_str()))]
pub async fn list_documents<D: Document>(
    State(state): State<AppState>,
) -> Json<ApiResponse<Vec<D>>> {
    let docs = state.store.list::<D>();
    Json(ApiResponse::ok(
        format!("{} fetched.", D::COLLECTION.plural_label()),
        docs,
    ))
}

/// POST /api/admin/{collection}
#[tracing::instrument(skip(state, payload), fields(collection = D::COLLECTION.as_str()))]
pub async fn create_document<D: Document>(
    State(state): State<AppState>,
    payload: Result<Json<D::Draft>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<D>>), AppError> {
    let Json(draft) = payload?;
    let doc = state.store.create::<D>(draft)?;
    tracing::info!(id = doc.id(), "{} created", D::COLLECTION.label());

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            format!("{} created.", D::COLLECTION.label()),
            doc,
        )),
    ))
}

/// PUT /api/admin/{collection}/{id} - partial update
#[tracing::instrument(skip(state, payload), fields(collection = D::COLLECTION.as_str()))]
pub async fn update_document<D: Editable>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<D::Patch>, JsonRejection>,
) -> Result<Json<ApiResponse<D>>, AppError> {
    let Json(patch) = payload?;
    let doc = state.store.update::<D>(&id, patch)?;
    tracing::info!(id = doc.id(), "{} updated", D::COLLECTION.label());

    Ok(Json(ApiResponse::ok(
        format!("{} updated.", D::COLLECTION.label()),
        doc,
    )))
}

/// DELETE /api/admin/{collection}/{id}
#[tracing::instrument(skip(state), fields(collection = D::COLLECTION.as_str()))]
pub async fn delete_document<D: Document>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<D>>, AppError> {
    let doc = state.store.delete::<D>(&id)?;
    tracing::info!(id = doc.id(), "{} deleted", D::COLLECTION.label());

    Ok(Json(ApiResponse::ok(
        format!("{} deleted.", D::COLLECTION.label()),
        doc,
    )))
}

/// GET /api/admin/stats - dashboard counts
pub async fn content_stats(State(state): State<AppState>) -> Json<ApiResponse<StatsResponse>> {
    Json(ApiResponse::ok(
        "Stats fetched.",
        StatsResponse {
            counts: state.store.counts(),
            active_sessions: state.sessions.len(),
            snapshot_pending: state.store.is_dirty(),
        },
    ))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::handlers::test_helpers::{
        authed_delete, authed_get, authed_post, authed_put, get, post_json, send, TestHarness,
    };

    #[tokio::test]
    async fn test_public_cards_carry_gradients() {
        let h = TestHarness::seeded();
        let (status, body) = send(h.router(), get("/api/projects")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Projects fetched.");
        let cards = body["data"].as_array().unwrap();
        assert_eq!(cards.len(), 8);
        assert_eq!(cards[0]["title"], "Neural Market Predictor");
        for card in cards {
            let gradient = &card["gradient"];
            assert!(gradient["index"].as_u64().unwrap() < 16);
            assert_eq!(gradient["render"]["kind"], "class");
        }
    }

    #[tokio::test]
    async fn test_admin_routes_require_token() {
        let h = TestHarness::new();
        for uri in ["/api/admin/projects", "/api/admin/stats", "/api/forms/admin"] {
            let (status, body) = send(h.router(), get(uri)).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
            assert_eq!(body["success"], false);
        }

        let (status, _) = send(h.router(), authed_get("/api/admin/team", "not-a-token")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_event_crud_lifecycle() {
        let h = TestHarness::new();
        let token = h.token();

        let (status, body) = send(
            h.router(),
            authed_post(
                "/api/admin/events",
                &token,
                json!({ "title": "Data Ethics Panel", "venue": "Auditorium B" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = body["data"]["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            h.router(),
            authed_put(
                &format!("/api/admin/events/{id}"),
                &token,
                json!({ "time": "4:00 PM - 6:00 PM" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["venue"], "Auditorium B");
        assert_eq!(body["data"]["time"], "4:00 PM - 6:00 PM");

        let (_, body) = send(h.router(), get("/api/events")).await;
        assert_eq!(body["data"][0]["id"], id.as_str());

        let (status, _) = send(
            h.router(),
            authed_delete(&format!("/api/admin/events/{id}"), &token),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            h.router(),
            authed_delete(&format!("/api/admin/events/{id}"), &token),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], format!("Event not found: {id}"));
    }

    #[tokio::test]
    async fn test_malformed_id_is_bad_request() {
        let h = TestHarness::new();
        let token = h.token();
        let (status, body) = send(
            h.router(),
            authed_put("/api/admin/gallery/123", &token, json!({ "alt": "x" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_ID");
    }

    #[tokio::test]
    async fn test_forms_submit_and_admin_list() {
        let h = TestHarness::new();
        let token = h.token();

        let (status, body) = send(
            h.router(),
            post_json("/api/forms", json!({ "name": "Ada", "email": "ada@example.edu" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_INPUT");

        let (status, _) = send(
            h.router(),
            post_json(
                "/api/forms",
                json!({ "name": "Ada", "email": "ada@example.edu", "message": "Great talk" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (_, body) = send(h.router(), authed_get("/api/forms/admin", &token)).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["data"][0]["message"], "Great talk");
    }

    #[tokio::test]
    async fn test_stats_counts_collections() {
        let h = TestHarness::seeded();
        let token = h.token();
        let (status, body) = send(h.router(), authed_get("/api/admin/stats", &token)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["projects"], 8);
        assert_eq!(body["data"]["gallery"], 8);
        assert_eq!(body["data"]["forms"], 0);
        assert_eq!(body["data"]["admins"], 1);
        assert_eq!(body["data"]["active_sessions"], 1);
    }
}
