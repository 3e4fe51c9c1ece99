//! Gradient Handlers
//!
//! Expose the preset table and key resolution so clients rendering drafts
//! (no id yet) get the same colour the server will assign.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    response::Json,
};

use super::router::AppState;
use super::types::{ApiResponse, GradientTableResponse, RenderQuery, ResolveQuery};
use crate::errors::AppError;
use crate::gradient::Resolution;
use crate::metrics;

/// GET /api/gradients
pub async fn list_gradients(
    State(state): State<AppState>,
    query: Result<Query<RenderQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<GradientTableResponse>>, AppError> {
    let Query(query) = query?;
    let resolver = state.resolver(query.style_classes);
    Ok(Json(ApiResponse::ok(
        "Gradients fetched.",
        GradientTableResponse {
            supports_style_classes: resolver.supports_style_classes(),
            gradients: resolver.table(),
        },
    )))
}

/// GET /api/gradients/resolve?key=... - total over every key, empty included
#[tracing::instrument(skip_all)]
pub async fn resolve_gradient(
    State(state): State<AppState>,
    query: Result<Query<ResolveQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Resolution>>, AppError> {
    let Query(query) = query?;
    let resolution = state.resolver(query.style_classes).resolution(&query.key);
    metrics::record_gradient(resolution.render.kind());

    Ok(Json(ApiResponse::ok("Gradient resolved.", resolution)))
}
