//! Feedback Form Handlers
//!
//! Submission is public; listing and deletion go through the generic admin
//! handlers in `content`.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
};

use super::router::AppState;
use super::types::ApiResponse;
use crate::content::{FormDraft, FormResponse};
use crate::errors::AppError;

/// POST /api/forms - all of name, email and message are required
#[tracing::instrument(skip_all)]
pub async fn submit_form(
    State(state): State<AppState>,
    payload: Result<Json<FormDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<FormResponse>>), AppError> {
    let Json(draft) = payload?;
    let response = state.store.create::<FormResponse>(draft)?;
    tracing::info!(id = %response.id, "Feedback received");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Response submitted.", response)),
    ))
}
