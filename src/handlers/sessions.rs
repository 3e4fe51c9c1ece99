//! Admin Session Handlers
//!
//! Login, development-only registration, and logout.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
    Extension,
};

use super::router::AppState;
use super::types::{ApiResponse, LoginRequest, LoginResponse, RegisterResponse};
use crate::auth::{self, AdminSession};
use crate::errors::AppError;
use crate::metrics;

/// POST /api/auth/login
#[tracing::instrument(skip_all, fields(username = tracing::field::Empty))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<LoginResponse>>, AppError> {
    let Json(req) = payload.inspect_err(|_| metrics::record_login("rejected"))?;
    tracing::Span::current().record("username", req.username.as_str());
    let username = req.username.trim();
    if username.is_empty() || req.password.is_empty() {
        metrics::record_login("rejected");
        return Err(AppError::invalid(
            "username",
            "username and password are required",
        ));
    }

    let admin = state
        .store
        .find_admin(username)
        .filter(|admin| admin.verify_password(&req.password));

    let Some(admin) = admin else {
        metrics::record_login("invalid");
        tracing::warn!("Failed admin login");
        return Err(AppError::InvalidCredentials);
    };

    let (token, session) = state.sessions.issue(&admin.username);
    metrics::record_login("success");
    tracing::info!("Admin logged in");

    Ok(Json(ApiResponse::ok(
        "Login successful.",
        LoginResponse {
            token,
            username: session.username,
            expires_at: session.expires_at,
        },
    )))
}

/// POST /api/auth/register - refused in production
#[tracing::instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<RegisterResponse>>), AppError> {
    if state.server_config().is_production {
        return Err(AppError::RegistrationDisabled);
    }
    let Json(req) = payload?;

    let admin = auth::create_admin(&state.store, &req.username, &req.password)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            "Admin registered.",
            RegisterResponse {
                id: admin.id,
                username: admin.username,
                created_at: admin.created_at,
            },
        )),
    ))
}

/// POST /api/auth/logout - revoke the presented token
#[tracing::instrument(skip_all, fields(username = %session.username))]
pub async fn logout(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
) -> Json<ApiResponse<()>> {
    state.sessions.revoke(&session.token);
    tracing::info!("Admin logged out");
    Json(ApiResponse::message("Logged out."))
}
