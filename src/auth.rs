//! Admin authentication: password hashing, bearer sessions, route guard

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::config::ServerConfig;
use crate::constants::{DEV_ADMIN_PASSWORD, DEV_ADMIN_USERNAME};
use crate::content::{AdminUser, ContentStore};
use crate::errors::{AppError, ErrorResponse, Result};
use crate::handlers::AppState;

/// Bearer authentication errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    ExpiredToken,
}

impl AuthError {
    fn message(&self) -> &'static str {
        match self {
            Self::MissingToken => "Missing Authorization: Bearer <token> header",
            Self::InvalidToken => "Invalid session token",
            Self::ExpiredToken => "Session expired, please log in again",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            success: false,
            code: "UNAUTHORIZED".to_string(),
            message: self.message().to_string(),
            details: None,
        };
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

/// Salted SHA-256, hex encoded
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Constant-time string comparison
///
/// Leaks only the length difference, which is fixed for hex digests.
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    let mut result = u8::from(a.len() != b.len());
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}

/// Upper bound on session lifetime (one year)
const MAX_SESSION_TTL_SECS: u64 = 365 * 86_400;

/// A logged-in admin
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Authenticated admin, inserted as a request extension by [`require_admin`]
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub token: String,
    pub username: String,
}

/// In-memory session tokens. Lost on restart.
pub struct SessionStore {
    sessions: DashMap<String, Session>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl: Duration::seconds(ttl_secs.min(MAX_SESSION_TTL_SECS) as i64),
        }
    }

    /// Issue a fresh opaque token for `username`.
    pub fn issue(&self, username: &str) -> (String, Session) {
        let token = uuid::Uuid::new_v4().simple().to_string();
        let session = Session {
            username: username.to_string(),
            expires_at: Utc::now() + self.ttl,
        };
        self.sessions.insert(token.clone(), session.clone());
        (token, session)
    }

    /// Look up a token. Expired tokens are removed on sight.
    pub fn validate(&self, token: &str) -> std::result::Result<Session, AuthError> {
        let session = self
            .sessions
            .get(token)
            .map(|entry| entry.value().clone())
            .ok_or(AuthError::InvalidToken)?;

        if session.is_expired(Utc::now()) {
            self.sessions.remove(token);
            return Err(AuthError::ExpiredToken);
        }
        Ok(session)
    }

    pub fn revoke(&self, token: &str) -> bool {
        self.sessions.remove(token).is_some()
    }

    /// Drop every expired session, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let before = self.sessions.len();
        self.sessions.retain(|_, session| !session.is_expired(now));
        before.saturating_sub(self.sessions.len())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    #[cfg(test)]
    fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl,
        }
    }
}

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Guard for the admin surface: requires a live bearer session.
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match bearer_token(&request) {
        Some(token) => token.to_string(),
        None => return AuthError::MissingToken.into_response(),
    };

    let session = match state.sessions.validate(&token) {
        Ok(session) => session,
        Err(e) => {
            tracing::debug!(reason = ?e, "Rejected admin request");
            return e.into_response();
        }
    };

    request.extensions_mut().insert(AdminSession {
        token,
        username: session.username,
    });

    next.run(request).await
}

/// Create an admin account, failing if the username is taken.
pub fn create_admin(store: &ContentStore, username: &str, password: &str) -> Result<AdminUser> {
    let admin = AdminUser::new(username, password)?;
    if !store.insert_admin(admin.clone()) {
        return Err(AppError::UsernameTaken(admin.username));
    }
    tracing::info!(username = %admin.username, "Admin account created");
    Ok(admin)
}

/// Ensure an admin account exists at start-up.
///
/// Configured credentials are used when both are set. Otherwise development
/// falls back to the well-known dev account and production skips with an
/// error. Returns the username created, if any.
pub fn bootstrap_admin(config: &ServerConfig, store: &ContentStore) -> Option<String> {
    let (username, password) = match (&config.admin_username, &config.admin_password) {
        (Some(user), Some(pass)) => (user.clone(), pass.clone()),
        _ if store.admin_count() > 0 => return None,
        _ if config.is_production => {
            tracing::error!(
                "No admin account exists and CLUB_ADMIN_USERNAME / CLUB_ADMIN_PASSWORD are not set. \
                 The admin dashboard is unusable until one is created (club-site create-admin)."
            );
            return None;
        }
        _ => {
            tracing::warn!(
                "CLUB_ADMIN_USERNAME / CLUB_ADMIN_PASSWORD not set - creating development admin '{}' (not for production!)",
                DEV_ADMIN_USERNAME
            );
            (DEV_ADMIN_USERNAME.to_string(), DEV_ADMIN_PASSWORD.to_string())
        }
    };

    if store.find_admin(username.trim()).is_some() {
        tracing::debug!(username = %username, "Admin already exists");
        return None;
    }

    match create_admin(store, &username, &password) {
        Ok(admin) => Some(admin.username),
        Err(e) => {
            tracing::error!("Failed to bootstrap admin account: {}", e);
            None
        }
    }
}
