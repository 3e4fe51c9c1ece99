//! API Request/Response Types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::ContentCounts;
use crate::gradient::{Gradient, Resolution};

// =============================================================================
// ENVELOPE
// =============================================================================

/// Success envelope shared by every endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// Envelope with no payload
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }
}

// =============================================================================
// CARDS & GRADIENTS
// =============================================================================

/// A document as shown on the public site, with its card gradient
#[derive(Debug, Serialize)]
pub struct Card<D> {
    #[serde(flatten)]
    pub document: D,
    pub gradient: Resolution,
}

/// `?style_classes=true|false` override of the configured capability
#[derive(Debug, Default, Deserialize)]
pub struct RenderQuery {
    pub style_classes: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    /// Card key: a document id, or a title for unsaved drafts
    #[serde(default)]
    pub key: String,
    pub style_classes: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct GradientTableResponse {
    pub supports_style_classes: bool,
    pub gradients: &'static [Gradient],
}

// =============================================================================
// AUTH
// =============================================================================

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub id: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// DASHBOARD
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub counts: ContentCounts,
    pub active_sessions: usize,
    pub snapshot_pending: bool,
}
