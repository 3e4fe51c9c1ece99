//! HTTP API Handlers
//!
//! Each submodule handles one area of the REST API; `router` wires them up.

// Core modules
pub mod router;
pub mod state;
pub mod types;

// Health and metrics
pub mod health;

// Site content and feedback
pub mod content;
pub mod forms;

// Card gradients
pub mod gradients;

// Admin sessions
pub mod sessions;

// Test utilities (compiled only in test builds)
#[cfg(test)]
pub mod test_helpers;

// Re-export commonly used items
pub use router::{build_protected_routes, build_public_routes, build_router, AppState};
pub use state::{finish_serving, SiteManager};
pub use types::*;
