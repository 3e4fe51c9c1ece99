//! Club Site Library
//!
//! Content API for a student club website: public listings of projects,
//! events, team members and gallery images, a feedback form, and an admin
//! dashboard behind bearer sessions.
//!
//! # Key Features
//! - Deterministic card gradients: a djb2 hash of each card's key picks one
//!   of 16 presets, rendered as utility classes or inline CSS
//! - In-process document store with an atomic JSON snapshot
//! - Prometheus metrics and structured logging

pub mod auth;
pub mod config;
pub mod constants;
pub mod content;
pub mod errors;
pub mod gradient;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod tracing_setup;
pub mod validation;

// Re-export dependencies to ensure tests/benchmarks use the same version
pub use chrono;
pub use uuid;
