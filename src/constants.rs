//! Server-wide constants
//!
//! Tunable defaults live in `config`; these are the fixed values the rest of
//! the crate agrees on.

// =============================================================================
// STORAGE
// =============================================================================

/// Snapshot file written under the storage directory
pub const SNAPSHOT_FILE_NAME: &str = "site.json";

/// Current snapshot schema version
///
/// Older files load with missing fields defaulted. Newer files load with a
/// warning.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Default storage directory
pub const DEFAULT_STORAGE_PATH: &str = "./club_site_data";

/// Default seconds between background snapshot flushes
pub const DEFAULT_SNAPSHOT_INTERVAL_SECS: u64 = 30;

// =============================================================================
// SESSIONS
// =============================================================================

/// Admin session lifetime (24 hours)
pub const DEFAULT_SESSION_TTL_SECS: u64 = 86_400;

/// Development-only admin credentials, used when none are configured
pub const DEV_ADMIN_USERNAME: &str = "admin";
pub const DEV_ADMIN_PASSWORD: &str = "admin123";

// =============================================================================
// SHUTDOWN
// =============================================================================

/// Upper bound on draining in-flight requests after a shutdown signal
pub const GRACEFUL_SHUTDOWN_TIMEOUT_SECS: u64 = 30;

/// Upper bound on the final snapshot flush during shutdown
///
/// The flush is synchronous file I/O run on the blocking pool; if the disk
/// hangs the process still exits.
pub const SNAPSHOT_FLUSH_TIMEOUT_SECS: u64 = 10;
