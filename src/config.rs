//! Configuration for the club site server
//!
//! Sensible defaults for local development, every value overridable through
//! `CLUB_*` environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

use crate::constants::{
    DEFAULT_SESSION_TTL_SECS, DEFAULT_SNAPSHOT_INTERVAL_SECS, DEFAULT_STORAGE_PATH,
};

/// Parse an environment variable, ignoring unset or unparsable values
fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// "true"/"1"/"yes" (any case) is true, "false"/"0"/"no" is false
fn env_flag(key: &str) -> Option<bool> {
    let val = env::var(key).ok()?;
    match val.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

fn env_list(key: &str) -> Option<Vec<String>> {
    env::var(key).ok().map(|v| {
        v.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
}

fn is_production_env() -> bool {
    env::var("CLUB_ENV")
        .map(|v| {
            let v = v.to_lowercase();
            v == "production" || v == "prod"
        })
        .unwrap_or(false)
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable console output
    #[default]
    Pretty,
    /// One JSON object per line, for log shippers
    Json,
}

impl LogFormat {
    pub fn from_env() -> Self {
        match env::var("CLUB_LOG_FORMAT") {
            Ok(v) if v.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Allowed origins (empty = allow all)
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
    pub allow_credentials: bool,
    /// Max age for preflight cache (seconds)
    pub max_age_seconds: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            allowed_methods: ["GET", "POST", "PUT", "DELETE", "OPTIONS"]
                .map(String::from)
                .to_vec(),
            allowed_headers: ["Content-Type", "Authorization"]
                .map(String::from)
                .to_vec(),
            allow_credentials: false,
            max_age_seconds: 86400,
        }
    }
}

impl CorsConfig {
    /// Load from environment; warns when production runs with open CORS.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(origins) = env_list("CLUB_CORS_ORIGINS") {
            config.allowed_origins = origins;
        }

        if let Some(methods) = env_list("CLUB_CORS_METHODS") {
            config.allowed_methods = methods.into_iter().map(|m| m.to_uppercase()).collect();
        }

        if let Some(headers) = env_list("CLUB_CORS_HEADERS") {
            config.allowed_headers = headers;
        }

        if let Some(flag) = env_flag("CLUB_CORS_CREDENTIALS") {
            config.allow_credentials = flag;
        }

        if let Some(n) = env_parse("CLUB_CORS_MAX_AGE") {
            config.max_age_seconds = n;
        }

        if is_production_env() && config.allowed_origins.is_empty() {
            tracing::warn!(
                "PRODUCTION WARNING: CORS allows all origins. Set CLUB_CORS_ORIGINS to the site's origin."
            );
        }

        config
    }

    pub fn is_restricted(&self) -> bool {
        !self.allowed_origins.is_empty()
    }

    /// Convert to tower-http CorsLayer
    pub fn to_layer(&self) -> tower_http::cors::CorsLayer {
        use tower_http::cors::{AllowOrigin, Any, CorsLayer};

        let mut layer = CorsLayer::new();

        if self.allowed_origins.is_empty() {
            layer = layer.allow_origin(Any);
        } else {
            let mut valid_origins = Vec::new();
            for origin in &self.allowed_origins {
                match origin.parse::<axum::http::HeaderValue>() {
                    Ok(value) => valid_origins.push(value),
                    Err(_) => tracing::warn!("CORS: Invalid origin '{}' - skipping", origin),
                }
            }

            if valid_origins.is_empty() {
                // Never fall back to permissive on a broken origin list
                tracing::error!(
                    "CORS: none of the {} configured origin(s) parsed. Rejecting all cross-origin requests.",
                    self.allowed_origins.len()
                );
            }
            layer = layer.allow_origin(AllowOrigin::list(valid_origins));
        }

        let methods: Vec<axum::http::Method> = self
            .allowed_methods
            .iter()
            .filter_map(|m| m.parse().ok())
            .collect();
        layer = if methods.is_empty() {
            layer.allow_methods(Any)
        } else {
            layer.allow_methods(methods)
        };

        let headers: Vec<axum::http::HeaderName> = self
            .allowed_headers
            .iter()
            .filter_map(|h| h.parse().ok())
            .collect();
        layer = if headers.is_empty() {
            layer.allow_headers(Any)
        } else {
            layer.allow_headers(headers)
        };

        if self.allow_credentials {
            layer = layer.allow_credentials(true);
        }

        layer.max_age(std::time::Duration::from_secs(self.max_age_seconds))
    }
}

/// Server configuration loaded from environment with defaults
#[derive(Clone)]
pub struct ServerConfig {
    /// Bind address (default: 127.0.0.1, use 0.0.0.0 in containers)
    pub host: String,

    /// Server port (default: 5000)
    pub port: u16,

    /// Directory holding the `site.json` snapshot
    pub storage_path: PathBuf,

    /// Whether cards are rendered with utility classes (default: true).
    /// When false every card gets an inline CSS gradient instead.
    pub supports_style_classes: bool,

    /// Admin session lifetime in seconds (default: 86400)
    pub session_ttl_secs: u64,

    /// Seconds between background snapshot flushes (default: 30, 0 disables)
    pub snapshot_interval_secs: u64,

    /// Seed the demo catalogue into an empty store at start-up
    pub seed_demo: bool,

    /// Admin account bootstrapped at start-up
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,

    /// Rate limit on the admin surface: requests per second (default: 50)
    pub rate_limit_per_second: u64,

    /// Rate limit burst size (default: 100)
    pub rate_limit_burst: u32,

    /// Maximum concurrent requests (default: 200)
    pub max_concurrent_requests: usize,

    /// Request timeout in seconds (default: 60)
    pub request_timeout_secs: u64,

    pub is_production: bool,

    pub log_format: LogFormat,

    pub cors: CorsConfig,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("storage_path", &self.storage_path)
            .field("supports_style_classes", &self.supports_style_classes)
            .field("session_ttl_secs", &self.session_ttl_secs)
            .field("snapshot_interval_secs", &self.snapshot_interval_secs)
            .field("seed_demo", &self.seed_demo)
            .field("admin_username", &self.admin_username)
            .field(
                "admin_password",
                &self.admin_password.as_ref().map(|_| "<redacted>"),
            )
            .field("rate_limit_per_second", &self.rate_limit_per_second)
            .field("rate_limit_burst", &self.rate_limit_burst)
            .field("max_concurrent_requests", &self.max_concurrent_requests)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("is_production", &self.is_production)
            .field("log_format", &self.log_format)
            .field("cors", &self.cors)
            .finish()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            supports_style_classes: true,
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
            snapshot_interval_secs: DEFAULT_SNAPSHOT_INTERVAL_SECS,
            seed_demo: false,
            admin_username: None,
            admin_password: None,
            rate_limit_per_second: 50,
            rate_limit_burst: 100,
            max_concurrent_requests: 200,
            request_timeout_secs: 60,
            is_production: false,
            log_format: LogFormat::Pretty,
            cors: CorsConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults
    #[allow(clippy::field_reassign_with_default)]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.is_production = is_production_env();

        if let Ok(val) = env::var("CLUB_HOST") {
            config.host = val;
        }

        if let Some(port) = env_parse("CLUB_PORT") {
            config.port = port;
        }

        if let Ok(val) = env::var("CLUB_DATA_PATH") {
            config.storage_path = PathBuf::from(val);
        }

        if let Some(flag) = env_flag("CLUB_STYLE_CLASSES") {
            config.supports_style_classes = flag;
        }

        if let Some(ttl) = env_parse::<u64>("CLUB_SESSION_TTL") {
            // A zero TTL would reject every token as soon as it is issued
            config.session_ttl_secs = ttl.max(1);
        }

        if let Some(n) = env_parse("CLUB_SNAPSHOT_INTERVAL") {
            config.snapshot_interval_secs = n;
        }

        if let Some(flag) = env_flag("CLUB_SEED_DEMO") {
            config.seed_demo = flag;
        }

        config.admin_username = env::var("CLUB_ADMIN_USERNAME")
            .ok()
            .filter(|v| !v.trim().is_empty());
        config.admin_password = env::var("CLUB_ADMIN_PASSWORD")
            .ok()
            .filter(|v| !v.is_empty());

        if let Some(n) = env_parse("CLUB_RATE_LIMIT") {
            config.rate_limit_per_second = n;
        }

        if let Some(n) = env_parse("CLUB_RATE_BURST") {
            config.rate_limit_burst = n;
        }

        if let Some(n) = env_parse::<usize>("CLUB_MAX_CONCURRENT") {
            config.max_concurrent_requests = n.max(1);
        }

        if let Some(n) = env_parse("CLUB_REQUEST_TIMEOUT") {
            config.request_timeout_secs = n;
        }

        config.log_format = LogFormat::from_env();
        config.cors = CorsConfig::from_env();

        config
    }

    /// Log the current configuration
    pub fn log(&self) {
        info!("Configuration:");
        info!(
            "   Mode: {}",
            if self.is_production {
                "PRODUCTION"
            } else {
                "Development"
            }
        );
        info!("   Listen: {}:{}", self.host, self.port);
        info!("   Storage: {:?}", self.storage_path);
        info!(
            "   Card gradients: {}",
            if self.supports_style_classes {
                "utility classes"
            } else {
                "inline CSS"
            }
        );
        info!("   Session TTL: {}s", self.session_ttl_secs);
        if self.snapshot_interval_secs > 0 {
            info!("   Snapshot interval: {}s", self.snapshot_interval_secs);
        } else {
            info!("   Snapshot interval: disabled (flush on shutdown only)");
        }
        if self.rate_limit_per_second > 0 {
            info!(
                "   Admin rate limit: {} req/sec (burst: {})",
                self.rate_limit_per_second, self.rate_limit_burst
            );
        } else {
            info!("   Admin rate limit: disabled");
        }
        info!("   Max concurrent: {}", self.max_concurrent_requests);
        info!("   Request timeout: {}s", self.request_timeout_secs);
        if self.cors.is_restricted() {
            info!("   CORS origins: {:?}", self.cors.allowed_origins);
        } else {
            info!("   CORS: Permissive (all origins allowed)");
        }
    }
}

/// Environment variable documentation
pub fn print_env_help() {
    println!("Club Site Configuration Environment Variables:");
    println!();
    println!("  CLUB_ENV               - Set to 'production' or 'prod' for production mode");
    println!("  CLUB_HOST              - Bind address (default: 127.0.0.1, use 0.0.0.0 for Docker)");
    println!("  CLUB_PORT              - Server port (default: 5000)");
    println!("  CLUB_DATA_PATH         - Storage directory (default: {DEFAULT_STORAGE_PATH})");
    println!("  CLUB_STYLE_CLASSES     - Render card gradients as utility classes true/false (default: true)");
    println!("  CLUB_SESSION_TTL       - Admin session lifetime in seconds (default: {DEFAULT_SESSION_TTL_SECS})");
    println!("  CLUB_SNAPSHOT_INTERVAL - Seconds between snapshot flushes, 0 disables (default: {DEFAULT_SNAPSHOT_INTERVAL_SECS})");
    println!("  CLUB_SEED_DEMO         - Seed demo content into an empty store true/false (default: false)");
    println!("  CLUB_RATE_LIMIT        - Admin requests per second (default: 50)");
    println!("  CLUB_RATE_BURST        - Admin burst size (default: 100)");
    println!("  CLUB_MAX_CONCURRENT    - Max concurrent requests (default: 200)");
    println!("  CLUB_REQUEST_TIMEOUT   - Request timeout in seconds (default: 60)");
    println!("  CLUB_LOG_FORMAT        - 'json' for JSON logs (default: pretty)");
    println!();
    println!("Admin Bootstrap:");
    println!("  CLUB_ADMIN_USERNAME    - Admin account created at start-up if missing");
    println!("  CLUB_ADMIN_PASSWORD    - Password for that account (required in production)");
    println!();
    println!("CORS Configuration:");
    println!("  CLUB_CORS_ORIGINS      - Comma-separated allowed origins (default: all)");
    println!("  CLUB_CORS_METHODS      - Comma-separated allowed methods (default: GET,POST,PUT,DELETE,OPTIONS)");
    println!("  CLUB_CORS_HEADERS      - Comma-separated allowed headers (default: Content-Type,Authorization)");
    println!("  CLUB_CORS_CREDENTIALS  - Allow credentials true/false (default: false)");
    println!("  CLUB_CORS_MAX_AGE      - Preflight cache seconds (default: 86400)");
    println!();
    println!("  RUST_LOG               - Log level (e.g., info, debug, trace)");
    println!();
}
