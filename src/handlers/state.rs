//! Site Manager - Core State
//!
//! Owns the content store, admin sessions and the gradient resolver shared
//! by every handler.

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::auth::{self, SessionStore};
use crate::config::ServerConfig;
use crate::constants::SNAPSHOT_FLUSH_TIMEOUT_SECS;
use crate::content::{seed, ContentStore};
use crate::gradient::GradientResolver;

/// Central state for the server
pub struct SiteManager {
    config: ServerConfig,

    /// Documents and admin accounts
    pub store: ContentStore,

    /// Live admin sessions
    pub sessions: SessionStore,

    /// Resolver carrying the configured capability flag
    resolver: GradientResolver,
}

impl SiteManager {
    /// Open the store under `config.storage_path`, then seed and bootstrap
    /// the admin account as configured.
    pub fn new(config: ServerConfig) -> Result<Self> {
        let store = ContentStore::open(&config.storage_path)?;
        Self::with_store(config, store)
    }

    pub fn with_store(config: ServerConfig, store: ContentStore) -> Result<Self> {
        if config.seed_demo {
            seed::seed_demo(&store)?;
        }
        auth::bootstrap_admin(&config, &store);

        let resolver = GradientResolver::new(config.supports_style_classes);
        let sessions = SessionStore::new(config.session_ttl_secs);

        let counts = store.counts();
        info!(
            "Site manager ready: {} projects, {} events, {} team, {} gallery, {} responses, {} admins",
            counts.projects,
            counts.events,
            counts.team,
            counts.gallery,
            counts.forms,
            counts.admins
        );

        Ok(Self {
            config,
            store,
            sessions,
            resolver,
        })
    }

    pub fn server_config(&self) -> &ServerConfig {
        &self.config
    }

    /// Resolver for one request, honouring a per-request override of the
    /// configured style-class capability.
    pub fn resolver(&self, style_classes: Option<bool>) -> GradientResolver {
        match style_classes {
            Some(flag) => self.resolver.with_style_classes(flag),
            None => self.resolver,
        }
    }

    /// Flush the snapshot and drop expired sessions.
    pub fn flush(&self) -> Result<bool> {
        let purged = self.sessions.purge_expired();
        if purged > 0 {
            tracing::debug!("Purged {} expired sessions", purged);
        }
        self.store.flush()
    }
}

/// Final snapshot flush after the HTTP server stops, bounded by
/// `SNAPSHOT_FLUSH_TIMEOUT_SECS`. Runs whether serving ended cleanly or with
/// an error; the serve error is returned afterwards.
pub async fn finish_serving(
    manager: Arc<SiteManager>,
    serve_result: std::io::Result<()>,
) -> Result<()> {
    if let Err(e) = &serve_result {
        tracing::error!("Server stopped with error: {}", e);
    }

    info!("Flushing snapshot before exit...");
    let flush_future = tokio::task::spawn_blocking(move || manager.flush());

    match tokio::time::timeout(
        Duration::from_secs(SNAPSHOT_FLUSH_TIMEOUT_SECS),
        flush_future,
    )
    .await
    {
        Ok(Ok(Ok(true))) => info!("Snapshot flushed"),
        Ok(Ok(Ok(false))) => info!("Snapshot already up to date"),
        Ok(Ok(Err(e))) => tracing::error!("Failed to flush snapshot: {:#}", e),
        Ok(Err(e)) => tracing::error!("Snapshot flush task panicked: {}", e),
        Err(_) => tracing::error!(
            "Snapshot flush timed out after {}s",
            SNAPSHOT_FLUSH_TIMEOUT_SECS
        ),
    }

    serve_result.context("HTTP server failed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SNAPSHOT_FILE_NAME;
    use crate::content::{Event, EventDraft};
    use tempfile::TempDir;

    fn manager(dir: &TempDir) -> Arc<SiteManager> {
        let config = ServerConfig {
            storage_path: dir.path().to_path_buf(),
            ..ServerConfig::default()
        };
        Arc::new(SiteManager::new(config).unwrap())
    }

    #[tokio::test]
    async fn test_failed_serve_still_flushes() {
        let dir = TempDir::new().unwrap();
        let manager = manager(&dir);
        let event = manager
            .store
            .create::<Event>(EventDraft {
                title: "Hack Night".to_string(),
                ..Default::default()
            })
            .unwrap();

        let serve_error = std::io::Error::other("accept failed");
        let result = finish_serving(manager, Err(serve_error)).await;
        assert!(result.is_err());

        assert!(dir.path().join(SNAPSHOT_FILE_NAME).exists());
        let reopened = ContentStore::open(dir.path()).unwrap();
        assert_eq!(reopened.get::<Event>(&event.id).unwrap().title, "Hack Night");
    }

    #[tokio::test]
    async fn test_clean_stop_returns_ok() {
        let dir = TempDir::new().unwrap();
        let result = finish_serving(manager(&dir), Ok(())).await;
        assert!(result.is_ok());
        assert!(dir.path().join(SNAPSHOT_FILE_NAME).exists());
    }
}
