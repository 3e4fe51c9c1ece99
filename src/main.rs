//! Club site server and admin CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tower::limit::ConcurrencyLimitLayer;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::timeout::TimeoutLayer;
use tracing::info;

use club_site::{
    auth,
    config::{self, ServerConfig},
    constants::GRACEFUL_SHUTDOWN_TIMEOUT_SECS,
    content::{seed, ContentStore},
    handlers::{build_protected_routes, build_public_routes, finish_serving, SiteManager},
    metrics, middleware, tracing_setup,
};

#[derive(Parser)]
#[command(name = "club-site")]
#[command(about = "Club site content API and admin tools")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Replace all site content with the demo catalogue
    Seed,

    /// Create an admin account
    CreateAdmin {
        #[arg(long, env = "CLUB_ADMIN_USERNAME")]
        username: String,

        #[arg(long, env = "CLUB_ADMIN_PASSWORD")]
        password: String,
    },

    /// Print the supported environment variables
    EnvHelp,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let server_config = ServerConfig::from_env();

    tracing_setup::init_tracing(server_config.log_format)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(server_config).await,
        Commands::Seed => run_seed(&server_config),
        Commands::CreateAdmin { username, password } => {
            run_create_admin(&server_config, &username, &password)
        }
        Commands::EnvHelp => {
            config::print_env_help();
            Ok(())
        }
    }
}

fn run_seed(server_config: &ServerConfig) -> Result<()> {
    let store = ContentStore::open(&server_config.storage_path)?;
    let counts = seed::reseed(&store)?;
    store.flush()?;
    println!(
        "Seeded {} projects, {} events, {} team members, {} gallery images into {}",
        counts.projects,
        counts.events,
        counts.team,
        counts.gallery,
        server_config.storage_path.display()
    );
    Ok(())
}

fn run_create_admin(server_config: &ServerConfig, username: &str, password: &str) -> Result<()> {
    let store = ContentStore::open(&server_config.storage_path)?;
    let admin = auth::create_admin(&store, username, password)?;
    store.flush()?;
    println!("Admin '{}' created", admin.username);
    Ok(())
}

async fn serve(server_config: ServerConfig) -> Result<()> {
    metrics::register_metrics().context("Failed to register metrics")?;
    info!("Metrics registered at /metrics");

    info!("Starting club site server...");
    server_config.log();

    let manager = Arc::new(SiteManager::new(server_config.clone())?);

    // Keep a reference for shutdown cleanup
    let manager_for_shutdown = Arc::clone(&manager);

    let flush_task = spawn_snapshot_task(
        Arc::clone(&manager),
        server_config.snapshot_interval_secs,
    );

    let public_routes = build_public_routes(manager.clone());
    let protected_routes = build_protected_routes(manager.clone());

    // Rate limiting applies to the admin surface only
    let protected_routes = if server_config.rate_limit_per_second > 0 {
        let governor_conf = GovernorConfigBuilder::default()
            .per_second(server_config.rate_limit_per_second)
            .burst_size(server_config.rate_limit_burst)
            .finish()
            .context("Failed to build governor rate limiter configuration")?;

        info!(
            "Admin rate limiting enabled: {} req/sec, burst of {}",
            server_config.rate_limit_per_second, server_config.rate_limit_burst
        );
        protected_routes.layer(GovernorLayer::new(governor_conf))
    } else {
        protected_routes
    };

    let app = axum::Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(axum::middleware::from_fn(middleware::track_metrics))
        .layer(TimeoutLayer::new(Duration::from_secs(
            server_config.request_timeout_secs,
        )))
        .layer(ConcurrencyLimitLayer::new(
            server_config.max_concurrent_requests,
        ))
        .layer(server_config.cors.to_layer());

    let addr: SocketAddr = format!("{}:{}", server_config.host, server_config.port)
        .parse()
        .with_context(|| {
            format!(
                "Invalid listen address {}:{}",
                server_config.host, server_config.port
            )
        })?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);

    // Flush even when serving fails, then report the serve error
    let serve_result = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await;

    if let Some(task) = flush_task {
        task.abort();
    }

    match tokio::time::timeout(
        Duration::from_secs(GRACEFUL_SHUTDOWN_TIMEOUT_SECS),
        finish_serving(manager_for_shutdown, serve_result),
    )
    .await
    {
        Ok(result) => {
            info!("Server shutdown complete");
            result
        }
        Err(_) => {
            tracing::error!(
                "Graceful shutdown timed out after {}s, forcing exit",
                GRACEFUL_SHUTDOWN_TIMEOUT_SECS
            );
            std::process::exit(1);
        }
    }
}

/// Periodically write the snapshot when the store is dirty.
fn spawn_snapshot_task(
    manager: Arc<SiteManager>,
    interval_secs: u64,
) -> Option<tokio::task::JoinHandle<()>> {
    if interval_secs == 0 {
        return None;
    }

    Some(tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
        // First tick fires immediately
        interval.tick().await;

        loop {
            interval.tick().await;
            let manager = Arc::clone(&manager);
            match tokio::task::spawn_blocking(move || manager.flush()).await {
                Ok(Ok(true)) => tracing::debug!("Periodic snapshot written"),
                Ok(Ok(false)) => {}
                Ok(Err(e)) => tracing::error!("Periodic snapshot failed: {:#}", e),
                Err(e) => tracing::error!("Snapshot task panicked: {}", e),
            }
        }
    }))
}

/// Handle graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown");
}
