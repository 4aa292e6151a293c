//! munind — Munin daemon.
//!
//! Serves the model browse API over HTTP, refreshing the catalog from a
//! remote source in the background when one is configured.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::info;

use munin::catalog::remote::RemoteCatalog;
use munin::catalog::{ModelCatalog, SharedCatalog};
use munin::integrations::{CachedIntegrations, IntegrationCacheConfig, StaticIntegrations};
use munin::query::EngineOptions;
use munin::server::{self, AppState, Config};

/// Munin daemon — model catalog and capability router.
#[derive(Parser)]
#[command(name = "munind")]
#[command(version = munin::PKG_VERSION)]
#[command(about = "Munin model catalog daemon")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// User the integration service is queried for by default.
    #[arg(long, default_value = "anonymous")]
    user: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;

    let addr: SocketAddr = config
        .server
        .address
        .parse()
        .map_err(|e| munin::MuninError::Configuration(format!("Invalid address: {e}")))?;

    let catalog = Arc::new(SharedCatalog::new(ModelCatalog::with_embedded_seed()));

    // Remote refresh is opt-in; without a URL the embedded seed is served.
    if let Some(url) = config.catalog.url.clone() {
        let mut remote = RemoteCatalog::new(url);
        if let Some(path) = config.catalog.cache_path.clone() {
            remote = remote.cache_at(path);
        }
        // Startup stays off the network; a previously cached fetch is
        // served until the first refresh lands.
        if let Some(cached) = remote.load_cached() {
            info!(models = cached.len(), "loaded catalog from local cache");
            catalog.replace(cached);
        }
        let interval = Duration::from_secs(config.catalog.refresh_secs.unwrap_or(3600));
        tokio::spawn(server::refresh_catalog_loop(
            Arc::clone(&catalog),
            remote,
            interval,
        ));
    }

    let integrations = Arc::new(CachedIntegrations::new(
        StaticIntegrations::default(),
        &IntegrationCacheConfig::default(),
    ));

    let state = AppState {
        catalog,
        integrations,
        opts: EngineOptions {
            base_url: config.links.base_url.clone(),
            chat_url: config.links.chat_url.clone(),
        },
        default_user: args.user,
    };

    info!(version = munin::version_string(), %addr, "munind starting");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, server::router(state)).await?;

    Ok(())
}
