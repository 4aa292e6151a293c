//! HTTP daemon surface.
//!
//! - Configuration types (`config`)
//! - The axum routes (`routes`)
//! - The background catalog refresh loop ([`refresh_catalog_loop`])
//!
//! The library stays usable without any of this; everything here is
//! compiled only with the `server` feature.

pub mod config;
pub mod routes;

pub use config::Config;
pub use routes::{router, AppState};

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::catalog::remote::RemoteCatalog;
use crate::catalog::SharedCatalog;

/// Periodically refresh the shared catalog from a remote source.
///
/// Fetch failures are logged and the current snapshot stays in service;
/// a successful fetch is published with an atomic snapshot swap, so
/// in-flight requests never observe a partially-loaded catalog.
pub async fn refresh_catalog_loop(
    catalog: Arc<SharedCatalog>,
    remote: RemoteCatalog,
    interval: Duration,
) {
    let mut ticker = tokio::time::interval(interval);
    // The caller has already populated the initial snapshot.
    ticker.tick().await;
    loop {
        ticker.tick().await;
        match remote.refresh().await {
            Ok(fresh) => {
                info!(models = fresh.len(), "catalog refreshed");
                catalog.replace(fresh);
            }
            Err(err) => {
                warn!(error = %err, "catalog refresh failed, keeping current snapshot");
            }
        }
    }
}
