//! Remote catalog refresh.
//!
//! A [`RemoteCatalog`] pairs a fetch URL with a local cache file. Cold
//! starts read the cache only (no network); [`refresh`](RemoteCatalog::refresh)
//! fetches the remote document, rewrites the cache, and hands back a
//! [`ModelCatalog`] ready for
//! [`SharedCatalog::replace`](super::SharedCatalog::replace).

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::ModelCatalog;
use crate::error::{MuninError, Result};

/// Default URL for the curated remote catalog.
pub const DEFAULT_CATALOG_URL: &str =
    "https://raw.githubusercontent.com/emesal/munin-catalog/main/catalog.json";

/// A remote catalog source with a local file cache.
#[derive(Debug, Clone)]
pub struct RemoteCatalog {
    url: String,
    cache_path: PathBuf,
    client: reqwest::Client,
}

impl Default for RemoteCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_CATALOG_URL)
    }
}

impl RemoteCatalog {
    /// Source fetching from `url`, cached at `~/.cache/munin/catalog.json`.
    pub fn new(url: impl Into<String>) -> Self {
        let cache_path = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join("munin")
            .join("catalog.json");
        Self {
            url: url.into(),
            cache_path,
            client: reqwest::Client::new(),
        }
    }

    /// Override the cache file location.
    pub fn cache_at(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = path.into();
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    /// Catalog from the local cache file, if a readable one exists.
    ///
    /// Missing and unreadable caches both come back `None`; the unreadable
    /// case logs a warning so a bad cache file is visible.
    pub fn load_cached(&self) -> Option<ModelCatalog> {
        let json = match std::fs::read_to_string(&self.cache_path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %self.cache_path.display(), error = %e, "failed to read catalog cache");
                return None;
            }
        };
        match ModelCatalog::from_json(&json) {
            Ok(catalog) => Some(catalog),
            Err(e) => {
                warn!(path = %self.cache_path.display(), error = %e, "discarding unreadable catalog cache");
                None
            }
        }
    }

    /// Fetch the remote document, rewrite the cache, and return the catalog.
    ///
    /// The cache write goes through a tmp file and a rename, so a failed
    /// fetch or a crash mid-write leaves the previous cache usable.
    pub async fn refresh(&self) -> Result<ModelCatalog> {
        info!(url = %self.url, "fetching remote catalog");
        let body = self
            .client
            .get(self.url.as_str())
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| MuninError::Http(format!("catalog fetch from {}: {e}", self.url)))?
            .text()
            .await
            .map_err(|e| MuninError::Http(format!("catalog response body: {e}")))?;

        let catalog = ModelCatalog::from_json(&body)?;
        self.write_cache(&catalog)?;
        info!(
            models = catalog.len(),
            path = %self.cache_path.display(),
            "catalog cache refreshed"
        );
        Ok(catalog)
    }

    fn write_cache(&self, catalog: &ModelCatalog) -> Result<()> {
        if let Some(parent) = self.cache_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                MuninError::Configuration(format!(
                    "failed to create cache dir {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let tmp = self.cache_path.with_extension("tmp");
        std::fs::write(&tmp, catalog.to_json()?).map_err(|e| {
            MuninError::Configuration(format!("failed to write {}: {e}", tmp.display()))
        })?;
        std::fs::rename(&tmp, &self.cache_path).map_err(|e| {
            MuninError::Configuration(format!(
                "failed to move {} into place: {e}",
                tmp.display()
            ))
        })?;
        Ok(())
    }
}
