//! Model catalog — the registry of invocable models.
//!
//! The catalog holds [`ModelDescriptor`] entries from two sources:
//! 1. **Embedded seed** — compiled-in JSON, always available
//! 2. **Remote curated data** — see [`remote`]
//!
//! Entries keep declaration order; that order is the tie-break for every
//! downstream sort unless an explicit sort key is given. Catalogs are
//! read-only after construction — refreshes build a new catalog and publish
//! it through [`SharedCatalog`] as an atomic snapshot swap, so in-flight
//! readers always see a fully-formed catalog.

pub mod remote;

use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use crate::error::{MuninError, Result};
use crate::types::{Capability, ModelDescriptor};

/// Ordered, read-only-after-construction model catalog.
#[derive(Debug, Clone, Default)]
pub struct ModelCatalog {
    entries: Vec<ModelDescriptor>,
}

impl ModelCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from entries, preserving order.
    ///
    /// A later entry with an id already present replaces the earlier one in
    /// place (ids are unique; position is kept so declaration order stays
    /// meaningful).
    pub fn from_entries(entries: impl IntoIterator<Item = ModelDescriptor>) -> Self {
        let mut catalog = Self::new();
        for entry in entries {
            catalog.insert(entry);
        }
        catalog
    }

    /// Insert a descriptor, replacing any existing entry with the same id.
    pub fn insert(&mut self, descriptor: ModelDescriptor) {
        match self.entries.iter().position(|m| m.id == descriptor.id) {
            Some(idx) => self.entries[idx] = descriptor,
            None => self.entries.push(descriptor),
        }
    }

    /// All models in declaration order.
    pub fn list(&self) -> &[ModelDescriptor] {
        &self.entries
    }

    /// Look up a model by exact id, then by alias.
    ///
    /// `ModelNotFound` is an expected outcome here — callers browsing the
    /// catalog render an empty result rather than treating it as fatal.
    pub fn get(&self, id_or_alias: &str) -> Result<&ModelDescriptor> {
        self.find(id_or_alias)
            .ok_or_else(|| MuninError::ModelNotFound(id_or_alias.to_string()))
    }

    /// Non-failing lookup: exact id first, alias second.
    pub fn find(&self, id_or_alias: &str) -> Option<&ModelDescriptor> {
        self.entries
            .iter()
            .find(|m| m.id == id_or_alias)
            .or_else(|| {
                self.entries
                    .iter()
                    .find(|m| m.alias.as_deref() == Some(id_or_alias))
            })
    }

    /// Models carrying the given capability tag, in declaration order.
    pub fn filter_by_capability(&self, capability: &Capability) -> Vec<&ModelDescriptor> {
        self.entries
            .iter()
            .filter(|m| m.has_capability(capability))
            .collect()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Catalog pre-populated with the embedded seed data.
    ///
    /// The seed is a curated set of well-known models with capability tags
    /// and aliases. It's always available as a fallback when the remote
    /// catalog is unreachable.
    pub fn with_embedded_seed() -> Self {
        match Self::from_json(EMBEDDED_SEED) {
            Ok(catalog) => catalog,
            Err(e) => {
                // Seed is compiled in and tested; an empty catalog is still
                // usable, so log rather than panic.
                tracing::error!(error = %e, "failed to parse embedded model seed");
                Self::new()
            }
        }
    }

    /// Highest catalog document version this build understands.
    pub const FORMAT_VERSION: u32 = 1;

    /// Parse a catalog document.
    ///
    /// Accepts the versioned form `{ "version": 1, "models": [...] }` that
    /// [`to_json`](Self::to_json) writes, and a bare descriptor array for
    /// seed-style files. Documents newer than
    /// [`FORMAT_VERSION`](Self::FORMAT_VERSION) are rejected rather than
    /// half-read.
    pub fn from_json(json: &str) -> Result<Self> {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Document {
            Versioned {
                version: u32,
                models: Vec<ModelDescriptor>,
            },
            Bare(Vec<ModelDescriptor>),
        }

        let models = match serde_json::from_str(json)? {
            Document::Versioned { version, .. } if version > Self::FORMAT_VERSION => {
                return Err(MuninError::InvalidInput(format!(
                    "catalog document version {version} is newer than supported version {}",
                    Self::FORMAT_VERSION
                )));
            }
            Document::Versioned { models, .. } => models,
            Document::Bare(models) => models,
        };
        Ok(Self::from_entries(models))
    }

    /// Serialize to the versioned document form.
    pub fn to_json(&self) -> Result<String> {
        #[derive(serde::Serialize)]
        struct Document<'a> {
            version: u32,
            models: &'a [ModelDescriptor],
        }

        Ok(serde_json::to_string_pretty(&Document {
            version: Self::FORMAT_VERSION,
            models: &self.entries,
        })?)
    }
}

/// Raw JSON seed data compiled into the binary.
const EMBEDDED_SEED: &str = include_str!("seed.json");

/// Process-wide catalog handle with atomic snapshot replacement.
///
/// Readers call [`snapshot`](SharedCatalog::snapshot) and work against an
/// immutable `Arc<ModelCatalog>`; a refresh builds the replacement catalog
/// off to the side and publishes it with a single pointer swap. A shared
/// collection is never mutated while readers may be iterating it.
#[derive(Debug)]
pub struct SharedCatalog {
    inner: RwLock<Arc<ModelCatalog>>,
    ttl: Duration,
    refreshed_at: RwLock<Instant>,
}

impl SharedCatalog {
    /// Default refresh interval: 1 hour.
    pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

    /// Create a handle over an initial catalog with the default TTL.
    pub fn new(catalog: ModelCatalog) -> Self {
        Self::with_ttl(catalog, Self::DEFAULT_TTL)
    }

    /// Create a handle with an explicit refresh interval.
    pub fn with_ttl(catalog: ModelCatalog, ttl: Duration) -> Self {
        Self {
            inner: RwLock::new(Arc::new(catalog)),
            ttl,
            refreshed_at: RwLock::new(Instant::now()),
        }
    }

    /// Current snapshot. Cheap (one Arc clone); the snapshot stays valid
    /// even if a refresh publishes a replacement while it is in use.
    pub fn snapshot(&self) -> Arc<ModelCatalog> {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Publish a replacement catalog (replace-then-publish).
    pub fn replace(&self, catalog: ModelCatalog) {
        let snapshot = Arc::new(catalog);
        *self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = snapshot;
        *self
            .refreshed_at
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Instant::now();
    }

    /// Whether the TTL has elapsed since the last publish.
    pub fn is_stale(&self) -> bool {
        self.refreshed_at
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .elapsed()
            >= self.ttl
    }
}
