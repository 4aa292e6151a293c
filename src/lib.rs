//! Munin - model catalog and capability router for LLM APIs
//!
//! This crate keeps a catalog of known models with their capability tags,
//! resolves which capabilities an invocation needs, routes model
//! identifiers to the provider that serves them, and renders a faceted,
//! link-driven browse view over the catalog.
//!
//! # Routing example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use munin::catalog::{ModelCatalog, SharedCatalog};
//! use munin::routing::ProviderRouter;
//! use munin::Message;
//!
//! #[tokio::main]
//! async fn main() -> munin::Result<()> {
//!     let catalog = Arc::new(SharedCatalog::new(ModelCatalog::with_embedded_seed()));
//!     let router = ProviderRouter::with_default_providers(catalog);
//!
//!     // Aliases resolve through the catalog; unknown ids fall back to
//!     // the pass-through provider. Resolution never fails.
//!     let handle = router.model("gpt-4o");
//!     let response = handle.chat(&[Message::user("What is 2 + 2?")]).await?;
//!     println!("{}", response.content);
//!     Ok(())
//! }
//! ```
//!
//! # Browse example
//!
//! ```rust
//! use munin::catalog::ModelCatalog;
//! use munin::query::{browse, EngineOptions};
//!
//! let catalog = ModelCatalog::with_embedded_seed();
//! let response = browse(&catalog, "capabilities=reasoning", &EngineOptions::default());
//! assert!(!response.links.authors.is_empty());
//! ```

pub mod catalog;
pub mod error;
pub mod identifier;
pub mod integrations;
pub mod query;
pub mod resolve;
pub mod routing;
#[cfg(feature = "server")]
pub mod server;
pub mod telemetry;
pub mod types;
mod version;

// Re-export main types at crate root
pub use error::{MuninError, Result};
pub use identifier::{parse, reconstruct, ParsedModelIdentifier};
pub use resolve::required_capabilities;
pub use routing::{ModelHandle, ModelProvider, ProviderRouter, ProviderRouterBuilder};
pub use version::{version_string, GIT_BRANCH, GIT_SHA, PKG_VERSION};

// Re-export core data types
pub use types::{
    Capability, ChatResponse, InvocationNeeds, Message, ModelDefaults, ModelDescriptor,
    OutputType, ProviderId, ReasoningConfig, ReasoningEffort, ResponseFormat, Role, ToolSpec,
};
