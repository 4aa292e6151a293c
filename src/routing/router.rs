//! Provider resolution with ordered scan and mandatory fallback.
//!
//! Resolution for a model id, first match wins:
//!
//! 1. Linear scan of the configured providers' `supports_model`.
//! 2. Catalog lookup: the id's declared provider, matched against the
//!    router's provider instances by [`ProviderId`].
//! 3. The designated fallback, which supports everything.
//!
//! Resolution never fails — the fallback guarantees a provider. A missing
//! fallback is a construction-time configuration error, never a
//! per-request one. Errors surface only when the returned handle is
//! actually invoked.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::catalog::SharedCatalog;
use crate::error::{MuninError, Result};
use crate::telemetry;
use crate::types::ModelDefaults;

use super::handle::ModelHandle;
use super::provider::{ApiProvider, PassthroughProvider, SharedProvider};

/// Ordered provider list plus designated fallback.
pub struct ProviderRouter {
    providers: Vec<SharedProvider>,
    fallback: SharedProvider,
    catalog: Arc<SharedCatalog>,
}

/// Builder for [`ProviderRouter`].
///
/// Providers are tried in registration order; the fallback is mandatory
/// and always consulted last.
#[derive(Default)]
pub struct ProviderRouterBuilder {
    providers: Vec<SharedProvider>,
    fallback: Option<SharedProvider>,
    catalog: Option<Arc<SharedCatalog>>,
}

impl ProviderRouterBuilder {
    /// Append a provider to the scan order.
    pub fn provider(mut self, provider: SharedProvider) -> Self {
        self.providers.push(provider);
        self
    }

    /// Set the designated fallback provider.
    pub fn fallback(mut self, provider: SharedProvider) -> Self {
        self.fallback = Some(provider);
        self
    }

    /// Set the catalog consulted for declared-provider lookup.
    pub fn catalog(mut self, catalog: Arc<SharedCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Build the router. Fails if no fallback was configured — that is a
    /// startup error, not something to discover per-request.
    pub fn build(self) -> Result<ProviderRouter> {
        let fallback = self.fallback.ok_or_else(|| {
            MuninError::Configuration("provider router requires a fallback provider".to_string())
        })?;
        let catalog = self.catalog.ok_or_else(|| {
            MuninError::Configuration("provider router requires a catalog".to_string())
        })?;
        Ok(ProviderRouter {
            providers: self.providers,
            fallback,
            catalog,
        })
    }
}

impl ProviderRouter {
    /// Start building a router.
    pub fn builder() -> ProviderRouterBuilder {
        ProviderRouterBuilder::default()
    }

    /// Router with the default provider stack: OpenAI, Anthropic, Google,
    /// DeepSeek in scan order, OpenRouter as fallback. API keys are read
    /// from the conventional environment variables; absent keys still
    /// resolve (invocation will fail with `AuthenticationFailed` upstream).
    pub fn with_default_providers(catalog: Arc<SharedCatalog>) -> Self {
        let key = |name: &str| std::env::var(name).ok();
        Self::builder()
            .provider(Arc::new(ApiProvider::openai(key("OPENAI_API_KEY"))))
            .provider(Arc::new(ApiProvider::anthropic(key("ANTHROPIC_API_KEY"))))
            .provider(Arc::new(ApiProvider::google(key("GOOGLE_API_KEY"))))
            .provider(Arc::new(ApiProvider::deepseek(key("DEEPSEEK_API_KEY"))))
            .fallback(Arc::new(PassthroughProvider::openrouter(key(
                "OPENROUTER_API_KEY",
            ))))
            .catalog(catalog)
            .build()
            .expect("default router always has a fallback")
    }

    /// Resolve the provider that should serve `model`.
    ///
    /// Never fails; the fallback is always a valid answer.
    #[instrument(skip(self))]
    pub fn provider_for_model(&self, model: &str) -> SharedProvider {
        // 1. Scan order, self-reported support.
        for provider in &self.providers {
            if provider.supports_model(model) {
                Self::record_resolution(provider.name(), "scan");
                return provider.clone();
            }
        }

        // 2. Catalog-declared provider.
        let catalog = self.catalog.snapshot();
        if let Some(descriptor) = catalog.find(model)
            && let Some(provider) = self
                .providers
                .iter()
                .find(|p| p.id() == descriptor.provider)
        {
            Self::record_resolution(provider.name(), "catalog");
            return provider.clone();
        }

        // 3. Fallback.
        debug!(model, "no provider matched; using fallback");
        Self::record_resolution(self.fallback.name(), "fallback");
        self.fallback.clone()
    }

    /// Resolve a lazy handle for `model`.
    ///
    /// The catalog supplies the canonical upstream id (resolving aliases)
    /// and default parameters when the model is known; unknown ids pass
    /// through unchanged with empty defaults.
    pub fn model(&self, model: &str) -> ModelHandle {
        let provider = self.provider_for_model(model);
        let catalog = self.catalog.snapshot();
        match catalog.find(model) {
            Some(descriptor) => {
                provider.model(&descriptor.id, descriptor.defaults.clone())
            }
            None => provider.model(model, ModelDefaults::default()),
        }
    }

    /// Designated fallback provider.
    pub fn fallback(&self) -> &SharedProvider {
        &self.fallback
    }

    /// Provider names in scan order (fallback excluded).
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    fn record_resolution(provider: &str, strategy: &'static str) {
        metrics::counter!(telemetry::ROUTE_RESOLUTIONS_TOTAL,
            "provider" => provider.to_owned(),
            "strategy" => strategy,
        )
        .increment(1);
    }
}
