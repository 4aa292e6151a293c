//! Provider abstraction and concrete upstream providers.
//!
//! Providers self-report whether they can serve a model id and hand out
//! lazy [`ModelHandle`]s. They are stateless and shareable; the router owns
//! them as `Arc<dyn ModelProvider>` in priority order.
//!
//! # Support matching
//!
//! `supports_model` is a substring test against the provider's known
//! model-name fragments. This is deliberately permissive so dated or
//! suffixed variants (`gpt-4o-2024-08-06`, `claude-3-7-sonnet:reasoning`)
//! match without the fragment tables naming every variant. Overlapping
//! fragments across providers are resolved by router list order — first
//! provider wins.

use std::sync::Arc;

use crate::types::{ModelDefaults, ProviderId};

use super::handle::ModelHandle;

/// An upstream provider able to self-report model support and produce
/// invocable handles.
pub trait ModelProvider: Send + Sync {
    /// Provider name for logging/debugging.
    fn name(&self) -> &str;

    /// Provider identity, matched against catalog-declared providers.
    fn id(&self) -> ProviderId;

    /// Whether this provider recognises the model id.
    fn supports_model(&self, model: &str) -> bool;

    /// Build a lazy handle for the model. No network call happens here;
    /// errors surface only when the handle is invoked.
    fn model(&self, model: &str, defaults: ModelDefaults) -> ModelHandle;
}

/// A first-party API provider backed by a fragment table.
pub struct ApiProvider {
    id: ProviderId,
    base_url: String,
    api_key: Option<String>,
    /// Known model-name fragments; a model id matches if any fragment
    /// appears as a substring.
    fragments: &'static [&'static str],
    client: reqwest::Client,
}

impl ApiProvider {
    fn new(
        id: ProviderId,
        base_url: impl Into<String>,
        api_key: Option<String>,
        fragments: &'static [&'static str],
    ) -> Self {
        Self {
            id,
            base_url: base_url.into(),
            api_key,
            fragments,
            client: reqwest::Client::new(),
        }
    }

    /// OpenAI chat completions.
    pub fn openai(api_key: Option<String>) -> Self {
        Self::new(
            ProviderId::OpenAi,
            "https://api.openai.com/v1",
            api_key,
            &["gpt-3.5", "gpt-4", "chatgpt", "o1", "o3"],
        )
    }

    /// Anthropic messages (served through the OpenAI-compatible surface).
    pub fn anthropic(api_key: Option<String>) -> Self {
        Self::new(
            ProviderId::Anthropic,
            "https://api.anthropic.com/v1",
            api_key,
            &["claude"],
        )
    }

    /// Google Generative AI.
    pub fn google(api_key: Option<String>) -> Self {
        Self::new(
            ProviderId::Google,
            "https://generativelanguage.googleapis.com/v1beta/openai",
            api_key,
            &["gemini", "gemma", "learnlm"],
        )
    }

    /// DeepSeek.
    pub fn deepseek(api_key: Option<String>) -> Self {
        Self::new(
            ProviderId::DeepSeek,
            "https://api.deepseek.com/v1",
            api_key,
            &["deepseek"],
        )
    }
}

impl ModelProvider for ApiProvider {
    fn name(&self) -> &str {
        self.id.as_str()
    }

    fn id(&self) -> ProviderId {
        self.id.clone()
    }

    fn supports_model(&self, model: &str) -> bool {
        self.fragments.iter().any(|f| model.contains(f))
    }

    fn model(&self, model: &str, defaults: ModelDefaults) -> ModelHandle {
        ModelHandle::new(
            self.id.clone(),
            model,
            defaults,
            &self.base_url,
            self.api_key.clone(),
            self.client.clone(),
        )
    }
}

/// Passthrough provider that accepts every model id.
///
/// Routes through an aggregator (OpenRouter), so unknown ids still resolve
/// to something invocable. Must be the router's designated fallback —
/// placing it earlier in the scan order would shadow every other provider.
pub struct PassthroughProvider {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl PassthroughProvider {
    /// OpenRouter-backed passthrough.
    pub fn openrouter(api_key: Option<String>) -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1".to_string(),
            api_key,
            client: reqwest::Client::new(),
        }
    }
}

impl ModelProvider for PassthroughProvider {
    fn name(&self) -> &str {
        "openrouter"
    }

    fn id(&self) -> ProviderId {
        ProviderId::OpenRouter
    }

    fn supports_model(&self, _model: &str) -> bool {
        true
    }

    fn model(&self, model: &str, defaults: ModelDefaults) -> ModelHandle {
        ModelHandle::new(
            ProviderId::OpenRouter,
            model,
            defaults,
            &self.base_url,
            self.api_key.clone(),
            self.client.clone(),
        )
    }
}

/// Shared provider handle type used throughout the router.
pub type SharedProvider = Arc<dyn ModelProvider>;
