//! Model descriptor and provider identity types.

use serde::{Deserialize, Serialize};

use super::capability::Capability;

/// Upstream provider identity.
///
/// `Other` carries provider labels the crate has no first-class integration
/// for (e.g. third-party hosts surfaced by an aggregator). Keeping unknown
/// labels representable means catalog data never fails to load because a
/// new provider appeared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProviderId {
    OpenAi,
    Anthropic,
    Google,
    DeepSeek,
    OpenRouter,
    Other(String),
}

impl ProviderId {
    /// Canonical lowercase label, as used in catalog data and query strings.
    pub fn as_str(&self) -> &str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Google => "google",
            Self::DeepSeek => "deepseek",
            Self::OpenRouter => "openrouter",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for ProviderId {
    fn from(label: String) -> Self {
        match label.as_str() {
            "openai" => Self::OpenAi,
            "anthropic" => Self::Anthropic,
            "google" => Self::Google,
            "deepseek" => Self::DeepSeek,
            "openrouter" => Self::OpenRouter,
            _ => Self::Other(label),
        }
    }
}

impl From<&str> for ProviderId {
    fn from(label: &str) -> Self {
        Self::from(label.to_string())
    }
}

impl From<ProviderId> for String {
    fn from(id: ProviderId) -> Self {
        id.as_str().to_string()
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default invocation parameters attached to a catalog entry.
///
/// All fields are optional — only set fields act as defaults. When a
/// [`ModelHandle`](crate::routing::ModelHandle) is built, they fill unset
/// request slots but never overwrite explicitly-set values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelDefaults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl ModelDefaults {
    /// True if no defaults are set.
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none()
            && self.top_p.is_none()
            && self.max_tokens.is_none()
            && self.seed.is_none()
    }
}

/// One invocable model known to the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Canonical upstream identifier (e.g. "gpt-4o-2024-08-06").
    pub id: String,
    /// Short human name (e.g. "gpt-4o"), if the id is a dated variant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Provider that serves this model.
    pub provider: ProviderId,
    /// Organization/vendor label. May differ from the provider for
    /// third-party hosted models.
    pub author: String,
    /// Capability tags this model supports.
    #[serde(default)]
    pub capabilities: Vec<Capability>,
    /// Default invocation parameters.
    #[serde(default, skip_serializing_if = "ModelDefaults::is_empty")]
    pub defaults: ModelDefaults,
}

impl ModelDescriptor {
    /// Create a descriptor with required fields.
    pub fn new(
        id: impl Into<String>,
        provider: impl Into<ProviderId>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            alias: None,
            provider: provider.into(),
            author: author.into(),
            capabilities: Vec::new(),
            defaults: ModelDefaults::default(),
        }
    }

    /// Set the short alias.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Add a capability tag. Capabilities are a set: duplicates are ignored.
    pub fn with_capability(mut self, cap: Capability) -> Self {
        if !self.capabilities.contains(&cap) {
            self.capabilities.push(cap);
        }
        self
    }

    /// Whether this model carries the given capability tag.
    pub fn has_capability(&self, cap: &Capability) -> bool {
        self.capabilities.contains(cap)
    }

    /// Short name for listings: the alias when one exists, else the id.
    pub fn display_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.id)
    }
}
