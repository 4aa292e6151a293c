//! Capability tags and output-type presets.

use serde::{Deserialize, Serialize};

/// A capability tag on a model.
///
/// Tags are compared and serialized as their string form. `Other` keeps
/// arbitrary tags representable so unknown filter values simply match
/// nothing instead of failing the request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Capability {
    /// Tool/function calling.
    Tools,
    /// Strict JSON-schema structured outputs.
    StructuredOutputs,
    /// JSON-object response format (looser than structured outputs).
    ResponseFormat,
    /// Extended thinking / reasoning.
    Reasoning,
    ReasoningLow,
    ReasoningMedium,
    ReasoningHigh,
    /// Built-in web access.
    Online,
    /// Image inputs.
    Vision,
    Other(String),
}

impl Capability {
    /// Canonical tag string, as it appears in catalog data and URLs.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Tools => "tools",
            Self::StructuredOutputs => "structuredOutputs",
            Self::ResponseFormat => "responseFormat",
            Self::Reasoning => "reasoning",
            Self::ReasoningLow => "reasoning-low",
            Self::ReasoningMedium => "reasoning-medium",
            Self::ReasoningHigh => "reasoning-high",
            Self::Online => "online",
            Self::Vision => "vision",
            Self::Other(tag) => tag,
        }
    }

    /// Whether this tag is one of the well-known variants (not `Other`).
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for Capability {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "tools" => Self::Tools,
            "structuredOutputs" => Self::StructuredOutputs,
            "responseFormat" => Self::ResponseFormat,
            "reasoning" => Self::Reasoning,
            "reasoning-low" => Self::ReasoningLow,
            "reasoning-medium" => Self::ReasoningMedium,
            "reasoning-high" => Self::ReasoningHigh,
            "online" => Self::Online,
            "vision" => Self::Vision,
            _ => Self::Other(tag),
        }
    }
}

impl From<&str> for Capability {
    fn from(tag: &str) -> Self {
        Self::from(tag.to_string())
    }
}

impl From<Capability> for String {
    fn from(cap: Capability) -> Self {
        cap.as_str().to_string()
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output-type preset for browse requests.
///
/// A preset expands to zero or more capability tags before filtering.
/// Only the object-shaped presets imply anything today; the text-shaped
/// ones exist so links for them are stable once models gain relevant tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputType {
    Object,
    ObjectArray,
    Text,
    TextArray,
    Markdown,
    Code,
}

impl OutputType {
    /// All presets, in the order they are offered as links.
    pub const ALL: [OutputType; 6] = [
        Self::Object,
        Self::ObjectArray,
        Self::Text,
        Self::TextArray,
        Self::Markdown,
        Self::Code,
    ];

    /// Parse a preset from its query-string value. Unknown values are
    /// `None` — the filter is then simply not applied.
    pub fn from_param(value: &str) -> Option<Self> {
        match value {
            "Object" => Some(Self::Object),
            "ObjectArray" => Some(Self::ObjectArray),
            "Text" => Some(Self::Text),
            "TextArray" => Some(Self::TextArray),
            "Markdown" => Some(Self::Markdown),
            "Code" => Some(Self::Code),
            _ => None,
        }
    }

    /// Query-string value for this preset.
    pub fn as_param(&self) -> &'static str {
        match self {
            Self::Object => "Object",
            Self::ObjectArray => "ObjectArray",
            Self::Text => "Text",
            Self::TextArray => "TextArray",
            Self::Markdown => "Markdown",
            Self::Code => "Code",
        }
    }

    /// Capability tags implied by this preset.
    pub fn implied_capabilities(&self) -> &'static [Capability] {
        match self {
            Self::Object | Self::ObjectArray => &[Capability::StructuredOutputs],
            Self::Text | Self::TextArray | Self::Markdown | Self::Code => &[],
        }
    }
}
