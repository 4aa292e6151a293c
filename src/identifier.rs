//! Model identifier parsing and reconstruction.
//!
//! A model identifier is the canonical addressable form of a model plus its
//! modifiers, used verbatim in URLs:
//!
//! ```text
//! gpt-4o-2024-08-06
//! claude-3-7-sonnet:reasoning
//! gemini-1.5-pro(tools,github.createIssue)
//! ```
//!
//! The grammar is a base model token, optionally followed by `:tag`
//! suffixes and/or a parenthesized comma-separated modifier list. Modifier
//! tokens that name a known capability tag become capabilities; everything
//! else is a tool name (namespaced tools look like `app.action`).
//!
//! Parsing is permissive: an unbalanced parenthesis or other unrecognized
//! trailing text folds into the base token rather than erroring. The one
//! hard failure is an identifier with no base token at all
//! ([`MuninError::UnsupportedSpec`]) — reconstruction from an empty base
//! would be meaningless.
//!
//! `reconstruct(parse(s))` denotes the same model and enabled-modifier set
//! as `s`; byte equality is not guaranteed (suffix modifiers are normalised
//! into the parenthesized form, ordering of tools is set-like).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{MuninError, Result};
use crate::types::Capability;

/// Structured decomposition of a model identifier string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedModelIdentifier {
    /// Base model id or alias.
    pub model: String,
    /// Capability modifiers, in appearance order, deduplicated.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub capabilities: Vec<Capability>,
    /// Tool name → enabled. Insertion-ordered for stable reconstruction;
    /// equality of identifiers treats this as a set.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub tools: IndexMap<String, bool>,
}

impl ParsedModelIdentifier {
    /// A bare identifier with no modifiers.
    pub fn bare(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// Toggle a tool: present → removed, absent → added enabled.
    pub fn toggle_tool(&mut self, name: &str) {
        if self.tools.shift_remove(name).is_none() {
            self.tools.insert(name.to_string(), true);
        }
    }

    /// Toggle a capability modifier: present → removed, absent → appended.
    pub fn toggle_capability(&mut self, cap: Capability) {
        if let Some(idx) = self.capabilities.iter().position(|c| *c == cap) {
            self.capabilities.remove(idx);
        } else {
            self.capabilities.push(cap);
        }
    }

    /// Enabled tool names, in insertion order.
    pub fn enabled_tools(&self) -> impl Iterator<Item = &str> {
        self.tools
            .iter()
            .filter(|(_, enabled)| **enabled)
            .map(|(name, _)| name.as_str())
    }
}

/// Parse a model identifier string.
///
/// Fails only when no base model token can be extracted (empty input or a
/// bare modifier list).
pub fn parse(spec: &str) -> Result<ParsedModelIdentifier> {
    let spec = spec.trim();
    if spec.is_empty() {
        return Err(MuninError::UnsupportedSpec(spec.to_string()));
    }

    // A parenthesized modifier list is only recognised when it closes the
    // string; anything else stays part of the base token.
    let (head, paren_mods) = match spec.find('(') {
        Some(open) if spec.ends_with(')') => {
            (&spec[..open], Some(&spec[open + 1..spec.len() - 1]))
        }
        _ => (spec, None),
    };

    // `:tag` suffixes on the head are modifiers too.
    let mut segments = head.split(':');
    let model = segments.next().unwrap_or_default().trim();
    if model.is_empty() {
        return Err(MuninError::UnsupportedSpec(spec.to_string()));
    }

    let mut parsed = ParsedModelIdentifier::bare(model);
    for segment in segments {
        classify_modifier(&mut parsed, segment);
    }
    if let Some(mods) = paren_mods {
        for token in mods.split(',') {
            classify_modifier(&mut parsed, token);
        }
    }

    Ok(parsed)
}

/// Rebuild the canonical identifier string from a parsed identifier.
///
/// Disabled tools are omitted; an identifier with no enabled modifiers
/// reconstructs to the bare base model string.
pub fn reconstruct(parsed: &ParsedModelIdentifier) -> String {
    let mods: Vec<&str> = parsed
        .capabilities
        .iter()
        .map(Capability::as_str)
        .chain(parsed.enabled_tools())
        .collect();

    if mods.is_empty() {
        parsed.model.clone()
    } else {
        format!("{}({})", parsed.model, mods.join(","))
    }
}

/// Sort a modifier token into capabilities or tools.
///
/// Known capability tags become capabilities; any other non-empty token is
/// an enabled tool. Duplicates are dropped.
fn classify_modifier(parsed: &mut ParsedModelIdentifier, token: &str) {
    let token = token.trim();
    if token.is_empty() {
        return;
    }
    let cap = Capability::from(token);
    if cap.is_known() {
        if !parsed.capabilities.contains(&cap) {
            parsed.capabilities.push(cap);
        }
    } else if !parsed.tools.contains_key(token) {
        parsed.tools.insert(token.to_string(), true);
    }
}
