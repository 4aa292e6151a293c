//! Capability requirement resolution.
//!
//! Given what a request declares it needs — tools, reasoning effort,
//! response format — compute the minimal set of capability tags a candidate
//! model must carry. Pure functions, no I/O.
//!
//! The rules apply independently and their results are unioned:
//!
//! - `reasoning.effort` present → `reasoning` + `reasoning-{effort}`
//! - any tool object whose `type` starts with `web_search` → `online`
//! - any bare-string tool, or tool object with `type == "function"` → `tools`
//! - `response_format` of `json_schema` → `structuredOutput`
//! - otherwise `json_object` → `responseFormat`
//!
//! The requirement vocabulary uses the singular `structuredOutput`; the
//! catalog's browse tag is the plural `structuredOutputs`.
//!
//! An empty request yields an empty set, which matches every model.

use crate::types::{Capability, InvocationNeeds, ReasoningEffort, ResponseFormat, ToolSpec};

/// Compute the capability tags required to serve `needs`.
///
/// The returned set preserves rule order and contains no duplicates.
pub fn required_capabilities(needs: &InvocationNeeds) -> Vec<Capability> {
    let mut required = Vec::new();

    if let Some(reasoning) = &needs.reasoning
        && let Some(effort) = reasoning.effort
    {
        required.push(Capability::Reasoning);
        required.push(effort_capability(effort));
    }

    if let Some(tools) = &needs.tools {
        let wants_web_search = tools.iter().any(|t| match t {
            ToolSpec::Typed { kind, .. } => kind.starts_with("web_search"),
            ToolSpec::Name(_) => false,
        });
        if wants_web_search {
            required.push(Capability::Online);
        }

        let wants_function_calls = tools.iter().any(|t| match t {
            ToolSpec::Name(_) => true,
            ToolSpec::Typed { kind, .. } => kind == "function",
        });
        if wants_function_calls {
            required.push(Capability::Tools);
        }
    }

    match &needs.response_format {
        Some(ResponseFormat::JsonSchema { .. }) => {
            // singular, unlike the catalog's `structuredOutputs`
            required.push(Capability::Other("structuredOutput".to_string()));
        }
        Some(ResponseFormat::JsonObject) => required.push(Capability::ResponseFormat),
        Some(ResponseFormat::Text) | None => {}
    }

    required
}

/// The `reasoning-{effort}` tag for an effort level.
fn effort_capability(effort: ReasoningEffort) -> Capability {
    match effort {
        ReasoningEffort::Low => Capability::ReasoningLow,
        ReasoningEffort::Medium => Capability::ReasoningMedium,
        ReasoningEffort::High => Capability::ReasoningHigh,
    }
}
