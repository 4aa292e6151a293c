//! Integration tests for capability requirement resolution and the
//! capability tag vocabulary.

use munin::{
    required_capabilities, Capability, InvocationNeeds, OutputType, ReasoningConfig,
    ReasoningEffort, ResponseFormat, ToolSpec,
};

// =============================================================================
// Requirement resolution
// =============================================================================

#[test]
fn reasoning_effort_requires_both_tags() {
    let needs = InvocationNeeds {
        reasoning: Some(ReasoningConfig {
            effort: Some(ReasoningEffort::High),
        }),
        ..Default::default()
    };
    assert_eq!(
        required_capabilities(&needs),
        vec![Capability::Reasoning, Capability::ReasoningHigh]
    );
}

#[test]
fn web_search_tool_object_requires_online() {
    let needs = InvocationNeeds {
        tools: Some(vec![ToolSpec::typed("web_search_preview")]),
        ..Default::default()
    };
    assert_eq!(required_capabilities(&needs), vec![Capability::Online]);
}

#[test]
fn bare_string_tool_names_require_tools_not_online() {
    let needs = InvocationNeeds {
        tools: Some(vec![ToolSpec::Name("github.createIssue".into())]),
        ..Default::default()
    };
    assert_eq!(required_capabilities(&needs), vec![Capability::Tools]);
}

#[test]
fn rules_union_across_needs() {
    let needs = InvocationNeeds {
        reasoning: Some(ReasoningConfig {
            effort: Some(ReasoningEffort::Low),
        }),
        tools: Some(vec![
            ToolSpec::typed("web_search_preview"),
            ToolSpec::typed("function"),
        ]),
        response_format: Some(ResponseFormat::JsonObject),
    };
    assert_eq!(
        required_capabilities(&needs),
        vec![
            Capability::Reasoning,
            Capability::ReasoningLow,
            Capability::Online,
            Capability::Tools,
            Capability::ResponseFormat,
        ]
    );
}

#[test]
fn json_schema_requires_structured_output() {
    let needs = InvocationNeeds {
        response_format: Some(ResponseFormat::JsonSchema { schema: None }),
        ..Default::default()
    };
    // Invocation-side vocabulary: singular, unlike the catalog's browse tag.
    assert_eq!(
        required_capabilities(&needs),
        vec![Capability::from("structuredOutput")]
    );
}

// =============================================================================
// Tag vocabulary
// =============================================================================

#[test]
fn tags_round_trip_through_strings() {
    for tag in [
        "tools",
        "structuredOutputs",
        "responseFormat",
        "reasoning",
        "reasoning-low",
        "reasoning-medium",
        "reasoning-high",
        "online",
        "vision",
    ] {
        let cap = Capability::from(tag);
        assert!(cap.is_known(), "{tag}");
        assert_eq!(cap.as_str(), tag);
    }

    let unknown = Capability::from("somethingElse");
    assert!(!unknown.is_known());
    assert_eq!(unknown.as_str(), "somethingElse");
}

#[test]
fn output_type_presets_parse_and_imply() {
    assert_eq!(OutputType::from_param("Object"), Some(OutputType::Object));
    assert_eq!(OutputType::from_param("bogus"), None);

    assert_eq!(
        OutputType::Object.implied_capabilities(),
        &[Capability::StructuredOutputs]
    );
    assert!(OutputType::Markdown.implied_capabilities().is_empty());
}
