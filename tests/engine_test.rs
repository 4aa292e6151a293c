//! Integration tests for the faceted browse engine — filtering, facets,
//! link generation, grouping, and the single-model shortcut.

use munin::catalog::ModelCatalog;
use munin::query::{
    browse, facet, filter_models, resolve_single, EngineOptions, FacetField, FilterState, Link,
    QueryString,
};
use munin::{Capability, ModelDescriptor};

fn opts() -> EngineOptions {
    EngineOptions {
        base_url: "https://models.example.com/api".to_string(),
        chat_url: "https://chat.example.com".to_string(),
    }
}

fn fixture() -> ModelCatalog {
    ModelCatalog::from_entries([
        ModelDescriptor::new("gpt-4o-2024-08-06", "openai", "openai")
            .with_alias("gpt-4o")
            .with_capability(Capability::Tools)
            .with_capability(Capability::StructuredOutputs),
        ModelDescriptor::new("gpt-4o-mini-2024-07-18", "openai", "openai")
            .with_alias("gpt-4o-mini")
            .with_capability(Capability::Tools),
        ModelDescriptor::new("gemini-1.5-pro", "google", "google")
            .with_capability(Capability::Tools),
        ModelDescriptor::new("claude-3-7-sonnet-20250219", "anthropic", "anthropic")
            .with_alias("claude-3-7-sonnet")
            .with_capability(Capability::Tools)
            .with_capability(Capability::Reasoning),
        ModelDescriptor::new("qwq-32b", "openrouter", "qwen")
            .with_capability(Capability::Reasoning),
    ])
}

fn as_map(link: Link) -> munin::query::LinkMap {
    match link {
        Link::Map(map) => map,
        Link::Url(url) => panic!("expected a map, got url {url}"),
    }
}

fn url_of(link: &Link) -> &str {
    match link {
        Link::Url(url) => url,
        Link::Map(_) => panic!("expected a url, got a map"),
    }
}

// =============================================================================
// Filtering
// =============================================================================

#[test]
fn output_type_object_requires_structured_outputs() {
    let catalog = fixture();
    let state = FilterState::from_query(&QueryString::parse("outputType=Object"));
    let matched = filter_models(catalog.list(), &state);
    let ids: Vec<&str> = matched.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, ["gpt-4o-2024-08-06"]);
}

#[test]
fn text_shaped_output_types_do_not_filter() {
    let catalog = fixture();
    for preset in ["Text", "TextArray", "Markdown", "Code"] {
        let state = FilterState::from_query(&QueryString::parse(&format!("outputType={preset}")));
        assert_eq!(
            filter_models(catalog.list(), &state).len(),
            catalog.len(),
            "preset {preset}"
        );
    }
}

#[test]
fn narrowing_the_capability_filter_never_grows_the_set() {
    let catalog = fixture();
    let wide = FilterState::from_query(&QueryString::parse("capabilities=tools,reasoning"));
    let narrow = FilterState::from_query(&QueryString::parse("capabilities=reasoning"));

    let wide_ids: Vec<&str> = filter_models(catalog.list(), &wide)
        .iter()
        .map(|m| m.id.as_str())
        .collect();
    let narrow_ids: Vec<&str> = filter_models(catalog.list(), &narrow)
        .iter()
        .map(|m| m.id.as_str())
        .collect();

    // OR within the field: wide matches everything with either tag.
    assert_eq!(wide_ids.len(), 5);
    assert_eq!(narrow_ids, ["claude-3-7-sonnet-20250219", "qwq-32b"]);
    assert!(narrow_ids.iter().all(|id| wide_ids.contains(id)));
}

#[test]
fn unknown_values_yield_empty_results_not_errors() {
    let catalog = fixture();
    let response = browse(&catalog, "author=nonexistent&capabilities=madeUp", &opts());
    assert!(as_map(response.models).is_empty());
    assert!(response.links.authors.is_empty());
}

// =============================================================================
// Facets
// =============================================================================

#[test]
fn facets_count_descending_with_first_seen_tie_break() {
    let catalog = fixture();
    let state = FilterState::from_query(&QueryString::parse(""));
    let valid = filter_models(catalog.list(), &state);

    let providers = facet(
        &valid,
        FacetField::Provider,
        None,
        &QueryString::parse(""),
        &opts(),
    );
    let labels: Vec<&str> = providers.keys().map(String::as_str).collect();
    assert_eq!(
        labels,
        ["openai (2)", "google (1)", "anthropic (1)", "openrouter (1)"]
    );
}

#[test]
fn facets_are_computed_over_the_filtered_set() {
    let catalog = fixture();
    let response = browse(&catalog, "capabilities=reasoning", &opts());
    let labels: Vec<&str> = response.links.authors.keys().map(String::as_str).collect();
    assert_eq!(labels, ["anthropic (1)", "qwen (1)"]);
}

#[test]
fn facet_entries_carry_single_value_toggle_urls() {
    let catalog = fixture();
    let response = browse(&catalog, "groupBy=provider", &opts());
    let url = url_of(&response.links.providers["openai (2)"]);
    assert_eq!(
        url,
        "https://models.example.com/api?groupBy=provider&provider=openai"
    );
}

// =============================================================================
// Link blocks
// =============================================================================

#[test]
fn capability_links_are_array_toggles() {
    let catalog = fixture();
    let response = browse(&catalog, "capabilities=tools", &opts());

    // tools is active: its link removes it.
    let tools = url_of(&response.links.capabilities["tools"]);
    assert_eq!(tools, "https://models.example.com/api?");

    // reasoning is not: its link appends it.
    let reasoning = url_of(&response.links.capabilities["reasoning"]);
    assert_eq!(
        reasoning,
        "https://models.example.com/api?capabilities=tools,reasoning"
    );
}

#[test]
fn sort_links_cover_the_allow_list() {
    let catalog = fixture();
    let response = browse(&catalog, "", &opts());
    let keys: Vec<&str> = response.links.sort_by.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        [
            "topWeekly",
            "newest",
            "throughputHighToLow",
            "latencyLowToHigh",
            "pricingLowToHigh",
            "pricingHighToLow"
        ]
    );
}

#[test]
fn create_group_link_starts_an_empty_group() {
    let catalog = fixture();
    let response = browse(&catalog, "", &opts());
    assert_eq!(
        response.links.create_group,
        "https://models.example.com/api?models="
    );
}

#[test]
fn group_presets_are_models_links() {
    let catalog = fixture();
    let response = browse(&catalog, "", &opts());
    let coding = url_of(&response.links.group_presets["coding"]);
    assert_eq!(
        coding,
        "https://models.example.com/api?models=claude-3-7-sonnet,o3-mini,deepseek-v3"
    );
}

// =============================================================================
// Grouping and group creation
// =============================================================================

#[test]
fn models_group_by_author_by_default() {
    let catalog = fixture();
    let groups = as_map(browse(&catalog, "", &opts()).models);
    let keys: Vec<&str> = groups.keys().map(String::as_str).collect();
    assert_eq!(keys, ["openai", "google", "anthropic", "qwen"]);
}

#[test]
fn group_by_provider_regroups_the_map() {
    let catalog = fixture();
    let groups = as_map(browse(&catalog, "groupBy=provider", &opts()).models);
    let keys: Vec<&str> = groups.keys().map(String::as_str).collect();
    assert_eq!(keys, ["openai", "google", "anthropic", "openrouter"]);
}

#[test]
fn grouped_records_collapse_to_bare_urls() {
    let catalog = fixture();
    let groups = as_map(browse(&catalog, "", &opts()).models);
    let openai = match &groups["openai"] {
        Link::Map(inner) => inner,
        other => panic!("unexpected group: {other:?}"),
    };
    let url = url_of(&openai["gpt-4o"]);
    assert_eq!(url, "https://models.example.com/api/gpt-4o-2024-08-06?");
}

#[test]
fn active_sort_yields_a_flat_map() {
    let catalog = fixture();
    let map = as_map(browse(&catalog, "sort=newest", &opts()).models);
    assert!(map.values().all(|v| matches!(v, Link::Url(_))));
    assert_eq!(map.len(), 5);
}

#[test]
fn group_creation_links_accumulate_members() {
    let catalog = fixture();
    let groups = as_map(browse(&catalog, "models=gpt-4o", &opts()).models);
    let google = match &groups["google"] {
        Link::Map(inner) => inner,
        other => panic!("unexpected group: {other:?}"),
    };
    assert_eq!(
        url_of(&google["gemini-1.5-pro"]),
        "https://models.example.com/api?models=gpt-4o,gemini-1.5-pro"
    );
}

#[test]
fn detail_links_carry_active_features_and_drop_consumed_params() {
    let catalog = fixture();
    let groups = as_map(browse(&catalog, "capabilities=reasoning&groupBy=provider", &opts()).models);
    let anthropic = match &groups["anthropic"] {
        Link::Map(inner) => inner,
        other => panic!("unexpected group: {other:?}"),
    };
    assert_eq!(
        url_of(&anthropic["claude-3-7-sonnet"]),
        "https://models.example.com/api/claude-3-7-sonnet-20250219(reasoning)?"
    );
}

#[test]
fn to_llm_link_carries_the_group() {
    let catalog = fixture();
    let response = browse(&catalog, "models=gpt-4o,qwq-32b", &opts());
    assert_eq!(
        response.links.to_llm,
        "https://chat.example.com/chat/arena?model=gpt-4o,qwq-32b"
    );
}

#[test]
fn edit_models_links_point_at_member_detail_views() {
    let catalog = fixture();
    let response = browse(&catalog, "models=gpt-4o", &opts());
    assert_eq!(
        url_of(&response.links.edit_models["gpt-4o"]),
        "https://models.example.com/api/gpt-4o?models=gpt-4o"
    );
}

// =============================================================================
// Single-model shortcut
// =============================================================================

#[test]
fn resolve_single_bypasses_filtering() {
    let catalog = fixture();
    let resolved = resolve_single(&catalog, "claude-3-7-sonnet(reasoning)").unwrap();
    assert_eq!(resolved.resolved_model.id, "claude-3-7-sonnet-20250219");
    assert_eq!(resolved.parsed.capabilities, vec![Capability::Reasoning]);
}

#[test]
fn resolve_single_unknown_model_errors() {
    let catalog = fixture();
    assert!(resolve_single(&catalog, "no-such-model").is_err());
}

// =============================================================================
// Embedded seed smoke test
// =============================================================================

#[test]
fn browse_works_over_the_embedded_seed() {
    let catalog = ModelCatalog::with_embedded_seed();
    let response = browse(&catalog, "outputType=Object", &opts());
    let groups = as_map(response.models);

    // Object output requires structuredOutputs, which gpt-4o has and
    // gemini-1.5-pro does not.
    let openai = match &groups["openai"] {
        Link::Map(inner) => inner,
        other => panic!("unexpected group: {other:?}"),
    };
    assert!(openai.contains_key("gpt-4o"));
    assert!(!groups.contains_key("google") || {
        match &groups["google"] {
            Link::Map(inner) => !inner.contains_key("gemini-1.5-pro"),
            _ => true,
        }
    });
}
