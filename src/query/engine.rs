//! The faceted browse engine.
//!
//! A browse request is a pure function of (catalog snapshot, query string):
//! parse the query into a [`FilterState`], filter the catalog, compute
//! facets over the filtered set, build a per-model link (or a
//! group-accumulation link when a comparison group is being assembled),
//! optionally re-group the result map, and serialize. No state survives a
//! request.

use std::time::Instant;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::catalog::ModelCatalog;
use crate::error::Result;
use crate::identifier::{self, ParsedModelIdentifier};
use crate::telemetry;
use crate::types::{Capability, ModelDescriptor, OutputType};

use super::links::{Link, LinkMap};
use super::querystring::{ParamKind, QueryString};

/// Sort keys accepted from the `sort` parameter. Anything else is ignored.
pub const ALLOWED_SORT_KEYS: &[&str] = &[
    "topWeekly",
    "newest",
    "throughputHighToLow",
    "latencyLowToHigh",
    "pricingLowToHigh",
    "pricingHighToLow",
];

/// Filter params consumed by the browse view; detail links drop them.
const DETAIL_PARAMS: &[&str] = &["groupBy", "capabilities", "provider", "author", "outputType"];

/// Named comparison groups offered under `links.groupPresets`.
const GROUP_PRESETS: &[(&str, &str)] = &[
    ("frontier", "claude-3-7-sonnet,o3-mini,gemini"),
    (
        "frontierReasoning",
        "claude-3-7-sonnet:reasoning,gemini-2.0-flash-thinking-exp-01-21,r1:reasoning,sonar-deep-research:reasoning",
    ),
    ("cheapReasoning", "qwq-32b:reasoning,r1:reasoning"),
    ("coding", "claude-3-7-sonnet,o3-mini,deepseek-v3"),
    ("roleplay", "mythomax-l2-13b,claude-3-7-sonnet"),
    ("cheapAndFast", "gemini,gemma-3,gpt-4o-mini"),
    ("wideRange", "claude-3-7-sonnet,gemini,gpt-4o-mini,qwq-32b"),
];

/// Capability tags offered as toggle links under `links.capabilities`.
const CAPABILITY_TOGGLES: &[Capability] = &[
    Capability::Tools,
    Capability::StructuredOutputs,
    Capability::Reasoning,
    Capability::Vision,
];

// ============================================================================
// Engine options
// ============================================================================

/// Host-supplied addressing for generated links.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Base URL of the browse surface; per-model links are `{base}/{id}`.
    pub base_url: String,
    /// Chat surface that `links.toLLM` points at.
    pub chat_url: String,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            base_url: "/models".to_string(),
            chat_url: "https://llm.do".to_string(),
        }
    }
}

// ============================================================================
// Filter state
// ============================================================================

/// Grouping axis for the response map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    Provider,
    Author,
}

impl GroupKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupKey::Provider => "provider",
            GroupKey::Author => "author",
        }
    }
}

/// Everything the engine reads out of one query string.
///
/// Parsing never fails: unknown values degrade (unknown capability tags
/// match nothing, unknown sort keys are dropped, unknown grouping falls
/// back to author) rather than erroring, so the surface stays browsable.
#[derive(Debug, Clone)]
pub struct FilterState {
    pub provider: Option<String>,
    pub author: Option<String>,
    /// Requested capability tags plus any implied by `output_type`.
    pub capabilities: Vec<Capability>,
    pub output_type: Option<OutputType>,
    /// `None` when grouping is explicitly disabled (`groupBy=` empty).
    pub group_by: Option<GroupKey>,
    /// Active when the query carries a `models` key at all, even empty.
    pub group_creation_mode: bool,
    pub group_models: Vec<String>,
    /// Validated sort key; active sorting suppresses grouping.
    pub sort: Option<String>,
    /// Raw `outputType` parameter text, kept for link construction even
    /// when it names no known preset.
    raw_output_type: Option<String>,
}

impl FilterState {
    /// Read filter state out of a parsed query string.
    pub fn from_query(qs: &QueryString) -> Self {
        let output_type_raw = qs.get("outputType").map(str::to_string);
        let output_type = output_type_raw.as_deref().and_then(OutputType::from_param);

        let mut capabilities: Vec<Capability> = qs
            .get_array("capabilities")
            .into_iter()
            .map(Capability::from)
            .collect();
        // outputType acts as a capability preset: object-shaped outputs
        // require structuredOutputs, text-shaped ones require nothing.
        if let Some(preset) = &output_type {
            for implied in preset.implied_capabilities() {
                if !capabilities.contains(implied) {
                    capabilities.push(implied.clone());
                }
            }
        }

        let group_by = match qs.get("groupBy") {
            None => Some(GroupKey::Author),
            Some("") => None,
            Some("provider") => Some(GroupKey::Provider),
            Some(_) => Some(GroupKey::Author),
        };

        let sort = qs
            .get("sort")
            .filter(|s| ALLOWED_SORT_KEYS.contains(s))
            .map(str::to_string);

        Self {
            provider: qs.get("provider").map(str::to_string),
            author: qs.get("author").map(str::to_string),
            capabilities,
            output_type,
            group_by,
            group_creation_mode: qs.has("models"),
            group_models: qs
                .get_array("models")
                .into_iter()
                .map(str::to_string)
                .collect(),
            sort,
            raw_output_type: output_type_raw,
        }
    }
}

// ============================================================================
// Filtering and faceting
// ============================================================================

/// Apply the filter state to a model list.
///
/// Conjunction across fields; within `capabilities`, a model matches when it
/// has at least one of the requested tags (OR semantics).
pub fn filter_models<'a>(
    models: &'a [ModelDescriptor],
    state: &FilterState,
) -> Vec<&'a ModelDescriptor> {
    models
        .iter()
        .filter(|model| {
            if let Some(provider) = &state.provider {
                if model.provider.as_str() != provider {
                    return false;
                }
            }
            if let Some(author) = &state.author {
                if model.author != *author {
                    return false;
                }
            }
            if !state.capabilities.is_empty() {
                return state.capabilities.iter().any(|cap| model.has_capability(cap));
            }
            true
        })
        .collect()
}

/// Field a facet can be computed over.
#[derive(Debug, Clone, Copy)]
pub enum FacetField {
    Provider,
    Author,
}

impl FacetField {
    fn param(&self) -> &'static str {
        match self {
            FacetField::Provider => "provider",
            FacetField::Author => "author",
        }
    }

    fn of<'a>(&self, model: &'a ModelDescriptor) -> &'a str {
        match self {
            FacetField::Provider => model.provider.as_str(),
            FacetField::Author => model.author.as_str(),
        }
    }
}

/// Count distinct values of `field` across the already-filtered set,
/// restricted further by the field's own active value when one is set.
///
/// Entries are sorted by descending count, ties broken by discovery order,
/// and labeled `{value} ({count})`, each carrying the single-value toggle
/// URL for that field.
pub fn facet(
    models: &[&ModelDescriptor],
    field: FacetField,
    active: Option<&str>,
    qs: &QueryString,
    opts: &EngineOptions,
) -> IndexMap<String, Link> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for model in models {
        let value = field.of(model);
        if active.is_some_and(|a| a != value) {
            continue;
        }
        *counts.entry(value).or_insert(0) += 1;
    }

    // sort_by is stable, so equal counts keep discovery order.
    let mut entries: Vec<(&str, usize)> = counts.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));

    entries
        .into_iter()
        .map(|(value, count)| {
            (
                format!("{value} ({count})"),
                Link::Url(link_url(qs, field.param(), value, ParamKind::String, opts)),
            )
        })
        .collect()
}

/// Run one toggle and render the resulting browse URL.
fn link_url(
    qs: &QueryString,
    param: &str,
    value: &str,
    kind: ParamKind,
    opts: &EngineOptions,
) -> String {
    format!("{}?{}", opts.base_url, qs.modify(param, value, kind))
}

// ============================================================================
// Browse response
// ============================================================================

/// Link block of the browse response.
#[derive(Debug, Serialize)]
pub struct BrowseLinks {
    #[serde(rename = "toLLM")]
    pub to_llm: String,
    #[serde(rename = "createGroup")]
    pub create_group: String,
    #[serde(rename = "groupPresets")]
    pub group_presets: LinkMap,
    #[serde(rename = "editModels")]
    pub edit_models: LinkMap,
    #[serde(rename = "sortBy")]
    pub sort_by: LinkMap,
    #[serde(rename = "groupBy")]
    pub group_by: LinkMap,
    pub capabilities: LinkMap,
    #[serde(rename = "outputType")]
    pub output_type: LinkMap,
    pub providers: LinkMap,
    pub authors: LinkMap,
}

/// Full browse response: the link block plus the (possibly grouped) model
/// name → URL map.
#[derive(Debug, Serialize)]
pub struct BrowseResponse {
    pub links: BrowseLinks,
    pub models: Link,
}

/// Single-model resolution shortcut response.
#[derive(Debug, Serialize)]
pub struct ResolvedResponse {
    #[serde(rename = "resolvedModel")]
    pub resolved_model: ModelDescriptor,
    pub parsed: ParsedModelIdentifier,
}

/// Resolve one identifier against the catalog, bypassing filtering.
pub fn resolve_single(catalog: &ModelCatalog, spec: &str) -> Result<ResolvedResponse> {
    let parsed = identifier::parse(spec)?;
    let resolved = catalog.get(&parsed.model)?;
    Ok(ResolvedResponse {
        resolved_model: resolved.clone(),
        parsed,
    })
}

/// Answer a browse request.
#[instrument(skip(catalog, opts))]
pub fn browse(catalog: &ModelCatalog, raw_query: &str, opts: &EngineOptions) -> BrowseResponse {
    let started = Instant::now();
    let qs = QueryString::parse(raw_query);
    let state = FilterState::from_query(&qs);

    let valid = filter_models(catalog.list(), &state);
    debug!(total = catalog.len(), matched = valid.len(), "filtered catalog");

    let models = build_models_map(&valid, &state, &qs, opts);
    let links = build_links(&valid, &state, &qs, opts);

    metrics::counter!(telemetry::REQUESTS_TOTAL, "operation" => "browse").increment(1);
    metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS, "operation" => "browse")
        .record(started.elapsed().as_secs_f64());

    BrowseResponse { links, models }
}

/// Intermediate per-model record; grouping reads `author`/`provider`, then
/// the response shape collapses each record to just its URL.
struct ModelRecord<'a> {
    name: &'a str,
    author: &'a str,
    provider: &'a str,
    url: String,
}

fn build_models_map(
    valid: &[&ModelDescriptor],
    state: &FilterState,
    qs: &QueryString,
    opts: &EngineOptions,
) -> Link {
    let records: Vec<ModelRecord<'_>> = valid
        .iter()
        .map(|model| {
            let spec = model_exit_spec(model, state);

            let url = if state.group_creation_mode {
                // Accumulate into the comparison group instead of exiting
                // to the detail view.
                let mut group = state.group_models.clone();
                group.push(spec.clone());
                link_url(qs, "models", &group.join(","), ParamKind::String, opts)
            } else {
                let mut query = qs.clone();
                for param in DETAIL_PARAMS {
                    query.remove(param);
                }
                format!("{}/{}?{}", opts.base_url, spec, query)
            };

            ModelRecord {
                name: model.display_name(),
                author: &model.author,
                provider: model.provider.as_str(),
                url,
            }
        })
        .collect();

    // Sorting suppresses grouping; grouping collapses records to bare URLs.
    match state.group_by.filter(|_| state.sort.is_none()) {
        Some(key) => {
            let mut grouped: LinkMap = LinkMap::new();
            for record in records {
                let group_value = match key {
                    GroupKey::Provider => record.provider,
                    GroupKey::Author => record.author,
                };
                let entry = grouped
                    .entry(group_value.to_string())
                    .or_insert_with(|| Link::Map(LinkMap::new()));
                if let Link::Map(inner) = entry {
                    inner.insert(record.name.to_string(), Link::Url(record.url));
                }
            }
            Link::Map(grouped)
        }
        None => Link::Map(
            records
                .into_iter()
                .map(|r| (r.name.to_string(), Link::Url(r.url)))
                .collect(),
        ),
    }
}

/// The identifier a model's link addresses: the base id plus every active
/// capability filter and the raw output type, folded through the parser so
/// the result is in canonical reconstructed form.
fn model_exit_spec(model: &ModelDescriptor, state: &FilterState) -> String {
    let mut features: Vec<&str> = state.capabilities.iter().map(Capability::as_str).collect();
    if let Some(raw) = state.raw_output_type.as_deref() {
        features.push(raw);
    }
    if features.is_empty() {
        return model.id.clone();
    }
    match identifier::parse(&format!("{}({})", model.id, features.join(","))) {
        Ok(parsed) => identifier::reconstruct(&parsed),
        Err(_) => model.id.clone(),
    }
}

fn build_links(
    valid: &[&ModelDescriptor],
    state: &FilterState,
    qs: &QueryString,
    opts: &EngineOptions,
) -> BrowseLinks {
    let group_csv = state.group_models.join(",");

    let mut group_presets = LinkMap::new();
    group_presets.insert(
        "custom".to_string(),
        Link::Url(link_url(qs, "models", &group_csv, ParamKind::String, opts)),
    );
    for (name, members) in GROUP_PRESETS {
        group_presets.insert(
            name.to_string(),
            Link::Url(link_url(qs, "models", members, ParamKind::String, opts)),
        );
    }

    let edit_models: LinkMap = state
        .group_models
        .iter()
        .map(|member| {
            (
                member.clone(),
                Link::Url(format!("{}/{}?{}", opts.base_url, member, qs)),
            )
        })
        .collect();

    let sort_by: LinkMap = ALLOWED_SORT_KEYS
        .iter()
        .map(|key| {
            (
                key.to_string(),
                Link::Url(link_url(qs, "sort", key, ParamKind::String, opts)),
            )
        })
        .collect();

    // Toggling an axis off clears groupBy entirely, which falls back to
    // the default author grouping on the next request.
    let mut group_by = LinkMap::new();
    let provider_value = if state.group_by == Some(GroupKey::Provider) {
        ""
    } else {
        "provider"
    };
    let author_value = if state.group_by == Some(GroupKey::Author) {
        ""
    } else {
        "author"
    };
    group_by.insert(
        "providers".to_string(),
        Link::Url(link_url(qs, "groupBy", provider_value, ParamKind::String, opts)),
    );
    group_by.insert(
        "authors".to_string(),
        Link::Url(link_url(qs, "groupBy", author_value, ParamKind::String, opts)),
    );

    let capabilities: LinkMap = CAPABILITY_TOGGLES
        .iter()
        .map(|cap| {
            (
                cap.as_str().to_string(),
                Link::Url(link_url(qs, "capabilities", cap.as_str(), ParamKind::Array, opts)),
            )
        })
        .collect();

    let output_type: LinkMap = OutputType::ALL
        .iter()
        .map(|preset| {
            (
                preset.as_param().to_string(),
                Link::Url(link_url(qs, "outputType", preset.as_param(), ParamKind::String, opts)),
            )
        })
        .collect();

    BrowseLinks {
        to_llm: format!("{}/chat/arena?model={}", opts.chat_url, group_csv),
        create_group: link_url(qs, "models", "", ParamKind::String, opts),
        group_presets,
        edit_models,
        sort_by,
        group_by,
        capabilities,
        output_type,
        providers: facet(valid, FacetField::Provider, state.provider.as_deref(), qs, opts),
        authors: facet(valid, FacetField::Author, state.author.as_deref(), qs, opts),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProviderId;

    fn fixture() -> ModelCatalog {
        ModelCatalog::from_entries([
            ModelDescriptor::new("gpt-4o-2024-08-06", "openai", "openai")
                .with_alias("gpt-4o")
                .with_capability(Capability::Tools)
                .with_capability(Capability::StructuredOutputs),
            ModelDescriptor::new("gemini-1.5-pro", "google", "google")
                .with_capability(Capability::Tools),
            ModelDescriptor::new("claude-3-7-sonnet-20250219", "anthropic", "anthropic")
                .with_alias("claude-3-7-sonnet")
                .with_capability(Capability::Tools)
                .with_capability(Capability::Reasoning),
        ])
    }

    fn opts() -> EngineOptions {
        EngineOptions::default()
    }

    #[test]
    fn default_state_groups_by_author() {
        let state = FilterState::from_query(&QueryString::parse(""));
        assert_eq!(state.group_by, Some(GroupKey::Author));
        assert!(!state.group_creation_mode);
        assert!(state.sort.is_none());
    }

    #[test]
    fn explicit_empty_group_by_disables_grouping() {
        let state = FilterState::from_query(&QueryString::parse("groupBy="));
        assert_eq!(state.group_by, None);
    }

    #[test]
    fn unknown_sort_keys_are_dropped() {
        let state = FilterState::from_query(&QueryString::parse("sort=alphabetical"));
        assert!(state.sort.is_none());

        let state = FilterState::from_query(&QueryString::parse("sort=newest"));
        assert_eq!(state.sort.as_deref(), Some("newest"));
    }

    #[test]
    fn output_type_expands_to_capability_filter() {
        let catalog = fixture();
        let state = FilterState::from_query(&QueryString::parse("outputType=Object"));
        assert!(state.capabilities.contains(&Capability::StructuredOutputs));

        let matched = filter_models(catalog.list(), &state);
        let ids: Vec<&str> = matched.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["gpt-4o-2024-08-06"]);
    }

    #[test]
    fn capability_filter_is_or_within_field() {
        let catalog = fixture();
        let state =
            FilterState::from_query(&QueryString::parse("capabilities=structuredOutputs,reasoning"));
        let matched = filter_models(catalog.list(), &state);
        let ids: Vec<&str> = matched.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["gpt-4o-2024-08-06", "claude-3-7-sonnet-20250219"]);
    }

    #[test]
    fn unknown_filter_values_yield_empty_results_not_errors() {
        let catalog = fixture();
        let state = FilterState::from_query(&QueryString::parse("provider=nonexistent"));
        assert!(filter_models(catalog.list(), &state).is_empty());

        let response = browse(&catalog, "provider=nonexistent", &opts());
        assert!(response.links.providers.is_empty());
        match response.models {
            Link::Map(map) => assert!(map.is_empty()),
            Link::Url(_) => panic!("models must be a map"),
        }
    }

    #[test]
    fn facet_sorts_by_descending_count_with_first_seen_tie_break() {
        let catalog = ModelCatalog::from_entries([
            ModelDescriptor::new("a", "openai", "openai"),
            ModelDescriptor::new("b", "anthropic", "anthropic"),
            ModelDescriptor::new("c", "openai", "openai"),
        ]);
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
        assert_eq!(labels, ["openai (2)", "anthropic (1)"]);
    }

    #[test]
    fn facet_restricts_by_its_own_active_value() {
        let catalog = fixture();
        let state = FilterState::from_query(&QueryString::parse(""));
        let valid = filter_models(catalog.list(), &state);

        let providers = facet(
            &valid,
            FacetField::Provider,
            Some("google"),
            &QueryString::parse(""),
            &opts(),
        );
        let labels: Vec<&str> = providers.keys().map(String::as_str).collect();
        assert_eq!(labels, ["google (1)"]);
    }

    #[test]
    fn facet_urls_toggle_the_field() {
        let catalog = fixture();
        let state = FilterState::from_query(&QueryString::parse("groupBy=provider"));
        let valid = filter_models(catalog.list(), &state);

        let providers = facet(
            &valid,
            FacetField::Provider,
            None,
            &QueryString::parse("groupBy=provider"),
            &opts(),
        );
        let url = match providers.get("openai (1)") {
            Some(Link::Url(url)) => url,
            other => panic!("unexpected facet entry: {other:?}"),
        };
        assert_eq!(url, "/models?groupBy=provider&provider=openai");
    }

    #[test]
    fn browse_groups_by_author_by_default() {
        let catalog = fixture();
        let response = browse(&catalog, "", &opts());
        let groups = match response.models {
            Link::Map(map) => map,
            Link::Url(_) => panic!("models must be a map"),
        };
        let keys: Vec<&str> = groups.keys().map(String::as_str).collect();
        assert_eq!(keys, ["openai", "google", "anthropic"]);

        // Grouped records collapse to bare URLs keyed by display name.
        match groups.get("openai") {
            Some(Link::Map(inner)) => match inner.get("gpt-4o") {
                Some(Link::Url(url)) => assert!(url.starts_with("/models/gpt-4o-2024-08-06?")),
                other => panic!("unexpected inner entry: {other:?}"),
            },
            other => panic!("unexpected group: {other:?}"),
        }
    }

    #[test]
    fn active_sort_suppresses_grouping() {
        let catalog = fixture();
        let response = browse(&catalog, "sort=newest", &opts());
        let map = match response.models {
            Link::Map(map) => map,
            Link::Url(_) => panic!("models must be a map"),
        };
        // Flat name -> url map, not nested groups.
        assert!(map.values().all(|v| matches!(v, Link::Url(_))));
        assert!(map.contains_key("gpt-4o"));
    }

    #[test]
    fn detail_links_drop_consumed_filter_params() {
        let catalog = fixture();
        let response = browse(&catalog, "capabilities=reasoning&groupBy=provider", &opts());
        let groups = match response.models {
            Link::Map(map) => map,
            Link::Url(_) => panic!("models must be a map"),
        };
        match groups.get("anthropic") {
            Some(Link::Map(inner)) => match inner.get("claude-3-7-sonnet") {
                Some(Link::Url(url)) => {
                    assert_eq!(url, "/models/claude-3-7-sonnet-20250219(reasoning)?");
                }
                other => panic!("unexpected entry: {other:?}"),
            },
            other => panic!("unexpected group: {other:?}"),
        }
    }

    #[test]
    fn group_creation_mode_accumulates_models() {
        let catalog = fixture();
        let response = browse(&catalog, "models=gpt-4o", &opts());
        let state = FilterState::from_query(&QueryString::parse("models=gpt-4o"));
        assert!(state.group_creation_mode);

        let groups = match response.models {
            Link::Map(map) => map,
            Link::Url(_) => panic!("models must be a map"),
        };
        match groups.get("google") {
            Some(Link::Map(inner)) => match inner.get("gemini-1.5-pro") {
                Some(Link::Url(url)) => {
                    assert_eq!(url, "/models?models=gpt-4o,gemini-1.5-pro");
                }
                other => panic!("unexpected entry: {other:?}"),
            },
            other => panic!("unexpected group: {other:?}"),
        }
    }

    #[test]
    fn empty_models_param_still_enters_group_mode() {
        let state = FilterState::from_query(&QueryString::parse("models="));
        assert!(state.group_creation_mode);
        assert!(state.group_models.is_empty());
    }

    #[test]
    fn create_group_link_starts_an_empty_group() {
        let catalog = fixture();
        let response = browse(&catalog, "", &opts());
        assert_eq!(response.links.create_group, "/models?models=");
    }

    #[test]
    fn to_llm_carries_the_active_group() {
        let catalog = fixture();
        let response = browse(&catalog, "models=gpt-4o,claude-3-7-sonnet", &opts());
        assert_eq!(
            response.links.to_llm,
            "https://llm.do/chat/arena?model=gpt-4o,claude-3-7-sonnet"
        );
    }

    #[test]
    fn group_by_links_toggle_the_active_axis_off() {
        let catalog = fixture();
        let response = browse(&catalog, "groupBy=provider", &opts());
        match response.links.group_by.get("providers") {
            // Toggling the active axis clears groupBy; empty params strip.
            Some(Link::Url(url)) => assert_eq!(url, "/models?"),
            other => panic!("unexpected link: {other:?}"),
        }
        match response.links.group_by.get("authors") {
            Some(Link::Url(url)) => assert_eq!(url, "/models?groupBy=author"),
            other => panic!("unexpected link: {other:?}"),
        }
    }

    #[test]
    fn adding_a_capability_never_grows_the_result_set() {
        let catalog = fixture();
        let narrow = FilterState::from_query(&QueryString::parse(
            "capabilities=structuredOutputs,reasoning,vision",
        ));
        let wide =
            FilterState::from_query(&QueryString::parse("capabilities=structuredOutputs,reasoning"));
        let narrow_ids: Vec<&str> = filter_models(catalog.list(), &narrow)
            .iter()
            .map(|m| m.id.as_str())
            .collect();
        let wide_ids: Vec<&str> = filter_models(catalog.list(), &wide)
            .iter()
            .map(|m| m.id.as_str())
            .collect();
        assert!(narrow_ids.len() <= wide_ids.len());
        assert!(narrow_ids.iter().all(|id| wide_ids.contains(id)));
    }

    #[test]
    fn resolve_single_returns_descriptor_and_parse() {
        let catalog = fixture();
        let resolved = resolve_single(&catalog, "gpt-4o(reasoning)").unwrap();
        assert_eq!(resolved.resolved_model.id, "gpt-4o-2024-08-06");
        assert_eq!(resolved.parsed.model, "gpt-4o");
        assert_eq!(resolved.parsed.capabilities, vec![Capability::Reasoning]);
    }

    #[test]
    fn resolve_single_unknown_model_is_not_found() {
        let catalog = fixture();
        let err = resolve_single(&catalog, "nonexistent-model").unwrap_err();
        assert!(matches!(err, crate::error::MuninError::ModelNotFound(_)));
    }

    #[test]
    fn model_param_is_not_a_filter_axis() {
        // `?model=` is the single-model shortcut, handled by the HTTP layer
        // via `resolve_single` before browsing; `browse` itself ignores it.
        let catalog = fixture();
        let keys = |response: &BrowseResponse| match &response.models {
            Link::Map(map) => map.keys().cloned().collect::<Vec<_>>(),
            Link::Url(_) => panic!("models must be a map"),
        };
        assert_eq!(
            keys(&browse(&catalog, "model=gpt-4o", &opts())),
            keys(&browse(&catalog, "", &opts()))
        );
    }

    #[test]
    fn provider_filter_narrows_by_equality() {
        let catalog = fixture();
        let state = FilterState::from_query(&QueryString::parse("provider=openai"));
        let matched = filter_models(catalog.list(), &state);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].provider, ProviderId::OpenAi);
    }
}
