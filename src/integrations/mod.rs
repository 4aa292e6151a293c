//! Connected third-party tool integrations.
//!
//! The tools view resolves which external tools (GitHub, Slack, ...) the
//! acting user has connected and renders toggle links that add or remove
//! each tool from a model identifier. The integration service itself is an
//! opaque collaborator behind [`ConnectedIntegrations`]; this module owns
//! the tool-name formatting, the response shape, and a TTL cache so the
//! upstream service is not hit on every request.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::Result;
use crate::identifier;
use crate::query::{EngineOptions, Link, LinkMap, ParamKind, QueryString};
use crate::telemetry;

// ============================================================================
// Collaborator contract
// ============================================================================

/// One connected third-party account.
#[derive(Debug, Clone, Serialize)]
pub struct Connection {
    /// Owning app, upstream-cased (e.g. "GITHUB").
    pub app_name: String,
    /// Connection id at the integration service.
    pub id: String,
}

/// One tool exposed by a connected app, under its upstream id
/// (e.g. "GITHUB_CREATE_ISSUE").
#[derive(Debug, Clone, Serialize)]
pub struct IntegrationTool {
    pub name: String,
}

/// External integration-connection service.
#[async_trait]
pub trait ConnectedIntegrations: Send + Sync {
    /// Connected accounts for a user.
    async fn list(&self, user: &str) -> Result<Vec<Connection>>;

    /// Tools available across the given apps for a user.
    async fn tools(&self, user: &str, apps: &[String]) -> Result<Vec<IntegrationTool>>;
}

/// Fixed in-memory integration set. Useful for tests and for deployments
/// with no integration service configured.
#[derive(Debug, Clone, Default)]
pub struct StaticIntegrations {
    pub connections: Vec<Connection>,
    pub tools: Vec<IntegrationTool>,
}

#[async_trait]
impl ConnectedIntegrations for StaticIntegrations {
    async fn list(&self, _user: &str) -> Result<Vec<Connection>> {
        Ok(self.connections.clone())
    }

    async fn tools(&self, _user: &str, apps: &[String]) -> Result<Vec<IntegrationTool>> {
        Ok(self
            .tools
            .iter()
            .filter(|tool| {
                let app = tool.name.split('_').next().unwrap_or_default();
                apps.iter().any(|a| a.eq_ignore_ascii_case(app))
            })
            .cloned()
            .collect())
    }
}

// ============================================================================
// Caching decorator
// ============================================================================

/// TTL cache configuration for [`CachedIntegrations`].
#[derive(Debug, Clone)]
pub struct IntegrationCacheConfig {
    /// Maximum number of cached users. Default: 10,000.
    pub max_entries: u64,
    /// Time-to-live for cached entries. Default: 5 minutes.
    pub ttl: Duration,
}

impl Default for IntegrationCacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            ttl: Duration::from_secs(300),
        }
    }
}

/// Caches [`ConnectedIntegrations`] responses per user with a TTL.
///
/// Connection sets change only when the user links or unlinks an app, so a
/// short TTL keeps the view fresh enough while absorbing the request fan-out
/// of a browse session. Emits cache hit/miss metrics.
pub struct CachedIntegrations<C> {
    inner: C,
    connections: Cache<String, Arc<Vec<Connection>>>,
    tools: Cache<String, Arc<Vec<IntegrationTool>>>,
}

impl<C: ConnectedIntegrations> CachedIntegrations<C> {
    pub fn new(inner: C, config: &IntegrationCacheConfig) -> Self {
        let connections = Cache::builder()
            .max_capacity(config.max_entries)
            .time_to_live(config.ttl)
            .build();
        let tools = Cache::builder()
            .max_capacity(config.max_entries)
            .time_to_live(config.ttl)
            .build();
        Self {
            inner,
            connections,
            tools,
        }
    }
}

#[async_trait]
impl<C: ConnectedIntegrations> ConnectedIntegrations for CachedIntegrations<C> {
    async fn list(&self, user: &str) -> Result<Vec<Connection>> {
        if let Some(cached) = self.connections.get(user).await {
            metrics::counter!(telemetry::CACHE_HITS_TOTAL, "operation" => "connections")
                .increment(1);
            return Ok(cached.as_ref().clone());
        }
        metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "operation" => "connections")
            .increment(1);

        let fresh = self.inner.list(user).await?;
        self.connections
            .insert(user.to_string(), Arc::new(fresh.clone()))
            .await;
        Ok(fresh)
    }

    async fn tools(&self, user: &str, apps: &[String]) -> Result<Vec<IntegrationTool>> {
        let key = format!("{user}\u{1f}{}", apps.join(","));
        if let Some(cached) = self.tools.get(&key).await {
            metrics::counter!(telemetry::CACHE_HITS_TOTAL, "operation" => "tools").increment(1);
            return Ok(cached.as_ref().clone());
        }
        metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "operation" => "tools").increment(1);

        let fresh = self.inner.tools(user, apps).await?;
        self.tools.insert(key, Arc::new(fresh.clone())).await;
        Ok(fresh)
    }
}

// ============================================================================
// Tool-name formatting
// ============================================================================

/// Format an upstream `APP_ACTION_NAME` tool id as `app.camelCaseAction`.
///
/// `GITHUB_CREATE_ISSUE` → `github.createIssue`. The first underscore-
/// separated segment is the app; the rest is the action.
pub fn format_tool_name(upstream: &str) -> String {
    let mut parts = upstream.split('_');
    let app = parts.next().unwrap_or_default().to_lowercase();
    let mut action = String::new();
    for (i, part) in parts.enumerate() {
        if part.is_empty() {
            continue;
        }
        let lower = part.to_lowercase();
        if i == 0 {
            action.push_str(&lower);
        } else {
            let mut chars = lower.chars();
            if let Some(first) = chars.next() {
                action.push(first.to_ascii_uppercase());
                action.push_str(chars.as_str());
            }
        }
    }
    format!("{app}.{action}")
}

// ============================================================================
// Tools view
// ============================================================================

/// Response of the tools view: a back-link to the browse surface, the
/// tools already enabled on the identifier, and every available tool
/// grouped by owning app. Every tool entry is a toggle link.
#[derive(Debug, Serialize)]
pub struct ToolsResponse {
    pub links: LinkMap,
    #[serde(rename = "activeTools")]
    pub active_tools: LinkMap,
    #[serde(rename = "allTools")]
    pub all_tools: LinkMap,
}

/// Build the tools view for one model identifier.
#[instrument(skip(integrations, opts))]
pub async fn tools_view(
    integrations: &dyn ConnectedIntegrations,
    spec: &str,
    user: &str,
    raw_query: &str,
    opts: &EngineOptions,
) -> Result<ToolsResponse> {
    let qs = QueryString::parse(raw_query);
    let parsed = identifier::parse(spec)?;

    let connections = integrations.list(user).await?;
    let apps: Vec<String> = connections.iter().map(|c| c.app_name.clone()).collect();
    let available = integrations.tools(user, &apps).await?;
    debug!(
        connections = connections.len(),
        tools = available.len(),
        "resolved integrations"
    );

    // Toggling a tool rewrites the identifier and links back into this
    // view. Parentheses are escaped because the identifier lands in the
    // URL path.
    let toggle_url = |name: &str| -> String {
        let formatted = if name.contains('.') {
            name.to_string()
        } else {
            format_tool_name(name)
        };
        let mut next = parsed.clone();
        next.toggle_tool(&formatted);
        format!(
            "{}/tools/{}?{}",
            opts.base_url,
            identifier::reconstruct(&next),
            qs
        )
        .replace('(', "%28")
        .replace(')', "%29")
    };

    let mut all_tools = LinkMap::new();
    for tool in &available {
        let app = tool
            .name
            .split('_')
            .next()
            .unwrap_or_default()
            .to_lowercase();
        let entry = all_tools
            .entry(app)
            .or_insert_with(|| Link::Map(LinkMap::new()));
        if let Link::Map(inner) = entry {
            inner.insert(format_tool_name(&tool.name), Link::Url(toggle_url(&tool.name)));
        }
    }

    let active_tools: LinkMap = parsed
        .tools
        .keys()
        .map(|name| (name.clone(), Link::Url(toggle_url(name))))
        .collect();

    let mut links = LinkMap::new();
    links.insert(
        "models".to_string(),
        Link::Url(format!(
            "{}?{}",
            opts.base_url,
            qs.modify("model", spec, ParamKind::String)
        )),
    );

    Ok(ToolsResponse {
        links,
        active_tools,
        all_tools,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> StaticIntegrations {
        StaticIntegrations {
            connections: vec![
                Connection {
                    app_name: "GITHUB".to_string(),
                    id: "conn-1".to_string(),
                },
                Connection {
                    app_name: "SLACK".to_string(),
                    id: "conn-2".to_string(),
                },
            ],
            tools: vec![
                IntegrationTool {
                    name: "GITHUB_CREATE_ISSUE".to_string(),
                },
                IntegrationTool {
                    name: "GITHUB_LIST_PULL_REQUESTS".to_string(),
                },
                IntegrationTool {
                    name: "SLACK_SEND_MESSAGE".to_string(),
                },
            ],
        }
    }

    #[test]
    fn upstream_tool_ids_format_as_app_dot_action() {
        assert_eq!(format_tool_name("GITHUB_CREATE_ISSUE"), "github.createIssue");
        assert_eq!(
            format_tool_name("GITHUB_LIST_PULL_REQUESTS"),
            "github.listPullRequests"
        );
        assert_eq!(format_tool_name("SLACK_SEND_MESSAGE"), "slack.sendMessage");
    }

    #[tokio::test]
    async fn all_tools_group_by_owning_app() {
        let response = tools_view(
            &fixture(),
            "gpt-4o",
            "user@example.com",
            "",
            &EngineOptions::default(),
        )
        .await
        .unwrap();

        let apps: Vec<&str> = response.all_tools.keys().map(String::as_str).collect();
        assert_eq!(apps, ["github", "slack"]);

        match response.all_tools.get("github") {
            Some(Link::Map(tools)) => {
                assert!(tools.contains_key("github.createIssue"));
                assert!(tools.contains_key("github.listPullRequests"));
            }
            other => panic!("unexpected group: {other:?}"),
        }
    }

    #[tokio::test]
    async fn toggle_links_add_the_tool_and_escape_parens() {
        let response = tools_view(
            &fixture(),
            "gpt-4o",
            "user@example.com",
            "",
            &EngineOptions::default(),
        )
        .await
        .unwrap();

        let url = match &response.all_tools["github"] {
            Link::Map(tools) => match &tools["github.createIssue"] {
                Link::Url(url) => url.clone(),
                other => panic!("unexpected entry: {other:?}"),
            },
            other => panic!("unexpected group: {other:?}"),
        };
        assert_eq!(url, "/models/tools/gpt-4o%28github.createIssue%29?");
    }

    #[tokio::test]
    async fn active_tools_link_to_their_removal() {
        let response = tools_view(
            &fixture(),
            "gpt-4o(github.createIssue)",
            "user@example.com",
            "",
            &EngineOptions::default(),
        )
        .await
        .unwrap();

        match response.active_tools.get("github.createIssue") {
            // Toggling an enabled tool removes it, leaving the bare model.
            Some(Link::Url(url)) => assert_eq!(url, "/models/tools/gpt-4o?"),
            other => panic!("unexpected entry: {other:?}"),
        }
    }

    #[tokio::test]
    async fn cached_decorator_serves_repeat_lookups() {
        let cached = CachedIntegrations::new(fixture(), &IntegrationCacheConfig::default());
        let first = cached.list("user@example.com").await.unwrap();
        let second = cached.list("user@example.com").await.unwrap();
        assert_eq!(first.len(), second.len());

        let apps: Vec<String> = first.iter().map(|c| c.app_name.clone()).collect();
        let tools_first = cached.tools("user@example.com", &apps).await.unwrap();
        let tools_second = cached.tools("user@example.com", &apps).await.unwrap();
        assert_eq!(tools_first.len(), tools_second.len());
        assert_eq!(tools_first.len(), 3);
    }
}
