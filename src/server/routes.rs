//! HTTP surface of the model browse API.
//!
//! Three routes, all read-only:
//! - `GET /models` — faceted browse, or single-model resolution when a
//!   `model` query parameter is present.
//! - `GET /models/tools/{model}` — connected-tool toggle view.
//! - `GET /models/{*model}` — model detail with capability-toggle links.
//!
//! Every handler works on an immutable catalog snapshot taken at the top
//! of the request, so a concurrent refresh never tears a response.

use std::sync::Arc;

use axum::extract::{Path, RawQuery, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;
use tracing::warn;

use crate::catalog::SharedCatalog;
use crate::identifier;
use crate::integrations::{self, ConnectedIntegrations};
use crate::query::{self, EngineOptions, Link, LinkMap, ParamKind, QueryString};
use crate::MuninError;

/// Model addressed by `/models/tools/{model}` when none is given.
const DEFAULT_TOOLS_MODEL: &str = "gemini";

/// Shared state of all handlers.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<SharedCatalog>,
    pub integrations: Arc<dyn ConnectedIntegrations>,
    pub opts: EngineOptions,
    /// User the integration service is queried for when the request does
    /// not carry a `user` parameter.
    pub default_user: String,
}

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/models", get(browse_models))
        .route("/models/tools/{model}", get(model_tools))
        .route("/models/{*model}", get(model_detail))
        .with_state(state)
}

/// `GET /models`
async fn browse_models(State(state): State<AppState>, RawQuery(raw): RawQuery) -> Response {
    let raw = raw.unwrap_or_default();
    let snapshot = state.catalog.snapshot();
    let qs = QueryString::parse(&raw);

    // Single-model shortcut bypasses filtering entirely.
    if let Some(model) = qs.get("model").filter(|m| !m.is_empty()) {
        return match query::resolve_single(&snapshot, model) {
            Ok(resolved) => Json(resolved).into_response(),
            Err(err) => error_response(err),
        };
    }

    Json(query::browse(&snapshot, &raw, &state.opts)).into_response()
}

/// Link block of the detail view.
#[derive(Debug, Serialize)]
struct DetailLinks {
    #[serde(rename = "toLLM")]
    to_llm: String,
    #[serde(rename = "toModels")]
    to_models: String,
    capabilities: LinkMap,
}

/// Detail view: the resolved descriptor plus capability-toggle links.
#[derive(Debug, Serialize)]
struct DetailResponse {
    links: DetailLinks,
    model: query::ResolvedResponse,
}

/// `GET /models/{*model}`
async fn model_detail(
    State(state): State<AppState>,
    Path(model): Path<String>,
    RawQuery(raw): RawQuery,
) -> Response {
    let snapshot = state.catalog.snapshot();
    let resolved = match query::resolve_single(&snapshot, &model) {
        Ok(resolved) => resolved,
        Err(err) => return error_response(err),
    };
    let canonical = identifier::reconstruct(&resolved.parsed);

    // Each supported capability toggles on the parsed identifier and links
    // back to the rewritten detail view.
    let capabilities: LinkMap = resolved
        .resolved_model
        .capabilities
        .iter()
        .map(|cap| {
            let mut next = resolved.parsed.clone();
            next.toggle_capability(cap.clone());
            (
                cap.as_str().to_string(),
                Link::Url(format!(
                    "{}/{}?{}",
                    state.opts.base_url,
                    identifier::reconstruct(&next),
                    QueryString::parse(raw.as_deref().unwrap_or(""))
                )),
            )
        })
        .collect();

    // When a comparison group is being assembled, the back-link toggles
    // this model's membership in it.
    let mut qs = QueryString::parse(raw.as_deref().unwrap_or(""));
    if qs.has("models") {
        let mut group: Vec<String> = qs
            .get_array("models")
            .into_iter()
            .filter(|member| base_of(member) != resolved.parsed.model)
            .map(str::to_string)
            .collect();
        if qs.get_array("models").len() == group.len() {
            group.push(canonical.clone());
        }
        qs.set("models", group.join(","));
    }

    let links = DetailLinks {
        to_llm: format!("{}/chat?model={}", state.opts.chat_url, canonical),
        to_models: format!("{}?{}", state.opts.base_url, qs),
        capabilities,
    };

    Json(DetailResponse {
        links,
        model: resolved,
    })
    .into_response()
}

/// Base model token of a group member (strips modifiers and suffixes).
fn base_of(member: &str) -> &str {
    let end = member
        .find(['(', ':'])
        .unwrap_or(member.len());
    &member[..end]
}

/// `GET /models/tools/{model}`
async fn model_tools(
    State(state): State<AppState>,
    Path(model): Path<String>,
    RawQuery(raw): RawQuery,
) -> Response {
    let raw = raw.unwrap_or_default();
    let qs = QueryString::parse(&raw);
    // `?model=` overrides the path segment; an absent segment falls back
    // to the default model.
    let spec = qs
        .get("model")
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| {
            if model.is_empty() {
                DEFAULT_TOOLS_MODEL.to_string()
            } else {
                model
            }
        });
    let user = qs
        .get("user")
        .filter(|u| !u.is_empty())
        .unwrap_or(&state.default_user)
        .to_string();

    match integrations::tools_view(state.integrations.as_ref(), &spec, &user, &raw, &state.opts)
        .await
    {
        Ok(view) => Json(view).into_response(),
        Err(err) => error_response(err),
    }
}

/// Map an error to an HTTP status and a `{"error": ...}` body.
fn error_response(err: MuninError) -> Response {
    let status = match &err {
        MuninError::ModelNotFound(_) => StatusCode::NOT_FOUND,
        MuninError::UnsupportedSpec(_) | MuninError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        MuninError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        warn!(error = %err, "request failed");
    }
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}
