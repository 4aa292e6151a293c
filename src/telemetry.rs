//! Telemetry metric name constants.
//!
//! Centralised metric names for munin operations. Consumers install their
//! own `metrics` recorder (e.g. prometheus, statsd); without a recorder
//! installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `munin_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `provider` — provider name (e.g. "openai", "openrouter")
//! - `operation` — entry point invoked (e.g. "browse", "resolve", "chat")
//! - `status` — outcome: "ok" or "error"
//! - `strategy` — how a provider was resolved: "scan" | "catalog" | "fallback"

/// Total requests handled by the query engine and routes.
///
/// Labels: `operation`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "munin_requests_total";

/// Request duration in seconds.
///
/// Labels: `operation`.
pub const REQUEST_DURATION_SECONDS: &str = "munin_request_duration_seconds";

/// Total provider resolutions performed by the router.
///
/// Labels: `provider`, `strategy` ("scan" | "catalog" | "fallback").
pub const ROUTE_RESOLUTIONS_TOTAL: &str = "munin_route_resolutions_total";

/// Total integration-cache hits.
///
/// Labels: `operation`.
pub const CACHE_HITS_TOTAL: &str = "munin_cache_hits_total";

/// Total integration-cache misses.
///
/// Labels: `operation`.
pub const CACHE_MISSES_TOTAL: &str = "munin_cache_misses_total";
