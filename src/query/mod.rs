//! Faceted model browsing.
//!
//! Everything here is a pure function of a catalog snapshot and a query
//! string: filtering, facet counting, toggle-link generation, and the
//! grouped response shape. The HTTP layer is a thin wrapper over
//! [`browse`] and [`resolve_single`].

mod engine;
mod links;
mod querystring;

pub use engine::{
    browse, facet, filter_models, resolve_single, BrowseLinks, BrowseResponse, EngineOptions,
    FacetField, FilterState, GroupKey, ResolvedResponse, ALLOWED_SORT_KEYS,
};
pub use links::{Link, LinkMap};
pub use querystring::{ParamKind, QueryString};
