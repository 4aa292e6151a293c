//! HATEOAS link values.
//!
//! A link slot is either a plain URL or a nested, insertion-ordered map of
//! labels to further links. Serialization is untagged, so a response reads
//! as plain JSON objects and strings.

use indexmap::IndexMap;
use serde::Serialize;

/// A single link slot: a URL, or a labeled map of more links.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Link {
    Url(String),
    Map(LinkMap),
}

/// Ordered label-to-link map. Insertion order is presentation order.
pub type LinkMap = IndexMap<String, Link>;

impl Link {
    /// Build a map link from `(label, url)` pairs.
    pub fn map_of<I, K, V>(entries: I) -> Link
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Link::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), Link::Url(v.into())))
                .collect(),
        )
    }
}

impl From<String> for Link {
    fn from(url: String) -> Self {
        Link::Url(url)
    }
}

impl From<&str> for Link {
    fn from(url: &str) -> Self {
        Link::Url(url.to_string())
    }
}
