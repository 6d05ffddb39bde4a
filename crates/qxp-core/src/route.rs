//! URL fragment parsing.
//!
//! A fragment such as `#/marketing/solutions/bursar?ref=nav` becomes a
//! [`Route`] with segments `["solutions", "bursar"]` and query
//! `{ref: "nav"}`. Parsing never fails: anything that cannot be understood
//! is dropped.

use std::collections::BTreeMap;

use serde::Serialize;

/// Alias segment kept for links written before the site moved off the
/// `#/marketing/...` paths. Stripped once, ahead of view matching.
pub const LEGACY_PREFIX: &str = "marketing";

/// A parsed URL fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Route {
    /// Path parts after prefix stripping, empty parts removed.
    pub segments: Vec<String>,
    /// Percent-decoded query parameters. The first occurrence of a key wins.
    pub query: BTreeMap<String, String>,
}

impl Route {
    /// Parse a fragment. A leading `#` and a single leading `/` are optional.
    #[must_use]
    pub fn parse(fragment: &str) -> Self {
        let body = fragment.strip_prefix('#').unwrap_or(fragment);
        let body = body.strip_prefix('/').unwrap_or(body);

        let (path, query) = match body.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (body, None),
        };

        let mut segments: Vec<String> = path
            .split('/')
            .filter(|part| !part.is_empty())
            .map(str::to_owned)
            .collect();
        if segments.first().is_some_and(|first| first == LEGACY_PREFIX) {
            segments.remove(0);
        }

        Self {
            segments,
            query: query.map(parse_query).unwrap_or_default(),
        }
    }

    /// The segment that selects the view.
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        self.segments.first().map(String::as_str)
    }

    /// The view parameter, if any.
    #[must_use]
    pub fn param(&self) -> Option<&str> {
        self.segments.get(1).map(String::as_str)
    }

    /// Look up a query parameter.
    #[must_use]
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }
}

/// Parse `a=1&b=two%20words`. Pairs with an empty key or undecodable text
/// are skipped; a bare key maps to the empty string.
fn parse_query(raw: &str) -> BTreeMap<String, String> {
    let mut query = BTreeMap::new();
    for pair in raw.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let (Some(key), Some(value)) = (decode(key), decode(value)) else {
            tracing::debug!(pair, "dropping undecodable query pair");
            continue;
        };
        if key.is_empty() {
            continue;
        }
        query.entry(key).or_insert(value);
    }
    query
}

fn decode(component: &str) -> Option<String> {
    let spaced = component.replace('+', " ");
    urlencoding::decode(&spaced).ok().map(std::borrow::Cow::into_owned)
}
