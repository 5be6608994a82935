//! List query state and its persisted (URL query string) representation.

use std::collections::BTreeMap;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::models::pagination::SortOrder;

const PAGE_KEY: &str = "page";
const STATUS_FILTER_KEY: &str = "status_filter";
const SORT_KEY: &str = "sort";

/// Characters left as-is in query components (RFC 3986 unreserved).
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Flat string-keyed map backing a URL query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedQuery(BTreeMap<String, String>);

impl PersistedQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `a=1&b=two%20words`; a leading `?` is ignored, `+` decodes to a space.
    /// Later duplicates of a key win.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        let pairs = raw
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode_component(key), decode_component(value))
            })
            .collect();
        Self(pairs)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_query_string(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| {
                format!(
                    "{}={}",
                    utf8_percent_encode(k, QUERY_COMPONENT),
                    utf8_percent_encode(v, QUERY_COMPONENT)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

fn decode_component(raw: &str) -> String {
    percent_decode_str(&raw.replace('+', " "))
        .decode_utf8_lossy()
        .into_owned()
}

/// The `{page, status_filter, sort}` triple the issue list is driven by.
///
/// An empty `status_filter` means "all statuses"; any other string is passed
/// through and left to the API to validate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub status_filter: String,
    pub sort: SortOrder,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            status_filter: String::new(),
            sort: SortOrder::Desc,
        }
    }
}

impl ListQuery {
    /// Read the triple from a persisted query, falling back to defaults for
    /// missing keys, non-positive or non-numeric pages, and unknown sorts.
    pub fn from_persisted(query: &PersistedQuery) -> Self {
        let page = query
            .get(PAGE_KEY)
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .filter(|page| *page >= 1)
            .unwrap_or(1);
        let status_filter = query.get(STATUS_FILTER_KEY).unwrap_or_default().to_string();
        let sort = query
            .get(SORT_KEY)
            .map(SortOrder::parse_lenient)
            .unwrap_or_default();
        Self {
            page,
            status_filter,
            sort,
        }
    }

    /// Only non-default fields are written.
    pub fn to_persisted(&self) -> PersistedQuery {
        let mut query = PersistedQuery::new();
        if self.page > 1 {
            query.set(PAGE_KEY, self.page.to_string());
        }
        if !self.status_filter.is_empty() {
            query.set(STATUS_FILTER_KEY, self.status_filter.clone());
        }
        if self.sort != SortOrder::Desc {
            query.set(SORT_KEY, self.sort.as_str());
        }
        query
    }

    /// Query string for `GET /issues`: `status_filter` only when set, `sort` and `page` always.
    pub fn to_request_query(&self) -> String {
        let mut query = PersistedQuery::new();
        if !self.status_filter.is_empty() {
            query.set(STATUS_FILTER_KEY, self.status_filter.clone());
        }
        query.set(SORT_KEY, self.sort.as_str());
        query.set(PAGE_KEY, self.page.to_string());
        query.to_query_string()
    }
}
