//! Pagination and sorting primitives shared by the list endpoint and the list state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Sort direction over `created_at`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    /// The API treats anything other than `asc` as descending.
    pub fn parse_lenient(raw: &str) -> Self {
        raw.parse().unwrap_or_default()
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order '{other}'")),
        }
    }
}

/// Query parameters accepted by `GET /issues`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub status_filter: Option<String>,
    pub sort: Option<String>,
    pub page: Option<i64>,
}

impl ListParams {
    pub fn current_page(&self) -> i64 {
        self.page.unwrap_or(1)
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort
            .as_deref()
            .map(SortOrder::parse_lenient)
            .unwrap_or_default()
    }
}

/// Pagination metadata reported alongside a page of results.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageMeta {
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl Default for PageMeta {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 20,
            total: 0,
            total_pages: 0,
        }
    }
}

impl PageMeta {
    /// One-based index range of the items on this page, `None` when empty.
    pub fn item_range(&self) -> Option<(u64, u64)> {
        if self.total == 0 || self.page == 0 {
            return None;
        }
        let per_page = u64::from(self.per_page);
        let start = (u64::from(self.page) - 1) * per_page + 1;
        let end = (u64::from(self.page) * per_page).min(self.total);
        (start <= end).then_some((start, end))
    }

    /// "Showing 21 to 40 of 45 issues".
    pub fn showing_summary(&self) -> String {
        let (start, end) = self.item_range().unwrap_or((0, 0));
        format!("Showing {start} to {end} of {} issues", self.total)
    }
}

/// Paged result envelope returned by the list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
}

impl<T> PagedResult<T> {
    /// Slice one page out of the full, already filtered and sorted, result set.
    /// An empty set still reports one page.
    pub fn paginate(all: Vec<T>, page: u32, per_page: u32) -> Self {
        let per_page = per_page.max(1);
        let total = all.len() as u64;
        let total_pages = if total == 0 {
            1
        } else {
            total.div_ceil(u64::from(per_page)) as u32
        };
        let offset = (page.max(1) as usize - 1) * per_page as usize;
        let items = all
            .into_iter()
            .skip(offset)
            .take(per_page as usize)
            .collect();
        Self {
            items,
            total,
            page,
            per_page,
            total_pages,
        }
    }

    pub fn meta(&self) -> PageMeta {
        PageMeta {
            page: self.page,
            per_page: self.per_page,
            total: self.total,
            total_pages: self.total_pages,
        }
    }
}
