//! Issue list state: the `{page, status_filter, sort}` triple, its sync with
//! the persisted query, and the fetch protocol against the issue API.
//!
//! Fetches may overlap. Each one is stamped with a generation number when it
//! is sent, and only the latest generation is allowed to commit; anything
//! older that resolves afterwards is dropped.

use crate::client::{ClientError, IssueApi};
use crate::models::issue::Issue;
use crate::models::pagination::{PageMeta, PagedResult, SortOrder};
use crate::models::query::{ListQuery, PersistedQuery};
use crate::services::pagination_window::PaginationControls;

pub const FETCH_ISSUES_FALLBACK: &str = "Failed to fetch issues";

/// Where the persisted query lives, e.g. the browser URL.
pub trait QueryLocation {
    fn current(&self) -> PersistedQuery;

    /// Overwrite the current entry rather than pushing a new one.
    fn replace(&mut self, query: PersistedQuery);

    fn scroll_to_top(&mut self) {}
}

/// In-memory location that counts writes and scroll requests.
#[derive(Debug, Clone, Default)]
pub struct MemoryLocation {
    query: PersistedQuery,
    pub replacements: usize,
    pub scroll_requests: usize,
}

impl MemoryLocation {
    pub fn new(raw_query: &str) -> Self {
        Self {
            query: PersistedQuery::parse(raw_query),
            ..Self::default()
        }
    }
}

impl QueryLocation for MemoryLocation {
    fn current(&self) -> PersistedQuery {
        self.query.clone()
    }

    fn replace(&mut self, query: PersistedQuery) {
        self.query = query;
        self.replacements += 1;
    }

    fn scroll_to_top(&mut self) {
        self.scroll_requests += 1;
    }
}

/// Overrides for a single fetch; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOptions {
    pub page: Option<u32>,
    pub status_filter: Option<String>,
    pub sort: Option<SortOrder>,
}

/// A dispatched fetch: the resolved query and the generation it belongs to.
#[derive(Debug, Clone)]
pub struct FetchTicket {
    generation: u64,
    query: ListQuery,
    options: FetchOptions,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    Failed,
    /// A newer fetch was dispatched before this one resolved.
    Stale,
}

#[derive(Debug)]
pub struct ListStateManager<A, L> {
    api: A,
    location: L,
    items: Vec<Issue>,
    pagination: PageMeta,
    status_filter: String,
    sort: SortOrder,
    loading: bool,
    error: Option<String>,
    generation: u64,
    initialized: bool,
}

impl<A: IssueApi, L: QueryLocation> ListStateManager<A, L> {
    pub fn new(api: A, location: L) -> Self {
        Self {
            api,
            location,
            items: Vec::new(),
            pagination: PageMeta::default(),
            status_filter: String::new(),
            sort: SortOrder::Desc,
            loading: false,
            error: None,
            generation: 0,
            initialized: false,
        }
    }

    pub fn items(&self) -> &[Issue] {
        &self.items
    }

    pub fn pagination(&self) -> PageMeta {
        self.pagination
    }

    pub fn status_filter(&self) -> &str {
        &self.status_filter
    }

    pub fn sort(&self) -> SortOrder {
        self.sort
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn location(&self) -> &L {
        &self.location
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// The committed triple, with the page taken from the last server response.
    pub fn query(&self) -> ListQuery {
        ListQuery {
            page: self.pagination.page,
            status_filter: self.status_filter.clone(),
            sort: self.sort,
        }
    }

    pub fn controls(&self, max_visible: u32) -> Option<PaginationControls> {
        PaginationControls::new(self.pagination.page, self.pagination.total_pages, max_visible)
    }

    /// Load the first page from the persisted query. Only the first call fetches.
    pub async fn initialize(&mut self) -> Option<FetchOutcome> {
        if self.initialized {
            return None;
        }
        self.initialized = true;
        let start = ListQuery::from_persisted(&self.location.current());
        tracing::debug!(
            page = start.page,
            status_filter = %start.status_filter,
            sort = %start.sort,
            "Initializing issue list"
        );
        Some(
            self.fetch(FetchOptions {
                page: Some(start.page),
                status_filter: Some(start.status_filter),
                sort: Some(start.sort),
            })
            .await,
        )
    }

    pub async fn change_filter(&mut self, status_filter: impl Into<String>) -> FetchOutcome {
        self.fetch(FetchOptions {
            page: Some(1),
            status_filter: Some(status_filter.into()),
            sort: None,
        })
        .await
    }

    pub async fn change_sort(&mut self, sort: SortOrder) -> FetchOutcome {
        self.fetch(FetchOptions {
            page: Some(1),
            status_filter: None,
            sort: Some(sort),
        })
        .await
    }

    pub async fn change_page(&mut self, page: u32) -> FetchOutcome {
        let ticket = self.begin_fetch(FetchOptions {
            page: Some(page),
            ..FetchOptions::default()
        });
        self.location.scroll_to_top();
        let result = self.api.list_issues(ticket.query()).await;
        self.complete_fetch(ticket, result)
    }

    pub async fn fetch(&mut self, options: FetchOptions) -> FetchOutcome {
        let ticket = self.begin_fetch(options);
        let result = self.api.list_issues(ticket.query()).await;
        self.complete_fetch(ticket, result)
    }

    /// Resolve `options` against the current state and mark a fetch in flight.
    pub fn begin_fetch(&mut self, options: FetchOptions) -> FetchTicket {
        self.generation += 1;
        self.loading = true;
        self.error = None;

        let query = ListQuery {
            page: options.page.unwrap_or(self.pagination.page),
            status_filter: options
                .status_filter
                .clone()
                .unwrap_or_else(|| self.status_filter.clone()),
            sort: options.sort.unwrap_or(self.sort),
        };
        FetchTicket {
            generation: self.generation,
            query,
            options,
        }
    }

    /// Commit a fetch result if `ticket` is still the latest dispatched fetch.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<PagedResult<Issue>, ClientError>,
    ) -> FetchOutcome {
        if ticket.generation != self.generation {
            tracing::debug!(
                generation = ticket.generation,
                latest = self.generation,
                "Dropping stale issue list response"
            );
            return FetchOutcome::Stale;
        }
        self.loading = false;

        match result {
            Ok(page) => {
                self.pagination = page.meta();
                self.items = page.items;
                if let Some(status_filter) = ticket.options.status_filter {
                    self.status_filter = status_filter;
                }
                if let Some(sort) = ticket.options.sort {
                    self.sort = sort;
                }
                self.sync_location();
                FetchOutcome::Applied
            }
            Err(e) => {
                tracing::warn!(error = %e, query = ?ticket.query, "Error fetching issues");
                self.error = Some(e.user_message(FETCH_ISSUES_FALLBACK));
                FetchOutcome::Failed
            }
        }
    }

    /// Dismiss the error banner; data is left as is.
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Write the non-default parts of the committed query back, only if they changed.
    fn sync_location(&mut self) {
        let derived = self.query().to_persisted();
        if derived != self.location.current() {
            self.location.replace(derived);
        }
    }
}
