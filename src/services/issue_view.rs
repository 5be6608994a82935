//! Single-issue detail state: load by id, delete, and what to render.

use crate::client::{ClientError, IssueApi};
use crate::models::issue::Issue;

pub const FETCH_ISSUE_FALLBACK: &str = "Failed to fetch issue";
pub const DELETE_ISSUE_FALLBACK: &str = "Failed to delete issue";

/// What the detail page should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueView<'a> {
    Loading,
    NotFound,
    Failed(&'a str),
    Loaded(&'a Issue),
}

#[derive(Debug, Clone, Default)]
pub struct IssueViewer {
    issue: Option<Issue>,
    loading: bool,
    error: Option<String>,
    not_found: bool,
}

impl IssueViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> Option<&Issue> {
        self.issue.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_not_found(&self) -> bool {
        self.not_found
    }

    pub async fn fetch<A: IssueApi + ?Sized>(&mut self, api: &A, id: i64) -> Result<(), ClientError> {
        self.loading = true;
        self.error = None;
        self.not_found = false;

        let result = api.get_issue(id).await;
        self.loading = false;
        match result {
            Ok(issue) => {
                self.issue = Some(issue);
                Ok(())
            }
            Err(e) => {
                self.issue = None;
                if e.is_not_found() {
                    tracing::debug!(issue_id = id, "Issue not found");
                    self.not_found = true;
                } else {
                    tracing::warn!(issue_id = id, error = %e, "Failed to fetch issue");
                    self.error = Some(e.user_message(FETCH_ISSUE_FALLBACK));
                }
                Err(e)
            }
        }
    }

    /// Delete the issue. On failure the loaded issue is kept and the error is
    /// recorded for display.
    pub async fn delete<A: IssueApi + ?Sized>(&mut self, api: &A, id: i64) -> Result<(), ClientError> {
        self.loading = true;
        self.error = None;

        let result = api.delete_issue(id).await;
        self.loading = false;
        match result {
            Ok(()) => {
                tracing::info!(issue_id = id, "Issue deleted");
                self.issue = None;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(issue_id = id, error = %e, "Failed to delete issue");
                self.error = Some(e.user_message(DELETE_ISSUE_FALLBACK));
                Err(e)
            }
        }
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn view(&self) -> IssueView<'_> {
        if self.loading {
            return IssueView::Loading;
        }
        if self.not_found {
            return IssueView::NotFound;
        }
        match (&self.issue, &self.error) {
            (Some(issue), _) => IssueView::Loaded(issue),
            (None, Some(error)) => IssueView::Failed(error),
            (None, None) => IssueView::NotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::client::InProcessClient;
    use crate::models::issue::{IssueSeed, IssueStatus};
    use crate::store::{InMemoryIssueStore, IssueRepository};

    async fn api_with_one_issue() -> InProcessClient {
        let store = Arc::new(InMemoryIssueStore::new());
        store
            .seed(vec![IssueSeed::titled("Broken login").with_status(IssueStatus::Closed)])
            .await;
        InProcessClient::new(store, 20)
    }

    #[test]
    fn fresh_viewer_shows_not_found() {
        assert_eq!(IssueViewer::new().view(), IssueView::NotFound);
    }

    #[tokio::test]
    async fn fetch_loads_issue() {
        let api = api_with_one_issue().await;
        let mut viewer = IssueViewer::new();
        viewer.fetch(&api, 1).await.unwrap();

        let IssueView::Loaded(issue) = viewer.view() else {
            panic!("expected a loaded issue");
        };
        assert_eq!(issue.title, "Broken login");
        assert!(!viewer.is_loading());
    }

    #[tokio::test]
    async fn missing_issue_sets_not_found_flag() {
        let api = api_with_one_issue().await;
        let mut viewer = IssueViewer::new();
        let err = viewer.fetch(&api, 99).await.unwrap_err();

        assert!(err.is_not_found());
        assert!(viewer.is_not_found());
        assert_eq!(viewer.error(), None);
        assert_eq!(viewer.view(), IssueView::NotFound);
    }

    #[tokio::test]
    async fn refetch_after_not_found_resets_flag() {
        let api = api_with_one_issue().await;
        let mut viewer = IssueViewer::new();
        viewer.fetch(&api, 99).await.unwrap_err();
        viewer.fetch(&api, 1).await.unwrap();
        assert!(!viewer.is_not_found());
        assert!(matches!(viewer.view(), IssueView::Loaded(_)));
    }

    #[tokio::test]
    async fn delete_clears_issue() {
        let api = api_with_one_issue().await;
        let mut viewer = IssueViewer::new();
        viewer.fetch(&api, 1).await.unwrap();
        viewer.delete(&api, 1).await.unwrap();

        assert!(viewer.issue().is_none());
        assert!(api.get_issue(1).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn failed_delete_keeps_issue_and_reports() {
        let api = api_with_one_issue().await;
        let mut viewer = IssueViewer::new();
        viewer.fetch(&api, 1).await.unwrap();
        api.store().remove(1).await;

        viewer.delete(&api, 1).await.unwrap_err();
        assert_eq!(viewer.error(), Some("Issue with id 1 not found"));
        assert!(matches!(viewer.view(), IssueView::Loaded(_)));

        viewer.clear_error();
        assert_eq!(viewer.error(), None);
    }
}
