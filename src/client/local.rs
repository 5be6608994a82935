use std::sync::Arc;

use async_trait::async_trait;

use super::{ClientError, IssueApi};
use crate::models::issue::{CreateIssue, Issue, IssuePayload, UpdateIssue};
use crate::models::pagination::{ListParams, PagedResult};
use crate::models::query::ListQuery;
use crate::services::issue as issue_service;
use crate::store::IssueRepository;

/// Calls the issue service directly over a repository, skipping HTTP.
///
/// Requests still go through the same validation and error mapping the HTTP
/// API applies.
#[derive(Clone)]
pub struct InProcessClient {
    store: Arc<dyn IssueRepository>,
    per_page: u32,
}

impl InProcessClient {
    pub fn new(store: Arc<dyn IssueRepository>, per_page: u32) -> Self {
        Self { store, per_page }
    }

    pub fn store(&self) -> &Arc<dyn IssueRepository> {
        &self.store
    }
}

#[async_trait]
impl IssueApi for InProcessClient {
    async fn list_issues(&self, query: &ListQuery) -> Result<PagedResult<Issue>, ClientError> {
        let params = ListParams {
            status_filter: (!query.status_filter.is_empty()).then(|| query.status_filter.clone()),
            sort: Some(query.sort.as_str().to_string()),
            page: Some(i64::from(query.page)),
        };
        Ok(issue_service::list(self.store.as_ref(), &params, self.per_page).await?)
    }

    async fn get_issue(&self, id: i64) -> Result<Issue, ClientError> {
        Ok(issue_service::find_by_id(self.store.as_ref(), id).await?)
    }

    async fn create_issue(&self, input: &CreateIssue) -> Result<Issue, ClientError> {
        let payload = IssuePayload::from(input);
        Ok(issue_service::create(self.store.as_ref(), &payload).await?)
    }

    async fn update_issue(&self, id: i64, changes: &UpdateIssue) -> Result<Issue, ClientError> {
        let payload = IssuePayload::from(changes);
        Ok(issue_service::update(self.store.as_ref(), id, &payload).await?)
    }

    async fn delete_issue(&self, id: i64) -> Result<(), ClientError> {
        Ok(issue_service::delete(self.store.as_ref(), id).await?)
    }
}
