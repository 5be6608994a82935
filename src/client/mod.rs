//! Issue API collaborator: the trait the client-side state machines call,
//! an HTTP implementation, and an in-process one over a repository.

mod error;
mod http;
mod local;

use async_trait::async_trait;

use crate::models::issue::{CreateIssue, Issue, UpdateIssue};
use crate::models::pagination::PagedResult;
use crate::models::query::ListQuery;

pub use error::ClientError;
pub use http::HttpIssueClient;
pub use local::InProcessClient;

/// Operations the issue API offers.
#[async_trait]
pub trait IssueApi: Send + Sync {
    async fn list_issues(&self, query: &ListQuery) -> Result<PagedResult<Issue>, ClientError>;

    async fn get_issue(&self, id: i64) -> Result<Issue, ClientError>;

    async fn create_issue(&self, input: &CreateIssue) -> Result<Issue, ClientError>;

    /// Partial update: only the fields set in `changes` are sent.
    async fn update_issue(&self, id: i64, changes: &UpdateIssue) -> Result<Issue, ClientError>;

    async fn delete_issue(&self, id: i64) -> Result<(), ClientError>;
}
