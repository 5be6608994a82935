//! Issue storage: the repository abstraction and its in-memory implementation.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::models::issue::{CreateIssue, Issue, IssueSeed, UpdateIssue};

/// Storage operations the issue service runs against.
///
/// Implementations are injected through [`crate::AppState`], so the service
/// and its tests work against any backing store.
#[async_trait]
pub trait IssueRepository: Send + Sync {
    /// Snapshot of every stored issue, in insertion order.
    async fn all(&self) -> Vec<Issue>;

    async fn find(&self, id: i64) -> Option<Issue>;

    async fn insert(&self, input: CreateIssue) -> Issue;

    /// Apply the present fields and bump `updated_at`. `None` if the id is unknown.
    async fn update(&self, id: i64, changes: UpdateIssue) -> Option<Issue>;

    /// Returns `true` if an issue was removed.
    async fn remove(&self, id: i64) -> bool;

    /// Drop everything and restart ids at 1.
    async fn reset(&self);

    /// Replace the contents with fixtures, numbering them from the next free id.
    async fn seed(&self, seeds: Vec<IssueSeed>) -> Vec<Issue>;
}

#[derive(Debug)]
struct StoreInner {
    issues: Vec<Issue>,
    next_id: i64,
}

impl Default for StoreInner {
    fn default() -> Self {
        Self {
            issues: Vec::new(),
            next_id: 1,
        }
    }
}

/// Process-local store used by tests and the development server.
#[derive(Debug, Default)]
pub struct InMemoryIssueStore {
    inner: RwLock<StoreInner>,
}

impl InMemoryIssueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn now() -> i64 {
    Utc::now().timestamp()
}

#[async_trait]
impl IssueRepository for InMemoryIssueStore {
    async fn all(&self) -> Vec<Issue> {
        self.inner.read().await.issues.clone()
    }

    async fn find(&self, id: i64) -> Option<Issue> {
        self.inner
            .read()
            .await
            .issues
            .iter()
            .find(|issue| issue.id == id)
            .cloned()
    }

    async fn insert(&self, input: CreateIssue) -> Issue {
        let mut inner = self.inner.write().await;
        let ts = now();
        let issue = Issue {
            id: inner.next_id,
            title: input.title,
            description: input.description,
            status: input.status,
            created_at: ts,
            updated_at: ts,
        };
        inner.next_id += 1;
        inner.issues.push(issue.clone());
        issue
    }

    async fn update(&self, id: i64, changes: UpdateIssue) -> Option<Issue> {
        let mut inner = self.inner.write().await;
        let issue = inner.issues.iter_mut().find(|issue| issue.id == id)?;
        if let Some(title) = changes.title {
            issue.title = title;
        }
        if let Some(description) = changes.description {
            issue.description = description;
        }
        if let Some(status) = changes.status {
            issue.status = status;
        }
        issue.updated_at = now();
        Some(issue.clone())
    }

    async fn remove(&self, id: i64) -> bool {
        let mut inner = self.inner.write().await;
        let before = inner.issues.len();
        inner.issues.retain(|issue| issue.id != id);
        inner.issues.len() != before
    }

    async fn reset(&self) {
        *self.inner.write().await = StoreInner::default();
    }

    async fn seed(&self, seeds: Vec<IssueSeed>) -> Vec<Issue> {
        let mut inner = self.inner.write().await;
        let ts = now();
        let first_id = inner.next_id;
        inner.issues = seeds
            .into_iter()
            .zip(first_id..)
            .map(|(seed, id)| seed.into_issue(id, ts))
            .collect();
        inner.next_id = inner
            .issues
            .iter()
            .map(|issue| issue.id + 1)
            .max()
            .unwrap_or(1);
        tracing::debug!(count = inner.issues.len(), "Seeded issue store");
        inner.issues.clone()
    }
}
