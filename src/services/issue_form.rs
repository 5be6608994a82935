//! Create/edit form state: change detection, minimal patches, and mapping of
//! API validation errors onto form fields.

use std::fmt;
use std::str::FromStr;

use crate::client::{ClientError, IssueApi};
use crate::errors::ValidationIssue;
use crate::models::issue::{CreateIssue, Issue, IssueStatus, UpdateIssue};

pub const VALIDATION_NOTICE: &str = "Please fix the validation errors below";
pub const CREATE_ISSUE_FALLBACK: &str = "Failed to create issue";
pub const UPDATE_ISSUE_FALLBACK: &str = "Failed to update issue";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Title,
    Description,
    Status,
}

impl FormField {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::Title => "title",
            FormField::Description => "description",
            FormField::Status => "status",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormField {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(FormField::Title),
            "description" => Ok(FormField::Description),
            "status" => Ok(FormField::Status),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    pub title: String,
    pub description: String,
    pub status: IssueStatus,
}

impl From<&Issue> for FormValues {
    fn from(issue: &Issue) -> Self {
        Self {
            title: issue.title.clone(),
            description: issue.description.clone(),
            status: issue.status,
        }
    }
}

/// Inline error text per field; `None` means the field is fine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

impl FieldErrors {
    /// Map each validation issue to its field by `loc[1]`. Issues for unknown
    /// fields are ignored; a missing message becomes "Invalid value".
    pub fn from_validation(issues: &[ValidationIssue]) -> Self {
        let mut errors = Self::default();
        for issue in issues {
            let Some(field) = issue.field().and_then(|name| name.parse().ok()) else {
                continue;
            };
            let msg = if issue.msg.is_empty() {
                "Invalid value".to_string()
            } else {
                issue.msg.clone()
            };
            *errors.slot(field) = Some(msg);
        }
        errors
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        match field {
            FormField::Title => self.title.as_deref(),
            FormField::Description => self.description.as_deref(),
            FormField::Status => self.status.as_deref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.status.is_none()
    }

    fn slot(&mut self, field: FormField) -> &mut Option<String> {
        match field {
            FormField::Title => &mut self.title,
            FormField::Description => &mut self.description,
            FormField::Status => &mut self.status,
        }
    }
}

/// Minimal patch from `original` to `current`: text fields are compared and
/// sent trimmed, status is compared as is.
pub fn change_set(original: &FormValues, current: &FormValues) -> UpdateIssue {
    let changed_text = |before: &str, after: &str| {
        let after = after.trim();
        (after != before.trim()).then(|| after.to_string())
    };
    UpdateIssue {
        title: changed_text(&original.title, &current.title),
        description: changed_text(&original.description, &current.description),
        status: (current.status != original.status).then_some(current.status),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated(Issue),
    /// Nothing differed from the original; the API was not called.
    NothingToDo,
}

#[derive(Debug, Clone, Default)]
pub struct IssueForm {
    original: FormValues,
    values: FormValues,
    field_errors: FieldErrors,
    loading: bool,
    error: Option<String>,
}

impl IssueForm {
    /// Blank form for creating an issue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Form pre-filled from an existing issue, for editing.
    pub fn for_issue(issue: &Issue) -> Self {
        let mut form = Self::new();
        form.initialize_from(issue);
        form
    }

    /// Reset values and the original snapshot to `issue`, clearing all errors.
    pub fn initialize_from(&mut self, issue: &Issue) {
        self.original = FormValues::from(issue);
        self.values = self.original.clone();
        self.field_errors = FieldErrors::default();
        self.error = None;
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.values.title = title.into();
        self.field_errors.title = None;
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.values.description = description.into();
        self.field_errors.description = None;
    }

    pub fn set_status(&mut self, status: IssueStatus) {
        self.values.status = status;
        self.field_errors.status = None;
    }

    pub fn has_changes(&self) -> bool {
        !self.change_set().is_empty()
    }

    pub fn change_set(&self) -> UpdateIssue {
        change_set(&self.original, &self.values)
    }

    pub fn create_payload(&self) -> CreateIssue {
        CreateIssue {
            title: self.values.title.trim().to_string(),
            description: self.values.description.trim().to_string(),
            status: self.values.status,
        }
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub async fn submit_create<A: IssueApi + ?Sized>(&mut self, api: &A) -> Result<Issue, ClientError> {
        self.start_submit();
        let result = api.create_issue(&self.create_payload()).await;
        self.finish_submit(result, CREATE_ISSUE_FALLBACK)
    }

    /// Send only the changed fields. With no changes the API is not called.
    pub async fn submit_update<A: IssueApi + ?Sized>(
        &mut self,
        api: &A,
        id: i64,
    ) -> Result<UpdateOutcome, ClientError> {
        self.start_submit();
        let changes = self.change_set();
        if changes.is_empty() {
            self.loading = false;
            tracing::debug!(issue_id = id, "No changes to submit");
            return Ok(UpdateOutcome::NothingToDo);
        }
        let result = api.update_issue(id, &changes).await;
        self.finish_submit(result, UPDATE_ISSUE_FALLBACK)
            .map(UpdateOutcome::Updated)
    }

    fn start_submit(&mut self) {
        self.error = None;
        self.field_errors = FieldErrors::default();
        self.loading = true;
    }

    fn finish_submit(
        &mut self,
        result: Result<Issue, ClientError>,
        fallback: &str,
    ) -> Result<Issue, ClientError> {
        self.loading = false;
        match &result {
            Err(ClientError::ValidationFailed(issues)) => {
                self.field_errors = FieldErrors::from_validation(issues);
                self.error = Some(VALIDATION_NOTICE.to_string());
            }
            Err(e) => {
                tracing::warn!(error = %e, "Issue form submission failed");
                self.error = Some(e.user_message(fallback));
            }
            Ok(_) => {}
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::client::InProcessClient;
    use crate::models::pagination::PagedResult;
    use crate::models::query::ListQuery;
    use crate::models::issue::IssueSeed;
    use crate::store::{InMemoryIssueStore, IssueRepository};

    fn values(title: &str, description: &str, status: IssueStatus) -> FormValues {
        FormValues {
            title: title.to_string(),
            description: description.to_string(),
            status,
        }
    }

    fn sample_issue() -> Issue {
        IssueSeed {
            title: Some("A".to_string()),
            description: Some("B".to_string()),
            ..IssueSeed::default()
        }
        .into_issue(1, 100)
    }

    /// Counts update calls and fails every request with a fixed error.
    struct ScriptedApi {
        updates: AtomicUsize,
        error: fn() -> ClientError,
    }

    impl ScriptedApi {
        fn new(error: fn() -> ClientError) -> Self {
            Self {
                updates: AtomicUsize::new(0),
                error,
            }
        }
    }

    #[async_trait]
    impl IssueApi for ScriptedApi {
        async fn list_issues(&self, _: &ListQuery) -> Result<PagedResult<Issue>, ClientError> {
            Err((self.error)())
        }

        async fn get_issue(&self, _: i64) -> Result<Issue, ClientError> {
            Err((self.error)())
        }

        async fn create_issue(&self, _: &CreateIssue) -> Result<Issue, ClientError> {
            Err((self.error)())
        }

        async fn update_issue(&self, _: i64, _: &UpdateIssue) -> Result<Issue, ClientError> {
            self.updates.fetch_add(1, Ordering::SeqCst);
            Err((self.error)())
        }

        async fn delete_issue(&self, _: i64) -> Result<(), ClientError> {
            Err((self.error)())
        }
    }

    fn title_and_description_invalid() -> ClientError {
        ClientError::ValidationFailed(vec![
            ValidationIssue::body("title", "String should have at least 1 character", "string_too_short"),
            ValidationIssue::body("description", "", "value_error"),
        ])
    }

    fn server_error() -> ClientError {
        ClientError::Api {
            status: 500,
            message: Some("An unexpected database error occurred".to_string()),
        }
    }

    #[test]
    fn change_set_contains_only_changed_title() {
        let original = values("A", "B", IssueStatus::Open);
        let edited = values("A2", "B", IssueStatus::Open);
        assert_eq!(
            change_set(&original, &edited),
            UpdateIssue {
                title: Some("A2".to_string()),
                ..UpdateIssue::default()
            }
        );
    }

    #[test]
    fn change_set_ignores_whitespace_only_edits() {
        let original = values("A", "B", IssueStatus::Open);
        let edited = values("  A ", "B\n", IssueStatus::Open);
        assert!(change_set(&original, &edited).is_empty());
    }

    #[test]
    fn change_set_trims_and_tracks_status() {
        let original = values("A", "B", IssueStatus::Open);
        let edited = values("A", "  new body ", IssueStatus::Closed);
        let patch = change_set(&original, &edited);
        assert_eq!(patch.title, None);
        assert_eq!(patch.description.as_deref(), Some("new body"));
        assert_eq!(patch.status, Some(IssueStatus::Closed));
    }

    #[test]
    fn field_errors_map_by_location() {
        let ClientError::ValidationFailed(issues) = title_and_description_invalid() else {
            unreachable!()
        };
        let errors = FieldErrors::from_validation(&issues);
        assert_eq!(
            errors.get(FormField::Title),
            Some("String should have at least 1 character")
        );
        assert_eq!(errors.get(FormField::Description), Some("Invalid value"));
        assert_eq!(errors.get(FormField::Status), None);
    }

    #[test]
    fn field_errors_skip_unknown_fields() {
        let issues = vec![
            ValidationIssue::body("priority", "bad", "enum"),
            ValidationIssue::query("page", "bad", "greater_than_equal"),
        ];
        assert!(FieldErrors::from_validation(&issues).is_empty());
    }

    #[test]
    fn editing_a_field_clears_only_its_error() {
        let mut form = IssueForm::for_issue(&sample_issue());
        form.field_errors = FieldErrors {
            title: Some("bad".to_string()),
            description: Some("bad".to_string()),
            status: None,
        };
        form.set_title("A3");
        assert_eq!(form.field_errors().title, None);
        assert_eq!(form.field_errors().description.as_deref(), Some("bad"));
    }

    #[test]
    fn new_form_has_defaults() {
        let form = IssueForm::new();
        assert_eq!(form.values(), &values("", "", IssueStatus::Open));
        assert!(!form.has_changes());
        assert!(form.field_errors().is_empty());
    }

    #[test]
    fn initialize_from_resets_errors_and_snapshot() {
        let mut form = IssueForm::new();
        form.set_title("draft");
        form.error = Some("old".to_string());
        form.initialize_from(&sample_issue());
        assert_eq!(form.values().title, "A");
        assert!(!form.has_changes());
        assert_eq!(form.error(), None);
    }

    #[tokio::test]
    async fn update_without_changes_skips_the_api() {
        let api = ScriptedApi::new(server_error);
        let mut form = IssueForm::for_issue(&sample_issue());
        form.set_title(" A ");

        let outcome = form.submit_update(&api, 1).await.unwrap();
        assert_eq!(outcome, UpdateOutcome::NothingToDo);
        assert_eq!(api.updates.load(Ordering::SeqCst), 0);
        assert!(!form.is_loading());
    }

    #[tokio::test]
    async fn update_sends_only_changed_fields() {
        let store = Arc::new(InMemoryIssueStore::new());
        let seeded = store
            .seed(vec![IssueSeed {
                title: Some("A".to_string()),
                description: Some("B".to_string()),
                ..IssueSeed::default()
            }])
            .await;
        let api = InProcessClient::new(store, 20);

        let mut form = IssueForm::for_issue(&seeded[0]);
        form.set_status(IssueStatus::Closed);
        let UpdateOutcome::Updated(issue) = form.submit_update(&api, seeded[0].id).await.unwrap()
        else {
            panic!("expected an update");
        };
        assert_eq!(issue.status, IssueStatus::Closed);
        assert_eq!(issue.title, "A");
    }

    #[tokio::test]
    async fn validation_failure_populates_field_errors() {
        let api = ScriptedApi::new(title_and_description_invalid);
        let mut form = IssueForm::for_issue(&sample_issue());
        form.set_title("");

        let err = form.submit_update(&api, 1).await.unwrap_err();
        assert!(matches!(err, ClientError::ValidationFailed(_)));
        assert_eq!(form.error(), Some(VALIDATION_NOTICE));
        assert!(form.field_errors().title.is_some());
        assert!(form.field_errors().description.is_some());
        assert!(form.field_errors().status.is_none());
        assert!(!form.is_loading());
    }

    #[tokio::test]
    async fn other_failures_set_banner_message() {
        let api = ScriptedApi::new(server_error);
        let mut form = IssueForm::for_issue(&sample_issue());
        form.set_title("A2");

        form.submit_update(&api, 1).await.unwrap_err();
        assert_eq!(form.error(), Some("An unexpected database error occurred"));
        assert!(form.field_errors().is_empty());

        form.clear_error();
        assert_eq!(form.error(), None);
        assert_eq!(form.values().title, "A2");
    }

    #[tokio::test]
    async fn create_failure_without_message_uses_fallback() {
        let api = ScriptedApi::new(|| ClientError::Api {
            status: 500,
            message: None,
        });
        let mut form = IssueForm::new();
        form.set_title("t");
        form.set_description("d");
        form.submit_create(&api).await.unwrap_err();
        assert_eq!(form.error(), Some(CREATE_ISSUE_FALLBACK));
    }

    #[tokio::test]
    async fn create_sends_trimmed_values() {
        let store: Arc<dyn IssueRepository> = Arc::new(InMemoryIssueStore::new());
        let api = InProcessClient::new(store, 20);
        let mut form = IssueForm::new();
        form.set_title("  Login fails  ");
        form.set_description("\tSteps to reproduce ");
        form.set_status(IssueStatus::Closed);

        let issue = form.submit_create(&api).await.unwrap();
        assert_eq!(issue.title, "Login fails");
        assert_eq!(issue.description, "Steps to reproduce");
        assert_eq!(issue.status, IssueStatus::Closed);
    }

    #[tokio::test]
    async fn resubmitting_clears_stale_field_errors() {
        let store: Arc<dyn IssueRepository> = Arc::new(InMemoryIssueStore::new());
        let api = InProcessClient::new(store, 20);
        let mut form = IssueForm::new();
        form.set_description("d");

        form.submit_create(&api).await.unwrap_err();
        assert_eq!(
            form.field_errors().title.as_deref(),
            Some("String should have at least 1 character")
        );

        form.set_description("");
        form.values.title = "ok".to_string();
        form.submit_create(&api).await.unwrap_err();
        assert!(form.field_errors().title.is_none());
        assert!(form.field_errors().description.is_some());
    }
}
