//! Issue service: listing with filter/sort/pagination, CRUD, and request validation.

use validator::{Validate, ValidationErrors};

use crate::errors::{AppError, ValidationIssue};
use crate::models::issue::{CreateIssue, InvalidStatus, Issue, IssuePayload, IssueStatus, UpdateIssue};
use crate::models::pagination::{ListParams, PagedResult, SortOrder};
use crate::store::IssueRepository;

pub const TITLE_MAX_CHARS: usize = 200;
pub const DESCRIPTION_MAX_CHARS: usize = 5000;

/// One issue per text field: length is checked on the raw value first, then
/// the trimmed value must not be blank.
fn text_issue(
    field: &str,
    value: Option<&str>,
    max_chars: usize,
    errors: &ValidationErrors,
) -> Option<ValidationIssue> {
    let value = value?;
    let length_failed = errors
        .field_errors()
        .get(field)
        .is_some_and(|errs| errs.iter().any(|e| e.code == "length"));

    if length_failed {
        return Some(if value.is_empty() {
            ValidationIssue::body(field, "String should have at least 1 character", "string_too_short")
        } else {
            ValidationIssue::body(
                field,
                format!("String should have at most {max_chars} characters"),
                "string_too_long",
            )
        });
    }
    value
        .trim()
        .is_empty()
        .then(|| ValidationIssue::body(field, "Value error, Field cannot be blank", "value_error"))
}

fn parse_status(raw: &str, issues: &mut Vec<ValidationIssue>) -> Option<IssueStatus> {
    match raw.parse() {
        Ok(status) => Some(status),
        Err(InvalidStatus(value)) => {
            tracing::debug!(status = %value, "Rejected issue status");
            issues.push(ValidationIssue::body(
                "status",
                "Input should be 'open' or 'closed'",
                "enum",
            ));
            None
        }
    }
}

fn check_text(payload: &IssuePayload) -> Vec<ValidationIssue> {
    let errors = payload
        .validate()
        .err()
        .unwrap_or_else(ValidationErrors::new);
    [
        text_issue("title", payload.title.as_deref(), TITLE_MAX_CHARS, &errors),
        text_issue(
            "description",
            payload.description.as_deref(),
            DESCRIPTION_MAX_CHARS,
            &errors,
        ),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Validate a create body: title and description are required, status defaults to open.
pub fn validate_create(payload: &IssuePayload) -> Result<CreateIssue, AppError> {
    let mut issues = check_text(payload);
    for (field, value) in [("title", &payload.title), ("description", &payload.description)] {
        if value.is_none() {
            issues.push(ValidationIssue::body(field, "Field required", "missing"));
        }
    }
    let status = match payload.status.as_deref() {
        Some(raw) => parse_status(raw, &mut issues),
        None => Some(IssueStatus::Open),
    };

    match (issues.is_empty(), &payload.title, &payload.description, status) {
        (true, Some(title), Some(description), Some(status)) => Ok(CreateIssue {
            title: title.trim().to_string(),
            description: description.trim().to_string(),
            status,
        }),
        _ => Err(AppError::Validation(sort_issues_by_field(issues))),
    }
}

/// Validate a partial update body; absent or null fields are simply not changed.
pub fn validate_update(payload: &IssuePayload) -> Result<UpdateIssue, AppError> {
    let mut issues = check_text(payload);
    let status = payload
        .status
        .as_deref()
        .and_then(|raw| parse_status(raw, &mut issues));

    if !issues.is_empty() {
        return Err(AppError::Validation(sort_issues_by_field(issues)));
    }
    Ok(UpdateIssue {
        title: payload.title.as_deref().map(|t| t.trim().to_string()),
        description: payload.description.as_deref().map(|d| d.trim().to_string()),
        status,
    })
}

fn sort_issues_by_field(mut issues: Vec<ValidationIssue>) -> Vec<ValidationIssue> {
    let rank = |issue: &ValidationIssue| match issue.field() {
        Some("title") => 0,
        Some("description") => 1,
        Some("status") => 2,
        _ => 3,
    };
    issues.sort_by_key(rank);
    issues
}

/// Keep only issues matching `status_filter`; an empty or absent filter keeps everything.
pub fn filter_by_status(issues: Vec<Issue>, status_filter: Option<&str>) -> Result<Vec<Issue>, AppError> {
    let wanted = match status_filter {
        None | Some("") => return Ok(issues),
        Some("open") => IssueStatus::Open,
        Some("closed") => IssueStatus::Closed,
        Some(_) => {
            return Err(AppError::BadRequest(
                "status_filter must be 'open' or 'closed'".to_string(),
            ))
        }
    };
    Ok(issues.into_iter().filter(|i| i.status == wanted).collect())
}

/// Order by `created_at`, breaking ties by id in the same direction.
pub fn sort_issues(issues: &mut [Issue], order: SortOrder) {
    issues.sort_by(|a, b| {
        let asc = a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id));
        match order {
            SortOrder::Asc => asc,
            SortOrder::Desc => asc.reverse(),
        }
    });
}

/// Page numbers run from 1 to `u32::MAX`; each bound has its own 422 issue.
fn page_number(raw: i64) -> Result<u32, AppError> {
    if raw < 1 {
        return Err(AppError::Validation(vec![ValidationIssue::query(
            "page",
            "Input should be greater than or equal to 1",
            "greater_than_equal",
        )]));
    }
    u32::try_from(raw).map_err(|_| {
        AppError::Validation(vec![ValidationIssue::query(
            "page",
            format!("Input should be less than or equal to {}", u32::MAX),
            "less_than_equal",
        )])
    })
}

/// List issues with filtering, sorting and pagination.
pub async fn list(
    repo: &dyn IssueRepository,
    params: &ListParams,
    per_page: u32,
) -> Result<PagedResult<Issue>, AppError> {
    let page = page_number(params.current_page())?;

    let mut issues = filter_by_status(repo.all().await, params.status_filter.as_deref())?;
    sort_issues(&mut issues, params.sort_order());
    let result = PagedResult::paginate(issues, page, per_page);

    tracing::debug!(
        page = result.page,
        total = result.total,
        status_filter = ?params.status_filter,
        "Listed issues"
    );
    Ok(result)
}

/// Find issue by ID.
pub async fn find_by_id(repo: &dyn IssueRepository, id: i64) -> Result<Issue, AppError> {
    repo.find(id)
        .await
        .ok_or_else(|| AppError::issue_not_found(id))
}

/// Create a new issue.
pub async fn create(repo: &dyn IssueRepository, payload: &IssuePayload) -> Result<Issue, AppError> {
    let input = validate_create(payload)?;
    let issue = repo.insert(input).await;
    tracing::info!(issue_id = issue.id, "Created issue");
    Ok(issue)
}

/// Apply a partial update. The body is validated before the id is looked up.
pub async fn update(
    repo: &dyn IssueRepository,
    id: i64,
    payload: &IssuePayload,
) -> Result<Issue, AppError> {
    let changes = validate_update(payload)?;
    let issue = repo
        .update(id, changes)
        .await
        .ok_or_else(|| AppError::issue_not_found(id))?;
    tracing::info!(issue_id = id, "Updated issue");
    Ok(issue)
}

pub async fn delete(repo: &dyn IssueRepository, id: i64) -> Result<(), AppError> {
    if !repo.remove(id).await {
        return Err(AppError::issue_not_found(id));
    }
    tracing::info!(issue_id = id, "Deleted issue");
    Ok(())
}
