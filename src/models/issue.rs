//! Issue entity and its create/update DTOs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum IssueStatus {
    #[default]
    Open,
    Closed,
}

impl IssueStatus {
    pub const ALL: [IssueStatus; 2] = [IssueStatus::Open, IssueStatus::Closed];

    pub fn as_str(&self) -> &'static str {
        match self {
            IssueStatus::Open => "open",
            IssueStatus::Closed => "closed",
        }
    }

    /// Capitalized label for display, e.g. "Open".
    pub fn display_name(&self) -> &'static str {
        match self {
            IssueStatus::Open => "Open",
            IssueStatus::Closed => "Closed",
        }
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown status string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid status: {0}")]
pub struct InvalidStatus(pub String);

impl FromStr for IssueStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(IssueStatus::Open),
            "closed" => Ok(IssueStatus::Closed),
            _ => Err(InvalidStatus(s.to_string())),
        }
    }
}

/// A tracked issue. Timestamps are Unix seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Issue {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub status: IssueStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateIssue {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub status: IssueStatus,
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UpdateIssue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<IssueStatus>,
}

impl UpdateIssue {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.status.is_none()
    }
}

/// Untyped request body as received by the API, validated into
/// [`CreateIssue`] or [`UpdateIssue`] by the issue service.
#[derive(Debug, Clone, Deserialize, Default, Validate)]
pub struct IssuePayload {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 5000))]
    pub description: Option<String>,
    pub status: Option<String>,
}

impl From<&CreateIssue> for IssuePayload {
    fn from(input: &CreateIssue) -> Self {
        Self {
            title: Some(input.title.clone()),
            description: Some(input.description.clone()),
            status: Some(input.status.as_str().to_string()),
        }
    }
}

impl From<&UpdateIssue> for IssuePayload {
    fn from(input: &UpdateIssue) -> Self {
        Self {
            title: input.title.clone(),
            description: input.description.clone(),
            status: input.status.map(|s| s.as_str().to_string()),
        }
    }
}

/// Fixture for seeding a store; unset fields get generated values.
#[derive(Debug, Clone, Default)]
pub struct IssueSeed {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<IssueStatus>,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

impl IssueSeed {
    pub fn titled(title: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: IssueStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn created_at(mut self, ts: i64) -> Self {
        self.created_at = Some(ts);
        self
    }

    pub(crate) fn into_issue(self, id: i64, now: i64) -> Issue {
        Issue {
            id,
            title: self.title.unwrap_or_else(|| format!("Test Issue {id}")),
            description: self
                .description
                .unwrap_or_else(|| format!("This is a test issue description for issue {id}")),
            status: self.status.unwrap_or_default(),
            created_at: self.created_at.unwrap_or(now),
            updated_at: self.updated_at.unwrap_or(now),
        }
    }
}
