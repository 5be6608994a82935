use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::{ClientError, IssueApi};
use crate::config::AppConfig;
use crate::models::issue::{CreateIssue, Issue, UpdateIssue};
use crate::models::pagination::PagedResult;
use crate::models::query::ListQuery;

const ISSUES_PATH: &str = "/api/v1/issues";

/// Client for the issue REST API.
#[derive(Debug, Clone)]
pub struct HttpIssueClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpIssueClient {
    /// Creates a client for `base_url` (e.g. `http://localhost:8000`).
    ///
    /// # Errors
    /// Returns an error if the URL is not http(s) or the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let base_url = base_url.trim().trim_end_matches('/').to_owned();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::InvalidBaseUrl(base_url));
        }
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ClientError> {
        Self::new(&config.api_base_url, config.request_timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn issues_url(&self) -> String {
        format!("{}{ISSUES_PATH}", self.base_url)
    }

    fn issue_url(&self, id: i64) -> String {
        format!("{}{ISSUES_PATH}/{id}", self.base_url)
    }

    /// Turn a response into `T`, or into the matching [`ClientError`].
    async fn read_json<T: DeserializeOwned>(
        response: reqwest::Response,
        context: &str,
    ) -> Result<T, ClientError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), context, "Issue API returned an error");
            return Err(ClientError::from_response(status.as_u16(), &body));
        }
        serde_json::from_str(&body).map_err(|source| ClientError::Decode {
            context: context.to_string(),
            source,
        })
    }
}

#[async_trait]
impl IssueApi for HttpIssueClient {
    async fn list_issues(&self, query: &ListQuery) -> Result<PagedResult<Issue>, ClientError> {
        let url = format!("{}?{}", self.issues_url(), query.to_request_query());
        tracing::debug!(%url, "Fetching issues");
        let response = self.client.get(url).send().await?;
        Self::read_json(response, "issue list").await
    }

    async fn get_issue(&self, id: i64) -> Result<Issue, ClientError> {
        tracing::debug!(issue_id = id, "Fetching issue");
        let response = self.client.get(self.issue_url(id)).send().await?;
        Self::read_json(response, "issue").await
    }

    async fn create_issue(&self, input: &CreateIssue) -> Result<Issue, ClientError> {
        let response = self
            .client
            .post(self.issues_url())
            .json(input)
            .send()
            .await?;
        Self::read_json(response, "created issue").await
    }

    async fn update_issue(&self, id: i64, changes: &UpdateIssue) -> Result<Issue, ClientError> {
        let response = self
            .client
            .patch(self.issue_url(id))
            .json(changes)
            .send()
            .await?;
        Self::read_json(response, "updated issue").await
    }

    async fn delete_issue(&self, id: i64) -> Result<(), ClientError> {
        let response = self.client.delete(self.issue_url(id)).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await?;
        Err(ClientError::from_response(status.as_u16(), &body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let client = HttpIssueClient::new("http://localhost:8000/ ", None).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.issue_url(4), "http://localhost:8000/api/v1/issues/4");
    }

    #[test]
    fn rejects_non_http_base_url() {
        let err = HttpIssueClient::new("localhost:8000", None).unwrap_err();
        assert!(matches!(err, ClientError::InvalidBaseUrl(_)));
    }
}
