// src/publish.rs
// =============================================================================
// Where a finished report goes.
//
// - GithubIssuePublisher: opens an issue through the GitHub REST API
// - StdoutPublisher: prints title and body (dry run)
//
// The caller only publishes when something is broken.
// =============================================================================

use crate::checker::USER_AGENT;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

pub const DEFAULT_GITHUB_API: &str = "https://api.github.com";

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("request to GitHub failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("GitHub answered HTTP {status}: {message}")]
    Status { status: u16, message: String },
}

/// Accepts a title and a body and delivers them somewhere.
///
/// Returns a link to the published item when the sink has one.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, title: &str, body: &str) -> Result<Option<String>, PublishError>;
}

#[derive(Debug, Clone)]
pub struct GithubIssuePublisher {
    client: Client,
    api_base: String,
    owner: String,
    repo: String,
    token: String,
}

#[derive(Serialize)]
struct NewIssue<'a> {
    title: &'a str,
    body: &'a str,
}

#[derive(Deserialize)]
struct CreatedIssue {
    #[serde(default)]
    html_url: Option<String>,
}

impl GithubIssuePublisher {
    pub fn new(
        client: Client,
        api_base: impl Into<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        GithubIssuePublisher {
            client,
            api_base: api_base.into(),
            owner: owner.into(),
            repo: repo.into(),
            token: token.into(),
        }
    }

    fn issues_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/issues",
            self.api_base.trim_end_matches('/'),
            self.owner,
            self.repo
        )
    }
}

#[async_trait]
impl Publisher for GithubIssuePublisher {
    async fn publish(&self, title: &str, body: &str) -> Result<Option<String>, PublishError> {
        let url = self.issues_url();
        info!(url = %url, title, "opening issue");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .json(&NewIssue { title, body })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PublishError::Status { status: status.as_u16(), message });
        }

        let created: CreatedIssue = response.json().await?;
        if let Some(link) = &created.html_url {
            info!(issue = %link, "issue created");
        }
        Ok(created.html_url)
    }
}

/// Prints the report instead of publishing it.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutPublisher;

#[async_trait]
impl Publisher for StdoutPublisher {
    async fn publish(&self, title: &str, body: &str) -> Result<Option<String>, PublishError> {
        println!("# {}\n\n{}", title, body);
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::local_client;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> Client {
        local_client(Duration::from_secs(5))
    }

    #[test]
    fn test_issues_url() {
        let publisher = GithubIssuePublisher::new(client(), "https://api.github.com/", "r-reactjs", "audit", "t");
        assert_eq!(publisher.issues_url(), "https://api.github.com/repos/r-reactjs/audit/issues");
    }

    #[tokio::test]
    async fn test_publish_creates_issue() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/repos/octo/links/issues"))
            .and(header("authorization", "Bearer secret-token"))
            .and(header("accept", "application/vnd.github+json"))
            .and(body_json(serde_json::json!({
                "title": "2 Broken links",
                "body": "## Broken URLs in Sidebar",
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "number": 7,
                "html_url": "https://github.com/octo/links/issues/7",
            })))
            .expect(1)
            .mount(&server)
            .await;
        let publisher = GithubIssuePublisher::new(client(), server.uri(), "octo", "links", "secret-token");

        let link = publisher.publish("2 Broken links", "## Broken URLs in Sidebar").await.unwrap();

        assert_eq!(link.as_deref(), Some("https://github.com/octo/links/issues/7"));
    }

    #[tokio::test]
    async fn test_publish_surfaces_http_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/repos/octo/links/issues"))
            .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"message": "Bad credentials"}"#))
            .mount(&server)
            .await;
        let publisher = GithubIssuePublisher::new(client(), server.uri(), "octo", "links", "wrong");

        let err = publisher.publish("t", "b").await.unwrap_err();

        match err {
            PublishError::Status { status, message } => {
                assert_eq!(status, 401);
                assert!(message.contains("Bad credentials"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_stdout_publisher() {
        assert_eq!(StdoutPublisher.publish("t", "b").await.unwrap(), None);
    }
}
