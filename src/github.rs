//! Issue tracker collaborator
//!
//! Narrow contract over the tracking repository: list open issues, label
//! them, and post result comments. The pipeline is generic over
//! [`IssueTracker`] so tests can swap in an in-memory tracker.

use serde::Deserialize;

use crate::config::GithubConfig;
use crate::error::{ConductorError, ConductorResult};

/// Label applied when an issue carries no parsable conductor tag
pub const MISSING_METADATA_LABEL: &str = "missing-metadata";

/// An issue label
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Label {
    pub name: String,
}

/// A tracking issue as returned by the tracker
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub labels: Vec<Label>,
    /// Present when the "issue" is actually a pull request
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
}

impl Issue {
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|label| label.name == name)
    }

    pub fn body(&self) -> &str {
        self.body.as_deref().unwrap_or("")
    }
}

/// Capability contract for the issue-tracking collaborator
#[allow(async_fn_in_trait)]
pub trait IssueTracker {
    async fn open_issues(&self) -> ConductorResult<Vec<Issue>>;
    async fn add_label(&self, issue_number: u64, label: &str) -> ConductorResult<()>;
    async fn post_comment(&self, issue_number: u64, body: &str) -> ConductorResult<()>;
}

/// GitHub REST implementation of [`IssueTracker`]
pub struct GithubClient {
    http: reqwest::Client,
    token: String,
    repo: String,
    base_url: String,
}

impl GithubClient {
    pub fn new(config: &GithubConfig) -> Self {
        Self::with_base_url(config, "https://api.github.com")
    }

    /// Point the client at a different API root (test servers)
    pub fn with_base_url(config: &GithubConfig, base_url: &str) -> Self {
        Self {
            http: reqwest::Client::builder()
                .user_agent("conductor/1.0")
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("reqwest client should build"),
            token: config.token.clone(),
            repo: config.repo.clone(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn issues_url(&self, suffix: &str) -> String {
        format!("{}/repos/{}/issues{}", self.base_url, self.repo, suffix)
    }

    async fn check(resp: reqwest::Response) -> ConductorResult<reqwest::Response> {
        if !resp.status().is_success() {
            return Err(ConductorError::Tracker {
                status: resp.status().as_u16(),
                message: resp.text().await.unwrap_or_default(),
            });
        }
        Ok(resp)
    }
}

impl IssueTracker for GithubClient {
    /// List open issues, dropping pull requests (the issues endpoint
    /// returns both).
    async fn open_issues(&self) -> ConductorResult<Vec<Issue>> {
        let resp = self
            .http
            .get(self.issues_url("?state=open&per_page=100"))
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?;

        let issues: Vec<Issue> = Self::check(resp).await?.json().await?;

        Ok(issues
            .into_iter()
            .filter(|issue| issue.pull_request.is_none())
            .collect())
    }

    async fn add_label(&self, issue_number: u64, label: &str) -> ConductorResult<()> {
        let resp = self
            .http
            .post(self.issues_url(&format!("/{}/labels", issue_number)))
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .json(&serde_json::json!({ "labels": [label] }))
            .send()
            .await?;

        Self::check(resp).await.map(|_| ())
    }

    async fn post_comment(&self, issue_number: u64, body: &str) -> ConductorResult<()> {
        let resp = self
            .http
            .post(self.issues_url(&format!("/{}/comments", issue_number)))
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .json(&serde_json::json!({ "body": body }))
            .send()
            .await?;

        Self::check(resp).await.map(|_| ())
    }
}
