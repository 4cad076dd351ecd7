//! GitHub REST client for pull-request operations on a single repository.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use workflow::{
    PullRequest, PullRequestDraft, PullRequestManager, PullRequestNumber, RemoteError, UserLogin,
};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

#[derive(Debug, Error)]
pub enum GitHubClientError {
    #[error("token is not a valid header value")]
    InvalidToken,

    #[error("repository owner and name must both be set")]
    MissingRepository,

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Connection settings for [`GitHubClient`].
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    pub token: String,
    pub owner: String,
    pub repo: String,
    pub base_url: String,
}

impl GitHubConfig {
    pub fn new(token: impl Into<String>, owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            owner: owner.into(),
            repo: repo.into(),
            base_url: DEFAULT_API_URL.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct CreatePullRequest<'a> {
    title: &'a str,
    head: &'a str,
    base: &'a str,
    body: &'a str,
    draft: bool,
}

#[derive(Debug, Deserialize)]
struct PullRequestResponse {
    number: u64,
    html_url: String,
}

#[derive(Debug, Serialize)]
struct ReviewersRequest<'a> {
    reviewers: Vec<&'a str>,
}

#[derive(Debug, Serialize)]
struct AssigneesRequest<'a> {
    assignees: Vec<&'a str>,
}

/// [`PullRequestManager`] for one `owner/repo`.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    repo_url: String,
}

impl GitHubClient {
    pub fn new(config: GitHubConfig) -> Result<Self, GitHubClientError> {
        if config.owner.trim().is_empty() || config.repo.trim().is_empty() {
            return Err(GitHubClientError::MissingRepository);
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|_| GitHubClientError::InvalidToken)?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("taskbridge/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            repo_url: format!(
                "{}/repos/{}/{}",
                config.base_url.trim_end_matches('/'),
                config.owner,
                config.repo
            ),
        })
    }
}

#[async_trait]
impl PullRequestManager for GitHubClient {
    #[instrument(skip(self, draft), fields(head = %draft.head, base = %draft.base))]
    async fn create_draft(&self, draft: &PullRequestDraft) -> Result<PullRequest, RemoteError> {
        let request = CreatePullRequest {
            title: &draft.title,
            head: draft.head.as_str(),
            base: draft.base.as_str(),
            body: &draft.body,
            draft: true,
        };
        let created: PullRequestResponse = transport::send_json(
            self.http.post(format!("{}/pulls", self.repo_url)).json(&request),
            format!("repository {}", self.repo_url),
        )
        .await?;

        Ok(PullRequest {
            number: PullRequestNumber::new(created.number),
            html_url: created.html_url,
        })
    }

    #[instrument(skip(self, number, reviewers), fields(number = %number))]
    async fn request_reviewers(
        &self,
        number: PullRequestNumber,
        reviewers: &[UserLogin],
    ) -> Result<(), RemoteError> {
        let request = ReviewersRequest {
            reviewers: reviewers.iter().map(UserLogin::as_str).collect(),
        };
        transport::send(
            self.http
                .post(format!("{}/pulls/{number}/requested_reviewers", self.repo_url))
                .json(&request),
            format!("pull request {number}"),
        )
        .await
        .map(|_| ())
    }

    #[instrument(skip(self, number, assignees), fields(number = %number))]
    async fn add_assignees(
        &self,
        number: PullRequestNumber,
        assignees: &[UserLogin],
    ) -> Result<(), RemoteError> {
        let request = AssigneesRequest {
            assignees: assignees.iter().map(UserLogin::as_str).collect(),
        };
        transport::send(
            self.http
                .post(format!("{}/issues/{number}/assignees", self.repo_url))
                .json(&request),
            format!("issue {number}"),
        )
        .await
        .map(|_| ())
    }
}
