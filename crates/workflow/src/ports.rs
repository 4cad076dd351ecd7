//! Port traits implemented by the infrastructure crates.
//!
//! | Trait | Implemented by |
//! |-------|----------------|
//! | [`TaskTracker`] | `notion::NotionClient` |
//! | [`PullRequestManager`] | `github::GitHubClient` |
//! | [`CompletionProvider`] | `llm::ChatCompletionClient` |
//!
//! The traits use `async-trait` so workflows can hold them as
//! `Arc<dyn Trait>`.

use async_trait::async_trait;

use crate::{
    DatabaseId, DatabaseSchema, PageId, PageUpdate, PullRequest, PullRequestDraft,
    PullRequestNumber, RemoteError, TaskPage, TaskPropertyNames, UserLogin,
};

/// Read/write access to the task-tracking service.
#[async_trait]
pub trait TaskTracker: Send + Sync {
    /// Property names this tracker reads and writes.
    fn property_names(&self) -> &TaskPropertyNames;

    /// Confirms the configured credentials are accepted.
    async fn verify_credentials(&self) -> Result<(), RemoteError>;

    /// Fetches one task page.
    async fn get_page(&self, page_id: &PageId) -> Result<TaskPage, RemoteError>;

    /// Fetches a database schema, including status options.
    async fn get_database(&self, database_id: &DatabaseId) -> Result<DatabaseSchema, RemoteError>;

    /// Applies property writes to a page.
    async fn update_page(&self, page_id: &PageId, update: &PageUpdate) -> Result<(), RemoteError>;

    /// Returns every page in `database_id` whose title contains `title_contains`.
    async fn query_tasks(
        &self,
        database_id: &DatabaseId,
        title_contains: &str,
    ) -> Result<Vec<TaskPage>, RemoteError>;
}

/// Pull-request operations on one repository.
#[async_trait]
pub trait PullRequestManager: Send + Sync {
    /// Opens `draft` as a draft pull request.
    async fn create_draft(&self, draft: &PullRequestDraft) -> Result<PullRequest, RemoteError>;

    async fn request_reviewers(
        &self,
        number: PullRequestNumber,
        reviewers: &[UserLogin],
    ) -> Result<(), RemoteError>;

    async fn add_assignees(
        &self,
        number: PullRequestNumber,
        assignees: &[UserLogin],
    ) -> Result<(), RemoteError>;
}

/// A single-turn text completion service.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Sends `prompt` as one user message and returns the reply text.
    async fn complete(&self, prompt: &str) -> Result<String, RemoteError>;
}
