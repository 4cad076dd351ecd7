//! Taskbridge GitHub infrastructure adapter.
//!
//! Implements [`workflow::PullRequestManager`] against the GitHub REST API:
//! draft pull request creation, reviewer requests, and assignee additions.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain domain rules. Headers,
//! authentication, and status-code classification are handled here; the
//! [`workflow`] crate never sees them. The decision that reviewer and assignee
//! failures do not undo PR creation lives in
//! [`workflow::PullRequestWorkflow`].

pub mod client;

pub use client::{GitHubClient, GitHubClientError, GitHubConfig, DEFAULT_API_URL};
