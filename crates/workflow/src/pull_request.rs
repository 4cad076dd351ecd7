//! Draft pull request creation.
//!
//! Opening the PR is the only step that can fail the workflow. Requesting
//! reviewers and adding assignees are independent follow-ups: each failure is
//! logged and reported in [`PullRequestOutcome`], and the PR stays open.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::{
    BranchName, PullRequest, PullRequestDraft, PullRequestManager, RemoteError, UserLogin,
};

#[derive(Debug, Error)]
pub enum PullRequestError {
    #[error("{0} branch name must not be empty")]
    EmptyBranch(&'static str),

    #[error("failed to create pull request: {0}")]
    Remote(#[from] RemoteError),
}

/// What happened to one follow-up call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowUp {
    Applied,
    /// Nobody was configured, so no call was made.
    Skipped,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestOutcome {
    pub pull_request: PullRequest,
    pub reviewers: FollowUp,
    pub assignees: FollowUp,
}

impl PullRequestDraft {
    /// Builds a draft, rejecting an empty head or base branch.
    pub fn new(
        head: &str,
        base: &str,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<Self, PullRequestError> {
        Ok(Self {
            head: BranchName::new(head.trim()).ok_or(PullRequestError::EmptyBranch("head"))?,
            base: BranchName::new(base.trim()).ok_or(PullRequestError::EmptyBranch("base"))?,
            title: title.into(),
            body: body.into(),
        })
    }
}

pub struct PullRequestWorkflow {
    manager: Arc<dyn PullRequestManager>,
    reviewers: Vec<UserLogin>,
    assignees: Vec<UserLogin>,
}

impl PullRequestWorkflow {
    pub fn new(
        manager: Arc<dyn PullRequestManager>,
        reviewers: Vec<UserLogin>,
        assignees: Vec<UserLogin>,
    ) -> Self {
        Self {
            manager,
            reviewers,
            assignees,
        }
    }

    #[instrument(skip(self, draft), fields(head = %draft.head, base = %draft.base))]
    pub async fn create_pr(
        &self,
        draft: &PullRequestDraft,
    ) -> Result<PullRequestOutcome, PullRequestError> {
        let pull_request = self.manager.create_draft(draft).await.map_err(|e| {
            warn!(error = %e, "Failed to create pull request");
            PullRequestError::Remote(e)
        })?;
        info!(number = %pull_request.number, url = %pull_request.html_url, "Draft pull request created");

        let reviewers = if self.reviewers.is_empty() {
            FollowUp::Skipped
        } else {
            match self
                .manager
                .request_reviewers(pull_request.number, &self.reviewers)
                .await
            {
                Ok(()) => FollowUp::Applied,
                Err(e) => {
                    warn!(error = %e, "Failed to request reviewers");
                    FollowUp::Failed(e.to_string())
                }
            }
        };

        let assignees = if self.assignees.is_empty() {
            FollowUp::Skipped
        } else {
            match self
                .manager
                .add_assignees(pull_request.number, &self.assignees)
                .await
            {
                Ok(()) => FollowUp::Applied,
                Err(e) => {
                    warn!(error = %e, "Failed to add assignees");
                    FollowUp::Failed(e.to_string())
                }
            }
        };

        Ok(PullRequestOutcome {
            pull_request,
            reviewers,
            assignees,
        })
    }
}
