//! Core domain for Taskbridge.
//!
//! Taskbridge connects a chat webhook, a Notion task database, GitHub pull
//! requests, and an LLM completion endpoint. This crate holds everything that
//! is not transport: identifiers, value types, the port traits the
//! infrastructure crates implement, and the workflows that sequence calls
//! through those ports.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! Workflows receive their collaborators as `Arc<dyn Port>` so they can be
//! unit-tested against in-memory fakes.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`PageId`, `DatabaseId`, `BranchName`, ...) |
//! | [`types`] | Schema, page, change-record, and pull-request value types |
//! | [`errors`] | [`RemoteError`], shared by every port |
//! | [`ports`] | [`TaskTracker`], [`PullRequestManager`], [`CompletionProvider`] |
//! | [`status`] | Status update workflow |
//! | [`command`] | `update status for ...` command grammar |
//! | [`search`] | Title search over a task database |
//! | [`pull_request`] | Draft PR creation with reviewer/assignee follow-ups |
//! | [`pr_body`] | LLM-generated PR description with a static fallback |

pub mod command;
pub mod errors;
pub mod identifiers;
pub mod ports;
pub mod pr_body;
pub mod pull_request;
pub mod search;
pub mod status;
pub mod types;

#[cfg(test)]
mod testing;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use command::{parse_status_command, CommandError, StatusCommand, COMMAND_PREFIX};
pub use errors::RemoteError;
pub use identifiers::{BranchName, DatabaseId, PageId, PullRequestNumber, UserLogin};
pub use ports::{CompletionProvider, PullRequestManager, TaskTracker};
pub use pr_body::{build_prompt, change_bullets, fallback_body, generate_pr_body};
pub use pull_request::{FollowUp, PullRequestError, PullRequestOutcome, PullRequestWorkflow};
pub use search::search_tasks;
pub use status::{StatusUpdateError, StatusUpdated, StatusWorkflow};
pub use types::{
    find_property, github_url_property, ChangeKind, ChangeRecord, DatabaseSchema,
    PageUpdate, PropertyKind, PropertyValue, PullRequest, PullRequestDraft, SchemaProperty,
    StatusOption, TaskPage, TaskPropertyNames,
};
