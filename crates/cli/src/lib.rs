//! Taskbridge composition root.
//!
//! This crate owns the process edges for every binary:
//!
//! 1. **Configuration**: load `.env`, parse [`config`] argument groups with
//!    environment fallbacks.
//! 2. **Observability**: install the `tracing` subscriber from
//!    [`observability`].
//! 3. **Wiring**: construct the Notion, GitHub, and LLM adapters and inject
//!    them into the [`workflow`] crate's workflows.
//!
//! | Binary | Purpose |
//! |--------|---------|
//! | `taskbridge-webhook` | Chat webhook server |
//! | `notion-status` | Search tasks by title and update their status |
//! | `draft-pr` | Open a draft pull request with reviewers and assignees |
//! | `pr-body` | Print a generated pull-request description |

pub mod config;
pub mod observability;

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use workflow::{ChangeRecord, FollowUp};

/// Parses a JSON array of change records.
pub fn parse_changes(json: &str) -> anyhow::Result<Vec<ChangeRecord>> {
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(json).context("change list must be a JSON array of change records")
}

/// Reads change records from `path`, or from stdin when `path` is `None` or `-`.
pub fn read_changes(path: Option<&Path>) -> anyhow::Result<Vec<ChangeRecord>> {
    let json = match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p)
            .with_context(|| format!("failed to read {}", p.display()))?,
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read change list from stdin")?;
            buf
        }
    };
    parse_changes(&json)
}

/// One-line report for a pull-request follow-up.
pub fn describe_follow_up(what: &str, follow_up: &FollowUp) -> String {
    match follow_up {
        FollowUp::Applied => format!("{what}: added"),
        FollowUp::Skipped => format!("{what}: none configured"),
        FollowUp::Failed(reason) => format!("{what}: failed ({reason})"),
    }
}
