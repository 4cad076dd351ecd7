//! Open a draft pull request, then request the configured reviewers and
//! assignees.
//!
//! ```text
//! draft-pr <head_branch> <base_branch> [--title <title>] [--changes <file>]
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::error;

use cli::config::{self, GitHubArgs, LlmArgs};
use cli::{describe_follow_up, observability, read_changes};
use workflow::{generate_pr_body, PullRequestDraft, PullRequestWorkflow};

#[derive(Debug, Parser)]
#[command(name = "draft-pr", version, about = "Open a draft pull request")]
struct Cli {
    head_branch: String,

    base_branch: String,

    /// Pull request title; defaults to the head branch name
    #[arg(long)]
    title: Option<String>,

    /// JSON change list used to generate the description (`-` for stdin)
    #[arg(long)]
    changes: Option<PathBuf>,

    #[command(flatten)]
    github: GitHubArgs,

    #[command(flatten)]
    llm: LlmArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let dotenv = config::load_dotenv();
    let cli: Cli = config::parse_or_exit(&dotenv);
    let _telemetry = observability::init("draft-pr")?;
    config::report_dotenv(&dotenv);

    let title = cli.title.clone().unwrap_or_else(|| cli.head_branch.clone());
    let mut draft = match PullRequestDraft::new(&cli.head_branch, &cli.base_branch, title, "") {
        Ok(draft) => draft,
        Err(e) => {
            eprintln!("{e}");
            return Ok(ExitCode::FAILURE);
        }
    };

    if let Some(path) = &cli.changes {
        let changes = read_changes(Some(path.as_path()))?;
        draft.body = generate_pr_body(&cli.llm.client()?, &changes).await;
    }

    let workflow = PullRequestWorkflow::new(
        Arc::new(cli.github.client()?),
        cli.github.reviewer_logins(),
        cli.github.assignee_logins(),
    );

    println!("Creating PR from branch: {}", draft.head);
    let outcome = match workflow.create_pr(&draft).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(error = %e, "Pull request was not created");
            eprintln!("Failed to create PR: {e}");
            return Ok(ExitCode::FAILURE);
        }
    };

    println!("Draft PR created: {}", outcome.pull_request.html_url);
    println!("{}", describe_follow_up("Reviewers", &outcome.reviewers));
    println!("{}", describe_follow_up("Assignees", &outcome.assignees));
    Ok(ExitCode::SUCCESS)
}
