//! Search a Notion task database by title and move every match to a new status.
//!
//! ```text
//! notion-status <search_title> <new_status> [<github_url>]
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::error;

use cli::config::{self, NotionArgs};
use cli::observability;
use workflow::{search_tasks, StatusUpdateError, StatusWorkflow, TaskTracker};

#[derive(Debug, Parser)]
#[command(name = "notion-status", version, about = "Search Notion tasks by title and update their status")]
struct Cli {
    /// Text the task title must contain
    search_title: String,

    /// Status to apply to every match
    new_status: String,

    /// Pull request link stored in the database's GitHub URL property
    github_url: Option<String>,

    #[command(flatten)]
    notion: NotionArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let dotenv = config::load_dotenv();
    let cli: Cli = config::parse_or_exit(&dotenv);
    let _telemetry = observability::init("notion-status")?;
    config::report_dotenv(&dotenv);

    let database = cli.notion.require_database_id()?;
    let tracker: Arc<dyn TaskTracker> = Arc::new(cli.notion.client()?);

    let tasks = match search_tasks(tracker.as_ref(), &database, &cli.search_title).await {
        Ok(tasks) => tasks,
        Err(e) => {
            error!(error = %e, "Search failed");
            eprintln!("Failed to search database: {e}");
            return Ok(ExitCode::FAILURE);
        }
    };

    if tasks.is_empty() {
        println!("\nNo results found for '{}'", cli.search_title);
        return Ok(ExitCode::SUCCESS);
    }

    let workflow = StatusWorkflow::new(tracker).with_default_database(Some(database));
    let mut failures = 0usize;

    println!("\nSearch results for '{}':", cli.search_title);
    for task in &tasks {
        println!("\n{}", task.summary());
        println!("\nUpdating status to {}...", cli.new_status);

        match workflow
            .update_status(&task.id, &cli.new_status, cli.github_url.as_deref())
            .await
        {
            Ok(updated) => {
                println!("Successfully updated status to {}", updated.new_status);
                if let Some(property) = &updated.github_property {
                    println!("Added GitHub URL to '{property}'");
                }
            }
            Err(StatusUpdateError::InvalidStatus { requested, allowed }) => {
                failures += 1;
                println!("Error: Could not find '{requested}' status option");
                println!("Available status options: {}", allowed.join(", "));
            }
            Err(e) => {
                failures += 1;
                println!("Failed to update status: {e}");
            }
        }
    }

    Ok(if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
