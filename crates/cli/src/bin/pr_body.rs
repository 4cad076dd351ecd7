//! Print a pull-request description generated from a JSON change list.

use std::path::PathBuf;

use clap::Parser;

use cli::config::{self, LlmArgs};
use cli::{observability, read_changes};
use workflow::generate_pr_body;

#[derive(Debug, Parser)]
#[command(name = "pr-body", version, about = "Generate a pull request description")]
struct Cli {
    /// JSON array of change records; reads stdin when omitted
    changes: Option<PathBuf>,

    #[command(flatten)]
    llm: LlmArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = config::load_dotenv();
    let cli: Cli = config::parse_or_exit(&dotenv);
    let _telemetry = observability::init("pr-body")?;
    config::report_dotenv(&dotenv);

    let changes = read_changes(cli.changes.as_deref())?;
    let provider = cli.llm.client()?;
    println!("{}", generate_pr_body(&provider, &changes).await);
    Ok(())
}
