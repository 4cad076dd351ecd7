//! Chat webhook server: `POST /webhook` applies `update status for ...`
//! commands to Notion tasks.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};

use cli::config::{self, NotionArgs, WebhookArgs};
use cli::observability;
use listener::AppState;
use workflow::StatusWorkflow;

#[derive(Debug, Parser)]
#[command(name = "taskbridge-webhook", version, about = "Receive chat commands and update Notion task status")]
struct Cli {
    #[command(flatten)]
    notion: NotionArgs,

    #[command(flatten)]
    webhook: WebhookArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = config::load_dotenv();
    let cli: Cli = config::parse_or_exit(&dotenv);
    let _telemetry = observability::init("taskbridge-webhook")?;
    config::report_dotenv(&dotenv);

    let verification = cli.webhook.verification()?;
    if !verification.is_enforced() {
        warn!("Signature verification is disabled; every request is trusted");
    }

    let tracker = Arc::new(cli.notion.client()?);
    let workflow = StatusWorkflow::new(tracker).with_default_database(cli.notion.database_id());

    let address = cli.webhook.address();
    let tcp = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;

    listener::serve(tcp, AppState::new(workflow, verification)).await?;
    info!("Webhook listener stopped");
    Ok(())
}
