//! HTTP server for chat webhooks.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use workflow::{parse_status_command, CommandError, StatusUpdateError, StatusWorkflow};

use crate::signature::SignatureVerification;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub workflow: Arc<StatusWorkflow>,
    pub verification: Arc<SignatureVerification>,
}

impl AppState {
    pub fn new(workflow: StatusWorkflow, verification: SignatureVerification) -> Self {
        Self {
            workflow: Arc::new(workflow),
            verification: Arc::new(verification),
        }
    }
}

/// Inbound chat message.
#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    text: String,
}

/// Failures reported to the webhook caller.
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Invalid request body")]
    InvalidBody,

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("Could not find '{requested}' status option")]
    InvalidStatus {
        requested: String,
        allowed: Vec<String>,
    },

    #[error("Failed to update status")]
    UpdateFailed,
}

impl WebhookError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidSignature => StatusCode::UNAUTHORIZED,
            Self::InvalidBody | Self::Command(_) | Self::InvalidStatus { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::UpdateFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            Self::InvalidStatus { allowed, .. } => json!({
                "detail": self.to_string(),
                "allowed": allowed,
            }),
            _ => json!({ "detail": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

impl From<StatusUpdateError> for WebhookError {
    fn from(err: StatusUpdateError) -> Self {
        match err {
            StatusUpdateError::InvalidStatus { requested, allowed } => {
                Self::InvalidStatus { requested, allowed }
            }
            _ => Self::UpdateFailed,
        }
    }
}

/// Build the HTTP router for the webhook service.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/webhook", post(handle_webhook))
        .route("/health", get(health_check))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `POST /webhook`: verify, parse `update status for ...`, apply.
async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, WebhookError> {
    let now = chrono::Utc::now().timestamp();
    if let Err(reason) = state.verification.check(&headers, &body, now) {
        warn!(%reason, "Rejected webhook");
        return Err(WebhookError::InvalidSignature);
    }

    let message: ChatMessage = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "Webhook body is not a JSON message");
        WebhookError::InvalidBody
    })?;

    let command = parse_status_command(&message.text).map_err(|e| {
        warn!(error = %e, "Unrecognised command");
        WebhookError::from(e)
    })?;
    info!(
        page_id = %command.page_id,
        new_status = %command.new_status,
        has_url = command.github_url.is_some(),
        "Status command received"
    );

    state
        .workflow
        .update_status(
            &command.page_id,
            &command.new_status,
            command.github_url.as_deref(),
        )
        .await?;

    Ok(Json(json!({ "message": "Status updated successfully" })))
}

/// Serve the router on `listener` until Ctrl-C.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    let addr = listener.local_addr()?;
    info!(%addr, verification = ?state.verification, "Webhook listener started");
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
