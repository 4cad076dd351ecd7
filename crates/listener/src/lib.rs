//! Taskbridge chat webhook receiver.
//!
//! Accepts `POST /webhook` deliveries from the chat workspace, verifies the
//! request signature, parses the `update status for <page_id> to <status>
//! [<github_url>]` command, and hands it to [`workflow::StatusWorkflow`].
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** HTTP routing, signature checks, and status-code
//! mapping live here. Command grammar and status validation belong to the
//! [`workflow`] crate.
//!
//! ## Responses
//!
//! | Outcome | Status | Body |
//! |---------|--------|------|
//! | Applied | 200 | `{"message": "Status updated successfully"}` |
//! | Bad signature | 401 | `{"detail": "Invalid signature"}` |
//! | Unparseable body or command | 400 | `{"detail": <reason>}` |
//! | Status not in schema | 400 | `{"detail": ..., "allowed": [...]}` |
//! | Any other failure | 500 | `{"detail": "Failed to update status"}` |

pub mod server;
pub mod signature;

pub use server::{build_router, serve, AppState, WebhookError};
pub use signature::{
    compute_signature, verify_signature, SignatureRejection, SignatureVerification,
    DEFAULT_MAX_AGE_SECS, SIGNATURE_HEADER, TIMESTAMP_HEADER,
};
