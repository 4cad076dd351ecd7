//! Task search by title.

use tracing::{info, instrument, warn};

use crate::{DatabaseId, RemoteError, TaskPage, TaskTracker};

/// Finds tasks whose title contains `title`.
///
/// Credentials are checked first so a bad API key is reported as such rather
/// than as an empty or failed query.
#[instrument(skip(tracker, database_id), fields(database_id = %database_id))]
pub async fn search_tasks(
    tracker: &dyn TaskTracker,
    database_id: &DatabaseId,
    title: &str,
) -> Result<Vec<TaskPage>, RemoteError> {
    tracker.verify_credentials().await.map_err(|e| {
        warn!(error = %e, "API key verification failed");
        e
    })?;

    let results = tracker.query_tasks(database_id, title).await?;
    info!(matches = results.len(), "Search complete");
    Ok(results)
}
