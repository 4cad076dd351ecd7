//! Task status update workflow.
//!
//! The database schema is the source of truth: the requested status must be
//! one of the options the schema declares at call time, and the property that
//! receives the GitHub link is discovered from the schema rather than fixed.
//! Nothing is patched unless validation succeeds.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::{
    github_url_property, DatabaseId, PageId, PageUpdate, PropertyKind, PropertyValue,
    RemoteError, TaskTracker,
};

/// Why a status update did not happen.
#[derive(Debug, Error)]
pub enum StatusUpdateError {
    #[error("page {0} not found")]
    PageNotFound(PageId),

    #[error("page {0} is not in a database and no default database is configured")]
    NoDatabase(PageId),

    #[error("database {database} has no status property named '{name}'")]
    MissingStatusProperty { database: DatabaseId, name: String },

    /// The requested value is not among the schema's options. No patch was sent.
    #[error("could not find '{requested}' status option; available: {}", .allowed.join(", "))]
    InvalidStatus {
        requested: String,
        allowed: Vec<String>,
    },

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// Result of a successful update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdated {
    pub page_id: PageId,
    pub previous_status: Option<String>,
    pub new_status: String,
    /// Property that received the GitHub URL, if one was supplied and found.
    pub github_property: Option<String>,
}

/// Validates and applies status changes to task pages.
pub struct StatusWorkflow {
    tracker: Arc<dyn TaskTracker>,
    default_database: Option<DatabaseId>,
}

impl StatusWorkflow {
    pub fn new(tracker: Arc<dyn TaskTracker>) -> Self {
        Self {
            tracker,
            default_database: None,
        }
    }

    /// Database used when a page does not report its parent database.
    pub fn with_default_database(mut self, database: Option<DatabaseId>) -> Self {
        self.default_database = database;
        self
    }


    /// Moves `page_id` to `new_status`, optionally recording `github_url`.
    ///
    /// `new_status` is matched case-sensitively against the status options.
    /// When `github_url` is given but the schema has no URL property whose
    /// name contains "github", the status is still updated and a warning is
    /// logged.
    #[instrument(skip(self, page_id, github_url), fields(page_id = %page_id))]
    pub async fn update_status(
        &self,
        page_id: &PageId,
        new_status: &str,
        github_url: Option<&str>,
    ) -> Result<StatusUpdated, StatusUpdateError> {
        let page = self.tracker.get_page(page_id).await.map_err(|e| {
            warn!(error = %e, "Failed to get page");
            match e {
                RemoteError::NotFound { .. } => StatusUpdateError::PageNotFound(page_id.clone()),
                other => StatusUpdateError::Remote(other),
            }
        })?;
        info!(current_status = ?page.status, "Fetched page");

        let database_id = page
            .database_id
            .clone()
            .or_else(|| self.default_database.clone())
            .ok_or_else(|| StatusUpdateError::NoDatabase(page_id.clone()))?;

        let schema = self.tracker.get_database(&database_id).await.map_err(|e| {
            warn!(database_id = %database_id, error = %e, "Failed to get database schema");
            StatusUpdateError::Remote(e)
        })?;
        for property in &schema.properties {
            debug!(name = %property.name, kind = ?property.kind, "Database property");
        }

        let status_name = &self.tracker.property_names().status;
        let status_property = schema
            .property(status_name)
            .filter(|p| matches!(p.kind, PropertyKind::Status | PropertyKind::Select))
            .ok_or_else(|| StatusUpdateError::MissingStatusProperty {
                database: database_id.clone(),
                name: status_name.clone(),
            })?;

        if !status_property.options.iter().any(|o| o.name == new_status) {
            let allowed: Vec<String> = status_property
                .options
                .iter()
                .map(|o| o.name.clone())
                .collect();
            warn!(requested = new_status, ?allowed, "Requested status is not a valid option");
            return Err(StatusUpdateError::InvalidStatus {
                requested: new_status.to_string(),
                allowed,
            });
        }

        let value = match status_property.kind {
            PropertyKind::Select => PropertyValue::Select(new_status.to_string()),
            _ => PropertyValue::Status(new_status.to_string()),
        };
        let mut update = PageUpdate::new().set(status_property.name.clone(), value);

        let mut github_property = None;
        if let Some(url) = github_url {
            match github_url_property(&schema) {
                Some(property) => {
                    update = update.set(property.name.clone(), PropertyValue::Url(url.to_string()));
                    github_property = Some(property.name.clone());
                }
                None => warn!("Could not find GitHub URL property in database"),
            }
        }

        self.tracker.update_page(page_id, &update).await.map_err(|e| {
            warn!(error = %e, "Failed to update status");
            StatusUpdateError::Remote(e)
        })?;
        info!(new_status, github_property = ?github_property, "Status updated");

        Ok(StatusUpdated {
            page_id: page_id.clone(),
            previous_status: page.status,
            new_status: new_status.to_string(),
            github_property,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{page, schema, status_property, url_property, FakeTracker};
    use crate::{SchemaProperty, StatusOption, TaskPropertyNames};

    fn tracker_with(properties: Vec<SchemaProperty>) -> Arc<FakeTracker> {
        Arc::new(
            FakeTracker::default()
                .with_page(page("p1", Some("db1")))
                .with_schema(schema("db1", properties)),
        )
    }

    fn pid(id: &str) -> PageId {
        PageId::new(id).unwrap()
    }

    #[tokio::test]
    async fn test_update_status_patches_valid_option() {
        let tracker = tracker_with(vec![status_property(&["Todo", "In Progress", "Done"])]);
        let workflow = StatusWorkflow::new(tracker.clone());

        let updated = workflow.update_status(&pid("p1"), "Done", None).await.unwrap();

        assert_eq!(updated.previous_status.as_deref(), Some("Todo"));
        assert_eq!(updated.new_status, "Done");
        let updates = tracker.updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(
            updates[0].1.get("Status"),
            Some(&PropertyValue::Status("Done".to_string()))
        );
    }

    #[tokio::test]
    async fn test_update_status_rejects_unknown_option_without_patching() {
        let tracker = tracker_with(vec![status_property(&["Todo", "In Progress", "Done"])]);
        let workflow = StatusWorkflow::new(tracker.clone());

        let err = workflow
            .update_status(&pid("p1"), "Blocked", None)
            .await
            .unwrap_err();

        match err {
            StatusUpdateError::InvalidStatus { requested, allowed } => {
                assert_eq!(requested, "Blocked");
                assert_eq!(allowed, vec!["Todo", "In Progress", "Done"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(tracker.updates().is_empty());
    }

    #[tokio::test]
    async fn test_update_status_match_is_case_sensitive() {
        let tracker = tracker_with(vec![status_property(&["Done"])]);
        let workflow = StatusWorkflow::new(tracker.clone());

        let err = workflow.update_status(&pid("p1"), "done", None).await.unwrap_err();
        assert!(matches!(err, StatusUpdateError::InvalidStatus { .. }));
        assert!(tracker.updates().is_empty());
    }

    #[tokio::test]
    async fn test_update_status_attaches_url_to_first_github_property_only() {
        let tracker = tracker_with(vec![
            status_property(&["Done"]),
            url_property("GitHub PR"),
            url_property("Github Link"),
        ]);
        let workflow = StatusWorkflow::new(tracker.clone());

        let updated = workflow
            .update_status(&pid("p1"), "Done", Some("https://github.com/acme/widgets/pull/7"))
            .await
            .unwrap();

        assert_eq!(updated.github_property.as_deref(), Some("GitHub PR"));
        let (_, update) = &tracker.updates()[0];
        assert_eq!(update.properties.len(), 2);
        assert!(update.get("GitHub PR").is_some());
        assert!(update.get("Github Link").is_none());
    }

    #[tokio::test]
    async fn test_update_status_proceeds_without_github_property() {
        let tracker = tracker_with(vec![status_property(&["Done"]), url_property("Docs")]);
        let workflow = StatusWorkflow::new(tracker.clone());

        let updated = workflow
            .update_status(&pid("p1"), "Done", Some("https://example.com"))
            .await
            .unwrap();

        assert!(updated.github_property.is_none());
        let (_, update) = &tracker.updates()[0];
        assert_eq!(update.properties.len(), 1);
    }

    #[tokio::test]
    async fn test_update_status_reports_missing_page() {
        let tracker = tracker_with(vec![status_property(&["Done"])]);
        let workflow = StatusWorkflow::new(tracker.clone());

        let err = workflow.update_status(&pid("nope"), "Done", None).await.unwrap_err();
        assert!(matches!(err, StatusUpdateError::PageNotFound(_)));
        assert_eq!(tracker.remote_calls(), 1);
    }

    #[tokio::test]
    async fn test_update_status_falls_back_to_default_database() {
        let tracker = Arc::new(
            FakeTracker::default()
                .with_page(page("p2", None))
                .with_schema(schema("fallback", vec![status_property(&["Done"])])),
        );
        let workflow = StatusWorkflow::new(tracker.clone())
            .with_default_database(DatabaseId::new("fallback"));

        workflow.update_status(&pid("p2"), "Done", None).await.unwrap();
        assert_eq!(tracker.updates().len(), 1);
    }

    #[tokio::test]
    async fn test_update_status_without_any_database_fails() {
        let tracker = Arc::new(FakeTracker::default().with_page(page("p2", None)));
        let workflow = StatusWorkflow::new(tracker);

        let err = workflow.update_status(&pid("p2"), "Done", None).await.unwrap_err();
        assert!(matches!(err, StatusUpdateError::NoDatabase(_)));
    }

    #[tokio::test]
    async fn test_update_status_uses_select_shape_for_select_property() {
        let tracker = Arc::new(
            FakeTracker::default()
                .with_properties(TaskPropertyNames {
                    status: "Stage".to_string(),
                    ..TaskPropertyNames::default()
                })
                .with_page(page("p1", Some("db1")))
                .with_schema(schema(
                    "db1",
                    vec![SchemaProperty {
                        name: "Stage".to_string(),
                        kind: PropertyKind::Select,
                        options: vec![StatusOption::named("Shipped")],
                    }],
                )),
        );
        let workflow = StatusWorkflow::new(tracker.clone());

        workflow.update_status(&pid("p1"), "Shipped", None).await.unwrap();
        let (_, update) = &tracker.updates()[0];
        assert_eq!(
            update.get("Stage"),
            Some(&PropertyValue::Select("Shipped".to_string()))
        );
    }

    #[tokio::test]
    async fn test_update_status_missing_status_property() {
        let tracker = tracker_with(vec![url_property("GitHub")]);
        let workflow = StatusWorkflow::new(tracker.clone());

        let err = workflow.update_status(&pid("p1"), "Done", None).await.unwrap_err();
        assert!(matches!(err, StatusUpdateError::MissingStatusProperty { .. }));
        assert!(tracker.updates().is_empty());
    }

    #[tokio::test]
    async fn test_update_status_surfaces_patch_failure() {
        let mut fake = FakeTracker::default()
            .with_page(page("p1", Some("db1")))
            .with_schema(schema("db1", vec![status_property(&["Done"])]));
        fake.fail_update = Some(RemoteError::Api {
            status: 400,
            body: "validation_error".to_string(),
        });
        let workflow = StatusWorkflow::new(Arc::new(fake));

        let err = workflow.update_status(&pid("p1"), "Done", None).await.unwrap_err();
        assert!(matches!(
            err,
            StatusUpdateError::Remote(RemoteError::Api { status: 400, .. })
        ));
    }
}
