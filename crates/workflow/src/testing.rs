//! In-memory port implementations for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    CompletionProvider, DatabaseId, DatabaseSchema, PageId, PageUpdate, PropertyKind,
    PullRequest, PullRequestDraft, PullRequestManager, PullRequestNumber, RemoteError,
    SchemaProperty, StatusOption, TaskPage, TaskPropertyNames, TaskTracker, UserLogin,
};

pub fn page(id: &str, database: Option<&str>) -> TaskPage {
    TaskPage {
        id: PageId::new(id).unwrap(),
        database_id: database.map(|d| DatabaseId::new(d).unwrap()),
        title: Some(format!("Task {id}")),
        status: Some("Todo".to_string()),
        assignee: None,
        due: None,
    }
}

pub fn status_property(options: &[&str]) -> SchemaProperty {
    SchemaProperty {
        name: "Status".to_string(),
        kind: PropertyKind::Status,
        options: options.iter().map(|o| StatusOption::named(*o)).collect(),
    }
}

pub fn url_property(name: &str) -> SchemaProperty {
    SchemaProperty {
        name: name.to_string(),
        kind: PropertyKind::Url,
        options: Vec::new(),
    }
}

pub fn schema(id: &str, properties: Vec<SchemaProperty>) -> DatabaseSchema {
    DatabaseSchema {
        id: DatabaseId::new(id).unwrap(),
        properties,
    }
}

#[derive(Default)]
pub struct FakeTracker {
    pub properties: TaskPropertyNames,
    pub credentials_ok: bool,
    pub pages: HashMap<String, TaskPage>,
    pub schemas: HashMap<String, DatabaseSchema>,
    pub query_results: Vec<TaskPage>,
    pub fail_update: Option<RemoteError>,
    pub updates: Mutex<Vec<(PageId, PageUpdate)>>,
    pub remote_calls: Mutex<usize>,
}

impl FakeTracker {
    pub fn with_properties(mut self, properties: TaskPropertyNames) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_page(mut self, page: TaskPage) -> Self {
        self.pages.insert(page.id.to_string(), page);
        self
    }

    pub fn with_schema(mut self, schema: DatabaseSchema) -> Self {
        self.schemas.insert(schema.id.to_string(), schema);
        self
    }

    pub fn updates(&self) -> Vec<(PageId, PageUpdate)> {
        self.updates.lock().unwrap().clone()
    }

    pub fn remote_calls(&self) -> usize {
        *self.remote_calls.lock().unwrap()
    }

    fn count(&self) {
        *self.remote_calls.lock().unwrap() += 1;
    }
}

#[async_trait]
impl TaskTracker for FakeTracker {
    fn property_names(&self) -> &TaskPropertyNames {
        &self.properties
    }

    async fn verify_credentials(&self) -> Result<(), RemoteError> {
        self.count();
        if self.credentials_ok {
            Ok(())
        } else {
            Err(RemoteError::Unauthorized {
                body: "invalid token".to_string(),
            })
        }
    }

    async fn get_page(&self, page_id: &PageId) -> Result<TaskPage, RemoteError> {
        self.count();
        self.pages
            .get(page_id.as_str())
            .cloned()
            .ok_or_else(|| RemoteError::NotFound {
                entity: format!("page {page_id}"),
            })
    }

    async fn get_database(&self, database_id: &DatabaseId) -> Result<DatabaseSchema, RemoteError> {
        self.count();
        self.schemas
            .get(database_id.as_str())
            .cloned()
            .ok_or_else(|| RemoteError::NotFound {
                entity: format!("database {database_id}"),
            })
    }

    async fn update_page(&self, page_id: &PageId, update: &PageUpdate) -> Result<(), RemoteError> {
        self.count();
        if let Some(err) = &self.fail_update {
            return Err(err.clone());
        }
        self.updates
            .lock()
            .unwrap()
            .push((page_id.clone(), update.clone()));
        Ok(())
    }

    async fn query_tasks(
        &self,
        _database_id: &DatabaseId,
        title_contains: &str,
    ) -> Result<Vec<TaskPage>, RemoteError> {
        self.count();
        Ok(self
            .query_results
            .iter()
            .filter(|p| {
                p.title
                    .as_deref()
                    .is_some_and(|t| t.contains(title_contains))
            })
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct FakePullRequests {
    pub create_error: Option<RemoteError>,
    pub reviewer_error: Option<RemoteError>,
    pub assignee_error: Option<RemoteError>,
    pub created: Mutex<Vec<PullRequestDraft>>,
    pub reviewers: Mutex<Vec<Vec<UserLogin>>>,
    pub assignees: Mutex<Vec<Vec<UserLogin>>>,
}

#[async_trait]
impl PullRequestManager for FakePullRequests {
    async fn create_draft(&self, draft: &PullRequestDraft) -> Result<PullRequest, RemoteError> {
        if let Some(err) = &self.create_error {
            return Err(err.clone());
        }
        self.created.lock().unwrap().push(draft.clone());
        Ok(PullRequest {
            number: PullRequestNumber::new(7),
            html_url: "https://github.com/acme/widgets/pull/7".to_string(),
        })
    }

    async fn request_reviewers(
        &self,
        _number: PullRequestNumber,
        reviewers: &[UserLogin],
    ) -> Result<(), RemoteError> {
        self.reviewers.lock().unwrap().push(reviewers.to_vec());
        match &self.reviewer_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    async fn add_assignees(
        &self,
        _number: PullRequestNumber,
        assignees: &[UserLogin],
    ) -> Result<(), RemoteError> {
        self.assignees.lock().unwrap().push(assignees.to_vec());
        match &self.assignee_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

/// Completion provider returning a canned result.
pub struct FakeCompletion {
    pub reply: Result<String, RemoteError>,
    pub prompts: Mutex<Vec<String>>,
}

impl FakeCompletion {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(err: RemoteError) -> Self {
        Self {
            reply: Err(err),
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl CompletionProvider for FakeCompletion {
    async fn complete(&self, prompt: &str) -> Result<String, RemoteError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone()
    }
}
