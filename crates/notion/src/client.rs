//! HTTP client for the Notion REST API.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Url;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use workflow::{
    DatabaseId, DatabaseSchema, PageId, PageUpdate, RemoteError, TaskPage, TaskPropertyNames,
    TaskTracker,
};

use crate::wire::{self, DatabaseObject, PageObject, QueryRequest, QueryResponse};

pub const DEFAULT_API_URL: &str = "https://api.notion.com/v1";
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

/// Errors raised while constructing a [`NotionClient`].
#[derive(Debug, Error)]
pub enum NotionClientError {
    #[error("API key is not a valid header value")]
    InvalidApiKey,

    #[error("Notion-Version '{0}' is not a valid header value")]
    InvalidVersion(String),

    #[error("'{0}' is not a usable API base URL")]
    InvalidBaseUrl(String),

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Connection settings for [`NotionClient`].
#[derive(Debug, Clone)]
pub struct NotionConfig {
    pub api_key: String,
    /// API root, e.g. `https://api.notion.com/v1`.
    pub base_url: String,
    pub notion_version: String,
    pub properties: TaskPropertyNames,
}

impl NotionConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_API_URL.to_string(),
            notion_version: DEFAULT_NOTION_VERSION.to_string(),
            properties: TaskPropertyNames::default(),
        }
    }
}

/// [`TaskTracker`] backed by a Notion integration token.
#[derive(Debug, Clone)]
pub struct NotionClient {
    http: reqwest::Client,
    base_url: Url,
    properties: TaskPropertyNames,
}

impl NotionClient {
    pub fn new(config: NotionConfig) -> Result<Self, NotionClientError> {
        let base_url = Url::parse(&config.base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| NotionClientError::InvalidBaseUrl(config.base_url.clone()))?;

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|_| NotionClientError::InvalidApiKey)?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            "Notion-Version",
            HeaderValue::from_str(&config.notion_version)
                .map_err(|_| NotionClientError::InvalidVersion(config.notion_version.clone()))?,
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("taskbridge/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            properties: config.properties,
        })
    }

    /// Endpoint URL. Identifiers are always single path segments, so an id
    /// can never address a different endpoint.
    fn url(&self, segments: &[&str], entity: &str) -> Result<Url, RemoteError> {
        transport::join_segments(&self.base_url, segments).ok_or_else(|| RemoteError::NotFound {
            entity: entity.to_string(),
        })
    }
}

#[async_trait]
impl TaskTracker for NotionClient {
    fn property_names(&self) -> &TaskPropertyNames {
        &self.properties
    }

    #[instrument(skip(self))]
    async fn verify_credentials(&self) -> Result<(), RemoteError> {
        let url = self.url(&["users", "me"], "bot user")?;
        transport::send(self.http.get(url), "bot user").await.map(|_| ())
    }

    #[instrument(skip(self, page_id), fields(page_id = %page_id))]
    async fn get_page(&self, page_id: &PageId) -> Result<TaskPage, RemoteError> {
        let entity = format!("page {page_id}");
        let url = self.url(&["pages", page_id.as_str()], &entity)?;
        let page: PageObject = transport::send_json(self.http.get(url), entity).await?;
        wire::to_task_page(page, &self.properties)
    }

    #[instrument(skip(self, database_id), fields(database_id = %database_id))]
    async fn get_database(&self, database_id: &DatabaseId) -> Result<DatabaseSchema, RemoteError> {
        let entity = format!("database {database_id}");
        let url = self.url(&["databases", database_id.as_str()], &entity)?;
        let database: DatabaseObject = transport::send_json(self.http.get(url), entity).await?;
        wire::to_schema(database)
    }

    #[instrument(skip(self, page_id, update), fields(page_id = %page_id))]
    async fn update_page(&self, page_id: &PageId, update: &PageUpdate) -> Result<(), RemoteError> {
        let entity = format!("page {page_id}");
        let url = self.url(&["pages", page_id.as_str()], &entity)?;
        transport::send(self.http.patch(url).json(&wire::update_body(update)), entity)
            .await
            .map(|_| ())
    }

    #[instrument(skip(self, database_id), fields(database_id = %database_id))]
    async fn query_tasks(
        &self,
        database_id: &DatabaseId,
        title_contains: &str,
    ) -> Result<Vec<TaskPage>, RemoteError> {
        let entity = format!("database {database_id}");
        let url = self.url(&["databases", database_id.as_str(), "query"], &entity)?;
        let mut pages = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let request =
                QueryRequest::title_contains(&self.properties.title, title_contains, cursor.as_deref());
            let response: QueryResponse =
                transport::send_json(self.http.post(url.clone()).json(&request), entity.as_str())
                    .await?;

            for page in response.results {
                pages.push(wire::to_task_page(page, &self.properties)?);
            }

            match response.next_cursor {
                Some(next) if response.has_more => {
                    if cursor.as_deref() == Some(next.as_str()) {
                        warn!(cursor = %next, "Query cursor did not advance; stopping pagination");
                        break;
                    }
                    cursor = Some(next);
                }
                _ => break,
            }
        }

        debug!(count = pages.len(), "Query complete");
        Ok(pages)
    }
}
