//! Shared value types for the task-tracking and pull-request domains.
//!
//! None of these types is durable: they are snapshots of remote state taken
//! for the duration of one workflow call.

use serde::{Deserialize, Serialize};

use crate::{BranchName, DatabaseId, PageId, PullRequestNumber};

// ---------------------------------------------------------------------------
// Database schema
// ---------------------------------------------------------------------------

/// One enumerated value a status (or select) property may hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusOption {
    /// Remote option identifier, when the service reports one.
    pub id: Option<String>,
    /// Display name; matched case-sensitively against update requests.
    pub name: String,
}

impl StatusOption {
    /// Creates an option with no remote identifier.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }
}

/// Type tag of a database property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    Title,
    Status,
    Select,
    Url,
    /// Any property type the workflows do not interpret (people, date, ...).
    Other(String),
}

impl PropertyKind {
    /// Maps a Notion property `type` string onto a [`PropertyKind`].
    pub fn from_type_name(type_name: &str) -> Self {
        match type_name {
            "title" => Self::Title,
            "status" => Self::Status,
            "select" => Self::Select,
            "url" => Self::Url,
            other => Self::Other(other.to_string()),
        }
    }
}

/// A property declared in a database schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaProperty {
    pub name: String,
    pub kind: PropertyKind,
    /// Enumerated options; empty unless `kind` is `Status` or `Select`.
    pub options: Vec<StatusOption>,
}

/// The schema of a task database, fetched fresh for every update.
///
/// `properties` preserves the order in which the remote API listed them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSchema {
    pub id: DatabaseId,
    pub properties: Vec<SchemaProperty>,
}

impl DatabaseSchema {
    /// Returns the property with exactly this name.
    pub fn property(&self, name: &str) -> Option<&SchemaProperty> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// Returns the first property in schema order that satisfies `predicate`.
pub fn find_property<P>(schema: &DatabaseSchema, predicate: P) -> Option<&SchemaProperty>
where
    P: Fn(&SchemaProperty) -> bool,
{
    schema.properties.iter().find(|p| predicate(p))
}

/// Returns the URL-typed property whose name mentions "github" (any case).
pub fn github_url_property(schema: &DatabaseSchema) -> Option<&SchemaProperty> {
    find_property(schema, |p| {
        p.kind == PropertyKind::Url && p.name.to_lowercase().contains("github")
    })
}

// ---------------------------------------------------------------------------
// Task pages
// ---------------------------------------------------------------------------

/// Property names used to read task fields out of a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPropertyNames {
    pub title: String,
    pub status: String,
    pub assignee: String,
    pub due: String,
}

impl Default for TaskPropertyNames {
    fn default() -> Self {
        Self {
            title: "Task name".to_string(),
            status: "Status".to_string(),
            assignee: "Assignee".to_string(),
            due: "Due".to_string(),
        }
    }
}

/// A snapshot of one task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPage {
    pub id: PageId,
    /// Database the page belongs to, if its parent is a database.
    pub database_id: Option<DatabaseId>,
    pub title: Option<String>,
    pub status: Option<String>,
    /// Name of the first assignee.
    pub assignee: Option<String>,
    /// Start of the due date, as the service formats it.
    pub due: Option<String>,
}

impl TaskPage {
    /// Human-readable multi-line description used by the search CLI.
    pub fn summary(&self) -> String {
        format!(
            "Ticket ID: {}\nTitle: {}\nStatus: {}\nAssignee: {}\nDue: {}",
            self.id,
            self.title.as_deref().unwrap_or("No title"),
            self.status.as_deref().unwrap_or("No status"),
            self.assignee.as_deref().unwrap_or("No assignee"),
            self.due.as_deref().unwrap_or("No due date"),
        )
    }
}

/// A value written into one page property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyValue {
    Status(String),
    Select(String),
    Url(String),
}

/// The set of property writes sent in a single page patch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageUpdate {
    pub properties: Vec<(String, PropertyValue)>,
}

impl PageUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a property write, replacing any earlier write to the same name.
    pub fn set(mut self, name: impl Into<String>, value: PropertyValue) -> Self {
        let name = name.into();
        self.properties.retain(|(existing, _)| *existing != name);
        self.properties.push((name, value));
        self
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }
}

// ---------------------------------------------------------------------------
// Pull requests
// ---------------------------------------------------------------------------

/// Everything needed to open a draft pull request.
///
/// Both branch names are non-empty; see [`PullRequestDraft::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestDraft {
    pub head: BranchName,
    pub base: BranchName,
    pub title: String,
    pub body: String,
}

/// A pull request as reported back by the code host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: PullRequestNumber,
    pub html_url: String,
}

// ---------------------------------------------------------------------------
// Change records
// ---------------------------------------------------------------------------

/// Kind of change applied to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Added => "added",
            Self::Modified => "modified",
            Self::Deleted => "deleted",
        };
        f.write_str(s)
    }
}

/// One file change fed into PR-body generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub file_path: String,
    pub change_type: ChangeKind,
    #[serde(default)]
    pub diff: String,
}
