//! Notion JSON shapes and their mapping onto workflow types.
//!
//! Only the fields the workflows read are modelled; everything else in a
//! property object is left as raw JSON and picked apart by name.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use workflow::{
    DatabaseId, DatabaseSchema, PageId, PageUpdate, PropertyKind, PropertyValue, RemoteError,
    SchemaProperty, StatusOption, TaskPage, TaskPropertyNames,
};

#[derive(Debug, Deserialize)]
pub(crate) struct PageObject {
    pub id: String,
    #[serde(default)]
    pub parent: Option<Parent>,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Parent {
    #[serde(default)]
    pub database_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DatabaseObject {
    pub id: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QueryResponse {
    #[serde(default)]
    pub results: Vec<PageObject>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct QueryRequest<'a> {
    pub filter: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<&'a str>,
}

impl<'a> QueryRequest<'a> {
    pub fn title_contains(title_property: &str, needle: &str, start_cursor: Option<&'a str>) -> Self {
        Self {
            filter: json!({
                "property": title_property,
                "title": { "contains": needle },
            }),
            start_cursor,
        }
    }
}

pub(crate) fn to_task_page(page: PageObject, names: &TaskPropertyNames) -> Result<TaskPage, RemoteError> {
    let id = PageId::new(page.id).ok_or_else(|| RemoteError::Decode("page has an empty id".into()))?;
    let props = &page.properties;

    let title = props
        .get(&names.title)
        .and_then(|p| p.get("title"))
        .and_then(|t| t.get(0))
        .and_then(|t| t.get("plain_text"))
        .and_then(Value::as_str)
        .map(str::to_string);

    let status = props.get(&names.status).and_then(|p| {
        p.get("status")
            .or_else(|| p.get("select"))
            .and_then(|s| s.get("name"))
            .and_then(Value::as_str)
            .map(str::to_string)
    });

    let assignee = props
        .get(&names.assignee)
        .and_then(|p| p.get("people"))
        .and_then(|people| people.get(0))
        .and_then(|person| person.get("name"))
        .and_then(Value::as_str)
        .map(str::to_string);

    let due = props
        .get(&names.due)
        .and_then(|p| p.get("date"))
        .and_then(|d| d.get("start"))
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(TaskPage {
        id,
        database_id: page.parent.and_then(|p| p.database_id).and_then(DatabaseId::new),
        title,
        status,
        assignee,
        due,
    })
}

pub(crate) fn to_schema(database: DatabaseObject) -> Result<DatabaseSchema, RemoteError> {
    let id = DatabaseId::new(database.id)
        .ok_or_else(|| RemoteError::Decode("database has an empty id".into()))?;

    let properties = database
        .properties
        .iter()
        .map(|(key, value)| {
            let type_name = value.get("type").and_then(Value::as_str).unwrap_or_default();
            let kind = PropertyKind::from_type_name(type_name);
            let options = match kind {
                PropertyKind::Status | PropertyKind::Select => value
                    .get(type_name)
                    .and_then(|config| config.get("options"))
                    .and_then(Value::as_array)
                    .map(|options| options.iter().filter_map(to_option).collect())
                    .unwrap_or_default(),
                _ => Vec::new(),
            };
            SchemaProperty {
                name: value
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or(key)
                    .to_string(),
                kind,
                options,
            }
        })
        .collect();

    Ok(DatabaseSchema { id, properties })
}

fn to_option(value: &Value) -> Option<StatusOption> {
    let name = value.get("name").and_then(Value::as_str)?;
    Some(StatusOption {
        id: value.get("id").and_then(Value::as_str).map(str::to_string),
        name: name.to_string(),
    })
}

/// Builds the `PATCH /pages/{id}` body.
pub(crate) fn update_body(update: &PageUpdate) -> Value {
    let properties: Map<String, Value> = update
        .properties
        .iter()
        .map(|(name, value)| {
            let encoded = match value {
                PropertyValue::Status(status) => json!({ "status": { "name": status } }),
                PropertyValue::Select(option) => json!({ "select": { "name": option } }),
                PropertyValue::Url(url) => json!({ "url": url }),
            };
            (name.clone(), encoded)
        })
        .collect();
    json!({ "properties": properties })
}
