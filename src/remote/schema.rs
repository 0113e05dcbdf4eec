//! Wire shapes of the Asana REST API.

use serde::{Deserialize, Serialize};

use crate::models::SelectOption;

/// Every Asana payload is wrapped in a `data` envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// A named resource (workspace, project, section, user task list).
#[derive(Debug, Deserialize)]
pub struct NamedResource {
    pub gid: String,
    #[serde(default)]
    pub name: String,
}

impl From<NamedResource> for SelectOption {
    fn from(resource: NamedResource) -> Self {
        SelectOption::new(resource.name, resource.gid)
    }
}

#[derive(Debug, Deserialize)]
pub struct UserResource {
    pub gid: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct TaskResource {
    pub gid: String,
    #[serde(default)]
    pub permalink_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AddTaskBody<'a> {
    pub task: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    errors: Vec<ErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    message: String,
}

/// Extract the human readable message from an error response body.
pub fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) if !parsed.errors.is_empty() => parsed
            .errors
            .into_iter()
            .map(|e| e.message)
            .collect::<Vec<_>>()
            .join("; "),
        _ => body.trim().to_string(),
    }
}
