use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::{RemoteError, RemoteResult};
use super::schema::{error_message, AddTaskBody, Envelope, NamedResource, TaskResource, UserResource};
use super::TaskTracker;
use crate::models::{CurrentUser, NewTask, SelectOption};

pub const DEFAULT_BASE_URL: &str = "https://app.asana.com/api/1.0";

pub struct AsanaClient {
    client: Client,
    base_url: String,
    token: String,
}

impl AsanaClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        AsanaClient {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    /// Client for the public API, or `ASANA_BASE_URL` when set.
    pub fn from_env(token: impl Into<String>) -> Self {
        let base_url =
            std::env::var("ASANA_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url, token)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
        query: &[(&str, &str)],
    ) -> RemoteResult<T> {
        self.request(operation, Method::GET, path, query, None::<&()>)
            .await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        operation: &'static str,
        path: &str,
        body: &B,
    ) -> RemoteResult<T> {
        let envelope = Envelope { data: body };
        self.request(operation, Method::POST, path, &[], Some(&envelope))
            .await
    }

    async fn request<T: DeserializeOwned, B: Serialize>(
        &self,
        operation: &'static str,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> RemoteResult<T> {
        let url = format!("{}{}", self.base_url, path);
        log::debug!("{} {} ({})", method, url, operation);

        let mut request = self
            .client
            .request(method, &url)
            .bearer_auth(&self.token)
            .query(query);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|source| RemoteError::Network { operation, source })?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|source| RemoteError::Network { operation, source })?;

        if !status.is_success() {
            return Err(RemoteError::Rejected {
                operation,
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        let envelope: Envelope<T> = serde_json::from_str(&text)
            .map_err(|source| RemoteError::Decode { operation, source })?;
        Ok(envelope.data)
    }

    async fn list_named(
        &self,
        operation: &'static str,
        path: &str,
        query: &[(&str, &str)],
    ) -> RemoteResult<Vec<SelectOption>> {
        let resources: Vec<NamedResource> = self.get(operation, path, query).await?;
        Ok(resources.into_iter().map(SelectOption::from).collect())
    }
}

#[async_trait]
impl TaskTracker for AsanaClient {
    async fn list_workspaces(&self) -> RemoteResult<Vec<SelectOption>> {
        self.list_named("list workspaces", "/workspaces", &[("opt_fields", "name")])
            .await
    }

    async fn list_projects(
        &self,
        workspace_id: &str,
        include_archived: bool,
    ) -> RemoteResult<Vec<SelectOption>> {
        let mut query = vec![("workspace", workspace_id), ("opt_fields", "name")];
        if !include_archived {
            query.push(("archived", "false"));
        }
        self.list_named("list projects", "/projects", &query).await
    }

    async fn list_sections(&self, container_id: &str) -> RemoteResult<Vec<SelectOption>> {
        let path = format!("/projects/{}/sections", container_id);
        self.list_named("list sections", &path, &[("opt_fields", "name")])
            .await
    }

    async fn fetch_current_user(&self) -> RemoteResult<CurrentUser> {
        let user: UserResource = self
            .get("fetch current user", "/users/me", &[("opt_fields", "name")])
            .await?;
        Ok(CurrentUser {
            gid: user.gid,
            name: user.name,
        })
    }

    async fn fetch_default_list_id(&self, workspace_id: &str) -> RemoteResult<String> {
        let list: NamedResource = self
            .get(
                "fetch default task list",
                "/users/me/user_task_list",
                &[("workspace", workspace_id), ("opt_fields", "name")],
            )
            .await?;
        Ok(list.gid)
    }

    async fn post_task(&self, task: &NewTask) -> RemoteResult<String> {
        let created: TaskResource = self.post("create task", "/tasks", task).await?;
        Ok(created.gid)
    }

    async fn add_task_to_section(&self, section_id: &str, task_id: &str) -> RemoteResult<()> {
        let path = format!("/sections/{}/addTask", section_id);
        // addTask answers with an empty data object
        let _: serde_json::Value = self
            .post("add task to section", &path, &AddTaskBody { task: task_id })
            .await?;
        Ok(())
    }

    async fn fetch_permalink(&self, task_id: &str) -> RemoteResult<String> {
        let path = format!("/tasks/{}", task_id);
        let task: TaskResource = self
            .get("fetch task", &path, &[("opt_fields", "permalink_url")])
            .await?;
        Ok(task.permalink_url.unwrap_or_default())
    }
}
