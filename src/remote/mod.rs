//! Access to the remote task tracker.
//!
//! [`TaskTracker`] is the seam the creation flow talks to; [`AsanaClient`]
//! implements it over the Asana REST API.

pub mod client;
pub mod error;
pub mod schema;

pub use client::AsanaClient;
pub use error::{RemoteError, RemoteResult};

use async_trait::async_trait;

use crate::models::{CreatedTask, CurrentUser, NewTask, SelectOption};

#[async_trait]
pub trait TaskTracker: Send + Sync {
    async fn list_workspaces(&self) -> RemoteResult<Vec<SelectOption>>;

    async fn list_projects(
        &self,
        workspace_id: &str,
        include_archived: bool,
    ) -> RemoteResult<Vec<SelectOption>>;

    /// Sections of a project or of a user task list.
    async fn list_sections(&self, container_id: &str) -> RemoteResult<Vec<SelectOption>>;

    async fn fetch_current_user(&self) -> RemoteResult<CurrentUser>;

    /// Id of the caller's own task list in `workspace_id`.
    async fn fetch_default_list_id(&self, workspace_id: &str) -> RemoteResult<String>;

    /// Create the task and return its gid.
    async fn post_task(&self, task: &NewTask) -> RemoteResult<String>;

    async fn add_task_to_section(&self, section_id: &str, task_id: &str) -> RemoteResult<()>;

    async fn fetch_permalink(&self, task_id: &str) -> RemoteResult<String>;

    /// Create a task, move it into `section_id` when given and resolve its
    /// permanent link. Stops at the first failing call; a task created before
    /// a failure stays on the remote side.
    async fn create_task(
        &self,
        task: &NewTask,
        section_id: Option<&str>,
    ) -> RemoteResult<CreatedTask> {
        let gid = self.post_task(task).await?;

        if let Some(section_id) = section_id.filter(|s| !s.is_empty()) {
            self.add_task_to_section(section_id, &gid).await?;
        }

        let permalink_url = self.fetch_permalink(&gid).await?;
        Ok(CreatedTask { gid, permalink_url })
    }
}
