use serde::Serialize;

/// Reserved id of the synthetic "My Tasks" entry in the project picker.
pub const DEFAULT_LIST_ID: &str = "default-task-list";
pub const DEFAULT_LIST_NAME: &str = "My Tasks";

/// An entity the user can pick: a workspace, project or section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub name: String,
    pub id: String,
    pub is_pinned: bool,
    pub is_default: bool,
}

impl SelectOption {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        SelectOption {
            name: name.into(),
            id: id.into(),
            is_pinned: false,
            is_default: false,
        }
    }

    pub fn default_list(pinned: bool) -> Self {
        SelectOption {
            name: DEFAULT_LIST_NAME.to_string(),
            id: DEFAULT_LIST_ID.to_string(),
            is_pinned: pinned,
            is_default: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickKind {
    Workspace,
    Project,
    Section,
}

impl PickKind {
    pub fn title(&self) -> &'static str {
        match self {
            PickKind::Workspace => "Select workspace",
            PickKind::Project => "Select project",
            PickKind::Section => "Select section",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PickKind::Workspace => "workspace",
            PickKind::Project => "project",
            PickKind::Section => "section",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectChoice {
    Regular { id: String, name: String },
    /// The user's own task list in the workspace. Has no project id.
    DefaultList,
}

impl ProjectChoice {
    pub fn from_option(option: SelectOption) -> Self {
        if option.is_default {
            ProjectChoice::DefaultList
        } else {
            ProjectChoice::Regular {
                id: option.id,
                name: option.name,
            }
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            ProjectChoice::Regular { id, .. } => Some(id),
            ProjectChoice::DefaultList => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ProjectChoice::Regular { name, .. } => name,
            ProjectChoice::DefaultList => DEFAULT_LIST_NAME,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDetails {
    pub workspace_id: String,
    pub project: ProjectChoice,
    pub section_id: Option<String>,
    pub section_name: Option<String>,
}

impl TaskDetails {
    pub fn project_id(&self) -> Option<&str> {
        self.project.id()
    }

    pub fn project_name(&self) -> &str {
        self.project.name()
    }
}

/// Body of a task creation request.
///
/// Tasks created outside a project are assigned to the caller so they land
/// in the caller's own task list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTask {
    pub name: String,
    pub workspace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
}

impl NewTask {
    pub fn new(name: &str, workspace_id: &str, project_id: Option<&str>, user_id: &str) -> Self {
        match project_id.filter(|id| !id.is_empty()) {
            Some(project_id) => NewTask {
                name: name.to_string(),
                workspace: workspace_id.to_string(),
                projects: Some(vec![project_id.to_string()]),
                assignee: None,
            },
            None => NewTask {
                name: name.to_string(),
                workspace: workspace_id.to_string(),
                projects: None,
                assignee: Some(user_id.to_string()),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedTask {
    pub gid: String,
    pub permalink_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub gid: String,
    pub name: String,
}
