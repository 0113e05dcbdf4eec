//! The end-to-end "create task from line" flow.
//!
//! Stages run strictly in order, each gated on the previous one:
//! token check, workspace choice, project choice, section resolution and
//! creation. Closing a picker ends the flow with [`FlowOutcome::Canceled`];
//! a remote failure ends it with [`FlowError::Remote`] and leaves the
//! document untouched.

use thiserror::Error;

use crate::document::Document;
use crate::link;
use crate::models::{CreatedTask, NewTask, PickKind, ProjectChoice, SelectOption, TaskDetails};
use crate::picker::{with_default_list, Picker};
use crate::remote::{RemoteError, TaskTracker};
use crate::settings::Settings;

#[derive(Debug, Error)]
pub enum FlowError {
    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("picker failed: {0}")]
    Picker(#[source] anyhow::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    Created {
        task: CreatedTask,
        details: TaskDetails,
    },
    Canceled(PickKind),
    MissingToken,
    EmptyTaskName,
}

impl FlowOutcome {
    /// Notice shown to the user once the flow ends.
    pub fn notice(&self) -> String {
        match self {
            FlowOutcome::Created { task, details } => match &details.section_name {
                Some(section) => format!(
                    "Created task in {} / {}: {}",
                    details.project_name(),
                    section,
                    task.permalink_url
                ),
                None => format!("Created task in {}: {}", details.project_name(), task.permalink_url),
            },
            FlowOutcome::Canceled(kind) => format!("{} selection canceled", capitalize(kind.label())),
            FlowOutcome::MissingToken => {
                "No Asana token configured. Run `tasklink set token <TOKEN>` first.".to_string()
            }
            FlowOutcome::EmptyTaskName => "Nothing to create: the line is empty".to_string(),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Run the whole flow for the cursor line of `document`. The document is
/// only modified when a task was created.
pub async fn run_flow<T, P>(
    tracker: &T,
    picker: &mut P,
    settings: &Settings,
    document: &mut Document,
) -> Result<FlowOutcome, FlowError>
where
    T: TaskTracker + ?Sized,
    P: Picker + ?Sized,
{
    if settings.token().is_none() {
        return Ok(FlowOutcome::MissingToken);
    }

    let name = link::task_name(document);
    if name.is_empty() {
        return Ok(FlowOutcome::EmptyTaskName);
    }

    // workspaces and the caller are fetched together
    let (workspaces, user) = tokio::join!(tracker.list_workspaces(), tracker.fetch_current_user());
    let (workspaces, user) = match (workspaces, user) {
        (Ok(workspaces), Ok(user)) => (workspaces, user),
        (Err(err), Ok(_)) | (Ok(_), Err(err)) => return Err(err.into()),
        (Err(first), Err(second)) => return Err(RemoteError::combine(first, second).into()),
    };

    log::debug!("Choosing workspace among {}", workspaces.len());
    let Some(workspace) = pick(picker, PickKind::Workspace, workspaces)? else {
        return Ok(FlowOutcome::Canceled(PickKind::Workspace));
    };

    let projects = tracker
        .list_projects(&workspace.id, settings.show_archived)
        .await?;
    let projects = project_options(projects, settings);
    log::debug!("Choosing project among {}", projects.len());
    let Some(project) = pick(picker, PickKind::Project, projects)? else {
        return Ok(FlowOutcome::Canceled(PickKind::Project));
    };
    let project = ProjectChoice::from_option(project);

    let container_id = match &project {
        ProjectChoice::Regular { id, .. } => id.clone(),
        ProjectChoice::DefaultList => tracker.fetch_default_list_id(&workspace.id).await?,
    };
    let sections = tracker.list_sections(&container_id).await?;
    let section = match resolve_section(picker, sections)? {
        SectionChoice::Chosen(section) => section,
        SectionChoice::Canceled => return Ok(FlowOutcome::Canceled(PickKind::Section)),
    };

    let details = TaskDetails {
        workspace_id: workspace.id,
        project,
        section_id: section.as_ref().map(|s| s.id.clone()),
        section_name: section.map(|s| s.name),
    };

    log::debug!("Creating task '{}'", name);
    let new_task = NewTask::new(&name, &details.workspace_id, details.project_id(), &user.gid);
    let task = tracker
        .create_task(&new_task, details.section_id.as_deref())
        .await?;

    link::write_back(
        document,
        &details,
        &task.permalink_url,
        settings.enable_link,
        settings.mark_completed,
    );

    Ok(FlowOutcome::Created { task, details })
}

/// Mark pinned projects and add the default list entry.
pub fn project_options(mut projects: Vec<SelectOption>, settings: &Settings) -> Vec<SelectOption> {
    for project in &mut projects {
        project.is_pinned = settings.is_pinned(&project.id, &project.name);
    }
    with_default_list(projects, settings.pin_default_list)
}

#[derive(Debug, PartialEq, Eq)]
pub enum SectionChoice {
    Chosen(Option<SelectOption>),
    Canceled,
}

/// No sections: none. One section: that one. Otherwise ask.
pub fn resolve_section<P: Picker + ?Sized>(
    picker: &mut P,
    mut sections: Vec<SelectOption>,
) -> Result<SectionChoice, FlowError> {
    match sections.len() {
        0 => Ok(SectionChoice::Chosen(None)),
        1 => Ok(SectionChoice::Chosen(sections.pop())),
        _ => match pick(picker, PickKind::Section, sections)? {
            Some(section) => Ok(SectionChoice::Chosen(Some(section))),
            None => Ok(SectionChoice::Canceled),
        },
    }
}

fn pick<P: Picker + ?Sized>(
    picker: &mut P,
    kind: PickKind,
    options: Vec<SelectOption>,
) -> Result<Option<SelectOption>, FlowError> {
    picker.pick(kind, options).map_err(FlowError::Picker)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use pretty_assertions::assert_eq;

    struct CountingPicker {
        rounds: usize,
    }

    impl Picker for CountingPicker {
        fn pick(&mut self, _: PickKind, mut options: Vec<SelectOption>) -> Result<Option<SelectOption>> {
            self.rounds += 1;
            Ok(options.pop())
        }
    }

    #[test]
    fn zero_sections_skip_picker() {
        let mut picker = CountingPicker { rounds: 0 };
        let choice = resolve_section(&mut picker, vec![]).unwrap();
        assert_eq!(choice, SectionChoice::Chosen(None));
        assert_eq!(picker.rounds, 0);
    }

    #[test]
    fn single_section_is_auto_selected() {
        let mut picker = CountingPicker { rounds: 0 };
        let choice = resolve_section(&mut picker, vec![SelectOption::new("S", "3")]).unwrap();
        assert_eq!(choice, SectionChoice::Chosen(Some(SelectOption::new("S", "3"))));
        assert_eq!(picker.rounds, 0);
    }

    #[test]
    fn several_sections_need_a_round() {
        let mut picker = CountingPicker { rounds: 0 };
        let sections = vec![SelectOption::new("S", "3"), SelectOption::new("T", "4")];
        let choice = resolve_section(&mut picker, sections).unwrap();
        assert_eq!(choice, SectionChoice::Chosen(Some(SelectOption::new("T", "4"))));
        assert_eq!(picker.rounds, 1);
    }

    #[test]
    fn project_options_mark_pins_and_default() {
        let settings = Settings {
            pinned_projects: vec!["Roadmap".into()],
            ..Settings::default()
        };
        let options = project_options(
            vec![SelectOption::new("Inbox", "1"), SelectOption::new("Roadmap", "2")],
            &settings,
        );
        let summary: Vec<(&str, bool, bool)> = options
            .iter()
            .map(|o| (o.name.as_str(), o.is_pinned, o.is_default))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("My Tasks", false, true),
                ("Inbox", false, false),
                ("Roadmap", true, false),
            ]
        );
    }

    #[test]
    fn notices_read_well() {
        assert_eq!(
            FlowOutcome::Canceled(PickKind::Workspace).notice(),
            "Workspace selection canceled"
        );
    }
}
