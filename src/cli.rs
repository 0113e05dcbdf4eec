use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Turn a line of a markdown file into an Asana task", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a task from a line and link it back into the file
    Create {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// 1-based line number to create the task from
        #[arg(short, long)]
        line: usize,
        /// First selected character column (0-based)
        #[arg(long, requires = "to")]
        from: Option<usize>,
        /// Character column after the selection
        #[arg(long, requires = "from")]
        to: Option<usize>,
        /// Workspace name or id, skips the workspace picker
        #[arg(short, long)]
        workspace: Option<String>,
        /// Project name or id, skips the project picker
        #[arg(short, long)]
        project: Option<String>,
        /// Section name or id, skips the section picker
        #[arg(short, long)]
        section: Option<String>,
    },
    /// List the workspaces visible to the token
    Workspaces,
    /// List the projects of a workspace
    Projects {
        #[arg(value_name = "WORKSPACE_ID")]
        workspace_id: String,
    },
    /// Set a setting value
    Set {
        #[arg(value_name = "KEY")]
        key: String,
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Show a setting value
    Get {
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// List all stored settings
    ConfigList,
    /// Delete a stored setting
    ConfigDelete {
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Pin a project (name or id) to the top of the project picker
    Pin {
        #[arg(value_name = "PROJECT")]
        project: String,
    },
    /// Remove a pinned project
    Unpin {
        #[arg(value_name = "PROJECT")]
        project: String,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_name = "SHELL")]
        shell: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_create_with_presets() {
        let cli = Cli::try_parse_from([
            "tasklink", "create", "notes.md", "--line", "3", "--from", "2", "--to", "5", "-w", "Acme",
        ])
        .unwrap();
        match cli.command {
            Commands::Create {
                line,
                from,
                to,
                workspace,
                project,
                ..
            } => {
                assert_eq!(line, 3);
                assert_eq!((from, to), (Some(2), Some(5)));
                assert_eq!(workspace.as_deref(), Some("Acme"));
                assert_eq!(project, None);
            }
            _ => panic!("expected create"),
        }
    }

    #[test]
    fn selection_bounds_come_in_pairs() {
        assert!(Cli::try_parse_from(["tasklink", "create", "n.md", "-l", "1", "--from", "2"]).is_err());
    }
}
