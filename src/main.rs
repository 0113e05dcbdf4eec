use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Parser};

use tasklink::cli::{Cli, Commands};
use tasklink::document::FileDocument;
use tasklink::flow::{run_flow, FlowOutcome};
use tasklink::models::PickKind;
use tasklink::picker::{PresetPicker, TerminalPicker};
use tasklink::remote::{AsanaClient, TaskTracker};
use tasklink::settings::{default_db_path, mask_secret, Settings, SettingsStore, KEY_TOKEN};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let store = SettingsStore::open(&default_db_path())?;

    match cli.command {
        Commands::Create {
            file,
            line,
            from,
            to,
            workspace,
            project,
            section,
        } => {
            let settings = store.load()?.with_env_token();
            let mut doc = FileDocument::open(&file)?;
            doc.document.place_cursor(line, from.zip(to))?;

            let Some(client) = client(&settings) else {
                println!("{}", FlowOutcome::MissingToken.notice());
                return Ok(());
            };
            let mut picker = PresetPicker::new(TerminalPicker::new())
                .with_preset(PickKind::Workspace, workspace)
                .with_preset(PickKind::Project, project)
                .with_preset(PickKind::Section, section);

            let rt = tokio::runtime::Runtime::new()?;
            let outcome = rt
                .block_on(run_flow(&client, &mut picker, &settings, &mut doc.document))
                .context("Task creation failed")?;

            if let FlowOutcome::Created { .. } = outcome {
                if doc.save_if_dirty()? {
                    log::debug!("Updated {}", doc.path.display());
                }
            }
            println!("{}", outcome.notice());
        }
        Commands::Workspaces => {
            let settings = store.load()?.with_env_token();
            let Some(client) = client(&settings) else {
                println!("{}", FlowOutcome::MissingToken.notice());
                return Ok(());
            };
            let rt = tokio::runtime::Runtime::new()?;
            let workspaces = rt.block_on(client.list_workspaces())?;
            for workspace in workspaces {
                println!("{}\t{}", workspace.id, workspace.name);
            }
        }
        Commands::Projects { workspace_id } => {
            let settings = store.load()?.with_env_token();
            let Some(client) = client(&settings) else {
                println!("{}", FlowOutcome::MissingToken.notice());
                return Ok(());
            };
            let rt = tokio::runtime::Runtime::new()?;
            let projects =
                rt.block_on(client.list_projects(&workspace_id, settings.show_archived))?;
            for project in projects {
                let pin = if settings.is_pinned(&project.id, &project.name) {
                    "★ "
                } else {
                    ""
                };
                println!("{}\t{}{}", project.id, pin, project.name);
            }
        }
        Commands::Set { key, value } => {
            store.set(&key, &value)?;
            println!("Saved '{}'", key);
        }
        Commands::Get { key } => match store.get(&key)? {
            Some(value) => println!("{}", display_value(&key, &value)),
            None => println!("'{}' is not set", key),
        },
        Commands::ConfigList => {
            let entries = store.list()?;
            if entries.is_empty() {
                println!("No settings stored");
            }
            for (key, value) in entries {
                println!("{} = {}", key, display_value(&key, &value).replace('\n', ", "));
            }
        }
        Commands::ConfigDelete { key } => {
            if store.delete(&key)? {
                println!("Deleted '{}'", key);
            } else {
                println!("'{}' is not set", key);
            }
        }
        Commands::Pin { project } => {
            if store.pin(&project)? {
                println!("Pinned '{}'", project);
            } else {
                println!("'{}' is already pinned", project);
            }
        }
        Commands::Unpin { project } => {
            if store.unpin(&project)? {
                println!("Unpinned '{}'", project);
            } else {
                println!("'{}' is not pinned", project);
            }
        }
        Commands::Completions { shell } => {
            use clap_complete::{generate, Shell};
            let shell_enum = match shell.to_lowercase().as_str() {
                "bash" => Shell::Bash,
                "zsh" => Shell::Zsh,
                "fish" => Shell::Fish,
                "elvish" => Shell::Elvish,
                "powershell" => Shell::PowerShell,
                other => bail!("Unsupported shell: {}", other),
            };
            let mut cmd = Cli::command();
            generate(shell_enum, &mut cmd, "tasklink", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn client(settings: &Settings) -> Option<AsanaClient> {
    settings.token().map(AsanaClient::from_env)
}

fn display_value(key: &str, value: &str) -> String {
    if key == KEY_TOKEN {
        mask_secret(value)
    } else {
        value.to_string()
    }
}
