use anyhow::{Context, Result};
use clap::Subcommand;
use shared::OwlClient;
use shared::notices::{WORKSPACE_CREATE_FAILED, WORKSPACES_FAILED};
use shared::validation::validate_workspace_name;

use crate::render;

#[derive(Subcommand, Debug)]
pub enum WorkspaceCommand {
    /// List every workspace
    List,
    /// Create a workspace
    Create {
        /// Name of the new workspace
        name: String,
    },
    /// Delete a workspace and everything in it
    Delete {
        /// Name of the workspace to delete
        name: String,
    },
}

pub async fn handle(client: &OwlClient, command: WorkspaceCommand) -> Result<()> {
    match command {
        WorkspaceCommand::List => {
            let workspaces = client.get_workspaces().await.context(WORKSPACES_FAILED)?;
            println!("{}", render::names(&workspaces, "No workspaces found."));
        }
        WorkspaceCommand::Create { name } => {
            let existing = client.get_workspaces().await.context(WORKSPACES_FAILED)?;
            let name = validate_workspace_name(&name, existing.iter().map(|doc| doc.name()))?;
            client
                .create_workspace(name)
                .await
                .context(WORKSPACE_CREATE_FAILED)?;
            println!("Created workspace '{name}'");
        }
        WorkspaceCommand::Delete { name } => {
            client
                .delete_workspace(&name)
                .await
                .with_context(|| format!("failed to delete workspace '{name}'"))?;
            println!("Deleted workspace '{name}'");
        }
    }
    Ok(())
}
