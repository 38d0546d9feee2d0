use anyhow::{Context, Result};
use clap::Subcommand;
use shared::OwlClient;
use shared::notices::{CHANNELS_FAILED, channel_delete_failed};
use shared::validation::validate_channel_name;

use crate::render;

#[derive(Subcommand, Debug)]
pub enum ChannelCommand {
    /// List the channels of a workspace
    List {
        /// Workspace to list
        workspace: String,
    },
    /// Create a channel
    Create {
        /// Workspace that will hold the channel
        workspace: String,
        /// Name of the new channel
        name: String,
    },
    /// Delete a channel and its posts
    Delete {
        /// Workspace holding the channel
        workspace: String,
        /// Name of the channel to delete
        name: String,
    },
}

pub async fn handle(client: &OwlClient, command: ChannelCommand) -> Result<()> {
    match command {
        ChannelCommand::List { workspace } => {
            let channels = client.get_channels(&workspace).await.context(CHANNELS_FAILED)?;
            println!("{}", render::names(&channels, "No channels found."));
        }
        ChannelCommand::Create { workspace, name } => {
            let existing = client.get_channels(&workspace).await.context(CHANNELS_FAILED)?;
            let name = validate_channel_name(&name, existing.iter().map(|doc| doc.name()))?;
            client
                .create_channel(&workspace, name)
                .await
                .with_context(|| format!("failed to create channel '{name}'"))?;
            println!("Created channel '{name}' in '{workspace}'");
        }
        ChannelCommand::Delete { workspace, name } => {
            client
                .delete_channel(&workspace, &name)
                .await
                .with_context(|| channel_delete_failed(&name))?;
            println!("Deleted channel '{name}' from '{workspace}'");
        }
    }
    Ok(())
}
