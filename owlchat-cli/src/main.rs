//! Main entry point for the OwlChat command-line client.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![deny(clippy::pedantic)]
#![allow(clippy::multiple_crate_versions)] // TODO(deps-001): remove once transitive dependencies converge.

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use shared::OwlClient;
use shared::config::Config;

mod commands;
mod logging;
mod render;

use commands::{
    channels::ChannelCommand,
    posts::{PostArgs, PostsArgs, ReactArgs},
    session::{FileTokenStore, LoginArgs},
    watch::WatchArgs,
    workspaces::WorkspaceCommand,
};

/// OwlChat CLI
#[derive(Parser)]
#[command(name = "owlchat", version)]
#[command(about = "Command-line client for OwlChat", long_about = None)]
pub struct Cli {
    /// Path to the configuration file (yaml or json)
    #[arg(
        long,
        short,
        global = true,
        help = "Path to the configuration file (e.g., owlchat.yaml or owlchat.json). If not provided, defaults will be used."
    )]
    config: Option<PathBuf>,

    /// Database host, overriding the configuration file and environment
    #[arg(
        long,
        global = true,
        help = "Database host, e.g. http://localhost:3318. Overrides the configuration file and OWLCHAT_DATABASE_HOST."
    )]
    host: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Subcommands for the OwlChat CLI
#[derive(Subcommand)]
enum Commands {
    /// Log in and remember the session token
    Login(LoginArgs),
    /// Log out and forget the session token
    Logout,
    /// Create the database on a fresh server
    Init,
    /// Manage workspaces
    Workspaces {
        #[command(subcommand)]
        action: WorkspaceCommand,
    },
    /// Manage the channels of a workspace
    Channels {
        #[command(subcommand)]
        action: ChannelCommand,
    },
    /// Show the threaded feed of a channel
    Posts(PostsArgs),
    /// Create a post or a reply
    Post(PostArgs),
    /// React to a post
    React(ReactArgs),
    /// Follow a channel live and post interactively
    Watch(WatchArgs),

    /// Generate shell completion scripts for the CLI
    Completion {
        /// The shell type for which to generate the completion script (e.g., bash, zsh, fish, powershell)
        #[arg(
            long,
            short,
            help = "The shell type for which to generate the completion script (e.g., bash, zsh, fish, powershell)"
        )]
        shell: clap_complete::Shell,
    },

    /// Generate a configuration file
    Config {
        /// Format of the configuration file to generate (yaml or json). Defaults to yaml.
        #[arg(
            long,
            short,
            default_value = "yaml",
            help = "Format of the configuration file to generate (yaml or json). Defaults to yaml."
        )]
        format: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    let command = match cli.command {
        Commands::Completion { shell } => {
            commands::completion::generate_completion(shell);
            return Ok(());
        }
        Commands::Config { format } => return commands::config::generate_config(&format),
        other => other,
    };

    let config =
        Config::load_config(cli.config, cli.host).context("failed to load configuration")?;
    logging::initialize_tracing(&config);

    let tokens = Arc::new(FileTokenStore::new(commands::session::token_path()));
    let client = OwlClient::from_config(&config, tokens);

    match command {
        Commands::Login(args) => commands::session::login(&client, args).await?,
        Commands::Logout => commands::session::logout(&client).await?,
        Commands::Init => commands::database::init(&client).await?,
        Commands::Workspaces { action } => commands::workspaces::handle(&client, action).await?,
        Commands::Channels { action } => commands::channels::handle(&client, action).await?,
        Commands::Posts(args) => commands::posts::show(&client, args).await?,
        Commands::Post(args) => commands::posts::create(&client, args).await?,
        Commands::React(args) => commands::posts::react(&client, args).await?,
        Commands::Watch(args) => commands::watch::run(client, &config, args).await?,
        Commands::Completion { .. } | Commands::Config { .. } => {}
    }

    Ok(())
}
