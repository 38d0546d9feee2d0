use anyhow::{Context, Result};
use clap::Args;
use shared::models::{NewPost, ReactionKind};
use shared::notices::{POST_FAILED, REACTION_FAILED, posts_failed};
use shared::validation::{validate_post_message, validate_username};
use shared::{ChannelFeed, OwlClient};

use crate::render;

#[derive(Args, Debug)]
#[command(about = "Show the threaded feed of a channel")]
pub struct PostsArgs {
    /// Workspace holding the channel
    pub workspace: String,
    /// Channel to show
    pub channel: String,
}

#[derive(Args, Debug)]
#[command(about = "Create a post or a reply")]
pub struct PostArgs {
    /// Workspace holding the channel
    pub workspace: String,
    /// Channel to post in
    pub channel: String,
    /// Message text; supports **bold**, *italic*, [text](url), :like: and \n
    pub message: String,
    /// Path of the post to reply to
    #[arg(long)]
    pub reply_to: Option<String>,
    /// Username you logged in with
    #[arg(long = "as", value_name = "USERNAME")]
    pub user: String,
}

#[derive(Args, Debug)]
#[command(about = "React to a post")]
pub struct ReactArgs {
    /// Path of the post, as shown in the feed
    pub post_path: String,
    /// One of smile, frown, like, celebrate
    pub kind: ReactionKind,
    /// Username you logged in with
    #[arg(long = "as", value_name = "USERNAME")]
    pub user: String,
}

pub async fn show(client: &OwlClient, args: PostsArgs) -> Result<()> {
    let posts = client
        .get_posts(&args.workspace, &args.channel)
        .await
        .with_context(|| posts_failed(&args.channel))?;

    let mut feed = ChannelFeed::new();
    feed.load(posts);
    println!("{}", render::feed(&feed));
    if feed.pending_len() > 0 {
        tracing::debug!(pending = feed.pending_len(), "replies without a visible parent");
    }
    Ok(())
}

pub async fn create(client: &OwlClient, args: PostArgs) -> Result<()> {
    let user = validate_username(&args.user)?;
    let message = validate_post_message(&args.message)?;
    let post = NewPost::new(message, args.reply_to);
    client
        .create_post(&args.workspace, &args.channel, &post)
        .await
        .context(POST_FAILED)?;
    println!("{user} posted to {}/{}", args.workspace, args.channel);
    Ok(())
}

pub async fn react(client: &OwlClient, args: ReactArgs) -> Result<()> {
    let user = validate_username(&args.user)?;
    client
        .add_reaction(&args.post_path, args.kind, user)
        .await
        .context(REACTION_FAILED)?;
    println!("{user} reacted {} to {}", args.kind.glyph(), args.post_path);
    Ok(())
}
