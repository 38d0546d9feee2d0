use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use clap::Args;
use colored::Colorize;
use shared::config::Config;
use shared::models::{NewPost, ReactionKind};
use shared::notices::{POST_FAILED, REACTION_FAILED, posts_failed};
use shared::scheduler::parse_schedule;
use shared::validation::{validate_post_message, validate_username};
use shared::{
    ChannelFeed, ClientResult, FeedChange, OwlClient, ScheduleQueue, StreamEvent, Subscription,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::sleep;

use crate::render;

const HELP: &str = "Type a message to post. Commands: /reply <path> <text>, /react <path> <kind>, \
/schedule <YYYY-MM-DD> <HH:MM> <text>, /feed, /quit";

#[derive(Args, Debug)]
#[command(about = "Follow a channel live and post from the terminal")]
pub struct WatchArgs {
    /// Workspace holding the channel
    pub workspace: String,
    /// Channel to follow
    pub channel: String,
    /// Username you logged in with
    #[arg(long = "as", value_name = "USERNAME")]
    pub user: String,
}

/// One line typed during a watch session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Post(String),
    Reply { parent: String, text: String },
    React { path: String, kind: String },
    Schedule { date: String, time: String, text: String },
    Feed,
    Quit,
    Help,
    Empty,
}

impl Input {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }
        let Some(command) = line.strip_prefix('/') else {
            return Self::Post(line.to_string());
        };

        let (name, rest) = command.split_once(' ').unwrap_or((command, ""));
        let rest = rest.trim();
        match name {
            "quit" | "exit" => Self::Quit,
            "feed" => Self::Feed,
            "reply" => {
                let (parent, text) = rest.split_once(' ').unwrap_or((rest, ""));
                Self::Reply {
                    parent: parent.to_string(),
                    text: text.trim().to_string(),
                }
            }
            "react" => {
                let (path, kind) = rest.split_once(' ').unwrap_or((rest, ""));
                Self::React {
                    path: path.to_string(),
                    kind: kind.trim().to_string(),
                }
            }
            "schedule" => {
                let mut parts = rest.splitn(3, ' ');
                Self::Schedule {
                    date: parts.next().unwrap_or_default().to_string(),
                    time: parts.next().unwrap_or_default().to_string(),
                    text: parts.next().unwrap_or_default().trim().to_string(),
                }
            }
            _ => Self::Help,
        }
    }
}

struct WatchSession {
    client: OwlClient,
    workspace: String,
    channel: String,
    user: String,
    feed: ChannelFeed,
    queue: ScheduleQueue,
}

impl WatchSession {
    async fn handle_event(&mut self, event: ClientResult<StreamEvent>) {
        match event {
            Ok(StreamEvent::Post(post)) => {
                let path = post.path.clone();
                match self.feed.apply(post) {
                    FeedChange::Added { released } => {
                        let entries = self.feed.entries();
                        if let Some(entry) = entries.into_iter().find(|e| e.post.path == path) {
                            println!("{}", render::post(entry.post, entry.depth));
                        }
                        if released > 0 {
                            let note = format!("({released} earlier replies attached)");
                            println!("{}", note.dimmed());
                        }
                    }
                    FeedChange::Updated => {
                        if let Some(post) = self.feed.get(&path) {
                            println!("{} {}", "updated".dimmed(), render::post(post, 0));
                        }
                    }
                    FeedChange::Queued => {
                        tracing::debug!(path = %path, "reply waiting for its parent");
                    }
                }
            }
            Ok(StreamEvent::KeepAlive) => self.send_due().await,
            Ok(event @ StreamEvent::Violation(_)) => {
                if let Some(err) = event.violation() {
                    tracing::warn!(%err, "ignoring subscription event");
                }
            }
            Err(err) => tracing::warn!(%err, "subscription error"),
        }
    }

    async fn send_due(&mut self) {
        match self.queue.take_due(Utc::now().timestamp_millis()) {
            Ok(Some(post)) => {
                if let Err(err) = self
                    .client
                    .create_post(&self.workspace, &self.channel, &post)
                    .await
                {
                    eprintln!("{}: {err}", POST_FAILED.red());
                } else {
                    println!("{}", "Scheduled post sent.".green());
                }
            }
            Ok(None) => {}
            Err(err) => tracing::error!(%err, "scheduled post check failed"),
        }
    }

    /// Returns `false` when the session should end.
    async fn handle_input(&mut self, input: Input) -> bool {
        let result = match input {
            Input::Empty => Ok(()),
            Input::Quit => return false,
            Input::Help => {
                println!("{HELP}");
                Ok(())
            }
            Input::Feed => {
                println!("{}", render::feed(&self.feed));
                Ok(())
            }
            Input::Post(text) => self.post(&text, None).await,
            Input::Reply { parent, text } => self.post(&text, Some(parent)).await,
            Input::React { path, kind } => self.react(&path, &kind).await,
            Input::Schedule { date, time, text } => self.schedule(&date, &time, text),
        };
        if let Err(err) = result {
            eprintln!("{}", format!("{err:#}").red());
        }
        true
    }

    async fn post(&self, text: &str, parent: Option<String>) -> Result<()> {
        let text = validate_post_message(text)?;
        self.client
            .create_post(&self.workspace, &self.channel, &NewPost::new(text, parent))
            .await
            .context(POST_FAILED)?;
        Ok(())
    }

    async fn react(&self, path: &str, kind: &str) -> Result<()> {
        let kind: ReactionKind = kind
            .parse()
            .with_context(|| {
                format!("unknown reaction '{kind}'; use smile, frown, like or celebrate")
            })?;
        self.client
            .add_reaction(path, kind, &self.user)
            .await
            .context(REACTION_FAILED)?;
        Ok(())
    }

    fn schedule(&mut self, date: &str, time: &str, text: String) -> Result<()> {
        let at = parse_schedule(date, time, Local::now())?;
        let text = validate_post_message(&text)?;
        self.queue
            .schedule(NewPost::scheduled(text, None, at.timestamp_millis()));
        println!(
            "Scheduled for {} ({} waiting)",
            at.format("%Y-%m-%d %H:%M"),
            self.queue.len()
        );
        Ok(())
    }
}

pub async fn run(client: OwlClient, config: &Config, args: WatchArgs) -> Result<()> {
    let user = validate_username(&args.user)?.to_string();
    let posts = client
        .get_posts(&args.workspace, &args.channel)
        .await
        .with_context(|| posts_failed(&args.channel))?;

    let mut session = WatchSession {
        client: client.clone(),
        workspace: args.workspace,
        channel: args.channel,
        user,
        feed: ChannelFeed::new(),
        queue: ScheduleQueue::new(),
    };
    session.feed.load(posts);
    println!("{}", render::feed(&session.feed));
    println!("{}", HELP.dimmed());

    let subscription = Subscription::new();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let retry = Duration::from_millis(config.subscription.retry_delay_ms);
    let listener = tokio::spawn(follow(
        client,
        session.workspace.clone(),
        session.channel.clone(),
        subscription.clone(),
        retry,
        tx,
    ));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            Some(event) = rx.recv() => session.handle_event(event).await,
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };
                if !session.handle_input(Input::parse(&line)).await {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    subscription.cancel();
    listener.abort();
    if !session.queue.is_empty() {
        eprintln!(
            "warning: {} scheduled post(s) were not sent",
            session.queue.len()
        );
    }
    Ok(())
}

async fn follow(
    client: OwlClient,
    workspace: String,
    channel: String,
    subscription: Subscription,
    retry: Duration,
    tx: mpsc::UnboundedSender<ClientResult<StreamEvent>>,
) {
    subscription
        .follow(
            || client.subscribe(&workspace, &channel),
            || sleep(retry),
            |event| {
                if tx.send(event).is_err() {
                    subscription.cancel();
                }
            },
        )
        .await;
    tracing::debug!(%channel, "stopped following");
}
