//! # Channel feed reconciliation
//!
//! Posts reach the client out of order: the initial listing, then live updates
//! that may carry a reply before the post it replies to. [`ChannelFeed`] keeps
//! the rendered tree ordered by creation time and parks replies whose parent
//! has not been seen yet until the parent arrives.

use std::collections::HashMap;

use crate::models::PostItem;

/// Outcome of applying one post to the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedChange {
    /// The post is now rendered. `released` counts queued replies that were
    /// attached because of it.
    Added {
        /// Number of queued descendants rendered as a result
        released: usize,
    },
    /// The parent is unknown, so the post waits in the pending queue.
    Queued,
    /// The post was already rendered and its state was refreshed.
    Updated,
}

/// One rendered post with its nesting depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedEntry<'a> {
    /// Zero for top-level posts
    pub depth: usize,
    /// The post itself
    pub post: &'a PostItem,
}

/// Ordered, threaded view of a channel's posts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelFeed {
    posts: HashMap<String, PostItem>,
    roots: Vec<String>,
    children: HashMap<String, Vec<String>>,
    pending: HashMap<String, Vec<PostItem>>,
}

impl ChannelFeed {
    /// Creates an empty feed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the feed contents with `posts`, applied in iteration order.
    pub fn load<I>(&mut self, posts: I)
    where
        I: IntoIterator<Item = PostItem>,
    {
        self.clear();
        for post in posts {
            self.apply(post);
        }
    }

    /// Adds a new post or refreshes one that is already rendered.
    pub fn apply(&mut self, post: PostItem) -> FeedChange {
        if let Some(existing) = self.posts.get_mut(&post.path) {
            existing.reactions = post.reactions;
            existing.contents = post.contents;
            if post.extensions.is_some() {
                existing.extensions = post.extensions;
            }
            return FeedChange::Updated;
        }
        self.add(post)
    }

    fn add(&mut self, post: PostItem) -> FeedChange {
        match post.parent.as_deref() {
            None => insert_ordered(&mut self.roots, &self.posts, &post),
            Some(parent) if self.posts.contains_key(parent) => {
                let siblings = self.children.entry(parent.to_string()).or_default();
                insert_ordered(siblings, &self.posts, &post);
            }
            Some(parent) => {
                tracing::debug!(path = %post.path, parent, "parent not rendered yet, queueing");
                let queue = self.pending.entry(parent.to_string()).or_default();
                match queue.iter_mut().find(|queued| queued.path == post.path) {
                    Some(slot) => *slot = post,
                    None => queue.push(post),
                }
                return FeedChange::Queued;
            }
        }

        let path = post.path.clone();
        self.posts.insert(path.clone(), post);
        let released = self.release(&path);
        FeedChange::Added { released }
    }

    fn release(&mut self, parent: &str) -> usize {
        let Some(mut waiting) = self.pending.remove(parent) else {
            return 0;
        };
        waiting.sort_by_key(|post| post.creation_time);

        let mut released = 0;
        for child in waiting {
            if let FeedChange::Added { released: nested } = self.add(child) {
                released += 1 + nested;
            }
        }
        released
    }

    /// Drops every rendered and queued post.
    pub fn clear(&mut self) {
        self.posts.clear();
        self.roots.clear();
        self.children.clear();
        self.pending.clear();
    }

    /// Number of rendered posts.
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    /// Returns `true` when nothing is rendered.
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Number of posts waiting for their parent.
    pub fn pending_len(&self) -> usize {
        self.pending.values().map(Vec::len).sum()
    }

    /// Returns `true` if `path` is rendered.
    pub fn contains(&self, path: &str) -> bool {
        self.posts.contains_key(path)
    }

    /// Looks up a rendered post.
    pub fn get(&self, path: &str) -> Option<&PostItem> {
        self.posts.get(path)
    }

    /// Top-level posts in display order.
    pub fn roots(&self) -> impl Iterator<Item = &PostItem> {
        self.roots.iter().filter_map(|path| self.posts.get(path))
    }

    /// Direct replies to `path` in display order.
    pub fn children_of<'a>(&'a self, path: &str) -> impl Iterator<Item = &'a PostItem> + 'a {
        self.children
            .get(path)
            .into_iter()
            .flatten()
            .filter_map(|child| self.posts.get(child))
    }

    /// Every rendered post, depth first, in display order.
    pub fn entries(&self) -> Vec<FeedEntry<'_>> {
        let mut out = Vec::with_capacity(self.posts.len());
        let mut stack: Vec<(usize, &str)> = self
            .roots
            .iter()
            .rev()
            .map(|path| (0, path.as_str()))
            .collect();

        while let Some((depth, path)) = stack.pop() {
            let Some(post) = self.posts.get(path) else {
                continue;
            };
            out.push(FeedEntry { depth, post });
            if let Some(children) = self.children.get(path) {
                stack.extend(
                    children
                        .iter()
                        .rev()
                        .map(|child| (depth + 1, child.as_str())),
                );
            }
        }
        out
    }
}

// Orders by creation time; equal times fall back to the path so the result
// does not depend on arrival order.
fn insert_ordered(list: &mut Vec<String>, posts: &HashMap<String, PostItem>, post: &PostItem) {
    let key = (post.creation_time, post.path.as_str());
    let index = list
        .iter()
        .position(|other| {
            posts
                .get(other)
                .is_some_and(|other| (other.creation_time, other.path.as_str()) > key)
        })
        .unwrap_or(list.len());
    list.insert(index, post.path.clone());
}
