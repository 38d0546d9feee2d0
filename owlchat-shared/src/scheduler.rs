//! Scheduled sends.
//!
//! Posts with a future send time are held locally and released by the
//! subscription's keepalive frames, one per keepalive.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

use crate::errors::{ClientError, ClientResult};
use crate::models::NewPost;

/// Error shown when the picker is submitted with a missing field.
pub const MISSING_DATE_OR_TIME: &str = "Error: date AND time must be selected";
/// Error shown when the picked time has already passed.
pub const DATE_IN_PAST: &str = "Error: date must not be in the past";

/// Posts waiting for their send time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleQueue {
    posts: Vec<NewPost>,
}

impl ScheduleQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Holds `post` until its scheduled time has passed.
    pub fn schedule(&mut self, post: NewPost) {
        tracing::debug!(queued = self.posts.len() + 1, "post scheduled");
        self.posts.push(post);
    }

    /// Number of posts waiting.
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    /// Returns `true` when nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Posts waiting, in scheduling order.
    pub fn iter(&self) -> impl Iterator<Item = &NewPost> {
        self.posts.iter()
    }

    /// Removes and returns the first post whose send time is before `now_ms`.
    ///
    /// At most one post is released per call. The scan stops at the first post
    /// that has no usable send time.
    ///
    /// # Errors
    /// Returns [`ClientError::Schedule`] for a post without a scheduled time.
    pub fn take_due(&mut self, now_ms: i64) -> ClientResult<Option<NewPost>> {
        for index in 0..self.posts.len() {
            let send_at = self.posts[index].scheduled_time()?;
            if send_at < now_ms {
                return Ok(Some(self.posts.remove(index)));
            }
            tracing::trace!(send_at, now_ms, "scheduled post not due yet");
        }
        Ok(None)
    }
}

/// Parses the schedule picker's date (`YYYY-MM-DD`) and time (`HH:MM`) as
/// local time and checks that it lies in the future.
///
/// # Errors
/// Returns [`ClientError::Validation`] with the message to show in the picker.
pub fn parse_schedule(
    date: &str,
    time: &str,
    now: DateTime<Local>,
) -> ClientResult<DateTime<Local>> {
    let (date, time) = (date.trim(), time.trim());
    if date.is_empty() || time.is_empty() {
        return Err(ClientError::validation(MISSING_DATE_OR_TIME));
    }

    let day = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| ClientError::validation(format!("Error: \"{date}\" is not a valid date")))?;
    let clock = NaiveTime::parse_from_str(time, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
        .map_err(|_| ClientError::validation(format!("Error: \"{time}\" is not a valid time")))?;

    let local = Local
        .from_local_datetime(&NaiveDateTime::new(day, clock))
        .earliest()
        .ok_or_else(|| {
            ClientError::validation(format!("Error: {date} {time} does not exist locally"))
        })?;

    if local < now {
        return Err(ClientError::validation(DATE_IN_PAST));
    }
    Ok(local)
}
