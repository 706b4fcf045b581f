//! Interfaces to the chat platform and its scheduled-event system.
//!
//! The coordinator only talks to the outside world through these traits.

pub mod local;

pub use local::LocalBoard;

use crate::core::summary::Summary;
use crate::errors::AppResult;
use crate::models::ids::{ChannelId, EventId, MessageId, UserId};
use chrono::{DateTime, FixedOffset};
use std::time::Duration;

/// The signup message and the reactions on it.
pub trait SignupBoard {
    /// Post a new signup message in `channel`, seeding one reaction per token.
    fn post_signup(
        &mut self,
        channel: ChannelId,
        summary: &Summary,
        tokens: &[String],
    ) -> AppResult<MessageId>;

    /// Replace the content of the bound message.
    fn render_summary(&mut self, message: MessageId, summary: &Summary) -> AppResult<()>;

    /// Remove `user`'s `token` reaction.
    fn retract_input(&mut self, message: MessageId, token: &str, user: UserId) -> AppResult<()>;

    /// Every (user, token) pair currently active on `message` among `tokens`.
    fn active_tokens_for(
        &self,
        message: MessageId,
        tokens: &[String],
    ) -> AppResult<Vec<(UserId, String)>>;
}

pub trait Notifier {
    /// Private message to a user.
    fn notify_user(&mut self, user: UserId, text: &str) -> AppResult<()>;

    /// Channel post that deletes itself after `ttl`.
    fn post_transient(&mut self, channel: ChannelId, text: &str, ttl: Duration) -> AppResult<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub name: String,
    pub description: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub location: String,
}

pub trait EventMirror {
    fn create_event(&mut self, draft: &EventDraft) -> AppResult<EventId>;

    fn update_description(&mut self, event: EventId, description: &str) -> AppResult<()>;
}

/// Everything the coordinator needs from the platform.
pub trait Platform: SignupBoard + Notifier + EventMirror {}

impl<T: SignupBoard + Notifier + EventMirror> Platform for T {}
