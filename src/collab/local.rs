//! File-backed stand-in for the chat platform, used by the CLI and tests.
//!
//! It keeps messages with their reactions, scheduled events and every
//! message delivered to users, and can simulate the failures a real platform
//! produces (DMs closed, missing manage-messages permission, event service
//! down).

use crate::collab::{EventDraft, EventMirror, Notifier, SignupBoard};
use crate::core::summary::Summary;
use crate::errors::{AppError, AppResult};
use crate::models::ids::{ChannelId, EventId, MessageId, UserId};
use crate::ui::messages::{info, warning};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

const FIRST_ID: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    pub user: UserId,
    pub token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardMessage {
    pub channel: ChannelId,
    pub content: String,
    /// Reactions added by the board itself when posting.
    pub seeded: Vec<String>,
    pub reactions: Vec<Reaction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardEvent {
    pub name: String,
    pub description: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    pub user: UserId,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransientPost {
    pub channel: ChannelId,
    pub text: String,
    pub ttl_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalBoard {
    next_id: u64,
    pub messages: BTreeMap<MessageId, BoardMessage>,
    pub events: BTreeMap<EventId, BoardEvent>,
    pub deliveries: Vec<Delivery>,
    pub transient: Vec<TransientPost>,
    /// Users who do not accept private messages.
    pub blocked_dms: BTreeSet<UserId>,
    pub retract_denied: bool,
    /// Reading the reactions of a message fails.
    pub reads_unavailable: bool,
    pub events_unavailable: bool,
    #[serde(skip)]
    echo: bool,
}

impl LocalBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Print deliveries to the terminal as they happen.
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn load(path: &Path) -> AppResult<Self> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    fn allocate_id(&mut self) -> u64 {
        if self.next_id < FIRST_ID {
            self.next_id = FIRST_ID;
        }
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn message(&self, id: MessageId) -> Option<&BoardMessage> {
        self.messages.get(&id)
    }

    /// Record a user reaction. `false` when it was already there.
    pub fn add_reaction(&mut self, message: MessageId, user: UserId, token: &str) -> AppResult<bool> {
        let msg = self
            .messages
            .get_mut(&message)
            .ok_or_else(|| AppError::Platform(format!("unknown message {}", message)))?;
        if msg.reactions.iter().any(|r| r.user == user && r.token == token) {
            return Ok(false);
        }
        msg.reactions.push(Reaction {
            user,
            token: token.to_string(),
        });
        Ok(true)
    }

    /// Drop a user reaction. `false` when there was none.
    pub fn remove_reaction(&mut self, message: MessageId, user: UserId, token: &str) -> bool {
        let Some(msg) = self.messages.get_mut(&message) else {
            return false;
        };
        let before = msg.reactions.len();
        msg.reactions.retain(|r| !(r.user == user && r.token == token));
        msg.reactions.len() != before
    }

    pub fn reactions_of(&self, message: MessageId, user: UserId) -> Vec<String> {
        self.messages
            .get(&message)
            .map(|m| {
                m.reactions
                    .iter()
                    .filter(|r| r.user == user)
                    .map(|r| r.token.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn deliveries_to(&self, user: UserId) -> Vec<&str> {
        self.deliveries
            .iter()
            .filter(|d| d.user == user)
            .map(|d| d.text.as_str())
            .collect()
    }
}

impl SignupBoard for LocalBoard {
    fn post_signup(
        &mut self,
        channel: ChannelId,
        summary: &Summary,
        tokens: &[String],
    ) -> AppResult<MessageId> {
        let id = MessageId(self.allocate_id());
        self.messages.insert(
            id,
            BoardMessage {
                channel,
                content: summary.render(),
                seeded: tokens.to_vec(),
                reactions: Vec::new(),
            },
        );
        Ok(id)
    }

    fn render_summary(&mut self, message: MessageId, summary: &Summary) -> AppResult<()> {
        let msg = self
            .messages
            .get_mut(&message)
            .ok_or_else(|| AppError::Platform(format!("unknown message {}", message)))?;
        msg.content = summary.render();
        Ok(())
    }

    fn retract_input(&mut self, message: MessageId, token: &str, user: UserId) -> AppResult<()> {
        if self.retract_denied {
            return Err(AppError::PermissionDenied(
                "missing permission to manage reactions".into(),
            ));
        }
        self.remove_reaction(message, user, token);
        Ok(())
    }

    fn active_tokens_for(
        &self,
        message: MessageId,
        tokens: &[String],
    ) -> AppResult<Vec<(UserId, String)>> {
        if self.reads_unavailable {
            return Err(AppError::Platform("reaction list unavailable".into()));
        }
        let msg = self
            .messages
            .get(&message)
            .ok_or_else(|| AppError::Platform(format!("unknown message {}", message)))?;
        Ok(msg
            .reactions
            .iter()
            .filter(|r| tokens.contains(&r.token))
            .map(|r| (r.user, r.token.clone()))
            .collect())
    }
}

impl Notifier for LocalBoard {
    fn notify_user(&mut self, user: UserId, text: &str) -> AppResult<()> {
        if self.blocked_dms.contains(&user) {
            return Err(AppError::PermissionDenied(format!(
                "user {} does not accept direct messages",
                user
            )));
        }
        if self.echo {
            info(format!("📨 DM to {}: {}", user.mention(), text));
        }
        self.deliveries.push(Delivery {
            user,
            text: text.to_string(),
        });
        Ok(())
    }

    fn post_transient(&mut self, channel: ChannelId, text: &str, ttl: Duration) -> AppResult<()> {
        if self.echo {
            warning(format!("📢 #{} (deletes in {}s): {}", channel, ttl.as_secs(), text));
        }
        self.transient.push(TransientPost {
            channel,
            text: text.to_string(),
            ttl_secs: ttl.as_secs(),
        });
        Ok(())
    }
}

impl EventMirror for LocalBoard {
    fn create_event(&mut self, draft: &EventDraft) -> AppResult<EventId> {
        if self.events_unavailable {
            return Err(AppError::Platform("scheduled events unavailable".into()));
        }
        let id = EventId(self.allocate_id());
        self.events.insert(
            id,
            BoardEvent {
                name: draft.name.clone(),
                description: draft.description.clone(),
                start: draft.start,
                end: draft.end,
                location: draft.location.clone(),
            },
        );
        Ok(id)
    }

    fn update_description(&mut self, event: EventId, description: &str) -> AppResult<()> {
        if self.events_unavailable {
            return Err(AppError::Platform("scheduled events unavailable".into()));
        }
        let ev = self
            .events
            .get_mut(&event)
            .ok_or_else(|| AppError::Platform(format!("unknown event {}", event)))?;
        ev.description = description.to_string();
        Ok(())
    }
}
