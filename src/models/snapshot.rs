use crate::models::entry::RosterEntry;
use crate::models::ids::{ChannelId, EventId, MessageId};
use crate::models::occurrence::Occurrence;
use serde::{Deserialize, Serialize};

/// Full persisted state: the roster plus what it is bound to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterSnapshot {
    pub entries: Vec<RosterEntry>,
    pub message_id: Option<MessageId>,
    pub channel_id: Option<ChannelId>,
    pub event_id: Option<EventId>,
    pub occurrence: Option<Occurrence>,
    /// Date label (YYYY-MM-DD) of the occurrence the roster is for.
    pub week_of: Option<String>,
}

impl RosterSnapshot {
    pub fn is_bound(&self) -> bool {
        self.message_id.is_some()
    }

    pub fn unbind(&mut self) {
        self.message_id = None;
        self.channel_id = None;
        self.event_id = None;
        self.occurrence = None;
        self.week_of = None;
    }
}
