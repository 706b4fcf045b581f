use crate::models::ids::{MessageId, UserId};

/// Inbound reaction signal delivered by the chat platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    Added {
        user: UserId,
        message: MessageId,
        token: String,
    },
    Removed {
        user: UserId,
        message: MessageId,
        token: String,
    },
}

impl Signal {
    pub fn added(user: UserId, message: MessageId, token: impl Into<String>) -> Self {
        Signal::Added {
            user,
            message,
            token: token.into(),
        }
    }

    pub fn removed(user: UserId, message: MessageId, token: impl Into<String>) -> Self {
        Signal::Removed {
            user,
            message,
            token: token.into(),
        }
    }

    pub fn message(&self) -> MessageId {
        match self {
            Signal::Added { message, .. } | Signal::Removed { message, .. } => *message,
        }
    }

    pub fn user(&self) -> UserId {
        match self {
            Signal::Added { user, .. } | Signal::Removed { user, .. } => *user,
        }
    }

    pub fn token(&self) -> &str {
        match self {
            Signal::Added { token, .. } | Signal::Removed { token, .. } => token,
        }
    }
}
