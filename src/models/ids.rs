use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! snowflake_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<u64>().map($name)
            }
        }
    };
}

snowflake_id!(
    /// Stable identifier of a chat user.
    UserId
);
snowflake_id!(
    /// Identifier of the signup message carrying the reactions.
    MessageId
);
snowflake_id!(ChannelId);
snowflake_id!(
    /// Identifier of the scheduled event mirrored on the platform.
    EventId
);

impl UserId {
    /// Mention markup understood by the chat platform.
    pub fn mention(&self) -> String {
        format!("<@{}>", self.0)
    }
}
