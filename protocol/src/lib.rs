//! Transport-neutral surface around the game engine.
//!
//! Messages are plain serde types encoded as JSON. How they travel (socket,
//! HTTP body, stdin) is up to the caller.

use thiserror::Error;

pub use leaderboard::*;
pub use message::*;
pub use session::*;
pub use snapshot::*;

mod leaderboard;
mod message;
mod session;
mod snapshot;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Malformed message: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("Could not encode message: {0}")]
    Encode(#[source] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, ProtocolError>;

/// Serde adapters encoding durations as whole milliseconds.
pub(crate) mod millis {
    use core::time::Duration;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    fn to_millis(duration: &Duration) -> u64 {
        u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
    }

    pub(crate) fn serialize<S: Serializer>(
        duration: &Duration,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        to_millis(duration).serialize(serializer)
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }

    pub(crate) mod option {
        use super::*;

        pub(crate) fn serialize<S: Serializer>(
            duration: &Option<Duration>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            duration.as_ref().map(to_millis).serialize(serializer)
        }

        pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Duration>, D::Error> {
            Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
        }
    }
}
