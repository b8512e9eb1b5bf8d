use serde::{Deserialize, Serialize};

use crate::{GameSnapshot, HighScore, ProtocolError, Result};

/// Commands sent by a player.
///
/// Numbers are kept wide on purpose so out-of-range values decode fine and
/// get rejected by the [`Session`](crate::Session) with a readable error.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Init { grid_size: i64, num_bombs: i64 },
    Play { row: i64, col: i64 },
    Flag { row: i64, col: i64 },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Init(GameSnapshot),
    Play(GameSnapshot),
    Flag(GameSnapshot),
    End {
        game: GameSnapshot,
        high_scores: Vec<HighScore>,
    },
    Error {
        message: String,
    },
}

impl ServerMessage {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn snapshot(&self) -> Option<&GameSnapshot> {
        match self {
            Self::Init(game) | Self::Play(game) | Self::Flag(game) | Self::End { game, .. } => {
                Some(game)
            }
            Self::Error { .. } => None,
        }
    }
}

pub fn decode<'a, T: Deserialize<'a>>(text: &'a str) -> Result<T> {
    serde_json::from_str(text).map_err(ProtocolError::Decode)
}

pub fn encode<T: Serialize>(message: &T) -> Result<String> {
    serde_json::to_string(message).map_err(ProtocolError::Encode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_messages_are_tagged_by_type() {
        let message: ClientMessage = decode(r#"{"type":"play","row":3,"col":-1}"#).unwrap();
        assert_eq!(message, ClientMessage::Play { row: 3, col: -1 });

        let message: ClientMessage =
            decode(r#"{"type":"init","grid_size":16,"num_bombs":32}"#).unwrap();
        assert_eq!(
            message,
            ClientMessage::Init {
                grid_size: 16,
                num_bombs: 32
            }
        );
    }

    #[test]
    fn unknown_or_incomplete_messages_fail_to_decode() {
        assert!(matches!(
            decode::<ClientMessage>(r#"{"type":"explode"}"#),
            Err(ProtocolError::Decode(_))
        ));
        assert!(matches!(
            decode::<ClientMessage>(r#"{"type":"flag","row":1}"#),
            Err(ProtocolError::Decode(_))
        ));
    }

    #[test]
    fn error_message_encoding() {
        let json = encode(&ServerMessage::error("Invalid position")).unwrap();
        assert_eq!(json, r#"{"type":"error","message":"Invalid position"}"#);
    }
}
