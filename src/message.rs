//! JSON text frames exchanged with chat clients.
//!
//! Every frame is an object discriminated by its `type` field:
//!
//! - inbound `{"type":"join","name":"..."}` and `{"type":"chat","text":"..."}`
//! - outbound `{"type":"note","text":"..."}` and
//!   `{"type":"chat","name":"...","text":"..."}`

use serde::{Deserialize, Serialize};

use crate::error::{ChatError, Result};

/// A frame sent by a client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Inbound {
    Join { name: String },
    Chat { text: String },
}

impl Inbound {
    /// Decode a raw text frame.
    ///
    /// Bad JSON, an unknown `type` and a missing or mistyped field all come
    /// back as [`ChatError::MalformedMessage`].
    pub fn parse(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| ChatError::MalformedMessage(e.to_string()))
    }
}

/// A frame broadcast to the members of a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Outbound {
    Note { text: String },
    Chat { name: String, text: String },
}

impl Outbound {
    pub fn note(text: impl Into<String>) -> Self {
        Outbound::Note { text: text.into() }
    }

    pub fn chat(name: impl Into<String>, text: impl Into<String>) -> Self {
        Outbound::Chat {
            name: name.into(),
            text: text.into(),
        }
    }

    /// `<name> joined "<room>"`
    pub fn joined(name: &str, room: &str) -> Self {
        Self::note(format!("{} joined \"{}\"", name, room))
    }

    /// `<name> left "<room>"`
    pub fn left(name: &str, room: &str) -> Self {
        Self::note(format!("{} left \"{}\"", name, room))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_join_and_chat() {
        assert_eq!(
            Inbound::parse(r#"{"type":"join","name":"alice"}"#).unwrap(),
            Inbound::Join {
                name: "alice".to_string()
            }
        );
        assert_eq!(
            Inbound::parse(r#"{"type":"chat","text":"hi"}"#).unwrap(),
            Inbound::Chat {
                text: "hi".to_string()
            }
        );
    }

    #[test]
    fn ignores_unknown_fields() {
        let parsed = Inbound::parse(r#"{"type":"chat","text":"hi","extra":true}"#).unwrap();
        assert_eq!(
            parsed,
            Inbound::Chat {
                text: "hi".to_string()
            }
        );
    }

    #[test]
    fn rejects_malformed_frames() {
        for raw in [
            r#"{"type":"chat"}"#,
            r#"{"type":"join"}"#,
            r#"{"type":"shout","text":"hi"}"#,
            r#"{"text":"hi"}"#,
            r#"{"type":"join","name":42}"#,
            "not json",
            "",
        ] {
            let err = Inbound::parse(raw).unwrap_err();
            assert!(
                matches!(err, ChatError::MalformedMessage(_)),
                "expected malformed for {:?}, got {:?}",
                raw,
                err
            );
        }
    }

    #[test]
    fn outbound_wire_format() {
        assert_eq!(
            Outbound::chat("alice", "hi").to_json().unwrap(),
            r#"{"type":"chat","name":"alice","text":"hi"}"#
        );
        assert_eq!(
            Outbound::joined("alice", "lobby").to_json().unwrap(),
            r#"{"type":"note","text":"alice joined \"lobby\""}"#
        );
        assert_eq!(
            Outbound::left("bob", "lobby").to_json().unwrap(),
            r#"{"type":"note","text":"bob left \"lobby\""}"#
        );
    }
}
