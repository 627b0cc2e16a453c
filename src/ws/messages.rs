//! WebSocket message types: envelope, commands, and events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Top-level WebSocket message envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsMessage {
    /// Client-provided ID for requests; server-generated for events.
    pub id: String,
    /// Message type discriminator.
    #[serde(rename = "type")]
    pub msg_type: WsMessageType,
    /// ISO-8601 timestamp.
    pub timestamp: DateTime<Utc>,
    /// Variant-specific payload.
    pub payload: serde_json::Value,
}

impl WsMessage {
    /// Builds a server-originated message stamped with the current time.
    #[must_use]
    pub fn server(id: String, msg_type: WsMessageType, payload: serde_json::Value) -> Self {
        Self {
            id,
            msg_type,
            timestamp: Utc::now(),
            payload,
        }
    }

    /// Builds an error message with a numeric code.
    #[must_use]
    pub fn error(id: String, code: u16, message: &str) -> Self {
        Self::server(
            id,
            WsMessageType::Error,
            serde_json::json!({ "code": code, "message": message }),
        )
    }
}

/// Discriminator for WebSocket message types.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WsMessageType {
    /// Client → Server command.
    Command,
    /// Server → Client response to a command.
    Response,
    /// Server → Client broadcast event.
    Event,
    /// Server → Client error.
    Error,
}

/// Commands a client can send in the payload of a `command` message.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum WsCommand {
    /// Follow events for specific sports. Use `["*"]` for every sport.
    Subscribe {
        /// Sport tags to follow.
        sports: Vec<String>,
    },
    /// Stop following events for specific sports.
    Unsubscribe {
        /// Sport tags to drop. `"*"` clears the wildcard.
        sports: Vec<String>,
    },
    /// Fetch the current league table of one sport.
    GetStandings {
        /// Sport tag.
        sport: String,
    },
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn subscribe_command_parses() {
        let raw = serde_json::json!({ "command": "subscribe", "sports": ["football", "*"] });
        let Ok(WsCommand::Subscribe { sports }) = serde_json::from_value::<WsCommand>(raw) else {
            panic!("expected subscribe");
        };
        assert_eq!(sports, vec!["football", "*"]);
    }

    #[test]
    fn unknown_command_is_rejected() {
        let raw = serde_json::json!({ "command": "reset_table" });
        assert!(serde_json::from_value::<WsCommand>(raw).is_err());
    }

    #[test]
    fn envelope_uses_type_key() {
        let msg = WsMessage::error("abc".to_string(), 400, "bad");
        let Ok(json) = serde_json::to_value(&msg) else {
            panic!("serialize failed");
        };
        assert_eq!(json["type"], "error");
        assert_eq!(json["payload"]["code"], 400);
    }
}
