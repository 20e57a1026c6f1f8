//! WebSocket frame types.

use serde::Deserialize;
use serde_json::Value;

use crate::chat::ServerEvent;

/// Frames sent from client to server.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Send a chat message.
    ///
    /// The payload is passed through untouched; the pipeline rejects
    /// anything that is not a string.
    Message {
        #[serde(default)]
        message: Value,
    },
    /// Heartbeat ping, answered with a `pong` event.
    Ping,
}

/// Encode a server event as a text frame.
pub fn event_frame(event: &ServerEvent) -> serde_json::Result<String> {
    serde_json::to_string(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{ChatMessage, TargetEvent};
    use serde_json::json;

    #[test]
    fn test_parse_message() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"message","message":"hello"}"#).unwrap();
        assert_eq!(
            msg,
            ClientMessage::Message {
                message: json!("hello")
            }
        );
    }

    #[test]
    fn test_parse_message_keeps_non_string_payload() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"message","message":{"x":1}}"#).unwrap();
        assert_eq!(
            msg,
            ClientMessage::Message {
                message: json!({ "x": 1 })
            }
        );

        let msg: ClientMessage = serde_json::from_str(r#"{"type":"message"}"#).unwrap();
        assert_eq!(
            msg,
            ClientMessage::Message {
                message: Value::Null
            }
        );
    }

    #[test]
    fn test_parse_ping() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type":"ping"}"#).unwrap();
        assert_eq!(msg, ClientMessage::Ping);
    }

    #[test]
    fn test_parse_unknown_type() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"join","room":"x"}"#).is_err());
        assert!(serde_json::from_str::<ClientMessage>("not json").is_err());
    }

    #[test]
    fn test_event_frame() {
        let frame = event_frame(&ServerEvent::NewMessage(ChatMessage::normal("alice", "hi")))
            .unwrap();
        let value: Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(value["event"], "new message");
        assert_eq!(value["data"]["username"], "alice");
        assert_eq!(value["data"]["message"], "hi");
        assert_eq!(value["data"]["special"], false);
        assert_eq!(value["data"]["type"], "normal");

        let frame = event_frame(&ServerEvent::Target(TargetEvent::Stupidify)).unwrap();
        assert_eq!(frame, r#"{"event":"stupidify"}"#);
    }
}
