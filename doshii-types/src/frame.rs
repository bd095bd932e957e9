//! Socket frame envelopes.
//!
//! The channel speaks JSON text frames. Three envelopes exist:
//!
//! - outbound heartbeat: `{"doshii":{"ping":true}}`
//! - inbound heartbeat ack: `{"doshii":{"pong":<timestamp>}}`
//! - inbound event: `{"emit":[<kind>, <payload>]}`

use crate::event::EventKind;
use serde_json::{Value, json};
use thiserror::Error;

/// Frame decode failures.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("invalid frame: {0}")]
    Invalid(String),

    #[error("unknown event kind: {0}")]
    UnknownKind(String),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A decoded unit received on (or sent over) the connection.
#[derive(Debug, Clone, PartialEq)]
pub enum SocketFrame {
    /// Outbound liveness probe.
    Ping,
    /// Heartbeat acknowledgment carrying the server timestamp.
    Pong { timestamp: i64 },
    /// An event-kind-tagged payload.
    Event { kind: EventKind, payload: Value },
}

impl SocketFrame {
    /// Encode the frame into its JSON text representation.
    pub fn encode(&self) -> String {
        match self {
            SocketFrame::Ping => json!({ "doshii": { "ping": true } }).to_string(),
            SocketFrame::Pong { timestamp } => {
                json!({ "doshii": { "pong": timestamp } }).to_string()
            }
            SocketFrame::Event { kind, payload } => {
                json!({ "emit": [kind.as_str(), payload] }).to_string()
            }
        }
    }

    /// Decode a JSON text frame.
    ///
    /// Frames with an unrecognized event kind decode to
    /// [`FrameError::UnknownKind`] so the caller can skip them without
    /// dropping the connection.
    pub fn decode(text: &str) -> Result<Self, FrameError> {
        let value: Value = serde_json::from_str(text)?;

        if let Some(doshii) = value.get("doshii") {
            if doshii.get("ping").and_then(Value::as_bool) == Some(true) {
                return Ok(SocketFrame::Ping);
            }
            if let Some(ts) = doshii.get("pong") {
                let timestamp = ts.as_i64().unwrap_or_default();
                return Ok(SocketFrame::Pong { timestamp });
            }
            return Err(FrameError::Invalid(
                "doshii envelope without ping/pong".to_string(),
            ));
        }

        if let Some(emit) = value.get("emit") {
            let parts = emit
                .as_array()
                .ok_or_else(|| FrameError::Invalid("emit is not an array".to_string()))?;
            let name = parts
                .first()
                .and_then(Value::as_str)
                .ok_or_else(|| FrameError::Invalid("emit without event name".to_string()))?;
            let kind = EventKind::parse(name)
                .ok_or_else(|| FrameError::UnknownKind(name.to_string()))?;
            let payload = parts.get(1).cloned().unwrap_or(Value::Null);
            return Ok(SocketFrame::Event { kind, payload });
        }

        Err(FrameError::Invalid("unrecognized envelope".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ping_encodes_expected_envelope() {
        let text = SocketFrame::Ping.encode();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["doshii"]["ping"], Value::Bool(true));
    }

    #[test]
    fn pong_decodes_timestamp() {
        let frame = SocketFrame::decode(r#"{"doshii":{"pong":1700000000123}}"#).unwrap();
        assert_eq!(frame, SocketFrame::Pong { timestamp: 1700000000123 });
    }

    #[test]
    fn event_decodes_kind_and_payload() {
        let frame = SocketFrame::decode(r#"{"emit":["order_updated",{"id":"42"}]}"#).unwrap();
        match frame {
            SocketFrame::Event { kind, payload } => {
                assert_eq!(kind, EventKind::OrderUpdated);
                assert_eq!(payload["id"], "42");
            }
            other => panic!("expected event frame, got {other:?}"),
        }
    }

    #[test]
    fn unknown_kind_is_reported_not_fatal() {
        let err = SocketFrame::decode(r#"{"emit":["mystery_event",{}]}"#).unwrap_err();
        assert!(matches!(err, FrameError::UnknownKind(name) if name == "mystery_event"));
    }

    #[test]
    fn garbage_is_invalid() {
        assert!(SocketFrame::decode("not json").is_err());
        assert!(SocketFrame::decode(r#"{"other":1}"#).is_err());
        assert!(SocketFrame::decode(r#"{"emit":"nope"}"#).is_err());
    }

    #[test]
    fn event_round_trip() {
        let frame = SocketFrame::Event {
            kind: EventKind::TableUpdated,
            payload: serde_json::json!({ "name": "T1" }),
        };
        let decoded = SocketFrame::decode(&frame.encode()).unwrap();
        assert_eq!(decoded, frame);
    }
}
