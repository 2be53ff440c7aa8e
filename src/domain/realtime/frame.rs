//! The single message shape travelling over the realtime channel.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A named event with a JSON payload.
///
/// Used in both directions: domain events and acknowledgments from the hub,
/// control messages (`join:airport`, `ping`, ...) from clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireFrame {
    /// Colon-namespaced event name, e.g. `flight:statusChanged`.
    pub event: String,

    /// Event payload; `null` when the event carries nothing.
    #[serde(default)]
    pub data: Value,
}

impl WireFrame {
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }

    /// Parse a frame from a text message.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Serialize the frame as a text message.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn frame_without_data_defaults_to_null() {
        let frame = WireFrame::from_json(r#"{"event":"join:global"}"#).unwrap();
        assert_eq!(frame.event, "join:global");
        assert_eq!(frame.data, Value::Null);
    }

    #[test]
    fn frame_serializes_event_and_data() {
        let frame = WireFrame::new("pong", json!({"id": 7}));
        let text = frame.to_json().unwrap();
        assert!(text.contains(r#""event":"pong""#));
        assert!(text.contains(r#""id":7"#));
    }

    #[test]
    fn malformed_frame_is_rejected() {
        assert!(WireFrame::from_json(r#"{"data": 1}"#).is_err());
        assert!(WireFrame::from_json("not json").is_err());
    }
}
