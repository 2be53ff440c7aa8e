//! Broadcast topics.
//!
//! A topic is a pure routing key: `airport:<CODE>` for one airport's
//! displays, or `global` for cross-airport dashboards.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::foundation::{AirportCode, ValidationError};

use super::frame::WireFrame;

const AIRPORT_PREFIX: &str = "airport:";
const GLOBAL: &str = "global";

/// A named broadcast scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Topic {
    /// Displays of a single airport.
    Airport(AirportCode),
    /// Every airport.
    Global,
}

impl Topic {
    /// Topic for one airport.
    pub fn airport(code: AirportCode) -> Self {
        Topic::Airport(code)
    }

    /// Control frame asking the hub to add this client to the topic.
    pub fn join_frame(&self) -> WireFrame {
        match self {
            Topic::Airport(code) => WireFrame::new(
                control::JOIN_AIRPORT,
                Value::String(code.to_string()),
            ),
            Topic::Global => WireFrame::new(control::JOIN_GLOBAL, Value::Null),
        }
    }

    /// Control frame asking the hub to remove this client from the topic.
    pub fn leave_frame(&self) -> WireFrame {
        match self {
            Topic::Airport(code) => WireFrame::new(
                control::LEAVE_AIRPORT,
                Value::String(code.to_string()),
            ),
            Topic::Global => WireFrame::new(control::LEAVE_GLOBAL, Value::Null),
        }
    }

    /// Acknowledgment frame sent back by the hub after a join.
    pub fn joined_frame(&self) -> WireFrame {
        match self {
            Topic::Airport(code) => WireFrame::new(
                control::JOINED_AIRPORT,
                Value::String(code.to_string()),
            ),
            Topic::Global => WireFrame::new(control::JOINED_GLOBAL, Value::Null),
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topic::Airport(code) => write!(f, "{}{}", AIRPORT_PREFIX, code),
            Topic::Global => write!(f, "{}", GLOBAL),
        }
    }
}

impl FromStr for Topic {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == GLOBAL {
            return Ok(Topic::Global);
        }
        match s.strip_prefix(AIRPORT_PREFIX) {
            Some(code) => Ok(Topic::Airport(AirportCode::new(code)?)),
            None => Err(ValidationError::invalid_format(
                "topic",
                format!("'{}' is neither 'global' nor 'airport:<CODE>'", s),
            )),
        }
    }
}

impl TryFrom<String> for Topic {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Topic> for String {
    fn from(topic: Topic) -> Self {
        topic.to_string()
    }
}

/// Control and liveness event names exchanged between clients and the hub.
pub mod control {
    /// Local pseudo-event raised by the client when a session is established.
    pub const CONNECT: &str = "connect";
    /// Local pseudo-event raised by the client when the session is lost.
    pub const DISCONNECT: &str = "disconnect";
    /// Hub greeting carrying the assigned session id.
    pub const CONNECTED: &str = "connected";

    pub const JOIN_AIRPORT: &str = "join:airport";
    pub const LEAVE_AIRPORT: &str = "leave:airport";
    pub const JOINED_AIRPORT: &str = "joined:airport";
    pub const JOIN_GLOBAL: &str = "join:global";
    pub const LEAVE_GLOBAL: &str = "leave:global";
    pub const JOINED_GLOBAL: &str = "joined:global";

    pub const PING: &str = "ping";
    pub const PONG: &str = "pong";

    /// Hub reply to a control message it could not act on.
    pub const ERROR: &str = "error";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cdg() -> AirportCode {
        AirportCode::new("CDG").unwrap()
    }

    #[test]
    fn airport_topic_displays_with_prefix() {
        assert_eq!(Topic::airport(cdg()).to_string(), "airport:CDG");
        assert_eq!(Topic::Global.to_string(), "global");
    }

    #[test]
    fn parses_both_topic_forms() {
        assert_eq!("global".parse::<Topic>().unwrap(), Topic::Global);
        assert_eq!("airport:cdg".parse::<Topic>().unwrap(), Topic::airport(cdg()));
    }

    #[test]
    fn rejects_unknown_topic_forms() {
        assert!("airline:AF".parse::<Topic>().is_err());
        assert!("airport:".parse::<Topic>().is_err());
    }

    #[test]
    fn join_frames_carry_airport_code() {
        let frame = Topic::airport(cdg()).join_frame();
        assert_eq!(frame.event, "join:airport");
        assert_eq!(frame.data, Value::String("CDG".to_string()));

        let frame = Topic::Global.join_frame();
        assert_eq!(frame.event, "join:global");
        assert_eq!(frame.data, Value::Null);
    }

    #[test]
    fn leave_frames_mirror_join_frames() {
        assert_eq!(Topic::airport(cdg()).leave_frame().event, "leave:airport");
        assert_eq!(Topic::Global.leave_frame().event, "leave:global");
    }

    #[test]
    fn topic_serializes_as_string() {
        let json = serde_json::to_string(&Topic::airport(cdg())).unwrap();
        assert_eq!(json, "\"airport:CDG\"");
    }
}
