//! Request context carried through command handlers into published events.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Correlation and origin of one command.
///
/// Every envelope a handler publishes for the command carries the same
/// correlation id, so a linked-pair status change can be traced as one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMetadata {
    correlation_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
}

impl CommandMetadata {
    /// Fresh metadata with a generated correlation id.
    pub fn new() -> Self {
        Self {
            correlation_id: Uuid::new_v4().to_string(),
            source: None,
        }
    }

    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = id.into();
        self
    }

    /// Origin of the command, e.g. `api` or `display`.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

impl Default for CommandMetadata {
    fn default() -> Self {
        Self::new()
    }
}
