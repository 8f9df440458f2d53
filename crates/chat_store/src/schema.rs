use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Originator of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Agent,
    System,
}

/// One message unit in a conversation.
///
/// Ordering in a session log is append-only: a stored turn is never edited
/// in place, except that a streaming turn's `text` is replaced wholesale on
/// each content chunk until finalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Turn {
    pub id: String,
    pub text: String,
    pub sender: Sender,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_streaming: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_error: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_summary: bool,
    /// Temporary turns are never persisted and are purged on the next
    /// user action.
    #[serde(default, skip_serializing_if = "is_false")]
    pub temporary: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Turn {
    fn new(prefix: &str, text: impl Into<String>, sender: Sender) -> Self {
        Self {
            id: format!("{prefix}-{}", Uuid::new_v4()),
            text: text.into(),
            sender,
            is_streaming: false,
            is_error: false,
            is_summary: false,
            temporary: false,
        }
    }

    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self::new("user", text, Sender::User)
    }

    /// Placeholder for an in-flight agent response; `text` is replaced as
    /// content chunks arrive, then the flag is cleared on finalization.
    #[must_use]
    pub fn streaming_agent() -> Self {
        let mut turn = Self::new("agent", "", Sender::Agent);
        turn.is_streaming = true;
        turn
    }

    #[must_use]
    pub fn system(text: impl Into<String>) -> Self {
        Self::new("system", text, Sender::System)
    }

    #[must_use]
    pub fn temporary_system(text: impl Into<String>) -> Self {
        let mut turn = Self::system(text);
        turn.temporary = true;
        turn
    }

    #[must_use]
    pub fn summary_notice(text: impl Into<String>) -> Self {
        let mut turn = Self::system(text);
        turn.is_summary = true;
        turn
    }

    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        let mut turn = Self::new("error", text, Sender::System);
        turn.is_error = true;
        turn
    }

    /// Finalized copy with the accumulated text and streaming flag cleared.
    #[must_use]
    pub fn finalized(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self.is_streaming = false;
        self
    }
}
