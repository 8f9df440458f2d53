use thiserror::Error;

/// Failure taxonomy at the engine boundary.
///
/// Every invocation failure surfaces through one of these variants; the
/// engine converts them to visible system error turns rather than letting
/// them escape to callers mid-conversation.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The agent itself reported a failure through a trace event.
    #[error("agent failure: {reason}")]
    AgentFailure { reason: String },

    /// The stream completed without producing any content.
    #[error("agent returned an empty completion")]
    EmptyCompletion,

    /// HTTP/stream-level failure after retries were exhausted.
    #[error("transport error: {0}")]
    Transport(#[from] bedrock_api::BedrockApiError),

    #[error(transparent)]
    Store(#[from] chat_store::ChatStoreError),

    /// The agent has no long-term memory capability. Holds until an
    /// explicit refresh re-derives it from a fresh fetch.
    #[error("long-term memory is not enabled for this agent")]
    MemoryUnsupported,

    /// A memory fetch failed for a reason worth retrying later.
    #[error("memory fetch failed: {message}")]
    MemoryTransient { message: String },

    /// A submit or end-session arrived while another request was in flight.
    #[error("a request is already in flight")]
    Busy,

    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("credential lookup failed: {message}")]
    Identity { message: String },
}

impl ChatError {
    #[must_use]
    pub fn agent_failure(reason: impl Into<String>) -> Self {
        Self::AgentFailure {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn memory_transient(message: impl Into<String>) -> Self {
        Self::MemoryTransient {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn identity(message: impl Into<String>) -> Self {
        Self::Identity {
            message: message.into(),
        }
    }

    /// True when this error marks the memory capability as permanently
    /// absent rather than temporarily unreachable.
    #[must_use]
    pub fn is_memory_unsupported(&self) -> bool {
        matches!(self, Self::MemoryUnsupported)
    }
}
