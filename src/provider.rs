use async_trait::async_trait;

use crate::error::ChatError;

/// One remote invocation of the agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationParams {
    pub session_id: String,
    pub memory_id: Option<String>,
    pub input_text: String,
    /// Termination call: the service summarizes and closes the session
    /// instead of answering.
    pub end_session: bool,
}

/// Normalized event delivered while an invocation streams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationEvent {
    /// Decoded content fragment of the final response.
    Chunk { text: String },
    /// Reasoning progress. A populated `failure_reason` means the agent
    /// gave up on this invocation.
    Trace {
        failure_reason: Option<String>,
        rationale: Option<String>,
    },
}

/// One closed session's summary from the long-term memory store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemorySummary {
    pub session_id: String,
    pub summary_text: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

/// Provider-neutral seam between the engine and the remote agent service.
///
/// `invoke` drives `on_event` once per normalized stream event, in arrival
/// order, then returns; a returned error means the stream did not complete
/// cleanly and any delivered chunks are partial.
#[async_trait]
pub trait AgentConnector: Send + Sync {
    async fn invoke(
        &self,
        params: InvocationParams,
        on_event: &mut (dyn FnMut(InvocationEvent) + Send),
    ) -> Result<(), ChatError>;

    async fn fetch_memory(&self, memory_id: &str) -> Result<Vec<MemorySummary>, ChatError>;
}
