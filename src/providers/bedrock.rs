use std::sync::Arc;

use async_trait::async_trait;
use bedrock_api::{
    AgentStreamEvent, BedrockAgentClient, BedrockApiConfig, BedrockApiError, InvokeAgentRequest,
};
use tracing::debug;

use crate::error::ChatError;
use crate::identity::IdentityProvider;
use crate::provider::{AgentConnector, InvocationEvent, InvocationParams, MemorySummary};

/// Connector backed by the Bedrock Agent Runtime HTTP API.
///
/// Fetches a fresh bearer credential from the identity provider before
/// every remote call.
pub struct BedrockConnector {
    client: BedrockAgentClient,
    identity: Arc<dyn IdentityProvider>,
}

impl BedrockConnector {
    pub fn new(
        config: BedrockApiConfig,
        identity: Arc<dyn IdentityProvider>,
    ) -> Result<Self, ChatError> {
        let client = BedrockAgentClient::new(config)?;
        Ok(Self { client, identity })
    }
}

/// True when the service is telling us the agent has no memory capability,
/// as opposed to a transient failure.
fn is_memory_unsupported(error: &BedrockApiError) -> bool {
    if error.is_validation_rejection() {
        return true;
    }
    error
        .to_string()
        .to_ascii_lowercase()
        .contains("memory is not enabled")
}

#[async_trait]
impl AgentConnector for BedrockConnector {
    async fn invoke(
        &self,
        params: InvocationParams,
        on_event: &mut (dyn FnMut(InvocationEvent) + Send),
    ) -> Result<(), ChatError> {
        let token = self.identity.bearer_token().await?;

        let mut request = InvokeAgentRequest::new(&params.input_text);
        if let Some(memory_id) = &params.memory_id {
            request = request.with_memory_id(memory_id);
        }
        if params.end_session {
            request = request.ending_session();
        }

        self.client
            .invoke_with_handler(&token, &params.session_id, &request, |event| match event {
                AgentStreamEvent::Chunk { text } => on_event(InvocationEvent::Chunk { text }),
                AgentStreamEvent::Trace { step } => on_event(InvocationEvent::Trace {
                    failure_reason: step.failure_reason,
                    rationale: step.rationale,
                }),
                AgentStreamEvent::Unknown { event_type, .. } => {
                    debug!(%event_type, "ignoring unrecognized stream event");
                }
                // invoke_with_handler surfaces exceptions as errors before
                // the handler sees them.
                AgentStreamEvent::Exception { .. } => {}
            })
            .await?;

        Ok(())
    }

    async fn fetch_memory(&self, memory_id: &str) -> Result<Vec<MemorySummary>, ChatError> {
        let token = self.identity.bearer_token().await?;

        let response = match self.client.get_agent_memory(&token, memory_id).await {
            Ok(response) => response,
            Err(error) if is_memory_unsupported(&error) => {
                return Err(ChatError::MemoryUnsupported);
            }
            Err(error) => return Err(ChatError::memory_transient(error.to_string())),
        };

        let summaries = response
            .memory_contents
            .into_iter()
            .filter_map(|record| record.session_summary)
            .map(|summary| MemorySummary {
                end_time: summary.end_or_expiry().map(str::to_owned),
                session_id: summary.session_id,
                summary_text: summary.summary_text,
                start_time: summary.session_start_time,
            })
            .collect();

        Ok(summaries)
    }
}
