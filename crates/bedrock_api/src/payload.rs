use serde::{Deserialize, Serialize};

/// Guardrail application interval sent with every streaming invocation.
pub const GUARDRAIL_INTERVAL: u32 = 300;

/// Canonical request payload shape for the agent invocation endpoint.
///
/// The session id is carried in the request path, not the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvokeAgentRequest {
    pub input_text: String,
    /// Default: true. Trace events drive progress telemetry.
    #[serde(default = "default_true")]
    pub enable_trace: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_id: Option<String>,
    /// Default: false. Set for session-termination calls only.
    #[serde(default)]
    pub end_session: bool,
    #[serde(default)]
    pub streaming_configurations: StreamingConfigurations,
}

fn default_true() -> bool {
    true
}

impl InvokeAgentRequest {
    pub fn new(input_text: impl Into<String>) -> Self {
        Self {
            input_text: input_text.into(),
            enable_trace: true,
            memory_id: None,
            end_session: false,
            streaming_configurations: StreamingConfigurations::default(),
        }
    }

    pub fn with_memory_id(mut self, memory_id: impl Into<String>) -> Self {
        self.memory_id = Some(memory_id.into());
        self
    }

    pub fn ending_session(mut self) -> Self {
        self.end_session = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamingConfigurations {
    pub stream_final_response: bool,
    pub apply_guardrail_interval: u32,
}

impl Default for StreamingConfigurations {
    fn default() -> Self {
        Self {
            stream_final_response: true,
            apply_guardrail_interval: GUARDRAIL_INTERVAL,
        }
    }
}
