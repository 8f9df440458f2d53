use base64::{engine::general_purpose, Engine as _};
use serde_json::Value;

use crate::eventstream::EventStreamFrame;

pub const HEADER_MESSAGE_TYPE: &str = ":message-type";
pub const HEADER_EVENT_TYPE: &str = ":event-type";
pub const HEADER_EXCEPTION_TYPE: &str = ":exception-type";

/// One reasoning/tool step reported by the agent mid-stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceStep {
    /// Present when the agent explicitly signalled failure for this step.
    pub failure_reason: Option<String>,
    /// Orchestration rationale text, when the step carried one.
    pub rationale: Option<String>,
}

/// Stream event emitted after frame normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentStreamEvent {
    /// Content-plane event carrying part of the final response text.
    Chunk { text: String },
    /// Control-plane event reporting an intermediate agent step.
    Trace { step: TraceStep },
    /// Modeled service exception delivered in-stream.
    Exception { kind: String, message: String },
    /// Unknown event type retained for passthrough diagnostics.
    Unknown { event_type: String, payload: Value },
}

/// Normalize a decoded frame into a stream event.
///
/// Returns `None` for frames without a recognizable message type.
#[must_use]
pub fn decode_event(frame: &EventStreamFrame) -> Option<AgentStreamEvent> {
    let payload: Value = serde_json::from_slice(&frame.payload).unwrap_or(Value::Null);

    match frame.header_str(HEADER_MESSAGE_TYPE) {
        Some("event") => {
            let event_type = frame.header_str(HEADER_EVENT_TYPE)?;
            Some(map_event(event_type, payload))
        }
        Some("exception") => {
            let kind = frame
                .header_str(HEADER_EXCEPTION_TYPE)
                .unwrap_or("unknownException")
                .to_owned();
            let message = payload
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("agent stream exception")
                .to_owned();
            Some(AgentStreamEvent::Exception { kind, message })
        }
        _ => None,
    }
}

fn map_event(event_type: &str, payload: Value) -> AgentStreamEvent {
    match event_type {
        "chunk" => {
            let text = payload
                .get("bytes")
                .and_then(Value::as_str)
                .map(decode_chunk_bytes)
                .unwrap_or_default();
            AgentStreamEvent::Chunk { text }
        }
        "trace" => AgentStreamEvent::Trace {
            step: trace_step(&payload),
        },
        _ => AgentStreamEvent::Unknown {
            event_type: event_type.to_owned(),
            payload,
        },
    }
}

fn trace_step(payload: &Value) -> TraceStep {
    let trace = payload.get("trace");

    // The presence of a failure trace marks the step failed even when the
    // service omits the reason text.
    let failure_reason = trace
        .and_then(|trace| trace.get("failureTrace"))
        .map(|failure| {
            failure
                .get("failureReason")
                .and_then(Value::as_str)
                .unwrap_or("agent reported an unspecified failure")
                .to_owned()
        });

    let rationale = trace
        .and_then(|trace| trace.get("orchestrationTrace"))
        .and_then(|orchestration| orchestration.get("rationale"))
        .and_then(|rationale| rationale.get("text"))
        .and_then(Value::as_str)
        .map(ToString::to_string);

    TraceStep {
        failure_reason,
        rationale,
    }
}

fn decode_chunk_bytes(encoded: &str) -> String {
    general_purpose::STANDARD
        .decode(encoded)
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}
