//! Transport-only Bedrock Agent Runtime client primitives.
//!
//! This crate owns request building, event-stream decoding, and error
//! normalization for the agent runtime endpoints only. It intentionally
//! contains no credential-acquisition code and no session or UI coupling;
//! callers supply a short-lived bearer credential per request.
//!
//! Streaming responses arrive as `application/vnd.amazon.eventstream`
//! frames, decoded incrementally by [`EventStreamParser`] and normalized
//! into [`AgentStreamEvent`] values for callers to fold.

pub mod client;
pub mod config;
pub mod error;
pub mod events;
pub mod eventstream;
pub mod headers;
pub mod memory;
pub mod payload;
pub mod retry;
pub mod url;

pub use client::BedrockAgentClient;
pub use config::BedrockApiConfig;
pub use error::BedrockApiError;
pub use events::{AgentStreamEvent, TraceStep};
pub use eventstream::{EventStreamFrame, EventStreamParser};
pub use memory::{GetAgentMemoryResponse, MemoryRecord, SessionSummaryRecord};
pub use payload::{InvokeAgentRequest, StreamingConfigurations};
pub use url::{normalize_endpoint, DEFAULT_REGION};
