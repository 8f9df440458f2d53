//! Concrete [`crate::provider::AgentConnector`] implementations.

pub mod bedrock;

pub use bedrock::BedrockConnector;
