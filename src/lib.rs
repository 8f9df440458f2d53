//! Session engine for a streaming Bedrock agent chat.
//!
//! The engine brokers turn-based exchanges between a user and a remote
//! Bedrock agent: it owns the session lifecycle, folds the streamed
//! invocation events into transcript turns, persists the turn log, and
//! carries conversational context across sessions through the agent's
//! long-term memory store.
//!
//! Hosts wire four seams:
//!
//! - [`AgentConnector`] — the remote agent transport
//!   ([`providers::BedrockConnector`] is the production implementation)
//! - [`IdentityProvider`] — per-call bearer credential and username
//! - [`chat_store::KeyValueStore`] — durable storage
//! - [`ChatObserver`] — render-side notifications
//!
//! ```no_run
//! # async fn run() -> Result<(), agent_chat::ChatError> {
//! use std::sync::Arc;
//! use agent_chat::{
//!     AppConfig, EngineOptions, NullObserver, SessionEngine, StaticIdentity,
//!     providers::BedrockConnector,
//! };
//! use chat_store::{ConfigStore, FileStore, MessageLog};
//!
//! let store = Arc::new(FileStore::open("/var/lib/agent-chat")?);
//! let config_store = ConfigStore::new(store.clone());
//! let config = AppConfig::load(&config_store)?;
//! let identity = Arc::new(StaticIdentity::new("alice", "bearer-token"));
//! let connector = Arc::new(BedrockConnector::new(config.to_bedrock()?, identity.clone())?);
//!
//! let engine = SessionEngine::new(
//!     connector,
//!     identity,
//!     MessageLog::new(store.clone()),
//!     config_store,
//!     Arc::new(NullObserver),
//!     EngineOptions::default(),
//! );
//! engine.start_or_resume()?;
//! engine.submit("Hello!").await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod identity;
pub mod ingest;
pub mod memory;
pub mod notify;
pub mod provider;
pub mod providers;

pub use config::AppConfig;
pub use engine::{EngineOptions, Session, SessionEngine, SessionStatus, END_SESSION_INPUT};
pub use error::ChatError;
pub use identity::{derive_memory_id, IdentityProvider, StaticIdentity};
pub use ingest::{StreamIngestor, StreamProgress, TaskTrace};
pub use memory::{MemoryService, MemoryState};
pub use notify::{ChatObserver, NullObserver};
pub use provider::{AgentConnector, InvocationEvent, InvocationParams, MemorySummary};
