//! Durable, storage-implementation-agnostic persistence for chat sessions.
//!
//! The engine talks to a string-keyed [`KeyValueStore`] of JSON documents;
//! [`FileStore`] and [`MemoryStore`] are the provided implementations.
//! [`MessageLog`] layers the session-scoped append-only turn log on top,
//! and [`ConfigStore`] owns the small non-log keys (last session id,
//! memory id, application config blob).

mod error;
mod keys;
mod kv;
mod log;
mod schema;

pub use error::ChatStoreError;
pub use keys::{messages_key, sanitize_key_for_filename, KEY_APP_CONFIG, KEY_LAST_SESSION_ID, KEY_MEMORY_ID};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use log::{ConfigStore, MessageLog};
pub use schema::{Sender, Turn};
