use std::sync::Arc;

use serde_json::Value;

use crate::error::ChatStoreError;
use crate::keys::{messages_key, KEY_APP_CONFIG, KEY_LAST_SESSION_ID, KEY_MEMORY_ID};
use crate::kv::KeyValueStore;
use crate::schema::Turn;

/// Append-only per-session turn log over a [`KeyValueStore`].
///
/// Each session's turns live under one `messages_{session_id}` key as a
/// JSON array. Reads of an absent session yield an empty log, never an
/// error.
#[derive(Clone)]
pub struct MessageLog {
    store: Arc<dyn KeyValueStore>,
}

impl MessageLog {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn read(&self, session_id: &str) -> Result<Vec<Turn>, ChatStoreError> {
        let key = messages_key(session_id);
        let Some(value) = self.store.get(&key)? else {
            return Ok(Vec::new());
        };
        serde_json::from_value(value).map_err(|source| ChatStoreError::json_parse(key, source))
    }

    /// Append `turns` after the existing log, preserving both orders.
    pub fn append(&self, session_id: &str, turns: &[Turn]) -> Result<(), ChatStoreError> {
        if turns.is_empty() {
            return Ok(());
        }
        let mut log = self.read(session_id)?;
        log.extend(turns.iter().cloned());
        self.write(session_id, &log)
    }

    fn write(&self, session_id: &str, turns: &[Turn]) -> Result<(), ChatStoreError> {
        let key = messages_key(session_id);
        let value = serde_json::to_value(turns)
            .map_err(|source| ChatStoreError::json_serialize(&key, source))?;
        self.store.set(&key, &value)
    }
}

/// Small non-log keys: last active session id, stable memory id, and the
/// application configuration blob.
#[derive(Clone)]
pub struct ConfigStore {
    store: Arc<dyn KeyValueStore>,
}

impl ConfigStore {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn last_session_id(&self) -> Result<Option<String>, ChatStoreError> {
        self.get_string(KEY_LAST_SESSION_ID)
    }

    pub fn set_last_session_id(&self, session_id: &str) -> Result<(), ChatStoreError> {
        self.store
            .set(KEY_LAST_SESSION_ID, &Value::String(session_id.to_owned()))
    }

    pub fn memory_id(&self) -> Result<Option<String>, ChatStoreError> {
        self.get_string(KEY_MEMORY_ID)
    }

    pub fn set_memory_id(&self, memory_id: &str) -> Result<(), ChatStoreError> {
        self.store
            .set(KEY_MEMORY_ID, &Value::String(memory_id.to_owned()))
    }

    pub fn app_config(&self) -> Result<Option<Value>, ChatStoreError> {
        self.store.get(KEY_APP_CONFIG)
    }

    pub fn set_app_config(&self, config: &Value) -> Result<(), ChatStoreError> {
        self.store.set(KEY_APP_CONFIG, config)
    }

    /// Drop every stored key, including all session logs.
    pub fn clear_all(&self) -> Result<(), ChatStoreError> {
        self.store.clear()
    }

    fn get_string(&self, key: &str) -> Result<Option<String>, ChatStoreError> {
        match self.store.get(key)? {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|source| ChatStoreError::json_parse(key, source)),
            None => Ok(None),
        }
    }
}
