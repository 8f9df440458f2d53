//! Application configuration: environment variables overlaid by the
//! persisted `appConfig` blob.

use std::env;

use bedrock_api::{BedrockApiConfig, DEFAULT_REGION};
use chat_store::ConfigStore;
use serde::{Deserialize, Serialize};

use crate::error::ChatError;

pub const ENV_REGION: &str = "AGENT_CHAT_REGION";
pub const ENV_AGENT_ID: &str = "AGENT_CHAT_AGENT_ID";
pub const ENV_AGENT_ALIAS_ID: &str = "AGENT_CHAT_AGENT_ALIAS_ID";
pub const ENV_AGENT_NAME: &str = "AGENT_CHAT_AGENT_NAME";
pub const ENV_ENDPOINT: &str = "AGENT_CHAT_ENDPOINT";

/// Display name used for the agent when none is configured.
pub const DEFAULT_AGENT_NAME: &str = "Agent";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub region: String,
    pub agent_id: String,
    pub agent_alias_id: String,
    /// Display name shown alongside agent turns.
    pub agent_name: String,
    /// Endpoint override; the regional default applies when absent.
    pub endpoint: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            agent_id: String::new(),
            agent_alias_id: String::new(),
            agent_name: DEFAULT_AGENT_NAME.to_string(),
            endpoint: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            region: env_string_opt(ENV_REGION).unwrap_or(defaults.region),
            agent_id: env_string_opt(ENV_AGENT_ID).unwrap_or_default(),
            agent_alias_id: env_string_opt(ENV_AGENT_ALIAS_ID).unwrap_or_default(),
            agent_name: env_string_opt(ENV_AGENT_NAME).unwrap_or(defaults.agent_name),
            endpoint: env_string_opt(ENV_ENDPOINT),
        }
    }

    /// Environment configuration overlaid by the persisted blob; stored
    /// values win field by field.
    pub fn load(store: &ConfigStore) -> Result<Self, ChatError> {
        let mut config = Self::from_env();
        if let Some(blob) = store.app_config()? {
            let stored: StoredConfig = serde_json::from_value(blob)
                .map_err(|error| ChatError::invalid_config(error.to_string()))?;
            config.overlay(stored);
        }
        Ok(config)
    }

    pub fn save(&self, store: &ConfigStore) -> Result<(), ChatError> {
        let blob = serde_json::to_value(self)
            .map_err(|error| ChatError::invalid_config(error.to_string()))?;
        store.set_app_config(&blob)?;
        Ok(())
    }

    fn overlay(&mut self, stored: StoredConfig) {
        if let Some(region) = stored.region {
            self.region = region;
        }
        if let Some(agent_id) = stored.agent_id {
            self.agent_id = agent_id;
        }
        if let Some(agent_alias_id) = stored.agent_alias_id {
            self.agent_alias_id = agent_alias_id;
        }
        if let Some(agent_name) = stored.agent_name {
            self.agent_name = agent_name;
        }
        if let Some(endpoint) = stored.endpoint {
            self.endpoint = Some(endpoint);
        }
    }

    pub fn validate(&self) -> Result<(), ChatError> {
        if self.agent_id.trim().is_empty() {
            return Err(ChatError::invalid_config("agent id is not set"));
        }
        if self.agent_alias_id.trim().is_empty() {
            return Err(ChatError::invalid_config("agent alias id is not set"));
        }
        Ok(())
    }

    /// Transport configuration for the Bedrock client.
    pub fn to_bedrock(&self) -> Result<BedrockApiConfig, ChatError> {
        self.validate()?;
        let mut config = BedrockApiConfig::new(&self.region, &self.agent_id, &self.agent_alias_id);
        if let Some(endpoint) = &self.endpoint {
            config = config.with_endpoint(endpoint);
        }
        Ok(config)
    }
}

/// Stored-blob shape: every field optional so partial blobs overlay
/// cleanly over environment values.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct StoredConfig {
    region: Option<String>,
    agent_id: Option<String>,
    agent_alias_id: Option<String>,
    agent_name: Option<String>,
    endpoint: Option<String>,
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chat_store::{ConfigStore, MemoryStore};
    use serde_json::json;

    use super::AppConfig;

    fn store() -> ConfigStore {
        ConfigStore::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn stored_blob_overlays_defaults() {
        let store = store();
        store
            .set_app_config(&json!({
                "agentId": "AGENT1",
                "agentAliasId": "ALIAS1",
                "agentName": "Helper",
            }))
            .unwrap();

        let config = AppConfig::load(&store).unwrap();
        assert_eq!(config.agent_id, "AGENT1");
        assert_eq!(config.agent_alias_id, "ALIAS1");
        assert_eq!(config.agent_name, "Helper");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_blob_keeps_unmentioned_fields() {
        let store = store();
        store.set_app_config(&json!({ "agentId": "AGENT1" })).unwrap();

        let config = AppConfig::load(&store).unwrap();
        assert_eq!(config.agent_id, "AGENT1");
        assert_eq!(config.agent_name, super::DEFAULT_AGENT_NAME);
    }

    #[test]
    fn validate_rejects_missing_agent_ids() {
        let config = AppConfig::default();
        assert!(config.validate().is_err());
        assert!(config.to_bedrock().is_err());
    }

    #[test]
    fn save_then_load_round_trips() {
        let store = store();
        let mut config = AppConfig::default();
        config.agent_id = "AGENT1".to_string();
        config.agent_alias_id = "ALIAS1".to_string();
        config.endpoint = Some("https://example.test".to_string());
        config.save(&store).unwrap();

        assert_eq!(AppConfig::load(&store).unwrap(), config);
    }
}
