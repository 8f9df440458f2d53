use std::collections::BTreeMap;
use std::time::Duration;

use crate::url::{default_endpoint, normalize_endpoint};

/// Transport configuration for agent runtime requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BedrockApiConfig {
    /// Region used to derive the default endpoint.
    pub region: String,
    /// Agent identifier addressed by every request.
    pub agent_id: String,
    /// Agent alias identifier addressed by every request.
    pub agent_alias_id: String,
    /// Optional endpoint override; the regional default applies when absent.
    pub endpoint: Option<String>,
    /// Optional `User-Agent` override.
    pub user_agent: Option<String>,
    /// Additional headers merged into request headers.
    pub extra_headers: BTreeMap<String, String>,
    /// Optional request timeout.
    pub timeout: Option<Duration>,
}

impl BedrockApiConfig {
    pub fn new(
        region: impl Into<String>,
        agent_id: impl Into<String>,
        agent_alias_id: impl Into<String>,
    ) -> Self {
        Self {
            region: region.into(),
            agent_id: agent_id.into(),
            agent_alias_id: agent_alias_id.into(),
            endpoint: None,
            user_agent: None,
            extra_headers: BTreeMap::new(),
            timeout: None,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn insert_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.insert(key.into(), value.into());
        self
    }

    /// Resolved base URL after endpoint normalization.
    #[must_use]
    pub fn base_url(&self) -> String {
        match self.endpoint.as_deref() {
            Some(endpoint) => normalize_endpoint(endpoint, &self.region),
            None => default_endpoint(&self.region),
        }
    }
}
