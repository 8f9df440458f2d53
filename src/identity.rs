use async_trait::async_trait;

use crate::error::ChatError;

/// Source of the caller's identity and short-lived bearer credential.
///
/// The engine re-fetches the credential immediately before every remote
/// call and never caches it, so rotation happens transparently.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn bearer_token(&self) -> Result<String, ChatError>;
    fn username(&self) -> &str;
}

/// Derive the stable cross-session memory id for a user.
#[must_use]
pub fn derive_memory_id(username: &str) -> String {
    format!("memory-{username}")
}

/// Fixed-credential identity for tests and single-user deployments.
#[derive(Debug, Clone)]
pub struct StaticIdentity {
    username: String,
    token: String,
}

impl StaticIdentity {
    #[must_use]
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            token: token.into(),
        }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn bearer_token(&self) -> Result<String, ChatError> {
        if self.token.trim().is_empty() {
            return Err(ChatError::identity("no bearer credential configured"));
        }
        Ok(self.token.clone())
    }

    fn username(&self) -> &str {
        &self.username
    }
}
