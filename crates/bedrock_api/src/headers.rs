use std::collections::BTreeMap;

use crate::config::BedrockApiConfig;
use crate::error::BedrockApiError;

pub const HEADER_ACCEPT: &str = "accept";
pub const HEADER_CONTENT_TYPE: &str = "content-type";
pub const HEADER_AUTHORIZATION: &str = "authorization";
pub const HEADER_USER_AGENT: &str = "user-agent";

/// Accept value for streaming invocations.
pub const ACCEPT_EVENT_STREAM: &str = "application/vnd.amazon.eventstream";
/// Accept value for plain JSON endpoints.
pub const ACCEPT_JSON: &str = "application/json";

/// Build a deterministic header map for agent runtime requests.
///
/// The bearer credential is supplied per call rather than stored in the
/// config so callers can re-fetch short-lived credentials before every
/// invocation.
pub fn build_headers(
    config: &BedrockApiConfig,
    bearer_token: &str,
    accept: &str,
) -> Result<BTreeMap<String, String>, BedrockApiError> {
    if bearer_token.trim().is_empty() {
        return Err(BedrockApiError::MissingCredential);
    }

    let mut headers = BTreeMap::new();
    headers.insert(
        HEADER_AUTHORIZATION.to_owned(),
        format!("Bearer {}", bearer_token.trim()),
    );
    headers.insert(HEADER_ACCEPT.to_owned(), accept.to_owned());
    headers.insert(HEADER_CONTENT_TYPE.to_owned(), ACCEPT_JSON.to_owned());

    let ua = config
        .user_agent
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(default_user_agent);
    headers.insert(HEADER_USER_AGENT.to_owned(), ua);

    for (key, value) in &config.extra_headers {
        headers.insert(key.trim().to_ascii_lowercase(), value.trim().to_owned());
    }

    Ok(headers)
}

fn default_user_agent() -> String {
    format!("agent-chat/{}", env!("CARGO_PKG_VERSION"))
}
