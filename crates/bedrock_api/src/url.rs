/// Default region used when callers leave the region blank.
pub const DEFAULT_REGION: &str = "us-west-2";

/// Default agent runtime endpoint for a region.
#[must_use]
pub fn default_endpoint(region: &str) -> String {
    let region = non_blank(region).unwrap_or(DEFAULT_REGION);
    format!("https://bedrock-agent-runtime.{region}.amazonaws.com")
}

/// Normalize an endpoint override to a bare base URL.
///
/// Normalization rules:
/// 1) blank input falls back to the regional default endpoint
/// 2) trailing slashes are stripped
/// 3) a bare host gains an `https://` scheme
#[must_use]
pub fn normalize_endpoint(input: &str, region: &str) -> String {
    let Some(base) = non_blank(input) else {
        return default_endpoint(region);
    };

    let trimmed = base.trim_end_matches('/');
    if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

/// Request path for a streaming agent invocation.
#[must_use]
pub fn invoke_path(agent_id: &str, agent_alias_id: &str, session_id: &str) -> String {
    format!("/agents/{agent_id}/agentAliases/{agent_alias_id}/sessions/{session_id}/text")
}

/// Request path for a memory retrieval.
#[must_use]
pub fn memory_path(agent_id: &str, agent_alias_id: &str, memory_id: &str) -> String {
    format!("/agents/{agent_id}/agentAliases/{agent_alias_id}/memories/{memory_id}")
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}
