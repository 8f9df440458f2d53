use serde::{Deserialize, Serialize};

/// Memory type query value; session summaries are the only supported kind.
pub const MEMORY_TYPE_SESSION_SUMMARY: &str = "SESSION_SUMMARY";

/// Response payload from the memory retrieval endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetAgentMemoryResponse {
    #[serde(default)]
    pub memory_contents: Vec<MemoryRecord>,
}

/// One remote memory record. Only records carrying a session summary are
/// meaningful to this client; other record kinds are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_summary: Option<SessionSummaryRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummaryRecord {
    pub session_id: String,
    pub summary_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_expiry_time: Option<String>,
}

impl SessionSummaryRecord {
    /// End timestamp, falling back to the expiry time when the service
    /// closed the session by expiration rather than explicit termination.
    #[must_use]
    pub fn end_or_expiry(&self) -> Option<&str> {
        self.session_end_time
            .as_deref()
            .or(self.session_expiry_time.as_deref())
    }
}
