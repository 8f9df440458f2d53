/// Key holding the id of the most recently active session.
pub const KEY_LAST_SESSION_ID: &str = "lastSessionId";
/// Key holding the stable cross-session memory id.
pub const KEY_MEMORY_ID: &str = "memoryId";
/// Key holding the application configuration blob.
pub const KEY_APP_CONFIG: &str = "appConfig";

/// Key holding the turn list for one session.
#[must_use]
pub fn messages_key(session_id: &str) -> String {
    format!("messages_{session_id}")
}

/// Map an arbitrary store key to a safe file name component.
#[must_use]
pub fn sanitize_key_for_filename(key: &str) -> String {
    key.chars()
        .map(|c| match c {
            ':' | '/' | '\\' | ' ' => '-',
            _ => c,
        })
        .collect()
}
