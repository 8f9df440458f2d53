use std::sync::Arc;

use chat_store::{
    messages_key, sanitize_key_for_filename, ConfigStore, FileStore, KeyValueStore, MemoryStore,
    MessageLog, Sender, Turn,
};
use serde_json::json;

fn file_log(dir: &tempfile::TempDir) -> MessageLog {
    let store = FileStore::open(dir.path()).unwrap();
    MessageLog::new(Arc::new(store))
}

#[test]
fn read_of_unknown_session_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let log = file_log(&dir);

    assert_eq!(log.read("never-written").unwrap(), Vec::new());
}

#[test]
fn append_then_read_round_trips_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let log = file_log(&dir);

    let first = vec![Turn::user("hello"), Turn::system("thinking")];
    let second = vec![Turn::streaming_agent().finalized("hi there")];
    log.append("s1", &first).unwrap();
    log.append("s1", &second).unwrap();

    let read = log.read("s1").unwrap();
    assert_eq!(read.len(), 3);
    assert_eq!(read[0].text, "hello");
    assert_eq!(read[0].sender, Sender::User);
    assert_eq!(read[1].text, "thinking");
    assert_eq!(read[2].text, "hi there");
    assert_eq!(read[2].sender, Sender::Agent);
    assert!(!read[2].is_streaming);
}

#[test]
fn appends_to_different_sessions_do_not_mix() {
    let dir = tempfile::tempdir().unwrap();
    let log = file_log(&dir);

    log.append("s1", &[Turn::user("for s1")]).unwrap();
    log.append("s2", &[Turn::user("for s2")]).unwrap();

    assert_eq!(log.read("s1").unwrap().len(), 1);
    assert_eq!(log.read("s2").unwrap().len(), 1);
    assert_eq!(log.read("s2").unwrap()[0].text, "for s2");
}

#[test]
fn empty_append_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let log = file_log(&dir);

    log.append("s1", &[]).unwrap();

    assert_eq!(log.read("s1").unwrap(), Vec::new());
    assert!(!dir.path().join(format!("{}.json", messages_key("s1"))).exists());
}

#[test]
fn file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let log = file_log(&dir);
        log.append("s1", &[Turn::user("persisted")]).unwrap();
    }

    let log = file_log(&dir);
    assert_eq!(log.read("s1").unwrap()[0].text, "persisted");
}

#[test]
fn turn_flags_round_trip_through_serde() {
    let dir = tempfile::tempdir().unwrap();
    let log = file_log(&dir);

    let error = Turn::error("boom");
    let summary = Turn::summary_notice("session summarized");
    log.append("s1", &[error.clone(), summary.clone()]).unwrap();

    let read = log.read("s1").unwrap();
    assert!(read[0].is_error);
    assert_eq!(read[0].id, error.id);
    assert!(read[1].is_summary);
    assert_eq!(read[1].sender, Sender::System);
}

#[test]
fn config_store_round_trips_ids_and_blob() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let config = ConfigStore::new(Arc::clone(&store));

    assert_eq!(config.last_session_id().unwrap(), None);
    config.set_last_session_id("s1").unwrap();
    config.set_memory_id("memory-alice").unwrap();
    config.set_app_config(&json!({ "region": "us-west-2" })).unwrap();

    assert_eq!(config.last_session_id().unwrap().as_deref(), Some("s1"));
    assert_eq!(config.memory_id().unwrap().as_deref(), Some("memory-alice"));
    assert_eq!(
        config.app_config().unwrap(),
        Some(json!({ "region": "us-west-2" }))
    );
}

#[test]
fn clear_all_removes_logs_and_config() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let config = ConfigStore::new(Arc::clone(&store));
    let log = MessageLog::new(Arc::clone(&store));

    log.append("s1", &[Turn::user("hello")]).unwrap();
    config.set_last_session_id("s1").unwrap();

    config.clear_all().unwrap();

    assert_eq!(log.read("s1").unwrap(), Vec::new());
    assert_eq!(config.last_session_id().unwrap(), None);
}

#[test]
fn file_store_clear_only_touches_json_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("notes.txt"), "keep me").unwrap();
    let store = FileStore::open(dir.path()).unwrap();
    store.set("lastSessionId", &json!("s1")).unwrap();

    store.clear().unwrap();

    assert!(dir.path().join("notes.txt").exists());
    assert_eq!(store.get("lastSessionId").unwrap(), None);
}

#[test]
fn sanitized_keys_share_no_path_separators() {
    assert_eq!(sanitize_key_for_filename("messages_s:1/x"), "messages_s-1-x");
    assert_eq!(sanitize_key_for_filename("plain"), "plain");
}

#[test]
fn turn_ids_are_unique_and_prefixed() {
    let a = Turn::user("x");
    let b = Turn::user("x");
    assert_ne!(a.id, b.id);
    assert!(a.id.starts_with("user-"));
    assert!(Turn::error("x").id.starts_with("error-"));
}
