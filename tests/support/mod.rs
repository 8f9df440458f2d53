#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use agent_chat::{
    AgentConnector, ChatError, ChatObserver, EngineOptions, InvocationEvent, InvocationParams,
    MemoryState, MemorySummary, SessionEngine, SessionStatus, StaticIdentity, StreamProgress,
    TaskTrace,
};
use async_trait::async_trait;
use chat_store::{ConfigStore, KeyValueStore, MemoryStore, MessageLog, Turn};

/// One scripted invocation: deliver `events`, then return `result`.
pub struct Script {
    pub events: Vec<InvocationEvent>,
    pub result: Result<(), ChatError>,
}

impl Script {
    pub fn events(events: Vec<InvocationEvent>) -> Self {
        Self {
            events,
            result: Ok(()),
        }
    }

    pub fn failure(error: ChatError) -> Self {
        Self {
            events: Vec::new(),
            result: Err(error),
        }
    }

    pub fn chunks(texts: &[&str]) -> Self {
        Self::events(
            texts
                .iter()
                .map(|text| InvocationEvent::Chunk {
                    text: (*text).to_string(),
                })
                .collect(),
        )
    }
}

/// Scripted connector recording every invocation and memory fetch.
#[derive(Default)]
pub struct FakeConnector {
    scripts: Mutex<VecDeque<Script>>,
    memory_results: Mutex<VecDeque<Result<Vec<MemorySummary>, ChatError>>>,
    pub invocations: Mutex<Vec<InvocationParams>>,
    pub memory_fetches: Mutex<Vec<String>>,
}

impl FakeConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_script(&self, script: Script) {
        self.scripts.lock().unwrap().push_back(script);
    }

    pub fn push_memory_result(&self, result: Result<Vec<MemorySummary>, ChatError>) {
        self.memory_results.lock().unwrap().push_back(result);
    }

    pub fn recorded_invocations(&self) -> Vec<InvocationParams> {
        self.invocations.lock().unwrap().clone()
    }
}

#[async_trait]
impl AgentConnector for FakeConnector {
    async fn invoke(
        &self,
        params: InvocationParams,
        on_event: &mut (dyn FnMut(InvocationEvent) + Send),
    ) -> Result<(), ChatError> {
        self.invocations.lock().unwrap().push(params);
        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Script::chunks(&["ok"]));
        for event in script.events {
            on_event(event);
        }
        script.result
    }

    async fn fetch_memory(&self, memory_id: &str) -> Result<Vec<MemorySummary>, ChatError> {
        self.memory_fetches.lock().unwrap().push(memory_id.to_string());
        self.memory_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Observer that records every notification for later assertions.
#[derive(Default)]
pub struct RecordingObserver {
    pub streaming_texts: Mutex<Vec<String>>,
    pub progress_snapshots: Mutex<Vec<StreamProgress>>,
    pub task_traces: Mutex<Vec<TaskTrace>>,
    pub statuses: Mutex<Vec<SessionStatus>>,
    pub transcripts: Mutex<Vec<(String, Vec<Turn>)>>,
    pub memory_states: Mutex<Vec<MemoryState>>,
    pub scrolls: Mutex<u64>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn streaming_texts(&self) -> Vec<String> {
        self.streaming_texts.lock().unwrap().clone()
    }

    pub fn last_transcript(&self) -> Vec<Turn> {
        self.transcripts
            .lock()
            .unwrap()
            .last()
            .map(|(_, turns)| turns.clone())
            .unwrap_or_default()
    }
}

impl ChatObserver for RecordingObserver {
    fn turns_changed(&self, session_id: &str, turns: &[Turn]) {
        self.transcripts
            .lock()
            .unwrap()
            .push((session_id.to_string(), turns.to_vec()));
    }

    fn streaming_text(&self, text: &str) {
        self.streaming_texts.lock().unwrap().push(text.to_string());
    }

    fn progress(&self, progress: &StreamProgress) {
        self.progress_snapshots.lock().unwrap().push(*progress);
    }

    fn task_trace(&self, trace: &TaskTrace) {
        self.task_traces.lock().unwrap().push(trace.clone());
    }

    fn scroll_to_latest(&self) {
        *self.scrolls.lock().unwrap() += 1;
    }

    fn status_changed(&self, status: SessionStatus) {
        self.statuses.lock().unwrap().push(status);
    }

    fn memory_updated(&self, state: &MemoryState) {
        self.memory_states.lock().unwrap().push(state.clone());
    }
}

pub struct Harness {
    pub connector: Arc<FakeConnector>,
    pub observer: Arc<RecordingObserver>,
    pub store: Arc<MemoryStore>,
    pub log: MessageLog,
    pub config: ConfigStore,
    pub engine: SessionEngine,
}

/// Engine wired to in-memory fakes with a zero settle delay.
pub fn harness() -> Harness {
    let connector = Arc::new(FakeConnector::new());
    let observer = Arc::new(RecordingObserver::new());
    let store = Arc::new(MemoryStore::new());
    let kv: Arc<dyn KeyValueStore> = store.clone();
    let log = MessageLog::new(kv.clone());
    let config = ConfigStore::new(kv);

    let options = EngineOptions {
        summary_settle_delay: std::time::Duration::ZERO,
        ..EngineOptions::default()
    };
    let engine = SessionEngine::new(
        connector.clone(),
        Arc::new(StaticIdentity::new("alice", "token")),
        log.clone(),
        config.clone(),
        observer.clone(),
        options,
    );

    Harness {
        connector,
        observer,
        store,
        log,
        config,
        engine,
    }
}

pub fn summary(session_id: &str, text: &str) -> MemorySummary {
    MemorySummary {
        session_id: session_id.to_string(),
        summary_text: text.to_string(),
        start_time: Some("2026-08-01T00:00:00Z".to_string()),
        end_time: Some("2026-08-01T01:00:00Z".to_string()),
    }
}
