use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chat_store::{ConfigStore, MessageLog, Turn};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::DEFAULT_AGENT_NAME;
use crate::error::ChatError;
use crate::identity::{derive_memory_id, IdentityProvider};
use crate::ingest::StreamIngestor;
use crate::memory::{MemoryService, MemoryState};
use crate::notify::ChatObserver;
use crate::provider::{AgentConnector, InvocationParams};

/// Final instruction sent with a termination call so the service produces
/// a conversation summary before closing the session.
pub const END_SESSION_INPUT: &str = "Please summarize our conversation.";

const NOTICE_ENDING: &str = "Ending session and generating a conversation summary...";
const NOTICE_SUMMARIZED: &str = "Conversation has been summarized and stored in memory.";
const NOTICE_BUSY: &str = "Please wait for the current request to finish.";

/// One conversation with the agent. `session_id` is stable until the
/// session is explicitly regenerated; `memory_id` survives regeneration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub session_id: String,
    pub memory_id: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    /// A user turn is in flight.
    Sending,
    /// A termination call is in flight.
    Ending,
}

#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Pause between termination success and the follow-up memory refresh,
    /// giving the service time to write the summary.
    pub summary_settle_delay: Duration,
    /// Display name for the agent, used in agent-facing notices.
    pub agent_name: String,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            summary_settle_delay: Duration::from_secs(3),
            agent_name: DEFAULT_AGENT_NAME.to_string(),
        }
    }
}

struct EngineState {
    session: Option<Session>,
    status: SessionStatus,
    /// Live transcript, including temporary and streaming turns that are
    /// never persisted as-is.
    transcript: Vec<Turn>,
}

/// Session lifecycle and invocation state machine.
///
/// Exactly one request is in flight at a time: `submit` and `end_session`
/// reject with [`ChatError::Busy`] while the status is non-idle. Every
/// invocation failure becomes a visible system error turn; callers only
/// see errors for local problems (storage, configuration, misuse).
pub struct SessionEngine {
    connector: Arc<dyn AgentConnector>,
    identity: Arc<dyn IdentityProvider>,
    log: MessageLog,
    config: ConfigStore,
    observer: Arc<dyn ChatObserver>,
    memory: MemoryService,
    options: EngineOptions,
    state: Mutex<EngineState>,
}

impl SessionEngine {
    pub fn new(
        connector: Arc<dyn AgentConnector>,
        identity: Arc<dyn IdentityProvider>,
        log: MessageLog,
        config: ConfigStore,
        observer: Arc<dyn ChatObserver>,
        options: EngineOptions,
    ) -> Self {
        let memory = MemoryService::new(Arc::clone(&connector));
        Self {
            connector,
            identity,
            log,
            config,
            observer,
            memory,
            options,
            state: Mutex::new(EngineState {
                session: None,
                status: SessionStatus::Idle,
                transcript: Vec::new(),
            }),
        }
    }

    #[must_use]
    pub fn memory(&self) -> &MemoryService {
        &self.memory
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.lock_state().status
    }

    #[must_use]
    pub fn session(&self) -> Option<Session> {
        self.lock_state().session.clone()
    }

    /// Snapshot of the live transcript, temporary turns included.
    #[must_use]
    pub fn transcript(&self) -> Vec<Turn> {
        self.lock_state().transcript.clone()
    }

    /// Resume the persisted session if one exists, otherwise create a
    /// fresh one. Idempotent once a session is active.
    pub fn start_or_resume(&self) -> Result<Session, ChatError> {
        {
            let state = self.lock_state();
            if let Some(session) = &state.session {
                return Ok(session.clone());
            }
        }

        let memory_id = self.resolve_memory_id()?;
        if let Some(session_id) = self.config.last_session_id()? {
            let transcript = self.log.read(&session_id)?;
            info!(%session_id, turns = transcript.len(), "resuming session");
            let session = Session {
                session_id,
                memory_id,
                created_at: now_rfc3339(),
            };
            let mut state = self.lock_state();
            state.session = Some(session.clone());
            state.transcript = transcript;
            let turns = state.transcript.clone();
            drop(state);
            self.observer.turns_changed(&session.session_id, &turns);
            return Ok(session);
        }

        self.new_session()
    }

    /// Start a fresh session. The memory id is retained, so long-term
    /// context survives regeneration. Allowed while a request is in
    /// flight; the in-flight append still targets the old session.
    pub fn new_session(&self) -> Result<Session, ChatError> {
        let memory_id = self.resolve_memory_id()?;
        let session = Session {
            session_id: Uuid::new_v4().to_string(),
            memory_id,
            created_at: now_rfc3339(),
        };
        self.config.set_last_session_id(&session.session_id)?;
        info!(session_id = %session.session_id, "created new session");

        let mut state = self.lock_state();
        state.session = Some(session.clone());
        state.transcript.clear();
        // Announce the fresh session with a notice that the next user
        // action purges.
        state.transcript.push(Turn::temporary_system(format!(
            "Starting a new conversation with {}. Previous context will be accessible through memory.",
            self.options.agent_name
        )));
        let turns = state.transcript.clone();
        drop(state);
        self.observer.turns_changed(&session.session_id, &turns);
        Ok(session)
    }

    /// Send one user turn and stream the agent's response.
    ///
    /// The durable append targets the session that was active when the
    /// call started, even if the session is regenerated mid-flight.
    pub async fn submit(&self, text: &str) -> Result<(), ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(());
        }

        let session = self.start_or_resume()?;

        let (user_turn, agent_turn) = {
            let mut state = self.lock_state();
            if state.status != SessionStatus::Idle {
                drop(state);
                self.push_busy_notice(&session.session_id);
                return Err(ChatError::Busy);
            }
            state.status = SessionStatus::Sending;
            state.transcript.retain(|turn| !turn.temporary);

            let user_turn = Turn::user(text);
            let agent_turn = Turn::streaming_agent();
            state.transcript.push(user_turn.clone());
            state.transcript.push(agent_turn.clone());
            let turns = state.transcript.clone();
            drop(state);

            self.observer.status_changed(SessionStatus::Sending);
            self.observer.turns_changed(&session.session_id, &turns);
            (user_turn, agent_turn)
        };

        let params = InvocationParams {
            session_id: session.session_id.clone(),
            memory_id: Some(session.memory_id.clone()),
            input_text: text.to_string(),
            end_session: false,
        };

        let mut ingestor = StreamIngestor::new(self.observer.as_ref(), false);
        let invoked = self
            .connector
            .invoke(params, &mut |event| ingestor.observe(event))
            .await;
        let partial = ingestor.text().to_owned();
        let outcome = match invoked {
            Ok(()) => ingestor.finish(),
            Err(error) => Err(error),
        };

        let append = match outcome {
            Ok(completion) => {
                debug!(
                    session_id = %session.session_id,
                    chars = completion.len(),
                    "agent response complete"
                );
                let final_turn = agent_turn.finalized(completion);
                self.replace_live_turn(&session.session_id, &final_turn);
                vec![user_turn, final_turn]
            }
            Err(error) => {
                warn!(session_id = %session.session_id, error = %error, "invocation failed");
                // Partial streamed text stays visible ahead of the error,
                // but only the user turn and the error are persisted.
                self.replace_live_turn(&session.session_id, &agent_turn.finalized(partial));
                let error_turn = Turn::error(format!(
                    "An error occurred while processing your request. Error: {error}"
                ));
                self.push_live_turn(&session.session_id, error_turn.clone());
                vec![user_turn, error_turn]
            }
        };

        self.set_idle();
        self.log.append(&session.session_id, &append)?;
        Ok(())
    }

    /// Close the active session: ask the service to summarize it into
    /// long-term memory, then start a fresh session. Termination calls
    /// never append to the durable log. On failure the session is kept so
    /// the user can retry.
    pub async fn end_session(&self) -> Result<(), ChatError> {
        let session = self.start_or_resume()?;

        {
            let mut state = self.lock_state();
            if state.status != SessionStatus::Idle {
                drop(state);
                self.push_busy_notice(&session.session_id);
                return Err(ChatError::Busy);
            }
            state.status = SessionStatus::Ending;
        }
        self.observer.status_changed(SessionStatus::Ending);
        self.push_live_turn(&session.session_id, Turn::temporary_system(NOTICE_ENDING));

        let params = InvocationParams {
            session_id: session.session_id.clone(),
            memory_id: Some(session.memory_id.clone()),
            input_text: END_SESSION_INPUT.to_string(),
            end_session: true,
        };

        let mut ingestor = StreamIngestor::new(self.observer.as_ref(), true);
        let outcome = match self
            .connector
            .invoke(params, &mut |event| ingestor.observe(event))
            .await
        {
            Ok(()) => ingestor.finish().map(|_| ()),
            Err(error) => Err(error),
        };

        match outcome {
            Ok(()) => {
                info!(session_id = %session.session_id, "session summarized and closed");
                self.set_idle();
                let next = self.new_session()?;
                self.push_live_turn(&next.session_id, Turn::summary_notice(NOTICE_SUMMARIZED));

                if !self.options.summary_settle_delay.is_zero() {
                    tokio::time::sleep(self.options.summary_settle_delay).await;
                }
                self.refresh_memory().await?;
                Ok(())
            }
            Err(error) => {
                warn!(session_id = %session.session_id, error = %error, "session termination failed");
                self.purge_temporary(&session.session_id);
                self.push_live_turn(
                    &session.session_id,
                    Turn::error(format!("Error ending session: {error}")),
                );
                self.set_idle();
                Ok(())
            }
        }
    }

    /// Re-fetch memory summaries and notify the observer with the result.
    pub async fn refresh_memory(&self) -> Result<MemoryState, ChatError> {
        let memory_id = self.resolve_memory_id()?;
        let state = self.memory.refresh(&memory_id).await;
        self.observer.memory_updated(&state);
        Ok(state)
    }

    /// Wipe all persisted state and start over with a fresh session.
    pub fn clear_all(&self) -> Result<Session, ChatError> {
        self.config.clear_all()?;
        {
            let mut state = self.lock_state();
            state.session = None;
            state.transcript.clear();
        }
        self.new_session()
    }

    fn resolve_memory_id(&self) -> Result<String, ChatError> {
        if let Some(memory_id) = self.config.memory_id()? {
            return Ok(memory_id);
        }
        let memory_id = derive_memory_id(self.identity.username());
        self.config.set_memory_id(&memory_id)?;
        Ok(memory_id)
    }

    fn set_idle(&self) {
        self.lock_state().status = SessionStatus::Idle;
        self.observer.status_changed(SessionStatus::Idle);
    }

    /// Append a live-only turn; no durable write.
    fn push_live_turn(&self, session_id: &str, turn: Turn) {
        let mut state = self.lock_state();
        if !state
            .session
            .as_ref()
            .is_some_and(|session| session.session_id == session_id)
        {
            return;
        }
        state.transcript.push(turn);
        let turns = state.transcript.clone();
        drop(state);
        self.observer.turns_changed(session_id, &turns);
        self.observer.scroll_to_latest();
    }

    /// Replace the live copy of `turn` (matched by id) with its final form.
    fn replace_live_turn(&self, session_id: &str, turn: &Turn) {
        let mut state = self.lock_state();
        if !state
            .session
            .as_ref()
            .is_some_and(|session| session.session_id == session_id)
        {
            return;
        }
        if let Some(live) = state.transcript.iter_mut().find(|live| live.id == turn.id) {
            *live = turn.clone();
        }
        let turns = state.transcript.clone();
        drop(state);
        self.observer.turns_changed(session_id, &turns);
    }

    fn purge_temporary(&self, session_id: &str) {
        let mut state = self.lock_state();
        state.transcript.retain(|turn| !turn.temporary);
        let turns = state.transcript.clone();
        drop(state);
        self.observer.turns_changed(session_id, &turns);
    }

    fn push_busy_notice(&self, session_id: &str) {
        self.push_live_turn(session_id, Turn::temporary_system(NOTICE_BUSY));
    }

    fn lock_state(&self) -> MutexGuard<'_, EngineState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}
