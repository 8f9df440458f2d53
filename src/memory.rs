use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use crate::error::ChatError;
use crate::provider::{AgentConnector, MemorySummary};

/// Read-only view of the long-term memory store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryState {
    pub summaries: Vec<MemorySummary>,
    /// False while the service reports the agent has no memory capability.
    /// Re-derived from the outcome of every refresh, so an explicit retry
    /// can clear it once memory is enabled.
    pub supported: bool,
    pub last_error: Option<String>,
}

impl Default for MemoryState {
    fn default() -> Self {
        Self {
            summaries: Vec::new(),
            supported: true,
            last_error: None,
        }
    }
}

/// Fetches and caches closed-session summaries. Never mutates the remote
/// store; refresh failures never escape as errors, they land in
/// [`MemoryState::last_error`].
pub struct MemoryService {
    connector: Arc<dyn AgentConnector>,
    state: Mutex<MemoryState>,
}

impl MemoryService {
    #[must_use]
    pub fn new(connector: Arc<dyn AgentConnector>) -> Self {
        Self {
            connector,
            state: Mutex::new(MemoryState::default()),
        }
    }

    #[must_use]
    pub fn state(&self) -> MemoryState {
        lock_unpoisoned(&self.state).clone()
    }

    /// Re-fetch summaries for `memory_id` and fold the outcome into the
    /// cached state. Returns the state after the attempt.
    ///
    /// Always issues the request, so a refresh after a capability-
    /// unsupported verdict re-derives `supported` from the fresh outcome.
    pub async fn refresh(&self, memory_id: &str) -> MemoryState {
        let outcome = self.connector.fetch_memory(memory_id).await;

        let mut state = lock_unpoisoned(&self.state);
        match outcome {
            Ok(summaries) => {
                debug!(count = summaries.len(), "memory summaries refreshed");
                state.summaries = summaries;
                state.supported = true;
                state.last_error = None;
            }
            Err(error @ ChatError::MemoryUnsupported) => {
                warn!("agent has no long-term memory capability");
                state.supported = false;
                state.last_error = Some(error.to_string());
            }
            Err(error) => {
                warn!(error = %error, "memory refresh failed; keeping cached summaries");
                state.last_error = Some(error.to_string());
            }
        }
        state.clone()
    }
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
