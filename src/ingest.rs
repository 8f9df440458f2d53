use std::time::Instant;

use tracing::debug;

use crate::error::ChatError;
use crate::notify::ChatObserver;
use crate::provider::InvocationEvent;

/// Per-invocation streaming telemetry. Reset for every invocation; both
/// counters only ever grow while a stream is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamProgress {
    pub chunk_count: u64,
    pub elapsed_ms: u64,
    pub started_at: Instant,
}

/// Reasoning-step telemetry folded from trace events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskTrace {
    pub completed_count: u64,
    pub latest_rationale: Option<String>,
}

/// Folds a connector's event stream into the final response text.
///
/// Chunks append to an accumulator; on every chunk of a non-termination
/// call the full accumulator is pushed to the observer, so hosts always
/// render a prefix of the final text. A failure trace poisons the fold:
/// later events are ignored and [`finish`](Self::finish) reports the
/// failure.
pub struct StreamIngestor<'a> {
    observer: &'a dyn ChatObserver,
    end_session: bool,
    text: String,
    progress: StreamProgress,
    trace: TaskTrace,
    failure: Option<String>,
}

impl<'a> StreamIngestor<'a> {
    #[must_use]
    pub fn new(observer: &'a dyn ChatObserver, end_session: bool) -> Self {
        Self {
            observer,
            end_session,
            text: String::new(),
            progress: StreamProgress {
                chunk_count: 0,
                elapsed_ms: 0,
                started_at: Instant::now(),
            },
            trace: TaskTrace::default(),
            failure: None,
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn progress(&self) -> &StreamProgress {
        &self.progress
    }

    #[must_use]
    pub fn trace(&self) -> &TaskTrace {
        &self.trace
    }

    pub fn observe(&mut self, event: InvocationEvent) {
        if self.failure.is_some() {
            return;
        }

        match event {
            InvocationEvent::Trace {
                failure_reason: Some(reason),
                ..
            } => {
                debug!(%reason, "agent reported failure mid-stream");
                // The failed step still counts as a completed trace step.
                self.trace.completed_count += 1;
                self.failure = Some(reason);
            }
            InvocationEvent::Trace { rationale, .. } => {
                self.trace.completed_count += 1;
                if let Some(rationale) = rationale {
                    self.trace.latest_rationale = Some(rationale);
                }
                self.observer.task_trace(&self.trace);
                self.observer.scroll_to_latest();
            }
            InvocationEvent::Chunk { text } => {
                self.text.push_str(&text);
                self.progress.chunk_count += 1;
                self.progress.elapsed_ms =
                    u64::try_from(self.progress.started_at.elapsed().as_millis())
                        .unwrap_or(u64::MAX);
                if !self.end_session {
                    self.observer.streaming_text(&self.text);
                    self.observer.progress(&self.progress);
                    self.observer.scroll_to_latest();
                }
            }
        }
    }

    /// Resolve the fold: the accumulated text, or the failure that should
    /// replace it.
    pub fn finish(self) -> Result<String, ChatError> {
        if let Some(reason) = self.failure {
            return Err(ChatError::AgentFailure { reason });
        }
        if self.progress.chunk_count == 0 && !self.end_session {
            return Err(ChatError::EmptyCompletion);
        }
        Ok(self.text)
    }
}
