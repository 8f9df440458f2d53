use chat_store::Turn;

use crate::engine::SessionStatus;
use crate::ingest::{StreamProgress, TaskTrace};
use crate::memory::MemoryState;

/// Engine-to-host notification seam.
///
/// Every method has a no-op default so hosts implement only what they
/// render. Callbacks arrive on the engine's task; keep them cheap.
pub trait ChatObserver: Send + Sync {
    /// The visible transcript changed (turns added, purged, or finalized).
    fn turns_changed(&self, _session_id: &str, _turns: &[Turn]) {}

    /// The in-flight agent turn's accumulated text grew.
    fn streaming_text(&self, _text: &str) {}

    /// Per-chunk streaming telemetry.
    fn progress(&self, _progress: &StreamProgress) {}

    /// Reasoning-step telemetry from trace events.
    fn task_trace(&self, _trace: &TaskTrace) {}

    /// A new reasoning step or chunk arrived; hosts showing a transcript
    /// should scroll to the latest entry.
    fn scroll_to_latest(&self) {}

    fn status_changed(&self, _status: SessionStatus) {}

    fn memory_updated(&self, _state: &MemoryState) {}
}

/// Observer that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl ChatObserver for NullObserver {}
