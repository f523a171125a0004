//! Resource reclamation for service handles
//!
//! Handles are registered the moment a stage hands them over and released
//! in reverse acquisition order on every exit path. A release failure
//! becomes a cleanup event; it never replaces the run's outcome.

use drvup_agent::ServiceHandle;
use drvup_events::{AppEvent, CleanupEvent, EventEmitter};

/// Collects service handles as stages acquire them and releases them all
/// on the way out, whatever the run's outcome
#[derive(Default)]
pub struct Reclaimer {
    handles: Vec<Box<dyn ServiceHandle>>,
}

impl Reclaimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Track one handle
    pub fn register(&mut self, handle: Box<dyn ServiceHandle>) {
        self.handles.push(handle);
    }

    /// Track a batch of handles in acquisition order
    pub fn register_all(&mut self, handles: Vec<Box<dyn ServiceHandle>>) {
        self.handles.extend(handles);
    }

    /// Number of handles currently tracked
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Release every tracked handle, most recently acquired first.
    ///
    /// The queue drains as it goes, so calling this again is a no-op and
    /// no handle is ever asked to release twice from here. Failures are
    /// emitted as cleanup events and do not stop the remaining releases.
    pub async fn release_all(&mut self, emitter: &impl EventEmitter) {
        while let Some(mut handle) = self.handles.pop() {
            let kind = handle.kind();
            match handle.release().await {
                Ok(()) => {
                    emitter.emit(AppEvent::Cleanup(CleanupEvent::HandleReleased {
                        kind: kind.to_string(),
                    }));
                }
                Err(e) => {
                    emitter.emit(AppEvent::Cleanup(CleanupEvent::ReleaseFailed {
                        kind: kind.to_string(),
                        message: e.to_string(),
                    }));
                }
            }
        }
    }
}

impl Drop for Reclaimer {
    fn drop(&mut self) {
        // release() is async and cannot run here; a non-empty reclaimer at
        // drop means a caller skipped release_all
        for handle in &self.handles {
            if !handle.is_released() {
                tracing::debug!(kind = %handle.kind(), "service handle dropped without release");
            }
        }
    }
}
