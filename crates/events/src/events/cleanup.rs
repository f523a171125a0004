use serde::{Deserialize, Serialize};

/// Handle reclamation events emitted while tearing down service resources
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CleanupEvent {
    /// A service handle was released back to the service
    HandleReleased { kind: String },

    /// Releasing a handle failed; logged and never escalated
    ReleaseFailed { kind: String, message: String },
}
