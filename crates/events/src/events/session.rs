use serde::{Deserialize, Serialize};

/// Update service session lifecycle events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionEvent {
    /// Connection to the update service is being established
    Opening { backend: String },

    /// Session is live and ready to serve searches
    Opened { backend: String },
}
