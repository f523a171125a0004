use serde::{Deserialize, Serialize};

/// Search stage events for update discovery
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SearchEvent {
    /// Search submitted to the service with the rendered filter expression
    Started { filter: String },

    /// Search finished with one or more applicable updates
    Completed { matched: usize },

    /// Search finished with nothing applicable to this host
    NoUpdates,
}
