use serde::{Deserialize, Serialize};

/// Download stage events for update payload acquisition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DownloadEvent {
    /// Download batch handed to the service
    Started { total: usize },

    /// One selected item finished the download stage; `downloaded` is false
    /// when the payload did not arrive (the item still proceeds to install)
    ItemFinished { title: String, downloaded: bool },

    /// Download stage finished; `shortfall` counts items left without payloads
    Completed { downloaded: usize, shortfall: usize },
}
