use serde::{Deserialize, Serialize};

use crate::EventSource;

// Declare all domain modules
pub mod cleanup;
pub mod download;
pub mod general;
pub mod install;
pub mod search;
pub mod session;

// Re-export all domain events
pub use cleanup::*;
pub use download::*;
pub use general::*;
pub use install::*;
pub use search::*;
pub use session::*;

/// Top-level application event enum that aggregates all domain-specific events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event", rename_all = "snake_case")]
pub enum AppEvent {
    /// General utility events (warnings, errors, operations)
    General(GeneralEvent),

    /// Update service session lifecycle
    Session(SessionEvent),

    /// Search stage events
    Search(SearchEvent),

    /// Download stage events
    Download(DownloadEvent),

    /// Install stage events
    Install(InstallEvent),

    /// Handle reclamation events
    Cleanup(CleanupEvent),
}

impl AppEvent {
    /// Identify the source domain for this event (used for metadata/logging).
    #[must_use]
    pub fn event_source(&self) -> EventSource {
        match self {
            Self::General(_) => EventSource::GENERAL,
            Self::Session(_) => EventSource::SESSION,
            Self::Search(_) => EventSource::SEARCH,
            Self::Download(_) => EventSource::DOWNLOAD,
            Self::Install(_) => EventSource::INSTALL,
            Self::Cleanup(_) => EventSource::CLEANUP,
        }
    }

    /// Determine the appropriate tracing log level for this event
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        use tracing::Level;

        match self {
            // Error-level events
            Self::General(
                GeneralEvent::Error { .. } | GeneralEvent::OperationFailed { .. },
            ) => Level::ERROR,

            // Warning-level events; release failures and download shortfalls
            // are surfaced but never escalate past the event stream
            Self::General(GeneralEvent::Warning { .. })
            | Self::Cleanup(CleanupEvent::ReleaseFailed { .. })
            | Self::Download(DownloadEvent::ItemFinished {
                downloaded: false, ..
            }) => Level::WARN,

            // Debug-level events (internal state)
            Self::General(GeneralEvent::DebugLog { .. })
            | Self::Cleanup(CleanupEvent::HandleReleased { .. }) => Level::DEBUG,

            // Default to INFO for most events
            _ => Level::INFO,
        }
    }

    /// Get the log target for this event (for structured logging)
    #[must_use]
    pub fn log_target(&self) -> &'static str {
        match self {
            Self::General(_) => "drvup::events::general",
            Self::Session(_) => "drvup::events::session",
            Self::Search(_) => "drvup::events::search",
            Self::Download(_) => "drvup::events::download",
            Self::Install(_) => "drvup::events::install",
            Self::Cleanup(_) => "drvup::events::cleanup",
        }
    }
}
