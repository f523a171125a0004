//! Update service client error types
//!
//! Stage errors in this module are catastrophic: each one aborts the
//! remaining stages of a run. Per-item shortfalls (a download that did
//! not finish, an item that failed to install) are carried as data in
//! the item results, never as errors here.

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum AgentError {
    #[error("update service unavailable ({backend}): {message}")]
    ServiceUnavailable { backend: String, message: String },

    #[error("search failed for filter '{filter}': {message}")]
    SearchFailed { filter: String, message: String },

    #[error("download could not be started: {message}")]
    DownloadFailed { message: String },

    #[error("installation could not be started: {message}")]
    InstallFailed { message: String },

    #[error("failed to release {handle} handle: {message}")]
    ReleaseFailed { handle: String, message: String },
}

impl UserFacingError for AgentError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::ServiceUnavailable { .. } => {
                Some("Check that the update service is running and reachable, then retry.")
            }
            Self::SearchFailed { .. } => {
                Some("The service rejected the search query; this is not transient.")
            }
            Self::DownloadFailed { .. } => {
                Some("Check network connectivity and retry the update run.")
            }
            Self::InstallFailed { .. } => {
                Some("Check the service logs for the underlying installer failure.")
            }
            Self::ReleaseFailed { .. } => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ServiceUnavailable { .. } | Self::DownloadFailed { .. }
        )
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::ServiceUnavailable { .. } => "agent.service_unavailable",
            Self::SearchFailed { .. } => "agent.search_failed",
            Self::DownloadFailed { .. } => "agent.download_failed",
            Self::InstallFailed { .. } => "agent.install_failed",
            Self::ReleaseFailed { .. } => "agent.release_failed",
        })
    }
}
