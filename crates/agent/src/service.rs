//! Update service client traits
//!
//! `UpdateService` is the seam a platform adapter implements;
//! `UpdateSession` carries the three pipeline stages. Stage outputs bundle
//! the handles they acquired so the caller can hand them to its reclaimer
//! immediately.

use async_trait::async_trait;
use drvup_errors::AgentError;
use drvup_types::{InstallOutcome, SelectedSet, UpdateItem};

use crate::filter::UpdateFilter;
use crate::handle::ServiceHandle;

/// Output of the search stage: discovered items plus the handles backing
/// the searcher and its item collection
pub struct SearchOutput {
    pub items: Vec<UpdateItem>,
    pub handles: Vec<Box<dyn ServiceHandle>>,
}

/// Output of the download stage; the per-item download flags live on the
/// selected set itself
pub struct DownloadOutput {
    pub handles: Vec<Box<dyn ServiceHandle>>,
}

/// Output of the install stage: the service's verdict plus the installer
/// and result-collection handles
pub struct InstallOutput {
    pub outcome: InstallOutcome,
    pub handles: Vec<Box<dyn ServiceHandle>>,
}

/// An open session plus the handle guarding it
pub struct SessionLease {
    pub session: Box<dyn UpdateSession>,
    pub handle: Box<dyn ServiceHandle>,
}

impl std::fmt::Debug for SessionLease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionLease").finish_non_exhaustive()
    }
}

/// Entry point to an update service backend
#[async_trait]
pub trait UpdateService: Send + Sync {
    /// Short backend name used in events and logs
    fn backend(&self) -> &str;

    /// Open a session against the service.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ServiceUnavailable`] when the service cannot
    /// be reached or refuses the session.
    async fn open_session(&self) -> Result<SessionLease, AgentError>;
}

/// A live session able to run the search, download, and install stages.
///
/// Stages are driven strictly in sequence by a single caller; sessions do
/// not need to support concurrent stage calls.
#[async_trait]
pub trait UpdateSession: Send {
    /// Discover updates matching the filter.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::SearchFailed`] when the service rejects the
    /// query. An empty result set is not an error.
    async fn search(&mut self, filter: &UpdateFilter) -> Result<SearchOutput, AgentError>;

    /// Acquire payloads for the selected updates, flipping each item's
    /// `downloaded` flag in place. Items whose payload did not arrive keep
    /// the flag false and still proceed to install; only a failure to
    /// start the batch at all is an error.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::DownloadFailed`] when the download batch
    /// cannot be initiated.
    async fn download(&mut self, selected: &mut SelectedSet) -> Result<DownloadOutput, AgentError>;

    /// Install the selected updates in selection order. The returned
    /// outcome's per-item results are index-aligned with the selected set
    /// and are authoritative regardless of download shortfalls.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InstallFailed`] when the installation batch
    /// cannot be initiated.
    async fn install(&mut self, selected: &SelectedSet) -> Result<InstallOutput, AgentError>;
}
