//! Service handle accounting
//!
//! Every server-side resource a run acquires (the session itself, the
//! searcher, the downloader, the installer, the result collections) is
//! represented by a handle that must be released exactly once. The
//! pipeline registers handles with its reclaimer as they are acquired
//! and releases them in reverse order on every exit path.

use async_trait::async_trait;
use drvup_errors::AgentError;

/// Kind of service-side resource a handle guards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    Session,
    Searcher,
    ItemCollection,
    Downloader,
    Installer,
    InstallResult,
}

impl HandleKind {
    /// Lowercase name used in cleanup events and logs
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Session => "session",
            Self::Searcher => "searcher",
            Self::ItemCollection => "item collection",
            Self::Downloader => "downloader",
            Self::Installer => "installer",
            Self::InstallResult => "install result",
        }
    }
}

impl std::fmt::Display for HandleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A releasable service-side resource.
///
/// Releasing twice is safe: implementations treat the second and later
/// calls as Ok no-ops so teardown paths never have to track what already
/// ran.
#[async_trait]
pub trait ServiceHandle: Send {
    /// Which resource this handle guards
    fn kind(&self) -> HandleKind;

    /// Whether the underlying resource has already been released
    fn is_released(&self) -> bool;

    /// Release the underlying resource back to the service.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ReleaseFailed`] when the service rejects the
    /// release. Callers log this and continue; it never aborts a run.
    async fn release(&mut self) -> Result<(), AgentError>;
}
