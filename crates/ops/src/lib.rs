#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! High-level operations orchestration for drvup
//!
//! This crate serves as the orchestration layer between the CLI and the
//! update service client: context wiring, the selection policy, resource
//! reclamation, and the single update pipeline.

mod context;
mod reclaim;
mod select;
mod update;

pub use context::{OpsContextBuilder, OpsCtx};
pub use reclaim::Reclaimer;
pub use select::select_for_install;
pub use update::{update, UpdateOptions};

use drvup_errors::Error;
use drvup_types::{DryRunReport, UpdateReport};

/// Operation result that can be serialized for CLI output
#[derive(Clone, Debug, serde::Serialize)]
#[serde(tag = "type", content = "data")]
pub enum OperationResult {
    /// Nothing applicable was found; the run ended at the search stage
    NoUpdates,
    /// Candidates that would have been processed
    DryRun(DryRunReport),
    /// Full per-item report of an applied run
    Applied(UpdateReport),
}

impl OperationResult {
    /// Convert to JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self).map_err(|e| {
            drvup_errors::OpsError::SerializationError {
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Check if this is a success result.
    ///
    /// Item-level failures inside an applied report are data, not run
    /// failures; runs that fail produce an error instead of a result.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::NoUpdates | Self::DryRun(_) | Self::Applied(_))
    }
}
