//! Report type definitions for operations

use crate::{InstallOutcome, ItemResult, ResultCode, SelectedSet};
use serde::{Deserialize, Serialize};

/// Update run report
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpdateReport {
    /// Per-item results joined with their titles, in selection order
    pub items: Vec<ItemReport>,
    /// Overall code reported by the service
    pub overall: ResultCode,
    /// Whether a restart is required (service flag or any item flag)
    pub reboot_required: bool,
    /// Number of candidates the search returned
    pub searched: usize,
    /// Total execution time
    pub duration_ms: u64,
}

impl UpdateReport {
    /// Join the selected set with the installation outcome.
    /// Callers must have verified the two are index-aligned.
    #[must_use]
    pub fn from_outcome(
        selected: &SelectedSet,
        outcome: &InstallOutcome,
        searched: usize,
        duration_ms: u64,
    ) -> Self {
        let items = selected
            .iter()
            .zip(&outcome.items)
            .map(|(item, result)| ItemReport {
                title: item.title.clone(),
                result: result.clone(),
            })
            .collect();

        Self {
            items,
            overall: outcome.overall,
            reboot_required: outcome.requires_reboot(),
            searched,
            duration_ms,
        }
    }
}

/// One update in the final report
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ItemReport {
    /// Human-readable title
    pub title: String,
    /// Terminal result for this item
    pub result: ItemResult,
}

/// Dry-run report listing what would have been processed
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DryRunReport {
    /// Titles of the candidates, in discovery order
    pub candidates: Vec<String>,
    /// Number of candidates the search returned
    pub searched: usize,
}
