use drvup_types::{ItemResult, ResultCode};
use serde::{Deserialize, Serialize};

/// Install stage events for applying downloaded updates
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InstallEvent {
    /// Installation batch handed to the service
    Started { total: usize },

    /// Per-item result, index-aligned with the selected set
    ItemReported {
        index: usize,
        title: String,
        result: ItemResult,
    },

    /// Installation finished with the service's aggregate verdict
    Completed {
        overall: ResultCode,
        reboot_required: bool,
    },
}
