//! Installation result and outcome types
//!
//! The update service reports one [`ResultCode`] per processed item and
//! one for the operation as a whole, together with reboot flags. Codes
//! arrive as raw integers on the wire; decoding is total so an unknown
//! code from a newer service still renders faithfully instead of
//! failing the run.

use serde::{Deserialize, Serialize};

/// Operation result code as defined by the update service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i32", from = "i32")]
pub enum ResultCode {
    NotStarted,
    InProgress,
    Succeeded,
    SucceededWithErrors,
    Failed,
    Aborted,
    /// Any code outside the documented range, preserved verbatim
    Unknown(i32),
}

impl ResultCode {
    /// Decode a raw service code. Total: out-of-range values map to
    /// [`ResultCode::Unknown`] rather than an error.
    #[must_use]
    pub fn from_raw(code: i32) -> Self {
        match code {
            0 => Self::NotStarted,
            1 => Self::InProgress,
            2 => Self::Succeeded,
            3 => Self::SucceededWithErrors,
            4 => Self::Failed,
            5 => Self::Aborted,
            other => Self::Unknown(other),
        }
    }

    #[must_use]
    pub fn as_raw(self) -> i32 {
        match self {
            Self::NotStarted => 0,
            Self::InProgress => 1,
            Self::Succeeded => 2,
            Self::SucceededWithErrors => 3,
            Self::Failed => 4,
            Self::Aborted => 5,
            Self::Unknown(other) => other,
        }
    }

    /// Whether the code represents a terminal success. Partial success
    /// counts: `SucceededWithErrors` is its own category and is never
    /// collapsed into `Failed`.
    #[must_use]
    pub fn is_terminal_success(self) -> bool {
        matches!(self, Self::Succeeded | Self::SucceededWithErrors)
    }
}

impl From<i32> for ResultCode {
    fn from(code: i32) -> Self {
        Self::from_raw(code)
    }
}

impl From<ResultCode> for i32 {
    fn from(code: ResultCode) -> Self {
        code.as_raw()
    }
}

impl std::fmt::Display for ResultCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotStarted => write!(f, "Not started"),
            Self::InProgress => write!(f, "In progress"),
            Self::Succeeded => write!(f, "Succeeded"),
            Self::SucceededWithErrors => write!(f, "Succeeded with errors"),
            Self::Failed => write!(f, "Failed"),
            Self::Aborted => write!(f, "Aborted"),
            Self::Unknown(code) => write!(f, "Unknown({code})"),
        }
    }
}

/// Per-item installation result, index-aligned with the selected set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemResult {
    /// Terminal code for this item
    pub code: ResultCode,
    /// Service-native error code; zero means no error
    pub native_code: i32,
    /// Whether this item requires a restart to take effect
    pub reboot_required: bool,
}

impl ItemResult {
    #[must_use]
    pub fn new(code: ResultCode, native_code: i32, reboot_required: bool) -> Self {
        Self {
            code,
            native_code,
            reboot_required,
        }
    }

    /// Succeeded item with no error and no reboot
    #[must_use]
    pub fn succeeded() -> Self {
        Self::new(ResultCode::Succeeded, 0, false)
    }

    /// Native error code rendered in hexadecimal, or `None` when zero.
    /// Service codes are diagnosed by their bit pattern, so the value
    /// formats through its unsigned representation.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn native_code_hex(&self) -> Option<String> {
        if self.native_code == 0 {
            None
        } else {
            Some(format!("{:#010X}", self.native_code as u32))
        }
    }
}

/// Aggregate outcome of the installation stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallOutcome {
    /// Overall code reported by the service
    pub overall: ResultCode,
    /// The service's own aggregate reboot flag
    pub reboot_required: bool,
    /// Per-item results, one per selected item, in selection order
    pub items: Vec<ItemResult>,
}

impl InstallOutcome {
    /// Whether a restart is required to finish applying updates.
    /// True when the service's aggregate flag is set or any per-item
    /// flag is set; both signals are honored independently.
    #[must_use]
    pub fn requires_reboot(&self) -> bool {
        self.reboot_required || self.items.iter().any(|item| item.reboot_required)
    }

    /// Count of items whose code is a terminal success
    #[must_use]
    pub fn succeeded_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| item.code.is_terminal_success())
            .count()
    }
}
