//! TOML catalog backing the simulated service
//!
//! The catalog scripts the whole service surface: which updates exist,
//! which are already installed, how their downloads behave, and what the
//! installer reports for each. Download and install are scripted
//! independently; a failed download does not force a failed install
//! because payloads may already sit in the service cache.

use serde::Deserialize;
use std::path::Path;

use drvup_errors::AgentError;
use drvup_types::{ResultCode, UpdateCategory};

/// Scripted download behavior for one catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadBehavior {
    /// Payload arrives and the item's downloaded flag is set
    Ok,
    /// Payload never arrives; the item proceeds to install anyway
    Fail,
}

/// One update known to the simulated service
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub title: String,
    #[serde(default = "default_category")]
    pub category: UpdateCategory,
    /// Already installed on this host; excluded by the driver filter
    #[serde(default)]
    pub installed: bool,
    #[serde(default = "default_download")]
    pub download: DownloadBehavior,
    /// Raw result the installer reports for this item
    #[serde(default = "default_result_code")]
    pub result_code: ResultCode,
    /// Native error code attached to the result; 0 means none
    #[serde(default)]
    pub native_code: i32,
    /// Per-item restart flag
    #[serde(default)]
    pub reboot: bool,
}

fn default_category() -> UpdateCategory {
    UpdateCategory::Driver
}

fn default_download() -> DownloadBehavior {
    DownloadBehavior::Ok
}

fn default_result_code() -> ResultCode {
    ResultCode::Succeeded
}

/// Service-level settings in the catalog header
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceSection {
    /// Aggregate restart flag the service reports for the whole batch
    #[serde(default)]
    pub reboot_required: bool,
}

/// A parsed catalog file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub service: ServiceSection,
    #[serde(default, rename = "update")]
    pub updates: Vec<CatalogEntry>,
}

impl Catalog {
    /// Read and parse a catalog file.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::ServiceUnavailable`] when the file is missing,
    /// unreadable, or not valid catalog TOML; a sim without its catalog is
    /// a service that cannot be reached.
    pub async fn load(path: &Path) -> Result<Self, AgentError> {
        let contents =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| AgentError::ServiceUnavailable {
                    backend: "sim".to_string(),
                    message: format!("catalog {}: {e}", path.display()),
                })?;

        toml::from_str(&contents).map_err(|e| AgentError::ServiceUnavailable {
            backend: "sim".to_string(),
            message: format!("catalog {}: {e}", path.display()),
        })
    }

    /// Look up an entry by its service-assigned id
    #[must_use]
    pub fn entry(&self, id: &str) -> Option<&CatalogEntry> {
        self.updates.iter().find(|entry| entry.id == id)
    }
}
