//! Search filter for applicable driver updates

/// Conjunctive search predicate submitted to the update service.
///
/// The agent pins a single shape: updates that are not yet installed and
/// belong to the driver category. There is no OR support and no
/// pagination; a search returns every match in one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateFilter {
    /// Installed state the matched updates must have
    pub installed: bool,
    /// Restrict matches to driver-category updates
    pub drivers_only: bool,
}

impl UpdateFilter {
    /// The one filter this agent ever submits: pending driver updates.
    #[must_use]
    pub const fn driver_updates() -> Self {
        Self {
            installed: false,
            drivers_only: true,
        }
    }

    /// Whether an update with the given state matches this filter.
    #[must_use]
    pub fn matches(&self, installed: bool, is_driver: bool) -> bool {
        installed == self.installed && (!self.drivers_only || is_driver)
    }

    /// Render the canonical service query string.
    ///
    /// The string form is what adapters submit and what transcripts show.
    #[must_use]
    pub fn expression(&self) -> String {
        let installed = i32::from(self.installed);
        if self.drivers_only {
            format!("IsInstalled={installed} AND Type='Driver'")
        } else {
            format!("IsInstalled={installed}")
        }
    }
}

impl Default for UpdateFilter {
    fn default() -> Self {
        Self::driver_updates()
    }
}

impl std::fmt::Display for UpdateFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.expression())
    }
}
