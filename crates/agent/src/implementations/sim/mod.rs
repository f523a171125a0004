//! Catalog-driven simulated update service
//!
//! The sim is the shipped reference backend: deterministic, offline, and
//! fully scripted by a TOML catalog. It exercises every part of the
//! pipeline contract, including download shortfalls, per-item install
//! failures, unknown result codes, and handle accounting.

mod catalog;
mod handles;

pub use catalog::{Catalog, CatalogEntry, DownloadBehavior, ServiceSection};
pub use handles::{HandleLedger, SimHandle};

use std::path::PathBuf;

use async_trait::async_trait;

use drvup_errors::AgentError;
use drvup_types::{InstallOutcome, ItemResult, ResultCode, SelectedSet, UpdateCategory, UpdateItem};

use crate::filter::UpdateFilter;
use crate::handle::{HandleKind, ServiceHandle};
use crate::service::{
    DownloadOutput, InstallOutput, SearchOutput, SessionLease, UpdateService, UpdateSession,
};

/// Simulated update service backed by a TOML catalog
pub struct SimService {
    catalog_path: PathBuf,
    ledger: HandleLedger,
}

impl SimService {
    /// Create a service reading from the given catalog file
    #[must_use]
    pub fn new(catalog_path: impl Into<PathBuf>) -> Self {
        Self {
            catalog_path: catalog_path.into(),
            ledger: HandleLedger::new(),
        }
    }

    /// Ledger shared with every handle this service hands out
    #[must_use]
    pub fn ledger(&self) -> HandleLedger {
        self.ledger.clone()
    }
}

#[async_trait]
impl UpdateService for SimService {
    fn backend(&self) -> &str {
        "sim"
    }

    async fn open_session(&self) -> Result<SessionLease, AgentError> {
        // A missing or malformed catalog is an unreachable service
        let catalog = Catalog::load(&self.catalog_path).await?;
        let handle = SimHandle::acquire(HandleKind::Session, &self.ledger);
        let session = SimSession {
            catalog,
            ledger: self.ledger.clone(),
        };
        Ok(SessionLease {
            session: Box::new(session),
            handle: Box::new(handle),
        })
    }
}

/// One live sim session over a parsed catalog snapshot
pub struct SimSession {
    catalog: Catalog,
    ledger: HandleLedger,
}

impl SimSession {
    fn acquire(&self, kind: HandleKind) -> Box<dyn ServiceHandle> {
        Box::new(SimHandle::acquire(kind, &self.ledger))
    }
}

#[async_trait]
impl UpdateSession for SimSession {
    async fn search(&mut self, filter: &UpdateFilter) -> Result<SearchOutput, AgentError> {
        let items = self
            .catalog
            .updates
            .iter()
            .filter(|entry| {
                filter.matches(entry.installed, entry.category == UpdateCategory::Driver)
            })
            .map(|entry| {
                let mut item = UpdateItem::new(entry.id.clone(), entry.title.clone());
                item.category = entry.category.clone();
                item
            })
            .collect();

        let handles = vec![
            self.acquire(HandleKind::Searcher),
            self.acquire(HandleKind::ItemCollection),
        ];
        Ok(SearchOutput { items, handles })
    }

    async fn download(&mut self, selected: &mut SelectedSet) -> Result<DownloadOutput, AgentError> {
        for index in 0..selected.len() {
            let behavior = selected
                .get(index)
                .and_then(|item| self.catalog.entry(item.id.as_str()))
                .map_or(DownloadBehavior::Ok, |entry| entry.download);
            selected.mark_downloaded(index, behavior == DownloadBehavior::Ok);
        }

        Ok(DownloadOutput {
            handles: vec![self.acquire(HandleKind::Downloader)],
        })
    }

    async fn install(&mut self, selected: &SelectedSet) -> Result<InstallOutput, AgentError> {
        let items: Vec<ItemResult> = selected
            .iter()
            .map(|item| match self.catalog.entry(item.id.as_str()) {
                Some(entry) => ItemResult::new(entry.result_code, entry.native_code, entry.reboot),
                // Unknown id; the service cannot have installed it
                None => ItemResult::new(ResultCode::Failed, 0, false),
            })
            .collect();

        let succeeded = items
            .iter()
            .filter(|result| result.code == ResultCode::Succeeded)
            .count();
        let overall = if succeeded == items.len() {
            ResultCode::Succeeded
        } else if succeeded == 0 {
            ResultCode::Failed
        } else {
            ResultCode::SucceededWithErrors
        };

        let outcome = InstallOutcome {
            overall,
            // Service-level flag only; per-item flags stay on the items
            reboot_required: self.catalog.service.reboot_required,
            items,
        };

        let handles = vec![
            self.acquire(HandleKind::Installer),
            self.acquire(HandleKind::InstallResult),
        ];
        Ok(InstallOutput { outcome, handles })
    }
}
