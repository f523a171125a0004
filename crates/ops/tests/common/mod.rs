//! Scripted update service for pipeline tests
//!
//! Records every stage call and hands out handles that report back to a
//! shared ledger, so tests can assert call order, arguments, and that
//! every acquired handle was released.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use drvup_agent::{
    DownloadOutput, HandleKind, InstallOutput, SearchOutput, ServiceHandle, SessionLease,
    UpdateFilter, UpdateService, UpdateSession,
};
use drvup_errors::AgentError;
use drvup_types::{InstallOutcome, ItemResult, ResultCode, SelectedSet, UpdateItem};

/// One observed stage call, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    OpenSession,
    Search(String),
    Download(Vec<String>),
    Install(Vec<String>),
}

/// Scripted behavior for a whole run
#[derive(Default)]
pub struct Script {
    pub items: Vec<UpdateItem>,
    pub fail_open: bool,
    pub fail_search: bool,
    pub fail_download: bool,
    pub fail_install: bool,
    /// Per-index download flags; missing entries default to true
    pub download_ok: Vec<bool>,
    /// Per-item scripted results; empty synthesizes all-succeeded
    pub results: Option<Vec<ItemResult>>,
    /// Force the result list to this length to provoke misalignment
    pub result_count: Option<usize>,
    /// Service-level aggregate restart flag
    pub service_reboot: bool,
    /// Handle kind whose release is scripted to fail
    pub fail_release: Option<HandleKind>,
}

#[derive(Default)]
struct MockState {
    calls: Vec<Call>,
    opened: usize,
    released: usize,
    release_order: Vec<HandleKind>,
}

/// Shared view of the mock's observations
#[derive(Clone)]
pub struct MockProbe {
    state: Arc<Mutex<MockState>>,
}

impl MockProbe {
    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn opened(&self) -> usize {
        self.state.lock().unwrap().opened
    }

    pub fn released(&self) -> usize {
        self.state.lock().unwrap().released
    }

    pub fn release_order(&self) -> Vec<HandleKind> {
        self.state.lock().unwrap().release_order.clone()
    }

    pub fn is_balanced(&self) -> bool {
        let state = self.state.lock().unwrap();
        state.opened == state.released
    }
}

pub struct MockService {
    script: Arc<Script>,
    state: Arc<Mutex<MockState>>,
}

impl MockService {
    pub fn new(script: Script) -> Self {
        Self {
            script: Arc::new(script),
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    pub fn probe(&self) -> MockProbe {
        MockProbe {
            state: Arc::clone(&self.state),
        }
    }
}

struct MockHandle {
    kind: HandleKind,
    released: bool,
    fail: bool,
    state: Arc<Mutex<MockState>>,
}

fn acquire(
    kind: HandleKind,
    script: &Script,
    state: &Arc<Mutex<MockState>>,
) -> Box<dyn ServiceHandle> {
    state.lock().unwrap().opened += 1;
    Box::new(MockHandle {
        kind,
        released: false,
        fail: script.fail_release == Some(kind),
        state: Arc::clone(state),
    })
}

#[async_trait]
impl ServiceHandle for MockHandle {
    fn kind(&self) -> HandleKind {
        self.kind
    }

    fn is_released(&self) -> bool {
        self.released
    }

    async fn release(&mut self) -> Result<(), AgentError> {
        if self.released {
            return Ok(());
        }
        if self.fail {
            return Err(AgentError::ReleaseFailed {
                handle: self.kind.to_string(),
                message: "scripted release failure".to_string(),
            });
        }
        self.released = true;
        let mut state = self.state.lock().unwrap();
        state.released += 1;
        state.release_order.push(self.kind);
        Ok(())
    }
}

#[async_trait]
impl UpdateService for MockService {
    fn backend(&self) -> &str {
        "mock"
    }

    async fn open_session(&self) -> Result<SessionLease, AgentError> {
        self.state.lock().unwrap().calls.push(Call::OpenSession);
        if self.script.fail_open {
            return Err(AgentError::ServiceUnavailable {
                backend: "mock".to_string(),
                message: "scripted outage".to_string(),
            });
        }
        let handle = acquire(HandleKind::Session, &self.script, &self.state);
        let session = MockSession {
            script: Arc::clone(&self.script),
            state: Arc::clone(&self.state),
        };
        Ok(SessionLease {
            session: Box::new(session),
            handle,
        })
    }
}

pub struct MockSession {
    script: Arc<Script>,
    state: Arc<Mutex<MockState>>,
}

#[async_trait]
impl UpdateSession for MockSession {
    async fn search(&mut self, filter: &UpdateFilter) -> Result<SearchOutput, AgentError> {
        self.state
            .lock()
            .unwrap()
            .calls
            .push(Call::Search(filter.expression()));
        if self.script.fail_search {
            return Err(AgentError::SearchFailed {
                filter: filter.expression(),
                message: "scripted refusal".to_string(),
            });
        }
        Ok(SearchOutput {
            items: self.script.items.clone(),
            handles: vec![
                acquire(HandleKind::Searcher, &self.script, &self.state),
                acquire(HandleKind::ItemCollection, &self.script, &self.state),
            ],
        })
    }

    async fn download(&mut self, selected: &mut SelectedSet) -> Result<DownloadOutput, AgentError> {
        let ids = selected.iter().map(|i| i.id.to_string()).collect();
        self.state.lock().unwrap().calls.push(Call::Download(ids));
        if self.script.fail_download {
            return Err(AgentError::DownloadFailed {
                message: "scripted refusal".to_string(),
            });
        }
        for index in 0..selected.len() {
            let ok = self.script.download_ok.get(index).copied().unwrap_or(true);
            selected.mark_downloaded(index, ok);
        }
        Ok(DownloadOutput {
            handles: vec![acquire(HandleKind::Downloader, &self.script, &self.state)],
        })
    }

    async fn install(&mut self, selected: &SelectedSet) -> Result<InstallOutput, AgentError> {
        let ids = selected.iter().map(|i| i.id.to_string()).collect();
        self.state.lock().unwrap().calls.push(Call::Install(ids));
        if self.script.fail_install {
            return Err(AgentError::InstallFailed {
                message: "scripted refusal".to_string(),
            });
        }

        let mut items: Vec<ItemResult> = match &self.script.results {
            Some(results) => results.clone(),
            None => selected.iter().map(|_| ItemResult::succeeded()).collect(),
        };
        if let Some(count) = self.script.result_count {
            items.truncate(count);
            while items.len() < count {
                items.push(ItemResult::succeeded());
            }
        }

        let succeeded = items
            .iter()
            .filter(|r| r.code == ResultCode::Succeeded)
            .count();
        let overall = if succeeded == items.len() {
            ResultCode::Succeeded
        } else if succeeded == 0 {
            ResultCode::Failed
        } else {
            ResultCode::SucceededWithErrors
        };

        Ok(InstallOutput {
            outcome: InstallOutcome {
                overall,
                reboot_required: self.script.service_reboot,
                items,
            },
            handles: vec![
                acquire(HandleKind::Installer, &self.script, &self.state),
                acquire(HandleKind::InstallResult, &self.script, &self.state),
            ],
        })
    }
}
