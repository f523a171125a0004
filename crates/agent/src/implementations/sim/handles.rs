#![allow(clippy::missing_panics_doc)] // Mutex::lock panics are documented as safe

//! Handle ledger for the simulated service
//!
//! The ledger counts every handle the sim hands out and every release it
//! receives, so tests can assert a run left nothing behind.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use drvup_errors::AgentError;

use crate::handle::{HandleKind, ServiceHandle};

#[derive(Debug, Default)]
struct LedgerState {
    opened: usize,
    released: usize,
}

/// Shared open/release accounting for every handle the sim gives out
#[derive(Debug, Default, Clone)]
pub struct HandleLedger {
    inner: Arc<Mutex<LedgerState>>,
}

impl HandleLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn record_open(&self) {
        self.inner.lock().unwrap().opened += 1;
    }

    fn record_release(&self) {
        self.inner.lock().unwrap().released += 1;
    }

    /// Number of handles handed out so far
    #[must_use]
    pub fn opened_count(&self) -> usize {
        self.inner.lock().unwrap().opened
    }

    /// Number of releases received so far
    #[must_use]
    pub fn released_count(&self) -> usize {
        self.inner.lock().unwrap().released
    }

    /// True when every handle handed out has been released exactly once
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        let state = self.inner.lock().unwrap();
        state.opened == state.released
    }
}

/// A handle to one sim-side resource
pub struct SimHandle {
    kind: HandleKind,
    released: bool,
    ledger: HandleLedger,
}

impl SimHandle {
    pub(crate) fn acquire(kind: HandleKind, ledger: &HandleLedger) -> Self {
        ledger.record_open();
        Self {
            kind,
            released: false,
            ledger: ledger.clone(),
        }
    }
}

#[async_trait]
impl ServiceHandle for SimHandle {
    fn kind(&self) -> HandleKind {
        self.kind
    }

    fn is_released(&self) -> bool {
        self.released
    }

    async fn release(&mut self) -> Result<(), AgentError> {
        // Second and later releases are no-ops
        if self.released {
            return Ok(());
        }
        self.released = true;
        self.ledger.record_release();
        Ok(())
    }
}
