//! Operations context for dependency injection

use drvup_agent::UpdateService;
use drvup_config::Config;
use drvup_errors::{Error, OpsError};
use drvup_events::{EventEmitter, EventSender};

/// Operations context providing access to all system components
pub struct OpsCtx {
    /// Update service backend
    pub service: Box<dyn UpdateService>,
    /// Event sender for progress reporting
    pub tx: EventSender,
    /// System configuration
    pub config: Config,
}

// No public constructor - use OpsContextBuilder instead

impl std::fmt::Debug for OpsCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpsCtx")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl EventEmitter for OpsCtx {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(&self.tx)
    }
}

/// Builder for operations context
#[derive(Default)]
pub struct OpsContextBuilder {
    service: Option<Box<dyn UpdateService>>,
    tx: Option<EventSender>,
    config: Option<Config>,
}

impl OpsContextBuilder {
    /// Create new context builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the update service backend
    #[must_use]
    pub fn with_service(mut self, service: Box<dyn UpdateService>) -> Self {
        self.service = Some(service);
        self
    }

    /// Set event sender
    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    /// Set configuration
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the context
    ///
    /// # Errors
    ///
    /// Returns an error if any required component is missing.
    pub fn build(self) -> Result<OpsCtx, Error> {
        let service = self.service.ok_or_else(|| OpsError::MissingComponent {
            component: "service".to_string(),
        })?;

        let tx = self.tx.ok_or_else(|| OpsError::MissingComponent {
            component: "event_sender".to_string(),
        })?;

        let config = self.config.ok_or_else(|| OpsError::MissingComponent {
            component: "config".to_string(),
        })?;

        Ok(OpsCtx {
            service,
            tx,
            config,
        })
    }
}
