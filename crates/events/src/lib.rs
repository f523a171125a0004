#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Event system for async communication in drvup
//!
//! This crate provides a domain-driven event system with tracing integration
//! and clean separation of concerns. All output goes through events - no
//! direct logging or printing is allowed outside the CLI.
//!
//! ## Architecture
//!
//! - **Domain-driven events**: Events grouped by pipeline stage (Session,
//!   Search, Download, Install, Cleanup)
//! - **Unified `EventEmitter` trait**: Single, consistent API for all event
//!   emissions
//! - **Tracing integration**: Built-in structured logging with intelligent
//!   log levels

pub mod meta;
pub use meta::{EventLevel, EventMeta, EventSource};

pub mod events;
pub use events::{
    AppEvent, CleanupEvent, DownloadEvent, GeneralEvent, InstallEvent, SearchEvent, SessionEvent,
};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

/// A domain event paired with the metadata captured at emission time.
///
/// This is the unit that travels over the channel; consumers use the
/// metadata for log routing and the event for rendering.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventMessage {
    pub meta: EventMeta,
    pub event: AppEvent,
}

impl EventMessage {
    /// Pair an event with explicit metadata.
    #[must_use]
    pub fn new(meta: EventMeta, event: AppEvent) -> Self {
        Self { meta, event }
    }

    /// Wrap an event, deriving metadata from its domain and severity.
    #[must_use]
    pub fn from_event(event: AppEvent) -> Self {
        let meta = EventMeta::new(event.log_level(), event.event_source());
        Self { meta, event }
    }
}

/// Type alias for event sender carrying `EventMessage` payloads
pub type EventSender = UnboundedSender<EventMessage>;

/// Type alias for the matching event receiver
pub type EventReceiver = tokio::sync::mpsc::UnboundedReceiver<EventMessage>;

/// Create a new event channel
#[must_use]
pub fn channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

/// The unified trait for emitting events throughout the drvup system
///
/// This trait provides a single, consistent API for emitting events regardless
/// of whether you have a raw `EventSender` or a struct that contains one.
pub trait EventEmitter {
    /// Get the event sender for this emitter
    fn event_sender(&self) -> Option<&EventSender>;

    /// Emit an event with explicit metadata
    fn emit_with_meta(&self, meta: EventMeta, event: AppEvent) {
        if let Some(sender) = self.event_sender() {
            // Ignore send errors - if receiver is dropped, we just continue
            let _ = sender.send(EventMessage::new(meta, event));
        }
    }

    /// Emit an event, deriving metadata from the event itself
    fn emit(&self, event: AppEvent) {
        let meta = EventMeta::new(event.log_level(), event.event_source());
        self.emit_with_meta(meta, event);
    }

    /// Emit a debug log event
    fn emit_debug(&self, message: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::debug(message)));
    }

    /// Emit a warning event
    fn emit_warning(&self, message: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::warning(message)));
    }

    /// Emit a warning event with context
    fn emit_warning_with_context(&self, message: impl Into<String>, context: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::warning_with_context(
            message, context,
        )));
    }

    /// Emit an error event
    fn emit_error(&self, message: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::error(message)));
    }

    /// Emit an error event with details
    fn emit_error_with_details(&self, message: impl Into<String>, details: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::error_with_details(
            message, details,
        )));
    }

    /// Emit an operation started event
    fn emit_operation_started(&self, operation: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::OperationStarted {
            operation: operation.into(),
        }));
    }

    /// Emit an operation completed event
    fn emit_operation_completed(&self, operation: impl Into<String>, success: bool) {
        self.emit(AppEvent::General(GeneralEvent::OperationCompleted {
            operation: operation.into(),
            success,
        }));
    }

    /// Emit an operation failed event
    fn emit_operation_failed(&self, operation: impl Into<String>, error: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::OperationFailed {
            operation: operation.into(),
            error: error.into(),
        }));
    }
}

/// Implementation of `EventEmitter` for the raw `EventSender`
/// This allows `EventSender` to be used directly where `EventEmitter` is expected
impl EventEmitter for EventSender {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(self)
    }
}
