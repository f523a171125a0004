//! Advisory elevation check
//!
//! Driver installation usually needs administrative rights. The check never
//! blocks a run; a non-elevated process proceeds and the update service
//! reports any real access failures itself.

use drvup_events::{EventEmitter, EventSender};

/// Elevation status of the current process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Elevation {
    Elevated,
    NotElevated,
    Unknown,
}

/// Determine whether the process runs with administrative rights
#[cfg(unix)]
pub fn current() -> Elevation {
    // SAFETY: geteuid has no preconditions and cannot fail
    if unsafe { libc::geteuid() } == 0 {
        Elevation::Elevated
    } else {
        Elevation::NotElevated
    }
}

/// Determine whether the process runs with administrative rights
#[cfg(not(unix))]
pub fn current() -> Elevation {
    Elevation::Unknown
}

/// Emit the advisory warning when the process is not elevated
pub fn advise(tx: &EventSender) {
    if current() == Elevation::NotElevated {
        tx.emit_warning_with_context(
            "running without administrative rights",
            "driver installation may be refused by the update service",
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elevation_is_known_on_unix() {
        #[cfg(unix)]
        assert_ne!(current(), Elevation::Unknown);
        #[cfg(not(unix))]
        assert_eq!(current(), Elevation::Unknown);
    }

    #[tokio::test]
    async fn advise_emits_at_most_one_warning() {
        let (tx, mut rx) = drvup_events::channel();
        advise(&tx);
        drop(tx);

        let mut warnings = 0;
        while let Some(message) = rx.recv().await {
            warnings += 1;
            assert!(matches!(
                message.event,
                drvup_events::AppEvent::General(drvup_events::GeneralEvent::Warning { .. })
            ));
        }
        assert!(warnings <= 1);
    }
}
