//! Event handling and progress display

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use console::style;
use drvup_events::{
    AppEvent, CleanupEvent, DownloadEvent, EventLevel, EventMessage, GeneralEvent, InstallEvent,
    SearchEvent, SessionEvent,
};

use crate::display::result_code_text;
use crate::logging;

/// Appends rendered lines to the run transcript
struct Transcript {
    file: File,
}

impl Transcript {
    /// Open for appending, creating parent directories as needed
    fn open(path: &Path) -> std::io::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(
            file,
            "# drvup run {}",
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        Ok(Self { file })
    }

    fn write_line(&mut self, line: &str) {
        // A transcript write failure must not disturb the run
        let _ = writeln!(self.file, "{line}");
    }
}

/// Event handler for progress display and user feedback
pub struct EventHandler {
    colors_enabled: bool,
    debug: bool,
    /// JSON mode keeps stdout clean for the final document
    quiet: bool,
    transcript: Option<Transcript>,
}

impl EventHandler {
    /// Create new event handler
    ///
    /// A transcript path that cannot be opened degrades to a warning on
    /// stderr; the run continues without a transcript.
    pub fn new(colors_enabled: bool, debug: bool, quiet: bool, transcript_path: Option<&Path>) -> Self {
        let transcript = transcript_path.and_then(|path| match Transcript::open(path) {
            Ok(transcript) => Some(transcript),
            Err(e) => {
                eprintln!("Warning: cannot open transcript {}: {e}", path.display());
                None
            }
        });

        Self {
            colors_enabled,
            debug,
            quiet,
            transcript,
        }
    }

    /// Handle one incoming event message
    pub fn handle_message(&mut self, message: &EventMessage) {
        logging::log_event_with_tracing(message);

        if message.meta.level <= EventLevel::Debug && !self.debug {
            return;
        }

        let line = render_line(&message.event);
        self.show(&line, message.meta.level);
    }

    /// Record a line that belongs to the run but not to any event
    pub fn record_outcome(&mut self, line: &str) {
        if let Some(transcript) = &mut self.transcript {
            transcript.write_line(line);
        }
    }

    fn show(&mut self, line: &str, level: EventLevel) {
        if let Some(transcript) = &mut self.transcript {
            transcript.write_line(line);
        }

        if self.quiet {
            return;
        }

        if self.colors_enabled {
            let styled = match level {
                EventLevel::Error => style(line).red().to_string(),
                EventLevel::Warn => style(line).yellow().to_string(),
                EventLevel::Debug | EventLevel::Trace => style(line).dim().to_string(),
                EventLevel::Info => line.to_string(),
            };
            println!("{styled}");
        } else {
            println!("{line}");
        }
    }
}

/// Render an event as a human-readable progress line
fn render_line(event: &AppEvent) -> String {
    match event {
        AppEvent::Session(session_event) => match session_event {
            SessionEvent::Opening { backend } => {
                format!("Opening update session ({backend})")
            }
            SessionEvent::Opened { backend } => {
                format!("Update session open ({backend})")
            }
        },

        AppEvent::Search(search_event) => match search_event {
            SearchEvent::Started { filter } => {
                format!("Searching for updates: {filter}")
            }
            SearchEvent::Completed { matched } => {
                if *matched == 1 {
                    "Found 1 applicable update".to_string()
                } else {
                    format!("Found {matched} applicable updates")
                }
            }
            SearchEvent::NoUpdates => "No driver updates available.".to_string(),
        },

        AppEvent::Download(download_event) => match download_event {
            DownloadEvent::Started { total } => {
                if *total == 1 {
                    "Downloading 1 update".to_string()
                } else {
                    format!("Downloading {total} updates")
                }
            }
            DownloadEvent::ItemFinished { title, downloaded } => {
                if *downloaded {
                    format!("Downloaded {title}")
                } else {
                    format!("Download incomplete for {title}")
                }
            }
            DownloadEvent::Completed {
                downloaded,
                shortfall,
            } => {
                if *shortfall == 0 {
                    format!("Downloads complete ({downloaded})")
                } else {
                    format!("Downloads finished; {shortfall} without payload")
                }
            }
        },

        AppEvent::Install(install_event) => match install_event {
            InstallEvent::Started { total } => {
                if *total == 1 {
                    "Installing 1 update".to_string()
                } else {
                    format!("Installing {total} updates")
                }
            }
            InstallEvent::ItemReported {
                index,
                title,
                result,
            } => {
                let position = index + 1;
                if result.code.is_terminal_success() {
                    if result.reboot_required {
                        format!("({position}) Installed {title} (restart required)")
                    } else {
                        format!("({position}) Installed {title}")
                    }
                } else {
                    let code = result_code_text(result.code);
                    match result.native_code_hex() {
                        Some(hex) => {
                            format!("({position}) Install failed for {title}: {code} [{hex}]")
                        }
                        None => format!("({position}) Install failed for {title}: {code}"),
                    }
                }
            }
            InstallEvent::Completed {
                overall,
                reboot_required,
            } => {
                let verdict = result_code_text(*overall);
                if *reboot_required {
                    format!("Installation finished: {verdict} (restart required)")
                } else {
                    format!("Installation finished: {verdict}")
                }
            }
        },

        AppEvent::Cleanup(cleanup_event) => match cleanup_event {
            CleanupEvent::HandleReleased { kind } => {
                format!("Released {kind} handle")
            }
            CleanupEvent::ReleaseFailed { kind, message } => {
                format!("Failed to release {kind} handle: {message}")
            }
        },

        AppEvent::General(general_event) => match general_event {
            GeneralEvent::OperationStarted { operation } => {
                format!("Starting {operation}")
            }
            GeneralEvent::OperationCompleted { operation, success } => {
                if *success {
                    format!("Finished {operation}")
                } else {
                    format!("Finished {operation} with issues")
                }
            }
            GeneralEvent::OperationFailed { operation, error } => {
                format!("{operation} failed: {error}")
            }
            GeneralEvent::Warning { message, context } => match context {
                Some(context) => format!("Warning: {message} ({context})"),
                None => format!("Warning: {message}"),
            },
            GeneralEvent::Error { message, details } => match details {
                Some(details) => format!("Error: {message}: {details}"),
                None => format!("Error: {message}"),
            },
            GeneralEvent::DebugLog { message, .. } => message.clone(),
        },
    }
}
