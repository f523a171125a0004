//! Structured logging integration for events
//!
//! Initializes the tracing subscriber for the process and converts domain
//! events into log records with structured fields.

use drvup_config::Config;
use drvup_events::{
    AppEvent, CleanupEvent, DownloadEvent, EventMessage, GeneralEvent, InstallEvent, SearchEvent,
    SessionEvent,
};
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

/// Initialize tracing/logging
pub fn init_tracing(json_mode: bool, debug_enabled_flag: bool) {
    // Check if debug logging is enabled
    let debug_enabled = std::env::var("RUST_LOG").is_ok() || debug_enabled_flag;

    if json_mode {
        // JSON mode: suppress all console output to avoid contaminating JSON
        if debug_enabled {
            // In debug mode with JSON, still log to file
            let log_dir = log_dir();
            if std::fs::create_dir_all(&log_dir).is_ok() {
                let log_file = log_dir.join(format!(
                    "drvup-{}.log",
                    chrono::Utc::now().format("%Y%m%d-%H%M%S")
                ));

                if let Ok(file) = std::fs::File::create(&log_file) {
                    tracing_subscriber::fmt()
                        .json()
                        .with_writer(file)
                        .with_env_filter(
                            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(
                                |_| {
                                    tracing_subscriber::EnvFilter::new(
                                        "info,drvup=debug,drvup_ops=info",
                                    )
                                },
                            ),
                        )
                        .init();
                    return;
                }
            }
        }
        // Fallback: disable all logging in JSON mode
        tracing_subscriber::fmt()
            .with_writer(std::io::sink)
            .with_env_filter("off")
            .init();
    } else if debug_enabled {
        // Debug mode: structured JSON logs to file
        let log_dir = log_dir();
        if let Err(e) = std::fs::create_dir_all(&log_dir) {
            eprintln!("Warning: Failed to create log directory: {e}");
        }

        let log_file = log_dir.join(format!(
            "drvup-{}.log",
            chrono::Utc::now().format("%Y%m%d-%H%M%S")
        ));

        match std::fs::File::create(&log_file) {
            Ok(file) => {
                tracing_subscriber::fmt()
                    .json()
                    .with_writer(file)
                    .with_env_filter(
                        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(
                            |_| {
                                tracing_subscriber::EnvFilter::new("info,drvup=debug,drvup_ops=info")
                            },
                        ),
                    )
                    .init();

                eprintln!("Debug logging enabled: {}", log_file.display());
            }
            Err(e) => {
                eprintln!("Warning: Failed to create log file: {e}");
                // Fallback to stderr
                tracing_subscriber::fmt()
                    .with_env_filter(
                        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(
                            |_| tracing_subscriber::EnvFilter::new("info,drvup=info,drvup_ops=info"),
                        ),
                    )
                    .init();
            }
        }
    } else {
        // Normal mode: minimal logging to stderr
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new("warn,drvup=warn,drvup_ops=warn")
                }),
            )
            .init();
    }
}

fn log_dir() -> PathBuf {
    Config::default_log_dir().unwrap_or_else(|_| std::env::temp_dir().join("drvup-logs"))
}

/// Log an `AppEvent` using the tracing infrastructure with structured fields
pub fn log_event_with_tracing(message: &EventMessage) {
    let event = &message.event;
    let meta = &message.meta;

    match event {
        AppEvent::Session(session_event) => match session_event {
            SessionEvent::Opening { backend } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    backend = %backend,
                    "Opening update session"
                );
            }
            SessionEvent::Opened { backend } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    backend = %backend,
                    "Update session opened"
                );
            }
        },

        AppEvent::Search(search_event) => match search_event {
            SearchEvent::Started { filter } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    filter = %filter,
                    "Update search started"
                );
            }
            SearchEvent::Completed { matched } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    matched = matched,
                    "Update search completed"
                );
            }
            SearchEvent::NoUpdates => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    "No applicable updates"
                );
            }
        },

        AppEvent::Download(download_event) => match download_event {
            DownloadEvent::Started { total } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    total = total,
                    "Download started"
                );
            }
            DownloadEvent::ItemFinished { title, downloaded } => {
                if *downloaded {
                    info!(
                        source = meta.source.as_str(),
                        event_id = %meta.event_id,
                        title = %title,
                        "Item downloaded"
                    );
                } else {
                    warn!(
                        source = meta.source.as_str(),
                        event_id = %meta.event_id,
                        title = %title,
                        "Item download incomplete"
                    );
                }
            }
            DownloadEvent::Completed {
                downloaded,
                shortfall,
            } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    downloaded = downloaded,
                    shortfall = shortfall,
                    "Download completed"
                );
            }
        },

        AppEvent::Install(install_event) => match install_event {
            InstallEvent::Started { total } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    total = total,
                    "Installation started"
                );
            }
            InstallEvent::ItemReported {
                index,
                title,
                result,
            } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    index = index,
                    title = %title,
                    code = ?result.code,
                    native_code = ?result.native_code_hex(),
                    reboot_required = result.reboot_required,
                    "Install result reported"
                );
            }
            InstallEvent::Completed {
                overall,
                reboot_required,
            } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    overall = ?overall,
                    reboot_required = reboot_required,
                    "Installation completed"
                );
            }
        },

        AppEvent::Cleanup(cleanup_event) => match cleanup_event {
            CleanupEvent::HandleReleased { kind } => {
                debug!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    kind = %kind,
                    "Service handle released"
                );
            }
            CleanupEvent::ReleaseFailed { kind, message } => {
                warn!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    kind = %kind,
                    message = %message,
                    "Service handle release failed"
                );
            }
        },

        AppEvent::General(general_event) => match general_event {
            GeneralEvent::OperationStarted { operation } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    operation = %operation,
                    "Operation started"
                );
            }
            GeneralEvent::OperationCompleted { operation, success } => {
                if *success {
                    info!(
                        source = meta.source.as_str(),
                        event_id = %meta.event_id,
                        operation = %operation,
                        success = success,
                        "Operation completed successfully"
                    );
                } else {
                    warn!(
                        source = meta.source.as_str(),
                        event_id = %meta.event_id,
                        operation = %operation,
                        success = success,
                        "Operation completed with issues"
                    );
                }
            }
            GeneralEvent::OperationFailed { operation, error } => {
                error!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    operation = %operation,
                    error = %error,
                    "Operation failed"
                );
            }
            GeneralEvent::Warning { message, context } => {
                warn!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    message = %message,
                    context = ?context,
                    "Warning"
                );
            }
            GeneralEvent::Error { message, details } => {
                error!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    message = %message,
                    details = ?details,
                    "Error"
                );
            }
            GeneralEvent::DebugLog { message, context } => {
                debug!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    message = %message,
                    context = ?context,
                    "Debug log"
                );
            }
        },
    }
}
