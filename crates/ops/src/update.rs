//! The driver update pipeline
//!
//! One pass over session, search, selection, download, install, report.
//! Awaits are strictly sequential; there are no retries, no timeouts,
//! and no spawned tasks. Reclamation runs on every exit path before the
//! result or error is surfaced.

use std::time::Instant;

use drvup_agent::{DownloadOutput, InstallOutput, SearchOutput, SessionLease, UpdateFilter};
use drvup_errors::{Error, OpsError};
use drvup_events::{
    AppEvent, DownloadEvent, EventEmitter, InstallEvent, SearchEvent, SessionEvent,
};
use drvup_types::{DryRunReport, UpdateReport};

use crate::reclaim::Reclaimer;
use crate::select::select_for_install;
use crate::{OperationResult, OpsCtx};

/// Options for one update run
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateOptions {
    /// Report what would be processed without downloading or installing
    pub dry_run: bool,
}

/// Run one driver update pass.
///
/// # Errors
///
/// Returns an error when a stage fails catastrophically: the service is
/// unreachable, or a search, download, or install batch cannot be
/// started. Per-item failures are data in the returned report, never
/// errors here.
pub async fn update(ctx: &OpsCtx, options: &UpdateOptions) -> Result<OperationResult, Error> {
    let start = Instant::now();
    ctx.emit_operation_started("driver update");

    let mut reclaimer = Reclaimer::new();
    let result = drive(ctx, options, &mut reclaimer, start).await;

    // Reclamation runs whether the pipeline finished, short-circuited,
    // or failed; only then is the outcome surfaced
    reclaimer.release_all(ctx).await;

    match &result {
        Ok(_) => ctx.emit_operation_completed("driver update", true),
        Err(e) => ctx.emit_operation_failed("driver update", e.to_string()),
    }

    result
}

async fn drive(
    ctx: &OpsCtx,
    options: &UpdateOptions,
    reclaimer: &mut Reclaimer,
    start: Instant,
) -> Result<OperationResult, Error> {
    ctx.emit(AppEvent::Session(SessionEvent::Opening {
        backend: ctx.service.backend().to_string(),
    }));
    let SessionLease {
        mut session,
        handle,
    } = ctx.service.open_session().await?;
    reclaimer.register(handle);
    ctx.emit(AppEvent::Session(SessionEvent::Opened {
        backend: ctx.service.backend().to_string(),
    }));

    let filter = UpdateFilter::driver_updates();
    ctx.emit(AppEvent::Search(SearchEvent::Started {
        filter: filter.expression(),
    }));
    let SearchOutput {
        items: candidates,
        handles,
    } = session.search(&filter).await?;
    reclaimer.register_all(handles);

    // An empty search is the ordinary no-updates ending, not an error
    if candidates.is_empty() {
        ctx.emit(AppEvent::Search(SearchEvent::NoUpdates));
        return Ok(OperationResult::NoUpdates);
    }
    let searched = candidates.len();
    ctx.emit(AppEvent::Search(SearchEvent::Completed { matched: searched }));

    let titles: Vec<String> = candidates.iter().map(|item| item.title.clone()).collect();
    let mut selected = select_for_install(candidates, options.dry_run);

    if options.dry_run {
        return Ok(OperationResult::DryRun(DryRunReport {
            candidates: titles,
            searched,
        }));
    }

    ctx.emit(AppEvent::Download(DownloadEvent::Started {
        total: selected.len(),
    }));
    let DownloadOutput { handles } = session.download(&mut selected).await?;
    reclaimer.register_all(handles);

    for item in &selected {
        ctx.emit(AppEvent::Download(DownloadEvent::ItemFinished {
            title: item.title.clone(),
            downloaded: item.downloaded,
        }));
    }
    let downloaded = selected.downloaded_count();
    ctx.emit(AppEvent::Download(DownloadEvent::Completed {
        downloaded,
        shortfall: selected.len() - downloaded,
    }));

    // Shortfalls above do not shrink the install set; the install stage
    // is authoritative for every selected item
    ctx.emit(AppEvent::Install(InstallEvent::Started {
        total: selected.len(),
    }));
    let InstallOutput { outcome, handles } = session.install(&selected).await?;
    reclaimer.register_all(handles);

    if outcome.items.len() != selected.len() {
        return Err(OpsError::ResultCountMismatch {
            expected: selected.len(),
            actual: outcome.items.len(),
        }
        .into());
    }

    for (index, (item, result)) in selected.iter().zip(&outcome.items).enumerate() {
        ctx.emit(AppEvent::Install(InstallEvent::ItemReported {
            index,
            title: item.title.clone(),
            result: result.clone(),
        }));
    }
    ctx.emit_debug(format!(
        "{} of {} installs reported success",
        outcome.succeeded_count(),
        outcome.items.len()
    ));
    ctx.emit(AppEvent::Install(InstallEvent::Completed {
        overall: outcome.overall,
        reboot_required: outcome.requires_reboot(),
    }));

    let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    let report = UpdateReport::from_outcome(&selected, &outcome, searched, duration_ms);
    Ok(OperationResult::Applied(report))
}
