//! Pipeline tests against a scripted service

mod common;

use common::{Call, MockProbe, MockService, Script};
use drvup_agent::HandleKind;
use drvup_config::Config;
use drvup_errors::{AgentError, Error, OpsError};
use drvup_events::{
    AppEvent, CleanupEvent, DownloadEvent, EventReceiver, GeneralEvent, SearchEvent,
};
use drvup_ops::{update, OperationResult, OpsContextBuilder, OpsCtx, UpdateOptions};
use drvup_types::{ItemResult, ResultCode, UpdateItem};

fn ctx_with(script: Script) -> (OpsCtx, EventReceiver, MockProbe) {
    let service = MockService::new(script);
    let probe = service.probe();
    let (tx, rx) = drvup_events::channel();
    let ctx = OpsContextBuilder::new()
        .with_service(Box::new(service))
        .with_event_sender(tx)
        .with_config(Config::default())
        .build()
        .unwrap();
    (ctx, rx, probe)
}

fn drain(rx: &mut EventReceiver) -> Vec<AppEvent> {
    let mut events = Vec::new();
    while let Ok(message) = rx.try_recv() {
        events.push(message.event);
    }
    events
}

fn two_drivers() -> Vec<UpdateItem> {
    vec![
        UpdateItem::new("drv-audio", "Audio Driver 1.2"),
        UpdateItem::new("drv-net", "Network Driver 4.0"),
    ]
}

#[tokio::test]
async fn applies_two_drivers_in_order() {
    let (ctx, mut rx, probe) = ctx_with(Script {
        items: two_drivers(),
        ..Script::default()
    });

    let result = update(&ctx, &UpdateOptions::default()).await.unwrap();
    assert!(result.to_json().unwrap().contains(r#""type": "Applied""#));
    let report = match result {
        OperationResult::Applied(report) => report,
        other => panic!("expected an applied report, got {other:?}"),
    };

    assert_eq!(report.searched, 2);
    assert_eq!(report.overall, ResultCode::Succeeded);
    assert!(!report.reboot_required);
    assert_eq!(report.items.len(), 2);
    assert_eq!(report.items[0].title, "Audio Driver 1.2");
    assert_eq!(report.items[1].result.code, ResultCode::Succeeded);

    let ids = vec!["drv-audio".to_string(), "drv-net".to_string()];
    assert_eq!(
        probe.calls(),
        vec![
            Call::OpenSession,
            Call::Search("IsInstalled=0 AND Type='Driver'".to_string()),
            Call::Download(ids.clone()),
            Call::Install(ids),
        ]
    );
    assert!(probe.is_balanced());

    let events = drain(&mut rx);
    assert!(matches!(
        events.first(),
        Some(AppEvent::General(GeneralEvent::OperationStarted { .. }))
    ));
    assert!(matches!(
        events.last(),
        Some(AppEvent::General(GeneralEvent::OperationCompleted { success: true, .. }))
    ));
}

#[tokio::test]
async fn handles_are_released_newest_first() {
    let (ctx, _rx, probe) = ctx_with(Script {
        items: two_drivers(),
        ..Script::default()
    });

    update(&ctx, &UpdateOptions::default()).await.unwrap();

    assert_eq!(probe.opened(), 6);
    assert_eq!(
        probe.release_order(),
        vec![
            HandleKind::InstallResult,
            HandleKind::Installer,
            HandleKind::Downloader,
            HandleKind::ItemCollection,
            HandleKind::Searcher,
            HandleKind::Session,
        ]
    );
}

#[tokio::test]
async fn empty_search_ends_the_run_without_download_or_install() {
    let (ctx, mut rx, probe) = ctx_with(Script::default());

    let result = update(&ctx, &UpdateOptions::default()).await.unwrap();

    assert!(matches!(result, OperationResult::NoUpdates));
    assert!(result.is_success());
    assert_eq!(probe.calls().len(), 2);
    assert_eq!(probe.opened(), 3);
    assert!(probe.is_balanced());

    let events = drain(&mut rx);
    assert!(events
        .iter()
        .any(|e| matches!(e, AppEvent::Search(SearchEvent::NoUpdates))));
    assert!(!events
        .iter()
        .any(|e| matches!(e, AppEvent::Download(_) | AppEvent::Install(_))));
}

#[tokio::test]
async fn dry_run_stops_after_search() {
    let (ctx, _rx, probe) = ctx_with(Script {
        items: two_drivers(),
        ..Script::default()
    });

    let result = update(&ctx, &UpdateOptions { dry_run: true })
        .await
        .unwrap();
    let report = match result {
        OperationResult::DryRun(report) => report,
        other => panic!("expected a dry-run report, got {other:?}"),
    };

    assert_eq!(report.searched, 2);
    assert_eq!(
        report.candidates,
        vec!["Audio Driver 1.2", "Network Driver 4.0"]
    );
    assert_eq!(
        probe.calls(),
        vec![
            Call::OpenSession,
            Call::Search("IsInstalled=0 AND Type='Driver'".to_string()),
        ]
    );
    // Session plus the two search handles, nothing install-side
    assert_eq!(probe.opened(), 3);
    assert!(probe.is_balanced());
}

#[tokio::test]
async fn download_shortfall_still_installs_every_selected_item() {
    let (ctx, mut rx, probe) = ctx_with(Script {
        items: two_drivers(),
        download_ok: vec![true, false],
        results: Some(vec![
            ItemResult::succeeded(),
            ItemResult::new(ResultCode::Failed, -2_145_107_921, false),
        ]),
        ..Script::default()
    });

    let result = update(&ctx, &UpdateOptions::default()).await.unwrap();
    let report = match result {
        OperationResult::Applied(report) => report,
        other => panic!("expected an applied report, got {other:?}"),
    };

    let installed: Vec<String> = probe
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            Call::Install(ids) => Some(ids),
            _ => None,
        })
        .flatten()
        .collect();
    assert_eq!(installed, vec!["drv-audio", "drv-net"]);

    assert_eq!(report.overall, ResultCode::SucceededWithErrors);
    assert_eq!(report.items[1].result.code, ResultCode::Failed);
    assert_eq!(
        report.items[1].result.native_code_hex(),
        Some("0x8024402F".to_string())
    );

    let events = drain(&mut rx);
    assert!(events.iter().any(|e| matches!(
        e,
        AppEvent::Download(DownloadEvent::Completed {
            downloaded: 1,
            shortfall: 1,
        })
    )));
}

#[tokio::test]
async fn search_failure_still_releases_the_session() {
    let (ctx, mut rx, probe) = ctx_with(Script {
        items: two_drivers(),
        fail_search: true,
        ..Script::default()
    });

    let err = update(&ctx, &UpdateOptions::default()).await.unwrap_err();

    assert!(matches!(err, Error::Agent(AgentError::SearchFailed { .. })));
    assert_eq!(probe.calls().len(), 2);
    assert_eq!(probe.opened(), 1);
    assert!(probe.is_balanced());

    let events = drain(&mut rx);
    assert!(events.iter().any(|e| matches!(
        e,
        AppEvent::Cleanup(CleanupEvent::HandleReleased { kind }) if kind == "session"
    )));
    assert!(matches!(
        events.last(),
        Some(AppEvent::General(GeneralEvent::OperationFailed { .. }))
    ));
}

#[tokio::test]
async fn release_failure_never_masks_a_successful_run() {
    let (ctx, mut rx, probe) = ctx_with(Script {
        items: two_drivers(),
        fail_release: Some(HandleKind::Session),
        ..Script::default()
    });

    let result = update(&ctx, &UpdateOptions::default()).await.unwrap();

    assert!(matches!(result, OperationResult::Applied(_)));
    // The session handle stays open; everything acquired after it is gone
    assert_eq!(probe.opened(), 6);
    assert_eq!(probe.released(), 5);

    let events = drain(&mut rx);
    assert!(events.iter().any(|e| matches!(
        e,
        AppEvent::Cleanup(CleanupEvent::ReleaseFailed { kind, .. }) if kind == "session"
    )));
    assert!(matches!(
        events.last(),
        Some(AppEvent::General(GeneralEvent::OperationCompleted { success: true, .. }))
    ));
}

#[tokio::test]
async fn reboot_demand_from_either_level() {
    let (ctx, _rx, _probe) = ctx_with(Script {
        items: vec![UpdateItem::new("drv-gpu", "GPU Driver 3.3")],
        results: Some(vec![ItemResult::new(ResultCode::Succeeded, 0, true)]),
        ..Script::default()
    });
    let result = update(&ctx, &UpdateOptions::default()).await.unwrap();
    let report = match result {
        OperationResult::Applied(report) => report,
        other => panic!("expected an applied report, got {other:?}"),
    };
    assert!(report.reboot_required);

    let (ctx, _rx, _probe) = ctx_with(Script {
        items: vec![UpdateItem::new("drv-gpu", "GPU Driver 3.3")],
        service_reboot: true,
        ..Script::default()
    });
    let result = update(&ctx, &UpdateOptions::default()).await.unwrap();
    let report = match result {
        OperationResult::Applied(report) => report,
        other => panic!("expected an applied report, got {other:?}"),
    };
    assert!(report.reboot_required);
}

#[tokio::test]
async fn result_count_mismatch_is_fatal_but_still_reclaims() {
    let (ctx, _rx, probe) = ctx_with(Script {
        items: two_drivers(),
        result_count: Some(1),
        ..Script::default()
    });

    let err = update(&ctx, &UpdateOptions::default()).await.unwrap_err();

    assert!(matches!(
        err,
        Error::Ops(OpsError::ResultCountMismatch {
            expected: 2,
            actual: 1,
        })
    ));
    assert_eq!(probe.opened(), 6);
    assert!(probe.is_balanced());
}

#[tokio::test]
async fn unreachable_service_reports_failure() {
    let (ctx, mut rx, probe) = ctx_with(Script {
        fail_open: true,
        ..Script::default()
    });

    let err = update(&ctx, &UpdateOptions::default()).await.unwrap_err();

    assert!(matches!(
        err,
        Error::Agent(AgentError::ServiceUnavailable { .. })
    ));
    assert_eq!(probe.calls(), vec![Call::OpenSession]);
    assert_eq!(probe.opened(), 0);

    let events = drain(&mut rx);
    assert!(matches!(
        events.last(),
        Some(AppEvent::General(GeneralEvent::OperationFailed { .. }))
    ));
}
