//! Integration tests for the sim backend

use drvup_agent::{SimService, UpdateFilter, UpdateService};
use drvup_types::{ResultCode, SelectedSet};
use tempfile::TempDir;

async fn service_with(catalog: &str) -> (SimService, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.toml");
    tokio::fs::write(&path, catalog).await.unwrap();
    (SimService::new(path), dir)
}

const TWO_DRIVER_CATALOG: &str = r#"
[service]
reboot_required = false

[[update]]
id = "drv-audio"
title = "Audio Driver 1.2"

[[update]]
id = "drv-net"
title = "Network Driver 4.0"
download = "fail"
result_code = 4
native_code = -2145107921

[[update]]
id = "fw-cam"
title = "Camera Firmware"
category = "firmware"

[[update]]
id = "drv-old"
title = "Already Installed Driver"
installed = true
"#;

#[tokio::test]
async fn search_applies_the_driver_filter() {
    let (service, _dir) = service_with(TWO_DRIVER_CATALOG).await;
    let mut lease = service.open_session().await.unwrap();

    let output = lease
        .session
        .search(&UpdateFilter::driver_updates())
        .await
        .unwrap();

    let titles: Vec<&str> = output.items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["Audio Driver 1.2", "Network Driver 4.0"]);
    assert!(output.items.iter().all(drvup_types::UpdateItem::is_driver));
}

#[tokio::test]
async fn download_flips_flags_per_script() {
    let (service, _dir) = service_with(TWO_DRIVER_CATALOG).await;
    let mut lease = service.open_session().await.unwrap();
    let search = lease
        .session
        .search(&UpdateFilter::driver_updates())
        .await
        .unwrap();

    let mut selected = SelectedSet::new(search.items);
    lease.session.download(&mut selected).await.unwrap();

    assert!(selected.get(0).unwrap().downloaded);
    assert!(!selected.get(1).unwrap().downloaded);
    assert_eq!(selected.downloaded_count(), 1);
}

#[tokio::test]
async fn install_reports_scripted_results_in_selection_order() {
    let (service, _dir) = service_with(TWO_DRIVER_CATALOG).await;
    let mut lease = service.open_session().await.unwrap();
    let search = lease
        .session
        .search(&UpdateFilter::driver_updates())
        .await
        .unwrap();

    let mut selected = SelectedSet::new(search.items);
    lease.session.download(&mut selected).await.unwrap();
    let install = lease.session.install(&selected).await.unwrap();

    let outcome = install.outcome;
    assert_eq!(outcome.items.len(), selected.len());
    assert_eq!(outcome.items[0].code, ResultCode::Succeeded);
    assert_eq!(outcome.items[1].code, ResultCode::Failed);
    assert_eq!(
        outcome.items[1].native_code_hex().as_deref(),
        Some("0x8024402F")
    );
    assert_eq!(outcome.overall, ResultCode::SucceededWithErrors);
    assert!(!outcome.reboot_required);
    assert!(!outcome.requires_reboot());
}

#[tokio::test]
async fn per_item_reboot_flag_drives_aggregation() {
    let catalog = r#"
[[update]]
id = "drv-gpu"
title = "GPU Driver"
reboot = true
"#;
    let (service, _dir) = service_with(catalog).await;
    let mut lease = service.open_session().await.unwrap();
    let search = lease
        .session
        .search(&UpdateFilter::driver_updates())
        .await
        .unwrap();

    let mut selected = SelectedSet::new(search.items);
    lease.session.download(&mut selected).await.unwrap();
    let install = lease.session.install(&selected).await.unwrap();

    // Service flag stays false; the item flag alone forces the restart
    assert!(!install.outcome.reboot_required);
    assert!(install.outcome.items[0].reboot_required);
    assert!(install.outcome.requires_reboot());
}

#[tokio::test]
async fn every_acquired_handle_can_be_released_once() {
    let (service, _dir) = service_with(TWO_DRIVER_CATALOG).await;
    let ledger = service.ledger();

    let mut lease = service.open_session().await.unwrap();
    let mut search = lease
        .session
        .search(&UpdateFilter::driver_updates())
        .await
        .unwrap();
    let mut selected = SelectedSet::new(std::mem::take(&mut search.items));
    let mut download = lease.session.download(&mut selected).await.unwrap();
    let mut install = lease.session.install(&selected).await.unwrap();

    // Session + searcher + item collection + downloader + installer + result
    assert_eq!(ledger.opened_count(), 6);

    for handle in search
        .handles
        .iter_mut()
        .chain(download.handles.iter_mut())
        .chain(install.handles.iter_mut())
    {
        handle.release().await.unwrap();
        // Releasing again must stay a no-op
        handle.release().await.unwrap();
    }
    lease.handle.release().await.unwrap();

    assert_eq!(ledger.released_count(), 6);
    assert!(ledger.is_balanced());
}

#[tokio::test]
async fn missing_catalog_is_service_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let service = SimService::new(dir.path().join("absent.toml"));

    let err = service.open_session().await.unwrap_err();
    assert!(err.to_string().contains("update service unavailable"));
}

#[tokio::test]
async fn malformed_catalog_is_service_unavailable() {
    let (service, _dir) = service_with("not = [valid").await;

    let err = service.open_session().await.unwrap_err();
    assert!(err.to_string().contains("update service unavailable"));
}
