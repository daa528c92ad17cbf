//! Inventory scans and best-effort teardown.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use shipstack_cli::application::services::{inventory, teardown};
use shipstack_cli::domain::report::Warning;
use shipstack_cli::domain::resource::Service;

use crate::stubs::World;

#[tokio::test]
async fn scan_finds_each_service() {
    let w = World::new();
    w.seed_existing("demo-app");
    let inv = inventory::scan(&w.remote(), "demo-app").await;
    assert_eq!(inv.present().count(), 3);
    assert_eq!(
        inv.get(Service::Database).unwrap().id.as_deref(),
        Some("p-old-demo-app")
    );
    assert!(inv.failures.is_empty());
}

#[tokio::test]
async fn query_failure_is_recorded_not_treated_as_absent() {
    let mut w = World::new();
    w.seed_existing("demo-app");
    w.hosting.fail_find = true;

    let inv = inventory::scan(&w.remote(), "demo-app").await;

    assert!(inv.get(Service::Hosting).is_none());
    assert!(inv.failures.contains_key(&Service::Hosting));
    // the other two were still queried
    assert_eq!(inv.present().count(), 2);
    let warnings = inventory::failure_warnings(&inv);
    assert!(matches!(
        warnings.as_slice(),
        [Warning::Inventory { service: Service::Hosting, .. }]
    ));
}

#[tokio::test]
async fn teardown_twice_is_idempotent() {
    let w = World::new();
    w.seed_existing("demo-app");

    let first = inventory::scan(&w.remote(), "demo-app").await;
    let report = teardown::purge(&w.remote(), &first, &w.reporter).await;
    assert_eq!(report.deleted.len(), 3);
    assert!(report.warnings.is_empty());

    let second = inventory::scan(&w.remote(), "demo-app").await;
    assert_eq!(second.present().count(), 0);
    let report = teardown::purge(&w.remote(), &second, &w.reporter).await;
    assert!(report.is_noop());
}

#[tokio::test]
async fn one_failed_deletion_does_not_stop_the_others() {
    let mut w = World::new();
    w.seed_existing("demo-app");
    w.vcs.fail_remove = true;

    let inv = inventory::scan(&w.remote(), "demo-app").await;
    let report = teardown::purge(&w.remote(), &inv, &w.reporter).await;

    let deleted: Vec<_> = report.deleted.iter().map(|r| r.service).collect();
    assert_eq!(deleted, vec![Service::Hosting, Service::Database]);
    assert!(matches!(
        report.warnings.as_slice(),
        [Warning::Teardown { service: Service::Vcs, .. }]
    ));
    assert_eq!(w.reporter.warnings().len(), 1);
}

#[test]
fn purge_local_clears_contents_but_keeps_directory() {
    let w = World::new();
    let dir = w.project_dir();
    std::fs::create_dir_all(dir.join(".git/objects")).unwrap();
    std::fs::create_dir_all(dir.join("src")).unwrap();
    std::fs::write(dir.join(".env"), "DATABASE_URL=x").unwrap();

    let warnings = teardown::purge_local(&w.local, &dir);

    assert!(warnings.is_empty());
    assert!(dir.is_dir());
    assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);
}

#[test]
fn purge_local_without_directory_is_quiet() {
    let w = World::new();
    assert!(teardown::purge_local(&w.local, &w.project_dir()).is_empty());
}
