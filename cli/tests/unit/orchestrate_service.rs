//! End-to-end use-cases over stubs: fresh provision, force rebuild, safe
//! conflict, teardown only, status.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use shipstack_cli::application::services::orchestrate::{self, RunOptions};
use shipstack_cli::domain::app_name::ApplicationName;
use shipstack_cli::domain::config::ShipstackConfig;
use shipstack_cli::domain::conflict::Conflict;
use shipstack_cli::domain::error::{OrchestrationError, error_code};
use shipstack_cli::domain::report::Warning;
use shipstack_cli::domain::resource::Service;
use shipstack_cli::domain::session::RunMode;

use crate::stubs::{StubHttp, World};

fn app() -> ApplicationName {
    ApplicationName::parse("demo-app").unwrap()
}

fn options<'a>(w: &World, mode: RunMode, config: &'a ShipstackConfig) -> RunOptions<'a> {
    RunOptions {
        app_name: app(),
        mode,
        project_dir: w.project_dir(),
        config,
        local_dev: false,
    }
}

#[tokio::test(start_paused = true)]
async fn fresh_name_provisions_everything() {
    let w = World::new();
    let http = StubHttp::ready_on(1);
    let config = ShipstackConfig::default();

    let report = orchestrate::provision(
        &w.remote(),
        &w.local,
        &http,
        &w.reporter,
        options(&w, RunMode::Safe, &config),
    )
    .await
    .unwrap();

    assert_eq!(report.app_name, "demo-app");
    assert_eq!(report.completed_steps.len(), 7);
    assert_eq!(report.production_url.as_deref(), Some("https://demo-app.vercel.app"));
    assert!(!report.has_warnings());
    assert_eq!(w.database.context.borrow().as_deref(), Some("org-default"));
}

#[tokio::test(start_paused = true)]
async fn force_mode_tears_down_before_creating() {
    let w = World::new();
    w.seed_existing("demo-app");
    let dir = w.project_dir();
    std::fs::create_dir_all(dir.join(".git")).unwrap();
    std::fs::write(dir.join("stale.txt"), "x").unwrap();
    let http = StubHttp::ready_on(1);
    let config = ShipstackConfig::default();

    let report = orchestrate::provision(
        &w.remote(),
        &w.local,
        &http,
        &w.reporter,
        options(&w, RunMode::Force, &config),
    )
    .await
    .unwrap();

    let scaffold = w.position("scaffold").unwrap();
    for delete in ["gh delete demo-app", "vercel rm demo-app", "neon delete demo-app"] {
        assert!(w.position(delete).unwrap() < scaffold, "{delete} after scaffold");
    }
    assert!(!dir.join("stale.txt").exists());
    assert_eq!(report.mode, RunMode::Force);
    assert!(!report.has_warnings());
}

#[tokio::test(start_paused = true)]
async fn force_mode_with_nothing_to_delete_runs_every_step() {
    let w = World::new();
    let http = StubHttp::ready_on(1);
    let config = ShipstackConfig::default();

    let report = orchestrate::provision(
        &w.remote(),
        &w.local,
        &http,
        &w.reporter,
        options(&w, RunMode::Force, &config),
    )
    .await
    .unwrap();

    assert_eq!(
        report.completed_steps,
        vec![
            "scaffold",
            "publish-repository",
            "create-database",
            "initial-deploy",
            "inject-config",
            "redeploy",
            "verify-production"
        ]
    );
    assert!(!report.has_warnings());
    assert!(w.reporter.warnings().is_empty());
    assert!(!w.calls().iter().any(|c| c.contains("delete") || c.contains(" rm ")));
}

#[tokio::test(start_paused = true)]
async fn force_mode_carries_on_after_failed_hosting_deletion() {
    let mut w = World::new();
    w.seed_existing("demo-app");
    w.hosting.fail_remove = true;
    let http = StubHttp::ready_on(1);
    let config = ShipstackConfig::default();

    let report = orchestrate::provision(
        &w.remote(),
        &w.local,
        &http,
        &w.reporter,
        options(&w, RunMode::Force, &config),
    )
    .await
    .unwrap();

    assert!(w.position("gh delete demo-app").is_some());
    assert!(w.position("neon delete demo-app").is_some());
    assert!(matches!(
        report.warnings.as_slice(),
        [Warning::Teardown { service: Service::Hosting, .. }]
    ));
    assert_eq!(report.completed_steps.len(), 7);
}

#[tokio::test(start_paused = true)]
async fn force_mode_carries_on_after_failed_database_deletion() {
    let mut w = World::new();
    w.seed_existing("demo-app");
    w.database.fail_remove = true;
    let http = StubHttp::ready_on(1);
    let config = ShipstackConfig::default();

    let report = orchestrate::provision(
        &w.remote(),
        &w.local,
        &http,
        &w.reporter,
        options(&w, RunMode::Force, &config),
    )
    .await
    .unwrap();

    assert!(matches!(
        report.warnings.as_slice(),
        [Warning::Teardown { service: Service::Database, .. }]
    ));
    assert_eq!(report.completed_steps.len(), 7);
}

#[tokio::test]
async fn safe_mode_conflict_creates_nothing() {
    let w = World::new();
    w.database
        .projects
        .borrow_mut()
        .push(("demo-app".into(), "p-old".into()));
    let http = StubHttp::ready_on(1);
    let config = ShipstackConfig::default();

    let err = orchestrate::provision(
        &w.remote(),
        &w.local,
        &http,
        &w.reporter,
        options(&w, RunMode::Safe, &config),
    )
    .await
    .unwrap_err();

    assert_eq!(error_code(&err), "conflict");
    match err.downcast_ref::<OrchestrationError>() {
        Some(OrchestrationError::Conflict { conflicts, .. }) => {
            assert_eq!(
                conflicts.as_slice(),
                [Conflict::Remote {
                    service: Service::Database,
                    name: "demo-app".into()
                }]
            );
        }
        other => panic!("expected conflict, got {other:?}"),
    }
    assert!(err.to_string().contains("--force"));
    assert!(w.calls().is_empty(), "no creation or deletion: {:?}", w.calls());
}

#[tokio::test]
async fn safe_mode_non_empty_directory_conflicts() {
    let w = World::new();
    let dir = w.project_dir();
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(".env"), "X=1").unwrap();
    let http = StubHttp::ready_on(1);
    let config = ShipstackConfig::default();

    let err = orchestrate::provision(
        &w.remote(),
        &w.local,
        &http,
        &w.reporter,
        options(&w, RunMode::Safe, &config),
    )
    .await
    .unwrap_err();

    match err.downcast_ref::<OrchestrationError>() {
        Some(OrchestrationError::Conflict { conflicts, .. }) => {
            assert!(matches!(conflicts.as_slice(), [Conflict::LocalDirectory { .. }]));
        }
        other => panic!("expected conflict, got {other:?}"),
    }
}

#[tokio::test]
async fn safe_mode_query_failure_warns_but_proceeds() {
    let mut w = World::new();
    w.vcs.fail_find = true;
    let http = StubHttp::ready_on(1);
    let config = ShipstackConfig::default();

    let report = orchestrate::provision(
        &w.remote(),
        &w.local,
        &http,
        &w.reporter,
        options(&w, RunMode::Safe, &config),
    )
    .await
    .unwrap();

    assert!(matches!(
        report.warnings.as_slice(),
        [Warning::Inventory { service: Service::Vcs, .. }]
    ));
}

#[tokio::test]
async fn scaffold_failure_reports_creation_error() {
    let mut w = World::new();
    w.local.fail_scaffold = true;
    let http = StubHttp::ready_on(1);
    let config = ShipstackConfig::default();

    let err = orchestrate::provision(
        &w.remote(),
        &w.local,
        &http,
        &w.reporter,
        options(&w, RunMode::Safe, &config),
    )
    .await
    .unwrap_err();

    assert_eq!(error_code(&err), "creation");
    assert!(err.to_string().contains("'scaffold'"));
    assert_eq!(w.calls(), vec!["scaffold"]);
}

#[tokio::test]
async fn destroy_removes_everything_and_reruns_cleanly() {
    let w = World::new();
    w.seed_existing("demo-app");
    let config = ShipstackConfig::default();

    let first = orchestrate::destroy(&w.remote(), &w.local, &w.reporter, &app(), None, &config)
        .await
        .unwrap();
    assert_eq!(first.deleted.len(), 3);

    let second = orchestrate::destroy(&w.remote(), &w.local, &w.reporter, &app(), None, &config)
        .await
        .unwrap();
    assert!(second.is_noop());
}

#[tokio::test]
async fn inspect_reports_without_deleting() {
    let w = World::new();
    w.seed_existing("demo-app");
    w.vcs.delete_scope.set(false);
    let config = ShipstackConfig::default();

    let (inv, warnings) = orchestrate::inspect(&w.remote(), &w.reporter, &app(), &config)
        .await
        .unwrap();

    assert_eq!(inv.present().count(), 3);
    assert!(warnings.is_empty());
    assert!(w.calls().is_empty());
    assert!(!w.vcs.delete_scope.get(), "status never asks for delete rights");
}
