//! Authentication service: probe, login, re-probe, delete scope, org.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::cell::Cell;
use std::time::Duration;

use shipstack_cli::application::services::auth;
use shipstack_cli::domain::error::{OrchestrationError, error_code};
use shipstack_cli::domain::resource::Service;
use shipstack_cli::domain::session::{AuthStatus, RunMode};

use crate::stubs::{LoginBehaviour, World};

const WAIT: Duration = Duration::from_secs(300);

#[tokio::test]
async fn already_authenticated_skips_login() {
    let w = World::new();
    let status = auth::ensure(&w.vcs, &w.reporter, WAIT).await.unwrap();
    assert_eq!(status, AuthStatus::AlreadyAuthenticated);
    assert_eq!(w.vcs.auth.logins.get(), 0);
}

#[tokio::test]
async fn login_then_single_reprobe() {
    let w = World::new();
    w.hosting.auth.authed.set(false);
    let status = auth::ensure(&w.hosting, &w.reporter, WAIT).await.unwrap();
    assert_eq!(status, AuthStatus::LoggedIn);
    assert_eq!(w.hosting.auth.logins.get(), 1);
}

#[tokio::test]
async fn still_unauthenticated_after_login_is_fatal() {
    let mut w = World::new();
    w.database.auth = crate::stubs::AuthState {
        authed: Cell::new(false),
        behaviour: LoginBehaviour::NoEffect,
        logins: Cell::new(0),
    };
    let err = auth::ensure(&w.database, &w.reporter, WAIT).await.unwrap_err();
    assert_eq!(error_code(&err), "authentication");
    assert_eq!(w.database.auth.logins.get(), 1, "one login, no retry loop");
}

#[tokio::test(start_paused = true)]
async fn login_is_bounded_by_one_wait_period() {
    let mut w = World::new();
    w.vcs.auth = crate::stubs::AuthState {
        authed: Cell::new(false),
        behaviour: LoginBehaviour::Hangs,
        logins: Cell::new(0),
    };
    let err = auth::ensure(&w.vcs, &w.reporter, WAIT).await.unwrap_err();
    match err.downcast_ref::<OrchestrationError>() {
        Some(OrchestrationError::Authentication { service, reason }) => {
            assert_eq!(*service, Service::Vcs);
            assert!(reason.contains("300s"), "{reason}");
        }
        other => panic!("expected authentication error, got {other:?}"),
    }
}

#[tokio::test]
async fn force_mode_upgrades_delete_scope() {
    let w = World::new();
    w.vcs.delete_scope.set(false);
    auth::ensure_all(&w.remote(), RunMode::Force, &w.reporter, WAIT)
        .await
        .unwrap();
    assert!(w.vcs.delete_scope.get());
    assert!(w.calls().contains(&"gh grant delete_repo".to_string()));
}

#[tokio::test]
async fn safe_mode_leaves_scope_alone() {
    let w = World::new();
    w.vcs.delete_scope.set(false);
    let statuses = auth::ensure_all(&w.remote(), RunMode::Safe, &w.reporter, WAIT)
        .await
        .unwrap();
    assert_eq!(statuses.len(), 3);
    assert!(!w.vcs.delete_scope.get());
}

#[tokio::test]
async fn organization_prefers_configured_value() {
    let w = World::new();
    let org = auth::resolve_organization(&w.database, Some("org-pinned"))
        .await
        .unwrap();
    assert_eq!(org, "org-pinned");
    assert_eq!(w.database.context.borrow().as_deref(), Some("org-pinned"));
}

#[tokio::test]
async fn organization_defaults_to_first_listed() {
    let w = World::new();
    let org = auth::resolve_organization(&w.database, None).await.unwrap();
    assert_eq!(org, "org-default");
}

#[tokio::test]
async fn no_organization_is_an_authentication_error() {
    let mut w = World::new();
    w.database.orgs.clear();
    let err = auth::resolve_organization(&w.database, None)
        .await
        .unwrap_err();
    assert_eq!(error_code(&err), "authentication");
}
