//! Bounded readiness polling.

use std::time::Duration;

use shipstack_cli::application::services::readiness::wait_until_ready;
use shipstack_cli::domain::readiness::{ProbePolicy, ReadinessOutcome};

use crate::stubs::StubHttp;

#[tokio::test(start_paused = true)]
async fn never_ready_times_out_after_exactly_n_attempts() {
    let http = StubHttp::never();
    let policy = ProbePolicy::new(7, Duration::from_secs(5));
    let started = tokio::time::Instant::now();

    let outcome = wait_until_ready(&http, "https://demo-app.vercel.app", policy).await;

    assert_eq!(outcome, ReadinessOutcome::TimedOut { attempts: 7 });
    assert_eq!(http.probes.get(), 7);
    // six sleeps between seven probes, none after the last
    assert_eq!(started.elapsed(), Duration::from_secs(30));
}

#[tokio::test(start_paused = true)]
async fn ready_stops_polling_immediately() {
    let http = StubHttp::ready_on(3);
    let outcome = wait_until_ready(
        &http,
        "http://localhost:3000",
        ProbePolicy::new(30, Duration::from_secs(2)),
    )
    .await;
    assert_eq!(outcome, ReadinessOutcome::Ready { attempts: 3 });
    assert_eq!(http.probes.get(), 3);
}

#[tokio::test(start_paused = true)]
async fn zero_attempts_still_probes_once() {
    let http = StubHttp::ready_on(1);
    let outcome = wait_until_ready(&http, "x", ProbePolicy::new(0, Duration::ZERO)).await;
    assert!(outcome.is_ready());
    assert_eq!(http.probes.get(), 1);
}
