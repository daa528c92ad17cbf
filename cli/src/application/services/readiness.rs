//! Application service: bounded HTTP readiness polling.

use crate::application::ports::HttpProbe;
use crate::domain::readiness::{ProbePolicy, ProbeState, ReadinessOutcome};

/// Poll `url` until it answers or the attempt budget runs out.
///
/// Makes at most `policy.attempts` requests, sleeping `policy.delay` between
/// them (not after the last). Never fails: exhausting the budget yields
/// [`ReadinessOutcome::TimedOut`].
pub async fn wait_until_ready(
    http: &impl HttpProbe,
    url: &str,
    policy: ProbePolicy,
) -> ReadinessOutcome {
    let mut state = ProbeState::start();
    loop {
        let ok = http.is_ready(url).await;
        state = state.advance(ok, policy.attempts);
        match state {
            ProbeState::Ready { attempts } => return ReadinessOutcome::Ready { attempts },
            ProbeState::TimedOut { attempts } => {
                tracing::warn!(url, attempts, "readiness budget exhausted");
                return ReadinessOutcome::TimedOut { attempts };
            }
            ProbeState::Polling(next) => {
                tracing::debug!(url, next, "not ready yet");
                tokio::time::sleep(policy.delay).await;
            }
        }
    }
}
