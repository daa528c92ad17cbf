//! Readiness probe state machine.
//!
//! `Polling(attempt) -> Ready` on success, `Polling(attempt) ->
//! Polling(attempt + 1)` on failure while attempts remain, otherwise
//! `TimedOut`. `Ready` and `TimedOut` are terminal.

use std::time::Duration;

use serde::Serialize;

/// Attempt budget and spacing for one polling target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbePolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl ProbePolicy {
    #[must_use]
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeState {
    /// About to make attempt number `n` (1-based).
    Polling(u32),
    Ready { attempts: u32 },
    TimedOut { attempts: u32 },
}

impl ProbeState {
    #[must_use]
    pub fn start() -> Self {
        Self::Polling(1)
    }

    /// Feed the result of the current attempt.
    #[must_use]
    pub fn advance(self, success: bool, max_attempts: u32) -> Self {
        match self {
            Self::Polling(n) if success => Self::Ready { attempts: n },
            Self::Polling(n) if n >= max_attempts => Self::TimedOut { attempts: n },
            Self::Polling(n) => Self::Polling(n + 1),
            terminal => terminal,
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Polling(_))
    }
}

/// Terminal result of one probe invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReadinessOutcome {
    Ready { attempts: u32 },
    TimedOut { attempts: u32 },
}

impl ReadinessOutcome {
    #[must_use]
    pub fn is_ready(self) -> bool {
        matches!(self, Self::Ready { .. })
    }
}
