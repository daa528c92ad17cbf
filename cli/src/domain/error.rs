//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

use crate::domain::conflict::Conflict;
use crate::domain::resource::Service;

// ── Orchestration errors ──────────────────────────────────────────────────────

/// Fatal errors that abort an orchestration run.
#[derive(Debug, Error)]
pub enum OrchestrationError {
    #[error("{service} is not authenticated: {reason}\n\nLog in manually and re-run.")]
    Authentication { service: Service, reason: String },

    #[error(
        "{} existing resource(s) would conflict with '{app}':\n{}\n\nRe-run with --force (or SHIPSTACK_FORCE=1) to delete them first.",
        conflicts.len(),
        render_conflicts(conflicts)
    )]
    Conflict { app: String, conflicts: Vec<Conflict> },

    #[error("step '{step}' failed{}: {reason}\n\nFix the cause and re-run with --force to start clean.", service_suffix(*service))]
    Creation {
        step: &'static str,
        service: Option<Service>,
        reason: String,
    },
}

impl OrchestrationError {
    /// Stable machine-readable code used by `--json` error output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Authentication { .. } => "authentication",
            Self::Conflict { .. } => "conflict",
            Self::Creation { .. } => "creation",
        }
    }
}

/// Machine-readable code for any error reaching the top level.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> &'static str {
    if let Some(e) = err.downcast_ref::<OrchestrationError>() {
        e.code()
    } else if err.downcast_ref::<ConfigError>().is_some() {
        "config"
    } else if err.downcast_ref::<NameError>().is_some() {
        "invalid_name"
    } else {
        "error"
    }
}

fn render_conflicts(conflicts: &[Conflict]) -> String {
    conflicts
        .iter()
        .map(|c| format!("  - {c}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn service_suffix(service: Option<Service>) -> String {
    service.map_or_else(String::new, |s| format!(" ({s})"))
}

// ── Step errors ───────────────────────────────────────────────────────────────

/// Failure of a single pipeline step.
///
/// Whether it aborts the run is decided by the step's `fatal` flag, not here.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StepError {
    #[error("{reason}")]
    Failed {
        service: Option<Service>,
        reason: String,
    },

    #[error("{target} not ready after {attempts} attempts")]
    NotReady { target: String, attempts: u32 },

    #[error("missing prerequisite: {0}")]
    MissingInput(&'static str),
}

impl StepError {
    pub fn failed(service: Service, reason: impl Into<String>) -> Self {
        Self::Failed {
            service: Some(service),
            reason: reason.into(),
        }
    }

    pub fn local(reason: impl Into<String>) -> Self {
        Self::Failed {
            service: None,
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn service(&self) -> Option<Service> {
        match self {
            Self::Failed { service, .. } => *service,
            Self::NotReady { .. } | Self::MissingInput(_) => None,
        }
    }
}

// ── Name errors ───────────────────────────────────────────────────────────────

/// Errors raised while validating an application name.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NameError {
    #[error("Application name is empty. Pass one explicitly: shipstack up <name>")]
    Empty,

    #[error("Application name '{0}' is longer than 100 characters.")]
    TooLong(String),

    #[error(
        "Invalid application name '{0}': use lowercase letters, digits, '-', '.' or '_', starting and ending with a letter or digit."
    )]
    InvalidCharacters(String),
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\nExpected: {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: String,
    },
}
