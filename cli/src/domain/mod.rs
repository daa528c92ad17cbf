//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod app_name;
pub mod config;
pub mod conflict;
pub mod deploy;
pub mod dotenv;
pub mod error;
pub mod pipeline;
pub mod readiness;
pub mod report;
pub mod resource;
pub mod session;

pub use app_name::ApplicationName;
pub use config::{ShipstackConfig, validate_config_key, validate_config_value};
pub use conflict::{Conflict, detect_conflicts};
pub use error::{ConfigError, NameError, OrchestrationError, StepError};
pub use pipeline::{PipelineStep, ScaffoldProfile, StepKind};
pub use readiness::{ProbePolicy, ProbeState, ReadinessOutcome};
pub use report::{RunReport, Warning};
pub use resource::{ExternalResource, Inventory, Service};
pub use session::{AuthStatus, OrchestrationSession, RunMode, Secret};
