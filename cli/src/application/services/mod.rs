//! Application services: use-case orchestration.
//!
//! Each service module implements a single use-case by composing domain logic
//! with port trait calls. Services import only from `crate::domain` and
//! `crate::application::ports`, never from `crate::infra`, `crate::commands`,
//! or `crate::output`.

pub mod auth;
pub mod config_service;
pub mod conflicts;
pub mod inventory;
pub mod local_dev;
pub mod orchestrate;
pub mod pipeline;
pub mod readiness;
pub mod teardown;
