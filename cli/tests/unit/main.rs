//! Unit tests for shipstack CLI
//!
//! These tests drive the application services through hand-written port
//! stubs and run fast without external I/O.

mod architecture;
mod auth_service;
mod config_store;
mod inventory_teardown;
mod local_dev_service;
mod orchestrate_service;
mod pipeline_service;
mod readiness_service;
