//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, the
//! GitHub, Vercel and Neon CLIs, the local toolchain, filesystem access,
//! HTTP probing and configuration storage.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod command_runner;
pub mod config;
pub mod fs;
pub mod github;
pub mod http;
pub mod local;
pub mod neon;
pub mod vercel;
