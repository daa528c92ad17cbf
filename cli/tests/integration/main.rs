//! Integration tests for the shipstack CLI
//!
//! These tests spawn the actual binary. None of them reach GitHub, Vercel or
//! Neon: they cover argument parsing, validation that runs before any remote
//! call, and the configuration commands.
