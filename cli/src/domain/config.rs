//! Domain types and validators for shipstack configuration.
//!
//! Pure functions only, no I/O.

use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;
use crate::domain::readiness::ProbePolicy;

// ── Constants ────────────────────────────────────────────────────────────────

pub const VALID_CONFIG_KEYS: &[&str] = &[
    "readiness.attempts",
    "readiness.delay_secs",
    "auth.login_wait_secs",
    "database.org_id",
    "database.name",
    "database.role",
    "local_dev.enabled",
    "local_dev.port",
    "local_dev.database_port",
    "local_dev.attempts",
    "local_dev.delay_secs",
];

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.shipstack/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ShipstackConfig {
    pub readiness: ReadinessConfig,
    pub auth: AuthConfig,
    pub database: DatabaseConfig,
    pub local_dev: LocalDevConfig,
}

/// Production readiness probe settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReadinessConfig {
    pub attempts: u32,
    pub delay_secs: u64,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            attempts: 30,
            delay_secs: 5,
        }
    }
}

/// Interactive login settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AuthConfig {
    /// How long a browser-based login may take before giving up.
    pub login_wait_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            login_wait_secs: 300,
        }
    }
}

/// Managed database settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Organisation to create projects in. First listed org when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,
    pub name: String,
    pub role: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            org_id: None,
            name: "neondb".to_string(),
            role: "neondb_owner".to_string(),
        }
    }
}

/// Local development server and database container settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LocalDevConfig {
    pub enabled: bool,
    pub port: u16,
    pub database_port: u16,
    pub attempts: u32,
    pub delay_secs: u64,
}

impl Default for LocalDevConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: 3000,
            database_port: 5432,
            attempts: 30,
            delay_secs: 2,
        }
    }
}

impl ShipstackConfig {
    #[must_use]
    pub fn production_probe(&self) -> ProbePolicy {
        ProbePolicy::new(
            self.readiness.attempts,
            Duration::from_secs(self.readiness.delay_secs),
        )
    }

    #[must_use]
    pub fn dev_server_probe(&self) -> ProbePolicy {
        ProbePolicy::new(
            self.local_dev.attempts,
            Duration::from_secs(self.local_dev.delay_secs),
        )
    }

    #[must_use]
    pub fn login_wait(&self) -> Duration {
        Duration::from_secs(self.auth.login_wait_secs)
    }

    /// Apply a validated `key = value` pair.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the key is unknown or the value does not
    /// parse for that key.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_config_key(key)?;
        validate_config_value(key, value)?;
        match key {
            "readiness.attempts" => self.readiness.attempts = parse_num(key, value)?,
            "readiness.delay_secs" => self.readiness.delay_secs = parse_num(key, value)?,
            "auth.login_wait_secs" => self.auth.login_wait_secs = parse_num(key, value)?,
            "database.org_id" => {
                self.database.org_id = (!value.is_empty()).then(|| value.to_string());
            }
            "database.name" => self.database.name = value.to_string(),
            "database.role" => self.database.role = value.to_string(),
            "local_dev.enabled" => self.local_dev.enabled = parse_bool(key, value)?,
            "local_dev.port" => self.local_dev.port = parse_num(key, value)?,
            "local_dev.database_port" => self.local_dev.database_port = parse_num(key, value)?,
            "local_dev.attempts" => self.local_dev.attempts = parse_num(key, value)?,
            "local_dev.delay_secs" => self.local_dev.delay_secs = parse_num(key, value)?,
            _ => anyhow::bail!("Unknown setting: {key}"),
        }
        Ok(())
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<()> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        }
        .into());
    }
    Ok(())
}

/// Validates a configuration value for the given key.
///
/// # Errors
///
/// Returns an error if the value is not valid for the key.
pub fn validate_config_value(key: &str, value: &str) -> Result<()> {
    match key {
        "local_dev.enabled" => parse_bool(key, value).map(drop),
        "local_dev.port" | "local_dev.database_port" => {
            let port: u16 = parse_num(key, value)?;
            if port == 0 {
                return Err(invalid(key, value, "a port between 1 and 65535"));
            }
            Ok(())
        }
        "readiness.attempts" | "local_dev.attempts" => {
            let n: u32 = parse_num(key, value)?;
            if n == 0 {
                return Err(invalid(key, value, "a positive number of attempts"));
            }
            Ok(())
        }
        "readiness.delay_secs" | "local_dev.delay_secs" | "auth.login_wait_secs" => {
            parse_num::<u64>(key, value).map(drop)
        }
        "database.name" | "database.role" if value.trim().is_empty() => {
            Err(invalid(key, value, "a non-empty string"))
        }
        _ => Ok(()),
    }
}

fn parse_num<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(key, value, "a non-negative integer"))
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(invalid(key, value, "true or false")),
    }
}

fn invalid(key: &str, value: &str, expected: &str) -> anyhow::Error {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        expected: expected.to_string(),
    }
    .into()
}

// ── Unit tests ───────────────────────────────────────────────────────────────
