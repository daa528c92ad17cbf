//! Application name: the join key across all three services.

use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::domain::error::NameError;

const MAX_LEN: usize = 100;

/// Validated application name.
///
/// Lowercase alphanumerics plus `-`, `.` and `_`, starting and ending with an
/// alphanumeric. This is the intersection of what GitHub, Vercel and Neon
/// accept as a project name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ApplicationName(String);

impl ApplicationName {
    /// Validate an explicit name.
    ///
    /// # Errors
    ///
    /// Returns a [`NameError`] if the name is empty, too long, or contains
    /// characters not accepted by every service.
    pub fn parse(raw: &str) -> Result<Self, NameError> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(NameError::Empty);
        }
        if name.len() > MAX_LEN {
            return Err(NameError::TooLong(name.to_string()));
        }
        let bytes = name.as_bytes();
        let edge_ok = |b: u8| b.is_ascii_lowercase() || b.is_ascii_digit();
        let inner_ok = |b: u8| edge_ok(b) || matches!(b, b'-' | b'.' | b'_');
        if !edge_ok(bytes[0])
            || !edge_ok(bytes[bytes.len() - 1])
            || !bytes.iter().all(|&b| inner_ok(b))
        {
            return Err(NameError::InvalidCharacters(name.to_string()));
        }
        Ok(Self(name.to_string()))
    }

    /// Derive a name from a directory's basename, lower-casing it first.
    ///
    /// # Errors
    ///
    /// Returns a [`NameError`] if the directory has no usable basename.
    pub fn from_dir(dir: &Path) -> Result<Self, NameError> {
        let base = dir
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        Self::parse(&base)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApplicationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ApplicationName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
