//! Application service: safe-mode conflict check.

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::ProjectFs;
use crate::domain::app_name::ApplicationName;
use crate::domain::conflict::detect_conflicts;
use crate::domain::error::OrchestrationError;
use crate::domain::resource::Inventory;

/// Refuse to proceed if anything named `app` already exists.
///
/// # Errors
///
/// Returns [`OrchestrationError::Conflict`] listing every conflict, or an
/// error if the project directory cannot be read.
pub fn ensure_no_conflicts(
    fs: &impl ProjectFs,
    inventory: &Inventory,
    app: &ApplicationName,
    project_dir: &Path,
) -> Result<()> {
    let local_non_empty = fs
        .is_non_empty(project_dir)
        .with_context(|| format!("reading {}", project_dir.display()))?;
    let conflicts = detect_conflicts(inventory, local_non_empty, project_dir);
    if conflicts.is_empty() {
        return Ok(());
    }
    Err(OrchestrationError::Conflict {
        app: app.to_string(),
        conflicts,
    }
    .into())
}
