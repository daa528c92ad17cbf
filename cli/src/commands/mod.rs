//! Command implementations

pub mod config;
pub mod down;
pub mod status;
pub mod up;
pub mod version;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::domain::app_name::ApplicationName;

/// Resolve the application name and its project directory.
///
/// An explicit name maps to `./<name>`; without one the current directory
/// is the project and its basename the name. `dir` overrides either.
///
/// # Errors
///
/// Returns an error if the name is invalid or the current directory cannot
/// be determined.
pub fn resolve_target(
    name: Option<&str>,
    dir: Option<&Path>,
) -> Result<(ApplicationName, PathBuf)> {
    let cwd = std::env::current_dir().context("cannot determine current directory")?;
    resolve_target_in(&cwd, name, dir)
}

fn resolve_target_in(
    cwd: &Path,
    name: Option<&str>,
    dir: Option<&Path>,
) -> Result<(ApplicationName, PathBuf)> {
    let (app, default_dir) = match name {
        Some(raw) => {
            let app = ApplicationName::parse(raw)?;
            let path = cwd.join(app.as_str());
            (app, path)
        }
        None => (ApplicationName::from_dir(cwd)?, cwd.to_path_buf()),
    };
    let project_dir = dir.map_or(default_dir, |d| cwd.join(d));
    Ok((app, project_dir))
}
