//! Safe-mode conflict detection.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::resource::{Inventory, Service};

/// One reason safe mode refuses to proceed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Conflict {
    /// A same-named resource already exists on a service.
    Remote { service: Service, name: String },
    /// The local project directory already has entries (dotfiles included).
    LocalDirectory { path: PathBuf },
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote { service, name } => write!(f, "{service} already has '{name}'"),
            Self::LocalDirectory { path } => {
                write!(f, "local directory {} is not empty", path.display())
            }
        }
    }
}

/// Collect every conflict for a run in safe mode.
///
/// Remote conflicts come out in service order, followed by the local
/// directory conflict if any.
#[must_use]
pub fn detect_conflicts(
    inventory: &Inventory,
    local_dir_non_empty: bool,
    project_dir: &Path,
) -> Vec<Conflict> {
    let mut conflicts: Vec<Conflict> = inventory
        .present()
        .map(|r| Conflict::Remote {
            service: r.service,
            name: r.name.clone(),
        })
        .collect();
    if local_dir_non_empty {
        conflicts.push(Conflict::LocalDirectory {
            path: project_dir.to_path_buf(),
        });
    }
    conflicts
}
