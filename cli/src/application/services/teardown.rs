//! Application service: best-effort removal of everything an earlier run
//! left behind, remote and local.

use std::path::Path;

use crate::application::ports::{
    DatabaseHost, DeploymentHost, ProgressReporter, ProjectFs, RemoteServices, RepositoryHost,
    ServiceClient,
};
use crate::domain::report::Warning;
use crate::domain::resource::{ExternalResource, Inventory, Service};

/// What a teardown pass did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TeardownReport {
    pub deleted: Vec<ExternalResource>,
    pub warnings: Vec<Warning>,
}

impl TeardownReport {
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.deleted.is_empty() && self.warnings.is_empty()
    }
}

/// Delete every present resource in `inventory`.
///
/// A failed deletion becomes a [`Warning::Teardown`]; remaining deletions
/// still run and the caller carries on.
pub async fn purge<V, H, D>(
    services: &RemoteServices<'_, V, H, D>,
    inventory: &Inventory,
    reporter: &impl ProgressReporter,
) -> TeardownReport
where
    V: RepositoryHost,
    H: DeploymentHost,
    D: DatabaseHost,
{
    let mut report = TeardownReport::default();
    for resource in inventory.present() {
        let result = match resource.service {
            Service::Vcs => delete(services.vcs, resource, reporter).await,
            Service::Hosting => delete(services.hosting, resource, reporter).await,
            Service::Database => delete(services.database, resource, reporter).await,
        };
        match result {
            Ok(()) => report.deleted.push(resource.clone()),
            Err(warning) => report.warnings.push(warning),
        }
    }
    report
}

async fn delete(
    client: &impl ServiceClient,
    resource: &ExternalResource,
    reporter: &impl ProgressReporter,
) -> Result<(), Warning> {
    reporter.step(&format!("deleting {resource}..."));
    match client.remove(resource).await {
        Ok(()) => {
            reporter.success(&format!("deleted {resource}"));
            Ok(())
        }
        Err(e) => {
            let warning = Warning::Teardown {
                service: resource.service,
                reason: format!("{e:#}"),
            };
            tracing::warn!(service = %resource.service, error = %e, "teardown failed");
            reporter.warn(&warning.to_string());
            Err(warning)
        }
    }
}

/// Remove local state from a previous run: the VCS metadata directory, then
/// every entry in the project directory. Both removals are best-effort.
pub fn purge_local(fs: &impl ProjectFs, project_dir: &Path) -> Vec<Warning> {
    let mut warnings = Vec::new();
    let git_dir = project_dir.join(".git");
    if fs.exists(&git_dir)
        && let Err(e) = fs.remove_dir_all(&git_dir)
    {
        warnings.push(Warning::LocalCleanup {
            path: git_dir,
            reason: format!("{e:#}"),
        });
    }
    if fs.exists(project_dir)
        && let Err(e) = fs.clear_dir(project_dir)
    {
        warnings.push(Warning::LocalCleanup {
            path: project_dir.to_path_buf(),
            reason: format!("{e:#}"),
        });
    }
    warnings
}
