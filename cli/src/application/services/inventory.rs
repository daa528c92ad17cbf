//! Application service: find what already exists for an application name.

use crate::application::ports::{
    DatabaseHost, DeploymentHost, RemoteServices, RepositoryHost, ServiceClient,
};
use crate::domain::report::Warning;
use crate::domain::resource::Inventory;

/// Query all three services for resources named `name`.
///
/// Each lookup is isolated: a failing service is recorded in
/// `Inventory::failures` and the others are still queried.
pub async fn scan<V, H, D>(services: &RemoteServices<'_, V, H, D>, name: &str) -> Inventory
where
    V: RepositoryHost,
    H: DeploymentHost,
    D: DatabaseHost,
{
    let mut inventory = Inventory::default();
    lookup(services.vcs, name, &mut inventory).await;
    lookup(services.hosting, name, &mut inventory).await;
    lookup(services.database, name, &mut inventory).await;
    inventory
}

async fn lookup(client: &impl ServiceClient, name: &str, inventory: &mut Inventory) {
    let service = client.service();
    match client.find(name).await {
        Ok(resource) => {
            tracing::debug!(%service, exists = resource.exists, "lookup finished");
            inventory.record(resource);
        }
        Err(e) => {
            tracing::warn!(%service, error = %e, "lookup failed");
            inventory.record_failure(service, format!("{e:#}"));
        }
    }
}

/// Warnings for every service that could not be queried.
#[must_use]
pub fn failure_warnings(inventory: &Inventory) -> Vec<Warning> {
    inventory
        .failures
        .iter()
        .map(|(service, reason)| Warning::Inventory {
            service: *service,
            reason: reason.clone(),
        })
        .collect()
}
