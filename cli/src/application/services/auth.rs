//! Application service: make sure every service has a usable session.

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::Result;

use crate::application::ports::{
    DatabaseHost, DeploymentHost, ProgressReporter, RemoteServices, RepositoryHost, ServiceClient,
};
use crate::domain::error::OrchestrationError;
use crate::domain::resource::Service;
use crate::domain::session::{AuthStatus, RunMode};

/// Ensure one service is authenticated.
///
/// Probes first. When unauthenticated, runs the interactive login bounded by
/// a single `login_wait` period (the login is paced by the user, not the
/// service), then probes exactly once more.
///
/// # Errors
///
/// Returns [`OrchestrationError::Authentication`] if the second probe still
/// reports no session, or the login does not finish within `login_wait`.
pub async fn ensure(
    client: &impl ServiceClient,
    reporter: &impl ProgressReporter,
    login_wait: Duration,
) -> Result<AuthStatus> {
    let service = client.service();
    if probe(client).await {
        return Ok(AuthStatus::AlreadyAuthenticated);
    }

    reporter.warn(&format!(
        "not logged in to {service}; complete the login it opens"
    ));
    match tokio::time::timeout(login_wait, client.login()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            tracing::warn!(%service, error = %e, "login command failed");
        }
        Err(_) => {
            return Err(OrchestrationError::Authentication {
                service,
                reason: format!("login did not finish within {}s", login_wait.as_secs()),
            }
            .into());
        }
    }

    if probe(client).await {
        reporter.success(&format!("logged in to {service}"));
        Ok(AuthStatus::LoggedIn)
    } else {
        Err(OrchestrationError::Authentication {
            service,
            reason: "still not logged in after the login flow".to_string(),
        }
        .into())
    }
}

async fn probe(client: &impl ServiceClient) -> bool {
    match client.auth_status().await {
        Ok(ok) => ok,
        Err(e) => {
            tracing::debug!(service = %client.service(), error = %e, "auth status probe failed");
            false
        }
    }
}

/// Ensure the VCS session can delete repositories.
///
/// A capability upgrade of the existing session, not a new login.
///
/// # Errors
///
/// Returns [`OrchestrationError::Authentication`] if the grant fails.
pub async fn ensure_delete_scope(
    vcs: &impl RepositoryHost,
    reporter: &impl ProgressReporter,
) -> Result<()> {
    if vcs.has_delete_scope().await.unwrap_or(false) {
        return Ok(());
    }
    reporter.step("requesting repository delete permission...");
    vcs.grant_delete_scope()
        .await
        .map_err(|e| OrchestrationError::Authentication {
            service: Service::Vcs,
            reason: format!("could not obtain delete permission: {e:#}"),
        })?;
    Ok(())
}

/// Authenticate all three services, then upgrade VCS rights in force mode.
///
/// # Errors
///
/// Returns the first [`OrchestrationError::Authentication`] encountered.
pub async fn ensure_all<V, H, D>(
    services: &RemoteServices<'_, V, H, D>,
    mode: RunMode,
    reporter: &impl ProgressReporter,
    login_wait: Duration,
) -> Result<BTreeMap<Service, AuthStatus>>
where
    V: RepositoryHost,
    H: DeploymentHost,
    D: DatabaseHost,
{
    let mut statuses = BTreeMap::new();
    statuses.insert(Service::Vcs, ensure(services.vcs, reporter, login_wait).await?);
    statuses.insert(
        Service::Hosting,
        ensure(services.hosting, reporter, login_wait).await?,
    );
    statuses.insert(
        Service::Database,
        ensure(services.database, reporter, login_wait).await?,
    );
    if mode == RunMode::Force {
        ensure_delete_scope(services.vcs, reporter).await?;
    }
    Ok(statuses)
}

/// Pick the database organisation and make it the active context.
///
/// # Errors
///
/// Returns [`OrchestrationError::Authentication`] for the database service
/// if no organisation is available or the context cannot be set.
pub async fn resolve_organization(
    database: &impl DatabaseHost,
    configured: Option<&str>,
) -> Result<String> {
    let org_id = if let Some(id) = configured {
        id.to_string()
    } else {
        let orgs = database
            .list_orgs()
            .await
            .map_err(|e| OrchestrationError::Authentication {
                service: Service::Database,
                reason: format!("could not list organizations: {e:#}"),
            })?;
        orgs.into_iter()
            .next()
            .ok_or_else(|| OrchestrationError::Authentication {
                service: Service::Database,
                reason: "the account has no organization".to_string(),
            })?
    };
    database
        .set_context(&org_id)
        .await
        .map_err(|e| OrchestrationError::Authentication {
            service: Service::Database,
            reason: format!("could not select organization {org_id}: {e:#}"),
        })?;
    Ok(org_id)
}
