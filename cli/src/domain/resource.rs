//! External resource identity and the per-application inventory.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// The three service kinds managed for one application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    /// Version-control host (GitHub).
    Vcs,
    /// Hosting/deployment platform (Vercel).
    Hosting,
    /// Managed database (Neon).
    Database,
}

impl Service {
    /// All services in inventory and teardown order.
    pub const ALL: [Self; 3] = [Self::Vcs, Self::Hosting, Self::Database];
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Vcs => "GitHub",
            Self::Hosting => "Vercel",
            Self::Database => "Neon",
        })
    }
}

/// A resource on one external service that matches the application name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExternalResource {
    pub service: Service,
    pub name: String,
    /// Only set where deletion needs an identifier distinct from the name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub exists: bool,
}

impl ExternalResource {
    #[must_use]
    pub fn present(service: Service, name: &str, id: Option<String>) -> Self {
        Self {
            service,
            name: name.to_string(),
            id,
            exists: true,
        }
    }

    #[must_use]
    pub fn absent(service: Service, name: &str) -> Self {
        Self {
            service,
            name: name.to_string(),
            id: None,
            exists: false,
        }
    }
}

impl fmt::Display for ExternalResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{} '{}' ({id})", self.service, self.name),
            None => write!(f, "{} '{}'", self.service, self.name),
        }
    }
}

/// Result of querying all three services for one application name.
///
/// A service whose query failed has no entry in `resources` and one in
/// `failures`; callers treat it as nothing-to-delete but must surface it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Inventory {
    pub resources: BTreeMap<Service, ExternalResource>,
    pub failures: BTreeMap<Service, String>,
}

impl Inventory {
    pub fn record(&mut self, resource: ExternalResource) {
        self.failures.remove(&resource.service);
        self.resources.insert(resource.service, resource);
    }

    pub fn record_failure(&mut self, service: Service, reason: impl Into<String>) {
        self.resources.remove(&service);
        self.failures.insert(service, reason.into());
    }

    #[must_use]
    pub fn get(&self, service: Service) -> Option<&ExternalResource> {
        self.resources.get(&service)
    }

    /// Resources that currently exist, in service order.
    pub fn present(&self) -> impl Iterator<Item = &ExternalResource> {
        self.resources.values().filter(|r| r.exists)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.present().next().is_none()
    }
}
