//! HTTP infrastructure: implements `HttpProbe` with `reqwest`.

use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::HttpProbe;

/// Per-request timeout; one slow answer counts as one failed attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Production `HttpProbe`.
pub struct ReqwestProbe {
    client: reqwest::Client,
}

impl ReqwestProbe {
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("shipstack/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("building HTTP client")?;
        Ok(Self { client })
    }
}

/// Redirects are already followed, so a final 3xx is an unresolved hop.
fn is_ready_status(status: reqwest::StatusCode) -> bool {
    status.is_success()
}

impl HttpProbe for ReqwestProbe {
    async fn is_ready(&self, url: &str) -> bool {
        match self.client.get(url).send().await {
            Ok(resp) => {
                let status = resp.status();
                tracing::debug!(url, %status, "probe answered");
                is_ready_status(status)
            }
            Err(e) => {
                tracing::debug!(url, error = %e, "probe failed");
                false
            }
        }
    }
}
