//! Deployment output parsing and stable domain derivation.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::app_name::ApplicationName;

/// Suffix of hosts the hosting platform assigns to deployments.
pub const PLATFORM_SUFFIX: &str = ".vercel.app";

#[allow(clippy::expect_used)] // Compile-time constant pattern
static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https://[A-Za-z0-9.-]+(?::\d+)?(?:/[^\s]*)?").expect("valid regex"));

/// Extract the deployment URL from deploy command output.
///
/// The deploy CLI prints progress lines followed by the deployment URL; the
/// last URL in the output wins.
#[must_use]
pub fn parse_deployment_url(output: &str) -> Option<String> {
    URL_RE
        .find_iter(output)
        .last()
        .map(|m| m.as_str().trim_end_matches('/').to_string())
}

/// Host part of an `https://` URL.
#[must_use]
pub fn url_host(url: &str) -> Option<&str> {
    let rest = url.strip_prefix("https://").or_else(|| url.strip_prefix("http://"))?;
    let host = rest.split(['/', ':', '?', '#']).next()?;
    (!host.is_empty()).then_some(host)
}

/// Derive the stable project domain from a per-deployment URL.
///
/// Per-deployment hosts on the platform look like
/// `<app>-<hash>-<team>.vercel.app`; the project itself is served from
/// `<app>.vercel.app`. Custom hosts are returned unchanged.
#[must_use]
pub fn project_domain(deployment_url: &str, app: &ApplicationName) -> Option<String> {
    let host = url_host(deployment_url)?;
    if host.ends_with(PLATFORM_SUFFIX) {
        Some(format!("{}{PLATFORM_SUFFIX}", app.as_str().replace(['.', '_'], "-")))
    } else {
        Some(host.to_string())
    }
}
