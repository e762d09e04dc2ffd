//! Shared reqwest client construction.

use anyhow::{Context, Result};

use crate::domain::HttpSettings;

const USER_AGENT: &str = concat!("alamo/", env!("CARGO_PKG_VERSION"));

/// Build a client bounded by `settings`; no transport default is inherited.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialised.
pub fn build_client(settings: HttpSettings) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(settings.timeout)
        .connect_timeout(settings.connect_timeout)
        .user_agent(USER_AGENT)
        .build()
        .context("cannot build HTTP client")
}

/// Read a response body for error reporting, never failing.
pub async fn body_text(response: reqwest::Response) -> String {
    response
        .text()
        .await
        .unwrap_or_else(|e| format!("<unreadable body: {e}>"))
}
