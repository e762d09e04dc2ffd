//! JSON output helpers.
//!
//! Record rendering for `--json` and the error-object formatter used by
//! `main` when a command fails in JSON mode.

use alamo_common::ServerRecord;
use anyhow::{Context, Result};

use crate::application::services::bootstrap::BootstrapOutcome;
use crate::domain::{
    ApiError, AuthError, BootstrapError, ConfigError, ConnectionError, FormatError, RunnerError,
    UsageError,
};

/// Renders results as pretty-printed JSON on stdout.
pub struct JsonRenderer;

impl JsonRenderer {
    /// Render the server list as a JSON array.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_servers(servers: &[ServerRecord]) -> Result<()> {
        println!(
            "{}",
            serde_json::to_string_pretty(servers).context("JSON serialization failed")?
        );
        Ok(())
    }

    /// Render a single server record.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_server(server: &ServerRecord) -> Result<()> {
        println!(
            "{}",
            serde_json::to_string_pretty(server).context("JSON serialization failed")?
        );
        Ok(())
    }

    /// Render the acknowledgement of a delete request.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_deleted(server_id: &str) -> Result<()> {
        let obj = serde_json::json!({ "id": server_id, "deleted": true });
        println!(
            "{}",
            serde_json::to_string_pretty(&obj).context("JSON serialization failed")?
        );
        Ok(())
    }

    /// Render the result of a bootstrap run.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_bootstrap(outcome: &BootstrapOutcome) -> Result<()> {
        let obj = serde_json::json!({
            "server": outcome.server,
            "address": outcome.address,
            "route": outcome.route,
            "chef_output": outcome.chef_output,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&obj).context("JSON serialization failed")?
        );
        Ok(())
    }
}

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Stable machine-readable code for the outermost typed error in `err`.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> &'static str {
    for cause in err.chain() {
        if cause.is::<UsageError>() {
            return "usage";
        }
        if cause.is::<ConfigError>() {
            return "config";
        }
        if cause.is::<AuthError>() {
            return "auth";
        }
        if let Some(api) = cause.downcast_ref::<ApiError>() {
            return if api.is_not_found() {
                "not_found"
            } else {
                "api"
            };
        }
        if cause.is::<BootstrapError>() {
            return "bootstrap";
        }
        if cause.is::<ConnectionError>() {
            return "connection";
        }
        if cause.is::<FormatError>() {
            return "format";
        }
        if cause.is::<RunnerError>() {
            return "process";
        }
    }
    "internal"
}
