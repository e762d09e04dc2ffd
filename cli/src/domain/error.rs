//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `reqwest`, `std::fs` or `std::process`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Identity errors ───────────────────────────────────────────────────────────

/// Failures while exchanging tenant credentials for a token and endpoint.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("identity service rejected credentials (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("identity service at {url} is unreachable: {reason}")]
    Unreachable { url: String, reason: String },

    #[error("service catalog has no '{service}' endpoint{}", region_suffix(.region.as_deref()))]
    MissingCatalogEntry {
        service: String,
        region: Option<String>,
    },

    #[error("malformed identity response: {0}")]
    Malformed(String),
}

fn region_suffix(region: Option<&str>) -> String {
    region.map(|r| format!(" in region '{r}'")).unwrap_or_default()
}

// ── Compute errors ────────────────────────────────────────────────────────────

/// A non-2xx response from the compute service.
#[derive(Debug, Error)]
#[error("{method} {path} failed with HTTP {status}: {body}")]
pub struct ApiError {
    pub method: String,
    pub path: String,
    pub status: u16,
    pub body: String,
}

impl ApiError {
    /// Returns `true` for 404-class responses.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}

// ── SSH errors ────────────────────────────────────────────────────────────────

/// An SSH hop could not be established.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("cannot reach bastion {host}: {reason}")]
    Bastion { host: String, reason: String },

    #[error("cannot reach instance {address}{}: {reason}", via_suffix(.via.as_deref()))]
    Instance {
        address: String,
        via: Option<String>,
        reason: String,
    },
}

fn via_suffix(via: Option<&str>) -> String {
    via.map(|v| format!(" via {v}")).unwrap_or_default()
}

// ── Bootstrap errors ──────────────────────────────────────────────────────────

/// Failures of the remote Chef client bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("server {server_id} has no address after {attempts} attempts")]
    AddressTimeout { server_id: String, attempts: u32 },

    #[error("server {server_id} entered status {status} before receiving an address")]
    ServerFailed { server_id: String, status: String },

    #[error("cannot read validation key {path}: {reason}")]
    ValidationKey { path: String, reason: String },

    #[error("bootstrap of server {server_id} could not connect: {source}")]
    Connection {
        server_id: String,
        #[source]
        source: ConnectionError,
    },

    #[error("bootstrap step '{step}' exited with status {exit_code}:\n{output}")]
    StepFailed {
        step: String,
        exit_code: i32,
        output: String,
    },

    #[error("bootstrap step '{step}' failed: {source}")]
    Transport {
        step: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

// ── Usage errors ──────────────────────────────────────────────────────────────

/// A required positional argument was not supplied.
#[derive(Debug, Error)]
#[error("{message}\nUSAGE: {usage}")]
pub struct UsageError {
    pub message: &'static str,
    pub usage: &'static str,
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to resolving the invocation configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting {key}\n\n{hint}")]
    Missing { key: &'static str, hint: &'static str },

    #[error("invalid value for {key}: {value} ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

// ── Formatter errors ──────────────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("unknown column '{0}' (valid: id, name, status, addresses, created, updated)")]
    UnknownField(String),
}

// ── Process errors ────────────────────────────────────────────────────────────

/// Failures of a local child process, independent of its exit status.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("{program} timed out after {secs}s")]
    Timeout { program: String, secs: u64 },

    #[error("failed to spawn {program}: {reason}")]
    Spawn { program: String, reason: String },
}
