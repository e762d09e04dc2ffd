//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` and `alamo_common`: never from
//! `crate::infra`, `crate::commands`, or `crate::output`.

use std::process::Output;
use std::time::Duration;

use alamo_common::{NewServer, ServerRecord, ServerSummary};
use anyhow::Result;

use crate::domain::{AlamoConfig, Credentials, Endpoint, Secret, TenantCredentials};

// ── Identity Port ─────────────────────────────────────────────────────────────

/// Exchanges tenant credentials for a compute endpoint and token.
#[allow(async_fn_in_trait)]
pub trait IdentityService {
    /// Authenticate and locate the compute service.
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if the credentials are rejected or the catalog has
    /// no compute endpoint.
    async fn resolve(&self, tenant: &TenantCredentials) -> Result<(Endpoint, Credentials)>;
}

// ── Compute Port ──────────────────────────────────────────────────────────────

/// Authenticated server operations against the compute service.
///
/// Every non-2xx response surfaces as `ApiError`.
#[allow(async_fn_in_trait)]
pub trait ComputeApi {
    /// `GET /servers`: ids and names only.
    async fn list_server_summaries(&self) -> Result<Vec<ServerSummary>>;
    /// `GET /servers/{id}`.
    async fn get_server(&self, id: &str) -> Result<ServerRecord>;
    /// `POST /servers`.
    async fn create_server(&self, server: &NewServer) -> Result<ServerRecord>;
    /// `DELETE /servers/{id}`.
    async fn delete_server(&self, id: &str) -> Result<()>;
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// A fully described child process invocation.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    /// Extra environment; values are redacted from `Debug`.
    pub env: Vec<(&'static str, Secret)>,
    pub stdin: Option<Vec<u8>>,
    /// The child is killed once this elapses.
    pub timeout: Duration,
}

impl CommandSpec {
    #[must_use]
    pub fn new(program: &str, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.to_string(),
            args,
            env: Vec::new(),
            stdin: None,
            timeout,
        }
    }
}

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program to completion and capture its output.
    ///
    /// # Errors
    ///
    /// Returns `RunnerError` if the process cannot be spawned or exceeds its
    /// timeout. On timeout the child must be killed, not left orphaned.
    async fn run(&self, spec: &CommandSpec) -> Result<Output>;
}

// ── Remote Shell Port ─────────────────────────────────────────────────────────

/// Result of a remote command: stdout followed by stderr, and the exit code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteOutput {
    pub output: String,
    pub exit_code: i32,
}

impl RemoteOutput {
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Executes commands on one target host, however many hops away it is.
#[allow(async_fn_in_trait)]
pub trait RemoteShell {
    /// Human-readable route, e.g. `root@10.0.0.5 via admin@bastion`.
    fn describe(&self) -> String;
    /// Verify every hop authenticates.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError` naming the hop that failed.
    async fn check(&self) -> Result<()>;
    /// Execute `command` on the target.
    async fn execute(&self, command: &str) -> Result<RemoteOutput>;
    /// Execute `command` on the target with `input` piped to its stdin.
    async fn execute_with_input(&self, command: &str, input: &[u8]) -> Result<RemoteOutput>;
}

/// Builds a `RemoteShell` for an address known only at run time.
pub trait ShellConnector {
    type Shell: RemoteShell;
    fn connect(&self, address: &str) -> Self::Shell;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait: no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts loading the config file.
pub trait ConfigStore {
    /// Load the config, returning defaults when no file exists.
    fn load(&self) -> Result<AlamoConfig>;
    /// Location of the config file.
    fn path(&self) -> Result<std::path::PathBuf>;
}
