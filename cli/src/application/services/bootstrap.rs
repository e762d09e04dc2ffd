//! Application service: Chef client bootstrap use-case.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! The remote side effects (file writes, package install, chef-client run)
//! are not rolled back when a later step fails.

use alamo_common::ServerRecord;
use anyhow::Result;

use crate::application::ports::{ComputeApi, ProgressReporter, RemoteShell, ShellConnector};
use crate::domain::bootstrap::{self, BootstrapStep};
use crate::domain::{BootstrapError, ConnectionError, PollPolicy, ProvisioningConfig};

/// Server status after which an address will never be assigned.
const FAILED_STATUS: &str = "ERROR";

/// What a successful bootstrap touched.
#[derive(Debug, Clone)]
pub struct BootstrapOutcome {
    pub server: ServerRecord,
    pub address: String,
    /// Route used to reach the instance, e.g. `root@10.0.0.5 via admin@bastion`.
    pub route: String,
    /// Combined output of the final chef-client run.
    pub chef_output: String,
}

/// Bootstraps one server into the Chef fleet.
pub struct BootstrapRunner<'a, A, C, P> {
    api: &'a A,
    connector: &'a C,
    reporter: &'a P,
    config: &'a ProvisioningConfig,
}

impl<'a, A, C, P> BootstrapRunner<'a, A, C, P>
where
    A: ComputeApi,
    C: ShellConnector,
    P: ProgressReporter,
{
    pub fn new(
        api: &'a A,
        connector: &'a C,
        reporter: &'a P,
        config: &'a ProvisioningConfig,
    ) -> Self {
        Self {
            api,
            connector,
            reporter,
            config,
        }
    }

    /// Wait for an address, then run every bootstrap step over SSH.
    ///
    /// `validation_key` is the already-read local validation credential.
    ///
    /// # Errors
    ///
    /// Returns `BootstrapError` for address, connection or step failures and
    /// `ApiError` when the compute service rejects a lookup.
    pub async fn run(&self, server_id: &str, validation_key: Vec<u8>) -> Result<BootstrapOutcome> {
        self.reporter
            .step(&format!("Waiting for server {server_id} to receive an address"));
        let server = wait_for_address(self.api, server_id, self.config.address_poll).await?;
        let address = bootstrap::select_address(&server)
            .ok_or_else(|| BootstrapError::AddressTimeout {
                server_id: server_id.to_string(),
                attempts: self.config.address_poll.attempts,
            })?
            .to_string();

        if server.name.is_empty() {
            self.reporter.warn(&format!(
                "server {server_id} has no name; registering the node as {server_id}"
            ));
        }

        let shell = self.connector.connect(&address);
        let route = shell.describe();
        self.reporter.step(&format!("Connecting to {route}"));
        shell
            .check()
            .await
            .map_err(|e| classify(server_id, "connect", e))?;
        tracing::info!(server_id, %route, "instance reachable");

        let mut chef_output = String::new();
        for step in bootstrap::plan(self.config, &server, validation_key) {
            chef_output = self.run_step(&shell, server_id, &step).await?;
        }

        Ok(BootstrapOutcome {
            server,
            address,
            route,
            chef_output,
        })
    }

    async fn run_step(
        &self,
        shell: &impl RemoteShell,
        server_id: &str,
        step: &BootstrapStep,
    ) -> Result<String> {
        self.reporter.step(step.name);
        tracing::debug!(step = step.name, command = %step.command, "running bootstrap step");

        let result = match &step.stdin {
            Some(input) => shell.execute_with_input(&step.command, input).await,
            None => shell.execute(&step.command).await,
        };
        let out = result.map_err(|e| classify(server_id, step.name, e))?;

        if !out.success() {
            return Err(BootstrapError::StepFailed {
                step: step.name.to_string(),
                exit_code: out.exit_code,
                output: out.output,
            }
            .into());
        }
        self.reporter.success(step.name);
        Ok(out.output)
    }
}

/// Poll `GET /servers/{id}` until an address is assigned.
///
/// # Errors
///
/// Returns `BootstrapError::ServerFailed` if the server enters `ERROR`, and
/// `BootstrapError::AddressTimeout` once `policy.attempts` lookups saw no
/// address.
pub async fn wait_for_address(
    api: &impl ComputeApi,
    server_id: &str,
    policy: PollPolicy,
) -> Result<ServerRecord> {
    for attempt in 1..=policy.attempts {
        let server = api.get_server(server_id).await?;
        if server.status.eq_ignore_ascii_case(FAILED_STATUS) {
            return Err(BootstrapError::ServerFailed {
                server_id: server_id.to_string(),
                status: server.status,
            }
            .into());
        }
        if bootstrap::select_address(&server).is_some() {
            return Ok(server);
        }
        tracing::debug!(server_id, attempt, status = %server.status, "no address yet");
        if attempt < policy.attempts {
            tokio::time::sleep(policy.interval).await;
        }
    }
    Err(BootstrapError::AddressTimeout {
        server_id: server_id.to_string(),
        attempts: policy.attempts,
    }
    .into())
}

fn classify(server_id: &str, step: &str, err: anyhow::Error) -> anyhow::Error {
    match err.downcast::<ConnectionError>() {
        Ok(source) => BootstrapError::Connection {
            server_id: server_id.to_string(),
            source,
        }
        .into(),
        Err(err) => BootstrapError::Transport {
            step: step.to_string(),
            source: err.into(),
        }
        .into(),
    }
}
