//! OpenSSH transports implementing the `RemoteShell` port.
//!
//! `DirectSsh` is one hop. `NestedSsh` wraps a bastion `DirectSsh` and reaches
//! the instance through it with `ProxyCommand ... -W %h:%p`, so the instance
//! key never leaves this machine. `SshTransport` hides which one is in use.

use std::process::Output;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::OnceCell;

use crate::application::ports::{
    CommandRunner, CommandSpec, RemoteOutput, RemoteShell, ShellConnector,
};
use crate::domain::ssh::{
    HopAuth, HostKeyPolicy, SSH_CONNECTION_FAILURE, SSHPASS_ENV, SshHop,
};
use crate::domain::{BastionSpec, ConnectionError, ProvisioningConfig, RunnerError, Secret, SshSettings};

/// Command used to probe that a hop authenticates.
const PROBE_COMMAND: &str = "true";

/// Which side of the tunnel a hop reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HopRole {
    Bastion,
    Instance,
}

/// Proxy through which an instance hop is reached.
#[derive(Debug, Clone)]
struct Proxy {
    via: String,
    command: String,
    password: Option<Secret>,
}

/// A single ssh hop executed through a `CommandRunner`.
#[derive(Debug, Clone)]
pub struct DirectSsh<R> {
    runner: R,
    hop: SshHop,
    password: Option<Secret>,
    proxy: Option<Proxy>,
    settings: SshSettings,
    role: HopRole,
}

impl<R: CommandRunner> DirectSsh<R> {
    /// Hop straight to an instance.
    #[must_use]
    pub fn instance(runner: R, hop: SshHop, settings: SshSettings) -> Self {
        Self {
            runner,
            hop,
            password: None,
            proxy: None,
            settings,
            role: HopRole::Instance,
        }
    }

    /// Hop to a bastion, authenticating with `password` when given.
    #[must_use]
    pub fn bastion(runner: R, bastion: &BastionSpec, settings: SshSettings) -> Self {
        let auth = if bastion.password.is_some() {
            HopAuth::Password
        } else {
            HopAuth::Default
        };
        Self {
            runner,
            hop: SshHop {
                host: bastion.host.clone(),
                login: bastion.login.clone(),
                auth,
                host_keys: HostKeyPolicy::AcceptNew,
            },
            password: bastion.password.clone(),
            proxy: None,
            settings,
            role: HopRole::Bastion,
        }
    }

    fn spec(&self, command: &str, stdin: Option<&[u8]>, timeout: Duration) -> CommandSpec {
        let (program, _) = self.hop.program();
        let args = self.hop.command_args(
            self.settings.connect_timeout,
            self.proxy.as_ref().map(|p| p.command.as_str()),
            command,
        );
        let mut spec = CommandSpec::new(program, args, timeout);
        let password = self
            .password
            .as_ref()
            .or_else(|| self.proxy.as_ref().and_then(|p| p.password.as_ref()));
        if let Some(password) = password {
            spec.env.push((SSHPASS_ENV, password.clone()));
        }
        spec.stdin = stdin.map(<[u8]>::to_vec);
        spec
    }

    fn connection_error(&self, reason: String) -> ConnectionError {
        match self.role {
            HopRole::Bastion => ConnectionError::Bastion {
                host: self.hop.host.clone(),
                reason,
            },
            HopRole::Instance => ConnectionError::Instance {
                address: self.hop.host.clone(),
                via: self.proxy.as_ref().map(|p| p.via.clone()),
                reason,
            },
        }
    }

    async fn invoke(
        &self,
        command: &str,
        stdin: Option<&[u8]>,
        timeout: Duration,
    ) -> Result<RemoteOutput> {
        tracing::debug!(route = %self.describe(), command, "ssh exec");
        let spec = self.spec(command, stdin, timeout);
        let output = match self.runner.run(&spec).await {
            Ok(output) => output,
            Err(e) => {
                return Err(match e.downcast::<RunnerError>() {
                    Ok(runner) => self.connection_error(runner.to_string()).into(),
                    Err(e) => e,
                });
            }
        };

        let remote = remote_output(&output);
        if remote.exit_code == SSH_CONNECTION_FAILURE {
            return Err(self.connection_error(first_line(&remote.output)).into());
        }
        Ok(remote)
    }
}

impl<R: CommandRunner> RemoteShell for DirectSsh<R> {
    fn describe(&self) -> String {
        match &self.proxy {
            Some(proxy) => format!("{} via {}", self.hop.destination(), proxy.via),
            None => self.hop.destination(),
        }
    }

    async fn check(&self) -> Result<()> {
        let timeout = self.settings.connect_timeout * 2;
        let out = self.invoke(PROBE_COMMAND, None, timeout).await?;
        if !out.success() {
            return Err(self
                .connection_error(format!(
                    "authentication failed (exit {}): {}",
                    out.exit_code,
                    first_line(&out.output)
                ))
                .into());
        }
        Ok(())
    }

    async fn execute(&self, command: &str) -> Result<RemoteOutput> {
        self.invoke(command, None, self.settings.command_timeout)
            .await
    }

    async fn execute_with_input(&self, command: &str, input: &[u8]) -> Result<RemoteOutput> {
        self.invoke(command, Some(input), self.settings.command_timeout)
            .await
    }
}

/// An instance hop nested inside a bastion hop.
///
/// The bastion is checked once, before the first instance-level command; if
/// it is unreachable the instance hop is never attempted.
pub struct NestedSsh<R> {
    bastion: DirectSsh<R>,
    instance: DirectSsh<R>,
    bastion_ready: OnceCell<()>,
}

impl<R: CommandRunner + Clone> NestedSsh<R> {
    #[must_use]
    pub fn new(bastion: DirectSsh<R>, instance_hop: SshHop, settings: SshSettings) -> Self {
        let proxy = Proxy {
            via: bastion.hop.destination(),
            command: bastion.hop.proxy_command(settings.connect_timeout),
            password: bastion.password.clone(),
        };
        let mut instance = DirectSsh::instance(bastion.runner.clone(), instance_hop, settings);
        instance.proxy = Some(proxy);
        Self {
            bastion,
            instance,
            bastion_ready: OnceCell::new(),
        }
    }
}

impl<R: CommandRunner> NestedSsh<R> {
    async fn ensure_bastion(&self) -> Result<()> {
        self.bastion_ready
            .get_or_try_init(|| self.bastion.check())
            .await?;
        Ok(())
    }
}

impl<R: CommandRunner> RemoteShell for NestedSsh<R> {
    fn describe(&self) -> String {
        self.instance.describe()
    }

    async fn check(&self) -> Result<()> {
        self.ensure_bastion().await?;
        self.instance.check().await
    }

    async fn execute(&self, command: &str) -> Result<RemoteOutput> {
        self.ensure_bastion().await?;
        self.instance.execute(command).await
    }

    async fn execute_with_input(&self, command: &str, input: &[u8]) -> Result<RemoteOutput> {
        self.ensure_bastion().await?;
        self.instance.execute_with_input(command, input).await
    }
}

/// Direct or bastion-tunnelled route to an instance.
pub enum SshTransport<R> {
    Direct(DirectSsh<R>),
    Nested(NestedSsh<R>),
}

impl<R: CommandRunner> RemoteShell for SshTransport<R> {
    fn describe(&self) -> String {
        match self {
            Self::Direct(s) => s.describe(),
            Self::Nested(s) => s.describe(),
        }
    }

    async fn check(&self) -> Result<()> {
        match self {
            Self::Direct(s) => s.check().await,
            Self::Nested(s) => s.check().await,
        }
    }

    async fn execute(&self, command: &str) -> Result<RemoteOutput> {
        match self {
            Self::Direct(s) => s.execute(command).await,
            Self::Nested(s) => s.execute(command).await,
        }
    }

    async fn execute_with_input(&self, command: &str, input: &[u8]) -> Result<RemoteOutput> {
        match self {
            Self::Direct(s) => s.execute_with_input(command, input).await,
            Self::Nested(s) => s.execute_with_input(command, input).await,
        }
    }
}

/// Builds the route to an instance from the provisioning config.
pub struct SshConnector<R> {
    runner: R,
    bastion: Option<BastionSpec>,
    instance_login: String,
    private_key: std::path::PathBuf,
    settings: SshSettings,
}

impl<R: CommandRunner + Clone> SshConnector<R> {
    #[must_use]
    pub fn new(runner: R, config: &ProvisioningConfig) -> Self {
        Self {
            runner,
            bastion: config.bastion.clone(),
            instance_login: config.instance_login.clone(),
            private_key: config.private_key.clone(),
            settings: config.ssh,
        }
    }
}

impl<R: CommandRunner + Clone> ShellConnector for SshConnector<R> {
    type Shell = SshTransport<R>;

    fn connect(&self, address: &str) -> SshTransport<R> {
        let hop = SshHop {
            host: address.to_string(),
            login: self.instance_login.clone(),
            auth: HopAuth::Key(self.private_key.clone()),
            host_keys: HostKeyPolicy::Ephemeral,
        };
        match &self.bastion {
            Some(bastion) => {
                let outer = DirectSsh::bastion(self.runner.clone(), bastion, self.settings);
                SshTransport::Nested(NestedSsh::new(outer, hop, self.settings))
            }
            None => SshTransport::Direct(DirectSsh::instance(
                self.runner.clone(),
                hop,
                self.settings,
            )),
        }
    }
}

fn remote_output(output: &Output) -> RemoteOutput {
    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    RemoteOutput {
        output: combined,
        // Killed by a signal: report like a shell would.
        exit_code: output.status.code().unwrap_or(-1),
    }
}

fn first_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("connection failed")
        .to_string()
}
