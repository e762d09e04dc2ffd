//! OpenSSH invocation building for one hop.
//!
//! Pure string construction: `infra::ssh` turns these argument lists into
//! processes.

use std::path::PathBuf;
use std::time::Duration;

use crate::domain::bootstrap::shell_quote;

/// Wrapper that feeds the bastion password from the `SSHPASS` variable.
pub const SSHPASS_PROGRAM: &str = "sshpass";
pub const SSHPASS_ENV: &str = "SSHPASS";
pub const SSH_PROGRAM: &str = "ssh";

/// Exit status OpenSSH reserves for its own connection failures.
pub const SSH_CONNECTION_FAILURE: i32 = 255;

/// How a hop authenticates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HopAuth {
    /// Password supplied through `sshpass -e`.
    Password,
    /// A specific private key, nothing else offered.
    Key(PathBuf),
    /// Agent and default identities.
    Default,
}

/// How unknown host keys are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostKeyPolicy {
    /// Pin on first use, reject changes.
    AcceptNew,
    /// Freshly created instances recycle private addresses, so their keys are
    /// neither checked nor recorded.
    Ephemeral,
}

/// One `ssh` destination with its authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshHop {
    pub host: String,
    pub login: String,
    pub auth: HopAuth,
    pub host_keys: HostKeyPolicy,
}

impl SshHop {
    #[must_use]
    pub fn destination(&self) -> String {
        format!("{}@{}", self.login, self.host)
    }

    /// Program and leading arguments: `ssh`, or `sshpass -e ssh`.
    #[must_use]
    pub fn program(&self) -> (&'static str, Vec<String>) {
        match self.auth {
            HopAuth::Password => (
                SSHPASS_PROGRAM,
                vec!["-e".to_string(), SSH_PROGRAM.to_string()],
            ),
            _ => (SSH_PROGRAM, Vec::new()),
        }
    }

    /// `-o` options for this hop.
    #[must_use]
    pub fn options(&self, connect_timeout: Duration) -> Vec<String> {
        let mut opts = vec![
            "-o".to_string(),
            format!("ConnectTimeout={}", connect_timeout.as_secs().max(1)),
            "-o".to_string(),
            "LogLevel=ERROR".to_string(),
        ];
        match &self.auth {
            HopAuth::Password => opts.extend(
                [
                    "-o",
                    "PreferredAuthentications=password,keyboard-interactive",
                    "-o",
                    "PubkeyAuthentication=no",
                    "-o",
                    "NumberOfPasswordPrompts=1",
                ]
                .map(String::from),
            ),
            HopAuth::Key(path) => {
                opts.push("-i".to_string());
                opts.push(path.display().to_string());
                opts.extend(["-o", "IdentitiesOnly=yes", "-o", "BatchMode=yes"].map(String::from));
            }
            HopAuth::Default => opts.extend(["-o", "BatchMode=yes"].map(String::from)),
        }
        match self.host_keys {
            HostKeyPolicy::AcceptNew => {
                opts.extend(["-o", "StrictHostKeyChecking=accept-new"].map(String::from));
            }
            HostKeyPolicy::Ephemeral => opts.extend(
                [
                    "-o",
                    "StrictHostKeyChecking=no",
                    "-o",
                    "UserKnownHostsFile=/dev/null",
                ]
                .map(String::from),
            ),
        }
        opts
    }

    /// Arguments after the program: options, optional proxy, destination, command.
    #[must_use]
    pub fn command_args(
        &self,
        connect_timeout: Duration,
        proxy_command: Option<&str>,
        remote_command: &str,
    ) -> Vec<String> {
        let (_, mut args) = self.program();
        args.extend(self.options(connect_timeout));
        if let Some(proxy) = proxy_command {
            args.push("-o".to_string());
            args.push(format!("ProxyCommand={proxy}"));
        }
        args.push(self.destination());
        args.push(remote_command.to_string());
        args
    }

    /// This hop as a `ProxyCommand` forwarding stdio to `%h:%p`.
    #[must_use]
    pub fn proxy_command(&self, connect_timeout: Duration) -> String {
        let (program, mut args) = self.program();
        args.extend(self.options(connect_timeout));
        args.push("-W".to_string());
        args.push("%h:%p".to_string());
        args.push(self.destination());

        std::iter::once(program.to_string())
            .chain(args)
            .map(|a| shell_quote(&a))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
