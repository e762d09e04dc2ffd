//! Domain types and resolvers for alamo configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access. The file
//! schema is loaded by `infra::config`; command-line flags arrive as the
//! `*Overrides` structs and always win over file values.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;
use crate::domain::settings::{
    BastionSpec, HttpSettings, PollPolicy, ProvisioningConfig, Secret, SshSettings,
    TenantCredentials,
};

// ── Constants ────────────────────────────────────────────────────────────────

pub const DEFAULT_INSTANCE_LOGIN: &str = "root";
pub const DEFAULT_PRIVATE_KEY: &str = "~/.ssh/id_rsa";
pub const DEFAULT_CHEF_ENVIRONMENT: &str = "_default";
pub const DEFAULT_VALIDATION_CLIENT: &str = "chef-validator";
pub const DEFAULT_INSTALL_URL: &str = "https://omnitruck.chef.io/install.sh";

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.alamo/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AlamoConfig {
    pub openstack: OpenStackConfig,
    pub bastion: BastionConfig,
    pub instance: InstanceConfig,
    pub chef: ChefConfig,
    pub ssh: SshConfig,
    pub bootstrap: BootstrapConfig,
}

/// Identity service credentials and HTTP bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenStackConfig {
    pub auth_url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub tenant: Option<String>,
    pub region: Option<String>,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for OpenStackConfig {
    fn default() -> Self {
        Self {
            auth_url: None,
            username: None,
            password: None,
            tenant: None,
            region: None,
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BastionConfig {
    pub host: Option<String>,
    pub login: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct InstanceConfig {
    pub login: Option<String>,
    pub private_key: Option<String>,
    pub environment: Option<String>,
    pub run_list: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChefConfig {
    pub server_url: Option<String>,
    pub validation_pem: Option<String>,
    pub validation_client_name: String,
    pub install_url: String,
}

impl Default for ChefConfig {
    fn default() -> Self {
        Self {
            server_url: None,
            validation_pem: None,
            validation_client_name: DEFAULT_VALIDATION_CLIENT.to_string(),
            install_url: DEFAULT_INSTALL_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SshConfig {
    pub connect_timeout_secs: u64,
    pub command_timeout_secs: u64,
}

impl Default for SshConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 15,
            command_timeout_secs: 1800,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    pub address_poll_interval_secs: u64,
    pub address_wait_secs: u64,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            address_poll_interval_secs: 5,
            address_wait_secs: 300,
        }
    }
}

// ── Overrides ────────────────────────────────────────────────────────────────

/// Identity values supplied on the command line or via `OS_*` variables.
#[derive(Debug, Clone, Default)]
pub struct TenantOverrides {
    pub auth_url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub tenant: Option<String>,
    pub region: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Bootstrap values supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct ProvisioningOverrides {
    pub bastion: Option<String>,
    pub bastion_login: Option<String>,
    pub bastion_password: Option<String>,
    pub instance_login: Option<String>,
    pub private_key: Option<String>,
    pub validation_pem: Option<String>,
    pub environment: Option<String>,
    /// Comma-separated run-list, e.g. `role[base],recipe[nginx]`.
    pub run_list: Option<String>,
    pub chef_server_url: Option<String>,
    pub address_wait_secs: Option<u64>,
}

// ── Resolution ───────────────────────────────────────────────────────────────

impl AlamoConfig {
    /// Merge identity settings, flags first.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` naming the first absent setting.
    pub fn tenant_credentials(
        &self,
        overrides: &TenantOverrides,
    ) -> Result<TenantCredentials, ConfigError> {
        let os = &self.openstack;
        let auth_url = required(
            pick(&overrides.auth_url, &os.auth_url),
            "openstack.auth_url",
            "Pass --auth-url, set OS_AUTH_URL, or add openstack.auth_url to ~/.alamo/config.yaml",
        )?;
        let username = required(
            pick(&overrides.username, &os.username),
            "openstack.username",
            "Pass --username, set OS_USERNAME, or add openstack.username to ~/.alamo/config.yaml",
        )?;
        let password = required(
            pick(&overrides.password, &os.password),
            "openstack.password",
            "Pass --password, set OS_PASSWORD, or add openstack.password to ~/.alamo/config.yaml",
        )?;
        let tenant_name = required(
            pick(&overrides.tenant, &os.tenant),
            "openstack.tenant",
            "Pass --tenant, set OS_TENANT_NAME, or add openstack.tenant to ~/.alamo/config.yaml",
        )?;

        Ok(TenantCredentials {
            auth_url: auth_url.trim_end_matches('/').to_string(),
            username,
            password: Secret::new(password),
            tenant_name,
            region: pick(&overrides.region, &os.region),
        })
    }

    /// HTTP bounds for identity and compute calls.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a zero timeout.
    pub fn http_settings(&self, overrides: &TenantOverrides) -> Result<HttpSettings, ConfigError> {
        Ok(HttpSettings {
            timeout: seconds(
                "openstack.timeout_secs",
                overrides.timeout_secs.unwrap_or(self.openstack.timeout_secs),
            )?,
            connect_timeout: seconds(
                "openstack.connect_timeout_secs",
                self.openstack.connect_timeout_secs,
            )?,
        })
    }

    /// Merge everything the bootstrap needs into one immutable value.
    ///
    /// `home` expands leading `~` in key paths.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a required setting is absent or a value is
    /// out of range.
    pub fn provisioning(
        &self,
        overrides: &ProvisioningOverrides,
        home: Option<&Path>,
    ) -> Result<ProvisioningConfig, ConfigError> {
        let bastion = match pick(&overrides.bastion, &self.bastion.host) {
            Some(host) => {
                let login = required(
                    pick(&overrides.bastion_login, &self.bastion.login),
                    "bastion.login",
                    "Pass --bastion-login or add bastion.login to ~/.alamo/config.yaml",
                )?;
                Some(BastionSpec {
                    host,
                    login,
                    password: pick(&overrides.bastion_password, &self.bastion.password)
                        .map(Secret::new),
                })
            }
            None => None,
        };

        let validation_pem = required(
            pick(&overrides.validation_pem, &self.chef.validation_pem),
            "chef.validation_pem",
            "Pass --validation-pem or add chef.validation_pem to ~/.alamo/config.yaml",
        )?;
        let chef_server_url = required(
            pick(&overrides.chef_server_url, &self.chef.server_url),
            "chef.server_url",
            "Pass --chef-server-url or add chef.server_url to ~/.alamo/config.yaml",
        )?;

        let run_list = match &overrides.run_list {
            Some(raw) => parse_run_list(raw),
            None => self.instance.run_list.clone(),
        };

        let private_key = pick(&overrides.private_key, &self.instance.private_key)
            .unwrap_or_else(|| DEFAULT_PRIVATE_KEY.to_string());

        Ok(ProvisioningConfig {
            bastion,
            instance_login: pick(&overrides.instance_login, &self.instance.login)
                .unwrap_or_else(|| DEFAULT_INSTANCE_LOGIN.to_string()),
            private_key: expand_tilde(&private_key, home),
            validation_pem: expand_tilde(&validation_pem, home),
            validation_client_name: self.chef.validation_client_name.clone(),
            chef_server_url,
            environment: pick(&overrides.environment, &self.instance.environment)
                .unwrap_or_else(|| DEFAULT_CHEF_ENVIRONMENT.to_string()),
            run_list,
            install_url: self.chef.install_url.clone(),
            address_poll: self.poll_policy(overrides.address_wait_secs)?,
            ssh: SshSettings {
                connect_timeout: seconds("ssh.connect_timeout_secs", self.ssh.connect_timeout_secs)?,
                command_timeout: seconds("ssh.command_timeout_secs", self.ssh.command_timeout_secs)?,
            },
        })
    }

    fn poll_policy(&self, wait_override: Option<u64>) -> Result<PollPolicy, ConfigError> {
        let interval = self.bootstrap.address_poll_interval_secs;
        seconds("bootstrap.address_poll_interval_secs", interval)?;
        let wait = wait_override.unwrap_or(self.bootstrap.address_wait_secs);
        let attempts = u32::try_from((wait / interval).max(1)).unwrap_or(u32::MAX);
        Ok(PollPolicy {
            interval: Duration::from_secs(interval),
            attempts,
        })
    }
}

/// Split a comma-separated run-list, dropping blank entries.
#[must_use]
pub fn parse_run_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

/// Expand `~` or a leading `~/` against `home`. Other paths, including
/// `~user/...`, are returned as-is.
#[must_use]
pub fn expand_tilde(path: &str, home: Option<&Path>) -> PathBuf {
    match (path, home) {
        ("~", Some(home)) => home.to_path_buf(),
        (_, Some(home)) => match path.strip_prefix("~/") {
            Some(rest) => home.join(rest.trim_start_matches('/')),
            None => PathBuf::from(path),
        },
        _ => PathBuf::from(path),
    }
}

/// First non-blank of the flag and the file value.
fn pick(flag: &Option<String>, file: &Option<String>) -> Option<String> {
    let present = |v: &&String| !v.trim().is_empty();
    flag.as_ref()
        .filter(present)
        .or(file.as_ref().filter(present))
        .cloned()
}

fn seconds(key: &'static str, secs: u64) -> Result<Duration, ConfigError> {
    if secs == 0 {
        return Err(ConfigError::InvalidValue {
            key,
            value: secs.to_string(),
            reason: "must be at least 1",
        });
    }
    Ok(Duration::from_secs(secs))
}

fn required(
    value: Option<String>,
    key: &'static str,
    hint: &'static str,
) -> Result<String, ConfigError> {
    value.ok_or(ConfigError::Missing { key, hint })
}

// ── Unit tests ───────────────────────────────────────────────────────────────
