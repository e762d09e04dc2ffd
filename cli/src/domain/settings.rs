//! Resolved, immutable per-invocation settings.
//!
//! Built once by `AlamoConfig` resolution and passed by reference into every
//! component. Nothing here is mutated after construction.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// A string that never appears in `Debug` output or logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// Input to the identity service.
#[derive(Debug, Clone)]
pub struct TenantCredentials {
    /// Keystone v2.0 base URL, e.g. `http://controller:5000/v2.0`.
    pub auth_url: String,
    pub username: String,
    pub password: Secret,
    pub tenant_name: String,
    /// Restricts catalog lookup to one region.
    pub region: Option<String>,
}

/// Token obtained from the identity service. Never persisted.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub token: Secret,
    pub tenant_id: Option<String>,
    pub expires: Option<chrono::DateTime<chrono::Utc>>,
}

/// Base URL of the compute service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base_url: String,
}

impl Endpoint {
    /// Normalizes away trailing slashes.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join an absolute API path (`/servers/...`) onto the base URL.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// HTTP transport bounds applied to every identity and compute call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpSettings {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Bounded wait for a freshly created server to receive an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            attempts: 60,
        }
    }
}

/// Timeouts applied to every ssh invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SshSettings {
    pub connect_timeout: Duration,
    pub command_timeout: Duration,
}

impl Default for SshSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            command_timeout: Duration::from_secs(1800),
        }
    }
}

/// Jump host between the workstation and the instance network.
#[derive(Debug, Clone)]
pub struct BastionSpec {
    pub host: String,
    pub login: String,
    /// Password auth when set; otherwise the ssh agent / default identities.
    pub password: Option<Secret>,
}

/// Everything the bootstrap needs, resolved from flags, env and config file.
#[derive(Debug, Clone)]
pub struct ProvisioningConfig {
    pub bastion: Option<BastionSpec>,
    pub instance_login: String,
    pub private_key: PathBuf,
    pub validation_pem: PathBuf,
    pub validation_client_name: String,
    pub chef_server_url: String,
    pub environment: String,
    pub run_list: Vec<String>,
    pub install_url: String,
    pub address_poll: PollPolicy,
    pub ssh: SshSettings,
}
