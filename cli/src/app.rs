//! Application context: unified state passed to every command handler.
//!
//! `AppContext` carries the loaded config file, the identity overrides from
//! the command line and the output settings. Network clients are built on
//! demand by `connect()` so commands that fail validation never touch the
//! network.

use std::path::PathBuf;

use anyhow::Result;

use crate::application::ports::{ConfigStore, IdentityService};
use crate::domain::{
    AlamoConfig, ProvisioningConfig, ProvisioningOverrides, TenantOverrides,
};
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::compute::NovaClient;
use crate::infra::config::YamlConfigStore;
use crate::infra::http::build_client;
use crate::infra::identity::KeystoneClient;
use crate::infra::ssh::SshConnector;
use crate::output::{HumanRenderer, JsonRenderer, OutputContext, Renderer};

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    pub json: bool,
    pub quiet: bool,
    pub no_color: bool,
    pub tenant: TenantOverrides,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Contents of the config file, or defaults.
    pub config: AlamoConfig,
    /// Identity settings given on the command line or through `OS_*`.
    pub tenant: TenantOverrides,
    /// Home directory used to expand `~` in key paths.
    pub home: Option<PathBuf>,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn new(flags: &AppFlags) -> Result<Self> {
        Self::with_store(flags, &YamlConfigStore)
    }

    /// As `new`, loading the config from `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails to load.
    pub fn with_store(flags: &AppFlags, store: &impl ConfigStore) -> Result<Self> {
        let mode = if flags.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };
        // JSON mode keeps stdout for the document alone.
        let quiet = flags.quiet || flags.json;

        Ok(Self {
            output: OutputContext::new(flags.no_color, quiet),
            mode,
            config: store.load()?,
            tenant: flags.tenant.clone(),
            home: dirs::home_dir(),
        })
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Returns the appropriate `Renderer` variant for the current output mode.
    #[must_use]
    pub fn renderer(&self) -> Renderer<'_> {
        match self.mode {
            OutputMode::Human => Renderer::Human(HumanRenderer::new(&self.output)),
            OutputMode::Json => Renderer::Json(JsonRenderer),
        }
    }

    /// Ssh route builder for instances bootstrapped with `config`.
    #[must_use]
    pub fn ssh_connector(&self, config: &ProvisioningConfig) -> SshConnector<TokioCommandRunner> {
        SshConnector::new(TokioCommandRunner::new(), config)
    }

    /// Resolve bootstrap settings from the config file and `overrides`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a required setting is missing.
    pub fn provisioning(&self, overrides: &ProvisioningOverrides) -> Result<ProvisioningConfig> {
        Ok(self.config.provisioning(overrides, self.home.as_deref())?)
    }

    /// Authenticate and return a client bound to the compute endpoint.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if identity settings are missing or invalid, or `AuthError`
    /// if authentication fails.
    pub async fn connect(&self) -> Result<NovaClient> {
        let tenant = self.config.tenant_credentials(&self.tenant)?;
        let http = build_client(self.config.http_settings(&self.tenant)?)?;
        let (endpoint, credentials) = KeystoneClient::new(http.clone()).resolve(&tenant).await?;
        Ok(NovaClient::new(http, endpoint, credentials))
    }
}
