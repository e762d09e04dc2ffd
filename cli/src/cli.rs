//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::app::{AppContext, AppFlags};
use crate::commands;
use crate::domain::TenantOverrides;

/// Manage OpenStack servers and bootstrap them into a Chef fleet
#[derive(Parser)]
#[command(
    name = "alamo",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Log requests and ssh invocations to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub openstack: OpenStackArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Identity service settings; each overrides `~/.alamo/config.yaml`.
#[derive(Args, Debug, Default)]
pub struct OpenStackArgs {
    /// Identity service URL, e.g. https://keystone.example.com:5000/v2.0
    #[arg(long, global = true, env = "OS_AUTH_URL")]
    pub auth_url: Option<String>,

    /// OpenStack user name
    #[arg(long, global = true, env = "OS_USERNAME")]
    pub username: Option<String>,

    /// OpenStack password
    #[arg(long, global = true, env = "OS_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Tenant (project) name
    #[arg(long, global = true, env = "OS_TENANT_NAME")]
    pub tenant: Option<String>,

    /// Region of the compute endpoint
    #[arg(long, global = true, env = "OS_REGION_NAME")]
    pub region: Option<String>,

    /// HTTP request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,
}

impl OpenStackArgs {
    #[must_use]
    pub fn overrides(&self) -> TenantOverrides {
        TenantOverrides {
            auth_url: self.auth_url.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            tenant: self.tenant.clone(),
            region: self.region.clone(),
            timeout_secs: self.timeout,
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Manage compute servers
    #[command(subcommand)]
    Server(commands::server::ServerCommand),
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli {
            json,
            quiet,
            no_color,
            verbose: _,
            openstack,
            command,
        } = self;
        let app = AppContext::new(&AppFlags {
            json,
            quiet,
            no_color,
            tenant: openstack.overrides(),
        })?;
        match command {
            Command::Server(cmd) => commands::server::run(&app, cmd).await,
        }
    }
}
