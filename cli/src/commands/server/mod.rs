//! `alamo server ...`: list, create, delete and bootstrap compute servers.

pub mod chefclient;
pub mod create;
pub mod delete;
pub mod list;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::app::AppContext;
use crate::domain::{ProvisioningOverrides, UsageError};

/// Server subcommands.
#[derive(Subcommand)]
pub enum ServerCommand {
    /// List servers with their status and addresses
    List,
    /// Create a server and bootstrap it into the Chef fleet
    Create(create::CreateArgs),
    /// Request deletion of a server
    Delete(delete::DeleteArgs),
    /// Install and run the Chef client on an existing server
    Chefclient(chefclient::ChefclientArgs),
}

/// Options shared by `create` and `chefclient`.
#[derive(Args, Debug, Default, Clone)]
pub struct BootstrapArgs {
    /// Bastion host used to reach the private network
    #[arg(long)]
    pub bastion: Option<String>,

    /// Login on the bastion host
    #[arg(long)]
    pub bastion_login: Option<String>,

    /// Password for the bastion login
    #[arg(long, env = "ALAMO_BASTION_PASS", hide_env_values = true)]
    pub bastion_pass: Option<String>,

    /// Login on the instance [default: root]
    #[arg(long)]
    pub instance_login: Option<String>,

    /// Private key for the instance login [default: ~/.ssh/id_rsa]
    #[arg(long, value_name = "PATH")]
    pub privkey: Option<String>,

    /// Chef validation key to upload
    #[arg(long, value_name = "PATH")]
    pub validation_pem: Option<String>,

    /// Chef environment [default: _default]
    #[arg(long)]
    pub chefenv: Option<String>,

    /// Comma-separated run-list, e.g. role[base],recipe[nginx]
    #[arg(long)]
    pub runlist: Option<String>,

    /// Chef server URL
    #[arg(long)]
    pub chef_server_url: Option<String>,

    /// Seconds to wait for the server to receive an address
    #[arg(long, value_name = "SECS")]
    pub address_wait: Option<u64>,
}

impl BootstrapArgs {
    #[must_use]
    pub fn overrides(&self) -> ProvisioningOverrides {
        ProvisioningOverrides {
            bastion: self.bastion.clone(),
            bastion_login: self.bastion_login.clone(),
            bastion_password: self.bastion_pass.clone(),
            instance_login: self.instance_login.clone(),
            private_key: self.privkey.clone(),
            validation_pem: self.validation_pem.clone(),
            environment: self.chefenv.clone(),
            run_list: self.runlist.clone(),
            chef_server_url: self.chef_server_url.clone(),
            address_wait_secs: self.address_wait,
        }
    }
}

/// Run a server subcommand.
///
/// # Errors
///
/// Propagates the subcommand's error.
pub async fn run(app: &AppContext, cmd: ServerCommand) -> Result<()> {
    match cmd {
        ServerCommand::List => list::run(app).await,
        ServerCommand::Create(args) => create::run(app, &args).await,
        ServerCommand::Delete(args) => delete::run(app, &args).await,
        ServerCommand::Chefclient(args) => chefclient::run(app, &args).await,
    }
}

/// Take the positional server id, or fail with `usage` before any network call.
///
/// # Errors
///
/// Returns `UsageError` when `server_id` is absent or blank.
pub fn require_server_id(
    server_id: Option<&str>,
    message: &'static str,
    usage: &'static str,
) -> Result<String, UsageError> {
    match server_id.map(str::trim) {
        Some(id) if !id.is_empty() => Ok(id.to_string()),
        _ => Err(UsageError { message, usage }),
    }
}
