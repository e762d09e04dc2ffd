//! `alamo server chefclient SERVER_ID`: bootstrap an existing server.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::ComputeApi;
use crate::application::services::bootstrap::{BootstrapOutcome, BootstrapRunner};
use crate::commands::server::{BootstrapArgs, require_server_id};
use crate::domain::ProvisioningConfig;
use crate::infra::fs::read_validation_key;
use crate::output::TerminalReporter;

const MISSING_ID: &str = "Please provide a server id to provision with Chef";
const USAGE: &str = "alamo server chefclient SERVER_ID";

/// Arguments for the chefclient command.
#[derive(Args)]
pub struct ChefclientArgs {
    /// Server to bootstrap
    pub server_id: Option<String>,

    #[command(flatten)]
    pub bootstrap: BootstrapArgs,
}

/// Run `alamo server chefclient`.
///
/// # Errors
///
/// Returns `UsageError` without an id, `ConfigError` for missing bootstrap
/// settings, or the bootstrap failure.
pub async fn run(app: &AppContext, args: &ChefclientArgs) -> Result<()> {
    let server_id = require_server_id(args.server_id.as_deref(), MISSING_ID, USAGE)?;
    let config = app.provisioning(&args.bootstrap.overrides())?;
    let validation_key = read_validation_key(&config.validation_pem)?;

    let api = app.connect().await?;
    let outcome = bootstrap(app, &api, &config, &server_id, validation_key).await?;
    app.renderer().render_bootstrap(&outcome)
}

/// Drive `BootstrapRunner` over ssh with terminal progress.
///
/// # Errors
///
/// Returns the `BootstrapError` or `ApiError` raised by the run.
pub(crate) async fn bootstrap(
    app: &AppContext,
    api: &impl ComputeApi,
    config: &ProvisioningConfig,
    server_id: &str,
    validation_key: Vec<u8>,
) -> Result<BootstrapOutcome> {
    let connector = app.ssh_connector(config);
    let reporter = TerminalReporter::new(&app.output);
    let result = BootstrapRunner::new(api, &connector, &reporter, config)
        .run(server_id, validation_key)
        .await;
    if result.is_err() {
        reporter.abort("bootstrap failed");
    }
    result
}
