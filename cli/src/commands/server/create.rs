//! `alamo server create`: create a server, then bootstrap it.

use alamo_common::NewServer;
use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::ComputeApi;
use crate::commands::server::BootstrapArgs;
use crate::commands::server::chefclient;
use crate::infra::fs::read_validation_key;

/// Arguments for the create command.
#[derive(Args)]
pub struct CreateArgs {
    /// Server name
    #[arg(long)]
    pub name: String,

    /// Image id or reference
    #[arg(long)]
    pub image: String,

    /// Flavor id or reference
    #[arg(long)]
    pub flavor: String,

    /// Keypair to inject into the server
    #[arg(long)]
    pub key_name: Option<String>,

    /// Create only; skip the Chef bootstrap
    #[arg(long)]
    pub no_bootstrap: bool,

    #[command(flatten)]
    pub bootstrap: BootstrapArgs,
}

impl CreateArgs {
    #[must_use]
    pub fn new_server(&self) -> NewServer {
        NewServer {
            name: self.name.clone(),
            image_ref: self.image.clone(),
            flavor_ref: self.flavor.clone(),
            key_name: self.key_name.clone(),
        }
    }
}

/// Run `alamo server create`.
///
/// Bootstrap settings and the validation key are checked before the server
/// is created. A server whose bootstrap fails is left in place.
///
/// # Errors
///
/// Returns `ConfigError` for missing settings, `ApiError` if creation is
/// rejected, or the bootstrap failure.
pub async fn run(app: &AppContext, args: &CreateArgs) -> Result<()> {
    let prepared = if args.no_bootstrap {
        None
    } else {
        let config = app.provisioning(&args.bootstrap.overrides())?;
        let key = read_validation_key(&config.validation_pem)?;
        Some((config, key))
    };

    let api = app.connect().await?;
    let mut server = api.create_server(&args.new_server()).await?;
    // Create responses usually omit the name.
    if server.name.is_empty() {
        server.name.clone_from(&args.name);
    }

    let Some((config, key)) = prepared else {
        return app.renderer().render_created(&server);
    };

    // The bootstrap result carries the server record for JSON output.
    if !app.is_json() {
        app.renderer().render_created(&server)?;
    }
    match chefclient::bootstrap(app, &api, &config, &server.id, key).await {
        Ok(outcome) => app.renderer().render_bootstrap(&outcome),
        Err(e) => {
            tracing::warn!(id = %server.id, "bootstrap failed; server left in place");
            app.output.warn(&format!("Server {} left in place", server.id));
            Err(e.context(format!(
                "server {} was created but not bootstrapped; retry with: alamo server chefclient {}",
                server.id, server.id
            )))
        }
    }
}
