//! `alamo server list`: table or JSON of every server visible to the tenant.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::server_list::list_servers;
use crate::domain::table::SERVER_COLUMNS;
use crate::output::progress;

/// Run `alamo server list`.
///
/// # Errors
///
/// Returns an error if authentication or any compute call fails.
pub async fn run(app: &AppContext) -> Result<()> {
    let api = app.connect().await?;

    let spinner = app
        .output
        .show_progress()
        .then(|| progress::spinner("Fetching servers"));
    let servers = list_servers(&api).await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let servers = servers?;

    app.renderer().render_servers(SERVER_COLUMNS, &servers)
}
