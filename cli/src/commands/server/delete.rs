//! `alamo server delete SERVER_ID`: request deletion of one server.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::ComputeApi;
use crate::commands::server::require_server_id;

const MISSING_ID: &str = "Please provide a id of a server to delete";
const USAGE: &str = "alamo server delete SERVER_ID";

/// Arguments for the delete command.
#[derive(Args)]
pub struct DeleteArgs {
    /// Server to delete
    pub server_id: Option<String>,
}

/// Run `alamo server delete`.
///
/// # Errors
///
/// Returns `UsageError` without an id, or `ApiError` if the compute service
/// rejects the request (404 for unknown ids).
pub async fn run(app: &AppContext, args: &DeleteArgs) -> Result<()> {
    let server_id = require_server_id(args.server_id.as_deref(), MISSING_ID, USAGE)?;
    let api = app.connect().await?;
    api.delete_server(&server_id).await?;
    app.renderer().render_deleted(&server_id)
}
