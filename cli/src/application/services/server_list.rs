//! Application service: server listing use-case.
//!
//! The collection endpoint returns summaries only, so each record is fetched
//! again by id for full detail.

use alamo_common::ServerRecord;
use anyhow::Result;
use futures_util::{StreamExt as _, TryStreamExt as _, stream};

use crate::application::ports::ComputeApi;

/// Maximum detail requests in flight at once.
pub const LIST_CONCURRENCY: usize = 8;

/// List every server with full detail, in collection order.
///
/// An empty fleet yields an empty vector.
///
/// # Errors
///
/// Returns the first `ApiError` (or transport error) hit by any request.
pub async fn list_servers(api: &impl ComputeApi) -> Result<Vec<ServerRecord>> {
    let summaries = api.list_server_summaries().await?;
    tracing::debug!(count = summaries.len(), "fetching server detail");

    stream::iter(summaries)
        .map(|summary| async move { api.get_server(&summary.id).await })
        .buffered(LIST_CONCURRENCY)
        .try_collect()
        .await
}
