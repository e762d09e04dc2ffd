//! Nova implementation of the `ComputeApi` port.

use alamo_common::{NewServer, ServerEnvelope, ServerRecord, ServerSummary, ServersEnvelope};
use anyhow::{Context, Result};
use reqwest::Method;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;

use crate::application::ports::ComputeApi;
use crate::domain::{ApiError, Credentials, Endpoint};
use crate::infra::http::body_text;

/// Header carrying the identity token on every compute call.
pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// Authenticated client bound to one compute endpoint.
pub struct NovaClient {
    http: reqwest::Client,
    endpoint: Endpoint,
    credentials: Credentials,
}

impl NovaClient {
    #[must_use]
    pub fn new(http: reqwest::Client, endpoint: Endpoint, credentials: Credentials) -> Self {
        Self {
            http,
            endpoint,
            credentials,
        }
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::Response> {
        let url = self.endpoint.url(path);
        tracing::debug!(%method, %url, "compute request");

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(AUTH_TOKEN_HEADER, self.credentials.token.expose())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request
            .send()
            .await
            .with_context(|| format!("{method} {url} failed"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError {
                method: method.to_string(),
                path: path.to_string(),
                status: status.as_u16(),
                body: body_text(response).await,
            }
            .into());
        }
        Ok(response)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<T> {
        let response = self.send(method.clone(), path, body).await?;
        response
            .json()
            .await
            .with_context(|| format!("cannot parse response of {method} {path}"))
    }
}

impl ComputeApi for NovaClient {
    async fn list_server_summaries(&self) -> Result<Vec<ServerSummary>> {
        let envelope: ServersEnvelope = self.fetch(Method::GET, "/servers", None).await?;
        Ok(envelope.servers)
    }

    async fn get_server(&self, id: &str) -> Result<ServerRecord> {
        let envelope: ServerEnvelope<ServerRecord> = self
            .fetch(Method::GET, &format!("/servers/{id}"), None)
            .await?;
        Ok(envelope.server)
    }

    async fn create_server(&self, server: &NewServer) -> Result<ServerRecord> {
        let body = serde_json::to_value(ServerEnvelope { server })
            .context("cannot encode server create request")?;
        let envelope: ServerEnvelope<ServerRecord> =
            self.fetch(Method::POST, "/servers", Some(&body)).await?;
        tracing::info!(id = %envelope.server.id, name = %server.name, "server created");
        Ok(envelope.server)
    }

    async fn delete_server(&self, id: &str) -> Result<()> {
        self.send(Method::DELETE, &format!("/servers/{id}"), None)
            .await?;
        tracing::info!(id, "server deleted");
        Ok(())
    }
}
