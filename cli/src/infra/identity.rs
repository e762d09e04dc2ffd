//! Keystone v2.0 implementation of the `IdentityService` port.

use alamo_common::{AccessEnvelope, TokenRequest};
use anyhow::Result;
use reqwest::header::{ACCEPT, CONTENT_TYPE};

use crate::application::ports::IdentityService;
use crate::domain::{AuthError, Credentials, Endpoint, Secret, TenantCredentials};
use crate::infra::http::body_text;

/// Catalog service type of the compute API.
pub const COMPUTE_SERVICE: &str = "compute";

/// Password-credential client for `POST {auth_url}/tokens`.
pub struct KeystoneClient {
    http: reqwest::Client,
}

impl KeystoneClient {
    #[must_use]
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

impl IdentityService for KeystoneClient {
    async fn resolve(&self, tenant: &TenantCredentials) -> Result<(Endpoint, Credentials)> {
        let url = format!("{}/tokens", tenant.auth_url);
        tracing::debug!(%url, username = %tenant.username, tenant = %tenant.tenant_name, "authenticating");

        let body = TokenRequest::password(
            &tenant.username,
            tenant.password.expose(),
            &tenant.tenant_name,
        );
        let response = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthError::Unreachable {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                body: body_text(response).await,
            }
            .into());
        }

        let envelope: AccessEnvelope = response
            .json()
            .await
            .map_err(|e| AuthError::Malformed(e.to_string()))?;
        let access = envelope.access;
        if access.token.id.is_empty() {
            return Err(AuthError::Malformed("empty token id".to_string()).into());
        }

        let public_url = access
            .endpoint_for(COMPUTE_SERVICE, tenant.region.as_deref())
            .ok_or_else(|| AuthError::MissingCatalogEntry {
                service: COMPUTE_SERVICE.to_string(),
                region: tenant.region.clone(),
            })?;
        let endpoint = Endpoint::new(public_url);
        tracing::info!(endpoint = endpoint.base_url(), "resolved compute endpoint");

        Ok((
            endpoint,
            Credentials {
                token: Secret::new(access.token.id),
                tenant_id: access.token.tenant.map(|t| t.id),
                expires: access.token.expires,
            },
        ))
    }
}
