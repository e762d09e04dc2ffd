//! Keystone v2.0 token request and response bodies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timestamp;

/// `POST /tokens` request body.
#[derive(Debug, Clone, Serialize)]
pub struct TokenRequest<'a> {
    pub auth: AuthBody<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthBody<'a> {
    #[serde(rename = "passwordCredentials")]
    pub password_credentials: PasswordCredentials<'a>,
    #[serde(rename = "tenantName")]
    pub tenant_name: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct PasswordCredentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

impl<'a> TokenRequest<'a> {
    #[must_use]
    pub fn password(username: &'a str, password: &'a str, tenant_name: &'a str) -> Self {
        Self {
            auth: AuthBody {
                password_credentials: PasswordCredentials { username, password },
                tenant_name,
            },
        }
    }
}

/// `POST /tokens` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessEnvelope {
    pub access: Access,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Access {
    pub token: Token,
    #[serde(default, rename = "serviceCatalog")]
    pub service_catalog: Vec<CatalogEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Token {
    pub id: String,
    #[serde(default, deserialize_with = "timestamp::lenient")]
    pub expires: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tenant: Option<Tenant>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tenant {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    #[serde(rename = "type")]
    pub service_type: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub endpoints: Vec<CatalogEndpoint>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEndpoint {
    #[serde(default)]
    pub region: Option<String>,
    #[serde(rename = "publicURL")]
    pub public_url: String,
}

impl Access {
    /// Public URL of the first endpoint of `service_type`, restricted to
    /// `region` when one is given.
    #[must_use]
    pub fn endpoint_for(&self, service_type: &str, region: Option<&str>) -> Option<&str> {
        self.service_catalog
            .iter()
            .filter(|entry| entry.service_type == service_type)
            .flat_map(|entry| entry.endpoints.iter())
            .find(|ep| region.is_none_or(|r| ep.region.as_deref() == Some(r)))
            .map(|ep| ep.public_url.as_str())
    }
}
