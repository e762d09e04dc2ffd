use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::timestamp;

/// A single IP assignment on a server network.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddressEntry {
    pub addr: String,
    /// IP version (4 or 6). Absent on some older compute releases.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u8>,
}

impl AddressEntry {
    #[must_use]
    pub fn v4(addr: &str) -> Self {
        Self {
            addr: addr.to_string(),
            version: Some(4),
        }
    }
}

/// Full server detail as returned by `GET /servers/{id}`.
///
/// Create responses carry only a subset of these fields, so everything but
/// `id` falls back to an empty value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ServerRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
    /// Network name to assigned addresses.
    #[serde(default)]
    pub addresses: BTreeMap<String, Vec<AddressEntry>>,
    #[serde(
        default,
        deserialize_with = "timestamp::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub created: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "timestamp::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated: Option<DateTime<Utc>>,
}

impl ServerRecord {
    /// All assigned addresses, flattened in network-name order.
    pub fn all_addresses(&self) -> impl Iterator<Item = &AddressEntry> {
        self.addresses.values().flatten()
    }

    /// Returns `true` once the compute service has assigned at least one address.
    #[must_use]
    pub fn has_address(&self) -> bool {
        self.all_addresses().next().is_some()
    }
}

/// Entry of the `GET /servers` collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerSummary {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Body of a server create request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewServer {
    pub name: String,
    #[serde(rename = "imageRef")]
    pub image_ref: String,
    #[serde(rename = "flavorRef")]
    pub flavor_ref: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_name: Option<String>,
}

/// `{"server": ...}` envelope used by single-server requests and responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerEnvelope<T> {
    pub server: T,
}

/// `{"servers": [...]}` envelope of the collection endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServersEnvelope {
    #[serde(default)]
    pub servers: Vec<ServerSummary>,
}

/// Accepts ids serialized as JSON strings or integers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct IdVisitor;

    impl Visitor<'_> for IdVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string or integer id")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(IdVisitor)
}
