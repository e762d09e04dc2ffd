pub mod compute;
pub mod identity;
pub mod timestamp;

pub use compute::{
    AddressEntry, NewServer, ServerEnvelope, ServerRecord, ServerSummary, ServersEnvelope,
};
pub use identity::{Access, AccessEnvelope, CatalogEndpoint, CatalogEntry, Token, TokenRequest};
