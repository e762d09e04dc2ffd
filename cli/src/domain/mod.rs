//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `reqwest`, `std::fs`, `std::process`, or
//! `std::net`. All functions are synchronous and take data in, returning data
//! out.

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod settings;
pub mod ssh;
pub mod table;

pub use config::{AlamoConfig, ProvisioningOverrides, TenantOverrides};
pub use error::{
    ApiError, AuthError, BootstrapError, ConfigError, ConnectionError, FormatError, RunnerError,
    UsageError,
};
pub use settings::{
    BastionSpec, Credentials, Endpoint, HttpSettings, PollPolicy, ProvisioningConfig, Secret,
    SshSettings, TenantCredentials,
};
