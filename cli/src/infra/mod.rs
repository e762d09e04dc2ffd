//! Infrastructure layer: concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: HTTP calls to the identity
//! and compute services, process execution, ssh transports and config files.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod command_runner;
pub mod compute;
pub mod config;
pub mod fs;
pub mod http;
pub mod identity;
pub mod ssh;
