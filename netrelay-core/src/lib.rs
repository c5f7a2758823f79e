//! Core types and utilities for networked relay modules
//!
//! This crate provides the error taxonomy, endpoint and credential types,
//! and the process-wide defaults shared by every other crate.

pub mod constants;
pub mod credential;
pub mod endpoint;
pub mod error;

pub use credential::Credential;
pub use endpoint::Endpoint;
pub use error::{FailureKind, RelayError, RelayResult};
