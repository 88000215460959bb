//! Core traits for the DynDNS responder
//!
//! This module defines the abstract interfaces that implementations plug into.
//!
//! - [`RecordProvider`]: Apply an update to a DNS backend
//! - [`CredentialVerifier`]: Accept or refuse a Basic-Auth credential pair

pub mod credentials;
pub mod record_provider;

pub use credentials::{CredentialVerifier, StaticCredentials};
pub use record_provider::{RecordProvider, RecordProviderFactory};
