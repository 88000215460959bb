//! Error types for the DynDNS responder
//!
//! This module defines the error taxonomy used throughout the crate:
//!
//! - [`Error`]: startup and wiring errors (configuration, provider construction)
//! - [`UpdateError`]: failures of a single [`RecordProvider`](crate::RecordProvider) call
//!
//! Request validation failures live in [`crate::validator::ValidationError`];
//! they are never fatal and always map to a protocol response code.

use thiserror::Error;

/// Result type alias for DynDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed upstream error carried unchanged by [`UpdateError::Upstream`]
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Core error type for startup and wiring
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Record provider errors raised while constructing a provider
    #[error("Record provider error: {0}")]
    Update(#[from] UpdateError),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Why an FQDN was refused by a zone-scoped provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneMismatchKind {
    /// The name is neither the zone apex nor a subdomain of it
    OutsideZone,
    /// The zone name occurs more than once (e.g. `home.zone.tld.zone.tld`)
    RepeatedSuffix,
}

impl ZoneMismatchKind {
    fn describe(&self, zone: &str) -> String {
        match self {
            ZoneMismatchKind::OutsideZone => format!("does not belong to hosted zone {zone}"),
            ZoneMismatchKind::RepeatedSuffix => format!("contains zone name {zone} multiple times"),
        }
    }
}

/// Failure of a single record update
#[derive(Error, Debug)]
pub enum UpdateError {
    /// Empty FQDN or IP passed to a provider
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// FQDN is not inside the provider's hosted zone
    #[error("FQDN {fqdn} {}", .kind.describe(.zone))]
    ZoneMismatch {
        /// The FQDN as supplied by the caller
        fqdn: String,
        /// The hosted zone the provider is bound to
        zone: String,
        /// Which membership rule failed
        kind: ZoneMismatchKind,
    },

    /// The hosted zone could not be resolved at construction time
    #[error("Failed to look up hosted zone '{zone_id}': {reason}")]
    ZoneLookupFailed {
        /// The zone identifier that was requested
        zone_id: String,
        /// Cause reported by the backend
        reason: String,
    },

    /// The backend rejected or failed the change
    #[error("Upstream error: {0}")]
    Upstream(#[source] BoxError),
}

impl UpdateError {
    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a zone lookup error
    pub fn zone_lookup(zone_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ZoneLookupFailed {
            zone_id: zone_id.into(),
            reason: reason.into(),
        }
    }

    /// Wrap a backend failure
    pub fn upstream(err: impl Into<BoxError>) -> Self {
        Self::Upstream(err.into())
    }
}
