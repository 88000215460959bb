// # Record Provider Trait
//
// Defines the interface for applying a DynDNS update to a DNS backend.
//
// ## Implementations
//
// - Null: `dyndns_core::provider::NullProvider` (accepts, never mutates)
// - Route53: `dyndns-provider-route53` crate (one hosted zone per instance)
//
// ## Usage
//
// ```rust,ignore
// use dyndns_core::RecordProvider;
//
// async fn apply(provider: &dyn RecordProvider) -> Result<(), dyndns_core::UpdateError> {
//     provider.update_record("home.example.com", "1.2.3.4").await
// }
// ```

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::ProviderConfig;
use crate::error::UpdateError;

/// Trait for record provider implementations
///
/// A provider applies one `fqdn -> ip` mapping per call. The responder owns
/// request validation, timeouts and response-code mapping; a provider only
/// talks to its backend.
///
/// # Thread Safety
///
/// Providers are shared behind an `Arc` across every in-flight request.
/// Any binding they hold (zone, client) must be immutable after construction
/// so that concurrent calls need no external locking.
///
/// # Retries
///
/// Providers must not retry. A failed call is reported as `dnserr` right away
/// and the DynDNS client decides when to try again.
#[async_trait]
pub trait RecordProvider: Send + Sync {
    /// Point the record for `fqdn` at `ip`
    ///
    /// # Idempotency
    ///
    /// Calling this twice with the same arguments must leave the backend in
    /// the same state as calling it once (create-or-replace, never append).
    ///
    /// # Errors
    ///
    /// - [`UpdateError::InvalidArgument`] if `fqdn` or `ip` is empty
    /// - [`UpdateError::ZoneMismatch`] if the provider is zone-scoped and the
    ///   name falls outside its zone
    /// - [`UpdateError::Upstream`] if the backend fails the change
    async fn update_record(&self, fqdn: &str, ip: &str) -> Result<(), UpdateError>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;

    /// Whether this provider discards updates instead of applying them
    fn is_noop(&self) -> bool {
        false
    }
}

/// Helper trait for constructing record providers from configuration
///
/// Construction is async because zone-scoped providers resolve their hosted
/// zone once, up front.
#[async_trait]
pub trait RecordProviderFactory: Send + Sync {
    /// Create a RecordProvider instance from configuration
    ///
    /// A failure here is fatal to startup.
    async fn create(
        &self,
        config: &ProviderConfig,
    ) -> Result<Arc<dyn RecordProvider>, crate::Error>;
}

/// Reject empty update arguments
///
/// Shared precondition check for provider implementations.
pub fn ensure_update_args(fqdn: &str, ip: &str) -> Result<(), UpdateError> {
    if fqdn.is_empty() || ip.is_empty() {
        return Err(UpdateError::invalid_argument("fqdn and ip must not be empty"));
    }
    Ok(())
}
