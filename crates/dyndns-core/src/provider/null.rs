// # Null Provider
//
// Record provider that accepts every well-formed update and changes nothing.
//
// ## Purpose
//
// Lets the responder run end to end without a DNS backend: clients get the
// same `good <ip>` answer they would get from a real provider, and the
// request log records that no provider was configured.
//
// ## When to Use
//
// - Testing environments
// - Staging a client configuration before pointing it at a real zone

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::ProviderConfig;
use crate::error::UpdateError;
use crate::traits::record_provider::{RecordProvider, RecordProviderFactory, ensure_update_args};

/// No-op record provider
///
/// # Example
///
/// ```rust,no_run
/// use dyndns_core::provider::NullProvider;
/// use dyndns_core::RecordProvider;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let provider = NullProvider::new();
///     provider.update_record("home.example.com", "1.2.3.4").await?;
///     assert!(provider.is_noop());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProvider;

impl NullProvider {
    /// Create a new null provider
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RecordProvider for NullProvider {
    async fn update_record(&self, fqdn: &str, ip: &str) -> Result<(), UpdateError> {
        ensure_update_args(fqdn, ip)?;
        tracing::debug!(fqdn, ip, "Null provider: discarding update");
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "none"
    }

    fn is_noop(&self) -> bool {
        true
    }
}

/// Factory for the null provider
pub struct NullProviderFactory;

#[async_trait]
impl RecordProviderFactory for NullProviderFactory {
    async fn create(
        &self,
        config: &ProviderConfig,
    ) -> Result<Arc<dyn RecordProvider>, crate::Error> {
        match config {
            ProviderConfig::None => Ok(Arc::new(NullProvider::new())),
            _ => Err(crate::Error::config("Invalid config for null provider")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn accepts_well_formed_updates() {
        let provider = NullProvider::new();
        assert!(provider.update_record("home.example.com", "1.2.3.4").await.is_ok());
        // Repeating the same update is equally fine
        assert!(provider.update_record("home.example.com", "1.2.3.4").await.is_ok());
        assert!(provider.is_noop());
        assert_eq!(provider.provider_name(), "none");
    }

    #[tokio::test]
    async fn rejects_empty_arguments() {
        let provider = NullProvider::new();
        assert!(matches!(
            provider.update_record("", "1.2.3.4").await,
            Err(UpdateError::InvalidArgument(_))
        ));
        assert!(matches!(
            provider.update_record("home.example.com", "").await,
            Err(UpdateError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn factory_only_accepts_none_config() {
        let factory = NullProviderFactory;
        assert!(factory.create(&ProviderConfig::None).await.is_ok());

        let config = ProviderConfig::Route53 {
            zone_id: "Z1".to_string(),
            region: None,
            endpoint_url: None,
        };
        assert!(factory.create(&config).await.is_err());
    }
}
