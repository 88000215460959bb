//! Plugin-based provider registry
//!
//! The registry allows record providers to be registered dynamically at
//! runtime, avoiding hardcoded if-else chains in the daemon.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dyndns_core::registry::ProviderRegistry;
//! use dyndns_core::config::ProviderConfig;
//!
//! // Create a registry with the null provider pre-registered
//! let registry = ProviderRegistry::with_builtins();
//!
//! // Register additional providers
//! dyndns_provider_route53::register(&registry);
//!
//! // Create provider from config
//! let config = ProviderConfig::Route53 { ... };
//! let provider = registry.create_provider(&config).await?;
//! ```

use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use crate::provider::NullProviderFactory;
use crate::traits::{RecordProvider, RecordProviderFactory};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Provider registry for plugin-based record provider creation
///
/// The registry maintains a map of provider type names to factory objects,
/// allowing dynamic instantiation of providers based on configuration.
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes. The lock is never held across an await.
#[derive(Default)]
pub struct ProviderRegistry {
    /// Registered record provider factories
    providers: RwLock<HashMap<String, Arc<dyn RecordProviderFactory>>>,
}

impl ProviderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in `none` provider registered
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        registry.register_provider("none", Box::new(NullProviderFactory));
        registry
    }

    /// Register a record provider factory
    ///
    /// # Parameters
    ///
    /// - `name`: Provider type name (e.g., "none", "route53")
    /// - `factory`: Factory object for creating provider instances
    pub fn register_provider(
        &self,
        name: impl Into<String>,
        factory: Box<dyn RecordProviderFactory>,
    ) {
        let name = name.into();
        let mut providers = self.providers.write().unwrap_or_else(PoisonError::into_inner);
        providers.insert(name, Arc::from(factory));
    }

    /// Create a record provider from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Arc<dyn RecordProvider>)`: Created provider instance
    /// - `Err(Error)`: If the provider type is not registered or creation fails
    pub async fn create_provider(&self, config: &ProviderConfig) -> Result<Arc<dyn RecordProvider>> {
        let provider_type = config.type_name();

        let factory = {
            let providers = self.providers.read().unwrap_or_else(PoisonError::into_inner);
            match providers.get(provider_type) {
                Some(factory) => factory.clone(),
                None => {
                    let mut known: Vec<&str> = providers.keys().map(String::as_str).collect();
                    known.sort_unstable();
                    return Err(Error::config(format!(
                        "Unknown provider type: {}. Supported providers: {}",
                        provider_type,
                        known.join(", ")
                    )));
                }
            }
        };

        factory.create(config).await
    }

    /// List all registered provider types
    pub fn list_providers(&self) -> Vec<String> {
        let providers = self.providers.read().unwrap_or_else(PoisonError::into_inner);
        providers.keys().cloned().collect()
    }

    /// Check if a provider type is registered
    pub fn has_provider(&self, name: &str) -> bool {
        let providers = self.providers.read().unwrap_or_else(PoisonError::into_inner);
        providers.contains_key(name)
    }
}
