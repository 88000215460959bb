//! Configuration types for the DynDNS responder
//!
//! This module defines all configuration structures used throughout the crate.
//! The daemon fills them from CLI flags and environment variables; embedders
//! can build them directly or deserialize them with serde.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main DynDNS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DynDnsConfig {
    /// HTTP listener settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Update request handling
    #[serde(default)]
    pub responder: ResponderConfig,

    /// Basic-Auth credentials accepted by the responder
    pub credentials: CredentialsConfig,

    /// Record provider backing the updates
    #[serde(default)]
    pub provider: ProviderConfig,
}

impl DynDnsConfig {
    /// Create a configuration with defaults and the given credentials
    pub fn new(credentials: CredentialsConfig) -> Self {
        Self {
            server: ServerConfig::default(),
            responder: ResponderConfig::default(),
            credentials,
            provider: ProviderConfig::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.server.validate()?;
        self.responder.validate()?;
        self.credentials.validate()?;
        self.provider.validate()?;
        Ok(())
    }
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8080")
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl ServerConfig {
    /// Validate the listener configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.listen.trim().is_empty() {
            return Err(crate::Error::config("Listen address cannot be empty"));
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

/// Responder configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponderConfig {
    /// Substring the client's User-Agent must contain
    #[serde(default = "default_user_agent_token")]
    pub user_agent_token: String,

    /// Upper bound for a single provider call (in seconds)
    ///
    /// Set to 0 to let the provider call run unbounded.
    #[serde(default = "default_update_timeout_secs")]
    pub update_timeout_secs: u64,
}

impl ResponderConfig {
    /// Validate the responder configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.user_agent_token.is_empty() {
            return Err(crate::Error::config("User-Agent token cannot be empty"));
        }
        Ok(())
    }

    /// The provider call timeout, `None` when disabled
    pub fn update_timeout(&self) -> Option<Duration> {
        match self.update_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            user_agent_token: default_user_agent_token(),
            update_timeout_secs: default_update_timeout_secs(),
        }
    }
}

/// Basic-Auth credentials
///
/// The Debug implementation never prints the password.
#[derive(Clone, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Accepted username
    pub username: String,
    /// Accepted password
    pub password: String,
}

impl CredentialsConfig {
    /// Create a credential pair
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Validate the credentials
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.username.is_empty() {
            return Err(crate::Error::config("Username cannot be empty"));
        }
        // A ':' in the username would be split off by the Basic-Auth decoder
        if self.username.contains(':') {
            return Err(crate::Error::config("Username cannot contain ':'"));
        }
        if self.password.is_empty() {
            return Err(crate::Error::config("Password cannot be empty"));
        }
        Ok(())
    }
}

impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .finish()
    }
}

/// Record provider configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// No backend: updates are accepted and not applied
    #[default]
    None,

    /// AWS Route53, scoped to one hosted zone
    Route53 {
        /// Hosted zone ID (e.g., "Z1234567890")
        zone_id: String,
        /// AWS region override (Route53 is global; defaults to us-east-1)
        region: Option<String>,
        /// Endpoint override (e.g., a LocalStack URL)
        endpoint_url: Option<String>,
    },

    /// Custom provider
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl ProviderConfig {
    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ProviderConfig::None => Ok(()),
            ProviderConfig::Route53 {
                zone_id,
                endpoint_url,
                ..
            } => {
                if zone_id.trim().is_empty() {
                    return Err(crate::Error::config(
                        "Route53 zone ID is required when using the route53 provider",
                    ));
                }
                if let Some(url) = endpoint_url
                    && !url.starts_with("https://")
                    && !url.starts_with("http://")
                {
                    return Err(crate::Error::config(format!(
                        "Route53 endpoint URL must use HTTP or HTTPS scheme. Got: {}",
                        url
                    )));
                }
                Ok(())
            }
            ProviderConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config(
                        "Custom provider factory cannot be empty",
                    ));
                }
                if config.is_null() {
                    return Err(crate::Error::config(
                        "Custom provider config cannot be null",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Get the provider type name
    pub fn type_name(&self) -> &str {
        match self {
            ProviderConfig::None => "none",
            ProviderConfig::Route53 { .. } => "route53",
            ProviderConfig::Custom { factory, .. } => factory,
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_user_agent_token() -> String {
    "dyndnsr53-client".to_string()
}

fn default_update_timeout_secs() -> u64 {
    30
}
