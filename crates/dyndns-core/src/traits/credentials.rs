//! Credential verification for Basic-Auth
//!
//! The responder decodes `Authorization: Basic ...` itself and hands the
//! resulting pair to a [`CredentialVerifier`]. Swapping the verifier changes
//! where credentials come from without touching the parsing contract.

use crate::config::CredentialsConfig;

/// Decides whether a username/password pair is accepted
pub trait CredentialVerifier: Send + Sync {
    /// Return `true` when the pair is valid
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// A single fixed credential pair
///
/// The Debug implementation never prints the password.
#[derive(Clone)]
pub struct StaticCredentials {
    username: String,
    password: String,
}

impl StaticCredentials {
    /// Create a verifier accepting exactly this pair
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl From<&CredentialsConfig> for StaticCredentials {
    fn from(config: &CredentialsConfig) -> Self {
        Self::new(config.username.clone(), config.password.clone())
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        // Both comparisons always run
        let user_ok = self.username == username;
        let pass_ok = self.password == password;
        user_ok & pass_ok
    }
}

impl std::fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .finish()
    }
}
