//! Update request validation
//!
//! Turns an [`UpdateRequest`] into either a [`ValidatedUpdate`] or the first
//! [`ValidationError`] encountered. Checks run in a fixed order and stop at
//! the first failure:
//!
//! 1. User-Agent contains the configured client token (`badagent`, 400)
//! 2. Method is `GET` (`badagent`, 405)
//! 3. Basic-Auth decodes and the verifier accepts it (`badauth`, 401)
//! 4. `hostname` is present (`nofqdn`, 200)
//! 5. `myip` is present (`dnserr`, 200)
//!
//! Validation is pure: no I/O, no panics, exactly one outcome per request.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use http::{Method, StatusCode};
use std::sync::Arc;
use thiserror::Error;

use crate::config::ResponderConfig;
use crate::protocol::ResponseCode;
use crate::request::{AuthenticatedIdentity, UpdateRequest, ValidatedUpdate};
use crate::responder::Stage;
use crate::traits::CredentialVerifier;

const BASIC_PREFIX: &str = "Basic ";

/// Why a request was rejected before reaching the provider
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// User-Agent missing or without the client token
    #[error("invalid user agent")]
    BadUserAgent,

    /// Anything other than GET
    #[error("method not allowed")]
    MethodNotAllowed,

    /// No `Authorization: Basic ...` header
    #[error("missing authorization header")]
    MissingAuthorization,

    /// Basic payload is not valid base64
    #[error("invalid base64 in auth header")]
    InvalidBase64,

    /// Decoded payload is not `username:password`
    #[error("malformed credentials in auth header")]
    MalformedCredentials,

    /// Well-formed credentials that the verifier refused
    #[error("invalid credentials")]
    InvalidCredentials {
        /// The username that was presented
        username: String,
    },

    /// No `hostname` query parameter
    #[error("missing hostname parameter")]
    MissingHostname {
        /// The authenticated username
        username: String,
        /// The requested address, if one was sent
        ip: Option<String>,
    },

    /// No `myip` query parameter
    #[error("missing myip parameter")]
    MissingIp {
        /// The authenticated username
        username: String,
        /// The requested hostname
        fqdn: String,
    },
}

impl ValidationError {
    /// Protocol code written to the response body
    pub fn response_code(&self) -> ResponseCode {
        match self {
            ValidationError::BadUserAgent | ValidationError::MethodNotAllowed => {
                ResponseCode::BadAgent
            }
            ValidationError::MissingAuthorization
            | ValidationError::InvalidBase64
            | ValidationError::MalformedCredentials
            | ValidationError::InvalidCredentials { .. } => ResponseCode::BadAuth,
            ValidationError::MissingHostname { .. } => ResponseCode::NoFqdn,
            ValidationError::MissingIp { .. } => ResponseCode::DnsError,
        }
    }

    /// HTTP status for the response
    ///
    /// Parameter errors follow the DynDNS convention of answering 200 with
    /// an error code in the body.
    pub fn status(&self) -> StatusCode {
        match self {
            ValidationError::BadUserAgent => StatusCode::BAD_REQUEST,
            ValidationError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ValidationError::MissingAuthorization
            | ValidationError::InvalidBase64
            | ValidationError::MalformedCredentials
            | ValidationError::InvalidCredentials { .. } => StatusCode::UNAUTHORIZED,
            ValidationError::MissingHostname { .. } | ValidationError::MissingIp { .. } => {
                StatusCode::OK
            }
        }
    }

    /// Last stage the request completed before it was rejected
    pub fn stage(&self) -> Stage {
        match self {
            ValidationError::BadUserAgent => Stage::Start,
            ValidationError::MethodNotAllowed => Stage::UserAgentChecked,
            ValidationError::MissingAuthorization
            | ValidationError::InvalidBase64
            | ValidationError::MalformedCredentials
            | ValidationError::InvalidCredentials { .. } => Stage::MethodChecked,
            ValidationError::MissingHostname { .. } | ValidationError::MissingIp { .. } => {
                Stage::Authenticated
            }
        }
    }

    /// Authenticated username, when authentication had already succeeded
    pub fn username(&self) -> Option<&str> {
        match self {
            ValidationError::MissingHostname { username, .. }
            | ValidationError::MissingIp { username, .. } => Some(username.as_str()),
            _ => None,
        }
    }

    /// Requested hostname, when it had already been extracted
    pub fn fqdn(&self) -> Option<&str> {
        match self {
            ValidationError::MissingIp { fqdn, .. } => Some(fqdn.as_str()),
            _ => None,
        }
    }

    /// Requested address, when the request carried one
    pub fn ip(&self) -> Option<&str> {
        match self {
            ValidationError::MissingHostname { ip, .. } => ip.as_deref(),
            _ => None,
        }
    }
}

/// Validates DynDNS update requests
///
/// Holds the expected client token and the credential verifier; both are
/// fixed at construction and shared read-only across requests.
#[derive(Clone)]
pub struct UpdateRequestValidator {
    user_agent_token: String,
    credentials: Arc<dyn CredentialVerifier>,
}

impl UpdateRequestValidator {
    /// Create a validator
    ///
    /// # Parameters
    ///
    /// - `user_agent_token`: substring every client User-Agent must contain
    /// - `credentials`: verifier for decoded Basic-Auth pairs
    pub fn new(
        user_agent_token: impl Into<String>,
        credentials: Arc<dyn CredentialVerifier>,
    ) -> Self {
        Self {
            user_agent_token: user_agent_token.into(),
            credentials,
        }
    }

    /// Create a validator from responder configuration
    pub fn from_config(config: &ResponderConfig, credentials: Arc<dyn CredentialVerifier>) -> Self {
        Self::new(config.user_agent_token.clone(), credentials)
    }

    /// The client token this validator expects
    pub fn user_agent_token(&self) -> &str {
        &self.user_agent_token
    }

    /// Run every check in order and stop at the first failure
    pub fn validate(&self, request: &UpdateRequest) -> Result<ValidatedUpdate, ValidationError> {
        self.check_user_agent(request.user_agent.as_deref())?;
        Self::check_method(&request.method)?;
        let identity = self.authenticate(request.authorization.as_deref())?;
        Self::extract_params(identity, request.hostname.as_deref(), request.myip.as_deref())
    }

    /// User-Agent must be non-empty and contain the client token
    pub fn check_user_agent(&self, user_agent: Option<&str>) -> Result<(), ValidationError> {
        match user_agent {
            Some(ua) if !ua.is_empty() && ua.contains(&self.user_agent_token) => Ok(()),
            _ => Err(ValidationError::BadUserAgent),
        }
    }

    /// Only GET is accepted
    pub fn check_method(method: &Method) -> Result<(), ValidationError> {
        if *method == Method::GET {
            Ok(())
        } else {
            Err(ValidationError::MethodNotAllowed)
        }
    }

    /// Decode `Authorization: Basic <base64(user:pass)>` and verify the pair
    pub fn authenticate(
        &self,
        authorization: Option<&str>,
    ) -> Result<AuthenticatedIdentity, ValidationError> {
        let encoded = authorization
            .and_then(|header| header.strip_prefix(BASIC_PREFIX))
            .ok_or(ValidationError::MissingAuthorization)?;

        let payload = STANDARD
            .decode(encoded)
            .map_err(|_| ValidationError::InvalidBase64)?;
        let payload = String::from_utf8(payload).map_err(|_| ValidationError::MalformedCredentials)?;

        let (username, password) = payload
            .split_once(':')
            .ok_or(ValidationError::MalformedCredentials)?;

        if !self.credentials.verify(username, password) {
            return Err(ValidationError::InvalidCredentials {
                username: username.to_string(),
            });
        }

        Ok(AuthenticatedIdentity {
            username: username.to_string(),
        })
    }

    /// Pull `hostname` and `myip` out of the query
    pub fn extract_params(
        identity: AuthenticatedIdentity,
        hostname: Option<&str>,
        myip: Option<&str>,
    ) -> Result<ValidatedUpdate, ValidationError> {
        let Some(fqdn) = hostname.filter(|h| !h.is_empty()) else {
            return Err(ValidationError::MissingHostname {
                username: identity.username,
                ip: myip.filter(|ip| !ip.is_empty()).map(str::to_string),
            });
        };
        let Some(ip) = myip.filter(|ip| !ip.is_empty()) else {
            return Err(ValidationError::MissingIp {
                username: identity.username,
                fqdn: fqdn.to_string(),
            });
        };

        Ok(ValidatedUpdate {
            identity,
            fqdn: fqdn.to_string(),
            ip: ip.to_string(),
        })
    }
}

impl std::fmt::Debug for UpdateRequestValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateRequestValidator")
            .field("user_agent_token", &self.user_agent_token)
            .field("credentials", &"<verifier>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::StaticCredentials;

    const UA: &str = "dyndnsr53-client";

    fn validator() -> UpdateRequestValidator {
        UpdateRequestValidator::new(UA, Arc::new(StaticCredentials::new("user", "pass")))
    }

    fn basic(pair: &str) -> String {
        format!("Basic {}", STANDARD.encode(pair))
    }

    fn valid_request() -> UpdateRequest {
        UpdateRequest::new(Method::GET)
            .with_user_agent(format!("{UA}/1.0"))
            .with_authorization(basic("user:pass"))
            .with_hostname("test.example.com")
            .with_myip("1.2.3.4")
    }

    #[test]
    fn valid_request_passes() {
        let update = validator().validate(&valid_request()).unwrap();
        assert_eq!(update.identity.username, "user");
        assert_eq!(update.fqdn, "test.example.com");
        assert_eq!(update.ip, "1.2.3.4");
    }

    #[test]
    fn user_agent_must_contain_token() {
        let v = validator();
        assert_eq!(v.check_user_agent(None), Err(ValidationError::BadUserAgent));
        assert_eq!(v.check_user_agent(Some("")), Err(ValidationError::BadUserAgent));
        assert_eq!(v.check_user_agent(Some("curl/8.0")), Err(ValidationError::BadUserAgent));
        assert!(v.check_user_agent(Some("my-router dyndnsr53-client v2")).is_ok());
    }

    #[test]
    fn user_agent_is_checked_before_method_and_auth() {
        let mut request = valid_request();
        request.user_agent = None;
        request.method = Method::POST;
        request.authorization = None;

        let err = validator().validate(&request).unwrap_err();
        assert_eq!(err, ValidationError::BadUserAgent);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.response_code(), ResponseCode::BadAgent);
        assert_eq!(err.stage(), Stage::Start);
    }

    #[test]
    fn method_is_checked_before_auth() {
        let mut request = valid_request();
        request.method = Method::POST;
        request.authorization = None;

        let err = validator().validate(&request).unwrap_err();
        assert_eq!(err, ValidationError::MethodNotAllowed);
        assert_eq!(err.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(err.response_code(), ResponseCode::BadAgent);
    }

    #[test]
    fn auth_failures_are_all_badauth() {
        let v = validator();
        let cases = [
            (None, ValidationError::MissingAuthorization),
            (Some("Bearer abc".to_string()), ValidationError::MissingAuthorization),
            (Some("basic dXNlcjpwYXNz".to_string()), ValidationError::MissingAuthorization),
            (Some("Basic !!!not-base64".to_string()), ValidationError::InvalidBase64),
            (Some(basic("userpass")), ValidationError::MalformedCredentials),
            (
                Some(format!("Basic {}", STANDARD.encode([0xff, 0xfe, b':', b'x']))),
                ValidationError::MalformedCredentials,
            ),
            (
                Some(basic("bad:creds")),
                ValidationError::InvalidCredentials {
                    username: "bad".to_string(),
                },
            ),
        ];

        for (header, expected) in cases {
            let err = v.authenticate(header.as_deref()).unwrap_err();
            assert_eq!(err, expected, "header: {header:?}");
            assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(err.response_code(), ResponseCode::BadAuth);
        }
    }

    #[test]
    fn password_may_contain_colons() {
        let v = UpdateRequestValidator::new(UA, Arc::new(StaticCredentials::new("user", "p:a:ss")));
        let identity = v.authenticate(Some(&basic("user:p:a:ss"))).unwrap();
        assert_eq!(identity.username, "user");
    }

    #[test]
    fn missing_hostname_is_nofqdn() {
        let mut request = valid_request();
        request.hostname = None;

        let err = validator().validate(&request).unwrap_err();
        assert_eq!(err.response_code(), ResponseCode::NoFqdn);
        assert_eq!(err.status(), StatusCode::OK);
        assert_eq!(err.username(), Some("user"));
        assert_eq!(err.to_string(), "missing hostname parameter");
    }

    #[test]
    fn missing_ip_is_dnserr() {
        let mut request = valid_request();
        request.myip = None;

        let err = validator().validate(&request).unwrap_err();
        assert_eq!(err.response_code(), ResponseCode::DnsError);
        assert_eq!(err.status(), StatusCode::OK);
        assert_eq!(err.fqdn(), Some("test.example.com"));
        assert_eq!(err.stage(), Stage::Authenticated);
    }

    #[test]
    fn hostname_is_checked_before_ip() {
        let mut request = valid_request();
        request.hostname = None;
        request.myip = None;

        let err = validator().validate(&request).unwrap_err();
        assert!(matches!(err, ValidationError::MissingHostname { .. }));
    }

    #[test]
    fn empty_params_count_as_missing() {
        let identity = AuthenticatedIdentity {
            username: "user".to_string(),
        };
        let err =
            UpdateRequestValidator::extract_params(identity, Some(""), Some("1.2.3.4")).unwrap_err();
        assert!(matches!(err, ValidationError::MissingHostname { .. }));
    }

    #[test]
    fn missing_hostname_keeps_the_requested_ip() {
        let identity = AuthenticatedIdentity {
            username: "user".to_string(),
        };
        let err =
            UpdateRequestValidator::extract_params(identity, None, Some("1.2.3.4")).unwrap_err();
        assert_eq!(err.username(), Some("user"));
        assert_eq!(err.ip(), Some("1.2.3.4"));
        assert_eq!(err.fqdn(), None);

        let identity = AuthenticatedIdentity {
            username: "user".to_string(),
        };
        let err = UpdateRequestValidator::extract_params(identity, None, Some("")).unwrap_err();
        assert_eq!(err.ip(), None);
    }
}
