//! Request and identity types flowing through the responder

use http::Method;
use std::net::SocketAddr;

/// One inbound update call, as seen by the responder
///
/// Built by the HTTP layer from the raw request; consumed synchronously and
/// dropped once the response is written. Empty header or query values are
/// normalised to `None` by [`UpdateRequest::with_param`] and friends.
#[derive(Debug, Clone)]
pub struct UpdateRequest {
    /// Peer address, when the transport exposes it
    pub remote_addr: Option<SocketAddr>,
    /// HTTP method
    pub method: Method,
    /// `User-Agent` header
    pub user_agent: Option<String>,
    /// `Authorization` header
    pub authorization: Option<String>,
    /// `hostname` query parameter
    pub hostname: Option<String>,
    /// `myip` query parameter
    pub myip: Option<String>,
}

impl UpdateRequest {
    /// Create a request with the given method and nothing else set
    pub fn new(method: Method) -> Self {
        Self {
            remote_addr: None,
            method,
            user_agent: None,
            authorization: None,
            hostname: None,
            myip: None,
        }
    }

    /// Set the peer address
    pub fn with_remote_addr(mut self, addr: SocketAddr) -> Self {
        self.remote_addr = Some(addr);
        self
    }

    /// Set the `User-Agent` header
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = non_empty(user_agent.into());
        self
    }

    /// Set the `Authorization` header
    pub fn with_authorization(mut self, authorization: impl Into<String>) -> Self {
        self.authorization = non_empty(authorization.into());
        self
    }

    /// Set the `hostname` query parameter
    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = non_empty(hostname.into());
        self
    }

    /// Set the `myip` query parameter
    pub fn with_myip(mut self, myip: impl Into<String>) -> Self {
        self.myip = non_empty(myip.into());
        self
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

/// A client that passed Basic-Auth
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    /// The authenticated username
    pub username: String,
}

/// A request that passed every check and is ready for the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUpdate {
    /// Who asked for the update
    pub identity: AuthenticatedIdentity,
    /// Name to update
    pub fqdn: String,
    /// Address to point it at
    pub ip: String,
}
