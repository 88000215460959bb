//! DynDNS v2/v3 protocol response codes
//!
//! Every update answer is a single line whose first token is one of the
//! codes below. `good` and `nochg` are followed by the IP that was applied.
//!
//! Only `good`, `badauth`, `badagent`, `nofqdn` and `dnserr` are produced by
//! the responder today; the remaining codes are part of the protocol and are
//! kept so providers and future checks can return them.

use std::fmt;

/// A DynDNS protocol response code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseCode {
    /// `good <ip>`: the update was applied
    Good(String),
    /// `nochg <ip>`: the record already pointed at the IP
    NoChange(String),
    /// `badauth`: authentication failed
    BadAuth,
    /// `!donator`: feature reserved for paying accounts
    NotDonator,
    /// `nofqdn`: the hostname is missing or not a fully qualified name
    NoFqdn,
    /// `nohost`: the hostname does not exist for this account
    NoHost,
    /// `numhost`: too many hosts in one request
    NumHost,
    /// `abuse`: the hostname is blocked
    Abuse,
    /// `badagent`: the client agent is not accepted
    BadAgent,
    /// `dnserr`: server-side DNS error
    DnsError,
    /// `911`: server-side failure, client should back off
    ServerError,
}

impl ResponseCode {
    /// The bare protocol token, without the trailing IP
    pub fn token(&self) -> &'static str {
        match self {
            ResponseCode::Good(_) => "good",
            ResponseCode::NoChange(_) => "nochg",
            ResponseCode::BadAuth => "badauth",
            ResponseCode::NotDonator => "!donator",
            ResponseCode::NoFqdn => "nofqdn",
            ResponseCode::NoHost => "nohost",
            ResponseCode::NumHost => "numhost",
            ResponseCode::Abuse => "abuse",
            ResponseCode::BadAgent => "badagent",
            ResponseCode::DnsError => "dnserr",
            ResponseCode::ServerError => "911",
        }
    }

    /// The HTTP response body: the code line followed by a newline
    pub fn body(&self) -> String {
        format!("{self}\n")
    }

    /// Whether the client should consider the update applied
    pub fn is_success(&self) -> bool {
        matches!(self, ResponseCode::Good(_) | ResponseCode::NoChange(_))
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseCode::Good(ip) | ResponseCode::NoChange(ip) => {
                write!(f, "{} {}", self.token(), ip)
            }
            other => f.write_str(other.token()),
        }
    }
}
