// # dyndns-core
//
// Core library for the DynDNS update responder.
//
// ## Architecture Overview
//
// This library provides the protocol side of a DynDNS v2/v3 endpoint:
// - **UpdateRequestValidator**: User-Agent, method, Basic-Auth and parameter checks
// - **RecordProvider**: Trait for applying an update to a DNS backend
// - **CredentialVerifier**: Trait for accepting a Basic-Auth pair
// - **DynDnsResponder**: Orchestrates validation → provider → response code → request log
// - **ProviderRegistry**: Plugin-based registry for record providers
//
// The HTTP transport lives in `dyndns-http`; backends live in their own
// crates (`dyndns-provider-route53`).
//
// ## Design Principles
//
// 1. **Transport-Agnostic**: The responder sees an `UpdateRequest`, not a socket
// 2. **Plugin-Based**: Providers are registered dynamically, no hard-coded if-else
// 3. **No Globals**: Client token and credentials are injected at construction
// 4. **Fail Soft**: A failing request never affects another; every path answers

pub mod config;
pub mod error;
pub mod protocol;
pub mod provider;
pub mod registry;
pub mod request;
pub mod responder;
pub mod traits;
pub mod validator;

// Re-export core types for convenience
pub use config::{CredentialsConfig, DynDnsConfig, ProviderConfig, ResponderConfig, ServerConfig};
pub use error::{Error, Result, UpdateError, ZoneMismatchKind};
pub use protocol::ResponseCode;
pub use provider::NullProvider;
pub use registry::ProviderRegistry;
pub use request::{AuthenticatedIdentity, UpdateRequest, ValidatedUpdate};
pub use responder::{
    DynDnsResponder, RequestLogEntry, RequestLogSink, Stage, TracingLogSink, UpdateResponse,
};
pub use traits::{CredentialVerifier, RecordProvider, RecordProviderFactory, StaticCredentials};
pub use validator::{UpdateRequestValidator, ValidationError};
