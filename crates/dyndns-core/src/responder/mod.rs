//! DynDNS update responder
//!
//! The DynDnsResponder is responsible for:
//! - Validating each update request
//! - Calling the record provider for requests that pass
//! - Mapping every outcome onto a protocol response code and HTTP status
//! - Emitting exactly one [`RequestLogEntry`] per request
//!
//! ## Request Flow
//!
//! ```text
//! Start ─► UserAgentChecked ─► MethodChecked ─► Authenticated ─► ParamsExtracted ─► ProviderInvoked
//!   │             │                  │                │                                    │
//!   └─────────────┴──────────────────┴────────────────┴──── first failure ───────────────┐ │
//!                                                                                        ▼ ▼
//!                                                                                     Responded
//! ```
//!
//! ## Response Codes
//!
//! | Condition | Body | Status |
//! |---|---|---|
//! | bad/missing user-agent | `badagent` | 400 |
//! | wrong method | `badagent` | 405 |
//! | missing/invalid/wrong auth | `badauth` | 401 |
//! | missing hostname | `nofqdn` | 200 |
//! | missing myip | `dnserr` | 200 |
//! | provider failure or timeout | `dnserr` | 200 |
//! | update applied (or no-op provider) | `good <ip>` | 200 |

pub mod log;

use http::StatusCode;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{Instrument, debug, error, info, warn};

use crate::config::ResponderConfig;
use crate::error::UpdateError;
use crate::protocol::ResponseCode;
use crate::request::{UpdateRequest, ValidatedUpdate};
use crate::traits::{CredentialVerifier, RecordProvider};
use crate::validator::UpdateRequestValidator;

pub use log::{RequestLogEntry, RequestLogSink, TracingLogSink};

/// Stages a request moves through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Request received
    Start,
    /// User-Agent accepted
    UserAgentChecked,
    /// Method accepted
    MethodChecked,
    /// Credentials accepted
    Authenticated,
    /// `hostname` and `myip` extracted
    ParamsExtracted,
    /// Provider call finished
    ProviderInvoked,
    /// Response produced
    Responded,
}

impl Stage {
    /// Stage name for logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Start => "start",
            Stage::UserAgentChecked => "user_agent_checked",
            Stage::MethodChecked => "method_checked",
            Stage::Authenticated => "authenticated",
            Stage::ParamsExtracted => "params_extracted",
            Stage::ProviderInvoked => "provider_invoked",
            Stage::Responded => "responded",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the HTTP layer writes back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateResponse {
    /// HTTP status
    pub status: StatusCode,
    /// Protocol response code
    pub code: ResponseCode,
}

impl UpdateResponse {
    /// Response body (code line plus newline)
    pub fn body(&self) -> String {
        self.code.body()
    }
}

/// Why the provider stage did not succeed
enum ProviderFailure {
    Rejected(UpdateError),
    TimedOut(Duration),
}

impl fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderFailure::Rejected(e) => write!(f, "provider error: {}", e),
            ProviderFailure::TimedOut(limit) => {
                write!(f, "provider update timed out after {:?}", limit)
            }
        }
    }
}

/// Outcome of one pass through the pipeline, before logging
struct Outcome {
    status: StatusCode,
    code: ResponseCode,
    error_message: Option<String>,
}

/// DynDNS update responder
///
/// Shared behind an `Arc` by every connection. Holds no mutable state: the
/// validator, provider and log sink are fixed at construction.
///
/// ## Timeouts
///
/// When an update timeout is set, a provider call that runs longer is
/// abandoned and answered with `dnserr`. No retry is attempted.
pub struct DynDnsResponder {
    validator: UpdateRequestValidator,
    provider: Arc<dyn RecordProvider>,
    update_timeout: Option<Duration>,
    log_sink: Arc<dyn RequestLogSink>,
}

impl DynDnsResponder {
    /// Create a responder with the default timeout and the tracing log sink
    pub fn new(validator: UpdateRequestValidator, provider: Arc<dyn RecordProvider>) -> Self {
        Self {
            validator,
            provider,
            update_timeout: ResponderConfig::default().update_timeout(),
            log_sink: Arc::new(TracingLogSink),
        }
    }

    /// Create a responder from configuration
    pub fn from_config(
        config: &ResponderConfig,
        credentials: Arc<dyn CredentialVerifier>,
        provider: Arc<dyn RecordProvider>,
    ) -> Self {
        Self::new(UpdateRequestValidator::from_config(config, credentials), provider)
            .with_update_timeout(config.update_timeout())
    }

    /// Set the provider call timeout (`None` for unbounded)
    pub fn with_update_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.update_timeout = timeout;
        self
    }

    /// Set where request log records go
    pub fn with_log_sink(mut self, sink: Arc<dyn RequestLogSink>) -> Self {
        self.log_sink = sink;
        self
    }

    /// The provider updates are sent to
    pub fn provider(&self) -> &Arc<dyn RecordProvider> {
        &self.provider
    }

    /// The request validator
    pub fn validator(&self) -> &UpdateRequestValidator {
        &self.validator
    }

    /// Handle one update request
    ///
    /// Never fails: every path ends in a protocol response. Exactly one
    /// record is handed to the log sink before returning.
    pub async fn respond(&self, request: UpdateRequest) -> UpdateResponse {
        let started = Instant::now();
        let mut entry = RequestLogEntry::begin(&request);

        let span = tracing::info_span!(
            "nic_update",
            remote = %request
                .remote_addr
                .map(|addr| addr.to_string())
                .unwrap_or_else(|| "unknown".to_string())
        );
        let outcome = self.process(&request, &mut entry).instrument(span).await;

        entry.finish(
            outcome.status.as_u16(),
            &outcome.code,
            outcome.error_message,
            started.elapsed(),
        );
        self.log_sink.record(&entry);
        if outcome.code.is_success() {
            debug!(stage = %Stage::Responded, status = outcome.status.as_u16(), code = %outcome.code, "Response ready");
        } else {
            info!(stage = %Stage::Responded, status = outcome.status.as_u16(), code = %outcome.code, "Update not applied");
        }

        UpdateResponse {
            status: outcome.status,
            code: outcome.code,
        }
    }

    async fn process(&self, request: &UpdateRequest, entry: &mut RequestLogEntry) -> Outcome {
        let update = match self.validator.validate(request) {
            Ok(update) => update,
            Err(err) => {
                entry.username = err.username().map(str::to_string);
                entry.fqdn = err.fqdn().map(str::to_string);
                entry.ip = err.ip().map(str::to_string);
                warn!(
                    stage = %err.stage(),
                    user_agent = request.user_agent.as_deref().unwrap_or(""),
                    method = %request.method,
                    "Rejected update request: {}",
                    err
                );
                return Outcome {
                    status: err.status(),
                    code: err.response_code(),
                    error_message: Some(err.to_string()),
                };
            }
        };

        entry.username = Some(update.identity.username.clone());
        entry.fqdn = Some(update.fqdn.clone());
        entry.ip = Some(update.ip.clone());
        debug!(stage = %Stage::ParamsExtracted, user = %update.identity.username, "Request validated");
        info!(fqdn = %update.fqdn, ip = %update.ip, "Update request");

        let result = self.invoke_provider(&update).await;
        debug!(stage = %Stage::ProviderInvoked, provider = self.provider.provider_name(), "Provider returned");

        match result {
            Ok(()) if self.provider.is_noop() => {
                warn!("No provider configured, returning success without update");
                Outcome {
                    status: StatusCode::OK,
                    code: ResponseCode::Good(update.ip),
                    error_message: Some("no provider configured".to_string()),
                }
            }
            Ok(()) => {
                info!(
                    "DNS record updated: {} -> {} (provider: {})",
                    update.fqdn,
                    update.ip,
                    self.provider.provider_name()
                );
                Outcome {
                    status: StatusCode::OK,
                    code: ResponseCode::Good(update.ip),
                    error_message: None,
                }
            }
            Err(failure) => {
                error!(fqdn = %update.fqdn, "Failed to update DNS record: {}", failure);
                Outcome {
                    status: StatusCode::OK,
                    code: ResponseCode::DnsError,
                    error_message: Some(failure.to_string()),
                }
            }
        }
    }

    async fn invoke_provider(&self, update: &ValidatedUpdate) -> Result<(), ProviderFailure> {
        let call = self.provider.update_record(&update.fqdn, &update.ip);
        match self.update_timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result.map_err(ProviderFailure::Rejected),
                Err(_) => Err(ProviderFailure::TimedOut(limit)),
            },
            None => call.await.map_err(ProviderFailure::Rejected),
        }
    }
}

impl fmt::Debug for DynDnsResponder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynDnsResponder")
            .field("validator", &self.validator)
            .field("provider", &self.provider.provider_name())
            .field("update_timeout", &self.update_timeout)
            .finish()
    }
}
