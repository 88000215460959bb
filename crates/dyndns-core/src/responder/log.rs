//! Per-request structured log record
//!
//! Exactly one [`RequestLogEntry`] is produced for every request the
//! responder handles, whatever the outcome. Where it goes is decided by the
//! [`RequestLogSink`] the responder was built with.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::net::SocketAddr;
use std::time::Duration;

use crate::protocol::ResponseCode;
use crate::request::UpdateRequest;

/// Structured record of one handled request
#[derive(Debug, Clone, Serialize)]
pub struct RequestLogEntry {
    /// When the request arrived
    pub timestamp: DateTime<Utc>,
    /// Peer address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_addr: Option<SocketAddr>,
    /// HTTP method
    pub method: String,
    /// `User-Agent` header
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Authenticated username
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Requested hostname
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fqdn: Option<String>,
    /// Requested IP
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    /// HTTP status written
    pub status_code: u16,
    /// Protocol response line written (without newline)
    pub response: String,
    /// Operator-facing failure detail; never sent to the client
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Handling time, human readable
    pub duration: String,
    /// Handling time in milliseconds
    pub duration_ms: f64,
}

impl RequestLogEntry {
    /// Start a record for a request that just arrived
    pub(crate) fn begin(request: &UpdateRequest) -> Self {
        Self {
            timestamp: Utc::now(),
            remote_addr: request.remote_addr,
            method: request.method.to_string(),
            user_agent: request.user_agent.clone(),
            username: None,
            fqdn: None,
            ip: None,
            status_code: 0,
            response: String::new(),
            error_message: None,
            duration: String::new(),
            duration_ms: 0.0,
        }
    }

    /// Fill in the outcome
    pub(crate) fn finish(
        &mut self,
        status_code: u16,
        response: &ResponseCode,
        error_message: Option<String>,
        elapsed: Duration,
    ) {
        self.status_code = status_code;
        self.response = response.to_string();
        self.error_message = error_message;
        self.duration = format!("{elapsed:?}");
        self.duration_ms = elapsed.as_micros() as f64 / 1000.0;
    }
}

/// Destination for request log records
pub trait RequestLogSink: Send + Sync {
    /// Record one handled request
    fn record(&self, entry: &RequestLogEntry);
}

/// Emits each record as a JSON string on a `tracing` event
///
/// Events use the `dyndns::request` target so they can be filtered apart
/// from the rest of the daemon's logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogSink;

impl RequestLogSink for TracingLogSink {
    fn record(&self, entry: &RequestLogEntry) {
        match serde_json::to_string(entry) {
            Ok(json) => tracing::info!(target: "dyndns::request", request = %json, "DynDNS request"),
            Err(e) => tracing::warn!("Failed to serialize request log entry: {}", e),
        }
    }
}
