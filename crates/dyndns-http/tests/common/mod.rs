//! Shared fixtures for the HTTP contract tests

#![allow(dead_code)]

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use dyndns_core::{
    DynDnsResponder, RecordProvider, RequestLogEntry, RequestLogSink, StaticCredentials,
    UpdateError, UpdateRequestValidator,
};
use std::sync::{Arc, Mutex};

pub const USER_AGENT: &str = "dyndnsr53-client/0.1";
pub const USERNAME: &str = "user";
pub const PASSWORD: &str = "pass";

/// Provider that remembers every applied update
#[derive(Default)]
pub struct RecordingProvider {
    updates: Mutex<Vec<(String, String)>>,
}

impl RecordingProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn updates(&self) -> Vec<(String, String)> {
        self.updates.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordProvider for RecordingProvider {
    async fn update_record(&self, fqdn: &str, ip: &str) -> Result<(), UpdateError> {
        self.updates
            .lock()
            .unwrap()
            .push((fqdn.to_string(), ip.to_string()));
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "recording"
    }
}

/// Log sink that keeps entries in memory
#[derive(Default)]
pub struct CapturingLogSink {
    entries: Mutex<Vec<RequestLogEntry>>,
}

impl CapturingLogSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn entries(&self) -> Vec<RequestLogEntry> {
        self.entries.lock().unwrap().clone()
    }
}

impl RequestLogSink for CapturingLogSink {
    fn record(&self, entry: &RequestLogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

/// Responder accepting `user:pass` from `dyndnsr53-client`
pub fn responder(
    provider: Arc<dyn RecordProvider>,
    sink: Arc<CapturingLogSink>,
) -> Arc<DynDnsResponder> {
    let validator = UpdateRequestValidator::new(
        "dyndnsr53-client",
        Arc::new(StaticCredentials::new(USERNAME, PASSWORD)),
    );
    Arc::new(DynDnsResponder::new(validator, provider).with_log_sink(sink))
}

/// `Authorization` header value for Basic-Auth
pub fn basic_auth(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}
