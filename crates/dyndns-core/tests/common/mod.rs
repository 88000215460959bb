//! Test doubles and common utilities for responder contract tests
//!
//! This module provides minimal test doubles that record how the responder
//! uses its collaborators without talking to a real DNS backend.

#![allow(dead_code)]

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use dyndns_core::{
    DynDnsResponder, RecordProvider, RequestLogEntry, RequestLogSink, StaticCredentials,
    UpdateError, UpdateRequest, UpdateRequestValidator,
};
use http::Method;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const USER_AGENT: &str = "dyndnsr53-client";
pub const USERNAME: &str = "user";
pub const PASSWORD: &str = "pass";

/// How the mock provider answers
#[derive(Clone)]
pub enum ProviderBehavior {
    /// Apply the update
    Succeed,
    /// Fail with an upstream error carrying this message
    Fail(&'static str),
    /// Sleep before applying the update
    Delay(Duration),
}

/// A record provider that keeps records in memory and counts calls
pub struct MockRecordProvider {
    behavior: ProviderBehavior,
    update_call_count: AtomicUsize,
    records: Mutex<HashMap<String, String>>,
}

impl MockRecordProvider {
    pub fn new() -> Arc<Self> {
        Self::with_behavior(ProviderBehavior::Succeed)
    }

    pub fn failing(message: &'static str) -> Arc<Self> {
        Self::with_behavior(ProviderBehavior::Fail(message))
    }

    pub fn slow(delay: Duration) -> Arc<Self> {
        Self::with_behavior(ProviderBehavior::Delay(delay))
    }

    pub fn with_behavior(behavior: ProviderBehavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            update_call_count: AtomicUsize::new(0),
            records: Mutex::new(HashMap::new()),
        })
    }

    /// Number of times update_record() was called
    pub fn update_call_count(&self) -> usize {
        self.update_call_count.load(Ordering::SeqCst)
    }

    /// Current value stored for a name
    pub fn record(&self, fqdn: &str) -> Option<String> {
        self.records.lock().unwrap().get(fqdn).cloned()
    }

    /// Number of distinct names stored
    pub fn record_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl RecordProvider for MockRecordProvider {
    async fn update_record(&self, fqdn: &str, ip: &str) -> Result<(), UpdateError> {
        self.update_call_count.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            ProviderBehavior::Succeed => {}
            ProviderBehavior::Fail(message) => return Err(UpdateError::upstream(*message)),
            ProviderBehavior::Delay(delay) => tokio::time::sleep(*delay).await,
        }
        self.records
            .lock()
            .unwrap()
            .insert(fqdn.to_string(), ip.to_string());
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// A log sink that keeps every entry
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

    /// The single entry recorded so far; panics if there isn't exactly one
    pub fn only_entry(&self) -> RequestLogEntry {
        let entries = self.entries();
        assert_eq!(entries.len(), 1, "expected exactly one log entry");
        entries.into_iter().next().unwrap()
    }
}

impl RequestLogSink for CapturingLogSink {
    fn record(&self, entry: &RequestLogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

/// Build a responder around the given provider and log sink
pub fn responder(
    provider: Arc<dyn RecordProvider>,
    sink: Arc<CapturingLogSink>,
) -> DynDnsResponder {
    let validator = UpdateRequestValidator::new(
        USER_AGENT,
        Arc::new(StaticCredentials::new(USERNAME, PASSWORD)),
    );
    DynDnsResponder::new(validator, provider).with_log_sink(sink)
}

/// `Authorization` header value for a user:password pair
pub fn basic_auth(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

/// A request that passes every check
pub fn valid_request() -> UpdateRequest {
    UpdateRequest::new(Method::GET)
        .with_remote_addr("192.0.2.10:40000".parse().unwrap())
        .with_user_agent(format!("{USER_AGENT}/0.1"))
        .with_authorization(basic_auth(USERNAME, PASSWORD))
        .with_hostname("test.example.com")
        .with_myip("1.2.3.4")
}
