// # Route53 Record Provider
//
// This crate provides an AWS Route53 record provider for the DynDNS responder.
//
// ## Behavior
//
// - Bound to exactly one hosted zone, resolved once at construction
// - One `ChangeResourceRecordSets` call per update: UPSERT of an A record, TTL 60
// - FQDNs outside the zone (or repeating the zone name) are refused before any API call
// - No retries: a failed change is reported and the client retries on its own schedule
//
// ## Credentials
//
// AWS credentials come from the standard SDK chain (environment, profile,
// instance role). Nothing credential-related is logged.
//
// ## API Reference
//
// - GetHostedZone: resolves the zone name for the configured zone ID
// - ChangeResourceRecordSets: applies the UPSERT

pub mod client;
pub mod zone;

use async_trait::async_trait;
use dyndns_core::config::ProviderConfig;
use dyndns_core::traits::record_provider::ensure_update_args;
use dyndns_core::{Error, ProviderRegistry, RecordProvider, RecordProviderFactory, UpdateError};
use std::sync::Arc;

pub use client::{HostedZoneApi, RecordUpsert, SdkHostedZoneClient, DEFAULT_REGION, RECORD_TTL_SECS};
pub use zone::HostedZoneBinding;

/// Route53 provider scoped to one hosted zone
///
/// The binding is immutable once constructed, so a single instance can serve
/// concurrent updates.
pub struct ZoneScopedRoute53Provider {
    binding: HostedZoneBinding,
    api: Arc<dyn HostedZoneApi>,
}

impl std::fmt::Debug for ZoneScopedRoute53Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoneScopedRoute53Provider")
            .field("zone_id", &self.binding.zone_id())
            .field("zone_name", &self.binding.zone_name())
            .finish()
    }
}

impl ZoneScopedRoute53Provider {
    /// Resolve `zone_id` and bind a provider to it
    ///
    /// # Errors
    ///
    /// [`UpdateError::ZoneLookupFailed`] if the ID is empty, the lookup fails,
    /// or the zone has no usable name.
    pub async fn connect(
        zone_id: impl Into<String>,
        api: Arc<dyn HostedZoneApi>,
    ) -> Result<Self, UpdateError> {
        let zone_id = zone_id.into();
        if zone_id.trim().is_empty() {
            return Err(UpdateError::zone_lookup(zone_id, "hosted zone ID is empty"));
        }

        let zone_name = api
            .hosted_zone_name(&zone_id)
            .await
            .map_err(|e| UpdateError::zone_lookup(zone_id.as_str(), e.to_string()))?;

        let binding = HostedZoneBinding::new(zone_id, &zone_name);
        if binding.zone_name().is_empty() {
            return Err(UpdateError::zone_lookup(
                binding.zone_id(),
                "hosted zone has no name",
            ));
        }

        tracing::info!(
            zone_id = binding.zone_id(),
            zone_name = binding.zone_name(),
            "Route53 provider bound to hosted zone"
        );

        Ok(Self { binding, api })
    }

    /// The hosted zone this provider writes to
    pub fn binding(&self) -> &HostedZoneBinding {
        &self.binding
    }
}

#[async_trait]
impl RecordProvider for ZoneScopedRoute53Provider {
    async fn update_record(&self, fqdn: &str, ip: &str) -> Result<(), UpdateError> {
        ensure_update_args(fqdn, ip)?;
        self.binding.validate(fqdn)?;

        let upsert = RecordUpsert::a_record(fqdn, ip);
        tracing::debug!(
            zone_id = self.binding.zone_id(),
            fqdn,
            ip,
            ttl = upsert.ttl,
            "Upserting A record"
        );

        self.api
            .upsert_record(self.binding.zone_id(), &upsert)
            .await
            .map_err(UpdateError::Upstream)
    }

    fn provider_name(&self) -> &'static str {
        "route53"
    }
}

/// Factory for creating Route53 providers
pub struct Route53Factory;

#[async_trait]
impl RecordProviderFactory for Route53Factory {
    async fn create(&self, config: &ProviderConfig) -> Result<Arc<dyn RecordProvider>, Error> {
        match config {
            ProviderConfig::Route53 {
                zone_id,
                region,
                endpoint_url,
            } => {
                if zone_id.trim().is_empty() {
                    return Err(Error::config("Route53 zone ID is required"));
                }

                let api = SdkHostedZoneClient::from_env(region.clone(), endpoint_url.clone()).await;
                let provider = ZoneScopedRoute53Provider::connect(zone_id.clone(), Arc::new(api)).await?;
                Ok(Arc::new(provider))
            }
            _ => Err(Error::config("Invalid config for Route53 provider")),
        }
    }
}

/// Register the Route53 provider with a registry
///
/// # Example
///
/// ```rust,no_run
/// use dyndns_core::ProviderRegistry;
///
/// let registry = ProviderRegistry::with_builtins();
/// dyndns_provider_route53::register(&registry);
/// assert!(registry.has_provider("route53"));
/// ```
pub fn register(registry: &ProviderRegistry) {
    registry.register_provider("route53", Box::new(Route53Factory));
}

#[cfg(test)]
mod tests {
    use super::*;
    use dyndns_core::error::BoxError;
    use dyndns_core::ZoneMismatchKind;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory hosted zone
    struct FakeZone {
        zones: HashMap<String, String>,
        fail_upserts: Option<&'static str>,
        upserts: Mutex<Vec<(String, RecordUpsert)>>,
    }

    impl FakeZone {
        fn new() -> Self {
            let mut zones = HashMap::new();
            zones.insert("Z1234567890".to_string(), "blahonga.me.".to_string());
            zones.insert("ZNONAME".to_string(), ".".to_string());
            Self {
                zones,
                fail_upserts: None,
                upserts: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &'static str) -> Self {
            Self {
                fail_upserts: Some(message),
                ..Self::new()
            }
        }

        fn upserts(&self) -> Vec<(String, RecordUpsert)> {
            self.upserts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HostedZoneApi for FakeZone {
        async fn hosted_zone_name(&self, zone_id: &str) -> Result<String, BoxError> {
            self.zones
                .get(zone_id)
                .cloned()
                .ok_or_else(|| format!("NoSuchHostedZone: {zone_id}").into())
        }

        async fn upsert_record(
            &self,
            zone_id: &str,
            upsert: &RecordUpsert,
        ) -> Result<(), BoxError> {
            if let Some(message) = self.fail_upserts {
                return Err(message.into());
            }
            self.upserts
                .lock()
                .unwrap()
                .push((zone_id.to_string(), upsert.clone()));
            Ok(())
        }
    }

    async fn provider(api: Arc<FakeZone>) -> ZoneScopedRoute53Provider {
        ZoneScopedRoute53Provider::connect("Z1234567890", api)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn connect_resolves_zone_name() {
        let provider = provider(Arc::new(FakeZone::new())).await;

        assert_eq!(provider.binding().zone_id(), "Z1234567890");
        assert_eq!(provider.binding().zone_name(), "blahonga.me");
        assert_eq!(provider.provider_name(), "route53");
        assert!(!provider.is_noop());
    }

    #[tokio::test]
    async fn connect_rejects_empty_zone_id() {
        let result = ZoneScopedRoute53Provider::connect("", Arc::new(FakeZone::new())).await;
        assert!(matches!(result, Err(UpdateError::ZoneLookupFailed { .. })));
    }

    #[tokio::test]
    async fn connect_reports_lookup_failure() {
        let result = ZoneScopedRoute53Provider::connect("ZMISSING", Arc::new(FakeZone::new())).await;

        match result {
            Err(UpdateError::ZoneLookupFailed { zone_id, reason }) => {
                assert_eq!(zone_id, "ZMISSING");
                assert!(reason.contains("NoSuchHostedZone"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn connect_rejects_nameless_zone() {
        let result = ZoneScopedRoute53Provider::connect("ZNONAME", Arc::new(FakeZone::new())).await;
        assert!(matches!(result, Err(UpdateError::ZoneLookupFailed { .. })));
    }

    #[tokio::test]
    async fn update_upserts_a_record_with_ttl_60() {
        let api = Arc::new(FakeZone::new());
        let provider = provider(api.clone()).await;

        provider
            .update_record("home.blahonga.me", "1.2.3.4")
            .await
            .unwrap();

        let upserts = api.upserts();
        assert_eq!(upserts.len(), 1);
        let (zone_id, upsert) = &upserts[0];
        assert_eq!(zone_id, "Z1234567890");
        assert_eq!(upsert, &RecordUpsert::a_record("home.blahonga.me", "1.2.3.4"));
        assert_eq!(upsert.ttl, 60);
    }

    #[tokio::test]
    async fn update_accepts_apex_and_trailing_dot() {
        let api = Arc::new(FakeZone::new());
        let provider = provider(api.clone()).await;

        for fqdn in ["blahonga.me", "blahonga.me.", "api.v1.home.blahonga.me."] {
            provider.update_record(fqdn, "1.2.3.4").await.unwrap();
        }

        let names: Vec<String> = api.upserts().into_iter().map(|(_, u)| u.name).collect();
        assert_eq!(names, ["blahonga.me", "blahonga.me.", "api.v1.home.blahonga.me."]);
    }

    #[tokio::test]
    async fn update_outside_zone_never_calls_api() {
        let api = Arc::new(FakeZone::new());
        let provider = provider(api.clone()).await;

        for (fqdn, expected) in [
            ("home.example.com", ZoneMismatchKind::OutsideZone),
            ("home.example.com.", ZoneMismatchKind::OutsideZone),
            ("home.blahonga.me.blahonga.me", ZoneMismatchKind::RepeatedSuffix),
        ] {
            match provider.update_record(fqdn, "1.2.3.4").await {
                Err(UpdateError::ZoneMismatch { kind, .. }) => assert_eq!(kind, expected, "{fqdn}"),
                other => panic!("{fqdn}: unexpected result {other:?}"),
            }
        }

        assert!(api.upserts().is_empty());
    }

    #[tokio::test]
    async fn update_rejects_empty_arguments() {
        let api = Arc::new(FakeZone::new());
        let provider = provider(api.clone()).await;

        for (fqdn, ip) in [("", "1.2.3.4"), ("home.blahonga.me", ""), ("", "")] {
            let result = provider.update_record(fqdn, ip).await;
            assert!(matches!(result, Err(UpdateError::InvalidArgument(_))));
        }
        assert!(api.upserts().is_empty());
    }

    #[tokio::test]
    async fn repeated_update_is_one_upsert_each() {
        let api = Arc::new(FakeZone::new());
        let provider = provider(api.clone()).await;

        provider.update_record("home.blahonga.me", "1.2.3.4").await.unwrap();
        provider.update_record("home.blahonga.me", "1.2.3.4").await.unwrap();

        let upserts = api.upserts();
        assert_eq!(upserts.len(), 2);
        assert_eq!(upserts[0], upserts[1]);
    }

    #[tokio::test]
    async fn upstream_failure_is_surfaced() {
        let api = Arc::new(FakeZone::failing("AccessDenied: not authorized"));
        let provider = provider(api).await;

        let err = provider
            .update_record("home.blahonga.me", "1.2.3.4")
            .await
            .unwrap_err();

        assert!(matches!(err, UpdateError::Upstream(_)));
        assert!(err.to_string().contains("AccessDenied"));
    }

    #[tokio::test]
    async fn factory_rejects_other_configs() {
        let result = Route53Factory.create(&ProviderConfig::None).await;
        assert!(matches!(result, Err(Error::Config(_))));

        let result = Route53Factory
            .create(&ProviderConfig::Route53 {
                zone_id: " ".to_string(),
                region: None,
                endpoint_url: None,
            })
            .await;
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn register_adds_route53() {
        let registry = ProviderRegistry::with_builtins();
        register(&registry);

        assert!(registry.has_provider("route53"));
        assert!(registry.has_provider("none"));
    }
}
