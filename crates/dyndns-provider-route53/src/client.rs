//! Route53 API seam
//!
//! The provider talks to Route53 through [`HostedZoneApi`] so it can be
//! exercised against an in-memory zone in tests. [`SdkHostedZoneClient`] is
//! the production implementation on top of `aws-sdk-route53`.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_route53::config::Region;
use aws_sdk_route53::error::{DisplayErrorContext, SdkError};
use aws_sdk_route53::types::{
    Change, ChangeAction, ChangeBatch, ResourceRecord, ResourceRecordSet, RrType,
};
use aws_sdk_route53::Client;
use dyndns_core::error::BoxError;

/// Region used when none is configured
///
/// Route53 is a global service; the region only selects the signing endpoint.
pub const DEFAULT_REGION: &str = "us-east-1";

/// TTL applied to every upserted record, in seconds
pub const RECORD_TTL_SECS: i64 = 60;

const CHANGE_COMMENT: &str = "dyndns update";

/// A single A-record UPSERT
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordUpsert {
    /// Record name exactly as requested (trailing dot preserved)
    pub name: String,
    /// IPv4 address text
    pub value: String,
    pub ttl: i64,
}

impl RecordUpsert {
    /// UPSERT of `name` to `value` with the standard TTL
    pub fn a_record(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            ttl: RECORD_TTL_SECS,
        }
    }
}

/// Hosted zone operations the provider needs
#[async_trait]
pub trait HostedZoneApi: Send + Sync {
    /// Canonical name of the hosted zone, as returned by the backend
    async fn hosted_zone_name(&self, zone_id: &str) -> Result<String, BoxError>;

    /// Create or replace an A record in the zone
    async fn upsert_record(&self, zone_id: &str, upsert: &RecordUpsert) -> Result<(), BoxError>;
}

/// [`HostedZoneApi`] backed by the AWS SDK
#[derive(Debug, Clone)]
pub struct SdkHostedZoneClient {
    client: Client,
}

impl SdkHostedZoneClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the ambient AWS credential chain
    ///
    /// `endpoint_url` overrides the service endpoint (LocalStack and similar).
    pub async fn from_env(region: Option<String>, endpoint_url: Option<String>) -> Self {
        let region = region.unwrap_or_else(|| DEFAULT_REGION.to_string());

        let mut config_builder =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region));

        if let Some(endpoint_url) = endpoint_url {
            config_builder = config_builder.endpoint_url(endpoint_url);
        }

        let config = config_builder.load().await;
        Self::new(Client::new(&config))
    }
}

#[async_trait]
impl HostedZoneApi for SdkHostedZoneClient {
    async fn hosted_zone_name(&self, zone_id: &str) -> Result<String, BoxError> {
        let output = self
            .client
            .get_hosted_zone()
            .id(zone_id)
            .send()
            .await
            .map_err(sdk_error)?;

        let zone = output
            .hosted_zone()
            .ok_or_else(|| BoxError::from("GetHostedZone returned no hosted zone"))?;

        Ok(zone.name().to_string())
    }

    async fn upsert_record(&self, zone_id: &str, upsert: &RecordUpsert) -> Result<(), BoxError> {
        let record = ResourceRecord::builder().value(upsert.value.as_str()).build()?;

        let record_set = ResourceRecordSet::builder()
            .name(upsert.name.as_str())
            .r#type(RrType::A)
            .ttl(upsert.ttl)
            .resource_records(record)
            .build()?;

        let change = Change::builder()
            .action(ChangeAction::Upsert)
            .resource_record_set(record_set)
            .build()?;

        let batch = ChangeBatch::builder()
            .comment(CHANGE_COMMENT)
            .changes(change)
            .build()?;

        self.client
            .change_resource_record_sets()
            .hosted_zone_id(zone_id)
            .change_batch(batch)
            .send()
            .await
            .map_err(sdk_error)?;

        tracing::debug!(zone_id, name = %upsert.name, "Route53 change submitted");
        Ok(())
    }
}

fn sdk_error<E, R>(err: SdkError<E, R>) -> BoxError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    DisplayErrorContext(&err).to_string().into()
}
