//! Hosted zone binding and FQDN membership
//!
//! A provider instance owns exactly one hosted zone. Every update is checked
//! against it before anything is sent to Route53.

use dyndns_core::{UpdateError, ZoneMismatchKind};

/// The hosted zone a provider is scoped to
///
/// Immutable after construction. `zone_name` is stored without a trailing dot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedZoneBinding {
    zone_id: String,
    zone_name: String,
}

impl HostedZoneBinding {
    /// Bind a zone ID to its canonical name
    pub fn new(zone_id: impl Into<String>, zone_name: impl AsRef<str>) -> Self {
        Self {
            zone_id: zone_id.into(),
            zone_name: strip_root(zone_name.as_ref()).to_string(),
        }
    }

    /// Route53 hosted zone ID
    pub fn zone_id(&self) -> &str {
        &self.zone_id
    }

    /// Zone name, without trailing dot (e.g., "blahonga.me")
    pub fn zone_name(&self) -> &str {
        &self.zone_name
    }

    /// Check that `fqdn` belongs to this zone
    ///
    /// Accepts the apex and subdomains at any depth. A trailing dot on the
    /// FQDN is ignored and names compare case-insensitively. Names that
    /// contain the zone name more than once (`home.zone.tld.zone.tld`) are
    /// refused even though they end in the zone.
    pub fn validate(&self, fqdn: &str) -> Result<(), UpdateError> {
        let name = strip_root(fqdn).to_ascii_lowercase();
        let zone = self.zone_name.to_ascii_lowercase();

        let in_zone = name == zone
            || name
                .strip_suffix(zone.as_str())
                .is_some_and(|head| head.ends_with('.'));
        if !in_zone {
            return Err(self.mismatch(fqdn, ZoneMismatchKind::OutsideZone));
        }

        if name.matches(zone.as_str()).count() > 1 {
            return Err(self.mismatch(fqdn, ZoneMismatchKind::RepeatedSuffix));
        }

        Ok(())
    }

    fn mismatch(&self, fqdn: &str, kind: ZoneMismatchKind) -> UpdateError {
        UpdateError::ZoneMismatch {
            fqdn: fqdn.to_string(),
            zone: self.zone_name.clone(),
            kind,
        }
    }
}

fn strip_root(name: &str) -> &str {
    name.strip_suffix('.').unwrap_or(name)
}
