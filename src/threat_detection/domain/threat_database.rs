//! Typed, validated view over the threat database document.
//!
//! Every optional collection is defaulted to empty at load time so the
//! classifier never needs presence checks.
//!
//! # Document shape
//!
//! ```json
//! {
//!   "version": "2.3.0",
//!   "lastUpdated": "2025-09-16",
//!   "campaigns": {
//!     "shai-hulud": {
//!       "name": "Shai-Hulud worm",
//!       "date": "2025-09",
//!       "severity": "critical",
//!       "description": "Self-replicating npm worm",
//!       "packages": ["@ctrl/tinycolor"],
//!       "affectedVersions": { "@ctrl/tinycolor": ["4.1.1", "4.1.2"] }
//!     }
//!   },
//!   "knownMalicious": {
//!     "confirmed": [], "typosquatting": [], "credentialTheft": [], "cryptoMalware": []
//!   },
//!   "protestware": {
//!     "high": { "packages": ["node-ipc"], "details": { "node-ipc": "Wipes files" } }
//!   },
//!   "trustedPatterns": ["@types/*"]
//! }
//! ```

use super::{clean_version, PackageName, PatternError, PatternSet, Severity};
use crate::shared::error::ScanError;
use crate::shared::Result;
use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Databases older than this produce a staleness warning
pub const STALE_AFTER_DAYS: i64 = 90;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDatabase {
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    last_updated: Option<String>,
    #[serde(default)]
    last_updated_date: Option<String>,
    // Object order is preserved (serde_json `preserve_order`); campaign
    // precedence follows document order.
    #[serde(default)]
    campaigns: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    known_malicious: RawKnownMalicious,
    #[serde(default)]
    protestware: RawProtestware,
    #[serde(default)]
    trusted_patterns: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawKnownMalicious {
    #[serde(default)]
    confirmed: Vec<String>,
    #[serde(default)]
    typosquatting: Vec<String>,
    #[serde(default)]
    credential_theft: Vec<String>,
    #[serde(default)]
    crypto_malware: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawProtestware {
    #[serde(default)]
    high: RawProtestwareTier,
    #[serde(default)]
    medium: RawProtestwareTier,
    #[serde(default)]
    low: RawProtestwareTier,
}

#[derive(Debug, Default, Deserialize)]
struct RawProtestwareTier {
    #[serde(default)]
    packages: Vec<String>,
    #[serde(default)]
    details: BTreeMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCampaign {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    severity: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    packages: Vec<String>,
    #[serde(default)]
    affected_versions: BTreeMap<String, Vec<String>>,
}

/// Flat deny-lists; every member is critical
#[derive(Debug, Clone, Default)]
pub struct KnownMalicious {
    pub confirmed: HashSet<PackageName>,
    pub typosquatting: HashSet<PackageName>,
    pub credential_theft: HashSet<PackageName>,
    pub crypto_malware: HashSet<PackageName>,
}

/// One protestware tier with optional per-package detail text
#[derive(Debug, Clone, Default)]
pub struct ProtestwareTier {
    pub packages: HashSet<PackageName>,
    pub details: HashMap<PackageName, String>,
}

impl ProtestwareTier {
    pub fn contains(&self, name: &PackageName) -> bool {
        self.packages.contains(name)
    }

    pub fn detail(&self, name: &PackageName) -> Option<&str> {
        self.details.get(name).map(String::as_str)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Protestware {
    pub high: ProtestwareTier,
    pub medium: ProtestwareTier,
    pub low: ProtestwareTier,
}

/// A named, dated record of a coordinated multi-package compromise
#[derive(Debug, Clone)]
pub struct Campaign {
    id: String,
    name: String,
    date: Option<String>,
    severity: Severity,
    description: Option<String>,
    packages: HashSet<PackageName>,
    affected_versions: HashMap<PackageName, Vec<String>>,
}

impl Campaign {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn contains(&self, name: &PackageName) -> bool {
        self.packages.contains(name)
    }

    /// Listed affected versions; `None` means every version is affected
    pub fn affected_versions(&self, name: &PackageName) -> Option<&[String]> {
        self.affected_versions.get(name).map(Vec::as_slice)
    }
}

/// ThreatDatabase aggregate, immutable once loaded
#[derive(Debug, Clone)]
pub struct ThreatDatabase {
    version: String,
    last_updated: String,
    campaigns: Vec<Campaign>,
    known_malicious: KnownMalicious,
    protestware: Protestware,
    trusted: PatternSet,
    pattern_errors: Vec<PatternError>,
}

impl ThreatDatabase {
    /// Parses and validates a database document
    ///
    /// # Errors
    /// Returns [`ScanError::InvalidDatabase`] when the document is not JSON,
    /// when `version`/`lastUpdated` are missing or empty, or when a campaign
    /// entry is not an object of the expected shape.
    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawDatabase = serde_json::from_str(content).map_err(|e| {
            ScanError::InvalidDatabase {
                details: format!("Invalid JSON: {}", e),
            }
        })?;

        let version = required_string(raw.version, "version")?;
        // Either spelling is accepted; `lastUpdatedDate` wins when both are set.
        let last_updated = raw
            .last_updated_date
            .filter(|date| !date.trim().is_empty())
            .or(raw.last_updated);
        let last_updated = required_string(last_updated, "lastUpdated")?;

        let mut campaigns = Vec::with_capacity(raw.campaigns.len());
        for (id, value) in raw.campaigns {
            campaigns.push(Self::build_campaign(id, value)?);
        }

        let known_malicious = KnownMalicious {
            confirmed: name_set(raw.known_malicious.confirmed, "knownMalicious.confirmed"),
            typosquatting: name_set(raw.known_malicious.typosquatting, "knownMalicious.typosquatting"),
            credential_theft: name_set(
                raw.known_malicious.credential_theft,
                "knownMalicious.credentialTheft",
            ),
            crypto_malware: name_set(raw.known_malicious.crypto_malware, "knownMalicious.cryptoMalware"),
        };

        let protestware = Protestware {
            high: protestware_tier(raw.protestware.high, "protestware.high"),
            medium: protestware_tier(raw.protestware.medium, "protestware.medium"),
            low: protestware_tier(raw.protestware.low, "protestware.low"),
        };

        let (trusted, pattern_errors) = PatternSet::parse(&raw.trusted_patterns);
        for error in &pattern_errors {
            tracing::warn!("skipping trusted pattern: {}", error);
        }

        Ok(Self {
            version,
            last_updated,
            campaigns,
            known_malicious,
            protestware,
            trusted,
            pattern_errors,
        })
    }

    fn build_campaign(id: String, value: serde_json::Value) -> Result<Campaign> {
        let raw: RawCampaign = serde_json::from_value(value).map_err(|e| {
            ScanError::InvalidDatabase {
                details: format!("campaigns.{}: {}", id, e),
            }
        })?;

        let severity = match raw.severity.as_deref() {
            None => Severity::High,
            Some(s) => s.parse().unwrap_or_else(|_| {
                tracing::warn!(
                    "campaign '{}' declares unknown severity '{}', using high",
                    id,
                    s
                );
                Severity::High
            }),
        };

        let context = format!("campaigns.{}", id);
        let packages = name_set(raw.packages, &context);
        let affected_versions = raw
            .affected_versions
            .into_iter()
            .filter_map(|(name, versions)| {
                let name = PackageName::new(name).ok()?;
                let versions = versions
                    .iter()
                    .map(|v| clean_version(v).to_string())
                    .collect();
                Some((name, versions))
            })
            .collect();

        Ok(Campaign {
            name: raw.name.filter(|n| !n.trim().is_empty()).unwrap_or_else(|| id.clone()),
            id,
            date: raw.date,
            severity,
            description: raw.description,
            packages,
            affected_versions,
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn last_updated(&self) -> &str {
        &self.last_updated
    }

    /// Campaigns in document order
    pub fn campaigns(&self) -> &[Campaign] {
        &self.campaigns
    }

    pub fn known_malicious(&self) -> &KnownMalicious {
        &self.known_malicious
    }

    pub fn protestware(&self) -> &Protestware {
        &self.protestware
    }

    pub fn trusted(&self) -> &PatternSet {
        &self.trusted
    }

    /// Trusted patterns that were rejected and skipped at load time
    pub fn pattern_errors(&self) -> &[PatternError] {
        &self.pattern_errors
    }

    /// Days between `lastUpdated` and `today`, if the date is parseable
    pub fn age_in_days(&self, today: NaiveDate) -> Option<i64> {
        let updated = parse_date(&self.last_updated)?;
        Some((today - updated).num_days())
    }

    pub fn is_stale(&self, today: NaiveDate) -> bool {
        self.age_in_days(today)
            .is_some_and(|age| age > STALE_AFTER_DAYS)
    }
}

fn required_string(value: Option<String>, field: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ScanError::InvalidDatabase {
            details: format!("'{}' must be a non-empty string", field),
        }
        .into()),
    }
}

fn name_set(names: Vec<String>, context: &str) -> HashSet<PackageName> {
    names
        .into_iter()
        .filter_map(|name| match PackageName::new(name.clone()) {
            Ok(n) => Some(n),
            Err(e) => {
                tracing::warn!("skipping invalid package name '{}' in {}: {}", name, context, e);
                None
            }
        })
        .collect()
}

fn protestware_tier(raw: RawProtestwareTier, context: &str) -> ProtestwareTier {
    ProtestwareTier {
        packages: name_set(raw.packages, context),
        details: raw
            .details
            .into_iter()
            .filter_map(|(name, detail)| Some((PackageName::new(name).ok()?, detail)))
            .collect(),
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}
