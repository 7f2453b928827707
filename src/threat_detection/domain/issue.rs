use super::{PackageName, Severity};
use serde::Serialize;
use std::fmt;

/// Category label attached to every issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThreatCategory {
    ConfirmedMalicious,
    Typosquatting,
    CredentialTheft,
    CryptoMalware,
    Protestware,
    Campaign,
}

impl ThreatCategory {
    pub fn label(&self) -> &'static str {
        match self {
            ThreatCategory::ConfirmedMalicious => "Confirmed Malicious",
            ThreatCategory::Typosquatting => "Typosquatting",
            ThreatCategory::CredentialTheft => "Credential Theft",
            ThreatCategory::CryptoMalware => "Crypto Malware",
            ThreatCategory::Protestware => "Protestware",
            ThreatCategory::Campaign => "Campaign",
        }
    }
}

impl fmt::Display for ThreatCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for ThreatCategory {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// A package flagged by the classifier
///
/// Only the classifier creates issues. `is_transitive` always mirrors
/// `!is_direct`; `safe_version` is set when a campaign lists the package
/// but not the resolved version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub package: PackageName,
    pub version: String,
    pub severity: Severity,
    pub category: ThreatCategory,
    pub reason: String,
    pub action: String,
    pub is_direct: bool,
    pub is_transitive: bool,
    pub chain: Vec<PackageName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affected_versions: Option<Vec<String>>,
    pub safe_version: bool,
}

/// Outcome of classifying one dependency node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Issue(Box<Issue>),
    /// Matched a caller-supplied ignore pattern
    Ignored,
    /// Matched a database trusted pattern
    Trusted,
    Clean,
}

impl Classification {
    pub fn issue(&self) -> Option<&Issue> {
        match self {
            Classification::Issue(issue) => Some(issue),
            _ => None,
        }
    }
}
