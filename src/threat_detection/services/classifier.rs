use crate::threat_detection::domain::{
    Campaign, Classification, DependencyNode, Issue, PatternSet, ProtestwareTier, Severity,
    ThreatCategory, ThreatDatabase,
};

const ACTION_REMOVE: &str = "remove immediately";
const ACTION_REVIEW: &str = "review and replace";
const ACTION_UPDATE: &str = "check version and update";
const ACTION_VERIFY: &str = "verify";

/// Classifier service mapping one dependency node to a classification
///
/// Rules are evaluated in a fixed order and the first match wins:
///
/// 1. caller ignore patterns
/// 2. database trusted patterns
/// 3. confirmed malicious, typosquatting, credential theft, crypto malware
/// 4. protestware, high tier first
/// 5. campaigns, in database order
///
/// Matching is set membership and exact string comparison only. The same
/// inputs always yield the same classification.
pub struct Classifier;

impl Classifier {
    pub fn classify(
        node: &DependencyNode,
        database: &ThreatDatabase,
        ignore: &PatternSet,
    ) -> Classification {
        let name = node.name();

        if ignore.matches(name) {
            return Classification::Ignored;
        }
        if database.trusted().matches(name) {
            return Classification::Trusted;
        }

        if let Some(issue) = Self::check_known_malicious(node, database) {
            return Classification::Issue(Box::new(issue));
        }
        if let Some(issue) = Self::check_protestware(node, database) {
            return Classification::Issue(Box::new(issue));
        }
        if let Some(issue) = Self::check_campaigns(node, database) {
            return Classification::Issue(Box::new(issue));
        }

        Classification::Clean
    }

    fn check_known_malicious(node: &DependencyNode, database: &ThreatDatabase) -> Option<Issue> {
        let lists = database.known_malicious();
        let name = node.name();

        let (category, reason) = if lists.confirmed.contains(name) {
            (
                ThreatCategory::ConfirmedMalicious,
                "Confirmed malicious package",
            )
        } else if lists.typosquatting.contains(name) {
            (
                ThreatCategory::Typosquatting,
                "Typosquatting package imitating a popular name",
            )
        } else if lists.credential_theft.contains(name) {
            (
                ThreatCategory::CredentialTheft,
                "Package exfiltrates credentials or secrets",
            )
        } else if lists.crypto_malware.contains(name) {
            (
                ThreatCategory::CryptoMalware,
                "Package contains cryptocurrency stealing or mining code",
            )
        } else {
            return None;
        };

        Some(issue_for(
            node,
            Severity::Critical,
            category,
            reason.to_string(),
            ACTION_REMOVE,
        ))
    }

    fn check_protestware(node: &DependencyNode, database: &ThreatDatabase) -> Option<Issue> {
        let protestware = database.protestware();
        let tiers: [(&ProtestwareTier, Severity, &str); 3] = [
            (
                &protestware.high,
                Severity::High,
                "Protestware with destructive behavior",
            ),
            (
                &protestware.medium,
                Severity::Medium,
                "Protestware with disruptive behavior",
            ),
            (
                &protestware.low,
                Severity::Low,
                "Protestware that prints political messages",
            ),
        ];

        let name = node.name();
        tiers
            .into_iter()
            .find(|(tier, _, _)| tier.contains(name))
            .map(|(tier, severity, default_reason)| {
                let reason = tier.detail(name).unwrap_or(default_reason).to_string();
                issue_for(node, severity, ThreatCategory::Protestware, reason, ACTION_REVIEW)
            })
    }

    fn check_campaigns(node: &DependencyNode, database: &ThreatDatabase) -> Option<Issue> {
        let name = node.name();
        let campaign = database.campaigns().iter().find(|c| c.contains(name))?;
        Some(Self::campaign_issue(node, campaign))
    }

    fn campaign_issue(node: &DependencyNode, campaign: &Campaign) -> Issue {
        let name = node.name();
        let version = node.resolved_version().cleaned();
        let affected = campaign.affected_versions(name);

        let is_safe = affected.is_some_and(|versions| !versions.iter().any(|v| v == version));

        let mut issue = if is_safe {
            let reason = format!(
                "Targeted by campaign '{}', but version {} is not listed as affected",
                campaign.name(),
                version
            );
            issue_for(node, Severity::Low, ThreatCategory::Campaign, reason, ACTION_VERIFY)
        } else {
            let reason = match campaign.description() {
                Some(description) => format!("{}: {}", campaign.name(), description),
                None => format!("Compromised in campaign '{}'", campaign.name()),
            };
            issue_for(
                node,
                campaign.severity(),
                ThreatCategory::Campaign,
                reason,
                ACTION_UPDATE,
            )
        };

        issue.campaign = Some(campaign.id().to_string());
        issue.affected_versions = affected.map(<[String]>::to_vec);
        issue.safe_version = is_safe;
        issue
    }
}

fn issue_for(
    node: &DependencyNode,
    severity: Severity,
    category: ThreatCategory,
    reason: String,
    action: &str,
) -> Issue {
    Issue {
        package: node.name().clone(),
        version: node.resolved_version().as_str().to_string(),
        severity,
        category,
        reason,
        action: action.to_string(),
        is_direct: node.is_direct(),
        is_transitive: node.is_transitive(),
        chain: node.chain().to_vec(),
        campaign: None,
        affected_versions: None,
        safe_version: false,
    }
}
