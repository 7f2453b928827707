use super::{Issue, PackageName, ScanMode, Severity};
use serde::Serialize;

/// ScanMetadata value object describing the run that produced a result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanMetadata {
    timestamp: String,
    tool_name: String,
    tool_version: String,
    database_version: String,
    database_updated: String,
}

impl ScanMetadata {
    pub fn new(
        timestamp: String,
        tool_name: String,
        tool_version: String,
        database_version: String,
        database_updated: String,
    ) -> Self {
        Self {
            timestamp,
            tool_name,
            tool_version,
            database_version,
            database_updated,
        }
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    pub fn tool_version(&self) -> &str {
        &self.tool_version
    }

    pub fn database_version(&self) -> &str {
        &self.database_version
    }

    pub fn database_updated(&self) -> &str {
        &self.database_updated
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PackagesScanned {
    pub total: usize,
    pub direct: usize,
    pub transitive: usize,
}

/// Issues grouped by severity; insertion order is kept inside each bucket
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeverityBuckets {
    pub critical: Vec<Issue>,
    pub high: Vec<Issue>,
    pub medium: Vec<Issue>,
    pub low: Vec<Issue>,
}

impl SeverityBuckets {
    pub fn push(&mut self, issue: Issue) {
        match issue.severity {
            Severity::Critical => self.critical.push(issue),
            Severity::High => self.high.push(issue),
            Severity::Medium => self.medium.push(issue),
            Severity::Low => self.low.push(issue),
        }
    }

    pub fn get(&self, severity: Severity) -> &[Issue] {
        match severity {
            Severity::Critical => &self.critical,
            Severity::High => &self.high,
            Severity::Medium => &self.medium,
            Severity::Low => &self.low,
        }
    }

    /// All issues, most severe bucket first
    pub fn iter(&self) -> impl Iterator<Item = &Issue> {
        Severity::ALL.into_iter().flat_map(move |s| self.get(s).iter())
    }

    pub fn len(&self) -> usize {
        self.critical.len() + self.high.len() + self.medium.len() + self.low.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// ScanResult aggregate: the complete classified output of one scan
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub scan_mode: ScanMode,
    pub lock_file: Option<String>,
    pub packages_scanned: PackagesScanned,
    pub total_issues: usize,
    pub transitive_issues: usize,
    pub results: SeverityBuckets,
    pub trusted: Vec<PackageName>,
    pub ignored: Vec<PackageName>,
    pub metadata: ScanMetadata,
}

impl ScanResult {
    /// Highest severity among the issues, if any
    pub fn highest_severity(&self) -> Option<Severity> {
        self.results.iter().map(|issue| issue.severity).max()
    }
}
