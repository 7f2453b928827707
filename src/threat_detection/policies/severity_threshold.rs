use crate::threat_detection::domain::{ScanResult, Severity};

/// Outcome derived from a scan result and a threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStatus {
    /// No issue at or above the threshold
    Pass,
    /// At least one issue at or above the threshold
    IssuesFound,
}

/// SeverityThreshold policy deciding whether a scan fails
///
/// An issue counts when its severity is at or above the threshold
/// (critical > high > medium > low). The default threshold is low, so
/// any issue fails the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeverityThreshold {
    minimum: Severity,
}

impl Default for SeverityThreshold {
    fn default() -> Self {
        Self::new(Severity::Low)
    }
}

impl SeverityThreshold {
    pub fn new(minimum: Severity) -> Self {
        Self { minimum }
    }

    pub fn minimum(&self) -> Severity {
        self.minimum
    }

    pub fn evaluate(&self, result: &ScanResult) -> ScanStatus {
        if self.count_at_or_above(result) > 0 {
            ScanStatus::IssuesFound
        } else {
            ScanStatus::Pass
        }
    }

    /// Number of issues at or above the threshold
    pub fn count_at_or_above(&self, result: &ScanResult) -> usize {
        Severity::ALL
            .into_iter()
            .filter(|severity| *severity >= self.minimum)
            .map(|severity| result.results.get(severity).len())
            .sum()
    }
}
