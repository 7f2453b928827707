use crate::threat_detection::domain::ScanResult;
use crate::threat_detection::policies::ScanStatus;

/// ScanResponse - Internal response DTO from the scan use case
#[derive(Debug, Clone)]
pub struct ScanResponse {
    /// Classified output of the scan
    pub result: ScanResult,
    /// Pass / issues-found under the requested threshold.
    /// Used to determine the exit code for CI integration
    pub status: ScanStatus,
    /// Non-fatal warnings (rejected patterns, stale database)
    pub warnings: Vec<String>,
}

impl ScanResponse {
    pub fn new(result: ScanResult, status: ScanStatus, warnings: Vec<String>) -> Self {
        Self {
            result,
            status,
            warnings,
        }
    }
}
