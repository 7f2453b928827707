use crate::application::dto::{ScanRequest, ScanResponse};
use crate::shared::Result;

/// ThreatScanPort - Inbound port for the project scan use case
///
/// This port defines the interface that external adapters (CLI, batch
/// drivers, etc.) use to trigger one isolated scan.
pub trait ThreatScanPort {
    /// Scans one project directory
    ///
    /// # Errors
    /// Returns an error if:
    /// - The project directory does not exist or is invalid
    /// - `package.json` is missing or not valid JSON
    /// - The threat database is missing or invalid
    ///
    /// A missing or malformed lock file is not an error; the scan runs in
    /// direct mode instead.
    fn scan(&self, request: ScanRequest) -> Result<ScanResponse>;
}
