use crate::shared::Result;
use crate::threat_detection::domain::ScanResult;

/// ScanFormatter port for rendering a scan result
///
/// Implemented by the JSON and text formatters.
pub trait ScanFormatter {
    /// Formats a scan result
    ///
    /// # Errors
    /// Returns an error if serialization fails
    fn format(&self, result: &ScanResult) -> Result<String>;
}
