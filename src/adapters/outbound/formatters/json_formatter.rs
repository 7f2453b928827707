use crate::ports::outbound::ScanFormatter;
use crate::shared::Result;
use crate::threat_detection::domain::ScanResult;

/// JsonFormatter adapter emitting the scan result as pretty-printed JSON
///
/// Keys are camelCase; the document is the serialized [`ScanResult`].
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanFormatter for JsonFormatter {
    fn format(&self, result: &ScanResult) -> Result<String> {
        let json = serde_json::to_string_pretty(result)?;
        Ok(json)
    }
}
