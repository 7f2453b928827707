mod severity_threshold;

pub use severity_threshold::{ScanStatus, SeverityThreshold};
