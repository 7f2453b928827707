use crate::shared::error::ScanError;
use crate::shared::Result;
use crate::threat_detection::domain::Severity;
use std::path::PathBuf;

/// ScanRequest - Internal request DTO for the scan use case
///
/// Everything the engine needs arrives here; nothing is read from the
/// environment during a scan.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    /// Project directory containing `package.json`
    pub project_path: PathBuf,
    /// Threat database location
    pub database_path: PathBuf,
    /// Lock file chosen by the caller; `None` means discover in `project_path`
    pub lockfile_path: Option<PathBuf>,
    /// Caller opt-out patterns (exact names or `@scope/*`)
    pub ignore_patterns: Vec<String>,
    /// Minimum severity that makes the scan fail
    pub severity_threshold: Severity,
}

impl ScanRequest {
    pub fn builder() -> ScanRequestBuilder {
        ScanRequestBuilder::default()
    }
}

/// Builder for [`ScanRequest`]
#[derive(Debug, Default)]
pub struct ScanRequestBuilder {
    project_path: Option<PathBuf>,
    database_path: Option<PathBuf>,
    lockfile_path: Option<PathBuf>,
    ignore_patterns: Vec<String>,
    severity_threshold: Option<Severity>,
}

impl ScanRequestBuilder {
    pub fn project_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.project_path = Some(path.into());
        self
    }

    pub fn database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = Some(path.into());
        self
    }

    pub fn lockfile_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.lockfile_path = Some(path.into());
        self
    }

    pub fn ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ignore_patterns = patterns;
        self
    }

    pub fn severity_threshold(mut self, severity: Severity) -> Self {
        self.severity_threshold = Some(severity);
        self
    }

    /// # Errors
    /// Returns [`ScanError::Validation`] when the database path is missing.
    pub fn build(self) -> Result<ScanRequest> {
        let database_path = self.database_path.ok_or_else(|| ScanError::Validation {
            message: "a threat database path is required".to_string(),
        })?;

        Ok(ScanRequest {
            project_path: self.project_path.unwrap_or_else(|| PathBuf::from(".")),
            database_path,
            lockfile_path: self.lockfile_path,
            ignore_patterns: self.ignore_patterns,
            severity_threshold: self.severity_threshold.unwrap_or(Severity::Low),
        })
    }
}
