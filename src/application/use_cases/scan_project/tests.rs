use super::*;
use crate::application::dto::ScanRequest;
use crate::threat_detection::domain::{ScanMode, Severity, ThreatCategory};
use crate::threat_detection::policies::ScanStatus;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// Mock implementations for testing
struct MockManifestReader {
    content: String,
}

impl ManifestReader for MockManifestReader {
    fn read_manifest(&self, _project_path: &Path) -> Result<String> {
        Ok(self.content.clone())
    }
}

struct MissingManifestReader;

impl ManifestReader for MissingManifestReader {
    fn read_manifest(&self, project_path: &Path) -> Result<String> {
        Err(ScanError::ManifestNotFound {
            path: project_path.join("package.json"),
            suggestion: "Run the scan from the project root".to_string(),
        }
        .into())
    }
}

struct MockLockfileReader {
    artifact: Option<LockArtifact>,
}

impl LockfileReader for MockLockfileReader {
    fn read_lockfile(
        &self,
        _project_path: &Path,
        _explicit: Option<&Path>,
    ) -> Result<Option<LockArtifact>> {
        Ok(self.artifact.clone())
    }
}

struct RejectedLockfileReader;

impl LockfileReader for RejectedLockfileReader {
    fn read_lockfile(
        &self,
        _project_path: &Path,
        _explicit: Option<&Path>,
    ) -> Result<Option<LockArtifact>> {
        anyhow::bail!("Lock file not found: custom.lock")
    }
}

struct MockDatabaseRepository {
    json: String,
}

impl ThreatDatabaseRepository for MockDatabaseRepository {
    fn load_database(&self, _location: &Path) -> Result<ThreatDatabase> {
        ThreatDatabase::parse(&self.json)
    }
}

#[derive(Default)]
struct RecordingProgressReporter {
    errors: RefCell<Vec<String>>,
    progress_calls: RefCell<usize>,
}

impl ProgressReporter for &RecordingProgressReporter {
    fn report(&self, _message: &str) {}
    fn report_progress(&self, _current: usize, _total: usize, _message: Option<&str>) {
        *self.progress_calls.borrow_mut() += 1;
    }
    fn report_error(&self, message: &str) {
        self.errors.borrow_mut().push(message.to_string());
    }
    fn report_completion(&self, _message: &str) {}
}

fn today() -> String {
    Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

fn database(body: &str) -> String {
    format!(
        r#"{{"version":"1.0.0","lastUpdated":"{}",{}}}"#,
        today(),
        body
    )
}

fn request(project: &Path) -> ScanRequest {
    ScanRequest::builder()
        .project_path(project.to_path_buf())
        .database_path(PathBuf::from("threats.json"))
        .build()
        .unwrap()
}

fn use_case<'a>(
    manifest: &str,
    artifact: Option<LockArtifact>,
    db: String,
    reporter: &'a RecordingProgressReporter,
) -> ScanProjectUseCase<
    MockManifestReader,
    MockLockfileReader,
    MockDatabaseRepository,
    &'a RecordingProgressReporter,
> {
    ScanProjectUseCase::new(
        MockManifestReader {
            content: manifest.to_string(),
        },
        MockLockfileReader { artifact },
        MockDatabaseRepository { json: db },
        reporter,
    )
}

const NPM_LOCK: &str = r#"{
  "lockfileVersion": 3,
  "packages": {
    "": { "name": "app" },
    "node_modules/dep-a": { "version": "1.2.0" },
    "node_modules/dep-a/node_modules/dep-b": { "version": "2.0.0" }
  }
}"#;

#[test]
fn test_deep_scan_flags_transitive_malicious_package() {
    let dir = TempDir::new().unwrap();
    let reporter = RecordingProgressReporter::default();
    let sut = use_case(
        r#"{"dependencies":{"dep-a":"^1.0.0"}}"#,
        Some(LockArtifact::new("package-lock.json", NPM_LOCK)),
        database(r#""knownMalicious":{"confirmed":["dep-b"]}"#),
        &reporter,
    );

    let response = sut.execute(request(dir.path())).unwrap();
    let result = &response.result;

    assert_eq!(result.scan_mode, ScanMode::Deep);
    assert_eq!(result.lock_file.as_deref(), Some("package-lock.json"));
    assert_eq!(result.packages_scanned.total, 2);
    assert_eq!(result.packages_scanned.direct, 1);
    assert_eq!(result.packages_scanned.transitive, 1);
    assert_eq!(result.total_issues, 1);
    assert_eq!(result.transitive_issues, 1);

    let issue = &result.results.critical[0];
    assert_eq!(issue.package.as_str(), "dep-b");
    assert_eq!(issue.version, "2.0.0");
    assert_eq!(issue.category, ThreatCategory::ConfirmedMalicious);
    assert!(issue.is_transitive);
    assert_eq!(issue.chain.len(), 1);
    assert_eq!(issue.chain[0].as_str(), "dep-a");

    assert_eq!(response.status, ScanStatus::IssuesFound);
    assert!(response.warnings.is_empty());
    assert_eq!(*reporter.progress_calls.borrow(), 2);
}

#[test]
fn test_missing_lock_file_scans_direct_dependencies() {
    let dir = TempDir::new().unwrap();
    let reporter = RecordingProgressReporter::default();
    let sut = use_case(
        r#"{"dependencies":{"left-pad":"^1.3.0"},"devDependencies":{"crossenv":"1.0.0"}}"#,
        None,
        database(r#""knownMalicious":{"typosquatting":["crossenv"]}"#),
        &reporter,
    );

    let response = sut.execute(request(dir.path())).unwrap();

    assert_eq!(response.result.scan_mode, ScanMode::Direct);
    assert!(response.result.lock_file.is_none());
    assert_eq!(response.result.packages_scanned.total, 2);
    assert_eq!(response.result.results.critical.len(), 1);
    assert_eq!(response.result.results.critical[0].version, "1.0.0");
    assert!(response.result.results.critical[0].is_direct);
}

#[test]
fn test_trusted_pattern_overrides_malicious_listing() {
    let dir = TempDir::new().unwrap();
    let reporter = RecordingProgressReporter::default();
    let sut = use_case(
        r#"{"dependencies":{"@types/node":"^20.0.0"}}"#,
        None,
        database(r#""knownMalicious":{"confirmed":["@types/node"]},"trustedPatterns":["@types/*"]"#),
        &reporter,
    );

    let response = sut.execute(request(dir.path())).unwrap();

    assert_eq!(response.result.total_issues, 0);
    assert_eq!(response.result.trusted.len(), 1);
    assert_eq!(response.status, ScanStatus::Pass);
}

#[test]
fn test_ignore_patterns_and_invalid_pattern_warning() {
    let dir = TempDir::new().unwrap();
    let reporter = RecordingProgressReporter::default();
    let sut = use_case(
        r#"{"dependencies":{"evil-pkg":"1.0.0"}}"#,
        None,
        database(r#""knownMalicious":{"confirmed":["evil-pkg"]}"#),
        &reporter,
    );

    let request = ScanRequest::builder()
        .project_path(dir.path().to_path_buf())
        .database_path(PathBuf::from("threats.json"))
        .ignore_patterns(vec!["evil-pkg".to_string(), "ev*l".to_string()])
        .build()
        .unwrap();
    let response = sut.execute(request).unwrap();

    assert_eq!(response.result.total_issues, 0);
    assert_eq!(response.result.ignored.len(), 1);
    assert_eq!(response.warnings.len(), 1);
    assert!(response.warnings[0].contains("ev*l"));
    assert_eq!(reporter.errors.borrow().len(), 1);
    assert!(reporter.errors.borrow()[0].starts_with("⚠️  Warning:"));
}

#[test]
fn test_severity_threshold_above_findings_passes() {
    let dir = TempDir::new().unwrap();
    let reporter = RecordingProgressReporter::default();
    let sut = use_case(
        r#"{"dependencies":{"es5-ext":"0.10.64"}}"#,
        None,
        database(r#""protestware":{"low":{"packages":["es5-ext"]}}"#),
        &reporter,
    );

    let request = ScanRequest::builder()
        .project_path(dir.path().to_path_buf())
        .database_path(PathBuf::from("threats.json"))
        .severity_threshold(Severity::High)
        .build()
        .unwrap();
    let response = sut.execute(request).unwrap();

    assert_eq!(response.result.results.low.len(), 1);
    assert_eq!(response.status, ScanStatus::Pass);
}

#[test]
fn test_unrecognized_lock_file_falls_back_with_warning() {
    let dir = TempDir::new().unwrap();
    let reporter = RecordingProgressReporter::default();
    let sut = use_case(
        r#"{"dependencies":{"dep-a":"^1.0.0"}}"#,
        Some(LockArtifact::new("deps.lock", "this is not a lock file")),
        database(r#""campaigns":{}"#),
        &reporter,
    );

    let response = sut.execute(request(dir.path())).unwrap();

    assert_eq!(response.result.scan_mode, ScanMode::Direct);
    assert!(response.result.lock_file.is_none());
    assert_eq!(response.warnings.len(), 1);
    assert!(response.warnings[0].contains("deps.lock"));
}

#[test]
fn test_undecodable_lock_file_falls_back_with_warning() {
    let dir = TempDir::new().unwrap();
    let reporter = RecordingProgressReporter::default();
    let sut = use_case(
        r#"{"dependencies":{"dep-a":"^1.0.0"}}"#,
        Some(LockArtifact::new("package-lock.json", "{ broken json")),
        database(r#""campaigns":{}"#),
        &reporter,
    );

    let response = sut.execute(request(dir.path())).unwrap();

    assert_eq!(response.result.scan_mode, ScanMode::Direct);
    assert_eq!(response.result.packages_scanned.total, 1);
    assert!(response.warnings[0].contains("No packages could be decoded"));
}

#[test]
fn test_campaign_version_split() {
    let dir = TempDir::new().unwrap();
    let reporter = RecordingProgressReporter::default();
    let lock = r#"{
  "lockfileVersion": 3,
  "packages": {
    "node_modules/@ctrl/tinycolor": { "version": "4.1.0" },
    "node_modules/ngx-bootstrap": { "version": "19.0.3" }
  }
}"#;
    let sut = use_case(
        r#"{"dependencies":{"@ctrl/tinycolor":"^4.1.0","ngx-bootstrap":"^19.0.0"}}"#,
        Some(LockArtifact::new("package-lock.json", lock)),
        database(
            r#""campaigns":{"shai-hulud":{"name":"Shai-Hulud","severity":"critical",
                "packages":["@ctrl/tinycolor","ngx-bootstrap"],
                "affectedVersions":{"@ctrl/tinycolor":["4.1.1","4.1.2"],"ngx-bootstrap":["19.0.3"]}}}"#,
        ),
        &reporter,
    );

    let response = sut.execute(request(dir.path())).unwrap();
    let result = &response.result;

    assert_eq!(result.results.critical.len(), 1);
    assert_eq!(result.results.critical[0].package.as_str(), "ngx-bootstrap");
    assert_eq!(result.results.low.len(), 1);
    let safe = &result.results.low[0];
    assert_eq!(safe.package.as_str(), "@ctrl/tinycolor");
    assert!(safe.safe_version);
    assert_eq!(safe.action, "verify");
}

#[test]
fn test_stale_database_warns() {
    let dir = TempDir::new().unwrap();
    let reporter = RecordingProgressReporter::default();
    let sut = use_case(
        r#"{"dependencies":{}}"#,
        None,
        r#"{"version":"0.9.0","lastUpdated":"2020-01-01"}"#.to_string(),
        &reporter,
    );

    let response = sut.execute(request(dir.path())).unwrap();

    assert_eq!(response.warnings.len(), 1);
    assert!(response.warnings[0].contains("2020-01-01"));
    assert_eq!(response.result.packages_scanned.total, 0);
    assert_eq!(response.status, ScanStatus::Pass);
}

#[test]
fn test_missing_manifest_is_fatal() {
    let dir = TempDir::new().unwrap();
    let reporter = RecordingProgressReporter::default();
    let sut = ScanProjectUseCase::new(
        MissingManifestReader,
        MockLockfileReader { artifact: None },
        MockDatabaseRepository {
            json: database(r#""campaigns":{}"#),
        },
        &reporter,
    );

    let err = sut.execute(request(dir.path())).unwrap_err();
    assert!(err.to_string().contains("package.json not found"));
}

#[test]
fn test_invalid_database_is_fatal() {
    let dir = TempDir::new().unwrap();
    let reporter = RecordingProgressReporter::default();
    let sut = use_case(
        r#"{"dependencies":{}}"#,
        None,
        r#"{"lastUpdated":"2025-01-01"}"#.to_string(),
        &reporter,
    );

    let err = sut.execute(request(dir.path())).unwrap_err();
    assert!(err.to_string().contains("Invalid threat database"));
}

#[test]
fn test_nonexistent_project_path_is_rejected() {
    let reporter = RecordingProgressReporter::default();
    let sut = use_case(r#"{}"#, None, database(r#""campaigns":{}"#), &reporter);

    let err = sut
        .execute(request(Path::new("/nonexistent/lockwarden/project")))
        .unwrap_err();
    assert!(err.to_string().contains("Invalid project path"));
}

#[test]
fn test_scan_port_delegates_to_execute() {
    let dir = TempDir::new().unwrap();
    let reporter = RecordingProgressReporter::default();
    let sut = use_case(
        r#"{"dependencies":{"dep-a":"1.0.0"}}"#,
        None,
        database(r#""campaigns":{}"#),
        &reporter,
    );

    let response = ThreatScanPort::scan(&sut, request(dir.path())).unwrap();
    assert_eq!(response.result.packages_scanned.total, 1);
    assert_eq!(response.result.metadata.tool_name(), "lockwarden");
}

#[test]
fn test_rejected_lock_file_is_recorded_as_warning() {
    let dir = TempDir::new().unwrap();
    let reporter = RecordingProgressReporter::default();
    let sut = ScanProjectUseCase::new(
        MockManifestReader {
            content: r#"{"dependencies":{"crossenv":"1.0.0"}}"#.to_string(),
        },
        RejectedLockfileReader,
        MockDatabaseRepository {
            json: database(r#""knownMalicious":{"typosquatting":["crossenv"]}"#),
        },
        &reporter,
    );

    let response = sut.execute(request(dir.path())).unwrap();

    assert_eq!(response.result.scan_mode, ScanMode::Direct);
    assert!(response.result.lock_file.is_none());
    assert_eq!(response.result.results.critical.len(), 1);
    assert_eq!(
        response.warnings,
        vec!["Lock file not found: custom.lock. Scanning declared dependencies only.".to_string()]
    );
    assert!(reporter
        .errors
        .borrow()
        .iter()
        .any(|e| e.contains("Lock file not found: custom.lock")));
}
