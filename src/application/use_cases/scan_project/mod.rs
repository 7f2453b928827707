use crate::application::dto::{ScanRequest, ScanResponse};
use crate::ports::inbound::ThreatScanPort;
use crate::ports::outbound::{
    LockArtifact, LockfileReader, ManifestReader, ProgressReporter, ThreatDatabaseRepository,
};
use crate::shared::error::ScanError;
use crate::shared::Result;
use crate::threat_detection::domain::{
    Classification, DeclaredDependencies, DependencyGraph, LockEntries, PackageName, PatternSet,
    ScanMetadata, ScanMode, ThreatDatabase,
};
use crate::threat_detection::policies::SeverityThreshold;
use crate::threat_detection::services::{
    Classifier, GraphBuilder, LockDialect, ManifestMerger, ScanResultAggregator,
};
use chrono::Utc;
use std::path::Path;

const TOOL_NAME: &str = env!("CARGO_PKG_NAME");
const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// ScanProjectUseCase - Core use case for scanning one project
///
/// Orchestrates a single, isolated scan: load the database, read the
/// manifest, read and decode the lock artifact, build the graph, classify
/// every node in sequence, aggregate, and evaluate the threshold.
///
/// # Type Parameters
/// * `MR` - ManifestReader implementation
/// * `LR` - LockfileReader implementation
/// * `DR` - ThreatDatabaseRepository implementation
/// * `PR` - ProgressReporter implementation
pub struct ScanProjectUseCase<MR, LR, DR, PR> {
    manifest_reader: MR,
    lockfile_reader: LR,
    database_repository: DR,
    progress_reporter: PR,
}

impl<MR, LR, DR, PR> ScanProjectUseCase<MR, LR, DR, PR>
where
    MR: ManifestReader,
    LR: LockfileReader,
    DR: ThreatDatabaseRepository,
    PR: ProgressReporter,
{
    /// Creates a new ScanProjectUseCase with injected dependencies
    pub fn new(
        manifest_reader: MR,
        lockfile_reader: LR,
        database_repository: DR,
        progress_reporter: PR,
    ) -> Self {
        Self {
            manifest_reader,
            lockfile_reader,
            database_repository,
            progress_reporter,
        }
    }

    /// Executes the scan
    ///
    /// # Errors
    /// Returns an error when the project path, manifest or database is
    /// unusable. Lock file problems only downgrade the scan to direct mode.
    pub fn execute(&self, request: ScanRequest) -> Result<ScanResponse> {
        Self::validate_project_path(&request.project_path)?;
        let mut warnings = Vec::new();

        // Step 1: Threat database
        let database = self.load_database(&request.database_path, &mut warnings)?;

        // Step 2: Caller ignore patterns
        let ignore = self.compile_ignore_patterns(&request.ignore_patterns, &mut warnings);

        // Step 3: Manifest
        let declared = self.read_declared_dependencies(&request.project_path)?;

        // Step 4: Lock artifact (optional)
        let (lock_file, decoded) = match self
            .lockfile_reader
            .read_lockfile(&request.project_path, request.lockfile_path.as_deref())
        {
            Ok(artifact) => self.decode_lock_artifact(artifact, &mut warnings),
            Err(e) => {
                self.warn(
                    &mut warnings,
                    format!("{}. Scanning declared dependencies only.", e),
                );
                (None, None)
            }
        };

        // Step 5: Graph
        let graph = GraphBuilder::build(&declared, decoded);
        self.progress_reporter.report(&format!(
            "🔗 Scan mode: {} ({} direct, {} transitive)",
            graph.mode(),
            graph.direct_dependency_count(),
            graph.transitive_dependency_count()
        ));

        // Step 6: Classification
        let classifications = self.classify_all(&graph, &database, &ignore);

        // Step 7: Aggregate and evaluate
        let metadata = ScanMetadata::new(
            Utc::now().to_rfc3339(),
            TOOL_NAME.to_string(),
            TOOL_VERSION.to_string(),
            database.version().to_string(),
            database.last_updated().to_string(),
        );
        let lock_file = lock_file.filter(|_| graph.mode() == ScanMode::Deep);
        let result = ScanResultAggregator::aggregate(&graph, classifications, lock_file, metadata);
        let status = SeverityThreshold::new(request.severity_threshold).evaluate(&result);

        self.progress_reporter.report_completion(&format!(
            "✅ Scanned {} package(s): {} issue(s), {} trusted, {} ignored",
            result.packages_scanned.total,
            result.total_issues,
            result.trusted.len(),
            result.ignored.len()
        ));

        Ok(ScanResponse::new(result, status, warnings))
    }

    fn validate_project_path(project_path: &Path) -> Result<()> {
        if !project_path.exists() {
            return Err(ScanError::InvalidProjectPath {
                path: project_path.to_path_buf(),
                reason: "Directory does not exist".to_string(),
            }
            .into());
        }
        if !project_path.is_dir() {
            return Err(ScanError::InvalidProjectPath {
                path: project_path.to_path_buf(),
                reason: "Path is not a directory".to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn warn(&self, warnings: &mut Vec<String>, message: String) {
        self.progress_reporter
            .report_error(&format!("⚠️  Warning: {}", message));
        warnings.push(message);
    }

    fn load_database(&self, location: &Path, warnings: &mut Vec<String>) -> Result<ThreatDatabase> {
        self.progress_reporter.report(&format!(
            "📖 Loading threat database from: {}",
            location.display()
        ));

        let database = self.database_repository.load_database(location)?;

        self.progress_reporter.report(&format!(
            "✅ Threat database {} (updated {})",
            database.version(),
            database.last_updated()
        ));

        for error in database.pattern_errors() {
            self.warn(warnings, format!("Skipped trusted pattern: {}", error));
        }

        let today = Utc::now().date_naive();
        if database.is_stale(today) {
            let age = database.age_in_days(today).unwrap_or_default();
            self.warn(
                warnings,
                format!(
                    "Threat database was last updated {} ({} days ago). Results may miss recent threats.",
                    database.last_updated(),
                    age
                ),
            );
        }

        Ok(database)
    }

    fn compile_ignore_patterns(&self, raw: &[String], warnings: &mut Vec<String>) -> PatternSet {
        let (patterns, errors) = PatternSet::parse(raw);
        for error in errors {
            self.warn(warnings, format!("Skipped ignore pattern: {}", error));
        }
        patterns
    }

    fn read_declared_dependencies(&self, project_path: &Path) -> Result<DeclaredDependencies> {
        let content = self.manifest_reader.read_manifest(project_path)?;
        let declared = ManifestMerger::merge(&content, &project_path.join("package.json"))?;

        self.progress_reporter.report(&format!(
            "✅ Detected {} declared dependenc{}",
            declared.len(),
            if declared.len() == 1 { "y" } else { "ies" }
        ));
        Ok(declared)
    }

    /// Detects the dialect and decodes; any failure yields `None`
    fn decode_lock_artifact(
        &self,
        artifact: Option<LockArtifact>,
        warnings: &mut Vec<String>,
    ) -> (Option<String>, Option<LockEntries>) {
        let Some(artifact) = artifact else {
            self.progress_reporter
                .report("ℹ️  No lock file found, scanning declared dependencies only");
            return (None, None);
        };

        let Some(dialect) = LockDialect::detect(Some(&artifact.file_name), &artifact.content) else {
            self.warn(
                warnings,
                format!(
                    "Unrecognized lock file format: {}. Scanning declared dependencies only.",
                    artifact.file_name
                ),
            );
            return (None, None);
        };

        let entries = dialect.decode(&artifact.content);
        if entries.is_empty() {
            self.warn(
                warnings,
                format!(
                    "No packages could be decoded from {}. Scanning declared dependencies only.",
                    artifact.file_name
                ),
            );
            return (None, None);
        }

        self.progress_reporter.report(&format!(
            "📖 Decoded {} package(s) from {} ({})",
            entries.len(),
            artifact.file_name,
            dialect
        ));
        (Some(artifact.file_name), Some(entries))
    }

    fn classify_all(
        &self,
        graph: &DependencyGraph,
        database: &ThreatDatabase,
        ignore: &PatternSet,
    ) -> Vec<(PackageName, Classification)> {
        let total = graph.total_package_count();
        graph
            .nodes()
            .enumerate()
            .map(|(index, node)| {
                self.progress_reporter
                    .report_progress(index + 1, total, Some(node.name().as_str()));
                (node.name().clone(), Classifier::classify(node, database, ignore))
            })
            .collect()
    }
}

impl<MR, LR, DR, PR> ThreatScanPort for ScanProjectUseCase<MR, LR, DR, PR>
where
    MR: ManifestReader,
    LR: LockfileReader,
    DR: ThreatDatabaseRepository,
    PR: ProgressReporter,
{
    fn scan(&self, request: ScanRequest) -> Result<ScanResponse> {
        self.execute(request)
    }
}

#[cfg(test)]
mod tests;
