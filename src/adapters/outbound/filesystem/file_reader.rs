use crate::ports::outbound::{
    LockArtifact, LockfileReader, ManifestReader, ThreatDatabaseRepository,
};
use crate::shared::error::ScanError;
use crate::shared::security::validate_readable_file;
use crate::shared::Result;
use crate::threat_detection::domain::ThreatDatabase;
use crate::threat_detection::services::LOCKFILE_NAMES;
use std::fs;
use std::path::Path;

const MANIFEST_FILE_NAME: &str = "package.json";

/// FileSystemReader adapter for reading scan inputs from the file system
///
/// This adapter implements the ManifestReader, LockfileReader and
/// ThreatDatabaseRepository ports. Every read goes through the same
/// symlink, file type and size checks.
pub struct FileSystemReader;

impl FileSystemReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileSystemReader {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystemReader {
    /// Reads a file after the security checks in [`validate_readable_file`]
    fn safe_read_file(&self, path: &Path, file_type: &str) -> Result<String> {
        validate_readable_file(path, file_type)?;

        fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", file_type, e))
    }

    fn read_lock_artifact(&self, path: &Path) -> Result<LockArtifact> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let content = self
            .safe_read_file(path, &file_name)
            .map_err(|e| anyhow::anyhow!("Ignoring lock file {}: {}", path.display(), e))?;

        Ok(LockArtifact::new(file_name, content))
    }
}

/// Regular file check that does not follow symlinks
fn is_regular_file(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok_and(|metadata| metadata.file_type().is_file())
}

impl ManifestReader for FileSystemReader {
    fn read_manifest(&self, project_path: &Path) -> Result<String> {
        let manifest_path = project_path.join(MANIFEST_FILE_NAME);

        if !manifest_path.exists() {
            return Err(ScanError::ManifestNotFound {
                path: manifest_path,
                suggestion: format!(
                    "package.json does not exist in project directory \"{}\".\n   \
                     Please run in the root directory of an npm, pnpm or yarn project, or specify the correct path with the --path option.",
                    project_path.display()
                ),
            }
            .into());
        }

        self.safe_read_file(&manifest_path, MANIFEST_FILE_NAME)
            .map_err(|e| {
                ScanError::FileReadError {
                    path: manifest_path,
                    details: e.to_string(),
                }
                .into()
            })
    }
}

impl LockfileReader for FileSystemReader {
    fn read_lockfile(
        &self,
        project_path: &Path,
        explicit: Option<&Path>,
    ) -> Result<Option<LockArtifact>> {
        if let Some(path) = explicit {
            if !path.exists() {
                anyhow::bail!("Lock file not found: {}", path.display());
            }
            return self.read_lock_artifact(path).map(Some);
        }

        for name in LOCKFILE_NAMES {
            let candidate = project_path.join(name);
            if is_regular_file(&candidate) {
                tracing::debug!(lock_file = %candidate.display(), "discovered lock file");
                return self.read_lock_artifact(&candidate).map(Some);
            }
            if candidate.symlink_metadata().is_ok() {
                tracing::debug!(candidate = %candidate.display(), "skipping non-regular lock file");
            }
        }

        Ok(None)
    }
}

impl ThreatDatabaseRepository for FileSystemReader {
    fn load_database(&self, location: &Path) -> Result<ThreatDatabase> {
        if !location.exists() {
            return Err(ScanError::DatabaseNotFound {
                path: location.to_path_buf(),
            }
            .into());
        }

        let content = self
            .safe_read_file(location, "threat database")
            .map_err(|e| ScanError::FileReadError {
                path: location.to_path_buf(),
                details: e.to_string(),
            })?;

        ThreatDatabase::parse(&content)
    }
}
