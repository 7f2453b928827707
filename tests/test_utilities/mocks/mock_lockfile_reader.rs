use lockwarden::prelude::*;
use std::path::Path;

/// Mock LockfileReader for testing
pub struct MockLockfileReader {
    pub artifact: Option<LockArtifact>,
}

impl MockLockfileReader {
    pub fn new(file_name: &str, content: &str) -> Self {
        Self {
            artifact: Some(LockArtifact::new(file_name, content)),
        }
    }

    /// No lock file in the project
    pub fn absent() -> Self {
        Self { artifact: None }
    }
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
