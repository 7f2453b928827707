use crate::shared::Result;
use std::path::Path;

/// Raw lock artifact as read from disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockArtifact {
    /// File name only (e.g. `yarn.lock`), used for dialect detection and reporting
    pub file_name: String,
    pub content: String,
}

impl LockArtifact {
    pub fn new(file_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
        }
    }
}

/// LockfileReader port for locating and reading the project's lock artifact
///
/// An absent lock file is `Ok(None)`. An explicit lock file that is missing,
/// or a lock file that fails the read checks, is an `Err` carrying the reason;
/// the caller records it as a warning and falls back to direct-only mode.
pub trait LockfileReader {
    /// Reads the lock artifact for a project
    ///
    /// # Arguments
    /// * `project_path` - Project directory probed in discovery order
    ///   (`package-lock.json`, `npm-shrinkwrap.json`, `yarn.lock`, `pnpm-lock.yaml`)
    /// * `explicit` - Lock file chosen by the caller; skips discovery
    ///
    /// # Returns
    /// The artifact, or `None` when discovery finds no regular lock file
    fn read_lockfile(
        &self,
        project_path: &Path,
        explicit: Option<&Path>,
    ) -> Result<Option<LockArtifact>>;
}
