use crate::shared::Result;
use std::path::Path;

/// ManifestReader port for reading the project's `package.json`
pub trait ManifestReader {
    /// Reads `package.json` from the specified project directory
    ///
    /// # Errors
    /// Returns an error if:
    /// - `package.json` does not exist
    /// - The file is a symlink, not a regular file, or too large
    /// - The file cannot be read due to permissions or I/O errors
    fn read_manifest(&self, project_path: &Path) -> Result<String>;
}
