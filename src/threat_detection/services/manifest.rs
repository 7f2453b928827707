use crate::shared::error::ScanError;
use crate::shared::Result;
use crate::threat_detection::domain::{DeclaredDependencies, PackageName, Version};
use serde_json::Value;
use std::path::Path;

/// `package.json` sections merged into one namespace, in merge order.
/// A name in a later section overwrites the earlier range.
pub const DEPENDENCY_SECTIONS: [&str; 4] = [
    "dependencies",
    "devDependencies",
    "peerDependencies",
    "optionalDependencies",
];

/// ManifestMerger service flattening the declared dependency maps of a
/// `package.json` into [`DeclaredDependencies`].
pub struct ManifestMerger;

impl ManifestMerger {
    /// Parses manifest text and merges its dependency sections
    ///
    /// # Errors
    /// Returns [`ScanError::ManifestParseError`] when the content is not a
    /// JSON object.
    pub fn merge(content: &str, path: &Path) -> Result<DeclaredDependencies> {
        let manifest: Value =
            serde_json::from_str(content).map_err(|e| ScanError::ManifestParseError {
                path: path.to_path_buf(),
                details: e.to_string(),
            })?;

        if !manifest.is_object() {
            return Err(ScanError::ManifestParseError {
                path: path.to_path_buf(),
                details: "top-level value must be an object".to_string(),
            }
            .into());
        }

        Ok(Self::merge_sections(&manifest))
    }

    /// Merges the dependency sections of an already-parsed manifest
    pub fn merge_sections(manifest: &Value) -> DeclaredDependencies {
        let mut merged = DeclaredDependencies::new();

        for section in DEPENDENCY_SECTIONS {
            let Some(map) = manifest.get(section) else {
                continue;
            };
            let Some(map) = map.as_object() else {
                tracing::warn!("ignoring '{}' in package.json: not an object", section);
                continue;
            };

            for (name, range) in map {
                let Some(range) = range.as_str() else {
                    tracing::debug!(section, package = %name, "skipping non-string range");
                    continue;
                };
                match PackageName::new(name.as_str()) {
                    Ok(name) => {
                        merged.insert(name, Version::new(range));
                    }
                    Err(e) => tracing::warn!("skipping dependency '{}' in {}: {}", name, section, e),
                }
            }
        }

        merged
    }
}
