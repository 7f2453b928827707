use crate::shared::Result;
use serde::Serialize;

/// Maximum length for package names (security limit)
const MAX_PACKAGE_NAME_LENGTH: usize = 255;

/// Characters stripped from the front of a declared range before any
/// list-membership comparison.
const RANGE_PREFIX_CHARS: &[char] = &['^', '~', '>', '<', '=', ' ', '\t'];

/// NewType wrapper for package name with validation
///
/// Names are compared exactly and case-sensitively. A scoped name
/// (`@scope/name`) is a single opaque value and is never split.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PackageName(String);

impl PackageName {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();

        if name.is_empty() {
            anyhow::bail!("Package name cannot be empty");
        }

        // Security: Length limit to prevent DoS
        if name.len() > MAX_PACKAGE_NAME_LENGTH {
            anyhow::bail!(
                "Package name is too long ({} bytes). Maximum allowed: {} bytes",
                name.len(),
                MAX_PACKAGE_NAME_LENGTH
            );
        }

        if name.chars().any(|c| c.is_whitespace() || c.is_control()) {
            anyhow::bail!("Package name '{}' contains whitespace or control characters", name);
        }

        if let Some(scoped) = name.strip_prefix('@') {
            match scoped.split_once('/') {
                Some((scope, rest)) if !scope.is_empty() && !rest.is_empty() => {}
                _ => anyhow::bail!(
                    "Scoped package name '{}' must have the form @scope/name",
                    name
                ),
            }
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the `@scope` segment for scoped names
    pub fn scope(&self) -> Option<&str> {
        if self.0.starts_with('@') {
            self.0.split_once('/').map(|(scope, _)| scope)
        } else {
            None
        }
    }
}

impl std::fmt::Display for PackageName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Version as written in a manifest or lock artifact
///
/// Either a declared range (`^1.2.0`, `>=2.0.0`) or a concrete resolved
/// version. It is never interpreted as semver; [`Version::cleaned`] only
/// strips leading range-prefix characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Version(String);

impl Version {
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Version with known range-prefix characters removed
    pub fn cleaned(&self) -> &str {
        clean_version(&self.0)
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strips range-prefix characters (`^`, `~`, `>=`, `<`, `=`) and surrounding
/// whitespace from a version string.
pub fn clean_version(version: &str) -> &str {
    version.trim_start_matches(RANGE_PREFIX_CHARS).trim_end()
}
