use super::{PackageName, Version};
use std::collections::BTreeMap;

/// A package recovered from a lock artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockEntry {
    pub version: Version,
    /// Ancestors from the project root down to (excluding) the package.
    /// Empty when the dialect cannot recover lineage.
    pub chain: Vec<PackageName>,
}

impl LockEntry {
    pub fn new(version: Version, chain: Vec<PackageName>) -> Self {
        Self { version, chain }
    }
}

/// Decoder output: package name to resolved version and introduction chain
pub type LockEntries = BTreeMap<PackageName, LockEntry>;
