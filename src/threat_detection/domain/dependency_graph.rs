use super::{PackageName, Version};
use serde::Serialize;
use std::collections::BTreeMap;

/// Whether transitive dependencies were resolved from a lock artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// Only manifest-declared dependencies were available
    Direct,
    /// Lock data was merged in
    Deep,
}

impl std::fmt::Display for ScanMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanMode::Direct => write!(f, "direct"),
            ScanMode::Deep => write!(f, "deep"),
        }
    }
}

/// Manifest-declared dependencies: name to declared range
pub type DeclaredDependencies = BTreeMap<PackageName, Version>;

/// A single package in the merged dependency set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyNode {
    name: PackageName,
    resolved_version: Version,
    is_direct: bool,
    chain: Vec<PackageName>,
}

impl DependencyNode {
    /// Node for a manifest-declared dependency; the version is the declared range
    pub fn direct(name: PackageName, declared: Version) -> Self {
        Self {
            name,
            resolved_version: declared,
            is_direct: true,
            chain: Vec::new(),
        }
    }

    /// Node only present because something else pulled it in
    pub fn transitive(name: PackageName, resolved: Version, chain: Vec<PackageName>) -> Self {
        Self {
            name,
            resolved_version: resolved,
            is_direct: false,
            chain,
        }
    }

    pub fn name(&self) -> &PackageName {
        &self.name
    }

    pub fn resolved_version(&self) -> &Version {
        &self.resolved_version
    }

    pub fn is_direct(&self) -> bool {
        self.is_direct
    }

    pub fn is_transitive(&self) -> bool {
        !self.is_direct
    }

    pub fn chain(&self) -> &[PackageName] {
        &self.chain
    }

    pub(crate) fn set_resolved_version(&mut self, version: Version) {
        self.resolved_version = version;
    }
}

/// DependencyGraph aggregate: every unique package of one scan, keyed by name
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    nodes: BTreeMap<PackageName, DependencyNode>,
    mode: ScanMode,
}

impl DependencyGraph {
    pub fn new(nodes: BTreeMap<PackageName, DependencyNode>, mode: ScanMode) -> Self {
        Self { nodes, mode }
    }

    /// Nodes in name order
    pub fn nodes(&self) -> impl Iterator<Item = &DependencyNode> {
        self.nodes.values()
    }

    pub fn get(&self, name: &PackageName) -> Option<&DependencyNode> {
        self.nodes.get(name)
    }

    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    pub fn total_package_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn direct_dependency_count(&self) -> usize {
        self.nodes.values().filter(|n| n.is_direct()).count()
    }

    pub fn transitive_dependency_count(&self) -> usize {
        self.nodes.values().filter(|n| n.is_transitive()).count()
    }
}
