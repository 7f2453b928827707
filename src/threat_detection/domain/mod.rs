pub mod dependency_graph;
pub mod issue;
pub mod lock_entry;
pub mod package;
pub mod pattern;
pub mod scan_result;
pub mod severity;
pub mod threat_database;

pub use dependency_graph::{DeclaredDependencies, DependencyGraph, DependencyNode, ScanMode};
pub use issue::{Classification, Issue, ThreatCategory};
pub use lock_entry::{LockEntries, LockEntry};
pub use package::{clean_version, PackageName, Version};
pub use pattern::{Pattern, PatternError, PatternSet};
pub use scan_result::{PackagesScanned, ScanMetadata, ScanResult, SeverityBuckets};
pub use severity::Severity;
pub use threat_database::{
    Campaign, KnownMalicious, Protestware, ProtestwareTier, ThreatDatabase, STALE_AFTER_DAYS,
};
