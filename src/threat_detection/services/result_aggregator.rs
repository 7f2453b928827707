use crate::threat_detection::domain::{
    Classification, DependencyGraph, PackageName, PackagesScanned, ScanMetadata, ScanResult,
    SeverityBuckets,
};

/// ScanResultAggregator service turning per-node classifications into a
/// [`ScanResult`].
pub struct ScanResultAggregator;

impl ScanResultAggregator {
    /// # Arguments
    /// * `graph` - The graph that was classified (supplies mode and counts)
    /// * `classifications` - One classification per node, in graph order
    /// * `lock_file` - Name of the lock artifact used, if any
    /// * `metadata` - Run metadata
    pub fn aggregate(
        graph: &DependencyGraph,
        classifications: Vec<(PackageName, Classification)>,
        lock_file: Option<String>,
        metadata: ScanMetadata,
    ) -> ScanResult {
        let mut results = SeverityBuckets::default();
        let mut trusted = Vec::new();
        let mut ignored = Vec::new();

        for (name, classification) in classifications {
            match classification {
                Classification::Issue(issue) => results.push(*issue),
                Classification::Trusted => trusted.push(name),
                Classification::Ignored => ignored.push(name),
                Classification::Clean => {}
            }
        }

        let transitive_issues = results.iter().filter(|issue| issue.is_transitive).count();

        ScanResult {
            scan_mode: graph.mode(),
            lock_file,
            packages_scanned: PackagesScanned {
                total: graph.total_package_count(),
                direct: graph.direct_dependency_count(),
                transitive: graph.transitive_dependency_count(),
            },
            total_issues: results.len(),
            transitive_issues,
            results,
            trusted,
            ignored,
            metadata,
        }
    }
}
