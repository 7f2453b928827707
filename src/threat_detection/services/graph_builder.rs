use crate::threat_detection::domain::{
    DeclaredDependencies, DependencyGraph, DependencyNode, LockEntries, ScanMode,
};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// GraphBuilder service merging declared dependencies with decoded lock data
///
/// This service contains pure business logic with no I/O. Directly declared
/// identity always wins: a declared name found in the lock data only takes
/// the resolved version, never the lock chain or transitive flag.
pub struct GraphBuilder;

impl GraphBuilder {
    /// Builds the dependency graph for one scan
    ///
    /// # Arguments
    /// * `declared` - Manifest-declared name to range map
    /// * `decoded` - Decoder output, or `None` when no lock artifact was usable
    ///
    /// # Returns
    /// A graph in `deep` mode when lock data contributed at least one entry,
    /// otherwise the direct-only seed in `direct` mode
    pub fn build(declared: &DeclaredDependencies, decoded: Option<LockEntries>) -> DependencyGraph {
        let mut nodes: BTreeMap<_, _> = declared
            .iter()
            .map(|(name, range)| {
                (
                    name.clone(),
                    DependencyNode::direct(name.clone(), range.clone()),
                )
            })
            .collect();

        let decoded = match decoded {
            Some(entries) if !entries.is_empty() => entries,
            _ => return DependencyGraph::new(nodes, ScanMode::Direct),
        };

        for (name, entry) in decoded {
            match nodes.entry(name) {
                Entry::Occupied(mut direct) => {
                    direct.get_mut().set_resolved_version(entry.version);
                }
                Entry::Vacant(slot) => {
                    let node = DependencyNode::transitive(slot.key().clone(), entry.version, entry.chain);
                    slot.insert(node);
                }
            }
        }

        DependencyGraph::new(nodes, ScanMode::Deep)
    }
}
