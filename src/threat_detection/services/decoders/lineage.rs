use crate::threat_detection::domain::PackageName;
use std::collections::{HashMap, HashSet};

/// Maximum number of ancestors followed when deriving a chain.
/// Keeps hostile or cyclic lock files from producing unbounded walks.
const MAX_CHAIN_DEPTH: usize = 100;

/// Parent edges recovered from a lock artifact, keyed by child name.
///
/// Only the first parent recorded for a child is kept.
#[derive(Debug, Default)]
pub(crate) struct ParentEdges {
    parents: HashMap<String, String>,
}

impl ParentEdges {
    pub(crate) fn record(&mut self, parent: &str, child: &str) {
        if parent == child {
            return;
        }
        self.parents
            .entry(child.to_string())
            .or_insert_with(|| parent.to_string());
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Ancestors of `name`, ordered root first
    pub(crate) fn chain_for(&self, name: &str) -> Vec<PackageName> {
        let mut visited = HashSet::from([name]);
        let mut ancestors = Vec::new();
        let mut current = name;

        while let Some(parent) = self.parents.get(current) {
            if ancestors.len() >= MAX_CHAIN_DEPTH {
                tracing::debug!(package = name, "chain truncated at depth {}", MAX_CHAIN_DEPTH);
                break;
            }
            if !visited.insert(parent.as_str()) {
                break;
            }
            ancestors.push(parent.as_str());
            current = parent.as_str();
        }

        ancestors
            .into_iter()
            .rev()
            .filter_map(|ancestor| PackageName::new(ancestor).ok())
            .collect()
    }
}
