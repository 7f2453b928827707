use crate::threat_detection::domain::{LockEntries, LockEntry, PackageName, Version};
use serde_json::{Map, Value};
use std::collections::btree_map::Entry;

const NODE_MODULES_MARKER: &str = "node_modules/";

/// Maximum nesting followed in lockfile v1 `dependencies` trees
const MAX_DEPTH: usize = 100;

/// Decoder for npm's nested tree lock format
/// (`package-lock.json` and `npm-shrinkwrap.json`).
///
/// Lockfile v2/v3 path keys (`node_modules/a/node_modules/b`) carry the
/// whole ancestry. Lockfile v1 nests `dependencies` objects instead. When a
/// file has both, the `packages` shape is used.
pub struct PackageLockDecoder;

impl PackageLockDecoder {
    pub fn decode(content: &str) -> LockEntries {
        let root: Value = match serde_json::from_str(content) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!("package-lock is not valid JSON: {}", e);
                return LockEntries::new();
            }
        };

        let mut entries = LockEntries::new();

        if let Some(packages) = root.get("packages").and_then(Value::as_object) {
            Self::decode_packages(packages, &mut entries);
        } else if let Some(dependencies) = root.get("dependencies").and_then(Value::as_object) {
            Self::walk_dependencies(dependencies, &[], 0, &mut entries);
        } else {
            tracing::debug!("package-lock has neither 'packages' nor 'dependencies'");
        }

        entries
    }

    /// Lockfile v2/v3: keys are install paths
    fn decode_packages(packages: &Map<String, Value>, entries: &mut LockEntries) {
        for (path, value) in packages {
            let Some((name, chain)) = parse_install_path(path) else {
                continue;
            };

            match value.get("version").and_then(Value::as_str) {
                Some(version) => insert_shallowest(entries, name, Version::new(version), chain),
                None => tracing::debug!(path = %path, "skipping package-lock entry without version"),
            }
        }
    }

    /// Lockfile v1: recursive `dependencies` objects
    fn walk_dependencies(
        dependencies: &Map<String, Value>,
        ancestors: &[PackageName],
        depth: usize,
        entries: &mut LockEntries,
    ) {
        if depth >= MAX_DEPTH {
            tracing::debug!("package-lock nesting exceeds {} levels, stopping", MAX_DEPTH);
            return;
        }

        for (raw_name, value) in dependencies {
            let Ok(name) = PackageName::new(raw_name.as_str()) else {
                tracing::debug!(name = %raw_name, "skipping invalid package name");
                continue;
            };

            if let Some(version) = value.get("version").and_then(Value::as_str) {
                insert_shallowest(entries, name.clone(), Version::new(version), ancestors.to_vec());
            }

            if let Some(nested) = value.get("dependencies").and_then(Value::as_object) {
                let chain: Vec<PackageName> = ancestors
                    .iter()
                    .cloned()
                    .chain(std::iter::once(name))
                    .collect();
                Self::walk_dependencies(nested, &chain, depth + 1, entries);
            }
        }
    }
}

/// Splits `node_modules/a/node_modules/@s/b` into (`@s/b`, [`a`]).
/// The root entry, workspace folders and anything before the first
/// marker are not packages.
fn parse_install_path(path: &str) -> Option<(PackageName, Vec<PackageName>)> {
    let mut segments = path.split(NODE_MODULES_MARKER);
    // Project root or workspace prefix
    segments.next()?;

    let mut names = Vec::new();
    for segment in segments {
        let segment = segment.trim_end_matches('/');
        match PackageName::new(segment) {
            Ok(name) => names.push(name),
            Err(_) => {
                tracing::debug!(path, "skipping package-lock path with invalid segment");
                return None;
            }
        }
    }

    let name = names.pop()?;
    Some((name, names))
}

/// Keeps the occurrence with the shortest chain (the hoisted copy)
fn insert_shallowest(
    entries: &mut LockEntries,
    name: PackageName,
    version: Version,
    chain: Vec<PackageName>,
) {
    match entries.entry(name) {
        Entry::Vacant(slot) => {
            slot.insert(LockEntry::new(version, chain));
        }
        Entry::Occupied(mut existing) => {
            if chain.len() < existing.get().chain.len() {
                tracing::debug!(
                    package = %existing.key(),
                    kept = %version,
                    dropped = %existing.get().version,
                    "duplicate lock entry, keeping shallower occurrence"
                );
                existing.insert(LockEntry::new(version, chain));
            } else if existing.get().version != version {
                tracing::debug!(
                    package = %existing.key(),
                    kept = %existing.get().version,
                    dropped = %version,
                    "duplicate lock entry, keeping shallower occurrence"
                );
            }
        }
    }
}
