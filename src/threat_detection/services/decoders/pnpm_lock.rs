use super::lineage::ParentEdges;
use super::{indentation, insert_first, split_descriptor, unquote};
use crate::threat_detection::domain::{LockEntries, LockEntry, PackageName, Version};

/// Decoder state while walking `pnpm-lock.yaml` line by line
#[derive(Debug, Clone, PartialEq, Eq)]
enum PnpmState {
    /// Any top-level section other than `packages:` / `snapshots:`
    OutsideSection,
    InPackages,
    /// `parent` is the snapshot entry whose nested keys are being read
    InSnapshots { parent: Option<String> },
    /// Inside a snapshot's `dependencies:` or `optionalDependencies:` map
    InSnapshotDeps { parent: String, indent: usize },
}

/// Decoder for pnpm's indented block lock format (lockfile v5 through v9)
///
/// Entries come from the keys of the top-level `packages:` section. The
/// `snapshots:` section (v9) is best-effort: its keys add entries the
/// packages block missed and its nested dependency maps supply the parent
/// edges used for chains.
pub struct PnpmLockDecoder;

impl PnpmLockDecoder {
    pub fn decode(content: &str) -> LockEntries {
        let mut entries = LockEntries::new();
        let mut edges = ParentEdges::default();
        let mut state = PnpmState::OutsideSection;
        let mut entry_indent: Option<usize> = None;

        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let indent = indentation(line);
            if indent == 0 {
                state = match trimmed {
                    "packages:" => PnpmState::InPackages,
                    "snapshots:" => PnpmState::InSnapshots { parent: None },
                    _ => PnpmState::OutsideSection,
                };
                entry_indent = None;
                continue;
            }

            // Leaving a dependency map hands the line back to the snapshot level
            if let PnpmState::InSnapshotDeps { parent, indent: deps_indent } = &state {
                if indent > *deps_indent {
                    if let Some((child, _)) = split_yaml_key(trimmed) {
                        edges.record(parent, unquote(child));
                    }
                    continue;
                }
                let parent = Some(parent.clone());
                state = PnpmState::InSnapshots { parent };
            }

            let next = match &state {
                PnpmState::OutsideSection | PnpmState::InSnapshotDeps { .. } => None,
                PnpmState::InPackages => {
                    if *entry_indent.get_or_insert(indent) == indent {
                        if let Some((name, version)) = parse_entry_line(trimmed) {
                            insert_first(&mut entries, name, LockEntry::new(version, Vec::new()));
                        }
                    }
                    None
                }
                PnpmState::InSnapshots { parent } => {
                    let level = *entry_indent.get_or_insert(indent);
                    if indent == level {
                        let parsed = parse_entry_line(trimmed);
                        let parent = parsed.as_ref().map(|(name, _)| name.to_string());
                        if let Some((name, version)) = parsed {
                            insert_first(&mut entries, name, LockEntry::new(version, Vec::new()));
                        }
                        Some(PnpmState::InSnapshots { parent })
                    } else if indent > level
                        && (trimmed == "dependencies:" || trimmed == "optionalDependencies:")
                    {
                        parent.clone().map(|parent| PnpmState::InSnapshotDeps { parent, indent })
                    } else {
                        None
                    }
                }
            };

            if let Some(next) = next {
                state = next;
            }
        }

        if !edges.is_empty() {
            for (name, entry) in entries.iter_mut() {
                entry.chain = edges.chain_for(name.as_str());
            }
        }

        entries
    }
}

/// Parses an entry key line such as `/lodash@4.17.21:`,
/// `'@babel/core@7.20.0':` or legacy `/react-dom/18.2.0_react@18.2.0:`.
fn parse_entry_line(trimmed: &str) -> Option<(PackageName, Version)> {
    let Some((key, _)) = split_yaml_key(trimmed) else {
        tracing::debug!(line = trimmed, "skipping pnpm line without a key");
        return None;
    };

    match parse_package_key(unquote(key)) {
        Some(parsed) => Some(parsed),
        None => {
            tracing::debug!(key, "skipping unrecognized pnpm package key");
            None
        }
    }
}

fn parse_package_key(key: &str) -> Option<(PackageName, Version)> {
    let key = key.strip_prefix('/').unwrap_or(key);
    // Peer resolution suffix: react-dom@18.2.0(react@18.2.0)
    let key = key.split('(').next().unwrap_or(key);

    let (name, version) = split_descriptor(key)
        .filter(|(name, _)| is_plain_name(name))
        .or_else(|| split_legacy_key(key))?;

    // Legacy peer suffix: 18.2.0_react@18.2.0
    let version = version.split('_').next().unwrap_or(version).trim();
    if version.is_empty() {
        return None;
    }

    let name = PackageName::new(name).ok()?;
    Some((name, Version::new(version)))
}

/// `name` or `@scope/name`, no further path segments
fn is_plain_name(name: &str) -> bool {
    let slashes = name.matches('/').count();
    if name.starts_with('@') {
        slashes == 1
    } else {
        slashes == 0
    }
}

/// Legacy v5 key form: `name/version` or `@scope/name/version`
fn split_legacy_key(key: &str) -> Option<(&str, &str)> {
    let separator = key.rfind('/')?;
    let (name, version) = (&key[..separator], &key[separator + 1..]);
    is_plain_name(name).then_some((name, version))
}

/// Splits `key: value`, `key:` and `'quoted key': value` lines
fn split_yaml_key(trimmed: &str) -> Option<(&str, &str)> {
    for quote in ['\'', '"'] {
        if let Some(rest) = trimmed.strip_prefix(quote) {
            let close = rest.find(quote)?;
            let after = rest[close + 1..].strip_prefix(':')?;
            return Some((&trimmed[..close + 2], after.trim()));
        }
    }

    if let Some((key, value)) = trimmed.split_once(": ") {
        return Some((key, value.trim()));
    }
    trimmed.strip_suffix(':').map(|key| (key, ""))
}
