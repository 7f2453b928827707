use super::lineage::ParentEdges;
use super::{indentation, insert_first, split_descriptor, unquote};
use crate::threat_detection::domain::{LockEntries, LockEntry, PackageName, Version};

/// Decoder state while walking `yarn.lock` line by line
#[derive(Debug, Clone, PartialEq, Eq)]
enum YarnState {
    Idle,
    /// Header aliases read, version line not yet seen.
    /// `complete` is false while the header continues on the next line.
    BufferingAliasHeader { aliases: Vec<String>, complete: bool },
    /// Version committed to `aliases`
    InEntry { aliases: Vec<String> },
    InEntryDependencies { aliases: Vec<String>, indent: usize },
}

/// Decoder for yarn's flat block lock format, classic (v1) and berry (v2+)
///
/// An unindented header names one or more descriptors (`lodash@^4.0.0,
/// lodash@^4.17.0:`); the indented `version` line that follows resolves
/// all of them. Nested `dependencies:` blocks supply parent edges.
pub struct YarnLockDecoder;

impl YarnLockDecoder {
    pub fn decode(content: &str) -> LockEntries {
        let mut entries = LockEntries::new();
        let mut edges = ParentEdges::default();
        let mut state = YarnState::Idle;

        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let indent = indentation(line);
            if indent == 0 {
                let (aliases, complete) = parse_header(trimmed);
                state = match state {
                    YarnState::BufferingAliasHeader {
                        aliases: mut buffered,
                        complete: false,
                    } => {
                        for alias in aliases {
                            if !buffered.contains(&alias) {
                                buffered.push(alias);
                            }
                        }
                        YarnState::BufferingAliasHeader {
                            aliases: buffered,
                            complete,
                        }
                    }
                    _ => YarnState::BufferingAliasHeader { aliases, complete },
                };
                continue;
            }

            state = match state {
                YarnState::Idle => YarnState::Idle,
                YarnState::BufferingAliasHeader { aliases, complete } => {
                    match parse_version_line(trimmed) {
                        Some(version) => {
                            for alias in &aliases {
                                match PackageName::new(alias.as_str()) {
                                    Ok(name) => insert_first(
                                        &mut entries,
                                        name,
                                        LockEntry::new(Version::new(version), Vec::new()),
                                    ),
                                    Err(_) => tracing::debug!(alias = %alias, "skipping invalid yarn alias"),
                                }
                            }
                            YarnState::InEntry { aliases }
                        }
                        None => YarnState::BufferingAliasHeader { aliases, complete },
                    }
                }
                YarnState::InEntry { aliases } => Self::enter_dependencies(aliases, trimmed, indent),
                YarnState::InEntryDependencies {
                    aliases,
                    indent: deps_indent,
                } => {
                    if indent > deps_indent {
                        if let Some(child) = parse_dependency_name(trimmed) {
                            for parent in &aliases {
                                edges.record(parent, child);
                            }
                        }
                        YarnState::InEntryDependencies {
                            aliases,
                            indent: deps_indent,
                        }
                    } else {
                        Self::enter_dependencies(aliases, trimmed, indent)
                    }
                }
            };
        }

        if !edges.is_empty() {
            for (name, entry) in entries.iter_mut() {
                entry.chain = edges.chain_for(name.as_str());
            }
        }

        entries
    }

    fn enter_dependencies(aliases: Vec<String>, trimmed: &str, indent: usize) -> YarnState {
        if trimmed == "dependencies:" || trimmed == "optionalDependencies:" {
            YarnState::InEntryDependencies { aliases, indent }
        } else {
            YarnState::InEntry { aliases }
        }
    }
}

/// Extracts the distinct package names of a header line.
///
/// Returns the names and whether the header is complete (ends with `:`).
/// `__metadata` and `workspace:` descriptors contribute no names.
fn parse_header(trimmed: &str) -> (Vec<String>, bool) {
    let complete = trimmed.ends_with(':');
    let body = trimmed.trim_end_matches(':').trim_end_matches(',');

    let mut names: Vec<String> = Vec::new();
    // Berry quotes the whole comma-separated list, classic quotes each item
    for descriptor in body.split(',') {
        let descriptor = descriptor.trim().trim_matches(['"', '\'']);
        if descriptor.is_empty() || descriptor == "__metadata" {
            continue;
        }
        let Some((name, range)) = split_descriptor(descriptor) else {
            tracing::debug!(descriptor, "skipping yarn descriptor without range");
            continue;
        };
        if range.starts_with("workspace:") {
            continue;
        }
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }

    (names, complete)
}

/// `version "1.2.3"` (classic) or `version: 1.2.3` (berry)
fn parse_version_line(trimmed: &str) -> Option<&str> {
    let rest = trimmed.strip_prefix("version")?;
    if !rest.starts_with([' ', ':']) {
        return None;
    }
    let version = unquote(rest.trim_start_matches(':'));
    (!version.is_empty()).then_some(version)
}

/// `"@babel/highlight" "^7.0.0"` (classic) or `"@babel/highlight": ^7.0.0` (berry)
fn parse_dependency_name(trimmed: &str) -> Option<&str> {
    let name = match trimmed.strip_prefix('"') {
        Some(rest) => &rest[..rest.find('"')?],
        None => trimmed.split([' ', ':']).next()?,
    };
    (!name.is_empty()).then_some(name)
}
