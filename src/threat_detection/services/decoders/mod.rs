//! Lock artifact decoders.
//!
//! Each decoder turns raw lock file text into [`LockEntries`]. Decoding
//! never fails: malformed lines or structures are skipped (logged at
//! `debug`) and whatever could be recovered is returned.

mod lineage;
mod package_lock;
mod pnpm_lock;
mod yarn_lock;

pub use package_lock::PackageLockDecoder;
pub use pnpm_lock::PnpmLockDecoder;
pub use yarn_lock::YarnLockDecoder;

use crate::threat_detection::domain::{LockEntries, LockEntry, PackageName};
use std::collections::btree_map::Entry;
use std::fmt;

/// Lock file names probed in a project directory, in discovery order
pub const LOCKFILE_NAMES: [&str; 4] = [
    "package-lock.json",
    "npm-shrinkwrap.json",
    "yarn.lock",
    "pnpm-lock.yaml",
];

/// Lock file formats understood by lockwarden
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockDialect {
    /// `pnpm-lock.yaml`
    Pnpm,
    /// `package-lock.json` / `npm-shrinkwrap.json`
    Npm,
    /// `yarn.lock`, classic and berry
    Yarn,
}

impl LockDialect {
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        match file_name {
            "pnpm-lock.yaml" => Some(LockDialect::Pnpm),
            "package-lock.json" | "npm-shrinkwrap.json" => Some(LockDialect::Npm),
            "yarn.lock" => Some(LockDialect::Yarn),
            _ => None,
        }
    }

    /// Guesses the dialect from content alone
    pub fn sniff(content: &str) -> Option<Self> {
        let trimmed = content.trim_start();
        if trimmed.starts_with('{') {
            return Some(LockDialect::Npm);
        }

        for line in content.lines() {
            if line.starts_with("# yarn lockfile") || line.starts_with("__metadata:") {
                return Some(LockDialect::Yarn);
            }
            if line.starts_with("lockfileVersion:") || line.trim_end() == "packages:" {
                return Some(LockDialect::Pnpm);
            }
        }

        None
    }

    /// File name first, content sniffing as fallback
    pub fn detect(file_name: Option<&str>, content: &str) -> Option<Self> {
        file_name
            .and_then(Self::from_file_name)
            .or_else(|| Self::sniff(content))
    }

    pub fn decode(&self, content: &str) -> LockEntries {
        match self {
            LockDialect::Pnpm => PnpmLockDecoder::decode(content),
            LockDialect::Npm => PackageLockDecoder::decode(content),
            LockDialect::Yarn => YarnLockDecoder::decode(content),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LockDialect::Pnpm => "pnpm",
            LockDialect::Npm => "npm",
            LockDialect::Yarn => "yarn",
        }
    }
}

impl fmt::Display for LockDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inserts unless the name is already present; later versions are dropped
fn insert_first(entries: &mut LockEntries, name: PackageName, entry: LockEntry) {
    match entries.entry(name) {
        Entry::Vacant(slot) => {
            slot.insert(entry);
        }
        Entry::Occupied(existing) => {
            if existing.get().version != entry.version {
                tracing::debug!(
                    package = %existing.key(),
                    kept = %existing.get().version,
                    dropped = %entry.version,
                    "duplicate lock entry, keeping first occurrence"
                );
            }
        }
    }
}

/// Removes one layer of matching single or double quotes
fn unquote(value: &str) -> &str {
    let value = value.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

/// Splits `name@range` descriptors without breaking `@scope/name`
fn split_descriptor(descriptor: &str) -> Option<(&str, &str)> {
    let at = descriptor.get(1..)?.find('@')? + 1;
    Some((&descriptor[..at], &descriptor[at + 1..]))
}

fn indentation(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}
