use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::config::ConfigEntry;

/// Read-only lookup over the backup list: which directories to visit and
/// which (database, suffix) pairs each of them is expected to hold.
#[derive(Debug, Default)]
pub struct ConfigIndex {
    suffixes: BTreeMap<String, BTreeSet<String>>,
    directories: BTreeMap<PathBuf, DirectoryConfig>,
}

/// The (database, suffix) pairs configured for a single directory.
///
/// Database names and suffixes are also kept ordered longest first so the
/// grouper can try the most specific candidate before a shorter one that
/// happens to be its prefix.
#[derive(Debug, Default, Clone)]
pub struct DirectoryConfig {
    pairs: BTreeMap<String, BTreeSet<String>>,
    databases: Vec<String>,
    suffixes: Vec<String>,
}

impl ConfigIndex {
    pub fn new(entries: &[ConfigEntry]) -> Self {
        let mut suffixes: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut pairs: BTreeMap<PathBuf, BTreeMap<String, BTreeSet<String>>> = BTreeMap::new();

        for entry in entries {
            suffixes
                .entry(entry.database.clone())
                .or_default()
                .insert(entry.suffix.clone());
            pairs
                .entry(entry.directory.clone())
                .or_default()
                .entry(entry.database.clone())
                .or_default()
                .insert(entry.suffix.clone());
        }

        let directories = pairs
            .into_iter()
            .map(|(dir, pairs)| (dir, DirectoryConfig::from_pairs(pairs)))
            .collect();

        Self {
            suffixes,
            directories,
        }
    }

    /// Every suffix configured for `database`, across all directories.
    pub fn suffixes_for(&self, database: &str) -> Option<&BTreeSet<String>> {
        self.suffixes.get(database)
    }

    /// Distinct directories named by the backup list, in sorted order.
    pub fn directories(&self) -> impl Iterator<Item = &Path> {
        self.directories.keys().map(PathBuf::as_path)
    }

    pub fn directory_count(&self) -> usize {
        self.directories.len()
    }

    pub fn directory(&self, dir: &Path) -> Option<&DirectoryConfig> {
        self.directories.get(dir)
    }
}

impl DirectoryConfig {
    fn from_pairs(pairs: BTreeMap<String, BTreeSet<String>>) -> Self {
        let mut databases: Vec<String> = pairs.keys().cloned().collect();
        databases.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        let mut suffixes: Vec<String> = pairs
            .values()
            .flatten()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        suffixes.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        Self {
            pairs,
            databases,
            suffixes,
        }
    }

    pub fn knows(&self, database: &str, suffix: &str) -> bool {
        self.pairs
            .get(database)
            .is_some_and(|suffixes| suffixes.contains(suffix))
    }

    pub fn databases_longest_first(&self) -> &[String] {
        &self.databases
    }

    pub fn suffixes_longest_first(&self) -> &[String] {
        &self.suffixes
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
