use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, trace};

use super::grouper::{self, Grouping};
use crate::index::{ConfigIndex, DirectoryConfig};
use crate::scanner::Catalog;

/// Names in one directory that must survive this run.
///
/// Invariant: `names` is sorted descending and holds no duplicates, which is
/// what [`KeepList::contains`] binary-searches on. The only way to build one
/// is [`KeepList::new`], which establishes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeepList {
    names: Vec<String>,
}

impl KeepList {
    pub fn new(names: impl IntoIterator<Item = String>) -> Self {
        let mut names: Vec<String> = names.into_iter().collect();
        names.sort_unstable_by(|a, b| b.cmp(a));
        names.dedup();
        Self { names }
    }

    /// Finds the first kept name that is `<= name` and checks it for equality.
    pub fn contains(&self, name: &str) -> bool {
        let pos = self.names.partition_point(|kept| kept.as_str() > name);
        self.names.get(pos).is_some_and(|kept| kept == name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Keep the `keep_last_n` newest members of every group plus every
/// unclassified entry. Names embed a fixed-width timestamp, so the greatest
/// names are the newest generations.
///
/// A keep count of zero is treated as one: the newest generation of a series
/// is never given up.
pub fn select_keep_list(grouping: &Grouping<'_>, keep_last_n: usize) -> KeepList {
    let keep = keep_last_n.max(1);
    let mut names = Vec::new();

    for (key, members) in &grouping.groups {
        let mut generations: Vec<&str> = members.iter().map(|e| e.name.as_str()).collect();
        generations.sort_unstable_by(|a, b| b.cmp(a));
        trace!(
            "{}*{}: {} generations, keeping {}",
            key.database,
            key.suffix,
            generations.len(),
            generations.len().min(keep)
        );
        names.extend(generations.into_iter().take(keep).map(str::to_owned));
    }

    names.extend(grouping.unclassified.iter().map(|e| e.name.clone()));

    KeepList::new(names)
}

/// Build the keep list of every listed directory. A directory without any
/// configured pair keeps everything it holds.
pub fn build_keep_lists(
    catalog: &Catalog,
    index: &ConfigIndex,
    keep_last_n: usize,
) -> BTreeMap<PathBuf, KeepList> {
    let unconfigured = DirectoryConfig::default();
    let mut keep_lists = BTreeMap::new();

    for (dir, entries) in catalog.iter() {
        let config = index.directory(dir).unwrap_or(&unconfigured);
        let grouping = grouper::group_directory(entries, config);
        let keep_list = select_keep_list(&grouping, keep_last_n);
        debug!(
            "{}: {} groups, {} unclassified, {} kept",
            dir.display(),
            grouping.groups.len(),
            grouping.unclassified.len(),
            keep_list.len()
        );
        keep_lists.insert(dir.to_path_buf(), keep_list);
    }

    keep_lists
}
