use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::debug;

use super::retention::KeepList;
use crate::scanner::{Catalog, CatalogEntry};

/// Operator switches for a run, fixed before planning starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeletionPolicy {
    /// Also delete files that still wait for the external archiver.
    pub delete_archived: bool,
    /// Log the plan without removing anything.
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PlannedDeletion {
    pub directory: PathBuf,
    pub name: String,
}

impl PlannedDeletion {
    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.name)
    }
}

/// Files may only go once archived, unless the operator overrides that.
/// Sub-directories are never touched.
pub fn is_eligible(entry: &CatalogEntry, delete_archived: bool) -> bool {
    !entry.is_dir && (!entry.needs_archiving || delete_archived)
}

/// Every eligible file that is not on its directory's keep list, grouped by
/// directory and ordered by name. Planning has no side effects.
///
/// A listed directory without a keep list is left alone entirely.
pub fn plan_deletions(
    catalog: &Catalog,
    keep_lists: &BTreeMap<PathBuf, KeepList>,
    policy: &DeletionPolicy,
) -> Vec<PlannedDeletion> {
    let mut plan = Vec::new();

    for (dir, entries) in catalog.iter() {
        let Some(keep_list) = keep_lists.get(dir) else {
            debug!("{}: no keep list, nothing planned", dir.display());
            continue;
        };

        let start = plan.len();
        plan.extend(
            entries
                .iter()
                .filter(|entry| is_eligible(entry, policy.delete_archived))
                .filter(|entry| !keep_list.contains(&entry.name))
                .map(|entry| PlannedDeletion {
                    directory: dir.to_path_buf(),
                    name: entry.name.clone(),
                }),
        );
        plan[start..].sort();

        debug!(
            "{}: {} entries, {} planned for deletion",
            dir.display(),
            entries.len(),
            plan.len() - start
        );
    }

    plan
}
