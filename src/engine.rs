use crate::analysis::deleter::{self, ItemOutcome};
use crate::analysis::{build_keep_lists, plan_deletions, DeletionPolicy, KeepList, PlannedDeletion};
use crate::config::{ConfigEntry, DEFAULT_KEEP_LAST_N};
use crate::index::ConfigIndex;
use crate::scanner::{self, Catalog};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub struct RetentionEngine {
    index: ConfigIndex,
    keep_last_n: usize,
    policy: DeletionPolicy,
}

/// Everything decided before the first removal.
#[derive(Debug)]
pub struct RetentionPlan {
    pub catalog: Catalog,
    pub keep_lists: BTreeMap<PathBuf, KeepList>,
    pub deletions: Vec<PlannedDeletion>,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub directories_configured: usize,
    pub directories_listed: usize,
    pub directories_skipped: usize,
    pub entries_catalogued: usize,
    pub entries_kept: usize,
    pub planned: usize,
    pub removed: usize,
    pub failed: usize,
    pub dry_run: bool,
    pub scan_duration: Duration,
    pub plan_duration: Duration,
    pub delete_duration: Duration,
    pub outcomes: Vec<ItemOutcome>,
}

impl RetentionEngine {
    pub fn new(entries: &[ConfigEntry]) -> Self {
        Self {
            index: ConfigIndex::new(entries),
            keep_last_n: DEFAULT_KEEP_LAST_N as usize,
            policy: DeletionPolicy::default(),
        }
    }

    pub fn with_keep_last_n(mut self, keep_last_n: usize) -> Self {
        self.keep_last_n = keep_last_n;
        self
    }

    pub fn with_policy(mut self, policy: DeletionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// List the configured directories and decide what goes, touching nothing.
    pub fn plan(&self) -> RetentionPlan {
        let catalog = scanner::read_directories(self.index.directories());
        let keep_lists = build_keep_lists(&catalog, &self.index, self.keep_last_n);
        let deletions = plan_deletions(&catalog, &keep_lists, &self.policy);
        RetentionPlan {
            catalog,
            keep_lists,
            deletions,
        }
    }

    /// Run the whole pass:
    /// 1. List every configured directory
    /// 2. Build keep lists and the deletion plan
    /// 3. Remove (or, in a dry run, only log) each planned file
    pub fn run(&self) -> RunSummary {
        info!(
            "Keeping last {} generations in {} directories{}",
            self.keep_last_n.max(1),
            self.index.directory_count(),
            if self.policy.dry_run { " (DRY RUN)" } else { "" }
        );

        // Phase 1: Catalog
        let scan_start = Instant::now();
        let catalog = scanner::read_directories(self.index.directories());
        let scan_duration = scan_start.elapsed();
        debug!(
            "Catalog completed in {:.2}s — {} directories, {} entries",
            scan_duration.as_secs_f64(),
            catalog.directory_count(),
            catalog.entry_count(),
        );

        // Phase 2: Keep lists and plan
        let plan_start = Instant::now();
        let keep_lists = build_keep_lists(&catalog, &self.index, self.keep_last_n);
        let deletions = plan_deletions(&catalog, &keep_lists, &self.policy);
        let plan_duration = plan_start.elapsed();
        debug!(
            "Plan completed in {:.2}s — {} files planned",
            plan_duration.as_secs_f64(),
            deletions.len(),
        );

        // Phase 3: Delete
        let delete_start = Instant::now();
        let outcomes = deleter::execute_deletion_plan(&deletions, self.policy.dry_run);
        let delete_duration = delete_start.elapsed();
        let (removed, failed) = deleter::tally(&outcomes);

        RunSummary {
            directories_configured: self.index.directory_count(),
            directories_listed: catalog.directory_count(),
            directories_skipped: catalog.skipped().len(),
            entries_catalogued: catalog.entry_count(),
            entries_kept: keep_lists.values().map(KeepList::len).sum(),
            planned: deletions.len(),
            removed,
            failed,
            dry_run: self.policy.dry_run,
            scan_duration,
            plan_duration,
            delete_duration,
            outcomes,
        }
    }
}
