use std::fs;
use std::path::{self, PathBuf};
use tracing::{error, info};

use super::deletion_plan::PlannedDeletion;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Dry run: logged, left in place.
    Listed,
    Removed,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemOutcome {
    pub path: PathBuf,
    pub outcome: Outcome,
}

/// Log `rm <path>` for every planned file and, unless `dry_run`, remove it.
/// A failed removal is logged and the remaining files are still processed.
pub fn execute_deletion_plan(plan: &[PlannedDeletion], dry_run: bool) -> Vec<ItemOutcome> {
    let mut outcomes = Vec::with_capacity(plan.len());

    for item in plan {
        let joined = item.path();
        let path = path::absolute(&joined).unwrap_or(joined);
        info!("rm {}", path.display());

        let outcome = if dry_run {
            Outcome::Listed
        } else {
            match fs::remove_file(&path) {
                Ok(()) => Outcome::Removed,
                Err(e) => {
                    error!("Failed to remove '{}': {}", path.display(), e);
                    Outcome::Failed(e.to_string())
                }
            }
        };

        outcomes.push(ItemOutcome { path, outcome });
    }

    outcomes
}

/// (removed, failed) counts of an executed plan.
pub fn tally(outcomes: &[ItemOutcome]) -> (usize, usize) {
    outcomes.iter().fold((0, 0), |(removed, failed), item| match item.outcome {
        Outcome::Removed => (removed + 1, failed),
        Outcome::Failed(_) => (removed, failed + 1),
        Outcome::Listed => (removed, failed),
    })
}
