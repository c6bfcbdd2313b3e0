pub mod deleter;
pub mod deletion_plan;
pub mod grouper;
pub mod retention;

pub use deleter::{execute_deletion_plan, ItemOutcome, Outcome};
pub use deletion_plan::{plan_deletions, DeletionPolicy, PlannedDeletion};
pub use grouper::{classify, Classification, GroupKey};
pub use retention::{build_keep_lists, KeepList};
