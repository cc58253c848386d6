//! Restore orchestrator.
//!
//! [`plan_restore`] orders the kinds of a decoded snapshot by foreign key
//! dependency; [`apply_restore`] writes them inside a single transaction.
//!
//! `full` and `tables` snapshots replace the covered tables, `sections`
//! snapshots merge by primary key and never delete rows they do not mention.

pub mod apply;
pub mod plan;

pub use apply::{apply_restore, RestoreResult};
pub use plan::{plan_restore, RestoreOperation, RestorePlan, RestoreStep};
