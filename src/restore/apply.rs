use std::collections::{BTreeMap, HashSet};

use log::{debug, error, info, warn};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseTransaction, IntoActiveModel, Statement, TransactionTrait,
};
use serde::Serialize;

use super::plan::{RestoreOperation, RestorePlan};
use crate::error::{BackupError, Result};
use crate::kind::{EntityKind, SnapshotType};
use crate::repositories::RecordRepository;
use crate::snapshot::record::{with_entity, SnapshotEntity};
use crate::snapshot::Snapshot;

/// Outcome of a committed restore.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreResult {
    pub snapshot_type: SnapshotType,
    /// Records written per kind.
    pub counts: BTreeMap<EntityKind, usize>,
}

impl RestoreResult {
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

/// Apply `snapshot` to the store following `plan`, all or nothing.
///
/// Every write goes through one transaction. Foreign keys are checked once all
/// kinds are written; any failure rolls the transaction back before the error
/// is returned. Dropping the returned future mid-way drops the transaction,
/// which also rolls back.
pub async fn apply_restore<C>(conn: &C, plan: &RestorePlan, snapshot: &Snapshot) -> Result<RestoreResult>
where
    C: TransactionTrait,
{
    check_plan_matches(plan, snapshot)?;
    check_duplicate_ids(plan, snapshot)?;

    let txn = conn.begin().await?;
    info!(
        "♻️  Applying {} restore ({} kinds)",
        plan.snapshot_type(),
        plan.steps().len()
    );

    match write_snapshot(&txn, plan, snapshot).await {
        Ok(counts) => {
            txn.commit().await?;
            let result = RestoreResult {
                snapshot_type: plan.snapshot_type(),
                counts,
            };
            info!("✅ Restore committed: {} records", result.total());
            Ok(result)
        }
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                warn!("⚠️  Rollback reported an error: {rollback_err}");
            }
            error!("❌ Restore rolled back: {err}");
            Err(err)
        }
    }
}

fn check_plan_matches(plan: &RestorePlan, snapshot: &Snapshot) -> Result<()> {
    if plan.snapshot_type() != snapshot.snapshot_type() {
        return Err(BackupError::MalformedSnapshot(format!(
            "plan was built for a {} snapshot, got {}",
            plan.snapshot_type(),
            snapshot.snapshot_type()
        )));
    }
    for kind in plan.kinds() {
        if !snapshot.entities.contains(kind) {
            return Err(BackupError::RestoreFailed {
                kind,
                index: None,
                reason: "kind is planned but missing from the snapshot".to_string(),
            });
        }
    }
    Ok(())
}

/// A primary key may appear only once per kind; the second occurrence is
/// reported.
fn check_duplicate_ids(plan: &RestorePlan, snapshot: &Snapshot) -> Result<()> {
    for kind in plan.kinds() {
        let mut seen = HashSet::new();
        for (index, id) in snapshot.entities.record_ids(kind).into_iter().enumerate() {
            if !seen.insert(id) {
                return Err(BackupError::RestoreFailed {
                    kind,
                    index: Some(index),
                    reason: format!("duplicate primary key '{id}'"),
                });
            }
        }
    }
    Ok(())
}

async fn write_snapshot(
    txn: &DatabaseTransaction,
    plan: &RestorePlan,
    snapshot: &Snapshot,
) -> Result<BTreeMap<EntityKind, usize>> {
    // Rows are cleared and re-inserted with the same keys, so references are
    // only meaningful once everything is written. Reset by SQLite at commit.
    txn.execute_unprepared("PRAGMA defer_foreign_keys = ON").await?;

    for step in plan.steps().iter().rev() {
        if step.operation != RestoreOperation::Replace {
            continue;
        }
        let removed = with_entity!(step.kind, E => RecordRepository::delete_all::<E, _>(txn).await).map_err(|e| {
            BackupError::RestoreFailed {
                kind: step.kind,
                index: None,
                reason: format!("clearing existing rows: {e}"),
            }
        })?;
        debug!("Cleared {removed} {} rows", step.kind);
    }

    let mut counts = BTreeMap::new();
    for step in plan.steps() {
        let written = with_entity!(step.kind, E => write_kind::<E>(txn, step.operation, snapshot).await?);
        debug!("Wrote {written} {} records ({:?})", step.kind, step.operation);
        counts.insert(step.kind, written);
    }

    check_foreign_keys(txn, plan, snapshot).await?;
    Ok(counts)
}

async fn write_kind<E>(txn: &DatabaseTransaction, operation: RestoreOperation, snapshot: &Snapshot) -> Result<usize>
where
    E: SnapshotEntity,
    E::Model: IntoActiveModel<E::ActiveModel>,
    E::ActiveModel: ActiveModelTrait<Entity = E> + Send,
{
    let records = E::records(&snapshot.entities).map(Vec::as_slice).unwrap_or_default();
    for (index, record) in records.iter().enumerate() {
        let written = match operation {
            RestoreOperation::Replace => RecordRepository::insert::<E, _>(txn, record.clone()).await,
            RestoreOperation::Upsert => RecordRepository::upsert::<E, _>(txn, record.clone()).await,
        };
        written.map_err(|e| BackupError::RestoreFailed {
            kind: E::KIND,
            index: Some(index),
            reason: e.to_string(),
        })?;
    }
    Ok(records.len())
}

struct Violation {
    kind: EntityKind,
    index: Option<usize>,
    parent: String,
}

/// Report the first dangling reference left in the database, earliest kind in
/// plan order first.
async fn check_foreign_keys(txn: &DatabaseTransaction, plan: &RestorePlan, snapshot: &Snapshot) -> Result<()> {
    let backend = txn.get_database_backend();
    let rows = txn
        .query_all(Statement::from_string(backend, "PRAGMA foreign_key_check"))
        .await?;
    if rows.is_empty() {
        return Ok(());
    }

    let mut violations = Vec::with_capacity(rows.len());
    for row in rows {
        let table: String = row.try_get("", "table")?;
        let parent: String = row.try_get("", "parent")?;
        let rowid: Option<i64> = row.try_get("", "rowid")?;
        let Some(kind) = EntityKind::from_table_name(&table) else {
            warn!("⚠️  Foreign key violation in unmanaged table {table}");
            continue;
        };
        let index = match rowid {
            Some(rowid) if plan.position(kind).is_some() => locate_record(txn, kind, rowid, snapshot).await?,
            _ => None,
        };
        violations.push(Violation { kind, index, parent });
    }

    violations.sort_by_key(|v| (plan.position(v.kind).unwrap_or(usize::MAX), v.kind, v.index));
    match violations.into_iter().next() {
        Some(Violation {
            kind,
            index: Some(index),
            parent,
        }) => Err(BackupError::RestoreFailed {
            kind,
            index: Some(index),
            reason: format!("references a missing {parent} row"),
        }),
        Some(Violation { kind, index: None, parent }) => Err(BackupError::RestoreFailed {
            kind,
            index: None,
            reason: format!("an existing {kind} row references a {parent} row the snapshot does not contain"),
        }),
        None => Ok(()),
    }
}

/// Position in the snapshot of the row stored at `rowid`.
async fn locate_record(
    txn: &DatabaseTransaction,
    kind: EntityKind,
    rowid: i64,
    snapshot: &Snapshot,
) -> Result<Option<usize>> {
    let statement = Statement::from_sql_and_values(
        txn.get_database_backend(),
        format!("SELECT id FROM \"{}\" WHERE rowid = ?", kind.table_name()),
        [rowid.into()],
    );
    let Some(row) = txn.query_one(statement).await? else {
        return Ok(None);
    };
    let id: String = row.try_get("", "id")?;
    Ok(snapshot.entities.record_ids(kind).iter().position(|record_id| *record_id == id))
}
