use std::collections::HashMap;

use serde::Serialize;

use crate::error::{BackupError, Result};
use crate::kind::{EntityKind, SnapshotType};
use crate::snapshot::Snapshot;

/// How a planned kind is written to the store.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RestoreOperation {
    /// Clear the table, then insert every snapshot record.
    Replace,
    /// Insert each record or overwrite the row with the same primary key.
    Upsert,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RestoreStep {
    pub kind: EntityKind,
    pub operation: RestoreOperation,
}

/// Dependency-ordered kinds of one snapshot. Computed per import and discarded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestorePlan {
    snapshot_type: SnapshotType,
    steps: Vec<RestoreStep>,
}

impl RestorePlan {
    pub fn snapshot_type(&self) -> SnapshotType {
        self.snapshot_type
    }

    pub fn steps(&self) -> &[RestoreStep] {
        &self.steps
    }

    pub fn kinds(&self) -> impl Iterator<Item = EntityKind> + '_ {
        self.steps.iter().map(|step| step.kind)
    }

    pub fn position(&self, kind: EntityKind) -> Option<usize> {
        self.steps.iter().position(|step| step.kind == kind)
    }
}

/// Order the kinds present in `snapshot` so that every kind comes after the
/// kinds it references.
pub fn plan_restore(snapshot: &Snapshot) -> Result<RestorePlan> {
    let operation = if snapshot.snapshot_type().replaces_existing() {
        RestoreOperation::Replace
    } else {
        RestoreOperation::Upsert
    };

    let steps = dependency_order(&snapshot.entities.kinds(), EntityKind::dependencies)?
        .into_iter()
        .map(|kind| RestoreStep { kind, operation })
        .collect();

    Ok(RestorePlan {
        snapshot_type: snapshot.snapshot_type(),
        steps,
    })
}

#[derive(Copy, Clone, PartialEq)]
enum Mark {
    Visiting,
    Done,
}

/// Depth-first topological order of `kinds`, stable with respect to the input
/// order. Dependencies outside `kinds` are ignored.
pub(crate) fn dependency_order<F>(kinds: &[EntityKind], dependencies: F) -> Result<Vec<EntityKind>>
where
    F: Fn(EntityKind) -> &'static [EntityKind],
{
    let mut marks = HashMap::new();
    let mut path = Vec::new();
    let mut order = Vec::with_capacity(kinds.len());
    for &kind in kinds {
        visit(kind, kinds, &dependencies, &mut marks, &mut path, &mut order)?;
    }
    Ok(order)
}

fn visit<F>(
    kind: EntityKind,
    kinds: &[EntityKind],
    dependencies: &F,
    marks: &mut HashMap<EntityKind, Mark>,
    path: &mut Vec<EntityKind>,
    order: &mut Vec<EntityKind>,
) -> Result<()>
where
    F: Fn(EntityKind) -> &'static [EntityKind],
{
    match marks.get(&kind) {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::Visiting) => {
            let start = path.iter().position(|k| *k == kind).unwrap_or(0);
            let mut cycle = path[start..].to_vec();
            cycle.push(kind);
            return Err(BackupError::CyclicDependency(cycle));
        }
        None => {}
    }

    marks.insert(kind, Mark::Visiting);
    path.push(kind);
    for dependency in dependencies(kind) {
        if kinds.contains(dependency) {
            visit(*dependency, kinds, dependencies, marks, path, order)?;
        }
    }
    path.pop();
    marks.insert(kind, Mark::Done);
    order.push(kind);
    Ok(())
}
