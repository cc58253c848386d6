//! Snapshot codec.
//!
//! A snapshot is a self-describing JSON document holding a point-in-time copy of
//! selected entity kinds:
//!
//! ```json
//! {
//!   "metadata": { "formatVersion": 1, "snapshotType": "sections", "createdAt": "2026-10-18T09:12:44.123Z" },
//!   "entities": { "sections": [ ... ], "categories": [ ... ], "articles": [ ... ] }
//! }
//! ```
//!
//! [`decode`] validates the whole document against the closed record types
//! before anything is handed to the restore orchestrator.

pub mod record;

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use log::debug;
use sea_orm::ConnectionTrait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entities::{activity_log, article, category, message, news, report, section, setting, user};
use crate::error::{BackupError, Result};
use crate::kind::{EntityKind, SnapshotType};
use crate::repositories::RecordRepository;
use record::{with_entity, SnapshotEntity};

/// Newest snapshot format this build reads and the one it writes.
pub const CURRENT_FORMAT_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMetadata {
    pub format_version: u32,
    pub snapshot_type: SnapshotType,
    pub created_at: DateTime<Utc>,
}

/// Records of every kind, `None` when the kind is not part of the snapshot.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEntities {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<user::Model>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<section::Model>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<category::Model>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub articles: Option<Vec<article::Model>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub news: Option<Vec<news::Model>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reports: Option<Vec<report::Model>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Vec<setting::Model>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<message::Model>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_logs: Option<Vec<activity_log::Model>>,
}

impl SnapshotEntities {
    /// Number of records of `kind`, `None` when the kind is absent.
    pub fn len_of(&self, kind: EntityKind) -> Option<usize> {
        with_entity!(kind, E => E::records(self).map(Vec::len))
    }

    pub fn contains(&self, kind: EntityKind) -> bool {
        self.len_of(kind).is_some()
    }

    /// Kinds present, in canonical order.
    pub fn kinds(&self) -> Vec<EntityKind> {
        EntityKind::ALL.into_iter().filter(|kind| self.contains(*kind)).collect()
    }

    /// Primary keys of the records of `kind`, in snapshot order.
    pub fn record_ids(&self, kind: EntityKind) -> Vec<&str> {
        with_entity!(kind, E => E::records(self)
            .map(|records| records.iter().map(E::record_id).collect())
            .unwrap_or_default())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub metadata: SnapshotMetadata,
    pub entities: SnapshotEntities,
}

impl Snapshot {
    pub fn snapshot_type(&self) -> SnapshotType {
        self.metadata.snapshot_type
    }

    /// Record count per present kind.
    pub fn record_counts(&self) -> BTreeMap<EntityKind, usize> {
        EntityKind::ALL
            .into_iter()
            .filter_map(|kind| self.entities.len_of(kind).map(|len| (kind, len)))
            .collect()
    }

    /// Serialize to the on-disk JSON form.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }
}

/// Read every kind covered by `snapshot_type` from the store.
///
/// Pass an open transaction to get a consistent point-in-time copy.
pub async fn encode<C>(conn: &C, snapshot_type: SnapshotType) -> Result<Snapshot>
where
    C: ConnectionTrait,
{
    let mut entities = SnapshotEntities::default();
    for kind in snapshot_type.kinds() {
        with_entity!(*kind, E => encode_kind::<E, _>(conn, &mut entities).await?);
    }

    let snapshot = Snapshot {
        metadata: SnapshotMetadata {
            format_version: CURRENT_FORMAT_VERSION,
            snapshot_type,
            created_at: Utc::now().trunc_subsecs(3),
        },
        entities,
    };
    debug!("Encoded {} snapshot: {:?}", snapshot_type, snapshot.record_counts());
    Ok(snapshot)
}

async fn encode_kind<E, C>(conn: &C, entities: &mut SnapshotEntities) -> Result<()>
where
    E: SnapshotEntity,
    C: ConnectionTrait,
{
    let records = RecordRepository::get_all::<E, _>(conn)
        .await
        .map_err(|source| BackupError::Encoding {
            kind: Some(E::KIND),
            source,
        })?;
    *E::records_mut(entities) = Some(records);
    Ok(())
}

/// Parse and validate a snapshot document without touching the store.
///
/// The format version is checked before any other field is interpreted, so a
/// newer document is rejected as a whole.
pub fn decode(raw: &[u8]) -> Result<Snapshot> {
    let document: Value =
        serde_json::from_slice(raw).map_err(|e| malformed(format!("not valid JSON: {e}")))?;
    let Value::Object(mut document) = document else {
        return Err(malformed("top level must be a JSON object"));
    };

    let metadata = document.remove("metadata").ok_or_else(|| malformed("missing metadata"))?;
    let version = metadata
        .get("formatVersion")
        .and_then(Value::as_u64)
        .ok_or_else(|| malformed("metadata.formatVersion must be a non-negative integer"))?;
    if version > u64::from(CURRENT_FORMAT_VERSION) {
        return Err(BackupError::UnsupportedVersion {
            found: version,
            supported: CURRENT_FORMAT_VERSION,
        });
    }
    if version == 0 {
        return Err(malformed("metadata.formatVersion must be at least 1"));
    }
    let metadata: SnapshotMetadata =
        serde_json::from_value(metadata).map_err(|e| malformed(format!("metadata: {e}")))?;

    let Some(Value::Object(raw_entities)) = document.remove("entities") else {
        return Err(malformed("entities must be a JSON object"));
    };

    // Check every key before decoding any record so an unknown kind is
    // reported as such rather than as a record error elsewhere.
    let mut sections = Vec::with_capacity(raw_entities.len());
    for (key, value) in raw_entities {
        let kind = EntityKind::from_str(&key).map_err(|_| BackupError::UnknownKind(key.clone()))?;
        if !metadata.snapshot_type.includes(kind) {
            return Err(malformed(format!(
                "{kind} is not part of a {} snapshot",
                metadata.snapshot_type
            )));
        }
        sections.push((kind, value));
    }

    let mut entities = SnapshotEntities::default();
    for (kind, value) in sections {
        with_entity!(kind, E => decode_kind::<E>(value, &mut entities)?);
    }

    Ok(Snapshot { metadata, entities })
}

fn decode_kind<E>(value: Value, entities: &mut SnapshotEntities) -> Result<()>
where
    E: SnapshotEntity,
    E::Model: DeserializeOwned,
{
    let Value::Array(items) = value else {
        return Err(malformed(format!("entities.{} must be an array", E::KIND)));
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let record = serde_json::from_value(item).map_err(|e| malformed(format!("{}[{index}]: {e}", E::KIND)))?;
        records.push(record);
    }
    *E::records_mut(entities) = Some(records);
    Ok(())
}

fn malformed(reason: impl Into<String>) -> BackupError {
    BackupError::MalformedSnapshot(reason.into())
}
