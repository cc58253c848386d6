//! Error types shared by the snapshot codec, the restore orchestrator and
//! the backup manager.

use std::path::PathBuf;

use crate::kind::EntityKind;

pub type Result<T> = std::result::Result<T, BackupError>;

#[derive(Debug, thiserror::Error)]
pub enum BackupError {
    #[error("Failed to read {} for snapshot: {source}", encoding_target(.kind))]
    Encoding {
        /// `None` when the store could not be opened for reading at all.
        kind: Option<EntityKind>,
        #[source]
        source: sea_orm::DbErr,
    },

    #[error("Failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Malformed snapshot: {0}")]
    MalformedSnapshot(String),

    #[error("Unsupported snapshot format version {found} (this build reads up to {supported})")]
    UnsupportedVersion { found: u64, supported: u32 },

    #[error("Unknown entity kind in snapshot: {0}")]
    UnknownKind(String),

    #[error("Dependency table is cyclic at: {}", join_kinds(.0))]
    CyclicDependency(Vec<EntityKind>),

    #[error("Restore failed at {kind}{}: {reason}", record_suffix(.index))]
    RestoreFailed {
        kind: EntityKind,
        /// Position of the offending record in the snapshot, when it came from the snapshot.
        index: Option<usize>,
        reason: String,
    },

    #[error("Failed to write backup {}: {source}", .path.display())]
    StorageWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read backup {}: {source}", .path.display())]
    StorageRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Backup not found: {0}")]
    NotFound(String),

    #[error("Invalid backup file name: {0}")]
    InvalidName(String),

    #[error("Import payload is {size} bytes, limit is {limit}")]
    ImportTooLarge { size: usize, limit: usize },

    #[error("Another restore is already in progress")]
    RestoreInProgress,

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl BackupError {
    /// The failing kind and record index of a rejected restore, for display
    /// next to the uploaded file.
    pub fn restore_location(&self) -> Option<(EntityKind, Option<usize>)> {
        match self {
            BackupError::RestoreFailed { kind, index, .. } => Some((*kind, *index)),
            _ => None,
        }
    }
}

fn encoding_target(kind: &Option<EntityKind>) -> &'static str {
    match kind {
        Some(kind) => kind.as_str(),
        None => "the store",
    }
}

fn record_suffix(index: &Option<usize>) -> String {
    match index {
        Some(i) => format!(" record #{i}"),
        None => String::new(),
    }
}

fn join_kinds(kinds: &[EntityKind]) -> String {
    kinds.iter().map(|k| k.as_str()).collect::<Vec<_>>().join(" -> ")
}
