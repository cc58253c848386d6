//! Backup manager: snapshot files on persistent storage.
//!
//! Files are written to a hidden temporary name in the backup directory and
//! linked into place once complete, so a listing never sees a half-written
//! backup and two writers never share a name.

pub mod filename;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use log::{debug, info, warn};
use sea_orm::TransactionTrait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::{BackupError, Result};
use crate::kind::SnapshotType;
use crate::snapshot::{self, Snapshot};
pub use filename::{backup_filename, parse_backup_filename, validate_backup_filename};

/// Metadata of one backup file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupFile {
    pub filename: String,
    pub snapshot_type: SnapshotType,
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
    /// Known once the file has been written or read; listings do not open files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_version: Option<u32>,
}

/// Creates, lists, reads and deletes backups in one directory.
#[derive(Clone, Debug)]
pub struct BackupManager {
    backup_dir: PathBuf,
}

impl BackupManager {
    pub fn new(backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            backup_dir: backup_dir.into(),
        }
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Resolve a validated backup file name inside the backup directory.
    pub fn backup_path(&self, filename: &str) -> Result<PathBuf> {
        validate_backup_filename(filename)?;
        Ok(self.backup_dir.join(filename))
    }

    /// Snapshot the store and persist it as a new backup file.
    ///
    /// Reads happen inside one transaction so every kind comes from the same
    /// point in time.
    pub async fn create_backup<C>(&self, conn: &C, snapshot_type: SnapshotType) -> Result<BackupFile>
    where
        C: TransactionTrait,
    {
        info!("📦 Creating {snapshot_type} backup");
        let txn = conn.begin().await.map_err(store_unreadable)?;
        let snapshot = snapshot::encode(&txn, snapshot_type).await?;
        txn.commit().await.map_err(store_unreadable)?;
        self.write_snapshot(&snapshot).await
    }

    /// Persist an already encoded snapshot under a fresh file name.
    pub async fn write_snapshot(&self, snapshot: &Snapshot) -> Result<BackupFile> {
        let bytes = snapshot.to_json()?;

        fs::create_dir_all(&self.backup_dir)
            .await
            .map_err(|source| BackupError::StorageWrite {
                path: self.backup_dir.clone(),
                source,
            })?;

        let temp_path = self.backup_dir.join(format!(".{}.tmp", Uuid::new_v4()));
        if let Err(source) = write_synced(&temp_path, &bytes).await {
            discard(&temp_path).await;
            return Err(BackupError::StorageWrite { path: temp_path, source });
        }

        let snapshot_type = snapshot.snapshot_type();
        let claimed = self.claim_name(&temp_path, snapshot_type, snapshot.metadata.created_at).await;
        discard(&temp_path).await;
        let (filename, created_at) = claimed?;

        let backup = BackupFile {
            filename,
            snapshot_type,
            size_bytes: bytes.len() as u64,
            created_at,
            format_version: Some(snapshot.metadata.format_version),
        };
        info!("✅ Backup written: {} ({} bytes)", backup.filename, backup.size_bytes);
        Ok(backup)
    }

    /// Link the written temp file under the first free name at or after
    /// `created_at`, one millisecond apart.
    ///
    /// `hard_link` fails when the target exists, so concurrent writers can
    /// never claim the same name. The temp file is left for the caller.
    async fn claim_name(
        &self,
        temp_path: &Path,
        snapshot_type: SnapshotType,
        created_at: DateTime<Utc>,
    ) -> Result<(String, DateTime<Utc>)> {
        let mut stamp = created_at;
        loop {
            let filename = backup_filename(snapshot_type, stamp);
            let path = self.backup_dir.join(&filename);
            match fs::hard_link(temp_path, &path).await {
                Ok(()) => return Ok((filename, stamp)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    debug!("{filename} is taken, trying the next millisecond");
                    stamp += Duration::milliseconds(1);
                }
                Err(source) => return Err(BackupError::StorageWrite { path, source }),
            }
        }
    }

    /// Every conforming backup in the directory, newest first.
    ///
    /// Metadata comes from the file name and the filesystem only. A missing
    /// directory lists as empty. Each call re-reads the directory.
    pub async fn list_backups(&self) -> Result<Vec<BackupFile>> {
        let mut entries = match fs::read_dir(&self.backup_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(self.read_error(source)),
        };

        let mut backups = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|source| self.read_error(source))? {
            let Some(filename) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            let Some((snapshot_type, created_at)) = parse_backup_filename(&filename) else {
                continue;
            };
            let metadata = match entry.metadata().await {
                Ok(metadata) => metadata,
                // Deleted between read_dir and stat.
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(source) => {
                    return Err(BackupError::StorageRead {
                        path: entry.path(),
                        source,
                    })
                }
            };
            if !metadata.is_file() {
                continue;
            }

            backups.push(BackupFile {
                filename,
                snapshot_type,
                size_bytes: metadata.len(),
                created_at,
                format_version: None,
            });
        }

        backups.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.filename.cmp(&a.filename))
        });
        debug!("Listed {} backups in {}", backups.len(), self.backup_dir.display());
        Ok(backups)
    }

    /// Remove one backup file.
    pub async fn delete_backup(&self, filename: &str) -> Result<()> {
        let path = self.backup_path(filename)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                info!("🗑️  Deleted backup {filename}");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(BackupError::NotFound(filename.to_string())),
            Err(source) => Err(BackupError::StorageWrite { path, source }),
        }
    }

    /// Read and decode one backup file.
    pub async fn read_backup(&self, filename: &str) -> Result<Snapshot> {
        let path = self.backup_path(filename)?;
        let raw = match fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(BackupError::NotFound(filename.to_string())),
            Err(source) => return Err(BackupError::StorageRead { path, source }),
        };
        snapshot::decode(&raw)
    }

    fn read_error(&self, source: std::io::Error) -> BackupError {
        BackupError::StorageRead {
            path: self.backup_dir.clone(),
            source,
        }
    }
}

fn store_unreadable(source: sea_orm::DbErr) -> BackupError {
    BackupError::Encoding { kind: None, source }
}

async fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await?;
    Ok(())
}

async fn discard(path: &Path) {
    if let Err(e) = fs::remove_file(path).await {
        if e.kind() != ErrorKind::NotFound {
            warn!("⚠️  Could not remove temporary file {}: {e}", path.display());
        }
    }
}
