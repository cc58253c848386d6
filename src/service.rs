//! Backup service: the entry point route handlers and the CLI call into.
//!
//! Owns the store handle, the backup manager and the guard that lets only one
//! restore run at a time. Backups and listings run concurrently with each
//! other and with a restore.

use std::sync::Arc;

use log::{error, info};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::backup::{BackupFile, BackupManager};
use crate::config::StorageConfig;
use crate::error::{BackupError, Result};
use crate::kind::SnapshotType;
use crate::restore::{apply_restore, plan_restore, RestoreResult};
use crate::snapshot::{self, Snapshot};
use crate::storage::Store;

/// Held for the whole duration of a restore.
pub type RestoreGuard = OwnedMutexGuard<()>;

#[derive(Clone)]
pub struct BackupService {
    store: Store,
    manager: BackupManager,
    max_import_bytes: usize,
    restore_lock: Arc<Mutex<()>>,
}

impl BackupService {
    pub fn new(store: Store, manager: BackupManager, max_import_bytes: usize) -> Self {
        Self {
            store,
            manager,
            max_import_bytes,
            restore_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Connect to the configured database and backup directory.
    pub async fn from_config(config: &StorageConfig) -> Result<Self> {
        let store = Store::connect(&config.database_url, config.max_connections).await?;
        let manager = BackupManager::new(&config.backup_dir);
        Ok(Self::new(store, manager, config.max_import_bytes))
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn manager(&self) -> &BackupManager {
        &self.manager
    }

    pub fn max_import_bytes(&self) -> usize {
        self.max_import_bytes
    }

    /// Whether a restore is running right now.
    pub fn is_restoring(&self) -> bool {
        self.restore_lock.try_lock().is_err()
    }

    /// Claim the restore slot without waiting.
    ///
    /// Restores fail with [`BackupError::RestoreInProgress`] while the returned
    /// guard is alive.
    pub fn try_restore_guard(&self) -> Result<RestoreGuard> {
        self.restore_lock
            .clone()
            .try_lock_owned()
            .map_err(|_| BackupError::RestoreInProgress)
    }

    pub async fn create_backup(&self, snapshot_type: SnapshotType) -> Result<BackupFile> {
        self.manager.create_backup(self.store.conn(), snapshot_type).await
    }

    pub async fn list_backups(&self) -> Result<Vec<BackupFile>> {
        self.manager.list_backups().await
    }

    pub async fn delete_backup(&self, filename: &str) -> Result<()> {
        self.manager.delete_backup(filename).await
    }

    pub async fn read_backup(&self, filename: &str) -> Result<Snapshot> {
        self.manager.read_backup(filename).await
    }

    /// Restore from an uploaded snapshot document.
    pub async fn import_bytes(&self, raw: &[u8]) -> Result<RestoreResult> {
        if raw.len() > self.max_import_bytes {
            return Err(BackupError::ImportTooLarge {
                size: raw.len(),
                limit: self.max_import_bytes,
            });
        }
        let _guard = self.try_restore_guard()?;

        info!("📥 Decoding import ({} bytes)", raw.len());
        let snapshot = snapshot::decode(raw).inspect_err(|e| error!("❌ Import rejected: {e}"))?;
        self.restore(&snapshot).await
    }

    /// Restore from a file in the backup directory.
    pub async fn restore_backup(&self, filename: &str) -> Result<RestoreResult> {
        let _guard = self.try_restore_guard()?;

        info!("📖 Reading backup {filename}");
        let snapshot = self
            .manager
            .read_backup(filename)
            .await
            .inspect_err(|e| error!("❌ Restore rejected: {e}"))?;
        self.restore(&snapshot).await
    }

    async fn restore(&self, snapshot: &Snapshot) -> Result<RestoreResult> {
        info!(
            "🔎 Validating {} snapshot from {}",
            snapshot.snapshot_type(),
            snapshot.metadata.created_at
        );
        let plan = plan_restore(snapshot)?;
        apply_restore(self.store.conn(), &plan, snapshot).await
    }
}
