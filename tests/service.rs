mod common;

use cms_backup::snapshot::encode;
use cms_backup::{BackupError, BackupManager, BackupService, EntityKind, SnapshotType, Store};
use tempfile::tempdir;

const LIMIT: usize = 1024 * 1024;

async fn service(dir: &std::path::Path) -> BackupService {
    let store = Store::in_memory().await.unwrap();
    BackupService::new(store, BackupManager::new(dir), LIMIT)
}

#[tokio::test]
async fn test_import_then_backup_round_trip() {
    let dir = tempdir().unwrap();
    let service = service(dir.path()).await;
    let original = common::full_snapshot();

    let result = service.import_bytes(&original.to_json().unwrap()).await.unwrap();
    assert_eq!(result.counts[&EntityKind::Users], 2);

    let backup = service.create_backup(SnapshotType::Full).await.unwrap();
    let restored = service.read_backup(&backup.filename).await.unwrap();
    assert_eq!(restored.entities, original.entities);
}

#[tokio::test]
async fn test_restore_backup_from_directory() {
    let dir = tempdir().unwrap();
    let service = service(dir.path()).await;
    service.import_bytes(&common::full_snapshot().to_json().unwrap()).await.unwrap();
    let backup = service.create_backup(SnapshotType::Full).await.unwrap();
    let before = encode(service.store().conn(), SnapshotType::Full).await.unwrap();

    let result = service.restore_backup(&backup.filename).await.unwrap();
    assert_eq!(result.snapshot_type, SnapshotType::Full);

    let after = encode(service.store().conn(), SnapshotType::Full).await.unwrap();
    assert_eq!(before.entities, after.entities);
}

#[tokio::test]
async fn test_oversized_import_is_rejected_before_decoding() {
    let dir = tempdir().unwrap();
    let store = Store::in_memory().await.unwrap();
    let service = BackupService::new(store, BackupManager::new(dir.path()), 16);

    match service.import_bytes(&[b' '; 17]).await.unwrap_err() {
        BackupError::ImportTooLarge { size, limit } => {
            assert_eq!(size, 17);
            assert_eq!(limit, 16);
        }
        other => panic!("expected import too large, got {other:?}"),
    }
}

#[tokio::test]
async fn test_second_restore_is_refused_while_one_runs() {
    let dir = tempdir().unwrap();
    let service = service(dir.path()).await;
    let raw = common::full_snapshot().to_json().unwrap();

    let guard = service.try_restore_guard().unwrap();
    assert!(service.is_restoring());
    assert!(matches!(
        service.import_bytes(&raw).await,
        Err(BackupError::RestoreInProgress)
    ));
    assert!(matches!(
        service.restore_backup("backup-full-2026-03-10T12-00-00-000Z.json").await,
        Err(BackupError::RestoreInProgress)
    ));
    assert!(!service.store().has_data().await.unwrap());

    drop(guard);
    assert!(!service.is_restoring());
    service.import_bytes(&raw).await.unwrap();
    assert!(service.store().has_data().await.unwrap());
}

#[tokio::test]
async fn test_rejected_import_releases_guard_and_keeps_data() {
    let dir = tempdir().unwrap();
    let service = service(dir.path()).await;
    service.import_bytes(&common::full_snapshot().to_json().unwrap()).await.unwrap();

    let err = service.import_bytes(b"{\"metadata\": 42}").await.unwrap_err();
    assert!(matches!(err, BackupError::MalformedSnapshot(_)), "{err:?}");
    assert!(!service.is_restoring());

    let counts = service.store().counts().await.unwrap();
    assert_eq!(counts[&EntityKind::Articles], 3);
}

#[tokio::test]
async fn test_backups_can_be_listed_and_deleted_through_service() {
    let dir = tempdir().unwrap();
    let service = service(dir.path()).await;

    let backup = service.create_backup(SnapshotType::Tables).await.unwrap();
    assert_eq!(service.list_backups().await.unwrap().len(), 1);

    service.delete_backup(&backup.filename).await.unwrap();
    assert!(service.list_backups().await.unwrap().is_empty());
    assert!(matches!(
        service.delete_backup("../../etc/passwd").await,
        Err(BackupError::InvalidName(_))
    ));
}
