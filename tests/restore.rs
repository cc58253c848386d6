mod common;

use cms_backup::restore::RestoreOperation;
use cms_backup::snapshot::{encode, SnapshotEntities};
use cms_backup::{plan_restore, BackupError, EntityKind, SnapshotType, Store};

use common::{article, category, section, snapshot, user};

#[tokio::test]
async fn test_full_restore_round_trips() {
    let store = Store::in_memory().await.unwrap();
    let original = common::full_snapshot();

    let result = common::restore(&store, &original).await.unwrap();
    assert_eq!(result.snapshot_type, SnapshotType::Full);
    assert_eq!(result.counts[&EntityKind::Articles], 3);
    assert_eq!(result.total(), 14);

    let exported = encode(store.conn(), SnapshotType::Full).await.unwrap();
    assert_eq!(exported.entities, original.entities);
}

#[tokio::test]
async fn test_reapplying_full_restore_is_idempotent() {
    let store = common::seeded_store().await;
    let first = encode(store.conn(), SnapshotType::Full).await.unwrap();

    common::restore(&store, &common::full_snapshot()).await.unwrap();
    let second = encode(store.conn(), SnapshotType::Full).await.unwrap();

    assert_eq!(first.entities, second.entities);
}

#[tokio::test]
async fn test_full_restore_replaces_existing_rows() {
    let store = common::seeded_store().await;

    let mut smaller = common::full_snapshot();
    smaller.entities.articles = Some(vec![article("a-9", "fresh", "u-1", "s-1", None)]);
    smaller.entities.activity_logs = Some(Vec::new());
    common::restore(&store, &smaller).await.unwrap();

    let exported = encode(store.conn(), SnapshotType::Full).await.unwrap();
    let article_ids: Vec<_> = exported.entities.record_ids(EntityKind::Articles);
    assert_eq!(article_ids, vec!["a-9"]);
    assert_eq!(exported.entities.len_of(EntityKind::ActivityLogs), Some(0));
}

#[tokio::test]
async fn test_tables_restore_leaves_other_kinds_alone() {
    let store = common::seeded_store().await;
    let tables = encode(store.conn(), SnapshotType::Tables).await.unwrap();

    let result = common::restore(&store, &tables).await.unwrap();
    assert!(!result.counts.contains_key(&EntityKind::Settings));

    let counts = store.counts().await.unwrap();
    assert_eq!(counts[&EntityKind::Settings], 1);
    assert_eq!(counts[&EntityKind::Categories], 1);
    assert_eq!(counts[&EntityKind::Messages], 1);

    let after = encode(store.conn(), SnapshotType::Tables).await.unwrap();
    assert_eq!(after.entities, tables.entities);

    // Applying the same snapshot again changes nothing.
    common::restore(&store, &tables).await.unwrap();
    let again = encode(store.conn(), SnapshotType::Tables).await.unwrap();
    assert_eq!(again.entities, tables.entities);
}

#[tokio::test]
async fn test_missing_parent_rolls_back_everything() {
    let store = Store::in_memory().await.unwrap();

    let mut broken = common::full_snapshot();
    broken.entities.articles = Some(vec![
        article("a-1", "who-we-are", "u-1", "s-1", Some("c-1")),
        article("a-2", "orphan", "u-1", "s-404", None),
    ]);

    match common::restore(&store, &broken).await.unwrap_err() {
        BackupError::RestoreFailed { kind, index, .. } => {
            assert_eq!(kind, EntityKind::Articles);
            assert_eq!(index, Some(1));
        }
        other => panic!("expected restore failure, got {other:?}"),
    }

    // Users and sections came earlier in the same call and must not persist.
    assert!(!store.has_data().await.unwrap());
}

#[tokio::test]
async fn test_failed_restore_keeps_previous_state() {
    let store = common::seeded_store().await;
    let before = encode(store.conn(), SnapshotType::Full).await.unwrap();

    let mut broken = common::full_snapshot();
    broken.entities.users = Some(vec![user("u-1", "admin")]);
    let err = common::restore(&store, &broken).await.unwrap_err();
    assert!(matches!(err, BackupError::RestoreFailed { .. }), "{err:?}");

    let after = encode(store.conn(), SnapshotType::Full).await.unwrap();
    assert_eq!(before.entities, after.entities);
}

#[tokio::test]
async fn test_duplicate_primary_key_reports_second_occurrence() {
    let store = Store::in_memory().await.unwrap();

    let mut duplicated = common::full_snapshot();
    duplicated.entities.sections = Some(vec![
        section("s-1", "about"),
        section("s-2", "programs"),
        section("s-1", "about-again"),
    ]);

    let err = common::restore(&store, &duplicated).await.unwrap_err();
    assert_eq!(err.restore_location(), Some((EntityKind::Sections, Some(2))));
    assert!(err.to_string().contains("sections record #2"), "{err}");
    assert!(!store.has_data().await.unwrap());
}

#[tokio::test]
async fn test_sections_restore_merges_by_primary_key() {
    let store = common::seeded_store().await;

    let mut renamed = section("s-1", "about");
    renamed.name = "About us".to_string();
    let partial = snapshot(
        SnapshotType::Sections,
        SnapshotEntities {
            sections: Some(vec![renamed, section("s-3", "events")]),
            categories: Some(vec![category("c-2", "gala", "s-3")]),
            articles: Some(vec![article("a-4", "gala-night", "u-2", "s-3", Some("c-2"))]),
            ..Default::default()
        },
    );

    let plan = plan_restore(&partial).unwrap();
    assert!(plan.steps().iter().all(|step| step.operation == RestoreOperation::Upsert));

    common::restore(&store, &partial).await.unwrap();

    let exported = encode(store.conn(), SnapshotType::Full).await.unwrap();
    assert_eq!(exported.entities.record_ids(EntityKind::Sections), vec!["s-1", "s-2", "s-3"]);
    assert_eq!(exported.entities.record_ids(EntityKind::Articles), vec!["a-1", "a-2", "a-3", "a-4"]);
    assert_eq!(exported.entities.len_of(EntityKind::Users), Some(2));
    let sections = exported.entities.sections.unwrap();
    assert_eq!(sections[0].name, "About us");
}

#[tokio::test]
async fn test_sections_restore_rejects_slug_taken_by_other_row() {
    let store = common::seeded_store().await;

    let partial = snapshot(
        SnapshotType::Sections,
        SnapshotEntities {
            sections: Some(vec![section("s-3", "events"), section("s-9", "about")]),
            ..Default::default()
        },
    );

    match common::restore(&store, &partial).await.unwrap_err() {
        BackupError::RestoreFailed { kind, index, .. } => {
            assert_eq!(kind, EntityKind::Sections);
            assert_eq!(index, Some(1));
        }
        other => panic!("expected restore failure, got {other:?}"),
    }

    let counts = store.counts().await.unwrap();
    assert_eq!(counts[&EntityKind::Sections], 2);
}

#[tokio::test]
async fn test_plan_orders_parents_first() {
    let partial = snapshot(
        SnapshotType::Full,
        SnapshotEntities {
            activity_logs: Some(Vec::new()),
            articles: Some(Vec::new()),
            users: Some(Vec::new()),
            categories: Some(Vec::new()),
            ..Default::default()
        },
    );

    let plan = plan_restore(&partial).unwrap();
    assert_eq!(
        plan.kinds().collect::<Vec<_>>(),
        vec![
            EntityKind::Users,
            EntityKind::Categories,
            EntityKind::Articles,
            EntityKind::ActivityLogs
        ]
    );
    assert!(plan.steps().iter().all(|step| step.operation == RestoreOperation::Replace));
}
