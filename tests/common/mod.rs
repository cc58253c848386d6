//! Fixtures shared by the integration tests.
#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use cms_backup::entities::{activity_log, article, category, message, news, report, section, setting, user};
use cms_backup::snapshot::{Snapshot, SnapshotEntities, SnapshotMetadata};
use cms_backup::{apply_restore, plan_restore, SnapshotType, Store, CURRENT_FORMAT_VERSION};

pub fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap()
}

pub fn user(id: &str, username: &str) -> user::Model {
    user::Model {
        id: id.to_string(),
        username: username.to_string(),
        email: format!("{username}@example.org"),
        password_hash: "$2b$10$abcdefghijklmnopqrstuv".to_string(),
        full_name: Some(format!("{username} account")),
        role: "editor".to_string(),
        is_active: true,
        created_at: at(1, 8),
        updated_at: at(2, 8),
    }
}

pub fn section(id: &str, slug: &str) -> section::Model {
    section::Model {
        id: id.to_string(),
        name: slug.replace('-', " "),
        slug: slug.to_string(),
        description: None,
        order_index: 0,
        is_active: true,
        created_at: at(1, 9),
        updated_at: at(1, 9),
    }
}

pub fn category(id: &str, slug: &str, section_id: &str) -> category::Model {
    category::Model {
        id: id.to_string(),
        name: slug.to_string(),
        slug: slug.to_string(),
        section_id: section_id.to_string(),
        order_index: 1,
        created_at: at(1, 10),
    }
}

pub fn article(id: &str, slug: &str, author_id: &str, section_id: &str, category_id: Option<&str>) -> article::Model {
    article::Model {
        id: id.to_string(),
        title: format!("Article {slug}"),
        slug: slug.to_string(),
        content: "<p>Body</p>".to_string(),
        excerpt: Some("Body".to_string()),
        image_url: None,
        status: "published".to_string(),
        author_id: author_id.to_string(),
        section_id: section_id.to_string(),
        category_id: category_id.map(str::to_string),
        published_at: Some(at(3, 12)),
        created_at: at(3, 11),
        updated_at: at(3, 12),
    }
}

pub fn news(id: &str, slug: &str, author_id: &str, section_id: Option<&str>) -> news::Model {
    news::Model {
        id: id.to_string(),
        title: format!("News {slug}"),
        slug: slug.to_string(),
        content: "Announcement".to_string(),
        image_url: Some("/uploads/news.png".to_string()),
        status: "draft".to_string(),
        author_id: author_id.to_string(),
        section_id: section_id.map(str::to_string),
        published_at: None,
        created_at: at(4, 9),
        updated_at: at(4, 9),
    }
}

pub fn report(id: &str, slug: &str, author_id: &str) -> report::Model {
    report::Model {
        id: id.to_string(),
        title: format!("Report {slug}"),
        slug: slug.to_string(),
        summary: Some("Yearly figures".to_string()),
        file_url: Some("/uploads/report.pdf".to_string()),
        year: Some(2025),
        status: "published".to_string(),
        author_id: author_id.to_string(),
        section_id: None,
        published_at: Some(at(5, 9)),
        created_at: at(5, 8),
        updated_at: at(5, 9),
    }
}

pub fn setting(id: &str, key: &str, value: &str) -> setting::Model {
    setting::Model {
        id: id.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        group_name: "general".to_string(),
        updated_at: at(6, 9),
    }
}

pub fn message(id: &str) -> message::Model {
    message::Model {
        id: id.to_string(),
        name: "Visitor".to_string(),
        email: "visitor@example.com".to_string(),
        subject: Some("Volunteering".to_string()),
        body: "How can I help?".to_string(),
        is_read: false,
        created_at: at(7, 15),
    }
}

pub fn activity(id: &str, user_id: Option<&str>) -> activity_log::Model {
    activity_log::Model {
        id: id.to_string(),
        user_id: user_id.map(str::to_string),
        action: "update".to_string(),
        entity_type: "article".to_string(),
        entity_id: Some("a-1".to_string()),
        details: None,
        created_at: at(8, 10),
    }
}

pub fn snapshot(snapshot_type: SnapshotType, entities: SnapshotEntities) -> Snapshot {
    Snapshot {
        metadata: SnapshotMetadata {
            format_version: CURRENT_FORMAT_VERSION,
            snapshot_type,
            created_at: at(10, 12),
        },
        entities,
    }
}

/// Every kind populated, ids listed in primary key order.
pub fn full_snapshot() -> Snapshot {
    snapshot(
        SnapshotType::Full,
        SnapshotEntities {
            users: Some(vec![user("u-1", "admin"), user("u-2", "editor")]),
            sections: Some(vec![section("s-1", "about"), section("s-2", "programs")]),
            categories: Some(vec![category("c-1", "team", "s-1")]),
            articles: Some(vec![
                article("a-1", "who-we-are", "u-1", "s-1", Some("c-1")),
                article("a-2", "literacy", "u-2", "s-2", None),
                article("a-3", "meals", "u-1", "s-2", None),
            ]),
            news: Some(vec![news("n-1", "spring-fair", "u-1", Some("s-1"))]),
            reports: Some(vec![report("r-1", "annual-2025", "u-2")]),
            settings: Some(vec![setting("st-1", "site_title", "Helping Hands")]),
            messages: Some(vec![message("m-1")]),
            activity_logs: Some(vec![activity("l-1", Some("u-1")), activity("l-2", None)]),
        },
    )
}

/// Restore `snapshot` through the public planning and apply path.
pub async fn restore(store: &Store, snapshot: &Snapshot) -> cms_backup::Result<cms_backup::RestoreResult> {
    let plan = plan_restore(snapshot)?;
    apply_restore(store.conn(), &plan, snapshot).await
}

/// In-memory store holding [`full_snapshot`].
pub async fn seeded_store() -> Store {
    let store = Store::in_memory().await.unwrap();
    restore(&store, &full_snapshot()).await.unwrap();
    store
}
