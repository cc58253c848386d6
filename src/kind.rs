//! Entity kinds and snapshot types.
//!
//! The dependency table here is the single source of truth for restore
//! ordering: a kind lists every kind it references by foreign key.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One logical table of the content store.
///
/// Declaration order is the canonical order used for planning and for
/// reporting, so parents come before children.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Users,
    Sections,
    Categories,
    Articles,
    News,
    Reports,
    Settings,
    Messages,
    ActivityLogs,
}

impl EntityKind {
    pub const ALL: [EntityKind; 9] = [
        EntityKind::Users,
        EntityKind::Sections,
        EntityKind::Categories,
        EntityKind::Articles,
        EntityKind::News,
        EntityKind::Reports,
        EntityKind::Settings,
        EntityKind::Messages,
        EntityKind::ActivityLogs,
    ];

    /// Key used for this kind in the snapshot `entities` object.
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Users => "users",
            EntityKind::Sections => "sections",
            EntityKind::Categories => "categories",
            EntityKind::Articles => "articles",
            EntityKind::News => "news",
            EntityKind::Reports => "reports",
            EntityKind::Settings => "settings",
            EntityKind::Messages => "messages",
            EntityKind::ActivityLogs => "activity_logs",
        }
    }

    /// Database table backing this kind.
    ///
    /// Kind keys and table names coincide today; the two are kept apart so the
    /// file format does not move if a table is renamed.
    pub fn table_name(self) -> &'static str {
        self.as_str()
    }

    pub fn from_table_name(table: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.table_name() == table)
    }

    /// Kinds referenced by foreign key from this kind.
    pub fn dependencies(self) -> &'static [EntityKind] {
        match self {
            EntityKind::Users | EntityKind::Sections | EntityKind::Settings | EntityKind::Messages => &[],
            EntityKind::Categories => &[EntityKind::Sections],
            EntityKind::Articles => &[EntityKind::Users, EntityKind::Sections, EntityKind::Categories],
            EntityKind::News | EntityKind::Reports => &[EntityKind::Users, EntityKind::Sections],
            EntityKind::ActivityLogs => &[EntityKind::Users],
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown entity kind '{s}'"))
    }
}

/// Which entity kinds a snapshot covers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotType {
    /// Every kind.
    Full,
    /// Accounts and published content.
    Tables,
    /// Site structure with its articles.
    Sections,
}

impl SnapshotType {
    pub const ALL: [SnapshotType; 3] = [SnapshotType::Full, SnapshotType::Tables, SnapshotType::Sections];

    pub fn as_str(self) -> &'static str {
        match self {
            SnapshotType::Full => "full",
            SnapshotType::Tables => "tables",
            SnapshotType::Sections => "sections",
        }
    }

    /// Kinds a snapshot of this type may contain, in canonical order.
    pub fn kinds(self) -> &'static [EntityKind] {
        match self {
            SnapshotType::Full => &EntityKind::ALL,
            SnapshotType::Tables => &[
                EntityKind::Users,
                EntityKind::Sections,
                EntityKind::Articles,
                EntityKind::News,
                EntityKind::Reports,
            ],
            SnapshotType::Sections => &[EntityKind::Sections, EntityKind::Categories, EntityKind::Articles],
        }
    }

    pub fn includes(self, kind: EntityKind) -> bool {
        self.kinds().contains(&kind)
    }

    /// Whether restoring this type replaces the covered tables wholesale.
    /// `sections` snapshots merge by primary key instead.
    pub fn replaces_existing(self) -> bool {
        matches!(self, SnapshotType::Full | SnapshotType::Tables)
    }
}

impl fmt::Display for SnapshotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SnapshotType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| format!("unknown snapshot type '{s}' (expected full, tables or sections)"))
    }
}
