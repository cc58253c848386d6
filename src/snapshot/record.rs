//! Binding between entity kinds, their sea-orm entities and the typed record
//! lists of a snapshot.

use sea_orm::EntityTrait;

use super::SnapshotEntities;
use crate::entities::{activity_log, article, category, message, news, report, section, setting, user};
use crate::kind::EntityKind;

/// A sea-orm entity that can travel inside a snapshot.
pub trait SnapshotEntity: EntityTrait {
    const KIND: EntityKind;

    /// Primary key of a record, as written in the snapshot.
    fn record_id(model: &Self::Model) -> &str;

    fn records(entities: &SnapshotEntities) -> Option<&Vec<Self::Model>>;

    fn records_mut(entities: &mut SnapshotEntities) -> &mut Option<Vec<Self::Model>>;
}

macro_rules! snapshot_entity {
    ($module:ident, $kind:ident, $field:ident) => {
        impl SnapshotEntity for $module::Entity {
            const KIND: EntityKind = EntityKind::$kind;

            fn record_id(model: &$module::Model) -> &str {
                &model.id
            }

            fn records(entities: &SnapshotEntities) -> Option<&Vec<$module::Model>> {
                entities.$field.as_ref()
            }

            fn records_mut(entities: &mut SnapshotEntities) -> &mut Option<Vec<$module::Model>> {
                &mut entities.$field
            }
        }
    };
}

snapshot_entity!(user, Users, users);
snapshot_entity!(section, Sections, sections);
snapshot_entity!(category, Categories, categories);
snapshot_entity!(article, Articles, articles);
snapshot_entity!(news, News, news);
snapshot_entity!(report, Reports, reports);
snapshot_entity!(setting, Settings, settings);
snapshot_entity!(message, Messages, messages);
snapshot_entity!(activity_log, ActivityLogs, activity_logs);

/// Runs `$body` with `$entity` bound to the sea-orm entity type of `$kind`.
macro_rules! with_entity {
    ($kind:expr, $entity:ident => $body:expr) => {
        match $kind {
            $crate::kind::EntityKind::Users => {
                type $entity = $crate::entities::user::Entity;
                $body
            }
            $crate::kind::EntityKind::Sections => {
                type $entity = $crate::entities::section::Entity;
                $body
            }
            $crate::kind::EntityKind::Categories => {
                type $entity = $crate::entities::category::Entity;
                $body
            }
            $crate::kind::EntityKind::Articles => {
                type $entity = $crate::entities::article::Entity;
                $body
            }
            $crate::kind::EntityKind::News => {
                type $entity = $crate::entities::news::Entity;
                $body
            }
            $crate::kind::EntityKind::Reports => {
                type $entity = $crate::entities::report::Entity;
                $body
            }
            $crate::kind::EntityKind::Settings => {
                type $entity = $crate::entities::setting::Entity;
                $body
            }
            $crate::kind::EntityKind::Messages => {
                type $entity = $crate::entities::message::Entity;
                $body
            }
            $crate::kind::EntityKind::ActivityLogs => {
                type $entity = $crate::entities::activity_log::Entity;
                $body
            }
        }
    };
}

pub(crate) use with_entity;
