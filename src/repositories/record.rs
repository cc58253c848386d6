//! Kind-agnostic record access used by snapshot encoding and restore.

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait, IdenStatic, IntoActiveModel, Iterable, PaginatorTrait,
    PrimaryKeyToColumn, QueryOrder,
};

/// Repository for whole-table reads and writes of any entity.
///
/// Methods take the connection as a parameter so the same calls work against a
/// pooled connection or an open transaction.
pub struct RecordRepository;

impl RecordRepository {
    /// Get every row of `E` ordered by primary key.
    pub async fn get_all<E, C>(conn: &C) -> Result<Vec<E::Model>, DbErr>
    where
        E: EntityTrait,
        C: ConnectionTrait,
    {
        let mut query = E::find();
        for key in E::PrimaryKey::iter() {
            query = query.order_by_asc(key.into_column());
        }
        query.all(conn).await
    }

    /// Count the rows of `E`.
    pub async fn count<E, C>(conn: &C) -> Result<u64, DbErr>
    where
        E: EntityTrait,
        E::Model: Sync,
        C: ConnectionTrait,
    {
        E::find().count(conn).await
    }

    /// Delete every row of `E`.
    pub async fn delete_all<E, C>(conn: &C) -> Result<u64, DbErr>
    where
        E: EntityTrait,
        C: ConnectionTrait,
    {
        Ok(E::delete_many().exec(conn).await?.rows_affected)
    }

    /// Insert a record as-is, keeping its primary key.
    pub async fn insert<E, C>(conn: &C, model: E::Model) -> Result<(), DbErr>
    where
        E: EntityTrait,
        E::Model: IntoActiveModel<E::ActiveModel>,
        E::ActiveModel: ActiveModelTrait<Entity = E> + Send,
        C: ConnectionTrait,
    {
        E::insert(model.into_active_model()).exec_without_returning(conn).await?;
        Ok(())
    }

    /// Insert a record, or overwrite every non-key column of the row with the
    /// same primary key.
    pub async fn upsert<E, C>(conn: &C, model: E::Model) -> Result<(), DbErr>
    where
        E: EntityTrait,
        E::Model: IntoActiveModel<E::ActiveModel>,
        E::ActiveModel: ActiveModelTrait<Entity = E> + Send,
        C: ConnectionTrait,
    {
        let keys: Vec<E::Column> = E::PrimaryKey::iter().map(|key| key.into_column()).collect();
        let updates: Vec<E::Column> = E::Column::iter()
            .filter(|column| !keys.iter().any(|key| key.as_str() == column.as_str()))
            .collect();

        E::insert(model.into_active_model())
            .on_conflict(OnConflict::columns(keys).update_columns(updates).to_owned())
            .exec_without_returning(conn)
            .await?;
        Ok(())
    }
}
