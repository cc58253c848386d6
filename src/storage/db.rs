use std::collections::BTreeMap;

use log::debug;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, Schema};

use crate::kind::EntityKind;
use crate::repositories::RecordRepository;
use crate::snapshot::record::with_entity;

const MEMORY_URL: &str = "sqlite::memory:";

/// Handle on the content database.
///
/// The handle is passed explicitly to every component that needs it; nothing
/// reaches for a process-wide connection.
#[derive(Clone, Debug)]
pub struct Store {
    conn: DatabaseConnection,
}

impl Store {
    /// Connect to a SQLite database and make sure every table exists.
    ///
    /// Foreign key enforcement is on by default for sqlx SQLite connections,
    /// which the restore path relies on.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, DbErr> {
        let mut options = ConnectOptions::new(database_url.to_string());
        options
            .max_connections(max_connections)
            .min_connections(1)
            .sqlx_logging(true)
            .sqlx_logging_level(log::LevelFilter::Debug);

        let store = Self {
            conn: Database::connect(options).await?,
        };
        store.init_schema().await?;
        Ok(store)
    }

    /// Private in-memory database.
    ///
    /// Limited to a single pooled connection: every SQLite in-memory connection
    /// is its own database.
    pub async fn in_memory() -> Result<Self, DbErr> {
        Self::connect(MEMORY_URL, 1).await
    }

    pub fn conn(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Create missing tables, parents first.
    pub async fn init_schema(&self) -> Result<(), DbErr> {
        for kind in EntityKind::ALL {
            with_entity!(kind, E => self.create_table::<E>().await?);
        }
        debug!("Schema ready ({} tables)", EntityKind::ALL.len());
        Ok(())
    }

    async fn create_table<E>(&self) -> Result<(), DbErr>
    where
        E: EntityTrait + Default,
    {
        let backend = self.conn.get_database_backend();
        let mut statement = Schema::new(backend).create_table_from_entity(E::default());
        statement.if_not_exists();
        self.conn.execute(backend.build(&statement)).await?;
        Ok(())
    }

    /// Row count of every table.
    pub async fn counts(&self) -> Result<BTreeMap<EntityKind, u64>, DbErr> {
        let mut counts = BTreeMap::new();
        for kind in EntityKind::ALL {
            let count = with_entity!(kind, E => RecordRepository::count::<E, _>(&self.conn).await?);
            counts.insert(kind, count);
        }
        Ok(counts)
    }

    /// Check whether the store holds any content.
    pub async fn has_data(&self) -> Result<bool, DbErr> {
        Ok(self.counts().await?.values().any(|count| *count > 0))
    }
}
