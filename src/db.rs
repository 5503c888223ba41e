use std::{
    ops::{Deref, DerefMut},
    str::FromStr,
};

use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Executor, Sqlite, SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::AppError;

const SCHEMA: &str = include_str!("schema.sql");

pub type DbPool = SqlitePool;

/// Owns the connection pool. Built once at startup and handed to whoever
/// needs storage; there is no global instance.
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
}

impl Database {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        info!("connecting to {database_url} (max_connections={max_connections})");
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    /// Creates missing tables and indexes. Safe to run on every start; existing
    /// tables are never altered.
    pub async fn init_schema(&self) -> Result<(), AppError> {
        self.pool.execute(SCHEMA).await?;
        debug!("schema ready");
        Ok(())
    }

    /// Acquires a scoped handle. The connection goes back to the pool when the
    /// returned [`Session`] is dropped.
    pub async fn session(&self) -> Result<Session, AppError> {
        let conn = self.pool.acquire().await?;
        debug!("session acquired");
        Ok(Session { conn })
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("database pool closed");
    }
}

/// One logical request's worth of database access.
pub struct Session {
    conn: PoolConnection<Sqlite>,
}

impl Deref for Session {
    type Target = SqliteConnection;

    fn deref(&self) -> &Self::Target {
        &self.conn
    }
}

impl DerefMut for Session {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.conn
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        debug!("session released");
    }
}

#[cfg(test)]
pub(crate) async fn scratch_db(dir: &tempfile::TempDir) -> Database {
    let url = format!("sqlite://{}", dir.path().join("test.db").display());
    let db = Database::connect(&url, 2).await.unwrap();
    db.init_schema().await.unwrap();
    db
}
