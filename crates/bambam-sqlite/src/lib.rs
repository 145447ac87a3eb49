//! SQLite ledger adapter (sqlx).
//!
//! This crate implements the `bambam-core` `Ledger` port. Each partition is
//! bound to its own fixed, parameterized statements.

use std::{path::Path, str::FromStr, time::Duration};

use async_trait::async_trait;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use tracing::info;

use bambam_core::{
    domain::{Partition, UserId},
    errors::Error,
    ports::Ledger,
    Result,
};

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS members (username TEXT, user_id INTEGER)",
    "CREATE TABLE IF NOT EXISTS banned_members (username TEXT, user_id INTEGER)",
];

struct Statements {
    insert: &'static str,
    lookup: &'static str,
    retract: &'static str,
}

const MEMBERS: Statements = Statements {
    insert: "INSERT INTO members (username, user_id) VALUES (?, ?)",
    lookup: "SELECT user_id FROM members WHERE username = ? ORDER BY rowid LIMIT 1",
    retract: "DELETE FROM members WHERE rowid = \
              (SELECT MAX(rowid) FROM members WHERE username = ? AND user_id = ?)",
};

const BANNED: Statements = Statements {
    insert: "INSERT INTO banned_members (username, user_id) VALUES (?, ?)",
    lookup: "SELECT user_id FROM banned_members WHERE username = ? ORDER BY rowid LIMIT 1",
    retract: "DELETE FROM banned_members WHERE rowid = \
              (SELECT MAX(rowid) FROM banned_members WHERE username = ? AND user_id = ?)",
};

fn statements(partition: Partition) -> &'static Statements {
    match partition {
        Partition::Members => &MEMBERS,
        Partition::Banned => &BANNED,
    }
}

fn map_err(e: sqlx::Error) -> Error {
    Error::Storage(format!("sqlite error: {e}"))
}

/// Ledger stored in a SQLite database over one long-lived connection.
#[derive(Clone)]
pub struct SqliteLedger {
    pool: SqlitePool,
}

impl SqliteLedger {
    /// Open (creating if needed) the database file and its schema.
    pub async fn connect(path: &Path) -> Result<Self> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }

        let opts = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let ledger = Self::open(opts).await?;
        info!(path = %path.display(), "ledger opened");
        Ok(ledger)
    }

    /// Private in-memory database, gone when the ledger is dropped.
    pub async fn in_memory() -> Result<Self> {
        let opts = SqliteConnectOptions::from_str("sqlite::memory:").map_err(map_err)?;
        Self::open(opts).await
    }

    async fn open(opts: SqliteConnectOptions) -> Result<Self> {
        // Exactly one connection for the lifetime of the process.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(Option::<Duration>::None)
            .max_lifetime(Option::<Duration>::None)
            .connect_with(opts)
            .await
            .map_err(map_err)?;

        for stmt in SCHEMA {
            sqlx::query(stmt).execute(&pool).await.map_err(map_err)?;
        }

        Ok(Self { pool })
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl Ledger for SqliteLedger {
    async fn insert(&self, partition: Partition, user_id: UserId, username: &str) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(map_err)?;
        sqlx::query(statements(partition).insert)
            .bind(username)
            .bind(user_id.0)
            .execute(&mut *tx)
            .await
            .map_err(map_err)?;
        tx.commit().await.map_err(map_err)
    }

    async fn lookup(&self, partition: Partition, username: &str) -> Result<Option<UserId>> {
        let id = sqlx::query_scalar::<_, i64>(statements(partition).lookup)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_err)?;
        Ok(id.map(UserId))
    }

    async fn retract(
        &self,
        partition: Partition,
        user_id: UserId,
        username: &str,
    ) -> Result<bool> {
        let mut tx = self.pool.begin().await.map_err(map_err)?;
        let done = sqlx::query(statements(partition).retract)
            .bind(username)
            .bind(user_id.0)
            .execute(&mut *tx)
            .await
            .map_err(map_err)?;
        tx.commit().await.map_err(map_err)?;
        Ok(done.rows_affected() > 0)
    }
}
