//! SQLite backing for the durable settings store.
//!
//! One pooled database holds the namespaced key-value table. Schema creation
//! runs on every open and is idempotent.

pub mod schema;
pub mod settings;

use parking_lot::Mutex;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, TransactionBehavior};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use offline_core::CatalogError;

pub use settings::{Namespace, SettingsEditor, SettingsStore};

/// Writers wait this long for a competing transaction before failing
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Setting not found: {0}")]
    NotFound(String),

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type DbResult<T> = Result<T, DbError>;

impl From<DbError> for CatalogError {
    fn from(err: DbError) -> Self {
        CatalogError::Settings(err.to_string())
    }
}

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConnection = PooledConnection<SqliteConnectionManager>;

/// Pooled handle to the settings database; clones share the pool and the
/// writer lock
#[derive(Clone)]
pub struct Database {
    pool: Arc<DbPool>,
    writer: Arc<Mutex<()>>,
}

impl Database {
    /// Open (creating if needed) the settings database at `db_path`
    pub fn new<P: AsRef<Path>>(db_path: P) -> DbResult<Self> {
        if let Some(parent) = db_path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let manager = SqliteConnectionManager::file(db_path.as_ref())
            .with_init(|conn| conn.busy_timeout(BUSY_TIMEOUT));
        let pool = Pool::builder().max_size(4).min_idle(Some(1)).build(manager)?;

        Self::from_pool(pool)
    }

    /// Private in-memory database.
    ///
    /// Each SQLite memory connection is a separate database, so the pool is
    /// capped at one connection.
    pub fn new_in_memory() -> DbResult<Self> {
        let pool = Pool::builder()
            .max_size(1)
            .build(SqliteConnectionManager::memory())?;

        Self::from_pool(pool)
    }

    fn from_pool(pool: DbPool) -> DbResult<Self> {
        let db = Self {
            pool: Arc::new(pool),
            writer: Arc::new(Mutex::new(())),
        };

        {
            let conn = db.conn()?;
            conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;")?;
            schema::create_tables(&conn)?;
        }

        Ok(db)
    }

    pub fn conn(&self) -> DbResult<DbConnection> {
        Ok(self.pool.get()?)
    }

    pub fn with_conn<F, T>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&Connection) -> DbResult<T>,
    {
        let conn = self.conn()?;
        f(&conn)
    }

    /// Run `f` in one transaction; any error rolls everything back
    pub fn transaction<F, T>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&Connection) -> DbResult<T>,
    {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    /// Run `f` holding the write lock from its first statement.
    ///
    /// Handles sharing this pool queue on the in-process writer lock; other
    /// processes on the same file wait out `BUSY_TIMEOUT` on `BEGIN IMMEDIATE`.
    /// Reads inside `f` therefore see no concurrent writer.
    pub fn exclusive_transaction<F, T>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&Connection) -> DbResult<T>,
    {
        let _writer = self.writer.lock();
        let mut conn = self.conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }
}
