//! Database schema definitions.
//!
//! Tables are created idempotently every time the store is opened.

use rusqlite::Connection;

use crate::db::DbResult;

/// SQL statements for creating all database tables
pub const CREATE_TABLES: &[(&str, &str)] = &[(
    "settings",
    "CREATE TABLE IF NOT EXISTS settings (
        namespace TEXT NOT NULL,
        key TEXT NOT NULL,
        value TEXT,
        PRIMARY KEY (namespace, key)
    )",
)];

/// Create all database tables
pub fn create_tables(conn: &Connection) -> DbResult<()> {
    for (_name, sql) in CREATE_TABLES {
        conn.execute(sql, [])?;
    }
    Ok(())
}
