//! Settings database operations.
//!
//! Namespaced key-value storage with typed getters. Writes are buffered in a
//! [`SettingsEditor`] and only become visible on [`SettingsEditor::commit`].

use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::path::Path;

use crate::db::{Database, DbError, DbResult};

/// Preference holding the cache directory all roots are derived from
pub const CACHE_LOCATION: &str = "cache_location";

/// Preference selecting the smart sort order (default on)
pub const CUSTOM_SORT_ENABLED: &str = "custom_sort_enabled";

/// Key namespaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// User preferences shared with the host application
    Preferences,
    /// Offline actions waiting to be replayed
    OfflineSync,
}

impl Namespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Preferences => "preferences",
            Namespace::OfflineSync => "offline_sync",
        }
    }
}

#[derive(Debug, Clone)]
enum Edit {
    Put(String, String),
    Remove(String),
}

/// Durable key-value settings store
#[derive(Clone)]
pub struct SettingsStore {
    db: Database,
}

impl SettingsStore {
    /// Open (or create) a settings store backed by the given SQLite file
    pub fn open<P: AsRef<Path>>(db_path: P) -> DbResult<Self> {
        Ok(Self {
            db: Database::new(db_path)?,
        })
    }

    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self {
            db: Database::new_in_memory()?,
        })
    }

    pub fn from_database(db: Database) -> Self {
        Self { db }
    }

    /// Get a raw string value
    pub fn get_string(&self, namespace: Namespace, key: &str) -> DbResult<Option<String>> {
        self.db.with_conn(|conn| get_value(conn, namespace, key))
    }

    pub fn get_i32(&self, namespace: Namespace, key: &str, default: i32) -> DbResult<i32> {
        Ok(self
            .get_string(namespace, key)?
            .and_then(|v| v.parse().ok())
            .unwrap_or(default))
    }

    pub fn get_i64(&self, namespace: Namespace, key: &str, default: i64) -> DbResult<i64> {
        Ok(self
            .get_string(namespace, key)?
            .and_then(|v| v.parse().ok())
            .unwrap_or(default))
    }

    pub fn get_bool(&self, namespace: Namespace, key: &str, default: bool) -> DbResult<bool> {
        Ok(self
            .get_string(namespace, key)?
            .map(|v| v == "1" || v == "true")
            .unwrap_or(default))
    }

    /// Counter value, 0 when unset; a stored value that does not parse is an error
    pub fn get_counter(&self, namespace: Namespace, key: &str) -> DbResult<i32> {
        self.db
            .with_conn(|conn| parse_counter(key, get_value(conn, namespace, key)?))
    }

    /// Bump the counter at `counter_key` and commit it together with the
    /// writes `build` adds for the new value.
    ///
    /// The read and both writes share one exclusive transaction, so every
    /// store cloned from the same database hands out distinct values.
    pub fn commit_sequenced<F>(&self, namespace: Namespace, counter_key: &str, build: F) -> DbResult<i32>
    where
        F: FnOnce(i32, &mut SettingsEditor<'_>),
    {
        self.db.exclusive_transaction(|conn| {
            let next = parse_counter(counter_key, get_value(conn, namespace, counter_key)?)? + 1;

            let mut editor = self.edit(namespace);
            build(next, &mut editor);
            editor.put_i32(counter_key, next);
            apply_edits(conn, namespace, &editor.edits)?;

            Ok(next)
        })
    }

    /// Get every key in a namespace
    pub fn get_all(&self, namespace: Namespace) -> DbResult<HashMap<String, String>> {
        self.db.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT key, value FROM settings WHERE namespace = ?")?;

            let settings: HashMap<String, String> = stmt
                .query_map([namespace.as_str()], |row| {
                    let key: String = row.get(0)?;
                    let value: Option<String> = row.get(1)?;
                    Ok((key, value.unwrap_or_default()))
                })?
                .filter_map(|r| r.ok())
                .collect();

            Ok(settings)
        })
    }

    /// Start a batch of writes to one namespace
    pub fn edit(&self, namespace: Namespace) -> SettingsEditor<'_> {
        SettingsEditor {
            store: self,
            namespace,
            edits: Vec::new(),
        }
    }
}

/// Buffered writes, applied atomically on commit
pub struct SettingsEditor<'a> {
    store: &'a SettingsStore,
    namespace: Namespace,
    edits: Vec<Edit>,
}

impl SettingsEditor<'_> {
    pub fn put_string(&mut self, key: &str, value: &str) -> &mut Self {
        self.edits.push(Edit::Put(key.to_string(), value.to_string()));
        self
    }

    pub fn put_i32(&mut self, key: &str, value: i32) -> &mut Self {
        self.edits.push(Edit::Put(key.to_string(), value.to_string()));
        self
    }

    pub fn put_i64(&mut self, key: &str, value: i64) -> &mut Self {
        self.edits.push(Edit::Put(key.to_string(), value.to_string()));
        self
    }

    pub fn put_bool(&mut self, key: &str, value: bool) -> &mut Self {
        let value = if value { "1" } else { "0" };
        self.edits.push(Edit::Put(key.to_string(), value.to_string()));
        self
    }

    pub fn remove(&mut self, key: &str) -> &mut Self {
        self.edits.push(Edit::Remove(key.to_string()));
        self
    }

    /// Apply all buffered writes in one transaction
    pub fn commit(self) -> DbResult<()> {
        let namespace = self.namespace;
        let edits = self.edits;

        self.store
            .db
            .transaction(|conn| apply_edits(conn, namespace, &edits))
    }
}

fn apply_edits(conn: &Connection, namespace: Namespace, edits: &[Edit]) -> DbResult<()> {
    let namespace = namespace.as_str();
    for edit in edits {
        match edit {
            Edit::Put(key, value) => {
                conn.execute(
                    "INSERT OR REPLACE INTO settings (namespace, key, value) VALUES (?, ?, ?)",
                    params![namespace, key, value],
                )?;
            }
            Edit::Remove(key) => {
                conn.execute(
                    "DELETE FROM settings WHERE namespace = ? AND key = ?",
                    params![namespace, key],
                )?;
            }
        }
    }
    Ok(())
}

fn parse_counter(key: &str, value: Option<String>) -> DbResult<i32> {
    match value {
        None => Ok(0),
        Some(value) => value.trim().parse().map_err(|_| DbError::InvalidValue {
            key: key.to_string(),
            value,
        }),
    }
}

fn get_value(conn: &Connection, namespace: Namespace, key: &str) -> DbResult<Option<String>> {
    match conn.query_row(
        "SELECT value FROM settings WHERE namespace = ? AND key = ?",
        params![namespace.as_str(), key],
        |row| row.get(0),
    ) {
        Ok(value) => Ok(value),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_values_use_defaults() {
        let store = SettingsStore::open_in_memory().unwrap();

        assert_eq!(store.get_string(Namespace::Preferences, "nope").unwrap(), None);
        assert_eq!(store.get_i32(Namespace::Preferences, "nope", 7).unwrap(), 7);
        assert_eq!(store.get_i64(Namespace::Preferences, "nope", -1).unwrap(), -1);
        assert!(store.get_bool(Namespace::Preferences, "nope", true).unwrap());
    }

    #[test]
    fn test_writes_invisible_until_commit() {
        let store = SettingsStore::open_in_memory().unwrap();

        let mut editor = store.edit(Namespace::Preferences);
        editor.put_string(CACHE_LOCATION, "/cache");
        assert_eq!(store.get_string(Namespace::Preferences, CACHE_LOCATION).unwrap(), None);

        editor.commit().unwrap();
        assert_eq!(
            store.get_string(Namespace::Preferences, CACHE_LOCATION).unwrap(),
            Some("/cache".to_string())
        );
    }

    #[test]
    fn test_typed_round_trip() {
        let store = SettingsStore::open_in_memory().unwrap();

        let mut editor = store.edit(Namespace::OfflineSync);
        editor
            .put_i32("count", 3)
            .put_i64("time", 1_700_000_000_000)
            .put_bool("flag", false);
        editor.commit().unwrap();

        assert_eq!(store.get_i32(Namespace::OfflineSync, "count", 0).unwrap(), 3);
        assert_eq!(
            store.get_i64(Namespace::OfflineSync, "time", 0).unwrap(),
            1_700_000_000_000
        );
        assert!(!store.get_bool(Namespace::OfflineSync, "flag", true).unwrap());
    }

    #[test]
    fn test_namespaces_are_isolated() {
        let store = SettingsStore::open_in_memory().unwrap();

        let mut editor = store.edit(Namespace::OfflineSync);
        editor.put_string("key", "sync");
        editor.commit().unwrap();

        assert_eq!(store.get_string(Namespace::Preferences, "key").unwrap(), None);
        assert_eq!(store.get_all(Namespace::OfflineSync).unwrap().len(), 1);
        assert!(store.get_all(Namespace::Preferences).unwrap().is_empty());
    }

    #[test]
    fn test_remove_in_same_commit() {
        let store = SettingsStore::open_in_memory().unwrap();

        let mut editor = store.edit(Namespace::OfflineSync);
        editor.put_string("a", "1").put_string("b", "2");
        editor.commit().unwrap();

        let mut editor = store.edit(Namespace::OfflineSync);
        editor.remove("a").put_string("c", "3");
        editor.commit().unwrap();

        let all = store.get_all(Namespace::OfflineSync).unwrap();
        assert!(!all.contains_key("a"));
        assert_eq!(all.get("b"), Some(&"2".to_string()));
        assert_eq!(all.get("c"), Some(&"3".to_string()));
    }

    #[test]
    fn test_commit_sequenced_increments_and_writes() {
        let store = SettingsStore::open_in_memory().unwrap();

        let first = store
            .commit_sequenced(Namespace::OfflineSync, "n_count", |n, editor| {
                editor.put_string(&format!("n_id_{}", n), "a");
            })
            .unwrap();
        let second = store
            .commit_sequenced(Namespace::OfflineSync, "n_count", |n, editor| {
                editor.put_string(&format!("n_id_{}", n), "b");
            })
            .unwrap();

        assert_eq!((first, second), (1, 2));
        assert_eq!(store.get_counter(Namespace::OfflineSync, "n_count").unwrap(), 2);
        assert_eq!(
            store.get_string(Namespace::OfflineSync, "n_id_2").unwrap(),
            Some("b".to_string())
        );
    }

    #[test]
    fn test_corrupt_counter_is_an_error() {
        let store = SettingsStore::open_in_memory().unwrap();
        let mut editor = store.edit(Namespace::OfflineSync);
        editor.put_string("n_count", "seven");
        editor.commit().unwrap();

        assert!(matches!(
            store.get_counter(Namespace::OfflineSync, "n_count"),
            Err(DbError::InvalidValue { .. })
        ));
        assert!(store
            .commit_sequenced(Namespace::OfflineSync, "n_count", |_, _| {})
            .is_err());
        assert_eq!(
            store.get_string(Namespace::OfflineSync, "n_count").unwrap(),
            Some("seven".to_string())
        );
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.db");

        {
            let store = SettingsStore::open(&path).unwrap();
            let mut editor = store.edit(Namespace::Preferences);
            editor.put_bool(CUSTOM_SORT_ENABLED, false);
            editor.commit().unwrap();
        }

        let store = SettingsStore::open(&path).unwrap();
        assert!(!store.get_bool(Namespace::Preferences, CUSTOM_SORT_ENABLED, true).unwrap());
    }
}
