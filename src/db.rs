use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::StoreError;
use crate::extract::ExtractedRecord;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS vc_firms (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        name         TEXT,
        location     TEXT,
        website      TEXT,
        focus        TEXT,
        last_updated TEXT
    );
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub website: String,
    pub focus: String,
    pub captured_at: String,
}

/// Append-only SQLite store for extracted firms. Each operation opens its
/// own connection and closes it before returning.
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Store { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        Connection::open(&self.path).map_err(|source| StoreError::Open {
            path: self.path.clone(),
            source,
        })
    }

    /// Create the table if it is missing. Safe to call on every run.
    pub fn initialize(&self) -> Result<(), StoreError> {
        let conn = self.connect()?;
        conn.execute_batch(SCHEMA)?;
        debug!("Schema ready at {:?}", self.path);
        Ok(())
    }

    /// Write the whole batch in one transaction, stamped with a single UTC time.
    pub fn insert(&self, records: &[ExtractedRecord]) -> Result<usize, StoreError> {
        let conn = self.connect()?;
        let captured_at = batch_timestamp();

        let tx = conn.unchecked_transaction()?;
        let mut count = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO vc_firms (name, location, website, focus, last_updated)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for r in records {
                count += stmt.execute(rusqlite::params![
                    r.name, r.location, r.website, r.focus, captured_at,
                ])?;
            }
        }
        tx.commit()?;

        info!("Inserted {} records at {}", count, captured_at);
        Ok(count)
    }

    /// Every row, oldest first.
    pub fn query_all(&self) -> Result<Vec<StoredRecord>, StoreError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT id, COALESCE(name,''), COALESCE(location,''), COALESCE(website,''),
                    COALESCE(focus,''), COALESCE(last_updated,'')
             FROM vc_firms
             ORDER BY id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(StoredRecord {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    location: row.get(2)?,
                    website: row.get(3)?,
                    focus: row.get(4)?,
                    captured_at: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

fn batch_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn temp_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("vc_data.db"));
        (dir, store)
    }

    fn firm(name: &str, focus: &str) -> ExtractedRecord {
        ExtractedRecord {
            name: name.to_string(),
            location: "SF".to_string(),
            website: format!("{}.vc", name.to_lowercase().replace(' ', "")),
            focus: focus.to_string(),
        }
    }

    fn table_sql(store: &Store) -> Vec<String> {
        let conn = Connection::open(store.path()).unwrap();
        let mut stmt = conn
            .prepare("SELECT sql FROM sqlite_master WHERE name = 'vc_firms'")
            .unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<String>, _>>()
            .unwrap()
    }

    #[test]
    fn initialize_twice_is_harmless() {
        let (_dir, store) = temp_store();
        store.initialize().unwrap();
        let before = table_sql(&store);
        store.initialize().unwrap();
        assert_eq!(table_sql(&store), before);
        assert_eq!(before.len(), 1);
    }

    #[test]
    fn initialize_keeps_existing_rows() {
        let (_dir, store) = temp_store();
        store.initialize().unwrap();
        store.insert(&[firm("Acme Ventures", "seed")]).unwrap();
        let before = store.query_all().unwrap();

        store.initialize().unwrap();
        assert_eq!(store.query_all().unwrap(), before);
    }

    #[test]
    fn insert_then_query_roundtrip() {
        let (_dir, store) = temp_store();
        store.initialize().unwrap();

        let batch = vec![
            firm("Acme Ventures", "seed"),
            firm("Northwind Capital", "climate"),
            ExtractedRecord::default(),
        ];
        assert_eq!(store.insert(&batch).unwrap(), 3);

        let rows = store.query_all().unwrap();
        assert_eq!(rows.len(), 3);
        for (row, record) in rows.iter().zip(&batch) {
            assert_eq!(row.name, record.name);
            assert_eq!(row.location, record.location);
            assert_eq!(row.website, record.website);
            assert_eq!(row.focus, record.focus);
        }
        assert!(rows.windows(2).all(|w| w[0].id < w[1].id));
        assert!(rows.iter().all(|r| r.captured_at == rows[0].captured_at));
        assert!(DateTime::parse_from_rfc3339(&rows[0].captured_at).is_ok());
    }

    #[test]
    fn batches_get_their_own_timestamp_and_append() {
        let (_dir, store) = temp_store();
        store.initialize().unwrap();
        store.insert(&[firm("Acme Ventures", "seed")]).unwrap();
        store.insert(&[firm("Acme Ventures", "seed")]).unwrap();

        let rows = store.query_all().unwrap();
        assert_eq!(rows.len(), 2);
        assert_ne!(rows[0].id, rows[1].id);
        assert_eq!(rows[0].name, rows[1].name);
    }

    #[test]
    fn empty_batch_writes_nothing() {
        let (_dir, store) = temp_store();
        store.initialize().unwrap();
        assert_eq!(store.insert(&[]).unwrap(), 0);
        assert!(store.query_all().unwrap().is_empty());
    }

    #[test]
    fn query_all_is_repeatable() {
        let (_dir, store) = temp_store();
        store.initialize().unwrap();
        store
            .insert(&[firm("Acme Ventures", "seed"), firm("Beta Fund", "bio")])
            .unwrap();

        let first = store.query_all().unwrap();
        let second = store.query_all().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn insert_without_schema_fails() {
        let (_dir, store) = temp_store();
        let err = store.insert(&[firm("Acme Ventures", "seed")]).unwrap_err();
        assert!(matches!(err, StoreError::Sqlite(_)));
    }

    #[test]
    fn unopenable_path_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("missing").join("vc_data.db"));
        let err = store.initialize().unwrap_err();
        assert!(matches!(err, StoreError::Open { .. }));
    }
}
