// SPDX-License-Identifier: MPL-2.0

use crate::store::StoreError;
use crate::store::schema::{SCHEMA, TABLES};
use rusqlite::Connection;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Offsets added to per-run link and call ids.
///
/// Read at the start of every run (one past the highest stored id), so ids
/// synthesized in this run never land on rows written by an earlier run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdBases {
    pub link: i64,
    pub call: i64,
}

/// Handle to the archive database of one export destination
pub struct ArchiveDb {
    conn: Connection,
}

impl ArchiveDb {
    /// Open or create the archive at `path`
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Path(format!(
                    "failed to create {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let conn = Connection::open(path)?;
        let db = Self::init(conn)?;
        info!("archive opened at {}", path.display());
        Ok(db)
    }

    /// Archive that lives only as long as the handle
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        // Execute the schema (all CREATE IF NOT EXISTS)
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    fn next_id(&self, table: &str) -> Result<i64, StoreError> {
        let next = self.conn.query_row(
            &format!("SELECT COALESCE(MAX(id) + 1, 0) FROM {}", table),
            [],
            |row| row.get(0),
        )?;
        Ok(next)
    }

    /// Access connection for operations
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Bases for a run starting now
    pub fn next_id_bases(&self) -> Result<IdBases, StoreError> {
        Ok(IdBases {
            link: self.next_id("links")?,
            call: self.next_id("calls")?,
        })
    }

    /// Row count of every archive table
    pub fn counts(&self) -> Result<BTreeMap<&'static str, i64>, StoreError> {
        let mut counts = BTreeMap::new();
        for table in TABLES {
            let count: i64 =
                self.conn
                    .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                        row.get(0)
                    })?;
            counts.insert(table, count);
        }
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_archive_is_empty() {
        let db = ArchiveDb::open_in_memory().unwrap();
        let counts = db.counts().unwrap();
        assert_eq!(counts.len(), TABLES.len());
        assert!(counts.values().all(|count| *count == 0));
        assert_eq!(db.next_id_bases().unwrap(), IdBases { link: 0, call: 0 });
    }

    #[test]
    fn test_reopen_keeps_rows_and_advances_bases() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("messages.db");

        {
            let db = ArchiveDb::open(&path).unwrap();
            db.conn()
                .execute(
                    "INSERT INTO links (id, url, title) VALUES (4, 'https://vk.com', '')",
                    [],
                )
                .unwrap();
        }

        let db = ArchiveDb::open(&path).unwrap();
        assert_eq!(db.counts().unwrap()["links"], 1);
        assert_eq!(db.next_id_bases().unwrap(), IdBases { link: 5, call: 0 });
    }
}
