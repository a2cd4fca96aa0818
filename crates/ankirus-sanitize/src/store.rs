//! Durable memoization table for sanitized text.
//!
//! One row per distinct input. An empty `output` means the text came through
//! unchanged, which keeps the common case from storing every string twice.

use std::path::Path;

use libsql::Builder;

use crate::error::SanitizeError;

/// Row counts of the memoization table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: u64,
    /// Entries whose output equals their input.
    pub unchanged: u64,
}

/// libSQL-backed `input -> output` table.
pub struct SanitizeStore {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl SanitizeStore {
    /// Open (or create) the store at `path`, or `":memory:"` for tests.
    ///
    /// Creates the parent directory, switches the database to WAL with
    /// exclusive locking, and creates the table on first use.
    ///
    /// # Errors
    ///
    /// Returns `SanitizeError` if the directory, database, or schema cannot
    /// be created.
    pub async fn open(path: &str) -> Result<Self, SanitizeError> {
        if path != ":memory:"
            && let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Both pragmas report their new value as a row.
        conn.query("PRAGMA journal_mode = WAL", ()).await?;
        conn.query("PRAGMA locking_mode = EXCLUSIVE", ()).await?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS sanitize (
                input TEXT PRIMARY KEY,
                output TEXT NOT NULL
            ) WITHOUT ROWID",
            (),
        )
        .await?;

        Ok(Self { db, conn })
    }

    /// Cached output for `input`, if any.
    ///
    /// # Errors
    ///
    /// Returns `SanitizeError::LibSql` if the query fails.
    pub async fn lookup(&self, input: &str) -> Result<Option<String>, SanitizeError> {
        let mut rows = self
            .conn
            .query("SELECT output FROM sanitize WHERE input = ?1", libsql::params![input])
            .await?;
        let Some(row) = rows.next().await? else {
            return Ok(None);
        };
        let output: String = row.get(0)?;
        if output.is_empty() {
            Ok(Some(input.to_string()))
        } else {
            Ok(Some(output))
        }
    }

    /// Record `input -> output`. Returns `false` if `input` was already stored.
    ///
    /// Existing rows are never overwritten: two racing writers for the same
    /// input computed the same value, so the second insert is dropped.
    ///
    /// # Errors
    ///
    /// Returns `SanitizeError::LibSql` if the insert fails.
    pub async fn insert(&self, input: &str, output: &str) -> Result<bool, SanitizeError> {
        let stored = if output == input { "" } else { output };
        let inserted = self
            .conn
            .execute(
                "INSERT OR IGNORE INTO sanitize (input, output) VALUES (?1, ?2)",
                libsql::params![input, stored],
            )
            .await?;
        Ok(inserted == 1)
    }

    /// # Errors
    ///
    /// Returns `SanitizeError::LibSql` if the query fails.
    pub async fn stats(&self) -> Result<CacheStats, SanitizeError> {
        let mut rows = self
            .conn
            .query(
                "SELECT COUNT(*), COALESCE(SUM(output = ''), 0) FROM sanitize",
                (),
            )
            .await?;
        let Some(row) = rows.next().await? else {
            return Ok(CacheStats::default());
        };
        let entries: i64 = row.get(0)?;
        let unchanged: i64 = row.get(1)?;
        Ok(CacheStats {
            entries: entries.unsigned_abs(),
            unchanged: unchanged.unsigned_abs(),
        })
    }

    /// Delete every entry. Returns the number of rows removed.
    ///
    /// # Errors
    ///
    /// Returns `SanitizeError::LibSql` if the delete fails.
    pub async fn clear(&self) -> Result<u64, SanitizeError> {
        Ok(self.conn.execute("DELETE FROM sanitize", ()).await?)
    }
}
