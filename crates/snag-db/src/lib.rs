//! # snag-db
//!
//! libSQL storage for Snagtrack.
//!
//! Handles all relational state: users, login sessions, projects, sites,
//! defects, comments, and attachments. Repository methods live on
//! [`service::SnagService`], one module per entity under [`repos`].
//!
//! Uses the `libsql` crate (C `SQLite` fork) with `PRAGMA foreign_keys = ON`
//! per connection.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;
pub mod updates;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::Builder;

/// Central database handle for all Snagtrack state operations.
///
/// Wraps a libSQL database and connection and provides ID generation.
pub struct SnagDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl SnagDb {
    /// Open a local database at the given path (`":memory:"` for tests).
    ///
    /// Runs migrations automatically on open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let snag_db = Self { db, conn };
        snag_db.run_migrations().await?;
        Ok(snag_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"dft-a3f8b2c1"`.
    ///
    /// Uses `randomblob(4)` in SQL to produce 8-char hex, then prepends the
    /// prefix.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))"),
                (),
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    async fn test_db() -> SnagDb {
        SnagDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;

        let tables = [
            "users",
            "auth_sessions",
            "projects",
            "sites",
            "defects",
            "comments",
            "attachments",
        ];
        for table in &tables {
            let mut rows = db
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [*table],
                )
                .await
                .unwrap();
            let row = rows.next().await.unwrap();
            assert!(row.is_some(), "table '{table}' should exist");
        }
    }

    #[tokio::test]
    async fn generate_id_correct_format() {
        let db = test_db().await;
        let id = db.generate_id("dft").await.unwrap();
        assert!(id.starts_with("dft-"), "ID should start with 'dft-': {id}");
        assert_eq!(
            id.len(),
            12,
            "ID should be 12 chars (3 prefix + 1 dash + 8 hex): {id}"
        );

        let hex_part = &id[4..];
        assert!(
            hex_part.chars().all(|c| c.is_ascii_hexdigit()),
            "Random part should be hex: {hex_part}"
        );
    }

    #[tokio::test]
    async fn generate_id_all_prefixes() {
        let db = test_db().await;
        for prefix in snag_core::ids::ALL_PREFIXES {
            let id = db.generate_id(prefix).await.unwrap();
            assert!(id.starts_with(&format!("{prefix}-")));
        }
    }

    #[tokio::test]
    async fn generate_id_uniqueness() {
        let db = test_db().await;
        let mut ids = HashSet::new();
        for _ in 0..100 {
            let id = db.generate_id("tst").await.unwrap();
            assert!(ids.insert(id.clone()), "Duplicate ID generated: {id}");
        }
    }

    #[tokio::test]
    async fn idempotent_migrations() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snag.db");
        let path = path.to_str().unwrap();

        {
            let db = SnagDb::open_local(path).await.unwrap();
            db.conn()
                .execute(
                    "INSERT INTO projects (id, name) VALUES ('prj-1', 'Kept')",
                    (),
                )
                .await
                .unwrap();
        }

        let db = SnagDb::open_local(path).await.unwrap();
        let mut rows = db
            .conn()
            .query("SELECT name FROM projects WHERE id = 'prj-1'", ())
            .await
            .unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<String>(0).unwrap(), "Kept");
    }

    #[tokio::test]
    async fn users_email_unique() {
        let db = test_db().await;
        db.conn()
            .execute(
                "INSERT INTO users (id, email, password_hash, role) VALUES ('usr-1', 'a@b.c', 'x', 'MANAGER')",
                (),
            )
            .await
            .unwrap();
        let dup = db
            .conn()
            .execute(
                "INSERT INTO users (id, email, password_hash, role) VALUES ('usr-2', 'a@b.c', 'x', 'ENGINEER')",
                (),
            )
            .await;
        assert!(dup.is_err(), "duplicate email should be rejected");
    }

    #[tokio::test]
    async fn comments_cascade_with_defect() {
        let db = test_db().await;
        db.conn()
            .execute(
                "INSERT INTO users (id, email, password_hash, role) VALUES ('usr-1', 'a@b.c', 'x', 'MANAGER')",
                (),
            )
            .await
            .unwrap();
        db.conn()
            .execute("INSERT INTO projects (id, name) VALUES ('prj-1', 'P')", ())
            .await
            .unwrap();
        db.conn()
            .execute(
                "INSERT INTO sites (id, project_id, name) VALUES ('sit-1', 'prj-1', 'S')",
                (),
            )
            .await
            .unwrap();
        db.conn()
            .execute(
                "INSERT INTO defects (id, site_id, title, creator_id) VALUES ('dft-1', 'sit-1', 'D', 'usr-1')",
                (),
            )
            .await
            .unwrap();
        db.conn()
            .execute(
                "INSERT INTO comments (id, defect_id, author_id, content) VALUES ('cmt-1', 'dft-1', 'usr-1', 'hi')",
                (),
            )
            .await
            .unwrap();

        db.conn()
            .execute("DELETE FROM defects WHERE id = 'dft-1'", ())
            .await
            .unwrap();

        let mut rows = db
            .conn()
            .query("SELECT COUNT(*) FROM comments", ())
            .await
            .unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<i64>(0).unwrap(), 0);
    }
}
