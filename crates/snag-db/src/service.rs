//! Service layer owning the database handle.
//!
//! `SnagService` wraps `SnagDb` (raw database access). All repo methods are
//! implemented as `impl SnagService` blocks, one module per entity under
//! `repos`.

use crate::SnagDb;
use crate::error::DatabaseError;

/// Orchestrates all entity operations against the database.
///
/// Held in `Arc` inside the HTTP app state; one instance per process.
pub struct SnagService {
    db: SnagDb,
}

impl SnagService {
    /// Create a new service wrapping a local database.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Path to the libSQL database file, or `":memory:"` for
    ///   tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = SnagDb::open_local(db_path).await?;
        Ok(Self { db })
    }

    /// Create from an existing `SnagDb` (for testing).
    #[must_use]
    pub const fn from_db(db: SnagDb) -> Self {
        Self { db }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &SnagDb {
        &self.db
    }
}
