//! Scoped SQLite connection accessor.
//!
//! Every operation opens its own connection, runs on a blocking worker and
//! drops the connection when the closure returns, whether it succeeded or not.
//! Nothing is pooled and no handle is shared between operations.

use crate::DatabaseResult;
use cashbot_error::{DatabaseError, DatabaseErrorKind};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

/// Schema migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

/// Handle describing where the SQLite database lives.
///
/// Cloning is cheap; the handle holds no open connection.
///
/// # Example
/// ```no_run
/// use cashbot_database::Database;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let db = Database::new("cashbot.db");
/// db.initialize().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    path: String,
    busy_timeout_ms: u64,
}

impl Database {
    /// Create a handle for the database file at `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }

    /// Set how long a connection waits on a locked database before failing.
    pub fn with_busy_timeout(mut self, busy_timeout_ms: u64) -> Self {
        self.busy_timeout_ms = busy_timeout_ms;
        self
    }

    /// Path of the database file.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Open a fresh connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or the connection
    /// pragmas cannot be applied.
    pub fn open(&self) -> DatabaseResult<SqliteConnection> {
        let mut conn = SqliteConnection::establish(&self.path)?;
        conn.batch_execute(&format!("PRAGMA busy_timeout = {};", self.busy_timeout_ms))
            .map_err(|e| DatabaseError::new(DatabaseErrorKind::Connection(e.to_string())))?;
        Ok(conn)
    }

    /// Run `op` against a connection opened for this call only.
    ///
    /// Diesel is synchronous, so the statements execute on Tokio's blocking
    /// pool and the calling task suspends until they finish.
    pub async fn run<F, T>(&self, op: F) -> DatabaseResult<T>
    where
        F: FnOnce(&mut SqliteConnection) -> DatabaseResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = db.open()?;
            op(&mut conn)
        })
        .await
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Task(e.to_string())))?
    }

    /// Create the schema if it is absent.
    #[instrument(skip(self), fields(path = %self.path))]
    pub async fn initialize(&self) -> DatabaseResult<()> {
        let applied = self.run(run_migrations).await?;
        if applied == 0 {
            debug!("Database schema up to date");
        } else {
            info!(applied, "Applied database migrations");
        }
        Ok(())
    }
}

/// Apply pending migrations, returning how many ran.
pub fn run_migrations(conn: &mut SqliteConnection) -> DatabaseResult<usize> {
    conn.run_pending_migrations(MIGRATIONS)
        .map(|versions| versions.len())
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Migration(e.to_string())))
}

/// Convert a platform snowflake (u64) to its stored form.
///
/// SQLite integers are signed; the cast preserves every bit.
pub fn to_db_id(id: u64) -> i64 {
    id as i64
}

/// Convert a stored id back to the platform snowflake.
pub fn from_db_id(id: i64) -> u64 {
    id as u64
}
