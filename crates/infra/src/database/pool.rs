//! SQLite connection pool
//!
//! Provides r2d2-based connection pooling with per-connection pragmas:
//! WAL journaling for concurrency, NORMAL synchronous mode, enforced
//! foreign keys and a busy timeout for lock contention.

use std::path::Path;
use std::time::Duration;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use slotline_domain::Result;

use crate::errors::map_pool_error;

/// Pool handle shared by the repositories.
pub type SqlitePool = Pool<SqliteConnectionManager>;

/// A pooled SQLite connection.
pub type PooledSqliteConnection = r2d2::PooledConnection<SqliteConnectionManager>;

const CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Create a connection pool for the database file at `path`.
///
/// The pragmas run once per pooled connection, when r2d2 opens it.
pub fn create_pool<P: AsRef<Path>>(path: P, max_size: u32) -> Result<SqlitePool> {
    let manager = SqliteConnectionManager::file(path.as_ref()).with_init(|conn| {
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;\n\
             PRAGMA wal_autocheckpoint=1000;\n\
             PRAGMA synchronous=NORMAL;\n\
             PRAGMA foreign_keys=ON;",
        )?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(())
    });

    Pool::builder()
        .max_size(max_size.max(1))
        .connection_timeout(CONNECTION_TIMEOUT)
        .build(manager)
        .map_err(map_pool_error)
}
