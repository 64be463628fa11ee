//! SQLite pool setup for the tracking store.
//!
//! Pools are built on r2d2 and every connection gets a busy timeout so
//! writers queue behind each other instead of failing with `SQLITE_BUSY`.

use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use crate::error::{Error, Result};

/// Schema migrations embedded at build time.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Shared pool of SQLite connections.
pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// Pool sizing and per-connection pragmas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolOptions {
    pub max_connections: u32,
    pub busy_timeout_ms: u32,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            max_connections: 5,
            busy_timeout_ms: 5000,
        }
    }
}

/// Applies pragmas to every connection handed out by the pool.
#[derive(Debug, Clone, Copy)]
struct SqlitePragmas {
    busy_timeout_ms: u32,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> std::result::Result<(), diesel::r2d2::Error> {
        diesel::sql_query(format!("PRAGMA busy_timeout = {}", self.busy_timeout_ms))
            .execute(conn)
            .map_err(diesel::r2d2::Error::QueryError)?;
        Ok(())
    }
}

/// Build a pool for `database_url` (a file path or `:memory:`).
///
/// In-memory databases are private to each connection, so `:memory:` is
/// always served by a single connection.
///
/// # Errors
/// Returns [`Error::Connection`] if r2d2 cannot build the pool.
pub fn create_pool(database_url: &str, options: PoolOptions) -> Result<DbPool> {
    let max_size = if database_url == ":memory:" {
        1
    } else {
        options.max_connections.max(1)
    };

    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder()
        .max_size(max_size)
        .connection_customizer(Box::new(SqlitePragmas {
            busy_timeout_ms: options.busy_timeout_ms,
        }))
        .build(manager)
        .map_err(|e| Error::Connection(e.to_string()))
}

/// Apply any migrations the database has not seen yet.
///
/// # Errors
/// Returns [`Error::Database`] if a migration fails.
pub fn run_migrations(pool: &DbPool) -> Result<()> {
    let mut conn = pool.get().map_err(|e| Error::Connection(e.to_string()))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| Error::Database(e.to_string()))?;
    Ok(())
}

/// Open a pool and bring its schema up to date.
///
/// # Errors
/// Returns an error if the pool cannot be created or migrations fail.
pub fn open(database_url: &str, options: PoolOptions) -> Result<DbPool> {
    let pool = create_pool(database_url, options)?;
    run_migrations(&pool)?;
    Ok(pool)
}
