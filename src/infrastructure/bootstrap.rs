//! Infrastructure bootstrap helpers for runtime wiring.

use std::sync::Arc;

use tracing::debug;

use crate::adapter::outbound::sqlite::database::connection::open;
use crate::adapter::outbound::sqlite::{SqlitePerformanceStore, SqliteSuggestionStore};
use crate::application::{ClvTracker, PerformanceAggregator};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Tracker backed by the configured SQLite database.
pub type SqliteTracker = ClvTracker<SqliteSuggestionStore, SqlitePerformanceStore>;

/// Open the configured database, run migrations and wire the tracker.
///
/// # Errors
/// Returns an error if the pool cannot be created or migrations fail.
pub fn build_tracker(config: &Config) -> Result<SqliteTracker> {
    let pool = open(&config.database, config.store.pool_options())?;
    debug!(database = %config.database, "Database ready");

    let suggestions = Arc::new(SqliteSuggestionStore::new(pool.clone()));
    let performance = Arc::new(SqlitePerformanceStore::new(pool));
    Ok(ClvTracker::new(
        suggestions,
        PerformanceAggregator::new(performance),
    ))
}
