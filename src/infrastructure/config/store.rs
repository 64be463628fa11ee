//! Persistence configuration.

use serde::Deserialize;

use crate::adapter::outbound::sqlite::database::connection::PoolOptions;

/// SQLite pool settings from the `[store]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Maximum pooled connections. `:memory:` databases always use one.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// How long a connection waits on a locked database (milliseconds).
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u32,
}

fn default_max_connections() -> u32 {
    5
}

fn default_busy_timeout_ms() -> u32 {
    5000
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_connections: default_max_connections(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

impl StoreConfig {
    #[must_use]
    pub fn pool_options(&self) -> PoolOptions {
        PoolOptions {
            max_connections: self.max_connections,
            busy_timeout_ms: self.busy_timeout_ms,
        }
    }
}
