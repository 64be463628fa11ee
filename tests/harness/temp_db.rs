use std::path::{Path, PathBuf};

use diesel::prelude::*;
use tempfile::TempDir;

use closeline::adapter::outbound::sqlite::database::connection::{open, DbPool, PoolOptions};
use closeline::infrastructure::bootstrap::{build_tracker, SqliteTracker};
use closeline::infrastructure::config::settings::Config;

/// Temporary SQLite database for integration tests.
///
/// The file and its directory are removed when dropped.
pub struct TempDb {
    _dir: TempDir,
    path: PathBuf,
}

impl TempDb {
    pub fn create(name: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join(format!("closeline-{name}.db"));

        // WAL mode improves concurrent writer behavior in tests.
        let pool = open(&path.display().to_string(), PoolOptions::default())
            .expect("open sqlite database");
        {
            let mut conn = pool.get().expect("get sqlite connection");
            diesel::sql_query("PRAGMA journal_mode=WAL")
                .execute(&mut conn)
                .expect("enable WAL mode");
        }

        Self { _dir: dir, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn url(&self) -> String {
        self.path.display().to_string()
    }

    /// A fresh pool over the same file.
    pub fn pool(&self, max_connections: u32) -> DbPool {
        open(
            &self.url(),
            PoolOptions {
                max_connections,
                busy_timeout_ms: 10_000,
            },
        )
        .expect("open sqlite pool")
    }

    pub fn config(&self) -> Config {
        Config {
            database: self.url(),
            ..Config::default()
        }
    }

    pub fn tracker(&self) -> SqliteTracker {
        build_tracker(&self.config()).expect("build tracker")
    }
}
