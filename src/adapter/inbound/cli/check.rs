//! Handler for `closeline check-config`.

use std::path::Path;

use serde_json::json;

use super::output::print_json;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Load the file strictly (a missing file is an error) and echo the
/// effective settings.
pub fn execute_config(path: &Path) -> Result<()> {
    let config = Config::load(path)?;
    print_json(&json!({
        "valid": true,
        "path": path.display().to_string(),
        "database": config.database,
        "logging": {
            "level": config.logging.level,
            "format": config.logging.format,
        },
        "store": {
            "maxConnections": config.store.max_connections,
            "busyTimeoutMs": config.store.busy_timeout_ms,
        },
    }))
}
