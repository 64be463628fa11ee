//! Command dispatch.

use tracing::debug;

use super::command::{Cli, Commands};
use super::{check, parlay, summary, tracking};
use crate::error::Result;
use crate::infrastructure::bootstrap::build_tracker;
use crate::infrastructure::config::settings::Config;

/// Run the parsed command against the loaded configuration.
///
/// Parlay checks and config validation never open the database.
///
/// # Errors
/// Returns the first error raised by the command.
pub async fn execute(cli: &Cli, config: &Config) -> Result<()> {
    debug!(command = ?cli.command, "Dispatching command");

    match &cli.command {
        Commands::Parlay(command) => parlay::execute(command),
        Commands::CheckConfig => check::execute_config(&cli.config),
        command => {
            let tracker = build_tracker(config)?;
            match command {
                Commands::Track(args) => tracking::execute_track(&tracker, args).await,
                Commands::Close(args) => tracking::execute_close(&tracker, args).await,
                Commands::Settle(args) => tracking::execute_settle(&tracker, args).await,
                Commands::Show(args) => tracking::execute_show(&tracker, args).await,
                Commands::Summary(args) => summary::execute(&tracker, args).await,
                Commands::Parlay(_) | Commands::CheckConfig => Ok(()),
            }
        }
    }
}
