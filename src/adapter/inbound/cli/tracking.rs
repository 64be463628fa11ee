//! Handlers for the suggestion lifecycle commands.

use crate::application::{ClosingLineInput, NewSuggestion, ResultInput, TrackReceipt};
use crate::error::Result;
use crate::infrastructure::bootstrap::SqliteTracker;

use super::command::{CloseArgs, SettleArgs, ShowArgs, TrackArgs};
use super::output::{print_json, read_json};

/// Execute `closeline track`.
pub async fn execute_track(tracker: &SqliteTracker, args: &TrackArgs) -> Result<()> {
    let input: NewSuggestion = read_json(&args.file)?;
    let tracked = tracker.track(input).await?;
    print_json(&TrackReceipt::from(&tracked))
}

/// Execute `closeline close`.
pub async fn execute_close(tracker: &SqliteTracker, args: &CloseArgs) -> Result<()> {
    let input = ClosingLineInput {
        closing_odds_decimal: args.decimal,
        closing_odds_american: args.american,
        closing_sportsbook: args.book.clone(),
    };
    let report = tracker.record_closing_line(&args.key, input).await?;
    print_json(&report)
}

/// Execute `closeline settle`.
pub async fn execute_settle(tracker: &SqliteTracker, args: &SettleArgs) -> Result<()> {
    let input = ResultInput {
        outcome: args.outcome,
        prediction_correct: args.correct,
    };
    let ack = tracker.record_result(&args.key, input).await?;
    print_json(&ack)
}

/// Execute `closeline show`.
pub async fn execute_show(tracker: &SqliteTracker, args: &ShowArgs) -> Result<()> {
    let suggestion = tracker.get(&args.key).await?;
    print_json(&suggestion)
}
