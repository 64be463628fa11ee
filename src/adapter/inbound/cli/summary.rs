//! Handler for `closeline summary`.

use chrono::{Duration, NaiveDate, Utc};
use serde_json::json;

use super::command::SummaryArgs;
use super::output::print_json;
use crate::domain::PerformanceRollup;
use crate::error::Result;
use crate::infrastructure::bootstrap::SqliteTracker;

/// Days covered when `--from` is omitted.
const DEFAULT_DAYS: i64 = 30;

fn resolve_range(args: &SummaryArgs) -> (NaiveDate, NaiveDate) {
    let to = args.to.unwrap_or_else(|| Utc::now().date_naive());
    let from = args
        .from
        .unwrap_or_else(|| to - Duration::days(DEFAULT_DAYS - 1));
    (from, to)
}

/// Execute `closeline summary`.
pub async fn execute(tracker: &SqliteTracker, args: &SummaryArgs) -> Result<()> {
    let (from, to) = resolve_range(args);
    let aggregator = tracker.aggregator();

    if args.csv {
        print!("{}", aggregator.export_daily_csv(from, to).await?);
        return Ok(());
    }

    let rows = aggregator.daily_rows(from, to).await?;
    let rollup = PerformanceRollup::from_rows(&rows);
    print_json(&json!({
        "from": from,
        "to": to,
        "periods": rollup.periods,
        "totalTracked": rollup.total_tracked,
        "settledCount": rollup.settled_count,
        "correctCount": rollup.correct_count,
        "accuracyPercent": rollup.accuracy_percent(),
        "daily": rows,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_range_is_thirty_days_ending_at_to() {
        let to = NaiveDate::from_ymd_opt(2026, 3, 31).unwrap();
        let args = SummaryArgs {
            from: None,
            to: Some(to),
            csv: false,
        };
        let (from, end) = resolve_range(&args);
        assert_eq!(end, to);
        assert_eq!(from, NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
    }
}
