//! Daily accuracy aggregation.
//!
//! Suggestions are bucketed by the date they were opened, not the date they
//! settled, so a day's row keeps filling in as its games finish.

use std::fmt::Write as _;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::{
    Outcome, PerformanceRollup, PerformanceSummary, PeriodKey, PeriodType, SummaryDelta,
};
use crate::error::{Result, ValidationError};
use crate::port::outbound::store::PerformanceStore;

const CSV_HEADER: &str = "date,total_tracked,settled_count,correct_count,accuracy_percent\n";

/// Rolls tracking and settlement events into daily summaries.
pub struct PerformanceAggregator<P> {
    store: Arc<P>,
}

impl<P> Clone for PerformanceAggregator<P> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<P: PerformanceStore> PerformanceAggregator<P> {
    pub fn new(store: Arc<P>) -> Self {
        Self { store }
    }

    /// Count a newly tracked suggestion against its opening date.
    ///
    /// # Errors
    /// Returns an error if the store write fails.
    pub async fn record_tracked(&self, opening_date: NaiveDate) -> Result<PerformanceSummary> {
        self.store
            .apply_delta(&PeriodKey::daily(opening_date), SummaryDelta::tracked())
            .await
    }

    /// Count one settlement against its opening date.
    ///
    /// Returns `None` without touching the store for outcomes that do not
    /// settle a bet.
    ///
    /// # Errors
    /// Returns an error if the store write fails.
    pub async fn update_summary(
        &self,
        opening_date: NaiveDate,
        outcome: Outcome,
        prediction_correct: bool,
    ) -> Result<Option<PerformanceSummary>> {
        if !outcome.is_terminal() {
            return Ok(None);
        }

        let key = PeriodKey::daily(opening_date);
        let summary = self
            .store
            .apply_delta(&key, SummaryDelta::settlement(prediction_correct))
            .await?;

        debug!(
            period_start = %summary.period_start,
            settled = summary.settled_count,
            correct = summary.correct_count,
            accuracy = %summary.accuracy_percent,
            "Performance summary updated"
        );
        Ok(Some(summary))
    }

    /// Daily rows whose date falls in `[from, to]`, oldest first.
    ///
    /// # Errors
    /// Returns a validation error if `from` is after `to`, or a store error.
    pub async fn daily_rows(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PerformanceSummary>> {
        if from > to {
            return Err(ValidationError::InvalidValue {
                field: "from",
                reason: format!("{from} is after {to}"),
            }
            .into());
        }
        self.store.list_summaries(PeriodType::Daily, from, to).await
    }

    /// Totals across `[from, to]`.
    ///
    /// # Errors
    /// See [`Self::daily_rows`].
    pub async fn summary(&self, from: NaiveDate, to: NaiveDate) -> Result<PerformanceRollup> {
        let rows = self.daily_rows(from, to).await?;
        Ok(PerformanceRollup::from_rows(&rows))
    }

    /// Render the daily rows in `[from, to]` as CSV.
    ///
    /// # Errors
    /// See [`Self::daily_rows`].
    pub async fn export_daily_csv(&self, from: NaiveDate, to: NaiveDate) -> Result<String> {
        let rows = self.daily_rows(from, to).await?;

        let mut csv = String::from(CSV_HEADER);
        for row in rows {
            let _ = writeln!(
                csv,
                "{},{},{},{},{}",
                row.period_start,
                row.total_tracked,
                row.settled_count,
                row.correct_count,
                row.accuracy_percent.round_dp(2).normalize(),
            );
        }
        Ok(csv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::memory::MemoryStore;
    use crate::error::Error;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 7, d).unwrap()
    }

    fn aggregator() -> PerformanceAggregator<MemoryStore> {
        PerformanceAggregator::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn settlements_update_accuracy() {
        let agg = aggregator();
        agg.update_summary(day(1), Outcome::Win, true).await.unwrap();
        agg.update_summary(day(1), Outcome::Loss, false).await.unwrap();
        let summary = agg
            .update_summary(day(1), Outcome::Push, false)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(summary.settled_count, 3);
        assert_eq!(summary.correct_count, 1);
        assert_eq!(summary.accuracy_percent.round_dp(2), dec!(33.33));
    }

    #[tokio::test]
    async fn cancelled_outcome_is_ignored() {
        let agg = aggregator();
        assert!(agg
            .update_summary(day(2), Outcome::Cancelled, true)
            .await
            .unwrap()
            .is_none());
        assert!(agg.daily_rows(day(1), day(3)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn summary_rolls_up_range() {
        let agg = aggregator();
        agg.record_tracked(day(1)).await.unwrap();
        agg.record_tracked(day(2)).await.unwrap();
        agg.update_summary(day(1), Outcome::Win, true).await.unwrap();
        agg.update_summary(day(2), Outcome::Win, true).await.unwrap();
        agg.update_summary(day(2), Outcome::Loss, false).await.unwrap();
        agg.update_summary(day(9), Outcome::Loss, false).await.unwrap();

        let rollup = agg.summary(day(1), day(2)).await.unwrap();
        assert_eq!(rollup.periods, 2);
        assert_eq!(rollup.total_tracked, 2);
        assert_eq!(rollup.settled_count, 3);
        assert_eq!(rollup.correct_count, 2);
    }

    #[tokio::test]
    async fn inverted_range_is_rejected() {
        let agg = aggregator();
        let err = agg.summary(day(5), day(1)).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn csv_export_has_header_and_rows() {
        let agg = aggregator();
        agg.record_tracked(day(3)).await.unwrap();
        agg.update_summary(day(3), Outcome::Win, true).await.unwrap();
        agg.update_summary(day(3), Outcome::Loss, false).await.unwrap();
        agg.update_summary(day(3), Outcome::Loss, true).await.unwrap();

        let csv = agg.export_daily_csv(day(1), day(31)).await.unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], CSV_HEADER.trim_end());
        assert_eq!(lines[1], "2026-07-03,1,3,2,66.67");
        assert_eq!(lines.len(), 2);
    }
}
