//! Persistence ports for tracked suggestions and performance summaries.

use std::future::Future;

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::{
    BetId, ClosingLine, ClvMetrics, GameResult, PerformanceSummary, PeriodKey, PeriodType,
    SummaryDelta, TrackedSuggestion, TrackingId,
};
use crate::error::Result;

/// Storage operations for tracked suggestions.
pub trait SuggestionStore: Send + Sync {
    /// Insert a new suggestion. Fails if the id or bet id already exists.
    fn insert(&self, suggestion: &TrackedSuggestion) -> impl Future<Output = Result<()>> + Send;

    /// Delete a suggestion.
    ///
    /// Only used to take back an insert whose follow-up write failed.
    fn remove(&self, id: &TrackingId) -> impl Future<Output = Result<()>> + Send;

    /// Get a suggestion by its tracking id.
    fn get(&self, id: &TrackingId)
        -> impl Future<Output = Result<Option<TrackedSuggestion>>> + Send;

    /// Get a suggestion by its bet id.
    fn get_by_bet_id(
        &self,
        bet_id: &BetId,
    ) -> impl Future<Output = Result<Option<TrackedSuggestion>>> + Send;

    /// Replace the closing line and its metrics.
    ///
    /// Returns [`Error::NotFound`](crate::error::Error::NotFound) if the
    /// suggestion does not exist.
    fn update_closing(
        &self,
        id: &TrackingId,
        closing: &ClosingLine,
        clv: &ClvMetrics,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Store a result unless the suggestion is already settled.
    ///
    /// When `settled_at` is given the suggestion is marked settled in the
    /// same write. Returns `false` if nothing was written because the
    /// suggestion had already been settled.
    fn update_result(
        &self,
        id: &TrackingId,
        result: &GameResult,
        settled_at: Option<DateTime<Utc>>,
    ) -> impl Future<Output = Result<bool>> + Send;

    /// Undo a settlement written by [`Self::update_result`].
    ///
    /// Restores `previous` as the stored result and clears the settlement,
    /// but only while the suggestion is still settled at `settled_at`.
    /// Returns `false` if that settlement is no longer in place.
    fn revert_result(
        &self,
        id: &TrackingId,
        previous: Option<&GameResult>,
        settled_at: DateTime<Utc>,
    ) -> impl Future<Output = Result<bool>> + Send;
}

/// Storage operations for performance summaries.
pub trait PerformanceStore: Send + Sync {
    /// Atomically apply a delta to the row for `key`, creating it if absent.
    ///
    /// Concurrent calls for the same key must not lose updates.
    fn apply_delta(
        &self,
        key: &PeriodKey,
        delta: SummaryDelta,
    ) -> impl Future<Output = Result<PerformanceSummary>> + Send;

    /// Get the summary row for a key.
    fn get_summary(
        &self,
        key: &PeriodKey,
    ) -> impl Future<Output = Result<Option<PerformanceSummary>>> + Send;

    /// List rows of one period type whose start falls in `[from, to]`,
    /// ordered by period start.
    fn list_summaries(
        &self,
        period_type: PeriodType,
        from: NaiveDate,
        to: NaiveDate,
    ) -> impl Future<Output = Result<Vec<PerformanceSummary>>> + Send;
}
