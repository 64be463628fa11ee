//! In-memory store implementation for testing and ephemeral runs.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::{Mutex, RwLock};

use crate::domain::{
    BetId, ClosingLine, ClvMetrics, GameResult, PerformanceSummary, PeriodKey, PeriodType,
    SummaryDelta, TrackedSuggestion, TrackingId,
};
use crate::error::{Error, Result};
use crate::port::outbound::store::{PerformanceStore, SuggestionStore};

#[derive(Debug, Default)]
struct SuggestionTable {
    by_id: HashMap<TrackingId, TrackedSuggestion>,
    by_bet_id: HashMap<BetId, TrackingId>,
}

/// In-memory store for suggestions and summaries.
///
/// Summary updates hold the summary lock for the whole read-modify-write.
#[derive(Debug, Default)]
pub struct MemoryStore {
    suggestions: RwLock<SuggestionTable>,
    summaries: Mutex<BTreeMap<PeriodKey, PerformanceSummary>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SuggestionStore for MemoryStore {
    async fn insert(&self, suggestion: &TrackedSuggestion) -> Result<()> {
        let mut table = self.suggestions.write();
        if table.by_id.contains_key(&suggestion.id)
            || table.by_bet_id.contains_key(&suggestion.bet_id)
        {
            return Err(Error::Database(format!(
                "duplicate suggestion {} / {}",
                suggestion.id, suggestion.bet_id
            )));
        }
        table
            .by_bet_id
            .insert(suggestion.bet_id.clone(), suggestion.id.clone());
        table
            .by_id
            .insert(suggestion.id.clone(), suggestion.clone());
        Ok(())
    }

    async fn remove(&self, id: &TrackingId) -> Result<()> {
        let mut table = self.suggestions.write();
        let removed = table.by_id.remove(id).ok_or_else(|| Error::NotFound {
            key: id.to_string(),
        })?;
        table.by_bet_id.remove(&removed.bet_id);
        Ok(())
    }

    async fn get(&self, id: &TrackingId) -> Result<Option<TrackedSuggestion>> {
        Ok(self.suggestions.read().by_id.get(id).cloned())
    }

    async fn get_by_bet_id(&self, bet_id: &BetId) -> Result<Option<TrackedSuggestion>> {
        let table = self.suggestions.read();
        Ok(table
            .by_bet_id
            .get(bet_id)
            .and_then(|id| table.by_id.get(id))
            .cloned())
    }

    async fn update_closing(
        &self,
        id: &TrackingId,
        closing: &ClosingLine,
        clv: &ClvMetrics,
    ) -> Result<()> {
        let mut table = self.suggestions.write();
        let suggestion = table.by_id.get_mut(id).ok_or_else(|| Error::NotFound {
            key: id.to_string(),
        })?;
        suggestion.closing = Some(closing.clone());
        suggestion.clv = Some(clv.clone());
        Ok(())
    }

    async fn update_result(
        &self,
        id: &TrackingId,
        result: &GameResult,
        settled_at: Option<DateTime<Utc>>,
    ) -> Result<bool> {
        let mut table = self.suggestions.write();
        let suggestion = table.by_id.get_mut(id).ok_or_else(|| Error::NotFound {
            key: id.to_string(),
        })?;
        if suggestion.is_settled() {
            return Ok(false);
        }
        suggestion.result = Some(result.clone());
        suggestion.settled_at = settled_at;
        Ok(true)
    }

    async fn revert_result(
        &self,
        id: &TrackingId,
        previous: Option<&GameResult>,
        settled_at: DateTime<Utc>,
    ) -> Result<bool> {
        let mut table = self.suggestions.write();
        let suggestion = table.by_id.get_mut(id).ok_or_else(|| Error::NotFound {
            key: id.to_string(),
        })?;
        if suggestion.settled_at != Some(settled_at) {
            return Ok(false);
        }
        suggestion.result = previous.cloned();
        suggestion.settled_at = None;
        Ok(true)
    }
}

impl PerformanceStore for MemoryStore {
    async fn apply_delta(&self, key: &PeriodKey, delta: SummaryDelta) -> Result<PerformanceSummary> {
        let mut summaries = self.summaries.lock();
        let summary = summaries
            .entry(*key)
            .or_insert_with(|| PerformanceSummary::empty(*key));
        summary.apply(delta);
        Ok(summary.clone())
    }

    async fn get_summary(&self, key: &PeriodKey) -> Result<Option<PerformanceSummary>> {
        Ok(self.summaries.lock().get(key).cloned())
    }

    async fn list_summaries(
        &self,
        period_type: PeriodType,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PerformanceSummary>> {
        Ok(self
            .summaries
            .lock()
            .values()
            .filter(|s| s.period_type == period_type)
            .filter(|s| s.period_start >= from && s.period_start <= to)
            .cloned()
            .collect())
    }
}
