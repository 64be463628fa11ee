//! Periodic accuracy summaries.
//!
//! Summaries are keyed by period and updated only through [`SummaryDelta`]
//! increments, so stores can apply them atomically.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Length of a summary period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    Daily,
}

impl PeriodType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
        }
    }

    /// Parse a stored period type.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "daily" => Some(Self::Daily),
            _ => None,
        }
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a summary row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeriodKey {
    pub period_type: PeriodType,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
}

impl PeriodKey {
    #[must_use]
    pub fn daily(date: NaiveDate) -> Self {
        Self {
            period_type: PeriodType::Daily,
            period_start: date,
            period_end: date,
        }
    }
}

/// Counter increments applied to a summary row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SummaryDelta {
    pub tracked: u32,
    pub settled: u32,
    pub correct: u32,
}

impl SummaryDelta {
    /// One newly tracked suggestion.
    #[must_use]
    pub const fn tracked() -> Self {
        Self {
            tracked: 1,
            settled: 0,
            correct: 0,
        }
    }

    /// One settlement, counted as correct if the prediction was.
    #[must_use]
    pub const fn settlement(prediction_correct: bool) -> Self {
        Self {
            tracked: 0,
            settled: 1,
            correct: if prediction_correct { 1 } else { 0 },
        }
    }
}

/// Aggregated accuracy for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSummary {
    pub period_type: PeriodType,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub total_tracked: u32,
    pub settled_count: u32,
    pub correct_count: u32,
    pub accuracy_percent: Decimal,
}

impl PerformanceSummary {
    /// A zeroed row for the given key.
    #[must_use]
    pub fn empty(key: PeriodKey) -> Self {
        Self {
            period_type: key.period_type,
            period_start: key.period_start,
            period_end: key.period_end,
            total_tracked: 0,
            settled_count: 0,
            correct_count: 0,
            accuracy_percent: Decimal::ZERO,
        }
    }

    #[must_use]
    pub fn key(&self) -> PeriodKey {
        PeriodKey {
            period_type: self.period_type,
            period_start: self.period_start,
            period_end: self.period_end,
        }
    }

    /// Add the delta's counters and recompute accuracy.
    pub fn apply(&mut self, delta: SummaryDelta) {
        self.total_tracked = self.total_tracked.saturating_add(delta.tracked);
        self.settled_count = self.settled_count.saturating_add(delta.settled);
        self.correct_count = self.correct_count.saturating_add(delta.correct);
        self.accuracy_percent = accuracy_percent(
            u64::from(self.correct_count),
            u64::from(self.settled_count),
        )
        .unwrap_or(Decimal::ZERO);
    }
}

/// Totals across a range of summary rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceRollup {
    pub periods: usize,
    pub total_tracked: u64,
    pub settled_count: u64,
    pub correct_count: u64,
}

impl PerformanceRollup {
    /// Sum a set of summary rows.
    #[must_use]
    pub fn from_rows(rows: &[PerformanceSummary]) -> Self {
        rows.iter().fold(Self::default(), |mut acc, row| {
            acc.periods += 1;
            acc.total_tracked += u64::from(row.total_tracked);
            acc.settled_count += u64::from(row.settled_count);
            acc.correct_count += u64::from(row.correct_count);
            acc
        })
    }

    /// Overall accuracy, or `None` when nothing has settled.
    #[must_use]
    pub fn accuracy_percent(&self) -> Option<Decimal> {
        accuracy_percent(self.correct_count, self.settled_count)
    }
}

fn accuracy_percent(correct: u64, settled: u64) -> Option<Decimal> {
    if settled == 0 {
        None
    } else {
        Some(Decimal::from(correct) / Decimal::from(settled) * dec!(100))
    }
}
