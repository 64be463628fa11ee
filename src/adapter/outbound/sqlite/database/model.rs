//! Database model types for Diesel ORM.
//!
//! Decimals and timestamps are stored as text (decimal strings and RFC 3339)
//! so values round-trip without precision loss.

use diesel::prelude::*;

use super::schema::{performance_summaries, tracked_suggestions};

/// Database row for a tracked suggestion.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = tracked_suggestions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SuggestionRow {
    pub id: String,
    pub bet_id: String,
    pub sport: String,
    pub home_team: String,
    pub away_team: String,
    pub market_type: String,
    pub selection: String,
    pub game_id: String,
    pub commence_time: String,
    pub opening_odds_decimal: String,
    pub opening_odds_american: i32,
    pub opening_sportsbook: String,
    pub opening_implied_probability: String,
    pub suggested_probability: Option<String>,
    pub ev_at_suggestion: Option<String>,
    pub kelly_size_suggested: Option<String>,
    pub source: Option<String>,
    pub confidence_score: Option<String>,
    pub model_version: Option<String>,
    pub notes: Option<String>,
    pub opened_at: String,
    pub closing_odds_decimal: Option<String>,
    pub closing_odds_american: Option<i32>,
    pub closing_sportsbook: Option<String>,
    pub closing_recorded_at: Option<String>,
    pub clv_decimal: Option<String>,
    pub clv_percent: Option<String>,
    pub cents_clv: Option<i64>,
    pub closing_implied_probability: Option<String>,
    pub outcome: Option<String>,
    pub prediction_correct: Option<bool>,
    pub result_recorded_at: Option<String>,
    pub settled_at: Option<String>,
}

/// Database row for a performance summary.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, Default)]
#[diesel(table_name = performance_summaries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PerformanceSummaryRow {
    pub period_type: String,
    pub period_start: String,
    pub period_end: String,
    pub total_tracked: i32,
    pub settled_count: i32,
    pub correct_count: i32,
    pub accuracy_percent: String,
}
