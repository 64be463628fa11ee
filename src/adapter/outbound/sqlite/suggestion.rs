//! SQLite suggestion store implementation.
//!
//! Provides persistent storage for tracked suggestions using SQLite and
//! Diesel ORM.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;

use super::database::connection::DbPool;
use super::database::model::SuggestionRow;
use super::database::schema::tracked_suggestions;
use crate::domain::{
    BetId, ClosingLine, ClvMetrics, GameResult, Outcome, TrackedSuggestion, TrackingId,
};
use crate::error::{Error, Result};
use crate::port::outbound::store::SuggestionStore;

/// SQLite-backed suggestion store.
///
/// Implements the [`SuggestionStore`] trait. Settlement uses a conditional
/// update so that a suggestion can only be settled once, even when two
/// writers race.
pub struct SqliteSuggestionStore {
    /// Database connection pool.
    pool: DbPool,
}

impl SqliteSuggestionStore {
    /// Create a new SQLite suggestion store with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(
        &self,
    ) -> Result<diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<SqliteConnection>>>
    {
        self.pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))
    }

    fn to_row(s: &TrackedSuggestion) -> SuggestionRow {
        let closing = s.closing.as_ref();
        let clv = s.clv.as_ref();
        let result = s.result.as_ref();

        SuggestionRow {
            id: s.id.to_string(),
            bet_id: s.bet_id.to_string(),
            sport: s.sport.clone(),
            home_team: s.home_team.clone(),
            away_team: s.away_team.clone(),
            market_type: s.market_type.clone(),
            selection: s.selection.clone(),
            game_id: s.game_id.clone(),
            commence_time: s.commence_time.to_rfc3339(),
            opening_odds_decimal: s.opening_odds_decimal.to_string(),
            opening_odds_american: s.opening_odds_american,
            opening_sportsbook: s.opening_sportsbook.clone(),
            opening_implied_probability: s.opening_implied_probability.to_string(),
            suggested_probability: s.suggested_probability.map(|d| d.to_string()),
            ev_at_suggestion: s.ev_at_suggestion.map(|d| d.to_string()),
            kelly_size_suggested: s.kelly_size_suggested.map(|d| d.to_string()),
            source: s.source.clone(),
            confidence_score: s.confidence_score.map(|d| d.to_string()),
            model_version: s.model_version.clone(),
            notes: s.notes.clone(),
            opened_at: s.opened_at.to_rfc3339(),
            closing_odds_decimal: closing.map(|c| c.closing_odds_decimal.to_string()),
            closing_odds_american: closing.map(|c| c.closing_odds_american),
            closing_sportsbook: closing.map(|c| c.closing_sportsbook.clone()),
            closing_recorded_at: closing.map(|c| c.recorded_at.to_rfc3339()),
            clv_decimal: clv.map(|m| m.clv_decimal.to_string()),
            clv_percent: clv.map(|m| m.clv_percent.to_string()),
            cents_clv: clv.map(|m| m.cents_clv),
            closing_implied_probability: clv.map(|m| m.closing_implied_probability.to_string()),
            outcome: result.map(|r| r.outcome.as_str().to_string()),
            prediction_correct: result.map(|r| r.prediction_correct),
            result_recorded_at: result.map(|r| r.recorded_at.to_rfc3339()),
            settled_at: s.settled_at.map(|t| t.to_rfc3339()),
        }
    }

    fn from_row(row: SuggestionRow) -> Result<TrackedSuggestion> {
        let closing = match (
            row.closing_odds_decimal.as_deref(),
            row.closing_odds_american,
            row.closing_sportsbook,
            row.closing_recorded_at.as_deref(),
        ) {
            (Some(decimal), Some(american), Some(sportsbook), Some(recorded_at)) => {
                Some(ClosingLine {
                    closing_odds_decimal: parse_decimal(decimal)?,
                    closing_odds_american: american,
                    closing_sportsbook: sportsbook,
                    recorded_at: parse_time(recorded_at)?,
                })
            }
            _ => None,
        };

        let clv = match (
            row.clv_decimal.as_deref(),
            row.clv_percent.as_deref(),
            row.cents_clv,
            row.closing_implied_probability.as_deref(),
        ) {
            (Some(clv_decimal), Some(clv_percent), Some(cents_clv), Some(probability)) => {
                Some(ClvMetrics {
                    clv_decimal: parse_decimal(clv_decimal)?,
                    clv_percent: parse_decimal(clv_percent)?,
                    cents_clv,
                    closing_implied_probability: parse_decimal(probability)?,
                })
            }
            _ => None,
        };

        let result = match (row.outcome.as_deref(), row.result_recorded_at.as_deref()) {
            (Some(outcome), Some(recorded_at)) => Some(GameResult {
                outcome: Outcome::from_str(outcome).map_err(Error::Parse)?,
                prediction_correct: row.prediction_correct.unwrap_or(false),
                recorded_at: parse_time(recorded_at)?,
            }),
            _ => None,
        };

        Ok(TrackedSuggestion {
            id: TrackingId::from(row.id),
            bet_id: BetId::from(row.bet_id),
            sport: row.sport,
            home_team: row.home_team,
            away_team: row.away_team,
            market_type: row.market_type,
            selection: row.selection,
            game_id: row.game_id,
            commence_time: parse_time(&row.commence_time)?,
            opening_odds_decimal: parse_decimal(&row.opening_odds_decimal)?,
            opening_odds_american: row.opening_odds_american,
            opening_sportsbook: row.opening_sportsbook,
            opening_implied_probability: parse_decimal(&row.opening_implied_probability)?,
            suggested_probability: parse_opt_decimal(row.suggested_probability.as_deref())?,
            ev_at_suggestion: parse_opt_decimal(row.ev_at_suggestion.as_deref())?,
            kelly_size_suggested: parse_opt_decimal(row.kelly_size_suggested.as_deref())?,
            source: row.source,
            confidence_score: parse_opt_decimal(row.confidence_score.as_deref())?,
            model_version: row.model_version,
            notes: row.notes,
            opened_at: parse_time(&row.opened_at)?,
            closing,
            clv,
            result,
            settled_at: row.settled_at.as_deref().map(parse_time).transpose()?,
        })
    }

    fn load_one<F>(&self, filter: F) -> Result<Option<TrackedSuggestion>>
    where
        F: FnOnce(
            &mut SqliteConnection,
        ) -> std::result::Result<Option<SuggestionRow>, diesel::result::Error>,
    {
        let mut conn = self.conn()?;
        let row = filter(&mut *conn)?;
        row.map(Self::from_row).transpose()
    }
}

pub(super) fn parse_decimal(value: &str) -> Result<Decimal> {
    Decimal::from_str(value).map_err(|e| Error::Parse(format!("decimal '{value}': {e}")))
}

fn parse_opt_decimal(value: Option<&str>) -> Result<Option<Decimal>> {
    value.map(parse_decimal).transpose()
}

fn parse_time(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| Error::Parse(format!("timestamp '{value}': {e}")))
}

impl SuggestionStore for SqliteSuggestionStore {
    async fn insert(&self, suggestion: &TrackedSuggestion) -> Result<()> {
        let row = Self::to_row(suggestion);
        let mut conn = self.conn()?;

        diesel::insert_into(tracked_suggestions::table)
            .values(&row)
            .execute(&mut conn)?;

        Ok(())
    }

    async fn remove(&self, id: &TrackingId) -> Result<()> {
        let mut conn = self.conn()?;
        let deleted = diesel::delete(tracked_suggestions::table.find(id.as_str()))
            .execute(&mut conn)?;
        if deleted == 0 {
            return Err(Error::NotFound {
                key: id.to_string(),
            });
        }
        Ok(())
    }

    async fn get(&self, id: &TrackingId) -> Result<Option<TrackedSuggestion>> {
        self.load_one(|conn| {
            tracked_suggestions::table
                .find(id.as_str())
                .select(SuggestionRow::as_select())
                .first(conn)
                .optional()
        })
    }

    async fn get_by_bet_id(&self, bet_id: &BetId) -> Result<Option<TrackedSuggestion>> {
        self.load_one(|conn| {
            tracked_suggestions::table
                .filter(tracked_suggestions::bet_id.eq(bet_id.as_str()))
                .select(SuggestionRow::as_select())
                .first(conn)
                .optional()
        })
    }

    async fn update_closing(
        &self,
        id: &TrackingId,
        closing: &ClosingLine,
        clv: &ClvMetrics,
    ) -> Result<()> {
        use tracked_suggestions::dsl;

        let mut conn = self.conn()?;
        let updated = diesel::update(dsl::tracked_suggestions.find(id.as_str()))
            .set((
                dsl::closing_odds_decimal.eq(Some(closing.closing_odds_decimal.to_string())),
                dsl::closing_odds_american.eq(Some(closing.closing_odds_american)),
                dsl::closing_sportsbook.eq(Some(closing.closing_sportsbook.as_str())),
                dsl::closing_recorded_at.eq(Some(closing.recorded_at.to_rfc3339())),
                dsl::clv_decimal.eq(Some(clv.clv_decimal.to_string())),
                dsl::clv_percent.eq(Some(clv.clv_percent.to_string())),
                dsl::cents_clv.eq(Some(clv.cents_clv)),
                dsl::closing_implied_probability
                    .eq(Some(clv.closing_implied_probability.to_string())),
            ))
            .execute(&mut conn)?;

        if updated == 0 {
            return Err(Error::NotFound {
                key: id.to_string(),
            });
        }
        Ok(())
    }

    async fn update_result(
        &self,
        id: &TrackingId,
        result: &GameResult,
        settled_at: Option<DateTime<Utc>>,
    ) -> Result<bool> {
        use tracked_suggestions::dsl;

        let mut conn = self.conn()?;
        let updated = diesel::update(
            dsl::tracked_suggestions
                .filter(dsl::id.eq(id.as_str()))
                .filter(dsl::settled_at.is_null()),
        )
        .set((
            dsl::outcome.eq(Some(result.outcome.as_str())),
            dsl::prediction_correct.eq(Some(result.prediction_correct)),
            dsl::result_recorded_at.eq(Some(result.recorded_at.to_rfc3339())),
            dsl::settled_at.eq(settled_at.map(|t| t.to_rfc3339())),
        ))
        .execute(&mut conn)?;

        if updated > 0 {
            return Ok(true);
        }

        let exists = dsl::tracked_suggestions
            .find(id.as_str())
            .select(dsl::id)
            .first::<String>(&mut conn)
            .optional()?
            .is_some();
        if exists {
            Ok(false)
        } else {
            Err(Error::NotFound {
                key: id.to_string(),
            })
        }
    }

    async fn revert_result(
        &self,
        id: &TrackingId,
        previous: Option<&GameResult>,
        settled_at: DateTime<Utc>,
    ) -> Result<bool> {
        use tracked_suggestions::dsl;

        let mut conn = self.conn()?;
        let updated = diesel::update(
            dsl::tracked_suggestions
                .filter(dsl::id.eq(id.as_str()))
                .filter(dsl::settled_at.eq(settled_at.to_rfc3339())),
        )
        .set((
            dsl::outcome.eq(previous.map(|r| r.outcome.as_str())),
            dsl::prediction_correct.eq(previous.map(|r| r.prediction_correct)),
            dsl::result_recorded_at.eq(previous.map(|r| r.recorded_at.to_rfc3339())),
            dsl::settled_at.eq(None::<String>),
        ))
        .execute(&mut conn)?;

        Ok(updated > 0)
    }
}
