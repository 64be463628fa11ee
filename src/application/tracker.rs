//! Closing-line-value tracking.
//!
//! [`ClvTracker`] owns the lifecycle of a tracked suggestion: it is created
//! with its opening price, then independently receives a closing line and a
//! settlement result. Settlement is guarded so that each suggestion is
//! counted in the daily summaries at most once.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use super::performance::PerformanceAggregator;
use crate::domain::odds::{
    american_to_decimal, decimal_to_american, implied_probability, validate_decimal_odds,
};
use crate::domain::{
    BetId, ClosingLine, ClvMetrics, GameResult, Outcome, TrackedSuggestion, TrackingId,
};
use crate::error::{Error, Result, ValidationError};
use crate::port::outbound::store::{PerformanceStore, SuggestionStore};

/// Caller-supplied fields for a new suggestion.
///
/// Every field is optional on the wire so that all missing required fields
/// can be reported together.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSuggestion {
    pub sport: Option<String>,
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    pub market_type: Option<String>,
    pub selection: Option<String>,
    pub game_id: Option<String>,
    pub commence_time: Option<DateTime<Utc>>,
    pub opening_odds_decimal: Option<Decimal>,
    pub opening_odds_american: Option<i32>,
    pub opening_sportsbook: Option<String>,
    pub suggested_probability: Option<Decimal>,
    pub ev_at_suggestion: Option<Decimal>,
    pub kelly_size_suggested: Option<Decimal>,
    pub source: Option<String>,
    pub confidence_score: Option<Decimal>,
    pub model_version: Option<String>,
    pub notes: Option<String>,
}

impl NewSuggestion {
    /// Treat blank strings as absent.
    fn normalized(mut self) -> Self {
        for field in [
            &mut self.sport,
            &mut self.home_team,
            &mut self.away_team,
            &mut self.market_type,
            &mut self.selection,
            &mut self.game_id,
            &mut self.opening_sportsbook,
        ] {
            if field.as_deref().is_some_and(|s| s.trim().is_empty()) {
                *field = None;
            }
        }
        self
    }

    /// Names of required fields that are absent, in wire form.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let checks = [
            ("sport", self.sport.is_none()),
            ("homeTeam", self.home_team.is_none()),
            ("awayTeam", self.away_team.is_none()),
            ("marketType", self.market_type.is_none()),
            ("selection", self.selection.is_none()),
            ("gameId", self.game_id.is_none()),
            ("commenceTime", self.commence_time.is_none()),
            ("openingOddsDecimal", self.opening_odds_decimal.is_none()),
            ("openingSportsbook", self.opening_sportsbook.is_none()),
        ];
        checks
            .into_iter()
            .filter_map(|(name, missing)| missing.then_some(name))
            .collect()
    }
}

/// Identifiers handed back to the caller after tracking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackReceipt {
    pub tracking_id: TrackingId,
    pub bet_id: BetId,
}

impl From<&TrackedSuggestion> for TrackReceipt {
    fn from(s: &TrackedSuggestion) -> Self {
        Self {
            tracking_id: s.id.clone(),
            bet_id: s.bet_id.clone(),
        }
    }
}

/// Closing price reported for a suggestion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosingLineInput {
    pub closing_odds_decimal: Option<Decimal>,
    pub closing_odds_american: Option<i32>,
    pub closing_sportsbook: Option<String>,
}

/// One side of a price comparison, echoed back with the metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineSummary {
    pub odds_decimal: Decimal,
    pub odds_american: i32,
    pub sportsbook: String,
    pub implied_probability: Decimal,
}

/// Metrics computed for a closing line plus both prices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosingLineReport {
    pub tracking_id: TrackingId,
    pub bet_id: BetId,
    #[serde(flatten)]
    pub metrics: ClvMetrics,
    pub opening: LineSummary,
    pub closing: LineSummary,
}

/// Settlement reported for a suggestion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultInput {
    pub outcome: Option<Outcome>,
    #[serde(default)]
    pub prediction_correct: bool,
}

/// Acknowledgement of a recorded result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultAck {
    pub tracking_id: TrackingId,
    pub bet_id: BetId,
    pub result: GameResult,
    /// False when the suggestion had already been settled and nothing changed.
    pub newly_settled: bool,
}

/// Tracks suggestions from emission through closing line and settlement.
pub struct ClvTracker<S, P> {
    store: Arc<S>,
    aggregator: PerformanceAggregator<P>,
}

impl<S, P> ClvTracker<S, P>
where
    S: SuggestionStore,
    P: PerformanceStore,
{
    pub fn new(store: Arc<S>, aggregator: PerformanceAggregator<P>) -> Self {
        Self { store, aggregator }
    }

    /// The aggregator fed by this tracker.
    pub fn aggregator(&self) -> &PerformanceAggregator<P> {
        &self.aggregator
    }

    /// Start tracking a suggestion at its opening price, timestamped now.
    ///
    /// The suggestion is removed again if it cannot be counted in its daily
    /// summary.
    ///
    /// # Errors
    /// Returns a validation error listing every missing required field, an
    /// odds error if the opening price is invalid, or a store error.
    pub async fn track(&self, input: NewSuggestion) -> Result<TrackedSuggestion> {
        self.track_at(input, Utc::now()).await
    }

    /// Like [`Self::track`] with an explicit creation time.
    ///
    /// # Errors
    /// See [`Self::track`].
    pub async fn track_at(
        &self,
        input: NewSuggestion,
        opened_at: DateTime<Utc>,
    ) -> Result<TrackedSuggestion> {
        let input = input.normalized();
        let missing = input.missing_fields();

        let NewSuggestion {
            sport: Some(sport),
            home_team: Some(home_team),
            away_team: Some(away_team),
            market_type: Some(market_type),
            selection: Some(selection),
            game_id: Some(game_id),
            commence_time: Some(commence_time),
            opening_odds_decimal: Some(opening_odds_decimal),
            opening_odds_american,
            opening_sportsbook: Some(opening_sportsbook),
            suggested_probability,
            ev_at_suggestion,
            kelly_size_suggested,
            source,
            confidence_score,
            model_version,
            notes,
        } = input
        else {
            return Err(ValidationError::MissingFields { fields: missing }.into());
        };

        let opening_odds_decimal = validate_decimal_odds(opening_odds_decimal)?;
        let opening_odds_american = match opening_odds_american {
            Some(american) => {
                american_to_decimal(american)?;
                american
            }
            None => decimal_to_american(opening_odds_decimal)?,
        };

        let suggestion = TrackedSuggestion {
            id: TrackingId::generate(),
            bet_id: BetId::derive(&game_id, &market_type, &selection, opened_at),
            opening_implied_probability: implied_probability(opening_odds_decimal)?,
            sport,
            home_team,
            away_team,
            market_type,
            selection,
            game_id,
            commence_time,
            opening_odds_decimal,
            opening_odds_american,
            opening_sportsbook,
            suggested_probability,
            ev_at_suggestion,
            kelly_size_suggested,
            source,
            confidence_score,
            model_version,
            notes,
            opened_at,
            closing: None,
            clv: None,
            result: None,
            settled_at: None,
        };

        self.store.insert(&suggestion).await?;
        if let Err(e) = self
            .aggregator
            .record_tracked(suggestion.opening_date())
            .await
        {
            if let Err(undo) = self.store.remove(&suggestion.id).await {
                error!(
                    tracking_id = %suggestion.id,
                    error = %undo,
                    "Failed to remove suggestion after summary write failed"
                );
            }
            return Err(e);
        }

        info!(
            tracking_id = %suggestion.id,
            bet_id = %suggestion.bet_id,
            game_id = %suggestion.game_id,
            market = %suggestion.market_type,
            odds = %suggestion.opening_odds_decimal,
            "Suggestion tracked"
        );
        Ok(suggestion)
    }

    /// Look up a suggestion by tracking id, falling back to bet id.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if neither id matches.
    pub async fn get(&self, key: &str) -> Result<TrackedSuggestion> {
        if let Some(found) = self.store.get(&TrackingId::new(key)).await? {
            return Ok(found);
        }
        self.store
            .get_by_bet_id(&BetId::new(key))
            .await?
            .ok_or_else(|| Error::NotFound {
                key: key.to_string(),
            })
    }

    /// Attach a closing line, replacing any earlier one.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] for an unknown key, a validation error if
    /// any closing field is missing, or an odds error for invalid prices.
    pub async fn record_closing_line(
        &self,
        key: &str,
        input: ClosingLineInput,
    ) -> Result<ClosingLineReport> {
        let mut suggestion = self.get(key).await?;

        let sportsbook = input
            .closing_sportsbook
            .filter(|s| !s.trim().is_empty());
        let mut missing = Vec::new();
        if input.closing_odds_decimal.is_none() {
            missing.push("closingOddsDecimal");
        }
        if input.closing_odds_american.is_none() {
            missing.push("closingOddsAmerican");
        }
        if sportsbook.is_none() {
            missing.push("closingSportsbook");
        }
        let (Some(decimal), Some(american), Some(sportsbook)) =
            (input.closing_odds_decimal, input.closing_odds_american, sportsbook)
        else {
            return Err(ValidationError::MissingFields { fields: missing }.into());
        };

        let closing = ClosingLine {
            closing_odds_decimal: validate_decimal_odds(decimal)?,
            closing_odds_american: american,
            closing_sportsbook: sportsbook,
            recorded_at: Utc::now(),
        };
        if suggestion.closing.is_some() {
            debug!(tracking_id = %suggestion.id, "Overwriting closing line");
        }
        let metrics = suggestion.attach_closing(closing.clone())?.clone();

        self.store
            .update_closing(&suggestion.id, &closing, &metrics)
            .await?;

        info!(
            tracking_id = %suggestion.id,
            clv_percent = %metrics.clv_percent.round_dp(4),
            cents_clv = metrics.cents_clv,
            "Closing line recorded"
        );

        Ok(ClosingLineReport {
            tracking_id: suggestion.id.clone(),
            bet_id: suggestion.bet_id.clone(),
            opening: LineSummary {
                odds_decimal: suggestion.opening_odds_decimal,
                odds_american: suggestion.opening_odds_american,
                sportsbook: suggestion.opening_sportsbook.clone(),
                implied_probability: suggestion.opening_implied_probability,
            },
            closing: LineSummary {
                odds_decimal: closing.closing_odds_decimal,
                odds_american: closing.closing_odds_american,
                sportsbook: closing.closing_sportsbook,
                implied_probability: metrics.closing_implied_probability,
            },
            metrics,
        })
    }

    /// Record the settlement of a suggestion.
    ///
    /// Win, loss and push settle the suggestion and are counted once in the
    /// daily summary for its opening date. Calls on an already settled
    /// suggestion change nothing and return `newly_settled: false`.
    ///
    /// If the summary write fails the settlement is rolled back before the
    /// error is returned, so the call can be retried.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] for an unknown key, a validation error if
    /// the outcome is missing, or a store error.
    pub async fn record_result(&self, key: &str, input: ResultInput) -> Result<ResultAck> {
        let outcome = input
            .outcome
            .ok_or_else(|| ValidationError::missing("outcome"))?;
        let suggestion = self.get(key).await?;

        let now = Utc::now();
        let result = GameResult {
            outcome,
            prediction_correct: input.prediction_correct,
            recorded_at: now,
        };
        let settled_at = outcome.is_terminal().then_some(now);

        let written = self
            .store
            .update_result(&suggestion.id, &result, settled_at)
            .await?;

        if !written {
            warn!(
                tracking_id = %suggestion.id,
                outcome = %outcome,
                "Suggestion already settled, ignoring result"
            );
            let previous = suggestion.result.clone().unwrap_or(result);
            return Ok(ResultAck {
                tracking_id: suggestion.id,
                bet_id: suggestion.bet_id,
                result: previous,
                newly_settled: false,
            });
        }

        if let Some(settled_at) = settled_at {
            if let Err(e) = self
                .aggregator
                .update_summary(suggestion.opening_date(), outcome, input.prediction_correct)
                .await
            {
                self.undo_settlement(&suggestion, settled_at).await;
                return Err(e);
            }
        }

        info!(
            tracking_id = %suggestion.id,
            outcome = %outcome,
            correct = input.prediction_correct,
            "Result recorded"
        );

        Ok(ResultAck {
            tracking_id: suggestion.id,
            bet_id: suggestion.bet_id,
            result,
            newly_settled: settled_at.is_some(),
        })
    }

    /// Put back the pre-settlement state after the summary write failed, so
    /// a retry settles and counts the suggestion again.
    async fn undo_settlement(&self, suggestion: &TrackedSuggestion, settled_at: DateTime<Utc>) {
        match self
            .store
            .revert_result(&suggestion.id, suggestion.result.as_ref(), settled_at)
            .await
        {
            Ok(true) => {
                debug!(tracking_id = %suggestion.id, "Settlement rolled back");
            }
            Ok(false) => {
                warn!(tracking_id = %suggestion.id, "Settlement changed before rollback");
            }
            Err(e) => {
                error!(
                    tracking_id = %suggestion.id,
                    error = %e,
                    "Failed to roll back settlement"
                );
            }
        }
    }
}
