//! Tracked suggestions and their two independent completions.
//!
//! A [`TrackedSuggestion`] is created with its opening price. A closing line
//! (with derived [`ClvMetrics`]) and a [`GameResult`] can each be attached
//! later, in either order or not at all.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::OddsError;
use super::id::{BetId, TrackingId};
use super::odds::{compute_cents_clv, compute_clv, implied_probability};

/// Settlement outcome of a bet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
    Push,
    Cancelled,
}

impl Outcome {
    /// Win, loss and push settle a bet; a cancellation does not.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Win | Self::Loss | Self::Push)
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Win => "win",
            Self::Loss => "loss",
            Self::Push => "push",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Outcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "win" => Ok(Self::Win),
            "loss" => Ok(Self::Loss),
            "push" => Ok(Self::Push),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            other => Err(format!("unknown outcome '{other}'")),
        }
    }
}

/// The market's final price before the event started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosingLine {
    pub closing_odds_decimal: Decimal,
    pub closing_odds_american: i32,
    pub closing_sportsbook: String,
    pub recorded_at: DateTime<Utc>,
}

/// Value metrics derived from the opening and closing prices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClvMetrics {
    pub clv_decimal: Decimal,
    pub clv_percent: Decimal,
    pub cents_clv: i64,
    pub closing_implied_probability: Decimal,
}

impl ClvMetrics {
    /// Compute all metrics from the opening price and a closing line.
    ///
    /// # Errors
    /// Returns an error if any price is zero or non-positive.
    pub fn compute(
        opening_decimal: Decimal,
        opening_american: i32,
        closing: &ClosingLine,
    ) -> Result<Self, OddsError> {
        let clv = compute_clv(opening_decimal, closing.closing_odds_decimal)?;
        Ok(Self {
            clv_decimal: clv.clv_decimal,
            clv_percent: clv.clv_percent,
            cents_clv: compute_cents_clv(opening_american, closing.closing_odds_american)?,
            closing_implied_probability: implied_probability(closing.closing_odds_decimal)?,
        })
    }
}

/// Recorded settlement of a suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    pub outcome: Outcome,
    pub prediction_correct: bool,
    pub recorded_at: DateTime<Utc>,
}

/// A betting suggestion tracked from emission to settlement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedSuggestion {
    pub id: TrackingId,
    pub bet_id: BetId,
    pub sport: String,
    pub home_team: String,
    pub away_team: String,
    pub market_type: String,
    pub selection: String,
    pub game_id: String,
    pub commence_time: DateTime<Utc>,
    pub opening_odds_decimal: Decimal,
    pub opening_odds_american: i32,
    pub opening_sportsbook: String,
    pub opening_implied_probability: Decimal,
    pub suggested_probability: Option<Decimal>,
    pub ev_at_suggestion: Option<Decimal>,
    pub kelly_size_suggested: Option<Decimal>,
    pub source: Option<String>,
    pub confidence_score: Option<Decimal>,
    pub model_version: Option<String>,
    pub notes: Option<String>,
    pub opened_at: DateTime<Utc>,
    pub closing: Option<ClosingLine>,
    pub clv: Option<ClvMetrics>,
    pub result: Option<GameResult>,
    pub settled_at: Option<DateTime<Utc>>,
}

impl TrackedSuggestion {
    /// Attach (or replace) the closing line and recompute the metrics.
    ///
    /// Nothing is modified if the metrics cannot be computed.
    ///
    /// # Errors
    /// Returns an error if any price is invalid.
    pub fn attach_closing(&mut self, closing: ClosingLine) -> Result<&ClvMetrics, OddsError> {
        let metrics = ClvMetrics::compute(
            self.opening_odds_decimal,
            self.opening_odds_american,
            &closing,
        )?;
        self.closing = Some(closing);
        let metrics: &ClvMetrics = self.clv.insert(metrics);
        Ok(metrics)
    }

    /// Date used to bucket this suggestion in daily summaries.
    #[must_use]
    pub fn opening_date(&self) -> NaiveDate {
        self.opened_at.date_naive()
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.settled_at.is_some()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    pub(crate) fn sample(opened_at: DateTime<Utc>) -> TrackedSuggestion {
        TrackedSuggestion {
            id: TrackingId::generate(),
            bet_id: BetId::derive("g1", "h2h", "A", opened_at),
            sport: "mlb".into(),
            home_team: "A".into(),
            away_team: "B".into(),
            market_type: "h2h".into(),
            selection: "A".into(),
            game_id: "g1".into(),
            commence_time: opened_at + chrono::Duration::hours(6),
            opening_odds_decimal: dec!(1.9524),
            opening_odds_american: -105,
            opening_sportsbook: "book".into(),
            opening_implied_probability: dec!(1) / dec!(1.9524),
            suggested_probability: Some(dec!(0.55)),
            ev_at_suggestion: None,
            kelly_size_suggested: None,
            source: None,
            confidence_score: None,
            model_version: None,
            notes: None,
            opened_at,
            closing: None,
            clv: None,
            result: None,
            settled_at: None,
        }
    }

    fn closing(decimal: Decimal, american: i32) -> ClosingLine {
        ClosingLine {
            closing_odds_decimal: decimal,
            closing_odds_american: american,
            closing_sportsbook: "book".into(),
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn outcome_terminality() {
        assert!(Outcome::Win.is_terminal());
        assert!(Outcome::Loss.is_terminal());
        assert!(Outcome::Push.is_terminal());
        assert!(!Outcome::Cancelled.is_terminal());
    }

    #[test]
    fn outcome_parses_case_insensitively() {
        assert_eq!("WIN".parse::<Outcome>().unwrap(), Outcome::Win);
        assert_eq!("canceled".parse::<Outcome>().unwrap(), Outcome::Cancelled);
        assert!("draw".parse::<Outcome>().is_err());
    }

    #[test]
    fn attaching_closing_computes_metrics() {
        let mut s = sample(Utc::now());
        let metrics = s.attach_closing(closing(dec!(1.9091), -110)).unwrap().clone();
        assert_eq!(metrics.cents_clv, 5);
        assert!((metrics.clv_percent - dec!(-2.22)).abs() < dec!(0.01));
        assert!(s.closing.is_some());
        assert_eq!(s.clv, Some(metrics));
    }

    #[test]
    fn reattaching_closing_overwrites() {
        let mut s = sample(Utc::now());
        s.attach_closing(closing(dec!(1.9091), -110)).unwrap();
        s.attach_closing(closing(dec!(2.0), 100)).unwrap();

        let closing = s.closing.as_ref().unwrap();
        assert_eq!(closing.closing_odds_american, 100);
        let clv = s.clv.as_ref().unwrap();
        assert_eq!(clv.closing_implied_probability, dec!(0.5));
        // -105 → +100 crosses signs: (2.0 - 1.9524) * 100 ≈ 4.76
        assert_eq!(clv.cents_clv, 5);
    }

    #[test]
    fn invalid_closing_leaves_record_untouched() {
        let mut s = sample(Utc::now());
        assert!(s.attach_closing(closing(dec!(1.9), 0)).is_err());
        assert!(s.closing.is_none());
        assert!(s.clv.is_none());
    }

    #[test]
    fn opening_date_uses_opened_at() {
        let opened = Utc.with_ymd_and_hms(2026, 4, 2, 23, 59, 0).unwrap();
        let s = sample(opened);
        assert_eq!(s.opening_date(), NaiveDate::from_ymd_opt(2026, 4, 2).unwrap());
    }

    #[test]
    fn suggestion_serializes_in_camel_case() {
        let s = sample(Utc::now());
        let json = serde_json::to_value(&s).unwrap();
        assert!(json.get("betId").is_some());
        assert!(json.get("openingImpliedProbability").is_some());
        assert!(json["closing"].is_null());
    }
}
