//! Parlay legs and market classification.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::GameKey;

/// Market families that carry a contradiction rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarketKind {
    /// `moneyline` / `h2h`.
    Moneyline,
    /// `total` / `totals`.
    Totals,
    /// `spread` / `spreads` / `point_spread`.
    Spread,
    /// Any market without a known rule.
    Other,
}

impl MarketKind {
    /// Classify a market type string, ignoring case and surrounding space.
    #[must_use]
    pub fn parse(market_type: &str) -> Self {
        match market_type.trim().to_ascii_lowercase().as_str() {
            "moneyline" | "h2h" => Self::Moneyline,
            "total" | "totals" => Self::Totals,
            "spread" | "spreads" | "point_spread" => Self::Spread,
            _ => Self::Other,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Moneyline => "moneyline",
            Self::Totals => "totals",
            Self::Spread => "spread",
            Self::Other => "other",
        }
    }
}

/// One selection within a parlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leg {
    #[serde(alias = "gameKey")]
    pub game: GameKey,
    pub market_type: String,
    pub selection: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub american_odds: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimal_odds: Option<Decimal>,
}

impl Leg {
    /// Create a leg without prices.
    pub fn new(
        game: impl Into<GameKey>,
        market_type: impl Into<String>,
        selection: impl Into<String>,
    ) -> Self {
        Self {
            game: game.into(),
            market_type: market_type.into(),
            selection: selection.into(),
            american_odds: None,
            decimal_odds: None,
        }
    }

    /// Create a leg keyed by its home and away teams.
    pub fn for_matchup(
        home: &str,
        away: &str,
        market_type: impl Into<String>,
        selection: impl Into<String>,
    ) -> Self {
        Self::new(GameKey::from_teams(home, away), market_type, selection)
    }

    #[must_use]
    pub fn with_american_odds(mut self, odds: i32) -> Self {
        self.american_odds = Some(odds);
        self
    }

    #[must_use]
    pub fn with_decimal_odds(mut self, odds: Decimal) -> Self {
        self.decimal_odds = Some(odds);
        self
    }

    #[must_use]
    pub fn market(&self) -> MarketKind {
        MarketKind::parse(&self.market_type)
    }
}
