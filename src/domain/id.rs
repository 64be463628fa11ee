//! Domain identifier types with proper encapsulation.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Number of hex characters kept from the bet id digest.
const BET_ID_LEN: usize = 16;

/// Internal identifier of a tracked suggestion (UUID v4).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackingId(String);

impl TrackingId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TrackingId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Hash-derived identifier of a tracked bet.
///
/// The creation timestamp is part of the hash input, so tracking the same
/// game/market/selection twice yields two different bet ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BetId(String);

impl BetId {
    /// Derive a bet id from the bet's business keys and its creation time.
    #[must_use]
    pub fn derive(
        game_id: &str,
        market_type: &str,
        selection: &str,
        created_at: DateTime<Utc>,
    ) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(game_id.as_bytes());
        hasher.update(b"|");
        hasher.update(market_type.as_bytes());
        hasher.update(b"|");
        hasher.update(selection.as_bytes());
        hasher.update(b"|");
        hasher.update(
            created_at
                .to_rfc3339_opts(SecondsFormat::Nanos, true)
                .as_bytes(),
        );
        let mut digest = hex::encode(hasher.finalize());
        digest.truncate(BET_ID_LEN);
        Self(digest)
    }

    /// Wrap an existing bet id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for BetId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Grouping key for legs of the same game: `"{home}_{away}"`.
///
/// Not unique across sports or dates on its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameKey(String);

impl GameKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Build the key from team identifiers.
    #[must_use]
    pub fn from_teams(home: &str, away: &str) -> Self {
        Self(format!("{home}_{away}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for GameKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for GameKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
