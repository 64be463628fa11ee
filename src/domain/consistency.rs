//! Same-game contradiction detection for parlay legs.
//!
//! Legs are grouped by [`GameKey`] and every unordered pair inside a group is
//! checked against the rule of its market:
//!
//! | Market | Contradictory when |
//! |---|---|
//! | moneyline / h2h | selections differ |
//! | total / totals | one selection says "over", the other "under" |
//! | spread / spreads / point_spread | selections differ |
//!
//! Pairs on different markets never contradict each other.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::id::GameKey;
use super::leg::{Leg, MarketKind};

/// Two legs of the same game that cannot both be backed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContradictingPair {
    /// Index of the earlier leg in the submitted order.
    pub first: usize,
    /// Index of the later leg in the submitted order.
    pub second: usize,
    pub reason: String,
}

/// All contradicting pairs found within one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContradictionReport {
    pub game: GameKey,
    pub contradicting_pairs: Vec<ContradictingPair>,
}

/// Outcome of validating a parlay candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParlayValidation {
    pub is_valid: bool,
    /// One report per game that produced at least one contradicting pair.
    pub errors: Vec<ContradictionReport>,
}

/// Why two legs contradict, or `None` if they can coexist.
#[must_use]
pub fn contradiction(a: &Leg, b: &Leg) -> Option<String> {
    let market = a.market();
    if market != b.market() {
        return None;
    }

    match market {
        MarketKind::Moneyline if a.selection != b.selection => Some(format!(
            "moneyline selections '{}' and '{}' back different sides",
            a.selection, b.selection
        )),
        MarketKind::Spread if a.selection != b.selection => Some(format!(
            "spread selections '{}' and '{}' conflict on the same game",
            a.selection, b.selection
        )),
        MarketKind::Totals if is_over_under(&a.selection, &b.selection) => Some(format!(
            "total selections '{}' and '{}' take both over and under",
            a.selection, b.selection
        )),
        _ => None,
    }
}

fn is_over_under(a: &str, b: &str) -> bool {
    let (a, b) = (a.to_lowercase(), b.to_lowercase());
    (a.contains("over") && b.contains("under")) || (a.contains("under") && b.contains("over"))
}

/// Group leg indices by game, keeping first-appearance order of games and
/// input order within each game.
fn group_by_game(legs: &[Leg]) -> Vec<(&GameKey, Vec<usize>)> {
    let mut positions: HashMap<&GameKey, usize> = HashMap::new();
    let mut groups: Vec<(&GameKey, Vec<usize>)> = Vec::new();

    for (index, leg) in legs.iter().enumerate() {
        match positions.get(&leg.game) {
            Some(&slot) => groups[slot].1.push(index),
            None => {
                positions.insert(&leg.game, groups.len());
                groups.push((&leg.game, vec![index]));
            }
        }
    }

    groups
}

/// Check a parlay candidate for same-game contradictions.
#[must_use]
pub fn validate_parlay(legs: &[Leg]) -> ParlayValidation {
    let mut errors = Vec::new();

    for (game, indices) in group_by_game(legs) {
        if indices.len() < 2 {
            continue;
        }

        let mut pairs = Vec::new();
        for (offset, &first) in indices.iter().enumerate() {
            for &second in &indices[offset + 1..] {
                if let Some(reason) = contradiction(&legs[first], &legs[second]) {
                    pairs.push(ContradictingPair {
                        first,
                        second,
                        reason,
                    });
                }
            }
        }

        if !pairs.is_empty() {
            errors.push(ContradictionReport {
                game: game.clone(),
                contradicting_pairs: pairs,
            });
        }
    }

    ParlayValidation {
        is_valid: errors.is_empty(),
        errors,
    }
}

/// Drop legs that contradict an earlier accepted leg of the same game.
///
/// Greedy in input order: a rejected leg is never compared again, so the
/// result depends on ordering and is not a maximum contradiction-free subset.
#[must_use]
pub fn filter_contradictions(legs: &[Leg]) -> Vec<Leg> {
    let mut accepted: Vec<Leg> = Vec::with_capacity(legs.len());

    for leg in legs {
        let conflicts = accepted
            .iter()
            .filter(|kept| kept.game == leg.game)
            .any(|kept| contradiction(kept, leg).is_some());
        if !conflicts {
            accepted.push(leg.clone());
        }
    }

    accepted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leg(game: &str, market: &str, selection: &str) -> Leg {
        Leg::new(game, market, selection)
    }

    #[test]
    fn opposite_moneyline_sides_contradict() {
        let result = validate_parlay(&[leg("A_B", "h2h", "A"), leg("A_B", "h2h", "B")]);
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].game.as_str(), "A_B");
        assert_eq!(result.errors[0].contradicting_pairs.len(), 1);
        let pair = &result.errors[0].contradicting_pairs[0];
        assert_eq!((pair.first, pair.second), (0, 1));
        assert!(pair.reason.contains("moneyline"));
    }

    #[test]
    fn identical_moneyline_selections_are_fine() {
        let result = validate_parlay(&[leg("A_B", "h2h", "A"), leg("A_B", "moneyline", "A")]);
        assert!(result.is_valid);
    }

    #[test]
    fn over_and_under_contradict() {
        let result = validate_parlay(&[
            leg("A_B", "totals", "Over 8.5"),
            leg("A_B", "totals", "Under 8.5"),
        ]);
        assert!(!result.is_valid);
        assert!(result.errors[0].contradicting_pairs[0]
            .reason
            .contains("over and under"));
    }

    #[test]
    fn totals_match_case_insensitively() {
        assert!(contradiction(&leg("A_B", "total", "OVER 210"), &leg("A_B", "Totals", "under 215"))
            .is_some());
    }

    #[test]
    fn two_overs_do_not_contradict() {
        let result = validate_parlay(&[
            leg("A_B", "totals", "Over 8.5"),
            leg("A_B", "totals", "Over 9.5"),
        ]);
        assert!(result.is_valid);
    }

    #[test]
    fn different_spread_selections_contradict() {
        let result = validate_parlay(&[
            leg("A_B", "spreads", "A -3.5"),
            leg("A_B", "point_spread", "B +3.5"),
        ]);
        assert!(!result.is_valid);
    }

    #[test]
    fn cross_market_pairs_never_contradict() {
        let result = validate_parlay(&[
            leg("A_B", "h2h", "A"),
            leg("A_B", "totals", "Under 8.5"),
            leg("A_B", "spreads", "B +1.5"),
        ]);
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn unknown_markets_never_contradict() {
        let result = validate_parlay(&[
            leg("A_B", "player_points", "X over 20"),
            leg("A_B", "player_points", "X under 20"),
        ]);
        assert!(result.is_valid);
    }

    #[test]
    fn legs_on_different_games_are_independent() {
        let result = validate_parlay(&[leg("A_B", "h2h", "A"), leg("C_D", "h2h", "D")]);
        assert!(result.is_valid);
    }

    #[test]
    fn reports_keep_original_indices_per_game() {
        let result = validate_parlay(&[
            leg("C_D", "h2h", "C"),
            leg("A_B", "h2h", "A"),
            leg("C_D", "totals", "Over 5"),
            leg("A_B", "h2h", "B"),
            leg("C_D", "h2h", "D"),
        ]);
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 2);
        assert_eq!(result.errors[0].game.as_str(), "C_D");
        let cd = &result.errors[0].contradicting_pairs[0];
        assert_eq!((cd.first, cd.second), (0, 4));
        let ab = &result.errors[1].contradicting_pairs[0];
        assert_eq!((ab.first, ab.second), (1, 3));
    }

    #[test]
    fn every_pair_in_a_group_is_examined() {
        let result = validate_parlay(&[
            leg("A_B", "h2h", "A"),
            leg("A_B", "h2h", "B"),
            leg("A_B", "h2h", "Draw"),
        ]);
        assert_eq!(result.errors[0].contradicting_pairs.len(), 3);
    }

    #[test]
    fn empty_and_single_leg_parlays_are_valid() {
        assert!(validate_parlay(&[]).is_valid);
        assert!(validate_parlay(&[leg("A_B", "h2h", "A")]).is_valid);
    }

    #[test]
    fn filter_keeps_first_come_legs() {
        let a = leg("A_B", "h2h", "A");
        let b = leg("A_B", "h2h", "B");
        let c = leg("A_B", "totals", "Over 8.5");

        let kept = filter_contradictions(&[a.clone(), b.clone(), c.clone()]);
        assert_eq!(kept, vec![a.clone(), c.clone()]);

        let reversed = filter_contradictions(&[c.clone(), b.clone(), a]);
        assert_eq!(reversed, vec![c, b]);
    }

    #[test]
    fn filter_ignores_rejected_legs_when_comparing() {
        // B is rejected against A; Over is kept; Under is rejected against Over.
        let kept = filter_contradictions(&[
            leg("A_B", "h2h", "A"),
            leg("A_B", "h2h", "B"),
            leg("A_B", "totals", "Over 8.5"),
            leg("A_B", "totals", "Under 8.5"),
            leg("A_B", "h2h", "A"),
        ]);
        let selections: Vec<_> = kept.iter().map(|l| l.selection.as_str()).collect();
        assert_eq!(selections, vec!["A", "Over 8.5", "A"]);
    }

    #[test]
    fn filter_output_is_always_valid() {
        let legs = vec![
            leg("A_B", "spreads", "A -1.5"),
            leg("C_D", "h2h", "C"),
            leg("A_B", "spreads", "B +1.5"),
            leg("C_D", "h2h", "D"),
            leg("C_D", "totals", "Under 40"),
        ];
        let kept = filter_contradictions(&legs);
        assert!(validate_parlay(&kept).is_valid);
        assert_eq!(kept.len(), 3);
    }
}
