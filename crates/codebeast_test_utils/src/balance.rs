//! Balance testing utilities.
//!
//! Tools for running many battles to check how sectors, rarities and
//! passives stack up against each other.

use codebeast_core::battle::BattleSimulator;
use codebeast_core::data::{Matchup, UnitSnapshot};
use codebeast_core::result::{BattleResult, Outcome};

/// Sector keys swept by [`sector_matrix`]; the empty key has no default passive.
pub const SWEEP_SECTORS: [&str; 4] = ["tech", "bio", "arcane", ""];

/// Statistics for a set of battles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BattleStats {
    /// Total battles run.
    pub total_battles: u32,
    /// Wins for the attacking side.
    pub attacker_wins: u32,
    /// Wins for the defending side.
    pub defender_wins: u32,
    /// Draws (turn cap with equal hp, or mutual elimination).
    pub draws: u32,
    /// Sum of turns across all battles.
    pub total_turns: u64,
}

impl BattleStats {
    /// Aggregate a set of results.
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a BattleResult>) -> Self {
        let mut stats = Self::default();
        for result in results {
            stats.record(result);
        }
        stats
    }

    /// Add one result to the totals.
    pub fn record(&mut self, result: &BattleResult) {
        self.total_battles += 1;
        self.total_turns += u64::from(result.total_turns());
        match result.outcome() {
            Outcome::AttackerWin => self.attacker_wins += 1,
            Outcome::DefenderWin => self.defender_wins += 1,
            Outcome::Draw => self.draws += 1,
        }
    }

    /// Win rate for the attacking side (0.0 to 1.0).
    pub fn win_rate_attacker(&self) -> f64 {
        if self.total_battles == 0 {
            return 0.5;
        }
        f64::from(self.attacker_wins) / f64::from(self.total_battles)
    }

    /// Win rate for the defending side (0.0 to 1.0).
    pub fn win_rate_defender(&self) -> f64 {
        if self.total_battles == 0 {
            return 0.5;
        }
        f64::from(self.defender_wins) / f64::from(self.total_battles)
    }

    /// Average turns to resolution.
    pub fn avg_turns(&self) -> f64 {
        if self.total_battles == 0 {
            return 0.0;
        }
        self.total_turns as f64 / f64::from(self.total_battles)
    }

    /// Check if the attacker win rate is within an acceptable range.
    pub fn is_balanced(&self, min_rate: f64, max_rate: f64) -> bool {
        let rate = self.win_rate_attacker();
        rate >= min_rate && rate <= max_rate
    }
}

/// Resolve every matchup with its own configuration and aggregate.
pub fn run_matchups(simulator: &BattleSimulator, matchups: &[Matchup]) -> BattleStats {
    let mut stats = BattleStats::default();
    for matchup in matchups {
        let result = simulator.resolve_matchup(matchup);
        tracing::debug!(
            matchup = %matchup.name,
            outcome = ?result.outcome(),
            turns = result.total_turns(),
            "Balance battle"
        );
        stats.record(&result);
    }
    stats
}

/// Fight `a` against `b` from both sides, so turn-order advantage cancels.
///
/// "Attacker" in the returned stats means roster `a`.
pub fn side_swapped_stats(
    simulator: &BattleSimulator,
    a: &[UnitSnapshot],
    b: &[UnitSnapshot],
) -> BattleStats {
    let forward = simulator.resolve(a, b);
    let reverse = simulator.resolve(b, a);

    let mut stats = BattleStats::default();
    stats.record(&forward);
    stats.total_battles += 1;
    stats.total_turns += u64::from(reverse.total_turns());
    match reverse.outcome() {
        Outcome::AttackerWin => stats.defender_wins += 1,
        Outcome::DefenderWin => stats.attacker_wins += 1,
        Outcome::Draw => stats.draws += 1,
    }
    stats
}

/// Generate a sector-vs-sector outcome matrix from one stat template.
///
/// Every entry pits the template with the first sector (as attacker)
/// against the template with the second sector (as defender).
pub fn sector_matrix(
    simulator: &BattleSimulator,
    template: &UnitSnapshot,
) -> Vec<(&'static str, &'static str, Outcome)> {
    let mut results = Vec::new();

    for attacker in SWEEP_SECTORS {
        for defender in SWEEP_SECTORS {
            let a = template.clone().with_sector(attacker);
            let d = template.clone().with_sector(defender);
            let outcome = simulator.resolve(&[a], &[d]).outcome();
            results.push((attacker, defender, outcome));
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{glass_cannon, mirror_squad, mixed_matchup, unit};
    use codebeast_core::data::Rarity;

    #[test]
    fn test_empty_stats() {
        let stats = BattleStats::default();
        assert!((stats.win_rate_attacker() - 0.5).abs() < f64::EPSILON);
        assert!((stats.avg_turns() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_stats_from_results() {
        let simulator = BattleSimulator::default();
        let win = simulator.resolve(&[glass_cannon(1, 20)], &[unit(2, 50, 10, 0, 5)]);
        let loss = simulator.resolve(&[unit(2, 50, 10, 0, 5)], &[glass_cannon(1, 20)]);
        let stats = BattleStats::from_results([&win, &win, &loss]);

        assert_eq!(stats.total_battles, 3);
        assert_eq!(stats.attacker_wins, 2);
        assert_eq!(stats.defender_wins, 1);
        assert_eq!(stats.total_turns, 3);
        assert!((stats.win_rate_attacker() - 2.0 / 3.0).abs() < 0.001);
        assert!(!stats.is_balanced(0.45, 0.55));
    }

    #[test]
    fn test_side_swap_cancels_turn_order() {
        let simulator = BattleSimulator::default();
        // Identical squads: whoever attacks moves first on speed ties.
        let stats = side_swapped_stats(&simulator, &mirror_squad(1, 2), &mirror_squad(10, 2));
        assert_eq!(stats.total_battles, 2);
        assert_eq!(stats.attacker_wins, 1);
        assert_eq!(stats.defender_wins, 1);
        assert!(stats.is_balanced(0.45, 0.55));
    }

    #[test]
    fn test_run_matchups() {
        let simulator = BattleSimulator::default();
        let stats = run_matchups(&simulator, &[mixed_matchup(), mixed_matchup()]);
        assert_eq!(stats.total_battles, 2);
        assert_eq!(stats.attacker_wins + stats.defender_wins + stats.draws, 2);
    }

    #[test]
    fn test_sector_matrix_covers_all_pairs() {
        let simulator = BattleSimulator::default();
        let template = unit(1, 150, 30, 10, 10).with_rarity(Rarity::Rare);
        let matrix = sector_matrix(&simulator, &template);
        assert_eq!(matrix.len(), SWEEP_SECTORS.len() * SWEEP_SECTORS.len());
        assert!(matrix.iter().any(|(a, d, _)| *a == "tech" && *d == "bio"));
    }
}
