//! Determinism testing utilities.
//!
//! Provides a harness for verifying that battle resolution produces
//! identical results given identical inputs.
//!
//! # Testing Strategy
//!
//! Battles must be 100% reproducible so a result can be re-derived from its
//! inputs. Sources of non-determinism include:
//!
//! - **HashMap iteration order**: Rust's default hasher is randomized.
//!   Rosters are vectors and every ordering decision uses explicit keys.
//!
//! - **Shared mutable state**: passives are shared across battles, so any
//!   state kept in an ability would leak between runs. Per-battle state lives
//!   in the battle's effect bags.
//!
//! - **System randomness**: the engine has none.
//!
//! # Test Levels
//!
//! 1. **Unit tests**: Individual rules (targeting, damage, passives)
//! 2. **Property tests**: Random rosters must still produce identical results
//! 3. **Integration tests**: Full matchups are reproducible
//! 4. **Parallel tests**: N battles on one shared simulator all match

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

use codebeast_core::battle::{decide_outcome, Battle, BattleSimulator};
use codebeast_core::data::UnitSnapshot;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of steps simulated per run.
    pub steps: u64,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for a deterministic run).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that the runs were deterministic, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Battle is non-deterministic!\n\
                 Runs: {}\n\
                 Steps: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.steps,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Result of parallel battle runs.
#[derive(Debug, Clone)]
pub struct ParallelBattleResult {
    /// Result hash from each battle.
    pub hashes: Vec<u64>,
    /// Number of battles run.
    pub num_battles: usize,
}

impl ParallelBattleResult {
    /// Check if all battles produced identical results.
    #[must_use]
    pub fn is_deterministic(&self) -> bool {
        self.hashes.windows(2).all(|w| w[0] == w[1])
    }

    /// Assert all battles matched.
    ///
    /// # Panics
    ///
    /// Panics if battles produced different hashes.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic() {
            let mut unique: Vec<u64> = self.hashes.clone();
            unique.sort_unstable();
            unique.dedup();
            panic!(
                "Parallel battles diverged!\n\
                 Battles: {}\n\
                 Unique hashes: {}\n\
                 All hashes: {:?}",
                self.num_battles,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// Run a stepped process multiple times and verify determinism.
///
/// # Arguments
///
/// * `runs` - Number of times to run
/// * `steps` - Number of steps per run
/// * `setup` - Function to create the initial state
/// * `step` - Function to advance the state by one step
/// * `hash` - Function to compute the state hash
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    steps: u64,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();

        for _ in 0..steps {
            step(&mut state);
        }

        hashes.push(hash(&state));
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        steps,
    }
}

/// Step the same rosters through `runs` battles and compare their hashes.
///
/// Each battle is stepped turn by turn up to the simulator's turn cap, so
/// `steps` is that cap. Steps after the battle ends are no-ops. The hash
/// covers the turn count, the whole log and the outcome.
///
/// # Example
///
/// ```
/// use codebeast_core::battle::BattleSimulator;
/// use codebeast_test_utils::determinism::verify_battle_determinism;
/// use codebeast_test_utils::fixtures::mixed_matchup;
///
/// let matchup = mixed_matchup();
/// let simulator = BattleSimulator::default();
/// verify_battle_determinism(&simulator, &matchup.attackers, &matchup.defenders, 5)
///     .assert_deterministic();
/// ```
pub fn verify_battle_determinism(
    simulator: &BattleSimulator,
    attackers: &[UnitSnapshot],
    defenders: &[UnitSnapshot],
    runs: usize,
) -> DeterminismResult {
    verify_determinism(
        runs,
        u64::from(simulator.config().turn_cap),
        || simulator.battle(attackers, defenders),
        |battle| {
            battle.step();
        },
        |battle| {
            compute_hash(&(battle.turn(), battle.log(), decide_outcome(battle.state())))
        },
    )
}

/// Resolve the same rosters on `num_battles` threads sharing one simulator.
///
/// Catches state leaking between concurrent battles through the shared
/// passive engine.
pub fn run_parallel_battles(
    simulator: &BattleSimulator,
    attackers: &[UnitSnapshot],
    defenders: &[UnitSnapshot],
    num_battles: usize,
) -> ParallelBattleResult {
    let hashes: Vec<u64> = thread::scope(|s| {
        let handles: Vec<_> = (0..num_battles)
            .map(|_| s.spawn(|| compute_hash(&simulator.resolve(attackers, defenders))))
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().expect("battle thread panicked"))
            .collect()
    });

    ParallelBattleResult {
        hashes,
        num_battles,
    }
}

/// Step two identical battles side by side, finding the first turn whose
/// log entry differs.
///
/// # Returns
///
/// `None` if the battles match throughout, `Some(turn)` at the first
/// mismatch (including one battle ending before the other).
pub fn find_first_divergence(
    simulator: &BattleSimulator,
    attackers: &[UnitSnapshot],
    defenders: &[UnitSnapshot],
) -> Option<u32> {
    let mut first: Battle<'_> = simulator.battle(attackers, defenders);
    let mut second: Battle<'_> = simulator.battle(attackers, defenders);

    loop {
        let turn = first.turn() + 1;
        match (first.step().cloned(), second.step().cloned()) {
            (None, None) => return None,
            (Some(a), Some(b)) if a == b => {}
            _ => return Some(turn),
        }
    }
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Proptest strategies for battle testing.
///
/// These strategies generate random but reproducible rosters for
/// property-based testing of battle rules.
pub mod strategies {
    use codebeast_core::data::{Rarity, UnitSnapshot};
    use proptest::prelude::*;

    /// Sector keys including one with no default passive.
    pub const SECTORS: [&str; 4] = ["tech", "bio", "arcane", "void"];

    /// Generate any rarity.
    pub fn arb_rarity() -> impl Strategy<Value = Rarity> {
        prop::sample::select(Rarity::ALL.to_vec())
    }

    /// Generate a sector key.
    pub fn arb_sector() -> impl Strategy<Value = String> {
        prop::sample::select(SECTORS.to_vec()).prop_map(str::to_string)
    }

    /// Generate an explicit passive key, sometimes unregistered.
    pub fn arb_passive_key() -> impl Strategy<Value = Option<String>> {
        proptest::option::of(
            prop::sample::select(vec![
                "tech_overclock",
                "bio_regeneration",
                "arcane_surge",
                "legendary_aura",
                "not_a_passive",
            ])
            .prop_map(str::to_string),
        )
    }

    /// Generate health values (1-500).
    pub fn arb_hp() -> impl Strategy<Value = u32> {
        1u32..500u32
    }

    /// Generate a unit with random stats and passive configuration.
    pub fn arb_unit(id: u64) -> impl Strategy<Value = UnitSnapshot> {
        (
            arb_hp(),
            0u32..120,
            0u32..80,
            0u32..40,
            arb_rarity(),
            arb_sector(),
            arb_passive_key(),
        )
            .prop_map(
                move |(hp, attack, defense, speed, rarity, sector, passive)| {
                    let unit =
                        UnitSnapshot::new(id, format!("Unit{id}"), hp, attack, defense, speed)
                            .with_rarity(rarity)
                            .with_sector(sector);
                    match passive {
                        Some(key) => unit.with_passive(key),
                        None => unit,
                    }
                },
            )
    }

    /// Generate a roster of 1 to `max_units` units with ids from `first_id`.
    pub fn arb_roster(first_id: u64, max_units: usize) -> impl Strategy<Value = Vec<UnitSnapshot>> {
        (1..=max_units).prop_flat_map(move |len| {
            (0..len as u64)
                .map(|i| arb_unit(first_id + i))
                .collect::<Vec<_>>()
        })
    }
}
