//! Plain-text and JSON rendering of battles and rosters.

use codebeast_core::combatant::Side;
use codebeast_core::data::{Matchup, UnitSnapshot};
use codebeast_core::passive::PassiveEngine;
use codebeast_core::result::{BattleResult, Outcome};
use serde::Serialize;

use crate::error::Result;

/// JSON document written by `simulate --json`.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    /// Matchup label.
    pub matchup: &'a str,
    /// Turn cap the battle ran with.
    pub turn_cap: u32,
    /// Winning side, `null` for a draw.
    pub winning_side: Option<Side>,
    /// Full battle result.
    pub result: &'a BattleResult,
}

fn outcome_label(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::AttackerWin => "attacker win",
        Outcome::DefenderWin => "defender win",
        Outcome::Draw => "draw",
    }
}

/// Render the turn log as a fixed-width table followed by a summary line.
#[must_use]
pub fn render_turn_table(result: &BattleResult) -> String {
    let mut out = format!(
        "{:>4}  {:<24} {:<24} {:>6} {:>6}  {:>5}\n",
        "turn", "actor", "target", "dmg", "hp", "speed"
    );
    for entry in result.turn_log() {
        let actor = format!("{} {}", entry.actor.side.label(), entry.actor.name);
        let target = format!("{} {}", entry.target.side.label(), entry.target.name);
        let ko = if entry.ko { " KO" } else { "" };
        out.push_str(&format!(
            "{:>4}  {:<24} {:<24} {:>6} {:>6}  {:>5}{ko}\n",
            entry.turn, actor, target, entry.damage, entry.target_hp_after, entry.actor_speed
        ));
    }
    out.push_str(&render_summary(result));
    out
}

/// One-line summary: outcome, turns and survivors.
#[must_use]
pub fn render_summary(result: &BattleResult) -> String {
    format!(
        "{} after {} turn(s); survivors: {} attacker(s), {} defender(s)\n",
        outcome_label(result.outcome()),
        result.total_turns(),
        result.attacker_survivors(),
        result.defender_survivors()
    )
}

/// Render a battle as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_json(matchup: &Matchup, result: &BattleResult) -> Result<String> {
    let report = JsonReport {
        matchup: &matchup.name,
        turn_cap: matchup.config.turn_cap,
        winning_side: result.winning_side(),
        result,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

fn describe_side(out: &mut String, engine: &PassiveEngine, side: Side, units: &[UnitSnapshot]) {
    for (index, unit) in units.iter().enumerate() {
        let meta = unit.meta();
        let description = engine.passive_description(&meta);
        let sector = if unit.sector_key.is_empty() {
            "-"
        } else {
            unit.sector_key.as_str()
        };
        let passives = if description.is_empty() {
            "no passives"
        } else {
            description.as_str()
        };
        out.push_str(&format!(
            "{}#{index} {} ({}, {sector}): {passives}\n",
            side.label(),
            unit.name,
            unit.rarity.as_str(),
        ));
    }
}

/// Every unit's resolved passive description, attackers first.
#[must_use]
pub fn render_descriptions(engine: &PassiveEngine, matchup: &Matchup) -> String {
    let mut out = String::new();
    describe_side(&mut out, engine, Side::Attacker, &matchup.attackers);
    describe_side(&mut out, engine, Side::Defender, &matchup.defenders);
    out
}
