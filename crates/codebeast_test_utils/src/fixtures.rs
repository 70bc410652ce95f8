//! Test fixtures and helpers.
//!
//! Pre-built units and rosters for consistent testing. Stats are picked so
//! the expected damage numbers are easy to work out by hand.

use codebeast_core::data::{Matchup, Rarity, UnitSnapshot};

/// Plain unit with no rarity, sector or passive.
#[must_use]
pub fn unit(id: u64, hp: u32, attack: u32, defense: u32, speed: u32) -> UnitSnapshot {
    UnitSnapshot::new(id, format!("Unit{id}"), hp, attack, defense, speed)
}

/// Slow, durable unit that barely scratches anything.
#[must_use]
pub fn tank(id: u64, speed: u32) -> UnitSnapshot {
    UnitSnapshot::new(id, format!("Tank{id}"), 500, 1, 50, speed)
}

/// Fast unit that one-shots almost anything and folds to a single hit.
#[must_use]
pub fn glass_cannon(id: u64, speed: u32) -> UnitSnapshot {
    UnitSnapshot::new(id, format!("Cannon{id}"), 10, 100, 0, speed)
}

/// Unit with a sector and rarity, resolving its passive from the sector.
#[must_use]
pub fn sector_unit(id: u64, sector: &str, rarity: Rarity) -> UnitSnapshot {
    unit(id, 120, 30, 10, 12)
        .with_sector(sector)
        .with_rarity(rarity)
}

/// Roster of `size` identical plain units with sequential ids from `first_id`.
#[must_use]
pub fn mirror_squad(first_id: u64, size: usize) -> Vec<UnitSnapshot> {
    (0..size as u64)
        .map(|i| unit(first_id + i, 100, 25, 10, 10))
        .collect()
}

/// Three-on-three matchup mixing sectors, rarities and an explicit passive.
#[must_use]
pub fn mixed_matchup() -> Matchup {
    let attackers = vec![
        sector_unit(1, "tech", Rarity::Rare),
        sector_unit(2, "bio", Rarity::Legendary),
        unit(3, 90, 40, 5, 18).with_passive("arcane_surge").with_rarity(Rarity::Epic),
    ];
    let defenders = vec![
        sector_unit(11, "arcane", Rarity::Uncommon),
        sector_unit(12, "tech", Rarity::Common),
        unit(13, 150, 20, 25, 8).with_sector("bio"),
    ];
    let mut matchup = Matchup::new(attackers, defenders);
    matchup.name = "mixed".to_string();
    matchup
}
