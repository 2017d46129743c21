//! Static stat blocks for units, zombies and buildings.

use crate::constants::*;
use crate::enums::{BuildingType, UnitKind, ZombieKind};
use crate::types::Cost;

/// Base combat and movement values shared by units and zombies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombatStats {
    pub hp: f64,
    pub speed: f64,
    pub attack: f64,
    pub range: f64,
    /// Seconds between attacks.
    pub cooldown: f64,
}

/// Stat block for a zombie variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZombieStats {
    pub combat: CombatStats,
    /// Visual weight, used by renderers only.
    pub size: f64,
}

pub fn unit_stats(kind: UnitKind) -> CombatStats {
    match kind {
        UnitKind::Worker => CombatStats {
            hp: 55.0,
            speed: 55.0,
            attack: 4.0,
            range: 25.0,
            cooldown: 1.4,
        },
        UnitKind::Soldier => CombatStats {
            hp: 90.0,
            speed: 72.0,
            attack: 18.0,
            range: 55.0,
            cooldown: 1.1,
        },
        UnitKind::Hero => CombatStats {
            hp: 220.0,
            speed: 82.0,
            attack: 26.0,
            range: 65.0,
            cooldown: 0.9,
        },
    }
}

pub fn zombie_stats(kind: ZombieKind) -> ZombieStats {
    let (hp, speed, attack, range, cooldown, size) = match kind {
        ZombieKind::Shambler => (60.0, 42.0, 10.0, 18.0, 1.2, 8.0),
        ZombieKind::Runner => (45.0, 85.0, 8.0, 18.0, 0.9, 7.0),
        ZombieKind::Brute => (150.0, 30.0, 22.0, 22.0, 1.6, 12.0),
        ZombieKind::Spitter => (70.0, 34.0, 12.0, 80.0, 1.8, 9.0),
        ZombieKind::Boss => (420.0, 26.0, 32.0, 28.0, 1.5, 18.0),
    };
    ZombieStats {
        combat: CombatStats {
            hp,
            speed,
            attack,
            range,
            cooldown,
        },
        size,
    }
}

/// Construction cost and hit points for placeable building types.
pub fn construction(kind: BuildingType) -> Option<(Cost, f64)> {
    match kind {
        BuildingType::Barracks => Some((BARRACKS_COST, BARRACKS_HP)),
        BuildingType::Tower => Some((TOWER_COST, TOWER_HP)),
        BuildingType::Base => None,
    }
}

/// Damage of one tower shot for a nation at `tech_tier`.
pub fn tower_damage(tech_tier: u8) -> f64 {
    TOWER_BASE_DAMAGE + f64::from(tech_tier) * TOWER_DAMAGE_PER_TIER
}
