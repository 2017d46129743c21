//! ECS components for hecs entities.
//!
//! Units, zombies, buildings and resource nodes are entities; `Health`,
//! `Combat` and `Movement` are shared between them so the same systems can
//! drive all of them. Game logic lives in systems, not components.

use serde::{Deserialize, Serialize};

use crate::constants::{BUFF_ATTACK_FACTOR, BUFF_SPEED_FACTOR};
use crate::enums::*;
use crate::types::Position;

/// Hit points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub hp: f64,
    pub max_hp: f64,
}

impl Health {
    pub fn full(max_hp: f64) -> Self {
        Self { hp: max_hp, max_hp }
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0.0
    }
}

/// Owning nation index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner(pub usize);

/// Cooldown-gated attack.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Combat {
    /// Base attack (before buffs).
    pub attack: f64,
    pub range: f64,
    /// Seconds between attacks.
    pub cooldown: f64,
    /// Seconds until the next attack is allowed.
    pub cooldown_timer: f64,
}

impl Combat {
    pub fn ready(&self) -> bool {
        self.cooldown_timer <= 0.0
    }

    pub fn decay(&mut self, dt: f64) {
        if self.cooldown_timer > 0.0 {
            self.cooldown_timer = (self.cooldown_timer - dt).max(0.0);
        }
    }
}

/// Point-to-point movement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    /// Base speed (before buffs), world units per second.
    pub speed: f64,
    pub target: Option<Position>,
}

/// A standing instruction attached to a unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Order {
    Move { pos: Position },
    Attack { zombie_id: u32 },
    Harvest { node_id: u32 },
}

/// Nation-owned unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    /// Session-unique, monotonically assigned.
    pub id: u32,
    pub kind: UnitKind,
    pub level: u32,
    pub xp: f64,
    /// Remaining battle-cry buff (seconds).
    pub buff_timer: f64,
    pub order: Option<Order>,
}

impl Unit {
    pub fn new(id: u32, kind: UnitKind) -> Self {
        Self {
            id,
            kind,
            level: 1,
            xp: 0.0,
            buff_timer: 0.0,
            order: None,
        }
    }

    pub fn buffed(&self) -> bool {
        self.buff_timer > 0.0
    }

    pub fn speed_factor(&self) -> f64 {
        if self.buffed() {
            BUFF_SPEED_FACTOR
        } else {
            1.0
        }
    }

    pub fn attack_factor(&self) -> f64 {
        if self.buffed() {
            BUFF_ATTACK_FACTOR
        } else {
            1.0
        }
    }
}

/// Hostile creature. Not owned by any nation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zombie {
    pub id: u32,
    pub kind: ZombieKind,
}

/// Per-type building behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Structure {
    /// Never removed; its hit points mirror the owning nation's base hp.
    Base,
    Barracks,
    /// Auto-attacks the nearest zombie in range.
    Tower { cooldown_timer: f64 },
}

impl Structure {
    pub fn building_type(&self) -> BuildingType {
        match self {
            Structure::Base => BuildingType::Base,
            Structure::Barracks => BuildingType::Barracks,
            Structure::Tower { .. } => BuildingType::Tower,
        }
    }

    pub fn cooldown_timer(&self) -> f64 {
        match self {
            Structure::Tower { cooldown_timer } => *cooldown_timer,
            Structure::Base | Structure::Barracks => 0.0,
        }
    }

    pub fn from_type(kind: BuildingType, cooldown_timer: f64) -> Self {
        match kind {
            BuildingType::Base => Structure::Base,
            BuildingType::Barracks => Structure::Barracks,
            BuildingType::Tower => Structure::Tower { cooldown_timer },
        }
    }
}

/// Nation-owned structure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub id: u32,
    pub structure: Structure,
}

/// Finite gold or lumber deposit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceNode {
    pub id: u32,
    pub kind: ResourceKind,
    /// Non-increasing; the node is pruned once it reaches 0.
    pub amount: f64,
}
