//! Nation records: identity, balances, counters and base health.
//!
//! Units and buildings owned by a nation live in the ECS world and carry an
//! `Owner` component; the counters kept here are the economy's view of them.

use serde::{Deserialize, Serialize};

use crate::types::{Cost, Position};

/// Resource balances.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Resources {
    pub gold: f64,
    pub lumber: f64,
    /// Food/supply floor, raised by gathering and never lowered.
    pub food: u32,
    pub arcana: f64,
}

impl Default for Resources {
    fn default() -> Self {
        Self {
            gold: 500.0,
            lumber: 320.0,
            food: 12,
            arcana: 0.0,
        }
    }
}

/// Static per-blueprint multipliers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NationBonuses {
    pub gather: f64,
    pub research: f64,
    pub training: f64,
    pub defense: f64,
}

impl Default for NationBonuses {
    fn default() -> Self {
        Self {
            gather: 1.0,
            research: 1.0,
            training: 1.0,
            defense: 1.0,
        }
    }
}

/// A faction with its own economy, army and base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nation {
    pub id: usize,
    pub name: String,
    pub base_pos: Position,
    pub base_hp: f64,
    pub base_max_hp: f64,
    pub resources: Resources,
    pub workers: u32,
    pub soldiers: u32,
    /// 1..=MAX_TECH_TIER, never decreases.
    pub tech_tier: u8,
    pub ai_controlled: bool,
    /// Seconds until the hero ability can be used again.
    pub hero_cooldown: f64,
    pub bonuses: NationBonuses,
}

impl Nation {
    /// Alive iff the base still has hit points. Death is permanent.
    pub fn is_alive(&self) -> bool {
        self.base_hp > 0.0
    }

    pub fn can_afford(&self, cost: Cost) -> bool {
        self.resources.gold >= cost.gold && self.resources.lumber >= cost.lumber
    }

    /// Subtract `cost` unconditionally.
    ///
    /// Never clamps and never rejects: callers check `can_afford` first.
    pub fn spend(&mut self, cost: Cost) {
        self.resources.gold -= cost.gold;
        self.resources.lumber -= cost.lumber;
    }

    /// Apply base damage, clamping at zero. Returns true if this call felled the base.
    pub fn damage_base(&mut self, amount: f64) -> bool {
        let was_alive = self.is_alive();
        self.base_hp = (self.base_hp - amount).max(0.0);
        was_alive && !self.is_alive()
    }
}
