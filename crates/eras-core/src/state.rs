//! World snapshot: the complete visible state broadcast to clients.
//!
//! A snapshot is a full copy, never a delta. Clients render the most recent
//! one and never run a tick of their own.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::Outcome;
use crate::nation::Resources;
use crate::types::{Position, SimTime};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub paused: bool,
    /// Index into the session's zombie phase table.
    pub threat_phase: usize,
    pub zombies_slain: u32,
    pub objective_minutes: f64,
    pub objective_kills: u32,
    pub outcome: Option<Outcome>,
    pub nations: Vec<NationView>,
    pub nodes: Vec<NodeView>,
    pub zombies: Vec<ZombieView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NationView {
    pub nation_id: usize,
    pub name: String,
    pub base_pos: Position,
    pub base_hp: f64,
    pub base_max_hp: f64,
    pub resources: Resources,
    pub workers: u32,
    pub soldiers: u32,
    pub tech_tier: u8,
    pub ai_controlled: bool,
    pub hero_cooldown: f64,
    pub units: Vec<UnitView>,
    pub buildings: Vec<BuildingView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitView {
    pub unit_id: u32,
    pub pos: Position,
    pub unit_type: UnitKind,
    pub hp: f64,
    pub speed: f64,
    pub attack: f64,
    pub range: f64,
    pub cooldown: f64,
    pub cooldown_timer: f64,
    pub buff_timer: f64,
    pub level: u32,
    pub xp: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingView {
    pub building_id: u32,
    pub pos: Position,
    pub building_type: BuildingType,
    pub hp: f64,
    pub max_hp: f64,
    pub cooldown_timer: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeView {
    pub node_id: u32,
    pub pos: Position,
    pub kind: ResourceKind,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZombieView {
    pub zombie_id: u32,
    pub pos: Position,
    pub kind: ZombieKind,
    pub hp: f64,
    pub speed: f64,
    pub attack: f64,
    pub range: f64,
    pub cooldown: f64,
    pub cooldown_timer: f64,
}

impl WorldSnapshot {
    pub fn nation(&self, nation_id: usize) -> Option<&NationView> {
        self.nations.iter().find(|n| n.nation_id == nation_id)
    }

    /// Ids of every unit the nation still owns.
    pub fn unit_ids(&self, nation_id: usize) -> BTreeSet<u32> {
        self.nation(nation_id)
            .map(|n| n.units.iter().map(|u| u.unit_id).collect())
            .unwrap_or_default()
    }

    pub fn game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn victory(&self) -> bool {
        matches!(self.outcome, Some(Outcome::Victory))
    }
}
