//! Snapshot system: queries the ECS world and builds a complete WorldSnapshot.
//!
//! This system is read-only. Every collection is sorted by id so two
//! engines in the same state produce identical snapshots.

use hecs::World;

use eras_core::components::*;
use eras_core::enums::GamePhase;
use eras_core::events::Outcome;
use eras_core::nation::Nation;
use eras_core::state::*;
use eras_core::types::{Position, SimTime};

use super::victory::Objectives;

/// Session-level fields copied into the snapshot.
pub struct SessionView {
    pub time: SimTime,
    pub phase: GamePhase,
    pub paused: bool,
    pub threat_phase: usize,
    pub zombies_slain: u32,
    pub objectives: Objectives,
    pub outcome: Option<Outcome>,
}

pub fn build_snapshot(world: &World, nations: &[Nation], session: &SessionView) -> WorldSnapshot {
    WorldSnapshot {
        time: session.time,
        phase: session.phase,
        paused: session.paused,
        threat_phase: session.threat_phase,
        zombies_slain: session.zombies_slain,
        objective_minutes: session.objectives.minutes,
        objective_kills: session.objectives.kills,
        outcome: session.outcome,
        nations: nations.iter().map(|n| build_nation(world, n)).collect(),
        nodes: build_nodes(world),
        zombies: build_zombies(world),
    }
}

fn build_nation(world: &World, nation: &Nation) -> NationView {
    let mut units: Vec<UnitView> = world
        .query::<(&Unit, &Owner, &Position, &Health, &Combat, &Movement)>()
        .iter()
        .filter(|(_, (_, owner, ..))| owner.0 == nation.id)
        .map(|(_, (unit, _, pos, health, combat, movement))| UnitView {
            unit_id: unit.id,
            pos: *pos,
            unit_type: unit.kind,
            hp: health.hp,
            speed: movement.speed,
            attack: combat.attack,
            range: combat.range,
            cooldown: combat.cooldown,
            cooldown_timer: combat.cooldown_timer,
            buff_timer: unit.buff_timer,
            level: unit.level,
            xp: unit.xp,
        })
        .collect();
    units.sort_by_key(|u| u.unit_id);

    let mut buildings: Vec<BuildingView> = world
        .query::<(&Building, &Owner, &Position, &Health)>()
        .iter()
        .filter(|(_, (_, owner, ..))| owner.0 == nation.id)
        .map(|(_, (building, _, pos, health))| BuildingView {
            building_id: building.id,
            pos: *pos,
            building_type: building.structure.building_type(),
            hp: health.hp,
            max_hp: health.max_hp,
            cooldown_timer: building.structure.cooldown_timer(),
        })
        .collect();
    buildings.sort_by_key(|b| b.building_id);

    NationView {
        nation_id: nation.id,
        name: nation.name.clone(),
        base_pos: nation.base_pos,
        base_hp: nation.base_hp,
        base_max_hp: nation.base_max_hp,
        resources: nation.resources,
        workers: nation.workers,
        soldiers: nation.soldiers,
        tech_tier: nation.tech_tier,
        ai_controlled: nation.ai_controlled,
        hero_cooldown: nation.hero_cooldown,
        units,
        buildings,
    }
}

fn build_nodes(world: &World) -> Vec<NodeView> {
    let mut nodes: Vec<NodeView> = world
        .query::<(&ResourceNode, &Position)>()
        .iter()
        .map(|(_, (node, pos))| NodeView {
            node_id: node.id,
            pos: *pos,
            kind: node.kind,
            amount: node.amount,
        })
        .collect();
    nodes.sort_by_key(|n| n.node_id);
    nodes
}

fn build_zombies(world: &World) -> Vec<ZombieView> {
    let mut zombies: Vec<ZombieView> = world
        .query::<(&Zombie, &Position, &Health, &Combat, &Movement)>()
        .iter()
        .map(|(_, (zombie, pos, health, combat, movement))| ZombieView {
            zombie_id: zombie.id,
            pos: *pos,
            kind: zombie.kind,
            hp: health.hp,
            speed: movement.speed,
            attack: combat.attack,
            range: combat.range,
            cooldown: combat.cooldown,
            cooldown_timer: combat.cooldown_timer,
        })
        .collect();
    zombies.sort_by_key(|z| z.zombie_id);
    zombies
}
