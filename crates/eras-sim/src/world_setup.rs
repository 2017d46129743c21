//! Entity spawn factories for setting up the simulation world.
//!
//! Creates nations with their starting roster, the resource nodes and
//! zombie entities with the appropriate component bundles.

use hecs::World;

use eras_core::commands::MatchSetup;
use eras_core::components::*;
use eras_core::config::SessionConfig;
use eras_core::constants::*;
use eras_core::enums::*;
use eras_core::nation::Nation;
use eras_core::stats::{unit_stats, zombie_stats};
use eras_core::types::{pos, Position};

/// Monotonic session-unique id counters, one sequence per entity family.
#[derive(Debug, Clone)]
pub struct IdCounters {
    next_unit: u32,
    next_building: u32,
    next_zombie: u32,
    next_node: u32,
}

impl Default for IdCounters {
    fn default() -> Self {
        Self {
            next_unit: 1,
            next_building: 1,
            next_zombie: 1,
            next_node: 0,
        }
    }
}

impl IdCounters {
    pub fn unit(&mut self) -> u32 {
        let id = self.next_unit;
        self.next_unit += 1;
        id
    }

    pub fn building(&mut self) -> u32 {
        let id = self.next_building;
        self.next_building += 1;
        id
    }

    pub fn zombie(&mut self) -> u32 {
        let id = self.next_zombie;
        self.next_zombie += 1;
        id
    }

    pub fn node(&mut self) -> u32 {
        let id = self.next_node;
        self.next_node += 1;
        id
    }
}

/// Build every nation slot and populate the world for a new match.
///
/// Nations outside `setup.active_nations` are created dead so nation indices
/// stay stable. Resource nodes are laid out for every base position.
pub fn setup_match(
    world: &mut World,
    ids: &mut IdCounters,
    setup: &MatchSetup,
    session: &SessionConfig,
) -> Vec<Nation> {
    let mut nations = Vec::with_capacity(NATION_COUNT);
    for (idx, &base) in BASE_POSITIONS.iter().enumerate() {
        let blueprint = session.nations.get(idx);
        let active = setup.active_nations.contains(&idx);
        let mut nation = Nation {
            id: idx,
            name: session.nation_name(idx).to_string(),
            base_pos: pos(base),
            base_hp: if active { BASE_MAX_HP } else { 0.0 },
            base_max_hp: BASE_MAX_HP,
            resources: session.starting_resources,
            workers: 0,
            soldiers: 0,
            tech_tier: 1,
            ai_controlled: !setup.human_nations.contains(&idx),
            hero_cooldown: 0.0,
            bonuses: blueprint.map(|b| b.bonuses).unwrap_or_default(),
        };
        if active {
            spawn_roster(world, ids, &mut nation, session);
        }
        nations.push(nation);
    }

    for &base in BASE_POSITIONS.iter() {
        let (x, y) = base;
        spawn_node(
            world,
            ids,
            ResourceKind::Gold,
            Position::new(x - NODE_OFFSET_X, y + NODE_OFFSET_Y),
        );
        spawn_node(
            world,
            ids,
            ResourceKind::Lumber,
            Position::new(x + NODE_OFFSET_X, y + NODE_OFFSET_Y),
        );
    }

    nations
}

/// Base building, soldiers in a row below the base, workers in a row above
/// it and the hero beside it.
fn spawn_roster(world: &mut World, ids: &mut IdCounters, nation: &mut Nation, session: &SessionConfig) {
    let base = nation.base_pos;
    spawn_building(
        world,
        ids,
        nation.id,
        Structure::Base,
        base,
        nation.base_max_hp,
    );
    for i in 0..session.starting_soldiers {
        let offset = Position::new(14.0 * f64::from(i), 25.0);
        spawn_unit(world, ids, nation.id, UnitKind::Soldier, base + offset);
        nation.soldiers += 1;
    }
    for i in 0..session.starting_workers {
        let offset = Position::new(-12.0 * f64::from(i), -25.0);
        spawn_unit(world, ids, nation.id, UnitKind::Worker, base + offset);
        nation.workers += 1;
    }
    for i in 0..session.starting_heroes {
        let offset = Position::new(20.0 + 14.0 * f64::from(i), 0.0);
        spawn_unit(world, ids, nation.id, UnitKind::Hero, base + offset);
    }
}

/// Spawn a unit with full health for its kind. Does not touch nation counters.
pub fn spawn_unit(
    world: &mut World,
    ids: &mut IdCounters,
    owner: usize,
    kind: UnitKind,
    at: Position,
) -> u32 {
    let stats = unit_stats(kind);
    let id = ids.unit();
    world.spawn((
        Unit::new(id, kind),
        Owner(owner),
        at,
        Health::full(stats.hp),
        Combat {
            attack: stats.attack,
            range: stats.range,
            cooldown: stats.cooldown,
            cooldown_timer: 0.0,
        },
        Movement {
            speed: stats.speed,
            target: None,
        },
    ));
    id
}

pub fn spawn_building(
    world: &mut World,
    ids: &mut IdCounters,
    owner: usize,
    structure: Structure,
    at: Position,
    hp: f64,
) -> u32 {
    let id = ids.building();
    world.spawn((Building { id, structure }, Owner(owner), at, Health::full(hp)));
    id
}

pub fn spawn_zombie(world: &mut World, ids: &mut IdCounters, kind: ZombieKind, at: Position) -> u32 {
    let stats = zombie_stats(kind).combat;
    let id = ids.zombie();
    world.spawn((
        Zombie { id, kind },
        at,
        Health::full(stats.hp),
        Combat {
            attack: stats.attack,
            range: stats.range,
            cooldown: stats.cooldown,
            cooldown_timer: 0.0,
        },
        Movement {
            speed: stats.speed,
            target: None,
        },
    ));
    id
}

pub fn spawn_node(world: &mut World, ids: &mut IdCounters, kind: ResourceKind, at: Position) -> u32 {
    let id = ids.node();
    world.spawn((
        ResourceNode {
            id,
            kind,
            amount: RESOURCE_NODE_AMOUNT,
        },
        at,
    ));
    id
}
