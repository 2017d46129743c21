//! Economy and production: gathering, supply, training, research,
//! construction, the hero ability and unit orders.
//!
//! Every operation either succeeds completely or returns a `Rejection`
//! without touching the world or the nation.

use hecs::World;
use rand::Rng;

use eras_core::components::*;
use eras_core::config::SessionConfig;
use eras_core::constants::*;
use eras_core::enums::{BuildingType, UnitKind};
use eras_core::errors::Rejection;
use eras_core::nation::Nation;
use eras_core::stats::construction;
use eras_core::types::{Cost, Position};

use crate::systems::combat::nearest;
use crate::world_setup::{self, IdCounters};

/// Passive income from workers. Raises the food floor, never lowers it.
pub fn gather(nation: &mut Nation, dt: f64, gather_bonus: f64) {
    let workers = f64::from(nation.workers);
    nation.resources.gold += workers * GOLD_PER_WORKER * gather_bonus * dt;
    nation.resources.lumber += workers * LUMBER_PER_WORKER * gather_bonus * dt;
    let floor = nation.workers + nation.soldiers + FOOD_FLOOR_SLACK;
    nation.resources.food = nation.resources.food.max(floor);
}

pub fn supply_cap(world: &World, nation_id: usize) -> u32 {
    let mut cap = SUPPLY_BASE;
    for (_entity, (building, owner)) in world.query::<(&Building, &Owner)>().iter() {
        if owner.0 != nation_id {
            continue;
        }
        cap += match building.structure.building_type() {
            BuildingType::Barracks => SUPPLY_PER_BARRACKS,
            BuildingType::Tower => SUPPLY_PER_TOWER,
            BuildingType::Base => 0,
        };
    }
    cap
}

/// Workers and soldiers from the nation counters, heroes from the world.
pub fn supply_used(world: &World, nation: &Nation) -> u32 {
    let heroes = world
        .query::<(&Unit, &Owner)>()
        .iter()
        .filter(|(_, (unit, owner))| owner.0 == nation.id && unit.kind == UnitKind::Hero)
        .count() as u32;
    nation.workers + nation.soldiers + heroes * UnitKind::Hero.supply()
}

pub fn has_barracks(world: &World, nation_id: usize) -> bool {
    world
        .query::<(&Building, &Owner)>()
        .iter()
        .any(|(_, (b, owner))| owner.0 == nation_id && matches!(b.structure, Structure::Barracks))
}

/// Buildings owned by the nation, base included.
pub fn building_count(world: &World, nation_id: usize) -> usize {
    world
        .query::<(&Building, &Owner)>()
        .iter()
        .filter(|(_, (_, owner))| owner.0 == nation_id)
        .count()
}

pub fn train_soldier<R: Rng>(
    world: &mut World,
    nation: &mut Nation,
    ids: &mut IdCounters,
    rng: &mut R,
) -> Result<u32, Rejection> {
    train(
        world,
        nation,
        ids,
        rng,
        UnitKind::Soldier,
        SOLDIER_COST,
        SOLDIER_SPAWN_JITTER,
    )
}

pub fn train_worker<R: Rng>(
    world: &mut World,
    nation: &mut Nation,
    ids: &mut IdCounters,
    rng: &mut R,
) -> Result<u32, Rejection> {
    train(
        world,
        nation,
        ids,
        rng,
        UnitKind::Worker,
        WORKER_COST,
        WORKER_SPAWN_JITTER,
    )
}

/// Checks run in order: supply headroom, barracks (soldiers only), cost.
fn train<R: Rng>(
    world: &mut World,
    nation: &mut Nation,
    ids: &mut IdCounters,
    rng: &mut R,
    kind: UnitKind,
    cost: Cost,
    jitter: f64,
) -> Result<u32, Rejection> {
    if supply_used(world, nation) + kind.supply() > supply_cap(world, nation.id) {
        return Err(Rejection::SupplyCapReached);
    }
    if kind == UnitKind::Soldier && !has_barracks(world, nation.id) {
        return Err(Rejection::MissingBarracks);
    }
    if !nation.can_afford(cost) {
        return Err(Rejection::InsufficientResources);
    }

    nation.spend(cost);
    match kind {
        UnitKind::Soldier => nation.soldiers += 1,
        UnitKind::Worker => nation.workers += 1,
        UnitKind::Hero => {}
    }
    let offset = Position::new(
        rng.gen_range(-jitter..=jitter),
        rng.gen_range(-jitter..=jitter),
    );
    let at = nation.base_pos + offset;
    Ok(world_setup::spawn_unit(world, ids, nation.id, kind, at))
}

/// Advance exactly one tech tier. Returns the new tier.
pub fn research(nation: &mut Nation, session: &SessionConfig) -> Result<u8, Rejection> {
    let cost = session
        .research_cost(nation.tech_tier)
        .ok_or(Rejection::FullyResearched)?;
    if !nation.can_afford(cost) {
        return Err(Rejection::InsufficientResources);
    }
    nation.spend(cost);
    nation.tech_tier += 1;
    Ok(nation.tech_tier)
}

/// Buff the hero and every allied soldier or worker near it.
///
/// The radius is evaluated once, at activation.
pub fn battle_cry(world: &mut World, nation: &mut Nation) -> Result<(), Rejection> {
    let hero = world
        .query::<(&Unit, &Owner, &Position)>()
        .iter()
        .filter(|(_, (unit, owner, _))| owner.0 == nation.id && unit.kind == UnitKind::Hero)
        .min_by_key(|(_, (unit, _, _))| unit.id)
        .map(|(entity, (_, _, pos))| (entity, *pos));
    let Some((hero_entity, hero_pos)) = hero else {
        return Err(Rejection::NoHero);
    };
    if nation.hero_cooldown > 0.0 {
        return Err(Rejection::AbilityOnCooldown);
    }

    nation.hero_cooldown = BATTLE_CRY_COOLDOWN_SECS;
    for (entity, (unit, owner, pos)) in world.query_mut::<(&mut Unit, &Owner, &Position)>() {
        if owner.0 != nation.id {
            continue;
        }
        let in_radius = matches!(unit.kind, UnitKind::Soldier | UnitKind::Worker)
            && pos.distance(hero_pos) < BATTLE_CRY_RADIUS;
        if entity == hero_entity || in_radius {
            unit.buff_timer = BATTLE_CRY_DURATION_SECS;
        }
    }
    Ok(())
}

/// Construct a barracks or tower at `at`. Returns the new building id.
pub fn place_building(
    world: &mut World,
    nation: &mut Nation,
    ids: &mut IdCounters,
    building_type: BuildingType,
    at: Position,
) -> Result<u32, Rejection> {
    let (cost, hp) = construction(building_type).ok_or(Rejection::PlacementBlocked)?;
    if !nation.can_afford(cost) {
        return Err(Rejection::InsufficientResources);
    }
    let too_close_to_base = at.distance(nation.base_pos) < PLACEMENT_MIN_BASE_DISTANCE;
    let overlaps = world
        .query::<(&Building, &Position)>()
        .iter()
        .any(|(_, (_, pos))| pos.distance(at) < PLACEMENT_MIN_SPACING);
    if too_close_to_base || overlaps {
        return Err(Rejection::PlacementBlocked);
    }

    nation.spend(cost);
    let structure = Structure::from_type(building_type, 0.0);
    Ok(world_setup::spawn_building(
        world, ids, nation.id, structure, at, hp,
    ))
}

/// Attach a standing order to every owned unit listed in `unit_ids`.
///
/// A zombie under `pos` becomes an attack order, a resource node under it a
/// harvest order (workers only); anything else is a move. Unknown or foreign
/// ids are ignored. Returns the number of units ordered.
pub fn issue_order(world: &mut World, nation_id: usize, unit_ids: &[u32], pos: Position) -> usize {
    if unit_ids.is_empty() {
        return 0;
    }

    let zombie = nearest(
        world
            .query::<(&Zombie, &Position)>()
            .iter()
            .map(|(_, (z, p))| (z.id, *p)),
        pos,
        ORDER_ZOMBIE_PICK_RADIUS,
    );
    let node = nearest(
        world
            .query::<(&ResourceNode, &Position)>()
            .iter()
            .map(|(_, (n, p))| (n.id, *p)),
        pos,
        ORDER_NODE_PICK_RADIUS,
    );

    let mut ordered = 0;
    for (_entity, (unit, owner, movement)) in
        world.query_mut::<(&mut Unit, &Owner, &mut Movement)>()
    {
        if owner.0 != nation_id || !unit_ids.contains(&unit.id) {
            continue;
        }
        match (zombie, node) {
            (Some((zombie_id, zombie_pos)), _) => {
                unit.order = Some(Order::Attack { zombie_id });
                movement.target = Some(zombie_pos);
            }
            (None, Some((node_id, node_pos))) if unit.kind == UnitKind::Worker => {
                unit.order = Some(Order::Harvest { node_id });
                movement.target = Some(node_pos);
            }
            _ => {
                unit.order = Some(Order::Move { pos });
                movement.target = Some(pos);
            }
        }
        ordered += 1;
    }
    ordered
}
