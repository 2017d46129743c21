//! Combat resolution: unit attacks, zombie attacks and siege damage.
//!
//! Runs once per tick after movement. Damage only lowers hit points;
//! removal is left to the cleanup system so nothing despawns mid-combat.

use hecs::{Entity, World};

use eras_core::components::*;
use eras_core::constants::*;
use eras_core::nation::Nation;
use eras_core::types::Position;

/// Nearest candidate strictly inside `radius` of `origin`.
///
/// Equal distances go to the lower id, so the result does not depend on
/// iteration order.
pub fn nearest(
    candidates: impl IntoIterator<Item = (u32, Position)>,
    origin: Position,
    radius: f64,
) -> Option<(u32, Position)> {
    let mut best: Option<(u32, Position, f64)> = None;
    for (id, pos) in candidates {
        let dist = pos.distance(origin);
        if dist >= radius {
            continue;
        }
        let closer = match best {
            None => true,
            Some((best_id, _, best_dist)) => dist < best_dist || (dist == best_dist && id < best_id),
        };
        if closer {
            best = Some((id, pos, dist));
        }
    }
    best.map(|(id, pos, _)| (id, pos))
}

/// Working copy of a damageable entity for the duration of one pass.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Target {
    pub entity: Entity,
    pub id: u32,
    pub pos: Position,
    pub hp: f64,
}

impl Target {
    fn alive(&self) -> bool {
        self.hp > 0.0
    }
}

/// Index of the nearest living target inside `radius`.
pub(crate) fn nearest_target(targets: &[Target], origin: Position, radius: f64) -> Option<usize> {
    let (id, _) = nearest(
        targets.iter().filter(|t| t.alive()).map(|t| (t.id, t.pos)),
        origin,
        radius,
    )?;
    targets.iter().position(|t| t.id == id)
}

pub(crate) fn living_zombies(world: &World) -> Vec<Target> {
    world
        .query::<(&Zombie, &Position, &Health)>()
        .iter()
        .filter(|(_, (_, _, health))| !health.is_dead())
        .map(|(entity, (zombie, pos, health))| Target {
            entity,
            id: zombie.id,
            pos: *pos,
            hp: health.hp,
        })
        .collect()
}

/// Write working hit points back to the world.
pub(crate) fn commit(world: &mut World, targets: &[Target]) {
    for target in targets {
        if let Ok(mut health) = world.get::<&mut Health>(target.entity) {
            health.hp = target.hp;
        }
    }
}

/// Resolve one tick of combat. Returns the nations whose base fell this tick.
pub fn run(world: &mut World, nations: &mut [Nation], dt: f64) -> Vec<usize> {
    let mut fallen = Vec::new();
    unit_attacks(world);
    zombie_attacks(world, nations, &mut fallen);
    siege(world, nations, dt, &mut fallen);
    sync_base_health(world, nations);
    fallen
}

fn unit_attacks(world: &mut World) {
    let mut zombies = living_zombies(world);

    for (_entity, (unit, pos, health, combat)) in
        world.query_mut::<(&mut Unit, &Position, &mut Health, &mut Combat)>()
    {
        if health.is_dead() || !combat.ready() {
            continue;
        }

        // An ordered zombie out of range falls back to nearest acquisition.
        let ordered = match unit.order {
            Some(Order::Attack { zombie_id }) => zombies.iter().position(|z| {
                z.id == zombie_id && z.alive() && z.pos.distance(*pos) <= combat.range
            }),
            _ => None,
        };
        let Some(idx) = ordered.or_else(|| nearest_target(&zombies, *pos, combat.range)) else {
            continue;
        };

        zombies[idx].hp -= combat.attack * unit.attack_factor();
        combat.cooldown_timer = combat.cooldown;

        if unit.kind.gains_experience() {
            unit.xp += XP_PER_HIT;
            // At most one level per hit.
            if unit.xp >= f64::from(unit.level) * XP_PER_LEVEL {
                unit.level += 1;
                unit.xp = 0.0;
                health.hp += LEVEL_UP_HP;
                health.max_hp += LEVEL_UP_HP;
                combat.attack += LEVEL_UP_ATTACK;
            }
        }
    }

    commit(world, &zombies);
}

fn zombie_attacks(world: &mut World, nations: &mut [Nation], fallen: &mut Vec<usize>) {
    let mut units: Vec<Target> = world
        .query::<(&Unit, &Position, &Health)>()
        .iter()
        .filter(|(_, (_, _, health))| !health.is_dead())
        .map(|(entity, (unit, pos, health))| Target {
            entity,
            id: unit.id,
            pos: *pos,
            hp: health.hp,
        })
        .collect();
    let mut buildings = Vec::new();
    // (owner, is_base), parallel to `buildings`.
    let mut building_meta = Vec::new();
    for (entity, (building, owner, pos, health)) in world
        .query::<(&Building, &Owner, &Position, &Health)>()
        .iter()
    {
        if health.is_dead() {
            continue;
        }
        buildings.push(Target {
            entity,
            id: building.id,
            pos: *pos,
            hp: health.hp,
        });
        building_meta.push((owner.0, matches!(building.structure, Structure::Base)));
    }

    for (_entity, (_zombie, pos, health, combat)) in
        world.query_mut::<(&Zombie, &Position, &Health, &mut Combat)>()
    {
        if health.is_dead() || !combat.ready() {
            continue;
        }

        if let Some(idx) = nearest_target(&units, *pos, combat.range) {
            units[idx].hp -= combat.attack;
            combat.cooldown_timer = combat.cooldown;
            continue;
        }

        if let Some(idx) = nearest_target(&buildings, *pos, combat.range) {
            let (owner, is_base) = building_meta[idx];
            if is_base {
                // The nation record is authoritative for base hit points.
                if let Some(nation) = nations.get_mut(owner) {
                    if nation.damage_base(combat.attack) {
                        fallen.push(nation.id);
                    }
                    buildings[idx].hp = nation.base_hp;
                }
            } else {
                buildings[idx].hp -= combat.attack;
            }
            combat.cooldown_timer = combat.cooldown;
        }
    }

    commit(world, &units);
    commit(world, &buildings);
}

/// Continuous damage from every zombie camped on a living base.
fn siege(world: &World, nations: &mut [Nation], dt: f64, fallen: &mut Vec<usize>) {
    let zombies: Vec<(Position, f64)> = world
        .query::<(&Zombie, &Position, &Health, &Combat)>()
        .iter()
        .filter(|(_, (_, _, health, _))| !health.is_dead())
        .map(|(_, (_, pos, _, combat))| (*pos, combat.attack))
        .collect();

    for nation in nations.iter_mut().filter(|n| n.is_alive()) {
        for &(pos, attack) in &zombies {
            if pos.distance(nation.base_pos) < SIEGE_RADIUS && nation.damage_base(attack * dt) {
                fallen.push(nation.id);
            }
        }
    }
}

fn sync_base_health(world: &mut World, nations: &[Nation]) {
    for (_entity, (building, owner, health)) in
        world.query_mut::<(&Building, &Owner, &mut Health)>()
    {
        if matches!(building.structure, Structure::Base) {
            if let Some(nation) = nations.get(owner.0) {
                health.hp = nation.base_hp;
            }
        }
    }
}
