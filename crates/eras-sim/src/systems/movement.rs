//! Movement integration for units and zombies.
//!
//! Entities step straight toward their target at their current speed and
//! stop once within `ARRIVAL_RADIUS` of it.

use std::collections::HashMap;

use hecs::World;

use eras_core::components::*;
use eras_core::constants::ARRIVAL_RADIUS;
use eras_core::nation::Nation;
use eras_core::types::Position;

/// Step `pos` toward `target`. Returns true once within the arrival radius.
fn step_toward(pos: &mut Position, target: Position, speed: f64, dt: f64) -> bool {
    let delta = target - *pos;
    let dist = delta.length();
    if dist > ARRIVAL_RADIUS {
        *pos += delta / dist * speed * dt;
        false
    } else {
        true
    }
}

/// Advance every unit owned by `nation_id`: attack-order retargeting,
/// movement, then cooldown and buff decay.
pub fn advance_units(world: &mut World, nation_id: usize, dt: f64) {
    let zombies: HashMap<u32, Position> = world
        .query::<(&Zombie, &Position)>()
        .iter()
        .map(|(_, (zombie, pos))| (zombie.id, *pos))
        .collect();

    for (_entity, (unit, owner, pos, movement, combat)) in world.query_mut::<(
        &mut Unit,
        &Owner,
        &mut Position,
        &mut Movement,
        &mut Combat,
    )>() {
        if owner.0 != nation_id {
            continue;
        }

        if let Some(Order::Attack { zombie_id }) = unit.order {
            match zombies.get(&zombie_id) {
                Some(&zombie_pos) => movement.target = Some(zombie_pos),
                // Stale target: drop the order silently.
                None => unit.order = None,
            }
        }

        if let Some(target) = movement.target {
            let speed = movement.speed * unit.speed_factor();
            if step_toward(pos, target, speed, dt) {
                movement.target = None;
            }
        }

        combat.decay(dt);
        unit.buff_timer = (unit.buff_timer - dt).max(0.0);
    }
}

/// Move every zombie toward the nearest living base, re-evaluated each tick.
///
/// Does nothing once no nation is alive.
pub fn advance_zombies(world: &mut World, nations: &[Nation], dt: f64) {
    let bases: Vec<Position> = nations
        .iter()
        .filter(|n| n.is_alive())
        .map(|n| n.base_pos)
        .collect();
    if bases.is_empty() {
        return;
    }

    for (_entity, (_zombie, pos, movement, combat)) in
        world.query_mut::<(&Zombie, &mut Position, &mut Movement, &mut Combat)>()
    {
        // `min_by` keeps the first of equal distances, i.e. the lower nation id.
        let target = bases
            .iter()
            .copied()
            .min_by(|a, b| a.distance(*pos).total_cmp(&b.distance(*pos)));
        movement.target = target;
        if let Some(target) = target {
            step_toward(pos, target, movement.speed, dt);
        }
        combat.decay(dt);
    }
}
