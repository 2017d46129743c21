//! Tower auto-attacks.

use hecs::World;

use eras_core::components::*;
use eras_core::constants::{TOWER_COOLDOWN_SECS, TOWER_RANGE};
use eras_core::nation::Nation;
use eras_core::stats::tower_damage;
use eras_core::types::Position;

use super::combat::{commit, living_zombies, nearest_target};

/// Decay tower cooldowns and fire every ready tower of `nation` at the
/// nearest living zombie in range. Damage scales with the tech tier.
pub fn run(world: &mut World, nation: &Nation, dt: f64) {
    let mut zombies = living_zombies(world);
    let damage = tower_damage(nation.tech_tier);

    for (_entity, (building, owner, pos)) in
        world.query_mut::<(&mut Building, &Owner, &Position)>()
    {
        if owner.0 != nation.id {
            continue;
        }
        let Structure::Tower { cooldown_timer } = &mut building.structure else {
            continue;
        };
        *cooldown_timer = (*cooldown_timer - dt).max(0.0);
        if *cooldown_timer > 0.0 {
            continue;
        }
        if let Some(idx) = nearest_target(&zombies, *pos, TOWER_RANGE) {
            zombies[idx].hp -= damage;
            *cooldown_timer = TOWER_COOLDOWN_SECS;
        }
    }

    commit(world, &zombies);
}
