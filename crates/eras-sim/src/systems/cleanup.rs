//! Cleanup system: removes everything destroyed or depleted this tick.

use std::collections::BTreeSet;

use hecs::{Entity, World};

use eras_core::components::*;
use eras_core::enums::UnitKind;
use eras_core::nation::Nation;

/// Despawn dead units and zombies, destroyed non-base buildings and empty
/// resource nodes. Dead units are dropped from `selection` and from their
/// nation's counters. Returns the number of zombies slain.
///
/// Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(
    world: &mut World,
    nations: &mut [Nation],
    selection: &mut BTreeSet<u32>,
    despawn_buffer: &mut Vec<Entity>,
) -> u32 {
    despawn_buffer.clear();

    for (entity, (unit, owner, health)) in world.query_mut::<(&Unit, &Owner, &Health)>() {
        if !health.is_dead() {
            continue;
        }
        despawn_buffer.push(entity);
        selection.remove(&unit.id);
        if let Some(nation) = nations.get_mut(owner.0) {
            match unit.kind {
                UnitKind::Worker => nation.workers = nation.workers.saturating_sub(1),
                UnitKind::Soldier => nation.soldiers = nation.soldiers.saturating_sub(1),
                UnitKind::Hero => {}
            }
        }
    }

    let mut slain = 0;
    for (entity, (_zombie, health)) in world.query_mut::<(&Zombie, &Health)>() {
        if health.is_dead() {
            despawn_buffer.push(entity);
            slain += 1;
        }
    }

    // The base is never removed; its nation is dead instead.
    for (entity, (building, health)) in world.query_mut::<(&Building, &Health)>() {
        if health.is_dead() && !matches!(building.structure, Structure::Base) {
            despawn_buffer.push(entity);
        }
    }

    for (entity, node) in world.query_mut::<&ResourceNode>() {
        if node.amount <= 0.0 {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
    slain
}
