//! Worker harvesting from resource nodes.

use std::collections::HashMap;

use hecs::{Entity, World};

use eras_core::components::*;
use eras_core::constants::{HARVEST_RADIUS, HARVEST_RATE};
use eras_core::enums::{ResourceKind, UnitKind};
use eras_core::nation::Nation;
use eras_core::types::Position;

/// Move resources from nodes into the nation for every worker holding a
/// harvest order and standing close enough to its node.
///
/// Orders on missing or exhausted nodes are cleared.
pub fn run(world: &mut World, nation: &mut Nation, dt: f64) {
    let nodes: HashMap<u32, Entity> = world
        .query::<&ResourceNode>()
        .iter()
        .map(|(entity, node)| (node.id, entity))
        .collect();

    let harvesters: Vec<(Entity, u32, Position)> = world
        .query::<(&Unit, &Owner, &Position)>()
        .iter()
        .filter(|(_, (unit, owner, _))| owner.0 == nation.id && unit.kind == UnitKind::Worker)
        .filter_map(|(entity, (unit, _, pos))| match unit.order {
            Some(Order::Harvest { node_id }) => Some((entity, node_id, *pos)),
            _ => None,
        })
        .collect();

    let mut stale = Vec::new();
    for (worker, node_id, worker_pos) in harvesters {
        let Some(&node_entity) = nodes.get(&node_id) else {
            stale.push(worker);
            continue;
        };
        let Ok((node, node_pos)) =
            world.query_one_mut::<(&mut ResourceNode, &Position)>(node_entity)
        else {
            stale.push(worker);
            continue;
        };
        if node.amount <= 0.0 {
            stale.push(worker);
            continue;
        }
        if worker_pos.distance(*node_pos) < HARVEST_RADIUS {
            let gathered = node.amount.min(HARVEST_RATE * dt);
            node.amount -= gathered;
            match node.kind {
                ResourceKind::Gold => nation.resources.gold += gathered,
                ResourceKind::Lumber => nation.resources.lumber += gathered,
            }
        }
    }

    for worker in stale {
        if let Ok(mut unit) = world.get::<&mut Unit>(worker) {
            unit.order = None;
        }
    }
}
