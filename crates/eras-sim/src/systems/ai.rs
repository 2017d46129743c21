//! Faction AI system: builds a planner context from the world, runs the
//! planner and applies its actions through the economy.

use hecs::World;
use rand_chacha::ChaCha8Rng;
use tracing::trace;

use eras_ai::planner::{plan, AiAction, FactionContext};
use eras_ai::profile::AiProfile;
use eras_core::components::*;
use eras_core::config::SessionConfig;
use eras_core::enums::UnitKind;
use eras_core::nation::Nation;

use crate::economy;
use crate::world_setup::IdCounters;

fn context(world: &World, nation: &Nation, session: &SessionConfig) -> FactionContext {
    let mut idle_soldiers = Vec::new();
    let mut has_hero = false;
    for (_entity, (unit, owner, movement)) in world.query::<(&Unit, &Owner, &Movement)>().iter() {
        if owner.0 != nation.id {
            continue;
        }
        match unit.kind {
            UnitKind::Soldier if movement.target.is_none() => idle_soldiers.push(unit.id),
            UnitKind::Hero => has_hero = true,
            _ => {}
        }
    }
    idle_soldiers.sort_unstable();

    let cap = economy::supply_cap(world, nation.id);
    let used = economy::supply_used(world, nation);
    FactionContext {
        base_pos: nation.base_pos,
        gold: nation.resources.gold,
        lumber: nation.resources.lumber,
        workers: nation.workers,
        soldiers: nation.soldiers,
        tech_tier: nation.tech_tier,
        research_cost: session.research_cost(nation.tech_tier),
        supply_headroom: cap.saturating_sub(used),
        has_barracks: economy::has_barracks(world, nation.id),
        building_count: economy::building_count(world, nation.id),
        idle_soldiers,
        hero_ready: has_hero && nation.hero_cooldown <= 0.0,
    }
}

/// Run one planning pass for an AI nation.
///
/// Rejections are expected (a random placement may be blocked) and are
/// dropped without a status message.
pub fn run(
    world: &mut World,
    nation: &mut Nation,
    session: &SessionConfig,
    profile: &AiProfile,
    ids: &mut IdCounters,
    rng: &mut ChaCha8Rng,
) {
    let ctx = context(world, nation, session);
    for action in plan(&ctx, profile, rng) {
        let result = match action {
            AiAction::Train(UnitKind::Soldier) => {
                economy::train_soldier(world, nation, ids, rng).map(|_| ())
            }
            AiAction::Train(UnitKind::Worker) => {
                economy::train_worker(world, nation, ids, rng).map(|_| ())
            }
            AiAction::Train(UnitKind::Hero) => Ok(()),
            AiAction::Patrol { unit_id, target } => {
                for (_entity, (unit, movement)) in world.query_mut::<(&Unit, &mut Movement)>() {
                    if unit.id == unit_id {
                        movement.target = Some(target);
                    }
                }
                Ok(())
            }
            AiAction::Research => economy::research(nation, session).map(|_| ()),
            AiAction::Construct { building_type, pos } => {
                economy::place_building(world, nation, ids, building_type, pos).map(|_| ())
            }
            AiAction::BattleCry => economy::battle_cry(world, nation),
        };
        if let Err(rejection) = result {
            trace!(nation = nation.id, ?action, %rejection, "ai.action_rejected");
        }
    }
}
