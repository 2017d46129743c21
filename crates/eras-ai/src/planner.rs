//! Per-tick faction planner.
//!
//! Re-evaluated from scratch every tick; nothing is queued between ticks.
//! Actions come out in fixed priority order, each gated on the budget left
//! after the actions planned before it.

use rand::Rng;

use eras_core::constants::{BARRACKS_COST, SOLDIER_COST, TOWER_COST, WORKER_COST};
use eras_core::enums::{BuildingType, UnitKind};
use eras_core::types::{Cost, Position};

use crate::profile::AiProfile;

/// What the planner can see of one nation.
#[derive(Debug, Clone, PartialEq)]
pub struct FactionContext {
    pub base_pos: Position,
    pub gold: f64,
    pub lumber: f64,
    pub workers: u32,
    pub soldiers: u32,
    pub tech_tier: u8,
    /// Cost of the next tier, `None` when fully researched.
    pub research_cost: Option<Cost>,
    /// Supply cap minus supply used.
    pub supply_headroom: u32,
    pub has_barracks: bool,
    /// Buildings owned, base included.
    pub building_count: usize,
    /// Soldiers with no movement target, by unit id.
    pub idle_soldiers: Vec<u32>,
    /// Owns a hero and the ability is off cooldown.
    pub hero_ready: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AiAction {
    Train(UnitKind),
    Patrol { unit_id: u32, target: Position },
    Research,
    Construct {
        building_type: BuildingType,
        pos: Position,
    },
    BattleCry,
}

struct Budget {
    gold: f64,
    lumber: f64,
}

impl Budget {
    fn try_spend(&mut self, cost: Cost) -> bool {
        if self.gold >= cost.gold && self.lumber >= cost.lumber {
            self.gold -= cost.gold;
            self.lumber -= cost.lumber;
            true
        } else {
            false
        }
    }
}

/// Plan this tick's actions for one AI nation.
pub fn plan<R: Rng>(ctx: &FactionContext, profile: &AiProfile, rng: &mut R) -> Vec<AiAction> {
    let mut actions = Vec::new();
    let mut budget = Budget {
        gold: ctx.gold,
        lumber: ctx.lumber,
    };
    let mut headroom = ctx.supply_headroom;
    let mut building_count = ctx.building_count;

    // 1. Soldiers
    if ctx.has_barracks
        && ctx.soldiers < profile.soldier_cap
        && headroom >= UnitKind::Soldier.supply()
        && budget.try_spend(SOLDIER_COST)
    {
        headroom -= UnitKind::Soldier.supply();
        actions.push(AiAction::Train(UnitKind::Soldier));
    }

    // 2. Workers
    if ctx.workers < profile.worker_cap
        && headroom >= UnitKind::Worker.supply()
        && budget.try_spend(WORKER_COST)
    {
        actions.push(AiAction::Train(UnitKind::Worker));
    }

    // 3. Patrols
    for &unit_id in &ctx.idle_soldiers {
        let offset = Position::new(
            rng.gen_range(-profile.patrol_offset..=profile.patrol_offset),
            rng.gen_range(-profile.patrol_offset..=profile.patrol_offset),
        );
        actions.push(AiAction::Patrol {
            unit_id,
            target: ctx.base_pos + offset,
        });
    }

    // 4. Research
    if ctx.tech_tier < profile.research_below_tier {
        if let Some(cost) = ctx.research_cost {
            if budget.try_spend(cost) {
                actions.push(AiAction::Research);
            }
        }
    }

    // 5. First barracks
    if !ctx.has_barracks && budget.try_spend(BARRACKS_COST) {
        let pos = jittered(ctx.base_pos, profile.barracks_jitter, rng);
        building_count += 1;
        actions.push(AiAction::Construct {
            building_type: BuildingType::Barracks,
            pos,
        });
    }

    // 6. Towers
    if building_count < profile.building_cap && budget.try_spend(TOWER_COST) {
        let pos = jittered(ctx.base_pos, profile.tower_jitter, rng);
        actions.push(AiAction::Construct {
            building_type: BuildingType::Tower,
            pos,
        });
    }

    // 7. Hero ability
    if ctx.hero_ready && rng.gen::<f64>() < profile.battle_cry_chance {
        actions.push(AiAction::BattleCry);
    }

    actions
}

fn jittered<R: Rng>(center: Position, jitter: f64, rng: &mut R) -> Position {
    center
        + Position::new(
            rng.gen_range(-jitter..=jitter),
            rng.gen_range(-jitter..=jitter),
        )
}
