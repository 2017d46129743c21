#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use eras_core::enums::{BuildingType, UnitKind};
    use eras_core::types::{Cost, Position};

    use crate::planner::{plan, AiAction, FactionContext};
    use crate::profile::AiProfile;

    fn context(gold: f64, lumber: f64) -> FactionContext {
        FactionContext {
            base_pos: Position::new(300.0, 200.0),
            gold,
            lumber,
            workers: 8,
            soldiers: 4,
            tech_tier: 1,
            research_cost: Some(Cost::new(280.0, 180.0)),
            supply_headroom: 10,
            has_barracks: true,
            building_count: 4,
            idle_soldiers: Vec::new(),
            hero_ready: false,
        }
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    #[test]
    fn test_broke_nation_does_nothing() {
        let actions = plan(&context(0.0, 0.0), &AiProfile::default(), &mut rng());
        assert!(actions.is_empty());
    }

    #[test]
    fn test_priority_order() {
        let mut ctx = context(10_000.0, 10_000.0);
        ctx.building_count = 1;
        let actions = plan(&ctx, &AiProfile::passive(), &mut rng());
        assert_eq!(actions[0], AiAction::Train(UnitKind::Soldier));
        assert_eq!(actions[1], AiAction::Train(UnitKind::Worker));
        assert_eq!(actions[2], AiAction::Research);
        assert!(matches!(
            actions[3],
            AiAction::Construct {
                building_type: BuildingType::Tower,
                ..
            }
        ));
        assert_eq!(actions.len(), 4);
    }

    /// Each gate sees the budget left by the actions planned before it.
    #[test]
    fn test_budget_is_shared() {
        // Enough for one soldier, not a worker afterwards.
        let actions = plan(&context(120.0, 40.0), &AiProfile::default(), &mut rng());
        assert_eq!(actions, vec![AiAction::Train(UnitKind::Soldier)]);
    }

    #[test]
    fn test_soldiers_need_barracks_and_cap() {
        let mut ctx = context(100.0, 30.0);
        ctx.has_barracks = false;
        ctx.building_count = 4;
        let actions = plan(&ctx, &AiProfile::default(), &mut rng());
        assert_eq!(actions, vec![AiAction::Train(UnitKind::Worker)]);

        let mut ctx = context(100.0, 30.0);
        ctx.soldiers = 14;
        ctx.workers = 12;
        assert!(plan(&ctx, &AiProfile::default(), &mut rng()).is_empty());
    }

    #[test]
    fn test_supply_headroom_limits_training() {
        let mut ctx = context(10_000.0, 10_000.0);
        ctx.supply_headroom = 1;
        ctx.tech_tier = 3;
        let actions = plan(&ctx, &AiProfile::default(), &mut rng());
        let trained: Vec<_> = actions
            .iter()
            .filter(|a| matches!(a, AiAction::Train(_)))
            .collect();
        assert_eq!(trained, vec![&AiAction::Train(UnitKind::Soldier)]);
    }

    #[test]
    fn test_idle_soldiers_patrol_near_base() {
        let mut ctx = context(0.0, 0.0);
        ctx.idle_soldiers = vec![5, 9];
        let actions = plan(&ctx, &AiProfile::default(), &mut rng());
        assert_eq!(actions.len(), 2);
        for action in actions {
            match action {
                AiAction::Patrol { unit_id, target } => {
                    assert!(unit_id == 5 || unit_id == 9);
                    assert!((target.x - ctx.base_pos.x).abs() <= 60.0);
                    assert!((target.y - ctx.base_pos.y).abs() <= 60.0);
                }
                other => panic!("unexpected action {other:?}"),
            }
        }
    }

    #[test]
    fn test_research_stops_at_tier_three() {
        let mut ctx = context(1_000.0, 1_000.0);
        ctx.soldiers = 14;
        ctx.workers = 12;
        ctx.tech_tier = 3;
        ctx.research_cost = Some(Cost::new(820.0, 520.0));
        let actions = plan(&ctx, &AiProfile::default(), &mut rng());
        assert!(!actions.contains(&AiAction::Research));
    }

    #[test]
    fn test_first_barracks_counts_toward_building_cap() {
        let mut ctx = context(1_000.0, 1_000.0);
        ctx.has_barracks = false;
        ctx.building_count = 3;
        ctx.workers = 12;
        ctx.research_cost = None;
        let actions = plan(&ctx, &AiProfile::default(), &mut rng());
        assert_eq!(actions.len(), 1);
        match actions[0] {
            AiAction::Construct { building_type, pos } => {
                assert_eq!(building_type, BuildingType::Barracks);
                assert!((pos.x - ctx.base_pos.x).abs() <= 60.0);
            }
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn test_battle_cry_roll() {
        let mut ctx = context(0.0, 0.0);
        ctx.hero_ready = true;
        let always = AiProfile {
            battle_cry_chance: 1.0,
            ..AiProfile::default()
        };
        assert_eq!(plan(&ctx, &always, &mut rng()), vec![AiAction::BattleCry]);
        assert!(plan(&ctx, &AiProfile::passive(), &mut rng()).is_empty());
    }

    #[test]
    fn test_same_seed_same_plan() {
        let mut ctx = context(5_000.0, 5_000.0);
        ctx.has_barracks = false;
        ctx.building_count = 1;
        ctx.idle_soldiers = vec![1, 2, 3];
        let a = plan(&ctx, &AiProfile::default(), &mut rng());
        let b = plan(&ctx, &AiProfile::default(), &mut rng());
        assert_eq!(a, b);
    }
}
