#[cfg(test)]
mod tests {
    use crate::commands::{Intent, MatchSetup, SessionCommand};
    use crate::config::{ConfigError, SessionConfig};
    use crate::constants::*;
    use crate::enums::*;
    use crate::errors::Rejection;
    use crate::events::Outcome;
    use crate::nation::{Nation, NationBonuses, Resources};
    use crate::state::{NationView, UnitView, WorldSnapshot};
    use crate::stats::{construction, tower_damage, unit_stats, zombie_stats};
    use crate::types::{Cost, Position, SimTime};

    fn nation(gold: f64, lumber: f64) -> Nation {
        Nation {
            id: 0,
            name: "Test".to_string(),
            base_pos: Position::new(100.0, 100.0),
            base_hp: BASE_MAX_HP,
            base_max_hp: BASE_MAX_HP,
            resources: Resources {
                gold,
                lumber,
                ..Resources::default()
            },
            workers: 0,
            soldiers: 0,
            tech_tier: 1,
            ai_controlled: false,
            hero_cooldown: 0.0,
            bonuses: NationBonuses::default(),
        }
    }

    #[test]
    fn test_spend_reduces_by_exact_amount() {
        let mut n = nation(200.0, 100.0);
        assert!(n.can_afford(SOLDIER_COST));
        n.spend(SOLDIER_COST);
        assert_eq!(n.resources.gold, 110.0);
        assert_eq!(n.resources.lumber, 70.0);
        n.spend(SOLDIER_COST);
        assert!(!n.can_afford(SOLDIER_COST));
    }

    /// Spending trusts the caller and may drive balances negative.
    #[test]
    fn test_spend_never_clamps() {
        let mut n = nation(10.0, 0.0);
        n.spend(Cost::new(50.0, 15.0));
        assert_eq!(n.resources.gold, -40.0);
        assert_eq!(n.resources.lumber, -15.0);
    }

    #[test]
    fn test_damage_base_reports_fall_once() {
        let mut n = nation(0.0, 0.0);
        n.base_hp = 1.0;
        assert!(n.damage_base(10.0));
        assert_eq!(n.base_hp, 0.0);
        assert!(!n.is_alive());
        assert!(!n.damage_base(10.0), "a dead base cannot fall twice");
    }

    #[test]
    fn test_unit_supply_and_experience() {
        assert_eq!(UnitKind::Worker.supply(), 1);
        assert_eq!(UnitKind::Soldier.supply(), 1);
        assert_eq!(UnitKind::Hero.supply(), 2);
        assert!(!UnitKind::Worker.gains_experience());
        assert!(UnitKind::Soldier.gains_experience());
        assert!(UnitKind::Hero.gains_experience());
    }

    #[test]
    fn test_stat_tables() {
        assert_eq!(unit_stats(UnitKind::Soldier).attack, 18.0);
        assert_eq!(unit_stats(UnitKind::Hero).hp, 220.0);
        assert_eq!(zombie_stats(ZombieKind::Boss).combat.hp, 420.0);
        assert_eq!(zombie_stats(ZombieKind::Spitter).combat.range, 80.0);
        assert!(construction(BuildingType::Base).is_none());
        assert_eq!(construction(BuildingType::Tower), Some((TOWER_COST, 180.0)));
        assert_eq!(tower_damage(1), 15.0);
        assert_eq!(tower_damage(4), 24.0);
    }

    #[test]
    fn test_research_cost_table() {
        let config = SessionConfig::default();
        assert_eq!(config.max_tier(), 4);
        assert_eq!(config.research_cost(1), Some(Cost::new(280.0, 180.0)));
        assert_eq!(config.research_cost(3), Some(Cost::new(820.0, 520.0)));
        assert_eq!(config.research_cost(4), None);
    }

    #[test]
    fn test_default_config_tables() {
        let config = SessionConfig::default();
        assert_eq!(config.nations.len(), NATION_COUNT);
        assert_eq!(config.nation_name(0), "Aurelian Dominion");
        assert_eq!(config.nation_name(99), "Unknown");
        assert_eq!(config.phases.len(), 4);
        assert_eq!(config.phases[3].start_minute, 45.0);
        assert!(config.phases[3].variants.contains(&ZombieKind::Brute));
        assert_eq!(config.objective_kills, 220);
    }

    #[test]
    fn test_config_partial_override() {
        let config =
            SessionConfig::from_json_str(r#"{"objective_minutes": 5.0, "starting_workers": 2}"#)
                .unwrap();
        assert_eq!(config.objective_minutes, 5.0);
        assert_eq!(config.starting_workers, 2);
        assert_eq!(config.starting_soldiers, 4);
        assert_eq!(config.nations.len(), NATION_COUNT);
    }

    #[test]
    fn test_config_rejects_bad_tables() {
        let err = SessionConfig::from_json_str(r#"{"phases": []}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let unordered = r#"{"phases": [
            {"name": "b", "start_minute": 10.0, "threat_multiplier": 1.0, "variants": ["runner"]},
            {"name": "a", "start_minute": 0.0, "threat_multiplier": 1.0, "variants": ["shambler"]}
        ]}"#;
        assert!(matches!(
            SessionConfig::from_json_str(unordered),
            Err(ConfigError::Invalid(_))
        ));

        assert!(matches!(
            SessionConfig::from_json_str("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_config_missing_file() {
        let err = SessionConfig::from_path(std::path::Path::new("/nonexistent/eras.json"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_rejection_messages() {
        assert_eq!(
            Rejection::InsufficientResources.to_string(),
            "Not enough resources."
        );
        assert_eq!(
            Rejection::SupplyCapReached.to_string(),
            "Supply cap reached. Build more towers/barracks."
        );
        assert_eq!(Rejection::PlacementBlocked.to_string(), "Placement blocked.");
    }

    /// Intents are flat records discriminated by `action`; positions are pairs.
    #[test]
    fn test_intent_wire_shape() {
        let intent = Intent::PlaceBuilding {
            building_type: BuildingType::Tower,
            pos: Position::new(12.5, 40.0),
        };
        let json = serde_json::to_value(&intent).unwrap();
        assert_eq!(json["action"], "place_building");
        assert_eq!(json["building_type"], "tower");
        assert_eq!(json["pos"], serde_json::json!([12.5, 40.0]));

        let order: Intent =
            serde_json::from_str(r#"{"action": "order", "pos": [1.0, 2.0]}"#).unwrap();
        assert_eq!(
            order,
            Intent::Order {
                unit_ids: Vec::new(),
                pos: Position::new(1.0, 2.0)
            }
        );
    }

    #[test]
    fn test_session_command_serde() {
        let cmd = SessionCommand::StartMatch {
            setup: MatchSetup::single_player(NATION_COUNT, 2),
        };
        let json = serde_json::to_string(&cmd).unwrap();
        let back: SessionCommand = serde_json::from_str(&json).unwrap();
        assert_eq!(cmd, back);
    }

    #[test]
    fn test_match_setup_constructors() {
        let skirmish = MatchSetup::skirmish(3);
        assert_eq!(skirmish.active_nations, vec![0, 1, 2]);
        assert!(skirmish.human_nations.is_empty());
        assert_eq!(skirmish.local_nation, None);

        let single = MatchSetup::single_player(8, 5);
        assert_eq!(single.human_nations, vec![5]);
        assert_eq!(single.local_nation, Some(5));
    }

    #[test]
    fn test_slot_status() {
        assert!(SlotStatus::Ai.is_occupied());
        assert!(!SlotStatus::Ai.is_human());
        assert!(!SlotStatus::Open.is_occupied());
        assert!(!SlotStatus::Closed.is_occupied());
        assert!(SlotStatus::Remote.is_human());
        assert_eq!(serde_json::to_string(&SlotStatus::Local).unwrap(), "\"local\"");
    }

    /// Floats survive the wire bit-exactly.
    #[test]
    fn test_snapshot_round_trip_exact() {
        let snapshot = WorldSnapshot {
            time: SimTime {
                tick: 77,
                elapsed_secs: 77.0 / 60.0,
            },
            phase: GamePhase::Running,
            outcome: Some(Outcome::Winner { nation: 3 }),
            nations: vec![NationView {
                nation_id: 3,
                name: "Skyforge Union".to_string(),
                base_pos: Position::new(460.0, 220.0),
                base_hp: 249.1 / 3.0,
                base_max_hp: BASE_MAX_HP,
                resources: Resources {
                    gold: 0.1 + 0.2,
                    lumber: 1.0 / 7.0,
                    food: 17,
                    arcana: 0.0,
                },
                workers: 8,
                soldiers: 4,
                tech_tier: 2,
                ai_controlled: true,
                hero_cooldown: 12.345_678_9,
                units: vec![UnitView {
                    unit_id: 42,
                    pos: Position::new(101.0 / 3.0, 2.0_f64.sqrt()),
                    unit_type: UnitKind::Soldier,
                    hp: 90.0,
                    speed: 72.0,
                    attack: 18.0,
                    range: 55.0,
                    cooldown: 1.1,
                    cooldown_timer: 0.3,
                    buff_timer: 0.0,
                    level: 2,
                    xp: 4.0,
                }],
                buildings: Vec::new(),
            }],
            ..WorldSnapshot::default()
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: WorldSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot, back);
        assert_eq!(back.unit_ids(3).into_iter().collect::<Vec<_>>(), vec![42]);
        assert!(back.unit_ids(0).is_empty());
        assert!(!back.game_over());
    }

    #[test]
    fn test_sim_time_advance() {
        let mut time = SimTime::default();
        for _ in 0..3600 {
            time.advance(DT);
        }
        assert_eq!(time.tick, 3600);
        assert!((time.minutes() - 1.0).abs() < 1e-9);
    }
}
