//! Headless skirmish runner: every nation AI driven, no player nation, the
//! last base standing wins.

use tracing::info;

use eras_core::commands::MatchSetup;
use eras_core::config::SessionConfig;
use eras_core::constants::{NATION_COUNT, TICK_RATE};
use eras_core::enums::GamePhase;
use eras_core::events::Outcome;
use eras_core::state::WorldSnapshot;
use eras_sim::{SimConfig, SimulationEngine};

#[derive(Debug, Clone)]
pub struct HeadlessOptions {
    pub ticks: u64,
    pub seed: u64,
    /// Ticks between summaries. Zero disables them.
    pub log_interval: u64,
    pub session: SessionConfig,
}

impl Default for HeadlessOptions {
    fn default() -> Self {
        Self {
            ticks: 20 * 60 * u64::from(TICK_RATE),
            seed: 42,
            log_interval: 60 * u64::from(TICK_RATE),
            session: SessionConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessReport {
    pub lines: Vec<String>,
    pub outcome: Option<Outcome>,
    pub ticks_run: u64,
}

pub fn run(options: HeadlessOptions) -> HeadlessReport {
    let mut engine = SimulationEngine::new(SimConfig {
        seed: options.seed,
        session: options.session,
        ..Default::default()
    });
    engine.start_match(&MatchSetup::skirmish(NATION_COUNT));

    let mut lines = Vec::new();
    let mut ticks_run = 0;
    while ticks_run < options.ticks && engine.phase() == GamePhase::Running {
        engine.tick();
        ticks_run += 1;
        if options.log_interval > 0 && ticks_run % options.log_interval == 0 {
            lines.push(summary(&engine));
        }
        lines.extend(engine.drain_messages().into_iter().map(|m| m.text));
    }

    let snapshot = engine.snapshot();
    lines.push(final_line(engine.outcome(), &snapshot));
    info!(
        ticks = ticks_run,
        outcome = ?engine.outcome(),
        slain = engine.zombies_slain(),
        "headless.finished"
    );
    HeadlessReport {
        lines,
        outcome: engine.outcome(),
        ticks_run,
    }
}

/// Phase banner followed by one line per living nation.
pub fn summary(engine: &SimulationEngine) -> String {
    let snapshot = engine.snapshot();
    let minutes = snapshot.time.elapsed_secs / 60.0;
    let mut text = match engine.session().phases.get(engine.threat_phase()) {
        Some(phase) if phase.special.is_empty() => {
            format!("\n== Minute {minutes:.1} ({}) ==", phase.name)
        }
        Some(phase) => format!(
            "\n== Minute {minutes:.1} ({}) ==\n{}",
            phase.name, phase.special
        ),
        None => format!("\n== Minute {minutes:.1} =="),
    };

    let living: Vec<_> = snapshot.nations.iter().filter(|n| n.base_hp > 0.0).collect();
    if living.is_empty() {
        text.push_str("\nAll nations have fallen.");
        return text;
    }
    for nation in living {
        text.push_str(&format!(
            "\n{}: Tier {}, Soldiers {}, Workers {}, Base {:.0}, Gold {:.0}, Lumber {:.0}",
            nation.name,
            nation.tech_tier,
            nation.soldiers,
            nation.workers,
            nation.base_hp,
            nation.resources.gold,
            nation.resources.lumber,
        ));
    }
    text
}

pub fn final_line(outcome: Option<Outcome>, snapshot: &WorldSnapshot) -> String {
    match outcome {
        Some(Outcome::Winner { nation }) => {
            let name = snapshot
                .nation(nation)
                .map(|n| n.name.as_str())
                .unwrap_or("Unknown");
            format!("Winner: {name}")
        }
        Some(Outcome::Extinction) => "The zombies consumed every nation.".to_string(),
        Some(Outcome::Victory) => "Victory.".to_string(),
        Some(Outcome::Defeat) => "Defeat.".to_string(),
        None => "Time limit reached.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_report() {
        let options = HeadlessOptions {
            ticks: 1800,
            log_interval: 600,
            ..Default::default()
        };
        let a = run(options.clone());
        let b = run(options);
        assert_eq!(a, b);
        assert_eq!(a.ticks_run, 1800);
    }

    #[test]
    fn test_summaries_on_interval() {
        let report = run(HeadlessOptions {
            ticks: 1200,
            log_interval: 600,
            ..Default::default()
        });
        let summaries: Vec<&String> = report
            .lines
            .iter()
            .filter(|l| l.starts_with("\n== Minute"))
            .collect();
        assert_eq!(summaries.len(), 2);
        assert!(summaries[0].contains("(Scouting Swarm)"));
        assert!(summaries[0].contains("Aurelian Dominion: Tier"));
        assert!(summaries[0].contains("Tideborne Assembly: Tier"));
    }

    #[test]
    fn test_time_limit_line() {
        let report = run(HeadlessOptions {
            ticks: 10,
            log_interval: 0,
            ..Default::default()
        });
        assert_eq!(report.outcome, None);
        assert_eq!(report.lines, vec!["Time limit reached.".to_string()]);
    }

    #[test]
    fn test_final_line_formats() {
        let mut snapshot = WorldSnapshot::default();
        snapshot.nations.push(eras_core::state::NationView {
            nation_id: 3,
            name: "Skyforge Union".to_string(),
            base_pos: Default::default(),
            base_hp: 40.0,
            base_max_hp: 250.0,
            resources: SessionConfig::default().starting_resources,
            workers: 0,
            soldiers: 0,
            tech_tier: 1,
            ai_controlled: true,
            hero_cooldown: 0.0,
            units: Vec::new(),
            buildings: Vec::new(),
        });
        assert_eq!(
            final_line(Some(Outcome::Winner { nation: 3 }), &snapshot),
            "Winner: Skyforge Union"
        );
        assert_eq!(
            final_line(Some(Outcome::Extinction), &snapshot),
            "The zombies consumed every nation."
        );
    }

    #[test]
    fn test_match_ends_when_one_nation_stands() {
        let mut session = SessionConfig::default();
        // Strip every nation's defenders so the first waves decide the match.
        session.starting_soldiers = 0;
        session.starting_workers = 0;
        session.starting_heroes = 0;
        session.starting_resources.gold = 0.0;
        session.starting_resources.lumber = 0.0;
        let report = run(HeadlessOptions {
            ticks: 60 * 60 * u64::from(TICK_RATE),
            log_interval: 0,
            session,
            ..Default::default()
        });
        let last = report.lines.last().unwrap();
        assert!(
            last.starts_with("Winner: ") || last == "The zombies consumed every nation.",
            "unexpected final line {last}"
        );
        assert!(report.lines.iter().any(|l| l.ends_with("has fallen.")));
    }
}
