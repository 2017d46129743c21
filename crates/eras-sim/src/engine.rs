//! Simulation engine, the session orchestrator.
//!
//! `SimulationEngine` owns the hecs ECS world, the nations, the seeded RNG
//! and the threat director. It applies queued commands at the tick boundary,
//! runs all systems in a fixed order, and produces `WorldSnapshot`s.
//! Completely headless, enabling deterministic testing.

use std::collections::{BTreeSet, VecDeque};

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use eras_ai::profile::AiProfile;
use eras_core::commands::{Intent, MatchSetup, SessionCommand};
use eras_core::components::{Owner, Unit};
use eras_core::config::SessionConfig;
use eras_core::constants::DT;
use eras_core::enums::{BuildingType, GamePhase};
use eras_core::errors::Rejection;
use eras_core::events::{Outcome, StatusMessage};
use eras_core::nation::Nation;
use eras_core::state::WorldSnapshot;
use eras_core::types::SimTime;

use crate::economy;
use crate::systems;
use crate::systems::snapshot::SessionView;
use crate::systems::victory::Objectives;
use crate::systems::wave_spawner::ThreatDirector;
use crate::world_setup::{self, IdCounters};

/// Configuration for starting a new simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Seconds per tick.
    pub dt: f64,
    pub session: SessionConfig,
    pub ai: AiProfile,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            dt: DT,
            session: SessionConfig::default(),
            ai: AiProfile::default(),
        }
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    nations: Vec<Nation>,
    time: SimTime,
    dt: f64,
    phase: GamePhase,
    paused: bool,
    rng: ChaCha8Rng,
    session: SessionConfig,
    ai_profile: AiProfile,
    ids: IdCounters,
    director: ThreatDirector,
    zombies_slain: u32,
    outcome: Option<Outcome>,
    player: Option<usize>,
    selection: BTreeSet<u32>,
    command_queue: VecDeque<SessionCommand>,
    messages: Vec<StatusMessage>,
    despawn_buffer: Vec<hecs::Entity>,
}

impl SimulationEngine {
    /// Create a new simulation engine with the given config.
    pub fn new(config: SimConfig) -> Self {
        Self {
            world: World::new(),
            nations: Vec::new(),
            time: SimTime::default(),
            dt: config.dt,
            phase: GamePhase::default(),
            paused: false,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            session: config.session,
            ai_profile: config.ai,
            ids: IdCounters::default(),
            director: ThreatDirector::default(),
            zombies_slain: 0,
            outcome: None,
            player: None,
            selection: BTreeSet::new(),
            command_queue: VecDeque::new(),
            messages: Vec::new(),
            despawn_buffer: Vec::new(),
        }
    }

    /// Queue a command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: SessionCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = SessionCommand>) {
        self.command_queue.extend(commands);
    }

    /// Apply queued commands, then advance one step if running and not paused.
    pub fn tick(&mut self) {
        self.process_commands();

        if self.phase == GamePhase::Running && !self.paused {
            self.run_systems();
        }
    }

    /// Build a full snapshot of the current state.
    pub fn snapshot(&self) -> WorldSnapshot {
        systems::snapshot::build_snapshot(
            &self.world,
            &self.nations,
            &SessionView {
                time: self.time,
                phase: self.phase,
                paused: self.paused,
                threat_phase: self.director.phase_index,
                zombies_slain: self.zombies_slain,
                objectives: self.objectives(),
                outcome: self.outcome,
            },
        )
    }

    /// Take every status message produced since the last call.
    pub fn drain_messages(&mut self) -> Vec<StatusMessage> {
        std::mem::take(&mut self.messages)
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn zombies_slain(&self) -> u32 {
        self.zombies_slain
    }

    pub fn nations(&self) -> &[Nation] {
        &self.nations
    }

    pub fn session(&self) -> &SessionConfig {
        &self.session
    }

    /// The active threat phase index.
    pub fn threat_phase(&self) -> usize {
        self.director.phase_index
    }

    /// The player's selected unit ids. Dead units are pruned every tick.
    pub fn selection(&self) -> &BTreeSet<u32> {
        &self.selection
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    #[cfg(test)]
    pub fn nation_mut(&mut self, nation_id: usize) -> &mut Nation {
        &mut self.nations[nation_id]
    }

    /// Spawn a zombie directly (for tests).
    #[cfg(test)]
    pub fn spawn_test_zombie(
        &mut self,
        kind: eras_core::enums::ZombieKind,
        at: eras_core::types::Position,
    ) -> u32 {
        world_setup::spawn_zombie(&mut self.world, &mut self.ids, kind, at)
    }

    /// Run one step of `systems` regardless of phase (for tests).
    #[cfg(test)]
    pub fn step(&mut self) {
        self.run_systems();
    }

    fn objectives(&self) -> Objectives {
        Objectives {
            minutes: self.session.objective_minutes,
            kills: self.session.objective_kills,
        }
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single session command.
    fn handle_command(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::StartMatch { setup } => {
                if matches!(self.phase, GamePhase::Lobby | GamePhase::GameOver) {
                    self.start_match(&setup);
                }
            }
            SessionCommand::Pause => {
                if self.phase == GamePhase::Running {
                    self.paused = true;
                }
            }
            SessionCommand::Resume => {
                self.paused = false;
            }
            SessionCommand::Select { unit_ids } => {
                let Some(player) = self.player else {
                    return;
                };
                let owned: BTreeSet<u32> = self
                    .world
                    .query::<(&Unit, &Owner)>()
                    .iter()
                    .filter(|(_, (_, owner))| owner.0 == player)
                    .map(|(_, (unit, _))| unit.id)
                    .collect();
                self.selection = unit_ids.into_iter().filter(|id| owned.contains(id)).collect();
            }
            SessionCommand::Issue { nation, intent } => {
                if self.phase != GamePhase::Running {
                    return;
                }
                match self.apply_intent(nation, &intent) {
                    Ok(Some(text)) => self.push_message(nation, text),
                    Ok(None) => {}
                    Err(rejection) => {
                        debug!(nation, ?intent, %rejection, "intent.rejected");
                        self.push_message(nation, rejection.to_string());
                    }
                }
            }
        }
    }

    /// Build the world from `setup` and enter `Running` immediately,
    /// without running a step.
    pub fn start_match(&mut self, setup: &MatchSetup) {
        self.world.clear();
        self.ids = IdCounters::default();
        self.nations =
            world_setup::setup_match(&mut self.world, &mut self.ids, setup, &self.session);
        self.time = SimTime::default();
        self.director = ThreatDirector::default();
        self.zombies_slain = 0;
        self.outcome = None;
        self.player = setup.local_nation;
        self.selection.clear();
        self.messages.clear();
        self.paused = false;
        self.phase = GamePhase::Running;
        info!(
            active = setup.active_nations.len(),
            player = ?setup.local_nation,
            "match.started"
        );
    }

    /// Apply one intent to `nation_id`. `Ok(Some(text))` carries a
    /// confirmation line for the status log.
    fn apply_intent(
        &mut self,
        nation_id: usize,
        intent: &Intent,
    ) -> Result<Option<String>, Rejection> {
        let Some(nation) = self.nations.get_mut(nation_id) else {
            return Ok(None);
        };
        if !nation.is_alive() {
            return Err(Rejection::NationFallen);
        }

        match intent {
            Intent::TrainSoldier => {
                economy::train_soldier(&mut self.world, nation, &mut self.ids, &mut self.rng)?;
                Ok(None)
            }
            Intent::TrainWorker => {
                economy::train_worker(&mut self.world, nation, &mut self.ids, &mut self.rng)?;
                Ok(None)
            }
            Intent::Research => {
                let tier = economy::research(nation, &self.session)?;
                Ok(Some(format!("Tech Tier {tier} reached.")))
            }
            Intent::BattleCry => {
                economy::battle_cry(&mut self.world, nation)?;
                Ok(Some("Battle cry! Units gain speed and attack.".to_string()))
            }
            Intent::PlaceBuilding { building_type, pos } => {
                economy::place_building(&mut self.world, nation, &mut self.ids, *building_type, *pos)?;
                let label = match building_type {
                    BuildingType::Barracks => "Barracks",
                    BuildingType::Tower => "Tower",
                    BuildingType::Base => "Base",
                };
                Ok(Some(format!("{label} constructed.")))
            }
            Intent::Order { unit_ids, pos } => {
                economy::issue_order(&mut self.world, nation_id, unit_ids, *pos);
                Ok(None)
            }
        }
    }

    fn push_message(&mut self, nation: usize, text: String) {
        self.messages.push(StatusMessage {
            nation,
            text,
            tick: self.time.tick,
        });
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        let dt = self.dt;

        // 1. Clock
        self.time.advance(dt);
        let minutes = self.time.minutes();

        // 2. Threat director
        systems::wave_spawner::run(
            &mut self.world,
            &mut self.rng,
            &mut self.director,
            &self.session.phases,
            &mut self.ids,
            minutes,
            dt,
        );

        // 3. Per-nation economy, AI, units, harvesting and towers
        for nation in self.nations.iter_mut() {
            if !nation.is_alive() {
                continue;
            }
            let gather_bonus = nation.bonuses.gather;
            economy::gather(nation, dt, gather_bonus);
            if nation.ai_controlled {
                systems::ai::run(
                    &mut self.world,
                    nation,
                    &self.session,
                    &self.ai_profile,
                    &mut self.ids,
                    &mut self.rng,
                );
            }
            nation.hero_cooldown = (nation.hero_cooldown - dt).max(0.0);
            systems::movement::advance_units(&mut self.world, nation.id, dt);
            systems::harvest::run(&mut self.world, nation, dt);
            systems::towers::run(&mut self.world, nation, dt);
        }

        // 4. Zombie movement
        systems::movement::advance_zombies(&mut self.world, &self.nations, dt);

        // 5. Combat
        let fallen = systems::combat::run(&mut self.world, &mut self.nations, dt);
        for nation_id in fallen {
            let name = self.nations[nation_id].name.clone();
            info!(nation = nation_id, %name, tick = self.time.tick, "nation.fallen");
            self.push_message(nation_id, format!("{name} has fallen."));
        }

        // 6. Cleanup
        self.zombies_slain += systems::cleanup::run(
            &mut self.world,
            &mut self.nations,
            &mut self.selection,
            &mut self.despawn_buffer,
        );

        // 7. Game over
        if let Some(outcome) = systems::victory::evaluate(
            &self.nations,
            self.player,
            minutes,
            self.zombies_slain,
            self.objectives(),
        ) {
            self.outcome = Some(outcome);
            self.phase = GamePhase::GameOver;
            info!(?outcome, tick = self.time.tick, slain = self.zombies_slain, "match.over");
        }
    }
}
