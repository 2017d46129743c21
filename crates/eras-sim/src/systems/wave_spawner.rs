//! Threat director: phase lookup by elapsed time, spawn cadence and batch
//! composition.

use hecs::World;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use eras_core::config::PhaseDef;
use eras_core::constants::*;
use eras_core::enums::ZombieKind;
use eras_core::types::Position;

use crate::world_setup::{self, IdCounters};

/// Spawn timer and the index of the active phase.
#[derive(Debug, Clone, Default)]
pub struct ThreatDirector {
    /// Only ever moves forward.
    pub phase_index: usize,
    pub spawn_timer: f64,
}

impl ThreatDirector {
    /// Advance to the last phase whose start minute has been reached.
    pub fn update_phase(&mut self, phases: &[PhaseDef], minutes: f64) {
        while self.phase_index + 1 < phases.len() && phases[self.phase_index + 1].start_minute <= minutes
        {
            self.phase_index += 1;
        }
    }

    pub fn active<'a>(&self, phases: &'a [PhaseDef]) -> Option<&'a PhaseDef> {
        phases.get(self.phase_index)
    }
}

/// Seconds between batches at a given threat multiplier.
pub fn spawn_interval(threat_multiplier: f64) -> f64 {
    (SPAWN_INTERVAL_BASE - threat_multiplier).max(SPAWN_INTERVAL_MIN)
}

/// Regular zombies per batch at a given threat multiplier.
pub fn batch_size(threat_multiplier: f64) -> usize {
    (SPAWN_BATCH_BASE + threat_multiplier * SPAWN_BATCH_PER_THREAT).floor() as usize
}

/// Random point just inside one of the four map edges.
fn edge_point(rng: &mut ChaCha8Rng) -> Position {
    let inset = rng.gen_range(SPAWN_EDGE_INSET_MIN..=SPAWN_EDGE_INSET_MAX);
    match rng.gen_range(0..4) {
        0 => Position::new(rng.gen_range(0.0..=MAP_WIDTH), inset),
        1 => Position::new(rng.gen_range(0.0..=MAP_WIDTH), MAP_HEIGHT - inset),
        2 => Position::new(inset, rng.gen_range(0.0..=MAP_HEIGHT)),
        _ => Position::new(MAP_WIDTH - inset, rng.gen_range(0.0..=MAP_HEIGHT)),
    }
}

/// Advance the phase and spawn timer; emit a batch when the timer elapses.
/// Returns the number of zombies spawned this tick.
pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    director: &mut ThreatDirector,
    phases: &[PhaseDef],
    ids: &mut IdCounters,
    minutes: f64,
    dt: f64,
) -> usize {
    director.update_phase(phases, minutes);
    let Some(phase) = director.active(phases) else {
        return 0;
    };

    director.spawn_timer += dt;
    if director.spawn_timer < spawn_interval(phase.threat_multiplier) {
        return 0;
    }
    director.spawn_timer = 0.0;

    let mut regulars = batch_size(phase.threat_multiplier);
    let boss = phase.boss_chance > 0.0 && rng.gen::<f64>() < phase.boss_chance;
    if boss {
        regulars = regulars.saturating_sub(BOSS_BATCH_REDUCTION).max(1);
        let at = edge_point(rng);
        world_setup::spawn_zombie(world, ids, ZombieKind::Boss, at);
    }
    for _ in 0..regulars {
        let at = edge_point(rng);
        let kind = phase
            .variants
            .choose(rng)
            .copied()
            .unwrap_or(ZombieKind::Shambler);
        world_setup::spawn_zombie(world, ids, kind, at);
    }

    let spawned = regulars + usize::from(boss);
    debug!(phase = %phase.name, spawned, boss, "threat.batch");
    spawned
}
