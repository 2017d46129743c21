//! Fixed-timestep frame loops for the host and client roles.
//!
//! One frame polls the network without blocking, applies inbound records,
//! runs at most one simulation tick (host only) and broadcasts on the
//! host's cadence. The only wait is the sleep until the next frame.

use std::thread;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use eras_core::constants::{DT, MAX_PLAYERS, TICK_RATE};
use eras_core::enums::GamePhase;
use eras_core::state::WorldSnapshot;
use eras_net::{ClientSession, HostSession};
use eras_sim::SimConfig;

use crate::AppError;

/// Nominal duration of one frame.
pub const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Paces a loop at a fixed rate. Falls back to "now" instead of replaying
/// frames when the loop runs too far behind.
pub struct FrameClock {
    next: Instant,
    step: Duration,
}

impl FrameClock {
    pub fn new(step: Duration) -> Self {
        Self {
            next: Instant::now() + step,
            step,
        }
    }

    /// Sleep until the next frame boundary.
    pub fn wait(&mut self) {
        let now = Instant::now();
        if self.next > now {
            thread::sleep(self.next - now);
        } else if now - self.next > self.step * 2 {
            self.next = now;
        }
        self.next += self.step;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(TICK_DURATION)
    }
}

#[derive(Debug, Clone)]
pub struct HostOptions {
    pub bind: String,
    /// Trailing lobby slots filled with AI before peers join.
    pub ai_slots: usize,
    /// Remote players required before the match starts.
    pub min_peers: usize,
    /// Stop after this many frames (runs until game over when `None`).
    pub max_frames: Option<u64>,
    pub sim: SimConfig,
}

#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub connect: String,
    pub name: String,
    pub max_frames: Option<u64>,
}

/// Run an authoritative host until the match ends or the frame budget runs
/// out.
pub fn run_host(options: HostOptions) -> Result<(), AppError> {
    let mut host = HostSession::bind(options.bind.as_str(), options.sim)?;
    if let Some(addr) = host.local_addr() {
        info!(%addr, "host.waiting");
    }
    let first_ai = MAX_PLAYERS.saturating_sub(options.ai_slots).max(1);
    for slot in first_ai..MAX_PLAYERS {
        host.cycle_slot(slot);
    }
    host.toggle_ready();

    let mut clock = FrameClock::default();
    let mut frame = 0u64;
    loop {
        for message in host.frame(DT) {
            info!(nation = message.nation, text = %message.text, "host.status");
        }

        match host.engine().phase() {
            GamePhase::Lobby => {
                if host.peer_count() >= options.min_peers && host.start_match() {
                    info!(setup = ?host.lobby().match_setup(), "host.started");
                }
            }
            GamePhase::Running => {
                if frame % u64::from(TICK_RATE) == 0 {
                    log_state(&host.engine().snapshot());
                }
            }
            GamePhase::GameOver => {
                // Let the final state reach the peers before closing.
                for _ in 0..TICK_RATE {
                    host.frame(DT);
                    clock.wait();
                }
                info!(outcome = ?host.engine().outcome(), "host.game_over");
                return Ok(());
            }
        }

        frame += 1;
        if options.max_frames.is_some_and(|max| frame >= max) {
            info!(frame, "host.frame_budget_spent");
            return Ok(());
        }
        clock.wait();
    }
}

/// Run a passive client: auto-ready, then follow the host's snapshots.
pub fn run_client(options: ClientOptions) -> Result<(), AppError> {
    let mut client = ClientSession::connect(options.connect.as_str(), &options.name)?;
    let mut clock = FrameClock::default();
    let mut frame = 0u64;
    let mut snapshots = 0usize;
    loop {
        let events = client.frame();
        if !client.is_connected() {
            warn!("client.host_lost");
            return Ok(());
        }
        if client.slot().is_some() && !client.ready() {
            client.set_ready(true);
        }
        if events.started {
            info!(nation = ?client.nation(), "client.started");
        }

        let before = snapshots;
        snapshots += events.snapshots;
        if let Some(snapshot) = client.snapshot() {
            // One summary every five snapshots (about a second of host time).
            if snapshots / 5 != before / 5 {
                log_state(snapshot);
            }
            if snapshot.game_over() {
                info!(outcome = ?snapshot.outcome, "client.game_over");
                return Ok(());
            }
        }

        frame += 1;
        if options.max_frames.is_some_and(|max| frame >= max) {
            return Ok(());
        }
        clock.wait();
    }
}

fn log_state(snapshot: &WorldSnapshot) {
    let alive = snapshot.nations.iter().filter(|n| n.base_hp > 0.0).count();
    info!(
        minute = snapshot.time.elapsed_secs / 60.0,
        phase = snapshot.threat_phase,
        alive,
        zombies = snapshot.zombies.len(),
        slain = snapshot.zombies_slain,
        "match.state"
    );
}
