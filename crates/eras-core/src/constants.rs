//! Simulation constants and tuning parameters.

use crate::types::Cost;

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Map ---

/// Playable map width in world units.
pub const MAP_WIDTH: f64 = 1280.0;

/// Playable map height in world units (screen height minus the UI strip).
pub const MAP_HEIGHT: f64 = 550.0;

/// Number of nation blueprints (and therefore nation slots in a world).
pub const NATION_COUNT: usize = 8;

/// Base positions, indexed by nation id.
pub const BASE_POSITIONS: [(f64, f64); NATION_COUNT] = [
    (270.0, 190.0),
    (360.0, 260.0),
    (320.0, 350.0),
    (460.0, 220.0),
    (480.0, 330.0),
    (560.0, 230.0),
    (520.0, 110.0),
    (620.0, 370.0),
];

// --- Nations ---

/// Hit points of a freshly placed base.
pub const BASE_MAX_HP: f64 = 250.0;

/// Supply available with no barracks or towers.
pub const SUPPLY_BASE: u32 = 12;

/// Supply granted per barracks.
pub const SUPPLY_PER_BARRACKS: u32 = 4;

/// Supply granted per tower.
pub const SUPPLY_PER_TOWER: u32 = 2;

/// Supply consumed by a hero.
pub const HERO_SUPPLY: u32 = 2;

/// Food floor slack above `workers + soldiers`.
pub const FOOD_FLOOR_SLACK: u32 = 4;

/// Gold per worker per second (before the nation's gather bonus).
pub const GOLD_PER_WORKER: f64 = 2.2;

/// Lumber per worker per second (before the nation's gather bonus).
pub const LUMBER_PER_WORKER: f64 = 1.6;

/// Highest reachable tech tier.
pub const MAX_TECH_TIER: u8 = 4;

// --- Production ---

pub const SOLDIER_COST: Cost = Cost::new(90.0, 30.0);
pub const WORKER_COST: Cost = Cost::new(50.0, 15.0);
pub const BARRACKS_COST: Cost = Cost::new(140.0, 80.0);
pub const TOWER_COST: Cost = Cost::new(120.0, 100.0);

/// Spawn jitter (half-width) around the base for new soldiers.
pub const SOLDIER_SPAWN_JITTER: f64 = 25.0;

/// Spawn jitter (half-width) around the base for new workers.
pub const WORKER_SPAWN_JITTER: f64 = 20.0;

pub const BARRACKS_HP: f64 = 200.0;
pub const TOWER_HP: f64 = 180.0;

/// Minimum distance between a new building and the owner's base.
pub const PLACEMENT_MIN_BASE_DISTANCE: f64 = 40.0;

/// Minimum distance between a new building and any existing building.
pub const PLACEMENT_MIN_SPACING: f64 = 22.0;

// --- Units ---

/// Distance at which a moving entity counts as arrived.
pub const ARRIVAL_RADIUS: f64 = 2.0;

/// Experience gained per successful attack.
pub const XP_PER_HIT: f64 = 4.0;

/// Experience needed per level (threshold is `level * XP_PER_LEVEL`).
pub const XP_PER_LEVEL: f64 = 80.0;

pub const LEVEL_UP_HP: f64 = 10.0;
pub const LEVEL_UP_ATTACK: f64 = 2.0;

/// Speed multiplier while a battle-cry buff is active.
pub const BUFF_SPEED_FACTOR: f64 = 1.25;

/// Attack multiplier while a battle-cry buff is active.
pub const BUFF_ATTACK_FACTOR: f64 = 1.35;

// --- Hero ability ---

pub const BATTLE_CRY_COOLDOWN_SECS: f64 = 18.0;
pub const BATTLE_CRY_DURATION_SECS: f64 = 6.0;
pub const BATTLE_CRY_RADIUS: f64 = 160.0;

// --- Harvesting ---

pub const RESOURCE_NODE_AMOUNT: f64 = 1200.0;

/// Distance from a node within which a worker harvests.
pub const HARVEST_RADIUS: f64 = 22.0;

/// Resource units harvested per worker per second.
pub const HARVEST_RATE: f64 = 6.0;

/// Offset of the gold (negative) and lumber (positive) nodes from a base.
pub const NODE_OFFSET_X: f64 = 40.0;
pub const NODE_OFFSET_Y: f64 = 55.0;

// --- Towers ---

pub const TOWER_RANGE: f64 = 150.0;
pub const TOWER_COOLDOWN_SECS: f64 = 1.1;
pub const TOWER_BASE_DAMAGE: f64 = 12.0;
pub const TOWER_DAMAGE_PER_TIER: f64 = 3.0;

// --- Zombies ---

/// Radius around a base within which zombies deal continuous siege damage.
pub const SIEGE_RADIUS: f64 = 24.0;

/// Lower bound on the spawn interval (seconds).
pub const SPAWN_INTERVAL_MIN: f64 = 1.6;

/// Spawn interval before subtracting the threat multiplier (seconds).
pub const SPAWN_INTERVAL_BASE: f64 = 4.4;

pub const SPAWN_BATCH_BASE: f64 = 2.0;
pub const SPAWN_BATCH_PER_THREAT: f64 = 2.4;

/// Regular zombies removed from a batch when a boss spawns.
pub const BOSS_BATCH_REDUCTION: usize = 2;

/// Spawn band depth along each map edge: zombies appear between these insets.
pub const SPAWN_EDGE_INSET_MIN: f64 = 10.0;
pub const SPAWN_EDGE_INSET_MAX: f64 = 50.0;

// --- Order picking ---

/// Radius around an order point that selects a zombie as the attack target.
pub const ORDER_ZOMBIE_PICK_RADIUS: f64 = 18.0;

/// Radius around an order point that selects a resource node for harvesting.
pub const ORDER_NODE_PICK_RADIUS: f64 = 16.0;

// --- Objectives ---

pub const OBJECTIVE_MINUTES: f64 = 18.0;
pub const OBJECTIVE_KILLS: u32 = 220;

// --- Network ---

pub const NETWORK_PORT: u16 = 5050;

/// Lobby slots, including the host's own.
pub const MAX_PLAYERS: usize = 4;

/// Wall-clock seconds between full-state broadcasts.
pub const STATE_BROADCAST_INTERVAL_SECS: f64 = 0.2;

/// Bytes read from a socket per `read` call.
pub const READ_CHUNK_SIZE: usize = 4096;
