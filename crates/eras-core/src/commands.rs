//! Commands sent to the simulation.
//!
//! Commands are queued and applied at the next tick boundary, never mid-tick.

use serde::{Deserialize, Serialize};

use crate::enums::BuildingType;
use crate::types::Position;

/// A player intent addressed to one nation. Also the payload of the wire
/// `command` record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Intent {
    TrainSoldier,
    TrainWorker,
    Research,
    BattleCry,
    PlaceBuilding {
        building_type: BuildingType,
        pos: Position,
    },
    /// Move, attack or harvest depending on what lies under `pos`.
    Order {
        #[serde(default)]
        unit_ids: Vec<u32>,
        pos: Position,
    },
}

/// Which nations take part in a match and who controls them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchSetup {
    /// Nations fielded at start; every other nation starts dead.
    pub active_nations: Vec<usize>,
    /// Active nations driven by a local or remote player instead of the AI.
    pub human_nations: Vec<usize>,
    /// The privileged player nation. `None` runs the skirmish rules where the
    /// last nation standing wins.
    pub local_nation: Option<usize>,
}

impl MatchSetup {
    /// Every nation fielded and AI controlled, no player nation.
    pub fn skirmish(nation_count: usize) -> Self {
        Self {
            active_nations: (0..nation_count).collect(),
            human_nations: Vec::new(),
            local_nation: None,
        }
    }

    /// Every nation fielded; `local` is human, the rest are AI.
    pub fn single_player(nation_count: usize, local: usize) -> Self {
        Self {
            active_nations: (0..nation_count).collect(),
            human_nations: vec![local],
            local_nation: Some(local),
        }
    }
}

/// Session-level commands processed by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionCommand {
    /// Build the world from `setup` and enter `Running`.
    StartMatch { setup: MatchSetup },
    Pause,
    Resume,
    /// Replace the local player's selection.
    Select { unit_ids: Vec<u32> },
    /// Apply an intent to a nation.
    Issue { nation: usize, intent: Intent },
}
