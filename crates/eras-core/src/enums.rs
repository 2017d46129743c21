//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Unit role within a nation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    Worker,
    Soldier,
    Hero,
}

impl UnitKind {
    /// Supply consumed by one unit of this kind.
    pub fn supply(self) -> u32 {
        match self {
            UnitKind::Worker | UnitKind::Soldier => 1,
            UnitKind::Hero => crate::constants::HERO_SUPPLY,
        }
    }

    /// Whether this kind gains experience from attacks.
    pub fn gains_experience(self) -> bool {
        matches!(self, UnitKind::Soldier | UnitKind::Hero)
    }
}

/// Zombie variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZombieKind {
    Shambler,
    Runner,
    Brute,
    Spitter,
    /// High-value leader, only rolled by the late-game phase.
    Boss,
}

/// Building type as seen by commands and snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingType {
    Base,
    Barracks,
    Tower,
}

/// Resource deposit kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Gold,
    Lumber,
}

/// Session lifecycle. `GameOver` is terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    #[default]
    Lobby,
    Running,
    GameOver,
}

/// Lobby slot occupancy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    #[default]
    Open,
    Ai,
    Closed,
    /// Controlled by this process.
    Local,
    /// Controlled by a connected peer.
    Remote,
}

impl SlotStatus {
    /// Slots that field a nation when the match starts.
    pub fn is_occupied(self) -> bool {
        matches!(self, SlotStatus::Local | SlotStatus::Remote | SlotStatus::Ai)
    }

    /// Slots driven by a human player (and therefore gated on readiness).
    pub fn is_human(self) -> bool {
        matches!(self, SlotStatus::Local | SlotStatus::Remote)
    }
}
