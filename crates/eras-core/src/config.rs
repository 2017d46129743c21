//! Session parameters fixed at match creation.
//!
//! `SessionConfig::default()` is the built-in table. A JSON file with the
//! same shape (any subset of fields) can override it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{MAX_TECH_TIER, OBJECTIVE_KILLS, OBJECTIVE_MINUTES};
use crate::enums::ZombieKind;
use crate::nation::{NationBonuses, Resources};
use crate::types::Cost;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NationBlueprint {
    pub name: String,
    /// Flavour text for the nation's bonus.
    pub bonus: String,
    pub bonuses: NationBonuses,
}

/// One row of the zombie phase table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseDef {
    pub name: String,
    /// Elapsed minute at which this phase becomes active.
    pub start_minute: f64,
    pub threat_multiplier: f64,
    /// Variants drawn (with replacement) for regular spawns.
    pub variants: Vec<ZombieKind>,
    /// Chance per batch of a boss replacing part of the batch.
    #[serde(default)]
    pub boss_chance: f64,
    #[serde(default)]
    pub special: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub objective_minutes: f64,
    pub objective_kills: u32,
    pub starting_resources: Resources,
    pub starting_workers: u32,
    pub starting_soldiers: u32,
    pub starting_heroes: u32,
    pub nations: Vec<NationBlueprint>,
    /// Cost to leave tier `i + 1`.
    pub research_costs: Vec<Cost>,
    /// Ordered by `start_minute`.
    pub phases: Vec<PhaseDef>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse session config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read session config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid session config: {0}")]
    Invalid(&'static str),
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            objective_minutes: OBJECTIVE_MINUTES,
            objective_kills: OBJECTIVE_KILLS,
            starting_resources: Resources::default(),
            starting_workers: 8,
            starting_soldiers: 4,
            starting_heroes: 1,
            nations: default_nations(),
            research_costs: vec![
                Cost::new(280.0, 180.0),
                Cost::new(520.0, 360.0),
                Cost::new(820.0, 520.0),
            ],
            phases: default_phases(),
        }
    }
}

impl SessionConfig {
    pub fn from_json_str(data: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = serde_json::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.nations.is_empty() {
            return Err(ConfigError::Invalid("at least one nation is required"));
        }
        if self.phases.is_empty() {
            return Err(ConfigError::Invalid("at least one zombie phase is required"));
        }
        if self
            .phases
            .windows(2)
            .any(|w| w[1].start_minute < w[0].start_minute)
        {
            return Err(ConfigError::Invalid("phases must be ordered by start minute"));
        }
        if self.phases.iter().any(|p| p.variants.is_empty()) {
            return Err(ConfigError::Invalid("every phase needs at least one variant"));
        }
        Ok(())
    }

    /// Highest tier reachable with this cost table.
    pub fn max_tier(&self) -> u8 {
        let by_table = u8::try_from(self.research_costs.len() + 1).unwrap_or(u8::MAX);
        by_table.min(MAX_TECH_TIER)
    }

    /// Cost to advance from `tier` to `tier + 1`, or `None` at the top.
    pub fn research_cost(&self, tier: u8) -> Option<Cost> {
        if tier >= self.max_tier() || tier == 0 {
            return None;
        }
        self.research_costs.get(usize::from(tier) - 1).copied()
    }

    pub fn nation_name(&self, nation_id: usize) -> &str {
        self.nations
            .get(nation_id)
            .map(|b| b.name.as_str())
            .unwrap_or("Unknown")
    }
}

fn blueprint(name: &str, bonus: &str, gather: f64, research: f64, training: f64, defense: f64) -> NationBlueprint {
    NationBlueprint {
        name: name.to_string(),
        bonus: bonus.to_string(),
        bonuses: NationBonuses {
            gather,
            research,
            training,
            defense,
        },
    }
}

fn default_nations() -> Vec<NationBlueprint> {
    vec![
        blueprint("Aurelian Dominion", "Faster research speed", 1.0, 1.15, 1.0, 1.05),
        blueprint("Verdant Circle", "More efficient food production", 1.05, 1.0, 1.0, 1.05),
        blueprint("Ironclad Compact", "Cheaper fortifications", 1.0, 1.0, 1.0, 1.15),
        blueprint("Skyforge Union", "Reduced unit training time", 1.0, 1.0, 1.2, 1.0),
        blueprint("Crimson Choir", "Higher mana generation", 1.05, 1.05, 1.0, 1.0),
        blueprint("Ashen Freeholds", "Increased worker carry capacity", 1.15, 1.0, 1.0, 1.0),
        blueprint("Obsidian Covenant", "Cheaper unit upgrades", 1.0, 1.05, 1.0, 1.1),
        blueprint("Tideborne Assembly", "Reduced naval unit cost", 1.0, 1.0, 1.05, 1.05),
    ]
}

fn default_phases() -> Vec<PhaseDef> {
    use ZombieKind::*;
    vec![
        PhaseDef {
            name: "Scouting Swarm".into(),
            start_minute: 0.0,
            threat_multiplier: 0.8,
            variants: vec![Shambler],
            boss_chance: 0.0,
            special: "Basic shamblers test defenses.".into(),
        },
        PhaseDef {
            name: "Corruption Spread".into(),
            start_minute: 15.0,
            threat_multiplier: 1.1,
            variants: vec![Shambler, Runner, Spitter],
            boss_chance: 0.0,
            special: "Burrowers, spitters, and corruption zones emerge.".into(),
        },
        PhaseDef {
            name: "Siege of the Living".into(),
            start_minute: 30.0,
            threat_multiplier: 1.5,
            variants: vec![Shambler, Runner, Spitter, Brute],
            boss_chance: 0.0,
            special: "Siege zombies target structures and nests expand.".into(),
        },
        PhaseDef {
            name: "The Dark Tide".into(),
            start_minute: 45.0,
            threat_multiplier: 2.1,
            variants: vec![Shambler, Runner, Spitter, Brute],
            boss_chance: 0.18,
            special: "Boss-level undead leaders and mega-waves arrive.".into(),
        },
    ]
}
