//! Tunable thresholds for the faction planner.

/// Soft caps and jitter ranges used by `planner::plan`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiProfile {
    /// Stop training soldiers at this count.
    pub soldier_cap: u32,
    /// Stop training workers at this count.
    pub worker_cap: u32,
    /// Stop building towers once the nation owns this many buildings (base included).
    pub building_cap: usize,
    /// Research only while below this tier.
    pub research_below_tier: u8,
    /// Patrol targets are drawn within this offset of the base on each axis.
    pub patrol_offset: f64,
    pub barracks_jitter: f64,
    pub tower_jitter: f64,
    /// Per-tick chance of using the hero ability when it is ready.
    pub battle_cry_chance: f64,
}

impl Default for AiProfile {
    fn default() -> Self {
        Self {
            soldier_cap: 14,
            worker_cap: 12,
            building_cap: 4,
            research_below_tier: 3,
            patrol_offset: 60.0,
            barracks_jitter: 60.0,
            tower_jitter: 90.0,
            battle_cry_chance: 0.02,
        }
    }
}

impl AiProfile {
    /// A planner that never rolls the hero ability. Useful for scripted tests.
    pub fn passive() -> Self {
        Self {
            battle_cry_chance: 0.0,
            ..Self::default()
        }
    }
}
