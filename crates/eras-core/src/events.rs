//! Events emitted by the simulation for UI feedback.

use serde::{Deserialize, Serialize};

/// A short user-visible status line addressed to one nation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub nation: usize,
    pub text: String,
    pub tick: u64,
}

/// Final outcome of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outcome {
    /// Objectives met by the player nation.
    Victory,
    /// Player base destroyed, or every base destroyed.
    Defeat,
    /// Skirmish rules: the last nation standing.
    Winner { nation: usize },
    /// Skirmish rules: nobody survived.
    Extinction,
}
