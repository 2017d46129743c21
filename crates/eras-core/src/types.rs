//! Fundamental geometric and simulation types.

use serde::{Deserialize, Serialize};

/// 2D position on the map (world units). Encoded on the wire as `[x, y]`.
pub type Position = glam::DVec2;

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Advance by one tick of `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.tick += 1;
        self.elapsed_secs += dt;
    }

    /// Elapsed simulation time in minutes.
    pub fn minutes(&self) -> f64 {
        self.elapsed_secs / 60.0
    }
}

/// A gold/lumber price.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Cost {
    pub gold: f64,
    pub lumber: f64,
}

impl Cost {
    pub const fn new(gold: f64, lumber: f64) -> Self {
        Self { gold, lumber }
    }
}

/// Build a position from a `(x, y)` table entry.
pub fn pos(xy: (f64, f64)) -> Position {
    Position::new(xy.0, xy.1)
}
