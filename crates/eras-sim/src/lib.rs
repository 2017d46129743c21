//! Simulation engine for Eras.
//!
//! Owns the hecs ECS world, runs systems at a fixed tick rate,
//! and produces WorldSnapshots for hosts, clients and the headless runner.

pub mod economy;
pub mod engine;
pub mod systems;
pub mod world_setup;

pub use eras_core as core;
pub use engine::{SimConfig, SimulationEngine};
