//! Faction AI for Eras.
//!
//! Rule-based planning for nations that are not driven by a player.
//! Pure functions over plain data; the simulation turns the resulting
//! actions into the same economy calls a player intent would make.

pub mod planner;
pub mod profile;

pub use eras_core as core;

#[cfg(test)]
mod tests;
