//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are plain functions over `&mut World` (or `&World` for read-only)
//! plus whatever engine state they need passed in explicitly.

pub mod ai;
pub mod cleanup;
pub mod combat;
pub mod harvest;
pub mod movement;
pub mod snapshot;
pub mod towers;
pub mod victory;
pub mod wave_spawner;
