//! Core types and definitions for the Eras zombie-invasion simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, nations, commands, snapshots, events, rejections,
//! session configuration and constants. It has no runtime dependencies.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod errors;
pub mod events;
pub mod nation;
pub mod state;
pub mod stats;
pub mod types;

#[cfg(test)]
mod tests;
