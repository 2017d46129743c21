//! Eras Zombie Invasion entry points.
//!
//! Wires the simulation and network crates into the `eras` binary: a
//! headless skirmish runner and host/join frame loops.

use thiserror::Error;

pub mod game_loop;
pub mod headless;

pub use eras_core as core;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] eras_core::config::ConfigError),
    #[error(transparent)]
    Net(#[from] eras_net::NetError),
}
