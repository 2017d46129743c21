//! Network session for multiplayer matches.
//!
//! Newline-delimited JSON records over non-blocking TCP. The host owns the
//! simulation and broadcasts full snapshots; clients only send intents and
//! render the latest snapshot they received.

use std::io;
use std::net::SocketAddr;

use thiserror::Error;

pub mod client;
pub mod host;
pub mod lobby;
pub mod protocol;
pub mod transport;

pub use eras_core as core;
pub use client::ClientSession;
pub use host::HostSession;

#[derive(Debug, Error)]
pub enum NetError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("socket error: {0}")]
    Io(#[from] io::Error),
    #[error("failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests;
