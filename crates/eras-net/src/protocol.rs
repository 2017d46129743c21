//! Wire records. One JSON object per line, discriminated by `type`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use eras_core::commands::Intent;
use eras_core::enums::SlotStatus;
use eras_core::state::WorldSnapshot;

use crate::NetError;

/// One row of the lobby slot table as sent on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotInfo {
    pub slot_id: usize,
    pub nation_id: usize,
    pub status: SlotStatus,
    #[serde(default)]
    pub ready: bool,
    #[serde(default)]
    pub player_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    /// Client → host: declare a display name.
    Join { name: String },
    /// Host → client: the lobby slot bound to this connection.
    Assign { slot_id: usize },
    Ready { ready: bool },
    /// Requested faction for the sender's slot.
    Nation { nation_id: usize },
    /// Host → all: the full slot table. Always overrides client state.
    LobbyState { slots: Vec<SlotInfo> },
    StartGame {
        slots: Vec<SlotInfo>,
        state: Box<WorldSnapshot>,
    },
    /// Client → host. A `nation_id` supplied by the client is ignored: the
    /// host routes by the connection's slot.
    Command {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        nation_id: Option<usize>,
        intent: Intent,
    },
    /// Host → all: a full snapshot on a fixed cadence.
    State { state: Box<WorldSnapshot> },
    /// Host → one client: a status line for that client's nation.
    Status { text: String },
    /// Synthesized by the transport when a peer connects.
    ClientJoined { client_id: u64 },
    /// Synthesized by the transport when a peer disconnects.
    ClientLeft { client_id: u64 },
}

impl Message {
    pub fn command(intent: Intent) -> Self {
        Message::Command {
            nation_id: None,
            intent,
        }
    }

    pub fn state(snapshot: WorldSnapshot) -> Self {
        Message::State {
            state: Box::new(snapshot),
        }
    }
}

/// Encode a record as a single newline-terminated line.
pub fn encode_line(message: &Message) -> Result<String, NetError> {
    let mut line = serde_json::to_string(message)?;
    line.push('\n');
    Ok(line)
}

/// Decode one line. Blank or malformed lines yield `None`.
pub fn decode_line(line: &str) -> Option<Message> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match serde_json::from_str(line) {
        Ok(message) => Some(message),
        Err(err) => {
            debug!(%err, len = line.len(), "net.malformed_line");
            None
        }
    }
}
