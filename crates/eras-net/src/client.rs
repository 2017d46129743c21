//! Passive client: sends intents, mirrors the lobby and keeps the most
//! recent snapshot. Never runs a tick of its own.

use std::collections::BTreeSet;
use std::net::ToSocketAddrs;

use tracing::{debug, info};

use eras_core::commands::Intent;
use eras_core::state::WorldSnapshot;
use eras_core::types::Position;

use crate::lobby::Lobby;
use crate::protocol::Message;
use crate::transport::{Inbound, Transport};
use crate::NetError;

/// What changed during one client frame.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ClientEvents {
    pub started: bool,
    pub snapshots: usize,
    pub statuses: Vec<String>,
}

pub struct ClientSession {
    transport: Transport,
    lobby: Lobby,
    slot: Option<usize>,
    nation: Option<usize>,
    snapshot: Option<WorldSnapshot>,
    selection: BTreeSet<u32>,
    ready: bool,
}

impl ClientSession {
    /// Connect to a host and announce `name`.
    pub fn connect(addr: impl ToSocketAddrs, name: &str) -> Result<Self, NetError> {
        let mut transport = Transport::connect(addr)?;
        transport.broadcast(&Message::Join {
            name: name.to_string(),
        });
        Ok(Self {
            transport,
            lobby: Lobby::default(),
            slot: None,
            nation: None,
            snapshot: None,
            selection: BTreeSet::new(),
            ready: false,
        })
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    pub fn slot(&self) -> Option<usize> {
        self.slot
    }

    /// The nation bound to this client's slot once the match has started.
    pub fn nation(&self) -> Option<usize> {
        self.nation
    }

    pub fn lobby(&self) -> &Lobby {
        &self.lobby
    }

    pub fn snapshot(&self) -> Option<&WorldSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn selection(&self) -> &BTreeSet<u32> {
        &self.selection
    }

    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
        self.transport.broadcast(&Message::Ready { ready });
    }

    pub fn ready(&self) -> bool {
        self.ready
    }

    pub fn request_nation(&mut self, nation_id: usize) {
        self.transport.broadcast(&Message::Nation { nation_id });
    }

    /// Replace the selection with the listed ids this client still owns.
    pub fn select(&mut self, unit_ids: impl IntoIterator<Item = u32>) {
        let owned = self.owned_units();
        self.selection = unit_ids.into_iter().filter(|id| owned.contains(id)).collect();
    }

    /// Order the current selection to `pos`.
    pub fn order_selection(&mut self, pos: Position) {
        self.prune_selection();
        let unit_ids = self.selection.iter().copied().collect();
        self.send_intent(Intent::Order { unit_ids, pos });
    }

    pub fn send_intent(&mut self, intent: Intent) {
        self.prune_selection();
        self.transport.broadcast(&Message::command(intent));
    }

    /// Poll the socket and apply every record from the host.
    pub fn frame(&mut self) -> ClientEvents {
        let mut events = ClientEvents::default();
        self.transport.poll();
        for Inbound { message, .. } in self.transport.drain() {
            match message {
                Message::Assign { slot_id } => {
                    info!(slot = slot_id, "client.assigned");
                    self.slot = Some(slot_id);
                }
                Message::LobbyState { slots } => self.lobby.apply(&slots, self.slot),
                Message::StartGame { slots, state } => {
                    self.lobby.apply(&slots, self.slot);
                    self.nation = self
                        .slot
                        .and_then(|slot| self.lobby.slot(slot))
                        .map(|s| s.nation_id);
                    self.selection.clear();
                    self.snapshot = Some(*state);
                    events.started = true;
                    info!(nation = ?self.nation, "client.match_started");
                }
                Message::State { state } => {
                    self.snapshot = Some(*state);
                    self.prune_selection();
                    events.snapshots += 1;
                }
                Message::Status { text } => {
                    info!(%text, "client.status");
                    events.statuses.push(text);
                }
                other => debug!(?other, "client.unexpected_message"),
            }
        }
        events
    }

    fn owned_units(&self) -> BTreeSet<u32> {
        match (&self.snapshot, self.nation) {
            (Some(snapshot), Some(nation)) => snapshot.unit_ids(nation),
            _ => BTreeSet::new(),
        }
    }

    /// Drop selected ids that no longer exist in the latest snapshot.
    fn prune_selection(&mut self) {
        let owned = self.owned_units();
        self.selection.retain(|id| owned.contains(id));
    }
}
