//! Authoritative host: owns the engine, the lobby and every peer connection.

use std::net::{SocketAddr, ToSocketAddrs};

use tracing::{debug, info};

use eras_core::commands::{Intent, SessionCommand};
use eras_core::constants::STATE_BROADCAST_INTERVAL_SECS;
use eras_core::enums::{GamePhase, SlotStatus};
use eras_core::events::StatusMessage;
use eras_sim::{SimConfig, SimulationEngine};

use crate::lobby::Lobby;
use crate::protocol::Message;
use crate::transport::{ConnectionId, Inbound, Transport};
use crate::NetError;

pub struct HostSession {
    transport: Transport,
    lobby: Lobby,
    engine: SimulationEngine,
    broadcast_timer: f64,
}

impl HostSession {
    pub fn bind(addr: impl ToSocketAddrs, config: SimConfig) -> Result<Self, NetError> {
        Ok(Self {
            transport: Transport::listen(addr)?,
            lobby: Lobby::default(),
            engine: SimulationEngine::new(config),
            broadcast_timer: 0.0,
        })
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.transport.local_addr()
    }

    pub fn lobby(&self) -> &Lobby {
        &self.lobby
    }

    pub fn engine(&self) -> &SimulationEngine {
        &self.engine
    }

    pub fn peer_count(&self) -> usize {
        self.transport.connection_count()
    }

    /// Cycle a non-player slot and publish the new table.
    pub fn cycle_slot(&mut self, slot_id: usize) {
        if self.lobby.cycle_status(slot_id) {
            self.broadcast_lobby();
        }
    }

    pub fn set_slot_nation(&mut self, slot_id: usize, nation_id: usize) {
        if self.engine.phase() == GamePhase::Lobby && self.lobby.set_slot_nation(slot_id, nation_id) {
            self.broadcast_lobby();
        }
    }

    pub fn toggle_ready(&mut self) -> Option<bool> {
        let ready = self.lobby.toggle_local_ready();
        self.broadcast_lobby();
        ready
    }

    /// Start the match from the lobby table if every player is ready.
    pub fn start_match(&mut self) -> bool {
        if self.engine.phase() != GamePhase::Lobby || !self.lobby.all_ready() {
            return false;
        }
        let setup = self.lobby.match_setup();
        self.engine.start_match(&setup);
        self.broadcast_timer = 0.0;
        self.broadcast_lobby();
        self.transport.broadcast(&Message::StartGame {
            slots: self.lobby.infos(),
            state: Box::new(self.engine.snapshot()),
        });
        info!(peers = self.peer_count(), "host.match_started");
        true
    }

    /// Queue an intent for the host's own nation.
    pub fn issue_local(&mut self, intent: Intent) {
        if let Some(slot) = self.lobby.local_slot() {
            self.engine.queue_command(SessionCommand::Issue {
                nation: slot.nation_id,
                intent,
            });
        }
    }

    pub fn queue_command(&mut self, command: SessionCommand) {
        self.engine.queue_command(command);
    }

    /// One frame: poll the network, apply inbound records, tick once, route
    /// status lines and broadcast state on the fixed cadence.
    ///
    /// Returns the status lines addressed to the host's own nation.
    pub fn frame(&mut self, dt: f64) -> Vec<StatusMessage> {
        self.transport.poll();
        for inbound in self.transport.drain() {
            self.handle(inbound);
        }

        self.engine.tick();
        let local = self.route_status();

        if self.engine.phase() != GamePhase::Lobby {
            self.broadcast_timer += dt;
            if self.broadcast_timer >= STATE_BROADCAST_INTERVAL_SECS {
                self.broadcast_timer = 0.0;
                self.transport.broadcast(&Message::state(self.engine.snapshot()));
            }
        }
        local
    }

    fn handle(&mut self, Inbound { from, message }: Inbound) {
        match message {
            Message::ClientJoined { client_id } => self.on_joined(client_id),
            Message::ClientLeft { client_id } => {
                if let Some(slot_id) = self.lobby.release(client_id) {
                    info!(connection = client_id, slot = slot_id, "host.peer_left");
                    self.broadcast_lobby();
                }
            }
            Message::Join { name } => {
                if self.lobby.set_name(from, &name) {
                    self.broadcast_lobby();
                }
            }
            Message::Ready { ready } => {
                if self.lobby.set_ready(from, ready) {
                    self.broadcast_lobby();
                }
            }
            Message::Nation { nation_id } => {
                if self.engine.phase() == GamePhase::Lobby && self.lobby.set_nation(from, nation_id) {
                    self.broadcast_lobby();
                }
            }
            Message::Command { nation_id, intent } => {
                let Some(nation) = self.lobby.slot_for(from).map(|s| s.nation_id) else {
                    return;
                };
                if self.engine.phase() != GamePhase::Running {
                    return;
                }
                if nation_id.is_some_and(|claimed| claimed != nation) {
                    debug!(connection = from, ?nation_id, nation, "host.nation_id_ignored");
                }
                self.engine
                    .queue_command(SessionCommand::Issue { nation, intent });
            }
            other => debug!(connection = from, ?other, "host.unexpected_message"),
        }
    }

    fn on_joined(&mut self, connection: ConnectionId) {
        match self.lobby.assign(connection) {
            Some(slot_id) => {
                info!(connection, slot = slot_id, "host.peer_joined");
                self.transport.send_to(connection, &Message::Assign { slot_id });
                self.broadcast_lobby();
            }
            None => {
                info!(connection, "host.lobby_full");
                self.transport.send_to(
                    connection,
                    &Message::Status {
                        text: "Lobby full.".to_string(),
                    },
                );
            }
        }
    }

    /// Forward status lines to the peer bound to each nation; keep the
    /// host's own.
    fn route_status(&mut self) -> Vec<StatusMessage> {
        let mut local = Vec::new();
        for message in self.engine.drain_messages() {
            let peer = self
                .lobby
                .slots()
                .iter()
                .find(|s| s.status == SlotStatus::Remote && s.nation_id == message.nation)
                .and_then(|s| s.connection);
            match peer {
                Some(connection) => self.transport.send_to(
                    connection,
                    &Message::Status {
                        text: message.text,
                    },
                ),
                None => local.push(message),
            }
        }
        local
    }

    fn broadcast_lobby(&mut self) {
        self.transport.broadcast(&Message::LobbyState {
            slots: self.lobby.infos(),
        });
    }
}
