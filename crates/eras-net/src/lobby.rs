//! Lobby slot table. The host owns it; clients mirror the host's copy.

use eras_core::commands::MatchSetup;
use eras_core::constants::{MAX_PLAYERS, NATION_COUNT};
use eras_core::enums::SlotStatus;

use crate::protocol::SlotInfo;
use crate::transport::ConnectionId;

#[derive(Debug, Clone, PartialEq)]
pub struct LobbySlot {
    pub slot_id: usize,
    pub nation_id: usize,
    pub status: SlotStatus,
    pub ready: bool,
    pub player_name: String,
    /// Bound peer for `Remote` slots.
    pub connection: Option<ConnectionId>,
}

impl LobbySlot {
    fn open(slot_id: usize) -> Self {
        Self {
            slot_id,
            nation_id: slot_id % NATION_COUNT,
            status: SlotStatus::Open,
            ready: false,
            player_name: "Open".to_string(),
            connection: None,
        }
    }

    fn info(&self) -> SlotInfo {
        SlotInfo {
            slot_id: self.slot_id,
            nation_id: self.nation_id,
            status: self.status,
            ready: self.ready,
            player_name: self.player_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lobby {
    slots: Vec<LobbySlot>,
}

impl Default for Lobby {
    /// Slot 0 is the host's own; the rest start open.
    fn default() -> Self {
        let slots = (0..MAX_PLAYERS)
            .map(|slot_id| {
                if slot_id == 0 {
                    LobbySlot {
                        status: SlotStatus::Local,
                        player_name: "Host".to_string(),
                        ..LobbySlot::open(0)
                    }
                } else {
                    LobbySlot::open(slot_id)
                }
            })
            .collect();
        Self { slots }
    }
}

impl Lobby {
    pub fn slots(&self) -> &[LobbySlot] {
        &self.slots
    }

    pub fn slot(&self, slot_id: usize) -> Option<&LobbySlot> {
        self.slots.get(slot_id)
    }

    pub fn infos(&self) -> Vec<SlotInfo> {
        self.slots.iter().map(LobbySlot::info).collect()
    }

    pub fn local_slot(&self) -> Option<&LobbySlot> {
        self.slots.iter().find(|s| s.status == SlotStatus::Local)
    }

    pub fn slot_for(&self, connection: ConnectionId) -> Option<&LobbySlot> {
        self.slots.iter().find(|s| s.connection == Some(connection))
    }

    fn slot_for_mut(&mut self, connection: ConnectionId) -> Option<&mut LobbySlot> {
        self.slots
            .iter_mut()
            .find(|s| s.connection == Some(connection))
    }

    /// Cycle a non-player slot open → ai → closed → open. AI slots are
    /// always ready. Returns false for local or remote slots.
    pub fn cycle_status(&mut self, slot_id: usize) -> bool {
        let Some(slot) = self.slots.get_mut(slot_id) else {
            return false;
        };
        let (status, name) = match slot.status {
            SlotStatus::Open => (SlotStatus::Ai, "AI"),
            SlotStatus::Ai => (SlotStatus::Closed, "Closed"),
            SlotStatus::Closed => (SlotStatus::Open, "Open"),
            SlotStatus::Local | SlotStatus::Remote => return false,
        };
        slot.status = status;
        slot.player_name = name.to_string();
        slot.ready = status == SlotStatus::Ai;
        true
    }

    /// Bind `connection` to the first open slot.
    pub fn assign(&mut self, connection: ConnectionId) -> Option<usize> {
        let slot = self
            .slots
            .iter_mut()
            .find(|s| s.status == SlotStatus::Open)?;
        slot.status = SlotStatus::Remote;
        slot.connection = Some(connection);
        slot.player_name = format!("Player {connection}");
        slot.ready = false;
        Some(slot.slot_id)
    }

    /// Free the slot bound to `connection`.
    pub fn release(&mut self, connection: ConnectionId) -> Option<usize> {
        let slot = self.slot_for_mut(connection)?;
        let slot_id = slot.slot_id;
        *slot = LobbySlot {
            nation_id: slot.nation_id,
            ..LobbySlot::open(slot_id)
        };
        Some(slot_id)
    }

    /// Rename the peer's slot and clear its readiness.
    pub fn set_name(&mut self, connection: ConnectionId, name: &str) -> bool {
        let Some(slot) = self.slot_for_mut(connection) else {
            return false;
        };
        slot.player_name = name.to_string();
        slot.ready = false;
        true
    }

    pub fn set_ready(&mut self, connection: ConnectionId, ready: bool) -> bool {
        let Some(slot) = self.slot_for_mut(connection) else {
            return false;
        };
        slot.ready = ready;
        true
    }

    /// Out-of-range nation ids wrap around the blueprint table.
    pub fn set_nation(&mut self, connection: ConnectionId, nation_id: usize) -> bool {
        let Some(slot) = self.slot_for_mut(connection) else {
            return false;
        };
        slot.nation_id = nation_id % NATION_COUNT;
        true
    }

    pub fn set_slot_nation(&mut self, slot_id: usize, nation_id: usize) -> bool {
        let Some(slot) = self.slots.get_mut(slot_id) else {
            return false;
        };
        slot.nation_id = nation_id % NATION_COUNT;
        true
    }

    /// Toggle readiness of the local slot. Returns the new state.
    pub fn toggle_local_ready(&mut self) -> Option<bool> {
        let slot = self
            .slots
            .iter_mut()
            .find(|s| s.status == SlotStatus::Local)?;
        slot.ready = !slot.ready;
        Some(slot.ready)
    }

    /// Every player slot ready and at least one slot fielding a nation.
    pub fn all_ready(&self) -> bool {
        self.slots
            .iter()
            .filter(|s| s.status.is_human())
            .all(|s| s.ready)
            && self.slots.iter().any(|s| s.status.is_occupied())
    }

    /// Overwrite the table with the host's copy. `local_slot` is the slot
    /// assigned to this client; it is shown as `Local`.
    pub fn apply(&mut self, infos: &[SlotInfo], local_slot: Option<usize>) {
        for info in infos {
            let Some(slot) = self.slots.get_mut(info.slot_id) else {
                continue;
            };
            slot.nation_id = info.nation_id;
            slot.status = info.status;
            slot.ready = info.ready;
            slot.player_name = info.player_name.clone();
            slot.connection = None;
        }
        for slot in self.slots.iter_mut() {
            if Some(slot.slot_id) == local_slot {
                slot.status = SlotStatus::Local;
            } else if slot.status == SlotStatus::Local {
                // The host's own slot.
                slot.status = SlotStatus::Remote;
            }
        }
    }

    /// Occupied slots field their nation; player slots are not AI driven;
    /// the local slot's nation is the player nation.
    pub fn match_setup(&self) -> MatchSetup {
        let mut active_nations: Vec<usize> = self
            .slots
            .iter()
            .filter(|s| s.status.is_occupied())
            .map(|s| s.nation_id)
            .collect();
        active_nations.sort_unstable();
        active_nations.dedup();

        let mut human_nations: Vec<usize> = self
            .slots
            .iter()
            .filter(|s| s.status.is_human())
            .map(|s| s.nation_id)
            .collect();
        human_nations.sort_unstable();
        human_nations.dedup();

        MatchSetup {
            active_nations,
            human_nations,
            local_nation: self.local_slot().map(|s| s.nation_id),
        }
    }
}
