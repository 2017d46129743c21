#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::net::{SocketAddr, TcpStream};
    use std::thread;
    use std::time::Duration;

    use eras_core::commands::Intent;
    use eras_core::constants::*;
    use eras_core::enums::{GamePhase, SlotStatus};
    use eras_core::types::Position;
    use eras_sim::SimConfig;

    use crate::client::ClientSession;
    use crate::host::HostSession;
    use crate::lobby::Lobby;
    use crate::protocol::{decode_line, encode_line, Message, SlotInfo};
    use crate::transport::{Inbound, Transport};

    const FRAMES: usize = 600;

    fn host() -> (HostSession, SocketAddr) {
        let host = HostSession::bind("127.0.0.1:0", SimConfig::default()).unwrap();
        let addr = host.local_addr().unwrap();
        (host, addr)
    }

    /// Run host frames until `done` holds.
    fn pump(host: &mut HostSession, mut done: impl FnMut(&HostSession) -> bool) -> bool {
        for _ in 0..FRAMES {
            host.frame(DT);
            if done(host) {
                return true;
            }
            thread::sleep(Duration::from_millis(2));
        }
        false
    }

    /// Run host frames and poll a raw peer until it receives a record
    /// matching `want`.
    fn pump_peer(
        host: &mut HostSession,
        peer: &mut Transport,
        mut want: impl FnMut(&Message) -> bool,
    ) -> Option<Message> {
        for _ in 0..FRAMES {
            host.frame(DT);
            peer.poll();
            if let Some(Inbound { message, .. }) =
                peer.drain().into_iter().find(|inbound| want(&inbound.message))
            {
                return Some(message);
            }
            thread::sleep(Duration::from_millis(2));
        }
        None
    }

    /// Host plus one raw peer in slot 1, both ready, match started.
    fn started_match() -> (HostSession, Transport) {
        let (mut host, addr) = host();
        let mut peer = Transport::connect(addr).unwrap();
        assert!(pump(&mut host, |h| {
            h.lobby().slot(1).map(|s| s.status) == Some(SlotStatus::Remote)
        }));
        peer.broadcast(&Message::Ready { ready: true });
        host.toggle_ready();
        assert!(pump(&mut host, |h| h.lobby().all_ready()));
        assert!(host.start_match());
        (host, peer)
    }

    // ---- Protocol ----

    #[test]
    fn test_command_wire_shape() {
        let line = r#"{"type":"command","nation_id":5,"intent":{"action":"train_soldier"}}"#;
        assert_eq!(
            decode_line(line),
            Some(Message::Command {
                nation_id: Some(5),
                intent: Intent::TrainSoldier,
            })
        );

        let encoded = encode_line(&Message::command(Intent::Order {
            unit_ids: vec![3, 4],
            pos: Position::new(10.0, 20.5),
        }))
        .unwrap();
        assert!(encoded.ends_with('\n'));
        assert_eq!(encoded.matches('\n').count(), 1);
        let value: serde_json::Value = serde_json::from_str(encoded.trim()).unwrap();
        assert_eq!(value["type"], "command");
        assert!(value.get("nation_id").is_none());
        assert_eq!(value["intent"]["action"], "order");
        assert_eq!(value["intent"]["pos"], serde_json::json!([10.0, 20.5]));
    }

    #[test]
    fn test_lobby_state_wire_shape() {
        let line = r#"{"type":"lobby_state","slots":[{"slot_id":2,"nation_id":2,"status":"ai","ready":true,"player_name":"AI"}]}"#;
        let Some(Message::LobbyState { slots }) = decode_line(line) else {
            panic!("lobby_state did not decode");
        };
        assert_eq!(slots[0].status, SlotStatus::Ai);
        assert!(slots[0].ready);
    }

    #[test]
    fn test_malformed_lines_are_dropped() {
        assert_eq!(decode_line(""), None);
        assert_eq!(decode_line("   \r"), None);
        assert_eq!(decode_line("{not json"), None);
        assert_eq!(decode_line(r#"{"type":"teleport"}"#), None);
        assert_eq!(
            decode_line("{\"type\":\"ready\",\"ready\":true}\r"),
            Some(Message::Ready { ready: true })
        );
    }

    // ---- Lobby ----

    #[test]
    fn test_lobby_defaults() {
        let lobby = Lobby::default();
        assert_eq!(lobby.slots().len(), MAX_PLAYERS);
        let host = lobby.slot(0).unwrap();
        assert_eq!(host.status, SlotStatus::Local);
        assert_eq!(host.player_name, "Host");
        for slot in &lobby.slots()[1..] {
            assert_eq!(slot.status, SlotStatus::Open);
            assert_eq!(slot.nation_id, slot.slot_id % NATION_COUNT);
            assert!(!slot.ready);
        }
    }

    #[test]
    fn test_cycle_slot_status() {
        let mut lobby = Lobby::default();
        assert!(!lobby.cycle_status(0), "local slot never cycles");

        assert!(lobby.cycle_status(1));
        assert_eq!(lobby.slot(1).unwrap().status, SlotStatus::Ai);
        assert!(lobby.slot(1).unwrap().ready);
        assert!(lobby.cycle_status(1));
        assert_eq!(lobby.slot(1).unwrap().status, SlotStatus::Closed);
        assert!(!lobby.slot(1).unwrap().ready);
        assert!(lobby.cycle_status(1));
        assert_eq!(lobby.slot(1).unwrap().status, SlotStatus::Open);
    }

    #[test]
    fn test_assign_release_and_full() {
        let mut lobby = Lobby::default();
        assert_eq!(lobby.assign(10), Some(1));
        assert_eq!(lobby.assign(11), Some(2));
        assert_eq!(lobby.assign(12), Some(3));
        assert_eq!(lobby.assign(13), None);

        assert!(lobby.set_nation(11, 13));
        assert_eq!(lobby.slot_for(11).unwrap().nation_id, 13 % NATION_COUNT);

        assert_eq!(lobby.release(11), Some(2));
        let slot = lobby.slot(2).unwrap();
        assert_eq!(slot.status, SlotStatus::Open);
        assert_eq!(slot.connection, None);
        assert_eq!(lobby.assign(13), Some(2));
        assert_eq!(lobby.release(99), None);
    }

    #[test]
    fn test_all_ready() {
        let mut lobby = Lobby::default();
        assert!(!lobby.all_ready());
        lobby.toggle_local_ready();
        assert!(lobby.all_ready());

        lobby.assign(7);
        assert!(!lobby.all_ready());
        lobby.set_ready(7, true);
        assert!(lobby.all_ready());

        // AI slots are always ready.
        lobby.cycle_status(2);
        assert!(lobby.all_ready());
    }

    #[test]
    fn test_match_setup_from_lobby() {
        let mut lobby = Lobby::default();
        lobby.assign(7);
        lobby.set_nation(7, 5);
        lobby.cycle_status(2);
        lobby.cycle_status(3);
        lobby.cycle_status(3);

        let setup = lobby.match_setup();
        assert_eq!(setup.active_nations, vec![0, 2, 5]);
        assert_eq!(setup.human_nations, vec![0, 5]);
        assert_eq!(setup.local_nation, Some(0));
    }

    #[test]
    fn test_client_lobby_mirror() {
        let host = {
            let mut lobby = Lobby::default();
            lobby.assign(4);
            lobby.cycle_status(2);
            lobby
        };
        let mut mirror = Lobby::default();
        mirror.apply(&host.infos(), Some(1));

        assert_eq!(mirror.slot(0).unwrap().status, SlotStatus::Remote);
        assert_eq!(mirror.slot(1).unwrap().status, SlotStatus::Local);
        assert_eq!(mirror.slot(2).unwrap().status, SlotStatus::Ai);
        assert_eq!(mirror.local_slot().unwrap().slot_id, 1);

        let infos: Vec<SlotInfo> = mirror.infos();
        assert_eq!(infos.len(), MAX_PLAYERS);
    }

    // ---- Loopback sessions ----

    #[test]
    fn test_peer_assigned_first_open_slot() {
        let (mut host, addr) = host();
        let mut peer = Transport::connect(addr).unwrap();
        let assign = pump_peer(&mut host, &mut peer, |m| matches!(m, Message::Assign { .. }));
        assert_eq!(assign, Some(Message::Assign { slot_id: 1 }));
        assert_eq!(host.peer_count(), 1);
    }

    #[test]
    fn test_lobby_full() {
        let (mut host, addr) = host();
        let mut peers: Vec<Transport> = (0..MAX_PLAYERS - 1)
            .map(|_| Transport::connect(addr).unwrap())
            .collect();
        assert!(pump(&mut host, |h| {
            h.lobby()
                .slots()
                .iter()
                .all(|s| s.status != SlotStatus::Open)
        }));

        let mut extra = Transport::connect(addr).unwrap();
        let status = pump_peer(&mut host, &mut extra, |m| matches!(m, Message::Status { .. }));
        assert_eq!(
            status,
            Some(Message::Status {
                text: "Lobby full.".to_string()
            })
        );
        for peer in peers.iter_mut() {
            peer.poll();
        }
    }

    #[test]
    fn test_disconnect_frees_slot() {
        let (mut host, addr) = host();
        let peer = Transport::connect(addr).unwrap();
        assert!(pump(&mut host, |h| {
            h.lobby().slot(1).map(|s| s.status) == Some(SlotStatus::Remote)
        }));
        drop(peer);
        assert!(pump(&mut host, |h| {
            h.lobby().slot(1).map(|s| s.status) == Some(SlotStatus::Open)
        }));
        assert_eq!(host.peer_count(), 0);
    }

    #[test]
    fn test_malformed_line_keeps_connection() {
        let (mut host, addr) = host();
        let mut raw = TcpStream::connect(addr).unwrap();
        raw.write_all(b"this is not json\n").unwrap();
        raw.write_all(b"{\"type\":\"join\",\"name\":\"Mira\"}\n").unwrap();
        assert!(pump(&mut host, |h| {
            h.lobby().slot(1).map(|s| s.player_name.as_str()) == Some("Mira")
        }));
        assert_eq!(host.peer_count(), 1);
    }

    #[test]
    fn test_start_requires_ready_players() {
        let (mut host, addr) = host();
        let _peer = Transport::connect(addr).unwrap();
        assert!(pump(&mut host, |h| h.peer_count() == 1
            && h.lobby().slot(1).map(|s| s.status) == Some(SlotStatus::Remote)));
        host.toggle_ready();
        assert!(!host.start_match(), "remote player not ready");
        assert_eq!(host.engine().phase(), GamePhase::Lobby);
    }

    #[test]
    fn test_forged_nation_id_routes_to_slot_nation() {
        let (mut host, mut peer) = started_match();
        assert_eq!(host.engine().phase(), GamePhase::Running);
        assert!(!host.engine().nations()[1].ai_controlled);

        peer.broadcast(&Message::Command {
            nation_id: Some(0),
            intent: Intent::Research,
        });
        let status = pump_peer(&mut host, &mut peer, |m| matches!(m, Message::Status { .. }));
        assert_eq!(
            status,
            Some(Message::Status {
                text: "Tech Tier 2 reached.".to_string()
            })
        );
        assert_eq!(host.engine().nations()[1].tech_tier, 2);
        assert_eq!(host.engine().nations()[0].tech_tier, 1);
    }

    #[test]
    fn test_state_broadcast_cadence() {
        let (mut host, mut peer) = started_match();
        // Drain the start records.
        peer.poll();
        peer.drain();

        let mut states = 0;
        let frames = TICK_RATE as usize;
        for _ in 0..frames {
            host.frame(DT);
            thread::sleep(Duration::from_millis(1));
        }
        for _ in 0..50 {
            peer.poll();
            states += peer
                .drain()
                .into_iter()
                .filter(|i| matches!(i.message, Message::State { .. }))
                .count();
            thread::sleep(Duration::from_millis(2));
        }
        // One simulated second at a 0.2 s cadence.
        assert!((4..=5).contains(&states), "got {states} state records");
    }

    #[test]
    fn test_client_session_follows_host() {
        let (mut host, addr) = host();
        let mut client = ClientSession::connect(addr, "Ada").unwrap();

        for _ in 0..FRAMES {
            host.frame(DT);
            client.frame();
            if client.slot().is_some() {
                break;
            }
            thread::sleep(Duration::from_millis(2));
        }
        assert_eq!(client.slot(), Some(1));

        client.set_ready(true);
        host.toggle_ready();
        assert!(pump(&mut host, |h| h.lobby().all_ready()));
        assert_eq!(host.lobby().slot(1).unwrap().player_name, "Ada");
        assert!(host.start_match());

        let mut started = false;
        for _ in 0..FRAMES {
            host.frame(DT);
            started |= client.frame().started;
            if started {
                break;
            }
            thread::sleep(Duration::from_millis(2));
        }
        assert!(started);
        assert_eq!(client.nation(), Some(1));
        assert_eq!(client.lobby().local_slot().unwrap().slot_id, 1);

        let snapshot = client.snapshot().unwrap();
        let own: Vec<u32> = snapshot.unit_ids(1).into_iter().collect();
        let foreign: Vec<u32> = snapshot.unit_ids(0).into_iter().collect();
        assert!(!own.is_empty());
        client.select(own.iter().copied().chain(foreign.iter().copied()));
        assert_eq!(client.selection().len(), own.len());
    }
}
