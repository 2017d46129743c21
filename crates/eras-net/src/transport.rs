//! Non-blocking TCP transport.
//!
//! A `Transport` is either a listener (host) or a single outbound
//! connection (client). Nothing here blocks after setup: a would-block read,
//! write or accept means "nothing to do this frame". Connections are keyed by
//! a monotonic `ConnectionId` and own their read and write buffers.

use std::collections::{BTreeMap, VecDeque};
use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};

use tracing::{debug, info, warn};

use eras_core::constants::READ_CHUNK_SIZE;

use crate::protocol::{decode_line, encode_line, Message};
use crate::NetError;

pub type ConnectionId = u64;

/// A decoded record and the connection it arrived on.
#[derive(Debug, Clone, PartialEq)]
pub struct Inbound {
    pub from: ConnectionId,
    pub message: Message,
}

struct Connection {
    stream: TcpStream,
    peer: SocketAddr,
    incoming: Vec<u8>,
    outgoing: Vec<u8>,
}

impl Connection {
    fn new(stream: TcpStream, peer: SocketAddr) -> io::Result<Self> {
        stream.set_nonblocking(true)?;
        if let Err(err) = stream.set_nodelay(true) {
            warn!(%peer, %err, "net.nodelay_failed");
        }
        Ok(Self {
            stream,
            peer,
            incoming: Vec::new(),
            outgoing: Vec::new(),
        })
    }

    /// Read everything available. `Ok(false)` means the peer closed.
    fn fill(&mut self) -> io::Result<bool> {
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        loop {
            match self.stream.read(&mut chunk) {
                Ok(0) => return Ok(false),
                Ok(n) => self.incoming.extend_from_slice(&chunk[..n]),
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => return Ok(true),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }
    }

    /// Split complete lines off the read buffer. A trailing partial line
    /// stays buffered for the next frame.
    fn take_lines(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        while let Some(end) = self.incoming.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.incoming.drain(..=end).collect();
            lines.push(String::from_utf8_lossy(&line).into_owned());
        }
        lines
    }

    /// Write as much of the pending output as the socket accepts.
    fn flush(&mut self) -> io::Result<()> {
        while !self.outgoing.is_empty() {
            match self.stream.write(&self.outgoing) {
                Ok(0) => return Err(io::ErrorKind::WriteZero.into()),
                Ok(n) => {
                    self.outgoing.drain(..n);
                }
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => break,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }
}

pub struct Transport {
    listener: Option<TcpListener>,
    connections: BTreeMap<ConnectionId, Connection>,
    next_id: ConnectionId,
    inbox: VecDeque<Inbound>,
}

impl Transport {
    /// Listen for inbound connections on `addr`.
    pub fn listen(addr: impl ToSocketAddrs) -> Result<Self, NetError> {
        let addr = first_addr(addr)?;
        let listener =
            TcpListener::bind(addr).map_err(|source| NetError::Bind { addr, source })?;
        listener.set_nonblocking(true)?;
        info!(addr = %listener.local_addr()?, "net.listening");
        Ok(Self {
            listener: Some(listener),
            connections: BTreeMap::new(),
            next_id: 1,
            inbox: VecDeque::new(),
        })
    }

    /// Open a single outbound connection. The connect itself blocks; every
    /// later operation does not.
    pub fn connect(addr: impl ToSocketAddrs) -> Result<Self, NetError> {
        let addr = first_addr(addr)?;
        let stream =
            TcpStream::connect(addr).map_err(|source| NetError::Connect { addr, source })?;
        let mut transport = Self {
            listener: None,
            connections: BTreeMap::new(),
            next_id: 0,
            inbox: VecDeque::new(),
        };
        let id = transport.allocate_id();
        transport.connections.insert(id, Connection::new(stream, addr)?);
        info!(%addr, "net.connected");
        Ok(transport)
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.as_ref().and_then(|l| l.local_addr().ok())
    }

    pub fn is_host(&self) -> bool {
        self.listener.is_some()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn is_connected(&self) -> bool {
        !self.connections.is_empty()
    }

    /// Accept pending peers, read every socket, flush pending writes.
    ///
    /// Decoded records land in the inbox. Faulty or closed connections are
    /// torn down and, on a host, reported as `ClientLeft`.
    pub fn poll(&mut self) {
        self.accept_pending();

        let mut dropped = Vec::new();
        for (&id, conn) in self.connections.iter_mut() {
            let alive = match conn.fill() {
                Ok(open) => open,
                Err(err) => {
                    warn!(connection = id, peer = %conn.peer, %err, "net.read_failed");
                    false
                }
            };
            for line in conn.take_lines() {
                if let Some(message) = decode_line(&line) {
                    self.inbox.push_back(Inbound { from: id, message });
                }
            }
            if !alive {
                dropped.push(id);
                continue;
            }
            if let Err(err) = conn.flush() {
                warn!(connection = id, peer = %conn.peer, %err, "net.write_failed");
                dropped.push(id);
            }
        }
        for id in dropped {
            self.disconnect(id);
        }
    }

    /// Queue `message` for one connection and try to send it now.
    pub fn send_to(&mut self, id: ConnectionId, message: &Message) {
        let line = match encode_line(message) {
            Ok(line) => line,
            Err(err) => {
                warn!(connection = id, %err, "net.encode_failed");
                return;
            }
        };
        self.write_line(id, line.as_bytes());
    }

    /// Queue `message` for every connection.
    pub fn broadcast(&mut self, message: &Message) {
        let line = match encode_line(message) {
            Ok(line) => line,
            Err(err) => {
                warn!(%err, "net.encode_failed");
                return;
            }
        };
        let ids: Vec<ConnectionId> = self.connections.keys().copied().collect();
        for id in ids {
            self.write_line(id, line.as_bytes());
        }
    }

    /// Take every record received so far, oldest first.
    pub fn drain(&mut self) -> Vec<Inbound> {
        self.inbox.drain(..).collect()
    }

    /// Drop a connection and its buffered data.
    pub fn disconnect(&mut self, id: ConnectionId) {
        let Some(conn) = self.connections.remove(&id) else {
            return;
        };
        info!(connection = id, peer = %conn.peer, "net.disconnected");
        if self.is_host() {
            self.inbox.push_back(Inbound {
                from: id,
                message: Message::ClientLeft { client_id: id },
            });
        }
    }

    fn write_line(&mut self, id: ConnectionId, bytes: &[u8]) {
        let Some(conn) = self.connections.get_mut(&id) else {
            return;
        };
        conn.outgoing.extend_from_slice(bytes);
        if let Err(err) = conn.flush() {
            warn!(connection = id, peer = %conn.peer, %err, "net.write_failed");
            self.disconnect(id);
        }
    }

    fn accept_pending(&mut self) {
        let Some(listener) = self.listener.as_ref() else {
            return;
        };
        let mut accepted = Vec::new();
        loop {
            match listener.accept() {
                Ok((stream, peer)) => match Connection::new(stream, peer) {
                    Ok(conn) => accepted.push(conn),
                    Err(err) => warn!(%peer, %err, "net.accept_setup_failed"),
                },
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => break,
                Err(err) => {
                    warn!(%err, "net.accept_failed");
                    break;
                }
            }
        }
        for conn in accepted {
            let id = self.allocate_id();
            debug!(connection = id, peer = %conn.peer, "net.accepted");
            self.connections.insert(id, conn);
            self.inbox.push_back(Inbound {
                from: id,
                message: Message::ClientJoined { client_id: id },
            });
        }
    }

    fn allocate_id(&mut self) -> ConnectionId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

fn first_addr(addr: impl ToSocketAddrs) -> Result<SocketAddr, NetError> {
    addr.to_socket_addrs()?.next().ok_or_else(|| {
        NetError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            "no socket address resolved",
        ))
    })
}
