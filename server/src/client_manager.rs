//! Client connection management for the session server
//!
//! This module handles the server-side management of connected clients:
//! - Connection lifecycle (connect, disconnect, timeout)
//! - Stable identifier assignment and address tracking
//! - Host designation for orchestration requests
//! - Connection health monitoring and automatic cleanup
//!
//! The first connection becomes the host; when the host leaves, host status
//! migrates to the oldest remaining connection so the session never becomes
//! unsteerable.

use log::info;
use shared::PlayerId;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

/// How long a silent connection is kept before the timeout sweep drops it.
const CLIENT_TIMEOUT: Duration = Duration::from_secs(5);

/// Represents a connected client.
#[derive(Debug)]
pub struct Client {
    /// Stable identifier assigned by the server, never reused in a session.
    pub id: PlayerId,
    /// Network address for sending responses.
    pub addr: SocketAddr,
    /// Display name supplied by the identity handshake.
    pub display_name: String,
    /// Last time we received any packet from this client.
    pub last_seen: Instant,
}

impl Client {
    pub fn new(id: PlayerId, addr: SocketAddr, display_name: String) -> Self {
        Self {
            id,
            addr,
            display_name,
            last_seen: Instant::now(),
        }
    }

    /// Marks the connection as alive right now.
    pub fn touch(&mut self) {
        self.last_seen = Instant::now();
    }

    /// Returns true if no packets have arrived within the timeout window.
    pub fn is_timed_out(&self, timeout: Duration) -> bool {
        self.last_seen.elapsed() > timeout
    }
}

/// Manages all connected clients and the host designation.
///
/// Stable identifiers start at 1 and increment per connection, enforcing the
/// uniqueness the session relies on. Capacity is bounded; connections beyond
/// the limit are refused.
pub struct ClientManager {
    clients: HashMap<PlayerId, Client>,
    next_client_id: PlayerId,
    max_clients: usize,
    host: Option<PlayerId>,
}

impl ClientManager {
    pub fn new(max_clients: usize) -> Self {
        Self {
            clients: HashMap::new(),
            next_client_id: 1,
            max_clients,
            host: None,
        }
    }

    /// Attempts to add a new client connection.
    ///
    /// Returns the assigned stable identifier, or None when the server is at
    /// capacity. The first connection in an empty session becomes the host.
    pub fn add_client(&mut self, addr: SocketAddr, display_name: String) -> Option<PlayerId> {
        if self.clients.len() >= self.max_clients {
            return None;
        }

        let client_id = self.next_client_id;
        self.next_client_id += 1;

        info!(
            "Client {} (\"{}\") connected from {}",
            client_id, display_name, addr
        );
        self.clients
            .insert(client_id, Client::new(client_id, addr, display_name));

        if self.host.is_none() {
            self.host = Some(client_id);
            info!("Client {} is the host", client_id);
        }

        Some(client_id)
    }

    /// Removes a client, migrating host status to the oldest remaining
    /// connection when the host leaves. Returns true if the client existed.
    pub fn remove_client(&mut self, client_id: PlayerId) -> bool {
        if self.clients.remove(&client_id).is_none() {
            return false;
        }
        info!("Client {} disconnected", client_id);

        if self.host == Some(client_id) {
            self.host = self.clients.keys().min().copied();
            if let Some(new_host) = self.host {
                info!("Host migrated to client {}", new_host);
            }
        }
        true
    }

    /// Finds a client id by network address.
    pub fn find_client_by_addr(&self, addr: SocketAddr) -> Option<PlayerId> {
        self.clients
            .iter()
            .find(|(_, client)| client.addr == addr)
            .map(|(id, _)| *id)
    }

    /// Whether this connection may issue orchestration requests.
    pub fn is_host(&self, client_id: PlayerId) -> bool {
        self.host == Some(client_id)
    }

    pub fn display_name(&self, client_id: PlayerId) -> Option<&str> {
        self.clients
            .get(&client_id)
            .map(|client| client.display_name.as_str())
    }

    /// Refreshes the liveness timestamp for a connection.
    pub fn touch(&mut self, client_id: PlayerId) {
        if let Some(client) = self.clients.get_mut(&client_id) {
            client.touch();
        }
    }

    /// Drops clients that have gone silent past the timeout threshold and
    /// returns their ids for cleanup in the session.
    pub fn check_timeouts(&mut self) -> Vec<PlayerId> {
        let timed_out: Vec<PlayerId> = self
            .clients
            .iter()
            .filter(|(_, client)| client.is_timed_out(CLIENT_TIMEOUT))
            .map(|(id, _)| *id)
            .collect();

        for client_id in &timed_out {
            self.remove_client(*client_id);
        }

        timed_out
    }

    /// All client ids and addresses, for broadcasting.
    pub fn get_client_addrs(&self) -> Vec<(PlayerId, SocketAddr)> {
        self.clients
            .iter()
            .map(|(id, client)| (*id, client.addr))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
