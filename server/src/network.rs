//! Server network layer handling UDP communications and session coordination

use crate::client_manager::ClientManager;
use crate::session::{Authority, GameSession};
use bincode::{deserialize, serialize};
use log::{debug, error, info, warn};
use rand::seq::SliceRandom;
use shared::{ClientRequest, GameConfig, Packet, Phase, PlayerId, PROTOCOL_VERSION};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tokio::net::UdpSocket;
use tokio::sync::{mpsc, RwLock};
use tokio::time::interval;

/// Messages sent from network tasks to main server loop
#[derive(Debug)]
pub enum ServerMessage {
    PacketReceived {
        packet: Packet,
        addr: SocketAddr,
    },
    ClientTimeout {
        client_id: PlayerId,
    },
    #[allow(dead_code)]
    Shutdown,
}

/// Messages sent from the session loop to network tasks
#[derive(Debug)]
pub enum GameMessage {
    SendPacket {
        packet: Packet,
        addr: SocketAddr,
    },
    BroadcastPacket {
        packet: Packet,
        exclude: Option<PlayerId>,
    },
}

/// Main server coordinating networking and the authoritative session
pub struct Server {
    socket: Arc<UdpSocket>,
    clients: Arc<RwLock<ClientManager>>,
    session: GameSession,
    tick_duration: Duration,
    /// Seed a random first clue-giver once this many players registered.
    auto_start: Option<usize>,

    // Communication channels
    server_tx: mpsc::UnboundedSender<ServerMessage>,
    server_rx: mpsc::UnboundedReceiver<ServerMessage>,
    game_tx: mpsc::UnboundedSender<GameMessage>,
    game_rx: mpsc::UnboundedReceiver<GameMessage>,
}

impl Server {
    pub async fn new(
        addr: &str,
        config: GameConfig,
        tick_duration: Duration,
        max_clients: usize,
        auto_start: Option<usize>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let socket = Arc::new(UdpSocket::bind(addr).await?);
        info!("Server listening on {}", addr);

        let (server_tx, server_rx) = mpsc::unbounded_channel();
        let (game_tx, game_rx) = mpsc::unbounded_channel();

        Ok(Server {
            socket,
            clients: Arc::new(RwLock::new(ClientManager::new(max_clients))),
            session: GameSession::new(config, Authority::claim()),
            tick_duration,
            auto_start,
            server_tx,
            server_rx,
            game_tx,
            game_rx,
        })
    }

    /// Spawns task that continuously listens for incoming packets
    async fn spawn_network_receiver(&self) {
        let socket = Arc::clone(&self.socket);
        let server_tx = self.server_tx.clone();

        tokio::spawn(async move {
            let mut buffer = [0u8; 2048];

            loop {
                match socket.recv_from(&mut buffer).await {
                    Ok((len, addr)) => {
                        if let Ok(packet) = deserialize::<Packet>(&buffer[0..len]) {
                            if let Err(e) =
                                server_tx.send(ServerMessage::PacketReceived { packet, addr })
                            {
                                error!("Failed to send packet to main loop: {}", e);
                                break;
                            }
                        } else {
                            warn!("Failed to deserialize packet from {}", addr);
                        }
                    }
                    Err(e) => {
                        error!("Error receiving packet: {}", e);
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    }
                }
            }
        });
    }

    /// Spawns task that processes outgoing packet queue
    async fn spawn_network_sender(&mut self) {
        let socket = Arc::clone(&self.socket);
        let clients = Arc::clone(&self.clients);
        let mut game_rx = std::mem::replace(&mut self.game_rx, mpsc::unbounded_channel().1);

        tokio::spawn(async move {
            while let Some(message) = game_rx.recv().await {
                match message {
                    GameMessage::SendPacket { packet, addr } => {
                        if let Err(e) = Self::send_packet_impl(&socket, &packet, addr).await {
                            error!("Failed to send packet to {}: {}", addr, e);
                        }
                    }
                    GameMessage::BroadcastPacket { packet, exclude } => {
                        let client_addrs = {
                            let clients_guard = clients.read().await;
                            clients_guard.get_client_addrs()
                        };

                        for (client_id, addr) in client_addrs {
                            if Some(client_id) == exclude {
                                continue;
                            }

                            if let Err(e) = Self::send_packet_impl(&socket, &packet, addr).await {
                                error!("Failed to send to client {}: {}", client_id, e);
                            }
                        }
                    }
                }
            }
        });
    }

    /// Spawns task that monitors client timeouts
    async fn spawn_timeout_checker(&self) {
        let clients = Arc::clone(&self.clients);
        let server_tx = self.server_tx.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));

            loop {
                interval.tick().await;

                let timed_out = {
                    let mut clients_guard = clients.write().await;
                    clients_guard.check_timeouts()
                };

                for client_id in timed_out {
                    if let Err(e) = server_tx.send(ServerMessage::ClientTimeout { client_id }) {
                        error!("Failed to send timeout message: {}", e);
                        break;
                    }
                }
            }
        });
    }

    async fn send_packet_impl(
        socket: &UdpSocket,
        packet: &Packet,
        addr: SocketAddr,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let data = serialize(packet)?;
        socket.send_to(&data, addr).await?;
        Ok(())
    }

    async fn send_packet(&self, packet: &Packet, addr: SocketAddr) {
        if let Err(e) = self.game_tx.send(GameMessage::SendPacket {
            packet: packet.clone(),
            addr,
        }) {
            error!("Failed to queue packet for sending: {}", e);
        }
    }

    async fn broadcast_packet(&self, packet: &Packet, exclude: Option<PlayerId>) {
        if let Err(e) = self.game_tx.send(GameMessage::BroadcastPacket {
            packet: packet.clone(),
            exclude,
        }) {
            error!("Failed to queue broadcast packet: {}", e);
        }
    }

    /// Processes incoming packets and applies them to the session
    async fn handle_packet(&mut self, packet: Packet, addr: SocketAddr) {
        match packet {
            Packet::Connect {
                client_version,
                display_name,
            } => {
                info!(
                    "Client connecting from {} (version: {}, name: \"{}\")",
                    addr, client_version, display_name
                );

                if client_version != PROTOCOL_VERSION {
                    let response = Packet::Disconnected {
                        reason: "Protocol version mismatch".to_string(),
                    };
                    self.send_packet(&response, addr).await;
                    return;
                }

                // Remove existing connection if present
                let existing_client_id = {
                    let clients = self.clients.read().await;
                    clients.find_client_by_addr(addr)
                };

                if let Some(existing_id) = existing_client_id {
                    info!("Removing existing client {} from {}", existing_id, addr);
                    let mut clients = self.clients.write().await;
                    clients.remove_client(existing_id);
                    self.session.player_left(existing_id);
                }

                // Try to add new client
                let client_id = {
                    let mut clients = self.clients.write().await;
                    clients.add_client(addr, display_name)
                };

                if let Some(client_id) = client_id {
                    let host = {
                        let clients = self.clients.read().await;
                        clients.is_host(client_id)
                    };
                    let response = Packet::Connected { client_id, host };
                    self.send_packet(&response, addr).await;
                } else {
                    let response = Packet::Disconnected {
                        reason: "Server full".to_string(),
                    };
                    self.send_packet(&response, addr).await;
                }
            }

            Packet::Request(request) => {
                let client_id = {
                    let mut clients = self.clients.write().await;
                    let id = clients.find_client_by_addr(addr);
                    if let Some(id) = id {
                        clients.touch(id);
                    }
                    id
                };

                if let Some(client_id) = client_id {
                    self.handle_request(client_id, request).await;
                } else {
                    warn!("Request from unknown address {}", addr);
                }
            }

            Packet::Heartbeat { .. } => {
                let mut clients = self.clients.write().await;
                if let Some(client_id) = clients.find_client_by_addr(addr) {
                    clients.touch(client_id);
                }
            }

            Packet::Disconnect => {
                let client_id = {
                    let clients = self.clients.read().await;
                    clients.find_client_by_addr(addr)
                };

                if let Some(client_id) = client_id {
                    let mut clients = self.clients.write().await;
                    clients.remove_client(client_id);
                    self.session.player_left(client_id);
                }
            }

            _ => {
                warn!("Unexpected packet type from client at {}", addr);
            }
        }
    }

    /// Applies a validated client request to the session.
    ///
    /// Orchestration requests are accepted only from the host connection;
    /// anything else is dropped silently, observable only as the absence of
    /// a broadcast.
    async fn handle_request(&mut self, client_id: PlayerId, request: ClientRequest) {
        let now = Instant::now();
        match request {
            ClientRequest::RegisterPlayer => {
                let name = {
                    let clients = self.clients.read().await;
                    clients.display_name(client_id).unwrap_or_default().to_string()
                };
                self.session.add_player(client_id, &name);
            }
            ClientRequest::UnregisterPlayer => {
                self.session.player_left(client_id);
            }
            ClientRequest::SetFirstClueGiverByName { name } => {
                if self.is_host(client_id).await {
                    self.session.set_first_clue_giver_by_name(&name, now);
                } else {
                    debug!("Ignored clue-giver seed from non-host {}", client_id);
                }
            }
            ClientRequest::AdvancePhase => {
                if self.is_host(client_id).await {
                    self.session.advance_phase(now);
                } else {
                    debug!("Ignored phase advance from non-host {}", client_id);
                }
            }
            ClientRequest::AwardPoints { target, delta } => {
                if self.is_host(client_id).await {
                    self.session.award_points(target, delta);
                } else {
                    debug!("Ignored point award from non-host {}", client_id);
                }
            }
        }
    }

    async fn is_host(&self, client_id: PlayerId) -> bool {
        let clients = self.clients.read().await;
        clients.is_host(client_id)
    }

    /// Sends every queued event broadcast, strictly after the mutation that
    /// queued it has committed.
    async fn flush_events(&mut self) {
        for event in self.session.drain_events() {
            self.broadcast_packet(&Packet::Event(event), None).await;
        }
    }

    /// Seeds a random first clue-giver once enough players are waiting in
    /// the lobby (the pre-game winner-selection stand-in).
    fn maybe_auto_start(&mut self, now: Instant) {
        let threshold = match self.auto_start {
            Some(threshold) => threshold,
            None => return,
        };
        if self.session.phase() != Phase::Lobby || self.session.players().len() < threshold {
            return;
        }

        let names: Vec<String> = self
            .session
            .players()
            .iter()
            .map(|p| p.name.clone())
            .filter(|n| !n.is_empty())
            .collect();
        if let Some(winner) = names.choose(&mut rand::thread_rng()) {
            info!("Auto-start: pre-game winner is \"{}\"", winner);
            self.session.set_first_clue_giver_by_name(winner, now);
        }
    }

    /// Broadcasts the full session snapshot to all connected clients
    async fn broadcast_snapshot(&mut self) {
        let client_count = {
            let clients = self.clients.read().await;
            clients.len()
        };

        if client_count == 0 {
            return;
        }

        // Take timestamp as close to transmission as possible
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::from_secs(0))
            .as_millis();
        let timestamp_safe = (timestamp.min(u64::MAX as u128)) as u64;

        let packet = self.session.snapshot(Instant::now(), timestamp_safe);
        self.broadcast_packet(&packet, None).await;
    }

    /// Main server loop coordinating all operations
    pub async fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        // Initialize concurrent tasks
        self.spawn_network_receiver().await;
        self.spawn_network_sender().await;
        self.spawn_timeout_checker().await;

        let mut tick_interval = interval(self.tick_duration);
        let mut ticks: u64 = 0;

        info!("Server started successfully");

        loop {
            tokio::select! {
                // Handle network events
                message = self.server_rx.recv() => {
                    match message {
                        Some(ServerMessage::PacketReceived { packet, addr }) => {
                            self.handle_packet(packet, addr).await;
                            self.flush_events().await;
                        },
                        Some(ServerMessage::ClientTimeout { client_id }) => {
                            info!("Client {} timed out", client_id);
                            self.session.player_left(client_id);
                            self.flush_events().await;
                        },
                        Some(ServerMessage::Shutdown) | None => {
                            info!("Server shutting down");
                            break;
                        }
                    }
                },

                // Handle server tick events
                _ = tick_interval.tick() => {
                    let now = Instant::now();
                    self.maybe_auto_start(now);
                    self.session.tick(now);
                    self.flush_events().await;
                    self.broadcast_snapshot().await;

                    ticks += 1;
                    if ticks % 60 == 0 {
                        let client_count = {
                            let clients = self.clients.read().await;
                            clients.len()
                        };

                        if client_count > 0 {
                            debug!("Tick {}: {} clients, phase {}, round {}",
                                   ticks, client_count, self.session.phase(), self.session.round());
                        }
                    }
                },
            }
        }

        Ok(())
    }
}
