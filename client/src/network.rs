//! UDP client connecting a replica to the authoritative server

use crate::replica::ReplicaState;
use bincode::{deserialize, serialize};
use log::{error, info, warn};
use shared::{ClientRequest, Packet, PROTOCOL_VERSION};
use std::net::SocketAddr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::UdpSocket;
use tokio::time::{interval, sleep};

pub struct Client {
    socket: UdpSocket,
    server_addr: SocketAddr,
    display_name: String,
    connected: bool,
    /// Join the player roster automatically after the handshake.
    auto_register: bool,
    host: bool,

    pub replica: ReplicaState,

    fake_ping_ms: u64,
}

impl Client {
    pub async fn new(
        server_addr: &str,
        display_name: &str,
        fake_ping_ms: u64,
        auto_register: bool,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        let server_addr = server_addr.parse()?;

        Ok(Client {
            socket,
            server_addr,
            display_name: display_name.to_string(),
            connected: false,
            auto_register,
            host: false,
            replica: ReplicaState::new(),
            fake_ping_ms,
        })
    }

    async fn connect(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        info!("Connecting to server as \"{}\"...", self.display_name);

        let packet = Packet::Connect {
            client_version: PROTOCOL_VERSION,
            display_name: self.display_name.clone(),
        };
        self.send_packet(&packet).await?;

        Ok(())
    }

    async fn send_packet(&self, packet: &Packet) -> Result<(), Box<dyn std::error::Error>> {
        if self.fake_ping_ms > 0 {
            sleep(Duration::from_millis(self.fake_ping_ms / 2)).await;
        }

        let data = serialize(packet)?;
        self.socket.send_to(&data, self.server_addr).await?;
        Ok(())
    }

    async fn send_request(&self, request: ClientRequest) {
        if !self.connected {
            warn!("Not connected; request dropped");
            return;
        }
        if let Err(e) = self.send_packet(&Packet::Request(request)).await {
            error!("Error sending request: {}", e);
        }
    }

    async fn handle_packet(&mut self, packet: Packet) {
        match packet {
            Packet::Connected { client_id, host } => {
                info!(
                    "Connected! Client ID: {}{}",
                    client_id,
                    if host { " (host)" } else { "" }
                );
                self.replica.local_id = Some(client_id);
                self.connected = true;
                self.host = host;

                if self.auto_register {
                    self.send_request(ClientRequest::RegisterPlayer).await;
                }
            }

            Packet::Event(event) => {
                let was_giver = self.replica.is_local_clue_giver();
                self.replica.apply_event(&event);
                if !was_giver && self.replica.is_local_clue_giver() {
                    info!("It is your turn to give the clue!");
                }
            }

            Packet::StateSync { .. } => {
                self.replica.apply_snapshot(&packet);
            }

            Packet::Disconnected { reason } => {
                warn!("Disconnected: {}", reason);
                self.connected = false;
                self.replica.local_id = None;
            }

            _ => {
                warn!("Unexpected packet type");
            }
        }
    }

    /// Maps one line of console input to a client request.
    async fn handle_command(&mut self, line: &str) -> bool {
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("join") => self.send_request(ClientRequest::RegisterPlayer).await,
            Some("leave") => self.send_request(ClientRequest::UnregisterPlayer).await,
            Some("start") => {
                let name = parts.collect::<Vec<_>>().join(" ");
                self.send_request(ClientRequest::SetFirstClueGiverByName { name })
                    .await;
            }
            Some("advance") => self.send_request(ClientRequest::AdvancePhase).await,
            Some("award") => {
                let name = parts.next().unwrap_or_default();
                let delta: i32 = parts.next().and_then(|d| d.parse().ok()).unwrap_or(0);
                match self.replica.players.iter().find(|p| p.name == name) {
                    Some(entry) => {
                        let target = entry.id;
                        self.send_request(ClientRequest::AwardPoints { target, delta })
                            .await;
                    }
                    None => warn!("No player named \"{}\"", name),
                }
            }
            Some("status") => {
                info!(
                    "Phase {} round {}, clue-giver \"{}\", {} players{}",
                    self.replica.phase,
                    self.replica.round,
                    self.replica.clue_giver_name,
                    self.replica.players.len(),
                    if self.host { " [host]" } else { "" }
                );
                for entry in &self.replica.players {
                    info!("  {} \"{}\": {}", entry.id, entry.name, entry.score);
                }
            }
            Some("quit") => return false,
            Some(other) => warn!("Unknown command \"{}\"", other),
            None => {}
        }
        true
    }

    pub async fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.connect().await?;

        let mut heartbeat_interval = interval(Duration::from_secs(1));
        let mut stdin_lines = BufReader::new(tokio::io::stdin()).lines();
        let mut buffer = [0u8; 2048];

        loop {
            tokio::select! {
                result = self.socket.recv_from(&mut buffer) => {
                    match result {
                        Ok((len, _)) => {
                            if self.fake_ping_ms > 0 {
                                sleep(Duration::from_millis(self.fake_ping_ms / 2)).await;
                            }

                            if let Ok(packet) = deserialize::<Packet>(&buffer[0..len]) {
                                self.handle_packet(packet).await;
                            }
                        },
                        Err(e) => error!("Error receiving packet: {}", e),
                    }
                },

                _ = heartbeat_interval.tick() => {
                    if self.connected {
                        let timestamp = SystemTime::now()
                            .duration_since(UNIX_EPOCH)
                            .unwrap_or(Duration::from_secs(0))
                            .as_millis() as u64;

                        if let Err(e) = self.send_packet(&Packet::Heartbeat { timestamp }).await {
                            error!("Error sending heartbeat: {}", e);
                        }
                    }
                },

                line = stdin_lines.next_line() => {
                    match line {
                        Ok(Some(line)) => {
                            if !self.handle_command(line.trim()).await {
                                break;
                            }
                        }
                        Ok(None) => break,
                        Err(e) => {
                            error!("Error reading input: {}", e);
                            break;
                        }
                    }
                },
            }
        }

        if self.connected {
            let _ = self.send_packet(&Packet::Disconnect).await;
        }

        Ok(())
    }
}
