//! Client-side replica of the authoritative session state
//!
//! The replica is an eventually-consistent read-only copy. Two inputs feed
//! it: self-contained event broadcasts and full `StateSync` snapshots. The
//! server broadcasts a snapshot every tick, so a replica that misses or
//! reorders events converges from the next snapshot.
//!
//! Snapshots are version-gated: the server bumps a version counter on every
//! mutation, and a snapshot older than the replica's last applied version is
//! discarded rather than rolling observable state backwards. Events carry no
//! version and are applied as received; anything they get wrong is corrected
//! by the next snapshot.

use log::{debug, info};
use shared::{Packet, Phase, PlayerEntry, PlayerId, ServerEvent, NO_CLUE_GIVER};

/// Read-only converging copy of the server's session state.
#[derive(Debug)]
pub struct ReplicaState {
    /// Stable identifier of the local connection, once the handshake is done.
    pub local_id: Option<PlayerId>,
    /// Highest snapshot version applied so far.
    pub version: u64,
    pub phase: Phase,
    pub round: u32,
    pub players: Vec<PlayerEntry>,
    pub roster_names: Vec<String>,
    pub clue_giver: Option<PlayerId>,
    pub clue_giver_name: String,
    pub clue_giver_index: i32,
    /// Seconds left in the current phase as of the last snapshot, if timed.
    pub phase_secs_left: Option<f32>,
    /// Most recent winner announcement, if any.
    pub winner: Option<String>,
}

impl Default for ReplicaState {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplicaState {
    pub fn new() -> Self {
        Self {
            local_id: None,
            version: 0,
            phase: Phase::Lobby,
            round: 0,
            players: Vec::new(),
            roster_names: Vec::new(),
            clue_giver: None,
            clue_giver_name: String::new(),
            clue_giver_index: NO_CLUE_GIVER,
            phase_secs_left: None,
            winner: None,
        }
    }

    /// Whether the local participant currently holds the turn.
    pub fn is_local_clue_giver(&self) -> bool {
        match (self.local_id, self.clue_giver) {
            (Some(local), Some(giver)) => local == giver,
            _ => false,
        }
    }

    pub fn score_of(&self, name: &str) -> Option<u32> {
        self.players
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.score)
    }

    /// Folds one event broadcast into the replica.
    pub fn apply_event(&mut self, event: &ServerEvent) {
        match event {
            ServerEvent::PhaseChanged { phase } => {
                info!("Phase -> {}", phase);
                self.phase = *phase;
                if *phase == Phase::Lobby {
                    self.round = 0;
                    self.clue_giver = None;
                    self.clue_giver_name.clear();
                    self.clue_giver_index = NO_CLUE_GIVER;
                }
            }
            ServerEvent::ClueGiverChanged { name, index, round } => {
                info!("Clue-giver -> \"{}\" (round {})", name, round);
                self.clue_giver_name = name.clone();
                self.clue_giver_index = *index;
                self.round = *round;
                // The id arrives with the next snapshot; until then resolve
                // through the player list when possible.
                self.clue_giver = self
                    .players
                    .iter()
                    .find(|p| p.name == *name)
                    .map(|p| p.id);
            }
            ServerEvent::ScoreChanged { name, score } => {
                info!("Score: \"{}\" now at {}", name, score);
                if let Some(entry) = self.players.iter_mut().find(|p| p.name == *name) {
                    entry.score = *score;
                }
            }
            ServerEvent::Winner { name } => {
                info!("Winner: \"{}\"", name);
                self.winner = Some(name.clone());
            }
            ServerEvent::RosterRefreshed { names } => {
                debug!("Roster refreshed: {:?}", names);
                self.roster_names = names.clone();
            }
        }
    }

    /// Applies a full snapshot, discarding it when older than what the
    /// replica has already seen.
    ///
    /// Returns true if the snapshot was applied.
    pub fn apply_snapshot(&mut self, packet: &Packet) -> bool {
        if let Packet::StateSync {
            version,
            phase,
            round,
            clue_giver,
            clue_giver_name,
            clue_giver_index,
            players,
            phase_secs_left,
            ..
        } = packet
        {
            if *version < self.version {
                debug!(
                    "Discarding stale snapshot (version {} < {})",
                    version, self.version
                );
                return false;
            }

            self.version = *version;
            self.phase = *phase;
            self.round = *round;
            self.clue_giver = *clue_giver;
            self.clue_giver_name = clue_giver_name.clone();
            self.clue_giver_index = *clue_giver_index;
            self.players = players.clone();
            self.roster_names = players.iter().map(|p| p.name.clone()).collect();
            self.phase_secs_left = *phase_secs_left;
            true
        } else {
            false
        }
    }
}
