use serde::{Deserialize, Serialize};

/// Protocol version expected in every `Connect` handshake.
pub const PROTOCOL_VERSION: u32 = 1;

/// Longest display name accepted after sanitization.
pub const MAX_NAME_LEN: usize = 24;

/// Wire sentinel for "no clue-giver assigned" in place of a rotation index.
pub const NO_CLUE_GIVER: i32 = -1;

/// Stable per-connection identifier, assigned by the server at connect time
/// and never reused within a session.
pub type PlayerId = u32;

/// Round phases in progression order.
///
/// `Lobby` and `GameEnd` are held indefinitely; every other phase carries a
/// configured duration and advances automatically once its deadline passes.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Lobby,
    RoundSetup,
    Clue,
    Guess,
    Scoring,
    RoundEnd,
    GameEnd,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Lobby => "Lobby",
            Phase::RoundSetup => "RoundSetup",
            Phase::Clue => "Clue",
            Phase::Guess => "Guess",
            Phase::Scoring => "Scoring",
            Phase::RoundEnd => "RoundEnd",
            Phase::GameEnd => "GameEnd",
        }
    }

    /// Whether this phase runs on a deadline.
    pub fn is_timed(&self) -> bool {
        !matches!(self, Phase::Lobby | Phase::GameEnd)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One slot in the replicated player list.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PlayerEntry {
    pub id: PlayerId,
    pub name: String,
    pub score: u32,
}

impl PlayerEntry {
    pub fn new(id: PlayerId, name: String) -> Self {
        Self { id, name, score: 0 }
    }
}

/// Flat session options, read once at server startup.
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct GameConfig {
    /// Score at which a player immediately wins the game.
    pub target_score: u32,
    /// Number of rounds played before the highest score wins.
    pub max_rounds: u32,
    pub round_setup_secs: f32,
    pub clue_secs: f32,
    pub guess_secs: f32,
    pub scoring_secs: f32,
    pub round_end_secs: f32,
    /// Whether the clue-giver rotates to the next participant each round.
    pub rotate_clue_giver: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            target_score: 50,
            max_rounds: 8,
            round_setup_secs: 5.0,
            clue_secs: 30.0,
            guess_secs: 60.0,
            scoring_secs: 10.0,
            round_end_secs: 5.0,
            rotate_clue_giver: true,
        }
    }
}

impl GameConfig {
    /// Duration of a phase in seconds, or None for the untimed phases.
    pub fn phase_duration(&self, phase: Phase) -> Option<f32> {
        match phase {
            Phase::Lobby | Phase::GameEnd => None,
            Phase::RoundSetup => Some(self.round_setup_secs),
            Phase::Clue => Some(self.clue_secs),
            Phase::Guess => Some(self.guess_secs),
            Phase::Scoring => Some(self.scoring_secs),
            Phase::RoundEnd => Some(self.round_end_secs),
        }
    }
}

/// Strips control characters, trims surrounding whitespace, and truncates to
/// `MAX_NAME_LEN` characters.
///
/// An all-whitespace input sanitizes to the empty string; an empty name is a
/// blank slot that can never hold the active turn.
pub fn sanitize_name(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .chars()
        .take(MAX_NAME_LEN)
        .collect()
}

/// Fire-and-forget client requests; the authority validates each one and
/// silently no-ops on failure.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum ClientRequest {
    /// Join the player roster as a participant.
    RegisterPlayer,
    /// Leave the player roster while staying connected.
    UnregisterPlayer,
    /// Seed the first clue-giver from a pre-game winner. Host only.
    SetFirstClueGiverByName { name: String },
    /// Force the next phase transition, bypassing the timer. Host only.
    AdvancePhase,
    /// Adjust a participant's score. Host only.
    AwardPoints { target: PlayerId, delta: i32 },
}

/// Authoritative state-change notifications, each self-contained so clients
/// tolerate reordering or loss of intermediate updates.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum ServerEvent {
    PhaseChanged {
        phase: Phase,
    },
    ClueGiverChanged {
        name: String,
        index: i32,
        round: u32,
    },
    ScoreChanged {
        name: String,
        score: u32,
    },
    Winner {
        name: String,
    },
    RosterRefreshed {
        names: Vec<String>,
    },
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub enum Packet {
    Connect {
        client_version: u32,
        display_name: String,
    },
    Request(ClientRequest),
    Heartbeat {
        timestamp: u64,
    },
    Disconnect,

    Connected {
        client_id: PlayerId,
        host: bool,
    },
    Event(ServerEvent),
    /// Full authoritative state, broadcast every tick. Carries everything a
    /// replica needs to converge from scratch.
    StateSync {
        version: u64,
        timestamp: u64,
        phase: Phase,
        round: u32,
        clue_giver: Option<PlayerId>,
        clue_giver_name: String,
        clue_giver_index: i32,
        players: Vec<PlayerEntry>,
        phase_secs_left: Option<f32>,
    },
    Disconnected {
        reason: String,
    },
}
