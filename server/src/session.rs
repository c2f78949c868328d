//! Authoritative round/phase orchestration
//!
//! `GameSession` is the single writer for all core session state: the phase
//! machine, the replicated player list with scores, the identity roster, and
//! the clue-giver turn pointer. Every mutation commits first, then queues the
//! matching broadcast in the outbox; the network layer drains the outbox and
//! sends strictly afterwards, so a client can never observe an event for
//! state the authority has not finished writing.
//!
//! Phases progress `Lobby → RoundSetup → Clue → Guess → Scoring → RoundEnd`
//! and from `RoundEnd` either back to `RoundSetup` or on to `GameEnd`. Timed
//! phases auto-advance when the per-tick deadline poll observes the deadline
//! passed, so a transition can lag its nominal deadline by up to one tick.
//!
//! Nothing here returns an error to a caller: an authority violation, an
//! unknown name or id, or an empty roster degrades to a silent no-op or a
//! documented default, observable only through the next broadcast.

use crate::roster::{IdentityRoster, NameIndex};
use crate::rotation::TurnRotation;
use log::{debug, info};
use shared::{
    sanitize_name, GameConfig, Packet, Phase, PlayerEntry, PlayerId, ServerEvent, NO_CLUE_GIVER,
};
use std::time::{Duration, Instant};

/// Capability token held by the authoritative process.
///
/// Constructing a [`GameSession`] consumes one, so code without the token
/// structurally cannot create (or mutate) authoritative state. The hosting
/// process claims it exactly once at session start; replicas never do.
#[derive(Debug)]
pub struct Authority {
    _priv: (),
}

impl Authority {
    pub fn claim() -> Self {
        Authority { _priv: () }
    }
}

/// The authoritative session state machine.
pub struct GameSession {
    config: GameConfig,
    phase: Phase,
    phase_deadline: Option<Instant>,
    players: Vec<PlayerEntry>,
    roster: IdentityRoster,
    names: NameIndex,
    rotation: TurnRotation,
    clue_giver: Option<PlayerId>,
    version: u64,
    outbox: Vec<ServerEvent>,
    _authority: Authority,
}

impl GameSession {
    pub fn new(config: GameConfig, authority: Authority) -> Self {
        Self {
            config,
            phase: Phase::Lobby,
            phase_deadline: None,
            players: Vec::new(),
            roster: IdentityRoster::new(),
            names: NameIndex::new(),
            rotation: TurnRotation::new(config.rotate_clue_giver),
            clue_giver: None,
            version: 0,
            outbox: Vec::new(),
            _authority: authority,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.rotation.round()
    }

    pub fn players(&self) -> &[PlayerEntry] {
        &self.players
    }

    pub fn clue_giver(&self) -> Option<PlayerId> {
        self.clue_giver
    }

    /// Answers "is this participant currently the clue-giver?".
    pub fn is_clue_giver(&self, id: PlayerId) -> bool {
        self.clue_giver == Some(id)
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn roster_names(&self) -> Vec<String> {
        self.roster.names()
    }

    pub fn resolve_name(&self, name: &str) -> Option<PlayerId> {
        self.names.resolve(name)
    }

    /// Registers a connection as a participant. Idempotent against duplicate
    /// registration: a second call for the same id only re-broadcasts the
    /// roster.
    ///
    /// The first participant to join an empty list becomes the clue-giver so
    /// the session always has a designated turn-holder once anyone is
    /// present.
    pub fn add_player(&mut self, id: PlayerId, raw_name: &str) {
        let name = sanitize_name(raw_name);

        let already_registered = self.players.iter().any(|p| p.id == id);
        if !already_registered {
            let was_empty = self.players.is_empty();

            self.roster.register_or_update(id, &name);
            if !name.is_empty() {
                self.names.register(&name, id);
            }
            self.players.push(PlayerEntry::new(id, name.clone()));
            self.rotation.refresh(&self.roster);

            if was_empty && self.clue_giver.is_none() {
                self.clue_giver = Some(id);
                info!("First participant {} (\"{}\") takes the turn", id, name);
                self.emit(ServerEvent::ClueGiverChanged {
                    name,
                    index: 0,
                    round: self.rotation.round(),
                });
            }
        } else {
            debug!("Duplicate registration for {} ignored", id);
        }

        self.emit(ServerEvent::RosterRefreshed {
            names: self.roster.names(),
        });
    }

    /// Removes a departing participant.
    ///
    /// An empty list resets the session to the lobby with no active
    /// clue-giver. If the departing player held the turn, the rotation wraps
    /// modulo the shorter list and the new clue-giver is broadcast even
    /// though no explicit advance happened.
    pub fn player_left(&mut self, id: PlayerId) {
        if !self.players.iter().any(|p| p.id == id) {
            return;
        }

        if let Some(name) = self.roster.name_of(id).map(str::to_string) {
            self.names.unregister(&name, id);
        }
        self.roster.remove(id);

        let departing_index = self.players.iter().position(|p| p.id == id).unwrap_or(0);
        self.players.retain(|p| p.id != id);
        let held_turn = self.clue_giver == Some(id);

        if self.players.is_empty() {
            info!("Last participant left, returning to lobby");
            self.clue_giver = None;
            self.rotation.reset();
            self.begin_phase(Phase::Lobby, Instant::now());
        } else if held_turn {
            self.reassign_turn(departing_index);
        } else {
            self.rotation.refresh(&self.roster);
        }

        self.emit(ServerEvent::RosterRefreshed {
            names: self.roster.names(),
        });
    }

    /// Hands the turn to the next participant after the holder left.
    fn reassign_turn(&mut self, departing_index: usize) {
        if self.rotation.is_seeded() {
            self.rotation.refresh(&self.roster);
            self.clue_giver = self.rotation.current();
            let (name, index) = match self.clue_giver {
                Some(id) => (
                    self.roster.name_of(id).unwrap_or_default().to_string(),
                    self.rotation.wire_index(),
                ),
                None => (String::new(), NO_CLUE_GIVER),
            };
            self.emit(ServerEvent::ClueGiverChanged {
                name,
                index,
                round: self.rotation.round(),
            });
        } else {
            // Pre-game: wrap the departing slot modulo the shorter list.
            let index = departing_index % self.players.len();
            let entry = &self.players[index];
            self.clue_giver = Some(entry.id);
            let name = entry.name.clone();
            self.emit(ServerEvent::ClueGiverChanged {
                name,
                index: index as i32,
                round: self.rotation.round(),
            });
        }
    }

    /// Seeds the first clue-giver from a pre-game winner's display name and
    /// enters the round-start sequence.
    ///
    /// One-shot: ignored once a game is underway. An unknown name falls back
    /// to the first position; an empty roster is a no-op.
    pub fn set_first_clue_giver_by_name(&mut self, raw_name: &str, now: Instant) {
        let name = sanitize_name(raw_name);
        if !self.rotation.seed_by_winner(&self.roster, &name) {
            debug!("Ignored clue-giver seed \"{}\"", name);
            return;
        }

        self.clue_giver = self.rotation.current();
        let holder_name = self
            .clue_giver
            .and_then(|id| self.roster.name_of(id))
            .unwrap_or_default()
            .to_string();
        self.emit(ServerEvent::ClueGiverChanged {
            name: holder_name,
            index: self.rotation.wire_index(),
            round: self.rotation.round(),
        });

        self.begin_phase(Phase::RoundSetup, now);
    }

    /// Explicit manual phase transition, bypassing the timer.
    ///
    /// Lobby advances only when at least one participant is present and a
    /// clue-giver is assigned; GameEnd is terminal. Both otherwise no-op.
    pub fn advance_phase(&mut self, now: Instant) {
        match self.phase {
            Phase::Lobby => {
                if self.players.is_empty() || self.clue_giver.is_none() {
                    debug!("Cannot start a round without participants");
                    return;
                }
                // Starting without a seeded winner adopts the current holder.
                if !self.rotation.is_seeded() {
                    let holder = self
                        .clue_giver
                        .and_then(|id| self.roster.name_of(id))
                        .unwrap_or_default()
                        .to_string();
                    self.rotation.seed_by_winner(&self.roster, &holder);
                    self.clue_giver = self.rotation.current();
                }
                self.begin_phase(Phase::RoundSetup, now);
            }
            Phase::RoundSetup => self.begin_phase(Phase::Clue, now),
            Phase::Clue => self.begin_phase(Phase::Guess, now),
            Phase::Guess => self.begin_phase(Phase::Scoring, now),
            Phase::Scoring => self.begin_phase(Phase::RoundEnd, now),
            Phase::RoundEnd => self.complete_round(now),
            Phase::GameEnd => {}
        }
    }

    /// Adjusts a participant's score, clamping at a floor of zero.
    ///
    /// Reaching the target score ends the game immediately, overriding any
    /// pending phase deadline.
    pub fn award_points(&mut self, target: PlayerId, delta: i32) {
        let (name, score) = match self.players.iter_mut().find(|p| p.id == target) {
            Some(entry) => {
                entry.score = if delta >= 0 {
                    entry.score.saturating_add(delta as u32)
                } else {
                    entry.score.saturating_sub(delta.unsigned_abs())
                };
                (entry.name.clone(), entry.score)
            }
            None => {
                debug!("Ignored point award for unknown participant {}", target);
                return;
            }
        };

        info!("Score: \"{}\" now at {}", name, score);
        self.emit(ServerEvent::ScoreChanged {
            name: name.clone(),
            score,
        });

        if score >= self.config.target_score && self.phase != Phase::GameEnd {
            info!("\"{}\" reached the target score", name);
            self.emit(ServerEvent::Winner { name });
            self.begin_phase(Phase::GameEnd, Instant::now());
        }
    }

    /// Per-tick deadline poll. Timed phases advance once the authoritative
    /// clock passes their deadline; the transition may lag by up to one tick.
    pub fn tick(&mut self, now: Instant) {
        if let Some(deadline) = self.phase_deadline {
            if now >= deadline {
                debug!("Phase {} deadline passed", self.phase);
                self.advance_phase(now);
            }
        }
    }

    /// Takes the queued broadcasts. Callers send them only after the
    /// mutations that queued them have committed, which this ordering
    /// guarantees by construction.
    pub fn drain_events(&mut self) -> Vec<ServerEvent> {
        std::mem::take(&mut self.outbox)
    }

    /// Full self-describing state for the periodic sync broadcast.
    pub fn snapshot(&self, now: Instant, timestamp: u64) -> Packet {
        let clue_giver_name = self
            .clue_giver
            .and_then(|id| self.roster.name_of(id))
            .unwrap_or_default()
            .to_string();

        Packet::StateSync {
            version: self.version,
            timestamp,
            phase: self.phase,
            round: self.rotation.round(),
            clue_giver: self.clue_giver,
            clue_giver_name,
            clue_giver_index: self.rotation.wire_index(),
            players: self.players.clone(),
            phase_secs_left: self
                .phase_deadline
                .map(|dl| dl.saturating_duration_since(now).as_secs_f32()),
        }
    }

    /// Round completion: past the configured maximum the highest score wins
    /// (first entry wins ties); otherwise the turn rotates (when configured)
    /// and the next round begins. An empty player list falls back to the
    /// lobby.
    fn complete_round(&mut self, now: Instant) {
        if self.players.is_empty() {
            self.clue_giver = None;
            self.rotation.reset();
            self.begin_phase(Phase::Lobby, now);
            return;
        }

        let next_round = self.rotation.round() + 1;
        if next_round > self.config.max_rounds {
            let winner = self.leading_player().clone();
            info!("Final round done, \"{}\" wins with {}", winner.name, winner.score);
            self.emit(ServerEvent::Winner { name: winner.name });
            self.begin_phase(Phase::GameEnd, now);
            return;
        }

        if self.config.rotate_clue_giver {
            self.rotation.advance(&self.roster);
            self.clue_giver = self.rotation.current();
            let (name, index) = match self.clue_giver {
                Some(id) => (
                    self.roster.name_of(id).unwrap_or_default().to_string(),
                    self.rotation.wire_index(),
                ),
                None => (String::new(), NO_CLUE_GIVER),
            };
            self.emit(ServerEvent::ClueGiverChanged {
                name,
                index,
                round: self.rotation.round(),
            });
        } else {
            self.rotation.next_round();
        }

        self.begin_phase(Phase::RoundSetup, now);
    }

    /// Highest score, earliest list position winning ties.
    fn leading_player(&self) -> &PlayerEntry {
        let mut best = &self.players[0];
        for entry in &self.players[1..] {
            if entry.score > best.score {
                best = entry;
            }
        }
        best
    }

    fn begin_phase(&mut self, phase: Phase, now: Instant) {
        self.phase = phase;
        self.phase_deadline = self
            .config
            .phase_duration(phase)
            .map(|secs| now + Duration::from_secs_f32(secs));
        info!("Phase -> {}", phase);
        self.emit(ServerEvent::PhaseChanged { phase });
    }

    fn emit(&mut self, event: ServerEvent) {
        self.version += 1;
        self.outbox.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(config: GameConfig) -> GameSession {
        GameSession::new(config, Authority::claim())
    }

    fn fast_config() -> GameConfig {
        GameConfig {
            target_score: 50,
            max_rounds: 2,
            round_setup_secs: 0.1,
            clue_secs: 0.1,
            guess_secs: 0.1,
            scoring_secs: 0.1,
            round_end_secs: 0.1,
            rotate_clue_giver: true,
        }
    }

    fn join_three(session: &mut GameSession) {
        session.add_player(1, "Amy");
        session.add_player(2, "Bob");
        session.add_player(3, "Cid");
        session.drain_events();
    }

    #[test]
    fn test_first_joiner_becomes_clue_giver() {
        let mut s = session(GameConfig::default());
        s.add_player(1, "Amy");

        assert_eq!(s.clue_giver(), Some(1));
        assert!(s.is_clue_giver(1));

        let events = s.drain_events();
        assert_eq!(
            events[0],
            ServerEvent::ClueGiverChanged {
                name: "Amy".to_string(),
                index: 0,
                round: 0,
            }
        );
        assert_eq!(
            events[1],
            ServerEvent::RosterRefreshed {
                names: vec!["Amy".to_string()],
            }
        );
    }

    #[test]
    fn test_duplicate_registration_is_idempotent() {
        let mut s = session(GameConfig::default());
        s.add_player(1, "Amy");
        s.add_player(1, "Amy");

        assert_eq!(s.players().len(), 1);
        // The duplicate still re-broadcasts the roster.
        let roster_events = s
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, ServerEvent::RosterRefreshed { .. }))
            .count();
        assert_eq!(roster_events, 2);
    }

    #[test]
    fn test_leave_then_rejoin_restores_exactly_once() {
        let mut s = session(GameConfig::default());
        join_three(&mut s);

        s.player_left(2);
        assert_eq!(s.players().len(), 2);
        assert!(!s.players().iter().any(|p| p.id == 2));

        s.add_player(2, "Bob");
        s.add_player(2, "Bob");
        let matching: Vec<_> = s.players().iter().filter(|p| p.id == 2).collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].score, 0);
    }

    #[test]
    fn test_names_are_sanitized_on_registration() {
        let mut s = session(GameConfig::default());
        s.add_player(1, "  Amy\u{0007}  ");
        assert_eq!(s.players()[0].name, "Amy");
        assert_eq!(s.roster_names(), vec!["Amy"]);
        assert_eq!(s.resolve_name("Amy"), Some(1));
    }

    #[test]
    fn test_award_points_never_goes_below_zero() {
        let mut s = session(GameConfig::default());
        s.add_player(1, "Amy");

        s.award_points(1, -30);
        assert_eq!(s.players()[0].score, 0);

        s.award_points(1, 10);
        s.award_points(1, -3);
        s.award_points(1, -100);
        assert_eq!(s.players()[0].score, 0);
    }

    #[test]
    fn test_award_points_unknown_target_is_noop() {
        let mut s = session(GameConfig::default());
        s.add_player(1, "Amy");
        s.drain_events();

        s.award_points(99, 10);
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn test_reaching_target_score_forces_game_end() {
        let mut s = session(GameConfig::default());
        join_three(&mut s);
        let now = Instant::now();
        s.set_first_clue_giver_by_name("Bob", now);
        s.drain_events();

        s.award_points(2, 60);

        let events = s.drain_events();
        assert_eq!(
            events[0],
            ServerEvent::ScoreChanged {
                name: "Bob".to_string(),
                score: 60,
            }
        );
        assert_eq!(
            events[1],
            ServerEvent::Winner {
                name: "Bob".to_string(),
            }
        );
        assert_eq!(
            events[2],
            ServerEvent::PhaseChanged {
                phase: Phase::GameEnd,
            }
        );
        assert_eq!(s.phase(), Phase::GameEnd);

        // GameEnd is held indefinitely: the pending timer is gone.
        s.tick(now + Duration::from_secs(3600));
        assert_eq!(s.phase(), Phase::GameEnd);
    }

    #[test]
    fn test_initial_winner_scenario() {
        let mut s = session(GameConfig::default());
        join_three(&mut s);
        let now = Instant::now();

        s.set_first_clue_giver_by_name("Bob", now);
        let events = s.drain_events();
        assert_eq!(
            events[0],
            ServerEvent::ClueGiverChanged {
                name: "Bob".to_string(),
                index: 1,
                round: 1,
            }
        );
        assert_eq!(
            events[1],
            ServerEvent::PhaseChanged {
                phase: Phase::RoundSetup,
            }
        );
        assert_eq!(s.round(), 1);
    }

    #[test]
    fn test_departing_clue_giver_triggers_reassignment_broadcast() {
        let mut s = session(GameConfig::default());
        join_three(&mut s);
        let now = Instant::now();
        s.set_first_clue_giver_by_name("Bob", now);

        // Walk one full round so Cid holds the turn.
        for _ in 0..4 {
            s.advance_phase(now);
        }
        assert_eq!(s.phase(), Phase::RoundEnd);
        s.advance_phase(now);
        assert_eq!(s.clue_giver(), Some(3));
        assert_eq!(s.round(), 2);
        s.drain_events();

        // Cid disconnects while holding the turn: the index wraps modulo the
        // shorter list and a broadcast fires without any explicit advance.
        s.player_left(3);
        let events = s.drain_events();
        assert_eq!(
            events[0],
            ServerEvent::ClueGiverChanged {
                name: "Amy".to_string(),
                index: 0,
                round: 2,
            }
        );
        assert_eq!(
            events[1],
            ServerEvent::RosterRefreshed {
                names: vec!["Amy".to_string(), "Bob".to_string()],
            }
        );
    }

    #[test]
    fn test_last_leaver_resets_to_lobby() {
        let mut s = session(GameConfig::default());
        s.add_player(1, "Amy");
        let now = Instant::now();
        s.set_first_clue_giver_by_name("Amy", now);
        assert_eq!(s.phase(), Phase::RoundSetup);
        s.drain_events();

        s.player_left(1);
        assert_eq!(s.phase(), Phase::Lobby);
        assert_eq!(s.clue_giver(), None);
        assert_eq!(s.round(), 0);

        let events = s.drain_events();
        assert!(events.contains(&ServerEvent::PhaseChanged {
            phase: Phase::Lobby,
        }));
        assert!(events.contains(&ServerEvent::RosterRefreshed { names: vec![] }));
    }

    #[test]
    fn test_two_round_phase_walk() {
        let mut s = session(fast_config());
        join_three(&mut s);
        s.award_points(1, 5);
        s.award_points(2, 9);
        s.drain_events();

        let mut now = Instant::now();
        s.set_first_clue_giver_by_name("Bob", now);

        let mut observed = vec![];
        for event in s.drain_events() {
            if let ServerEvent::PhaseChanged { phase } = event {
                observed.push(phase);
            }
        }

        // Poll well past each deadline; transitions tolerate tick slack.
        for _ in 0..20 {
            now += Duration::from_millis(200);
            s.tick(now);
            for event in s.drain_events() {
                if let ServerEvent::PhaseChanged { phase } = event {
                    observed.push(phase);
                }
            }
            if s.phase() == Phase::GameEnd {
                break;
            }
        }

        assert_eq!(
            observed,
            vec![
                Phase::RoundSetup,
                Phase::Clue,
                Phase::Guess,
                Phase::Scoring,
                Phase::RoundEnd,
                Phase::RoundSetup,
                Phase::Clue,
                Phase::Guess,
                Phase::Scoring,
                Phase::RoundEnd,
                Phase::GameEnd,
            ]
        );
    }

    #[test]
    fn test_final_winner_is_highest_score_first_on_ties() {
        let mut s = session(fast_config());
        join_three(&mut s);
        s.award_points(1, 9);
        s.award_points(3, 9);
        s.drain_events();

        let mut now = Instant::now();
        s.set_first_clue_giver_by_name("Amy", now);

        let mut winner = None;
        for _ in 0..20 {
            now += Duration::from_millis(200);
            s.tick(now);
            for event in s.drain_events() {
                if let ServerEvent::Winner { name } = event {
                    winner = Some(name);
                }
            }
            if s.phase() == Phase::GameEnd {
                break;
            }
        }

        // Amy and Cid tie at 9; Amy joined first and wins.
        assert_eq!(winner.as_deref(), Some("Amy"));
        assert_eq!(s.phase(), Phase::GameEnd);
    }

    #[test]
    fn test_rotation_disabled_keeps_clue_giver() {
        let mut config = fast_config();
        config.rotate_clue_giver = false;
        let mut s = session(config);
        join_three(&mut s);
        let now = Instant::now();
        s.set_first_clue_giver_by_name("Bob", now);
        assert_eq!(s.clue_giver(), Some(2));

        for _ in 0..5 {
            s.advance_phase(now);
        }
        // Back in RoundSetup for round 2, same holder.
        assert_eq!(s.phase(), Phase::RoundSetup);
        assert_eq!(s.round(), 2);
        assert_eq!(s.clue_giver(), Some(2));
    }

    #[test]
    fn test_advance_phase_in_empty_lobby_is_noop() {
        let mut s = session(GameConfig::default());
        let now = Instant::now();
        s.advance_phase(now);
        assert_eq!(s.phase(), Phase::Lobby);
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn test_advance_phase_from_lobby_adopts_current_holder() {
        let mut s = session(GameConfig::default());
        join_three(&mut s);
        let now = Instant::now();

        // No winner was seeded; the first joiner already holds the turn.
        s.advance_phase(now);
        assert_eq!(s.phase(), Phase::RoundSetup);
        assert_eq!(s.round(), 1);
        assert_eq!(s.clue_giver(), Some(1));
    }

    #[test]
    fn test_game_end_is_terminal() {
        let mut s = session(GameConfig::default());
        s.add_player(1, "Amy");
        s.award_points(1, 100);
        assert_eq!(s.phase(), Phase::GameEnd);
        s.drain_events();

        let now = Instant::now();
        s.advance_phase(now);
        assert_eq!(s.phase(), Phase::GameEnd);
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn test_seed_is_ignored_mid_game() {
        let mut s = session(GameConfig::default());
        join_three(&mut s);
        let now = Instant::now();
        s.set_first_clue_giver_by_name("Bob", now);
        s.drain_events();

        s.set_first_clue_giver_by_name("Cid", now);
        assert_eq!(s.clue_giver(), Some(2));
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn test_tick_respects_deadline_slack() {
        let mut s = session(GameConfig::default());
        join_three(&mut s);
        let now = Instant::now();
        s.set_first_clue_giver_by_name("Amy", now);
        assert_eq!(s.phase(), Phase::RoundSetup);

        // Just before the deadline nothing moves.
        s.tick(now + Duration::from_secs_f32(4.9));
        assert_eq!(s.phase(), Phase::RoundSetup);

        // Past the deadline the next poll advances.
        s.tick(now + Duration::from_secs_f32(5.1));
        assert_eq!(s.phase(), Phase::Clue);
    }

    #[test]
    fn test_lobby_has_no_deadline() {
        let mut s = session(GameConfig::default());
        s.add_player(1, "Amy");
        s.drain_events();

        s.tick(Instant::now() + Duration::from_secs(3600));
        assert_eq!(s.phase(), Phase::Lobby);
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn test_version_increases_with_every_broadcast() {
        let mut s = session(GameConfig::default());
        let v0 = s.version();
        s.add_player(1, "Amy");
        let v1 = s.version();
        assert!(v1 > v0);

        s.award_points(1, 5);
        assert!(s.version() > v1);
    }

    #[test]
    fn test_snapshot_is_self_describing() {
        let mut s = session(GameConfig::default());
        join_three(&mut s);
        let now = Instant::now();
        s.set_first_clue_giver_by_name("Cid", now);

        match s.snapshot(now, 12345) {
            Packet::StateSync {
                version,
                timestamp,
                phase,
                round,
                clue_giver,
                clue_giver_name,
                clue_giver_index,
                players,
                phase_secs_left,
            } => {
                assert_eq!(version, s.version());
                assert_eq!(timestamp, 12345);
                assert_eq!(phase, Phase::RoundSetup);
                assert_eq!(round, 1);
                assert_eq!(clue_giver, Some(3));
                assert_eq!(clue_giver_name, "Cid");
                assert_eq!(clue_giver_index, 2);
                assert_eq!(players.len(), 3);
                assert!(phase_secs_left.unwrap() > 0.0);
            }
            _ => panic!("Snapshot must be a StateSync packet"),
        }
    }
}
