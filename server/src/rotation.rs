//! Turn rotation over the participant roster
//!
//! The engine is keyed by stable identifier; display names are resolved
//! against the [`IdentityRoster`] only for ordering and blank skipping. Turn
//! order is derived on demand from the roster, sorted case-insensitively by
//! display name (ties broken by id) so every process that derives it agrees.
//!
//! A blank (empty or whitespace) name is a valid placeholder slot, e.g. a
//! disconnected-but-not-yet-cleaned-up participant, and is never selected as
//! the active holder.

use crate::roster::IdentityRoster;
use log::info;
use shared::{PlayerId, NO_CLUE_GIVER};

/// Deterministic turn order plus the rotation cursor and round counter.
///
/// The cursor is `Some(i)` with `i < order.len()` exactly when the order is
/// non-empty; an empty order leaves it at the `None` sentinel ("no one").
#[derive(Debug)]
pub struct TurnRotation {
    order: Vec<PlayerId>,
    index: Option<usize>,
    round: u32,
    auto_skip: bool,
    seeded: bool,
}

impl TurnRotation {
    pub fn new(auto_skip: bool) -> Self {
        Self {
            order: Vec::new(),
            index: None,
            round: 0,
            auto_skip,
            seeded: false,
        }
    }

    /// Stable id of the current turn-holder, if any.
    pub fn current(&self) -> Option<PlayerId> {
        self.index.map(|i| self.order[i])
    }

    /// Cursor position as broadcast on the wire: `-1` means "no one".
    pub fn wire_index(&self) -> i32 {
        self.index.map(|i| i as i32).unwrap_or(NO_CLUE_GIVER)
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn order(&self) -> &[PlayerId] {
        &self.order
    }

    /// Whether the one-shot winner seeding has already happened.
    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    /// Returns the engine to its pre-game state so a fresh session can be
    /// seeded again.
    pub fn reset(&mut self) {
        self.order.clear();
        self.index = None;
        self.round = 0;
        self.seeded = false;
    }

    /// Recomputes turn order from the roster and clamps the cursor.
    ///
    /// If the previous holder is still registered the cursor follows them to
    /// their new position. Otherwise the raw cursor wraps modulo the new
    /// length; with auto-skip enabled it then moves to the nearest slot with
    /// a non-blank name instead of resting on a placeholder.
    pub fn rebuild(&mut self, roster: &IdentityRoster) {
        let previous = self.current();
        self.recompute_order(roster);

        if self.order.is_empty() {
            self.index = None;
            return;
        }

        if let Some(prev_id) = previous {
            if let Some(pos) = self.order.iter().position(|id| *id == prev_id) {
                self.index = Some(pos);
                return;
            }
        }

        match self.index {
            Some(old) => {
                let wrapped = old % self.order.len();
                if self.auto_skip {
                    self.index = self.first_non_blank_from(roster, wrapped);
                } else {
                    self.index = Some(wrapped);
                }
            }
            None => self.index = None,
        }
    }

    /// One-shot initial assignment from a pre-game winner's display name.
    ///
    /// Rebuilds the order, resolves the name to a position (falling back to
    /// position 0 when the name is unknown), and starts round 1. Idempotent:
    /// calls after the first successful seeding are ignored. An empty roster
    /// leaves the engine untouched so a later attempt can still succeed.
    pub fn seed_by_winner(&mut self, roster: &IdentityRoster, winner_name: &str) -> bool {
        if self.seeded {
            return false;
        }

        self.recompute_order(roster);
        if self.order.is_empty() {
            self.index = None;
            return false;
        }

        // Unknown (or blank) winners fall back to the first usable slot; a
        // blank placeholder can never hold the turn.
        let resolved = if winner_name.trim().is_empty() {
            None
        } else {
            self.order
                .iter()
                .position(|id| roster.name_of(*id) == Some(winner_name))
        };
        let pos = match resolved.or_else(|| self.first_non_blank_from(roster, 0)) {
            Some(pos) => pos,
            None => {
                self.index = None;
                return false;
            }
        };

        self.index = Some(pos);
        self.round = 1;
        self.seeded = true;
        info!(
            "Turn order seeded: \"{}\" at position {} of {}",
            winner_name,
            pos,
            self.order.len()
        );
        true
    }

    /// Hands the turn to the next participant and starts the next round.
    ///
    /// The order is rebuilt first, then the scan moves forward (wrapping)
    /// from the current cursor to the next slot whose name is non-blank. The
    /// scan visits each slot at most once, so a roster of only blank slots
    /// terminates with the `None` sentinel rather than looping.
    pub fn advance(&mut self, roster: &IdentityRoster) -> Option<PlayerId> {
        self.rebuild(roster);
        self.round += 1;

        if self.order.is_empty() {
            self.index = None;
            return None;
        }

        let start = self.index.map(|i| i + 1).unwrap_or(0);
        self.index = self.first_non_blank_from(roster, start % self.order.len());
        self.current()
    }

    /// Advances the round counter without moving the turn, for sessions that
    /// keep one clue-giver across rounds.
    pub fn next_round(&mut self) {
        self.round += 1;
    }

    /// Re-derives order after a membership change without advancing the turn.
    ///
    /// The current holder is preserved by identity lookup (their position may
    /// have shifted). When the holder is gone, auto-skip clamps to a valid
    /// slot; otherwise the cursor resets to the first slot.
    pub fn refresh(&mut self, roster: &IdentityRoster) {
        let previous = self.current();
        self.recompute_order(roster);

        if self.order.is_empty() {
            self.index = None;
            return;
        }

        if let Some(prev_id) = previous {
            if let Some(pos) = self.order.iter().position(|id| *id == prev_id) {
                self.index = Some(pos);
                return;
            }
            if self.auto_skip {
                let wrapped = self.index.map(|i| i % self.order.len()).unwrap_or(0);
                self.index = self.first_non_blank_from(roster, wrapped);
            } else {
                self.index = Some(0);
            }
        }
    }

    fn recompute_order(&mut self, roster: &IdentityRoster) {
        let mut entries: Vec<(String, PlayerId)> = roster
            .iter()
            .map(|(id, name)| (name.to_lowercase(), id))
            .collect();
        entries.sort();
        self.order = entries.into_iter().map(|(_, id)| id).collect();
    }

    /// First slot at or after `start` (wrapping) whose name is non-blank,
    /// visiting each slot at most once.
    fn first_non_blank_from(&self, roster: &IdentityRoster, start: usize) -> Option<usize> {
        let len = self.order.len();
        for step in 0..len {
            let pos = (start + step) % len;
            if let Some(name) = roster.name_of(self.order[pos]) {
                if !name.trim().is_empty() {
                    return Some(pos);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster_of(names: &[(PlayerId, &str)]) -> IdentityRoster {
        let mut roster = IdentityRoster::new();
        for (id, name) in names {
            roster.register_or_update(*id, name);
        }
        roster
    }

    #[test]
    fn test_order_is_case_insensitive_sorted() {
        let roster = roster_of(&[(1, "cid"), (2, "Amy"), (3, "BOB")]);
        let mut rotation = TurnRotation::new(true);
        rotation.rebuild(&roster);

        // Amy(2) < bob(3) < cid(1)
        assert_eq!(rotation.order(), &[2, 3, 1]);
    }

    #[test]
    fn test_index_invariant_across_rebuilds() {
        let mut roster = roster_of(&[(1, "Amy"), (2, "Bob"), (3, "Cid")]);
        let mut rotation = TurnRotation::new(true);

        rotation.rebuild(&roster);
        assert_eq!(rotation.current(), None);

        rotation.seed_by_winner(&roster, "Cid");
        for _ in 0..5 {
            rotation.rebuild(&roster);
            let idx = rotation.wire_index();
            assert!(idx >= 0 && (idx as usize) < rotation.order().len());
        }

        roster.remove(1);
        roster.remove(2);
        roster.remove(3);
        rotation.rebuild(&roster);
        assert_eq!(rotation.wire_index(), NO_CLUE_GIVER);
        assert_eq!(rotation.current(), None);
    }

    #[test]
    fn test_seed_by_winner_resolves_name() {
        let roster = roster_of(&[(1, "Amy"), (2, "Bob"), (3, "Cid")]);
        let mut rotation = TurnRotation::new(true);

        assert!(rotation.seed_by_winner(&roster, "Bob"));
        assert_eq!(rotation.current(), Some(2));
        assert_eq!(rotation.wire_index(), 1);
        assert_eq!(rotation.round(), 1);
    }

    #[test]
    fn test_seed_unknown_winner_falls_back_to_first() {
        let roster = roster_of(&[(1, "Amy"), (2, "Bob")]);
        let mut rotation = TurnRotation::new(true);

        assert!(rotation.seed_by_winner(&roster, "Nobody"));
        assert_eq!(rotation.wire_index(), 0);
        assert_eq!(rotation.current(), Some(1));
    }

    #[test]
    fn test_seed_never_selects_blank_slot() {
        // Blanks sort first; the fallback must land on Bob, not a blank.
        let roster = roster_of(&[(1, ""), (2, "Bob")]);
        let mut rotation = TurnRotation::new(true);
        assert!(rotation.seed_by_winner(&roster, "Nobody"));
        assert_eq!(rotation.current(), Some(2));

        let all_blank = roster_of(&[(3, ""), (4, " ")]);
        let mut rotation = TurnRotation::new(true);
        assert!(!rotation.seed_by_winner(&all_blank, ""));
        assert_eq!(rotation.current(), None);
    }

    #[test]
    fn test_seed_is_one_shot() {
        let roster = roster_of(&[(1, "Amy"), (2, "Bob")]);
        let mut rotation = TurnRotation::new(true);

        assert!(rotation.seed_by_winner(&roster, "Bob"));
        assert!(!rotation.seed_by_winner(&roster, "Amy"));
        assert_eq!(rotation.current(), Some(2));
        assert_eq!(rotation.round(), 1);
    }

    #[test]
    fn test_seed_on_empty_roster_is_noop() {
        let roster = IdentityRoster::new();
        let mut rotation = TurnRotation::new(true);

        assert!(!rotation.seed_by_winner(&roster, "Amy"));
        assert!(!rotation.is_seeded());
        assert_eq!(rotation.current(), None);
    }

    #[test]
    fn test_advance_walks_the_order() {
        let roster = roster_of(&[(1, "Amy"), (2, "Bob"), (3, "Cid")]);
        let mut rotation = TurnRotation::new(true);
        rotation.seed_by_winner(&roster, "Amy");

        assert_eq!(rotation.advance(&roster), Some(2));
        assert_eq!(rotation.round(), 2);
        assert_eq!(rotation.advance(&roster), Some(3));
        assert_eq!(rotation.round(), 3);
        // Wraps back around.
        assert_eq!(rotation.advance(&roster), Some(1));
        assert_eq!(rotation.round(), 4);
    }

    #[test]
    fn test_advance_skips_blank_names() {
        let roster = roster_of(&[(1, "Amy"), (2, ""), (3, "Cid")]);
        let mut rotation = TurnRotation::new(true);
        rotation.seed_by_winner(&roster, "Amy");

        // Order: Amy(1), Cid(3), blank(2) -- blank sorts first by empty name.
        // Whatever the blank's position, it is never selected.
        for _ in 0..6 {
            let holder = rotation.advance(&roster).unwrap();
            assert_ne!(holder, 2, "blank slot must never hold the turn");
        }
    }

    #[test]
    fn test_advance_terminates_on_all_blank_roster() {
        let roster = roster_of(&[(1, ""), (2, "  ")]);
        let mut rotation = TurnRotation::new(true);

        assert_eq!(rotation.advance(&roster), None);
        assert_eq!(rotation.wire_index(), NO_CLUE_GIVER);
    }

    #[test]
    fn test_advance_on_empty_roster_yields_sentinel() {
        let roster = IdentityRoster::new();
        let mut rotation = TurnRotation::new(true);

        assert_eq!(rotation.advance(&roster), None);
        assert_eq!(rotation.wire_index(), NO_CLUE_GIVER);
    }

    #[test]
    fn test_departing_holder_wraps_modulo() {
        let mut roster = roster_of(&[(1, "Amy"), (2, "Bob"), (3, "Cid")]);
        let mut rotation = TurnRotation::new(true);
        rotation.seed_by_winner(&roster, "Cid");
        assert_eq!(rotation.wire_index(), 2);

        // The holder leaves; index 2 wraps modulo the new length 2 to 0.
        roster.remove(3);
        rotation.refresh(&roster);
        assert_eq!(rotation.current(), Some(1));
        assert_eq!(rotation.wire_index(), 0);
    }

    #[test]
    fn test_refresh_preserves_holder_by_identity() {
        let mut roster = roster_of(&[(2, "Bob"), (3, "Cid")]);
        let mut rotation = TurnRotation::new(true);
        rotation.seed_by_winner(&roster, "Cid");
        assert_eq!(rotation.wire_index(), 1);

        // A join shifts Cid's position; the cursor must follow the holder,
        // not the slot number.
        roster.register_or_update(1, "Amy");
        rotation.refresh(&roster);
        assert_eq!(rotation.current(), Some(3));
        assert_eq!(rotation.wire_index(), 2);
    }

    #[test]
    fn test_refresh_without_auto_skip_resets_to_first() {
        let mut roster = roster_of(&[(1, "Amy"), (2, "Bob"), (3, "Cid")]);
        let mut rotation = TurnRotation::new(false);
        rotation.seed_by_winner(&roster, "Cid");

        roster.remove(3);
        rotation.refresh(&roster);
        assert_eq!(rotation.wire_index(), 0);
        assert_eq!(rotation.current(), Some(1));
    }

    #[test]
    fn test_round_counter_survives_membership_churn() {
        let mut roster = roster_of(&[(1, "Amy"), (2, "Bob"), (3, "Cid")]);
        let mut rotation = TurnRotation::new(true);
        rotation.seed_by_winner(&roster, "Amy");
        rotation.advance(&roster);
        assert_eq!(rotation.round(), 2);

        roster.remove(1);
        rotation.refresh(&roster);
        assert_eq!(rotation.round(), 2);
    }

    #[test]
    fn test_reset_allows_reseeding() {
        let roster = roster_of(&[(1, "Amy")]);
        let mut rotation = TurnRotation::new(true);
        rotation.seed_by_winner(&roster, "Amy");
        rotation.reset();

        assert_eq!(rotation.round(), 0);
        assert_eq!(rotation.current(), None);
        assert!(rotation.seed_by_winner(&roster, "Amy"));
    }
}
