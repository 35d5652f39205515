use std::time::{Duration, Instant};

use rand::Rng;

use crate::clock::Clock;
use crate::deck::build_deck;
use crate::error::ConfigError;
use crate::records::BestTimes;
use crate::state::{Card, CardStatus, Difficulty, Feedback, GameState, validate_registry};

/// Hold after a mismatch before the "bad" pulse fires. Cosmetic only;
/// it never unlocks input.
pub const MISMATCH_HOLD_MS: u64 = 650;
/// From the "bad" pulse to the flip-back that clears the lock. The full
/// mismatch window is therefore `MISMATCH_HOLD_MS + MISMATCH_CLEAR_MS`.
pub const MISMATCH_CLEAR_MS: u64 = 900;
/// Delay before the "good" pulse on a matched pair.
pub const MATCH_PULSE_DELAY_MS: u64 = 250;
/// How long the "good" pulse stays visible.
pub const MATCH_PULSE_MS: u64 = 1300;
/// Suggested cadence for display-refresh ticks. Advisory only.
pub const CLOCK_TICK_MS: u64 = 400;

#[derive(Clone, Copy, Debug)]
enum Effect {
    MismatchPulse([usize; 2]),
    MismatchClear([usize; 2]),
    MatchPulse([usize; 2]),
    FeedbackClear([usize; 2]),
}

/// A scheduled state change. Carries the generation counter of the
/// session that scheduled it, so effects outlived by a reset die
/// instead of mutating the session that replaced it.
#[derive(Clone, Copy, Debug)]
struct Pending {
    due: Instant,
    game_id: u64,
    effect: Effect,
}

/// The public mutation surface: owns one session, its best times and
/// the pending-effect queue, and enforces the flip/lock/resolve
/// protocol. All waiting is modeled as deadlines drained by `tick`.
pub struct Engine {
    pub(crate) state: GameState,
    pub(crate) records: BestTimes,
    pending: Vec<Pending>,
}

impl Engine {
    pub fn new(difficulty: Difficulty, rng: &mut impl Rng) -> Result<Self, ConfigError> {
        validate_registry()?;
        Ok(Engine {
            state: GameState::new(difficulty, rng),
            records: BestTimes::default(),
            pending: Vec::new(),
        })
    }

    /// Flips the card at `index`. Silently rejected while locked, after
    /// victory, or for a position that is not face-down. The first
    /// accepted reveal of a session starts the clock.
    pub fn reveal(&mut self, index: usize, now: Instant) {
        let st = &mut self.state;
        if st.lock_input || st.victory {
            return;
        }
        let Some(card) = st.cards.get(index) else {
            return;
        };
        if card.status != CardStatus::Hidden {
            return;
        }

        if !st.clock.is_running() {
            st.clock.start(now);
        }
        st.cards[index].status = CardStatus::Flipped;
        st.flipped_indices.push(index);
        tracing::debug!(index, "card revealed");

        if st.flipped_indices.len() == 2 {
            self.resolve_pair(now);
        }
    }

    /// Replaces the session: fresh deck for `difficulty`, cleared
    /// counters and flags, bumped generation counter, cancelled pending
    /// effects, stopped clock. Best times are left untouched. Resetting
    /// to the current difficulty still reshuffles.
    pub fn reset(&mut self, difficulty: Difficulty, rng: &mut impl Rng, now: Instant) {
        let st = &mut self.state;
        st.clock.stop(now);
        st.game_id = st.game_id.wrapping_add(1);
        st.difficulty = difficulty;
        st.cards = build_deck(&difficulty.config(), rng);
        st.feedback = vec![Feedback::None; st.cards.len()];
        st.flipped_indices.clear();
        st.moves = 0;
        st.matches = 0;
        st.lock_input = false;
        st.victory = false;
        st.clock = Clock::default();
        self.pending.clear();
        tracing::debug!(difficulty = difficulty.name(), "session reset");
    }

    /// Fires every pending effect that has come due and refreshes the
    /// displayed clock. Intended to run on a coarse cadence
    /// (`CLOCK_TICK_MS`); late or coalesced calls only delay cosmetics
    /// and unlocking, never the measured completion time.
    pub fn tick(&mut self, now: Instant) {
        self.state.clock.tick(now);
        if self.pending.is_empty() {
            return;
        }

        let game_id = self.state.game_id;
        let mut due: Vec<Pending> = Vec::new();
        let mut waiting: Vec<Pending> = Vec::with_capacity(self.pending.len());
        for pending in self.pending.drain(..) {
            if pending.game_id != game_id {
                continue;
            }
            if pending.due <= now {
                due.push(pending);
            } else {
                waiting.push(pending);
            }
        }
        self.pending = waiting;

        due.sort_by_key(|pending| pending.due);
        for pending in due {
            self.apply(pending.effect);
        }
    }

    fn resolve_pair(&mut self, now: Instant) {
        let first = self.state.flipped_indices[0];
        let second = self.state.flipped_indices[1];

        let (left, right) = match (self.state.cards.get(first), self.state.cards.get(second)) {
            (Some(a), Some(b)) => (a.symbol, b.symbol),
            _ => {
                self.abandon_turn();
                return;
            }
        };
        self.state.moves = self.state.moves.saturating_add(1);

        if left == right {
            let st = &mut self.state;
            st.matches = st.matches.saturating_add(1);
            st.cards[first].status = CardStatus::Matched;
            st.cards[second].status = CardStatus::Matched;
            st.flipped_indices.clear();
            tracing::debug!(first, second, symbol = left, "pair matched");

            self.schedule(now, MATCH_PULSE_DELAY_MS, Effect::MatchPulse([first, second]));
            self.schedule(
                now,
                MATCH_PULSE_DELAY_MS + MATCH_PULSE_MS,
                Effect::FeedbackClear([first, second]),
            );

            if self.state.all_matched() {
                let st = &mut self.state;
                st.victory = true;
                st.clock.stop(now);
                let elapsed = st.clock.elapsed(now);
                let improved = self.records.register(self.state.difficulty, elapsed);
                tracing::info!(
                    moves = self.state.moves,
                    elapsed_ms = elapsed.as_millis() as u64,
                    improved,
                    "board cleared"
                );
            }
        } else {
            self.state.lock_input = true;
            tracing::debug!(first, second, "mismatch, input locked");
            self.schedule(now, MISMATCH_HOLD_MS, Effect::MismatchPulse([first, second]));
            self.schedule(
                now,
                MISMATCH_HOLD_MS + MISMATCH_CLEAR_MS,
                Effect::MismatchClear([first, second]),
            );
        }
    }

    // Should be unreachable: a buffered position that cannot be read
    // back. Abort the turn, leave the counters alone.
    fn abandon_turn(&mut self) {
        let st = &mut self.state;
        let indices: Vec<usize> = st.flipped_indices.drain(..).collect();
        for idx in indices {
            if let Some(card) = st.cards.get_mut(idx)
                && card.status == CardStatus::Flipped
            {
                card.status = CardStatus::Hidden;
            }
        }
        st.lock_input = false;
        tracing::warn!("turn abandoned, buffered position unreadable");
    }

    fn schedule(&mut self, now: Instant, delay_ms: u64, effect: Effect) {
        self.pending.push(Pending {
            due: now + Duration::from_millis(delay_ms),
            game_id: self.state.game_id,
            effect,
        });
    }

    fn apply(&mut self, effect: Effect) {
        let st = &mut self.state;
        match effect {
            Effect::MismatchPulse(indices) => {
                for idx in indices {
                    if let Some(slot) = st.feedback.get_mut(idx) {
                        *slot = Feedback::Bad;
                    }
                }
            }
            Effect::MismatchClear(indices) => {
                for idx in indices {
                    if let Some(card) = st.cards.get_mut(idx)
                        && card.status == CardStatus::Flipped
                    {
                        card.status = CardStatus::Hidden;
                    }
                    if let Some(slot) = st.feedback.get_mut(idx) {
                        *slot = Feedback::None;
                    }
                }
                st.flipped_indices.clear();
                st.lock_input = false;
            }
            Effect::MatchPulse(indices) => {
                for idx in indices {
                    if let Some(slot) = st.feedback.get_mut(idx) {
                        *slot = Feedback::Good;
                    }
                }
            }
            Effect::FeedbackClear(indices) => {
                for idx in indices {
                    if let Some(slot) = st.feedback.get_mut(idx) {
                        *slot = Feedback::None;
                    }
                }
            }
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.state.cards
    }

    pub fn flipped(&self) -> &[usize] {
        &self.state.flipped_indices
    }

    pub fn difficulty(&self) -> Difficulty {
        self.state.difficulty
    }

    pub fn moves(&self) -> u32 {
        self.state.moves
    }

    pub fn matches(&self) -> u32 {
        self.state.matches
    }

    pub fn matched_count(&self) -> usize {
        self.state.matched_count()
    }

    pub fn is_locked(&self) -> bool {
        self.state.lock_input
    }

    pub fn is_victory(&self) -> bool {
        self.state.victory
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        self.state.clock.elapsed(now)
    }

    pub fn best_time(&self, difficulty: Difficulty) -> Option<Duration> {
        self.records.get(difficulty)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn chill_engine() -> Engine {
        let mut rng = StdRng::seed_from_u64(3);
        Engine::new(Difficulty::Chill, &mut rng).expect("static registry is valid")
    }

    fn find_match(engine: &Engine) -> (usize, usize) {
        let cards = engine.cards();
        for (i, card) in cards.iter().enumerate() {
            if card.status != CardStatus::Hidden {
                continue;
            }
            for (j, other) in cards.iter().enumerate().skip(i + 1) {
                if other.status == CardStatus::Hidden && other.symbol == card.symbol {
                    return (i, j);
                }
            }
        }
        panic!("no hidden pair left");
    }

    fn find_mismatch(engine: &Engine) -> (usize, usize) {
        let cards = engine.cards();
        for (i, card) in cards.iter().enumerate() {
            if card.status != CardStatus::Hidden {
                continue;
            }
            for (j, other) in cards.iter().enumerate().skip(i + 1) {
                if other.status == CardStatus::Hidden && other.symbol != card.symbol {
                    return (i, j);
                }
            }
        }
        panic!("no mismatching cards left");
    }

    #[test]
    fn match_resolves_immediately_without_lock() {
        let mut engine = chill_engine();
        let t0 = Instant::now();
        let (first, second) = find_match(&engine);

        engine.reveal(first, t0);
        assert_eq!(engine.moves(), 0);
        engine.reveal(second, t0 + ms(300));

        assert_eq!(engine.moves(), 1);
        assert_eq!(engine.matches(), 1);
        assert!(!engine.is_locked());
        assert!(engine.flipped().is_empty());
        assert_eq!(engine.cards()[first].status, CardStatus::Matched);
        assert_eq!(engine.cards()[second].status, CardStatus::Matched);
    }

    #[test]
    fn mismatch_locks_for_the_full_window() {
        let mut engine = chill_engine();
        let t0 = Instant::now();
        let (first, second) = find_mismatch(&engine);

        engine.reveal(first, t0);
        engine.reveal(second, t0);
        assert_eq!(engine.moves(), 1);
        assert!(engine.is_locked());

        // The cosmetic pulse must not unlock input early.
        engine.tick(t0 + ms(MISMATCH_HOLD_MS + 1));
        assert!(engine.is_locked());
        assert_eq!(engine.state.feedback[first], Feedback::Bad);
        assert_eq!(engine.state.feedback[second], Feedback::Bad);

        let (third, _) = find_match(&engine);
        engine.reveal(third, t0 + ms(700));
        assert_eq!(engine.cards()[third].status, CardStatus::Hidden);
        assert_eq!(engine.moves(), 1);

        engine.tick(t0 + ms(MISMATCH_HOLD_MS + MISMATCH_CLEAR_MS));
        assert!(!engine.is_locked());
        assert_eq!(engine.cards()[first].status, CardStatus::Hidden);
        assert_eq!(engine.cards()[second].status, CardStatus::Hidden);
        assert_eq!(engine.state.feedback[first], Feedback::None);
        assert!(engine.flipped().is_empty());

        // Both positions are independently revealable again.
        engine.reveal(first, t0 + ms(2_000));
        assert_eq!(engine.cards()[first].status, CardStatus::Flipped);
    }

    #[test]
    fn rejected_reveals_do_not_count() {
        let mut engine = chill_engine();
        let t0 = Instant::now();
        let (first, second) = find_match(&engine);

        engine.reveal(first, t0);
        engine.reveal(first, t0); // already buffered
        assert_eq!(engine.flipped().len(), 1);
        assert_eq!(engine.moves(), 0);

        engine.reveal(engine.cards().len() + 5, t0); // out of range
        assert_eq!(engine.flipped().len(), 1);

        engine.reveal(second, t0);
        engine.reveal(first, t0); // already matched
        assert_eq!(engine.cards()[first].status, CardStatus::Matched);
        assert_eq!(engine.moves(), 1);
    }

    #[test]
    fn good_pulse_fires_and_clears_on_schedule() {
        let mut engine = chill_engine();
        let t0 = Instant::now();
        let (first, second) = find_match(&engine);

        engine.reveal(first, t0);
        engine.reveal(second, t0);
        assert_eq!(engine.state.feedback[first], Feedback::None);

        engine.tick(t0 + ms(MATCH_PULSE_DELAY_MS));
        assert_eq!(engine.state.feedback[first], Feedback::Good);
        assert_eq!(engine.state.feedback[second], Feedback::Good);

        engine.tick(t0 + ms(MATCH_PULSE_DELAY_MS + MATCH_PULSE_MS));
        assert_eq!(engine.state.feedback[first], Feedback::None);
    }

    #[test]
    fn clock_starts_on_first_reveal_and_freezes_on_victory() {
        let mut engine = chill_engine();
        let t0 = Instant::now();

        engine.tick(t0 + ms(5_000));
        assert_eq!(engine.elapsed(t0 + ms(5_000)), Duration::ZERO);

        let mut now = t0 + ms(5_000);
        while !engine.is_victory() {
            let (first, second) = find_match(&engine);
            engine.reveal(first, now);
            now += ms(1_000);
            engine.reveal(second, now);
        }
        let final_elapsed = engine.elapsed(now);
        assert!(final_elapsed > Duration::ZERO);
        assert_eq!(engine.elapsed(now + ms(60_000)), final_elapsed);
        assert_eq!(engine.best_time(Difficulty::Chill), Some(final_elapsed));

        // Post-victory reveals are dead input.
        engine.reveal(0, now + ms(100));
        assert_eq!(engine.moves(), 6);
    }

    #[test]
    fn victory_tracks_matched_count_exactly() {
        let mut engine = chill_engine();
        let mut now = Instant::now();
        for turn in 0..6 {
            assert!(!engine.is_victory());
            let (first, second) = find_match(&engine);
            engine.reveal(first, now);
            engine.reveal(second, now);
            assert_eq!(engine.matched_count(), (turn + 1) * 2);
            assert_eq!(engine.matched_count() % 2, 0);
            now += ms(500);
        }
        assert!(engine.is_victory());
        assert_eq!(engine.matched_count(), engine.cards().len());
    }

    #[test]
    fn reset_cancels_stale_mismatch_effects() {
        let mut engine = chill_engine();
        let t0 = Instant::now();
        let (first, second) = find_mismatch(&engine);
        engine.reveal(first, t0);
        engine.reveal(second, t0);
        assert!(engine.is_locked());

        let mut rng = StdRng::seed_from_u64(9);
        engine.reset(Difficulty::Chill, &mut rng, t0 + ms(100));
        assert!(!engine.is_locked());
        assert_eq!(engine.moves(), 0);

        // Start a turn in the new session, then let the old session's
        // flip-back deadline pass. It must not touch the new deck.
        engine.reveal(first, t0 + ms(200));
        engine.tick(t0 + ms(MISMATCH_HOLD_MS + MISMATCH_CLEAR_MS + 500));
        assert_eq!(engine.cards()[first].status, CardStatus::Flipped);
        assert_eq!(engine.flipped(), &[first]);
        assert!(!engine.is_locked());
    }

    #[test]
    fn reset_to_new_difficulty_keeps_best_times() {
        let mut engine = chill_engine();
        let mut now = Instant::now();
        while !engine.is_victory() {
            let (first, second) = find_match(&engine);
            engine.reveal(first, now);
            engine.reveal(second, now);
            now += ms(400);
        }
        let chill_best = engine.best_time(Difficulty::Chill);
        assert!(chill_best.is_some());

        let mut rng = StdRng::seed_from_u64(21);
        engine.reset(Difficulty::Brisk, &mut rng, now);
        assert_eq!(engine.difficulty(), Difficulty::Brisk);
        assert_eq!(engine.cards().len(), Difficulty::Brisk.card_count());
        assert_eq!(engine.moves(), 0);
        assert_eq!(engine.matches(), 0);
        assert!(!engine.is_victory());
        assert_eq!(engine.elapsed(now), Duration::ZERO);
        assert_eq!(engine.best_time(Difficulty::Chill), chill_best);
        assert_eq!(engine.best_time(Difficulty::Brisk), None);
    }

    #[test]
    fn reset_with_same_difficulty_reshuffles() {
        let mut engine = chill_engine();
        let before: Vec<&str> = engine.cards().iter().map(|card| card.symbol).collect();
        let mut rng = StdRng::seed_from_u64(77);
        engine.reset(Difficulty::Chill, &mut rng, Instant::now());
        let after: Vec<&str> = engine.cards().iter().map(|card| card.symbol).collect();
        assert_eq!(after.len(), before.len());
        assert_ne!(before, after);
    }
}
