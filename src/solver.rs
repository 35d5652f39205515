//! Synthetic driver that plays a session to completion through the
//! public protocol, used for scripted demonstration and end-to-end
//! tests. It is an ordinary caller of [`Engine::reveal`], never a
//! bypass, so exercising it exercises the real contract.

use std::time::{Duration, Instant};

use thiserror::Error;

use crate::engine::{Engine, MISMATCH_CLEAR_MS, MISMATCH_HOLD_MS};
use crate::state::{Card, CardStatus};

/// Pause between the two reveals of a turn.
pub const REVEAL_STEP_MS: u64 = 120;
/// Pacing after a resolved pair before the next turn begins (the match
/// settle plus a beat, 650 + 300).
pub const MATCH_PACING_MS: u64 = 950;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SolveError {
    /// No revealable pair though the board is not cleared; signals a
    /// structural inconsistency upstream, not a crash.
    #[error("no revealable pair among {unmatched} unmatched cards")]
    Exhausted { unmatched: usize },
    #[error("turn limit {0} reached before the board cleared")]
    TurnLimit(u32),
}

#[derive(Clone, Copy, Debug)]
pub struct SolveReport {
    pub turns: u32,
    pub elapsed: Duration,
}

/// First two hidden positions sharing a symbol, scanning left to right.
fn next_pair(cards: &[Card]) -> Option<(usize, usize)> {
    for (i, card) in cards.iter().enumerate() {
        if card.status != CardStatus::Hidden {
            continue;
        }
        for (j, other) in cards.iter().enumerate().skip(i + 1) {
            if other.status == CardStatus::Hidden && other.symbol == card.symbol {
                return Some((i, j));
            }
        }
    }
    None
}

/// Drives the engine until victory, a turn budget, or exhaustion.
///
/// `advance` is the time source: it receives how long the solver wants
/// to wait and returns the instant after waiting. The demo binary
/// sleeps for real; tests add to a virtual instant. A zero wait just
/// asks for the current time.
pub fn run_to_completion(
    engine: &mut Engine,
    max_turns: u32,
    mut advance: impl FnMut(Duration) -> Instant,
) -> Result<SolveReport, SolveError> {
    let mut turns = 0u32;
    loop {
        let mut now = advance(Duration::ZERO);
        engine.tick(now);

        if engine.is_victory() {
            let report = SolveReport {
                turns,
                elapsed: engine.elapsed(now),
            };
            tracing::info!(turns = report.turns, "solver cleared the board");
            return Ok(report);
        }

        if engine.is_locked() {
            // Sit out a full mismatch window, then re-check.
            now = advance(Duration::from_millis(MISMATCH_HOLD_MS + MISMATCH_CLEAR_MS));
            engine.tick(now);
            continue;
        }

        if turns >= max_turns {
            return Err(SolveError::TurnLimit(max_turns));
        }

        let Some((first, second)) = next_pair(engine.cards()) else {
            let unmatched = engine
                .cards()
                .iter()
                .filter(|card| card.status != CardStatus::Matched)
                .count();
            tracing::warn!(unmatched, "solver found no revealable pair");
            return Err(SolveError::Exhausted { unmatched });
        };

        engine.reveal(first, now);
        now = advance(Duration::from_millis(REVEAL_STEP_MS));
        engine.tick(now);
        engine.reveal(second, now);
        turns = turns.saturating_add(1);

        now = advance(Duration::from_millis(MATCH_PACING_MS));
        engine.tick(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(symbol: &'static str, status: CardStatus) -> Card {
        Card { symbol, status }
    }

    #[test]
    fn pair_scan_is_left_to_right() {
        let cards = vec![
            card("🐶", CardStatus::Matched),
            card("🍋", CardStatus::Hidden),
            card("🐶", CardStatus::Matched),
            card("⚽", CardStatus::Hidden),
            card("🍋", CardStatus::Hidden),
            card("⚽", CardStatus::Hidden),
        ];
        assert_eq!(next_pair(&cards), Some((1, 4)));
    }

    #[test]
    fn pair_scan_ignores_unpaired_leftovers() {
        let cards = vec![
            card("🐶", CardStatus::Hidden),
            card("🍋", CardStatus::Matched),
            card("🐶", CardStatus::Flipped),
        ];
        assert_eq!(next_pair(&cards), None);
    }
}
