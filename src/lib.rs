//! Headless engine for a timed memory-matching puzzle: paired symbols
//! laid face-down, two reveals per turn, matches stay up, mismatches
//! flip back after a delay, best completion time kept per difficulty.
//!
//! The crate owns the state machine only. Rendering consumes the
//! [`CardView`]/[`SessionSummary`] projection; it is never read back.
//! All waiting is modeled as deadlines drained by [`Engine::tick`], and
//! every method that touches time takes an explicit `Instant`, so the
//! whole engine runs on virtual time under test.

mod clock;
mod deck;
mod engine;
mod error;
mod records;
mod solver;
mod state;
mod view;

pub use clock::Clock;
pub use engine::{
    CLOCK_TICK_MS, Engine, MATCH_PULSE_DELAY_MS, MATCH_PULSE_MS, MISMATCH_CLEAR_MS,
    MISMATCH_HOLD_MS,
};
pub use error::ConfigError;
pub use records::BestTimes;
pub use solver::{MATCH_PACING_MS, REVEAL_STEP_MS, SolveError, SolveReport, run_to_completion};
pub use state::{Card, CardStatus, Difficulty, DifficultyConfig, Feedback};
pub use view::{CardView, Face, SessionSummary, clock_label, padded_digits};
