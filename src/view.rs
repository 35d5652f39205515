use std::time::Instant;

use serde::Serialize;

use crate::engine::Engine;
use crate::state::{CardStatus, Feedback};

/// What a rendering surface is told about one position. The core emits
/// these as data and never reads them back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Face {
    Hidden,
    Revealed,
    Matched,
}

impl From<CardStatus> for Face {
    fn from(status: CardStatus) -> Self {
        match status {
            CardStatus::Hidden => Face::Hidden,
            CardStatus::Flipped => Face::Revealed,
            CardStatus::Matched => Face::Matched,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct CardView {
    pub face: Face,
    pub feedback: Feedback,
}

/// Session fields a HUD or harness displays.
#[derive(Clone, Debug, Serialize)]
pub struct SessionSummary {
    pub difficulty: &'static str,
    pub elapsed_ms: u64,
    pub moves: u32,
    pub matches: u32,
    pub best_ms: Option<u64>,
    pub victory: bool,
}

impl Engine {
    pub fn board(&self) -> Vec<CardView> {
        self.state
            .cards
            .iter()
            .zip(&self.state.feedback)
            .map(|(card, &feedback)| CardView {
                face: Face::from(card.status),
                feedback,
            })
            .collect()
    }

    pub fn summary(&self, now: Instant) -> SessionSummary {
        let difficulty = self.state.difficulty;
        SessionSummary {
            difficulty: difficulty.name(),
            elapsed_ms: self.state.clock.elapsed(now).as_millis() as u64,
            moves: self.state.moves,
            matches: self.state.matches,
            best_ms: self
                .records
                .get(difficulty)
                .map(|best| best.as_millis() as u64),
            victory: self.state.victory,
        }
    }
}

/// "MM:SS" label for an elapsed duration. Negative input clamps to
/// zero; sub-second remainders floor.
pub fn clock_label(elapsed_ms: i64) -> String {
    let total_secs = (elapsed_ms.max(0) / 1000) as u64;
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

/// Zero-padded decimal rendering, at least `min_width` wide. Negative
/// input clamps to zero.
pub fn padded_digits(value: i64, min_width: usize) -> String {
    format!("{:0width$}", value.max(0), width = min_width)
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::state::Difficulty;

    #[test]
    fn clock_labels() {
        assert_eq!(clock_label(0), "00:00");
        assert_eq!(clock_label(999), "00:00");
        assert_eq!(clock_label(65_000), "01:05");
        assert_eq!(clock_label(3_599_999), "59:59");
        assert_eq!(clock_label(-250), "00:00");
    }

    #[test]
    fn padded_digit_labels() {
        assert_eq!(padded_digits(7, 3), "007");
        assert_eq!(padded_digits(1234, 2), "1234");
        assert_eq!(padded_digits(-9, 4), "0000");
    }

    #[test]
    fn fresh_board_projects_all_hidden() {
        let mut rng = StdRng::seed_from_u64(5);
        let engine = Engine::new(Difficulty::Chill, &mut rng).expect("static registry is valid");
        let board = engine.board();
        assert_eq!(board.len(), Difficulty::Chill.card_count());
        assert!(board.iter().all(|view| view.face == Face::Hidden));
        assert!(board.iter().all(|view| view.feedback == Feedback::None));
    }

    #[test]
    fn summary_serializes_display_fields() {
        let mut rng = StdRng::seed_from_u64(5);
        let engine = Engine::new(Difficulty::Brisk, &mut rng).expect("static registry is valid");
        let summary = engine.summary(Instant::now());
        assert_eq!(summary.difficulty, "Brisk");
        assert_eq!(summary.elapsed_ms, 0);
        assert_eq!(summary.best_ms, None);
        assert!(!summary.victory);

        let json = serde_json::to_string(&summary).expect("summary serializes");
        assert!(json.contains("\"difficulty\":\"Brisk\""));
        assert!(json.contains("\"victory\":false"));
    }
}
