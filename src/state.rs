use rand::Rng;
use serde::Serialize;

use crate::clock::Clock;
use crate::deck::build_deck;
use crate::error::ConfigError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardStatus {
    Hidden,
    Flipped,
    Matched,
}

/// Transient per-position marker pulsed alongside a resolution, cleared
/// on a schedule. Purely cosmetic; never consulted by the protocol.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Feedback {
    #[default]
    None,
    Good,
    Bad,
}

#[derive(Clone, Debug)]
pub struct Card {
    pub symbol: &'static str,
    pub status: CardStatus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    #[default]
    Chill,
    Brisk,
    Intense,
}

#[derive(Clone, Copy, Debug)]
pub struct DifficultyConfig {
    pub pairs: usize,
    pub columns: usize,
    pub pool: &'static [&'static str],
}

pub(crate) static SYMBOLS: [&str; 30] = [
    // Animals
    "🐶", "🐱", "🦊", "🐼", "🐸", "🦉", "🐙", "🦀", "🐬", "🦋",
    // Fruits
    "🍎", "🍋", "🍉", "🍇", "🍓", "🍍", "🥝", "🍒",
    // Activities
    "⚽", "🏀", "🎲", "🎧", "🎨", "🚀",
    // Sky and sea
    "🌙", "⭐", "🌈", "🔥", "⛵", "🎈",
];

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Chill, Difficulty::Brisk, Difficulty::Intense];

    pub fn config(self) -> DifficultyConfig {
        match self {
            Difficulty::Chill => DifficultyConfig {
                pairs: 6,
                columns: 4,
                pool: &SYMBOLS[..16],
            },
            Difficulty::Brisk => DifficultyConfig {
                pairs: 10,
                columns: 5,
                pool: &SYMBOLS[..24],
            },
            Difficulty::Intense => DifficultyConfig {
                pairs: 15,
                columns: 6,
                pool: &SYMBOLS,
            },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Chill => "Chill",
            Difficulty::Brisk => "Brisk",
            Difficulty::Intense => "Intense",
        }
    }

    pub fn from_name(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "chill" => Some(Difficulty::Chill),
            "brisk" => Some(Difficulty::Brisk),
            "intense" => Some(Difficulty::Intense),
            _ => None,
        }
    }

    pub fn card_count(self) -> usize {
        self.config().pairs * 2
    }

    pub fn rows(self) -> usize {
        let config = self.config();
        (config.pairs * 2).div_ceil(config.columns)
    }
}

/// Checked once when an engine is constructed; entries are static, so a
/// failure here is a programming error in the table above.
pub(crate) fn validate_registry() -> Result<(), ConfigError> {
    for difficulty in Difficulty::ALL {
        let config = difficulty.config();
        if config.pairs > config.pool.len() {
            return Err(ConfigError::PoolTooSmall {
                difficulty: difficulty.name(),
                pairs: config.pairs,
                pool: config.pool.len(),
            });
        }
    }
    Ok(())
}

/// One live puzzle session. Owns nothing shared; independent sessions
/// are independent values.
#[derive(Clone, Debug)]
pub struct GameState {
    pub difficulty: Difficulty,
    pub cards: Vec<Card>,
    pub flipped_indices: Vec<usize>,
    pub feedback: Vec<Feedback>,
    pub moves: u32,
    pub matches: u32,
    pub lock_input: bool,
    pub victory: bool,
    pub game_id: u64,
    pub clock: Clock,
}

impl GameState {
    pub(crate) fn new(difficulty: Difficulty, rng: &mut impl Rng) -> Self {
        let cards = build_deck(&difficulty.config(), rng);
        let feedback = vec![Feedback::None; cards.len()];
        GameState {
            difficulty,
            cards,
            flipped_indices: Vec::new(),
            feedback,
            moves: 0,
            matches: 0,
            lock_input: false,
            victory: false,
            game_id: 0,
            clock: Clock::default(),
        }
    }

    pub fn matched_count(&self) -> usize {
        self.cards
            .iter()
            .filter(|card| card.status == CardStatus::Matched)
            .count()
    }

    pub(crate) fn all_matched(&self) -> bool {
        self.cards
            .iter()
            .all(|card| card.status == CardStatus::Matched)
    }
}
