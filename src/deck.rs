use rand::Rng;
use rand::seq::SliceRandom;

use crate::state::{Card, CardStatus, DifficultyConfig};

/// Builds a freshly shuffled, fully paired deck: shuffle the pool, keep
/// the first `pairs` symbols, duplicate each once, shuffle the result.
/// Every symbol in the deck therefore occurs exactly twice, which is
/// what makes match evaluation by plain symbol equality safe.
pub(crate) fn build_deck(config: &DifficultyConfig, rng: &mut impl Rng) -> Vec<Card> {
    assert!(
        config.pairs <= config.pool.len(),
        "difficulty pool holds {} symbols but {} pairs were requested",
        config.pool.len(),
        config.pairs
    );

    let mut pool: Vec<&'static str> = config.pool.to_vec();
    pool.shuffle(rng);

    let mut values: Vec<&'static str> = Vec::with_capacity(config.pairs * 2);
    for &symbol in pool.iter().take(config.pairs) {
        values.push(symbol);
        values.push(symbol);
    }
    values.shuffle(rng);

    values
        .into_iter()
        .map(|symbol| Card {
            symbol,
            status: CardStatus::Hidden,
        })
        .collect()
}
