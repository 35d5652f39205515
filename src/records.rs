use std::collections::HashMap;
use std::time::Duration;

use crate::state::Difficulty;

/// Best completion time per difficulty. Entries are set or improved,
/// never removed, and live for the process lifetime only.
#[derive(Clone, Debug, Default)]
pub struct BestTimes {
    best: HashMap<Difficulty, Duration>,
}

impl BestTimes {
    /// Records a completion. Returns true when it set a first best or
    /// beat the stored one strictly.
    pub fn register(&mut self, difficulty: Difficulty, elapsed: Duration) -> bool {
        match self.best.get(&difficulty) {
            Some(&best) if best <= elapsed => false,
            _ => {
                self.best.insert(difficulty, elapsed);
                true
            }
        }
    }

    pub fn get(&self, difficulty: Difficulty) -> Option<Duration> {
        self.best.get(&difficulty).copied()
    }
}
