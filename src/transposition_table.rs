use rustc_hash::FxHashMap;

use crate::board::GameState;

// past this many positions the table starts over rather than growing without bound
const TABLE_MAX_SIZE: usize = 1 << 22;

/// Exact minimax values of positions that have already been searched
///
/// Only exact values are stored, so a search that consults the table returns the same
/// result as one that does not.
#[derive(Clone, Default)]
pub struct TranspositionTable {
    entries: FxHashMap<GameState, i32>,
}

impl TranspositionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, state: GameState, value: i32) {
        if self.entries.len() >= TABLE_MAX_SIZE {
            self.entries.clear();
        }
        self.entries.insert(state, value);
    }

    pub fn get(&self, state: &GameState) -> Option<i32> {
        self.entries.get(state).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
