//! Game tree search over Connect-383 positions

use log::trace;

use crate::board::{GameState, Player};
use crate::error::Result;
use crate::evaluation::evaluate;
use crate::transposition_table::TranspositionTable;

/// A game tree searcher
///
/// # Notes
/// All three searches share one recursion: a full board scores its utility, otherwise
/// player one takes the highest child value and player two the lowest. Children are always
/// generated in ascending column order, and only when the search reaches them.
///
/// * [`Search::minimax`] searches to the end of the game
/// * [`Search::minimax_depth_limited`] stops after a number of plies and estimates the
///   remaining positions with [`evaluate`]
/// * [`Search::minimax_ab`] returns the same value as `minimax` but stops examining a node's
///   children once the rest of them cannot change the result
#[derive(Clone, Default)]
pub struct Search {
    /// The number of states constructed by this `Search` so far (for diagnostics only)
    pub node_count: usize,
    transposition_table: Option<TranspositionTable>,
}

impl Search {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a `Search` that memoizes exact minimax values in the given table
    pub fn new_with_transposition_table(transposition_table: TranspositionTable) -> Self {
        Self {
            node_count: 0,
            transposition_table: Some(transposition_table),
        }
    }

    pub fn transposition_table(&self) -> Option<&TranspositionTable> {
        self.transposition_table.as_ref()
    }

    /// Exact minimax value of `state`
    pub fn minimax(&mut self, state: &GameState) -> Result<i32> {
        if state.is_full() {
            return state.utility();
        }
        if let Some(value) = self
            .transposition_table
            .as_ref()
            .and_then(|table| table.get(state))
        {
            return Ok(value);
        }

        let maximizing = state.next_player() == Player::One;
        let mut best = if maximizing { i32::MIN } else { i32::MAX };
        for (_column, child) in state.successor_iter() {
            self.node_count += 1;
            let value = self.minimax(&child)?;
            best = if maximizing {
                best.max(value)
            } else {
                best.min(value)
            };
        }

        if let Some(table) = self.transposition_table.as_mut() {
            table.set(state.clone(), best);
        }
        Ok(best)
    }

    /// Minimax value of `state` searched at most `depth` plies deep
    ///
    /// Positions at the depth limit are scored with [`evaluate`], and full boards with their
    /// exact utility. A depth of 0 evaluates `state` itself without generating any children.
    pub fn minimax_depth_limited(&mut self, state: &GameState, depth: u32) -> Result<f64> {
        if state.is_full() {
            return state.utility().map(f64::from);
        }
        if depth == 0 {
            return Ok(evaluate(state));
        }

        let maximizing = state.next_player() == Player::One;
        let mut best = if maximizing {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        for (_column, child) in state.successor_iter() {
            self.node_count += 1;
            let value = self.minimax_depth_limited(&child, depth - 1)?;
            best = if maximizing {
                best.max(value)
            } else {
                best.min(value)
            };
        }
        Ok(best)
    }

    /// Exact minimax value of `state` using alpha-beta pruning
    pub fn minimax_ab(&mut self, state: &GameState) -> Result<i32> {
        self.alpha_beta(state, i32::MIN, i32::MAX)
    }

    /// Performs alpha-beta search inside the window `[alpha, beta]`
    ///
    /// The result is exact whenever it falls strictly inside the window, which is always the
    /// case for the full window used by [`Search::minimax_ab`].
    fn alpha_beta(&mut self, state: &GameState, mut alpha: i32, mut beta: i32) -> Result<i32> {
        if state.is_full() {
            return state.utility();
        }

        let maximizing = state.next_player() == Player::One;
        let mut best = if maximizing { i32::MIN } else { i32::MAX };
        for (column, child) in state.successor_iter() {
            self.node_count += 1;
            let value = self.alpha_beta(&child, alpha, beta)?;
            if maximizing {
                best = best.max(value);
                alpha = alpha.max(best);
            } else {
                best = best.min(value);
                beta = beta.min(best);
            }
            // a perfect opponent will never let the game reach this node, so the
            // remaining columns need not be built
            if alpha >= beta {
                trace!(
                    "pruned after column {} (alpha {}, beta {})",
                    column,
                    alpha,
                    beta
                );
                break;
            }
        }
        Ok(best)
    }
}
