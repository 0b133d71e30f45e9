//! Maximal run detection shared by terminal scoring and the heuristic evaluator

use crate::board::{Cell, Player};

/// Shortest run that scores anything
pub const MIN_SCORING_RUN: usize = 3;

/// A maximal sequence of one player's tokens within a line
///
/// An end is open when the cell just past it is empty and can still be reached by a
/// future drop.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Run {
    pub player: Player,
    pub start: usize,
    pub length: usize,
    pub left_open: bool,
    pub right_open: bool,
}

impl Run {
    /// Index one past the last token of the run
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    /// `sign * length²` for runs of at least [`MIN_SCORING_RUN`] tokens, otherwise 0
    pub fn score(&self) -> i32 {
        if self.length >= MIN_SCORING_RUN {
            self.player.sign() * (self.length * self.length) as i32
        } else {
            0
        }
    }
}

/// Finds every maximal run of tokens in `line`, in order
///
/// `is_fillable` is asked about empty cells only and decides whether a run ending next to
/// that cell counts as open.
pub fn find_runs<F>(line: &[Cell], is_fillable: F) -> Vec<Run>
where
    F: Fn(usize) -> bool,
{
    let open = |index: usize| line[index].is_empty() && is_fillable(index);

    let mut runs = Vec::new();
    let mut index = 0;
    while index < line.len() {
        let player = match line[index].player() {
            Some(player) => player,
            None => {
                index += 1;
                continue;
            }
        };
        let start = index;
        while index < line.len() && line[index] == Cell::Token(player) {
            index += 1;
        }
        runs.push(Run {
            player,
            start,
            length: index - start,
            left_open: start > 0 && open(start - 1),
            right_open: index < line.len() && open(index),
        });
    }
    runs
}

/// Score of the completed runs in one line
pub fn completed_score(line: &[Cell]) -> i32 {
    find_runs(line, |_| false).iter().map(Run::score).sum()
}
