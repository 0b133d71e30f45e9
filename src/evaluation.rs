//! Heuristic scoring of unfinished positions
//!
//! # Scoring
//! The estimate is the sum of two parts, both from player one's point of view:
//!
//! * completed runs score exactly as they would at the end of the game, `±length²` for
//!   every maximal run of three or more tokens
//! * every run with an open end scores the square of the longest run it could grow into by
//!   filling one open cell, provided that is at least three tokens long. A single open cell
//!   between two runs of the same player joins them, and the pair is credited once to the
//!   run on the left
//!
//! Potential is discounted against completed runs, less so for the player about to move
//! since they get the first chance to fill an open cell.
//!
//! Evaluation visits every cell a constant number of times, and on a full board it equals
//! the terminal utility.

use crate::board::{GameState, Player};
use crate::runs::{find_runs, Run, MIN_SCORING_RUN};

/// Weight of completed runs
pub const COMPLETED_WEIGHT: f64 = 1.0;
/// Weight of open-run potential belonging to the player about to move
pub const MOVER_POTENTIAL_WEIGHT: f64 = 0.75;
/// Weight of open-run potential belonging to the player who just moved
pub const WAITING_POTENTIAL_WEIGHT: f64 = 0.5;

/// The two parts of a heuristic estimate
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Evaluation {
    pub completed: i32,
    pub potential: f64,
}

impl Evaluation {
    pub fn total(&self) -> f64 {
        COMPLETED_WEIGHT * f64::from(self.completed) + self.potential
    }
}

/// Estimates the utility of `state`
pub fn evaluate(state: &GameState) -> f64 {
    evaluate_breakdown(state).total()
}

pub fn evaluate_breakdown(state: &GameState) -> Evaluation {
    let landing_rows = state.landing_rows();
    let mover = state.next_player();

    let mut evaluation = Evaluation::default();
    for line in state.lines() {
        let positions = line.positions();
        // an empty cell can still be filled if nothing above it in its column is occupied
        let runs = find_runs(line.cells(), |index| {
            let (row, col) = positions[index];
            landing_rows[col].map_or(false, |landing| row <= landing)
        });
        evaluation.completed += runs.iter().map(Run::score).sum::<i32>();
        evaluation.potential += potential_score(&runs, mover);
    }
    evaluation
}

/// Weighted potential of the runs found in a single line
pub fn potential_score(runs: &[Run], mover: Player) -> f64 {
    let mut score = 0.0;
    for (i, run) in runs.iter().enumerate() {
        let mut extension = 0;

        if run.right_open {
            let bridged = runs
                .get(i + 1)
                .filter(|next| next.player == run.player && next.start == run.end() + 1)
                .map_or(0, |next| next.length);
            extension = extension.max(run.length + 1 + bridged);
        }

        if run.left_open {
            let joined_from_left = i > 0
                && runs[i - 1].player == run.player
                && runs[i - 1].end() + 1 == run.start;
            if !joined_from_left {
                extension = extension.max(run.length + 1);
            }
        }

        if extension >= MIN_SCORING_RUN {
            let weight = if run.player == mover {
                MOVER_POTENTIAL_WEIGHT
            } else {
                WAITING_POTENTIAL_WEIGHT
            };
            score += weight * f64::from(run.player.sign()) * (extension * extension) as f64;
        }
    }
    score
}
