//! Search agents for the board game 'Connect-383'
//!
//! Connect-383 is played like Connect 4 on a board of any size, some of whose cells may be
//! blocked before the game starts. The game only ends when the board is full. Every row,
//! column or diagonal run of three or more tokens then scores the square of its length, for
//! player one if the tokens are theirs and against them otherwise.
//!
//! # Basic Usage
//!
//! ```
//! use connect383::{agent::{Agent, MinimaxPruneAgent}, board::{GameState, Player}};
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! let state = GameState::from_moves(3, 3, &[0, 1, 0, 1])?;
//! let mut agent = MinimaxPruneAgent::new();
//! let (column, next) = agent.get_move(&state)?;
//!
//! assert!(state.playable(column));
//! assert_eq!(next.next_player(), Player::Two);
//!# Ok(())
//!# }
//! ```

pub mod error;

pub mod board;

pub mod runs;

pub mod evaluation;

pub mod transposition_table;

pub mod search;

pub mod config;

pub mod agent;

mod test;

pub use board::{Cell, GameState, Player};
pub use error::{GameError, Result};

/// The default number of rows on the game board
pub const DEFAULT_ROWS: usize = 6;

/// The default number of columns on the game board
pub const DEFAULT_COLS: usize = 7;
