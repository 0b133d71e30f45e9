//! Game setup and agent selection

use std::str::FromStr;

use crate::board::GameState;
use crate::error::{GameError, Result};
use crate::{DEFAULT_COLS, DEFAULT_ROWS};

/// The kinds of agent that can take part in a game
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AgentKind {
    Random,
    Human,
    Minimax,
    Prune,
    /// Depth-limited minimax with the given depth limit
    Lookahead(u32),
}

impl FromStr for AgentKind {
    type Err = GameError;

    /// Parses an agent tag: `random`, `human`, `mini`, `prune` or `look<depth>`
    fn from_str(tag: &str) -> Result<Self> {
        let tag = tag.trim();
        match tag {
            "random" => Ok(AgentKind::Random),
            "human" => Ok(AgentKind::Human),
            "mini" | "minimax" => Ok(AgentKind::Minimax),
            "prune" => Ok(AgentKind::Prune),
            _ if tag.starts_with("look") => tag["look".len()..]
                .parse::<u32>()
                .map(AgentKind::Lookahead)
                .map_err(|_| {
                    GameError::Configuration(format!(
                        "bad depth limit in agent tag: '{}'",
                        tag
                    ))
                }),
            _ => Err(GameError::Configuration(format!(
                "bad agent tag: '{}'",
                tag
            ))),
        }
    }
}

/// Parses a blocked cell written as `row,col`
pub fn parse_block(text: &str) -> Result<(usize, usize)> {
    let bad_block = || {
        GameError::Configuration(format!(
            "could not parse '{}' as a blocked cell, expected ROW,COL",
            text
        ))
    };
    let mut parts = text.split(',');
    let row = parts.next().ok_or_else(bad_block)?;
    let col = parts.next().ok_or_else(bad_block)?;
    if parts.next().is_some() {
        return Err(bad_block());
    }
    let row = row.trim().parse::<usize>().map_err(|_| bad_block())?;
    let col = col.trim().parse::<usize>().map_err(|_| bad_block())?;
    Ok((row, col))
}

/// The starting position of a game
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub rows: usize,
    pub cols: usize,
    pub blocks: Vec<(usize, usize)>,
    /// A full starting board, rows separated by `/`, which replaces the dimensions above
    pub board: Option<String>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            blocks: Vec::new(),
            board: None,
        }
    }
}

impl GameConfig {
    /// Builds and validates the starting position
    pub fn initial_state(&self) -> Result<GameState> {
        match &self.board {
            Some(board) => {
                if !self.blocks.is_empty() {
                    return Err(GameError::Configuration(
                        "blocked cells cannot be combined with a starting board, mark them with '#' instead"
                            .to_string(),
                    ));
                }
                let rows: Vec<&str> = board.split('/').collect();
                GameState::from_rows(&rows)
            }
            None => GameState::with_blocks(self.rows, self.cols, &self.blocks),
        }
    }
}
