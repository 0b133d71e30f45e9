//! Errors raised by the game model, the search engines and agent configuration

/// Errors that can occur while playing or searching a Connect-383 game
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("invalid move in column {column}: {reason}")]
    InvalidMove { column: usize, reason: String },

    #[error("illegal state: {0}")]
    IllegalState(String),

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl GameError {
    pub(crate) fn column_full(column: usize) -> Self {
        GameError::InvalidMove {
            column,
            reason: "column is full".to_string(),
        }
    }

    pub(crate) fn column_out_of_range(column: usize, cols: usize) -> Self {
        GameError::InvalidMove {
            column,
            reason: format!("columns must be between 0 and {}", cols.saturating_sub(1)),
        }
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
