//! The Connect-383 board: cells, lines and move generation

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{GameError, Result};
use crate::runs;

// every `GameState` ever constructed, across all threads
static STATE_COUNT: AtomicUsize = AtomicUsize::new(0);

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Player {
    One,
    Two,
}

impl Player {
    /// `+1` for player one, `-1` for player two
    pub fn sign(self) -> i32 {
        match self {
            Player::One => 1,
            Player::Two => -1,
        }
    }

    pub fn other(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Cell {
    Empty,
    Blocked,
    Token(Player),
}

impl Cell {
    pub fn is_empty(self) -> bool {
        match self {
            Cell::Empty => true,
            _ => false,
        }
    }

    pub fn player(self) -> Option<Player> {
        match self {
            Cell::Token(player) => Some(player),
            _ => None,
        }
    }

    pub fn sign(self) -> i32 {
        self.player().map_or(0, Player::sign)
    }

    fn from_char(c: char) -> Option<Self> {
        match c {
            '.' => Some(Cell::Empty),
            '#' => Some(Cell::Blocked),
            'X' | 'x' => Some(Cell::Token(Player::One)),
            'O' | 'o' => Some(Cell::Token(Player::Two)),
            _ => None,
        }
    }

    fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Blocked => '#',
            Cell::Token(Player::One) => 'X',
            Cell::Token(Player::Two) => 'O',
        }
    }
}

/// A read-only run of cells along one row, column or diagonal
///
/// Each cell is paired with its `(row, column)` position on the board it was taken from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Line {
    cells: Vec<Cell>,
    positions: Vec<(usize, usize)>,
}

impl Line {
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn positions(&self) -> &[(usize, usize)] {
        &self.positions
    }
}

impl std::ops::Deref for Line {
    type Target = [Cell];

    fn deref(&self) -> &Self::Target {
        &self.cells
    }
}

/// One Connect-383 position
///
/// # Notes
/// Cells are stored row-major with row 0 at the top of the board. A token dropped into a
/// column comes to rest on the topmost occupied or blocked cell of that column (or on the
/// floor), so a column is full as soon as its top cell is not empty.
///
/// States are never mutated once built: [`GameState::play`] returns a new state.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GameState {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl GameState {
    /// Creates an empty board
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        Self::with_blocks(rows, cols, &[])
    }

    /// Creates an empty board with the given `(row, column)` cells blocked
    pub fn with_blocks(rows: usize, cols: usize, blocks: &[(usize, usize)]) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(GameError::Configuration(format!(
                "board dimensions must be positive, got {}x{}",
                rows, cols
            )));
        }
        let mut cells = vec![Cell::Empty; rows * cols];
        for &(row, col) in blocks {
            if row >= rows || col >= cols {
                return Err(GameError::Configuration(format!(
                    "blocked cell ({}, {}) is outside the {}x{} board",
                    row, col, rows, cols
                )));
            }
            cells[row * cols + col] = Cell::Blocked;
        }
        Ok(Self::from_cells(rows, cols, cells))
    }

    /// Plays a sequence of zero-indexed columns from the empty board
    pub fn from_moves(rows: usize, cols: usize, moves: &[usize]) -> Result<Self> {
        let mut state = Self::new(rows, cols)?;
        for &column in moves {
            state = state.play(column)?;
        }
        Ok(state)
    }

    /// Parses a board from text rows, top row first
    ///
    /// `.` is empty, `X` is player one, `O` is player two and `#` is blocked. The rows are
    /// taken as given: no check is made that the position is reachable by legal play.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self> {
        let mut cells = Vec::new();
        let mut cols = None;
        for (index, row) in rows.iter().enumerate() {
            let row = row.as_ref().trim();
            let mut width = 0;
            for c in row.chars() {
                let cell = Cell::from_char(c).ok_or_else(|| {
                    GameError::Configuration(format!(
                        "could not parse '{}' in row {} as a cell",
                        c, index
                    ))
                })?;
                cells.push(cell);
                width += 1;
            }
            match cols {
                None => cols = Some(width),
                Some(cols) if cols != width => {
                    return Err(GameError::Configuration(format!(
                        "row {} has {} cells, expected {}",
                        index, width, cols
                    )))
                }
                _ => {}
            }
        }
        match cols {
            Some(cols) if cols > 0 => Ok(Self::from_cells(rows.len(), cols, cells)),
            _ => Err(GameError::Configuration("board has no cells".to_string())),
        }
    }

    fn from_cells(rows: usize, cols: usize, cells: Vec<Cell>) -> Self {
        STATE_COUNT.fetch_add(1, Ordering::Relaxed);
        Self { rows, cols, cells }
    }

    /// The number of states constructed since the process started (for diagnostics only)
    pub fn state_count() -> usize {
        STATE_COUNT.load(Ordering::Relaxed)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.cells[row * self.cols + col]
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Player one moves whenever both players have placed the same number of tokens
    pub fn next_player(&self) -> Player {
        let (mut one, mut two) = (0usize, 0usize);
        for cell in &self.cells {
            match cell {
                Cell::Token(Player::One) => one += 1,
                Cell::Token(Player::Two) => two += 1,
                _ => {}
            }
        }
        if one > two {
            Player::Two
        } else {
            Player::One
        }
    }

    /// The row a token dropped into `column` would land in, or `None` if the column is full
    pub fn landing_row(&self, column: usize) -> Option<usize> {
        let mut landing = None;
        for row in 0..self.rows {
            if !self.cell(row, column).is_empty() {
                break;
            }
            landing = Some(row);
        }
        landing
    }

    /// Landing rows of every column, left to right
    pub fn landing_rows(&self) -> Vec<Option<usize>> {
        (0..self.cols).map(|column| self.landing_row(column)).collect()
    }

    pub fn playable(&self, column: usize) -> bool {
        column < self.cols && self.cell(0, column).is_empty()
    }

    /// A board is full, and the game over, once no column admits a move
    pub fn is_full(&self) -> bool {
        (0..self.cols).all(|column| !self.playable(column))
    }

    pub fn is_terminal(&self) -> bool {
        self.is_full()
    }

    /// Drops a token for the player to move into `column`
    pub fn play(&self, column: usize) -> Result<Self> {
        if column >= self.cols {
            return Err(GameError::column_out_of_range(column, self.cols));
        }
        let row = self
            .landing_row(column)
            .ok_or_else(|| GameError::column_full(column))?;
        Ok(self.place(row, column))
    }

    fn place(&self, row: usize, column: usize) -> Self {
        let mut cells = self.cells.clone();
        cells[row * self.cols + column] = Cell::Token(self.next_player());
        Self::from_cells(self.rows, self.cols, cells)
    }

    /// Lazily yields `(column, child)` for every playable column in ascending order
    ///
    /// A child is only constructed when the iterator reaches it.
    pub fn successor_iter(&self) -> impl Iterator<Item = (usize, GameState)> + '_ {
        (0..self.cols).filter_map(move |column| {
            self.landing_row(column)
                .map(|row| (column, self.place(row, column)))
        })
    }

    pub fn successors(&self) -> Vec<(usize, GameState)> {
        self.successor_iter().collect()
    }

    /// Terminal score from player one's point of view
    ///
    /// Every maximal run of three or more tokens in a row, column or diagonal scores the
    /// square of its length, positive for player one and negative for player two.
    pub fn utility(&self) -> Result<i32> {
        if !self.is_full() {
            return Err(GameError::IllegalState(
                "utility requested for a board that is not full".to_string(),
            ));
        }
        Ok(self
            .lines()
            .iter()
            .map(|line| runs::completed_score(line.cells()))
            .sum())
    }

    fn line<I: IntoIterator<Item = (usize, usize)>>(&self, positions: I) -> Line {
        let positions: Vec<(usize, usize)> = positions.into_iter().collect();
        let cells = positions
            .iter()
            .map(|&(row, col)| self.cell(row, col))
            .collect();
        Line { cells, positions }
    }

    /// Rows from top to bottom, each read left to right
    pub fn get_rows(&self) -> Vec<Line> {
        let cols = self.cols;
        (0..self.rows)
            .map(|row| self.line((0..cols).map(move |col| (row, col))))
            .collect()
    }

    /// Columns from left to right, each read top to bottom
    pub fn get_cols(&self) -> Vec<Line> {
        let rows = self.rows;
        (0..self.cols)
            .map(|col| self.line((0..rows).map(move |row| (row, col))))
            .collect()
    }

    /// All diagonals, each read top to bottom
    ///
    /// The first half holds the `\` diagonals from the bottom-left corner to the top-right
    /// corner, the second half the `/` diagonals from the top-left corner to the
    /// bottom-right corner. Both halves contain `rows + cols - 1` lines.
    pub fn get_diags(&self) -> Vec<Line> {
        let (rows, cols) = (self.rows, self.cols);
        let count = rows + cols - 1;
        let mut diags = Vec::with_capacity(2 * count);

        for offset in 0..count {
            let (start_row, start_col) = if offset < rows {
                (rows - 1 - offset, 0)
            } else {
                (0, offset + 1 - rows)
            };
            let length = (rows - start_row).min(cols - start_col);
            diags.push(self.line((0..length).map(|i| (start_row + i, start_col + i))));
        }

        for sum in 0..count {
            diags.push(self.line(
                (0..rows)
                    .filter(|&row| row <= sum && sum - row < cols)
                    .map(|row| (row, sum - row)),
            ));
        }

        diags
    }

    /// Every row, column and diagonal of the board
    pub fn lines(&self) -> Vec<Line> {
        let mut lines = self.get_rows();
        lines.extend(self.get_cols());
        lines.extend(self.get_diags());
        lines
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            let line: String = (0..self.cols)
                .map(|col| self.cell(row, col).to_char())
                .collect();
            writeln!(f, "{}", line)?;
        }
        let footer: String = (0..self.cols).map(|col| (col % 10).to_string()).collect();
        write!(f, "{}", footer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(lines: &[Line]) -> Vec<Vec<(usize, usize)>> {
        lines.iter().map(|line| line.positions().to_vec()).collect()
    }

    #[test]
    fn tokens_stack_from_the_floor() {
        let state = GameState::from_moves(3, 2, &[0, 0, 1]).unwrap();
        assert_eq!(state.cell(2, 0), Cell::Token(Player::One));
        assert_eq!(state.cell(1, 0), Cell::Token(Player::Two));
        assert_eq!(state.cell(2, 1), Cell::Token(Player::One));
        assert_eq!(state.next_player(), Player::Two);
        assert_eq!(state.landing_rows(), vec![Some(0), Some(1)]);
    }

    #[test]
    fn tokens_rest_on_blocks() {
        let state = GameState::with_blocks(3, 2, &[(1, 0), (0, 1)]).unwrap();
        assert_eq!(state.landing_row(0), Some(0));
        assert_eq!(state.landing_row(1), None);
        assert!(!state.playable(1));

        let next = state.play(0).unwrap();
        assert_eq!(next.cell(0, 0), Cell::Token(Player::One));
        assert_eq!(next.cell(2, 0), Cell::Empty);
        assert!(next.is_full());
    }

    #[test]
    fn play_rejects_full_and_missing_columns() {
        let state = GameState::from_moves(1, 2, &[0]).unwrap();
        assert_eq!(state.play(0), Err(GameError::column_full(0)));
        assert_eq!(state.play(2), Err(GameError::column_out_of_range(2, 2)));
    }

    #[test]
    fn successors_skip_full_columns() {
        let state = GameState::from_rows(&["X.#", "OXO"]).unwrap();
        let columns: Vec<usize> = state.successors().iter().map(|(c, _)| *c).collect();
        assert_eq!(columns, vec![1]);
    }

    #[test]
    fn successors_leave_parent_untouched() {
        let state = GameState::from_moves(2, 3, &[1]).unwrap();
        let before = state.clone();
        for (_column, child) in state.successors() {
            let changed: Vec<Cell> = state
                .cells()
                .iter()
                .zip(child.cells())
                .filter(|(parent, child)| parent != child)
                .map(|(_, child)| *child)
                .collect();
            assert_eq!(changed, vec![Cell::Token(Player::Two)]);
        }
        assert_eq!(state, before);
    }

    #[test]
    fn from_rows_rejects_bad_input() {
        assert!(matches!(
            GameState::from_rows(&["X.", "X"]),
            Err(GameError::Configuration(_))
        ));
        assert!(matches!(
            GameState::from_rows(&["X?"]),
            Err(GameError::Configuration(_))
        ));
        assert!(matches!(
            GameState::with_blocks(2, 2, &[(2, 0)]),
            Err(GameError::Configuration(_))
        ));
        assert!(matches!(
            GameState::new(0, 3),
            Err(GameError::Configuration(_))
        ));
    }

    #[test]
    fn rows_and_columns() {
        let state = GameState::from_rows(&["XO.", "#XO"]).unwrap();
        let rows = state.get_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[1].cells(),
            &[Cell::Blocked, Cell::Token(Player::One), Cell::Token(Player::Two)]
        );
        let cols = state.get_cols();
        assert_eq!(cols.len(), 3);
        assert_eq!(cols[0].cells(), &[Cell::Token(Player::One), Cell::Blocked]);
        assert_eq!(cols[2].len(), 2);
        assert!(cols[2][0].is_empty());
        assert_eq!(cols[2].positions(), &[(0, 2), (1, 2)]);
    }

    #[test]
    fn diagonal_order() {
        let state = GameState::new(2, 3).unwrap();
        let diags = state.get_diags();
        assert_eq!(diags.len(), 8);
        assert_eq!(
            positions(&diags[..4]),
            vec![
                vec![(1, 0)],
                vec![(0, 0), (1, 1)],
                vec![(0, 1), (1, 2)],
                vec![(0, 2)],
            ]
        );
        assert_eq!(
            positions(&diags[4..]),
            vec![
                vec![(0, 0)],
                vec![(0, 1), (1, 0)],
                vec![(0, 2), (1, 1)],
                vec![(1, 2)],
            ]
        );
    }

    #[test]
    fn utility_requires_full_board() {
        let state = GameState::new(2, 2).unwrap();
        assert!(matches!(state.utility(), Err(GameError::IllegalState(_))));
    }

    #[test]
    fn utility_counts_every_direction() {
        // column 0 and the `\` diagonal both hold three X tokens
        let state = GameState::from_rows(&["XOO", "XXO", "XOX"]).unwrap();
        assert_eq!(state.utility().unwrap(), 18);
    }

    #[test]
    fn display_round_trips() {
        let state = GameState::from_rows(&["#..", "XO."]).unwrap();
        assert_eq!(state.to_string(), "#..\nXO.\n012");
    }

    #[test]
    fn state_count_increases() {
        let before = GameState::state_count();
        let state = GameState::new(2, 2).unwrap();
        let _ = state.successors();
        assert!(GameState::state_count() >= before + 3);
    }
}
