//! Board state, move application, and terminal-condition checks.

use crate::{Mark, Position};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Square {
    /// No mark yet.
    Empty,
    /// Marked by a player; never cleared or reassigned during a game.
    Taken(Mark),
}

/// Error raised when a move cannot be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The cell at the position already holds a mark.
    #[display("cell {} is already taken", _0)]
    Occupied(Position),
}

impl std::error::Error for MoveError {}

/// The 3x3 grid. Mutated only through [`Board::apply`]; a taken cell
/// stays taken for the lifetime of the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    squares: [Square; 9],
}

/// The 8 winning lines in canonical order: rows, columns, diagonals.
/// Iteration order is a deterministic contract for [`Board::winner`].
const LINES: [[Position; 3]; 8] = [
    // Rows
    [Position::TopLeft, Position::TopCenter, Position::TopRight],
    [Position::MiddleLeft, Position::Center, Position::MiddleRight],
    [
        Position::BottomLeft,
        Position::BottomCenter,
        Position::BottomRight,
    ],
    // Columns
    [Position::TopLeft, Position::MiddleLeft, Position::BottomLeft],
    [
        Position::TopCenter,
        Position::Center,
        Position::BottomCenter,
    ],
    [
        Position::TopRight,
        Position::MiddleRight,
        Position::BottomRight,
    ],
    // Diagonals
    [Position::TopLeft, Position::Center, Position::BottomRight],
    [Position::TopRight, Position::Center, Position::BottomLeft],
];

impl Board {
    /// Number of cells.
    pub const SIZE: usize = 9;

    /// Creates an empty board.
    pub fn new() -> Self {
        Self {
            squares: [Square::Empty; 9],
        }
    }

    /// The square at the given position.
    pub fn get(&self, pos: Position) -> Square {
        self.squares[pos.to_index()]
    }

    /// True if the cell at the position holds no mark.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Square::Empty
    }

    /// True if every cell holds a mark.
    pub fn is_full(&self) -> bool {
        self.squares.iter().all(|s| *s != Square::Empty)
    }

    /// True iff at least one cell is empty.
    pub fn has_available_positions(&self) -> bool {
        self.squares.iter().any(|s| *s == Square::Empty)
    }

    /// All empty positions in ascending index order.
    pub fn available_positions(&self) -> Vec<Position> {
        Position::ALL
            .iter()
            .copied()
            .filter(|pos| self.is_empty(*pos))
            .collect()
    }

    /// The mark owning a complete line, if any.
    ///
    /// Lines are scanned rows first, then columns, then diagonals; the
    /// first fully-owned line decides. A finished game has at most one
    /// winning mark, so the order only matters for determinism.
    pub fn winner(&self) -> Option<Mark> {
        for [a, b, c] in LINES {
            if let Square::Taken(mark) = self.get(a) {
                if self.get(b) == Square::Taken(mark) && self.get(c) == Square::Taken(mark) {
                    return Some(mark);
                }
            }
        }
        None
    }

    /// Stamps `mark` at `pos`.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::Occupied`] and leaves the board unchanged if
    /// the cell already holds a mark. Double clicks and stale automated
    /// decisions land here and must stay side-effect free.
    #[instrument(skip(self))]
    pub fn apply(&mut self, pos: Position, mark: Mark) -> Result<(), MoveError> {
        if !self.is_empty(pos) {
            return Err(MoveError::Occupied(pos));
        }
        self.squares[pos.to_index()] = Square::Taken(mark);
        Ok(())
    }

    /// Formats the board as a three-line grid for logs and terminals.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let pos = Position::from_row_col(row, col).unwrap_or(Position::Center);
                match self.get(pos) {
                    Square::Empty => out.push('.'),
                    Square::Taken(mark) => out.push_str(&mark.to_string()),
                }
                if col < 2 {
                    out.push('|');
                }
            }
            if row < 2 {
                out.push('\n');
            }
        }
        out
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(moves: &[(usize, Mark)]) -> Board {
        let mut board = Board::new();
        for (index, mark) in moves {
            let pos = Position::from_index(*index).unwrap();
            board.apply(pos, *mark).unwrap();
        }
        board
    }

    #[test]
    fn empty_board_has_nine_available() {
        let board = Board::new();
        assert!(board.has_available_positions());
        assert_eq!(board.available_positions(), Position::ALL.to_vec());
        assert_eq!(board.winner(), None);
    }

    #[test]
    fn apply_occupied_cell_fails_without_state_change() {
        let mut board = Board::new();
        board.apply(Position::Center, Mark::X).unwrap();

        let before = board.clone();
        let result = board.apply(Position::Center, Mark::O);

        assert_eq!(result, Err(MoveError::Occupied(Position::Center)));
        assert_eq!(board, before);
        assert_eq!(board.get(Position::Center), Square::Taken(Mark::X));
    }

    #[test]
    fn available_positions_ascending_order() {
        let board = filled(&[(4, Mark::X), (0, Mark::O), (8, Mark::X)]);
        let indices: Vec<usize> = board
            .available_positions()
            .iter()
            .map(|p| p.to_index())
            .collect();
        assert_eq!(indices, vec![1, 2, 3, 5, 6, 7]);
    }

    #[test]
    fn all_eight_lines_win() {
        let lines: [[usize; 3]; 8] = [
            [0, 1, 2],
            [3, 4, 5],
            [6, 7, 8],
            [0, 3, 6],
            [1, 4, 7],
            [2, 5, 8],
            [0, 4, 8],
            [2, 4, 6],
        ];
        for line in lines {
            let board = filled(&[
                (line[0], Mark::O),
                (line[1], Mark::O),
                (line[2], Mark::O),
            ]);
            assert_eq!(board.winner(), Some(Mark::O), "line {line:?}");
        }
    }

    #[test]
    fn mixed_line_is_not_a_win() {
        let board = filled(&[(0, Mark::X), (1, Mark::O), (2, Mark::X)]);
        assert_eq!(board.winner(), None);
    }

    #[test]
    fn full_board_without_winner_is_draw_shaped() {
        // X O X / O O X / X X O - no complete line
        let board = filled(&[
            (0, Mark::X),
            (1, Mark::O),
            (2, Mark::X),
            (3, Mark::O),
            (4, Mark::O),
            (5, Mark::X),
            (6, Mark::X),
            (7, Mark::X),
            (8, Mark::O),
        ]);
        assert!(board.is_full());
        assert!(!board.has_available_positions());
        assert_eq!(board.winner(), None);
    }

    #[test]
    fn render_shows_marks_and_gaps() {
        let board = filled(&[(0, Mark::X), (4, Mark::O)]);
        assert_eq!(board.render(), "X|.|.\n.|O|.\n.|.|.");
    }
}
