//! Keyboard-to-cell mapping.

use crossterm::event::KeyCode;
use oxo_engine::Position;

/// Moves the cursor one cell in the direction of an arrow key, staying on
/// the board. Other keys leave the cursor where it is.
pub fn move_cursor(cursor: Position, key: KeyCode) -> Position {
    let (row, col) = (cursor.row(), cursor.col());
    let (row, col) = match key {
        KeyCode::Up => (row.saturating_sub(1), col),
        KeyCode::Down => ((row + 1).min(2), col),
        KeyCode::Left => (row, col.saturating_sub(1)),
        KeyCode::Right => (row, (col + 1).min(2)),
        _ => (row, col),
    };
    Position::from_row_col(row, col).unwrap_or(cursor)
}

/// Maps the digit keys 1-9 to positions, keypad style: the digits read
/// left to right, top to bottom, matching the on-screen cell labels.
pub fn digit_to_position(c: char) -> Option<Position> {
    let digit = c.to_digit(10)? as usize;
    if (1..=9).contains(&digit) {
        Position::from_index(digit - 1)
    } else {
        None
    }
}
