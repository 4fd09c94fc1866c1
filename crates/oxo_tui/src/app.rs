//! View state, fed exclusively by engine events.

use oxo_engine::{Board, EngineEvent, Mark, Outcome, Position};
use tracing::debug;

/// What the UI currently shows. The app never touches the engine's board;
/// it mirrors it from `PlayerMoved` events.
pub struct App {
    board: Board,
    cursor: Position,
    to_move: Option<Mark>,
    outcome: Option<Outcome>,
    status: String,
    confirm_quit: bool,
}

impl App {
    /// Fresh view state for a new game.
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            cursor: Position::Center,
            to_move: None,
            outcome: None,
            status: "Waiting for the game to start".to_string(),
            confirm_quit: false,
        }
    }

    /// The mirrored board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The highlighted cell.
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Moves the highlighted cell.
    pub fn set_cursor(&mut self, cursor: Position) {
        self.cursor = cursor;
    }

    /// The status line.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// True once `GameEnded` arrived.
    pub fn game_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// True while a quit confirmation is pending.
    pub fn confirm_quit(&self) -> bool {
        self.confirm_quit
    }

    /// Arms or clears the quit confirmation prompt.
    pub fn set_confirm_quit(&mut self, armed: bool) {
        self.confirm_quit = armed;
        if armed {
            self.status = "Quit the running game? Press q again to confirm.".to_string();
        } else {
            self.refresh_status();
        }
    }

    /// Applies an engine event to the view.
    pub fn handle_event(&mut self, event: EngineEvent) {
        debug!(?event, "ui event");
        match event {
            EngineEvent::GameStarted => {
                self.board = Board::new();
                self.outcome = None;
            }
            EngineEvent::RoundStarted { mark } => {
                self.to_move = Some(mark);
            }
            EngineEvent::PlayerMoved { position, mark } => {
                // The engine already validated; a failure here would mean
                // the mirror diverged, which rebuilding on GameStarted
                // prevents.
                let _ = self.board.apply(position, mark);
            }
            EngineEvent::RoundEnded => {}
            EngineEvent::GameEnded { outcome } => {
                self.to_move = None;
                self.outcome = Some(outcome);
            }
        }
        if !self.confirm_quit {
            self.refresh_status();
        }
    }

    fn refresh_status(&mut self) {
        self.status = match (self.outcome, self.to_move) {
            (Some(Outcome::Winner(mark)), _) => {
                format!("{mark} wins! Press r for a rematch or q to quit.")
            }
            (Some(Outcome::Draw), _) => {
                "Draw! Press r for a rematch or q to quit.".to_string()
            }
            (None, Some(mark)) => {
                format!("{mark} to move - press 1-9 or use arrows and Enter")
            }
            (None, None) => "Waiting for the game to start".to_string(),
        };
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
