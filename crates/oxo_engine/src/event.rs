//! Lifecycle notifications and observer registration.
//!
//! The engine delivers events synchronously, in registration order, before
//! the emitting call returns. There is no deferred dispatch; a subscriber
//! that needs asynchrony can register a channel sender.

use crate::{Mark, Position};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// One player owns a complete line.
    Winner(Mark),
    /// Every cell is taken and no line is owned.
    Draw,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Winner(mark) => write!(f, "{mark} wins"),
            Outcome::Draw => write!(f, "draw"),
        }
    }
}

/// A lifecycle notification emitted by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// The game began.
    GameStarted,
    /// A round began; `mark` is the player now to move.
    RoundStarted {
        /// The active player's mark.
        mark: Mark,
    },
    /// A move was applied to the board.
    PlayerMoved {
        /// Where the mark landed.
        position: Position,
        /// Whose mark it is.
        mark: Mark,
    },
    /// The round resolved; the engine is deciding what happens next.
    RoundEnded,
    /// The game reached a terminal condition.
    GameEnded {
        /// Win or draw.
        outcome: Outcome,
    },
}

/// A subscriber to engine notifications.
pub trait Observer: Send {
    /// Called for every event, in emission order.
    fn notify(&mut self, event: &EngineEvent);
}

/// Channel senders work as observers; a dropped receiver is ignored so a
/// departing UI cannot wedge the engine.
impl Observer for mpsc::UnboundedSender<EngineEvent> {
    fn notify(&mut self, event: &EngineEvent) {
        let _ = self.send(*event);
    }
}
