//! Players and the automated decision policy.
//!
//! Players never touch the board. A human's chosen position enters through
//! [`Engine::handle_input`](crate::Engine::handle_input); an automated
//! player is handed a [`MoveRequest`] snapshot when its round starts and
//! answers through the engine's command queue after a timer fires.

use crate::{Mark, Position};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// How a player produces moves. The engine branches on this tag when
/// deciding whether external input may be forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerKind {
    /// Moves arrive as external input events (clicks, key presses).
    Human,
    /// Moves arrive as time-deferred decisions scheduled by the driver.
    Automated,
}

/// A turn-taking participant: an immutable mark plus a capability tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    mark: Mark,
    kind: PlayerKind,
}

impl Player {
    /// Creates a player with the given role and capability.
    pub fn new(mark: Mark, kind: PlayerKind) -> Self {
        Self { mark, kind }
    }

    /// A human player for the given mark.
    pub fn human(mark: Mark) -> Self {
        Self::new(mark, PlayerKind::Human)
    }

    /// An automated player for the given mark.
    pub fn automated(mark: Mark) -> Self {
        Self::new(mark, PlayerKind::Automated)
    }

    /// The player's mark.
    pub fn mark(&self) -> Mark {
        self.mark
    }

    /// The player's capability tag.
    pub fn kind(&self) -> PlayerKind {
        self.kind
    }

    /// True if the player accepts direct external input.
    pub fn is_human(&self) -> bool {
        self.kind == PlayerKind::Human
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.mark)
    }
}

/// Heads-up context for an automated player's round: the round token, the
/// player to move, and the empty positions at the time the round started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRequest {
    /// Token identifying the round this request belongs to. The engine
    /// discards deliveries whose token no longer matches.
    pub round: u64,
    /// The automated player to move.
    pub mark: Mark,
    /// Empty positions when the round started, ascending index order.
    pub available: Vec<Position>,
}

/// A decision policy for automated players.
///
/// `choose` returns `None` when no positions remain, which the caller
/// treats as "do nothing" (the game ended under the timer).
pub trait Policy: Send + Sync {
    /// Picks a position from the available ones.
    fn choose(&self, available: &[Position]) -> Option<Position>;
}

/// Uniform-random choice over the available positions.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPolicy;

impl Policy for RandomPolicy {
    fn choose(&self, available: &[Position]) -> Option<Position> {
        available.choose(&mut rand::thread_rng()).copied()
    }
}

/// Deterministic policy: always the lowest-index available position.
/// Useful for tests and scripted demos.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstAvailable;

impl Policy for FirstAvailable {
    fn choose(&self, available: &[Position]) -> Option<Position> {
        available.first().copied()
    }
}
