//! oxo_engine - turn arbiter and board logic for two-player tic-tac-toe.
//!
//! The crate is the game half of the system; presentation lives in
//! `oxo_tui`. The pieces, leaves first:
//!
//! - [`Board`] owns the nine cells, applies moves, and detects a winning
//!   line or exhaustion.
//! - [`Player`] is a mark plus a capability tag: [`PlayerKind::Human`]
//!   moves arrive as external input, [`PlayerKind::Automated`] moves as
//!   time-deferred decisions.
//! - [`Rotation`] alternates strictly between exactly two players.
//! - [`Engine`] arbitrates: it owns the board and the rotation, drives
//!   the start/round/end lifecycle, and emits [`EngineEvent`]s to
//!   registered [`Observer`]s at every transition.
//! - [`runtime`] runs an engine on a single-threaded tokio command queue
//!   and schedules the automated player's single-shot decision timer.
//!
//! Everything is single-threaded by construction: commands are processed
//! one at a time, observers are notified synchronously, and the only
//! asynchrony is the decision timer, which re-enters through the same
//! queue and is re-validated on arrival.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod engine;
mod event;
mod mark;
mod player;
mod position;
mod rotation;
pub mod runtime;

pub use board::{Board, MoveError, Square};
pub use engine::{Engine, Phase};
pub use event::{EngineEvent, Observer, Outcome};
pub use mark::Mark;
pub use player::{FirstAvailable, MoveRequest, Player, PlayerKind, Policy, RandomPolicy};
pub use position::Position;
pub use rotation::{Rotation, RotationError};
