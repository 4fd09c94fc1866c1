//! The turn arbiter: a finite-state machine over a board and a rotation.
//!
//! One engine instance runs exactly one game. It sequences rounds between
//! the two players, applies their moves to the board, checks terminal
//! conditions after every move, and notifies observers at each transition.
//! A rematch constructs a fresh [`Board`] + `Engine` pair.

use crate::{
    Board, EngineEvent, Mark, MoveRequest, Observer, Outcome, Player, PlayerKind, Position,
    Rotation,
};
use tracing::{debug, instrument, warn};

/// Where the engine is in the game lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Constructed, `start_game` not yet called.
    NotStarted,
    /// A round is underway and the active player's move is awaited.
    /// External input is accepted only here.
    RoundActive,
    /// A move landed; the engine is deciding between a new round and the
    /// end of the game. Input arriving now is a late click and is dropped.
    RoundResolving,
    /// Terminal. No transitions leave this phase.
    Ended,
}

/// The game engine.
///
/// The engine owns the board; players never hold a reference to it. Humans
/// reach the board through [`handle_input`](Engine::handle_input), automated
/// players through [`handle_automated`](Engine::handle_automated), and both
/// paths are gated on the current phase and the active player's kind, so a
/// duplicate or late delivery can never double-apply a move.
pub struct Engine {
    board: Board,
    rotation: Rotation,
    phase: Phase,
    round: u64,
    observers: Vec<Box<dyn Observer>>,
    pending: Option<MoveRequest>,
}

impl Engine {
    /// Creates an engine over a board and two players.
    pub fn new(board: Board, rotation: Rotation) -> Self {
        Self {
            board,
            rotation,
            phase: Phase::NotStarted,
            round: 0,
            observers: Vec::new(),
            pending: None,
        }
    }

    /// Registers an observer. Events are delivered synchronously and in
    /// registration order before the emitting call returns.
    pub fn subscribe(&mut self, observer: Box<dyn Observer>) {
        self.observers.push(observer);
    }

    /// The board, for rendering.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// True between `start_game` and the terminal transition.
    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::RoundActive | Phase::RoundResolving)
    }

    /// True only while the current round waits for the active player.
    pub fn awaiting_move(&self) -> bool {
        self.phase == Phase::RoundActive
    }

    /// The active player per the rotation, if a round has started.
    pub fn current_player(&self) -> Option<&Player> {
        self.rotation.current()
    }

    /// The current round number; 0 before the first round.
    pub fn round(&self) -> u64 {
        self.round
    }

    /// Removes and returns the pending automated heads-up, if any. The
    /// driver calls this after every command to schedule the timer.
    pub fn take_move_request(&mut self) -> Option<MoveRequest> {
        self.pending.take()
    }

    /// Starts the game: emits `GameStarted`, then either begins the first
    /// round or, on a board with no available positions, ends immediately
    /// without ever emitting `RoundStarted`.
    #[instrument(skip(self))]
    pub fn start_game(&mut self) {
        if self.phase != Phase::NotStarted {
            warn!(phase = ?self.phase, "start_game ignored: game already started");
            return;
        }

        self.emit(EngineEvent::GameStarted);

        if self.board.has_available_positions() {
            self.rotation.switch();
            self.start_round();
        } else {
            self.end_game();
        }
    }

    /// Routes external input to the active player.
    ///
    /// The position reaches the board only while a round is awaiting a
    /// move **and** the active player is human. Anything else - input for
    /// an automated player, a click after the round resolved, a click
    /// before the game started - is silently discarded.
    #[instrument(skip(self))]
    pub fn handle_input(&mut self, position: Position) {
        if self.phase != Phase::RoundActive {
            debug!(?position, phase = ?self.phase, "input ignored: no move awaited");
            return;
        }
        let Some(player) = self.rotation.current().copied() else {
            return;
        };
        if !player.is_human() {
            debug!(?position, player = %player, "input ignored: automated player is active");
            return;
        }
        self.apply_move(position, player.mark());
    }

    /// Accepts an automated player's deferred decision.
    ///
    /// The `round` token is the one carried by the [`MoveRequest`] that
    /// prompted the decision. A delivery is applied only when the round is
    /// still awaiting a move, the token matches the current round, and the
    /// active player is automated; a timer that fires after the game moved
    /// on is an idempotent no-op.
    #[instrument(skip(self))]
    pub fn handle_automated(&mut self, round: u64, position: Position) {
        if self.phase != Phase::RoundActive || round != self.round {
            debug!(round, ?position, "automated move ignored: stale round");
            return;
        }
        let Some(player) = self.rotation.current().copied() else {
            return;
        };
        if player.kind() != PlayerKind::Automated {
            debug!(?position, "automated move ignored: human player is active");
            return;
        }
        self.apply_move(position, player.mark());
    }

    /// Starts a round: the active player gets its heads-up. For a human
    /// that is a no-op (the UI already shows whose turn it is); for an
    /// automated player a decision context is snapshotted for the driver.
    fn start_round(&mut self) {
        self.round += 1;
        self.phase = Phase::RoundActive;

        let player = *self
            .rotation
            .current()
            .expect("rotation switched before every round");
        self.emit(EngineEvent::RoundStarted {
            mark: player.mark(),
        });

        if player.kind() == PlayerKind::Automated {
            self.pending = Some(MoveRequest {
                round: self.round,
                mark: player.mark(),
                available: self.board.available_positions(),
            });
        }
    }

    /// Applies a validated-by-gating move to the board. An occupied cell
    /// is a silent no-op: no state change, no `PlayerMoved` emission.
    fn apply_move(&mut self, position: Position, mark: Mark) {
        if let Err(error) = self.board.apply(position, mark) {
            debug!(%error, "move ignored");
            return;
        }

        self.phase = Phase::RoundResolving;
        self.emit(EngineEvent::PlayerMoved { position, mark });
        self.end_round();
    }

    /// Resolves a round: winner ends the game, a free cell starts the
    /// next round, a full board is a draw. The winner check runs exactly
    /// once per move, after the board is fully updated.
    fn end_round(&mut self) {
        self.emit(EngineEvent::RoundEnded);

        if self.board.winner().is_some() {
            self.end_game();
        } else if self.board.has_available_positions() {
            self.rotation.switch();
            self.start_round();
        } else {
            self.end_game();
        }
    }

    /// Terminal transition.
    fn end_game(&mut self) {
        self.phase = Phase::Ended;
        self.pending = None;
        let outcome = match self.board.winner() {
            Some(mark) => Outcome::Winner(mark),
            None => Outcome::Draw,
        };
        self.emit(EngineEvent::GameEnded { outcome });
    }

    fn emit(&mut self, event: EngineEvent) {
        debug!(?event, "engine event");
        for observer in &mut self.observers {
            observer.notify(&event);
        }
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("phase", &self.phase)
            .field("round", &self.round)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}
