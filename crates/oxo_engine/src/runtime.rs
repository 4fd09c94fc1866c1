//! The single-threaded event queue that drives an engine.
//!
//! All state transitions happen inside [`run`], which processes commands
//! strictly in arrival order. The only asynchronous element is the
//! automated player's deferred decision: when a round starts for an
//! automated player the driver spawns a single-shot timer that sleeps,
//! picks a position, and sends the result back into the same queue.
//! Pending timers are never cancelled; the engine's round-token check in
//! [`Engine::handle_automated`] turns a late firing into a no-op.

use crate::{Engine, Phase, Policy, Position};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument};

/// The fixed thinking delay of the stock automated player.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

/// A command on the engine's event queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start the game.
    Start,
    /// External input (a click or key press) naming a position.
    Input(Position),
    /// An automated player's deferred decision for the given round.
    Automated {
        /// Round token from the originating [`MoveRequest`](crate::MoveRequest).
        round: u64,
        /// The chosen position.
        position: Position,
    },
}

/// Cloneable sending side of the engine queue, for UIs.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    tx: mpsc::UnboundedSender<Command>,
}

impl EngineHandle {
    /// Asks the engine to start the game.
    pub fn start(&self) {
        let _ = self.tx.send(Command::Start);
    }

    /// Forwards external input naming a position.
    pub fn input(&self, position: Position) {
        let _ = self.tx.send(Command::Input(position));
    }

    /// True if the engine loop is still receiving.
    pub fn is_open(&self) -> bool {
        !self.tx.is_closed()
    }
}

/// Creates the command queue for an engine loop.
pub fn channel() -> (EngineHandle, mpsc::UnboundedReceiver<Command>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EngineHandle { tx }, rx)
}

/// Drives an engine until the game ends or every handle is dropped.
///
/// `delay` is the automated player's fixed, non-zero thinking time; the
/// decision is never produced synchronously inside the round that asks
/// for it. The engine is returned so callers can inspect the final board.
#[instrument(skip_all, fields(delay_ms = delay.as_millis() as u64))]
pub async fn run(
    mut engine: Engine,
    mut rx: mpsc::UnboundedReceiver<Command>,
    delay: Duration,
    policy: Arc<dyn Policy>,
) -> Engine {
    // A private sender keeps timer tasks able to answer without keeping
    // the queue open after the UI drops its handle.
    let (timer_tx, mut timer_rx) = mpsc::unbounded_channel();

    loop {
        let command = tokio::select! {
            command = rx.recv() => match command {
                Some(command) => command,
                None => {
                    debug!("all handles dropped, stopping engine loop");
                    break;
                }
            },
            Some(command) = timer_rx.recv() => command,
        };

        match command {
            Command::Start => engine.start_game(),
            Command::Input(position) => engine.handle_input(position),
            Command::Automated { round, position } => engine.handle_automated(round, position),
        }

        if let Some(request) = engine.take_move_request() {
            let timer_tx = timer_tx.clone();
            let policy = Arc::clone(&policy);
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                // Re-check at fire time: the game may have ended or the
                // snapshot may be empty. The engine re-validates the
                // round token on arrival either way.
                if let Some(position) = policy.choose(&request.available) {
                    debug!(round = request.round, mark = %request.mark, ?position,
                        "automated player decided");
                    let _ = timer_tx.send(Command::Automated {
                        round: request.round,
                        position,
                    });
                }
            });
        }

        if engine.phase() == Phase::Ended {
            info!("game over\n{}", engine.board().render());
            break;
        }
    }

    engine
}
