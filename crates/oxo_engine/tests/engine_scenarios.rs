//! End-to-end scenarios for the engine state machine.

use oxo_engine::{
    Board, Engine, EngineEvent, Mark, Outcome, Phase, Player, Position, Rotation, Square,
};
use tokio::sync::mpsc;

fn pos(index: usize) -> Position {
    Position::from_index(index).unwrap()
}

/// A human-vs-human engine with a channel observer attached.
fn engine_with_events() -> (Engine, mpsc::UnboundedReceiver<EngineEvent>) {
    let rotation = Rotation::new(Player::human(Mark::X), Player::human(Mark::O)).unwrap();
    let mut engine = Engine::new(Board::new(), rotation);
    let (tx, rx) = mpsc::unbounded_channel();
    engine.subscribe(Box::new(tx));
    (engine, rx)
}

fn drain(rx: &mut mpsc::UnboundedReceiver<EngineEvent>) -> Vec<EngineEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[test]
fn scenario_win_top_row() {
    let (mut engine, mut rx) = engine_with_events();
    engine.start_game();

    // X@0, O@3, X@1, O@4, X@2 - X completes the top row.
    for index in [0, 3, 1, 4, 2] {
        engine.handle_input(pos(index));
    }

    assert_eq!(engine.board().winner(), Some(Mark::X));
    assert_eq!(engine.phase(), Phase::Ended);
    assert!(!engine.awaiting_move());
    assert!(!engine.is_running());

    let events = drain(&mut rx);
    assert_eq!(
        events.last(),
        Some(&EngineEvent::GameEnded {
            outcome: Outcome::Winner(Mark::X)
        })
    );
}

#[test]
fn scenario_draw() {
    let (mut engine, mut rx) = engine_with_events();
    engine.start_game();

    // Alternating sequence that fills the board with no complete line.
    for index in [0, 1, 2, 4, 3, 6, 5, 8, 7] {
        engine.handle_input(pos(index));
    }

    assert_eq!(engine.board().winner(), None);
    assert!(engine.board().is_full());
    assert_eq!(engine.phase(), Phase::Ended);

    let events = drain(&mut rx);
    assert_eq!(
        events.last(),
        Some(&EngineEvent::GameEnded {
            outcome: Outcome::Draw
        })
    );
}

#[test]
fn scenario_illegal_move_ignored() {
    let (mut engine, mut rx) = engine_with_events();
    engine.start_game();

    engine.handle_input(pos(0));
    drain(&mut rx);

    // O clicks the cell X already took: no state change, no emission.
    engine.handle_input(pos(0));

    assert_eq!(engine.board().get(pos(0)), Square::Taken(Mark::X));
    assert_eq!(drain(&mut rx), Vec::new());
    assert!(engine.awaiting_move());
    assert_eq!(engine.current_player().map(|p| p.mark()), Some(Mark::O));
}

#[test]
fn scenario_start_on_full_board() {
    // Draw-shaped full board, then start the game on it.
    let mut board = Board::new();
    let marks = [
        Mark::X,
        Mark::O,
        Mark::X,
        Mark::X,
        Mark::O,
        Mark::X,
        Mark::O,
        Mark::X,
        Mark::O,
    ];
    for (index, mark) in marks.into_iter().enumerate() {
        board.apply(pos(index), mark).unwrap();
    }
    assert_eq!(board.winner(), None);

    let rotation = Rotation::new(Player::human(Mark::X), Player::human(Mark::O)).unwrap();
    let mut engine = Engine::new(board, rotation);
    let (tx, mut rx) = mpsc::unbounded_channel();
    engine.subscribe(Box::new(tx));

    engine.start_game();

    assert_eq!(engine.phase(), Phase::Ended);
    let events = drain(&mut rx);
    assert_eq!(
        events,
        vec![
            EngineEvent::GameStarted,
            EngineEvent::GameEnded {
                outcome: Outcome::Draw
            }
        ]
    );
    assert!(!events
        .iter()
        .any(|e| matches!(e, EngineEvent::RoundStarted { .. })));
}

#[test]
fn input_ignored_while_automated_player_is_active() {
    let rotation = Rotation::new(Player::automated(Mark::X), Player::human(Mark::O)).unwrap();
    let mut engine = Engine::new(Board::new(), rotation);
    let (tx, mut rx) = mpsc::unbounded_channel();
    engine.subscribe(Box::new(tx));

    engine.start_game();
    drain(&mut rx);

    // X is automated and to move; a click must not reach the board.
    engine.handle_input(pos(4));

    assert!(engine.board().is_empty(pos(4)));
    assert_eq!(drain(&mut rx), Vec::new());
    assert!(engine.awaiting_move());
}

#[test]
fn input_ignored_before_start_and_after_end() {
    let (mut engine, mut rx) = engine_with_events();

    engine.handle_input(pos(0));
    assert!(engine.board().is_empty(pos(0)));

    engine.start_game();
    for index in [0, 3, 1, 4, 2] {
        engine.handle_input(pos(index));
    }
    assert_eq!(engine.phase(), Phase::Ended);
    drain(&mut rx);

    // Late click after the game ended.
    engine.handle_input(pos(5));
    assert!(engine.board().is_empty(pos(5)));
    assert_eq!(drain(&mut rx), Vec::new());
}

#[test]
fn second_start_is_a_no_op() {
    let (mut engine, mut rx) = engine_with_events();
    engine.start_game();
    drain(&mut rx);

    engine.start_game();

    assert_eq!(drain(&mut rx), Vec::new());
    assert_eq!(engine.round(), 1);
}

#[test]
fn event_order_for_a_full_game() {
    let (mut engine, mut rx) = engine_with_events();
    engine.start_game();
    for index in [0, 3, 1, 4, 2] {
        engine.handle_input(pos(index));
    }

    let events = drain(&mut rx);
    let expected = vec![
        EngineEvent::GameStarted,
        EngineEvent::RoundStarted { mark: Mark::X },
        EngineEvent::PlayerMoved {
            position: pos(0),
            mark: Mark::X,
        },
        EngineEvent::RoundEnded,
        EngineEvent::RoundStarted { mark: Mark::O },
        EngineEvent::PlayerMoved {
            position: pos(3),
            mark: Mark::O,
        },
        EngineEvent::RoundEnded,
        EngineEvent::RoundStarted { mark: Mark::X },
        EngineEvent::PlayerMoved {
            position: pos(1),
            mark: Mark::X,
        },
        EngineEvent::RoundEnded,
        EngineEvent::RoundStarted { mark: Mark::O },
        EngineEvent::PlayerMoved {
            position: pos(4),
            mark: Mark::O,
        },
        EngineEvent::RoundEnded,
        EngineEvent::RoundStarted { mark: Mark::X },
        EngineEvent::PlayerMoved {
            position: pos(2),
            mark: Mark::X,
        },
        EngineEvent::RoundEnded,
        EngineEvent::GameEnded {
            outcome: Outcome::Winner(Mark::X),
        },
    ];
    assert_eq!(events, expected);
}

#[test]
fn observers_notified_in_registration_order() {
    let rotation = Rotation::new(Player::human(Mark::X), Player::human(Mark::O)).unwrap();
    let mut engine = Engine::new(Board::new(), rotation);

    let (first_tx, mut first_rx) = mpsc::unbounded_channel();
    let (second_tx, mut second_rx) = mpsc::unbounded_channel();
    engine.subscribe(Box::new(first_tx));
    engine.subscribe(Box::new(second_tx));

    engine.start_game();

    let first = drain(&mut first_rx);
    let second = drain(&mut second_rx);
    assert_eq!(first, second);
    assert_eq!(first[0], EngineEvent::GameStarted);
}

#[test]
fn stale_automated_round_token_is_discarded() {
    let rotation = Rotation::new(Player::automated(Mark::X), Player::automated(Mark::O)).unwrap();
    let mut engine = Engine::new(Board::new(), rotation);

    engine.start_game();
    let request = engine.take_move_request().expect("automated round pending");
    assert_eq!(request.round, 1);
    assert_eq!(request.mark, Mark::X);
    assert_eq!(request.available.len(), 9);

    // Round 1 resolves normally; a duplicate of its timer then fires late.
    engine.handle_automated(request.round, pos(0));
    assert_eq!(engine.round(), 2);

    engine.handle_automated(request.round, pos(4));
    assert!(engine.board().is_empty(pos(4)));
    assert!(engine.awaiting_move());
}

#[test]
fn automated_move_request_snapshots_available_positions() {
    let rotation = Rotation::new(Player::human(Mark::X), Player::automated(Mark::O)).unwrap();
    let mut engine = Engine::new(Board::new(), rotation);

    engine.start_game();
    assert!(engine.take_move_request().is_none(), "human round first");

    engine.handle_input(pos(4));
    let request = engine.take_move_request().expect("automated round pending");
    assert_eq!(request.mark, Mark::O);
    assert_eq!(request.available.len(), 8);
    assert!(!request.available.contains(&pos(4)));
}
