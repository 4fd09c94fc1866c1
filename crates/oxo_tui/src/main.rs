//! Terminal front end for the oxo engine.
//!
//! The UI owns nothing but view state: key presses become engine commands,
//! engine events become screen updates. One engine instance runs one game;
//! a rematch spawns a fresh board, engine, and driver task.

mod app;
mod input;
mod ui;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use oxo_engine::{
    Board, Engine, EngineEvent, Mark, Player, Policy, RandomPolicy, Rotation, runtime,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;
use tracing_subscriber::EnvFilter;

use app::App;

/// Who sits at each side of the board. X always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// You play X against the machine.
    HumanVsAuto,
    /// The machine plays both sides.
    AutoVsAuto,
    /// Two humans share the keyboard.
    HumanVsHuman,
}

#[derive(Debug, Parser)]
#[command(name = "oxo", about = "Two-player tic-tac-toe with an automated opponent")]
struct Cli {
    /// Player line-up.
    #[arg(long, value_enum, default_value_t = Mode::HumanVsAuto)]
    mode: Mode,

    /// Thinking delay of the automated player, in milliseconds.
    #[arg(long, default_value_t = 500)]
    delay_ms: u64,
}

/// A running game: the command handle, the event stream, and the driver.
struct Game {
    handle: runtime::EngineHandle,
    events: mpsc::UnboundedReceiver<EngineEvent>,
    driver: JoinHandle<Engine>,
}

impl Game {
    /// Builds a fresh board + engine pair and starts it on its own task.
    fn start(mode: Mode, delay: Duration) -> Result<Self> {
        let (player_x, player_o) = match mode {
            Mode::HumanVsAuto => (Player::human(Mark::X), Player::automated(Mark::O)),
            Mode::AutoVsAuto => (Player::automated(Mark::X), Player::automated(Mark::O)),
            Mode::HumanVsHuman => (Player::human(Mark::X), Player::human(Mark::O)),
        };
        let rotation = Rotation::new(player_x, player_o)?;

        let mut engine = Engine::new(Board::new(), rotation);
        let (event_tx, events) = mpsc::unbounded_channel();
        engine.subscribe(Box::new(event_tx));

        let (handle, command_rx) = runtime::channel();
        let policy: Arc<dyn Policy> = Arc::new(RandomPolicy);
        let driver = tokio::spawn(runtime::run(engine, command_rx, delay, policy));

        handle.start();
        Ok(Self {
            handle,
            events,
            driver,
        })
    }
}

impl Drop for Game {
    fn drop(&mut self) {
        self.driver.abort();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    info!(mode = ?cli.mode, delay_ms = cli.delay_ms, "starting oxo");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, cli).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    cli: Cli,
) -> Result<()> {
    let delay = Duration::from_millis(cli.delay_ms);
    let mut game = Game::start(cli.mode, delay)?;
    let mut app = App::new();

    loop {
        while let Ok(event) = game.events.try_recv() {
            app.handle_event(event);
        }

        terminal.draw(|frame| ui::draw(frame, &app))?;

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key.code {
            KeyCode::Char('q') => {
                // Quitting mid-game asks once before abandoning the board.
                if app.game_over() || app.confirm_quit() {
                    return Ok(());
                }
                app.set_confirm_quit(true);
            }
            KeyCode::Char('r') => {
                app.set_confirm_quit(false);
                game = Game::start(cli.mode, delay)?;
                app = App::new();
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                app.set_confirm_quit(false);
                game.handle.input(app.cursor());
            }
            KeyCode::Char(c) => {
                app.set_confirm_quit(false);
                if let Some(pos) = input::digit_to_position(c) {
                    game.handle.input(pos);
                }
            }
            code @ (KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right) => {
                app.set_confirm_quit(false);
                app.set_cursor(input::move_cursor(app.cursor(), code));
            }
            _ => {}
        }
    }
}
