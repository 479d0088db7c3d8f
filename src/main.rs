//! Terminal controller for ply_chess.
//!
//! Reads commands from stdin on a helper thread, plays computer sides through
//! a background `SearchTask`, and polls both at a fixed cadence.

use std::io::{self, BufRead, Write};
use std::sync::mpsc::{channel, TryRecvError};
use std::thread;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use log::{info, warn};

use ply_chess::chess_errors::ChessResult;
use ply_chess::engines::engine_minimax::MinimaxEngine;
use ply_chess::engines::engine_random::{choose_random, RandomEngine};
use ply_chess::engines::engine_trait::{Engine, GoParams};
use ply_chess::game_state::game_state::{GameOutcome, GameState, GenerationOptions};
use ply_chess::moves::chess_move::Move;
use ply_chess::search::iterative_deepening::SearchConfig;
use ply_chess::search::search_task::{SearchTask, TaskPoll};
use ply_chess::utils::algebraic::algebraic_to_square;
use ply_chess::utils::long_algebraic::{long_algebraic_to_move, move_to_long_algebraic};
use ply_chess::utils::render_game_state::{render_game_state, render_highlighted};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PlayerKind {
    Human,
    Computer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EngineKind {
    Minimax,
    Random,
}

#[derive(Parser, Debug)]
#[command(name = "ply_chess", version, about = "Play chess in the terminal")]
struct Cli {
    /// Who plays White.
    #[arg(long, value_enum, default_value_t = PlayerKind::Human)]
    white: PlayerKind,

    /// Who plays Black.
    #[arg(long, value_enum, default_value_t = PlayerKind::Computer)]
    black: PlayerKind,

    /// Engine used for computer sides.
    #[arg(long, value_enum, default_value_t = EngineKind::Minimax)]
    engine: EngineKind,

    /// Maximum search depth in plies.
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=10))]
    depth: u8,

    /// Wall-clock limit per computer move.
    #[arg(long)]
    movetime_ms: Option<u64>,

    /// Seed for reproducible engine choices.
    #[arg(long)]
    seed: Option<u64>,

    /// Start from this position instead of the standard one.
    #[arg(long)]
    fen: Option<String>,

    /// Offer rook, bishop and knight promotions as separate moves.
    #[arg(long)]
    underpromotion: bool,

    /// Log filter when RUST_LOG is not set.
    #[arg(long, default_value = "warn")]
    log_level: log::LevelFilter,
}

struct Controller {
    game: GameState,
    start_fen: Option<String>,
    legal_moves: Vec<Move>,
    players: [PlayerKind; 2],
    engine_kind: EngineKind,
    search_config: SearchConfig,
    task: Option<SearchTask>,
}

impl Controller {
    fn new(cli: &Cli) -> ChessResult<Self> {
        let options = GenerationOptions {
            underpromotion: cli.underpromotion,
        };
        let game = match &cli.fen {
            Some(fen) => GameState::from_fen(fen)?,
            None => GameState::new_game(),
        }
        .with_options(options);

        let search_config = SearchConfig {
            max_depth: cli.depth,
            movetime_ms: cli.movetime_ms,
            seed: cli.seed,
            ..SearchConfig::default()
        };

        Ok(Self {
            game,
            start_fen: cli.fen.clone(),
            legal_moves: Vec::new(),
            players: [cli.white, cli.black],
            engine_kind: cli.engine,
            search_config,
            task: None,
        })
    }

    fn player_to_move(&self) -> PlayerKind {
        self.players[self.game.side_to_move().index()]
    }

    fn is_game_over(&self) -> bool {
        self.game.outcome().is_some()
    }

    fn computer_to_move(&self) -> bool {
        !self.is_game_over() && self.player_to_move() == PlayerKind::Computer
    }

    /// Regenerates the legal set and redraws the position.
    fn refresh(&mut self) {
        self.legal_moves = self.game.get_legal_moves();

        println!("\n{}", render_game_state(&self.game));
        match self.game.outcome() {
            Some(GameOutcome::Checkmate { winner }) => {
                println!("Checkmate! {} wins. Type 'undo', 'reset' or 'quit'.", winner.name());
            }
            Some(GameOutcome::Stalemate) => {
                println!("Stalemate. Type 'undo', 'reset' or 'quit'.");
            }
            None => {
                let side = self.game.side_to_move().name();
                let check = if self.game.in_check() { " (in check)" } else { "" };
                match self.player_to_move() {
                    PlayerKind::Human => print!("{side} to move{check}> "),
                    PlayerKind::Computer => println!("{side} is thinking{check}..."),
                }
            }
        }
        io::stdout().flush().ok();
    }

    fn build_engine(&self) -> Box<dyn Engine> {
        match self.engine_kind {
            EngineKind::Minimax => Box::new(MinimaxEngine::new(self.search_config)),
            EngineKind::Random => match self.search_config.seed {
                Some(seed) => Box::new(RandomEngine::with_seed(seed)),
                None => Box::new(RandomEngine::new()),
            },
        }
    }

    fn cancel_search(&mut self) {
        if let Some(mut task) = self.task.take() {
            task.cancel();
        }
    }

    /// Starts a search when a computer side is to move, or collects its result.
    fn tick(&mut self) {
        if self.task.is_none() {
            if self.computer_to_move() {
                let engine = self.build_engine();
                self.task = Some(SearchTask::spawn(
                    engine,
                    &self.game,
                    &self.legal_moves,
                    GoParams::default(),
                ));
            }
            return;
        }

        let poll = match self.task.as_mut() {
            Some(task) => task.poll(),
            None => return,
        };
        match poll {
            TaskPoll::Pending => {}
            TaskPoll::Cancelled => self.task = None,
            TaskPoll::Ready(choice) => {
                self.task = None;
                let chosen = choice.or_else(|| {
                    warn!("search made no decision, falling back to a random move");
                    choose_random(&self.legal_moves)
                });
                if let Some(mv) = chosen {
                    self.play(mv);
                }
            }
        }
    }

    fn play(&mut self, mv: Move) {
        let mover = self.game.side_to_move();
        match self.game.apply_move(&mv) {
            Ok(()) => {
                info!("{} played {}", mover.name(), mv);
                println!("{} plays {}", mover.name(), move_to_long_algebraic(&mv));
                self.refresh();
            }
            Err(err) => println!("{err}"),
        }
    }

    fn undo(&mut self) {
        self.cancel_search();
        if self.game.undo_move().is_err() {
            println!("Nothing to undo.");
            return;
        }
        // Step back past the computer's reply so the human is to move again.
        let other = self.game.side_to_move().opposite();
        if self.player_to_move() == PlayerKind::Computer
            && self.players[other.index()] == PlayerKind::Human
        {
            self.game.undo_move().ok();
        }
        self.refresh();
    }

    fn reset(&mut self) {
        self.cancel_search();
        match self.start_fen.as_deref().map(GameState::from_fen) {
            Some(Ok(game)) => self.game = game.with_options(self.game.options),
            Some(Err(err)) => {
                println!("{err}");
                self.game.reset();
            }
            None => self.game.reset(),
        }
        self.refresh();
    }

    fn show_moves(&mut self, square: Option<&str>) {
        let Some(text) = square else {
            let listed: Vec<String> = self.legal_moves.iter().map(move_to_long_algebraic).collect();
            println!("{} legal moves: {}", listed.len(), listed.join(" "));
            return;
        };

        match algebraic_to_square(text) {
            Ok(from) => {
                let targets: Vec<_> = self
                    .game
                    .legal_moves_from(from)
                    .iter()
                    .map(Move::end)
                    .collect();
                println!("{}", render_highlighted(&self.game, &targets));
            }
            Err(err) => println!("{err}"),
        }
    }

    /// Handles one input line; returns false to quit.
    fn handle_command(&mut self, line: &str) -> bool {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return true;
        };

        match command.to_ascii_lowercase().as_str() {
            "quit" | "exit" | "q" => return false,
            "undo" | "z" => self.undo(),
            "reset" | "r" => self.reset(),
            "moves" => self.show_moves(words.next()),
            "fen" => println!("{}", self.game.to_fen()),
            "board" => self.refresh(),
            "help" | "?" => print_help(),
            _ => {
                if self.is_game_over() {
                    println!("The game is over. Type 'undo', 'reset' or 'quit'.");
                } else if self.player_to_move() == PlayerKind::Computer {
                    println!("Wait for the computer to move.");
                } else {
                    match long_algebraic_to_move(command, &mut self.game) {
                        Ok(mv) => self.play(mv),
                        Err(err) => println!("{err}"),
                    }
                }
            }
        }
        true
    }
}

fn print_help() {
    println!("Commands:");
    println!("  e2e4, e7e8n   play a move (promotion letter optional, queen by default)");
    println!("  moves [sq]    list legal moves, or show targets from a square");
    println!("  undo | z      take back a move");
    println!("  reset | r     start over");
    println!("  fen           print the position as FEN");
    println!("  board         redraw the board");
    println!("  quit          leave");
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level.as_str()))
        .init();

    let mut controller = match Controller::new(&cli) {
        Ok(controller) => controller,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    info!(
        "white: {:?}, black: {:?}, engine: {:?}, depth: {}",
        cli.white, cli.black, cli.engine, cli.depth
    );

    let (line_tx, line_rx) = channel::<String>();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });

    print_help();
    controller.refresh();

    loop {
        match line_rx.try_recv() {
            Ok(line) => {
                if !controller.handle_command(line.trim()) {
                    break;
                }
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                // Input is gone; only keep going while the computer has moves to make.
                if !controller.computer_to_move() && controller.task.is_none() {
                    break;
                }
            }
        }

        controller.tick();
        thread::sleep(POLL_INTERVAL);
    }

    controller.cancel_search();
    info!("session ended after {} moves", controller.game.move_log().len());
}
