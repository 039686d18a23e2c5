//! Main CLI interface to the Parry engine: play a game of chess in the terminal.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, ensure, Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use parry_engine::coretypes::{Color, GameStatus, Move, PlyKind};
use parry_engine::eval::evaluate_abs;
use parry_engine::{search, validate_depth, Fen, Game, Position};

/// Play chess against a fixed-depth alpha-beta engine.
#[derive(Debug, Parser)]
#[command(name = "parry", version, about)]
struct Args {
    /// Color you play as: white or black.
    #[arg(long, default_value = "white")]
    color: Color,

    /// Engine search depth in plies.
    #[arg(long, default_value_t = 3, allow_negative_numbers = true)]
    depth: i64,

    /// Start from this FEN instead of the standard start position.
    #[arg(long, conflicts_with = "load")]
    fen: Option<String>,

    /// File used by the save and load commands.
    #[arg(long, default_value = "saved_position.fen")]
    save_file: PathBuf,

    /// Resume from the position in the save file.
    #[arg(long)]
    load: bool,
}

enum InputKind {
    Exit,
    Newgame,
    Help,
    Undo,
    Save,
    Load,
    Eval,
    Error,
    GameMove(Move),
}

impl From<&str> for InputKind {
    fn from(s: &str) -> Self {
        let maybe_move: Result<Move, _> = s.parse();
        if let Ok(move_) = maybe_move {
            Self::GameMove(move_)
        } else {
            match s {
                "exit" | "quit" => Self::Exit,
                "newgame" | "ng" => Self::Newgame,
                "help" => Self::Help,
                "undo" => Self::Undo,
                "save" => Self::Save,
                "load" => Self::Load,
                "eval" => Self::Eval,
                _ => Self::Error,
            }
        }
    }
}

/// Everything the game loop needs between turns.
struct Session {
    game: Game,
    human: Color,
    depth: PlyKind,
    save_file: PathBuf,
}

impl Session {
    fn engine_color(&self) -> Color {
        !self.human
    }

    /// Search the current game and play the chosen move.
    /// The game must not be over.
    fn engine_move(&mut self) -> Result<()> {
        let result = search(&mut self.game, self.depth);
        let Some(best_move) = result.best_move else {
            bail!("engine found no move at depth {}", self.depth);
        };
        self.game
            .do_legal_move(best_move)
            .with_context(|| format!("engine chose illegal move {best_move}"))?;
        info!(%best_move, score = %result.score, nodes = result.nodes, "engine moved");
        println!("Parry played move {best_move}.");
        println!("{result}");
        Ok(())
    }

    fn save(&self) -> Result<()> {
        let fen = self.game.position().to_fen();
        fs::write(&self.save_file, format!("{fen}\n"))
            .with_context(|| format!("failed to write {}", self.save_file.display()))?;
        info!(path = %self.save_file.display(), %fen, "saved position");
        println!("Position saved to {}.", self.save_file.display());
        Ok(())
    }

    /// Replace the game with the saved position, or a new game if it cannot be read.
    fn load(&mut self) {
        self.game = match load_position(&self.save_file) {
            Ok(position) => {
                info!(path = %self.save_file.display(), "loaded position");
                println!("Position loaded from {}.", self.save_file.display());
                Game::from(position)
            }
            Err(err) => {
                warn!("{err:#}");
                println!("Could not load a saved position ({err:#}). Starting a new game.");
                Game::start_position()
            }
        };
    }
}

fn load_position(path: &Path) -> Result<Position> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Position::parse_fen(text.trim()).with_context(|| format!("invalid FEN in {}", path.display()))
}

/// Depth the engine plays at. Zero is a valid search depth but never yields a move.
fn engine_depth(depth: i64) -> Result<PlyKind> {
    let depth = validate_depth(depth)?;
    ensure!(depth > 0, "the engine needs a depth of at least 1 to choose a move");
    Ok(depth)
}

/// Message announcing the end of a game, or None while it goes on.
fn end_message(status: GameStatus, human: Color) -> Option<&'static str> {
    match status {
        GameStatus::Ongoing => None,
        GameStatus::Checkmate { winner } if winner == human => Some("Checkmate! You win."),
        GameStatus::Checkmate { .. } => Some("Checkmate! Computer wins."),
        GameStatus::Stalemate => Some("Stalemate... Draw."),
        GameStatus::InsufficientMaterial => Some("Draw by insufficient material."),
        GameStatus::SeventyFiveMoves => Some("Draw by the seventy-five-move rule."),
        GameStatus::FivefoldRepetition => Some("Draw by fivefold repetition."),
    }
}

/// Print the outcome of the game, returning true if the game is over.
fn report_status(game: &Game, human: Color) -> bool {
    match end_message(game.status(), human) {
        Some(message) => {
            println!("{message}");
            true
        }
        None => {
            if game.position().is_in_check() {
                println!("Check!");
            }
            false
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("newgame | ng => Begin a new game.");
    println!("undo => Take back the engine's last move and your last move.");
    println!("save => Save the current position to the save file.");
    println!("load => Load the position from the save file.");
    println!("eval => Print the static evaluation of the current position.");
    println!("help => Print this help text.");
    println!("exit => End the game.");
    println!("\nTo make a move, enter a move in coordinate form.");
    println!("Examples: d2d4 -> Move piece on D2 to D4. e7e8q -> Promote to a queen.");
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let depth = engine_depth(args.depth).context("invalid --depth")?;

    let mut session = Session {
        game: Game::start_position(),
        human: args.color,
        depth,
        save_file: args.save_file,
    };
    if args.load {
        session.load();
    } else if let Some(fen) = &args.fen {
        let position = Position::parse_fen(fen).context("invalid --fen")?;
        session.game = Game::from(position);
    }
    info!(human = %session.human, depth, "starting game");

    println!("Parry CLI {}\n", env!("CARGO_PKG_VERSION"));
    println!("You play {}. Type help for commands.\n", session.human);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    // Set whenever the position changed since the last status report.
    let mut changed = true;

    loop {
        let mut game_over = match changed {
            true => report_status(&session.game, session.human),
            false => session.game.status().is_over(),
        };
        changed = false;

        if !game_over && session.game.position().side_to_move() == session.engine_color() {
            println!("{}\nthinking...", session.game.position());
            session.engine_move()?;
            game_over = report_status(&session.game, session.human);
        }

        if game_over {
            println!("{}", session.game.position());
            println!("Press Enter to start a new game.");
            if lines.next().transpose()?.is_none() {
                break;
            }
            session.game = Game::start_position();
            changed = true;
            continue;
        }

        println!("{}", session.game.position());
        print!("> ");
        io::stdout().flush()?;
        let Some(input) = lines.next().transpose()? else {
            break;
        };
        let input = input.trim();

        match InputKind::from(input) {
            InputKind::Exit => break,
            InputKind::Newgame => {
                session.game = Game::start_position();
                changed = true;
                println!("Starting new game...");
            }
            InputKind::Help => print_help(),
            InputKind::Undo => {
                // Undo both computer's move and player's last move.
                for _ in 0..2 {
                    if let Some(move_) = session.game.undo() {
                        println!("Undo move {move_}.");
                        changed = true;
                    }
                }
            }
            InputKind::Save => {
                if let Err(err) = session.save() {
                    warn!("{err:#}");
                    println!("Could not save the position: {err:#}");
                }
            }
            InputKind::Load => {
                session.load();
                changed = true;
            }
            InputKind::Eval => {
                println!("Current Static cp: {}", evaluate_abs(session.game.position()));
            }
            InputKind::Error => println!("Invalid command: {input}"),
            InputKind::GameMove(move_) => {
                match session.game.do_legal_move(move_) {
                    Ok(_) => changed = true,
                    Err(_) => println!("That move was illegal! No action taken."),
                }
            }
        }
    }
    Ok(())
}
