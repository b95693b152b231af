//! # Pairlink Main Entry Point
//!
//! Sets up logging and configuration, generates a board and runs a line-driven game loop
//! on the terminal.

use clap::Parser;
use log::{debug, error, info};
use pairlink::{
    render_board, render_status, ActivationOutcome, BoardManager, Command, GameConfig,
    GenerationMode, InputHandler, MessageLog, PairlinkError, PairlinkResult, Position, Session,
    HELP_TEXT,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

/// Command line arguments for Pairlink.
#[derive(Parser, Debug)]
#[command(name = "pairlink")]
#[command(about = "A tile-matching puzzle: connect pairs with at most two turns")]
#[command(version)]
struct Args {
    /// Random seed for board generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// Board height in cells
    #[arg(long)]
    rows: Option<usize>,

    /// Board width in cells
    #[arg(long)]
    cols: Option<usize>,

    /// Number of distinct tile types
    #[arg(long)]
    types: Option<usize>,

    /// Generation mode (classic, ingredient)
    #[arg(long)]
    mode: Option<GenerationMode>,

    /// Number of players sharing the board (1 or 2)
    #[arg(short, long)]
    players: Option<usize>,

    /// JSON configuration file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Disable automatic power tile spawns
    #[arg(long)]
    no_power_tiles: bool,

    /// Only advance the clock with the tick command instead of wall time
    #[arg(long)]
    manual_clock: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() {
    let args = Args::parse();
    initialize_logging(&args.log_level);

    info!("Starting Pairlink v{}", pairlink::VERSION);

    if let Err(e) = run(&args) {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Initializes `env_logger`; `RUST_LOG` takes precedence over `--log-level`.
fn initialize_logging(log_level: &str) {
    let mut builder = env_logger::Builder::new();
    builder.parse_filters(log_level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.format_timestamp(None).init();
}

/// Merges the configuration file with command line overrides.
fn build_config(args: &Args) -> PairlinkResult<GameConfig> {
    let mut config = match &args.config {
        Some(path) => GameConfig::from_json_file(path)?,
        None => GameConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.generation.seed = Some(seed);
    }
    if let Some(rows) = args.rows {
        config.generation.rows = rows;
    }
    if let Some(cols) = args.cols {
        config.generation.cols = cols;
    }
    if let Some(types) = args.types {
        config.generation.type_count = types;
    }
    if let Some(mode) = args.mode {
        config.generation.mode = mode;
    }
    if let Some(players) = args.players {
        config.session.players = players;
    }
    if args.no_power_tiles {
        config.session.spawn_power_tiles = false;
    }

    config.validate()?;
    Ok(config)
}

fn run(args: &Args) -> PairlinkResult<()> {
    let config = build_config(args)?;
    debug!("Configuration: {:?}", config);

    let mut session = Session::new(&config)?;
    let input = InputHandler::new(config.session.players);
    let mut log = MessageLog::default();
    let mut clock = Instant::now();

    println!("{}", HELP_TEXT);
    draw(&session, &log);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;

        if !args.manual_clock {
            let secs = clock.elapsed().as_secs();
            if secs > 0 {
                session.tick(secs);
                clock = Instant::now();
            }
        }

        let command = match input.parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        if command == Command::Quit {
            break;
        }
        if command.is_game_action() {
            debug!("Executing {:?}", command);
        }

        match execute(&mut session, &config, command) {
            Ok(message) => log.add_message(message),
            Err(e) => log.add_message(e.to_string()),
        }
        draw(&session, &log);

        if session.status().is_over() {
            println!("Game over. Type 'new' to play again or 'quit' to leave.");
        }
    }

    info!("Goodbye");
    Ok(())
}

fn execute(
    session: &mut Session,
    config: &GameConfig,
    command: Command,
) -> PairlinkResult<String> {
    match command {
        Command::Pick { player, row, col } => {
            activate_at(session, player, Position::new(row, col))
        }
        Command::Click { player, x, y } => {
            let position = session
                .board()
                .layout()
                .cell_at(x, y)
                .ok_or_else(|| PairlinkError::InvalidAction("no cell at that point".to_string()))?;
            activate_at(session, player, position)
        }
        Command::Tick(secs) => {
            let status = session.tick(secs);
            Ok(format!("Advanced {}s ({:?})", secs, status))
        }
        Command::Hint => Ok(match session.board().find_hint_pair() {
            Some((a, b)) => format!("Try {} and {}", a.position, b.position),
            None => "No pair can be connected".to_string(),
        }),
        Command::Pause => Ok(if session.toggle_pause() {
            "Paused".to_string()
        } else {
            "Resumed".to_string()
        }),
        Command::Show => Ok(String::new()),
        Command::Save(path) => {
            let written = session.save(&path)?;
            Ok(format!("Saved to {}", written.display()))
        }
        Command::Load(path) => {
            session.load(&path)?;
            Ok(format!("Loaded {}", path.display()))
        }
        Command::NewGame => {
            let mut generation = config.generation.clone();
            generation.seed = None;
            let board = BoardManager::generate(&generation)?;
            *session = Session::with_board(board, config.session.clone())?;
            Ok("New board".to_string())
        }
        Command::Help => Ok(HELP_TEXT.to_string()),
        Command::Quit => Ok(String::new()),
    }
}

fn activate_at(
    session: &mut Session,
    player: usize,
    position: Position,
) -> PairlinkResult<String> {
    let tile = session
        .board()
        .tile_at(position)
        .map(|tile| tile.id)
        .ok_or_else(|| PairlinkError::InvalidAction(format!("no tile at {}", position)))?;

    let message = match session.activate(player, tile)? {
        ActivationOutcome::Selected => format!("Selected {}", position),
        ActivationOutcome::AlreadySelected => format!("{} is already selected", position),
        ActivationOutcome::Reselected => format!("No link; selected {} instead", position),
        ActivationOutcome::Matched { path, .. } => {
            let cells: Vec<String> = path.points().iter().map(|p| p.to_string()).collect();
            format!("Matched along {}", cells.join(" -> "))
        }
        ActivationOutcome::ToolUsed(tool) => format!("Used {:?}", tool),
    };
    Ok(message)
}

fn draw(session: &Session, log: &MessageLog) {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let _ = writeln!(out, "\n{}", render_board(session.board()));
    let _ = writeln!(out, "{}", render_status(session));
    for message in log.recent(3).iter().filter(|m| !m.is_empty()) {
        let _ = writeln!(out, "  {}", message);
    }
    let _ = out.flush();
}
