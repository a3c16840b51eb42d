//! Tile Merge entry point
//!
//! Headless front end: prints the board as text and either plays a scripted
//! list of moves or auto-plays random moves.

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use tile_merge::sim::{Direction, GameState, MergePolicy, TickOutcome};
use tile_merge::{Difficulty, HighScores, Session, Settings};

#[derive(Parser, Debug)]
#[command(name = "tile-merge", about = "Sliding-tile merge puzzle")]
struct Args {
    /// Board preset: easy (4x4), medium (5x5) or hard (6x6).
    #[arg(long, value_parser = parse_difficulty)]
    difficulty: Option<Difficulty>,
    /// Explicit board size, overriding the preset.
    #[arg(long)]
    size: Option<usize>,
    /// RNG seed for a reproducible game.
    #[arg(long)]
    seed: Option<u64>,
    /// Settings JSON file; flags take precedence over its values.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Comma-separated moves to play instead of auto-play, e.g. "L,U,R,D".
    #[arg(long)]
    moves: Option<String>,
    /// Number of auto-played runs.
    #[arg(long, default_value_t = 1)]
    games: u32,
    /// Pause between auto-play moves in milliseconds.
    #[arg(long)]
    delay_ms: Option<u64>,
    /// Cap on moves per auto-played run.
    #[arg(long)]
    max_moves: Option<u32>,
    /// Merge rule: per-tile or per-row.
    #[arg(long)]
    merge_policy: Option<MergePolicy>,
    /// Print only a JSON summary at the end.
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Summary<'a> {
    seed: u64,
    grid_size: usize,
    final_state: &'a GameState,
    high_scores: &'a HighScores,
}

fn parse_difficulty(s: &str) -> Result<Difficulty, String> {
    Difficulty::from_str(s).ok_or_else(|| format!("unknown difficulty `{s}`"))
}

fn build_settings(args: &Args) -> Result<Settings> {
    let mut settings = match &args.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };
    if let Some(difficulty) = args.difficulty {
        settings.difficulty = difficulty;
        settings.grid_size = None;
    }
    if args.size.is_some() {
        settings.grid_size = args.size;
    }
    if args.seed.is_some() {
        settings.seed = args.seed;
    }
    if let Some(delay) = args.delay_ms {
        settings.auto_play_delay_ms = delay;
    }
    if let Some(max_moves) = args.max_moves {
        settings.max_auto_moves = max_moves;
    }
    if let Some(policy) = args.merge_policy {
        settings.merge_policy = policy;
    }
    settings.validate()?;
    Ok(settings)
}

fn render(state: &GameState) {
    print!("{}", state.grid);
    println!(
        "Score: {}  Highest Score: {}",
        state.score, state.highest_score
    );
    if state.is_game_over() {
        println!("Game Over");
    }
    println!();
}

fn play_scripted(session: &mut Session, moves: &str, quiet: bool) -> Result<()> {
    let directions = moves
        .split(',')
        .filter(|token| !token.trim().is_empty())
        .map(|token| token.parse::<Direction>())
        .collect::<Result<Vec<_>, _>>()
        .context("parsing --moves")?;

    for direction in directions {
        let outcome = session.play(direction);
        if quiet {
            continue;
        }
        match outcome {
            TickOutcome::Moved(report) if !report.changed => {
                println!("{direction}: nothing moved");
            }
            TickOutcome::Frozen => {
                println!("{direction}: game is over");
                break;
            }
            _ => {
                println!("{direction}:");
                render(session.state());
            }
        }
    }
    Ok(())
}

fn play_auto(session: &mut Session, games: u32, quiet: bool) {
    let delay = Duration::from_millis(session.settings().auto_play_delay_ms);
    for game in 1..=games {
        if game > 1 {
            session.replay();
        }
        let summary = session.auto_play(|state, report| {
            if quiet {
                return;
            }
            println!("{}:", report.direction);
            render(state);
            if !delay.is_zero() {
                thread::sleep(delay);
            }
        });
        if !quiet {
            println!(
                "Run {game}: score {} after {} moves{}",
                summary.score,
                summary.moves,
                if summary.game_over { "" } else { " (stopped)" }
            );
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    log::info!("Tile Merge starting...");

    let settings = build_settings(&args)?;
    let mut session = Session::new(settings)?;

    if !args.json {
        render(session.state());
    }

    match &args.moves {
        Some(moves) => play_scripted(&mut session, moves, args.json)?,
        None => play_auto(&mut session, args.games, args.json),
    }

    if args.json {
        let summary = Summary {
            seed: session.seed(),
            grid_size: session.state().size(),
            final_state: session.state(),
            high_scores: session.high_scores(),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else if let Some(top) = session.high_scores().top_score() {
        println!("Best run this session: {top}");
    }

    Ok(())
}
