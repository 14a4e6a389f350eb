#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Maze Chase games headlessly.

mod layout;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use maze_chase_world::{BehaviorKind, Config, Game, SearchStrategy, DEFAULT_SEED};
use tracing_subscriber::EnvFilter;

/// Runs seeker-versus-trackers games on a maze layout.
#[derive(Debug, Parser)]
#[command(name = "maze-chase", version)]
struct Args {
    /// Path to a `.lay` layout file.
    #[arg(short, long, value_name = "PATH")]
    layout: PathBuf,

    /// Behavior controlling the seeker.
    #[arg(long, value_enum, default_value = "pursuit")]
    seeker: Kind,

    /// Behavior controlling every tracker.
    #[arg(long, value_enum, default_value = "idle")]
    trackers: Kind,

    /// Maximum number of trackers taken from the layout.
    #[arg(short = 'k', long, default_value_t = 4)]
    tracker_count: usize,

    /// Number of games played back to back.
    #[arg(short = 'n', long, default_value_t = 1)]
    games: u32,

    /// Seed for stochastic behaviors. A fresh seed is drawn when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Play with the built-in fixed seed.
    #[arg(short = 'f', long, conflicts_with = "seed")]
    fix_seed: bool,

    /// Tick limit after which an unfinished game is abandoned.
    #[arg(long, default_value_t = 10_000)]
    max_ticks: u64,

    /// Path search used by pursuing behaviors.
    #[arg(long, value_enum, default_value = "bfs")]
    search: Search,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Kind {
    /// Never moves.
    Idle,
    /// Uniformly random cardinal moves.
    Random,
    /// Follows external input; stands still when none arrives.
    Steered,
    /// Spreads away from other trackers.
    Dispersal,
    /// Chases the nearest tracker along a shortest path.
    Pursuit,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Search {
    /// Breadth-first search.
    Bfs,
    /// A* with a Manhattan heuristic.
    Astar,
}

impl From<Search> for SearchStrategy {
    fn from(search: Search) -> Self {
        match search {
            Search::Bfs => Self::BreadthFirst,
            Search::Astar => Self::AStar,
        }
    }
}

impl Args {
    fn seed(&self) -> u64 {
        match (self.seed, self.fix_seed) {
            (Some(seed), _) => seed,
            (None, true) => DEFAULT_SEED,
            (None, false) => rand::random(),
        }
    }
}

impl Kind {
    fn behavior(self, search: Search) -> BehaviorKind {
        match self {
            Self::Idle => BehaviorKind::Idle,
            Self::Random => BehaviorKind::Random,
            Self::Steered => BehaviorKind::Steered,
            Self::Dispersal => BehaviorKind::Dispersal,
            Self::Pursuit => BehaviorKind::Pursuit(search.into()),
        }
    }
}

/// Entry point for the Maze Chase command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let rows = layout::load_layout(&args.layout)?;
    let seed = args.seed();
    tracing::info!(seed, "seeding behaviors");

    let mut game = Game::new(
        &rows,
        args.seeker.behavior(args.search),
        args.trackers.behavior(args.search),
        args.tracker_count,
        Config::new(seed),
    )
    .with_context(|| format!("invalid layout {}", args.layout.display()))?;

    for round in 1..=args.games {
        let outcome = game
            .run(args.max_ticks)
            .with_context(|| format!("game {round} aborted"))?;
        tracing::info!(
            round,
            score = outcome.score,
            ticks = outcome.ticks,
            finished = outcome.finished,
            "game over"
        );
        println!(
            "game {round}: {} score={} ticks={} captured={}",
            if outcome.finished { "won" } else { "timed out" },
            outcome.score,
            outcome.ticks,
            outcome.captured,
        );
        game.reset();
    }

    Ok(())
}
