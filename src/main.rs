use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use connect4_core::{
    play_game, play_series, BitBoard, Color, HumanPlayer, PlayError, Player, SearchOptions,
    WindowEvaluator,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Side {
    Human,
    Engine,
}

/// Play Connect Four against a time-bounded alpha-beta engine.
#[derive(Parser, Debug)]
#[command(name = "connect4", about = "Connect Four against an alpha-beta engine")]
struct Cli {
    /// Who plays red (moves first)
    #[arg(long, value_enum, default_value = "human")]
    red: Side,

    /// Who plays yellow
    #[arg(long, value_enum, default_value = "engine")]
    yellow: Side,

    /// Seconds the engine may think per move
    #[arg(long, default_value_t = 1.0)]
    timeout: f64,

    /// Search exactly this many plies per move instead of using the timeout
    #[arg(long)]
    depth: Option<i32>,

    /// Seed for the move-order randomizer
    #[arg(long)]
    seed: Option<u64>,

    /// Probability of swapping neighbouring columns in the move order, 0 disables
    #[arg(long, default_value_t = 0.3)]
    randomness: f64,

    /// Disable the per-depth position cache
    #[arg(long)]
    no_cache: bool,

    /// Play this many engine-only games in parallel and print a summary
    #[arg(long)]
    games: Option<usize>,

    /// Threads for --games, defaults to the number of CPUs
    #[arg(long)]
    threads: Option<usize>,

    /// Log every finished search depth
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn search_options(&self, seed_offset: u64) -> Result<SearchOptions> {
        let timeout = Duration::try_from_secs_f64(self.timeout)
            .with_context(|| format!("invalid timeout {}", self.timeout))?;
        let mut options = SearchOptions::default().with_timeout(timeout);
        if let Some(depth) = self.depth {
            options = options.with_fixed_depth(depth);
        }
        if let Some(seed) = self.seed {
            options = options.with_seed(seed.wrapping_add(seed_offset));
        }
        // only an exact 0 turns the randomizer off, anything else is validated
        options = if self.randomness == 0.0 {
            options.deterministic()
        } else {
            options.with_randomness(self.randomness)
        };
        if self.no_cache {
            options = options.without_cache();
        }
        options.validate()?;
        Ok(options)
    }

    fn engine(&self, color: Color, seed_offset: u64) -> Result<Box<dyn Player<BitBoard> + Send>> {
        let player = self
            .search_options(seed_offset)?
            .build_player(color, WindowEvaluator)?;
        Ok(player)
    }

    fn player(&self, color: Color) -> Result<Box<dyn Player<BitBoard>>> {
        let side = match color {
            Color::Red => self.red,
            Color::Yellow => self.yellow,
        };
        let player: Box<dyn Player<BitBoard>> = match side {
            Side::Human => Box::new(HumanPlayer::stdio(color)),
            Side::Engine => self.engine(color, color as u64)?,
        };
        Ok(player)
    }
}

fn run_series(cli: &Cli, games: usize) -> Result<()> {
    if cli.red == Side::Human || cli.yellow == Side::Human {
        bail!("--games only plays engine against engine, pass --red engine --yellow engine");
    }
    let red = cli.search_options(0)?;
    let yellow = cli.search_options(1)?;
    info!(games, threads = ?cli.threads, "series started");
    let summary = play_series(games, cli.threads, &BitBoard::standard(), |game| {
        // Every game gets its own pair of seeds.
        let reseed = |options: &SearchOptions, offset: u64| match cli.seed {
            Some(seed) => options.clone().with_seed(seed.wrapping_add(offset)),
            None => options.clone(),
        };
        let offset = 2 * game as u64;
        Ok((
            reseed(&red, offset).build_player(Color::Red, WindowEvaluator)?,
            reseed(&yellow, offset + 1).build_player(Color::Yellow, WindowEvaluator)?,
        ))
    })?;
    println!("{summary}");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Some(games) = cli.games {
        return run_series(&cli, games);
    }

    let mut red = cli.player(Color::Red)?;
    let mut yellow = cli.player(Color::Yellow)?;
    info!(red = %red.name(), yellow = %yellow.name(), "game started");

    match play_game(red.as_mut(), yellow.as_mut(), BitBoard::standard()) {
        Ok(outcome) => {
            println!("\nGAME FINISHED - {}:\n{}", outcome.result, outcome.board);
            println!("moves: {:?}", outcome.moves);
            Ok(())
        }
        Err(PlayError::Quit) => Ok(()),
        Err(err) => Err(err).context("game aborted"),
    }
}
