//! Terminal Minesweeper.
use anyhow::{Context, Result};
use clap::Parser;
use clap_verbosity_flag::Verbosity;
use minesweeper_core::{Game, GameConfig, MAX_GRID_SIZE, RandomMinefieldGenerator};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

mod input;
mod render;
mod repl;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Side length of the square grid
    #[arg(short, long, default_value_t = GameConfig::default().grid_size,
          value_parser = clap::value_parser!(u8).range(1..=i64::from(MAX_GRID_SIZE)))]
    size: u8,

    /// Number of mines to place
    #[arg(short, long, default_value_t = GameConfig::default().num_bombs)]
    bombs: u16,

    /// Force a seed instead of random
    #[arg(long)]
    seed: Option<u64>,

    /// What log level to use
    #[command(flatten)]
    verbose: Verbosity,
}

fn init_logging(verbose: &Verbosity) {
    let level = match verbose.log_level_filter() {
        log::LevelFilter::Off => LevelFilter::OFF,
        log::LevelFilter::Error => LevelFilter::ERROR,
        log::LevelFilter::Warn => LevelFilter::WARN,
        log::LevelFilter::Info => LevelFilter::INFO,
        log::LevelFilter::Debug => LevelFilter::DEBUG,
        log::LevelFilter::Trace => LevelFilter::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.verbose);
    log::debug!("seed: {:?}", args.seed);

    let config = GameConfig::new(args.size, args.bombs).context("Invalid game configuration")?;
    let generator = match args.seed {
        Some(seed) => RandomMinefieldGenerator::new(seed),
        None => RandomMinefieldGenerator::from_entropy(),
    };
    log::info!(
        "Starting {}x{} game with {} mines, seed {}",
        config.grid_size,
        config.grid_size,
        config.num_bombs,
        generator.seed()
    );

    let mut game = Game::with_config(config, generator);
    let ending = repl::run(&mut game, std::io::stdin().lock(), &mut std::io::stdout().lock())?;
    log::info!("Session finished: {:?}", ending);

    Ok(())
}
