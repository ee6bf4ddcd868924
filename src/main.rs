use anyhow::Result;
use clap::Parser;
use log::LevelFilter;
use snake_dqn::game::GameConfig;
use snake_dqn::logging::init_logging;
use snake_dqn::modes::{TrainConfig, TrainMode};
use snake_dqn::rl::{TrainingBackend, default_device};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "snake_dqn")]
#[command(version, about = "Train a deep Q-learning agent to play snake")]
struct Cli {
    /// Field width in pixels
    #[arg(long, default_value = "800")]
    width: u32,

    /// Field height in pixels
    #[arg(long, default_value = "600")]
    height: u32,

    /// Edge length of one grid cell in pixels
    #[arg(long, default_value = "10")]
    cell_size: u32,

    /// Stop after this many games (default: run until interrupted)
    #[arg(long)]
    games: Option<usize>,

    /// Milliseconds between steps (default or 0: as fast as possible)
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Seed for exploration, replay sampling and fruit placement
    #[arg(long)]
    seed: Option<u64>,

    /// Directory new records are saved to
    #[arg(long, default_value = "models")]
    model_dir: PathBuf,

    /// Name of the saved model
    #[arg(long, default_value = "snake")]
    model_name: String,

    /// Continue training a previously saved model
    #[arg(long)]
    load: Option<PathBuf>,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.log_level);

    let mut config = TrainConfig::new(cli.model_dir, cli.model_name);
    config.game_config = GameConfig {
        cell_size: cli.cell_size,
        ..GameConfig::new(cli.width, cli.height)
    };
    config.dqn_config.seed = cli.seed;
    config.max_games = cli.games;
    config.tick_interval = cli
        .tick_ms
        .filter(|&ms| ms > 0)
        .map(Duration::from_millis);
    config.load_path = cli.load;

    let mut train_mode = TrainMode::<TrainingBackend>::new(config, default_device())?;
    train_mode.run().await?;

    Ok(())
}
