#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]

use std::path::PathBuf;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use timing_maze::simulation::environment::{run_episode, TimingMaze};
use timing_maze::simulation::params::{
    DEFAULT_MAX_DOOR_FREQUENCY, DEFAULT_RADIUS, DEMO_HEIGHT, DEMO_TURNS, DEMO_WIDTH,
};
use timing_maze::simulation::{Navigator, NavigatorConfig};

/// Runs one navigator through a randomly generated timing maze.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Seed for both the maze and the navigator
    #[arg(long, default_value_t = 0)]
    seed: u64,

    #[arg(long, default_value_t = DEMO_WIDTH)]
    width: usize,

    #[arg(long, default_value_t = DEMO_HEIGHT)]
    height: usize,

    /// Largest door period in the generated maze
    #[arg(long, default_value_t = DEFAULT_MAX_DOOR_FREQUENCY)]
    max_period: u64,

    /// Sensor radius in cells
    #[arg(long, default_value_t = DEFAULT_RADIUS)]
    radius: u32,

    /// Chance of a random exploration move
    #[arg(long, default_value_t = 0.0)]
    epsilon: f64,

    /// Give up after this many turns
    #[arg(long, default_value_t = DEMO_TURNS)]
    turns: u64,

    /// JSON navigator config; overrides --max-period, --radius and --epsilon
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => NavigatorConfig::from_json_file(path)?,
        None => NavigatorConfig::new(args.max_period, args.radius).with_epsilon(args.epsilon),
    };

    let mut rng = StdRng::seed_from_u64(args.seed);
    let goal = (args.width.saturating_sub(1), args.height.saturating_sub(1));
    let mut maze =
        TimingMaze::random(args.width, args.height, (0, 0), goal, args.max_period, &mut rng)?;
    let mut navigator = Navigator::with_seed(config, args.seed)?;

    info!(width = args.width, height = args.height, seed = args.seed, "starting episode");
    let report = run_episode(&mut maze, &mut navigator, args.turns);

    println!(
        "reached goal: {} | turns: {} | waits: {} ({:.0}%) | rejected moves: {} | cells known: {}",
        report.reached_goal,
        report.turns,
        report.waits,
        100.0 * report.waits as f64 / report.turns.max(1) as f64,
        report.rejected_moves,
        navigator.model().known_cells(),
    );
    Ok(())
}
