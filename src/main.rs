//! Command-line solver for VRPTW instances.

use clap::Parser;
use hgs_vrptw::utils::{format_duration, print_solution_visualization, save_solution};
use hgs_vrptw::{
    AnyOf, Config, GeneticAlgorithm, LocalSearch, MaxIterations, MaxRuntime, NoImprovement,
    OrderedCrossover, PenaltyManager, Population, ProblemData, RandomNumberGenerator, Relocate,
    RelocateStar, Solution, Swap, SwapStar, TwoOpt, TwoOptStar,
};
use log::{info, warn};
use std::fs;
use std::path::PathBuf;

/// Iterations without improvement before an unbounded run stops.
const DEFAULT_PATIENCE: usize = 20_000;

#[derive(Parser)]
#[command(name = "hgs_vrptw")]
#[command(about = "Hybrid Genetic Search for the VRP with time windows")]
struct Cli {
    /// Instance file to solve
    instance: PathBuf,

    /// JSON configuration file; missing fields take their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Random seed, overriding the configuration
    #[arg(short, long)]
    seed: Option<u64>,

    /// Wall-clock limit in seconds
    #[arg(long)]
    max_runtime: Option<f64>,

    /// Maximum number of iterations
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Where to write the best solution
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write per-iteration statistics to this CSV file
    #[arg(long)]
    stats: Option<PathBuf>,

    /// Write the full result as JSON to this file
    #[arg(long)]
    json: Option<PathBuf>,

    /// Print an ASCII rendering of the best solution
    #[arg(long)]
    visualize: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    if let Some(seconds) = cli.max_runtime {
        config = config.with_time_limit_secs(seconds)?;
    }
    if let Some(iterations) = cli.max_iterations {
        config = config.with_max_iterations(iterations);
    }
    config.validate()?;

    info!("Loading problem from: {}", cli.instance.display());
    let data = ProblemData::from_file(&cli.instance)?;
    info!(
        "Loaded problem: {} with {} clients and {} vehicles",
        data.name,
        data.num_clients(),
        data.num_vehicles
    );

    let mut rng = RandomNumberGenerator::new(config.seed);

    let mut local_search = LocalSearch::new(&data, config.granularity)
        .with_overlap_tolerance_degrees(config.overlap_tolerance_degrees);
    local_search.add_node_operator(Box::new(Relocate));
    local_search.add_node_operator(Box::new(Swap));
    local_search.add_node_operator(Box::new(TwoOpt));
    local_search.add_node_operator(Box::new(TwoOptStar));
    local_search.add_route_operator(Box::new(SwapStar));
    local_search.add_route_operator(Box::new(RelocateStar));

    let initial = (0..config.initial_population_size)
        .map(|_| Solution::make_random(&data, &mut rng))
        .collect::<hgs_vrptw::Result<Vec<_>>>()?;

    let mut algorithm = GeneticAlgorithm::new(
        &data,
        Population::new(config.population.clone())?,
        PenaltyManager::new(config.penalty.clone())?,
        rng,
        local_search,
        OrderedCrossover,
        initial,
        config.genetic.clone(),
    )?;

    let mut stop = AnyOf::default();
    if let Some(limit) = config.time_limit {
        stop = stop.with(Box::new(MaxRuntime::new(limit)));
    }
    if let Some(iterations) = config.max_iterations {
        stop = stop.with(Box::new(MaxIterations::new(iterations)));
    }
    if stop.is_empty() {
        warn!(
            "No time or iteration limit given; stopping after {} iterations without improvement",
            DEFAULT_PATIENCE
        );
        stop = stop.with(Box::new(NoImprovement::new(DEFAULT_PATIENCE)));
    }

    let result = algorithm.run(&mut stop, cli.stats.is_some())?;

    info!("Search completed in {}", format_duration(result.runtime));
    println!("{}", result);

    if let Some(path) = &cli.output {
        info!("Saving solution to: {}", path.display());
        save_solution(&result.best, &data, path)?;
    }
    if let Some(path) = &cli.stats {
        result.stats.to_csv(path)?;
    }
    if let Some(path) = &cli.json {
        fs::write(path, serde_json::to_string_pretty(&result)?)?;
    }
    if cli.visualize {
        print_solution_visualization(&result.best, &data);
    }

    Ok(())
}
