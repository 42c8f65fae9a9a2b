//! Benchmarks for the HGS-VRPTW algorithm.

#[cfg(feature = "bench")]
extern crate criterion;

#[cfg(feature = "bench")]
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use hgs_vrptw::config::Config;
use hgs_vrptw::{
    GeneticAlgorithm, LocalSearch, MaxIterations, Node, OrderedCrossover, PenaltyManager,
    Population, ProblemData, RandomNumberGenerator, Relocate, Solution, Swap, SwapStar,
    TwoOptStar,
};
use std::time::Duration;

/// Create a benchmark problem of specified size.
fn create_benchmark_problem(size: usize) -> ProblemData {
    let mut nodes = vec![Node::new(0.0, 0.0, 0.0).with_time_window(0.0, 10_000.0)];

    // Clients in a grid arrangement with staggered windows
    let grid_size = (size as f64).sqrt().ceil() as usize;
    for i in 1..=size {
        let row = (i - 1) / grid_size;
        let col = (i - 1) % grid_size;
        let x = col as f64 * 10.0;
        let y = row as f64 * 10.0;
        let early = (i % 10) as f64 * 100.0;
        nodes.push(
            Node::new(x, y, 1.0)
                .with_time_window(early, early + 400.0)
                .with_service_duration(5.0),
        );
    }

    ProblemData::new(format!("BenchProblem_{}", size), nodes, 10.0, (size / 5).max(1))
}

fn create_local_search(data: &ProblemData, config: &Config) -> LocalSearch<'_> {
    let mut local_search = LocalSearch::new(data, config.granularity)
        .with_overlap_tolerance_degrees(config.overlap_tolerance_degrees);
    local_search.add_node_operator(Box::new(Relocate));
    local_search.add_node_operator(Box::new(Swap));
    local_search.add_node_operator(Box::new(TwoOptStar));
    local_search.add_route_operator(Box::new(SwapStar));
    local_search
}

#[cfg(feature = "bench")]
fn benchmark_local_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("local_search");

    for size in [50, 100, 200].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let data = create_benchmark_problem(size);
            let config = Config::new().with_granularity(20);
            let mut local_search = create_local_search(&data, &config);
            let cost_evaluator = PenaltyManager::new(config.penalty.clone())
                .unwrap()
                .get_cost_evaluator();

            let mut rng = RandomNumberGenerator::new(config.seed);
            let solution = Solution::make_random(&data, &mut rng).unwrap();

            b.iter(|| {
                local_search
                    .run(&solution, &cost_evaluator, true, &mut rng)
                    .unwrap()
            });
        });
    }

    group.finish();
}

#[cfg(feature = "bench")]
fn benchmark_iterations(c: &mut Criterion) {
    let mut group = c.benchmark_group("iterations");
    group.measurement_time(Duration::from_secs(30));

    for size in [50, 100].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let data = create_benchmark_problem(size);
            let config = Config::new().with_granularity(20);

            b.iter(|| {
                let mut rng = RandomNumberGenerator::new(config.seed);
                let initial = (0..config.initial_population_size)
                    .map(|_| Solution::make_random(&data, &mut rng).unwrap())
                    .collect();

                let mut algorithm = GeneticAlgorithm::new(
                    &data,
                    Population::new(config.population.clone()).unwrap(),
                    PenaltyManager::new(config.penalty.clone()).unwrap(),
                    rng,
                    create_local_search(&data, &config),
                    OrderedCrossover,
                    initial,
                    config.genetic.clone(),
                )
                .unwrap();

                algorithm.run(&mut MaxIterations::new(100), false).unwrap()
            });
        });
    }

    group.finish();
}

#[cfg(feature = "bench")]
criterion_group!(benches, benchmark_local_search, benchmark_iterations);

#[cfg(feature = "bench")]
criterion_main!(benches);
