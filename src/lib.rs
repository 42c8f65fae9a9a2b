//! # HGS-VRPTW
//!
//! A Rust implementation of the Hybrid Genetic Search algorithm for the
//! Vehicle Routing Problem with capacity and time-window constraints.
//!
//! Based on the paper "Hybrid Genetic Search for the CVRP: Open-Source Implementation
//! and SWAP* Neighborhood" by Thibaut Vidal.
//!
//! The algorithm combines genetic search with local improvement heuristics and
//! strategic management of population diversity. Infeasible solutions are kept
//! in a separate subpopulation and steered towards feasibility by adaptive
//! penalties on excess load and time warp.
//!
//! ```no_run
//! use hgs_vrptw::{
//!     Config, GeneticAlgorithm, LocalSearch, MaxIterations, OrderedCrossover, PenaltyManager,
//!     Population, ProblemData, RandomNumberGenerator, Relocate, Solution, Swap, SwapStar,
//! };
//!
//! # fn main() -> hgs_vrptw::Result<()> {
//! let data = ProblemData::from_file("instance.txt")?;
//! let config = Config::default();
//! let mut rng = RandomNumberGenerator::new(config.seed);
//!
//! let mut local_search = LocalSearch::new(&data, config.granularity)
//!     .with_overlap_tolerance_degrees(config.overlap_tolerance_degrees);
//! local_search.add_node_operator(Box::new(Relocate));
//! local_search.add_node_operator(Box::new(Swap));
//! local_search.add_route_operator(Box::new(SwapStar));
//!
//! let initial = (0..config.initial_population_size)
//!     .map(|_| Solution::make_random(&data, &mut rng))
//!     .collect::<hgs_vrptw::Result<Vec<_>>>()?;
//!
//! let mut ga = GeneticAlgorithm::new(
//!     &data,
//!     Population::new(config.population.clone())?,
//!     PenaltyManager::new(config.penalty.clone())?,
//!     rng,
//!     local_search,
//!     OrderedCrossover,
//!     initial,
//!     config.genetic.clone(),
//! )?;
//!
//! let result = ga.run(&mut MaxIterations::new(1_000), false)?;
//! println!("{}", result);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod cost_evaluator;
pub mod crossover;
pub mod error;
pub mod genetic;
pub mod individual;
pub mod local_search;
pub mod penalty_manager;
pub mod population;
pub mod problem;
pub mod result;
pub mod rng;
pub mod solution;
pub mod split;
pub mod statistics;
pub mod stop;
pub mod utils;

pub use crate::config::{Config, GeneticAlgorithmParams, PenaltyParams, PopulationParams};
pub use crate::cost_evaluator::CostEvaluator;
pub use crate::crossover::{Crossover, OrderedCrossover};
pub use crate::error::{Error, Result};
pub use crate::genetic::GeneticAlgorithm;
pub use crate::local_search::{
    LocalSearch, NodeOperator, Relocate, RelocateStar, RouteOperator, Swap, SwapStar, TwoOpt,
    TwoOptStar,
};
pub use crate::penalty_manager::PenaltyManager;
pub use crate::population::Population;
pub use crate::problem::{Node, ProblemData, DEPOT};
pub use crate::result::SearchResult;
pub use crate::rng::RandomNumberGenerator;
pub use crate::solution::{Route, Solution};
pub use crate::split::Split;
pub use crate::statistics::Statistics;
pub use crate::stop::{AnyOf, MaxIterations, MaxRuntime, NoImprovement, StoppingCriterion};
