//! Configuration parameters for the HGS-VRPTW algorithm.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

fn check_probability(name: &'static str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::invalid_parameter(name, value, "must lie in [0, 1]"))
    }
}

fn check_positive(name: &'static str, value: usize) -> Result<()> {
    if value > 0 {
        Ok(())
    } else {
        Err(Error::invalid_parameter(name, value, "must be positive"))
    }
}

/// Parameters steering the genetic algorithm loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneticAlgorithmParams {
    /// Probability of repairing an infeasible offspring with boosted penalties
    pub repair_probability: f64,
    /// Number of consecutive non-improving iterations before the population restarts
    pub nb_iter_no_improvement: usize,
    /// Probability of running the route operators after the node operators
    pub intensify_probability: f64,
    /// Run an unrestricted intensification on every new best solution
    pub intensify_on_best: bool,
}

impl Default for GeneticAlgorithmParams {
    fn default() -> Self {
        GeneticAlgorithmParams {
            repair_probability: 0.80,
            nb_iter_no_improvement: 20_000,
            intensify_probability: 0.15,
            intensify_on_best: true,
        }
    }
}

impl GeneticAlgorithmParams {
    pub fn new() -> Self {
        GeneticAlgorithmParams::default()
    }

    pub fn with_repair_probability(mut self, probability: f64) -> Self {
        self.repair_probability = probability;
        self
    }

    pub fn with_nb_iter_no_improvement(mut self, iterations: usize) -> Self {
        self.nb_iter_no_improvement = iterations;
        self
    }

    pub fn with_intensify_probability(mut self, probability: f64) -> Self {
        self.intensify_probability = probability;
        self
    }

    pub fn with_intensify_on_best(mut self, intensify: bool) -> Self {
        self.intensify_on_best = intensify;
        self
    }

    /// Whether these parameters can ever trigger the route operators.
    pub fn may_intensify(&self) -> bool {
        self.intensify_probability > 0.0 || self.intensify_on_best
    }

    pub fn validate(&self) -> Result<()> {
        check_probability("repair_probability", self.repair_probability)?;
        check_probability("intensify_probability", self.intensify_probability)?;
        check_positive("nb_iter_no_improvement", self.nb_iter_no_improvement)
    }
}

/// Parameters of the diversity-aware population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationParams {
    /// Subpopulation size after survivor selection (μ)
    pub min_pop_size: usize,
    /// Number of individuals added before survivor selection kicks in (λ)
    pub generation_size: usize,
    /// Number of cheapest individuals whose fitness ignores diversity
    pub nb_elite: usize,
    /// Number of closest individuals considered in the diversity measure
    pub nb_close: usize,
    /// Lower bound on the diversity of selected parent pairs
    pub lb_diversity: f64,
    /// Upper bound on the diversity of selected parent pairs
    pub ub_diversity: f64,
}

impl Default for PopulationParams {
    fn default() -> Self {
        PopulationParams {
            min_pop_size: 25,
            generation_size: 40,
            nb_elite: 4,
            nb_close: 5,
            lb_diversity: 0.1,
            ub_diversity: 0.5,
        }
    }
}

impl PopulationParams {
    pub fn new() -> Self {
        PopulationParams::default()
    }

    pub fn with_min_pop_size(mut self, size: usize) -> Self {
        self.min_pop_size = size;
        self
    }

    pub fn with_generation_size(mut self, size: usize) -> Self {
        self.generation_size = size;
        self
    }

    pub fn with_nb_elite(mut self, n: usize) -> Self {
        self.nb_elite = n;
        self
    }

    pub fn with_nb_close(mut self, n: usize) -> Self {
        self.nb_close = n;
        self
    }

    pub fn with_diversity_bounds(mut self, lb: f64, ub: f64) -> Self {
        self.lb_diversity = lb;
        self.ub_diversity = ub;
        self
    }

    /// Maximum size of each subpopulation.
    pub fn capacity(&self) -> usize {
        self.min_pop_size + self.generation_size
    }

    pub fn validate(&self) -> Result<()> {
        check_positive("min_pop_size", self.min_pop_size)?;
        check_positive("generation_size", self.generation_size)?;
        check_positive("nb_close", self.nb_close)?;
        check_probability("lb_diversity", self.lb_diversity)?;
        check_probability("ub_diversity", self.ub_diversity)?;

        if self.lb_diversity > self.ub_diversity {
            return Err(Error::invalid_parameter(
                "lb_diversity",
                self.lb_diversity,
                "must not exceed ub_diversity",
            ));
        }

        Ok(())
    }
}

/// Parameters of the adaptive penalty scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenaltyParams {
    pub init_capacity_penalty: f64,
    pub init_time_warp_penalty: f64,
    /// Factor applied to both penalties when repairing
    pub repair_booster: f64,
    /// Feasibility observations collected before the penalties adapt
    pub num_registrations_between_penalty_updates: usize,
    pub penalty_increase: f64,
    pub penalty_decrease: f64,
    /// Target fraction of feasible offspring
    pub target_feasible: f64,
}

impl Default for PenaltyParams {
    fn default() -> Self {
        PenaltyParams {
            init_capacity_penalty: 20.0,
            init_time_warp_penalty: 6.0,
            repair_booster: 12.0,
            num_registrations_between_penalty_updates: 50,
            penalty_increase: 1.34,
            penalty_decrease: 0.32,
            target_feasible: 0.43,
        }
    }
}

impl PenaltyParams {
    pub fn new() -> Self {
        PenaltyParams::default()
    }

    pub fn with_initial_penalties(mut self, capacity: f64, time_warp: f64) -> Self {
        self.init_capacity_penalty = capacity;
        self.init_time_warp_penalty = time_warp;
        self
    }

    pub fn with_repair_booster(mut self, booster: f64) -> Self {
        self.repair_booster = booster;
        self
    }

    pub fn with_num_registrations_between_penalty_updates(mut self, n: usize) -> Self {
        self.num_registrations_between_penalty_updates = n;
        self
    }

    pub fn with_penalty_factors(mut self, increase: f64, decrease: f64) -> Self {
        self.penalty_increase = increase;
        self.penalty_decrease = decrease;
        self
    }

    pub fn with_target_feasible(mut self, target: f64) -> Self {
        self.target_feasible = target;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.init_capacity_penalty >= 0.0) {
            return Err(Error::invalid_parameter(
                "init_capacity_penalty",
                self.init_capacity_penalty,
                "must be non-negative",
            ));
        }
        if !(self.init_time_warp_penalty >= 0.0) {
            return Err(Error::invalid_parameter(
                "init_time_warp_penalty",
                self.init_time_warp_penalty,
                "must be non-negative",
            ));
        }
        if !(self.repair_booster >= 1.0) {
            return Err(Error::invalid_parameter(
                "repair_booster",
                self.repair_booster,
                "must be at least 1",
            ));
        }
        if !(self.penalty_increase >= 1.0) {
            return Err(Error::invalid_parameter(
                "penalty_increase",
                self.penalty_increase,
                "must be at least 1",
            ));
        }
        check_probability("penalty_decrease", self.penalty_decrease)?;
        check_probability("target_feasible", self.target_feasible)?;
        check_positive(
            "num_registrations_between_penalty_updates",
            self.num_registrations_between_penalty_updates,
        )
    }
}

/// Configuration settings for a complete solver run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub genetic: GeneticAlgorithmParams,
    pub population: PopulationParams,
    pub penalty: PenaltyParams,
    /// Number of nearest clients each client considers during local search
    pub granularity: usize,
    /// Angular window, in degrees, within which route pairs are intensified
    pub overlap_tolerance_degrees: f64,
    /// Number of random solutions seeding the population
    pub initial_population_size: usize,
    pub seed: u64,
    /// Optional time limit for the algorithm
    pub time_limit: Option<Duration>,
    /// Optional limit on the number of iterations
    pub max_iterations: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            genetic: GeneticAlgorithmParams::default(),
            population: PopulationParams::default(),
            penalty: PenaltyParams::default(),
            granularity: 40,
            overlap_tolerance_degrees: 18.0,
            initial_population_size: 25,
            seed: 1,
            time_limit: None,
            max_iterations: None,
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Config::default()
    }

    /// Load a configuration from a JSON file; missing fields take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_genetic(mut self, params: GeneticAlgorithmParams) -> Self {
        self.genetic = params;
        self
    }

    pub fn with_population(mut self, params: PopulationParams) -> Self {
        self.population = params;
        self
    }

    pub fn with_penalty(mut self, params: PenaltyParams) -> Self {
        self.penalty = params;
        self
    }

    /// Set the granularity parameter.
    pub fn with_granularity(mut self, g: usize) -> Self {
        self.granularity = g;
        self
    }

    pub fn with_overlap_tolerance_degrees(mut self, degrees: f64) -> Self {
        self.overlap_tolerance_degrees = degrees;
        self
    }

    pub fn with_initial_population_size(mut self, size: usize) -> Self {
        self.initial_population_size = size;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the time limit.
    pub fn with_time_limit(mut self, duration: Duration) -> Self {
        self.time_limit = Some(duration);
        self
    }

    /// Set the time limit from a number of seconds.
    pub fn with_time_limit_secs(self, seconds: f64) -> Result<Self> {
        let duration = Duration::try_from_secs_f64(seconds).map_err(|_| {
            Error::invalid_parameter(
                "max_runtime",
                seconds,
                "must be a finite, non-negative number of seconds",
            )
        })?;

        Ok(self.with_time_limit(duration))
    }

    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = Some(iterations);
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.genetic.validate()?;
        self.population.validate()?;
        self.penalty.validate()?;
        check_positive("granularity", self.granularity)?;
        check_positive("initial_population_size", self.initial_population_size)?;

        if !(0.0..=360.0).contains(&self.overlap_tolerance_degrees) {
            return Err(Error::invalid_parameter(
                "overlap_tolerance_degrees",
                self.overlap_tolerance_degrees,
                "must lie in [0, 360]",
            ));
        }

        Ok(())
    }
}
