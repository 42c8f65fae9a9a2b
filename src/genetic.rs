//! The genetic algorithm driving the hybrid genetic search.

use crate::config::GeneticAlgorithmParams;
use crate::cost_evaluator::CostEvaluator;
use crate::crossover::Crossover;
use crate::error::{Error, Result};
use crate::local_search::LocalSearch;
use crate::penalty_manager::PenaltyManager;
use crate::population::Population;
use crate::problem::ProblemData;
use crate::result::SearchResult;
use crate::rng::RandomNumberGenerator;
use crate::solution::Solution;
use crate::statistics::Statistics;
use crate::stop::StoppingCriterion;
use log::{debug, info};
use std::time::Instant;

/// Overlap tolerance admitting every route pair.
const FULL_CIRCLE_DEGREES: f64 = 360.0;

/// Iterations between progress log lines.
const LOG_INTERVAL: usize = 500;

/// Orchestrates selection, crossover, local search and population management.
///
/// The algorithm owns every stateful collaborator for the duration of a run
/// and only borrows the problem data. Each iteration selects two parents,
/// recombines them, improves the offspring with local search and inserts the
/// result into the population. Infeasible offspring are repaired with boosted
/// penalties with probability `repair_probability`. After
/// `nb_iter_no_improvement` consecutive iterations without a new best
/// solution, the population is cleared and reseeded from the initial
/// solutions.
pub struct GeneticAlgorithm<'a, C: Crossover> {
    data: &'a ProblemData,
    population: Population,
    penalty_manager: PenaltyManager,
    rng: RandomNumberGenerator,
    local_search: LocalSearch<'a>,
    crossover: C,
    initial_solutions: Vec<Solution>,
    params: GeneticAlgorithmParams,
    best: Solution,
    iterations: usize,
    /// Consecutive iterations without a new best solution
    iterations_no_improvement: usize,
    restarts: usize,
}

impl<'a, C: Crossover> GeneticAlgorithm<'a, C> {
    /// Create a new genetic algorithm and seed its population.
    ///
    /// Configuration problems are reported here so that a run never fails on
    /// them halfway: invalid parameters, no initial solutions, a local search
    /// without node operators, or one without route operators when
    /// intensification can happen.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        data: &'a ProblemData,
        population: Population,
        penalty_manager: PenaltyManager,
        rng: RandomNumberGenerator,
        local_search: LocalSearch<'a>,
        crossover: C,
        initial_solutions: Vec<Solution>,
        params: GeneticAlgorithmParams,
    ) -> Result<Self> {
        params.validate()?;

        if initial_solutions.is_empty() {
            return Err(Error::EmptyInitialSolutions);
        }
        if !local_search.has_node_operators() {
            return Err(Error::NotConfigured { kind: "node" });
        }
        if params.may_intensify() && !local_search.has_route_operators() {
            return Err(Error::NotConfigured { kind: "route" });
        }

        let best = initial_solutions[0].clone();

        let mut ga = GeneticAlgorithm {
            data,
            population,
            penalty_manager,
            rng,
            local_search,
            crossover,
            initial_solutions,
            params,
            best,
            iterations: 0,
            iterations_no_improvement: 0,
            restarts: 0,
        };

        ga.initialize();
        Ok(ga)
    }

    /// Reset the population to the initial solutions and clear all counters.
    pub fn initialize(&mut self) {
        let cost_evaluator = self.penalty_manager.get_cost_evaluator();

        self.reseed(&cost_evaluator);
        self.best = self.best_initial_solution(&cost_evaluator).clone();
        self.iterations = 0;
        self.iterations_no_improvement = 0;
        self.restarts = 0;
    }

    /// Run until the stopping criterion is met.
    ///
    /// The criterion sees the cost of the best solution before every
    /// iteration. With `collect_stats`, a population snapshot is recorded
    /// after each iteration.
    pub fn run<S: StoppingCriterion + ?Sized>(
        &mut self,
        stop: &mut S,
        collect_stats: bool,
    ) -> Result<SearchResult> {
        let start = Instant::now();
        let mut stats = Statistics::new();

        self.initialize();

        info!(
            "Starting search on {} with {} clients and {} initial solutions",
            self.data.name,
            self.data.num_clients(),
            self.initial_solutions.len()
        );

        while !stop.should_stop(self.cost(&self.best)) {
            self.iterate()?;

            if collect_stats {
                let cost_evaluator = self.penalty_manager.get_cost_evaluator();
                stats.collect_from(&self.population, &cost_evaluator);
            }

            if self.iterations % LOG_INTERVAL == 0 {
                info!(
                    "Iteration {}: best {:.2}, population {} feasible / {} infeasible, penalties {:.2} / {:.2}",
                    self.iterations,
                    self.cost(&self.best),
                    self.population.num_feasible(),
                    self.population.num_infeasible(),
                    self.penalty_manager.capacity_penalty(),
                    self.penalty_manager.time_warp_penalty()
                );
            }
        }

        let runtime = start.elapsed();
        info!(
            "Search finished after {} iterations and {} restarts: best {:.2}",
            self.iterations,
            self.restarts,
            self.cost(&self.best)
        );

        Ok(SearchResult {
            best: self.best.clone(),
            stats,
            num_iterations: self.iterations,
            num_restarts: self.restarts,
            runtime,
        })
    }

    /// Perform a single iteration.
    pub fn iterate(&mut self) -> Result<()> {
        self.iterations += 1;
        let iteration = self.iterations;

        self.restart_if_stagnating();

        let curr_best = self.cost(&self.best);
        let cost_evaluator = self.penalty_manager.get_cost_evaluator();

        let parents = self
            .population
            .select(&mut self.rng, &cost_evaluator)
            .map_err(|e| e.in_iteration(iteration, "selection"))?;

        let offspring = self
            .crossover
            .crossover(parents, self.data, &cost_evaluator, &mut self.rng)
            .map_err(|e| e.in_iteration(iteration, "crossover"))?;

        self.improve_offspring(offspring)
            .map_err(|e| e.in_iteration(iteration, "local search"))?;

        if self.cost(&self.best) < curr_best {
            self.iterations_no_improvement = 0;
        } else {
            self.iterations_no_improvement += 1;
        }

        Ok(())
    }

    /// Best solution found so far.
    pub fn best(&self) -> &Solution {
        &self.best
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn penalty_manager(&self) -> &PenaltyManager {
        &self.penalty_manager
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn iterations_no_improvement(&self) -> usize {
        self.iterations_no_improvement
    }

    pub fn num_restarts(&self) -> usize {
        self.restarts
    }

    /// Clear and reseed the population once the search has stagnated.
    fn restart_if_stagnating(&mut self) -> bool {
        if self.iterations_no_improvement < self.params.nb_iter_no_improvement {
            return false;
        }

        info!(
            "Restarting population after {} iterations without improvement",
            self.iterations_no_improvement
        );

        let cost_evaluator = self.penalty_manager.get_cost_evaluator();
        self.reseed(&cost_evaluator);
        self.iterations_no_improvement = 0;
        self.restarts += 1;
        true
    }

    fn reseed(&mut self, cost_evaluator: &CostEvaluator) {
        self.population.clear();

        for solution in &self.initial_solutions {
            self.population.add(solution.clone(), cost_evaluator);
        }
    }

    /// Lowest cost, then lowest penalised cost, then first seen.
    fn best_initial_solution(&self, cost_evaluator: &CostEvaluator) -> &Solution {
        let mut best = &self.initial_solutions[0];

        for solution in &self.initial_solutions[1..] {
            let cost = cost_evaluator.cost(solution);
            let best_cost = cost_evaluator.cost(best);

            if cost < best_cost
                || (cost == best_cost
                    && cost_evaluator.penalised_cost(solution)
                        < cost_evaluator.penalised_cost(best))
            {
                best = solution;
            }
        }

        best
    }

    /// Improve an offspring, insert it, and repair it when it stays infeasible.
    fn improve_offspring(&mut self, offspring: Solution) -> Result<()> {
        let cost_evaluator = self.penalty_manager.get_cost_evaluator();
        let should_intensify = self.rng.rand() < self.params.intensify_probability;

        let improved = self.educate(&offspring, &cost_evaluator, should_intensify)?;
        self.add_and_register(improved.clone(), &cost_evaluator);

        if !improved.is_feasible() && self.rng.rand() < self.params.repair_probability {
            let booster = self.penalty_manager.get_booster_cost_evaluator();
            let repaired = self.educate(&improved, &booster, should_intensify)?;

            if repaired.is_feasible() {
                debug!("Repaired offspring to cost {:.2}", repaired.distance());
                self.add_and_register(repaired, &cost_evaluator);
            }
        }

        Ok(())
    }

    /// Local search, followed by a full intensification of every new best solution.
    fn educate(
        &mut self,
        solution: &Solution,
        cost_evaluator: &CostEvaluator,
        should_intensify: bool,
    ) -> Result<Solution> {
        let mut improved =
            self.local_search
                .run(solution, cost_evaluator, should_intensify, &mut self.rng)?;

        if self.update_best(&improved) && self.params.intensify_on_best {
            improved = self
                .local_search
                .intensify(&improved, cost_evaluator, FULL_CIRCLE_DEGREES)?;
            self.update_best(&improved);
        }

        Ok(improved)
    }

    fn update_best(&mut self, candidate: &Solution) -> bool {
        if self.cost(candidate) < self.cost(&self.best) {
            debug!(
                "New best solution at iteration {}: {:.2}",
                self.iterations,
                candidate.distance()
            );
            self.best = candidate.clone();
            true
        } else {
            false
        }
    }

    fn add_and_register(&mut self, solution: Solution, cost_evaluator: &CostEvaluator) {
        self.penalty_manager
            .register_load_feasible(!solution.has_excess_load());
        self.penalty_manager
            .register_time_feasible(!solution.has_time_warp());
        self.population.add(solution, cost_evaluator);
    }

    fn cost(&self, solution: &Solution) -> f64 {
        self.penalty_manager.get_cost_evaluator().cost(solution)
    }
}
