//! Population management for the genetic algorithm.

use crate::config::PopulationParams;
use crate::cost_evaluator::CostEvaluator;
use crate::error::{Error, Result};
use crate::individual::{broken_pairs_distance, Individual};
use crate::rng::RandomNumberGenerator;
use crate::solution::Solution;
use log::trace;

/// Maximum number of draws for a second parent within the diversity bounds.
const MAX_SELECTION_TRIES: usize = 10;

/// Feasible or infeasible part of the population.
#[derive(Debug, Clone, Default)]
pub struct SubPopulation {
    individuals: Vec<Individual>,
}

impl SubPopulation {
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Mean over all members of the average distance to their closest neighbours.
    pub fn avg_diversity(&self, nb_close: usize) -> f64 {
        if self.individuals.len() < 2 {
            return 0.0;
        }

        let total: f64 = self
            .individuals
            .iter()
            .enumerate()
            .map(|(i, individual)| individual.avg_distance_closest(i, nb_close))
            .sum();

        total / self.individuals.len() as f64
    }

    fn add(&mut self, solution: Solution) {
        let distances: Vec<f64> = self
            .individuals
            .iter()
            .map(|other| broken_pairs_distance(&solution, &other.solution))
            .collect();

        for (other, &distance) in self.individuals.iter_mut().zip(&distances) {
            other.proximity.push(distance);
        }

        let mut individual = Individual::new(solution);
        individual.proximity = distances;
        individual.proximity.push(0.0);
        self.individuals.push(individual);
    }

    fn remove(&mut self, idx: usize) {
        self.individuals.remove(idx);

        for individual in self.individuals.iter_mut() {
            individual.proximity.remove(idx);
        }
    }

    fn clear(&mut self) {
        self.individuals.clear();
    }

    /// Member indices sorted by penalised cost; ties keep insertion order.
    fn cost_order(&self, cost_evaluator: &CostEvaluator) -> Vec<usize> {
        let costs: Vec<f64> = self
            .individuals
            .iter()
            .map(|individual| cost_evaluator.penalised_cost(&individual.solution))
            .collect();

        let mut order: Vec<usize> = (0..self.individuals.len()).collect();
        order.sort_by(|&a, &b| costs[a].total_cmp(&costs[b]));
        order
    }

    /// Recompute the biased fitness of all members.
    ///
    /// The `nb_elite` cheapest members are ranked by cost alone; every other
    /// member adds a weighted diversity rank, where rank 0 is the member
    /// farthest from its closest neighbours.
    fn update_fitness(&mut self, params: &PopulationParams, cost_evaluator: &CostEvaluator) {
        let n = self.individuals.len();

        if n == 0 {
            return;
        }
        if n == 1 {
            self.individuals[0].biased_fitness = 0.0;
            return;
        }

        let mut cost_rank = vec![0usize; n];
        for (rank, idx) in self.cost_order(cost_evaluator).into_iter().enumerate() {
            cost_rank[idx] = rank;
        }

        let nb_close = params.nb_close.min(n - 1);
        let mut by_diversity: Vec<(f64, usize)> = self
            .individuals
            .iter()
            .enumerate()
            .map(|(i, individual)| (individual.avg_distance_closest(i, nb_close), i))
            .collect();
        by_diversity.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));

        let denom = (n - 1) as f64;
        let nb_elite = params.nb_elite.min(n);
        let diversity_weight = 1.0 - nb_elite as f64 / n as f64;

        for (div_rank, &(_, idx)) in by_diversity.iter().enumerate() {
            let fit_rank = cost_rank[idx] as f64 / denom;

            self.individuals[idx].biased_fitness = if cost_rank[idx] < nb_elite {
                fit_rank
            } else {
                fit_rank + diversity_weight * div_rank as f64 / denom
            };
        }
    }

    /// Shrink to `min_pop_size`, removing clones first and then the worst biased fitness.
    ///
    /// The cheapest member is never removed.
    fn purge(&mut self, params: &PopulationParams, cost_evaluator: &CostEvaluator) {
        while self.individuals.len() > params.min_pop_size {
            let best = self.cost_order(cost_evaluator)[0];

            let clone = (0..self.individuals.len())
                .filter(|&i| i != best && self.individuals[i].has_clone(i))
                .max_by(|&a, &b| {
                    let cost_a = cost_evaluator.penalised_cost(&self.individuals[a].solution);
                    let cost_b = cost_evaluator.penalised_cost(&self.individuals[b].solution);
                    cost_a.total_cmp(&cost_b)
                });

            match clone {
                Some(idx) => self.remove(idx),
                None => break,
            }
        }

        while self.individuals.len() > params.min_pop_size {
            self.update_fitness(params, cost_evaluator);
            let best = self.cost_order(cost_evaluator)[0];

            let worst = (0..self.individuals.len())
                .filter(|&i| i != best)
                .max_by(|&a, &b| {
                    self.individuals[a]
                        .biased_fitness
                        .total_cmp(&self.individuals[b].biased_fitness)
                });

            match worst {
                Some(idx) => self.remove(idx),
                None => break,
            }
        }

        self.update_fitness(params, cost_evaluator);
    }
}

/// Manages the feasible and infeasible subpopulations of the genetic algorithm.
#[derive(Debug, Clone)]
pub struct Population {
    params: PopulationParams,
    feasible: SubPopulation,
    infeasible: SubPopulation,
    /// Cheapest feasible solution added since the last clear
    best_feasible: Option<Solution>,
}

impl Population {
    /// Create a new, empty population.
    pub fn new(params: PopulationParams) -> Result<Self> {
        params.validate()?;

        Ok(Population {
            params,
            feasible: SubPopulation::default(),
            infeasible: SubPopulation::default(),
            best_feasible: None,
        })
    }

    pub fn params(&self) -> &PopulationParams {
        &self.params
    }

    /// Maximum size of each subpopulation.
    pub fn capacity(&self) -> usize {
        self.params.capacity()
    }

    /// Get the total population size.
    pub fn len(&self) -> usize {
        self.feasible.len() + self.infeasible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn num_feasible(&self) -> usize {
        self.feasible.len()
    }

    pub fn num_infeasible(&self) -> usize {
        self.infeasible.len()
    }

    pub fn feasible(&self) -> &SubPopulation {
        &self.feasible
    }

    pub fn infeasible(&self) -> &SubPopulation {
        &self.infeasible
    }

    /// All solutions, feasible ones first.
    pub fn iter(&self) -> impl Iterator<Item = &Solution> {
        self.feasible
            .individuals
            .iter()
            .chain(self.infeasible.individuals.iter())
            .map(|individual| &individual.solution)
    }

    /// Get the best feasible solution in the population.
    pub fn best_feasible(&self) -> Option<&Solution> {
        self.best_feasible.as_ref()
    }

    /// Insert a solution into the matching subpopulation.
    ///
    /// When the subpopulation outgrows its capacity, survivor selection shrinks
    /// it back to `min_pop_size`.
    pub fn add(&mut self, solution: Solution, cost_evaluator: &CostEvaluator) {
        let feasible = solution.is_feasible();

        if feasible {
            let cost = cost_evaluator.penalised_cost(&solution);
            let improves = self
                .best_feasible
                .as_ref()
                .map_or(true, |best| cost < cost_evaluator.penalised_cost(best));

            if improves {
                self.best_feasible = Some(solution.clone());
            }
        }

        let capacity = self.capacity();
        let subpop = if feasible {
            &mut self.feasible
        } else {
            &mut self.infeasible
        };

        subpop.add(solution);

        if subpop.len() > capacity {
            trace!(
                "Purging {} subpopulation of size {}",
                if feasible { "feasible" } else { "infeasible" },
                subpop.len()
            );
            subpop.purge(&self.params, cost_evaluator);
        } else {
            subpop.update_fitness(&self.params, cost_evaluator);
        }
    }

    /// Select two parents by binary tournament on biased fitness.
    ///
    /// The second parent differs from the first whenever the population holds
    /// at least two members, and is redrawn a bounded number of times while the
    /// pair's diversity lies outside the configured bounds.
    pub fn select(
        &mut self,
        rng: &mut RandomNumberGenerator,
        cost_evaluator: &CostEvaluator,
    ) -> Result<(&Solution, &Solution)> {
        if self.is_empty() {
            return Err(Error::EmptyPopulation);
        }

        self.feasible.update_fitness(&self.params, cost_evaluator);
        self.infeasible.update_fitness(&self.params, cost_evaluator);

        let first = self.binary_tournament(rng);
        let mut second = self.binary_tournament(rng);
        let mut diversity = broken_pairs_distance(self.get(first), self.get(second));
        let mut tries = 1;

        let out_of_bounds =
            |d: f64| d < self.params.lb_diversity || d > self.params.ub_diversity;

        while (self.len() > 1 && first == second)
            || (out_of_bounds(diversity) && tries < MAX_SELECTION_TRIES)
        {
            tries += 1;
            second = self.binary_tournament(rng);
            diversity = broken_pairs_distance(self.get(first), self.get(second));
        }

        Ok((self.get(first), self.get(second)))
    }

    /// Remove all individuals.
    pub fn clear(&mut self) {
        self.feasible.clear();
        self.infeasible.clear();
        self.best_feasible = None;
    }

    fn get(&self, idx: usize) -> &Solution {
        &self.individual(idx).solution
    }

    fn individual(&self, idx: usize) -> &Individual {
        let num_feasible = self.feasible.len();

        if idx < num_feasible {
            &self.feasible.individuals[idx]
        } else {
            &self.infeasible.individuals[idx - num_feasible]
        }
    }

    /// Perform binary tournament selection over both subpopulations.
    fn binary_tournament(&self, rng: &mut RandomNumberGenerator) -> usize {
        let idx1 = rng.randint(self.len());
        let idx2 = rng.randint(self.len());

        if self.individual(idx1).biased_fitness <= self.individual(idx2).biased_fitness {
            idx1
        } else {
            idx2
        }
    }
}
