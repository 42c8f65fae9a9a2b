//! Crossover operators recombining two parent solutions.

use crate::cost_evaluator::CostEvaluator;
use crate::error::Result;
use crate::problem::ProblemData;
use crate::rng::RandomNumberGenerator;
use crate::solution::Solution;
use crate::split::Split;

/// Produces one offspring from two parents.
pub trait Crossover {
    fn crossover(
        &mut self,
        parents: (&Solution, &Solution),
        data: &ProblemData,
        cost_evaluator: &CostEvaluator,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Solution>;
}

impl<F> Crossover for F
where
    F: FnMut(
        (&Solution, &Solution),
        &ProblemData,
        &CostEvaluator,
        &mut RandomNumberGenerator,
    ) -> Result<Solution>,
{
    fn crossover(
        &mut self,
        parents: (&Solution, &Solution),
        data: &ProblemData,
        cost_evaluator: &CostEvaluator,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Solution> {
        self(parents, data, cost_evaluator, rng)
    }
}

/// Ordered crossover (OX) on giant tours, followed by [`Split`].
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderedCrossover;

impl OrderedCrossover {
    /// Perform ordered crossover (OX) between two giant tours.
    ///
    /// The slice `start..=end` of the first tour is kept in place; the
    /// remaining positions are filled, wrapping around after `end`, with the
    /// missing clients in the order the second tour visits them.
    pub fn ordered_crossover(
        first: &[usize],
        second: &[usize],
        start: usize,
        end: usize,
    ) -> Vec<usize> {
        let tour_size = first.len();

        if tour_size == 0 {
            return Vec::new();
        }

        let max_client = first.iter().copied().max().unwrap_or(0);
        let mut used = vec![false; max_client + 1];
        let mut offspring = vec![0; tour_size];

        // Copy segment from first parent
        for i in start..=end {
            offspring[i] = first[i];
            used[first[i]] = true;
        }

        // Fill remaining positions from the second parent
        let mut j = (end + 1) % tour_size;
        let mut filled = end - start + 1;

        for k in 0..second.len() {
            if filled == tour_size {
                break;
            }

            let client = second[(end + 1 + k) % second.len()];
            if client < used.len() && !used[client] {
                offspring[j] = client;
                used[client] = true;
                j = (j + 1) % tour_size;
                filled += 1;
            }
        }

        offspring
    }
}

impl Crossover for OrderedCrossover {
    fn crossover(
        &mut self,
        parents: (&Solution, &Solution),
        data: &ProblemData,
        cost_evaluator: &CostEvaluator,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Solution> {
        let first = parents.0.giant_tour();
        let second = parents.1.giant_tour();

        if first.is_empty() {
            return Split::split(&first, data, cost_evaluator);
        }

        // Determine cutting points for OX
        let cut1 = rng.randint(first.len());
        let cut2 = rng.randint(first.len());
        let (start, end) = if cut1 <= cut2 {
            (cut1, cut2)
        } else {
            (cut2, cut1)
        };

        let offspring = Self::ordered_crossover(&first, &second, start, end);
        Split::split(&offspring, data, cost_evaluator)
    }
}
