//! Individual representation for the genetic algorithm population.

use crate::problem::DEPOT;
use crate::solution::Solution;

/// Distances at or below this value mark two individuals as clones.
pub const CLONE_TOLERANCE: f64 = 1e-6;

/// An individual in the genetic algorithm population.
#[derive(Debug, Clone)]
pub struct Individual {
    /// The solution represented by this individual
    pub solution: Solution,
    /// The biased fitness combining cost rank and diversity rank; lower is better
    pub biased_fitness: f64,
    /// Broken-pairs distance to every other member of the subpopulation, by index
    pub proximity: Vec<f64>,
}

impl Individual {
    /// Create a new individual from a solution.
    pub fn new(solution: Solution) -> Self {
        Individual {
            solution,
            biased_fitness: 0.0,
            proximity: Vec::new(),
        }
    }

    /// Average distance to the `closest_count` nearest other individuals.
    pub fn avg_distance_closest(&self, own_index: usize, closest_count: usize) -> f64 {
        let mut distances: Vec<f64> = self
            .proximity
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != own_index)
            .map(|(_, &d)| d)
            .collect();

        if distances.is_empty() || closest_count == 0 {
            return 0.0;
        }

        distances.sort_unstable_by(f64::total_cmp);

        let count = closest_count.min(distances.len());
        distances.iter().take(count).sum::<f64>() / count as f64
    }

    /// Check whether another member of the subpopulation is a clone of this one.
    pub fn has_clone(&self, own_index: usize) -> bool {
        self.proximity
            .iter()
            .enumerate()
            .any(|(j, &d)| j != own_index && d <= CLONE_TOLERANCE)
    }
}

/// Fraction of clients whose links in `first` are broken in `second`.
///
/// A link from a client to its successor counts as kept when the other
/// solution connects the two clients in either direction. A route start in
/// `first` also counts as broken when `second` serves the client mid-route.
/// The result lies in `[0, 1]`; zero means identical route structures.
pub fn broken_pairs_distance(first: &Solution, second: &Solution) -> f64 {
    let first_links = first.neighbours();
    let second_links = second.neighbours();
    let num_clients = first_links.len().min(second_links.len()).saturating_sub(1);

    if num_clients == 0 {
        return 0.0;
    }

    let mut broken = 0usize;

    for client in 1..=num_clients {
        let (first_pred, first_succ) = first_links[client];
        let (second_pred, second_succ) = second_links[client];

        if first_succ != second_succ && first_succ != second_pred {
            broken += 1;
        }

        if first_pred == DEPOT && second_pred != DEPOT && second_succ != DEPOT {
            broken += 1;
        }
    }

    (broken as f64 / num_clients as f64).min(1.0)
}
