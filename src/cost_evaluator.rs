//! Penalised objective used to compare (possibly infeasible) solutions.

use crate::solution::{Route, Solution};

/// Turns distance and constraint violations into a single scalar.
///
/// Holds the current penalty weights only; it is a cheap `Copy` value that is
/// re-fetched from the [`PenaltyManager`](crate::penalty_manager::PenaltyManager)
/// whenever the weights may have changed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostEvaluator {
    capacity_penalty: f64,
    tw_penalty: f64,
}

impl CostEvaluator {
    pub fn new(capacity_penalty: f64, tw_penalty: f64) -> Self {
        CostEvaluator {
            capacity_penalty,
            tw_penalty,
        }
    }

    pub fn capacity_penalty(&self) -> f64 {
        self.capacity_penalty
    }

    pub fn time_warp_penalty(&self) -> f64 {
        self.tw_penalty
    }

    /// Penalty for carrying `load` in a vehicle of the given capacity.
    pub fn load_penalty(&self, load: f64, capacity: f64) -> f64 {
        (load - capacity).max(0.0) * self.capacity_penalty
    }

    pub fn tw_penalty(&self, time_warp: f64) -> f64 {
        time_warp.max(0.0) * self.tw_penalty
    }

    /// Distance plus weighted violations of a single route.
    pub fn route_penalised_cost(&self, route: &Route) -> f64 {
        route.distance()
            + route.excess_load() * self.capacity_penalty
            + self.tw_penalty(route.time_warp())
    }

    /// Distance plus weighted violations of a whole solution.
    pub fn penalised_cost(&self, solution: &Solution) -> f64 {
        solution.distance()
            + solution.excess_load() * self.capacity_penalty
            + self.tw_penalty(solution.time_warp())
    }

    /// Objective of a feasible solution; infinite for infeasible ones.
    pub fn cost(&self, solution: &Solution) -> f64 {
        if solution.is_feasible() {
            solution.distance()
        } else {
            f64::INFINITY
        }
    }
}
