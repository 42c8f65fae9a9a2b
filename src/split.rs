//! Split algorithm implementation to convert a giant tour into routes.

use crate::cost_evaluator::CostEvaluator;
use crate::error::Result;
use crate::problem::{ProblemData, DEPOT};
use crate::solution::Solution;

use std::f64;

/// Implements the Split algorithm to optimally partition a giant tour.
pub struct Split;

impl Split {
    /// Split a giant tour into at most `num_vehicles` consecutive routes.
    ///
    /// This is the limited-fleet shortest-path split: `potential[k][j]` is the
    /// cheapest way to serve the first `j` clients with exactly `k` routes,
    /// where a route costs its distance plus the load and time-warp penalties
    /// of the given evaluator.
    pub fn split(
        giant_tour: &[usize],
        data: &ProblemData,
        cost_evaluator: &CostEvaluator,
    ) -> Result<Solution> {
        let n = giant_tour.len();

        if n == 0 {
            return Solution::new(data, Vec::new());
        }

        let max_routes = data.num_vehicles.min(n).max(1);
        let mut potential = vec![vec![f64::INFINITY; n + 1]; max_routes + 1];
        let mut pred = vec![vec![0usize; n + 1]; max_routes + 1];
        potential[0][0] = 0.0;

        for k in 1..=max_routes {
            for i in (k - 1)..n {
                let base = potential[k - 1][i];
                if !base.is_finite() {
                    continue;
                }

                let mut segment = RouteSegment::new(data);

                for j in i..n {
                    segment.push(data, giant_tour[j]);

                    let cost = base + segment.closed_cost(data, cost_evaluator);
                    if cost < potential[k][j + 1] {
                        potential[k][j + 1] = cost;
                        pred[k][j + 1] = i;
                    }
                }
            }
        }

        // Fewest routes wins among equally cheap splits
        let mut best_k = 1;
        for k in 2..=max_routes {
            if potential[k][n] < potential[best_k][n] {
                best_k = k;
            }
        }

        // Reconstruct the solution
        let mut routes = Vec::with_capacity(best_k);
        let mut j = n;

        for k in (1..=best_k).rev() {
            let i = pred[k][j];
            routes.push(giant_tour[i..j].to_vec());
            j = i;
        }

        // Reverse the routes to get them in the correct order
        routes.reverse();

        Solution::new(data, routes)
    }
}

/// Incrementally simulated route prefix, mirroring the forward pass of `Route::new`.
struct RouteSegment {
    last: usize,
    time: f64,
    distance: f64,
    load: f64,
    time_warp: f64,
}

impl RouteSegment {
    fn new(data: &ProblemData) -> Self {
        RouteSegment {
            last: DEPOT,
            time: data.depot().tw_early,
            distance: 0.0,
            load: 0.0,
            time_warp: 0.0,
        }
    }

    fn push(&mut self, data: &ProblemData, client: usize) {
        let node = data.node(client);

        self.distance += data.distance(self.last, client);
        self.time += data.duration(self.last, client);

        if self.time < node.tw_early {
            self.time = node.tw_early;
        }
        if self.time > node.tw_late {
            self.time_warp += self.time - node.tw_late;
            self.time = node.tw_late;
        }

        self.time += node.service_duration;
        self.load += node.demand;
        self.last = client;
    }

    /// Penalised cost of the segment once it returns to the depot.
    fn closed_cost(&self, data: &ProblemData, cost_evaluator: &CostEvaluator) -> f64 {
        let arrival = self.time + data.duration(self.last, DEPOT);
        let time_warp = self.time_warp + (arrival - data.depot().tw_late).max(0.0);
        let distance = self.distance + data.distance(self.last, DEPOT);

        distance
            + cost_evaluator.load_penalty(self.load, data.vehicle_capacity)
            + cost_evaluator.tw_penalty(time_warp)
    }
}
