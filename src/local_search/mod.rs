//! Local search operators for the HGS-VRPTW algorithm.
//!
//! The search is two-tiered: node operators act on a client and one of its
//! granular neighbours, route operators act on a pair of routes whose
//! centroids lie close together as seen from the depot.

pub mod relocate;
pub mod relocate_star;
pub mod swap;
pub mod swap_star;
pub mod two_opt;
pub mod two_opt_star;
pub mod utils;

use crate::cost_evaluator::CostEvaluator;
use crate::error::{Error, Result};
use crate::problem::{ProblemData, DEPOT};
use crate::rng::RandomNumberGenerator;
use crate::solution::Solution;
use itertools::Itertools;
use log::{debug, trace};
use std::iter;

pub use self::relocate::Relocate;
pub use self::relocate_star::RelocateStar;
pub use self::swap::Swap;
pub use self::swap_star::SwapStar;
pub use self::two_opt::TwoOpt;
pub use self::two_opt_star::TwoOptStar;

use self::utils::{get_neighbors, routes_overlap, EPSILON};

/// A move around a single client.
pub trait NodeOperator {
    /// Unique name; registering a second operator with the same name is a no-op.
    fn name(&self) -> &'static str;

    /// Return the improved solution when moving `u` relative to `v` lowers the
    /// penalised cost, `None` otherwise.
    ///
    /// `v` is a granular neighbour of `u`, or [`DEPOT`] to stand for an empty route.
    fn try_apply(
        &mut self,
        solution: &Solution,
        u: usize,
        v: usize,
        data: &ProblemData,
        cost_evaluator: &CostEvaluator,
    ) -> Option<Solution>;
}

/// A move between two whole routes, identified by their index.
pub trait RouteOperator {
    fn name(&self) -> &'static str;

    fn try_apply(
        &mut self,
        solution: &Solution,
        route_u: usize,
        route_v: usize,
        data: &ProblemData,
        cost_evaluator: &CostEvaluator,
    ) -> Option<Solution>;
}

/// Manages the local search phase of the HGS-VRPTW algorithm.
pub struct LocalSearch<'a> {
    data: &'a ProblemData,
    /// Granular neighbours per client; index 0 is unused
    neighbours: Vec<Vec<usize>>,
    node_ops: Vec<Box<dyn NodeOperator>>,
    route_ops: Vec<Box<dyn RouteOperator>>,
    overlap_tolerance_degrees: f64,
}

impl<'a> LocalSearch<'a> {
    /// Create a local search restricted to the `granularity` nearest clients of each client.
    pub fn new(data: &'a ProblemData, granularity: usize) -> Self {
        let mut neighbours = vec![Vec::new(); data.num_clients() + 1];

        for client in data.clients() {
            neighbours[client] = get_neighbors(client, data, granularity);
        }

        LocalSearch {
            data,
            neighbours,
            node_ops: Vec::new(),
            route_ops: Vec::new(),
            overlap_tolerance_degrees: 0.0,
        }
    }

    /// Set the angular window used by [`LocalSearch::run`] when intensifying.
    pub fn with_overlap_tolerance_degrees(mut self, degrees: f64) -> Self {
        self.overlap_tolerance_degrees = degrees;
        self
    }

    pub fn overlap_tolerance_degrees(&self) -> f64 {
        self.overlap_tolerance_degrees
    }

    pub fn add_node_operator(&mut self, op: Box<dyn NodeOperator>) {
        if self.node_ops.iter().any(|existing| existing.name() == op.name()) {
            debug!("Node operator {} is already registered", op.name());
            return;
        }

        self.node_ops.push(op);
    }

    pub fn add_route_operator(&mut self, op: Box<dyn RouteOperator>) {
        if self.route_ops.iter().any(|existing| existing.name() == op.name()) {
            debug!("Route operator {} is already registered", op.name());
            return;
        }

        self.route_ops.push(op);
    }

    pub fn has_node_operators(&self) -> bool {
        !self.node_ops.is_empty()
    }

    pub fn has_route_operators(&self) -> bool {
        !self.route_ops.is_empty()
    }

    /// Granular neighbours of a client, nearest first.
    pub fn neighbours(&self, client: usize) -> &[usize] {
        &self.neighbours[client]
    }

    /// Improve a solution with the node operators until none applies.
    ///
    /// Clients are visited in a random order drawn once per call. A sweep
    /// tries every operator on every client and each of its neighbours plus
    /// the depot; the search ends after a sweep without improvement.
    pub fn search(
        &mut self,
        solution: &Solution,
        cost_evaluator: &CostEvaluator,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Solution> {
        if self.node_ops.is_empty() {
            return Err(Error::NotConfigured { kind: "node" });
        }

        let data = self.data;
        let neighbours = &self.neighbours;
        let ops = &mut self.node_ops;

        let mut order: Vec<usize> = data.clients().collect();
        rng.shuffle(&mut order);

        let mut current = solution.clone();
        let mut current_cost = cost_evaluator.penalised_cost(&current);
        let mut sweeps = 0;
        let mut improved = true;

        while improved {
            improved = false;
            sweeps += 1;

            for &u in &order {
                for v in neighbours[u].iter().copied().chain(iter::once(DEPOT)) {
                    for op in ops.iter_mut() {
                        let Some(candidate) = op.try_apply(&current, u, v, data, cost_evaluator)
                        else {
                            continue;
                        };

                        let cost = cost_evaluator.penalised_cost(&candidate);
                        if cost < current_cost - EPSILON {
                            trace!("{} improved {:.3} -> {:.3}", op.name(), current_cost, cost);
                            current = candidate;
                            current_cost = cost;
                            improved = true;
                        }
                    }
                }
            }
        }

        trace!("Search finished after {} sweeps at {:.3}", sweeps, current_cost);
        Ok(current)
    }

    /// Improve a solution with the route operators over overlapping route pairs.
    ///
    /// Two routes overlap when their centroid angles around the depot differ
    /// by at most `overlap_tolerance_degrees`; 360 admits every pair. The scan
    /// restarts after every applied move and ends when no pair improves.
    pub fn intensify(
        &mut self,
        solution: &Solution,
        cost_evaluator: &CostEvaluator,
        overlap_tolerance_degrees: f64,
    ) -> Result<Solution> {
        if self.route_ops.is_empty() {
            return Err(Error::NotConfigured { kind: "route" });
        }

        let data = self.data;
        let ops = &mut self.route_ops;

        let mut current = solution.clone();
        let mut current_cost = cost_evaluator.penalised_cost(&current);

        'scan: loop {
            for (r1, r2) in (0..current.num_routes()).tuple_combinations() {
                let routes = current.routes();
                if !routes_overlap(data, &routes[r1], &routes[r2], overlap_tolerance_degrees) {
                    continue;
                }

                for op in ops.iter_mut() {
                    let Some(candidate) = op.try_apply(&current, r1, r2, data, cost_evaluator)
                    else {
                        continue;
                    };

                    let cost = cost_evaluator.penalised_cost(&candidate);
                    if cost < current_cost - EPSILON {
                        trace!("{} improved {:.3} -> {:.3}", op.name(), current_cost, cost);
                        current = candidate;
                        current_cost = cost;
                        continue 'scan;
                    }
                }
            }

            break;
        }

        Ok(current)
    }

    /// Alternate [`search`](Self::search) and, when `should_intensify`,
    /// [`intensify`](Self::intensify) until a round brings no improvement.
    pub fn run(
        &mut self,
        solution: &Solution,
        cost_evaluator: &CostEvaluator,
        should_intensify: bool,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Solution> {
        let mut current = self.search(solution, cost_evaluator, rng)?;

        if !should_intensify {
            return Ok(current);
        }

        loop {
            let before = cost_evaluator.penalised_cost(&current);
            let intensified =
                self.intensify(&current, cost_evaluator, self.overlap_tolerance_degrees)?;
            current = self.search(&intensified, cost_evaluator, rng)?;

            if cost_evaluator.penalised_cost(&current) >= before - EPSILON {
                return Ok(current);
            }
        }
    }
}
