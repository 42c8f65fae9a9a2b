//! Solution representation for the VRPTW.

use crate::error::{Error, Result};
use crate::problem::{ProblemData, DEPOT};
use crate::rng::RandomNumberGenerator;
use serde::Serialize;
use std::fmt;

/// Violations at or below this magnitude count as feasible.
const FEASIBILITY_TOLERANCE: f64 = 1e-10;

const UNVISITED: usize = usize::MAX;

/// Represents a single vehicle route.
///
/// All statistics are derived from the visit sequence when the route is built
/// and never change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    visits: Vec<usize>,
    distance: f64,
    duration: f64,
    load: f64,
    excess_load: f64,
    time_warp: f64,
    centroid: (f64, f64),
}

impl Route {
    /// Build a route visiting `visits` in order, starting and ending at the depot.
    pub fn new(data: &ProblemData, visits: Vec<usize>) -> Self {
        let depot = data.depot();
        let start = depot.tw_early;

        let mut time = start;
        let mut distance = 0.0;
        let mut load = 0.0;
        let mut time_warp = 0.0;
        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        let mut prev = DEPOT;

        for &client in &visits {
            let node = data.node(client);

            distance += data.distance(prev, client);
            time += data.duration(prev, client);

            // Wait for the window to open, or travel back in time when late
            if time < node.tw_early {
                time = node.tw_early;
            }
            if time > node.tw_late {
                time_warp += time - node.tw_late;
                time = node.tw_late;
            }

            time += node.service_duration;
            load += node.demand;
            sum_x += node.x;
            sum_y += node.y;
            prev = client;
        }

        let mut centroid = (0.0, 0.0);

        if !visits.is_empty() {
            distance += data.distance(prev, DEPOT);
            time += data.duration(prev, DEPOT);

            if time > depot.tw_late {
                time_warp += time - depot.tw_late;
                time = depot.tw_late;
            }

            let count = visits.len() as f64;
            centroid = (sum_x / count, sum_y / count);
        }

        Route {
            excess_load: (load - data.vehicle_capacity).max(0.0),
            duration: if visits.is_empty() { 0.0 } else { time - start },
            visits,
            distance,
            load,
            time_warp,
            centroid,
        }
    }

    pub fn visits(&self) -> &[usize] {
        &self.visits
    }

    pub fn len(&self) -> usize {
        self.visits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Time from leaving the depot until returning to it, including waiting.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn load(&self) -> f64 {
        self.load
    }

    pub fn excess_load(&self) -> f64 {
        self.excess_load
    }

    pub fn time_warp(&self) -> f64 {
        self.time_warp
    }

    /// Mean client coordinates of this route.
    pub fn centroid(&self) -> (f64, f64) {
        self.centroid
    }

    pub fn has_excess_load(&self) -> bool {
        self.excess_load > FEASIBILITY_TOLERANCE
    }

    pub fn has_time_warp(&self) -> bool {
        self.time_warp > FEASIBILITY_TOLERANCE
    }

    pub fn is_feasible(&self) -> bool {
        !self.has_excess_load() && !self.has_time_warp()
    }
}

/// Represents a complete solution to a VRPTW instance.
///
/// Solutions are values: operators never mutate one in place but build a new
/// solution through [`Solution::with_replaced_routes`]. Every client is
/// visited exactly once and at most `num_vehicles` routes are used.
#[derive(Clone, PartialEq, Serialize)]
pub struct Solution {
    routes: Vec<Route>,
    distance: f64,
    excess_load: f64,
    time_warp: f64,
    /// (predecessor, successor) per client; index 0 is unused
    #[serde(skip)]
    neighbours: Vec<(usize, usize)>,
    /// (route index, position) per client; index 0 is unused
    #[serde(skip)]
    locations: Vec<(usize, usize)>,
}

impl Solution {
    /// Create a solution from visit sequences, one per route.
    ///
    /// Empty routes are dropped. Fails when a client is missing, visited twice,
    /// unknown, or when more routes than vehicles are used.
    pub fn new(data: &ProblemData, routes: Vec<Vec<usize>>) -> Result<Self> {
        let routes = routes
            .into_iter()
            .map(|visits| Route::new(data, visits))
            .collect();

        Self::from_routes(data, routes)
    }

    /// Create a solution from already evaluated routes.
    pub fn from_routes(data: &ProblemData, routes: Vec<Route>) -> Result<Self> {
        let routes: Vec<Route> = routes.into_iter().filter(|r| !r.is_empty()).collect();

        if routes.len() > data.num_vehicles {
            return Err(Error::InvalidSolution(format!(
                "{} routes exceed the fleet of {} vehicles",
                routes.len(),
                data.num_vehicles
            )));
        }

        let n = data.num_clients();
        let mut neighbours = vec![(DEPOT, DEPOT); n + 1];
        let mut locations = vec![(UNVISITED, UNVISITED); n + 1];

        for (r_idx, route) in routes.iter().enumerate() {
            for (pos, &client) in route.visits.iter().enumerate() {
                if client == DEPOT || client > n {
                    return Err(Error::InvalidSolution(format!(
                        "route {} visits unknown client {}",
                        r_idx, client
                    )));
                }
                if locations[client].0 != UNVISITED {
                    return Err(Error::InvalidSolution(format!(
                        "client {} is visited more than once",
                        client
                    )));
                }

                locations[client] = (r_idx, pos);

                let pred = if pos == 0 { DEPOT } else { route.visits[pos - 1] };
                let succ = route.visits.get(pos + 1).copied().unwrap_or(DEPOT);
                neighbours[client] = (pred, succ);
            }
        }

        if let Some(missing) = (1..=n).find(|&c| locations[c].0 == UNVISITED) {
            return Err(Error::InvalidSolution(format!(
                "client {} is not visited",
                missing
            )));
        }

        let distance = routes.iter().map(Route::distance).sum();
        let excess_load = routes.iter().map(Route::excess_load).sum();
        let time_warp = routes.iter().map(Route::time_warp).sum();

        Ok(Solution {
            routes,
            distance,
            excess_load,
            time_warp,
            neighbours,
            locations,
        })
    }

    /// Copy this solution with some routes replaced.
    ///
    /// A replacement index equal to or beyond the current route count appends a
    /// new route. The result is validated like [`Solution::new`].
    pub fn with_replaced_routes(
        &self,
        data: &ProblemData,
        replacements: Vec<(usize, Route)>,
    ) -> Result<Self> {
        let mut routes = self.routes.clone();

        for (idx, route) in replacements {
            if idx < routes.len() {
                routes[idx] = route;
            } else {
                routes.push(route);
            }
        }

        Self::from_routes(data, routes)
    }

    /// Random solution spreading shuffled clients evenly over the fleet.
    pub fn make_random(data: &ProblemData, rng: &mut RandomNumberGenerator) -> Result<Self> {
        let mut clients: Vec<usize> = data.clients().collect();
        rng.shuffle(&mut clients);

        if clients.is_empty() {
            return Self::new(data, Vec::new());
        }

        let num_routes = data.num_vehicles.min(clients.len()).max(1);
        let per_route = (clients.len() + num_routes - 1) / num_routes;
        let routes = clients.chunks(per_route).map(|c| c.to_vec()).collect();

        Self::new(data, routes)
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    pub fn num_clients(&self) -> usize {
        self.locations.len().saturating_sub(1)
    }

    /// Total travelled distance.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Total load in excess of the vehicle capacity, summed over routes.
    pub fn excess_load(&self) -> f64 {
        self.excess_load
    }

    pub fn time_warp(&self) -> f64 {
        self.time_warp
    }

    pub fn has_excess_load(&self) -> bool {
        self.excess_load > FEASIBILITY_TOLERANCE
    }

    pub fn has_time_warp(&self) -> bool {
        self.time_warp > FEASIBILITY_TOLERANCE
    }

    pub fn is_feasible(&self) -> bool {
        !self.has_excess_load() && !self.has_time_warp()
    }

    /// (predecessor, successor) of every client, the depot being 0. Index 0 is unused.
    pub fn neighbours(&self) -> &[(usize, usize)] {
        &self.neighbours
    }

    /// (route index, position in route) of a client.
    pub fn location(&self, client: usize) -> (usize, usize) {
        self.locations[client]
    }

    /// All visits concatenated in route order, without depot delimiters.
    pub fn giant_tour(&self) -> Vec<usize> {
        self.routes
            .iter()
            .flat_map(|route| route.visits.iter().copied())
            .collect()
    }
}

impl fmt::Debug for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Solution:")?;
        writeln!(f, "  Distance: {:.2}", self.distance)?;
        writeln!(f, "  Excess Load: {:.2}", self.excess_load)?;
        writeln!(f, "  Time Warp: {:.2}", self.time_warp)?;
        writeln!(f, "  Feasible: {}", self.is_feasible())?;
        writeln!(f, "  Routes: {}", self.routes.len())?;

        for (i, route) in self.routes.iter().enumerate() {
            writeln!(
                f,
                "  Route {}: {:?} (Load: {:.2}, Distance: {:.2}, Time Warp: {:.2})",
                i, route.visits, route.load, route.distance, route.time_warp
            )?;
        }

        Ok(())
    }
}
