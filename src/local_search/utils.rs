//! Utility functions for local search operations.

use crate::cost_evaluator::CostEvaluator;
use crate::problem::{ProblemData, DEPOT};
use crate::solution::{Route, Solution};

/// Penalised-cost improvements at or below this value are ignored.
pub const EPSILON: f64 = 1e-6;

/// Generate a list of neighbors for a client based on granularity.
///
/// Neighbours are the `granularity` closest other clients, nearest first.
pub fn get_neighbors(client: usize, data: &ProblemData, granularity: usize) -> Vec<usize> {
    let mut distances: Vec<(usize, f64)> = data
        .clients()
        .filter(|&other| other != client)
        .map(|other| (other, data.distance(client, other)))
        .collect();

    distances.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
    distances.truncate(granularity);

    distances.into_iter().map(|(idx, _)| idx).collect()
}

/// Polar angle of a point around the depot, in degrees within `[0, 360)`.
pub fn polar_angle_degrees(data: &ProblemData, point: (f64, f64)) -> f64 {
    let depot = data.depot();
    let angle = (point.1 - depot.y).atan2(point.0 - depot.x).to_degrees();

    if angle < 0.0 {
        angle + 360.0
    } else {
        angle
    }
}

/// Whether the centroids of two routes lie within `tolerance_degrees` of each
/// other as seen from the depot. The angular difference wraps around 360°.
pub fn routes_overlap(
    data: &ProblemData,
    first: &Route,
    second: &Route,
    tolerance_degrees: f64,
) -> bool {
    if tolerance_degrees >= 360.0 {
        return true;
    }

    let a = polar_angle_degrees(data, first.centroid());
    let b = polar_angle_degrees(data, second.centroid());
    let diff = (a - b).abs();

    diff.min(360.0 - diff) <= tolerance_degrees
}

/// Visits of `route` without the client at `pos`.
pub fn without(route: &Route, pos: usize) -> Vec<usize> {
    let mut visits = route.visits().to_vec();
    visits.remove(pos);
    visits
}

/// Visits of `route` with `client` inserted at `pos`.
pub fn with_inserted(visits: &[usize], pos: usize, client: usize) -> Vec<usize> {
    let mut visits = visits.to_vec();
    visits.insert(pos, client);
    visits
}

/// Distance delta of inserting `client` at `pos` in `visits`.
pub fn insertion_delta(data: &ProblemData, visits: &[usize], pos: usize, client: usize) -> f64 {
    let prev = if pos > 0 { visits[pos - 1] } else { DEPOT };
    let next = visits.get(pos).copied().unwrap_or(DEPOT);

    data.distance(prev, client) + data.distance(client, next) - data.distance(prev, next)
}

/// Change in penalised cost when the given routes replace their counterparts.
///
/// An index at or beyond the route count adds a new route.
pub fn replacement_delta(
    solution: &Solution,
    cost_evaluator: &CostEvaluator,
    replacements: &[(usize, Route)],
) -> f64 {
    replacements
        .iter()
        .map(|(idx, route)| {
            let old = solution
                .routes()
                .get(*idx)
                .map_or(0.0, |r| cost_evaluator.route_penalised_cost(r));
            cost_evaluator.route_penalised_cost(route) - old
        })
        .sum()
}

/// Apply the replacements when they lower the penalised cost by more than [`EPSILON`].
pub fn replace_if_improving(
    solution: &Solution,
    data: &ProblemData,
    cost_evaluator: &CostEvaluator,
    replacements: Vec<(usize, Route)>,
) -> Option<Solution> {
    if replacement_delta(solution, cost_evaluator, &replacements) < -EPSILON {
        solution.with_replaced_routes(data, replacements).ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::Node;

    fn star() -> ProblemData {
        let nodes = vec![
            Node::new(0.0, 0.0, 0.0),
            Node::new(1.0, 0.0, 1.0),
            Node::new(0.0, 1.0, 1.0),
            Node::new(-1.0, 0.0, 1.0),
            Node::new(3.0, 0.0, 1.0),
        ];
        ProblemData::new("star".to_string(), nodes, 10.0, 4)
    }

    #[test]
    fn test_get_neighbors_sorted_by_distance() {
        let data = star();
        assert_eq!(get_neighbors(1, &data, 2), vec![2, 3]);
        assert_eq!(get_neighbors(4, &data, 10), vec![1, 2, 3]);
        assert!(get_neighbors(1, &data, 0).is_empty());
    }

    #[test]
    fn test_overlap_wraps_around() {
        let data = ProblemData::new(
            "wrap".to_string(),
            vec![
                Node::new(0.0, 0.0, 0.0),
                Node::new(10.0, 0.5, 1.0),
                Node::new(10.0, -0.5, 1.0),
                Node::new(-10.0, 0.0, 1.0),
            ],
            10.0,
            3,
        );
        let above = Route::new(&data, vec![1]);
        let below = Route::new(&data, vec![2]);
        let opposite = Route::new(&data, vec![3]);

        assert!(routes_overlap(&data, &above, &below, 10.0));
        assert!(!routes_overlap(&data, &above, &opposite, 90.0));
        assert!(routes_overlap(&data, &above, &opposite, 360.0));
    }

    #[test]
    fn test_insertion_delta() {
        let data = star();
        // Depot -> 1 -> depot, inserting 4 after 1
        assert!((insertion_delta(&data, &[1], 1, 4) - 4.0).abs() < 1e-9);
    }
}
