//! SWAP* neighborhood for local search.

use crate::cost_evaluator::CostEvaluator;
use crate::problem::ProblemData;
use crate::solution::{Route, Solution};

use super::utils::{insertion_delta, replacement_delta, with_inserted, without, EPSILON};
use super::RouteOperator;

/// Number of cheapest insertion positions evaluated exactly.
const TOP_POSITIONS: usize = 3;

/// Exchanges one client between two routes, inserting each at its best
/// position in the other route rather than in the vacated slot.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwapStar;

impl SwapStar {
    /// Find the top insertion positions for a client in a visit sequence,
    /// ranked by distance delta.
    fn find_top_insertion_positions(
        data: &ProblemData,
        visits: &[usize],
        client: usize,
    ) -> Vec<usize> {
        let mut positions: Vec<(usize, f64)> = (0..=visits.len())
            .map(|pos| (pos, insertion_delta(data, visits, pos, client)))
            .collect();

        positions.sort_by(|a, b| a.1.total_cmp(&b.1));
        positions.truncate(TOP_POSITIONS);
        positions.into_iter().map(|(pos, _)| pos).collect()
    }

    /// Cheapest exact route among the top insertion positions.
    fn best_insertion(
        data: &ProblemData,
        cost_evaluator: &CostEvaluator,
        visits: &[usize],
        client: usize,
    ) -> Option<Route> {
        Self::find_top_insertion_positions(data, visits, client)
            .into_iter()
            .map(|pos| Route::new(data, with_inserted(visits, pos, client)))
            .min_by(|a, b| {
                cost_evaluator
                    .route_penalised_cost(a)
                    .total_cmp(&cost_evaluator.route_penalised_cost(b))
            })
    }
}

impl RouteOperator for SwapStar {
    fn name(&self) -> &'static str {
        "swap_star"
    }

    fn try_apply(
        &mut self,
        solution: &Solution,
        route_u: usize,
        route_v: usize,
        data: &ProblemData,
        cost_evaluator: &CostEvaluator,
    ) -> Option<Solution> {
        if route_u == route_v {
            return None;
        }

        let r1 = solution.routes().get(route_u)?;
        let r2 = solution.routes().get(route_v)?;

        let mut best: Option<(f64, Vec<(usize, Route)>)> = None;

        for (pos1, &client1) in r1.visits().iter().enumerate() {
            let remaining1 = without(r1, pos1);

            for (pos2, &client2) in r2.visits().iter().enumerate() {
                let remaining2 = without(r2, pos2);

                let new1 = Self::best_insertion(data, cost_evaluator, &remaining1, client2)?;
                let new2 = Self::best_insertion(data, cost_evaluator, &remaining2, client1)?;

                let replacements = vec![(route_u, new1), (route_v, new2)];
                let delta = replacement_delta(solution, cost_evaluator, &replacements);

                if delta < best.as_ref().map_or(-EPSILON, |(d, _)| *d) {
                    best = Some((delta, replacements));
                }
            }
        }

        let (_, replacements) = best?;
        solution.with_replaced_routes(data, replacements).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::Node;

    #[test]
    fn test_swap_star_reinserts_at_best_position() {
        let data = ProblemData::new(
            "swap_star".to_string(),
            vec![
                Node::new(0.0, 0.0, 0.0),
                Node::new(1.0, 0.0, 1.0),
                Node::new(2.0, 0.0, 1.0),
                Node::new(0.0, 1.0, 1.0),
                Node::new(0.0, 2.0, 1.0),
            ],
            2.0,
            2,
        );
        let ce = CostEvaluator::new(1.0, 1.0);
        let solution = Solution::new(&data, vec![vec![4, 2], vec![3, 1]]).unwrap();

        let improved = SwapStar.try_apply(&solution, 0, 1, &data, &ce).unwrap();
        assert!(ce.penalised_cost(&improved) < ce.penalised_cost(&solution));
        assert!((improved.distance() - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_swap_star_same_route_is_rejected() {
        let data = ProblemData::new(
            "single".to_string(),
            vec![Node::new(0.0, 0.0, 0.0), Node::new(1.0, 0.0, 1.0)],
            2.0,
            1,
        );
        let ce = CostEvaluator::new(1.0, 1.0);
        let solution = Solution::new(&data, vec![vec![1]]).unwrap();

        assert!(SwapStar.try_apply(&solution, 0, 0, &data, &ce).is_none());
    }
}
