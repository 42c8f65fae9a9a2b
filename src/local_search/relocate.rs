//! Relocate neighborhood for local search.

use crate::cost_evaluator::CostEvaluator;
use crate::problem::{ProblemData, DEPOT};
use crate::solution::{Route, Solution};

use super::utils::{replace_if_improving, replacement_delta, with_inserted, without, EPSILON};
use super::NodeOperator;

/// Moves client `u` directly after or before `v`.
///
/// With `v` the depot, `u` moves into a new route of its own when the fleet
/// still has a spare vehicle.
#[derive(Debug, Clone, Copy, Default)]
pub struct Relocate;

impl NodeOperator for Relocate {
    fn name(&self) -> &'static str {
        "relocate"
    }

    fn try_apply(
        &mut self,
        solution: &Solution,
        u: usize,
        v: usize,
        data: &ProblemData,
        cost_evaluator: &CostEvaluator,
    ) -> Option<Solution> {
        let (r_u, pos_u) = solution.location(u);
        let route_u = &solution.routes()[r_u];

        if v == DEPOT {
            if route_u.len() < 2 || solution.num_routes() >= data.num_vehicles {
                return None;
            }

            let replacements = vec![
                (r_u, Route::new(data, without(route_u, pos_u))),
                (solution.num_routes(), Route::new(data, vec![u])),
            ];
            return replace_if_improving(solution, data, cost_evaluator, replacements);
        }

        let (r_v, _) = solution.location(v);

        if r_u == r_v {
            let remaining = without(route_u, pos_u);
            let pos_v = remaining.iter().position(|&c| c == v)?;

            let best = [pos_v + 1, pos_v]
                .into_iter()
                .map(|pos| vec![(r_u, Route::new(data, with_inserted(&remaining, pos, u)))])
                .min_by(|a, b| {
                    replacement_delta(solution, cost_evaluator, a)
                        .total_cmp(&replacement_delta(solution, cost_evaluator, b))
                })?;

            return replace_if_improving(solution, data, cost_evaluator, best);
        }

        let new_u = Route::new(data, without(route_u, pos_u));
        let route_v = &solution.routes()[r_v];
        let pos_v = solution.location(v).1;

        let mut best: Option<(f64, Vec<(usize, Route)>)> = None;

        for pos in [pos_v + 1, pos_v] {
            let replacements = vec![
                (r_u, new_u.clone()),
                (r_v, Route::new(data, with_inserted(route_v.visits(), pos, u))),
            ];
            let delta = replacement_delta(solution, cost_evaluator, &replacements);

            if delta < best.as_ref().map_or(-EPSILON, |(d, _)| *d) {
                best = Some((delta, replacements));
            }
        }

        let (_, replacements) = best?;
        solution.with_replaced_routes(data, replacements).ok()
    }
}
