//! RELOCATE* neighborhood for local search.

use crate::cost_evaluator::CostEvaluator;
use crate::problem::ProblemData;
use crate::solution::{Route, Solution};

use super::utils::{replacement_delta, with_inserted, without, EPSILON};
use super::RouteOperator;

/// Best single-client move between two routes, in either direction.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelocateStar;

impl RelocateStar {
    fn best_move(
        solution: &Solution,
        data: &ProblemData,
        cost_evaluator: &CostEvaluator,
        from: usize,
        to: usize,
    ) -> Option<(f64, Vec<(usize, Route)>)> {
        let source = &solution.routes()[from];
        let target = &solution.routes()[to];
        let mut best: Option<(f64, Vec<(usize, Route)>)> = None;

        for (pos, &client) in source.visits().iter().enumerate() {
            let new_source = Route::new(data, without(source, pos));

            for insert_pos in 0..=target.len() {
                let new_target =
                    Route::new(data, with_inserted(target.visits(), insert_pos, client));
                let replacements = vec![(from, new_source.clone()), (to, new_target)];
                let delta = replacement_delta(solution, cost_evaluator, &replacements);

                if delta < best.as_ref().map_or(-EPSILON, |(d, _)| *d) {
                    best = Some((delta, replacements));
                }
            }
        }

        best
    }
}

impl RouteOperator for RelocateStar {
    fn name(&self) -> &'static str {
        "relocate_star"
    }

    fn try_apply(
        &mut self,
        solution: &Solution,
        route_u: usize,
        route_v: usize,
        data: &ProblemData,
        cost_evaluator: &CostEvaluator,
    ) -> Option<Solution> {
        if route_u == route_v
            || route_u >= solution.num_routes()
            || route_v >= solution.num_routes()
        {
            return None;
        }

        let forward = Self::best_move(solution, data, cost_evaluator, route_u, route_v);
        let backward = Self::best_move(solution, data, cost_evaluator, route_v, route_u);

        let (_, replacements) = match (forward, backward) {
            (Some(f), Some(b)) => {
                if b.0 < f.0 {
                    b
                } else {
                    f
                }
            }
            (Some(f), None) => f,
            (None, Some(b)) => b,
            (None, None) => return None,
        };

        solution.with_replaced_routes(data, replacements).ok()
    }
}
