//! 2-Opt* neighborhood for local search (inter-route).

use crate::cost_evaluator::CostEvaluator;
use crate::problem::{ProblemData, DEPOT};
use crate::solution::{Route, Solution};

use super::utils::replace_if_improving;
use super::NodeOperator;

/// Exchanges the tails of two routes: the clients after `u` move behind `v`
/// and the clients after `v` move behind `u`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoOptStar;

impl NodeOperator for TwoOptStar {
    fn name(&self) -> &'static str {
        "two_opt_star"
    }

    fn try_apply(
        &mut self,
        solution: &Solution,
        u: usize,
        v: usize,
        data: &ProblemData,
        cost_evaluator: &CostEvaluator,
    ) -> Option<Solution> {
        if v == DEPOT {
            return None;
        }

        let (r_u, pos_u) = solution.location(u);
        let (r_v, pos_v) = solution.location(v);

        if r_u == r_v {
            return None;
        }

        let visits_u = solution.routes()[r_u].visits();
        let visits_v = solution.routes()[r_v].visits();

        let new_u: Vec<usize> = visits_u[..=pos_u]
            .iter()
            .chain(&visits_v[pos_v + 1..])
            .copied()
            .collect();
        let new_v: Vec<usize> = visits_v[..=pos_v]
            .iter()
            .chain(&visits_u[pos_u + 1..])
            .copied()
            .collect();

        replace_if_improving(
            solution,
            data,
            cost_evaluator,
            vec![
                (r_u, Route::new(data, new_u)),
                (r_v, Route::new(data, new_v)),
            ],
        )
    }
}
