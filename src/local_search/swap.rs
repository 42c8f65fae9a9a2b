//! Swap neighborhood for local search.

use crate::cost_evaluator::CostEvaluator;
use crate::problem::{ProblemData, DEPOT};
use crate::solution::{Route, Solution};

use super::utils::replace_if_improving;
use super::NodeOperator;

/// Exchanges the positions of clients `u` and `v`, within a route or between two routes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Swap;

impl NodeOperator for Swap {
    fn name(&self) -> &'static str {
        "swap"
    }

    fn try_apply(
        &mut self,
        solution: &Solution,
        u: usize,
        v: usize,
        data: &ProblemData,
        cost_evaluator: &CostEvaluator,
    ) -> Option<Solution> {
        if v == DEPOT || u == v {
            return None;
        }

        let (r_u, pos_u) = solution.location(u);
        let (r_v, pos_v) = solution.location(v);

        let replacements = if r_u == r_v {
            let mut visits = solution.routes()[r_u].visits().to_vec();
            visits.swap(pos_u, pos_v);
            vec![(r_u, Route::new(data, visits))]
        } else {
            let mut visits_u = solution.routes()[r_u].visits().to_vec();
            let mut visits_v = solution.routes()[r_v].visits().to_vec();
            visits_u[pos_u] = v;
            visits_v[pos_v] = u;
            vec![
                (r_u, Route::new(data, visits_u)),
                (r_v, Route::new(data, visits_v)),
            ]
        };

        replace_if_improving(solution, data, cost_evaluator, replacements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::Node;

    #[test]
    fn test_swap_between_routes_fixes_load() {
        let data = ProblemData::new(
            "swap".to_string(),
            vec![
                Node::new(0.0, 0.0, 0.0),
                Node::new(1.0, 0.0, 5.0),
                Node::new(1.0, 0.1, 5.0),
                Node::new(-1.0, 0.0, 1.0),
                Node::new(-1.0, 0.1, 1.0),
            ],
            6.0,
            2,
        );
        let ce = CostEvaluator::new(100.0, 1.0);
        let solution = Solution::new(&data, vec![vec![1, 2], vec![3, 4]]).unwrap();
        assert!(!solution.is_feasible());

        let improved = Swap.try_apply(&solution, 2, 4, &data, &ce).unwrap();
        assert!(improved.is_feasible());
        assert!(ce.penalised_cost(&improved) < ce.penalised_cost(&solution));
    }

    #[test]
    fn test_swap_with_depot_is_rejected() {
        let data = ProblemData::new(
            "swap".to_string(),
            vec![Node::new(0.0, 0.0, 0.0), Node::new(1.0, 0.0, 1.0)],
            6.0,
            1,
        );
        let ce = CostEvaluator::new(1.0, 1.0);
        let solution = Solution::new(&data, vec![vec![1]]).unwrap();

        assert!(Swap.try_apply(&solution, 1, DEPOT, &data, &ce).is_none());
    }
}
