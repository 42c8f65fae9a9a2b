//! 2-Opt neighborhood for local search (intra-route).

use crate::cost_evaluator::CostEvaluator;
use crate::problem::{ProblemData, DEPOT};
use crate::solution::{Route, Solution};

use super::utils::replace_if_improving;
use super::NodeOperator;

/// Reverses the route segment between `u` and `v`.
///
/// The edges leaving `u` and `v` are replaced by `(u, v)` and the edge between
/// their former successors. With `v` the depot, the segment from the route
/// start up to `u` is reversed.
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoOpt;

impl NodeOperator for TwoOpt {
    fn name(&self) -> &'static str {
        "two_opt"
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
        let mut visits = solution.routes()[r_u].visits().to_vec();

        let (start, end) = if v == DEPOT {
            (0, pos_u)
        } else {
            let (r_v, pos_v) = solution.location(v);

            if r_u != r_v {
                return None;
            }

            // Reverse the part strictly after the earlier client up to the later one
            (pos_u.min(pos_v) + 1, pos_u.max(pos_v))
        };

        if end <= start {
            return None;
        }

        visits[start..=end].reverse();

        replace_if_improving(
            solution,
            data,
            cost_evaluator,
            vec![(r_u, Route::new(data, visits))],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::Node;

    #[test]
    fn test_two_opt_removes_crossing() {
        let data = ProblemData::new(
            "square".to_string(),
            vec![
                Node::new(0.0, 0.0, 0.0),
                Node::new(0.0, 1.0, 1.0),
                Node::new(1.0, 1.0, 1.0),
                Node::new(1.0, 0.0, 1.0),
            ],
            10.0,
            1,
        );
        let ce = CostEvaluator::new(1.0, 1.0);
        // 0 -> 1 -> 3 -> 2 -> 0 crosses itself
        let solution = Solution::new(&data, vec![vec![1, 3, 2]]).unwrap();

        let improved = TwoOpt.try_apply(&solution, 1, 2, &data, &ce).unwrap();
        assert_eq!(improved.routes()[0].visits(), &[1, 2, 3]);
        assert!((improved.distance() - 4.0).abs() < 1e-9);
    }
}
