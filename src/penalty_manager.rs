//! Adaptive penalty weights for capacity and time-window violations.

use crate::config::PenaltyParams;
use crate::cost_evaluator::CostEvaluator;
use crate::error::Result;
use log::debug;

const MIN_PENALTY: f64 = 0.1;
const MAX_PENALTY: f64 = 100_000.0;

/// Feasible fractions within this distance of the target leave a penalty unchanged.
const TARGET_TOLERANCE: f64 = 0.05;

/// Owns the penalty weights and adapts them to the observed feasibility of offspring.
///
/// Load and time-window feasibility are tracked separately: every
/// `num_registrations_between_penalty_updates` observations of one kind, the
/// matching penalty is raised when too few offspring were feasible and lowered
/// when too many were.
#[derive(Debug, Clone)]
pub struct PenaltyManager {
    params: PenaltyParams,
    capacity_penalty: f64,
    tw_penalty: f64,
    load_feasible: Vec<bool>,
    time_feasible: Vec<bool>,
}

impl PenaltyManager {
    pub fn new(params: PenaltyParams) -> Result<Self> {
        params.validate()?;

        Ok(PenaltyManager {
            capacity_penalty: params.init_capacity_penalty,
            tw_penalty: params.init_time_warp_penalty,
            load_feasible: Vec::with_capacity(params.num_registrations_between_penalty_updates),
            time_feasible: Vec::with_capacity(params.num_registrations_between_penalty_updates),
            params,
        })
    }

    pub fn capacity_penalty(&self) -> f64 {
        self.capacity_penalty
    }

    pub fn time_warp_penalty(&self) -> f64 {
        self.tw_penalty
    }

    /// Evaluator using the current penalty weights.
    pub fn get_cost_evaluator(&self) -> CostEvaluator {
        CostEvaluator::new(self.capacity_penalty, self.tw_penalty)
    }

    /// Evaluator with both weights multiplied by the repair booster.
    pub fn get_booster_cost_evaluator(&self) -> CostEvaluator {
        CostEvaluator::new(
            self.capacity_penalty * self.params.repair_booster,
            self.tw_penalty * self.params.repair_booster,
        )
    }

    /// Record whether an accepted solution respected the vehicle capacity.
    pub fn register_load_feasible(&mut self, is_load_feasible: bool) {
        self.load_feasible.push(is_load_feasible);

        if self.load_feasible.len() >= self.params.num_registrations_between_penalty_updates {
            let fraction = feasible_fraction(&self.load_feasible);
            let updated = self.compute_penalty(self.capacity_penalty, fraction);
            debug!(
                "Capacity penalty {:.3} -> {:.3} (feasible fraction {:.2})",
                self.capacity_penalty, updated, fraction
            );
            self.capacity_penalty = updated;
            self.load_feasible.clear();
        }
    }

    /// Record whether an accepted solution respected all time windows.
    pub fn register_time_feasible(&mut self, is_time_feasible: bool) {
        self.time_feasible.push(is_time_feasible);

        if self.time_feasible.len() >= self.params.num_registrations_between_penalty_updates {
            let fraction = feasible_fraction(&self.time_feasible);
            let updated = self.compute_penalty(self.tw_penalty, fraction);
            debug!(
                "Time warp penalty {:.3} -> {:.3} (feasible fraction {:.2})",
                self.tw_penalty, updated, fraction
            );
            self.tw_penalty = updated;
            self.time_feasible.clear();
        }
    }

    fn compute_penalty(&self, penalty: f64, feasible_fraction: f64) -> f64 {
        let diff = self.params.target_feasible - feasible_fraction;

        if diff.abs() < TARGET_TOLERANCE {
            return penalty;
        }

        let updated = if diff > 0.0 {
            // Too few feasible solutions: make violations more expensive
            penalty * self.params.penalty_increase
        } else {
            penalty * self.params.penalty_decrease
        };

        updated.clamp(MIN_PENALTY, MAX_PENALTY)
    }
}

fn feasible_fraction(observations: &[bool]) -> f64 {
    let feasible = observations.iter().filter(|&&f| f).count();
    feasible as f64 / observations.len() as f64
}
