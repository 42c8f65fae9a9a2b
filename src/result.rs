//! Outcome of a genetic algorithm run.

use crate::solution::Solution;
use crate::statistics::Statistics;
use crate::utils::format_duration;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Best solution and bookkeeping of a finished run.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub best: Solution,
    pub stats: Statistics,
    pub num_iterations: usize,
    pub num_restarts: usize,
    pub runtime: Duration,
}

impl SearchResult {
    /// Distance of the best solution, or infinity when it is infeasible.
    pub fn cost(&self) -> f64 {
        if self.best.is_feasible() {
            self.best.distance()
        } else {
            f64::INFINITY
        }
    }

    pub fn is_feasible(&self) -> bool {
        self.best.is_feasible()
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Search Statistics:")?;
        writeln!(f, "- Iterations: {}", self.num_iterations)?;
        writeln!(f, "- Restarts: {}", self.num_restarts)?;
        writeln!(f, "- Runtime: {}", format_duration(self.runtime))?;
        writeln!(f, "- Best Solution Cost: {:.2}", self.cost())?;
        writeln!(f, "- Best Solution Distance: {:.2}", self.best.distance())?;
        writeln!(f, "- Best Solution Feasible: {}", self.is_feasible())?;
        write!(f, "- Best Solution Routes: {}", self.best.num_routes())
    }
}
