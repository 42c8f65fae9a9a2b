//! Per-iteration statistics collected during a run.

use crate::cost_evaluator::CostEvaluator;
use crate::error::Result;
use crate::population::{Population, SubPopulation};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

/// Snapshot of one subpopulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubPopulationStatistics {
    pub size: usize,
    /// Lowest penalised cost; infinite when the subpopulation is empty
    pub best_cost: f64,
    pub avg_cost: f64,
    /// Mean broken-pairs distance to the closest members
    pub avg_diversity: f64,
}

impl SubPopulationStatistics {
    fn collect(subpop: &SubPopulation, cost_evaluator: &CostEvaluator, nb_close: usize) -> Self {
        let costs: Vec<f64> = subpop
            .individuals()
            .iter()
            .map(|individual| cost_evaluator.penalised_cost(&individual.solution))
            .collect();

        let best_cost = costs.iter().copied().fold(f64::INFINITY, f64::min);
        let avg_cost = if costs.is_empty() {
            f64::INFINITY
        } else {
            costs.iter().sum::<f64>() / costs.len() as f64
        };

        SubPopulationStatistics {
            size: subpop.len(),
            best_cost,
            avg_cost,
            avg_diversity: subpop.avg_diversity(nb_close),
        }
    }
}

/// Statistics recorded once per iteration when collection is enabled.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Statistics {
    pub num_iterations: usize,
    /// Seconds spent since the previous collection
    pub runtimes: Vec<f64>,
    pub feasible: Vec<SubPopulationStatistics>,
    pub infeasible: Vec<SubPopulationStatistics>,
    #[serde(skip)]
    last: Option<Instant>,
}

impl Statistics {
    pub fn new() -> Self {
        Statistics::default()
    }

    /// Record a snapshot of the population.
    pub fn collect_from(&mut self, population: &Population, cost_evaluator: &CostEvaluator) {
        let now = Instant::now();
        let elapsed = self
            .last
            .map_or(0.0, |last| now.duration_since(last).as_secs_f64());
        self.last = Some(now);

        let nb_close = population.params().nb_close;

        self.num_iterations += 1;
        self.runtimes.push(elapsed);
        self.feasible.push(SubPopulationStatistics::collect(
            population.feasible(),
            cost_evaluator,
            nb_close,
        ));
        self.infeasible.push(SubPopulationStatistics::collect(
            population.infeasible(),
            cost_evaluator,
            nb_close,
        ));
    }

    pub fn is_empty(&self) -> bool {
        self.num_iterations == 0
    }

    /// Write one line per collected iteration.
    pub fn to_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut file = BufWriter::new(File::create(path)?);

        writeln!(
            file,
            "iteration,runtime,feas_size,feas_best,feas_avg,feas_diversity,\
             infeas_size,infeas_best,infeas_avg,infeas_diversity"
        )?;

        let rows = self
            .runtimes
            .iter()
            .zip(&self.feasible)
            .zip(&self.infeasible)
            .enumerate();

        for (i, ((runtime, feas), infeas)) in rows {
            writeln!(
                file,
                "{},{:.6},{},{:.3},{:.3},{:.4},{},{:.3},{:.3},{:.4}",
                i,
                runtime,
                feas.size,
                feas.best_cost,
                feas.avg_cost,
                feas.avg_diversity,
                infeas.size,
                infeas.best_cost,
                infeas.avg_cost,
                infeas.avg_diversity
            )?;
        }

        file.flush()?;
        Ok(())
    }
}
