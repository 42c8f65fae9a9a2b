//! Stopping criteria ending a genetic algorithm run.

use log::debug;
use std::time::{Duration, Instant};

/// Decides, once per iteration, whether the search should end.
pub trait StoppingCriterion {
    /// `best_cost` is the objective of the best solution found so far.
    fn should_stop(&mut self, best_cost: f64) -> bool;
}

impl<F> StoppingCriterion for F
where
    F: FnMut(f64) -> bool,
{
    fn should_stop(&mut self, best_cost: f64) -> bool {
        self(best_cost)
    }
}

/// Stops after a fixed number of iterations.
#[derive(Debug, Clone)]
pub struct MaxIterations {
    max_iterations: usize,
    current: usize,
}

impl MaxIterations {
    pub fn new(max_iterations: usize) -> Self {
        MaxIterations {
            max_iterations,
            current: 0,
        }
    }
}

impl StoppingCriterion for MaxIterations {
    fn should_stop(&mut self, _best_cost: f64) -> bool {
        if self.current >= self.max_iterations {
            return true;
        }

        self.current += 1;
        false
    }
}

/// Stops once a wall-clock budget is spent. The clock starts on the first call.
#[derive(Debug, Clone)]
pub struct MaxRuntime {
    max_runtime: Duration,
    start: Option<Instant>,
}

impl MaxRuntime {
    pub fn new(max_runtime: Duration) -> Self {
        MaxRuntime {
            max_runtime,
            start: None,
        }
    }
}

impl StoppingCriterion for MaxRuntime {
    fn should_stop(&mut self, _best_cost: f64) -> bool {
        let start = *self.start.get_or_insert_with(Instant::now);
        start.elapsed() >= self.max_runtime
    }
}

/// Stops after a number of consecutive calls without a strictly better best cost.
#[derive(Debug, Clone)]
pub struct NoImprovement {
    max_iterations: usize,
    target: f64,
    counter: usize,
}

impl NoImprovement {
    pub fn new(max_iterations: usize) -> Self {
        NoImprovement {
            max_iterations,
            target: f64::INFINITY,
            counter: 0,
        }
    }
}

impl StoppingCriterion for NoImprovement {
    fn should_stop(&mut self, best_cost: f64) -> bool {
        if best_cost < self.target {
            self.target = best_cost;
            self.counter = 0;
        } else {
            self.counter += 1;
        }

        self.counter >= self.max_iterations
    }
}

/// Stops as soon as any member criterion does.
///
/// Every member sees every call, so stateful members such as
/// [`NoImprovement`] keep counting even when another one triggers first.
#[derive(Default)]
pub struct AnyOf {
    criteria: Vec<Box<dyn StoppingCriterion>>,
}

impl AnyOf {
    pub fn new(criteria: Vec<Box<dyn StoppingCriterion>>) -> Self {
        AnyOf { criteria }
    }

    pub fn with(mut self, criterion: Box<dyn StoppingCriterion>) -> Self {
        self.criteria.push(criterion);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }
}

impl StoppingCriterion for AnyOf {
    fn should_stop(&mut self, best_cost: f64) -> bool {
        let stop = self
            .criteria
            .iter_mut()
            .fold(false, |stop, criterion| criterion.should_stop(best_cost) || stop);

        if stop {
            debug!("Stopping criterion met at best cost {:.3}", best_cost);
        }

        stop
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_max_iterations() {
        let mut stop = MaxIterations::new(3);
        assert!(!stop.should_stop(1.0));
        assert!(!stop.should_stop(1.0));
        assert!(!stop.should_stop(1.0));
        assert!(stop.should_stop(1.0));
    }

    #[test]
    fn test_no_improvement_resets_on_better_cost() {
        let mut stop = NoImprovement::new(2);
        assert!(!stop.should_stop(10.0));
        assert!(!stop.should_stop(10.0));
        assert!(!stop.should_stop(9.0));
        assert!(!stop.should_stop(9.0));
        assert!(stop.should_stop(9.0));
    }

    #[test]
    fn test_max_runtime_zero_stops_immediately() {
        let mut stop = MaxRuntime::new(Duration::ZERO);
        assert!(stop.should_stop(f64::INFINITY));
    }

    #[test]
    fn test_any_of_evaluates_every_member() {
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);

        let criteria: Vec<Box<dyn StoppingCriterion>> = vec![
            Box::new(MaxIterations::new(0)),
            Box::new(move |_: f64| {
                seen.set(seen.get() + 1);
                false
            }),
        ];
        let mut stop = AnyOf::new(criteria);

        assert!(stop.should_stop(5.0));
        assert!(stop.should_stop(5.0));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_empty_any_of_never_stops() {
        let mut stop = AnyOf::default();
        assert!(stop.is_empty());
        assert!(!stop.should_stop(1.0));
    }
}
