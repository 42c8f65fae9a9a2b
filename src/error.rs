//! Error types for the HGS-VRPTW crate.

use thiserror::Error;

/// Errors raised while configuring or running the hybrid genetic search.
#[derive(Error, Debug)]
pub enum Error {
    #[error("at least one initial solution is required")]
    EmptyInitialSolutions,

    #[error("local search has no {kind} operators registered")]
    NotConfigured { kind: &'static str },

    #[error("invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("cannot select parents from an empty population")]
    EmptyPopulation,

    #[error("invalid solution: {0}")]
    InvalidSolution(String),

    #[error("iteration {iteration} failed during {stage}: {source}")]
    Iteration {
        iteration: usize,
        stage: &'static str,
        #[source]
        source: Box<Error>,
    },

    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error stems from invalid setup rather than from the run itself.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::EmptyInitialSolutions
                | Error::NotConfigured { .. }
                | Error::InvalidParameter { .. }
        )
    }

    pub(crate) fn invalid_parameter(
        name: &'static str,
        value: impl ToString,
        reason: &'static str,
    ) -> Self {
        Error::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    pub(crate) fn in_iteration(self, iteration: usize, stage: &'static str) -> Self {
        Error::Iteration {
            iteration,
            stage,
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_errors_are_grouped() {
        assert!(Error::EmptyInitialSolutions.is_configuration());
        assert!(Error::NotConfigured { kind: "node" }.is_configuration());
        assert!(Error::invalid_parameter("p", 2.0, "must lie in [0, 1]").is_configuration());
        assert!(!Error::EmptyPopulation.is_configuration());
    }

    #[test]
    fn test_iteration_context_is_reported() {
        let error = Error::EmptyPopulation.in_iteration(7, "selection");
        assert_eq!(
            error.to_string(),
            "iteration 7 failed during selection: cannot select parents from an empty population"
        );
        assert!(!error.is_configuration());
    }
}
