//! Crate-wide error type.

use thiserror::Error;

/// Errors raised by network construction, solving, scoring, and optimization.
///
/// Configuration and shape errors fail fast. Evaluation errors raised during
/// a search are contained by the runner and replaced by a penalty value, so
/// [`QnetError::ObjectiveEvaluation`] only reaches a caller that scores a
/// candidate directly.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QnetError {
    #[error("invalid network parameters: {0}")]
    InvalidNetworkParameters(String),

    #[error("invalid routing matrix: {0}")]
    InvalidRoutingMatrix(String),

    #[error("invalid service rate {rate} at station {station}")]
    InvalidServiceRate { station: usize, rate: f64 },

    #[error("unknown objective: {0}")]
    UnknownObjective(String),

    #[error("invalid parameters for objective {objective}: {message}")]
    InvalidObjectiveParams { objective: String, message: String },

    #[error("objective evaluation failed: {0}")]
    ObjectiveEvaluation(String),

    #[error("percent improvement is undefined for a baseline objective of 0")]
    DivisionUndefined,

    #[error("objective value {0} is not finite")]
    NonFiniteObjective(f64),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{field} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, QnetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = QnetError::InvalidServiceRate {
            station: 2,
            rate: -1.0,
        };
        assert_eq!(err.to_string(), "invalid service rate -1 at station 2");

        let err = QnetError::OutOfRange {
            field: "num_customers".into(),
            value: 500.0,
            min: 1.0,
            max: 200.0,
        };
        assert_eq!(err.to_string(), "num_customers = 500 is outside [1, 200]");

        let err = QnetError::NonFiniteObjective(f64::INFINITY);
        assert_eq!(err.to_string(), "objective value inf is not finite");
    }
}
