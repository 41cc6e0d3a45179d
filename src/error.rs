//! Error types for concurrent-flow

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or solving a concurrent-flow problem
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Invalid solver parameter or problem data
    #[error("invalid parameter: {0}")]
    Parameter(String),

    /// A commodity with residual demand has no path to its sink
    #[error("sink {sink} unreachable from source {source_node}")]
    UnreachableSink {
        /// Source node of the offending commodity
        source_node: String,
        /// Sink node of the offending commodity
        sink: String,
    },

    /// Demand rescaling failed because a commodity admits no flow at all
    #[error("max-flow infeasible: {0}")]
    InfeasibleForMaxFlow(String),

    /// The dual objective failed to increase across a phase (numerical breakdown)
    #[error("dual objective did not increase in phase {phase} (D = {dual})")]
    NonMonotonicDual {
        /// Phase at which growth stopped
        phase: usize,
        /// Dual objective value observed twice
        dual: f64,
    },
}

impl Error {
    /// Create a parameter error
    pub fn parameter(msg: impl Into<String>) -> Self {
        Self::Parameter(msg.into())
    }

    /// Create an unreachable-sink error from node keys
    pub fn unreachable_sink(source: impl std::fmt::Debug, sink: impl std::fmt::Debug) -> Self {
        Self::UnreachableSink {
            source_node: format!("{source:?}"),
            sink: format!("{sink:?}"),
        }
    }

    /// Create a max-flow infeasibility error
    pub fn infeasible_for_max_flow(msg: impl Into<String>) -> Self {
        Self::InfeasibleForMaxFlow(msg.into())
    }
}
