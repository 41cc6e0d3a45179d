//! Solver parameterization
//!
//! Derives the internal precision `epsilon`, the initial length normalizer
//! `delta` and the demand-scaling phase threshold from the caller's error
//! tolerance, following the Garg-Konemann analysis.

use crate::{Error, Result};

/// Slack applied wherever an exact-zero test on floats would be unstable
pub const FP_ERROR_MARGIN: f64 = 1e-10;

/// Internal precision for a given error tolerance
///
/// Returns the largest `epsilon` in (0, 1) such that
/// `(1 - epsilon)^-3 <= 1 + error`, shrunk by 1% for numerical slack.
pub fn epsilon(error: f64) -> Result<f64> {
    if error <= 0.0 {
        return Err(Error::parameter(format!(
            "error tolerance must be positive, got {error}"
        )));
    }

    let one_plus = 1.0 + error;
    let eps = (one_plus - one_plus.powf(2.0 / 3.0)) / one_plus * 0.99;

    debug_assert!(
        (1.0 - eps).powi(-3) <= one_plus,
        "epsilon {eps} violates (1-eps)^-3 <= 1 + {error}"
    );
    Ok(eps)
}

/// Initial length normalizer `(m / (1 - epsilon))^(-1 / epsilon)`
///
/// `m` is the number of edges. Every edge starts with length
/// `delta / capacity`.
pub fn delta(num_edges: usize, epsilon: f64) -> f64 {
    (num_edges as f64 / (1.0 - epsilon)).powf(-1.0 / epsilon)
}

/// Phase threshold for geometric demand doubling
///
/// Once every `scaling_threshold` phases the beta-scaling schedule doubles
/// all demands. Derived from the phase bound of the analysis,
/// `2 * (1/eps) * ln(m / (1 - eps)) / ln(1 + eps)`.
pub fn scaling_threshold(num_edges: usize, epsilon: f64) -> usize {
    let phases = 2.0 * (1.0 / epsilon) * (num_edges as f64 / (1.0 - epsilon)).ln()
        / (1.0 + epsilon).ln();
    (phases.floor() as usize).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_epsilon_in_unit_interval() {
        for error in [0.01, 0.05, 0.5, 1.0, 10.0] {
            let eps = epsilon(error).unwrap();
            assert!(eps > 0.0 && eps < 1.0, "epsilon {eps} for error {error}");
        }
    }

    #[test]
    fn test_epsilon_rejects_non_positive_error() {
        assert!(epsilon(0.0).is_err());
        assert!(epsilon(-0.1).is_err());
    }

    #[test]
    fn test_delta_decreases_with_edges() {
        let eps = epsilon(0.5).unwrap();
        assert!(delta(100, eps) < delta(10, eps));
        assert!(delta(10, eps) > 0.0);
    }

    #[test]
    fn test_scaling_threshold_positive() {
        let eps = epsilon(1.0).unwrap();
        assert!(scaling_threshold(5, eps) > 1);
    }

    proptest! {
        #[test]
        fn epsilon_satisfies_error_bound(error in 1e-3..10.0f64) {
            let eps = epsilon(error).unwrap();
            prop_assert!(eps > 0.0 && eps < 1.0);
            prop_assert!((1.0 - eps).powi(-3) <= 1.0 + error);
        }

        #[test]
        fn delta_is_positive_and_small(error in 1e-2..2.0f64, m in 1usize..10_000) {
            let eps = epsilon(error).unwrap();
            let d = delta(m, eps);
            prop_assert!(d > 0.0);
            prop_assert!(d < 1.0);
        }
    }
}
