//! # concurrent-flow
//!
//! Approximation algorithms for the **maximum concurrent multi-commodity
//! flow** problem on directed capacitated graphs: given commodities with
//! sources, sinks and demands, find the largest `beta` such that
//! `beta * demand` units of every commodity can be routed simultaneously
//! without violating any edge capacity.
//!
//! The solver is the Garg-Konemann iterative dual method with multiplicative
//! length updates, producing a `(1 - eps)`-approximation, plus two
//! refinements:
//!
//! - **beta scaling** - demands are preconditioned via per-commodity max
//!   flow and doubled on a fixed phase schedule,
//! - **Karakostas grouping** - commodities sharing a source are routed off
//!   one shortest-path tree per phase.
//!
//! ## Quick Start
//!
//! ```rust
//! use concurrent_flow::{maximum_concurrent_flow, Commodity, ConcurrentFlowProblem,
//!                       Edge, SolverOptions};
//!
//! let edges = vec![
//!     Edge::new("S", "A", 4.0).unwrap(),
//!     Edge::new("A", "T", 3.0).unwrap(),
//! ];
//! let commodities = vec![Commodity::new("S", "T", 3.0).unwrap()];
//! let problem = ConcurrentFlowProblem::new(edges, commodities).unwrap();
//!
//! let solution = maximum_concurrent_flow(&problem, &SolverOptions::with_error(0.5)).unwrap();
//! let routed = solution.flow_between(&problem, &"A", &"T").unwrap();
//! assert!(routed > 2.0);
//! println!("routed {routed} of 3.0 in {} phases", solution.stats.phases);
//! ```
//!
//! ## Modules
//!
//! The public surface is the three operations
//! [`maximum_concurrent_flow`], [`estimate_beta`] and [`two_approx`],
//! together with the [`Edge`] / [`Commodity`] / [`ConcurrentFlowProblem`]
//! constructors. Graph storage, shortest paths and the single-commodity max
//! flow used for demand rescaling are internal.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod error;
mod graph;
mod params;
mod problem;
mod solver;
mod types;

pub use error::{Error, Result};
pub use problem::{Commodity, ConcurrentFlowProblem, Edge};
pub use solver::{
    estimate_beta, maximum_concurrent_flow, two_approx, BetaEstimate, ConcurrentFlowSolution,
    SolverOptions,
};
pub use types::*;

/// Prelude for common imports
pub mod prelude {
    pub use crate::{
        estimate_beta, maximum_concurrent_flow, two_approx, Commodity, ConcurrentFlowProblem,
        ConcurrentFlowSolution, Edge, SolverOptions,
    };
    pub use crate::Error;
    pub use crate::Result;
}
