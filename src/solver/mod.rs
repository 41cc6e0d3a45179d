//! Maximum concurrent flow solver
//!
//! Garg-Konemann style iterative dual solver. Every edge carries a length
//! that starts at `delta / capacity` and grows multiplicatively as flow is
//! routed over it; phases sweep all commodities along shortest paths by
//! length until the dual objective `D(l) = sum c(e) * l(e)` reaches 1, then
//! the accumulated flows are divided by `log_{1+eps}(1/delta)` to become
//! capacity-respecting.
//!
//! Three entry points:
//!
//! - [`maximum_concurrent_flow`] - the full solve, returning scaled per-edge
//!   flows,
//! - [`estimate_beta`] - a dual-feasibility estimate `D(l) / alpha(l)` of the
//!   concurrency `beta`, without final scaling,
//! - [`two_approx`] - preconditions demands with a loose `estimate_beta`
//!   pass, then reruns at the target tolerance.
//!
//! ## Example
//!
//! ```rust
//! use concurrent_flow::{maximum_concurrent_flow, Commodity, ConcurrentFlowProblem,
//!                       Edge, SolverOptions};
//!
//! let edges = vec![
//!     Edge::new("S", "1", 4.0).unwrap(),
//!     Edge::new("S", "2", 3.0).unwrap(),
//!     Edge::new("1", "2", 3.0).unwrap(),
//!     Edge::new("1", "T", 4.0).unwrap(),
//!     Edge::new("2", "T", 5.0).unwrap(),
//! ];
//! let commodities = vec![Commodity::new("S", "T", 7.0).unwrap()];
//! let problem = ConcurrentFlowProblem::new(edges, commodities).unwrap();
//!
//! let solution = maximum_concurrent_flow(&problem, &SolverOptions::default()).unwrap();
//! let routed: f64 = solution.flow_between(&problem, &"1", &"T").unwrap()
//!     + solution.flow_between(&problem, &"2", &"T").unwrap();
//! assert!(routed > 6.0 && routed < 7.1);
//! ```

mod augment;
mod grouping;
mod phase;

use crate::graph::max_flow::ResidualNetwork;
use crate::graph::{dijkstra, Network};
use crate::params::{self, FP_ERROR_MARGIN};
use crate::{ConcurrentFlowProblem, Error, Result, SolverStats, SolverStatus};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;
use std::time::Instant;
use tracing::debug;

/// Options for a solver run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverOptions {
    /// Relative error tolerance of the approximation (must be positive)
    pub error: f64,
    /// Precondition demands via per-commodity max flow and double them on a
    /// fixed phase schedule
    pub scale_beta: bool,
    /// Share one shortest-path tree among commodities with a common source
    pub karakostas: bool,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            error: 0.05,
            scale_beta: false,
            karakostas: false,
        }
    }
}

impl SolverOptions {
    /// Options with a given error tolerance
    pub fn with_error(error: f64) -> Self {
        Self {
            error,
            ..Default::default()
        }
    }
}

/// Solution of a concurrent-flow run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConcurrentFlowSolution {
    /// Flow per edge, in the problem's edge order; the aggregate over all
    /// commodities
    pub edge_flows: Vec<f64>,
    /// Solver status
    pub status: SolverStatus,
    /// Statistics
    pub stats: SolverStats,
}

impl ConcurrentFlowSolution {
    /// Routed flow on the `(head, tail)` edge of `problem`
    pub fn flow_between<N>(
        &self,
        problem: &ConcurrentFlowProblem<N>,
        head: &N,
        tail: &N,
    ) -> Option<f64>
    where
        N: Clone + Eq + Hash + Debug,
    {
        problem
            .edge_position(head, tail)
            .map(|idx| self.edge_flows[idx])
    }
}

/// Dual-feasibility estimate of the concurrency `beta`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BetaEstimate {
    /// Estimated largest concurrently routable demand fraction
    pub beta: f64,
    /// Shortest-path computations spent on the estimate
    pub shortest_path_runs: usize,
}

/// Working state of one solve, shared by the phase loop and the augmenters
pub(crate) struct SolveState<'p, N> {
    problem: &'p ConcurrentFlowProblem<N>,
    net: Network,
    /// Working copy of commodity demands; scaling never touches the caller's
    demands: Vec<f64>,
    epsilon: f64,
    delta: f64,
    /// Demand-doubling period, set when `scale_beta` is on
    scaling_threshold: Option<usize>,
    karakostas: bool,
    shortest_path_runs: usize,
    phases: usize,
}

impl<'p, N> SolveState<'p, N>
where
    N: Clone + Eq + Hash + Debug,
{
    fn prepare(
        problem: &'p ConcurrentFlowProblem<N>,
        options: &SolverOptions,
        demand_scale: f64,
        initial_sp_runs: usize,
    ) -> Result<Self> {
        let num_edges = problem.edges().len();
        let epsilon = params::epsilon(options.error)?;
        let delta = params::delta(num_edges, epsilon);

        let capacities: Vec<f64> = problem.edges().iter().map(|e| e.capacity).collect();
        let net = Network::build(
            problem.num_nodes(),
            problem.edge_endpoints(),
            &capacities,
            delta,
        );

        let mut demands: Vec<f64> = problem
            .commodities()
            .iter()
            .map(|c| c.demand * demand_scale)
            .collect();

        let scaling_threshold = if options.scale_beta {
            let z = calculate_z(problem)?;
            let k = demands.len() as f64;
            for demand in &mut demands {
                *demand *= k / z;
            }
            Some(params::scaling_threshold(num_edges, epsilon))
        } else {
            None
        };

        debug!(
            num_edges,
            num_commodities = demands.len(),
            epsilon,
            delta,
            karakostas = options.karakostas,
            "prepared concurrent-flow solve"
        );

        Ok(Self {
            problem,
            net,
            demands,
            epsilon,
            delta,
            scaling_threshold,
            karakostas: options.karakostas,
            shortest_path_runs: initial_sp_runs,
            phases: 0,
        })
    }

    fn unreachable(&self, commodity: usize) -> Error {
        let (source, sink) = self.problem.commodity_endpoints()[commodity];
        Error::unreachable_sink(self.problem.node_key(source), self.problem.node_key(sink))
    }

    /// `alpha(l) = sum_i d_i * dist_l(s_i, t_i)` under the current lengths
    fn alpha(&mut self) -> Result<f64> {
        let mut total = 0.0;
        for (idx, &(source, sink)) in self.problem.commodity_endpoints().iter().enumerate() {
            self.shortest_path_runs += 1;
            let tree = dijkstra::tree(&self.net, source);
            let dist = tree.distance(sink).ok_or_else(|| self.unreachable(idx))?;
            total += self.demands[idx] * dist;
        }
        Ok(total)
    }

    /// Divide accumulated flows by `log_{1+eps}(1/delta)` and emit them
    fn scaled_flows(&self) -> Vec<f64> {
        let scale = (1.0 / self.delta).ln() / (1.0 + self.epsilon).ln();
        self.net.edges().iter().map(|e| e.flow / scale).collect()
    }

    fn stats(&self, started: Instant) -> SolverStats {
        SolverStats {
            solve_time_seconds: started.elapsed().as_secs_f64(),
            phases: self.phases,
            shortest_path_runs: self.shortest_path_runs,
        }
    }
}

/// Compute the maximum concurrent flow of `problem`
///
/// Returns per-edge flows realizing a concurrency within `1 / (1 + error)`
/// of the optimum, together with phase and shortest-path counts. The caller's
/// problem is not mutated; demand scaling happens on an internal copy.
pub fn maximum_concurrent_flow<N>(
    problem: &ConcurrentFlowProblem<N>,
    options: &SolverOptions,
) -> Result<ConcurrentFlowSolution>
where
    N: Clone + Eq + Hash + Debug,
{
    let started = Instant::now();
    let mut state = SolveState::prepare(problem, options, 1.0, 0)?;
    phase::run(&mut state)?;

    let solution = ConcurrentFlowSolution {
        edge_flows: state.scaled_flows(),
        status: SolverStatus::Feasible,
        stats: state.stats(started),
    };
    debug!(
        phases = solution.stats.phases,
        shortest_path_runs = solution.stats.shortest_path_runs,
        "concurrent-flow solve finished"
    );
    Ok(solution)
}

/// Estimate `beta` from the dual-feasibility ratio `D(l) / alpha(l)`
///
/// Runs the phase loop like [`maximum_concurrent_flow`] but skips the final
/// scaling and instead reports how far the terminal lengths certify the
/// demands to be concurrently routable.
pub fn estimate_beta<N>(
    problem: &ConcurrentFlowProblem<N>,
    options: &SolverOptions,
) -> Result<BetaEstimate>
where
    N: Clone + Eq + Hash + Debug,
{
    let mut state = SolveState::prepare(problem, options, 1.0, 0)?;
    phase::run(&mut state)?;

    let alpha = state.alpha()?;
    Ok(BetaEstimate {
        beta: state.net.dual_objective() / alpha,
        shortest_path_runs: state.shortest_path_runs,
    })
}

/// Two-phase refinement: loose estimate, demand rescale, accurate rerun
///
/// A first pass at error 1.0 yields a `beta` estimate; demands are rescaled
/// by `beta / 2` so the accurate pass starts near feasibility, which cuts
/// its phase count substantially.
pub fn two_approx<N>(
    problem: &ConcurrentFlowProblem<N>,
    options: &SolverOptions,
) -> Result<ConcurrentFlowSolution>
where
    N: Clone + Eq + Hash + Debug,
{
    let started = Instant::now();

    let loose = SolverOptions {
        error: 1.0,
        scale_beta: false,
        karakostas: options.karakostas,
    };
    let estimate = estimate_beta(problem, &loose)?;
    debug!(beta = estimate.beta, "loose beta estimate");

    let target = SolverOptions {
        error: options.error,
        scale_beta: false,
        karakostas: options.karakostas,
    };
    let mut state = SolveState::prepare(
        problem,
        &target,
        estimate.beta / 2.0,
        estimate.shortest_path_runs,
    )?;
    phase::run(&mut state)?;

    Ok(ConcurrentFlowSolution {
        edge_flows: state.scaled_flows(),
        status: SolverStatus::Feasible,
        stats: state.stats(started),
    })
}

/// `z = min_i maxflow(s_i -> t_i) / d_i`, the loose feasibility scale
///
/// Each commodity is checked with an ordinary single-commodity max flow on
/// the full capacities; a commodity that admits no flow at all makes the
/// concurrent problem infeasible.
fn calculate_z<N>(problem: &ConcurrentFlowProblem<N>) -> Result<f64>
where
    N: Clone + Eq + Hash + Debug,
{
    let mut base = ResidualNetwork::new(problem.num_nodes());
    for (&(head, tail), edge) in problem.edge_endpoints().iter().zip(problem.edges()) {
        base.add_edge(head, tail, edge.capacity);
    }

    let mut z = f64::INFINITY;
    for (idx, &(source, sink)) in problem.commodity_endpoints().iter().enumerate() {
        let value = base.clone().max_flow(source, sink);
        if value <= FP_ERROR_MARGIN {
            let commodity = &problem.commodities()[idx];
            return Err(Error::infeasible_for_max_flow(format!(
                "commodity {:?} -> {:?} admits no flow",
                commodity.source, commodity.sink
            )));
        }
        z = z.min(value / problem.commodities()[idx].demand);
    }
    Ok(z)
}
