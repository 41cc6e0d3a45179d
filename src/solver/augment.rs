//! Per-commodity augmentation along recomputed shortest paths
//!
//! One phase's worth of routing for a single commodity: push the demand in
//! capacity-limited chunks, bumping lengths after every chunk. The path is
//! recomputed between chunks because the bumps can move the shortest path.

use super::SolveState;
use crate::graph::dijkstra;
use crate::params::FP_ERROR_MARGIN;
use crate::Result;
use std::fmt::Debug;
use std::hash::Hash;

/// Route the working demand of `commodity` from its source to its sink
pub(crate) fn route<N>(state: &mut SolveState<'_, N>, commodity: usize) -> Result<()>
where
    N: Clone + Eq + Hash + Debug,
{
    let (source, sink) = state.problem.commodity_endpoints()[commodity];
    let mut remaining = state.demands[commodity];

    while remaining > FP_ERROR_MARGIN {
        state.shortest_path_runs += 1;
        let path = dijkstra::path(&state.net, source, sink)
            .ok_or_else(|| state.unreachable(commodity))?;

        let chunk = state.net.bottleneck(&path).min(remaining);
        for &edge in &path {
            state.net.push_flow(edge, chunk);
            state.net.bump_length(edge, state.epsilon, chunk);
        }
        remaining -= chunk;
    }

    Ok(())
}
