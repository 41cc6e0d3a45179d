//! Per-source grouped augmentation
//!
//! Commodities sharing a source are routed off one shortest-path tree, which
//! amortizes the Dijkstra cost over the whole group. Flow is distributed in
//! rounds proportionally to each commodity's residual demand, and the
//! multiplicative length updates are deferred until the group is exhausted:
//! updating inside the rounds would skew the proportions mid-distribution.

use super::{augment, SolveState};
use crate::graph::dijkstra;
use crate::params::FP_ERROR_MARGIN;
use crate::Result;
use indexmap::IndexMap;
use std::fmt::Debug;
use std::hash::Hash;

/// One phase's sweep over all commodities, grouped by source
pub(crate) fn sweep<N>(state: &mut SolveState<'_, N>) -> Result<()>
where
    N: Clone + Eq + Hash + Debug,
{
    let mut groups: IndexMap<usize, Vec<usize>> = IndexMap::new();
    for (idx, &(source, _)) in state.problem.commodity_endpoints().iter().enumerate() {
        groups.entry(source).or_default().push(idx);
    }

    for (source, members) in groups {
        if let [only] = members[..] {
            augment::route(state, only)?;
            continue;
        }
        route_group(state, source, &members)?;
    }

    Ok(())
}

/// Route a group of commodities off a single tree rooted at `source`
fn route_group<N>(state: &mut SolveState<'_, N>, source: usize, members: &[usize]) -> Result<()>
where
    N: Clone + Eq + Hash + Debug,
{
    state.shortest_path_runs += 1;
    let tree = dijkstra::tree(&state.net, source);

    let mut paths = Vec::with_capacity(members.len());
    for &commodity in members {
        let (_, sink) = state.problem.commodity_endpoints()[commodity];
        let path = tree
            .path_to(sink)
            .ok_or_else(|| state.unreachable(commodity))?;
        paths.push(path);
    }

    let mut remaining: Vec<f64> = members.iter().map(|&c| state.demands[c]).collect();
    let mut pending = vec![0.0; state.net.edges().len()];

    loop {
        let largest = remaining.iter().fold(0.0f64, |a, &b| a.max(b));
        if largest <= FP_ERROR_MARGIN {
            break;
        }
        let total: f64 = remaining.iter().sum();

        for (i, path) in paths.iter().enumerate() {
            let ratio = remaining[i] / total;
            let chunk = ratio * remaining[i].min(state.net.bottleneck(path));
            for &edge in path {
                pending[edge] += chunk;
                state.net.push_flow(edge, chunk);
            }
            remaining[i] -= chunk;
        }
    }

    // one multiplicative update per edge for the whole group
    for (edge, &flow) in pending.iter().enumerate() {
        if flow > 0.0 {
            state.net.bump_length(edge, state.epsilon, flow);
        }
    }

    Ok(())
}
