//! Single-commodity max flow for demand rescaling
//!
//! Augmenting shortest paths (Edmonds-Karp) over a residual graph with the
//! usual paired forward/reverse edge layout. Only the flow value is needed
//! by the caller, so no per-edge flows are extracted.

use crate::params::FP_ERROR_MARGIN;
use std::collections::VecDeque;

/// A residual edge
#[derive(Debug, Clone, Copy)]
struct ResidualEdge {
    to: usize,
    capacity: f64,
    flow: f64,
}

/// Residual network over `f64` capacities
#[derive(Debug, Clone)]
pub(crate) struct ResidualNetwork {
    adj: Vec<Vec<usize>>,
    edges: Vec<ResidualEdge>,
}

impl ResidualNetwork {
    pub fn new(num_nodes: usize) -> Self {
        Self {
            adj: vec![Vec::new(); num_nodes],
            edges: Vec::new(),
        }
    }

    /// Add a forward edge and its zero-capacity reverse twin
    pub fn add_edge(&mut self, from: usize, to: usize, capacity: f64) {
        let forward_idx = self.edges.len();
        self.edges.push(ResidualEdge { to, capacity, flow: 0.0 });
        self.adj[from].push(forward_idx);

        self.edges.push(ResidualEdge { to: from, capacity: 0.0, flow: 0.0 });
        self.adj[to].push(forward_idx + 1);
    }

    fn residual(&self, edge_idx: usize) -> f64 {
        self.edges[edge_idx].capacity - self.edges[edge_idx].flow
    }

    fn push(&mut self, edge_idx: usize, amount: f64) {
        self.edges[edge_idx].flow += amount;
        self.edges[edge_idx ^ 1].flow -= amount;
    }

    /// Max flow value from `source` to `sink`
    pub fn max_flow(&mut self, source: usize, sink: usize) -> f64 {
        let mut total = 0.0;

        loop {
            let Some(path) = self.augmenting_path(source, sink) else {
                break;
            };
            let bottleneck = path
                .iter()
                .map(|&idx| self.residual(idx))
                .fold(f64::INFINITY, f64::min);
            if bottleneck <= FP_ERROR_MARGIN {
                break;
            }
            for &idx in &path {
                self.push(idx, bottleneck);
            }
            total += bottleneck;
        }

        total
    }

    /// BFS for a fewest-edges augmenting path, as edge indices
    fn augmenting_path(&self, source: usize, sink: usize) -> Option<Vec<usize>> {
        let n = self.adj.len();
        let mut pred: Vec<Option<(usize, usize)>> = vec![None; n];
        let mut visited = vec![false; n];
        let mut queue = VecDeque::new();

        visited[source] = true;
        queue.push_back(source);

        'bfs: while let Some(node) = queue.pop_front() {
            for &edge_idx in &self.adj[node] {
                let to = self.edges[edge_idx].to;
                if !visited[to] && self.residual(edge_idx) > FP_ERROR_MARGIN {
                    visited[to] = true;
                    pred[to] = Some((edge_idx, node));
                    if to == sink {
                        break 'bfs;
                    }
                    queue.push_back(to);
                }
            }
        }

        if !visited[sink] {
            return None;
        }

        let mut path = Vec::new();
        let mut current = sink;
        while current != source {
            let (edge_idx, parent) = pred[current]?;
            path.push(edge_idx);
            current = parent;
        }
        path.reverse();
        Some(path)
    }
}
