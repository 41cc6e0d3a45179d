//! Dijkstra shortest paths over the dual lengths
//!
//! Lengths are non-negative by construction (they start at `delta / c` and
//! only grow), so a binary-heap Dijkstra applies. Ties are broken by node
//! index, which depends only on the edge set and keeps runs reproducible.

use super::Network;
use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Shortest-path tree rooted at one source
///
/// Stores one predecessor `(edge, parent)` per reached node; paths are
/// reconstructed lazily during augmentation.
#[derive(Debug, Clone)]
pub(crate) struct ShortestPathTree {
    source: usize,
    distance: Vec<f64>,
    /// `(edge index, parent node)` on the tree path, per node
    pred: Vec<Option<(usize, usize)>>,
}

impl ShortestPathTree {
    /// Distance from the source, or `None` if the node was not reached
    pub fn distance(&self, node: usize) -> Option<f64> {
        self.distance[node].is_finite().then(|| self.distance[node])
    }

    /// Edge indices of the tree path from the source to `node`
    pub fn path_to(&self, node: usize) -> Option<Vec<usize>> {
        if !self.distance[node].is_finite() {
            return None;
        }
        let mut path = Vec::new();
        let mut current = node;
        while current != self.source {
            let (edge, parent) = self.pred[current]?;
            path.push(edge);
            current = parent;
        }
        path.reverse();
        Some(path)
    }
}

/// Run Dijkstra from `source` over all reachable nodes
pub(crate) fn tree(net: &Network, source: usize) -> ShortestPathTree {
    dijkstra(net, source, None)
}

/// Shortest `source -> target` path as edge indices, or `None` if unreachable
pub(crate) fn path(net: &Network, source: usize, target: usize) -> Option<Vec<usize>> {
    dijkstra(net, source, Some(target)).path_to(target)
}

fn dijkstra(net: &Network, source: usize, target: Option<usize>) -> ShortestPathTree {
    let n = net.num_nodes();
    let mut distance = vec![f64::INFINITY; n];
    let mut pred = vec![None; n];
    let mut heap = BinaryHeap::new();

    distance[source] = 0.0;
    heap.push(Reverse((OrderedFloat(0.0), source)));

    while let Some(Reverse((OrderedFloat(dist), node))) = heap.pop() {
        if dist > distance[node] {
            continue;
        }
        if target == Some(node) {
            break;
        }

        for &edge_idx in net.outgoing(node) {
            let edge = net.edge(edge_idx);
            let next_dist = dist + edge.length;
            if next_dist < distance[edge.tail] {
                distance[edge.tail] = next_dist;
                pred[edge.tail] = Some((edge_idx, node));
                heap.push(Reverse((OrderedFloat(next_dist), edge.tail)));
            }
        }
    }

    ShortestPathTree {
        source,
        distance,
        pred,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn net(num_nodes: usize, edges: &[(usize, usize, f64)]) -> Network {
        let endpoints: Vec<_> = edges.iter().map(|&(h, t, _)| (h, t)).collect();
        let capacities: Vec<_> = edges.iter().map(|&(_, _, c)| c).collect();
        // delta 1.0 makes each length the reciprocal capacity
        Network::build(num_nodes, &endpoints, &capacities, 1.0)
    }

    #[test]
    fn test_picks_shorter_route() {
        // lengths: 0->1 = 1, 1->2 = 0.5, 0->2 = 10
        let net = net(3, &[(0, 1, 1.0), (1, 2, 2.0), (0, 2, 0.1)]);

        let path = path(&net, 0, 2).unwrap();
        assert_eq!(path, vec![0, 1]);
    }

    #[test]
    fn test_unreachable_is_none() {
        let net = net(3, &[(0, 1, 1.0)]);
        assert!(path(&net, 0, 2).is_none());
        assert!(tree(&net, 0).distance(2).is_none());
    }

    #[test]
    fn test_tree_reconstructs_all_paths() {
        let net = net(4, &[(0, 1, 1.0), (0, 2, 1.0), (1, 3, 1.0), (2, 3, 0.5)]);
        let tree = tree(&net, 0);

        assert_eq!(tree.path_to(0).unwrap(), Vec::<usize>::new());
        assert_eq!(tree.path_to(1).unwrap(), vec![0]);
        // via node 1: 1 + 1 = 2; via node 2: 1 + 2 = 3
        assert_eq!(tree.path_to(3).unwrap(), vec![0, 2]);
        assert!((tree.distance(3).unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_deterministic_tie_break() {
        // two equal-length routes 0->1->3 and 0->2->3
        let net = net(4, &[(0, 1, 1.0), (0, 2, 1.0), (1, 3, 1.0), (2, 3, 1.0)]);

        let first = path(&net, 0, 3).unwrap();
        for _ in 0..5 {
            assert_eq!(path(&net, 0, 3).unwrap(), first);
        }
        // strict relaxation keeps the first-found route
        assert_eq!(first, vec![0, 2]);
    }
}
