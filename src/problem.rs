//! Problem definition: edges, commodities and the validated instance
//!
//! Node identifiers are arbitrary equality-and-hash-comparable keys. At
//! construction they are interned to dense indices so the solver's inner
//! loops work on contiguous arrays; enumeration order follows insertion
//! order, which keeps runs reproducible.

use crate::{Capacity, Demand, Error, Result};
use indexmap::{IndexMap, IndexSet};
use petgraph::graph::DiGraph;
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// A directed capacitated edge from `head` to `tail`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge<N> {
    /// Origin node
    pub head: N,
    /// Destination node
    pub tail: N,
    /// Capacity (strictly positive)
    pub capacity: Capacity,
}

impl<N: Debug> Edge<N> {
    /// Create an edge, rejecting non-positive capacities
    pub fn new(head: N, tail: N, capacity: Capacity) -> Result<Self> {
        if !(capacity > 0.0) {
            return Err(Error::parameter(format!(
                "capacity of edge {head:?} -> {tail:?} must be positive, got {capacity}"
            )));
        }
        Ok(Self { head, tail, capacity })
    }
}

/// A routing requirement: `demand` units from `source` to `sink`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commodity<N> {
    /// Origin of the demand
    pub source: N,
    /// Destination of the demand
    pub sink: N,
    /// Amount to route (strictly positive)
    pub demand: Demand,
}

impl<N: Debug + PartialEq> Commodity<N> {
    /// Create a commodity, rejecting non-positive demands and trivial pairs
    pub fn new(source: N, sink: N, demand: Demand) -> Result<Self> {
        if !(demand > 0.0) {
            return Err(Error::parameter(format!(
                "demand of commodity {source:?} -> {sink:?} must be positive, got {demand}"
            )));
        }
        if source == sink {
            return Err(Error::parameter(format!(
                "commodity source and sink must differ, got {source:?} for both"
            )));
        }
        Ok(Self { source, sink, demand })
    }
}

/// A validated concurrent-flow instance
///
/// Topology is frozen at construction: ordered `(head, tail)` pairs map to
/// exactly one edge, and node keys are interned to dense indices.
#[derive(Debug, Clone)]
pub struct ConcurrentFlowProblem<N> {
    edges: Vec<Edge<N>>,
    commodities: Vec<Commodity<N>>,
    nodes: IndexSet<N>,
    /// (head index, tail index) per edge, parallel to `edges`
    edge_endpoints: Vec<(usize, usize)>,
    /// (source index, sink index) per commodity, parallel to `commodities`
    commodity_endpoints: Vec<(usize, usize)>,
    pair_index: IndexMap<(usize, usize), usize>,
}

impl<N> ConcurrentFlowProblem<N>
where
    N: Clone + Eq + Hash + Debug,
{
    /// Validate and intern an instance
    pub fn new(edges: Vec<Edge<N>>, commodities: Vec<Commodity<N>>) -> Result<Self> {
        if edges.is_empty() {
            return Err(Error::parameter("edge list must not be empty"));
        }
        if commodities.is_empty() {
            return Err(Error::parameter("commodity list must not be empty"));
        }

        let mut nodes = IndexSet::new();
        let mut edge_endpoints = Vec::with_capacity(edges.len());
        let mut pair_index = IndexMap::with_capacity(edges.len());

        for (idx, edge) in edges.iter().enumerate() {
            if !(edge.capacity > 0.0) {
                return Err(Error::parameter(format!(
                    "capacity of edge {:?} -> {:?} must be positive, got {}",
                    edge.head, edge.tail, edge.capacity
                )));
            }
            let head = nodes.insert_full(edge.head.clone()).0;
            let tail = nodes.insert_full(edge.tail.clone()).0;
            if pair_index.insert((head, tail), idx).is_some() {
                return Err(Error::parameter(format!(
                    "duplicate edge {:?} -> {:?}",
                    edge.head, edge.tail
                )));
            }
            edge_endpoints.push((head, tail));
        }

        let mut commodity_endpoints = Vec::with_capacity(commodities.len());
        for commodity in &commodities {
            if !(commodity.demand > 0.0) {
                return Err(Error::parameter(format!(
                    "demand of commodity {:?} -> {:?} must be positive, got {}",
                    commodity.source, commodity.sink, commodity.demand
                )));
            }
            if commodity.source == commodity.sink {
                return Err(Error::parameter(format!(
                    "commodity source and sink must differ, got {:?} for both",
                    commodity.source
                )));
            }
            // Endpoints that touch no edge still get an index; they simply
            // come out unreachable during the solve.
            let source = nodes.insert_full(commodity.source.clone()).0;
            let sink = nodes.insert_full(commodity.sink.clone()).0;
            commodity_endpoints.push((source, sink));
        }

        Ok(Self {
            edges,
            commodities,
            nodes,
            edge_endpoints,
            commodity_endpoints,
            pair_index,
        })
    }

    /// Build an instance from a petgraph digraph whose edge weights are capacities
    ///
    /// Edges are taken in the graph's edge-index order, so flows in the
    /// solution line up with `graph.edge_references()`.
    pub fn from_petgraph(graph: &DiGraph<N, Capacity>, commodities: Vec<Commodity<N>>) -> Result<Self> {
        let edges = graph
            .edge_references()
            .map(|edge| {
                Edge::new(
                    graph[edge.source()].clone(),
                    graph[edge.target()].clone(),
                    *edge.weight(),
                )
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(edges, commodities)
    }

    /// The edges, in construction order
    pub fn edges(&self) -> &[Edge<N>] {
        &self.edges
    }

    /// The commodities, in construction order
    pub fn commodities(&self) -> &[Commodity<N>] {
        &self.commodities
    }

    /// Number of distinct nodes
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Position of the `(head, tail)` edge in construction order
    pub fn edge_position(&self, head: &N, tail: &N) -> Option<usize> {
        let head = self.nodes.get_index_of(head)?;
        let tail = self.nodes.get_index_of(tail)?;
        self.pair_index.get(&(head, tail)).copied()
    }

    /// Node key for an interned index
    pub(crate) fn node_key(&self, index: usize) -> &N {
        self.nodes
            .get_index(index)
            .expect("interned node index out of range")
    }

    pub(crate) fn edge_endpoints(&self) -> &[(usize, usize)] {
        &self.edge_endpoints
    }

    pub(crate) fn commodity_endpoints(&self) -> &[(usize, usize)] {
        &self.commodity_endpoints
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(head: &'static str, tail: &'static str, capacity: f64) -> Edge<&'static str> {
        Edge::new(head, tail, capacity).unwrap()
    }

    #[test]
    fn test_edge_rejects_bad_capacity() {
        assert!(Edge::new("a", "b", 0.0).is_err());
        assert!(Edge::new("a", "b", -1.0).is_err());
        assert!(Edge::new("a", "b", 2.5).is_ok());
    }

    #[test]
    fn test_commodity_rejects_bad_demand() {
        assert!(Commodity::new("a", "b", 0.0).is_err());
        assert!(Commodity::new("a", "b", -2.0).is_err());
        assert!(Commodity::new("a", "a", 1.0).is_err());
        assert!(Commodity::new("a", "b", 1.0).is_ok());
    }

    #[test]
    fn test_problem_rejects_empty_inputs() {
        let edges = vec![Edge::new("a", "b", 1.0).unwrap()];
        let commodities = vec![Commodity::new("a", "b", 1.0).unwrap()];

        assert!(ConcurrentFlowProblem::new(vec![], commodities.clone()).is_err());
        assert!(ConcurrentFlowProblem::new(edges, vec![]).is_err());
    }

    #[test]
    fn test_problem_rejects_duplicate_pair() {
        let edges = vec![
            Edge::new("a", "b", 1.0).unwrap(),
            Edge::new("a", "b", 2.0).unwrap(),
        ];
        let commodities = vec![Commodity::new("a", "b", 1.0).unwrap()];

        let result = ConcurrentFlowProblem::new(edges, commodities);
        assert!(matches!(result, Err(Error::Parameter(_))));
    }

    #[test]
    fn test_interning_is_insertion_ordered() {
        let edges = vec![
            edge("s", "a", 1.0),
            edge("a", "t", 1.0),
            edge("s", "t", 1.0),
        ];
        let commodities = vec![Commodity::new("s", "t", 1.0).unwrap()];
        let problem = ConcurrentFlowProblem::new(edges, commodities).unwrap();

        assert_eq!(problem.num_nodes(), 3);
        assert_eq!(problem.edge_endpoints(), &[(0, 1), (1, 2), (0, 2)]);
        assert_eq!(problem.commodity_endpoints(), &[(0, 2)]);
        assert_eq!(problem.edge_position(&"s", &"t"), Some(2));
        assert_eq!(problem.edge_position(&"t", &"s"), None);
    }

    #[test]
    fn test_from_petgraph() {
        let mut graph: DiGraph<&str, f64> = DiGraph::new();
        let s = graph.add_node("s");
        let a = graph.add_node("a");
        let t = graph.add_node("t");
        graph.add_edge(s, a, 4.0);
        graph.add_edge(a, t, 3.0);

        let commodities = vec![Commodity::new("s", "t", 2.0).unwrap()];
        let problem = ConcurrentFlowProblem::from_petgraph(&graph, commodities).unwrap();

        assert_eq!(problem.edges().len(), 2);
        assert_eq!(problem.edge_position(&"s", &"a"), Some(0));
    }
}
