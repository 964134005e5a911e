/*!
# Graph Model

The immutable input type for all matchers: a node count plus an
insertion-ordered list of weighted edges.

Validation happens once at construction. A well-formed graph has

- dense node ids in `0..n`,
- no self-loops,
- non-negative integer weights,
- at most one edge per unordered node pair.

Matchers treat the graph as read-only; all auxiliary structures are allocated
per run.
*/

use std::ops::Range;

use fxhash::FxHashSet;
use thiserror::Error;

use crate::{edge::*, node::*};

/// Errors rejected when building a [`Graph`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    /// An edge references a node id `>= n`.
    #[error("edge {edge} references a node outside 0..{num_nodes}")]
    EndpointOutOfRange { edge: Edge, num_nodes: NumNodes },

    /// Self-loops cannot appear in a matching and are rejected.
    #[error("self-loop {0} is not allowed")]
    SelfLoop(Edge),

    /// Weights must be non-negative integers.
    #[error("edge {0} has a negative weight")]
    NegativeWeight(Edge),

    /// At most one edge may connect any unordered node pair.
    #[error("duplicate edge {0}")]
    DuplicateEdge(Edge),
}

/// An immutable undirected graph with weighted edges.
///
/// Nodes are the ids `0..n`; edges keep their insertion order and are
/// identified by their position in it. Construction validates the input,
/// afterwards the graph never changes.
///
/// # Examples
/// ```
/// use wmatch::prelude::*;
///
/// let g = Graph::from_edges(3, [Edge(0, 1, 5), Edge(1, 2, 2)]);
/// assert_eq!(g.number_of_nodes(), 3);
/// assert_eq!(g.number_of_edges(), 2);
/// assert_eq!(g.edge(0), Edge(0, 1, 5));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Graph {
    num_nodes: NumNodes,
    edges: Vec<Edge>,
}

impl std::fmt::Debug for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Graph(n={}, edges={:?})", self.num_nodes, self.edges)
    }
}

impl Graph {
    /// Creates a graph with `n` nodes and no edges.
    pub fn new(n: NumNodes) -> Self {
        Self {
            num_nodes: n,
            edges: Vec::new(),
        }
    }

    /// Tries to create a graph with `n` nodes from an edge iterator.
    ///
    /// Fails with the first violation found: endpoint out of range,
    /// self-loop, negative weight, or duplicate unordered pair.
    pub fn try_from_edges<I, E>(n: NumNodes, edges: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = E>,
        E: Into<Edge>,
    {
        let mut seen: FxHashSet<(Node, Node)> = FxHashSet::default();
        let mut list = Vec::new();

        for edge in edges {
            let edge = edge.into();
            if edge.0 >= n || edge.1 >= n {
                return Err(GraphError::EndpointOutOfRange {
                    edge,
                    num_nodes: n,
                });
            }
            if edge.is_loop() {
                return Err(GraphError::SelfLoop(edge));
            }
            if edge.weight() < 0 {
                return Err(GraphError::NegativeWeight(edge));
            }
            let Edge(u, v, _) = edge.normalized();
            if !seen.insert((u, v)) {
                return Err(GraphError::DuplicateEdge(edge));
            }
            list.push(edge);
        }

        Ok(Self {
            num_nodes: n,
            edges: list,
        })
    }

    /// Creates a graph with `n` nodes from an edge iterator.
    ///
    /// **Panics on invalid input**; see [`Graph::try_from_edges`] for the
    /// fallible variant.
    pub fn from_edges<I, E>(n: NumNodes, edges: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Edge>,
    {
        match Self::try_from_edges(n, edges) {
            Ok(graph) => graph,
            Err(e) => panic!("invalid input graph: {e}"),
        }
    }

    /// Returns the number of nodes in the graph.
    #[inline]
    pub fn number_of_nodes(&self) -> NumNodes {
        self.num_nodes
    }

    /// Returns the number of nodes as a `usize`.
    #[inline]
    pub fn len(&self) -> usize {
        self.num_nodes as usize
    }

    /// Returns `true` if the graph has no nodes (and therefore no edges).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_nodes == 0
    }

    /// Returns the number of edges in the graph.
    #[inline]
    pub fn number_of_edges(&self) -> NumEdges {
        self.edges.len() as NumEdges
    }

    /// Returns an iterator over all nodes in the graph.
    #[inline]
    pub fn vertices(&self) -> Range<Node> {
        0..self.num_nodes
    }

    /// Returns the edge stored at index `k`.
    ///
    /// **Panics if `k >= number_of_edges()`.**
    #[inline]
    pub fn edge(&self, k: EdgeIdx) -> Edge {
        self.edges[k as usize]
    }

    /// Returns an iterator over all edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.edges.iter().copied()
    }

    /// Returns an iterator over `(index, edge)` pairs in insertion order.
    pub fn indexed_edges(&self) -> impl Iterator<Item = (EdgeIdx, Edge)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .map(|(k, &e)| (k as EdgeIdx, e))
    }

    /// Returns the largest edge weight, or `0` for a graph without edges.
    pub fn max_weight(&self) -> Weight {
        self.edges.iter().map(Edge::weight).max().unwrap_or(0).max(0)
    }

    /// Returns an empty bitset with one entry per node.
    pub fn vertex_bitset_unset(&self) -> NodeBitSet {
        NodeBitSet::new(self.num_nodes)
    }

    /// Returns an empty bitset with one entry per edge.
    pub fn edge_bitset_unset(&self) -> EdgeBitSet {
        EdgeBitSet::new(self.number_of_edges())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_and_access() {
        let g = Graph::from_edges(4, [Edge(0, 1, 3), Edge(2, 1, 1), Edge(2, 3, 0)]);
        assert_eq!(g.number_of_nodes(), 4);
        assert_eq!(g.len(), 4);
        assert_eq!(g.number_of_edges(), 3);
        assert_eq!(g.vertices().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        assert_eq!(g.edge(1), Edge(2, 1, 1));
        assert_eq!(g.max_weight(), 3);
        assert_eq!(
            g.indexed_edges().map(|(k, _)| k).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn empty_graph() {
        let g = Graph::new(0);
        assert!(g.is_empty());
        assert_eq!(g.number_of_edges(), 0);
        assert_eq!(g.max_weight(), 0);
    }

    #[test]
    fn rejects_self_loop() {
        assert_eq!(
            Graph::try_from_edges(3, [Edge(1, 1, 2)]),
            Err(GraphError::SelfLoop(Edge(1, 1, 2)))
        );
    }

    #[test]
    fn rejects_negative_weight() {
        assert_eq!(
            Graph::try_from_edges(3, [Edge(0, 1, -1)]),
            Err(GraphError::NegativeWeight(Edge(0, 1, -1)))
        );
    }

    #[test]
    fn rejects_duplicate_pair() {
        // The reversed pair denotes the same undirected edge.
        assert_eq!(
            Graph::try_from_edges(3, [Edge(0, 1, 2), Edge(1, 0, 5)]),
            Err(GraphError::DuplicateEdge(Edge(1, 0, 5)))
        );
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(
            Graph::try_from_edges(2, [Edge(0, 2, 1)]),
            Err(GraphError::EndpointOutOfRange {
                edge: Edge(0, 2, 1),
                num_nodes: 2
            })
        );
    }
}
