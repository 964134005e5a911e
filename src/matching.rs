/*!
# Matchings

A matching is a set of edges without shared endpoints. The type in this module
stores **edge indices** into the input graph, so the result of a matcher
always references the input's own edges (identity by position, never a
reconstructed copy).
*/

use crate::{edge::*, graph::Graph, node::*};

/// An ordered list of edge indices forming a matching of some [`Graph`].
///
/// The indices refer to the graph the matching was computed from; pairing a
/// matching with a different graph is a caller bug and caught by
/// [`Matching::is_valid`] at best.
///
/// # Examples
/// ```
/// use wmatch::prelude::*;
///
/// let g = Graph::from_edges(4, [Edge(0, 1, 2), Edge(1, 2, 3), Edge(2, 3, 2)]);
/// let m = Matching::from_indices(vec![0, 2]);
/// assert!(m.is_valid(&g));
/// assert_eq!(m.score(&g), 4);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Matching {
    picked: Vec<EdgeIdx>,
}

impl Matching {
    /// Creates an empty matching.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a matching from a list of edge indices.
    pub fn from_indices(picked: Vec<EdgeIdx>) -> Self {
        Self { picked }
    }

    /// Adds an edge (by index) to the matching.
    pub fn push(&mut self, k: EdgeIdx) {
        self.picked.push(k);
    }

    /// Returns the number of edges in the matching.
    pub fn len(&self) -> usize {
        self.picked.len()
    }

    /// Returns `true` if no edge is selected.
    pub fn is_empty(&self) -> bool {
        self.picked.is_empty()
    }

    /// Returns the selected edge indices in selection order.
    pub fn indices(&self) -> &[EdgeIdx] {
        &self.picked
    }

    /// Resolves the selected indices against `graph`.
    pub fn edges<'a>(&'a self, graph: &'a Graph) -> impl Iterator<Item = Edge> + 'a {
        self.picked.iter().map(|&k| graph.edge(k))
    }

    /// Returns the total weight of the selected edges.
    pub fn score(&self, graph: &Graph) -> Weight {
        self.edges(graph).map(|e| e.weight()).sum()
    }

    /// Checks the matching invariant against `graph`:
    /// every index refers to an input edge and no node is covered twice.
    pub fn is_valid(&self, graph: &Graph) -> bool {
        let mut covered = graph.vertex_bitset_unset();
        for &k in &self.picked {
            if k >= graph.number_of_edges() {
                return false;
            }
            let Edge(u, v, _) = graph.edge(k);
            if covered.get_bit(u) || covered.get_bit(v) {
                return false;
            }
            covered.set_bit(u);
            covered.set_bit(v);
        }
        true
    }

    /// Returns the nodes covered by the matching.
    pub fn covered_nodes(&self, graph: &Graph) -> NodeBitSet {
        let mut covered = graph.vertex_bitset_unset();
        for e in self.edges(graph) {
            covered.set_bit(e.source());
            covered.set_bit(e.target());
        }
        covered
    }
}

impl FromIterator<EdgeIdx> for Matching {
    fn from_iter<T: IntoIterator<Item = EdgeIdx>>(iter: T) -> Self {
        Self {
            picked: iter.into_iter().collect(),
        }
    }
}
