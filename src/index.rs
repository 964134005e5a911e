/*!
# Incidence Index

A dense per-node lookup of incident edges, built once at matcher entry from
the immutable input graph. Two fill modes exist:

- **Undirected**: every edge is appended to both endpoints' lists.
- **Forward**: every edge is appended only to its first endpoint's list.

The index supports removing a node together with all its incident edges; the
path-growing matcher consumes the graph this way, node by node. A node whose
list became empty counts as absent.

Fills and removals report the currently processed edge to the trace sink.
These are observable side effects only and never change results.
*/

use smallvec::SmallVec;

use crate::{edge::EdgeIdx, graph::Graph, node::*, trace::TraceSink};

/// How edges are distributed over the per-node lists.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FillMode {
    /// Each edge is appended to both endpoints' lists.
    Undirected,
    /// Each edge is appended only to its first endpoint's list.
    Forward,
}

/// Maps each node to the list of incident edges (by index).
///
/// Lists keep insertion order, so iterating `incident_edges` visits edges in
/// the order they appear in the input. The index borrows the graph it was
/// built from.
///
/// # Examples
/// ```
/// use wmatch::prelude::*;
/// use wmatch::index::IncidenceIndex;
///
/// let g = Graph::from_edges(3, [Edge(0, 1, 2), Edge(1, 2, 4)]);
/// let mut index = IncidenceIndex::undirected(&g);
///
/// assert_eq!(index.incident_edges(1), &[0, 1]);
/// index.remove(1, &mut NoTrace);
/// assert!(index.is_empty());
/// ```
pub struct IncidenceIndex<'a> {
    graph: &'a Graph,
    mode: FillMode,
    lists: Vec<SmallVec<[EdgeIdx; 4]>>,
    occupied: NumNodes,
}

impl<'a> IncidenceIndex<'a> {
    /// Builds an index in the given fill mode, reporting each edge to `trace`.
    pub fn new(graph: &'a Graph, mode: FillMode, trace: &mut dyn TraceSink) -> Self {
        let mut lists = vec![SmallVec::new(); graph.len()];

        for (k, edge) in graph.indexed_edges() {
            trace.current_edge(k);
            lists[edge.source() as usize].push(k);
            if mode == FillMode::Undirected {
                lists[edge.target() as usize].push(k);
            }
        }

        let occupied = lists.iter().filter(|l| !l.is_empty()).count() as NumNodes;
        Self {
            graph,
            mode,
            lists,
            occupied,
        }
    }

    /// Builds an undirected index without tracing.
    pub fn undirected(graph: &'a Graph) -> Self {
        Self::new(graph, FillMode::Undirected, &mut crate::trace::NoTrace)
    }

    /// Builds a forward-only index without tracing.
    pub fn forward(graph: &'a Graph) -> Self {
        Self::new(graph, FillMode::Forward, &mut crate::trace::NoTrace)
    }

    /// Returns the graph the index was built from.
    pub fn graph(&self) -> &'a Graph {
        self.graph
    }

    /// Returns the incident edges of `v` still present in the index.
    ///
    /// Returns an empty slice for removed or out-of-range nodes.
    pub fn incident_edges(&self, v: Node) -> &[EdgeIdx] {
        self.lists
            .get(v as usize)
            .map(|l| l.as_slice())
            .unwrap_or(&[])
    }

    /// Returns `true` if `v` still has incident edges in the index.
    pub fn contains(&self, v: Node) -> bool {
        !self.incident_edges(v).is_empty()
    }

    /// Returns the number of nodes with a non-empty entry.
    pub fn number_of_entries(&self) -> NumNodes {
        self.occupied
    }

    /// Returns `true` if no node has incident edges left.
    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// Returns an iterator over all non-empty entries in node order.
    pub fn iter_entries(&self) -> impl Iterator<Item = (Node, &[EdgeIdx])> + '_ {
        self.lists
            .iter()
            .enumerate()
            .filter(|(_, l)| !l.is_empty())
            .map(|(v, l)| (v as Node, l.as_slice()))
    }

    /// Returns the heaviest edge incident to `v`, breaking ties in favor of
    /// the earlier inserted edge.
    pub fn heaviest_incident_edge(&self, v: Node) -> Option<EdgeIdx> {
        let mut best: Option<EdgeIdx> = None;
        for &k in self.incident_edges(v) {
            if best.is_none_or(|b| self.graph.edge(k).weight() > self.graph.edge(b).weight()) {
                best = Some(k);
            }
        }
        best
    }

    /// Removes `v` from the index and purges every edge incident to `v` from
    /// the other endpoint's list. Removing an absent node is a no-op.
    ///
    /// **Panics** if an edge that must be mirrored in a neighbor's list
    /// (undirected fill) is missing there; that indicates index corruption.
    pub fn remove(&mut self, v: Node, trace: &mut dyn TraceSink) {
        if !self.contains(v) {
            return;
        }

        let edges = std::mem::take(&mut self.lists[v as usize]);
        for &k in &edges {
            trace.current_edge(k);
            let other = self.graph.edge(k).other_endpoint(v);
            let list = &mut self.lists[other as usize];
            match list.iter().position(|&l| l == k) {
                Some(pos) => {
                    list.remove(pos);
                    if list.is_empty() {
                        self.occupied -= 1;
                    }
                }
                None => {
                    // Forward fill stores each edge on one side only.
                    assert!(
                        self.mode == FillMode::Forward,
                        "incidence index corrupt: edge {k} missing in list of node {other}"
                    );
                }
            }
        }
        self.occupied -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::Edge;
    use crate::trace::NoTrace;

    fn triangle() -> Graph {
        Graph::from_edges(4, [Edge(0, 1, 1), Edge(1, 2, 2), Edge(2, 0, 3)])
    }

    #[test]
    fn undirected_fill() {
        let g = triangle();
        let index = IncidenceIndex::undirected(&g);

        assert_eq!(index.incident_edges(0), &[0, 2]);
        assert_eq!(index.incident_edges(1), &[0, 1]);
        assert_eq!(index.incident_edges(2), &[1, 2]);
        assert!(index.incident_edges(3).is_empty());
        assert!(!index.contains(3));
        assert_eq!(index.number_of_entries(), 3);
        assert!(!index.is_empty());
        assert_eq!(
            index.iter_entries().map(|(v, _)| v).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn forward_fill() {
        let g = triangle();
        let index = IncidenceIndex::forward(&g);

        assert_eq!(index.incident_edges(0), &[0]);
        assert_eq!(index.incident_edges(1), &[1]);
        assert_eq!(index.incident_edges(2), &[2]);
        assert_eq!(index.number_of_entries(), 3);
    }

    #[test]
    fn removal_purges_neighbors() {
        let g = triangle();
        let mut index = IncidenceIndex::undirected(&g);

        index.remove(0, &mut NoTrace);
        assert!(!index.contains(0));
        assert_eq!(index.incident_edges(1), &[1]);
        assert_eq!(index.incident_edges(2), &[1]);
        assert_eq!(index.number_of_entries(), 2);

        index.remove(2, &mut NoTrace);
        assert!(index.is_empty());
        assert_eq!(index.number_of_entries(), 0);

        // Removing absent nodes is a no-op.
        index.remove(2, &mut NoTrace);
        index.remove(3, &mut NoTrace);
        assert!(index.is_empty());
    }

    #[test]
    fn forward_removal_clears_own_list_only() {
        let g = triangle();
        let mut index = IncidenceIndex::forward(&g);

        // Node 0 owns edge 0 only; edges ending in 0 stay where they were
        // filed.
        index.remove(0, &mut NoTrace);
        assert!(!index.contains(0));
        assert_eq!(index.incident_edges(1), &[1]);
        assert_eq!(index.incident_edges(2), &[2]);
        assert_eq!(index.number_of_entries(), 2);
    }

    #[test]
    fn heaviest_edge_tie_break() {
        let g = Graph::from_edges(4, [Edge(0, 1, 5), Edge(0, 2, 7), Edge(0, 3, 7)]);
        let index = IncidenceIndex::undirected(&g);
        // Both edges 1 and 2 weigh 7; the earlier inserted one wins.
        assert_eq!(index.heaviest_incident_edge(0), Some(1));
        assert_eq!(index.heaviest_incident_edge(3), Some(2));
    }
}
