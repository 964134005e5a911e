/*!
# Naive Matcher

Exhaustively enumerates all matchings and keeps the best-scoring one. Exact
but exponential, so the search is guarded by a configurable node cap; above
the cap the matcher gives up and returns the empty matching with a trace
note. Its role is to serve as an oracle for the other matchers on small
inputs.
*/

use log::warn;

use crate::{
    edge::*,
    graph::Graph,
    index::IncidenceIndex,
    matching::Matching,
    node::*,
    trace::TraceSink,
};

use super::{Matcher, Steps};

/// Exhaustive search with a size guard; see the module docs.
#[derive(Debug, Copy, Clone)]
pub struct NaiveMatcher {
    cap: NumNodes,
}

impl Default for NaiveMatcher {
    /// Defaults to the reference cap of 50 nodes.
    fn default() -> Self {
        Self { cap: 50 }
    }
}

impl NaiveMatcher {
    /// Creates a matcher that refuses graphs with more than `cap` nodes.
    pub fn with_cap(cap: NumNodes) -> Self {
        Self { cap }
    }
}

impl Matcher for NaiveMatcher {
    fn name(&self) -> &'static str {
        "naive"
    }

    fn start<'a>(&self, graph: &'a Graph, trace: &'a mut dyn TraceSink) -> Box<dyn Steps + 'a> {
        Box::new(NaiveSteps {
            graph,
            trace,
            cap: self.cap,
            searched: false,
            best: None,
        })
    }
}

struct NaiveSteps<'a> {
    graph: &'a Graph,
    trace: &'a mut dyn TraceSink,
    cap: NumNodes,
    searched: bool,
    best: Option<Vec<EdgeIdx>>,
}

/// Recursive enumeration state. Every valid matching is produced exactly by
/// deciding per node, in id order, whether it stays unmatched or is paired
/// through one of the edges listed at it in a forward-filled index.
struct Search<'a> {
    graph: &'a Graph,
    index: IncidenceIndex<'a>,
    used: NodeBitSet,
    current: Vec<EdgeIdx>,
    current_score: Weight,
    best: Vec<EdgeIdx>,
    best_score: Weight,
}

impl Search<'_> {
    fn recurse(&mut self, v: Node) {
        if v == self.graph.number_of_nodes() {
            if self.current_score > self.best_score {
                self.best_score = self.current_score;
                self.best = self.current.clone();
            }
            return;
        }

        if self.used.get_bit(v) {
            self.recurse(v + 1);
            return;
        }

        // Leave v unmatched.
        self.recurse(v + 1);

        // Or pair v through one of its forward edges.
        for i in 0..self.index.incident_edges(v).len() {
            let k = self.index.incident_edges(v)[i];
            let edge = self.graph.edge(k);
            let other = edge.other_endpoint(v);
            if self.used.get_bit(other) {
                continue;
            }

            self.used.set_bit(v);
            self.used.set_bit(other);
            self.current.push(k);
            self.current_score += edge.weight();

            self.recurse(v + 1);

            self.current_score -= edge.weight();
            self.current.pop();
            self.used.clear_bit(v);
            self.used.clear_bit(other);
        }
    }
}

impl Steps for NaiveSteps<'_> {
    fn advance(&mut self) -> Option<Matching> {
        if !self.searched {
            self.searched = true;
            self.trace.step("exhaustive search");

            if self.graph.number_of_nodes() > self.cap {
                warn!(
                    "naive matcher skipped: {} nodes exceed the cap of {}",
                    self.graph.number_of_nodes(),
                    self.cap
                );
                self.trace.message(&format!(
                    "graph has {} nodes, naive search capped at {}; returning empty matching",
                    self.graph.number_of_nodes(),
                    self.cap
                ));
                self.trace.commit();
                return None;
            }

            let mut search = Search {
                graph: self.graph,
                index: IncidenceIndex::forward(self.graph),
                used: self.graph.vertex_bitset_unset(),
                current: Vec::new(),
                current_score: 0,
                best: Vec::new(),
                best_score: 0,
            };
            if !self.graph.is_empty() {
                search.recurse(0);
            }

            self.trace
                .data("best-score", &search.best_score.to_string());
            self.trace.commit();
            self.best = Some(search.best);
            return None;
        }

        Some(Matching::from_indices(
            self.best.take().unwrap_or_default(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use crate::trace::{RecordingTrace, TraceEvent};

    #[test]
    fn scenario_scores_are_optimal() {
        for (g, best) in scenarios() {
            assert_eq!(run_score(&g, &NaiveMatcher::default()), best, "{g:?}");
        }
    }

    #[test]
    fn finds_the_outer_edges() {
        let g = Graph::from_edges(4, [Edge(0, 1, 2), Edge(1, 2, 3), Edge(2, 3, 2)]);
        let (matching, score) = run_matching(&g, &NaiveMatcher::default());
        assert_eq!(score, 4);
        assert_eq!(matching.indices(), &[0, 2]);
    }

    #[test]
    fn oversize_input_yields_empty_matching() {
        let g = Graph::from_edges(4, [Edge(0, 1, 2), Edge(1, 2, 3), Edge(2, 3, 2)]);
        let matcher = NaiveMatcher::with_cap(3);

        let mut trace = RecordingTrace::new();
        let mut run = matcher.start(&g, &mut trace);
        let matching = loop {
            if let Some(m) = run.advance() {
                break m;
            }
        };
        drop(run);

        assert!(matching.is_empty());
        assert!(trace
            .events
            .iter()
            .any(|e| matches!(e, TraceEvent::Message(_))));
    }
}
