/*!
# Greedy Matcher

Sorts all edges by weight descending and scans them once, selecting every
edge whose endpoints are both still free. Runs in `O(m log m)`; the result is
a maximal matching but not necessarily optimal. The classic counterexample is
the path `(0-1:2), (1-2:3), (2-3:2)`: greedy picks the middle edge for a
score of 3 while the two outer edges score 4.
*/

use std::cmp::Reverse;

use itertools::Itertools;
use log::debug;

use crate::{edge::*, graph::Graph, matching::Matching, node::*, trace::TraceSink};

use super::{Matcher, Steps};

/// Sort-and-select heuristic; see the module docs.
#[derive(Debug, Copy, Clone, Default)]
pub struct GreedyMatcher;

impl Matcher for GreedyMatcher {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn start<'a>(&self, graph: &'a Graph, trace: &'a mut dyn TraceSink) -> Box<dyn Steps + 'a> {
        Box::new(GreedySteps::new(graph, trace))
    }
}

struct GreedySteps<'a> {
    graph: &'a Graph,
    trace: &'a mut dyn TraceSink,
    /// Edge indices sorted by weight descending; equal weights keep
    /// insertion order (stable sort).
    order: Vec<EdgeIdx>,
    next: usize,
    used: NodeBitSet,
    matching: Matching,
}

impl<'a> GreedySteps<'a> {
    fn new(graph: &'a Graph, trace: &'a mut dyn TraceSink) -> Self {
        let order = graph
            .indexed_edges()
            .map(|(k, _)| k)
            .sorted_by_key(|&k| Reverse(graph.edge(k).weight()))
            .collect_vec();

        Self {
            graph,
            trace,
            order,
            next: 0,
            used: graph.vertex_bitset_unset(),
            matching: Matching::new(),
        }
    }
}

impl Steps for GreedySteps<'_> {
    fn advance(&mut self) -> Option<Matching> {
        // One step per edge in sorted order, then one finishing step.
        if self.next >= self.order.len() {
            debug!(
                "greedy finished: {} edges selected",
                self.matching.len()
            );
            self.trace.commit();
            return Some(std::mem::take(&mut self.matching));
        }

        let k = self.order[self.next];
        self.next += 1;

        let Edge(u, v, _) = self.graph.edge(k);
        self.trace.step("scan edge");
        self.trace.current_edge(k);
        if !self.used.get_bit(u) && !self.used.get_bit(v) {
            self.used.set_bit(u);
            self.used.set_bit(v);
            self.matching.push(k);
            self.trace.pick_edge(k, "green");
        }
        self.trace.commit();

        None
    }
}
