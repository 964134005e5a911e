/*!
# Tree-Growing Matcher

Grows an alternating tree from every yet unvisited node by depth-first
search. At each node the incident edges are tried heaviest first; an edge is
worth entering if its weight exceeds the best improvement achievable below
the child, and entering it triggers a local augmentation that flips the
matched edges along the alternating subpath so the entering edge becomes
legal.

The heuristic is faster than the blossom matcher but only approximate: it
never contracts odd cycles, it merely reports them to the trace sink.
*/

use itertools::Itertools;
use log::debug;
use std::cmp::Reverse;

use crate::{
    edge::*,
    graph::Graph,
    index::IncidenceIndex,
    matching::Matching,
    node::*,
    trace::TraceSink,
};

use super::{Matcher, Steps};

/// DFS with local augmentation; see the module docs.
#[derive(Debug, Copy, Clone, Default)]
pub struct TreeGrowingMatcher;

impl Matcher for TreeGrowingMatcher {
    fn name(&self) -> &'static str {
        "tree-growing"
    }

    fn start<'a>(&self, graph: &'a Graph, trace: &'a mut dyn TraceSink) -> Box<dyn Steps + 'a> {
        Box::new(TreeGrowingSteps {
            index: IncidenceIndex::undirected(graph),
            graph,
            trace,
            label: vec![None; graph.len()],
            picked: vec![None; graph.len()],
            next_root: 0,
            done: false,
        })
    }
}

/// Visited nodes are part of some tree; chosen nodes are additionally
/// matched through their `picked` edge.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum TreeLabel {
    Visited,
    Chosen,
}

struct TreeGrowingSteps<'a> {
    graph: &'a Graph,
    trace: &'a mut dyn TraceSink,
    index: IncidenceIndex<'a>,
    label: Vec<Option<TreeLabel>>,
    /// The edge matching a node to its parent, or to a deeper descendant
    /// after augmentation.
    picked: Vec<Option<EdgeIdx>>,
    next_root: Node,
    done: bool,
}

impl TreeGrowingSteps<'_> {
    /// Returns the maximum improvement achievable at `node` and updates the
    /// `label`/`picked` arrays for the subtree below it.
    fn grow_tree(&mut self, node: Node, path: &mut Vec<Node>) -> Weight {
        self.label[node as usize] = Some(TreeLabel::Visited);
        self.trace.current_node(node);

        let parent = path.last().copied();
        let edges = self
            .index
            .incident_edges(node)
            .iter()
            .copied()
            .sorted_by_key(|&k| Reverse(self.graph.edge(k).weight()))
            .collect_vec();

        let mut best: Weight = 0;
        for k in edges {
            let next = self.graph.edge(k).other_endpoint(node);
            if Some(next) == parent {
                continue;
            }
            if self.label[next as usize].is_some() {
                // Odd or even cycle closing edge; the tree never uses it.
                self.trace.message("cycle detected");
                self.trace.current_edge(k);
                continue;
            }

            path.push(node);
            let sub = self.grow_tree(next, path);
            path.pop();

            let gain = self.graph.edge(k).weight() - sub;
            if gain > best {
                self.augment(next);
                self.picked[node as usize] = Some(k);
                self.label[node as usize] = Some(TreeLabel::Chosen);
                self.trace.pick_edge(k, "green");
                best = gain;
            }
        }

        best
    }

    /// Exchanges matched and unmatched edges along the alternating subpath
    /// hanging off `start`, freeing `start` for its new partner.
    fn augment(&mut self, start: Node) {
        let mut v = start;
        while self.label[v as usize] == Some(TreeLabel::Chosen) {
            let Some(k) = self.picked[v as usize] else {
                break;
            };
            self.label[v as usize] = Some(TreeLabel::Visited);
            let partner = self.graph.edge(k).other_endpoint(v);
            self.label[partner as usize] = Some(TreeLabel::Chosen);

            match self.picked[partner as usize] {
                Some(k2) => v = self.graph.edge(k2).other_endpoint(partner),
                None => break,
            }
        }
    }

    fn collect(&self) -> Matching {
        // Every chosen node contributes its picked edge; flips can leave a
        // chosen endpoint without an own pick (its partner carries the edge),
        // and both endpoints may carry the same edge, hence the dedupe.
        let mut seen = self.graph.edge_bitset_unset();
        let mut picked = Vec::new();
        for v in self.graph.vertices() {
            if self.label[v as usize] == Some(TreeLabel::Chosen) {
                if let Some(k) = self.picked[v as usize] {
                    if !seen.get_bit(k) {
                        seen.set_bit(k);
                        picked.push(k);
                    }
                }
            }
        }
        debug!("tree growing finished: {} edges selected", picked.len());
        Matching::from_indices(picked)
    }
}

impl Steps for TreeGrowingSteps<'_> {
    fn advance(&mut self) -> Option<Matching> {
        // One step per input node: either it roots a new tree or it was
        // already swallowed by an earlier one.
        if self.done {
            self.trace.commit();
            return Some(self.collect());
        }

        let v = self.next_root;
        self.next_root += 1;
        if self.next_root >= self.graph.number_of_nodes() {
            self.done = true;
        }
        if self.graph.number_of_nodes() == 0 {
            self.done = true;
            return None;
        }

        self.trace.step("grow tree");
        if self.label[v as usize].is_none() {
            let improvement = self.grow_tree(v, &mut Vec::new());
            self.trace.data("tree-improvement", &improvement.to_string());
        }
        self.trace.commit();

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;

    #[test]
    fn single_edge() {
        let g = Graph::from_edges(2, [Edge(0, 1, 9)]);
        let (matching, score) = run_matching(&g, &TreeGrowingMatcher);
        assert_eq!(score, 9);
        assert_eq!(matching.indices(), &[0]);
    }

    #[test]
    fn triangle_takes_the_heavy_edge() {
        let g = Graph::from_edges(3, [Edge(0, 1, 1), Edge(1, 2, 1), Edge(0, 2, 10)]);
        assert_eq!(run_score(&g, &TreeGrowingMatcher), 10);
    }

    #[test]
    fn augments_along_the_path() {
        // Entering (0-1:10) must flip (1-2:1) out again.
        let g = Graph::from_edges(
            5,
            [Edge(0, 1, 10), Edge(1, 2, 1), Edge(2, 3, 1), Edge(3, 4, 9)],
        );
        let (matching, score) = run_matching(&g, &TreeGrowingMatcher);
        assert_eq!(score, 19);
        assert!(matching.is_valid(&g));
    }

    #[test]
    fn results_are_valid_on_random_missions() {
        use rand::SeedableRng;
        use rand_pcg::Pcg64Mcg;

        let rng = &mut Pcg64Mcg::seed_from_u64(5);
        for _ in 0..30 {
            let g = random_mission(rng, 14, 45);
            let (matching, _) = run_matching(&g, &TreeGrowingMatcher);
            assert!(matching.is_valid(&g), "invalid matching on {g:?}");
        }
    }

    #[test]
    fn one_step_per_node() {
        let g = Graph::from_edges(4, [Edge(0, 1, 2), Edge(1, 2, 3), Edge(2, 3, 2)]);
        let (_, steps) = run_counting_steps(&g, &TreeGrowingMatcher);
        assert_eq!(steps, g.number_of_nodes() as u64 + 1);
    }
}
