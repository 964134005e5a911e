/*!
# Path-Growing Matcher

A 1/2-approximation due to Drake and Hougardy. The algorithm grows paths
through the graph, always leaving along the heaviest remaining incident edge,
and distributes the traversed edges alternately over two candidate matchings
`M1` and `M2`. Because consecutive path edges land in different candidates,
both stay valid matchings, and the better of the two weighs at least half of
the optimum.

Two variants share the walk:

- **standard**: one global comparison of `M1` and `M2` after all walks;
- **patched**: compares per walk, commits the winner's edges to the result
  and clears both candidates before the next walk. Never worse than the
  standard variant on the same input.
*/

use log::debug;

use crate::{
    edge::*,
    graph::Graph,
    index::IncidenceIndex,
    matching::Matching,
    node::*,
    trace::TraceSink,
};

use super::{Matcher, Steps};

/// Path-growing 1/2-approximation; see the module docs.
#[derive(Debug, Copy, Clone)]
pub struct PathGrowingMatcher {
    patched: bool,
}

impl PathGrowingMatcher {
    /// The standard variant: one global `M1` vs `M2` decision.
    pub fn standard() -> Self {
        Self { patched: false }
    }

    /// The patched variant: per-path winner selection.
    pub fn patched() -> Self {
        Self { patched: true }
    }
}

impl Matcher for PathGrowingMatcher {
    fn name(&self) -> &'static str {
        if self.patched {
            "path-growing-patched"
        } else {
            "path-growing"
        }
    }

    fn start<'a>(&self, graph: &'a Graph, trace: &'a mut dyn TraceSink) -> Box<dyn Steps + 'a> {
        Box::new(PathGrowingSteps {
            index: IncidenceIndex::new(graph, crate::index::FillMode::Undirected, trace),
            graph,
            trace,
            patched: self.patched,
            next_start: 0,
            walk: None,
            m1: Vec::new(),
            m2: Vec::new(),
            committed: Vec::new(),
            done: false,
        })
    }
}

struct PathGrowingSteps<'a> {
    graph: &'a Graph,
    trace: &'a mut dyn TraceSink,
    index: IncidenceIndex<'a>,
    patched: bool,
    /// Next input vertex to try as a walk start.
    next_start: Node,
    /// Current position of the running walk, if any.
    walk: Option<Node>,
    m1: Vec<EdgeIdx>,
    m2: Vec<EdgeIdx>,
    committed: Vec<EdgeIdx>,
    done: bool,
}

impl PathGrowingSteps<'_> {
    fn weight_of(&self, edges: &[EdgeIdx]) -> Weight {
        edges.iter().map(|&k| self.graph.edge(k).weight()).sum()
    }

    /// Closes the current walk; in the patched variant this commits the
    /// heavier candidate and resets both.
    fn finish_walk(&mut self) {
        self.walk = None;
        if self.patched {
            let winner = if self.weight_of(&self.m1) >= self.weight_of(&self.m2) {
                &mut self.m1
            } else {
                &mut self.m2
            };
            self.committed.append(winner);
            self.m1.clear();
            self.m2.clear();
        }
    }

    fn result(&mut self) -> Matching {
        let picked = if self.patched {
            std::mem::take(&mut self.committed)
        } else if self.weight_of(&self.m1) >= self.weight_of(&self.m2) {
            std::mem::take(&mut self.m1)
        } else {
            std::mem::take(&mut self.m2)
        };
        debug!("path growing finished: {} edges selected", picked.len());
        Matching::from_indices(picked)
    }
}

impl Steps for PathGrowingSteps<'_> {
    fn advance(&mut self) -> Option<Matching> {
        // One step per walk iteration (edge assignment); walks are started
        // lazily from the next input vertex that still has incident edges.
        if self.done {
            self.trace.commit();
            return Some(self.result());
        }

        let v = match self.walk {
            Some(v) => v,
            None => {
                // Find the next walk start.
                loop {
                    if self.next_start >= self.graph.number_of_nodes() {
                        self.done = true;
                        return None;
                    }
                    let candidate = self.next_start;
                    self.next_start += 1;
                    if self.index.contains(candidate) {
                        self.walk = Some(candidate);
                        break candidate;
                    }
                }
            }
        };

        self.trace.step("grow path");
        self.trace.current_node(v);
        let k = self
            .index
            .heaviest_incident_edge(v)
            .expect("walk positioned on a node without incident edges");
        let other = self.graph.edge(k).other_endpoint(v);

        if self.m1.len() <= self.m2.len() {
            self.trace.pick_edge(k, "blue");
            self.m1.push(k);
        } else {
            self.trace.pick_edge(k, "orange");
            self.m2.push(k);
        }

        self.index.remove(v, self.trace);
        self.trace.commit();

        if self.index.contains(other) {
            self.walk = Some(other);
        } else {
            self.finish_walk();
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::BlossomMatcher;
    use crate::testing::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    #[test]
    fn single_edge() {
        let g = Graph::from_edges(2, [Edge(0, 1, 3)]);
        assert_eq!(run_score(&g, &PathGrowingMatcher::standard()), 3);
        assert_eq!(run_score(&g, &PathGrowingMatcher::patched()), 3);
    }

    #[test]
    fn walk_follows_heaviest_edges() {
        // Walk from 0: picks (0-1:4) into M1, then from 1 picks (1-2:5)
        // into M2, then (2-3:1) into M1. M1 weighs 5, M2 weighs 5;
        // M1 wins the tie.
        let g = Graph::from_edges(
            4,
            [Edge(0, 1, 4), Edge(1, 2, 5), Edge(2, 3, 1), Edge(0, 2, 2)],
        );
        let (matching, score) = run_matching(&g, &PathGrowingMatcher::standard());
        assert_eq!(matching.indices(), &[0, 2]);
        assert_eq!(score, 5);
    }

    #[test]
    fn patched_decides_per_walk() {
        // Two disjoint paths. The global variant pools the walks into the
        // same two candidates; the patched variant picks per walk.
        let g = Graph::from_edges(
            8,
            [
                Edge(0, 1, 1),
                Edge(1, 2, 10),
                Edge(2, 3, 1),
                Edge(4, 5, 10),
                Edge(5, 6, 1),
                Edge(6, 7, 10),
            ],
        );
        let standard = run_score(&g, &PathGrowingMatcher::standard());
        let patched = run_score(&g, &PathGrowingMatcher::patched());
        assert!(patched >= standard);
        assert_eq!(patched, 30);
    }

    #[test]
    fn half_approximation_bound() {
        let rng = &mut Pcg64Mcg::seed_from_u64(17);

        for _ in 0..25 {
            let g = random_mission(rng, 13, 35);
            let optimum = run_score(&g, &BlossomMatcher);
            for matcher in [PathGrowingMatcher::standard(), PathGrowingMatcher::patched()] {
                let score = run_score(&g, &matcher);
                assert!(2 * score >= optimum, "{score} < {optimum} / 2");
            }
        }
    }
}
