//! Crate-internal helpers shared by the matcher tests: the fixed scenario
//! table with reference scores, seeded random missions and runner shorthands.

pub use crate::prelude::*;

use rand::Rng;

/// End-to-end scenarios with their optimal scores. Exact matchers must hit
/// the score precisely, approximate matchers are checked for validity.
pub fn scenarios() -> Vec<(Graph, Weight)> {
    vec![
        // Triangle with one dominant edge.
        (
            Graph::from_edges(3, [Edge(0, 1, 1), Edge(1, 2, 1), Edge(0, 2, 10)]),
            10,
        ),
        // 3-edge path where greedy fails.
        (
            Graph::from_edges(4, [Edge(0, 1, 2), Edge(1, 2, 3), Edge(2, 3, 2)]),
            4,
        ),
        // 4-edge path.
        (
            Graph::from_edges(
                5,
                [Edge(0, 1, 10), Edge(1, 2, 1), Edge(2, 3, 1), Edge(3, 4, 9)],
            ),
            19,
        ),
        // 6-edge path.
        (
            Graph::from_edges(
                7,
                [
                    Edge(0, 1, 10),
                    Edge(1, 2, 1),
                    Edge(2, 3, 2),
                    Edge(3, 4, 9),
                    Edge(4, 5, 9),
                    Edge(5, 6, 2),
                ],
            ),
            21,
        ),
        // Square.
        (
            Graph::from_edges(
                4,
                [Edge(0, 1, 1), Edge(1, 2, 2), Edge(2, 3, 2), Edge(3, 0, 2)],
            ),
            4,
        ),
        // Three disjoint edges.
        (
            Graph::from_edges(6, [Edge(0, 1, 10), Edge(2, 3, 10), Edge(4, 5, 9)]),
            29,
        ),
        // Empty graph.
        (Graph::new(0), 0),
    ]
}

/// The scenario graphs without their reference scores.
pub fn scenario_graphs() -> Vec<Graph> {
    scenarios().into_iter().map(|(g, _)| g).collect()
}

/// A random mission graph; thin wrapper to keep test code short.
pub fn random_mission<R: Rng>(rng: &mut R, n: NumNodes, edge_rate_percent: u32) -> Graph {
    Graph::random_mission(rng, n, edge_rate_percent)
}

/// Runs `matcher` to completion and returns the matching with its score.
pub fn run_matching(graph: &Graph, matcher: &dyn Matcher) -> (Matching, Weight) {
    let outcome = Runner::new()
        .run_sync(graph, matcher, &mut NoTrace)
        .expect("matcher run failed");
    (outcome.matching, outcome.score)
}

/// Runs `matcher` to completion and returns only the score.
pub fn run_score(graph: &Graph, matcher: &dyn Matcher) -> Weight {
    run_matching(graph, matcher).1
}

/// Runs `matcher` to completion and returns the matching with the number of
/// steps consumed.
pub fn run_counting_steps(graph: &Graph, matcher: &dyn Matcher) -> (Matching, u64) {
    let outcome = Runner::new()
        .run_sync(graph, matcher, &mut NoTrace)
        .expect("matcher run failed");
    (outcome.matching, outcome.steps)
}
