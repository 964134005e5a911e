/*!
# Matching Algorithms

All matchers share one contract: given a read-only [`Graph`] and a
[`TraceSink`], they produce the resulting [`Matching`] as a **lazy sequence of
steps**. A step is one unit of visible progress at a granularity chosen by the
algorithm; callers consume steps one at a time (single-stepping UIs), in
bursts (throttled animation), or as fast as possible (benchmarks). Step
markers carry no semantics, so skipping ahead never changes the result.

Matchers are deterministic given identical inputs. They never mutate the
graph; every auxiliary structure lives only for the duration of one run.

Use [`MatcherKind`] to select a matcher by name, e.g. from a CLI argument.
*/

use std::str::FromStr;

use crate::{graph::Graph, matching::Matching, trace::TraceSink};

mod blossom;
mod greedy;
mod naive;
mod path_growing;
mod tree_growing;

pub use blossom::BlossomMatcher;
pub use greedy::GreedyMatcher;
pub use naive::NaiveMatcher;
pub use path_growing::PathGrowingMatcher;
pub use tree_growing::TreeGrowingMatcher;

/// An in-flight matcher run, consumed step by step.
///
/// `advance` performs one step. It returns `None` while the run is still in
/// progress and `Some(matching)` once the run finished; the finishing call
/// counts as a step as well. Calling `advance` after completion is a caller
/// bug and may panic.
pub trait Steps {
    /// Performs one step of the algorithm.
    fn advance(&mut self) -> Option<Matching>;
}

/// A matching algorithm under the uniform `(graph, trace) -> matching`
/// contract.
///
/// `start` allocates the per-run state and returns the lazy step sequence;
/// nothing is computed before the first [`Steps::advance`] call. Use the
/// [`Runner`](crate::runner::Runner) to drive a run to completion.
pub trait Matcher {
    /// A short stable identifier, usable as a CLI argument.
    fn name(&self) -> &'static str;

    /// Begins a run on `graph`, pushing progress events into `trace`.
    fn start<'a>(&self, graph: &'a Graph, trace: &'a mut dyn TraceSink) -> Box<dyn Steps + 'a>;
}

/// Identifier for a matcher implementation.
///
/// Mirrors the set of matchers shipped by this crate and converts from the
/// names accepted on command lines and in benchmark configs.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MatcherKind {
    Greedy,
    PathGrowing,
    PathGrowingPatched,
    Naive,
    TreeGrowing,
    Blossom,
}

impl MatcherKind {
    /// All available matchers, in increasing order of result quality.
    pub const ALL: [MatcherKind; 6] = [
        MatcherKind::Greedy,
        MatcherKind::PathGrowing,
        MatcherKind::PathGrowingPatched,
        MatcherKind::TreeGrowing,
        MatcherKind::Naive,
        MatcherKind::Blossom,
    ];

    /// Instantiates the matcher with its default configuration.
    pub fn build(self) -> Box<dyn Matcher> {
        match self {
            MatcherKind::Greedy => Box::new(GreedyMatcher),
            MatcherKind::PathGrowing => Box::new(PathGrowingMatcher::standard()),
            MatcherKind::PathGrowingPatched => Box::new(PathGrowingMatcher::patched()),
            MatcherKind::Naive => Box::new(NaiveMatcher::default()),
            MatcherKind::TreeGrowing => Box::new(TreeGrowingMatcher),
            MatcherKind::Blossom => Box::new(BlossomMatcher),
        }
    }
}

impl FromStr for MatcherKind {
    type Err = std::io::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "greedy" => Ok(MatcherKind::Greedy),
            "pathgrowing" | "path-growing" => Ok(MatcherKind::PathGrowing),
            "pathgrowingpatched" | "path-growing-patched" => Ok(MatcherKind::PathGrowingPatched),
            "naive" => Ok(MatcherKind::Naive),
            "treegrowing" | "tree-growing" => Ok(MatcherKind::TreeGrowing),
            "blossom" => Ok(MatcherKind::Blossom),
            _ => Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Unknown matcher: {s}"),
            )),
        }
    }
}
