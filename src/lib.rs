/*!
`wmatch` is a library of algorithms computing **maximum-weight matchings** in
general undirected graphs: given weighted edges, select a subset such that no
two selected edges share a vertex and the total weight is as large as possible.

# Matchers

All algorithms share one contract (see [`algo::Matcher`]): they take a
read-only [`Graph`](graph::Graph) plus an optional [`TraceSink`](trace::TraceSink)
and produce the matching as a lazy sequence of steps, so callers can
single-step, animate, or run to completion.

- [`GreedyMatcher`](algo::GreedyMatcher): sort edges by weight, select greedily.
- [`PathGrowingMatcher`](algo::PathGrowingMatcher): grows alternating paths and
  keeps the better of two candidate matchings (1/2-approximation); a *patched*
  variant decides per path instead of globally.
- [`NaiveMatcher`](algo::NaiveMatcher): exhaustive search, exact but
  exponential, guarded by a vertex cap.
- [`TreeGrowingMatcher`](algo::TreeGrowingMatcher): DFS over an alternating
  tree with local augmentation.
- [`BlossomMatcher`](algo::BlossomMatcher): Edmonds' primal-dual blossom
  algorithm with Galil's refinements; computes an optimal matching in `O(n^3)`.

# Usage

```
use wmatch::prelude::*;

let g = Graph::from_edges(4, [Edge(0, 1, 2), Edge(1, 2, 3), Edge(2, 3, 2)]);
let outcome = Runner::new()
    .run_sync(&g, &BlossomMatcher, &mut NoTrace)
    .unwrap();
assert_eq!(outcome.score, 4);
```

# Representation

Nodes are `u32` ids that are dense in `0..n`; edges are triples
`Edge(u, v, w)` with non-negative integer weights, at most one edge per
unordered pair and no self-loops. A [`Matching`](matching::Matching) refers to
the input's own edges by index, never to reconstructed copies.
*/

pub mod algo;
pub mod edge;
pub mod gens;
pub mod graph;
pub mod index;
pub mod io;
pub mod matching;
pub mod node;
pub mod runner;
pub mod trace;
#[cfg(test)]
pub(crate) mod testing;
pub mod utils;

/// `wmatch::prelude` includes the graph model, all matchers, the runner and
/// the trace sink definitions.
pub mod prelude {
    pub use super::{algo::*, edge::*, graph::*, matching::*, node::*, runner::*, trace::*};
}
