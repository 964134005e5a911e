/*!
# Random Mission Generator

Produces random benchmark inputs ("missions"): given a node count and an edge
rate in percent, every unordered node pair receives an edge independently
with probability `rate / 100`, weighted uniformly in `0..1000`. Self-loops
never occur and each pair is sampled once, so the output is always a valid
input graph.

# Examples
```
use wmatch::{gens::*, graph::Graph};
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

let rng = &mut Pcg64Mcg::seed_from_u64(42);
let g = Graph::random_mission(rng, 20, 30);
assert_eq!(g.number_of_nodes(), 20);
```
*/

use rand::Rng;

use crate::{edge::*, graph::Graph, node::*};

/// Upper bound (exclusive) of the uniformly drawn edge weights.
pub const MISSION_MAX_WEIGHT: Weight = 1000;

/// Generator for random missions; see the module docs.
///
/// # Examples
/// ```
/// use wmatch::{gens::*, edge::Edge};
/// use rand::SeedableRng;
/// use rand_pcg::Pcg64Mcg;
///
/// let rng = &mut Pcg64Mcg::seed_from_u64(1);
/// let edges: Vec<Edge> = Mission::new().nodes(6).edge_rate(50).generate(rng);
/// assert!(edges.iter().all(|e| e.0 < e.1 && e.1 < 6));
/// ```
#[derive(Debug, Copy, Clone, Default)]
pub struct Mission {
    n: NumNodes,
    edge_rate_percent: u32,
}

impl Mission {
    /// Creates a new generator with no parameters set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how many nodes the mission spans (mutable setter).
    pub fn set_nodes(&mut self, n: NumNodes) {
        self.n = n;
    }

    /// Sets how many nodes the mission spans (builder style).
    pub fn nodes(mut self, n: NumNodes) -> Self {
        self.set_nodes(n);
        self
    }

    /// Sets the edge rate in percent (mutable setter).
    ///
    /// # Panics
    /// Panics if `percent > 100`.
    pub fn set_edge_rate(&mut self, percent: u32) {
        assert!(percent <= 100, "edge rate must be at most 100 percent");
        self.edge_rate_percent = percent;
    }

    /// Sets the edge rate in percent (builder style).
    pub fn edge_rate(mut self, percent: u32) -> Self {
        self.set_edge_rate(percent);
        self
    }

    /// Produces a lazy stream of edges over all unordered node pairs in
    /// lexicographic order, each included with probability `rate / 100`.
    pub fn stream<'a, R>(&'a self, rng: &'a mut R) -> impl Iterator<Item = Edge> + 'a
    where
        R: Rng,
    {
        let n = self.n;
        let p = self.edge_rate_percent as f64 / 100.0;
        (0..n)
            .flat_map(move |u| (u + 1..n).map(move |v| (u, v)))
            .filter_map(move |(u, v)| {
                rng.random_bool(p).then(|| {
                    Edge(u, v, rng.random_range(0..MISSION_MAX_WEIGHT))
                })
            })
    }

    /// Generates a `Vec<Edge>` by fully materializing the edge stream.
    pub fn generate<R>(&self, rng: &mut R) -> Vec<Edge>
    where
        R: Rng,
    {
        self.stream(rng).collect()
    }

    /// Generates a complete mission graph.
    pub fn generate_graph<R>(&self, rng: &mut R) -> Graph
    where
        R: Rng,
    {
        Graph::from_edges(self.n, self.generate(rng))
    }
}

impl Graph {
    /// Creates a random mission graph with `n` nodes and the given edge rate
    /// in percent.
    pub fn random_mission<R>(rng: &mut R, n: NumNodes, edge_rate_percent: u32) -> Self
    where
        R: Rng,
    {
        Mission::new()
            .nodes(n)
            .edge_rate(edge_rate_percent)
            .generate_graph(rng)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    use super::*;

    #[test]
    fn rate_extremes() {
        let rng = &mut Pcg64Mcg::seed_from_u64(3);

        for n in [2 as NumNodes, 10, 25] {
            let empty = Graph::random_mission(rng, n, 0);
            assert_eq!(empty.number_of_edges(), 0);

            let full = Graph::random_mission(rng, n, 100);
            assert_eq!(full.number_of_edges(), n * (n - 1) / 2);
        }
    }

    #[test]
    fn edge_rate_is_respected_on_average() {
        let rng = &mut Pcg64Mcg::seed_from_u64(3);
        let repeats = 300;

        for rate in [10u32, 50, 90] {
            let n = 20 as NumNodes;
            let pairs = (n * (n - 1) / 2) as f64;

            let mean_edges = (0..repeats)
                .map(|_| {
                    let g = Graph::random_mission(rng, n, rate);
                    assert_eq!(g.number_of_nodes(), n);
                    g.number_of_edges() as f64
                })
                .sum::<f64>()
                / repeats as f64;
            let expected = pairs * rate as f64 / 100.0;

            assert!((0.75 * expected..1.25 * expected).contains(&mean_edges));
        }
    }

    #[test]
    fn weights_stay_in_range() {
        let rng = &mut Pcg64Mcg::seed_from_u64(8);
        let g = Graph::random_mission(rng, 30, 80);
        assert!(g
            .edges()
            .all(|e| (0..MISSION_MAX_WEIGHT).contains(&e.weight())));
    }

    #[test]
    fn missions_are_valid_inputs() {
        let rng = &mut Pcg64Mcg::seed_from_u64(21);
        for _ in 0..50 {
            let edges = Mission::new().nodes(12).edge_rate(70).generate(rng);
            assert!(Graph::try_from_edges(12, edges).is_ok());
        }
    }
}
