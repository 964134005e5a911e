/*!
# Dot

Module for writing graphs in the [Dot-Format](https://graphviz.org/doc/info/lang.html).

Edge weights become edge labels, and an optional [`Matching`] is drawn in
bold red. Nodes are incremented by 1 by default (`0` → `u1`) to conform to
typical Dot usage.
*/

use std::io::{Result, Write};

use stream_bitset::prelude::*;

use super::GraphWriter;
use crate::{edge::EdgeBitSet, graph::Graph, matching::Matching, node::Node};

/// A writer for the Dot-Format.
///
/// Allows customizing the node prefix and highlighting a matching.
#[derive(Debug, Clone)]
pub struct DotWriter {
    /// Increment nodes by 1 before writing
    inc_nodes: bool,
    /// Prefix of a node (default: 'u')
    prefix: String,
    /// Edges to draw highlighted
    matching: Option<Matching>,
}

impl Default for DotWriter {
    fn default() -> Self {
        Self {
            inc_nodes: true,
            prefix: "u".to_string(),
            matching: None,
        }
    }
}

impl DotWriter {
    /// Shorthand for creating a default DotWriter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether nodes should be incremented before writing.
    pub fn set_inc_nodes(&mut self, inc_nodes: bool) {
        self.inc_nodes = inc_nodes;
    }

    /// Builder-style setter for node increment.
    pub fn inc_nodes(mut self, inc_nodes: bool) -> Self {
        self.set_inc_nodes(inc_nodes);
        self
    }

    /// Set the prefix of a node.
    pub fn set_node_prefix<S>(&mut self, prefix: S)
    where
        S: Into<String>,
    {
        self.prefix = prefix.into();
    }

    /// Builder-style setter for node prefix.
    pub fn node_prefix<S>(mut self, prefix: S) -> Self
    where
        S: Into<String>,
    {
        self.set_node_prefix(prefix);
        self
    }

    /// Set a matching whose edges are drawn in bold red.
    pub fn set_matching(&mut self, matching: Matching) {
        self.matching = Some(matching);
    }

    /// Builder-style setter for the highlighted matching.
    pub fn matching(mut self, matching: Matching) -> Self {
        self.set_matching(matching);
        self
    }

    /// Formats a node as a string using prefix and increment options.
    fn format_node(&self, u: Node) -> String {
        let u = u + self.inc_nodes as Node;
        format!("{}{u}", self.prefix)
    }
}

impl GraphWriter for DotWriter {
    fn try_write_graph<W: Write>(&self, graph: &Graph, mut writer: W) -> Result<()> {
        let mut matched = EdgeBitSet::new(graph.number_of_edges());
        if let Some(matching) = &self.matching {
            for &k in matching.indices() {
                matched.set_bit(k);
            }
        }

        writeln!(writer, "graph {{")?;
        for v in graph.vertices() {
            writeln!(writer, "  {};", self.format_node(v))?;
        }
        for (k, e) in graph.indexed_edges() {
            let attrs = if matched.get_bit(k) {
                format!("label=\"{}\",color=red,penwidth=2", e.weight())
            } else {
                format!("label=\"{}\"", e.weight())
            };
            writeln!(
                writer,
                "  {} -- {} [{attrs}];",
                self.format_node(e.source()),
                self.format_node(e.target())
            )?;
        }
        writeln!(writer, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::Edge;

    #[test]
    fn writes_weight_labels() {
        let g = Graph::from_edges(3, [Edge(0, 1, 5), Edge(1, 2, 2)]);

        let mut buffer = Vec::new();
        DotWriter::new().try_write_graph(&g, &mut buffer).unwrap();
        let out = String::from_utf8(buffer).unwrap();

        assert!(out.starts_with("graph {"));
        assert!(out.contains("u1 -- u2 [label=\"5\"];"));
        assert!(out.contains("u2 -- u3 [label=\"2\"];"));
        assert!(out.ends_with("}\n"));
    }

    #[test]
    fn highlights_matching() {
        let g = Graph::from_edges(3, [Edge(0, 1, 5), Edge(1, 2, 2)]);
        let matching = Matching::from_indices(vec![1]);

        let mut buffer = Vec::new();
        DotWriter::new()
            .matching(matching)
            .try_write_graph(&g, &mut buffer)
            .unwrap();
        let out = String::from_utf8(buffer).unwrap();

        assert!(out.contains("u1 -- u2 [label=\"5\"];"));
        assert!(out.contains("u2 -- u3 [label=\"2\",color=red,penwidth=2];"));
    }

    #[test]
    fn custom_prefix_without_increment() {
        let g = Graph::from_edges(2, [Edge(0, 1, 1)]);

        let mut buffer = Vec::new();
        DotWriter::new()
            .node_prefix("n")
            .inc_nodes(false)
            .try_write_graph(&g, &mut buffer)
            .unwrap();
        let out = String::from_utf8(buffer).unwrap();

        assert!(out.contains("n0 -- n1 [label=\"1\"];"));
    }
}
