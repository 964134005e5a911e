//! # EdgeList
//!
//! The EdgeList-Format consists of a header line `n m`, followed by `m`
//! non-comment-lines `u v w` representing the weighted edge
//! `Edge(u - 1, v - 1, w)`. Lines starting with the comment identifier
//! (default `c`) are skipped.

use std::io::{BufRead, ErrorKind, Lines, Result, Write};

use super::*;
use crate::{edge::*, node::*};

/// A GraphReader for the EdgeList-Format
#[derive(Debug, Clone)]
pub struct EdgeListReader {
    /// Lines starting with `comment_identifier` are skipped when reading
    comment_identifier: String,
}

impl Default for EdgeListReader {
    fn default() -> Self {
        Self {
            comment_identifier: "c".to_string(),
        }
    }
}

impl EdgeListReader {
    /// Creates a new (default) reader
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the comment identifier
    pub fn comment_identifier<S: Into<String>>(mut self, c: S) -> EdgeListReader {
        self.comment_identifier = c.into();
        self
    }
}

impl GraphReader for EdgeListReader {
    fn try_read_graph<R: BufRead>(&self, reader: R) -> Result<Graph> {
        let mut edges_reader = EdgeListLines::try_new(reader, &self.comment_identifier)?;
        let n = edges_reader.number_of_nodes();
        let m = edges_reader.number_of_edges();

        let mut edges = Vec::with_capacity(m as usize);
        while let Some(edge) = edges_reader.parse_edge_line()? {
            edges.push(edge);
        }
        if edges.len() != m as usize {
            return Err(malformed(format!(
                "header announced {m} edges, file contains {}",
                edges.len()
            )));
        }

        Graph::try_from_edges(n, edges).map_err(|e| malformed(e.to_string()))
    }
}

/// Consumes the lines of a reader, parsing the header and one edge per line
struct EdgeListLines<'a, R> {
    lines: Lines<R>,
    number_of_nodes: NumNodes,
    number_of_edges: NumEdges,
    comment_identifier: &'a str,
}

impl<'a, R: BufRead> EdgeListLines<'a, R> {
    /// Tries to parse the first non-comment-line as the `n m` header
    fn try_new(reader: R, comment_identifier: &'a str) -> Result<Self> {
        let mut edge_list_reader = Self {
            lines: reader.lines(),
            number_of_nodes: 0,
            number_of_edges: 0,
            comment_identifier,
        };

        let header = edge_list_reader
            .next_non_comment_line()?
            .ok_or(std::io::Error::new(
                ErrorKind::NotFound,
                "missing the `n m` header line",
            ))?;
        let mut parts = header.split(' ').filter(|t| !t.is_empty());
        edge_list_reader.number_of_nodes = parse_token(&mut parts, "node count")?;
        edge_list_reader.number_of_edges = parse_token(&mut parts, "edge count")?;

        Ok(edge_list_reader)
    }

    fn number_of_nodes(&self) -> NumNodes {
        self.number_of_nodes
    }

    fn number_of_edges(&self) -> NumEdges {
        self.number_of_edges
    }

    /// Returns the next non-comment-line if it exists or propagate an error
    fn next_non_comment_line(&mut self) -> Result<Option<String>> {
        loop {
            let line = self.lines.next();
            match line {
                None => return Ok(None),
                Some(Err(x)) => return Err(x),
                Some(Ok(line)) if line.starts_with(self.comment_identifier) => continue,
                Some(Ok(line)) => return Ok(Some(line)),
            }
        }
    }

    /// Tries to parse an edge from the next non-comment-line
    fn parse_edge_line(&mut self) -> Result<Option<Edge>> {
        let line = self.next_non_comment_line()?;
        if let Some(line) = line {
            let mut parts = line.split(' ').filter(|t| !t.is_empty());

            let from: Node = parse_token(&mut parts, "source node")?;
            let dest: Node = parse_token(&mut parts, "target node")?;
            let weight: Weight = parse_token(&mut parts, "edge weight")?;

            if !(1..=self.number_of_nodes).contains(&from)
                || !(1..=self.number_of_nodes).contains(&dest)
            {
                return Err(malformed(format!(
                    "edge ({from},{dest}) leaves the node range 1..={}",
                    self.number_of_nodes
                )));
            }

            Ok(Some(Edge(from - 1, dest - 1, weight)))
        } else {
            Ok(None)
        }
    }
}

/// A writer for the EdgeList-Format
#[derive(Debug, Clone, Default)]
pub struct EdgeListWriter;

impl EdgeListWriter {
    /// Shorthand for default
    pub fn new() -> Self {
        Self
    }
}

impl GraphWriter for EdgeListWriter {
    fn try_write_graph<W: Write>(&self, graph: &Graph, mut writer: W) -> Result<()> {
        writeln!(
            writer,
            "{} {}",
            graph.number_of_nodes(),
            graph.number_of_edges()
        )?;

        for Edge(u, v, w) in graph.edges() {
            writeln!(writer, "{} {} {w}", u + 1, v + 1)?;
        }

        Ok(())
    }
}
