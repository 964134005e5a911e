/*!
# IO

Utilities for reading and writing weighted graphs.

## Formats

- **EdgeList**: a header line `n m` followed by `m` lines `u v w` with
  1-indexed nodes and integer weights. Lines starting with `c` are comments.
- **Dot**: the [DOT language](https://graphviz.org/doc/info/lang.html) of
  GraphViz, write-only; weights become edge labels and a matching can be
  highlighted.

[`GraphReader`] and [`GraphWriter`] abstract over the formats so callers can
dispatch on a [`FileFormat`] value, e.g. parsed from a CLI argument.
*/

pub mod dot;
pub mod edge_list;

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, ErrorKind, Result, Write},
    path::Path,
    str::FromStr,
};

use crate::graph::Graph;

pub use dot::*;
pub use edge_list::*;

/// Identifier for a graph file format.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FileFormat {
    /// Weighted edge list
    EdgeList,
    /// DOT language of GraphViz (write-only)
    Dot,
}

impl FromStr for FileFormat {
    type Err = std::io::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "edgelist" => Ok(FileFormat::EdgeList),
            "dot" => Ok(FileFormat::Dot),
            _ => Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Unknown FileFormat: {s}"),
            )),
        }
    }
}

/// Trait for types that can read graphs in a specific format.
pub trait GraphReader {
    /// Reads a graph from the given reader according to the settings in `self`.
    ///
    /// # Errors
    /// Returns an error if the input is not a valid representation of a
    /// graph in the expected format.
    fn try_read_graph<R>(&self, reader: R) -> Result<Graph>
    where
        R: BufRead;

    /// Reads a graph from a file according to the settings in `self`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or its contents are
    /// invalid.
    fn try_read_graph_file<P>(&self, path: P) -> Result<Graph>
    where
        P: AsRef<Path>,
    {
        self.try_read_graph(BufReader::new(File::open(path)?))
    }
}

/// Trait for types that can write graphs in a specific format.
pub trait GraphWriter {
    /// Writes the given graph to the provided writer according to the
    /// settings in `self`.
    ///
    /// # Errors
    /// Returns an error if writing fails.
    fn try_write_graph<W>(&self, graph: &Graph, writer: W) -> Result<()>
    where
        W: Write;

    /// Writes the given graph to a file according to the settings in `self`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or writing fails.
    fn try_write_graph_file<P>(&self, graph: &Graph, path: P) -> Result<()>
    where
        P: AsRef<Path>,
    {
        self.try_write_graph(graph, BufWriter::new(File::create(path)?))
    }
}

impl Graph {
    /// Reads a graph from `reader` in the given format.
    pub fn try_from_reader<R>(reader: R, format: FileFormat) -> Result<Self>
    where
        R: BufRead,
    {
        match format {
            FileFormat::EdgeList => EdgeListReader::new().try_read_graph(reader),
            FileFormat::Dot => Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Dot does not support reading",
            )),
        }
    }

    /// Writes the graph to `writer` in the given format.
    pub fn try_write_to_writer<W>(&self, writer: W, format: FileFormat) -> Result<()>
    where
        W: Write,
    {
        match format {
            FileFormat::EdgeList => EdgeListWriter::new().try_write_graph(self, writer),
            FileFormat::Dot => DotWriter::new().try_write_graph(self, writer),
        }
    }
}

/// Builds the `InvalidData` error reported for malformed graph files.
pub(crate) fn malformed(info: impl Into<String>) -> std::io::Error {
    std::io::Error::new(ErrorKind::InvalidData, info.into())
}

/// Pulls the next token out of `tokens` and parses it as `T`. The `field`
/// name ends up in the error when the line runs out of tokens or the token
/// does not parse.
pub(crate) fn parse_token<'a, T, I>(tokens: &mut I, field: &str) -> Result<T>
where
    T: FromStr,
    I: Iterator<Item = &'a str>,
{
    let token = tokens
        .next()
        .ok_or_else(|| malformed(format!("line ended before the {field}")))?;
    token
        .parse()
        .map_err(|_| malformed(format!("{token:?} is not a valid {field}")))
}
