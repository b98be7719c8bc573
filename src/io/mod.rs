/*!
# IO

Thin ingestion and output helpers. The graph engine itself owns no file format; it consumes a
stream of `(u, v[, type])` triples and can write one back.

## Input

[`TripleReader`] reads whitespace-separated lines `u v [type]`. Vertex tokens are either interned
as names through an [`Indexer`](crate::utils::Indexer) (default) or parsed as raw, possibly
sparse, vertex ids. Lines starting with the comment identifier (`#` by default) and blank lines
are skipped.

## Output

- [`TripleWriter`] / [`write_triples`] write any graph as a triple stream, optionally translating
  ids back to names.
- [`adjacency_matrix_string`] pretty-prints a `0/1` adjacency matrix.

## Traits

[`GraphReader`] and [`GraphWriter`] are implemented by the configurable reader and writer;
[`TripleRead`] is the shorthand for reading with default settings.
*/

pub mod edge_list;

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Result, Write},
    path::Path,
};

use itertools::Itertools;

use crate::prelude::*;

pub use edge_list::*;

/// Trait for types that can read graphs in a specific format.
pub trait GraphReader<G> {
    /// Reads a graph from the given reader according to the settings in `self`.
    ///
    /// # Errors
    /// Returns an error if the input is not a valid representation
    /// of a graph in the expected format.
    fn try_read_graph<R>(&self, reader: R) -> Result<G>
    where
        R: BufRead;

    /// Reads a graph from a file according to the settings in `self`.
    fn try_read_graph_file<P>(&self, path: P) -> Result<G>
    where
        P: AsRef<Path>,
    {
        self.try_read_graph(BufReader::new(File::open(path)?))
    }
}

/// Trait for types that can write graphs in a specific format.
pub trait GraphWriter<G> {
    /// Writes the given graph to the provided writer according to the settings in `self`.
    ///
    /// # Errors
    /// Returns an error if writing fails.
    fn try_write_graph<W>(&self, graph: &G, writer: W) -> Result<()>
    where
        W: Write;

    /// Writes the given graph to a file according to the settings in `self`.
    fn try_write_graph_file<P>(&self, graph: &G, path: P) -> Result<()>
    where
        P: AsRef<Path>,
    {
        self.try_write_graph(graph, BufWriter::new(File::create(path)?))
    }
}

/// Renders the adjacency matrix of `graph` over its vertices in ascending order.
/// Each row is terminated by a line break, entries are separated by a single space.
///
/// # Example
/// ```
/// use sgraphs::{prelude::*, io::adjacency_matrix_string};
///
/// let g = DirectedGraph::from_pairs([(4, 7), (7, 7)]).unwrap();
/// assert_eq!(adjacency_matrix_string(&g), "0 1\n0 1\n");
/// ```
pub fn adjacency_matrix_string<G: AdjacencyTest>(graph: &G) -> String {
    let vertices = graph.vertices().sorted_unstable().collect_vec();
    vertices
        .iter()
        .map(|&u| {
            vertices
                .iter()
                .map(|&v| if graph.has_edge(u, v) { '1' } else { '0' })
                .join(" ")
                + "\n"
        })
        .collect()
}

/// Shorthand for creating a new IO-error
macro_rules! io_error {
    ($kind: expr, $info: expr) => {
        std::io::Error::new($kind, $info)
    };
}

/// Shorthand for returning `Err(std::io::Error)` early when a condition fails
macro_rules! raise_error_unless {
    ($cond : expr, $kind : expr, $info : expr) => {
        if !($cond) {
            return Err(io_error!($kind, $info));
        }
    };
}

/// Tries to parse the next value in an iterator and returns early if it fails
macro_rules! parse_next_value {
    ($iterator : expr, $name : expr) => {{
        match $iterator.next().map(|token| token.parse()) {
            Some(Ok(value)) => value,
            Some(Err(_)) => {
                return Err(io_error!(
                    std::io::ErrorKind::InvalidData,
                    format!("Invalid value found. Cannot parse {}.", $name)
                ))
            }
            None => {
                return Err(io_error!(
                    std::io::ErrorKind::InvalidData,
                    format!("Premature end of line when parsing {}.", $name)
                ))
            }
        }
    }};
}

use io_error;
use parse_next_value;
use raise_error_unless;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn matrix_is_symmetric_for_undirected_graphs() {
        let graph = UndirectedGraph::from_pairs([(0, 1), (1, 2)]).unwrap();
        assert_eq!(adjacency_matrix_string(&graph), "0 1 0\n1 0 1\n0 1 0\n");
    }

    #[test]
    fn matrix_follows_sparse_ids() {
        let mut graph = DirectedGraph::from_pairs([(9, 3)]).unwrap();
        graph.add_vertex(5).unwrap();
        assert_eq!(adjacency_matrix_string(&graph), "0 0 0\n0 0 0\n1 0 0\n");

        assert_eq!(adjacency_matrix_string(&DirectedGraph::new()), "");
    }
}
