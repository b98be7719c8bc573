//! # Triple Streams
//!
//! A triple stream consists of non-comment lines `u v [type]`, each describing one edge.
//! Vertex tokens are names interned through an [`Indexer`] or, with
//! [`TripleReader::indexed(false)`](TripleReader::indexed), raw vertex ids.
//! Isolated vertices cannot be expressed and are lost when a graph is written.

use std::{
    fs::File,
    io::{BufRead, BufReader, ErrorKind, Result, Write},
    path::Path,
};

use super::*;
use crate::utils::Indexer;

/// A single parsed line: both endpoints and the optional edge type
pub type Triple = (Node, Node, Option<String>);

/// A configurable reader for triple streams
#[derive(Debug, Clone)]
pub struct TripleReader {
    /// Lines starting with `comment_identifier` are skipped when reading
    comment_identifier: String,
    /// If set, the third token of a line is read as the edge type
    typed: bool,
    /// If set, vertex tokens are names; otherwise they are parsed as ids
    indexed: bool,
}

impl Default for TripleReader {
    fn default() -> Self {
        Self {
            comment_identifier: "#".to_string(),
            typed: false,
            indexed: true,
        }
    }
}

impl TripleReader {
    /// Creates a new (default) reader
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the comment identifier
    pub fn comment_identifier<S: Into<String>>(mut self, c: S) -> TripleReader {
        self.comment_identifier = c.into();
        self
    }

    /// Sets whether a third token is read as edge type
    pub fn typed(mut self, typed: bool) -> TripleReader {
        self.typed = typed;
        self
    }

    /// Sets whether vertex tokens are names (`true`) or numeric ids (`false`)
    pub fn indexed(mut self, indexed: bool) -> TripleReader {
        self.indexed = indexed;
        self
    }

    /// Reads all triples. Names are interned through `names`, which may already hold
    /// names from earlier streams; it is left untouched if the reader is not indexed.
    ///
    /// # Errors
    /// Fails on IO errors and on lines with fewer than two tokens (or unparsable ids);
    /// the message names the offending line.
    pub fn try_read_triples<R: BufRead>(
        &self,
        reader: R,
        names: &mut Indexer<String>,
    ) -> Result<Vec<Triple>> {
        let mut triples = Vec::new();
        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with(self.comment_identifier.as_str()) {
                continue;
            }

            let triple = self.parse_line(line, names).map_err(|err| {
                io_error!(err.kind(), format!("line {}: {err}", number + 1))
            })?;
            triples.push(triple);
        }
        Ok(triples)
    }

    /// Reads a graph and returns it along with the names of its vertices
    pub fn try_read_named_graph<G, R>(&self, reader: R) -> Result<(G, Indexer<String>)>
    where
        G: FromTriples,
        R: BufRead,
    {
        let mut names = Indexer::new();
        let triples = self.try_read_triples(reader, &mut names)?;
        let graph = G::try_from_triples(triples)
            .map_err(|err| io_error!(ErrorKind::InvalidData, err))?;
        Ok((graph, names))
    }

    fn parse_line(&self, line: &str, names: &mut Indexer<String>) -> Result<Triple> {
        let tokens = line.split_whitespace().collect_vec();
        raise_error_unless!(
            tokens.len() >= 2,
            ErrorKind::InvalidData,
            format!("expected at least two tokens, found {}", tokens.len())
        );

        let (u, v) = if self.indexed {
            (names.get_or_insert(tokens[0]), names.get_or_insert(tokens[1]))
        } else {
            let mut ids = tokens.iter();
            let u: Node = parse_next_value!(ids, "source vertex");
            let v: Node = parse_next_value!(ids, "target vertex");
            (u, v)
        };

        let edge_type = if self.typed {
            tokens.get(2).map(|t| t.to_string())
        } else {
            None
        };

        Ok((u, v, edge_type))
    }
}

/// Graphs that can be built from a triple stream
pub trait FromTriples: Sized {
    /// Whether the shorthand readers should parse edge types for this graph
    const TYPED: bool;

    /// Builds a graph containing every edge of the stream
    fn try_from_triples(triples: impl IntoIterator<Item = Triple>) -> GraphResult<Self>;
}

impl FromTriples for UndirectedGraph {
    const TYPED: bool = false;

    fn try_from_triples(triples: impl IntoIterator<Item = Triple>) -> GraphResult<Self> {
        Self::from_pairs(triples.into_iter().map(|(u, v, _)| (u, v)))
    }
}

impl FromTriples for DirectedGraph {
    const TYPED: bool = false;

    fn try_from_triples(triples: impl IntoIterator<Item = Triple>) -> GraphResult<Self> {
        Self::from_pairs(triples.into_iter().map(|(u, v, _)| (u, v)))
    }
}

impl FromTriples for DirectedMultigraph<String> {
    const TYPED: bool = true;

    /// Fails with [`GraphError::UnsupportedEdge`] if a triple carries no type
    fn try_from_triples(triples: impl IntoIterator<Item = Triple>) -> GraphResult<Self> {
        let mut graph = Self::new();
        for (u, v, edge_type) in triples {
            let edge_type = edge_type
                .ok_or_else(|| GraphError::UnsupportedEdge(format!("{u} -> {v} has no type")))?;
            graph.add_edge(u, v, edge_type)?;
        }
        Ok(graph)
    }
}

impl<G: FromTriples> GraphReader<G> for TripleReader {
    fn try_read_graph<R: BufRead>(&self, reader: R) -> Result<G> {
        self.try_read_named_graph(reader).map(|(graph, _)| graph)
    }
}

/// Trait for creating graphs from a triple stream.
/// Used as shorthand for default reader settings (types are read iff the graph stores them).
pub trait TripleRead: Sized {
    /// Tries to read the graph from a given reader
    fn try_read_triples<R: BufRead>(reader: R) -> Result<Self>;

    /// Tries to read the graph from a given file
    fn try_read_triples_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::try_read_triples(BufReader::new(File::open(path)?))
    }
}

impl<G: FromTriples> TripleRead for G {
    fn try_read_triples<R: BufRead>(reader: R) -> Result<Self> {
        TripleReader::new().typed(G::TYPED).try_read_graph(reader)
    }
}

/// Edge types that can be written as the third token of a triple
pub trait TypeLabel {
    /// Token written for this type, `None` if the type is not written at all
    fn label(&self) -> Option<String>;
}

impl TypeLabel for () {
    fn label(&self) -> Option<String> {
        None
    }
}

macro_rules! impl_type_label {
    ($($t:ty),*) => {
        $(
            impl TypeLabel for $t {
                fn label(&self) -> Option<String> {
                    Some(self.to_string())
                }
            }
        )*
    };
}

impl_type_label!(String, &str, char, u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

/// A writer for triple streams
#[derive(Debug, Clone, Default)]
pub struct TripleWriter<'a> {
    names: Option<&'a Indexer<String>>,
}

impl<'a> TripleWriter<'a> {
    /// Shorthand for default
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes vertex names instead of ids
    pub fn with_names(mut self, names: &'a Indexer<String>) -> Self {
        self.names = Some(names);
        self
    }

    fn vertex_token(&self, u: Node) -> Result<String> {
        match self.names {
            None => Ok(u.to_string()),
            Some(names) => names.key_of(u).cloned().ok_or_else(|| {
                io_error!(ErrorKind::InvalidInput, format!("vertex {u} has no name"))
            }),
        }
    }
}

impl<G> GraphWriter<G> for TripleWriter<'_>
where
    G: GraphEdgeList,
    G::EdgeType: TypeLabel,
{
    fn try_write_graph<W: Write>(&self, graph: &G, mut writer: W) -> Result<()> {
        for edge in graph.ordered_edges() {
            let from = self.vertex_token(edge.from())?;
            let to = self.vertex_token(edge.to())?;
            match edge.edge_type().and_then(TypeLabel::label) {
                Some(label) => writeln!(writer, "{from} {to} {label}")?,
                None => writeln!(writer, "{from} {to}")?,
            }
        }
        Ok(())
    }
}

/// Writes `graph` as triple stream of vertex ids, ordered by endpoints
pub fn write_triples<G, W>(graph: &G, writer: W) -> Result<()>
where
    G: GraphEdgeList,
    G::EdgeType: TypeLabel,
    W: Write,
{
    TripleWriter::new().try_write_graph(graph, writer)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn names_are_interned() {
        let input = "# a small example\n\nalice bob\n  bob carol  \nalice carol\n";
        let (graph, names): (UndirectedGraph, _) =
            TripleReader::new().try_read_named_graph(input.as_bytes()).unwrap();

        assert_eq!(graph.number_of_nodes(), 3);
        assert_eq!(graph.number_of_edges(), 3);
        assert_eq!(names.index_of("carol"), Some(2));
        assert!(graph.has_edge(2, 0));
    }

    #[test]
    fn errors_name_the_line() {
        let err = UndirectedGraph::try_read_triples("a b\n# c\nc\n".as_bytes()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
        assert!(err.to_string().starts_with("line 3:"));

        let err = TripleReader::new()
            .indexed(false)
            .try_read_triples("1 2\n3 x\n".as_bytes(), &mut Indexer::new())
            .unwrap_err();
        assert!(err.to_string().starts_with("line 2:"));
    }

    #[test]
    fn raw_ids_keep_sparse_vertices() {
        let graph: DirectedGraph = TripleReader::new()
            .indexed(false)
            .comment_identifier("%")
            .try_read_graph("% ids\n10 20\n20 5 ignored\n".as_bytes())
            .unwrap();

        assert_eq!(graph.vertices().sorted().collect_vec(), vec![5, 10, 20]);
        assert!(graph.has_edge(10, 20));
        assert!(!graph.has_edge(20, 10));
    }

    #[test]
    fn typed_streams_build_multigraphs() {
        let input = "a b knows\nb a likes\na b likes\n";
        let graph = DirectedMultigraph::<String>::try_read_triples(input.as_bytes()).unwrap();
        assert_eq!(graph.number_of_edges(), 3);
        assert_eq!(graph.number_of_edge_types(), 2);
        assert_eq!(graph.number_of_edges_of_type(&"likes".to_string()), 2);

        let err = DirectedMultigraph::<String>::try_read_triples("a b\n".as_bytes()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn written_streams_read_back() {
        let mut names = Indexer::new();
        let triples = TripleReader::new()
            .typed(true)
            .try_read_triples("x y t\ny z s\n".as_bytes(), &mut names)
            .unwrap();
        let graph = DirectedMultigraph::<String>::try_from_triples(triples).unwrap();

        let mut buffer = Vec::new();
        TripleWriter::new()
            .with_names(&names)
            .try_write_graph(&graph, &mut buffer)
            .unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "x y t\ny z s\n");

        let plain = DirectedGraph::from_pairs([(3, 1), (0, 2)]).unwrap();
        let mut buffer = Vec::new();
        write_triples(&plain, &mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "0 2\n3 1\n");
    }
}
