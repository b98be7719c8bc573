/*!
# Sparse Graphs

[`SparseGraph`] maps every vertex id to the [`EdgeSet`] of its incident edges. Vertex ids can be
arbitrary (sparse) and vertices iterate in increasing order. The edge-set implementation decides
which edges the graph accepts:

| Alias                      | Edge set                             | Accepted edges           |
|----------------------------|--------------------------------------|--------------------------|
| [`UndirectedGraph`]        | [`SparseUndirectedEdgeSet`]          | `Plain`                  |
| [`DirectedGraph`]          | [`SparseDirectedEdgeSet`]            | `Directed`               |
| [`GenericGraph<T>`]        | [`GenericEdgeSet<T, false>`]         | any undirected edge      |
| [`GenericDirectedGraph<T>`]| [`GenericEdgeSet<T, true>`]          | any directed edge        |

Every graph keeps a modification counter that grows on each change of the vertex set; views
and enumerations compare it to detect structural changes. Fresh ids handed out by
[`GraphVertexEditing::add_new_vertex`] lie above every id the graph ever contained, so a
removed vertex is never confused with a later one.
*/

use std::collections::{BTreeMap, btree_map::Entry};

use log::trace;

use super::*;
use crate::{edge::*, error::*, node::*, ops::*, testing::test_graph_ops};

/// A sparse graph storing one [`EdgeSet`] per vertex
#[derive(Clone, Debug)]
pub struct SparseGraph<S> {
    edge_sets: BTreeMap<Node, S>,
    num_edges: NumEdges,
    modifications: ModificationCount,
    /// Smallest id above every vertex ever added; never decreases
    fresh_vertex: Node,
}

/// Undirected graph without edge labels
pub type UndirectedGraph = SparseGraph<SparseUndirectedEdgeSet>;

/// Directed graph without edge labels
pub type DirectedGraph = SparseGraph<SparseDirectedEdgeSet>;

/// Undirected graph accepting arbitrary (typed, weighted) edges
pub type GenericGraph<T = ()> = SparseGraph<GenericEdgeSet<T, false>>;

/// Directed graph accepting arbitrary (typed, weighted) edges
pub type GenericDirectedGraph<T = ()> = SparseGraph<GenericEdgeSet<T, true>>;

/// Directed graph over interned type indices; the adjacency index of multigraphs
pub type TypedIndexGraph = SparseGraph<SparseDirectedTypedEdgeSet>;

impl<S> Default for SparseGraph<S> {
    fn default() -> Self {
        Self {
            edge_sets: BTreeMap::new(),
            num_edges: 0,
            modifications: 0,
            fresh_vertex: 0,
        }
    }
}

/// Returns *true* if `edge` is reported while iterating the edge set of `root`.
///
/// Directed edges are reported by their source, undirected edges by their smaller endpoint;
/// this way every edge is visited exactly once by [`GraphEdgeList::edges`].
#[inline]
pub(crate) fn is_reported_by<T>(root: Node, edge: &GraphEdge<T>) -> bool {
    if edge.is_directed() {
        edge.from() == root
    } else {
        edge.key().0 == root
    }
}

impl<S: EdgeSet> SparseGraph<S> {
    /// Creates an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a graph with the given isolated vertices
    pub fn with_vertices(vertices: impl IntoIterator<Item = Node>) -> GraphResult<Self> {
        let mut graph = Self::new();
        graph.add_vertices(vertices)?;
        Ok(graph)
    }

    /// Returns the edge set of `u` if `u` is a vertex
    pub fn edge_set(&self, u: Node) -> Option<&S> {
        self.edge_sets.get(&u)
    }
}

impl UndirectedGraph {
    /// Adds the undirected edge `{u, v}`
    pub fn add_edge(&mut self, u: Node, v: Node) -> GraphResult<bool> {
        self.try_add_edge(GraphEdge::plain(u, v))
    }

    /// Creates a graph from a list of undirected vertex pairs
    pub fn from_pairs<E: Into<Edge>>(pairs: impl IntoIterator<Item = E>) -> GraphResult<Self> {
        Self::from_edges(pairs.into_iter().map(|e| GraphEdge::Plain(e.into())))
    }
}

impl DirectedGraph {
    /// Adds the directed edge `u -> v`
    pub fn add_edge(&mut self, u: Node, v: Node) -> GraphResult<bool> {
        self.try_add_edge(GraphEdge::directed(u, v))
    }

    /// Creates a graph from a list of directed vertex pairs
    pub fn from_pairs<E: Into<Edge>>(pairs: impl IntoIterator<Item = E>) -> GraphResult<Self> {
        Self::from_edges(pairs.into_iter().map(|e| GraphEdge::Directed(e.into())))
    }
}

impl<S: EdgeSet> GraphType for SparseGraph<S> {
    fn is_directed(&self) -> bool {
        S::DIRECTED
    }

    fn is_typed(&self) -> bool {
        S::TYPED
    }
}

impl<S: EdgeSet> GraphNodeOrder for SparseGraph<S> {
    fn number_of_nodes(&self) -> NumNodes {
        self.edge_sets.len() as NumNodes
    }

    fn vertices(&self) -> impl Iterator<Item = Node> + '_ {
        self.edge_sets.keys().copied()
    }

    fn has_vertex(&self, u: Node) -> bool {
        self.edge_sets.contains_key(&u)
    }

    fn max_vertex(&self) -> Option<Node> {
        self.edge_sets.keys().next_back().copied()
    }
}

impl<S: EdgeSet> GraphEdgeOrder for SparseGraph<S> {
    fn number_of_edges(&self) -> NumEdges {
        self.num_edges
    }
}

impl<S: EdgeSet> AdjacencyList for SparseGraph<S> {
    fn neighbors_of(&self, u: Node) -> impl Iterator<Item = Node> + '_ {
        self.edge_sets
            .get(&u)
            .into_iter()
            .flat_map(|set| set.connected())
    }

    fn degree_of(&self, u: Node) -> NumNodes {
        self.edge_sets.get(&u).map_or(0, |set| set.degree())
    }

    fn are_adjacent(&self, u: Node, v: Node) -> bool {
        self.edge_sets.get(&u).is_some_and(|set| set.connects(v))
    }
}

impl<S: EdgeSet> DirectedAdjacencyList for SparseGraph<S> {
    fn out_neighbors_of(&self, u: Node) -> impl Iterator<Item = Node> + '_ {
        self.edge_sets
            .get(&u)
            .into_iter()
            .flat_map(|set| set.successors())
    }

    fn in_neighbors_of(&self, u: Node) -> impl Iterator<Item = Node> + '_ {
        self.edge_sets
            .get(&u)
            .into_iter()
            .flat_map(|set| set.predecessors())
    }

    fn out_degree_of(&self, u: Node) -> NumNodes {
        self.edge_sets.get(&u).map_or(0, |set| set.out_degree())
    }

    fn in_degree_of(&self, u: Node) -> NumNodes {
        self.edge_sets.get(&u).map_or(0, |set| set.in_degree())
    }
}

impl<S: EdgeSet> AdjacencyTest for SparseGraph<S> {
    fn has_edge(&self, u: Node, v: Node) -> bool {
        self.edge_sets
            .get(&u)
            .is_some_and(|set| set.has_successor(v))
    }
}

impl<S: EdgeSet> GraphEdgeList for SparseGraph<S> {
    type EdgeType = S::EdgeType;

    fn edges(&self) -> impl Iterator<Item = GraphEdge<S::EdgeType>> + '_ {
        self.edge_sets.iter().flat_map(|(&root, set)| {
            set.edges()
                .filter(move |edge| is_reported_by(root, edge))
        })
    }

    fn edges_of(&self, u: Node) -> impl Iterator<Item = GraphEdge<S::EdgeType>> + '_ {
        self.edge_sets
            .get(&u)
            .into_iter()
            .flat_map(|set| set.edges())
    }

    fn edges_between(&self, u: Node, v: Node) -> impl Iterator<Item = GraphEdge<S::EdgeType>> + '_ {
        self.edge_sets
            .get(&u)
            .into_iter()
            .flat_map(move |set| set.edges_to(v))
    }

    fn contains_edge(&self, edge: &GraphEdge<S::EdgeType>) -> bool {
        self.edge_sets
            .get(&edge.from())
            .is_some_and(|set| set.contains(edge))
    }
}

impl<S: EdgeSet> GraphVersion for SparseGraph<S> {
    fn modification_count(&self) -> ModificationCount {
        self.modifications
    }
}

impl<S: EdgeSet> GraphVertexEditing for SparseGraph<S> {
    fn add_vertex(&mut self, u: Node) -> GraphResult<bool> {
        if !is_valid_node(u) {
            return Err(GraphError::InvalidVertex(u));
        }

        match self.edge_sets.entry(u) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(entry) => {
                entry.insert(S::new(u));
                self.modifications += 1;
                self.fresh_vertex = self.fresh_vertex.max(u + 1);
                Ok(true)
            }
        }
    }

    fn add_new_vertex(&mut self) -> GraphResult<Node> {
        let u = self.fresh_vertex;
        if !is_valid_node(u) {
            return Err(GraphError::VertexSpaceExhausted);
        }
        self.add_vertex(u)?;
        Ok(u)
    }

    fn remove_vertex(&mut self, u: Node) -> bool {
        let Some(set) = self.edge_sets.remove(&u) else {
            return false;
        };

        // the removed set knows all incident edges, so only its neighbors need to be touched
        self.num_edges -= set.len() as NumEdges;
        for v in set.connected() {
            if v == u {
                continue;
            }
            if let Some(other) = self.edge_sets.get_mut(&v) {
                other.disconnect(u);
            }
        }

        self.modifications += 1;
        trace!("removed vertex {u} with {} incident edges", set.len());
        true
    }

    fn clear(&mut self) {
        self.edge_sets.clear();
        self.num_edges = 0;
        self.modifications += 1;
    }
}

impl<S: EdgeSet> GraphEdgeEditing for SparseGraph<S> {
    fn try_add_edge(&mut self, edge: GraphEdge<S::EdgeType>) -> GraphResult<bool> {
        if !S::supports(&edge) {
            return Err(GraphError::UnsupportedEdge(edge.to_string()));
        }

        let Edge(u, v) = edge.endpoints();
        self.add_vertex(u)?;
        self.add_vertex(v)?;

        let added = self
            .edge_sets
            .get_mut(&u)
            .is_some_and(|set| set.add(&edge));
        if added {
            if u != v {
                if let Some(set) = self.edge_sets.get_mut(&v) {
                    set.add(&edge);
                }
            }
            self.num_edges += 1;
        }
        Ok(added)
    }

    fn remove_edge(&mut self, edge: &GraphEdge<S::EdgeType>) -> bool {
        let Edge(u, v) = edge.endpoints();
        let removed = self
            .edge_sets
            .get_mut(&u)
            .is_some_and(|set| set.remove(edge));
        if removed {
            if u != v {
                if let Some(set) = self.edge_sets.get_mut(&v) {
                    set.remove(edge);
                }
            }
            self.num_edges -= 1;
        }
        removed
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn sparse_ids_and_counts() {
        let mut graph = UndirectedGraph::new();
        assert!(graph.add_edge(10, 4000).unwrap());
        assert!(graph.add_edge(4000, 10).is_ok_and(|added| !added));
        assert!(graph.add_edge(7, 7).unwrap());
        assert!(graph.add_vertex(3).unwrap());

        assert_eq!(graph.vertices().collect_vec(), vec![3, 7, 10, 4000]);
        assert_eq!(graph.number_of_edges(), 2);
        assert_eq!(graph.edges().count(), 2);
        assert_eq!(graph.neighbors_of(7).collect_vec(), vec![7]);
        assert!(graph.has_edge(4000, 10));
        assert!(graph.has_self_loop(7));
        assert_eq!(graph.add_new_vertex(), Ok(4001));
    }

    #[test]
    fn rejects_mismatching_edges() {
        let mut graph = UndirectedGraph::new();
        assert!(matches!(
            graph.try_add_edge(GraphEdge::directed(0, 1)),
            Err(GraphError::UnsupportedEdge(_))
        ));
        assert_eq!(
            graph.add_edge(0, INVALID_NODE),
            Err(GraphError::InvalidVertex(INVALID_NODE))
        );
        assert_eq!(graph.number_of_edges(), 0);

        let mut generic: GenericGraph<&str> = GenericGraph::new();
        assert!(generic.try_add_edge(GraphEdge::typed(0, 1, "x")).unwrap());
        assert!(generic.try_add_edge(GraphEdge::typed(1, 0, "y")).unwrap());
        assert!(!generic.try_add_edge(GraphEdge::typed(1, 0, "x")).unwrap());
        assert!(generic.try_add_edge(GraphEdge::directed(0, 1)).is_err());
        assert_eq!(generic.number_of_edges(), 2);
        assert_eq!(generic.edges_between(1, 0).count(), 2);
    }

    #[test]
    fn directed_edges_keep_orientation() {
        let mut graph = DirectedGraph::from_pairs([(0, 1), (1, 2), (2, 0), (2, 1)]).unwrap();
        assert_eq!(graph.number_of_edges(), 4);
        assert!(graph.has_edge(0, 1));
        assert!(!graph.has_edge(1, 0));
        assert!(graph.has_bidirected_edge(1, 2));
        assert_eq!(graph.out_neighbors_of(2).collect_vec(), vec![0, 1]);
        assert_eq!(graph.in_neighbors_of(1).collect_vec(), vec![0, 2]);
        assert_eq!(graph.neighbors_of(1).collect_vec(), vec![0, 2]);

        assert!(graph.remove_edge(&GraphEdge::directed(2, 1)));
        assert!(!graph.remove_edge(&GraphEdge::directed(2, 1)));
        assert_eq!(graph.number_of_edges(), 3);
        assert!(graph.has_edge(1, 2));
    }

    #[test]
    fn vertex_removal_drops_incident_edges() {
        let mut graph = UndirectedGraph::from_pairs([(0, 1), (0, 2), (1, 2), (2, 3), (3, 3)]).unwrap();
        let before = graph.modification_count();

        assert!(graph.remove_vertex(2));
        assert!(!graph.remove_vertex(2));
        assert_eq!(graph.number_of_nodes(), 3);
        assert_eq!(graph.number_of_edges(), 2);
        assert_eq!(graph.neighbors_of(3).collect_vec(), vec![3]);
        assert!(graph.modification_count() > before);

        let version = graph.modification_count();
        graph.add_edge(0, 3).unwrap();
        assert_eq!(graph.modification_count(), version);

        assert!(graph.remove_vertex(3));
        assert_eq!(graph.add_new_vertex(), Ok(4));

        graph.clear();
        assert!(graph.is_empty());
        assert_eq!(graph.number_of_edges(), 0);
        assert_eq!(graph.add_new_vertex(), Ok(5));
    }
}

test_graph_ops!(
    test_undirected_graph,
    UndirectedGraph,
    |u, v, _| GraphEdge::plain(u, v),
    (EdgeCounts, EdgeRoundTrip, VertexRemoval, SubgraphConsistency)
);

test_graph_ops!(
    test_directed_graph,
    DirectedGraph,
    |u, v, _| GraphEdge::directed(u, v),
    (EdgeCounts, EdgeRoundTrip, VertexRemoval, SubgraphConsistency)
);

test_graph_ops!(
    test_generic_graph,
    GenericGraph<u8>,
    GraphEdge::typed,
    (EdgeCounts, EdgeRoundTrip, VertexRemoval, SubgraphConsistency)
);

test_graph_ops!(
    test_generic_directed_graph,
    GenericDirectedGraph<u8>,
    GraphEdge::directed_typed,
    (EdgeCounts, EdgeRoundTrip, VertexRemoval)
);
