/*!
# Graph Operations

Traits shared by all graph representations, views and snapshots.
Algorithms are written against these traits only, so every algorithm runs unchanged on an
owned graph, on a live [`Subgraph`](crate::repr::Subgraph) view or on a
[`CompactGraph`](crate::repr::CompactGraph) snapshot.

Vertex ids may be sparse. Unless stated otherwise, queries on a vertex that is not part of the
graph behave as if the vertex was isolated (empty neighborhoods, degree `0`, no edges).
*/

use std::{fmt::Debug, hash::Hash};

use itertools::Itertools;

use crate::{edge::*, error::*, node::*};

/// Value of a graph's structural modification counter
pub type ModificationCount = u64;

/// Provides static information about a graph
pub trait GraphType {
    /// Returns *true* if edges have an orientation
    fn is_directed(&self) -> bool;

    /// Returns *true* if edges have no orientation
    fn is_undirected(&self) -> bool {
        !self.is_directed()
    }

    /// Returns *true* if every edge carries a type label (i.e. the graph is a multigraph)
    fn is_typed(&self) -> bool {
        false
    }
}

/// Provides getters pertaining to the node-size of a graph
pub trait GraphNodeOrder {
    /// Returns the number of vertices of the graph
    fn number_of_nodes(&self) -> NumNodes;

    /// Return the number of vertices as usize
    fn len(&self) -> usize {
        self.number_of_nodes() as usize
    }

    /// Returns *true* if the graph has no vertices (and thus no edges)
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns an iterator over all vertices in increasing order
    fn vertices(&self) -> impl Iterator<Item = Node> + '_;

    /// Returns *true* if `u` is a vertex of the graph
    fn has_vertex(&self, u: Node) -> bool;

    /// Returns the largest vertex id or `None` if the graph is empty
    fn max_vertex(&self) -> Option<Node> {
        self.vertices().last()
    }
}

/// Provides getters pertaining to the edge-size of a graph
pub trait GraphEdgeOrder {
    /// Returns the number of edges of the graph
    fn number_of_edges(&self) -> NumEdges;

    /// Returns *true* if the graph has no edges
    fn is_singleton(&self) -> bool {
        self.number_of_edges() == 0
    }
}

macro_rules! node_iterator {
    ($iter : ident, $single : ident, $type : ty) => {
        fn $iter(&self) -> impl Iterator<Item = $type> + '_ {
            self.vertices().map(|u| self.$single(u))
        }
    };
}

/// Traits pertaining getters for neighborhoods
pub trait AdjacencyList: GraphNodeOrder + Sized {
    /// Returns an iterator over all vertices sharing an edge with `u` in increasing order.
    /// For directed graphs this is the union of predecessors and successors.
    /// `u` itself is included iff it has a self-loop.
    fn neighbors_of(&self, u: Node) -> impl Iterator<Item = Node> + '_;

    /// Returns an iterator over the closed neighborhood of a given vertex.
    fn closed_neighbors_of(&self, u: Node) -> impl Iterator<Item = Node> + '_ {
        std::iter::once(u).chain(self.neighbors_of(u).filter(move |&v| v != u))
    }

    /// Returns the number of distinct neighbors of `u`
    fn degree_of(&self, u: Node) -> NumNodes {
        self.neighbors_of(u).count() as NumNodes
    }

    /// Returns *true* if an edge between `u` and `v` exists in any orientation
    fn are_adjacent(&self, u: Node, v: Node) -> bool {
        self.neighbors_of(u).any(|w| w == v)
    }

    /// Returns an iterator to all vertices with non-zero degree
    fn vertices_with_neighbors(&self) -> impl Iterator<Item = Node> + '_ {
        self.vertices().filter(|&u| self.degree_of(u) > 0)
    }

    /// Returns a distribution sorted by degree
    fn degree_distribution(&self) -> Vec<(NumNodes, NumNodes)> {
        let mut distr = self
            .degrees()
            .counts()
            .into_iter()
            .map(|(d, n)| (d, n as NumNodes))
            .collect_vec();
        distr.sort_by_key(|(d, _)| *d);
        distr
    }

    /// Returns the maximum degree in the graph
    fn max_degree(&self) -> NumNodes {
        self.degrees().max().unwrap_or(0)
    }

    node_iterator!(degrees, degree_of, NumNodes);
}

/// Direction-aware neighborhoods of directed graphs
pub trait DirectedAdjacencyList: AdjacencyList {
    /// Returns an iterator over all `v` with an edge `(u, v)` in increasing order
    fn out_neighbors_of(&self, u: Node) -> impl Iterator<Item = Node> + '_;

    /// Returns an iterator over all `v` with an edge `(v, u)` in increasing order
    fn in_neighbors_of(&self, u: Node) -> impl Iterator<Item = Node> + '_;

    /// Returns the number of successors of `u`
    fn out_degree_of(&self, u: Node) -> NumNodes {
        self.out_neighbors_of(u).count() as NumNodes
    }

    /// Returns the number of predecessors of `u`
    fn in_degree_of(&self, u: Node) -> NumNodes {
        self.in_neighbors_of(u).count() as NumNodes
    }

    /// Returns the out-degree and in-degree of a given vertex
    #[inline]
    fn total_degree_of(&self, u: Node) -> NumNodes {
        self.out_degree_of(u) + self.in_degree_of(u)
    }

    /// Returns the maximum out-degree in the graph
    fn max_out_degree(&self) -> NumNodes {
        self.out_degrees().max().unwrap_or(0)
    }

    /// Returns the maximum in-degree in the graph
    fn max_in_degree(&self) -> NumNodes {
        self.in_degrees().max().unwrap_or(0)
    }

    node_iterator!(out_degrees, out_degree_of, NumNodes);
    node_iterator!(in_degrees, in_degree_of, NumNodes);
}

/// Trait to test existence of certain structures in a graph.
pub trait AdjacencyTest: GraphNodeOrder {
    /// Returns *true* if the edge (u,v) exists in the graph.
    /// For undirected graphs the orientation is irrelevant.
    fn has_edge(&self, u: Node, v: Node) -> bool;

    /// Returns *true* if a self-loop (u,u) exists.
    fn has_self_loop(&self, u: Node) -> bool {
        self.has_edge(u, u)
    }

    /// Returns *true* if there exists an edge (u,v) as well as (v,u) in the graph.
    /// Note that for undirected graphs with edge {u,v} this function always returns *true*.
    fn has_bidirected_edge(&self, u: Node, v: Node) -> bool {
        self.has_edge(u, v) && self.has_edge(v, u)
    }
}

/// Access to the edge values stored in a graph
pub trait GraphEdgeList: GraphType + GraphNodeOrder {
    /// Type label carried by the edges; `()` for untyped graphs
    type EdgeType: Clone + Eq + Hash + Debug;

    /// Returns an iterator over all edges; every edge is visited exactly once
    fn edges(&self) -> impl Iterator<Item = GraphEdge<Self::EdgeType>> + '_;

    /// Returns an iterator over all edges incident to `u` (self-loops once)
    fn edges_of(&self, u: Node) -> impl Iterator<Item = GraphEdge<Self::EdgeType>> + '_;

    /// Returns an iterator over all edges connecting `u` and `v` in either orientation
    fn edges_between(&self, u: Node, v: Node) -> impl Iterator<Item = GraphEdge<Self::EdgeType>> + '_;

    /// Returns *true* if an edge equal to `edge` is stored in the graph
    fn contains_edge(&self, edge: &GraphEdge<Self::EdgeType>) -> bool {
        self.edges_between(edge.from(), edge.to())
            .any(|e| e == *edge)
    }

    /// Returns the first edge connecting `u` and `v` if one exists
    fn get_edge(&self, u: Node, v: Node) -> Option<GraphEdge<Self::EdgeType>> {
        self.edges_between(u, v).next()
    }

    /// Returns an iterator over all edges leaving `u`.
    /// For undirected graphs this equals [`GraphEdgeList::edges_of`].
    fn out_edges_of(&self, u: Node) -> impl Iterator<Item = GraphEdge<Self::EdgeType>> + '_ {
        self.edges_of(u)
            .filter(move |e| !e.is_directed() || e.from() == u)
    }

    /// Returns an iterator over all edges entering `u`.
    /// For undirected graphs this equals [`GraphEdgeList::edges_of`].
    fn in_edges_of(&self, u: Node) -> impl Iterator<Item = GraphEdge<Self::EdgeType>> + '_ {
        self.edges_of(u)
            .filter(move |e| !e.is_directed() || e.to() == u)
    }

    /// Returns all edges sorted by their endpoints
    fn ordered_edges(&self) -> Vec<GraphEdge<Self::EdgeType>> {
        let mut edges = self.edges().collect_vec();
        edges.sort_by_key(|e| e.key());
        edges
    }
}

/// Exposes the structural modification counter.
pub trait GraphVersion {
    /// Returns the current value of the counter.
    ///
    /// It increases whenever the vertex set changes (insertions, removals, clearing); adding
    /// or removing edges between existing vertices leaves it untouched. Immutable graphs
    /// always report `0`.
    fn modification_count(&self) -> ModificationCount;
}

/// Provides functions to insert/delete vertices
pub trait GraphVertexEditing {
    /// Adds `u` as an isolated vertex.
    /// Returns *true* exactly if the vertex was not present previously.
    fn add_vertex(&mut self, u: Node) -> GraphResult<bool>;

    /// Adds a fresh vertex and returns it. The id is one above the largest id the graph ever
    /// contained (`0` for graphs that never had a vertex), so ids freed by earlier removals
    /// are never reused; this includes the id of a removed maximum.
    fn add_new_vertex(&mut self) -> GraphResult<Node>;

    /// Removes `u` and all incident edges.
    /// Returns *true* exactly if the vertex was present.
    fn remove_vertex(&mut self, u: Node) -> bool;

    /// Adds all vertices and returns the number of new ones
    fn add_vertices(&mut self, vertices: impl IntoIterator<Item = Node>) -> GraphResult<NumNodes> {
        let mut added = 0;
        for u in vertices {
            added += self.add_vertex(u)? as NumNodes;
        }
        Ok(added)
    }

    /// Removes all vertices and returns the number of removed ones
    fn remove_vertices(&mut self, vertices: impl IntoIterator<Item = Node>) -> NumNodes {
        vertices
            .into_iter()
            .filter(|&u| self.remove_vertex(u))
            .count() as NumNodes
    }

    /// Removes all vertices and edges
    fn clear(&mut self);
}

/// Provides functions to insert/delete edges
pub trait GraphEdgeEditing: GraphEdgeList {
    /// Adds `edge` and implicitly both of its endpoints.
    /// Returns *true* exactly if the edge was not present previously.
    ///
    /// Fails if the edge's capabilities do not fit the graph (e.g. a directed edge in an
    /// undirected graph) or an endpoint is [`INVALID_NODE`].
    fn try_add_edge(&mut self, edge: GraphEdge<Self::EdgeType>) -> GraphResult<bool>;

    /// Removes `edge` from the graph.
    /// Returns *true* exactly if the edge was present.
    fn remove_edge(&mut self, edge: &GraphEdge<Self::EdgeType>) -> bool;

    /// Adds all edges in the collection and returns the number of new ones
    fn add_edges(
        &mut self,
        edges: impl IntoIterator<Item = GraphEdge<Self::EdgeType>>,
    ) -> GraphResult<NumEdges> {
        let mut added = 0;
        for edge in edges {
            added += self.try_add_edge(edge)? as NumEdges;
        }
        Ok(added)
    }

    /// Removes all edges in the collection and returns the number of removed ones
    fn remove_edges<'a>(
        &mut self,
        edges: impl IntoIterator<Item = &'a GraphEdge<Self::EdgeType>>,
    ) -> NumEdges
    where
        Self::EdgeType: 'a,
    {
        edges.into_iter().filter(|e| self.remove_edge(e)).count() as NumEdges
    }
}

/// Trait for creating a graph from a collection of edges
pub trait GraphFromScratch: GraphEdgeEditing + Default {
    /// Create a graph containing exactly the endpoints of `edges` and the edges themselves
    fn from_edges(edges: impl IntoIterator<Item = GraphEdge<Self::EdgeType>>) -> GraphResult<Self> {
        let mut graph = Self::default();
        graph.add_edges(edges)?;
        Ok(graph)
    }
}

impl<G: GraphEdgeEditing + Default> GraphFromScratch for G {}
