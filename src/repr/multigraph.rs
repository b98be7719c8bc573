/*!
# Directed Multigraphs

A [`DirectedMultigraph`] stores directed edges labelled with an edge type `T`; two vertices may
be connected by several edges as long as their types differ.

Internally the graph keeps
- a [`TypeInterner`] translating labels into dense indices,
- an adjacency index over all types (one [`SparseDirectedTypedEdgeSet`] per vertex) answering
  neighborhood and edge queries,
- one plain [`DirectedGraph`] per edge type that exists for as long as the type has edges.

Removing a vertex or the last edge of a type notifies all views created on the graph.
*/

use std::{collections::BTreeMap, fmt::Debug, hash::Hash};

use fxhash::FxHashSet;
use log::debug;

use super::*;
use crate::{edge::*, error::*, node::*, ops::*, testing::test_graph_ops};

/// Directed graph with typed parallel edges
#[derive(Clone, Debug)]
pub struct DirectedMultigraph<T> {
    types: TypeInterner<T>,
    adjacency: TypedIndexGraph,
    type_graphs: BTreeMap<TypeIndex, DirectedGraph>,
    views: ViewRegistry<T>,
}

impl<T> Default for DirectedMultigraph<T> {
    fn default() -> Self {
        Self {
            types: TypeInterner::default(),
            adjacency: TypedIndexGraph::default(),
            type_graphs: BTreeMap::new(),
            views: ViewRegistry::default(),
        }
    }
}

impl<T> DirectedMultigraph<T>
where
    T: Clone + Eq + Hash + Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the edge `u -> v` of type `t`
    pub fn add_edge(&mut self, u: Node, v: Node, t: T) -> GraphResult<bool> {
        self.try_add_edge(GraphEdge::directed_typed(u, v, t))
    }

    /// Returns all edge types with at least one edge, in order of first appearance
    pub fn edge_types(&self) -> impl Iterator<Item = &T> + '_ {
        self.type_graphs
            .keys()
            .filter_map(|&index| self.types.resolve(index))
    }

    pub fn number_of_edge_types(&self) -> usize {
        self.type_graphs.len()
    }

    pub fn contains_edge_type(&self, t: &T) -> bool {
        self.type_index(t).is_some()
    }

    /// Returns the graph formed by all edges of type `t`
    pub fn type_graph(&self, t: &T) -> Option<&DirectedGraph> {
        self.type_index(t)
            .and_then(|index| self.type_graphs.get(&index))
    }

    pub fn number_of_edges_of_type(&self, t: &T) -> NumEdges {
        self.type_graph(t).map_or(0, |graph| graph.number_of_edges())
    }

    /// Returns all edges of type `t`
    pub fn edges_of_type(&self, t: &T) -> impl Iterator<Item = GraphEdge<T>> + '_ {
        self.type_index(t)
            .into_iter()
            .filter_map(|index| Some((self.types.resolve(index)?, self.type_graphs.get(&index)?)))
            .flat_map(|(t, graph)| {
                graph
                    .edges()
                    .map(move |e| GraphEdge::directed_typed(e.from(), e.to(), t.clone()))
            })
    }

    /// Returns the types of all edges `u -> v`
    pub fn edge_types_between(&self, u: Node, v: Node) -> impl Iterator<Item = &T> + '_ {
        self.adjacency
            .edge_set(u)
            .into_iter()
            .flat_map(move |set| set.types_to(v))
            .filter_map(|index| self.types.resolve(index))
    }

    /// Removes every edge of type `t` and returns their number
    pub fn remove_edge_type(&mut self, t: &T) -> NumEdges {
        let Some(index) = self.type_index(t) else {
            return 0;
        };
        let Some(graph) = self.type_graphs.get(&index) else {
            return 0;
        };

        let edges: Vec<Edge> = graph.edges().map(|e| e.endpoints()).collect();
        for &Edge(u, v) in &edges {
            self.adjacency
                .remove_edge(&GraphEdge::DirectedTyped(Edge(u, v), index));
        }
        self.drop_type(index);
        edges.len() as NumEdges
    }

    /// Creates a view of `vertices` in which only edges of the given types are visible.
    ///
    /// Fails with [`GraphError::EmptyTypeSet`] if no type is given and with
    /// [`GraphError::UnknownEdgeType`] if a type has no edges in this graph.
    pub fn subgraph_with_types(
        &self,
        vertices: impl IntoIterator<Item = Node>,
        types: impl IntoIterator<Item = T>,
    ) -> GraphResult<SubgraphView<T>> {
        let types: FxHashSet<T> = types.into_iter().collect();
        if types.is_empty() {
            return Err(GraphError::EmptyTypeSet);
        }
        if let Some(t) = types.iter().find(|t| !self.contains_edge_type(t)) {
            return Err(GraphError::UnknownEdgeType(format!("{t:?}")));
        }
        SubgraphView::new(self, vertices, Some(types))
    }

    /// Index of `t` if the type currently has edges
    fn type_index(&self, t: &T) -> Option<TypeIndex> {
        self.types
            .index_of(t)
            .filter(|index| self.type_graphs.contains_key(index))
    }

    fn resolve(&self, edge: GraphEdge<TypeIndex>) -> Option<GraphEdge<T>> {
        edge.try_map_type(|index| self.types.resolve(index).cloned())
    }

    fn drop_type(&mut self, index: TypeIndex) {
        if self.type_graphs.remove(&index).is_none() {
            return;
        }
        if let Some(t) = self.types.resolve(index).cloned() {
            debug!("edge type {t:?} has no edges left");
            self.views.broadcast(GraphEvent::TypeRemoved(t));
        }
    }
}

impl<T> GraphType for DirectedMultigraph<T> {
    fn is_directed(&self) -> bool {
        true
    }

    fn is_typed(&self) -> bool {
        true
    }
}

impl<T> GraphNodeOrder for DirectedMultigraph<T> {
    fn number_of_nodes(&self) -> NumNodes {
        self.adjacency.number_of_nodes()
    }

    fn vertices(&self) -> impl Iterator<Item = Node> + '_ {
        self.adjacency.vertices()
    }

    fn has_vertex(&self, u: Node) -> bool {
        self.adjacency.has_vertex(u)
    }

    fn max_vertex(&self) -> Option<Node> {
        self.adjacency.max_vertex()
    }
}

impl<T> GraphEdgeOrder for DirectedMultigraph<T> {
    fn number_of_edges(&self) -> NumEdges {
        self.adjacency.number_of_edges()
    }
}

impl<T> AdjacencyList for DirectedMultigraph<T> {
    fn neighbors_of(&self, u: Node) -> impl Iterator<Item = Node> + '_ {
        self.adjacency.neighbors_of(u)
    }

    fn degree_of(&self, u: Node) -> NumNodes {
        self.adjacency.degree_of(u)
    }

    fn are_adjacent(&self, u: Node, v: Node) -> bool {
        self.adjacency.are_adjacent(u, v)
    }
}

impl<T> DirectedAdjacencyList for DirectedMultigraph<T> {
    fn out_neighbors_of(&self, u: Node) -> impl Iterator<Item = Node> + '_ {
        self.adjacency.out_neighbors_of(u)
    }

    fn in_neighbors_of(&self, u: Node) -> impl Iterator<Item = Node> + '_ {
        self.adjacency.in_neighbors_of(u)
    }

    fn out_degree_of(&self, u: Node) -> NumNodes {
        self.adjacency.out_degree_of(u)
    }

    fn in_degree_of(&self, u: Node) -> NumNodes {
        self.adjacency.in_degree_of(u)
    }
}

impl<T> AdjacencyTest for DirectedMultigraph<T> {
    fn has_edge(&self, u: Node, v: Node) -> bool {
        self.adjacency.has_edge(u, v)
    }
}

impl<T> GraphVersion for DirectedMultigraph<T> {
    fn modification_count(&self) -> ModificationCount {
        self.adjacency.modification_count()
    }
}

impl<T> GraphEdgeList for DirectedMultigraph<T>
where
    T: Clone + Eq + Hash + Debug,
{
    type EdgeType = T;

    fn edges(&self) -> impl Iterator<Item = GraphEdge<T>> + '_ {
        self.adjacency.edges().filter_map(|e| self.resolve(e))
    }

    fn edges_of(&self, u: Node) -> impl Iterator<Item = GraphEdge<T>> + '_ {
        self.adjacency.edges_of(u).filter_map(|e| self.resolve(e))
    }

    fn edges_between(&self, u: Node, v: Node) -> impl Iterator<Item = GraphEdge<T>> + '_ {
        self.adjacency
            .edges_between(u, v)
            .filter_map(|e| self.resolve(e))
    }

    fn contains_edge(&self, edge: &GraphEdge<T>) -> bool {
        let (true, Some(t)) = (edge.is_directed(), edge.edge_type()) else {
            return false;
        };
        self.types.index_of(t).is_some_and(|index| {
            self.adjacency
                .contains_edge(&GraphEdge::DirectedTyped(edge.endpoints(), index))
        })
    }
}

impl<T> GraphVertexEditing for DirectedMultigraph<T>
where
    T: Clone + Eq + Hash + Debug,
{
    fn add_vertex(&mut self, u: Node) -> GraphResult<bool> {
        self.adjacency.add_vertex(u)
    }

    fn add_new_vertex(&mut self) -> GraphResult<Node> {
        self.adjacency.add_new_vertex()
    }

    fn remove_vertex(&mut self, u: Node) -> bool {
        if !self.adjacency.remove_vertex(u) {
            return false;
        }

        let mut emptied = Vec::new();
        for (&index, graph) in self.type_graphs.iter_mut() {
            if graph.remove_vertex(u) && graph.number_of_edges() == 0 {
                emptied.push(index);
            }
        }
        for index in emptied {
            self.drop_type(index);
        }

        self.views.broadcast(GraphEvent::VertexRemoved(u));
        true
    }

    fn clear(&mut self) {
        let removed = self.vertices().collect::<Vec<_>>();
        self.adjacency.clear();

        let types = self.type_graphs.keys().copied().collect::<Vec<_>>();
        for index in types {
            self.drop_type(index);
        }
        for u in removed {
            self.views.broadcast(GraphEvent::VertexRemoved(u));
        }
    }
}

impl<T> GraphEdgeEditing for DirectedMultigraph<T>
where
    T: Clone + Eq + Hash + Debug,
{
    /// Accepts only [`GraphEdge::DirectedTyped`] edges
    fn try_add_edge(&mut self, edge: GraphEdge<T>) -> GraphResult<bool> {
        let GraphEdge::DirectedTyped(Edge(u, v), t) = &edge else {
            return Err(GraphError::UnsupportedEdge(edge.to_string()));
        };

        let index = self.types.intern(t);
        if !self
            .adjacency
            .try_add_edge(GraphEdge::DirectedTyped(Edge(*u, *v), index))?
        {
            return Ok(false);
        }

        let graph = self.type_graphs.entry(index).or_insert_with(|| {
            debug!("created graph for edge type {t:?}");
            DirectedGraph::new()
        });
        graph.add_edge(*u, *v)?;
        Ok(true)
    }

    fn remove_edge(&mut self, edge: &GraphEdge<T>) -> bool {
        let (true, Some(t)) = (edge.is_directed(), edge.edge_type()) else {
            return false;
        };
        let Some(index) = self.type_index(t) else {
            return false;
        };

        let Edge(u, v) = edge.endpoints();
        if !self
            .adjacency
            .remove_edge(&GraphEdge::DirectedTyped(Edge(u, v), index))
        {
            return false;
        }

        let emptied = self.type_graphs.get_mut(&index).is_some_and(|graph| {
            graph.remove_edge(&GraphEdge::directed(u, v));
            graph.number_of_edges() == 0
        });
        if emptied {
            self.drop_type(index);
        }
        true
    }
}

impl<T> SubgraphBacking for DirectedMultigraph<T>
where
    T: Clone + Eq + Hash + Debug,
{
    fn subscribe(&self) -> Option<Subscription<T>> {
        Some(self.views.subscribe())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use itertools::Itertools;

    fn sample() -> DirectedMultigraph<&'static str> {
        let mut graph = DirectedMultigraph::new();
        for (u, v, t) in [
            (0, 1, "a"),
            (0, 1, "b"),
            (1, 2, "a"),
            (2, 0, "c"),
            (2, 2, "b"),
        ] {
            assert!(graph.add_edge(u, v, t).unwrap());
        }
        graph
    }

    #[test]
    fn parallel_edges_differ_in_type() {
        let mut graph = sample();
        assert!(!graph.add_edge(0, 1, "a").unwrap());
        assert_eq!(graph.number_of_edges(), 5);
        assert_eq!(graph.edges().count(), 5);
        assert_eq!(graph.number_of_edge_types(), 3);
        assert_eq!(graph.edge_types_between(0, 1).collect_vec(), vec![&"a", &"b"]);
        assert_eq!(graph.number_of_edges_of_type(&"a"), 2);
        assert_eq!(graph.edges_between(1, 0).count(), 2);
        assert!(graph.contains_edge(&GraphEdge::directed_typed(2, 2, "b")));
        assert!(!graph.contains_edge(&GraphEdge::directed_typed(1, 0, "a")));
        assert!(matches!(
            graph.try_add_edge(GraphEdge::directed(0, 2)),
            Err(GraphError::UnsupportedEdge(_))
        ));
    }

    #[test]
    fn types_disappear_with_their_last_edge() {
        let mut graph = sample();
        assert!(graph.remove_edge(&GraphEdge::directed_typed(2, 0, "c")));
        assert!(!graph.contains_edge_type(&"c"));
        assert_eq!(graph.number_of_edge_types(), 2);

        assert_eq!(graph.remove_edge_type(&"a"), 2);
        assert_eq!(graph.edge_types().collect_vec(), vec![&"b"]);
        assert_eq!(graph.number_of_edges(), 2);
        assert!(graph.has_edge(0, 1));
        assert!(!graph.has_edge(1, 2));

        assert!(graph.add_edge(1, 2, "c").unwrap());
        assert!(graph.contains_edge_type(&"c"));
    }

    #[test]
    fn vertex_removal_updates_type_graphs() {
        let mut graph = sample();
        assert!(graph.remove_vertex(2));
        assert_eq!(graph.number_of_edges(), 2);
        assert!(!graph.contains_edge_type(&"c"));
        assert_eq!(graph.number_of_edges_of_type(&"a"), 1);
        assert_eq!(graph.edges_of_type(&"b").collect_vec(), vec![
            GraphEdge::directed_typed(0, 1, "b")
        ]);
    }

    #[test]
    fn typed_views_follow_the_graph() {
        let mut graph = sample();
        assert_eq!(
            graph.subgraph_with_types([0, 1], Vec::<&str>::new()).unwrap_err(),
            GraphError::EmptyTypeSet
        );
        assert!(matches!(
            graph.subgraph_with_types([0, 1], ["z"]),
            Err(GraphError::UnknownEdgeType(_))
        ));

        let mut view = graph.subgraph_with_types([0, 1, 2], ["a", "c"]).unwrap();
        assert_eq!(view.bind(&graph).number_of_edges(), 3);

        graph.remove_edge(&GraphEdge::directed_typed(2, 0, "c"));
        let bound = view.bind(&graph);
        assert_eq!(bound.number_of_edges(), 2);
        assert!(!bound.view().accepts_type(Some(&"c")));

        graph.add_edge(2, 0, "c").unwrap();
        assert_eq!(view.bind(&graph).number_of_edges(), 2);

        graph.remove_vertex(1);
        let bound = view.bind(&graph);
        assert_eq!(bound.number_of_nodes(), 2);
        assert_eq!(bound.number_of_edges(), 0);
    }

    #[test]
    fn view_mutation_respects_types() {
        let mut graph = sample();
        let mut view = graph.subgraph_with_types([0, 1], ["a"]).unwrap();
        assert_eq!(
            view.add_edge(&mut graph, GraphEdge::directed_typed(1, 0, "b")),
            Err(GraphError::UnsupportedEdgeType("Some(\"b\")".into()))
        );
        assert!(view
            .add_edge(&mut graph, GraphEdge::directed_typed(1, 0, "a"))
            .unwrap());
        assert!(graph.contains_edge(&GraphEdge::directed_typed(1, 0, "a")));
    }

    #[test]
    fn clones_start_without_views() {
        let graph = sample();
        let _view = graph.subgraph([0, 1]).unwrap();
        let copy = graph.clone();
        assert_eq!(copy.number_of_edges(), graph.number_of_edges());
        assert_eq!(format!("{:?}", copy.views), "ViewRegistry { live_views: 0 }");
    }
}

test_graph_ops!(
    test_multigraph,
    DirectedMultigraph<u8>,
    GraphEdge::directed_typed,
    (EdgeCounts, EdgeRoundTrip, VertexRemoval, SubgraphConsistency)
);
