/*!
# Subgraph Views

A [`SubgraphView`] selects a vertex subset of a backing graph and renumbers it into a dense
local id space `0..k` (ids allocated later continue at `k`). The view does not borrow its
backing graph: it stores only the selection and is *bound* to the graph whenever it is read,
which lets views survive mutations of the backing graph.

Every access first synchronizes the view with the backing graph:
- multigraphs push [`GraphEvent`]s into a queue owned by each view; removed vertices leave the
  view and removed edge types leave its set of valid types,
- all graphs expose a modification counter; if it changed since the last synchronization, the
  view drops every selected vertex that no longer exists,
- vertices created through a nested view are adopted by all of its ancestors.

Edges are never stored in a view: a [`Subgraph`] (a bound view) derives them from the backing
graph, restricted to selected endpoints and valid edge types.

```
use sgraphs::prelude::*;

let mut graph = UndirectedGraph::from_pairs([(0, 1), (1, 2), (2, 3)]).unwrap();
let mut view = graph.subgraph([1, 2, 3]).unwrap();
assert_eq!(view.bind(&graph).number_of_edges(), 2);

graph.remove_vertex(2);
let bound = view.bind(&graph);
assert_eq!(bound.number_of_nodes(), 2);
assert_eq!(bound.number_of_edges(), 0);
```
*/

use std::{
    fmt,
    sync::{Arc, Mutex, PoisonError, Weak},
};

use bimap::BiBTreeMap;
use fxhash::FxHashSet;
use itertools::Itertools;
use log::trace;

use super::graph::is_reported_by;
use crate::{edge::*, error::*, node::*, ops::*};

/// Structural change of a backing graph that registered views must observe
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphEvent<T> {
    VertexRemoved(Node),
    TypeRemoved(T),
}

fn push_to<E>(queue: &Mutex<Vec<E>>, item: E) {
    queue
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(item);
}

fn drain<E>(queue: &Mutex<Vec<E>>) -> Vec<E> {
    std::mem::take(&mut *queue.lock().unwrap_or_else(PoisonError::into_inner))
}

/// Event queue of a single view.
/// The backing graph only holds a weak reference, so dropping the view unsubscribes it.
#[derive(Debug)]
pub struct Subscription<T>(Arc<Mutex<Vec<GraphEvent<T>>>>);

impl<T> Subscription<T> {
    fn drain(&self) -> Vec<GraphEvent<T>> {
        drain(&self.0)
    }
}

/// Registry of all live views of a graph that publishes [`GraphEvent`]s
pub struct ViewRegistry<T> {
    subscribers: Mutex<Vec<Weak<Mutex<Vec<GraphEvent<T>>>>>>,
}

impl<T> Default for ViewRegistry<T> {
    fn default() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }
}

/// Views are bound to one graph instance; a clone starts without subscribers
impl<T> Clone for ViewRegistry<T> {
    fn clone(&self) -> Self {
        Self::default()
    }
}

impl<T> fmt::Debug for ViewRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewRegistry")
            .field("live_views", &self.live_views())
            .finish()
    }
}

impl<T> ViewRegistry<T> {
    /// Registers a new view
    pub fn subscribe(&self) -> Subscription<T> {
        let queue = Arc::new(Mutex::new(Vec::new()));
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        // amortized cleanup of dropped views
        if subscribers.len() >= 16 && subscribers.len().is_power_of_two() {
            subscribers.retain(|queue| queue.strong_count() > 0);
        }
        subscribers.push(Arc::downgrade(&queue));
        Subscription(queue)
    }

    /// Delivers `event` to all live views and forgets dropped ones
    pub fn broadcast(&mut self, event: GraphEvent<T>)
    where
        T: Clone,
    {
        let subscribers = self
            .subscribers
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|queue| match queue.upgrade() {
            Some(queue) => {
                push_to(&queue, event.clone());
                true
            }
            None => false,
        });
    }

    /// Number of registered views that have not been dropped yet
    pub fn live_views(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|queue| queue.strong_count() > 0)
            .count()
    }
}

/// Graphs that views can be created on
pub trait SubgraphBacking: GraphEdgeList + GraphVersion + AdjacencyList + AdjacencyTest {
    /// Registers a view for [`GraphEvent`]s.
    /// Graphs without events return `None`; their views rely on the modification counter.
    fn subscribe(&self) -> Option<Subscription<Self::EdgeType>> {
        None
    }

    /// Creates a view of `vertices` valid for all edge types.
    /// Local ids are assigned in increasing order of the backing ids.
    ///
    /// Fails with [`GraphError::UnknownVertex`] if any vertex is not part of the graph.
    fn subgraph(
        &self,
        vertices: impl IntoIterator<Item = Node>,
    ) -> GraphResult<SubgraphView<Self::EdgeType>> {
        SubgraphView::new(self, vertices, None)
    }
}

/// Detached selection of a vertex subset of some backing graph.
/// See the [module documentation](self) for its life cycle.
#[derive(Debug)]
pub struct SubgraphView<T = ()> {
    /// local id <-> backing id
    mapping: BiBTreeMap<Node, Node>,
    next_local: Node,
    valid_types: Option<FxHashSet<T>>,
    last_modification: ModificationCount,
    events: Option<Subscription<T>>,
    adopted: Arc<Mutex<Vec<Node>>>,
    ancestors: Vec<Weak<Mutex<Vec<Node>>>>,
}

impl<T> SubgraphView<T>
where
    T: Clone + Eq + std::hash::Hash + fmt::Debug,
{
    pub(crate) fn new<G>(
        graph: &G,
        vertices: impl IntoIterator<Item = Node>,
        valid_types: Option<FxHashSet<T>>,
    ) -> GraphResult<Self>
    where
        G: SubgraphBacking<EdgeType = T> + ?Sized,
    {
        let vertices = vertices.into_iter().collect_vec();
        if let Some(&u) = vertices.iter().find(|&&u| !graph.has_vertex(u)) {
            return Err(GraphError::UnknownVertex(u));
        }
        Ok(Self::new_unchecked(graph, vertices, valid_types))
    }

    /// Creates a view without checking that `vertices` belong to `graph`
    pub(crate) fn new_unchecked<G>(
        graph: &G,
        mut vertices: Vec<Node>,
        valid_types: Option<FxHashSet<T>>,
    ) -> Self
    where
        G: SubgraphBacking<EdgeType = T> + ?Sized,
    {
        vertices.sort_unstable();
        vertices.dedup();

        let mut mapping = BiBTreeMap::new();
        for (local, &backing) in vertices.iter().enumerate() {
            mapping.insert(local as Node, backing);
        }

        Self {
            mapping,
            next_local: vertices.len() as Node,
            valid_types,
            last_modification: graph.modification_count(),
            events: graph.subscribe(),
            adopted: Arc::new(Mutex::new(Vec::new())),
            ancestors: Vec::new(),
        }
    }

    /// Synchronizes the selection with the current state of `graph`
    pub fn refresh<G>(&mut self, graph: &G)
    where
        G: SubgraphBacking<EdgeType = T> + ?Sized,
    {
        if let Some(events) = &self.events {
            for event in events.drain() {
                match event {
                    GraphEvent::VertexRemoved(u) => {
                        self.mapping.remove_by_right(&u);
                    }
                    GraphEvent::TypeRemoved(t) => {
                        if let Some(types) = self.valid_types.as_mut() {
                            types.remove(&t);
                        }
                    }
                }
            }
        }

        for u in drain(&self.adopted) {
            if graph.has_vertex(u) && !self.mapping.contains_right(&u) {
                self.adopt(u);
            }
        }

        let version = graph.modification_count();
        if version != self.last_modification {
            let stale = self
                .mapping
                .iter()
                .filter(|&(_, &u)| !graph.has_vertex(u))
                .map(|(&local, _)| local)
                .collect_vec();
            for local in &stale {
                self.mapping.remove_by_left(local);
            }
            if !stale.is_empty() {
                trace!("view dropped {} vertices missing in the backing graph", stale.len());
            }
            self.last_modification = version;
        }
    }

    /// Synchronizes the view and binds it to `graph` for reading
    pub fn bind<'a, G>(&'a mut self, graph: &'a G) -> Subgraph<'a, G>
    where
        G: SubgraphBacking<EdgeType = T>,
    {
        self.refresh(graph);
        Subgraph {
            graph,
            view: &*self,
        }
    }

    fn adopt(&mut self, u: Node) -> Node {
        let local = self.next_local;
        self.mapping.insert(local, u);
        self.next_local += 1;
        local
    }

    /// Number of selected vertices as of the last synchronization
    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    /// Local ids in increasing order, as of the last synchronization
    pub fn local_vertices(&self) -> impl Iterator<Item = Node> + '_ {
        self.mapping.left_values().copied()
    }

    /// Backing ids of all selected vertices, ordered by their local ids
    pub fn backing_vertices(&self) -> impl Iterator<Item = Node> + '_ {
        self.mapping.iter().map(|(_, &u)| u)
    }

    pub fn backing_vertex(&self, local: Node) -> Option<Node> {
        self.mapping.get_by_left(&local).copied()
    }

    pub fn local_vertex(&self, backing: Node) -> Option<Node> {
        self.mapping.get_by_right(&backing).copied()
    }

    /// The edge types visible in this view; `None` if every type is visible
    pub fn valid_types(&self) -> Option<&FxHashSet<T>> {
        self.valid_types.as_ref()
    }

    /// Returns *true* if edges labelled `t` are visible (untyped edges always are)
    pub fn accepts_type(&self, t: Option<&T>) -> bool {
        match (&self.valid_types, t) {
            (Some(types), Some(t)) => types.contains(t),
            _ => true,
        }
    }

    /// Translates a local edge into the id space of the backing graph
    fn to_backing(&self, edge: &GraphEdge<T>) -> GraphResult<GraphEdge<T>> {
        let from = self
            .backing_vertex(edge.from())
            .ok_or(GraphError::OutsideSubgraph(edge.from()))?;
        let to = self
            .backing_vertex(edge.to())
            .ok_or(GraphError::OutsideSubgraph(edge.to()))?;
        if !self.accepts_type(edge.edge_type()) {
            return Err(GraphError::UnsupportedEdgeType(format!(
                "{:?}",
                edge.edge_type()
            )));
        }
        Ok(edge.with_endpoints(from, to))
    }

    /// Creates a new vertex in the backing graph, selects it in this view and all views this
    /// view was derived from, and returns its local id.
    pub fn add_vertex<G>(&mut self, graph: &mut G) -> GraphResult<Node>
    where
        G: SubgraphBacking<EdgeType = T> + GraphVertexEditing,
    {
        self.refresh(&*graph);
        let u = graph.add_new_vertex()?;
        let local = self.adopt(u);
        for ancestor in self.ancestors.iter().filter_map(Weak::upgrade) {
            push_to(&ancestor, u);
        }
        self.last_modification = graph.modification_count();
        Ok(local)
    }

    /// Adds an edge given in local ids to the backing graph.
    ///
    /// Fails with [`GraphError::OutsideSubgraph`] if an endpoint is not selected and with
    /// [`GraphError::UnsupportedEdgeType`] if the edge's type is not valid in this view.
    pub fn add_edge<G>(&mut self, graph: &mut G, edge: GraphEdge<T>) -> GraphResult<bool>
    where
        G: SubgraphBacking<EdgeType = T> + GraphEdgeEditing,
    {
        self.refresh(&*graph);
        let edge = self.to_backing(&edge)?;
        graph.try_add_edge(edge)
    }

    /// Removes an edge given in local ids from the backing graph
    pub fn remove_edge<G>(&mut self, graph: &mut G, edge: &GraphEdge<T>) -> bool
    where
        G: SubgraphBacking<EdgeType = T> + GraphEdgeEditing,
    {
        self.refresh(&*graph);
        self.to_backing(edge)
            .is_ok_and(|edge| graph.remove_edge(&edge))
    }

    /// Removes a selected vertex from the view and from the backing graph
    pub fn remove_vertex<G>(&mut self, graph: &mut G, local: Node) -> bool
    where
        G: SubgraphBacking<EdgeType = T> + GraphVertexEditing,
    {
        self.refresh(&*graph);
        let Some((_, u)) = self.mapping.remove_by_left(&local) else {
            return false;
        };
        let removed = graph.remove_vertex(u);
        self.last_modification = graph.modification_count();
        removed
    }

    /// Derives a view of some selected vertices (given in local ids).
    /// The derived view inherits the valid types and forwards vertices created through it.
    pub fn subgraph<G>(
        &mut self,
        graph: &G,
        locals: impl IntoIterator<Item = Node>,
    ) -> GraphResult<SubgraphView<T>>
    where
        G: SubgraphBacking<EdgeType = T>,
    {
        self.refresh(graph);
        let vertices = locals
            .into_iter()
            .map(|local| {
                self.backing_vertex(local)
                    .ok_or(GraphError::UnknownVertex(local))
            })
            .collect::<GraphResult<Vec<_>>>()?;

        let mut child = Self::new_unchecked(graph, vertices, self.valid_types.clone());
        child.ancestors = self.ancestors.clone();
        child.ancestors.push(Arc::downgrade(&self.adopted));
        Ok(child)
    }
}

/// A [`SubgraphView`] bound to its backing graph.
///
/// Implements the read-only graph traits in local ids, so every algorithm runs on it.
pub struct Subgraph<'a, G: SubgraphBacking> {
    graph: &'a G,
    view: &'a SubgraphView<G::EdgeType>,
}

impl<'a, G: SubgraphBacking> Subgraph<'a, G> {
    pub fn view(&self) -> &'a SubgraphView<G::EdgeType> {
        self.view
    }

    pub fn backing_graph(&self) -> &'a G {
        self.graph
    }

    fn local(&self, u: Node) -> Option<Node> {
        self.view.mapping.get_by_right(&u).copied()
    }

    fn backing(&self, local: Node) -> Option<Node> {
        self.view.mapping.get_by_left(&local).copied()
    }

    fn accepts(&self, edge: &GraphEdge<G::EdgeType>) -> bool {
        match &self.view.valid_types {
            Some(types) => edge.edge_type().is_none_or(|t| types.contains(t)),
            None => true,
        }
    }

    /// Translates a backing edge into local ids if it is visible in the view
    fn translate(&self, edge: GraphEdge<G::EdgeType>) -> Option<GraphEdge<G::EdgeType>> {
        if !self.accepts(&edge) {
            return None;
        }
        let from = self.local(edge.from())?;
        let to = self.local(edge.to())?;
        Some(edge.with_endpoints(from, to))
    }

    /// Returns *true* if a visible edge connects the backing vertices `u` and `v`
    fn linked(&self, u: Node, v: Node) -> bool {
        if self.view.valid_types.is_none() {
            return true;
        }
        self.graph.edges_between(u, v).any(|e| self.accepts(&e))
    }

    /// Returns *true* if a visible edge leads from backing vertex `u` to `v`
    fn linked_to(&self, u: Node, v: Node) -> bool {
        self.graph
            .edges_between(u, v)
            .any(|e| (!e.is_directed() || e.from() == u) && self.accepts(&e))
    }
}

impl<G: SubgraphBacking> GraphType for Subgraph<'_, G> {
    fn is_directed(&self) -> bool {
        self.graph.is_directed()
    }

    fn is_typed(&self) -> bool {
        self.graph.is_typed()
    }
}

impl<G: SubgraphBacking> GraphNodeOrder for Subgraph<'_, G> {
    fn number_of_nodes(&self) -> NumNodes {
        self.view.mapping.len() as NumNodes
    }

    fn vertices(&self) -> impl Iterator<Item = Node> + '_ {
        self.view.mapping.left_values().copied()
    }

    fn has_vertex(&self, u: Node) -> bool {
        self.view.mapping.contains_left(&u)
    }
}

impl<G: SubgraphBacking> GraphEdgeOrder for Subgraph<'_, G> {
    fn number_of_edges(&self) -> NumEdges {
        self.edges().count() as NumEdges
    }
}

impl<G: SubgraphBacking> AdjacencyList for Subgraph<'_, G> {
    fn neighbors_of(&self, u: Node) -> impl Iterator<Item = Node> + '_ {
        self.backing(u)
            .into_iter()
            .flat_map(move |bu| {
                self.graph
                    .neighbors_of(bu)
                    .filter(move |&bv| self.linked(bu, bv))
            })
            .filter_map(move |bv| self.local(bv))
            .sorted_unstable()
    }

    fn are_adjacent(&self, u: Node, v: Node) -> bool {
        match (self.backing(u), self.backing(v)) {
            (Some(bu), Some(bv)) => self
                .graph
                .edges_between(bu, bv)
                .any(|e| self.accepts(&e)),
            _ => false,
        }
    }
}

impl<G> DirectedAdjacencyList for Subgraph<'_, G>
where
    G: SubgraphBacking + DirectedAdjacencyList,
{
    fn out_neighbors_of(&self, u: Node) -> impl Iterator<Item = Node> + '_ {
        self.backing(u)
            .into_iter()
            .flat_map(move |bu| {
                self.graph
                    .out_neighbors_of(bu)
                    .filter(move |&bv| self.linked_to(bu, bv))
            })
            .filter_map(move |bv| self.local(bv))
            .sorted_unstable()
    }

    fn in_neighbors_of(&self, u: Node) -> impl Iterator<Item = Node> + '_ {
        self.backing(u)
            .into_iter()
            .flat_map(move |bu| {
                self.graph
                    .in_neighbors_of(bu)
                    .filter(move |&bv| self.linked_to(bv, bu))
            })
            .filter_map(move |bv| self.local(bv))
            .sorted_unstable()
    }
}

impl<G: SubgraphBacking> AdjacencyTest for Subgraph<'_, G> {
    fn has_edge(&self, u: Node, v: Node) -> bool {
        match (self.backing(u), self.backing(v)) {
            (Some(bu), Some(bv)) => self.linked_to(bu, bv),
            _ => false,
        }
    }
}

impl<G: SubgraphBacking> GraphEdgeList for Subgraph<'_, G> {
    type EdgeType = G::EdgeType;

    fn edges(&self) -> impl Iterator<Item = GraphEdge<G::EdgeType>> + '_ {
        self.vertices().flat_map(move |u| {
            self.edges_of(u)
                .filter(move |edge| is_reported_by(u, edge))
        })
    }

    fn edges_of(&self, u: Node) -> impl Iterator<Item = GraphEdge<G::EdgeType>> + '_ {
        self.backing(u)
            .into_iter()
            .flat_map(move |bu| self.graph.edges_of(bu))
            .filter_map(move |edge| self.translate(edge))
    }

    fn edges_between(&self, u: Node, v: Node) -> impl Iterator<Item = GraphEdge<G::EdgeType>> + '_ {
        self.backing(u)
            .zip(self.backing(v))
            .into_iter()
            .flat_map(move |(bu, bv)| self.graph.edges_between(bu, bv))
            .filter_map(move |edge| self.translate(edge))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::repr::*;

    #[test]
    fn local_ids_follow_backing_order() {
        let graph = UndirectedGraph::from_pairs([(10, 20), (20, 30), (30, 10), (30, 40)]).unwrap();
        let mut view = graph.subgraph([40, 10, 30]).unwrap();
        assert_eq!(view.backing_vertex(0), Some(10));
        assert_eq!(view.backing_vertex(2), Some(40));
        assert_eq!(view.local_vertex(30), Some(1));

        let bound = view.bind(&graph);
        assert_eq!(bound.number_of_nodes(), 3);
        assert_eq!(bound.number_of_edges(), 2);
        assert_eq!(bound.neighbors_of(1).collect_vec(), vec![0, 2]);
        assert!(bound.has_edge(2, 1));
        assert!(!bound.are_adjacent(0, 2));
    }

    #[test]
    fn rejects_unknown_vertices() {
        let graph = UndirectedGraph::from_pairs([(0, 1)]).unwrap();
        assert_eq!(
            graph.subgraph([0, 5]).unwrap_err(),
            GraphError::UnknownVertex(5)
        );
    }

    #[test]
    fn view_survives_vertex_removal() {
        let mut graph = DirectedGraph::from_pairs([(0, 1), (1, 2), (2, 3), (3, 0)]).unwrap();
        let mut view = graph.subgraph([0, 1, 2]).unwrap();
        assert_eq!(view.bind(&graph).number_of_edges(), 2);

        graph.remove_vertex(1);
        let bound = view.bind(&graph);
        assert_eq!(bound.number_of_nodes(), 2);
        assert_eq!(bound.number_of_edges(), 0);
        assert!(bound.edges().all(|e| bound.has_vertex(e.from()) && bound.has_vertex(e.to())));
    }

    #[test]
    fn removed_maximum_is_not_reissued() {
        let mut graph = UndirectedGraph::from_pairs([(0, 1), (1, 2), (2, 3)]).unwrap();
        let mut view = graph.subgraph([2, 3]).unwrap();

        assert!(graph.remove_vertex(3));
        let fresh = graph.add_new_vertex().unwrap();
        assert_eq!(fresh, 4);

        let bound = view.bind(&graph);
        assert_eq!(bound.number_of_nodes(), 1);
        assert_eq!(bound.view().local_vertex(3), None);
        assert_eq!(bound.view().local_vertex(fresh), None);
        assert_eq!(bound.view().backing_vertex(0), Some(2));
    }

    #[test]
    fn mutation_through_view() {
        let mut graph = UndirectedGraph::from_pairs([(0, 1), (1, 2)]).unwrap();
        let mut view = graph.subgraph([1, 2]).unwrap();

        assert_eq!(
            view.add_edge(&mut graph, GraphEdge::plain(0, 5)),
            Err(GraphError::OutsideSubgraph(5))
        );

        let local = view.add_vertex(&mut graph).unwrap();
        assert_eq!(local, 2);
        assert_eq!(view.backing_vertex(local), Some(3));
        assert!(view.add_edge(&mut graph, GraphEdge::plain(0, local)).unwrap());
        assert!(graph.has_edge(1, 3));

        assert!(view.remove_edge(&mut graph, &GraphEdge::plain(1, 0)));
        assert!(!graph.has_edge(1, 2));

        assert!(view.remove_vertex(&mut graph, 0));
        assert!(!graph.has_vertex(1));
        assert_eq!(view.bind(&graph).number_of_nodes(), 2);
    }

    #[test]
    fn nested_views_adopt_new_vertices() {
        let mut graph = UndirectedGraph::from_pairs([(0, 1), (1, 2), (2, 3)]).unwrap();
        let mut outer = graph.subgraph([0, 1, 2]).unwrap();
        let mut inner = outer.subgraph(&graph, [1, 2]).unwrap();
        assert_eq!(inner.backing_vertex(0), Some(1));

        let local = inner.add_vertex(&mut graph).unwrap();
        inner.add_edge(&mut graph, GraphEdge::plain(0, local)).unwrap();

        let bound = outer.bind(&graph);
        assert_eq!(bound.number_of_nodes(), 4);
        assert_eq!(bound.number_of_edges(), 3);
        assert_eq!(bound.view().local_vertex(4), Some(3));
    }

    #[test]
    fn dropped_views_are_forgotten() {
        let registry: ViewRegistry<u8> = ViewRegistry::default();
        let first = registry.subscribe();
        {
            let _second = registry.subscribe();
            assert_eq!(registry.live_views(), 2);
        }
        assert_eq!(registry.live_views(), 1);

        let mut registry = registry;
        registry.broadcast(GraphEvent::TypeRemoved(3));
        assert_eq!(first.drain(), vec![GraphEvent::TypeRemoved(3)]);
        assert!(first.drain().is_empty());
    }
}
