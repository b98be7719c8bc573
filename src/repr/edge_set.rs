/*!
# Edge Sets

Every vertex of a [`SparseGraph`](super::SparseGraph) owns one [`EdgeSet`]: the collection of
all edges incident to it. The graph only coordinates the sets of both endpoints, so each set
decides which kinds of [`GraphEdge`] it can hold and how connections are indexed.

- [`SparseUndirectedEdgeSet`] stores plain undirected edges as a sorted neighbor list.
- [`SparseDirectedEdgeSet`] stores plain directed edges as sorted in/out lists.
- [`GenericEdgeSet`] stores any edge of matching directedness (typed, weighted, ...) in a flat
  list with linear-time lookups.
- [`SparseDirectedTypedEdgeSet`](super::SparseDirectedTypedEdgeSet) stores typed directed
  edges for multigraphs.
*/

use std::{fmt::Debug, hash::Hash};

use itertools::Itertools;
use smallvec::SmallVec;

use crate::{edge::*, node::*};

/// Sorted list of neighbors; most vertices of sparse graphs have very few
pub(crate) type NodeList = SmallVec<[Node; 4]>;

pub(crate) fn insert_sorted(list: &mut NodeList, v: Node) -> bool {
    match list.binary_search(&v) {
        Ok(_) => false,
        Err(pos) => {
            list.insert(pos, v);
            true
        }
    }
}

pub(crate) fn remove_sorted(list: &mut NodeList, v: Node) -> bool {
    match list.binary_search(&v) {
        Ok(pos) => {
            list.remove(pos);
            true
        }
        Err(_) => false,
    }
}

#[inline]
pub(crate) fn contains_sorted(list: &NodeList, v: Node) -> bool {
    list.binary_search(&v).is_ok()
}

/// The edges incident to a single vertex, the *root* of the set.
///
/// Non-loop edges are stored in the sets of both endpoints, self-loops once.
pub trait EdgeSet: Clone + Debug {
    /// Type label of the stored edges
    type EdgeType: Clone + Eq + Hash + Debug;

    /// Whether the stored edges are directed
    const DIRECTED: bool;

    /// Whether the stored edges carry a type label
    const TYPED: bool = false;

    /// Creates an empty set rooted at `root`
    fn new(root: Node) -> Self;

    fn root(&self) -> Node;

    /// Returns *true* if edges of this kind can be stored
    fn supports(edge: &GraphEdge<Self::EdgeType>) -> bool;

    /// Stores `edge` if it is supported, touches the root and is not present yet.
    /// Returns *true* if the set changed.
    fn add(&mut self, edge: &GraphEdge<Self::EdgeType>) -> bool;

    /// Returns *true* if `edge` was present and is removed now
    fn remove(&mut self, edge: &GraphEdge<Self::EdgeType>) -> bool;

    fn contains(&self, edge: &GraphEdge<Self::EdgeType>) -> bool;

    /// Adds the untyped default edge from the root to `v`.
    /// Sets that cannot represent untyped edges return *false*.
    fn connect(&mut self, v: Node) -> bool;

    /// Removes every edge between the root and `v`; returns *true* if any existed
    fn disconnect(&mut self, v: Node) -> bool;

    /// Returns *true* if any edge between the root and `v` exists
    fn connects(&self, v: Node) -> bool;

    /// Returns all edges between the root and `v`
    fn edges_to(&self, v: Node) -> impl Iterator<Item = GraphEdge<Self::EdgeType>> + '_;

    /// Returns some edge between the root and `v`
    fn get_edge(&self, v: Node) -> Option<GraphEdge<Self::EdgeType>> {
        self.edges_to(v).next()
    }

    /// Returns all vertices connected to the root in increasing order (each once)
    fn connected(&self) -> impl Iterator<Item = Node> + '_;

    /// Returns all vertices reachable from the root by one edge in increasing order
    fn successors(&self) -> impl Iterator<Item = Node> + '_;

    /// Returns all vertices reaching the root by one edge in increasing order
    fn predecessors(&self) -> impl Iterator<Item = Node> + '_;

    /// Returns *true* if an edge `root -> v` exists (any edge for undirected sets)
    fn has_successor(&self, v: Node) -> bool;

    /// Returns all stored edges
    fn edges(&self) -> impl Iterator<Item = GraphEdge<Self::EdgeType>> + '_;

    /// Returns the number of stored edges; self-loops count once
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of distinct vertices connected to the root
    fn degree(&self) -> NumNodes {
        self.connected().count() as NumNodes
    }

    fn out_degree(&self) -> NumNodes {
        self.successors().count() as NumNodes
    }

    fn in_degree(&self) -> NumNodes {
        self.predecessors().count() as NumNodes
    }
}

/// Undirected, untyped edges as a sorted neighbor list.
#[derive(Clone, Debug)]
pub struct SparseUndirectedEdgeSet {
    root: Node,
    neighbors: NodeList,
}

impl SparseUndirectedEdgeSet {
    /// Returns the opposite endpoint of a supported edge touching the root
    fn neighbor_of(&self, edge: &GraphEdge) -> Option<Node> {
        if Self::supports(edge) {
            edge.opposite(self.root)
        } else {
            None
        }
    }
}

impl EdgeSet for SparseUndirectedEdgeSet {
    type EdgeType = ();
    const DIRECTED: bool = false;

    fn new(root: Node) -> Self {
        Self {
            root,
            neighbors: NodeList::new(),
        }
    }

    fn root(&self) -> Node {
        self.root
    }

    fn supports(edge: &GraphEdge) -> bool {
        matches!(edge, GraphEdge::Plain(_))
    }

    fn add(&mut self, edge: &GraphEdge) -> bool {
        self.neighbor_of(edge)
            .is_some_and(|v| insert_sorted(&mut self.neighbors, v))
    }

    fn remove(&mut self, edge: &GraphEdge) -> bool {
        self.neighbor_of(edge)
            .is_some_and(|v| remove_sorted(&mut self.neighbors, v))
    }

    fn contains(&self, edge: &GraphEdge) -> bool {
        self.neighbor_of(edge)
            .is_some_and(|v| contains_sorted(&self.neighbors, v))
    }

    fn connect(&mut self, v: Node) -> bool {
        insert_sorted(&mut self.neighbors, v)
    }

    fn disconnect(&mut self, v: Node) -> bool {
        remove_sorted(&mut self.neighbors, v)
    }

    fn connects(&self, v: Node) -> bool {
        contains_sorted(&self.neighbors, v)
    }

    fn edges_to(&self, v: Node) -> impl Iterator<Item = GraphEdge> + '_ {
        self.connects(v)
            .then(|| GraphEdge::plain(self.root, v))
            .into_iter()
    }

    fn connected(&self) -> impl Iterator<Item = Node> + '_ {
        self.neighbors.iter().copied()
    }

    fn successors(&self) -> impl Iterator<Item = Node> + '_ {
        self.connected()
    }

    fn predecessors(&self) -> impl Iterator<Item = Node> + '_ {
        self.connected()
    }

    fn has_successor(&self, v: Node) -> bool {
        self.connects(v)
    }

    fn edges(&self) -> impl Iterator<Item = GraphEdge> + '_ {
        let root = self.root;
        self.neighbors.iter().map(move |&v| GraphEdge::plain(root, v))
    }

    fn len(&self) -> usize {
        self.neighbors.len()
    }

    fn degree(&self) -> NumNodes {
        self.neighbors.len() as NumNodes
    }
}

/// Directed, untyped edges as sorted lists of successors and predecessors.
///
/// A self-loop appears in both lists but is counted once.
#[derive(Clone, Debug)]
pub struct SparseDirectedEdgeSet {
    root: Node,
    incoming: NodeList,
    outgoing: NodeList,
}

impl SparseDirectedEdgeSet {
    fn has_loop(&self) -> bool {
        contains_sorted(&self.outgoing, self.root)
    }
}

impl EdgeSet for SparseDirectedEdgeSet {
    type EdgeType = ();
    const DIRECTED: bool = true;

    fn new(root: Node) -> Self {
        Self {
            root,
            incoming: NodeList::new(),
            outgoing: NodeList::new(),
        }
    }

    fn root(&self) -> Node {
        self.root
    }

    fn supports(edge: &GraphEdge) -> bool {
        matches!(edge, GraphEdge::Directed(_))
    }

    fn add(&mut self, edge: &GraphEdge) -> bool {
        if !Self::supports(edge) {
            return false;
        }

        let Edge(u, v) = edge.endpoints();
        if u == self.root {
            if v == self.root {
                insert_sorted(&mut self.incoming, v);
            }
            insert_sorted(&mut self.outgoing, v)
        } else if v == self.root {
            insert_sorted(&mut self.incoming, u)
        } else {
            false
        }
    }

    fn remove(&mut self, edge: &GraphEdge) -> bool {
        if !Self::supports(edge) {
            return false;
        }

        let Edge(u, v) = edge.endpoints();
        if u == self.root {
            if v == self.root {
                remove_sorted(&mut self.incoming, v);
            }
            remove_sorted(&mut self.outgoing, v)
        } else if v == self.root {
            remove_sorted(&mut self.incoming, u)
        } else {
            false
        }
    }

    fn contains(&self, edge: &GraphEdge) -> bool {
        if !Self::supports(edge) {
            return false;
        }

        let Edge(u, v) = edge.endpoints();
        if u == self.root {
            contains_sorted(&self.outgoing, v)
        } else if v == self.root {
            contains_sorted(&self.incoming, u)
        } else {
            false
        }
    }

    fn connect(&mut self, v: Node) -> bool {
        self.add(&GraphEdge::directed(self.root, v))
    }

    fn disconnect(&mut self, v: Node) -> bool {
        let outgoing = remove_sorted(&mut self.outgoing, v);
        let incoming = remove_sorted(&mut self.incoming, v);
        outgoing || incoming
    }

    fn connects(&self, v: Node) -> bool {
        contains_sorted(&self.outgoing, v) || contains_sorted(&self.incoming, v)
    }

    fn edges_to(&self, v: Node) -> impl Iterator<Item = GraphEdge> + '_ {
        let root = self.root;
        let outgoing = contains_sorted(&self.outgoing, v).then(|| GraphEdge::directed(root, v));
        let incoming = (v != root && contains_sorted(&self.incoming, v))
            .then(|| GraphEdge::directed(v, root));
        outgoing.into_iter().chain(incoming)
    }

    fn connected(&self) -> impl Iterator<Item = Node> + '_ {
        self.outgoing
            .iter()
            .merge(self.incoming.iter())
            .dedup()
            .copied()
    }

    fn successors(&self) -> impl Iterator<Item = Node> + '_ {
        self.outgoing.iter().copied()
    }

    fn predecessors(&self) -> impl Iterator<Item = Node> + '_ {
        self.incoming.iter().copied()
    }

    fn has_successor(&self, v: Node) -> bool {
        contains_sorted(&self.outgoing, v)
    }

    fn edges(&self) -> impl Iterator<Item = GraphEdge> + '_ {
        let root = self.root;
        self.outgoing
            .iter()
            .map(move |&v| GraphEdge::directed(root, v))
            .chain(
                self.incoming
                    .iter()
                    .filter(move |&&u| u != root)
                    .map(move |&u| GraphEdge::directed(u, root)),
            )
    }

    fn len(&self) -> usize {
        self.outgoing.len() + self.incoming.len() - self.has_loop() as usize
    }

    fn out_degree(&self) -> NumNodes {
        self.outgoing.len() as NumNodes
    }

    fn in_degree(&self) -> NumNodes {
        self.incoming.len() as NumNodes
    }
}

/// Any edges of a fixed directedness in an unsorted list.
///
/// Lookups take time linear in the number of incident edges, but the set accepts typed and
/// weighted edges alike and can hold several edges between the same pair of vertices as long
/// as they differ in their type.
#[derive(Clone, Debug)]
pub struct GenericEdgeSet<T = (), const DIRECTED: bool = false> {
    root: Node,
    edges: Vec<GraphEdge<T>>,
}

impl<T, const DIRECTED: bool> GenericEdgeSet<T, DIRECTED>
where
    T: Clone + Eq + Hash + Debug,
{
    fn leaves_root(&self, edge: &GraphEdge<T>) -> bool {
        !DIRECTED || edge.from() == self.root
    }

    fn enters_root(&self, edge: &GraphEdge<T>) -> bool {
        !DIRECTED || edge.to() == self.root
    }
}

impl<T, const DIRECTED: bool> EdgeSet for GenericEdgeSet<T, DIRECTED>
where
    T: Clone + Eq + Hash + Debug,
{
    type EdgeType = T;
    const DIRECTED: bool = DIRECTED;

    fn new(root: Node) -> Self {
        Self {
            root,
            edges: Vec::new(),
        }
    }

    fn root(&self) -> Node {
        self.root
    }

    fn supports(edge: &GraphEdge<T>) -> bool {
        edge.is_directed() == DIRECTED
    }

    fn add(&mut self, edge: &GraphEdge<T>) -> bool {
        if !Self::supports(edge) || !edge.touches(self.root) || self.contains(edge) {
            return false;
        }
        self.edges.push(edge.clone());
        true
    }

    fn remove(&mut self, edge: &GraphEdge<T>) -> bool {
        match self.edges.iter().position(|e| e == edge) {
            Some(pos) => {
                self.edges.remove(pos);
                true
            }
            None => false,
        }
    }

    fn contains(&self, edge: &GraphEdge<T>) -> bool {
        self.edges.iter().any(|e| e == edge)
    }

    fn connect(&mut self, v: Node) -> bool {
        let edge = if DIRECTED {
            GraphEdge::Directed(Edge(self.root, v))
        } else {
            GraphEdge::Plain(Edge(self.root, v))
        };
        self.add(&edge)
    }

    fn disconnect(&mut self, v: Node) -> bool {
        let root = self.root;
        let before = self.edges.len();
        self.edges.retain(|e| e.opposite(root) != Some(v));
        self.edges.len() != before
    }

    fn connects(&self, v: Node) -> bool {
        self.edges.iter().any(|e| e.opposite(self.root) == Some(v))
    }

    fn edges_to(&self, v: Node) -> impl Iterator<Item = GraphEdge<T>> + '_ {
        let root = self.root;
        self.edges
            .iter()
            .filter(move |e| e.opposite(root) == Some(v))
            .cloned()
    }

    fn connected(&self) -> impl Iterator<Item = Node> + '_ {
        let root = self.root;
        self.edges
            .iter()
            .filter_map(move |e| e.opposite(root))
            .sorted_unstable()
            .dedup()
    }

    fn successors(&self) -> impl Iterator<Item = Node> + '_ {
        let root = self.root;
        self.edges
            .iter()
            .filter(move |e| self.leaves_root(e))
            .filter_map(move |e| e.opposite(root))
            .sorted_unstable()
            .dedup()
    }

    fn predecessors(&self) -> impl Iterator<Item = Node> + '_ {
        let root = self.root;
        self.edges
            .iter()
            .filter(move |e| self.enters_root(e))
            .filter_map(move |e| e.opposite(root))
            .sorted_unstable()
            .dedup()
    }

    fn has_successor(&self, v: Node) -> bool {
        self.edges
            .iter()
            .any(|e| self.leaves_root(e) && e.opposite(self.root) == Some(v))
    }

    fn edges(&self) -> impl Iterator<Item = GraphEdge<T>> + '_ {
        self.edges.iter().cloned()
    }

    fn len(&self) -> usize {
        self.edges.len()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn undirected_set_keeps_neighbors_sorted() {
        let mut set = SparseUndirectedEdgeSet::new(5);
        for v in [9, 1, 5, 3, 1] {
            set.connect(v);
        }

        assert_eq!(set.connected().collect_vec(), vec![1, 3, 5, 9]);
        assert_eq!(set.len(), 4);
        assert!(set.contains(&GraphEdge::plain(9, 5)));
        assert!(!set.contains(&GraphEdge::plain(9, 4)));
        assert!(!set.add(&GraphEdge::directed(5, 2)));
        assert!(!set.add(&GraphEdge::plain(2, 4)));

        assert!(set.remove(&GraphEdge::plain(5, 5)));
        assert_eq!(set.edges_to(5).count(), 0);
        assert_eq!(set.edges_to(3).collect_vec(), vec![GraphEdge::plain(5, 3)]);
    }

    #[test]
    fn directed_set_counts_loops_once() {
        let mut set = SparseDirectedEdgeSet::new(2);
        assert!(set.add(&GraphEdge::directed(2, 2)));
        assert!(set.add(&GraphEdge::directed(2, 7)));
        assert!(set.add(&GraphEdge::directed(7, 2)));
        assert!(set.add(&GraphEdge::directed(0, 2)));
        assert!(!set.add(&GraphEdge::directed(0, 2)));

        assert_eq!(set.len(), 4);
        assert_eq!(set.connected().collect_vec(), vec![0, 2, 7]);
        assert_eq!(set.successors().collect_vec(), vec![2, 7]);
        assert_eq!(set.predecessors().collect_vec(), vec![0, 2, 7]);
        assert_eq!(set.edges().count(), 4);
        assert_eq!(set.edges_to(2).count(), 1);
        assert_eq!(set.edges_to(7).count(), 2);

        assert!(set.disconnect(7));
        assert!(!set.connects(7));
        assert_eq!(set.len(), 2);

        assert!(set.remove(&GraphEdge::directed(2, 2)));
        assert_eq!(set.len(), 1);
        assert_eq!(set.predecessors().collect_vec(), vec![0]);
    }

    #[test]
    fn generic_set_holds_parallel_typed_edges() {
        let mut set: GenericEdgeSet<&str, true> = GenericEdgeSet::new(1);
        assert!(set.add(&GraphEdge::directed_typed(1, 2, "a")));
        assert!(set.add(&GraphEdge::directed_typed(1, 2, "b")));
        assert!(!set.add(&GraphEdge::directed_typed(1, 2, "a")));
        assert!(set.add(&GraphEdge::directed_typed(3, 1, "a")));
        assert!(!set.add(&GraphEdge::typed(1, 4, "a")));

        assert_eq!(set.len(), 3);
        assert_eq!(set.edges_to(2).count(), 2);
        assert_eq!(set.connected().collect_vec(), vec![2, 3]);
        assert_eq!(set.successors().collect_vec(), vec![2]);
        assert_eq!(set.predecessors().collect_vec(), vec![3]);
        assert!(set.has_successor(2));
        assert!(!set.has_successor(3));

        assert!(set.disconnect(2));
        assert_eq!(set.len(), 1);
        assert!(!set.disconnect(2));
    }
}
