/*!
# Compact Graphs

Immutable snapshot of a graph relabelled onto the dense id space `0..n` (in increasing order
of the original ids). Adjacency is stored as bitsets, which makes the adjacency tests of the
isomorphism search constant time, and edge labels are grouped per vertex pair.

Motif counters keep one [`CompactGraph`] per motif class as its representative.
*/

use std::{fmt::Debug, hash::Hash};

use fxhash::{FxHashMap, FxHashSet};
use itertools::Itertools;
use smallvec::SmallVec;

use crate::{edge::*, node::*, ops::*, utils::*};

/// Dense bitset-based copy of a graph
#[derive(Clone, Debug)]
pub struct CompactGraph<T = ()> {
    directed: bool,
    typed: bool,
    labels: Vec<Node>,
    out_neighbors: Vec<NodeBitSet>,
    in_neighbors: Vec<NodeBitSet>,
    neighbors: Vec<NodeBitSet>,
    edges: Vec<GraphEdge<T>>,
    edge_types: FxHashMap<Edge, SmallVec<[T; 2]>>,
}

impl<T> CompactGraph<T>
where
    T: Clone + Eq + Hash + Debug,
{
    /// Copies `graph`; vertex `i` of the copy is the `i`-th smallest vertex of `graph`
    pub fn from_graph<G>(graph: &G) -> Self
    where
        G: GraphEdgeList<EdgeType = T>,
    {
        let labels = graph.vertices().collect_vec();
        let n = labels.len() as NumNodes;

        let mut mapper = NodeMapper::with_capacity(n);
        for (new, &old) in labels.iter().enumerate() {
            mapper.map_node_to(old, new as Node);
        }

        let directed = graph.is_directed();
        let mut out_neighbors = vec![NodeBitSet::new(n); n as usize];
        let mut in_neighbors = vec![NodeBitSet::new(n); n as usize];
        let mut neighbors = vec![NodeBitSet::new(n); n as usize];
        let mut edges = Vec::new();
        let mut edge_types: FxHashMap<Edge, SmallVec<[T; 2]>> = FxHashMap::default();

        for edge in graph.edges() {
            let (Some(u), Some(v)) = (mapper.new_id_of(edge.from()), mapper.new_id_of(edge.to()))
            else {
                continue;
            };
            let edge = edge.with_endpoints(u, v);

            out_neighbors[u as usize].set_bit(v);
            in_neighbors[v as usize].set_bit(u);
            if !directed {
                out_neighbors[v as usize].set_bit(u);
                in_neighbors[u as usize].set_bit(v);
            }
            neighbors[u as usize].set_bit(v);
            neighbors[v as usize].set_bit(u);

            if let Some(t) = edge.edge_type() {
                edge_types.entry(edge.key()).or_default().push(t.clone());
            }
            edges.push(edge);
        }

        Self {
            directed,
            typed: graph.is_typed() || edges.iter().any(|e| e.is_typed()),
            labels,
            out_neighbors,
            in_neighbors,
            neighbors,
            edges,
            edge_types,
        }
    }

    /// Original id of the dense vertex `u`.
    /// ** Panics if `u >= n` **
    pub fn original_vertex(&self, u: Node) -> Node {
        self.labels[u as usize]
    }

    /// Original ids of all vertices, indexed by dense id
    pub fn original_vertices(&self) -> &[Node] {
        &self.labels
    }

    /// Type labels of all edges `u -> v` (of the edge `{u, v}` if undirected)
    pub fn types_between(&self, u: Node, v: Node) -> &[T] {
        let key = if self.directed {
            Edge(u, v)
        } else {
            Edge(u, v).normalized()
        };
        self.edge_types.get(&key).map_or(&[], |types| types.as_slice())
    }

    /// Type labels of all edges with multiplicity
    pub fn edge_types(&self) -> impl Iterator<Item = &T> + '_ {
        self.edges.iter().filter_map(|e| e.edge_type())
    }

    /// Returns *true* if both graphs have an edge type in common
    pub fn shares_edge_type_with(&self, other: &Self) -> bool {
        let types: FxHashSet<&T> = other.edge_types().collect();
        self.edge_types().any(|t| types.contains(t))
    }
}

impl<T> CompactGraph<T> {
    /// Successors of `u` as bitset; all neighbors for undirected graphs
    pub(crate) fn out_set(&self, u: Node) -> &NodeBitSet {
        &self.out_neighbors[u as usize]
    }

    /// Predecessors of `u` as bitset; all neighbors for undirected graphs
    pub(crate) fn in_set(&self, u: Node) -> &NodeBitSet {
        &self.in_neighbors[u as usize]
    }
}

impl<T> GraphType for CompactGraph<T> {
    fn is_directed(&self) -> bool {
        self.directed
    }

    fn is_typed(&self) -> bool {
        self.typed
    }
}

impl<T> GraphNodeOrder for CompactGraph<T> {
    fn number_of_nodes(&self) -> NumNodes {
        self.labels.len() as NumNodes
    }

    fn vertices(&self) -> impl Iterator<Item = Node> + '_ {
        0..self.number_of_nodes()
    }

    fn has_vertex(&self, u: Node) -> bool {
        (u as usize) < self.labels.len()
    }
}

impl<T> GraphEdgeOrder for CompactGraph<T> {
    fn number_of_edges(&self) -> NumEdges {
        self.edges.len() as NumEdges
    }
}

/// Snapshots never change after construction
impl<T> GraphVersion for CompactGraph<T> {
    fn modification_count(&self) -> ModificationCount {
        0
    }
}

impl<T> AdjacencyList for CompactGraph<T> {
    fn neighbors_of(&self, u: Node) -> impl Iterator<Item = Node> + '_ {
        self.neighbors
            .get(u as usize)
            .into_iter()
            .flat_map(|bits| bits.iter_set_bits())
    }

    fn degree_of(&self, u: Node) -> NumNodes {
        self.neighbors
            .get(u as usize)
            .map_or(0, |bits| bits.cardinality())
    }

    fn are_adjacent(&self, u: Node, v: Node) -> bool {
        self.has_vertex(v)
            && self
                .neighbors
                .get(u as usize)
                .is_some_and(|bits| bits.get_bit(v))
    }
}

impl<T> DirectedAdjacencyList for CompactGraph<T> {
    fn out_neighbors_of(&self, u: Node) -> impl Iterator<Item = Node> + '_ {
        self.out_neighbors
            .get(u as usize)
            .into_iter()
            .flat_map(|bits| bits.iter_set_bits())
    }

    fn in_neighbors_of(&self, u: Node) -> impl Iterator<Item = Node> + '_ {
        self.in_neighbors
            .get(u as usize)
            .into_iter()
            .flat_map(|bits| bits.iter_set_bits())
    }
}

impl<T> AdjacencyTest for CompactGraph<T> {
    fn has_edge(&self, u: Node, v: Node) -> bool {
        self.has_vertex(v)
            && self
                .out_neighbors
                .get(u as usize)
                .is_some_and(|bits| bits.get_bit(v))
    }
}

impl<T> GraphEdgeList for CompactGraph<T>
where
    T: Clone + Eq + Hash + Debug,
{
    type EdgeType = T;

    fn edges(&self) -> impl Iterator<Item = GraphEdge<T>> + '_ {
        self.edges.iter().cloned()
    }

    fn edges_of(&self, u: Node) -> impl Iterator<Item = GraphEdge<T>> + '_ {
        self.edges.iter().filter(move |e| e.touches(u)).cloned()
    }

    fn edges_between(&self, u: Node, v: Node) -> impl Iterator<Item = GraphEdge<T>> + '_ {
        self.edges
            .iter()
            .filter(move |e| e.opposite(u) == Some(v))
            .cloned()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::repr::*;

    #[test]
    fn relabels_densely() {
        let graph = DirectedGraph::from_pairs([(100, 7), (7, 42), (42, 42)]).unwrap();
        let compact = CompactGraph::from_graph(&graph);

        assert_eq!(compact.original_vertices(), &[7, 42, 100]);
        assert_eq!(compact.number_of_edges(), 3);
        assert!(compact.has_edge(2, 0));
        assert!(!compact.has_edge(0, 2));
        assert!(compact.has_self_loop(1));
        assert_eq!(compact.neighbors_of(0).collect_vec(), vec![1, 2]);
        assert_eq!(compact.in_neighbors_of(1).collect_vec(), vec![0, 1]);
        assert_eq!(compact.degree_of(1), 2);
    }

    #[test]
    fn groups_types_per_pair() {
        let mut graph = DirectedMultigraph::new();
        graph.add_edge(5, 6, 'x').unwrap();
        graph.add_edge(5, 6, 'y').unwrap();
        graph.add_edge(6, 5, 'x').unwrap();
        let compact = CompactGraph::from_graph(&graph);

        assert!(compact.is_typed());
        assert_eq!(compact.types_between(0, 1).len(), 2);
        assert_eq!(compact.types_between(1, 0), &['x']);
        assert_eq!(compact.edge_types().count(), 3);

        let mut other = DirectedMultigraph::new();
        other.add_edge(0, 1, 'y').unwrap();
        assert!(compact.shares_edge_type_with(&CompactGraph::from_graph(&other)));
    }

    fn successors<T>(graph: &CompactGraph<T>, u: Node) -> Vec<Node> {
        graph.out_set(u).iter_set_bits().collect_vec()
    }

    #[test]
    fn snapshots_back_views() {
        let graph = DirectedGraph::from_pairs([(10, 20), (20, 30), (30, 10)]).unwrap();
        let compact = CompactGraph::from_graph(&graph);
        assert_eq!(compact.modification_count(), 0);
        assert_eq!(successors(&compact, 1), vec![2]);

        let mut view = compact.subgraph([0, 1]).unwrap();
        let bound = view.bind(&compact);
        assert_eq!(bound.number_of_nodes(), 2);
        assert_eq!(bound.edges().collect_vec(), vec![GraphEdge::directed(0, 1)]);
    }

    #[test]
    fn undirected_types_ignore_orientation() {
        let mut graph: GenericGraph<u8> = GenericGraph::new();
        graph.try_add_edge(GraphEdge::typed(3, 1, 9)).unwrap();
        let compact = CompactGraph::from_graph(&graph);
        assert_eq!(compact.types_between(0, 1), &[9]);
        assert_eq!(compact.types_between(1, 0), &[9]);
        assert!(compact.has_edge(0, 1) && compact.has_edge(1, 0));
    }
}
