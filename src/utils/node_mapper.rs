/*!
# Node Mapper

Bidirectional mappings between the vertices of two graphs (or a graph and a relabelled copy).
Isomorphism searches report their result as a [`NodeMapper`] from the first to the second graph;
compact snapshots use one to move into the dense id space.
*/
use crate::{edge::*, error::*, node::*, ops::*};

use fxhash::FxHashMap;
use itertools::Itertools;
use std::fmt;

/// A trait for constructing node mappings.
pub trait NodeMapSetter: Sized {
    /// Creates an empty mapper with space for `n` mappings.
    fn with_capacity(n: NumNodes) -> Self;

    /// Stores a mapping `old <-> new`.
    /// ** Panics if `old` or `new` is already mapped **
    fn map_node_to(&mut self, old: Node, new: Node);

    /// Constructs a mapper from a sequence of tuples `(old, new)`.
    ///
    /// # Example
    /// ```
    /// use sgraphs::utils::*;
    ///
    /// let mapper = NodeMapper::from_sequence(&[(10, 0), (0, 10)]);
    /// assert_eq!(mapper.new_id_of(0), Some(10));
    /// assert_eq!(mapper.old_id_of(0), Some(10));
    /// ```
    fn from_sequence(seq: &[(Node, Node)]) -> Self {
        let mut res = Self::with_capacity(seq.len() as NumNodes);
        for &(old, new) in seq {
            res.map_node_to(old, new);
        }
        res
    }
}

/// A trait for accessing node mappings.
pub trait NodeMapGetter {
    /// If the mapping `(old, new)` exists, returns `Some(new)`, otherwise `None`.
    fn new_id_of(&self, old: Node) -> Option<Node>;

    /// If the mapping `(old, new)` exists, returns `Some(old)`, otherwise `None`.
    fn old_id_of(&self, new: Node) -> Option<Node>;

    /// Returns the number of stored mappings
    fn len(&self) -> NumNodes;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Applies [`NodeMapGetter::new_id_of`] to each item and drops unmapped ones
    fn get_filtered_new_ids<I>(&self, old_ids: I) -> impl Iterator<Item = Node>
    where
        I: IntoIterator<Item = Node>,
    {
        old_ids.into_iter().filter_map(|u| self.new_id_of(u))
    }

    /// Create a copy of type `GO` from the input graph where all vertices are relabelled
    /// according to this mapper. Every vertex without mapping is dropped with its edges.
    ///
    /// # Example
    /// ```
    /// use sgraphs::{prelude::*, utils::*};
    ///
    /// let g = DirectedGraph::from_pairs([(7, 9)]).unwrap();
    /// let mapper = NodeMapper::from_sequence(&[(7, 1), (9, 0)]);
    /// let gm: DirectedGraph = mapper.relabelled_graph_as(&g).unwrap();
    /// assert!(gm.has_edge(1, 0));
    /// assert!(!gm.has_edge(0, 1));
    /// ```
    fn relabelled_graph_as<GI, GO>(&self, input: &GI) -> GraphResult<GO>
    where
        GI: GraphEdgeList,
        GO: GraphFromScratch<EdgeType = GI::EdgeType> + GraphVertexEditing,
    {
        let mut output = GO::default();
        output.add_vertices(self.get_filtered_new_ids(input.vertices()))?;
        output.add_edges(input.edges().filter_map(|edge| {
            let from = self.new_id_of(edge.from())?;
            let to = self.new_id_of(edge.to())?;
            Some(edge.with_endpoints(from, to))
        }))?;
        Ok(output)
    }

    /// Short-hand for [`NodeMapGetter::relabelled_graph_as`] where the output type matches the input type.
    fn relabelled_graph<G>(&self, input: &G) -> GraphResult<G>
    where
        G: GraphFromScratch + GraphVertexEditing,
    {
        self.relabelled_graph_as::<G, G>(input)
    }
}

/// A trait for inverting a node mapping.
pub trait NodeMapInverse {
    /// Returns a new mapper where for each mapping `(a, b)` of the original,
    /// there exists a mapping `(b, a)` in the new mapper.
    #[must_use]
    fn inverse(&self) -> Self;
}

/// A bidirectional node mapping between "old" and "new" vertices.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct NodeMapper {
    new_to_old: FxHashMap<Node, Node>,
    old_to_new: FxHashMap<Node, Node>,
}

impl NodeMapper {
    /// Returns all pairs `(old, new)` ordered by `old`
    pub fn pairs(&self) -> impl Iterator<Item = (Node, Node)> + '_ {
        self.old_to_new
            .iter()
            .map(|(&old, &new)| (old, new))
            .sorted_unstable()
    }

    /// Returns *true* if every edge of `first` is mapped onto an edge of `second`
    /// and both graphs have the same number of edges.
    pub fn is_edge_preserving<G1, G2>(&self, first: &G1, second: &G2) -> bool
    where
        G1: GraphEdgeList,
        G2: GraphEdgeList<EdgeType = G1::EdgeType>,
    {
        first.edges().count() == second.edges().count()
            && first.edges().all(|edge| {
                match (self.new_id_of(edge.from()), self.new_id_of(edge.to())) {
                    (Some(u), Some(v)) => second.contains_edge(&edge.with_endpoints(u, v)),
                    _ => false,
                }
            })
    }
}

impl NodeMapSetter for NodeMapper {
    fn with_capacity(n: NumNodes) -> Self {
        Self {
            new_to_old: FxHashMap::with_capacity_and_hasher(n as usize, Default::default()),
            old_to_new: FxHashMap::with_capacity_and_hasher(n as usize, Default::default()),
        }
    }

    fn map_node_to(&mut self, old: Node, new: Node) {
        let success = self.old_to_new.insert(old, new).is_none()
            && self.new_to_old.insert(new, old).is_none();
        assert!(success);
    }
}

impl NodeMapGetter for NodeMapper {
    fn new_id_of(&self, old: Node) -> Option<Node> {
        self.old_to_new.get(&old).copied()
    }

    fn old_id_of(&self, new: Node) -> Option<Node> {
        self.new_to_old.get(&new).copied()
    }

    fn len(&self) -> NumNodes {
        self.old_to_new.len() as NumNodes
    }
}

impl NodeMapInverse for NodeMapper {
    fn inverse(&self) -> Self {
        Self {
            old_to_new: self.new_to_old.clone(),
            new_to_old: self.old_to_new.clone(),
        }
    }
}

impl fmt::Debug for NodeMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}]",
            self.pairs().map(|(o, n)| format!("{o}<->{n}")).join(", ")
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::repr::*;

    #[test]
    fn map_and_invert() {
        let mut m = NodeMapper::with_capacity(10);
        assert!(m.is_empty());
        for x in 0..5 {
            m.map_node_to(2 * x, x);
            assert_eq!(m.len(), x + 1);
        }

        let result = (0..10).map(|x| m.new_id_of(x)).collect_vec();
        assert_eq!(
            result,
            [Some(0), None, Some(1), None, Some(2), None, Some(3), None, Some(4), None]
        );

        let inv = m.inverse();
        for i in 0..10 {
            assert_eq!(inv.new_id_of(i), m.old_id_of(i));
            assert_eq!(m.new_id_of(i), inv.old_id_of(i));
        }
    }

    #[test]
    fn format_lists_pairs() {
        let map = NodeMapper::from_sequence(&[(5, 4), (2, 3)]);
        assert_eq!(format!("{map:?}"), "[2<->3, 5<->4]");
    }

    #[test]
    #[should_panic]
    fn collision_on_new() {
        let mut map = NodeMapper::with_capacity(10);
        map.map_node_to(1, 3);
        map.map_node_to(2, 3);
    }

    #[test]
    fn relabelling_drops_unmapped_vertices() {
        let graph = UndirectedGraph::from_pairs([(0, 1), (1, 2), (2, 2)]).unwrap();

        let map = NodeMapper::from_sequence(&[(0, 20), (2, 10)]);
        let relabelled = map.relabelled_graph(&graph).unwrap();
        assert_eq!(relabelled.vertices().collect_vec(), vec![10, 20]);
        assert_eq!(relabelled.ordered_edges(), vec![GraphEdge::plain(10, 10)]);

        let map = NodeMapper::from_sequence(&[(0, 2), (1, 1), (2, 0)]);
        let relabelled = map.relabelled_graph(&graph).unwrap();
        assert!(map.is_edge_preserving(&graph, &relabelled));
        assert!(relabelled.has_self_loop(0));
    }
}
