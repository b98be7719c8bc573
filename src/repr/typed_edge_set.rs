/*!
# Typed Edge Sets

Storage for directed multigraphs: between two vertices there may be one edge per type label.
Labels are interned by a [`TypeInterner`] owned by the graph, so the edge sets only handle
small integer indices and keep one bitset of type indices per connected vertex.
*/

use std::{collections::BTreeSet, hash::Hash};

use fixedbitset::FixedBitSet;
use fxhash::FxHashMap;

use super::EdgeSet;
use crate::{edge::*, node::*};

/// Dense index of an interned edge type
pub type TypeIndex = u32;

/// Bidirectional mapping between edge type labels and dense [`TypeIndex`] values.
///
/// Indices are handed out in order of first appearance and are never recycled.
#[derive(Clone, Debug)]
pub struct TypeInterner<T> {
    types: Vec<T>,
    indices: FxHashMap<T, TypeIndex>,
}

impl<T> Default for TypeInterner<T> {
    fn default() -> Self {
        Self {
            types: Vec::new(),
            indices: FxHashMap::default(),
        }
    }
}

impl<T: Clone + Eq + Hash> TypeInterner<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the index of `t`, assigning the next free one if `t` is new
    pub fn intern(&mut self, t: &T) -> TypeIndex {
        if let Some(&index) = self.indices.get(t) {
            return index;
        }
        let index = self.types.len() as TypeIndex;
        self.types.push(t.clone());
        self.indices.insert(t.clone(), index);
        index
    }

    pub fn index_of(&self, t: &T) -> Option<TypeIndex> {
        self.indices.get(t).copied()
    }

    pub fn resolve(&self, index: TypeIndex) -> Option<&T> {
        self.types.get(index as usize)
    }

    /// Number of labels ever interned
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Directed edges labelled with a [`TypeIndex`].
///
/// For every vertex connected to the root the set keeps a bitset of the types of incoming and
/// outgoing edges. An additional ordered index of all connected vertices answers neighborhood
/// queries without touching the bitsets.
#[derive(Clone, Debug)]
pub struct SparseDirectedTypedEdgeSet {
    root: Node,
    incoming: FxHashMap<Node, FixedBitSet>,
    outgoing: FxHashMap<Node, FixedBitSet>,
    connected: BTreeSet<Node>,
    num_edges: usize,
}

fn set_type(map: &mut FxHashMap<Node, FixedBitSet>, v: Node, t: TypeIndex) -> bool {
    let bits = map.entry(v).or_default();
    bits.grow(t as usize + 1);
    !bits.put(t as usize)
}

fn unset_type(map: &mut FxHashMap<Node, FixedBitSet>, v: Node, t: TypeIndex) -> bool {
    let Some(bits) = map.get_mut(&v) else {
        return false;
    };
    if !bits.contains(t as usize) {
        return false;
    }
    bits.set(t as usize, false);
    if bits.is_clear() {
        map.remove(&v);
    }
    true
}

fn has_type(map: &FxHashMap<Node, FixedBitSet>, v: Node, t: TypeIndex) -> bool {
    map.get(&v).is_some_and(|bits| bits.contains(t as usize))
}

fn types_in(map: &FxHashMap<Node, FixedBitSet>, v: Node) -> impl Iterator<Item = TypeIndex> + '_ {
    map.get(&v)
        .into_iter()
        .flat_map(|bits| bits.ones().map(|t| t as TypeIndex))
}

impl SparseDirectedTypedEdgeSet {
    /// Types of all edges `root -> v` in increasing order
    pub fn types_to(&self, v: Node) -> impl Iterator<Item = TypeIndex> + '_ {
        types_in(&self.outgoing, v)
    }

    /// Types of all edges `v -> root` in increasing order
    pub fn types_from(&self, v: Node) -> impl Iterator<Item = TypeIndex> + '_ {
        types_in(&self.incoming, v)
    }

    fn forget_if_unconnected(&mut self, v: Node) {
        if !self.outgoing.contains_key(&v) && !self.incoming.contains_key(&v) {
            self.connected.remove(&v);
        }
    }
}

impl EdgeSet for SparseDirectedTypedEdgeSet {
    type EdgeType = TypeIndex;
    const DIRECTED: bool = true;
    const TYPED: bool = true;

    fn new(root: Node) -> Self {
        Self {
            root,
            incoming: FxHashMap::default(),
            outgoing: FxHashMap::default(),
            connected: BTreeSet::new(),
            num_edges: 0,
        }
    }

    fn root(&self) -> Node {
        self.root
    }

    fn supports(edge: &GraphEdge<TypeIndex>) -> bool {
        matches!(edge, GraphEdge::DirectedTyped(_, _))
    }

    fn add(&mut self, edge: &GraphEdge<TypeIndex>) -> bool {
        let GraphEdge::DirectedTyped(Edge(u, v), t) = *edge else {
            return false;
        };

        let (added, other) = if u == self.root {
            if v == self.root {
                set_type(&mut self.incoming, v, t);
            }
            (set_type(&mut self.outgoing, v, t), v)
        } else if v == self.root {
            (set_type(&mut self.incoming, u, t), u)
        } else {
            return false;
        };

        if added {
            self.num_edges += 1;
            self.connected.insert(other);
        }
        added
    }

    fn remove(&mut self, edge: &GraphEdge<TypeIndex>) -> bool {
        let GraphEdge::DirectedTyped(Edge(u, v), t) = *edge else {
            return false;
        };

        let (removed, other) = if u == self.root {
            if v == self.root {
                unset_type(&mut self.incoming, v, t);
            }
            (unset_type(&mut self.outgoing, v, t), v)
        } else if v == self.root {
            (unset_type(&mut self.incoming, u, t), u)
        } else {
            return false;
        };

        if removed {
            self.num_edges -= 1;
            self.forget_if_unconnected(other);
        }
        removed
    }

    fn contains(&self, edge: &GraphEdge<TypeIndex>) -> bool {
        let GraphEdge::DirectedTyped(Edge(u, v), t) = *edge else {
            return false;
        };

        if u == self.root {
            has_type(&self.outgoing, v, t)
        } else if v == self.root {
            has_type(&self.incoming, u, t)
        } else {
            false
        }
    }

    /// Typed sets have no untyped default edge
    fn connect(&mut self, _v: Node) -> bool {
        false
    }

    fn disconnect(&mut self, v: Node) -> bool {
        let outgoing = self.outgoing.remove(&v);
        let incoming = self.incoming.remove(&v);

        // self-loops are recorded in both maps but are single edges
        let removed = match (outgoing, incoming) {
            (Some(out), _) if v == self.root => out.count_ones(..),
            (out, inc) => {
                out.map_or(0, |bits| bits.count_ones(..)) + inc.map_or(0, |bits| bits.count_ones(..))
            }
        };

        self.connected.remove(&v);
        self.num_edges -= removed;
        removed > 0
    }

    fn connects(&self, v: Node) -> bool {
        self.connected.contains(&v)
    }

    fn edges_to(&self, v: Node) -> impl Iterator<Item = GraphEdge<TypeIndex>> + '_ {
        let root = self.root;
        let outgoing = self
            .types_to(v)
            .map(move |t| GraphEdge::DirectedTyped(Edge(root, v), t));
        let incoming = self
            .types_from(v)
            .filter(move |_| v != root)
            .map(move |t| GraphEdge::DirectedTyped(Edge(v, root), t));
        outgoing.chain(incoming)
    }

    fn connected(&self) -> impl Iterator<Item = Node> + '_ {
        self.connected.iter().copied()
    }

    fn successors(&self) -> impl Iterator<Item = Node> + '_ {
        self.connected
            .iter()
            .copied()
            .filter(move |v| self.outgoing.contains_key(v))
    }

    fn predecessors(&self) -> impl Iterator<Item = Node> + '_ {
        self.connected
            .iter()
            .copied()
            .filter(move |v| self.incoming.contains_key(v))
    }

    fn has_successor(&self, v: Node) -> bool {
        self.outgoing.contains_key(&v)
    }

    fn edges(&self) -> impl Iterator<Item = GraphEdge<TypeIndex>> + '_ {
        self.connected.iter().flat_map(move |&v| self.edges_to(v))
    }

    fn len(&self) -> usize {
        self.num_edges
    }

    fn degree(&self) -> NumNodes {
        self.connected.len() as NumNodes
    }

    fn out_degree(&self) -> NumNodes {
        self.outgoing.len() as NumNodes
    }

    fn in_degree(&self) -> NumNodes {
        self.incoming.len() as NumNodes
    }
}
