/*!
# Edge Representation

An [`Edge`] is a plain pair of endpoints. What an edge *means* is carried by [`GraphEdge`],
a tagged variant over the capability combinations the engine supports:

| Variant | directed | typed | weighted |
|---|---|---|---|
| [`GraphEdge::Plain`] | | | |
| [`GraphEdge::Directed`] | x | | |
| [`GraphEdge::Typed`] | | x | |
| [`GraphEdge::DirectedTyped`] | x | x | |
| [`GraphEdge::Weighted`] | | | x |
| [`GraphEdge::DirectedWeighted`] | x | | x |
| [`GraphEdge::DirectedTypedWeighted`] | x | x | x |

Two `GraphEdge`s are equal iff they agree on directedness, on their endpoints (as an unordered
pair for undirected edges) and on their type. Weights never take part in equality or hashing,
so a graph holds at most one weighted edge per endpoint pair.
*/

use std::{
    fmt::{Debug, Display},
    hash::{Hash, Hasher},
};

use crate::node::*;

/// An edge is defined by two nodes/endpoints.
/// Is is up to the user (or the wrapping [`GraphEdge`]) whether an Edge is directed or not.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge(pub Node, pub Node);

/// We limit the number of edges to `2^32 - 1`.
pub type NumEdges = u32;

impl Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.0, self.1)
    }
}

impl Debug for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as Display>::fmt(self, f)
    }
}

impl Edge {
    /// Normalizes the edge such that the endpoint with smaller value comes first
    pub fn normalized(&self) -> Self {
        Edge(self.0.min(self.1), self.0.max(self.1))
    }

    /// Returns true if the endpoint with smaller index comes first
    pub fn is_normalized(&self) -> bool {
        self.0 <= self.1
    }

    /// Returns true if both endpoints are equal
    pub fn is_loop(&self) -> bool {
        self.0 == self.1
    }

    /// Reverses the edge by switching the endpoints
    pub fn reverse(&self) -> Self {
        Edge(self.1, self.0)
    }

    /// Returns *true* if `u` is one of the endpoints
    pub fn touches(&self, u: Node) -> bool {
        self.0 == u || self.1 == u
    }

    /// Returns the endpoint opposite to `u` or `None` if `u` is not an endpoint.
    /// For self-loops `(u, u)` this returns `Some(u)`.
    pub fn opposite(&self, u: Node) -> Option<Node> {
        if self.0 == u {
            Some(self.1)
        } else if self.1 == u {
            Some(self.0)
        } else {
            None
        }
    }
}

impl From<(Node, Node)> for Edge {
    fn from(value: (Node, Node)) -> Self {
        Edge(value.0, value.1)
    }
}

impl From<&(Node, Node)> for Edge {
    fn from(value: &(Node, Node)) -> Self {
        Edge(value.0, value.1)
    }
}

impl From<&Edge> for Edge {
    fn from(value: &Edge) -> Self {
        *value
    }
}

/// An immutable edge value with optional direction, type label and weight.
///
/// `T` is the type label; graphs without labels use `()`.
#[derive(Clone, Debug)]
pub enum GraphEdge<T = ()> {
    Plain(Edge),
    Directed(Edge),
    Typed(Edge, T),
    DirectedTyped(Edge, T),
    Weighted(Edge, f64),
    DirectedWeighted(Edge, f64),
    DirectedTypedWeighted(Edge, T, f64),
}

impl<T> GraphEdge<T> {
    /// Undirected, untyped edge `{u, v}`
    pub fn plain(u: Node, v: Node) -> Self {
        Self::Plain(Edge(u, v))
    }

    /// Directed, untyped edge `u -> v`
    pub fn directed(u: Node, v: Node) -> Self {
        Self::Directed(Edge(u, v))
    }

    /// Undirected edge `{u, v}` labelled with `t`
    pub fn typed(u: Node, v: Node, t: T) -> Self {
        Self::Typed(Edge(u, v), t)
    }

    /// Directed edge `u -> v` labelled with `t`
    pub fn directed_typed(u: Node, v: Node, t: T) -> Self {
        Self::DirectedTyped(Edge(u, v), t)
    }

    /// Undirected edge `{u, v}` with weight `w`
    pub fn weighted(u: Node, v: Node, w: f64) -> Self {
        Self::Weighted(Edge(u, v), w)
    }

    /// Directed edge `u -> v` with weight `w`
    pub fn directed_weighted(u: Node, v: Node, w: f64) -> Self {
        Self::DirectedWeighted(Edge(u, v), w)
    }

    /// Directed edge `u -> v` labelled with `t` and weight `w`
    pub fn directed_typed_weighted(u: Node, v: Node, t: T, w: f64) -> Self {
        Self::DirectedTypedWeighted(Edge(u, v), t, w)
    }

    /// Returns the endpoints as stored (`from`, `to`)
    pub fn endpoints(&self) -> Edge {
        match self {
            Self::Plain(e)
            | Self::Directed(e)
            | Self::Typed(e, _)
            | Self::DirectedTyped(e, _)
            | Self::Weighted(e, _)
            | Self::DirectedWeighted(e, _)
            | Self::DirectedTypedWeighted(e, _, _) => *e,
        }
    }

    fn endpoints_mut(&mut self) -> &mut Edge {
        match self {
            Self::Plain(e)
            | Self::Directed(e)
            | Self::Typed(e, _)
            | Self::DirectedTyped(e, _)
            | Self::Weighted(e, _)
            | Self::DirectedWeighted(e, _)
            | Self::DirectedTypedWeighted(e, _, _) => e,
        }
    }

    /// Source of the edge (an arbitrary but fixed endpoint for undirected edges)
    pub fn from(&self) -> Node {
        self.endpoints().0
    }

    /// Target of the edge (an arbitrary but fixed endpoint for undirected edges)
    pub fn to(&self) -> Node {
        self.endpoints().1
    }

    pub fn is_directed(&self) -> bool {
        matches!(
            self,
            Self::Directed(_)
                | Self::DirectedTyped(_, _)
                | Self::DirectedWeighted(_, _)
                | Self::DirectedTypedWeighted(_, _, _)
        )
    }

    pub fn is_typed(&self) -> bool {
        self.edge_type().is_some()
    }

    pub fn is_weighted(&self) -> bool {
        self.weight().is_some()
    }

    /// Returns the type label if the edge carries one
    pub fn edge_type(&self) -> Option<&T> {
        match self {
            Self::Typed(_, t) | Self::DirectedTyped(_, t) | Self::DirectedTypedWeighted(_, t, _) => {
                Some(t)
            }
            _ => None,
        }
    }

    /// Returns the weight if the edge carries one
    pub fn weight(&self) -> Option<f64> {
        match self {
            Self::Weighted(_, w) | Self::DirectedWeighted(_, w) | Self::DirectedTypedWeighted(_, _, w) => {
                Some(*w)
            }
            _ => None,
        }
    }

    /// Returns true if both endpoints are equal
    pub fn is_loop(&self) -> bool {
        self.endpoints().is_loop()
    }

    /// Returns *true* if `u` is one of the endpoints
    pub fn touches(&self, u: Node) -> bool {
        self.endpoints().touches(u)
    }

    /// Returns the endpoint opposite to `u` (see [`Edge::opposite`])
    pub fn opposite(&self, u: Node) -> Option<Node> {
        self.endpoints().opposite(u)
    }

    /// The endpoint pair identifying this edge: normalized if undirected, as stored otherwise.
    pub fn key(&self) -> Edge {
        if self.is_directed() {
            self.endpoints()
        } else {
            self.endpoints().normalized()
        }
    }

    /// Returns a copy of this edge between `from` and `to` keeping every other attribute.
    /// Used to project edges in and out of renumbered vertex spaces.
    pub fn with_endpoints(&self, from: Node, to: Node) -> Self
    where
        T: Clone,
    {
        let mut edge = self.clone();
        *edge.endpoints_mut() = Edge(from, to);
        edge
    }

    /// Returns a copy of this edge with `from` and `to` swapped
    pub fn flipped(&self) -> Self
    where
        T: Clone,
    {
        self.with_endpoints(self.to(), self.from())
    }

    /// Replaces the type label, keeping endpoints, direction and weight.
    /// Untyped edges are converted as they are.
    pub fn map_type<U>(self, f: impl FnOnce(T) -> U) -> GraphEdge<U> {
        match self {
            Self::Plain(e) => GraphEdge::Plain(e),
            Self::Directed(e) => GraphEdge::Directed(e),
            Self::Typed(e, t) => GraphEdge::Typed(e, f(t)),
            Self::DirectedTyped(e, t) => GraphEdge::DirectedTyped(e, f(t)),
            Self::Weighted(e, w) => GraphEdge::Weighted(e, w),
            Self::DirectedWeighted(e, w) => GraphEdge::DirectedWeighted(e, w),
            Self::DirectedTypedWeighted(e, t, w) => GraphEdge::DirectedTypedWeighted(e, f(t), w),
        }
    }

    /// Like [`GraphEdge::map_type`] but the label conversion may fail
    pub fn try_map_type<U>(self, f: impl FnOnce(T) -> Option<U>) -> Option<GraphEdge<U>> {
        Some(match self {
            Self::Plain(e) => GraphEdge::Plain(e),
            Self::Directed(e) => GraphEdge::Directed(e),
            Self::Typed(e, t) => GraphEdge::Typed(e, f(t)?),
            Self::DirectedTyped(e, t) => GraphEdge::DirectedTyped(e, f(t)?),
            Self::Weighted(e, w) => GraphEdge::Weighted(e, w),
            Self::DirectedWeighted(e, w) => GraphEdge::DirectedWeighted(e, w),
            Self::DirectedTypedWeighted(e, t, w) => GraphEdge::DirectedTypedWeighted(e, f(t)?, w),
        })
    }
}

impl<T: PartialEq> PartialEq for GraphEdge<T> {
    fn eq(&self, other: &Self) -> bool {
        self.is_directed() == other.is_directed()
            && self.key() == other.key()
            && self.edge_type() == other.edge_type()
    }
}

impl<T: Eq> Eq for GraphEdge<T> {}

impl<T: Hash> Hash for GraphEdge<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.is_directed().hash(state);
        self.key().hash(state);
        self.edge_type().hash(state);
    }
}

impl<T: Debug> Display for GraphEdge<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Edge(u, v) = self.endpoints();
        if self.is_directed() {
            write!(f, "({u}->{v})")?;
        } else {
            write!(f, "({u},{v})")?;
        }
        if let Some(t) = self.edge_type() {
            write!(f, ":{t:?}")?;
        }
        if let Some(w) = self.weight() {
            write!(f, "[{w}]")?;
        }
        Ok(())
    }
}

impl From<Edge> for GraphEdge {
    fn from(value: Edge) -> Self {
        Self::Plain(value)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use fxhash::FxHashSet;

    #[test]
    fn undirected_equality_ignores_orientation() {
        assert_eq!(GraphEdge::<()>::plain(1, 2), GraphEdge::plain(2, 1));
        assert_eq!(GraphEdge::typed(1, 2, 'a'), GraphEdge::typed(2, 1, 'a'));
        assert_ne!(GraphEdge::typed(1, 2, 'a'), GraphEdge::typed(1, 2, 'b'));
    }

    #[test]
    fn directed_equality_includes_orientation() {
        assert_ne!(GraphEdge::<()>::directed(1, 2), GraphEdge::directed(2, 1));
        assert_ne!(GraphEdge::<()>::directed(1, 2), GraphEdge::plain(1, 2));
        assert_eq!(
            GraphEdge::directed_typed(1, 2, "x"),
            GraphEdge::directed_typed_weighted(1, 2, "x", 3.5)
        );
    }

    #[test]
    fn weights_do_not_affect_identity() {
        let mut set = FxHashSet::default();
        assert!(set.insert(GraphEdge::<()>::weighted(3, 4, 1.0)));
        assert!(!set.insert(GraphEdge::weighted(4, 3, 2.0)));
        assert!(!set.insert(GraphEdge::plain(3, 4)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn clone_with_endpoints_keeps_attributes() {
        let e = GraphEdge::directed_typed_weighted(1, 2, 7u8, 0.25);
        let moved = e.with_endpoints(10, 20);
        assert_eq!(moved.endpoints(), Edge(10, 20));
        assert_eq!(moved.edge_type(), Some(&7));
        assert_eq!(moved.weight(), Some(0.25));
        assert!(moved.is_directed());

        let flipped = e.flipped();
        assert_eq!(flipped.from(), 2);
        assert_eq!(flipped.to(), 1);
        assert_ne!(flipped, e);
    }

    #[test]
    fn opposite_endpoint() {
        let e = GraphEdge::<()>::plain(5, 9);
        assert_eq!(e.opposite(5), Some(9));
        assert_eq!(e.opposite(9), Some(5));
        assert_eq!(e.opposite(1), None);
        assert_eq!(GraphEdge::<()>::plain(4, 4).opposite(4), Some(4));
    }

    #[test]
    fn type_mapping() {
        let e = GraphEdge::directed_typed(0, 1, 3u32).map_type(|t| t * 2);
        assert_eq!(e.edge_type(), Some(&6));
        assert!(
            GraphEdge::typed(0, 1, 3u32)
                .try_map_type(|_| None::<u8>)
                .is_none()
        );
        assert_eq!(
            GraphEdge::<u32>::plain(0, 1).try_map_type(|_| None::<u8>),
            Some(GraphEdge::plain(0, 1))
        );
    }
}
