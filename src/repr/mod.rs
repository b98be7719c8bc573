/*!
# Graph Representations

- [`SparseGraph`] with its aliases [`UndirectedGraph`], [`DirectedGraph`], [`GenericGraph`] and
  [`GenericDirectedGraph`]: mutable graphs over sparse vertex ids, parameterized by the
  [`EdgeSet`] each vertex owns.
- [`DirectedMultigraph`]: directed graphs with typed parallel edges.
- [`SubgraphView`] / [`Subgraph`]: live views of a vertex subset of another graph.
- [`CompactGraph`]: immutable dense snapshots used by isomorphism tests and motif counters.
*/

mod compact;
mod edge_set;
mod graph;
mod multigraph;
mod subgraph;
mod typed_edge_set;

pub use compact::*;
pub use edge_set::{EdgeSet, GenericEdgeSet, SparseDirectedEdgeSet, SparseUndirectedEdgeSet};
pub use graph::*;
pub use multigraph::*;
pub use subgraph::*;
pub use typed_edge_set::*;

impl<S: EdgeSet> SubgraphBacking for SparseGraph<S> {}

impl<T> SubgraphBacking for CompactGraph<T> where T: Clone + Eq + std::hash::Hash + std::fmt::Debug {}
