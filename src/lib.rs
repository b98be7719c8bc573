/*!
`sgraphs` is a graph engine for **s**ubgraph and motif analysis on **s**parse graphs:
- directed and undirected graphs over sparse vertex ids, optionally with typed parallel edges,
- live subgraph views that stay consistent with their backing graph,
- VF2 isomorphism testing (structural or edge-type aware) with search limits,
- ESU / RAND-ESU enumeration of connected induced subgraphs,
- motif counters classifying subgraphs up to isomorphism.

# Representation

We represent **nodes** as `u32`. Ids do not have to be contiguous: a graph may contain the
vertices `3`, `17` and `4000` only. For **edges**, a tuple-struct `Edge(Node, Node)` holds the
endpoints, while the tagged [`GraphEdge`](crate::edge::GraphEdge) carries directedness, an
optional type label and an optional weight. Two edges are equal if they agree on directedness,
endpoints (unordered for undirected edges) and type; weights are ignored.

### Available Representations

See the [`repr`] module for all storage backends:

- [`UndirectedGraph`](crate::repr::UndirectedGraph) / [`DirectedGraph`](crate::repr::DirectedGraph)
  for untyped graphs,
- [`GenericGraph`](crate::repr::GenericGraph) / [`GenericDirectedGraph`](crate::repr::GenericDirectedGraph)
  accepting any edge of the right orientation,
- [`DirectedMultigraph`](crate::repr::DirectedMultigraph) for typed parallel edges,
- [`SubgraphView`](crate::repr::SubgraphView) selecting a vertex subset of another graph,
- [`CompactGraph`](crate::repr::CompactGraph), a dense immutable snapshot.

# Design

All algorithms are provided as configurable structs that one can alter to their needs using the
*Builder* / *Setter* pattern before running them on a graph.
The most commonly used functionality is additionally implemented via traits on the graph itself,
making it usable without configuring the algorithm beforehand:

```
use sgraphs::{prelude::*, algo::*};

let graph = UndirectedGraph::from_pairs([(0, 1), (1, 2), (2, 0), (2, 3)]).unwrap();

let mut counter: MotifCounter = MotifCounter::new();
counter.count_subgraphs(&graph, 3).unwrap();

assert_eq!(counter.len(), 2);
assert_eq!(counter.sum(), 3);
```

Fallible operations return [`GraphResult`](crate::error::GraphResult); redundant mutations (adding
an existing edge, removing a missing vertex) return `false` instead of failing.
The library logs through the [`log`] facade and never installs a logger itself.

# Usage

- [`prelude`] includes definitions for nodes, edges, errors, basic graph operations, and all graph representations,
- [`algo`] includes isomorphism testing, subgraph enumeration, motif counting, degree-preserving shuffling and BFS,
- [`io`] reads and writes `(u, v[, type])` triple streams,
- [`utils`] includes helper traits and structs such as `NodeMapper` and the `Indexer` for named vertices.

In most use-cases, `use sgraphs::{prelude::*, algo::*};` suffices for your needs.
*/

pub mod algo;
pub mod edge;
pub mod error;
pub mod io;
pub mod node;
pub mod ops;
pub mod repr;
pub(crate) mod testing;
pub mod utils;

/// `sgraphs::prelude` includes definitions for nodes, edges and errors, all basic graph operation traits as well as all implemented representations.
pub mod prelude {
    pub use super::{edge::*, error::*, node::*, ops::*, repr::*};
}
