/*!
# Node Representation

We choose `Node = u32` as almost all use-cases involve less than `2^32` vertices.
Vertex ids are scoped to a single graph and may be sparse: a graph holding the vertices
`{3, 17, 4096}` is perfectly valid and never allocates space for the ids in between.
*/

use stream_bitset::bitset::BitSetImpl;

/// Vertices can be any unsigned integer from `0` to `Node::MAX - 1`
pub type Node = u32;

/// Node-Value that is considered invalid and is never accepted as a vertex
pub const INVALID_NODE: Node = Node::MAX;

/// There can be at most `2^32 - 1` vertices in a graph!
pub type NumNodes = Node;

/// BitSet for Nodes.
/// Only used on dense id spaces (see [`CompactGraph`](crate::repr::CompactGraph)).
pub type NodeBitSet = BitSetImpl<Node>;

/// Returns *true* if `u` may be used as a vertex id
#[inline]
pub const fn is_valid_node(u: Node) -> bool {
    u != INVALID_NODE
}
