/*!
Breadth-first traversal and the shortest-path utility derived from it.

Traversals follow edge orientation: in directed graphs only successors are visited.
The visited-state is kept in any [`Set<Node>`], so the search works on sparse vertex ids
(hash sets, the default) as well as on dense ones (bitsets).
*/

use super::*;
use fxhash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

/// Compact representation of `(predecessor, node)`.
///
/// The start vertex of a search has no predecessor, which is encoded by
/// setting both tuple entries to the same node value.
pub type PredecessorOfNode = (Node, Node);

/// Breadth-first search yielding every reachable vertex together with its parent in the
/// search tree
pub struct Bfs<'a, G, V = FxHashSet<Node>>
where
    G: DirectedAdjacencyList,
    V: Set<Node>,
{
    graph: &'a G,
    visited: V,
    queue: VecDeque<PredecessorOfNode>,
}

impl<'a, G, V> Bfs<'a, G, V>
where
    G: DirectedAdjacencyList,
    V: Set<Node> + Default,
{
    /// Creates a search starting at `start`.
    /// If `start` is not part of the graph the search yields only `start`.
    pub fn new(graph: &'a G, start: Node) -> Self {
        Self::with_visited(graph, start, V::default())
    }
}

impl<'a, G, V> Bfs<'a, G, V>
where
    G: DirectedAdjacencyList,
    V: Set<Node>,
{
    /// Creates a search starting at `start` that records visited vertices in `visited`.
    /// Vertices already contained in `visited` are never reported.
    pub fn with_visited(graph: &'a G, start: Node, mut visited: V) -> Self {
        visited.insert(start);
        Self {
            graph,
            visited,
            queue: VecDeque::from(vec![(start, start)]),
        }
    }

    /// Returns *true* if `u` was discovered so far
    pub fn did_visit_node(&self, u: Node) -> bool {
        self.visited.contains(&u)
    }
}

impl<G, V> Iterator for Bfs<'_, G, V>
where
    G: DirectedAdjacencyList,
    V: Set<Node>,
{
    type Item = PredecessorOfNode;

    fn next(&mut self) -> Option<Self::Item> {
        let popped = self.queue.pop_front()?;
        let u = popped.1;

        for v in self.graph.out_neighbors_of(u) {
            if self.visited.insert(v) {
                self.queue.push_back((u, v));
            }
        }

        Some(popped)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.queue.len(), None)
    }
}

/// Extension trait exposing traversals on all graphs with (out-)neighborhoods
pub trait Traversal: DirectedAdjacencyList + Sized {
    /// Returns a breadth-first search starting at `start`.
    ///
    /// # Example
    /// ```
    /// use sgraphs::{prelude::*, algo::*};
    ///
    /// let g = UndirectedGraph::from_pairs([(10, 20), (20, 30)]).unwrap();
    /// let order: Vec<Node> = g.bfs(10).map(|(_, u)| u).collect();
    /// assert_eq!(order, vec![10, 20, 30]);
    /// ```
    fn bfs(&self, start: Node) -> Bfs<'_, Self> {
        Bfs::new(self, start)
    }

    /// Returns *true* if a path from `u` to `v` exists
    fn is_reachable(&self, u: Node, v: Node) -> bool {
        self.has_vertex(u) && self.bfs(u).any(|(_, w)| w == v)
    }
}

impl<G> Traversal for G where G: DirectedAdjacencyList + Sized {}

/// Unweighted shortest paths
pub trait ShortestPath: Traversal {
    /// Returns a path `source, ..., target` with the fewest edges, following edge orientation
    /// in directed graphs. Returns `None` if `target` is unreachable or either vertex is not
    /// part of the graph.
    ///
    /// # Example
    /// ```
    /// use sgraphs::{prelude::*, algo::*};
    ///
    /// let g = DirectedGraph::from_pairs([(0, 1), (1, 2), (0, 3), (3, 2)]).unwrap();
    /// assert_eq!(g.shortest_path(0, 2), Some(vec![0, 1, 2]));
    /// assert_eq!(g.shortest_path(2, 0), None);
    /// ```
    fn shortest_path(&self, source: Node, target: Node) -> Option<Vec<Node>> {
        if !self.has_vertex(source) || !self.has_vertex(target) {
            return None;
        }
        if source == target {
            return Some(vec![source]);
        }

        let mut parent: FxHashMap<Node, Node> = FxHashMap::default();
        for (p, u) in self.bfs(source).skip(1) {
            Map::insert(&mut parent, u, p);
            if u != target {
                continue;
            }

            let mut path = vec![target];
            let mut node = target;
            while node != source {
                node = *Map::get(&parent, &node)?;
                path.push(node);
            }
            path.reverse();
            return Some(path);
        }

        None
    }
}

impl<G> ShortestPath for G where G: Traversal {}

#[cfg(test)]
mod test {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn bfs_order() {
        //  / 2 --- \
        // 1         4 - 3
        //  \ 0 - 5 /
        let graph =
            UndirectedGraph::from_pairs([(1, 2), (1, 0), (4, 3), (0, 5), (2, 4), (5, 4)]).unwrap();

        let order = graph.bfs(1).map(|(_, u)| u).collect_vec();
        assert_eq!(order, vec![1, 0, 2, 5, 4, 3]);

        let mut tree = graph.bfs(1).collect_vec();
        tree.sort_by_key(|&(_, u)| u);
        assert_eq!(tree, vec![(1, 0), (1, 1), (1, 2), (4, 3), (2, 4), (0, 5)]);
    }

    #[test]
    fn bfs_on_dense_ids() {
        let graph = DirectedGraph::from_pairs([(0, 1), (1, 2), (3, 0)]).unwrap();
        let mut bfs = Bfs::with_visited(&graph, 0, NodeBitSet::new(graph.number_of_nodes()));
        let order = bfs.by_ref().map(|(_, u)| u).collect_vec();
        assert_eq!(order, vec![0, 1, 2]);
        assert!(!bfs.did_visit_node(3));
    }

    #[test]
    fn shortest_paths() {
        let graph = UndirectedGraph::from_pairs([(0, 1), (1, 2), (2, 3), (0, 4), (4, 3)]).unwrap();
        assert_eq!(graph.shortest_path(0, 3), Some(vec![0, 4, 3]));
        assert_eq!(graph.shortest_path(3, 3), Some(vec![3]));
        assert_eq!(graph.shortest_path(0, 9), None);

        let mut graph = graph;
        graph.add_vertex(7).unwrap();
        assert_eq!(graph.shortest_path(0, 7), None);
        assert!(!graph.is_reachable(7, 0));
        assert!(graph.is_reachable(2, 4));
    }

    #[test]
    fn directed_paths_follow_orientation() {
        let graph = DirectedGraph::from_pairs([(5, 6), (6, 7), (7, 5)]).unwrap();
        assert_eq!(graph.shortest_path(5, 7), Some(vec![5, 6, 7]));
        assert_eq!(graph.shortest_path(7, 6), Some(vec![7, 5, 6]));
    }
}
