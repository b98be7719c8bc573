/*!
# Motif Counting

A [`MotifCounter`] accumulates how often each isomorphism class of (small) graphs was
observed. Every class is represented by the [`CompactGraph`] snapshot of its first
occurrence. A new graph is compared against the representatives with an
[`IsomorphismTester`], but only against those sharing the same cheap [`MotifInvariant`]
(order and size for plain graphs, the edge-type profile for typed ones).

A counter created [`with_motifs`](MotifCounter::with_motifs) has a fixed vocabulary: graphs of
unknown classes are rejected (they still count towards [`sum`](MotifCounter::sum)).

# Example
```
use sgraphs::{prelude::*, algo::*};

let graph = UndirectedGraph::from_pairs([(0, 1), (1, 2), (2, 0), (2, 3)]).unwrap();

let mut counter: MotifCounter = MotifCounter::new();
counter.count_subgraphs(&graph, 3).unwrap();

// one triangle and two paths
assert_eq!(counter.len(), 2);
assert_eq!(counter.sum(), 3);
assert_eq!(counter.max(), Some(2));
```
*/

use super::*;
use fxhash::FxHashMap;
use log::debug;
use std::{fmt::Debug, hash::Hash};

/// Cheap isomorphism invariant used to group motif representatives
pub trait MotifInvariant<T> {
    type Key: Clone + Eq + Hash + Debug;

    fn key(&self, graph: &CompactGraph<T>) -> Self::Key;
}

/// Groups graphs by number of vertices and edges
#[derive(Clone, Copy, Debug, Default)]
pub struct OrderAndSize;

impl<T> MotifInvariant<T> for OrderAndSize {
    type Key = (NumNodes, NumEdges);

    fn key(&self, graph: &CompactGraph<T>) -> Self::Key {
        (graph.number_of_nodes(), graph.number_of_edges())
    }
}

/// Groups graphs by number of vertices and edges, and the multiset of their edge types
#[derive(Clone, Copy, Debug, Default)]
pub struct TypeProfile;

impl<T> MotifInvariant<T> for TypeProfile
where
    T: Clone + Ord + Hash + Debug,
{
    type Key = (NumNodes, NumEdges, Vec<(T, usize)>);

    fn key(&self, graph: &CompactGraph<T>) -> Self::Key {
        let profile = graph
            .edge_types()
            .cloned()
            .counts()
            .into_iter()
            .sorted_unstable()
            .collect();
        (graph.number_of_nodes(), graph.number_of_edges(), profile)
    }
}

/// A class of isomorphic graphs together with its number of occurrences
#[derive(Clone, Debug)]
pub struct Motif<T> {
    representative: CompactGraph<T>,
    count: u64,
}

impl<T> Motif<T> {
    /// Snapshot of the first graph of this class
    pub fn representative(&self) -> &CompactGraph<T> {
        &self.representative
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

/// Counts occurrences per isomorphism class
#[derive(Clone, Debug)]
pub struct MotifCounter<T = (), I = Vf2Tester, K = OrderAndSize>
where
    K: MotifInvariant<T>,
{
    tester: I,
    invariant: K,
    motifs: Vec<Motif<T>>,
    classes: FxHashMap<K::Key, Vec<usize>>,
    sum: u64,
    fixed: bool,
}

/// Counter distinguishing edge types
pub type TypedMotifCounter<T> = MotifCounter<T, TypedVf2Tester, TypeProfile>;

impl<T, I, K> Default for MotifCounter<T, I, K>
where
    T: Clone + Eq + Hash + Debug,
    I: IsomorphismTester<T> + Default,
    K: MotifInvariant<T> + Default,
{
    fn default() -> Self {
        Self::with_tester(I::default())
    }
}

impl<T, I, K> MotifCounter<T, I, K>
where
    T: Clone + Eq + Hash + Debug,
    I: IsomorphismTester<T>,
    K: MotifInvariant<T>,
{
    pub fn new() -> Self
    where
        I: Default,
        K: Default,
    {
        Self::default()
    }

    /// Creates a counter comparing graphs with `tester` (e.g. to bound its search)
    pub fn with_tester(tester: I) -> Self
    where
        K: Default,
    {
        Self {
            tester,
            invariant: K::default(),
            motifs: Vec::new(),
            classes: FxHashMap::default(),
            sum: 0,
            fixed: false,
        }
    }

    /// Restricts the counter to the classes of `motifs` (each starting with count `0`).
    /// Graphs of any other class are rejected from now on.
    pub fn with_motifs<'a, G>(mut self, motifs: impl IntoIterator<Item = &'a G>) -> GraphResult<Self>
    where
        G: GraphEdgeList<EdgeType = T> + 'a,
    {
        for motif in motifs {
            let snapshot = CompactGraph::from_graph(motif);
            let (key, class) = self.classify(&snapshot)?;
            if class.is_none() {
                self.insert(key, snapshot, 0);
            }
        }
        self.fixed = true;
        Ok(self)
    }

    /// Returns *true* if unknown classes are rejected
    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    /// Counts one occurrence of `graph` and returns the new count of its class
    /// (`0` if the class was rejected).
    pub fn count<G>(&mut self, graph: &G) -> GraphResult<u64>
    where
        G: GraphEdgeList<EdgeType = T>,
    {
        self.count_many(graph, 1)
    }

    /// Counts `n` occurrences of `graph` and returns the new count of its class
    /// (`0` if the class was rejected).
    ///
    /// Fails with [`GraphError::InvalidCount`] if `n == 0`; an interrupted isomorphism test
    /// leaves the counter unchanged.
    pub fn count_many<G>(&mut self, graph: &G, n: u64) -> GraphResult<u64>
    where
        G: GraphEdgeList<EdgeType = T>,
    {
        if n == 0 {
            return Err(GraphError::InvalidCount);
        }
        let count = self.add(CompactGraph::from_graph(graph), n)?;
        self.sum += n;
        Ok(count)
    }

    /// Binds every view to `graph` and counts it; returns the number of counted views
    pub fn count_all<G>(
        &mut self,
        graph: &G,
        views: impl IntoIterator<Item = SubgraphView<T>>,
    ) -> GraphResult<u64>
    where
        G: SubgraphBacking<EdgeType = T>,
    {
        let mut counted = 0;
        for mut view in views {
            self.count(&view.bind(graph))?;
            counted += 1;
        }
        Ok(counted)
    }

    /// Counts every connected subgraph of `graph` with `size` vertices
    pub fn count_subgraphs<G>(&mut self, graph: &G, size: usize) -> GraphResult<u64>
    where
        G: SubgraphBacking<EdgeType = T>,
    {
        self.count_all(graph, graph.connected_subgraphs(size)?)
    }

    /// Number of occurrences of the class of `graph`
    pub fn get_count<G>(&self, graph: &G) -> GraphResult<u64>
    where
        G: GraphEdgeList<EdgeType = T>,
    {
        let (_, class) = self.classify(&CompactGraph::from_graph(graph))?;
        Ok(class.map_or(0, |i| self.motifs[i].count))
    }

    /// Share of the class of `graph` among all counted occurrences
    pub fn frequency<G>(&self, graph: &G) -> GraphResult<f64>
    where
        G: GraphEdgeList<EdgeType = T>,
    {
        if self.sum == 0 {
            return Ok(0.0);
        }
        Ok(self.get_count(graph)? as f64 / self.sum as f64)
    }

    /// Adds the counts of `other` to this counter
    pub fn merge(&mut self, other: &Self) -> GraphResult<()> {
        for motif in other.motifs.iter().filter(|m| m.count > 0) {
            self.add(motif.representative.clone(), motif.count)?;
        }
        self.sum += other.sum;
        Ok(())
    }

    /// Drops all counts. A fixed vocabulary is kept (with counts `0`).
    pub fn reset(&mut self) {
        if self.fixed {
            self.motifs.iter_mut().for_each(|m| m.count = 0);
        } else {
            self.motifs.clear();
            self.classes.clear();
        }
        self.sum = 0;
    }

    fn classify(&self, graph: &CompactGraph<T>) -> GraphResult<(K::Key, Option<usize>)> {
        let key = self.invariant.key(graph);
        if let Some(candidates) = self.classes.get(&key) {
            for &i in candidates {
                if self
                    .tester
                    .try_find_compact(&self.motifs[i].representative, graph)?
                    .is_some()
                {
                    return Ok((key, Some(i)));
                }
            }
        }
        Ok((key, None))
    }

    fn add(&mut self, graph: CompactGraph<T>, n: u64) -> GraphResult<u64> {
        let (key, class) = self.classify(&graph)?;
        match class {
            Some(i) => {
                self.motifs[i].count += n;
                Ok(self.motifs[i].count)
            }
            None if self.fixed => Ok(0),
            None => {
                self.insert(key, graph, n);
                Ok(n)
            }
        }
    }

    fn insert(&mut self, key: K::Key, representative: CompactGraph<T>, count: u64) {
        let index = self.motifs.len();
        debug!(
            "new motif class #{index} with {} vertices and {} edges",
            representative.number_of_nodes(),
            representative.number_of_edges()
        );
        self.classes.entry(key).or_default().push(index);
        self.motifs.push(Motif {
            representative,
            count,
        });
    }
}

impl<T, I, K> MotifCounter<T, I, K>
where
    K: MotifInvariant<T>,
{
    /// All classes in order of their first occurrence
    pub fn motifs(&self) -> &[Motif<T>] {
        &self.motifs
    }

    /// Returns `(representative, count)` of all classes
    pub fn items(&self) -> impl Iterator<Item = (&CompactGraph<T>, u64)> + '_ {
        self.motifs.iter().map(|m| (&m.representative, m.count))
    }

    /// Largest count of any class
    pub fn max(&self) -> Option<u64> {
        self.motifs.iter().map(|m| m.count).max()
    }

    /// Smallest count of any class
    pub fn min(&self) -> Option<u64> {
        self.motifs.iter().map(|m| m.count).min()
    }

    /// Number of classes
    pub fn len(&self) -> usize {
        self.motifs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.motifs.is_empty()
    }

    /// Number of all counted occurrences, including rejected ones
    pub fn sum(&self) -> u64 {
        self.sum
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use itertools::Itertools;

    fn triangle() -> UndirectedGraph {
        UndirectedGraph::from_pairs([(0, 1), (1, 2), (2, 0)]).unwrap()
    }

    fn path(offset: Node) -> UndirectedGraph {
        UndirectedGraph::from_pairs([(offset, offset + 1), (offset + 1, offset + 2)]).unwrap()
    }

    #[test]
    fn repeated_and_isomorphic_counts_agree() {
        let mut same: MotifCounter = MotifCounter::new();
        let mut distinct: MotifCounter = MotifCounter::new();
        let mut batched: MotifCounter = MotifCounter::new();

        let graph = path(0);
        for i in 0..5 {
            same.count(&graph).unwrap();
            distinct.count(&path(10 * i)).unwrap();
        }
        batched.count_many(&graph, 5).unwrap();

        for counter in [&same, &distinct, &batched] {
            assert_eq!(counter.len(), 1);
            assert_eq!(counter.get_count(&graph).unwrap(), 5);
            assert_eq!(counter.sum(), 5);
        }
        assert_eq!(batched.count_many(&graph, 0), Err(GraphError::InvalidCount));
    }

    #[test]
    fn counts_enumerated_subgraphs() {
        let _ = env_logger::builder()
            .filter_level(log::LevelFilter::Trace)
            .is_test(true)
            .try_init();

        let graph = UndirectedGraph::from_pairs([
            (1, 2),
            (1, 3),
            (1, 4),
            (1, 5),
            (2, 3),
            (2, 6),
            (2, 7),
            (3, 8),
            (3, 9),
        ])
        .unwrap();

        let mut counter: MotifCounter = MotifCounter::new();
        assert_eq!(counter.count_subgraphs(&graph, 3).unwrap(), 16);

        assert_eq!(counter.len(), 2);
        assert_eq!(counter.sum(), 16);
        assert_eq!(counter.max(), Some(15));
        assert_eq!(counter.min(), Some(1));
        assert_eq!(counter.get_count(&triangle()).unwrap(), 1);
        assert_eq!(counter.frequency(&triangle()).unwrap(), 1.0 / 16.0);
        assert_eq!(
            counter.items().map(|(g, c)| (g.number_of_edges(), c)).sorted().collect_vec(),
            vec![(2, 15), (3, 1)]
        );
    }

    #[test]
    fn fixed_vocabulary_rejects_unknown_classes() {
        let mut counter: MotifCounter = MotifCounter::new()
            .with_motifs([&triangle(), &triangle()])
            .unwrap();
        assert!(counter.is_fixed());
        assert_eq!(counter.len(), 1);
        assert_eq!(counter.max(), Some(0));

        assert_eq!(counter.count(&path(0)).unwrap(), 0);
        assert_eq!(counter.count(&triangle()).unwrap(), 1);
        assert_eq!(counter.len(), 1);
        assert_eq!(counter.sum(), 2);
        assert_eq!(counter.get_count(&path(0)).unwrap(), 0);
        assert_eq!(counter.frequency(&triangle()).unwrap(), 0.5);

        counter.reset();
        assert_eq!(counter.len(), 1);
        assert_eq!(counter.sum(), 0);
        assert_eq!(counter.frequency(&triangle()).unwrap(), 0.0);
    }

    #[test]
    fn merge_and_reset() {
        let mut left: MotifCounter = MotifCounter::new();
        left.count_many(&triangle(), 2).unwrap();

        let mut right: MotifCounter = MotifCounter::new();
        right.count(&path(3)).unwrap();
        right.count(&triangle()).unwrap();

        left.merge(&right).unwrap();
        assert_eq!(left.len(), 2);
        assert_eq!(left.sum(), 4);
        assert_eq!(left.get_count(&triangle()).unwrap(), 3);
        assert_eq!(left.get_count(&path(0)).unwrap(), 1);

        left.reset();
        assert!(left.is_empty());
        assert_eq!(left.max(), None);
    }

    #[test]
    fn typed_counter_separates_types() {
        let mut graph = DirectedMultigraph::new();
        graph.add_edge(0, 1, 'a').unwrap();
        graph.add_edge(1, 2, 'a').unwrap();
        graph.add_edge(2, 3, 'b').unwrap();
        graph.add_edge(3, 4, 'b').unwrap();

        let mut typed: TypedMotifCounter<char> = TypedMotifCounter::new();
        typed.count_subgraphs(&graph, 2).unwrap();
        assert_eq!(typed.len(), 2);
        assert_eq!(typed.max(), Some(2));

        let mut plain: MotifCounter<char> = MotifCounter::new();
        plain.count_subgraphs(&graph, 2).unwrap();
        assert_eq!(plain.len(), 1);
        assert_eq!(plain.max(), Some(4));

        let mut chains: TypedMotifCounter<char> = TypedMotifCounter::new();
        chains.count_subgraphs(&graph, 3).unwrap();
        assert_eq!(chains.sum(), 3);
        // a-a, a-b and b-b chains
        assert_eq!(chains.len(), 3);
    }

    #[test]
    fn interrupted_tests_leave_counter_unchanged() {
        let tester = Vf2Tester::default().with_limits(SearchLimits::default().with_max_states(0));
        let mut counter: MotifCounter = MotifCounter::with_tester(tester);

        assert_eq!(counter.count(&triangle()).unwrap(), 1);
        assert!(matches!(
            counter.count(&triangle()),
            Err(GraphError::Interrupted(_))
        ));
        assert_eq!(counter.sum(), 1);
        assert_eq!(counter.max(), Some(1));
    }
}
