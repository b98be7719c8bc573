/*!
# Connected Subgraph Enumeration

Wernicke's ESU algorithm enumerates every connected, induced subgraph with exactly `k`
vertices exactly once. Starting from each vertex `v` in increasing order, a subgraph is
grown by vertices from an *extension* set. A vertex `w` taken from the extension only
contributes those neighbors that are larger than `v` and *exclusive* to `w` (neither part of
the current subgraph nor adjacent to it); this is what prevents duplicates.

RAND-ESU explores only a random part of the enumeration tree: the root `v` is kept with
probability `p[0]`, and of the children of a subgraph with `d` vertices, `|children| * p[d]`
are explored (rounded up or down at random so that the expectation is exact). With all
probabilities `1.0` RAND-ESU equals ESU.

The recursion runs on an explicit stack inside an [`EsuCursor`]. The cursor does not borrow
the graph, so an enumeration can be suspended and continued later; continuing after the
vertex set of the graph changed fails with [`GraphError::StaleIteration`].
[`SubgraphIterator`] wraps a cursor together with a borrowed graph.

# Example
```
use sgraphs::{prelude::*, algo::*};

let square = UndirectedGraph::from_pairs([(0, 1), (1, 2), (2, 3), (3, 0)]).unwrap();
assert_eq!(square.connected_subgraphs(2).unwrap().count(), 4);
assert_eq!(square.connected_subgraphs(3).unwrap().count(), 4);
```
*/

use super::*;
use fixedbitset::FixedBitSet;
use log::debug;
use rand::Rng;

/// Decides which parts of the enumeration tree are explored
pub trait ExtensionSampler {
    /// Returns *true* if the enumeration rooted at the next vertex is explored
    fn keep_root(&mut self) -> bool;

    /// Selects which of the `children` extensions of a subgraph with `size` vertices are
    /// explored. `None` explores all of them.
    fn select(&mut self, size: usize, children: usize) -> Option<FixedBitSet>;
}

/// Explores the complete enumeration tree
#[derive(Clone, Copy, Debug, Default)]
pub struct Exhaustive;

impl ExtensionSampler for Exhaustive {
    fn keep_root(&mut self) -> bool {
        true
    }

    fn select(&mut self, _: usize, _: usize) -> Option<FixedBitSet> {
        None
    }
}

/// Explores each level of the enumeration tree with its own probability
#[derive(Clone, Debug)]
pub struct RandomSampler<R: Rng> {
    probabilities: Vec<f64>,
    rng: R,
}

impl<R: Rng> RandomSampler<R> {
    /// Creates a sampler for subgraphs with `size` vertices.
    ///
    /// Fails if there is not exactly one probability per level or a probability lies
    /// outside of `(0, 1]`.
    pub fn new(size: usize, probabilities: Vec<f64>, rng: R) -> GraphResult<Self> {
        if probabilities.len() != size {
            return Err(GraphError::ProbabilityCount {
                expected: size,
                actual: probabilities.len(),
            });
        }
        if let Some((depth, &value)) = probabilities
            .iter()
            .enumerate()
            .find(|&(_, &p)| !(p.is_valid_probability() && p > 0.0))
        {
            return Err(GraphError::InvalidProbability { depth, value });
        }

        Ok(Self { probabilities, rng })
    }

    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }
}

impl<R: Rng> ExtensionSampler for RandomSampler<R> {
    fn keep_root(&mut self) -> bool {
        let p = self.probabilities[0];
        p >= 1.0 || self.rng.random_bool(p)
    }

    fn select(&mut self, size: usize, children: usize) -> Option<FixedBitSet> {
        let p = self.probabilities[size];
        if p >= 1.0 {
            return None;
        }

        let expected = children as f64 * p;
        let mut amount = expected.floor() as usize;
        let fraction = expected - expected.floor();
        if fraction > 0.0 && self.rng.random_bool(fraction) {
            amount += 1;
        }

        let mut selection = FixedBitSet::with_capacity(children);
        for i in rand::seq::index::sample(&mut self.rng, children, amount.min(children)) {
            selection.insert(i);
        }
        Some(selection)
    }
}

/// One node of the enumeration tree whose children are not fully explored yet
#[derive(Clone, Debug)]
struct Frame {
    subgraph: Vec<Node>,
    /// Children are taken from the back; the selection is indexed by position
    extension: Vec<Node>,
    selection: Option<FixedBitSet>,
    root: Node,
}

/// Detached state of an ESU / RAND-ESU enumeration
#[derive(Clone, Debug)]
pub struct EsuCursor<S> {
    size: usize,
    sampler: S,
    roots: Vec<Node>,
    next_root: usize,
    stack: Vec<Frame>,
    stamp: ModificationCount,
    emitted: usize,
}

impl<S: ExtensionSampler> EsuCursor<S> {
    fn new<G>(graph: &G, size: usize, sampler: S) -> GraphResult<Self>
    where
        G: GraphNodeOrder + GraphVersion,
    {
        if size == 0 || size > graph.len() {
            return Err(GraphError::InvalidSubgraphSize {
                size,
                order: graph.number_of_nodes(),
            });
        }

        debug!(
            "enumerating connected subgraphs with {size} of {} vertices",
            graph.number_of_nodes()
        );

        Ok(Self {
            size,
            sampler,
            roots: graph.vertices().collect(),
            next_root: 0,
            stack: Vec::new(),
            stamp: graph.modification_count(),
            emitted: 0,
        })
    }

    /// Number of vertices of the enumerated subgraphs
    pub fn subgraph_size(&self) -> usize {
        self.size
    }

    /// Number of subgraphs produced so far
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Returns the vertex set of the next subgraph in increasing order
    ///
    /// Fails with [`GraphError::StaleIteration`] if the vertex set of `graph` changed since
    /// the enumeration started.
    pub fn next_vertex_set<G>(&mut self, graph: &G) -> GraphResult<Option<Vec<Node>>>
    where
        G: AdjacencyList + GraphVersion,
    {
        if graph.modification_count() != self.stamp {
            return Err(GraphError::StaleIteration);
        }
        Ok(self.advance(graph).map(|mut vertices| {
            vertices.sort_unstable();
            vertices
        }))
    }

    /// Returns a view of the next subgraph
    pub fn next_subgraph<G>(&mut self, graph: &G) -> GraphResult<Option<SubgraphView<G::EdgeType>>>
    where
        G: SubgraphBacking,
    {
        if graph.modification_count() != self.stamp {
            return Err(GraphError::StaleIteration);
        }
        Ok(self
            .advance(graph)
            .map(|vertices| SubgraphView::new_unchecked(graph, vertices, None)))
    }

    fn advance<G: AdjacencyList>(&mut self, graph: &G) -> Option<Vec<Node>> {
        let found = self.descend(graph);
        if found.is_some() {
            self.emitted += 1;
        }
        found
    }

    fn descend<G: AdjacencyList>(&mut self, graph: &G) -> Option<Vec<Node>> {
        loop {
            let Some(frame) = self.stack.last_mut() else {
                let &v = self.roots.get(self.next_root)?;
                self.next_root += 1;
                if !self.sampler.keep_root() {
                    continue;
                }
                if self.size == 1 {
                    return Some(vec![v]);
                }

                let extension = graph.neighbors_of(v).filter(|&u| u > v).collect_vec();
                let selection = self.sampler.select(1, extension.len());
                self.stack.push(Frame {
                    subgraph: vec![v],
                    extension,
                    selection,
                    root: v,
                });
                continue;
            };

            let Some(w) = frame.extension.pop() else {
                self.stack.pop();
                continue;
            };
            let position = frame.extension.len();
            if frame
                .selection
                .as_ref()
                .is_some_and(|selection| !selection.contains(position))
            {
                continue;
            }

            let root = frame.root;
            let mut extension = frame.extension.clone();
            extension.extend(graph.neighbors_of(w).filter(|&u| {
                u > root
                    && u != w
                    && !frame.subgraph.contains(&u)
                    && !frame.subgraph.iter().any(|&x| graph.are_adjacent(x, u))
            }));

            let mut subgraph = frame.subgraph.clone();
            subgraph.push(w);
            if subgraph.len() == self.size {
                return Some(subgraph);
            }

            let selection = self.sampler.select(subgraph.len(), extension.len());
            self.stack.push(Frame {
                subgraph,
                extension,
                selection,
                root,
            });
        }
    }
}

/// Lazily enumerates connected subgraphs of a borrowed graph as [`SubgraphView`]s
pub struct SubgraphIterator<'a, G, S>
where
    G: SubgraphBacking,
{
    graph: &'a G,
    cursor: EsuCursor<S>,
    finished: bool,
}

impl<'a, G, S> SubgraphIterator<'a, G, S>
where
    G: SubgraphBacking,
    S: ExtensionSampler,
{
    pub fn graph(&self) -> &'a G {
        self.graph
    }

    /// Detaches the enumeration from the graph
    pub fn into_cursor(self) -> EsuCursor<S> {
        self.cursor
    }
}

impl<G, S> Iterator for SubgraphIterator<'_, G, S>
where
    G: SubgraphBacking,
    S: ExtensionSampler,
{
    type Item = SubgraphView<G::EdgeType>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        // the graph is borrowed, so its vertex set cannot change underneath
        match self.cursor.advance(self.graph) {
            Some(vertices) => Some(SubgraphView::new_unchecked(self.graph, vertices, None)),
            None => {
                self.finished = true;
                debug!(
                    "enumeration finished after {} subgraphs",
                    self.cursor.emitted()
                );
                None
            }
        }
    }
}

/// Exhaustive enumeration of all connected subgraphs with `size` vertices
#[derive(Clone, Copy, Debug)]
pub struct Esu {
    size: usize,
}

impl Esu {
    pub fn new(size: usize) -> Self {
        Self { size }
    }

    /// Starts a detached enumeration on `graph`.
    /// Fails if `size` is `0` or exceeds the number of vertices.
    pub fn cursor<G>(&self, graph: &G) -> GraphResult<EsuCursor<Exhaustive>>
    where
        G: GraphNodeOrder + GraphVersion,
    {
        EsuCursor::new(graph, self.size, Exhaustive)
    }

    pub fn iter<'a, G>(&self, graph: &'a G) -> GraphResult<SubgraphIterator<'a, G, Exhaustive>>
    where
        G: SubgraphBacking,
    {
        Ok(SubgraphIterator {
            graph,
            cursor: self.cursor(graph)?,
            finished: false,
        })
    }
}

/// Randomized enumeration; see the [module documentation](self)
#[derive(Clone, Debug)]
pub struct RandEsu<R: Rng> {
    sampler: RandomSampler<R>,
}

impl<R: Rng> RandEsu<R> {
    /// `probabilities[d]` is used for subgraphs with `d` vertices (`probabilities[0]` for the
    /// roots); there must be exactly `size` of them, each in `(0, 1]`.
    pub fn new(size: usize, probabilities: Vec<f64>, rng: R) -> GraphResult<Self> {
        Ok(Self {
            sampler: RandomSampler::new(size, probabilities, rng)?,
        })
    }

    pub fn subgraph_size(&self) -> usize {
        self.sampler.probabilities().len()
    }

    pub fn cursor<G>(self, graph: &G) -> GraphResult<EsuCursor<RandomSampler<R>>>
    where
        G: GraphNodeOrder + GraphVersion,
    {
        EsuCursor::new(graph, self.subgraph_size(), self.sampler)
    }

    pub fn iter<G>(self, graph: &G) -> GraphResult<SubgraphIterator<'_, G, RandomSampler<R>>>
    where
        G: SubgraphBacking,
    {
        Ok(SubgraphIterator {
            graph,
            cursor: self.cursor(graph)?,
            finished: false,
        })
    }
}

/// Extension trait to enumerate connected subgraphs of any graph views can be created on
pub trait ConnectedSubgraphs: SubgraphBacking {
    /// Short-hand for [`Esu::iter`]
    fn connected_subgraphs(&self, size: usize) -> GraphResult<SubgraphIterator<'_, Self, Exhaustive>> {
        Esu::new(size).iter(self)
    }

    /// Short-hand for [`RandEsu::iter`]
    fn sampled_subgraphs<R: Rng>(
        &self,
        size: usize,
        probabilities: Vec<f64>,
        rng: R,
    ) -> GraphResult<SubgraphIterator<'_, Self, RandomSampler<R>>> {
        RandEsu::new(size, probabilities, rng)?.iter(self)
    }
}

impl<G: SubgraphBacking> ConnectedSubgraphs for G {}
