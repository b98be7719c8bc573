/*!
# Isomorphism Testing

A VF2-style backtracking matcher on [`CompactGraph`] snapshots.

The search grows a partial bijection between the vertices of both graphs one pair at a time.
A pair is only added if it keeps the mapping consistent with the adjacency of all mapped
vertices and if the look-ahead counts (unmapped neighbors inside the in-/out-frontier and
outside of it) agree on both sides. Whether the *edges* between two mapped pairs are
interchangeable is decided by a [`PairRule`]: [`StructureOnly`] accepts any edges,
[`MatchingEdgeTypes`] requires equal type multisets. The typed tester is therefore the very
same search with a stricter rule.

Searches may be bounded by [`SearchLimits`]; a search running out of budget fails with
[`GraphError::Interrupted`].

# Example
```
use sgraphs::{prelude::*, algo::*, utils::NodeMapGetter};

let path = UndirectedGraph::from_pairs([(0, 1), (1, 2)]).unwrap();
let bent = UndirectedGraph::from_pairs([(7, 5), (7, 9)]).unwrap();

let mapping = Vf2Tester::default().find_isomorphism(&path, &bent).unwrap();
assert_eq!(mapping.new_id_of(1), Some(7));
```
*/

use super::*;
use fxhash::FxHashMap;
use log::{trace, warn};
use std::{
    fmt::Debug,
    hash::Hash,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

/// Bounds on the work of a single isomorphism search.
/// The default is unlimited.
#[derive(Clone, Debug, Default)]
pub struct SearchLimits {
    max_states: Option<u64>,
    time_limit: Option<Duration>,
    cancel: Option<Arc<AtomicBool>>,
}

impl SearchLimits {
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Stops a search after visiting `states` search states
    pub fn with_max_states(mut self, states: u64) -> Self {
        self.max_states = Some(states);
        self
    }

    /// Stops a search once it ran for longer than `limit`
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Stops a search as soon as `flag` is raised (possibly from another thread)
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn is_unlimited(&self) -> bool {
        self.max_states.is_none() && self.time_limit.is_none() && self.cancel.is_none()
    }

    fn budget(&self) -> Budget<'_> {
        Budget {
            limits: self,
            started: Instant::now(),
            states: 0,
        }
    }
}

/// The clock is only consulted every this many states
const CLOCK_INTERVAL: u64 = 64;

struct Budget<'a> {
    limits: &'a SearchLimits,
    started: Instant,
    states: u64,
}

impl Budget<'_> {
    fn tick(&mut self) -> GraphResult<()> {
        self.states += 1;

        let exhausted = self.limits.max_states.is_some_and(|max| self.states > max)
            || self
                .limits
                .cancel
                .as_ref()
                .is_some_and(|flag| flag.load(Ordering::Relaxed))
            || (self.states % CLOCK_INTERVAL == 0
                && self
                    .limits
                    .time_limit
                    .is_some_and(|limit| self.started.elapsed() > limit));

        if exhausted {
            Err(GraphError::Interrupted(self.states))
        } else {
            Ok(())
        }
    }
}

/// Decides whether the edges between two mapped vertex pairs are interchangeable
pub trait PairRule<T> {
    /// `u1, v1` of `g1` are mapped onto `u2, v2` of `g2` (possibly `u1 == v1` for self-loops).
    /// It is already known that the adjacency between both pairs agrees.
    fn edges_match(
        &self,
        g1: &CompactGraph<T>,
        u1: Node,
        v1: Node,
        g2: &CompactGraph<T>,
        u2: Node,
        v2: Node,
    ) -> bool;
}

/// Only the adjacency structure matters
#[derive(Clone, Copy, Debug, Default)]
pub struct StructureOnly;

impl<T> PairRule<T> for StructureOnly {
    fn edges_match(
        &self,
        _: &CompactGraph<T>,
        _: Node,
        _: Node,
        _: &CompactGraph<T>,
        _: Node,
        _: Node,
    ) -> bool {
        true
    }
}

/// Edges in each orientation must carry the same multiset of types
#[derive(Clone, Copy, Debug, Default)]
pub struct MatchingEdgeTypes;

impl<T> PairRule<T> for MatchingEdgeTypes
where
    T: Clone + Eq + Hash + Debug,
{
    fn edges_match(
        &self,
        g1: &CompactGraph<T>,
        u1: Node,
        v1: Node,
        g2: &CompactGraph<T>,
        u2: Node,
        v2: Node,
    ) -> bool {
        same_multiset(g1.types_between(u1, v1), g2.types_between(u2, v2))
            && same_multiset(g1.types_between(v1, u1), g2.types_between(v2, u2))
    }
}

fn same_multiset<T: Eq + Hash>(a: &[T], b: &[T]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut balance: FxHashMap<&T, isize> = FxHashMap::default();
    for t in a {
        *balance.entry(t).or_default() += 1;
    }
    for t in b {
        *balance.entry(t).or_default() -= 1;
    }
    balance.values().all(|&c| c == 0)
}

/// `(out-degree, in-degree)`; both equal the degree in undirected graphs
fn degree_signature<T>(graph: &CompactGraph<T>, u: Node) -> (NumNodes, NumNodes) {
    (graph.out_set(u).cardinality(), graph.in_set(u).cardinality())
}

/// Searches an isomorphism from `g1` onto `g2` whose mapped vertex pairs all satisfy `rule`.
///
/// Returns the mapping between the *original* vertex ids of both snapshots, `Ok(None)` if no
/// isomorphism exists, and [`GraphError::Interrupted`] if `limits` stopped the search.
pub fn find_isomorphism_with<T, R>(
    g1: &CompactGraph<T>,
    g2: &CompactGraph<T>,
    rule: &R,
    limits: &SearchLimits,
) -> GraphResult<Option<NodeMapper>>
where
    T: Clone + Eq + Hash + Debug,
    R: PairRule<T>,
{
    if g1.number_of_nodes() != g2.number_of_nodes()
        || g1.number_of_edges() != g2.number_of_edges()
        || g1.is_directed() != g2.is_directed()
    {
        return Ok(None);
    }

    // equal degree buckets are necessary; every mapped pair preserves them afterwards
    let buckets1 = g1.vertices().map(|u| degree_signature(g1, u)).sorted_unstable();
    let buckets2 = g2.vertices().map(|u| degree_signature(g2, u)).sorted_unstable();
    if !buckets1.eq(buckets2) {
        return Ok(None);
    }

    let mut state = MatchState::new(g1, g2, rule, limits.budget());
    let found = state.search()?;
    trace!(
        "vf2 on {} vertices explored {} states",
        g1.number_of_nodes(),
        state.budget.states
    );

    Ok(found.then(|| state.mapping()))
}

/// Partial bijection of the search together with the frontier bookkeeping.
///
/// `out[u]`/`inn[u]` hold the depth at which `u` entered the out-/in-frontier
/// (successors/predecessors of mapped vertices), `0` if it never did.
struct MatchState<'a, T, R> {
    g1: &'a CompactGraph<T>,
    g2: &'a CompactGraph<T>,
    rule: &'a R,
    budget: Budget<'a>,
    core1: Vec<Node>,
    core2: Vec<Node>,
    out1: Vec<usize>,
    in1: Vec<usize>,
    out2: Vec<usize>,
    in2: Vec<usize>,
    depth: usize,
}

impl<'a, T, R> MatchState<'a, T, R>
where
    T: Clone + Eq + Hash + Debug,
    R: PairRule<T>,
{
    fn new(
        g1: &'a CompactGraph<T>,
        g2: &'a CompactGraph<T>,
        rule: &'a R,
        budget: Budget<'a>,
    ) -> Self {
        let n = g1.len();
        Self {
            g1,
            g2,
            rule,
            budget,
            core1: vec![INVALID_NODE; n],
            core2: vec![INVALID_NODE; n],
            out1: vec![0; n],
            in1: vec![0; n],
            out2: vec![0; n],
            in2: vec![0; n],
            depth: 0,
        }
    }

    fn search(&mut self) -> GraphResult<bool> {
        if self.depth == self.core1.len() {
            return Ok(true);
        }
        self.budget.tick()?;

        let Some(n) = self.pivot() else {
            return Ok(false);
        };
        let class = (self.out1[n as usize] > 0, self.in1[n as usize] > 0);
        let signature = degree_signature(self.g1, n);

        for m in self.g2.vertices() {
            let mi = m as usize;
            if self.core2[mi] != INVALID_NODE
                || (self.out2[mi] > 0, self.in2[mi] > 0) != class
                || degree_signature(self.g2, m) != signature
                || !self.is_feasible(n, m)
            {
                continue;
            }

            self.push(n, m);
            if self.search()? {
                return Ok(true);
            }
            self.pop(n, m);
        }

        Ok(false)
    }

    /// Next vertex of `g1` to map: the smallest unmapped one of the out-frontier, else of the
    /// in-frontier, else of all unmapped vertices. Every candidate of `g2` must then share
    /// its frontier class.
    fn pivot(&self) -> Option<Node> {
        self.first_unmapped(|u| self.out1[u] > 0)
            .or_else(|| self.first_unmapped(|u| self.in1[u] > 0))
            .or_else(|| self.first_unmapped(|_| true))
            .map(|u| u as Node)
    }

    fn first_unmapped(&self, in_frontier: impl Fn(usize) -> bool) -> Option<usize> {
        (0..self.core1.len()).find(|&u| self.core1[u] == INVALID_NODE && in_frontier(u))
    }

    fn is_feasible(&self, n: Node, m: Node) -> bool {
        let (g1, g2) = (self.g1, self.g2);

        if g1.has_self_loop(n) != g2.has_self_loop(m)
            || (g1.has_self_loop(n) && !self.rule.edges_match(g1, n, n, g2, m, m))
        {
            return false;
        }

        // every mapped successor/predecessor of n has to be one of m ...
        for n2 in g1.out_set(n).iter_set_bits() {
            let m2 = self.core1[n2 as usize];
            if m2 != INVALID_NODE
                && !(g2.out_set(m).get_bit(m2) && self.rule.edges_match(g1, n, n2, g2, m, m2))
            {
                return false;
            }
        }
        for n2 in g1.in_set(n).iter_set_bits() {
            let m2 = self.core1[n2 as usize];
            if m2 != INVALID_NODE
                && !(g2.in_set(m).get_bit(m2) && self.rule.edges_match(g1, n2, n, g2, m2, m))
            {
                return false;
            }
        }

        // ... and vice versa
        for m2 in g2.out_set(m).iter_set_bits() {
            let n2 = self.core2[m2 as usize];
            if n2 != INVALID_NODE && !g1.out_set(n).get_bit(n2) {
                return false;
            }
        }
        for m2 in g2.in_set(m).iter_set_bits() {
            let n2 = self.core2[m2 as usize];
            if n2 != INVALID_NODE && !g1.in_set(n).get_bit(n2) {
                return false;
            }
        }

        lookahead(g1, n, &self.core1, &self.out1, &self.in1)
            == lookahead(g2, m, &self.core2, &self.out2, &self.in2)
    }

    fn push(&mut self, n: Node, m: Node) {
        self.depth += 1;
        self.core1[n as usize] = m;
        self.core2[m as usize] = n;
        enter_frontier(self.g1, n, self.depth, &mut self.out1, &mut self.in1);
        enter_frontier(self.g2, m, self.depth, &mut self.out2, &mut self.in2);
    }

    fn pop(&mut self, n: Node, m: Node) {
        leave_frontier(self.g1, n, self.depth, &mut self.out1, &mut self.in1);
        leave_frontier(self.g2, m, self.depth, &mut self.out2, &mut self.in2);
        self.core1[n as usize] = INVALID_NODE;
        self.core2[m as usize] = INVALID_NODE;
        self.depth -= 1;
    }

    fn mapping(&self) -> NodeMapper {
        let mut mapper = NodeMapper::with_capacity(self.core1.len() as NumNodes);
        for (n, &m) in self.core1.iter().enumerate() {
            mapper.map_node_to(
                self.g1.original_vertex(n as Node),
                self.g2.original_vertex(m),
            );
        }
        mapper
    }
}

/// Counts the unmapped successors and predecessors of `u`, each split into
/// (in out-frontier, in in-frontier, outside of both)
fn lookahead<T>(
    graph: &CompactGraph<T>,
    u: Node,
    core: &[Node],
    out: &[usize],
    inn: &[usize],
) -> [usize; 6] {
    let mut counts = [0; 6];
    for (offset, neighbors) in [(0, graph.out_set(u)), (3, graph.in_set(u))] {
        for w in neighbors.iter_set_bits() {
            let w = w as usize;
            if core[w] != INVALID_NODE {
                continue;
            }
            if out[w] > 0 {
                counts[offset] += 1;
            }
            if inn[w] > 0 {
                counts[offset + 1] += 1;
            }
            if out[w] == 0 && inn[w] == 0 {
                counts[offset + 2] += 1;
            }
        }
    }
    counts
}

fn enter_frontier<T>(
    graph: &CompactGraph<T>,
    u: Node,
    depth: usize,
    out: &mut [usize],
    inn: &mut [usize],
) {
    for w in std::iter::once(u).chain(graph.out_set(u).iter_set_bits()) {
        if out[w as usize] == 0 {
            out[w as usize] = depth;
        }
    }
    for w in std::iter::once(u).chain(graph.in_set(u).iter_set_bits()) {
        if inn[w as usize] == 0 {
            inn[w as usize] = depth;
        }
    }
}

fn leave_frontier<T>(
    graph: &CompactGraph<T>,
    u: Node,
    depth: usize,
    out: &mut [usize],
    inn: &mut [usize],
) {
    for w in std::iter::once(u).chain(graph.out_set(u).iter_set_bits()) {
        if out[w as usize] == depth {
            out[w as usize] = 0;
        }
    }
    for w in std::iter::once(u).chain(graph.in_set(u).iter_set_bits()) {
        if inn[w as usize] == depth {
            inn[w as usize] = 0;
        }
    }
}

/// Common interface of the structural and the typed matcher
pub trait IsomorphismTester<T>
where
    T: Clone + Eq + Hash + Debug,
{
    /// Searches an isomorphism between two snapshots.
    /// Fails only if the tester's [`SearchLimits`] interrupted the search.
    fn try_find_compact(
        &self,
        g1: &CompactGraph<T>,
        g2: &CompactGraph<T>,
    ) -> GraphResult<Option<NodeMapper>>;

    /// Searches a mapping from the vertices of `g1` onto the vertices of `g2`
    fn try_find_isomorphism<G1, G2>(&self, g1: &G1, g2: &G2) -> GraphResult<Option<NodeMapper>>
    where
        G1: GraphEdgeList<EdgeType = T>,
        G2: GraphEdgeList<EdgeType = T>,
    {
        self.try_find_compact(&CompactGraph::from_graph(g1), &CompactGraph::from_graph(g2))
    }

    /// Like [`IsomorphismTester::try_find_isomorphism`] but treats an interrupted search as
    /// "no isomorphism found"
    fn find_isomorphism<G1, G2>(&self, g1: &G1, g2: &G2) -> Option<NodeMapper>
    where
        G1: GraphEdgeList<EdgeType = T>,
        G2: GraphEdgeList<EdgeType = T>,
    {
        self.try_find_isomorphism(g1, g2).unwrap_or_else(|err| {
            warn!("isomorphism search gave up: {err}");
            None
        })
    }

    fn are_isomorphic<G1, G2>(&self, g1: &G1, g2: &G2) -> bool
    where
        G1: GraphEdgeList<EdgeType = T>,
        G2: GraphEdgeList<EdgeType = T>,
    {
        self.find_isomorphism(g1, g2).is_some()
    }
}

/// Structural matcher; edge types are ignored
#[derive(Clone, Debug, Default)]
pub struct Vf2Tester {
    limits: SearchLimits,
}

impl Vf2Tester {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn limits(&self) -> &SearchLimits {
        &self.limits
    }
}

impl<T> IsomorphismTester<T> for Vf2Tester
where
    T: Clone + Eq + Hash + Debug,
{
    fn try_find_compact(
        &self,
        g1: &CompactGraph<T>,
        g2: &CompactGraph<T>,
    ) -> GraphResult<Option<NodeMapper>> {
        find_isomorphism_with(g1, g2, &StructureOnly, &self.limits)
    }
}

/// Type-aware matcher.
///
/// Two typed graphs only match if they share at least one edge type and every mapped vertex
/// pair is connected by the same multiset of types in each orientation. A typed graph never
/// matches an untyped one; two untyped graphs are compared structurally.
#[derive(Clone, Debug, Default)]
pub struct TypedVf2Tester {
    limits: SearchLimits,
}

impl TypedVf2Tester {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn limits(&self) -> &SearchLimits {
        &self.limits
    }
}

impl<T> IsomorphismTester<T> for TypedVf2Tester
where
    T: Clone + Eq + Hash + Debug,
{
    fn try_find_compact(
        &self,
        g1: &CompactGraph<T>,
        g2: &CompactGraph<T>,
    ) -> GraphResult<Option<NodeMapper>> {
        match (g1.is_typed(), g2.is_typed()) {
            (false, false) => find_isomorphism_with(g1, g2, &StructureOnly, &self.limits),
            (true, true) => {
                if g1.is_singleton() && g2.is_singleton() {
                    find_isomorphism_with(g1, g2, &StructureOnly, &self.limits)
                } else if !g1.shares_edge_type_with(g2) {
                    Ok(None)
                } else {
                    find_isomorphism_with(g1, g2, &MatchingEdgeTypes, &self.limits)
                }
            }
            _ => Ok(None),
        }
    }
}

/// Shorthand for isomorphism tests with an unbounded [`TypedVf2Tester`]
pub trait Isomorphism: GraphEdgeList + Sized {
    /// Returns a mapping from the vertices of `self` onto the vertices of `other`
    fn isomorphism_to<G>(&self, other: &G) -> Option<NodeMapper>
    where
        G: GraphEdgeList<EdgeType = Self::EdgeType>,
    {
        TypedVf2Tester::default().find_isomorphism(self, other)
    }

    fn is_isomorphic_to<G>(&self, other: &G) -> bool
    where
        G: GraphEdgeList<EdgeType = Self::EdgeType>,
    {
        self.isomorphism_to(other).is_some()
    }
}

impl<G: GraphEdgeList> Isomorphism for G {}

#[cfg(test)]
mod test {
    use super::*;
    use itertools::Itertools;
    use rand::{Rng, SeedableRng, seq::SliceRandom};
    use rand_pcg::Pcg64Mcg;

    fn random_graph(rng: &mut impl Rng, n: Node, m: usize) -> UndirectedGraph {
        let mut graph = UndirectedGraph::with_vertices(0..n).unwrap();
        for _ in 0..m {
            let u = rng.random_range(0..n);
            let v = rng.random_range(0..n);
            graph.add_edge(u, v).unwrap();
        }
        graph
    }

    fn shuffled_copy<G>(rng: &mut impl Rng, graph: &G) -> G
    where
        G: GraphFromScratch + GraphVertexEditing,
    {
        let old = graph.vertices().collect_vec();
        let mut new = old.iter().map(|&u| u + 100).collect_vec();
        new.shuffle(rng);
        let mapper = NodeMapper::from_sequence(&old.into_iter().zip(new).collect_vec());
        mapper.relabelled_graph(graph).unwrap()
    }

    #[test]
    fn reflexive_and_relabelled() {
        let rng = &mut Pcg64Mcg::seed_from_u64(0x1234);
        let tester = Vf2Tester::default();

        for n in [1, 5, 8, 12] {
            for _ in 0..5 {
                let m = rng.random_range(0..(2 * n as usize));
                let graph = random_graph(rng, n, m);
                assert!(tester.are_isomorphic(&graph, &graph));

                let copy = shuffled_copy(rng, &graph);
                let mapping = tester.find_isomorphism(&graph, &copy).unwrap();
                assert_eq!(mapping.len(), n);
                assert!(mapping.is_edge_preserving(&graph, &copy));

                let back = tester.find_isomorphism(&copy, &graph).unwrap();
                assert!(back.is_edge_preserving(&copy, &graph));
            }
        }
    }

    #[test]
    fn symmetric_rejections() {
        let tester = Vf2Tester::default();
        let path = UndirectedGraph::from_pairs([(0, 1), (1, 2), (2, 3)]).unwrap();
        let star = UndirectedGraph::from_pairs([(0, 1), (0, 2), (0, 3)]).unwrap();
        assert!(!tester.are_isomorphic(&path, &star));
        assert!(!tester.are_isomorphic(&star, &path));

        // same degrees everywhere, but connected vs. two components
        let hexagon =
            UndirectedGraph::from_pairs([(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0)]).unwrap();
        let triangles =
            UndirectedGraph::from_pairs([(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)]).unwrap();
        assert!(!tester.are_isomorphic(&hexagon, &triangles));
        assert!(!tester.are_isomorphic(&triangles, &hexagon));

        let mapping = tester.find_isomorphism(&triangles, &triangles).unwrap();
        assert!(mapping.inverse().is_edge_preserving(&triangles, &triangles));
    }

    #[test]
    fn self_loops_and_orientation() {
        let tester = Vf2Tester::default();

        let cycle = DirectedGraph::from_pairs([(0, 1), (1, 2), (2, 0)]).unwrap();
        let transitive = DirectedGraph::from_pairs([(0, 1), (1, 2), (0, 2)]).unwrap();
        assert!(!tester.are_isomorphic(&cycle, &transitive));

        let rotated = DirectedGraph::from_pairs([(5, 3), (3, 4), (4, 5)]).unwrap();
        let mapping = tester.find_isomorphism(&cycle, &rotated).unwrap();
        assert!(mapping.is_edge_preserving(&cycle, &rotated));

        let looped = UndirectedGraph::from_pairs([(0, 1), (1, 1)]).unwrap();
        let other = UndirectedGraph::from_pairs([(0, 0), (0, 1)]).unwrap();
        let mapping = tester.find_isomorphism(&looped, &other).unwrap();
        assert_eq!(mapping.new_id_of(1), Some(0));
    }

    #[test]
    fn empty_graphs_match() {
        let tester = Vf2Tester::default();
        let empty = UndirectedGraph::new();
        let mapping = tester.find_isomorphism(&empty, &empty).unwrap();
        assert!(mapping.is_empty());
        assert!(!tester.are_isomorphic(&empty, &UndirectedGraph::with_vertices([3]).unwrap()));
    }

    fn typed_path(labels: [(Node, Node, char); 3]) -> DirectedMultigraph<char> {
        let mut graph = DirectedMultigraph::new();
        for (u, v, t) in labels {
            graph.add_edge(u, v, t).unwrap();
        }
        graph
    }

    #[test]
    fn typed_tester_respects_types() {
        let typed = TypedVf2Tester::default();
        let plain = Vf2Tester::default();

        let g = typed_path([(0, 1, 'a'), (1, 2, 'b'), (2, 3, 'a')]);
        let disjoint = typed_path([(0, 1, 'x'), (1, 2, 'y'), (2, 3, 'x')]);
        assert!(plain.are_isomorphic(&g, &disjoint));
        assert!(!typed.are_isomorphic(&g, &disjoint));
        assert!(!typed.are_isomorphic(&disjoint, &g));

        let swapped = typed_path([(0, 1, 'b'), (1, 2, 'a'), (2, 3, 'b')]);
        assert!(plain.are_isomorphic(&g, &swapped));
        assert!(!typed.are_isomorphic(&g, &swapped));

        let relabelled = typed_path([(7, 5, 'a'), (5, 9, 'b'), (9, 8, 'a')]);
        let mapping = typed.find_isomorphism(&g, &relabelled).unwrap();
        assert!(mapping.is_edge_preserving(&g, &relabelled));
        assert!(g.is_isomorphic_to(&relabelled));
    }

    #[test]
    fn typed_parallel_edges() {
        let typed = TypedVf2Tester::default();

        let mut g1 = DirectedMultigraph::new();
        g1.add_edge(0, 1, 1u8).unwrap();
        g1.add_edge(0, 1, 2).unwrap();
        g1.add_edge(1, 0, 1).unwrap();

        let mut g2 = DirectedMultigraph::new();
        g2.add_edge(1, 0, 1u8).unwrap();
        g2.add_edge(1, 0, 2).unwrap();
        g2.add_edge(0, 1, 1).unwrap();

        let mut g3 = DirectedMultigraph::new();
        g3.add_edge(0, 1, 1u8).unwrap();
        g3.add_edge(1, 0, 2).unwrap();
        g3.add_edge(1, 0, 1).unwrap();

        assert!(typed.are_isomorphic(&g1, &g2));
        assert!(typed.are_isomorphic(&g1, &g3));

        let mut g4 = DirectedMultigraph::new();
        g4.add_edge(0, 1, 1u8).unwrap();
        g4.add_edge(0, 1, 3).unwrap();
        g4.add_edge(1, 0, 2).unwrap();
        assert!(!typed.are_isomorphic(&g1, &g4));
    }

    #[test]
    fn typed_never_matches_untyped() {
        let typed = TypedVf2Tester::default();
        let mut labelled: GenericDirectedGraph<char> = GenericDirectedGraph::new();
        labelled
            .try_add_edge(GraphEdge::directed_typed(0, 1, 'a'))
            .unwrap();
        let mut unlabelled: GenericDirectedGraph<char> = GenericDirectedGraph::new();
        unlabelled.try_add_edge(GraphEdge::directed(0, 1)).unwrap();

        assert!(Vf2Tester::default().are_isomorphic(&labelled, &unlabelled));
        assert!(!typed.are_isomorphic(&labelled, &unlabelled));
        assert!(typed.are_isomorphic(&unlabelled, &unlabelled));
    }

    #[test]
    fn limits_interrupt_search() {
        let _ = env_logger::builder()
            .filter_level(log::LevelFilter::Trace)
            .is_test(true)
            .try_init();

        let hexagon =
            UndirectedGraph::from_pairs([(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0)]).unwrap();
        let c1 = CompactGraph::from_graph(&hexagon);

        let bounded = Vf2Tester::default().with_limits(SearchLimits::default().with_max_states(2));
        assert!(matches!(
            bounded.try_find_compact(&c1, &c1),
            Err(GraphError::Interrupted(3))
        ));
        assert!(bounded.find_isomorphism(&hexagon, &hexagon).is_none());

        let flag = Arc::new(AtomicBool::new(false));
        let cancellable = Vf2Tester::default()
            .with_limits(SearchLimits::unlimited().with_cancel_flag(flag.clone()));
        assert!(!cancellable.limits().is_unlimited());
        assert!(cancellable.are_isomorphic(&hexagon, &hexagon));

        flag.store(true, Ordering::Relaxed);
        let err = cancellable.try_find_compact(&c1, &c1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Interrupted);
    }
}
