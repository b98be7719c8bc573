/*!
# Degree-Preserving Edge Shuffling

Randomizes a graph while keeping every vertex degree (in- and out-degree for directed graphs)
intact, which yields the null model motif significance is measured against.
Each step picks two edges `(a, b)` and `(c, d)` and rewires them to `(a, d)` and `(c, b)`.
Undirected edges are flipped at random first, so both possible rewirings are reachable.
A step is skipped if it would create a self-loop or an edge already present, or if the two
edges carry different types.
*/

use super::*;
use log::debug;
use rand::Rng;

pub trait DegreePreservingShuffle: GraphEdgeEditing + Sized {
    /// Attempts `shuffles_per_edge * |E|` edge swaps and returns the number of swaps performed.
    ///
    /// Fails with [`GraphError::InvalidShuffleCount`] if `shuffles_per_edge == 0`.
    ///
    /// # Example
    /// ```
    /// use sgraphs::{prelude::*, algo::*};
    /// use rand::SeedableRng;
    ///
    /// let mut g = UndirectedGraph::from_pairs([(0, 1), (2, 3), (4, 5), (6, 7)]).unwrap();
    /// let rng = &mut rand_pcg::Pcg64Mcg::seed_from_u64(3);
    /// g.shuffle_preserving_degrees(rng, 10).unwrap();
    /// assert!(g.vertices().all(|u| g.degree_of(u) == 1));
    /// ```
    fn shuffle_preserving_degrees<R: Rng>(
        &mut self,
        rng: &mut R,
        shuffles_per_edge: usize,
    ) -> GraphResult<NumEdges>;
}

impl<G> DegreePreservingShuffle for G
where
    G: GraphEdgeEditing,
{
    fn shuffle_preserving_degrees<R: Rng>(
        &mut self,
        rng: &mut R,
        shuffles_per_edge: usize,
    ) -> GraphResult<NumEdges> {
        if shuffles_per_edge == 0 {
            return Err(GraphError::InvalidShuffleCount);
        }

        let mut edges = self.edges().collect_vec();
        if edges.len() < 2 {
            return Ok(0);
        }

        let attempts = shuffles_per_edge * edges.len();
        let mut swaps: NumEdges = 0;
        for _ in 0..attempts {
            let i = rng.random_range(0..edges.len());
            let j = rng.random_range(0..edges.len());
            if i == j || edges[i].edge_type() != edges[j].edge_type() {
                continue;
            }

            let first = edges[i].clone();
            let second = if !edges[j].is_directed() && rng.random_bool(0.5) {
                edges[j].flipped()
            } else {
                edges[j].clone()
            };

            let (a, b) = (first.from(), first.to());
            let (c, d) = (second.from(), second.to());
            if a == d || c == b {
                continue;
            }

            let rewired_first = first.with_endpoints(a, d);
            let rewired_second = second.with_endpoints(c, b);
            if rewired_first == rewired_second
                || self.contains_edge(&rewired_first)
                || self.contains_edge(&rewired_second)
            {
                continue;
            }

            self.try_add_edge(rewired_first.clone())?;
            self.try_add_edge(rewired_second.clone())?;
            self.remove_edge(&first);
            self.remove_edge(&second);

            edges[i] = rewired_first;
            edges[j] = rewired_second;
            swaps += 1;
        }

        debug!("performed {swaps} of {attempts} attempted degree-preserving swaps");
        Ok(swaps)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use itertools::Itertools;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    fn degrees<G: DirectedAdjacencyList>(graph: &G) -> Vec<(Node, NumNodes, NumNodes)> {
        graph
            .vertices()
            .map(|u| (u, graph.out_degree_of(u), graph.in_degree_of(u)))
            .collect_vec()
    }

    #[test]
    fn undirected_degrees_survive() {
        let rng = &mut Pcg64Mcg::seed_from_u64(0x5eed);
        for _ in 0..10 {
            let mut graph = UndirectedGraph::with_vertices(0..30).unwrap();
            for _ in 0..60 {
                let u = rng.random_range(0..30);
                let v = rng.random_range(0..30);
                if u != v {
                    graph.add_edge(u, v).unwrap();
                }
            }

            let before = degrees(&graph);
            let edges_before = graph.number_of_edges();
            let original = graph.ordered_edges();

            let swaps = graph.shuffle_preserving_degrees(rng, 5).unwrap();
            assert!(swaps > 0);
            assert_eq!(degrees(&graph), before);
            assert_eq!(graph.number_of_edges(), edges_before);
            assert_eq!(graph.edges().count(), edges_before as usize);
            assert!(graph.edges().all(|e| !e.is_loop()));
            assert_ne!(graph.ordered_edges(), original);
        }
    }

    #[test]
    fn directed_degrees_survive() {
        let rng = &mut Pcg64Mcg::seed_from_u64(17);
        let mut graph = DirectedGraph::from_pairs((0..20).map(|u| (u, (u * 7 + 3) % 20))).unwrap();
        for u in 0..20 {
            graph.add_edge(u, (u + 1) % 20).unwrap();
        }

        let before = degrees(&graph);
        graph.shuffle_preserving_degrees(rng, 3).unwrap();
        assert_eq!(degrees(&graph), before);
    }

    #[test]
    fn types_are_never_mixed() {
        let rng = &mut Pcg64Mcg::seed_from_u64(99);
        let mut graph = DirectedMultigraph::new();
        for u in 0..10 {
            graph.add_edge(u, u + 10, 'a').unwrap();
            graph.add_edge(u + 10, u + 20, 'b').unwrap();
        }

        graph.shuffle_preserving_degrees(rng, 4).unwrap();
        assert_eq!(graph.number_of_edges_of_type(&'a'), 10);
        assert_eq!(graph.number_of_edges_of_type(&'b'), 10);
        assert!(
            graph
                .edges_of_type(&'a')
                .all(|e| e.from() < 10 && (10..20).contains(&e.to()))
        );
    }

    #[test]
    fn rejects_zero_shuffles() {
        let mut graph = UndirectedGraph::from_pairs([(0, 1), (2, 3)]).unwrap();
        let rng = &mut Pcg64Mcg::seed_from_u64(1);
        assert_eq!(
            graph.shuffle_preserving_degrees(rng, 0),
            Err(GraphError::InvalidShuffleCount)
        );

        let mut single = UndirectedGraph::from_pairs([(0, 1)]).unwrap();
        assert_eq!(single.shuffle_preserving_degrees(rng, 3), Ok(0));
    }
}
