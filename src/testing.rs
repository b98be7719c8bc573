/// Stamps out the randomized property tests every graph representation has to pass.
///
/// `$make` turns `(u, v, t)` into an edge accepted by the graph, where `t: u8` is a small
/// random type index the representation may ignore. Vertex ids are sparse (`1, 4, 7, ...`).
macro_rules! test_graph_ops {
    ($env:ident, $graph:ty, $make:expr, ($($arm:ident),*)) => {
        #[cfg(test)]
        mod $env {
            use crate::{prelude::*, testing::test_graph_ops};
            use fxhash::FxHashSet;
            use itertools::Itertools;
            use rand::{Rng, SeedableRng};
            use rand_pcg::Pcg64Mcg;

            type Graph = $graph;
            type Type = <Graph as GraphEdgeList>::EdgeType;

            /// Creates `m` random edges (possibly repeated) over `n` vertices
            fn random_edges<R: Rng>(rng: &mut R, n: Node, m: usize) -> Vec<GraphEdge<Type>> {
                (0..m)
                    .map(|_| {
                        let u = 3 * rng.random_range(0..n) + 1;
                        let v = 3 * rng.random_range(0..n) + 1;
                        let t: u8 = rng.random_range(0..3);
                        ($make)(u, v, t)
                    })
                    .collect_vec()
            }

            /// Builds the graph edge by edge while tracking the expected edge set
            fn build(edges: &[GraphEdge<Type>]) -> (Graph, FxHashSet<GraphEdge<Type>>) {
                let mut graph = Graph::default();
                let mut expected = FxHashSet::default();
                for edge in edges {
                    assert_eq!(
                        graph.try_add_edge(edge.clone()).unwrap(),
                        expected.insert(edge.clone())
                    );
                }
                (graph, expected)
            }

            fn instances() -> impl Iterator<Item = (Graph, FxHashSet<GraphEdge<Type>>)> {
                let rng = &mut Pcg64Mcg::seed_from_u64(3);
                let mut result = Vec::new();
                for n in [5 as Node, 20, 50] {
                    for m in [n as usize, 3 * n as usize] {
                        for _ in 0..5 {
                            result.push(build(&random_edges(rng, n, m)));
                        }
                    }
                }
                result.into_iter()
            }

            $(
                test_graph_ops!(@ $arm);
            )*
        }
    };
    (@ EdgeCounts) => {
        #[test]
        fn edge_counts() {
            for (graph, expected) in instances() {
                assert_eq!(graph.number_of_edges() as usize, expected.len());
                assert_eq!(graph.edges().count(), expected.len());
                assert!(graph.edges().all(|e| expected.contains(&e)));
                assert!(expected.iter().all(|e| graph.contains_edge(e)));

                if graph.is_directed() {
                    let leaving: usize = graph.vertices().map(|u| graph.out_edges_of(u).count()).sum();
                    assert_eq!(leaving, expected.len());
                }
                for u in graph.vertices() {
                    assert!(graph.edges_of(u).all(|e| e.touches(u)));
                    assert_eq!(
                        graph.edges_of(u).count(),
                        expected.iter().filter(|e| e.touches(u)).count()
                    );
                }
            }
        }
    };
    (@ EdgeRoundTrip) => {
        #[test]
        fn edge_round_trip() {
            let rng = &mut Pcg64Mcg::seed_from_u64(4);
            for (mut graph, mut expected) in instances() {
                let edges = expected.iter().cloned().collect_vec();
                let version = graph.modification_count();

                for edge in edges {
                    if rng.random_bool(0.5) {
                        continue;
                    }
                    assert!(graph.remove_edge(&edge));
                    assert!(!graph.remove_edge(&edge));
                    assert!(!graph.contains_edge(&edge));
                    assert!(expected.remove(&edge));
                    assert_eq!(graph.number_of_edges() as usize, expected.len());

                    if rng.random_bool(0.5) {
                        assert!(graph.try_add_edge(edge.clone()).unwrap());
                        assert!(!graph.try_add_edge(edge.clone()).unwrap());
                        expected.insert(edge);
                    }
                }

                assert_eq!(graph.edges().count(), expected.len());
                assert_eq!(graph.modification_count(), version);
            }
        }
    };
    (@ VertexRemoval) => {
        #[test]
        fn vertex_removal() {
            let rng = &mut Pcg64Mcg::seed_from_u64(5);
            for (mut graph, mut expected) in instances() {
                let vertices = graph.vertices().collect_vec();
                let u = vertices[rng.random_range(0..vertices.len())];
                let version = graph.modification_count();

                assert!(graph.remove_vertex(u));
                assert!(!graph.remove_vertex(u));
                assert!(!graph.has_vertex(u));
                assert!(graph.modification_count() > version);

                expected.retain(|e| !e.touches(u));
                assert_eq!(graph.number_of_edges() as usize, expected.len());
                assert!(graph.edges().all(|e| !e.touches(u)));
                assert!(vertices.iter().all(|&v| v == u || !graph.has_edge(v, u)));

                // the largest id must not be released either
                if let Some(top) = graph.max_vertex() {
                    assert!(graph.remove_vertex(top));
                }
                let fresh = graph.add_new_vertex().unwrap();
                assert_ne!(fresh, u);
                assert!(graph.has_vertex(fresh));
                assert!(vertices.iter().all(|&v| v < fresh));
            }
        }
    };
    (@ SubgraphConsistency) => {
        #[test]
        fn subgraph_consistency() {
            let rng = &mut Pcg64Mcg::seed_from_u64(6);
            for (graph, expected) in instances() {
                let selected: FxHashSet<Node> = graph.vertices().filter(|_| rng.random_bool(0.5)).collect();
                let mut view = graph.subgraph(selected.iter().copied()).unwrap();
                let sub = view.bind(&graph);

                assert_eq!(sub.number_of_nodes() as usize, selected.len());
                let inside = expected
                    .iter()
                    .filter(|e| selected.contains(&e.from()) && selected.contains(&e.to()))
                    .count();
                assert_eq!(sub.number_of_edges() as usize, inside);
                assert_eq!(sub.edges().count(), inside);

                let view = sub.view();
                for edge in sub.edges() {
                    let from = view.backing_vertex(edge.from()).unwrap();
                    let to = view.backing_vertex(edge.to()).unwrap();
                    assert!(graph.contains_edge(&edge.with_endpoints(from, to)));
                }
                for u in sub.vertices() {
                    let backing = view.backing_vertex(u).unwrap();
                    assert_eq!(view.local_vertex(backing), Some(u));
                    assert_eq!(
                        sub.neighbors_of(u).map(|v| view.backing_vertex(v).unwrap()).sorted().collect_vec(),
                        graph.neighbors_of(backing).filter(|v| selected.contains(v)).sorted().collect_vec()
                    );
                }
            }
        }
    };
}

pub(crate) use test_graph_ops;
