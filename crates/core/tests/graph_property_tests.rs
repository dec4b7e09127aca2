use common::error::Error;
use common::types::{ExchangeEdge, TickerId};
use converter_core::graph::{assign_dense_ids, collect_distinct_currencies};
use converter_core::traits::PathSolver;
use converter_core::{BfsSolver, BuildOptions, CurrencyGraph};
use proptest::prelude::*;
use proptest::strategy::Strategy;
use rust_decimal::Decimal;
use std::collections::HashSet;

const NUM_VERTICES_STRATEGY: std::ops::Range<usize> = 1usize..10;

type Pair = (usize, usize, Decimal);

fn graph_strategy() -> impl Strategy<Value = (usize, Vec<Pair>)> {
    NUM_VERTICES_STRATEGY.prop_flat_map(|num_vertices| {
        // Rates between 0.0001 and 1000.0000.
        let pair_generator = (0usize..num_vertices, 0usize..num_vertices, 1i64..10_000_000)
            .prop_map(|(u, v, mantissa)| (u, v, Decimal::new(mantissa, 4)));
        let pairs_generator = prop::collection::vec(pair_generator, 0..30);

        (Just(num_vertices), pairs_generator)
    })
}

fn lines_strategy() -> impl Strategy<Value = Vec<String>> {
    let ticker = "[A-Z]{3}";
    let pair = (ticker, ticker, 1u32..100_000)
        .prop_map(|(from, to, rate)| format!("{};{};{}", from, to, Decimal::new(rate as i64, 2)));

    (ticker, ticker, prop::collection::vec(pair, 0..20)).prop_map(|(src, dst, pairs)| {
        let mut lines = vec![format!("{};100;{}", src, dst), pairs.len().to_string()];
        lines.extend(pairs);
        lines
    })
}

/// Undirected reachability, independent of the solver under test.
fn reachable(num_vertices: usize, pairs: &[Pair], source: usize) -> HashSet<usize> {
    let mut seen = HashSet::from([source]);
    let mut stack = vec![source];
    while let Some(u) = stack.pop() {
        for &(a, b, _) in pairs {
            let next = if a == u {
                b
            } else if b == u {
                a
            } else {
                continue;
            };
            if next < num_vertices && seen.insert(next) {
                stack.push(next);
            }
        }
    }
    seen
}

proptest! {
    /// Property: every pair yields a forward edge at `rate` and a backward edge at `1/rate`.
    #[test]
    fn reciprocal_edges_present((num_vertices, pairs) in graph_strategy()) {
        let graph = CurrencyGraph::from_rates(num_vertices, &pairs).unwrap();

        prop_assert_eq!(graph.edge_count(), 2 * pairs.len());
        for &(from, to, rate) in &pairs {
            let forward = ExchangeEdge { target: to, rate };
            let backward = ExchangeEdge { target: from, rate: Decimal::ONE / rate };
            prop_assert!(graph.edges(from).unwrap().contains(&forward));
            prop_assert!(graph.edges(to).unwrap().contains(&backward));
        }
    }

    /// Property: the solver finds a path exactly when the target is reachable,
    /// and any path it returns is a real chain of edges from source to target.
    #[test]
    fn bfs_terminates_with_valid_path(
        (num_vertices, pairs) in graph_strategy(),
        source_seed in 0usize..100,
        target_seed in 0usize..100,
    ) {
        let source = source_seed % num_vertices;
        let target = target_seed % num_vertices;
        let graph = CurrencyGraph::from_rates(num_vertices, &pairs).unwrap();

        let result = BfsSolver.find_path(&graph, source, target);
        let expected_reachable = reachable(num_vertices, &pairs, source).contains(&target);

        match result {
            Ok(path) => {
                prop_assert!(expected_reachable);
                prop_assert!(path.len() < num_vertices);

                let mut at = source;
                for hop in &path.hops {
                    prop_assert_eq!(hop.from, at);
                    let edge = ExchangeEdge { target: hop.to, rate: hop.rate };
                    prop_assert!(graph.edges(hop.from).unwrap().contains(&edge));
                    at = hop.to;
                }
                prop_assert_eq!(at, target);
            }
            Err(e) => {
                prop_assert!(!expected_reachable);
                prop_assert_eq!(e, Error::NoConversionPath);
            }
        }
    }

    /// Property: K distinct tickers receive exactly the ids 0..K, each once.
    #[test]
    fn dense_ids_are_a_permutation(lines in lines_strategy()) {
        let scan = collect_distinct_currencies(&lines, &BuildOptions::default()).unwrap();
        let ids = assign_dense_ids(&scan.distinct);

        let mut tickers = HashSet::new();
        let first: Vec<&str> = lines[0].split(';').collect();
        tickers.insert(first[0].to_string());
        tickers.insert(first[2].to_string());
        for line in &lines[2..] {
            let fields: Vec<&str> = line.split(';').collect();
            tickers.insert(fields[0].to_string());
            tickers.insert(fields[1].to_string());
        }

        prop_assert_eq!(ids.len(), tickers.len());
        let mut assigned: Vec<usize> = ids.values().copied().collect();
        assigned.sort_unstable();
        prop_assert_eq!(assigned, (0..tickers.len()).collect::<Vec<_>>());

        let (graph, _) = CurrencyGraph::from_lines(&lines, &BuildOptions::default()).unwrap();
        prop_assert_eq!(graph.vertex_count(), tickers.len());
        for ticker in &tickers {
            let id = TickerId::parse(ticker).unwrap();
            prop_assert_eq!(graph.vertex_of(id), ids.get(&id).copied());
        }
    }
}
