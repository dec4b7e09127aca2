use rust_decimal::Decimal;
use std::collections::VecDeque;
use tracing::debug;

use super::graph::CurrencyGraph;
use super::traits::PathSolver;
use common::{
    error::Error,
    types::{ConversionPath, Hop},
};

/// Per-vertex bookkeeping of one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraversalRecord {
    pub visited: bool,
    /// Hop count from the source.
    pub distance: usize,
    /// Vertex this one was discovered from; `None` for the source and unvisited vertices.
    pub predecessor: Option<usize>,
    /// Rate of the edge `predecessor -> vertex`.
    pub rate: Decimal,
}

impl Default for TraversalRecord {
    fn default() -> Self {
        TraversalRecord {
            visited: false,
            distance: usize::MAX,
            predecessor: None,
            rate: Decimal::ONE,
        }
    }
}

/// Raw result of a breadth-first search.
#[derive(Debug, Clone)]
pub struct Traversal {
    pub records: Vec<TraversalRecord>,
    /// Number of adjacency entries looked at before the search stopped.
    pub edges_examined: usize,
    pub target_reached: bool,
}

/// Solver running an unweighted breadth-first search.
///
/// The first path that reaches the target wins: fewest hops, ties broken by
/// dequeue order and then by edge insertion order. It is not the best-rate path.
pub struct BfsSolver;

impl BfsSolver {
    /// Runs the search from `source`, stopping as soon as `target` is discovered.
    ///
    /// # Errors
    /// Returns `Error::VertexOutOfBounds` if `source` or `target` is not a vertex.
    pub fn search(
        &self,
        graph: &CurrencyGraph,
        source: usize,
        target: usize,
    ) -> Result<Traversal, Error> {
        let num_vertices = graph.vertex_count();
        if source >= num_vertices {
            return Err(Error::VertexOutOfBounds(source));
        }
        if target >= num_vertices {
            return Err(Error::VertexOutOfBounds(target));
        }

        let mut records = vec![TraversalRecord::default(); num_vertices];
        records[source].visited = true;
        records[source].distance = 0;

        let mut traversal = Traversal {
            records,
            edges_examined: 0,
            target_reached: source == target,
        };
        if traversal.target_reached {
            return Ok(traversal);
        }

        let mut queue = VecDeque::with_capacity(num_vertices);
        queue.push_back(source);

        'search: while let Some(u) = queue.pop_front() {
            let distance = traversal.records[u].distance;

            for edge in graph.edges(u)? {
                traversal.edges_examined += 1;

                let w = edge.target;
                let record = &mut traversal.records[w];
                if record.visited {
                    continue;
                }

                *record = TraversalRecord {
                    visited: true,
                    distance: distance + 1,
                    predecessor: Some(u),
                    rate: edge.rate,
                };
                queue.push_back(w);

                if w == target {
                    traversal.target_reached = true;
                    break 'search;
                }
            }
        }

        debug!(
            edges_examined = traversal.edges_examined,
            target_reached = traversal.target_reached,
            "BFS finished"
        );

        Ok(traversal)
    }

    /// Walks the predecessor chain from `target` back to `source` and returns
    /// the hops in source -> target order.
    ///
    /// # Errors
    /// `Error::PathReconstructionFailed` if `target` was never visited or the
    /// chain does not end at `source`.
    pub fn reconstruct_path(
        &self,
        source: usize,
        target: usize,
        records: &[TraversalRecord],
    ) -> Result<ConversionPath, Error> {
        let reached = records.get(target).is_some_and(|record| record.visited);
        if !reached {
            return Err(Error::PathReconstructionFailed);
        }

        let mut hops = Vec::new();
        let mut current = target;

        while let Some(pred) = records[current].predecessor {
            // A chain longer than the vertex count must contain a loop.
            if hops.len() >= records.len() || pred >= records.len() {
                return Err(Error::PathReconstructionFailed);
            }
            hops.push(Hop {
                from: pred,
                to: current,
                rate: records[current].rate,
            });
            current = pred;
        }

        if current != source {
            return Err(Error::PathReconstructionFailed);
        }

        hops.reverse();
        Ok(ConversionPath { hops })
    }
}

impl PathSolver for BfsSolver {
    fn find_path(
        &self,
        graph: &CurrencyGraph,
        source: usize,
        target: usize,
    ) -> Result<ConversionPath, Error> {
        let traversal = self.search(graph, source, target)?;
        if !traversal.target_reached {
            return Err(Error::NoConversionPath);
        }

        self.reconstruct_path(source, target, &traversal.records)
    }
}
