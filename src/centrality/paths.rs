//! Shortest-path centralities (closeness, harmonic)
//!
//! Both measures look at *incoming* distances: how quickly the rest of the
//! file's calls lead up to a symbol. Closeness comes from rustworkx-core;
//! harmonic runs one unit-weight search per node over the reversed graph.

use petgraph::algo::dijkstra;
use petgraph::graph::NodeIndex;
use petgraph::visit::Reversed;
use rustworkx_core::centrality::closeness_centrality;

use crate::graph::CallGraph;

/// Unshifted closeness and harmonic scores, indexed by node
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceScores {
    pub closeness: Vec<f64>,
    pub harmonic: Vec<f64>,
}

/// Compute closeness and harmonic centrality.
///
/// Closeness of `v` with `r` nodes reaching it at total distance `s` is
/// `(r / s) * (r / (n - 1))`, i.e. the inverse mean distance scaled by the
/// reachable fraction of the graph, and 0 when nothing reaches `v`.
/// Harmonic of `v` is the sum of `1 / d(u, v)` over those `r` nodes;
/// unreachable nodes add nothing.
pub fn incoming_distance_scores(graph: &CallGraph) -> DistanceScores {
    let inner = graph.digraph();

    let closeness: Vec<f64> = closeness_centrality(inner, true)
        .into_iter()
        .map(|score| score.unwrap_or(0.0))
        .collect();

    let harmonic: Vec<f64> = (0..graph.node_count())
        .map(|target| {
            dijkstra(Reversed(inner), NodeIndex::new(target), None, |_| 1usize)
                .values()
                .filter(|d| **d > 0)
                .map(|d| 1.0 / *d as f64)
                .sum::<f64>()
        })
        .collect();

    DistanceScores {
        closeness,
        harmonic,
    }
}
