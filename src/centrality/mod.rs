//! Centrality metrics over per-file call graphs
//!
//! Four scores are computed for every node of a [`CallGraph`]:
//!
//! | Metric | Definition (n = node count) |
//! |--------|-----------------------------|
//! | degree | `(in + out) / (n - 1)`, `1.0` for a single node; a self-loop counts once each way |
//! | closeness | reachability-scaled inverse mean distance *from* the nodes that reach it |
//! | harmonic | sum of `1 / d(u, v)` over nodes `u` that reach `v` |
//! | katz | fixed point of `x = alpha * A^T x + 1`, L2-normalized |
//!
//! Every score is then shifted by [`SCORE_SHIFT`], so a node that is present
//! in a graph always scores at least 1 and can be told apart from a symbol
//! that is absent (an implicit 0) once scores are summed across files and
//! packages.
//!
//! Katz is the only metric that can fail: when the power iteration does not
//! converge (alpha too large for the graph's spectral radius) the graph
//! reports the three other metrics and carries the failure for logging.

pub mod katz;
pub mod paths;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ApiSenseError;
use crate::extract::Symbol;
use crate::graph::CallGraph;

pub use katz::{KatzError, KatzParams};

/// Added to every raw centrality score
pub const SCORE_SHIFT: f64 = 1.0;

/// The centrality measures the pipeline ranks APIs by
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Degree,
    Closeness,
    Harmonic,
    Katz,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Degree,
        Metric::Closeness,
        Metric::Harmonic,
        Metric::Katz,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Degree => "degree",
            Self::Closeness => "closeness",
            Self::Harmonic => "harmonic",
            Self::Katz => "katz",
        }
    }

    /// Per-package ranking file, e.g. `degree_new.json`
    pub fn package_file_name(&self) -> String {
        format!("{}_new.json", self.name())
    }

    /// Corpus-wide ranking file, e.g. `degree_final_new.json`
    pub fn corpus_file_name(&self) -> String {
        format!("{}_final_new.json", self.name())
    }

    /// Per-package feature vector file, e.g. `degree_feature_vector.json`
    pub fn vector_file_name(&self) -> String {
        format!("{}_feature_vector.json", self.name())
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = ApiSenseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "degree" => Ok(Self::Degree),
            "closeness" => Ok(Self::Closeness),
            "harmonic" => Ok(Self::Harmonic),
            "katz" => Ok(Self::Katz),
            other => Err(ApiSenseError::Config {
                message: format!("unknown metric '{}'", other),
            }),
        }
    }
}

/// Shifted scores of one graph, per requested metric
#[derive(Debug, Clone, Default)]
pub struct GraphScores {
    symbols: Vec<Symbol>,
    scores: BTreeMap<Metric, Vec<f64>>,
    katz_failure: Option<KatzError>,
}

impl GraphScores {
    /// Metrics that produced scores for this graph
    pub fn metrics(&self) -> impl Iterator<Item = Metric> + '_ {
        self.scores.keys().copied()
    }

    pub fn get(&self, metric: Metric, symbol: &str) -> Option<f64> {
        let pos = self.symbols.iter().position(|s| s == symbol)?;
        self.scores.get(&metric).map(|values| values[pos])
    }

    /// `(symbol, score)` pairs of one metric
    pub fn metric_scores(&self, metric: Metric) -> impl Iterator<Item = (&Symbol, f64)> + '_ {
        self.scores
            .get(&metric)
            .into_iter()
            .flat_map(move |values| self.symbols.iter().zip(values.iter().copied()))
    }

    /// Why Katz was omitted, if it was requested and failed
    pub fn katz_failure(&self) -> Option<&KatzError> {
        self.katz_failure.as_ref()
    }
}

/// Compute the requested metrics for one graph
pub fn compute(graph: &CallGraph, metrics: &[Metric], katz_params: &KatzParams) -> GraphScores {
    let mut scores = BTreeMap::new();
    let mut katz_failure = None;

    if metrics.contains(&Metric::Degree) {
        scores.insert(Metric::Degree, shifted(degree(graph)));
    }

    if metrics.contains(&Metric::Closeness) || metrics.contains(&Metric::Harmonic) {
        let distances = paths::incoming_distance_scores(graph);
        if metrics.contains(&Metric::Closeness) {
            scores.insert(Metric::Closeness, shifted(distances.closeness));
        }
        if metrics.contains(&Metric::Harmonic) {
            scores.insert(Metric::Harmonic, shifted(distances.harmonic));
        }
    }

    if metrics.contains(&Metric::Katz) {
        match katz::katz(graph, katz_params) {
            Ok(values) => {
                scores.insert(Metric::Katz, shifted(values));
            }
            Err(e) => katz_failure = Some(e),
        }
    }

    GraphScores {
        symbols: graph.symbols().cloned().collect(),
        scores,
        katz_failure,
    }
}

/// Normalized total degree per node, unshifted
pub fn degree(graph: &CallGraph) -> Vec<f64> {
    let n = graph.node_count();
    if n <= 1 {
        return vec![1.0; n];
    }

    let mut totals = vec![0usize; n];
    for (src, dst) in graph.edge_pairs() {
        totals[src] += 1;
        totals[dst] += 1;
    }

    let scale = 1.0 / (n - 1) as f64;
    totals.into_iter().map(|d| d as f64 * scale).collect()
}

fn shifted(values: Vec<f64>) -> Vec<f64> {
    values.into_iter().map(|v| v + SCORE_SHIFT).collect()
}
