//! Katz centrality by power iteration (rustworkx-core)

use std::convert::Infallible;

use rustworkx_core::centrality::katz_centrality;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::graph::CallGraph;

/// Attenuation and convergence settings for Katz centrality
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KatzParams {
    /// Attenuation factor; must stay below `1 / lambda_max` of the graph
    pub alpha: f64,
    pub max_iter: usize,
    /// Per-node tolerance; iteration stops once the L1 change is below
    /// `n * tolerance`
    pub tolerance: f64,
}

impl Default for KatzParams {
    fn default() -> Self {
        Self {
            alpha: 0.01,
            max_iter: 1000,
            tolerance: 1e-6,
        }
    }
}

/// Why Katz centrality could not be computed for a graph
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KatzError {
    /// Also covers a diverging iteration (alpha too large), whose change
    /// never drops below the tolerance
    #[error("power iteration did not converge in {iterations} iterations")]
    NotConverged { iterations: usize },
}

/// Unshifted, L2-normalized Katz centrality per node.
///
/// Iterates `x = alpha * A^T x + 1` from `x = 0`, so each node collects the
/// attenuated score of its predecessors. Self-loops feed a node's own score.
pub fn katz(graph: &CallGraph, params: &KatzParams) -> Result<Vec<f64>, KatzError> {
    let result = katz_centrality(
        graph.digraph(),
        |_| Ok::<f64, Infallible>(1.0),
        Some(params.alpha),
        None,
        Some(1.0),
        Some(params.max_iter),
        Some(params.tolerance),
    );

    match result {
        Ok(Some(scores)) if scores.iter().all(|v| v.is_finite()) => Ok(scores),
        Ok(_) => Err(KatzError::NotConverged {
            iterations: params.max_iter,
        }),
        Err(never) => match never {},
    }
}
