//! apisense: call-graph centrality features for package corpora
//!
//! Ranks the APIs a corpus of software packages calls by how structurally
//! central they are in per-file call graphs, and encodes every package as a
//! fixed-width vector over the top-ranked APIs for classifier training
//! (e.g. benign vs. malicious packages).
//!
//! # Pipeline
//!
//! 1. [`extract`] - ordered call targets of each source file (tree-sitter,
//!    lexical fallback on parse failure)
//! 2. [`graph`] - precedence graph over those targets
//! 3. [`centrality`] and [`package`] - degree, closeness, harmonic and Katz
//!    scores, summed per package
//! 4. [`aggregate`] - mean score per symbol over the whole corpus
//! 5. [`feature_schema`] - the top-K symbols of a corpus ranking
//! 6. [`vectorize`] - per-package vectors against a pinned schema
//!
//! # Supported Languages
//!
//! - Python (default)
//! - JavaScript
//!
//! # Example
//!
//! ```
//! use apisense::{centrality, CallGraph, KatzParams, Metric};
//!
//! let calls: Vec<String> = vec!["foo".into(), "bar".into(), "foo".into()];
//! let graph = CallGraph::from_sequence(&calls).unwrap();
//! assert_eq!(graph.edge_count(), 3);
//!
//! let scores = centrality::compute(&graph, &Metric::ALL, &KatzParams::default());
//! assert!(scores.get(Metric::Degree, "foo").unwrap() >= 1.0);
//! ```

pub mod aggregate;
pub mod centrality;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod extract;
pub mod feature_schema;
pub mod fs_utils;
pub mod graph;
pub mod lang;
pub mod package;
pub mod pipeline;
pub mod record;
pub mod vectorize;

// Re-export commonly used types
pub use aggregate::{mean_ranking, AggregateSummary};
pub use centrality::{GraphScores, KatzError, KatzParams, Metric, SCORE_SHIFT};
pub use cli::{Cli, OutputFormat};
pub use config::PipelineConfig;
pub use error::{ApiSenseError, Result};
pub use extract::{extract_file, extract_symbols, CallSequence, Extraction, Strategy, Symbol};
pub use feature_schema::FeatureSchema;
pub use graph::CallGraph;
pub use lang::Lang;
pub use package::{PackageProcessor, PackageReport};
pub use pipeline::{RunSummary, ScanSummary, SelectSummary};
pub use record::Ranking;
pub use vectorize::{vectorize, FeatureVector, TrainingTarget, VectorizeSummary};
