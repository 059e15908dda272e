//! Top-K feature schema
//!
//! The schema is the first K symbols of a corpus ranking. It fixes the
//! dimensionality and column order of every feature vector built from it,
//! so once written it must be reused as-is for every corpus that feeds the
//! same classifier (benign and malicious alike).

use std::path::{Path, PathBuf};

use crate::centrality::Metric;
use crate::error::Result;
use crate::extract::Symbol;
use crate::record::Ranking;

/// Ordered list of the symbols considered sensitive
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSchema {
    ranking: Ranking,
}

impl FeatureSchema {
    /// First `k` entries of `ranking`. If the corpus knows fewer than `k`
    /// symbols the schema is shorter.
    pub fn select(ranking: &Ranking, k: usize) -> Self {
        Self {
            ranking: ranking.top(k),
        }
    }

    /// `output_top_<K>_<metric>_centrality.json`
    pub fn file_name(k: usize, metric: Metric) -> String {
        format!("output_top_{}_{}_centrality.json", k, metric.name())
    }

    /// Default schema location for a metric under an output root
    pub fn default_path(output_root: &Path, k: usize, metric: Metric) -> PathBuf {
        output_root.join(Self::file_name(k, metric))
    }

    pub fn len(&self) -> usize {
        self.ranking.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranking.is_empty()
    }

    /// Schema symbols in column order
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.ranking.entries().iter().map(|(s, _)| s)
    }

    /// Corpus scores the schema was selected by
    pub fn ranking(&self) -> &Ranking {
        &self.ranking
    }

    /// Write the schema with its corpus scores, in column order
    pub fn save(&self, path: &Path) -> Result<()> {
        self.ranking.save(path)
    }

    /// Load a pinned schema. Column order is the key order of the file,
    /// whatever its scores say, so a hand-edited schema keeps its columns.
    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self {
            ranking: Ranking::load_in_file_order(path)?,
        })
    }
}
