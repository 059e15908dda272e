//! Ranked symbol → score maps and their JSON artifacts
//!
//! A [`Ranking`] backs both the per-package centrality record
//! (`<metric>_new.json`) and the corpus-wide ranking
//! (`<metric>_final_new.json`). On disk it is a single JSON object whose keys
//! appear in descending score order.

use std::fs;
use std::io;
use std::path::Path;

use ahash::AHashMap;
use ordered_float::OrderedFloat;
use serde_json::{Map, Value};

use crate::error::{ApiSenseError, Result};
use crate::extract::Symbol;
use crate::fs_utils;

/// Symbols sorted by descending score, ties by ascending symbol. A ranking
/// loaded in file order keeps the file's order instead.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ranking {
    entries: Vec<(Symbol, f64)>,
}

impl Ranking {
    /// Build a ranking from unordered scores
    pub fn from_scores<I>(scores: I) -> Self
    where
        I: IntoIterator<Item = (Symbol, f64)>,
    {
        let mut entries: Vec<(Symbol, f64)> = scores.into_iter().collect();
        entries.sort_by(|(sym_a, a), (sym_b, b)| {
            OrderedFloat(*b)
                .cmp(&OrderedFloat(*a))
                .then_with(|| sym_a.cmp(sym_b))
        });
        Self { entries }
    }

    pub fn entries(&self) -> &[(Symbol, f64)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, symbol: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(s, _)| s == symbol)
            .map(|(_, v)| *v)
    }

    /// Hash lookup for repeated queries against the same ranking
    pub fn to_lookup(&self) -> AHashMap<&str, f64> {
        self.entries
            .iter()
            .map(|(s, v)| (s.as_str(), *v))
            .collect()
    }

    /// The first `k` entries, in order
    pub fn top(&self, k: usize) -> Ranking {
        Ranking {
            entries: self.entries.iter().take(k).cloned().collect(),
        }
    }

    pub fn to_json(&self) -> Value {
        let mut map = Map::with_capacity(self.entries.len());
        for (symbol, score) in &self.entries {
            map.insert(symbol.clone(), Value::from(*score));
        }
        Value::Object(map)
    }

    /// Parse a JSON object of symbol → number. The result is re-sorted, so
    /// hand-edited or foreign files still honour the ordering invariant.
    pub fn from_json(path: &Path, value: Value) -> Result<Self> {
        Ok(Self::from_scores(Self::from_json_in_file_order(path, value)?.entries))
    }

    /// Parse a JSON object of symbol → number, keeping its key order as is
    pub fn from_json_in_file_order(path: &Path, value: Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(ApiSenseError::ArtifactFormat {
                path: path.to_path_buf(),
                message: "expected a JSON object".to_string(),
            });
        };

        let mut entries = Vec::with_capacity(map.len());
        for (symbol, score) in map {
            let score = score.as_f64().ok_or_else(|| ApiSenseError::ArtifactFormat {
                path: path.to_path_buf(),
                message: format!("score for '{}' is not a number", symbol),
            })?;
            entries.push((symbol, score));
        }
        Ok(Self { entries })
    }

    /// Load a ranking artifact.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable or not a JSON
    /// object of numbers.
    pub fn load(path: &Path) -> Result<Self> {
        Self::from_json(path, read_json(path)?)
    }

    /// Load an artifact whose key order is meaningful in itself
    pub fn load_in_file_order(path: &Path) -> Result<Self> {
        Self::from_json_in_file_order(path, read_json(path)?)
    }

    /// Load a ranking artifact, treating a missing file as `None`
    pub fn load_optional(path: &Path) -> Result<Option<Self>> {
        match Self::load(path) {
            Ok(ranking) => Ok(Some(ranking)),
            Err(ApiSenseError::Io(e)) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Write the ranking as a pretty-printed JSON object, atomically
    pub fn save(&self, path: &Path) -> Result<()> {
        fs_utils::write_json_atomic(path, &self.to_json())
    }
}

fn read_json(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| ApiSenseError::ArtifactFormat {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
