//! Per-file call precedence graph
//!
//! A [`CallGraph`] connects every call target to every call target that
//! appears after it in the same file, not only to its immediate successor.
//! Repeated symbols collapse into a single node, and the graph is simple:
//!
//! - `u -> v` exists iff some occurrence of `u` comes strictly before some
//!   occurrence of `v`
//! - a symbol that occurs twice gets a self-loop `u -> u`
//! - repeated pairs do not add parallel edges
//!
//! So `[foo, bar, foo]` yields `foo -> bar`, `foo -> foo` and `bar -> foo`.

use ahash::AHashMap;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::extract::Symbol;

/// Directed precedence graph of one file's call sequence
#[derive(Debug, Clone)]
pub struct CallGraph {
    graph: DiGraph<Symbol, ()>,
    index: AHashMap<Symbol, NodeIndex>,
}

impl CallGraph {
    /// Build the graph for a call sequence. Returns `None` for an empty
    /// sequence: a file without calls contributes nothing.
    ///
    /// Since `u -> v` holds exactly when the first occurrence of `u`
    /// precedes the last occurrence of `v`, edges are derived from those two
    /// positions per distinct symbol instead of from every pair of calls.
    pub fn from_sequence(sequence: &[Symbol]) -> Option<Self> {
        if sequence.is_empty() {
            return None;
        }

        let mut graph = DiGraph::new();
        let mut index: AHashMap<Symbol, NodeIndex> = AHashMap::new();
        let mut first_seen: Vec<usize> = Vec::new();
        let mut last_seen: Vec<usize> = Vec::new();

        for (pos, symbol) in sequence.iter().enumerate() {
            match index.get(symbol) {
                Some(&node) => last_seen[node.index()] = pos,
                None => {
                    let node = graph.add_node(symbol.clone());
                    index.insert(symbol.clone(), node);
                    first_seen.push(pos);
                    last_seen.push(pos);
                }
            }
        }

        let nodes: Vec<NodeIndex> = graph.node_indices().collect();
        for &src in &nodes {
            for &dst in &nodes {
                if first_seen[src.index()] < last_seen[dst.index()] {
                    graph.add_edge(src, dst, ());
                }
            }
        }

        Some(Self { graph, index })
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Symbols in order of first appearance; position matches node index
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.graph.raw_nodes().iter().map(|n| &n.weight)
    }

    pub fn symbol(&self, node: usize) -> &Symbol {
        &self.graph[NodeIndex::new(node)]
    }

    pub fn contains_edge(&self, src: &str, dst: &str) -> bool {
        match (self.index.get(src), self.index.get(dst)) {
            (Some(&a), Some(&b)) => self.graph.contains_edge(a, b),
            _ => false,
        }
    }

    /// Edges as `(source, target)` node positions, self-loops included
    pub fn edge_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.graph
            .edge_references()
            .map(|e| (e.source().index(), e.target().index()))
    }

    /// The underlying petgraph graph; node index `i` is the `i`-th distinct
    /// symbol in order of first occurrence
    pub fn digraph(&self) -> &DiGraph<Symbol, ()> {
        &self.graph
    }
}
