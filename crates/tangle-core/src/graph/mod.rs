//! Dependency graph and the analyses that run over it.

mod coupling;
mod cycles;
mod orphans;

pub use coupling::{analyze_coupling, CouplingPattern, CouplingRecord};
pub use cycles::{find_cycles, Cycle, CycleSeverity};
pub use orphans::{find_orphans, OrphanReport};

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;

use crate::scanner::SourceFile;

/// Directed import graph over project files.
///
/// Nodes are fixed at construction from the walker's sorted index, so node
/// ids are stable across runs on an unchanged tree. Adjacency uses ordered
/// sets: one edge per (from, to) pair regardless of how many import lines
/// produced it, and deterministic iteration everywhere.
pub struct DependencyGraph {
    nodes: Vec<String>,
    index: FxHashMap<String, usize>,
    out_edges: Vec<BTreeSet<usize>>,
    in_edges: Vec<BTreeSet<usize>>,
}

impl DependencyGraph {
    /// One node per indexed file, no edges yet.
    pub fn from_files(files: &[SourceFile]) -> Self {
        let nodes: Vec<String> = files.iter().map(|f| f.path.clone()).collect();
        let index = nodes
            .iter()
            .enumerate()
            .map(|(i, p)| (p.clone(), i))
            .collect();
        let n = nodes.len();
        Self {
            nodes,
            index,
            out_edges: vec![BTreeSet::new(); n],
            in_edges: vec![BTreeSet::new(); n],
        }
    }

    /// Record one resolved edge. Unknown endpoints and self-imports are
    /// dropped; duplicate (from, to) pairs collapse into one edge.
    pub fn add_edge(&mut self, from: &str, to: &str) {
        let (Some(&f), Some(&t)) = (self.index.get(from), self.index.get(to)) else {
            return;
        };
        if f == t {
            return;
        }
        if self.out_edges[f].insert(t) {
            self.in_edges[t].insert(f);
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.out_edges.iter().map(|s| s.len()).sum()
    }

    pub fn node(&self, id: usize) -> &str {
        &self.nodes[id]
    }

    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    pub fn id_of(&self, path: &str) -> Option<usize> {
        self.index.get(path).copied()
    }

    pub fn out_neighbors(&self, id: usize) -> &BTreeSet<usize> {
        &self.out_edges[id]
    }

    pub fn in_neighbors(&self, id: usize) -> &BTreeSet<usize> {
        &self.in_edges[id]
    }

    pub fn fan_out(&self, id: usize) -> usize {
        self.out_edges[id].len()
    }

    pub fn fan_in(&self, id: usize) -> usize {
        self.in_edges[id].len()
    }
}

#[cfg(test)]
pub(crate) fn graph_from(nodes: &[&str], edges: &[(&str, &str)]) -> DependencyGraph {
    use crate::scanner::Language;
    let files: Vec<SourceFile> = nodes
        .iter()
        .map(|p| SourceFile {
            path: p.to_string(),
            language: Language::Python,
            line_count: 1,
        })
        .collect();
    let mut graph = DependencyGraph::from_files(&files);
    for (from, to) in edges {
        graph.add_edge(from, to);
    }
    graph
}
