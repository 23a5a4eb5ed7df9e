//! Report types and output formats.
//!
//! Every vector in the report is sorted by path, name, and line before
//! assembly, and the adjacency map uses ordered containers, so two runs
//! over an unchanged tree serialize to byte-identical JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Diagnostic;
use crate::extract::ExtractionMethod;
use crate::graph::{CouplingRecord, Cycle, DependencyGraph};
use crate::scanner::Language;

/// One function with its cyclomatic complexity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionComplexityRecord {
    pub file: String,
    pub function_name: String,
    pub start_line: u32,
    pub end_line: u32,
    pub complexity: u32,
    pub exceeds_threshold: bool,
}

/// Per-file size and structure metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetricsRecord {
    pub file: String,
    pub language: Language,
    pub total_lines: usize,
    pub code_lines: usize,
    pub comment_lines: usize,
    pub blank_lines: usize,
    pub function_count: usize,
    pub class_count: usize,
    pub import_count: usize,
    pub extraction_method: ExtractionMethod,
    pub exceeds_size_policy: bool,
}

/// Run-level counters. Wall-clock duration is logged, not serialized, so
/// this block never breaks output idempotence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanStats {
    pub files_scanned: usize,
    pub files_skipped: usize,
    pub by_language: BTreeMap<String, usize>,
    pub edges: usize,
    pub orphan_candidates: usize,
}

/// The single deterministic output document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// Per-module coupling records, in path order
    pub modules: Vec<CouplingRecord>,
    pub cycles: Vec<Cycle>,
    pub orphans: Vec<String>,
    pub functions: Vec<FunctionComplexityRecord>,
    pub files: Vec<FileMetricsRecord>,
    pub diagnostics: Vec<Diagnostic>,
    /// Internal-edge adjacency, every node present
    pub graph: BTreeMap<String, Vec<String>>,
    pub stats: ScanStats,
}

impl AnalysisReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Adjacency map alone, for `--output-graph json`.
    pub fn graph_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.graph)
    }

    /// Graphviz form: one `"from" -> "to";` line per edge.
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph dependencies {\n");
        for (from, targets) in &self.graph {
            for to in targets {
                out.push_str(&format!("  \"{from}\" -> \"{to}\";\n"));
            }
        }
        out.push_str("}\n");
        out
    }
}

/// Ordered adjacency snapshot of the built graph.
pub fn adjacency(graph: &DependencyGraph) -> BTreeMap<String, Vec<String>> {
    (0..graph.node_count())
        .map(|id| {
            let targets = graph
                .out_neighbors(id)
                .iter()
                .map(|&t| graph.node(t).to_string())
                .collect();
            (graph.node(id).to_string(), targets)
        })
        .collect()
}
