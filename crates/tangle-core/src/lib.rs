//! tangle-core: Import-dependency analysis engine
//!
//! This crate provides the analysis pipeline behind the `tangle` CLI:
//! - Scanner: file walking with ignore patterns, language classification,
//!   and a path guard that keeps every read inside the scan root
//! - Extract: per-language import/function extraction via tree-sitter,
//!   with a clearly labeled regex fallback for JavaScript/TypeScript
//! - Resolve: raw specifiers -> in-project files or external markers
//! - Graph: dependency graph, cycle detection, orphan detection, coupling
//! - Complexity: per-function cyclomatic complexity
//! - Metrics: per-file code/comment/blank classification and size policy
//! - Report: deterministic, machine-readable assembly of all results

pub mod complexity;
pub mod config;
pub mod error;
pub mod extract;
pub mod graph;
pub mod metrics;
pub mod pipeline;
pub mod report;
pub mod resolve;
pub mod scanner;

// Re-exports for convenience
pub use config::{AnalysisConfig, LanguageFilter};
pub use error::{Diagnostic, DiagnosticKind, Error};
pub use extract::{Extraction, ExtractionMethod, RawImport};
pub use graph::{
    Cycle, CycleSeverity, DependencyGraph, CouplingPattern, CouplingRecord, OrphanReport,
};
pub use pipeline::Analyzer;
pub use report::{AnalysisReport, FileMetricsRecord, FunctionComplexityRecord, ScanStats};
pub use scanner::{Language, SourceFile, Walker};
