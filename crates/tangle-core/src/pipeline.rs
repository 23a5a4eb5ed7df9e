//! Full analysis pipeline.
//!
//! Phases: walk the tree, run the per-file phase (extraction, metrics,
//! complexity) across a worker pool, then merge single-threaded into the
//! dependency graph and run the graph analyses. Per-file records are
//! independent, so only the merge needs a single writer.

use std::fs;
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::AnalysisConfig;
use crate::error::{Diagnostic, DiagnosticKind, Error};
use crate::extract::{Extraction, ExtractionMethod, Extractors};
use crate::graph::{analyze_coupling, find_cycles, find_orphans, DependencyGraph};
use crate::metrics::{classify, LineBreakdown};
use crate::report::{
    adjacency, AnalysisReport, FileMetricsRecord, FunctionComplexityRecord, ScanStats,
};
use crate::resolve::{Resolution, Resolver};
use crate::scanner::{PathGuard, SourceFile, Walker};

pub struct Analyzer {
    config: AnalysisConfig,
}

struct FileAnalysis {
    index: usize,
    extraction: Extraction,
    lines: LineBreakdown,
    diagnostics: Vec<Diagnostic>,
}

impl Analyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn analyze(&self) -> Result<AnalysisReport, Error> {
        let started = Instant::now();
        if !self.config.root.is_dir() {
            return Err(Error::RootNotFound(self.config.root.clone()));
        }
        // The root exists and is a directory at this point, so a failure to
        // canonicalize it is a genuine I/O problem, not a missing root.
        let guard = PathGuard::new(&self.config.root)?;

        let mut outcome = Walker::new(&self.config, &guard).walk();
        // Fail fast if a grammar cannot be loaded at all; worker threads
        // assume construction succeeds.
        Extractors::new()?;

        let analyses = if self.config.threads > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.threads)
                .build()
                .map_err(|e| Error::InvalidConfig(format!("thread pool: {e}")))?;
            pool.install(|| self.per_file_phase(&guard, &outcome.files))
        } else {
            self.per_file_phase(&guard, &outcome.files)
        };

        let mut diagnostics = std::mem::take(&mut outcome.diagnostics);
        let resolver = Resolver::new(&outcome.files);
        let mut graph = DependencyGraph::from_files(&outcome.files);
        for analysis in &analyses {
            let file = &outcome.files[analysis.index];
            diagnostics.extend(analysis.diagnostics.iter().cloned());
            for import in &analysis.extraction.imports {
                if let Resolution::Internal(target) =
                    resolver.resolve(file, import, &mut diagnostics)
                {
                    graph.add_edge(&file.path, &target);
                }
            }
        }

        let cycles = if self.config.detect_cycles {
            find_cycles(&graph)
        } else {
            Vec::new()
        };
        let orphan_report = find_orphans(&graph, &self.config.entry_points);
        let modules = analyze_coupling(
            &graph,
            self.config.coupling_threshold,
            self.config.show_details,
        );

        let only: Option<String> = self
            .config
            .only_file
            .as_ref()
            .map(|p| p.to_string_lossy().replace('\\', "/"));
        let selected = |path: &str| only.as_deref().map_or(true, |f| f == path);

        let mut functions = Vec::new();
        let mut files = Vec::new();
        for analysis in &analyses {
            let file = &outcome.files[analysis.index];
            if !selected(&file.path) {
                continue;
            }
            for span in &analysis.extraction.functions {
                functions.push(FunctionComplexityRecord {
                    file: file.path.clone(),
                    function_name: span.name.clone(),
                    start_line: span.start_line,
                    end_line: span.end_line,
                    complexity: span.complexity,
                    exceeds_threshold: span.complexity > self.config.complexity_threshold,
                });
            }
            let total_lines = analysis.lines.total();
            files.push(FileMetricsRecord {
                file: file.path.clone(),
                language: file.language,
                total_lines,
                code_lines: analysis.lines.code,
                comment_lines: analysis.lines.comment,
                blank_lines: analysis.lines.blank,
                function_count: analysis.extraction.functions.len(),
                class_count: analysis.extraction.class_count,
                import_count: analysis.extraction.imports.len(),
                extraction_method: analysis.extraction.method,
                exceeds_size_policy: total_lines > self.config.size_policy,
            });
        }
        functions.sort_by(|a, b| {
            (&a.file, a.start_line, &a.function_name).cmp(&(&b.file, b.start_line, &b.function_name))
        });
        files.sort_by(|a, b| a.file.cmp(&b.file));
        diagnostics.sort();
        diagnostics.dedup();

        let mut by_language = std::collections::BTreeMap::new();
        for file in &outcome.files {
            *by_language.entry(file.language.as_str().to_string()).or_insert(0) += 1;
        }
        let stats = ScanStats {
            files_scanned: outcome.files.len(),
            files_skipped: outcome.skipped,
            by_language,
            edges: graph.edge_count(),
            orphan_candidates: orphan_report.candidate_count,
        };

        info!(
            files = stats.files_scanned,
            edges = stats.edges,
            duration_ms = started.elapsed().as_millis() as u64,
            "analysis complete"
        );

        Ok(AnalysisReport {
            modules,
            cycles,
            orphans: orphan_report.modules,
            functions,
            files,
            diagnostics,
            graph: adjacency(&graph),
            stats,
        })
    }

    fn per_file_phase(&self, guard: &PathGuard, files: &[SourceFile]) -> Vec<FileAnalysis> {
        let mut analyses: Vec<FileAnalysis> = files
            .par_iter()
            .enumerate()
            .map_init(
                || Extractors::new().ok(),
                |extractors, (index, file)| self.analyze_file(extractors.as_mut(), guard, index, file),
            )
            .collect();
        analyses.sort_by_key(|a| a.index);
        analyses
    }

    fn analyze_file(
        &self,
        extractors: Option<&mut Extractors>,
        guard: &PathGuard,
        index: usize,
        file: &SourceFile,
    ) -> FileAnalysis {
        let mut analysis = FileAnalysis {
            index,
            extraction: Extraction::new(ExtractionMethod::Ast),
            lines: LineBreakdown::default(),
            diagnostics: Vec::new(),
        };

        let source = match fs::read_to_string(guard.root().join(&file.path)) {
            Ok(s) => s,
            Err(e) => {
                analysis.diagnostics.push(Diagnostic::new(
                    file.path.clone(),
                    DiagnosticKind::SkippedFile,
                    format!("unreadable during analysis: {e}"),
                ));
                return analysis;
            }
        };
        analysis.lines = classify(&source, file.language);

        let Some(extractors) = extractors else {
            analysis.diagnostics.push(Diagnostic::new(
                file.path.clone(),
                DiagnosticKind::ParseError,
                "grammar unavailable on worker thread",
            ));
            return analysis;
        };
        analysis.extraction = extractors.extract(file, &source, self.config.force_heuristic);
        if let Some(reason) = &analysis.extraction.parse_error {
            analysis.diagnostics.push(Diagnostic::new(
                file.path.clone(),
                DiagnosticKind::ParseError,
                reason.clone(),
            ));
        }
        debug!(
            file = %file.path,
            imports = analysis.extraction.imports.len(),
            functions = analysis.extraction.functions.len(),
            "file analyzed"
        );
        analysis
    }
}
