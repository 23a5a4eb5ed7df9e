//! Orphan detection: files nothing imports, net of entry points.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::DependencyGraph;

/// Filtered orphan list plus the pre-filter candidate count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrphanReport {
    /// Zero fan-in files that are not entry points, sorted
    pub modules: Vec<String>,
    /// Zero fan-in count before the entry-point filter
    pub candidate_count: usize,
}

/// Entry points match by file stem: `src/main.py` matches `main`.
pub fn find_orphans(graph: &DependencyGraph, entry_points: &[String]) -> OrphanReport {
    let mut report = OrphanReport::default();

    for id in 0..graph.node_count() {
        if graph.fan_in(id) > 0 {
            continue;
        }
        report.candidate_count += 1;
        let path = graph.node(id);
        let stem = Path::new(path)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(path);
        if !entry_points.iter().any(|e| e == stem) {
            report.modules.push(path.to_string());
        }
    }

    report.modules.sort();
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_entry_points;
    use crate::graph::graph_from;

    #[test]
    fn entry_points_are_excluded_but_counted() {
        let graph = graph_from(
            &["lonely.py", "main.py", "used.py"],
            &[("main.py", "used.py")],
        );
        let report = find_orphans(&graph, &default_entry_points());
        assert_eq!(report.modules, vec!["lonely.py"]);
        assert_eq!(report.candidate_count, 2);
    }

    #[test]
    fn stem_matching_sees_through_directories() {
        let graph = graph_from(&["src/index.ts", "src/extra.ts"], &[]);
        let report = find_orphans(&graph, &default_entry_points());
        assert_eq!(report.modules, vec!["src/extra.ts"]);
        assert_eq!(report.candidate_count, 2);
    }

    #[test]
    fn imported_files_are_never_orphans() {
        let graph = graph_from(&["a.py", "b.py"], &[("a.py", "b.py")]);
        let report = find_orphans(&graph, &[]);
        assert_eq!(report.modules, vec!["a.py"]);
    }
}
